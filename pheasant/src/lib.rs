//! Pheasant Network event specifications.
//!
//! Declares, per chain, which bridge and swap contract events represent
//! cross-chain transfers, and how each event's arguments map onto a
//! canonical [`TransferRecord`].
//!
//! ```no_run
//! use pheasant::Composer;
//!
//! let specs = Composer::pheasant().compose("arbitrum")?;
//! for spec in &specs {
//!     println!("{} {} @ {}", spec.direction(), spec.signature(), spec.target());
//! }
//! # Ok::<(), pheasant::SpecError>(())
//! ```

pub mod composer;
mod decode;
pub mod error;
pub mod families;
pub mod path;
pub mod record;
pub mod registry;
pub mod spec;
pub mod value;

pub use composer::Composer;
pub use error::{DecodeError, SpecError};
pub use families::FamilyBuilders;
pub use path::{ArgPath, PathError};
pub use record::{Direction, Field, TransferRecord};
pub use registry::{Capabilities, ChainRegistry, ContractFamily};
pub use spec::{EventSpec, EventSpecBuilder, FieldSource, LogAttribute, LogFieldMap};
pub use value::ArgValue;
