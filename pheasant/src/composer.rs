//! Assembling the spec list for a chain.

use crate::error::SpecError;
use crate::families::{self, FamilyBuilders};
use crate::registry::ChainRegistry;
use crate::spec::EventSpec;

/// Composes per-chain spec lists from a registry and a set of tracked
/// families.
///
/// Output order is fixed: families in the order given to [`Composer::new`],
/// and within a family the deposit spec before the withdraw spec.
#[derive(Debug, Clone)]
pub struct Composer {
    registry: ChainRegistry,
    families: Vec<FamilyBuilders>,
}

impl Composer {
    /// Track `families` over `registry`.
    #[must_use]
    pub fn new(registry: ChainRegistry, families: &[FamilyBuilders]) -> Self {
        Self {
            registry,
            families: families.to_vec(),
        }
    }

    /// Bridge and swap families over the deployed Pheasant contracts.
    #[must_use]
    pub fn pheasant() -> Self {
        Self::new(ChainRegistry::pheasant(), families::TRACKED)
    }

    /// The underlying registry.
    #[must_use]
    pub const fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    /// Specs for `chain`.
    ///
    /// An unknown chain, or one whose registered families are all untracked,
    /// yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns a [`SpecError`] if a family builder rejects its registered
    /// address or layout.
    pub fn compose(&self, chain: &str) -> Result<Vec<EventSpec>, SpecError> {
        let Some(caps) = self.registry.capabilities(chain) else {
            return Ok(Vec::new());
        };

        let mut specs = Vec::new();
        for builders in &self.families {
            if let Some(address) = caps.address(builders.family) {
                specs.extend(builders.build(address)?);
            }
        }
        Ok(specs)
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::pheasant()
    }
}
