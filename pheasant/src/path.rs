//! Dotted argument paths into decoded event arguments.
//!
//! A path such as `trade.toolContract` names a top-level event argument
//! followed by zero or more struct members. Each segment descends exactly
//! one level.

use core::fmt;
use core::str::FromStr;

use thiserror::Error;

use crate::value::ArgValue;

/// Failure to parse or resolve an [`ArgPath`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PathError {
    /// The path text is empty or has an empty segment.
    #[error("malformed argument path `{0}`")]
    Malformed(String),

    /// A segment names a member that does not exist.
    #[error("argument path `{path}`: no member `{segment}`")]
    SegmentNotFound {
        /// Full path being resolved.
        path: String,
        /// Segment that was not found.
        segment: String,
    },

    /// A segment tries to descend into a value that has no members.
    #[error("argument path `{path}`: cannot descend into `{segment}`, value is not a struct")]
    NotAContainer {
        /// Full path being resolved.
        path: String,
        /// Segment that could not be entered.
        segment: String,
    },
}

/// A non-empty sequence of member names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArgPath {
    segments: Vec<String>,
}

impl ArgPath {
    /// Parse dotted text into a path.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Malformed`] if the text is empty or contains an
    /// empty segment (`"a..b"`, `".a"`, `"a."`).
    pub fn parse(text: &str) -> Result<Self, PathError> {
        if text.split('.').any(str::is_empty) {
            return Err(PathError::Malformed(text.to_owned()));
        }
        Ok(Self {
            segments: text.split('.').map(str::to_owned).collect(),
        })
    }

    /// The path segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Walk `root` one member per segment and return the value reached.
    ///
    /// `root` is normally the [`ArgValue::Struct`] of all event arguments.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::NotAContainer`] when a segment would descend into
    /// a non-struct value and [`PathError::SegmentNotFound`] when a struct has
    /// no member of that name.
    pub fn resolve<'a>(&self, root: &'a ArgValue) -> Result<&'a ArgValue, PathError> {
        self.segments.iter().try_fold(root, |current, segment| {
            let ArgValue::Struct(members) = current else {
                return Err(PathError::NotAContainer {
                    path: self.to_string(),
                    segment: segment.clone(),
                });
            };
            members
                .iter()
                .find_map(|(name, value)| (name == segment).then_some(value))
                .ok_or_else(|| PathError::SegmentNotFound {
                    path: self.to_string(),
                    segment: segment.clone(),
                })
        })
    }
}

impl FromStr for ArgPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ArgPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{U256, address};

    use super::*;

    fn args() -> ArgValue {
        ArgValue::Struct(vec![
            (
                "userAddress".to_owned(),
                ArgValue::Address(address!("00000000000000000000000000000000000000aa")),
            ),
            (
                "trade".to_owned(),
                ArgValue::Struct(vec![
                    (
                        "toolContract".to_owned(),
                        ArgValue::Address(address!("0000000000000000000000000000000000000abc")),
                    ),
                    ("amount".to_owned(), ArgValue::Uint(U256::from(5u64))),
                ]),
            ),
        ])
    }

    #[test]
    fn resolves_top_level_argument() {
        let path = ArgPath::parse("userAddress").unwrap();
        assert_eq!(
            path.resolve(&args()).unwrap().as_address(),
            Some(address!("00000000000000000000000000000000000000aa")),
            "top-level"
        );
    }

    #[test]
    fn resolves_nested_member() {
        let path: ArgPath = "trade.toolContract".parse().unwrap();
        assert_eq!(
            path.resolve(&args()).unwrap(),
            &ArgValue::Address(address!("0000000000000000000000000000000000000abc")),
            "nested"
        );
    }

    #[test]
    fn missing_member_is_segment_not_found() {
        let path = ArgPath::parse("trade.missingField").unwrap();
        assert_eq!(
            path.resolve(&args()),
            Err(PathError::SegmentNotFound {
                path: "trade.missingField".to_owned(),
                segment: "missingField".to_owned(),
            }),
            "missing member"
        );
    }

    #[test]
    fn descending_into_leaf_is_not_a_container() {
        let path = ArgPath::parse("userAddress.inner").unwrap();
        assert_eq!(
            path.resolve(&args()),
            Err(PathError::NotAContainer {
                path: "userAddress.inner".to_owned(),
                segment: "inner".to_owned(),
            }),
            "leaf"
        );
    }

    #[test]
    fn rejects_empty_segments() {
        for text in ["", ".", "trade.", ".trade", "trade..amount"] {
            assert_eq!(
                ArgPath::parse(text),
                Err(PathError::Malformed(text.to_owned())),
                "{text:?}"
            );
        }
    }

    #[test]
    fn displays_dotted() {
        let path = ArgPath::parse("trade.amount").unwrap();
        assert_eq!(path.to_string(), "trade.amount", "display");
        assert_eq!(path.segments().len(), 2, "segments");
    }
}
