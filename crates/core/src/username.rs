//! `Username` value object.

use crate::{DomainError, DomainResult, ValueObject};

/// A requested username.
///
/// # Invariants
/// - Never blank: at least one non-whitespace character.
/// - Stored without leading/trailing whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn parse(raw: impl AsRef<str>) -> DomainResult<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("username should not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Username {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let name = Username::parse("  alice \n").unwrap();
        assert_eq!(name.as_str(), "alice");
    }

    #[test]
    fn parse_rejects_blank() {
        for raw in ["", "   ", "\t\n"] {
            let err = Username::parse(raw).unwrap_err();
            assert_eq!(err.reason(), "username should not be empty");
        }
    }

    proptest! {
        /// Property: any string with a non-whitespace character parses, and
        /// parsing is idempotent.
        #[test]
        fn parse_is_idempotent(raw in "\\s{0,3}[a-zA-Z0-9_.-]{1,32}\\s{0,3}") {
            let first = Username::parse(&raw).unwrap();
            let second = Username::parse(first.as_str()).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
