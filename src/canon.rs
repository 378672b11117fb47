//! Identifier canonicalization.
//!
//! Warehouses fold unquoted identifiers to a fixed case. A [`NamingCanon`]
//! maps bare identifiers into that case so descriptor names and observed
//! names can be compared.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::error::NamingError;

#[allow(clippy::unwrap_used)]
static BARE_IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Returns true if `name` needs no quoting in SQL.
#[must_use]
pub fn is_bare_identifier(name: &str) -> bool {
    BARE_IDENTIFIER_RE.is_match(name)
}

/// Case-folding strategy matching a warehouse dialect.
pub trait NamingCanon: fmt::Debug {
    /// Applies the case transform to a name known to be canonizable.
    fn fold(&self, name: &str) -> String;

    /// Returns true if `name` is a bare identifier that may be folded.
    fn can_canonize(&self, name: &str) -> bool {
        is_bare_identifier(name)
    }

    /// Folds `name` into canonical case.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not a bare identifier.
    fn canonize(&self, name: &str) -> Result<String, NamingError> {
        if !self.can_canonize(name) {
            return Err(NamingError::NotCanonizable {
                name: name.to_string(),
            });
        }
        Ok(self.fold(name))
    }
}

/// Folds identifiers to upper case (Snowflake, Oracle).
#[derive(Debug, Clone, Copy, Default)]
pub struct UppercaseCanon;

impl NamingCanon for UppercaseCanon {
    fn fold(&self, name: &str) -> String {
        name.to_ascii_uppercase()
    }
}

/// Folds identifiers to lower case (Postgres, DuckDB).
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseCanon;

impl NamingCanon for LowercaseCanon {
    fn fold(&self, name: &str) -> String {
        name.to_ascii_lowercase()
    }
}

/// Selectable canon, as named in configuration and on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CanonKind {
    /// [`UppercaseCanon`].
    #[default]
    Upper,
    /// [`LowercaseCanon`].
    Lower,
}

impl CanonKind {
    /// Instantiates the selected canon.
    #[must_use]
    pub fn build(self) -> Box<dyn NamingCanon> {
        match self {
            Self::Upper => Box::new(UppercaseCanon),
            Self::Lower => Box::new(LowercaseCanon),
        }
    }
}

impl fmt::Display for CanonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upper => f.write_str("upper"),
            Self::Lower => f.write_str("lower"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uppercase_canon() {
        let canon = UppercaseCanon;
        for (input, expected) in [
            ("NAME", "NAME"),
            ("name", "NAME"),
            ("Name", "NAME"),
            ("NaMe", "NAME"),
            ("_name", "_NAME"),
            ("_na_me", "_NA_ME"),
            ("_nam3", "_NAM3"),
            ("nAm3", "NAM3"),
        ] {
            assert_eq!(canon.canonize(input).as_deref(), Ok(expected));
        }
    }

    #[test]
    fn test_lowercase_canon() {
        let canon = LowercaseCanon;
        for (input, expected) in [
            ("name", "name"),
            ("NAME", "name"),
            ("Name", "name"),
            ("NaMe", "name"),
            ("_name", "_name"),
            ("_na_me", "_na_me"),
            ("_nam3", "_nam3"),
            ("nAm3", "nam3"),
        ] {
            assert_eq!(canon.canonize(input).as_deref(), Ok(expected));
        }
    }

    #[test]
    fn test_non_canonizable() {
        for name in ["na me", "_na me", "Na me", "_Na me", "3name", "", "naïve", "a-b"] {
            assert!(UppercaseCanon.canonize(name).is_err(), "{name}");
            assert!(LowercaseCanon.canonize(name).is_err(), "{name}");
            assert!(!is_bare_identifier(name), "{name}");
        }
    }

    #[test]
    fn test_canonize_is_fixed_point() {
        let canons: [&dyn NamingCanon; 2] = [&UppercaseCanon, &LowercaseCanon];
        for canon in canons {
            for name in ["id", "ID", "Birth_Date", "_x9", "a"] {
                let once = canon.canonize(name).expect("canonizable");
                let twice = canon.canonize(&once).expect("canonizable");
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn test_canon_kind_build() {
        assert_eq!(CanonKind::Upper.build().fold("id"), "ID");
        assert_eq!(CanonKind::Lower.build().fold("ID"), "id");
    }
}
