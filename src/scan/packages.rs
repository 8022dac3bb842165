//! Package list handed to the scanner (`--pkg` values).

use std::fmt;
use std::path::{Path, PathBuf};

/// Packages scanned when no `--pkg` is given.
pub const DEFAULT_PACKAGES: &[&str] = &["std/src"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackageError {
    #[error("(empty)")]
    Empty,
    #[error("package name: {0:?}")]
    Invalid(String),
    #[error("duplicate name: {0:?}")]
    Duplicate(String),
}

/// Ordered, duplicate-free package paths relative to a source root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageList(Vec<String>);

impl PackageList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defaults() -> Self {
        Self(DEFAULT_PACKAGES.iter().map(|s| s.to_string()).collect())
    }

    /// Build from raw values, failing on the first invalid one.
    pub fn from_values<I, S>(values: I) -> Result<Self, PackageError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for v in values {
            list.push(v.as_ref())?;
        }
        Ok(list)
    }

    /// Validate and append one package path. Only letters, digits and `/`
    /// are accepted.
    pub fn push(&mut self, value: &str) -> Result<(), PackageError> {
        validate(value)?;
        if self.0.iter().any(|k| k == value) {
            return Err(PackageError::Duplicate(value.to_string()));
        }
        self.0.push(value.to_string());
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Each package joined onto `root`, in list order.
    pub fn with_prefix(&self, root: &Path) -> Vec<PathBuf> {
        self.0.iter().map(|p| root.join(p)).collect()
    }
}

/// Single-value check, usable as a clap value parser.
pub fn validate(value: &str) -> Result<(), PackageError> {
    if value.trim().is_empty() {
        return Err(PackageError::Empty);
    }
    let valid = value
        .chars()
        .all(|c| c.is_alphabetic() || c.is_numeric() || c == '/');
    if !valid {
        return Err(PackageError::Invalid(value.to_string()));
    }
    Ok(())
}

impl fmt::Display for PackageList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: Vec<String> = self.0.iter().map(|s| format!("{s:?}")).collect();
        write!(f, "[{}]", quoted.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_nested_paths() {
        let list = PackageList::from_values(["std/src", "core/src/str"]).unwrap();
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["std/src", "core/src/str"]);
    }

    #[test]
    fn rejects_empty_and_blank() {
        assert_eq!(validate(""), Err(PackageError::Empty));
        assert_eq!(validate("   "), Err(PackageError::Empty));
    }

    #[test]
    fn rejects_punctuation() {
        assert_eq!(
            validate("../etc"),
            Err(PackageError::Invalid("../etc".into()))
        );
        assert!(validate("std-src").is_err());
        assert!(validate("std src").is_err());
    }

    #[test]
    fn rejects_duplicates() {
        let err = PackageList::from_values(["a", "b", "a"]).unwrap_err();
        assert_eq!(err, PackageError::Duplicate("a".into()));
        assert_eq!(err.to_string(), "duplicate name: \"a\"");
    }

    #[test]
    fn prefix_join() {
        let list = PackageList::from_values(["x/y"]).unwrap();
        assert_eq!(
            list.with_prefix(Path::new("/root")),
            vec![PathBuf::from("/root/x/y")]
        );
    }

    #[test]
    fn display_quotes_entries() {
        let list = PackageList::from_values(["a", "b/c"]).unwrap();
        assert_eq!(list.to_string(), "[\"a\", \"b/c\"]");
    }
}
