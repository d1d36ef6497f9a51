//! Filename validation
//!
//! A stored file is addressed by a single path segment. Anything that could
//! name another directory is refused before the filesystem is touched.

use std::fmt;

/// Parent-directory token
const PARENT_DIR: &str = "..";

/// A validated, non-empty, single-segment file name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Filename(String);

impl Filename {
    /// Validate a candidate name taken from a request path
    ///
    /// Returns `None` for an empty name, a name containing a path separator,
    /// the `..` token anywhere, or a NUL byte.
    ///
    /// # Examples
    /// ```
    /// use yafs::storage::Filename;
    /// assert!(Filename::parse("small.png").is_some());
    /// assert!(Filename::parse("nested/path").is_none());
    /// assert!(Filename::parse("..").is_none());
    /// ```
    pub fn parse(candidate: &str) -> Option<Self> {
        if candidate.is_empty()
            || candidate.contains(PARENT_DIR)
            || candidate.contains('\0')
            || candidate.chars().any(std::path::is_separator)
        {
            return None;
        }
        Some(Self(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Filename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<std::path::Path> for Filename {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names() {
        assert_eq!(Filename::parse("a.txt").unwrap().as_str(), "a.txt");
        assert!(Filename::parse(".hidden").is_some());
        assert!(Filename::parse("with space.md").is_some());
    }

    #[test]
    fn test_rejected_names() {
        assert!(Filename::parse("").is_none());
        assert!(Filename::parse("a/b").is_none());
        assert!(Filename::parse("..").is_none());
        assert!(Filename::parse("a..b").is_none());
        assert!(Filename::parse("nul\0byte").is_none());
    }
}
