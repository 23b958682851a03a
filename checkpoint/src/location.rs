//! Caller location capture

use std::fmt;
use std::panic::Location;

/// Where a [`Checkpoint`](crate::Checkpoint) was created.
///
/// `file` only holds the base name of the source file, directories are
/// stripped. `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Site {
    file: String,
    line: u32,
}

impl Site {
    /// Create a site from a file path and a line number
    pub fn new(file: impl AsRef<str>, line: u32) -> Self {
        Self {
            file: base_name(file.as_ref()).to_string(),
            line,
        }
    }

    /// Build a site from a location reported by `#[track_caller]`
    pub fn from_caller(caller: &Location<'_>) -> Self {
        Self::new(caller.file(), caller.line())
    }

    /// Base name of the source file
    pub fn file(&self) -> &str {
        &self.file
    }

    /// 1-based line number
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

fn base_name(path: &str) -> &str {
    // Paths from `Location::file` use the separator of the host that compiled them.
    let trimmed = path.trim_end_matches(['/', '\\']);
    trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed)
}

/// Resolves the location a builder was called from.
///
/// Builders hand over the location the compiler tracked for their caller.
/// Implementations decide what ends up in the node: returning `None` marks
/// the location as unknown and the node renders as `File: unknown`.
pub trait Locate: Send + Sync {
    fn locate(&self, caller: &'static Location<'static>) -> Option<Site>;
}

/// Reports the immediate caller of the builder. This is the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallerSite;

impl Locate for CallerSite {
    fn locate(&self, caller: &'static Location<'static>) -> Option<Site> {
        Some(Site::from_caller(caller))
    }
}

/// Never knows where it was called from.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSite;

impl Locate for NoSite {
    fn locate(&self, _caller: &'static Location<'static>) -> Option<Site> {
        None
    }
}

/// A fixed site always reports itself, regardless of the real caller.
impl Locate for Site {
    fn locate(&self, _caller: &'static Location<'static>) -> Option<Site> {
        Some(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name_strips_directories() {
        assert_eq!(Site::new("src/deep/nested/x.rs", 3).file(), "x.rs");
        assert_eq!(Site::new("C:\\work\\src\\y.rs", 3).file(), "y.rs");
        assert_eq!(Site::new("plain.rs", 3).file(), "plain.rs");
    }

    #[test]
    fn test_caller_site() {
        let here = Location::caller();
        let site = CallerSite.locate(here).unwrap();
        assert_eq!(site.file(), "location.rs");
        assert_eq!(site.line(), here.line());
    }

    #[test]
    fn test_no_site() {
        assert!(NoSite.locate(Location::caller()).is_none());
    }

    #[test]
    fn test_fixed_site() {
        let fixed = Site::new("x.go", 10);
        assert_eq!(fixed.locate(Location::caller()), Some(Site::new("x.go", 10)));
        assert_eq!(fixed.to_string(), "x.go:10");
    }
}
