//! The Checkpoint node

use std::error::Error as StdError;
use std::fmt;

use crate::chain;
use crate::location::Site;
use crate::sentinel::SharedError;

/// One link of an annotated error chain.
///
/// A checkpoint holds:
/// - `annotation`: the error supplied where the checkpoint was created
/// - `cause`: the error that was being handled at that point (if any)
/// - `site`: the file and line it was created at (if known)
///
/// Both the annotation and everything behind the cause stay discoverable:
/// [`chain::is`] and [`chain::find`] look into the annotation of every
/// checkpoint they pass and then continue with its cause.
///
/// Checkpoints are built by [`from`](crate::from) and [`wrap`](crate::wrap)
/// and never change afterwards.
///
/// # Example
///
/// ```rust
/// use checkpoint::{chain, Checkpoint, DefinedError};
///
/// let disk_full = DefinedError::shared("disk full");
/// let save_failed = DefinedError::shared("saving the report failed");
///
/// let err = checkpoint::from(Some(disk_full.clone()), &[]);
/// let err = checkpoint::wrap(err, Some(save_failed.clone()), &[]).unwrap();
///
/// assert!(chain::is(&*err, &*save_failed));
/// assert!(chain::is(&*err, &*disk_full));
///
/// let head = err.downcast_ref::<Checkpoint>().unwrap();
/// assert!(head.line().is_some());
/// assert!(head.is(&*save_failed));
/// ```
pub struct Checkpoint {
    annotation: Option<SharedError>,
    cause: Option<SharedError>,
    site: Option<Site>,
}

impl Checkpoint {
    pub(crate) fn new(
        annotation: Option<SharedError>,
        cause: Option<SharedError>,
        site: Option<Site>,
    ) -> Self {
        Self {
            annotation,
            cause,
            site,
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// The error this checkpoint annotates
    pub fn annotation(&self) -> Option<&SharedError> {
        self.annotation.as_ref()
    }

    /// The error this checkpoint was built on top of.
    ///
    /// Same as [`StdError::source`], but keeps the shared handle.
    pub fn unwrap(&self) -> Option<&SharedError> {
        self.cause.as_ref()
    }

    /// Where the checkpoint was created, `None` if that could not be determined
    pub fn site(&self) -> Option<&Site> {
        self.site.as_ref()
    }

    /// Base name of the file the checkpoint was created in
    pub fn file(&self) -> Option<&str> {
        self.site.as_ref().map(Site::file)
    }

    /// Line the checkpoint was created at
    pub fn line(&self) -> Option<u32> {
        self.site.as_ref().map(Site::line)
    }

    // =========================================================================
    // Chain membership
    // =========================================================================

    /// Whether the annotation, or anything it wraps, is `target`.
    ///
    /// Only the annotation is searched. The cause is reached through
    /// `source()` by [`chain::is`].
    pub fn is(&self, target: &(dyn StdError + 'static)) -> bool {
        self.annotation
            .as_deref()
            .is_some_and(|annotation| chain::is(annotation, target))
    }

    /// The first error of type `T` inside the annotation.
    ///
    /// Like [`is`](Self::is), this does not look at the cause.
    pub fn find<T: StdError + 'static>(&self) -> Option<&T> {
        self.annotation
            .as_deref()
            .and_then(|annotation| chain::find::<T>(annotation))
    }

    /// The multi-line trace, newest checkpoint first.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

// =============================================================================
// Display - the trace
// =============================================================================

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut node = self;
        loop {
            match &node.site {
                Some(site) => write!(f, "File: {}:{}\n\t", site.file(), site.line())?,
                None => f.write_str("File: unknown\n\t")?,
            }
            if let Some(annotation) = &node.annotation {
                write!(f, "{}", annotation)?;
            }
            f.write_str("\n")?;

            let Some(cause) = &node.cause else {
                return Ok(());
            };
            match cause.downcast_ref::<Checkpoint>() {
                Some(next) => node = next,
                None => {
                    // Errors without location get indented as a whole.
                    let message = cause.to_string().replace('\n', "\n\t");
                    return write!(f, "File: unknown\n\t{}", message);
                }
            }
        }
    }
}

// =============================================================================
// Debug - structure of a single node
// =============================================================================

impl fmt::Debug for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checkpoint")
            .field("annotation", &self.annotation)
            .field("cause", &self.cause)
            .field("site", &self.site)
            .finish()
    }
}

impl StdError for Checkpoint {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentinel::DefinedError;
    use std::sync::Arc;

    fn node(annotation: &str, cause: Option<SharedError>, line: u32) -> Checkpoint {
        Checkpoint::new(
            Some(DefinedError::shared(annotation.to_string())),
            cause,
            Some(Site::new("x.go", line)),
        )
    }

    #[test]
    fn test_render_single() {
        assert_eq!(node("A", None, 10).render(), "File: x.go:10\n\tA\n");
    }

    #[test]
    fn test_render_nested() {
        let inner: SharedError = Arc::new(node("A", None, 10));
        let outer = node("B", Some(inner), 11);
        assert_eq!(outer.render(), "File: x.go:11\n\tB\nFile: x.go:10\n\tA\n");
    }

    #[test]
    fn test_render_unknown_site() {
        let cp = Checkpoint::new(Some(DefinedError::shared("lost")), None, None);
        assert_eq!(cp.render(), "File: unknown\n\tlost\n");
    }

    #[test]
    fn test_render_absent_annotation() {
        let cause = DefinedError::shared("root");
        let cp = Checkpoint::new(None, Some(cause), Some(Site::new("a.rs", 1)));
        assert_eq!(cp.render(), "File: a.rs:1\n\t\nFile: unknown\n\troot");
    }

    #[test]
    fn test_render_foreign_cause_is_indented() {
        let foreign = DefinedError::shared("first line\nsecond line");
        let cp = node("B", Some(foreign), 11);
        assert_eq!(
            cp.render(),
            "File: x.go:11\n\tB\nFile: unknown\n\tfirst line\n\tsecond line"
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let a = node("same", None, 3);
        let b = node("same", None, 3);
        assert_eq!(a.render(), b.render());
        assert_eq!(a.render(), a.render());
    }

    #[test]
    fn test_source_is_cause() {
        let cause = DefinedError::shared("root");
        let cp = node("B", Some(cause.clone()), 1);
        let source = cp.source().unwrap();
        assert!(crate::sentinel::same(source, &*cause));
        assert!(Arc::ptr_eq(cp.unwrap().unwrap(), &cause));
    }

    #[test]
    fn test_is_only_looks_at_annotation() {
        let annotation = DefinedError::shared("annotation");
        let cause = DefinedError::shared("cause");
        let cp = Checkpoint::new(Some(annotation.clone()), Some(cause.clone()), None);
        assert!(cp.is(&*annotation));
        assert!(!cp.is(&*cause));
    }

    #[test]
    fn test_find_in_annotation() {
        let io: SharedError = Arc::new(std::io::Error::new(std::io::ErrorKind::Other, "io"));
        let cp = Checkpoint::new(Some(io), None, None);
        let found = cp.find::<std::io::Error>().unwrap();
        assert_eq!(found.kind(), std::io::ErrorKind::Other);
        assert!(cp.find::<DefinedError>().is_none());
    }

    #[test]
    fn test_accessors() {
        let cp = node("A", None, 42);
        assert_eq!(cp.file(), Some("x.go"));
        assert_eq!(cp.line(), Some(42));
        assert_eq!(cp.site(), Some(&Site::new("x.go", 42)));

        let unknown = Checkpoint::new(None, None, None);
        assert_eq!(unknown.file(), None);
        assert_eq!(unknown.line(), None);
        assert!(unknown.annotation().is_none());
    }
}
