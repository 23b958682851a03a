//! Building checkpoints

use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use crate::error::Checkpoint;
use crate::location::{CallerSite, Locate};
use crate::option::{first_override, Bypass};
use crate::sentinel::SharedError;

/// Annotate `err` with the location of the caller.
///
/// - Options run first, in order. The first one returning `Some` decides
///   the result and no checkpoint is created.
/// - `None` in gives `None` out.
/// - Otherwise a new [`Checkpoint`] without a cause is returned.
#[track_caller]
pub fn from(err: Option<SharedError>, options: &[Bypass]) -> Option<SharedError> {
    annotate_from(options, &CallerSite, Location::caller(), err)
}

/// Put a new checkpoint on top of `cause`, described by `err`.
///
/// `cause` is the error that happened, `err` is what the caller wants to say
/// about it. Both stay reachable through [`chain::is`](crate::chain::is) and
/// [`chain::find`](crate::chain::find).
///
/// - Options run first, in order, against `err` (not `cause`).
/// - `None` as cause gives `None`, whatever `err` is.
/// - `None` as `err` still creates a checkpoint with an empty annotation.
///
/// ```rust
/// use checkpoint::{chain, DefinedError};
///
/// let cause = DefinedError::shared("connection reset");
/// let err = checkpoint::wrap(Some(cause.clone()), None, &[]).unwrap();
/// assert!(chain::is(&*err, &*cause));
///
/// assert!(checkpoint::wrap(None, Some(cause), &[]).is_none());
/// ```
#[track_caller]
pub fn wrap(
    cause: Option<SharedError>,
    err: Option<SharedError>,
    options: &[Bypass],
) -> Option<SharedError> {
    annotate_wrap(options, &CallerSite, Location::caller(), cause, err)
}

fn annotate_from(
    options: &[Bypass],
    locator: &dyn Locate,
    caller: &'static Location<'static>,
    err: Option<SharedError>,
) -> Option<SharedError> {
    if let Some(replacement) = first_override(options, err.as_ref()) {
        return Some(replacement);
    }
    if err.is_none() {
        return None;
    }
    Some(build(locator, caller, None, err))
}

fn annotate_wrap(
    options: &[Bypass],
    locator: &dyn Locate,
    caller: &'static Location<'static>,
    cause: Option<SharedError>,
    err: Option<SharedError>,
) -> Option<SharedError> {
    if let Some(replacement) = first_override(options, err.as_ref()) {
        return Some(replacement);
    }
    // An absent description is fine, an absent cause is not.
    if cause.is_none() {
        return None;
    }
    Some(build(locator, caller, cause, err))
}

/// Create the node. Options and absent inputs are the caller's business.
pub(crate) fn build(
    locator: &dyn Locate,
    caller: &'static Location<'static>,
    cause: Option<SharedError>,
    err: Option<SharedError>,
) -> SharedError {
    let site = locator.locate(caller);
    Arc::new(Checkpoint::new(err, cause, site))
}

/// A reusable set of options and a location source.
///
/// Handy when one module annotates many errors the same way:
///
/// ```rust
/// use checkpoint::{Annotator, NoSite};
///
/// let reader = Annotator::new()
///     .with_option(checkpoint::ignore_eof())
///     .with_locator(NoSite);
///
/// let eof = checkpoint::eof();
/// let passed = reader.from(Some(eof.clone())).unwrap();
/// assert!(std::sync::Arc::ptr_eq(&passed, &eof));
/// ```
#[derive(Clone)]
pub struct Annotator {
    options: Vec<Bypass>,
    locator: Arc<dyn Locate>,
}

impl Annotator {
    /// No options, locations from the caller
    pub fn new() -> Self {
        Self {
            options: Vec::new(),
            locator: Arc::new(CallerSite),
        }
    }

    /// Append an option. Options run in the order they were added.
    pub fn with_option(mut self, option: Bypass) -> Self {
        self.options.push(option);
        self
    }

    /// Replace the location source
    pub fn with_locator(mut self, locator: impl Locate + 'static) -> Self {
        self.locator = Arc::new(locator);
        self
    }

    pub fn options(&self) -> &[Bypass] {
        &self.options
    }

    /// Same as [`from`](crate::from) with this annotator's options and locator
    #[track_caller]
    pub fn from(&self, err: Option<SharedError>) -> Option<SharedError> {
        annotate_from(&self.options, &*self.locator, Location::caller(), err)
    }

    /// Same as [`wrap`](crate::wrap) with this annotator's options and locator
    #[track_caller]
    pub fn wrap(&self, cause: Option<SharedError>, err: Option<SharedError>) -> Option<SharedError> {
        annotate_wrap(&self.options, &*self.locator, Location::caller(), cause, err)
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Annotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotator")
            .field("options", &self.options.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{NoSite, Site};
    use crate::option::ignore_eof;
    use crate::sentinel::{eof, unexpected_eof, DefinedError};

    fn checkpoint_of(err: &SharedError) -> &Checkpoint {
        err.downcast_ref::<Checkpoint>().expect("not a checkpoint")
    }

    #[test]
    fn test_from_captures_caller() {
        let e = DefinedError::shared("A");
        let (out, line) = (from(Some(e.clone()), &[]), line!());
        let out = out.unwrap();
        let cp = checkpoint_of(&out);
        assert_eq!(cp.file(), Some("builder.rs"));
        assert_eq!(cp.line(), Some(line));
        assert!(cp.unwrap().is_none());
        assert!(cp.is(&*e));
    }

    #[test]
    fn test_from_none() {
        assert!(from(None, &[]).is_none());
        assert!(from(None, &[ignore_eof()]).is_none());
    }

    #[test]
    fn test_wrap_none_cause() {
        assert!(wrap(None, Some(DefinedError::shared("B")), &[]).is_none());
        assert!(wrap(None, None, &[]).is_none());
    }

    #[test]
    fn test_wrap_none_err_still_builds() {
        let cause = DefinedError::shared("cause");
        let out = wrap(Some(cause.clone()), None, &[]).unwrap();
        let cp = checkpoint_of(&out);
        assert!(cp.annotation().is_none());
        assert!(Arc::ptr_eq(cp.unwrap().unwrap(), &cause));
    }

    #[test]
    fn test_options_short_circuit() {
        let out = from(Some(eof()), &[ignore_eof()]).unwrap();
        assert!(Arc::ptr_eq(&out, &eof()));

        // Options look at `err`, so a sentinel as cause is still wrapped.
        let out = wrap(Some(eof()), Some(DefinedError::shared("B")), &[ignore_eof()]).unwrap();
        assert!(out.downcast_ref::<Checkpoint>().is_some());

        let out = wrap(None, Some(unexpected_eof()), &[ignore_eof()]).unwrap();
        assert!(Arc::ptr_eq(&out, &unexpected_eof()));
    }

    #[test]
    fn test_option_sees_none() {
        let fallback = DefinedError::shared("fallback");
        let f = fallback.clone();
        let opt = Bypass::new(move |err| match err {
            None => Some(f.clone()),
            Some(_) => None,
        });
        let out = from(None, &[opt]).unwrap();
        assert!(Arc::ptr_eq(&out, &fallback));
    }

    #[test]
    fn test_annotator_locators() {
        let fixed = Annotator::new().with_locator(Site::new("x.go", 10));
        let a = fixed.from(Some(DefinedError::shared("A")));
        let b = fixed.wrap(a, Some(DefinedError::shared("B"))).unwrap();
        assert_eq!(b.to_string(), "File: x.go:10\n\tB\nFile: x.go:10\n\tA\n");

        let blind = Annotator::new().with_locator(NoSite);
        let out = blind.from(Some(DefinedError::shared("A"))).unwrap();
        assert_eq!(out.to_string(), "File: unknown\n\tA\n");
    }

    #[test]
    fn test_annotator_captures_caller() {
        let annotator = Annotator::default();
        let (out, line) = (annotator.from(Some(DefinedError::shared("A"))), line!());
        let out = out.unwrap();
        assert_eq!(checkpoint_of(&out).line(), Some(line));
        assert_eq!(checkpoint_of(&out).file(), Some("builder.rs"));
    }

    #[test]
    fn test_annotator_options_in_order() {
        let annotator = Annotator::new().with_option(ignore_eof());
        assert_eq!(annotator.options().len(), 1);
        let out = annotator.from(Some(eof())).unwrap();
        assert!(Arc::ptr_eq(&out, &eof()));
    }

    #[test]
    fn test_annotator_absent_inputs() {
        let annotator = Annotator::new().with_locator(NoSite);
        assert!(annotator.from(None).is_none());
        assert!(annotator.wrap(None, Some(DefinedError::shared("B"))).is_none());

        let cause = DefinedError::shared("cause");
        let out = annotator.wrap(Some(cause.clone()), None).unwrap();
        assert!(Arc::ptr_eq(checkpoint_of(&out).unwrap().unwrap(), &cause));
        assert_eq!(out.to_string(), "File: unknown\n\t\nFile: unknown\n\tcause");
    }
}
