//! Checkpoints for `Result`s

use std::panic::Location;

use crate::builder::build;
use crate::location::CallerSite;
use crate::option::{first_override, Bypass};
use crate::sentinel::SharedError;

/// Annotate the error side of a `Result` where it passes through.
///
/// Errors of other types go through [`shared`](crate::shared) first:
///
/// ```rust
/// use checkpoint::{shared, ResultExt, SharedError};
///
/// fn parse(input: &str) -> Result<u16, SharedError> {
///     input.parse::<u16>().map_err(shared).checkpoint()
/// }
///
/// let err = parse("port").unwrap_err();
/// assert!(err.to_string().starts_with("File: "));
/// ```
pub trait ResultExt<T> {
    /// Annotate the error with the caller's location
    fn checkpoint(self) -> Result<T, SharedError>;

    /// Like [`checkpoint`](Self::checkpoint), unless one of the options takes over
    fn checkpoint_with(self, options: &[Bypass]) -> Result<T, SharedError>;

    /// Put a checkpoint described by `err` on top of the error
    fn wrap_err(self, err: SharedError) -> Result<T, SharedError>;
}

impl<T> ResultExt<T> for Result<T, SharedError> {
    #[track_caller]
    fn checkpoint(self) -> Result<T, SharedError> {
        let caller = Location::caller();
        self.map_err(|e| build(&CallerSite, caller, None, Some(e)))
    }

    #[track_caller]
    fn checkpoint_with(self, options: &[Bypass]) -> Result<T, SharedError> {
        // Closures do not inherit the tracked location.
        let caller = Location::caller();
        self.map_err(|e| match first_override(options, Some(&e)) {
            Some(replacement) => replacement,
            None => build(&CallerSite, caller, None, Some(e)),
        })
    }

    #[track_caller]
    fn wrap_err(self, err: SharedError) -> Result<T, SharedError> {
        let caller = Location::caller();
        self.map_err(|e| build(&CallerSite, caller, Some(e), Some(err)))
    }
}
