//! Defined errors and well-known sentinels

use std::borrow::Cow;
use std::error::Error as StdError;
use std::sync::Arc;

use once_cell::sync::Lazy;
use thiserror::Error;

/// A shared, thread-safe handle to any error.
///
/// Identity of an error is the identity of the allocation behind the handle:
/// clones of one `SharedError` are the same error, two errors built from the
/// same message are not.
pub type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

/// A plain error that is nothing but its message.
///
/// Meant to be declared once and compared by identity later:
///
/// ```rust
/// use checkpoint::{chain, DefinedError};
///
/// let not_ready = DefinedError::shared("device not ready");
/// let err = checkpoint::from(Some(not_ready.clone()), &[]).unwrap();
/// assert!(chain::is(&*err, &*not_ready));
/// assert!(!chain::is(&*err, &*DefinedError::shared("device not ready")));
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DefinedError {
    message: Cow<'static, str>,
}

impl DefinedError {
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Create a new error with a fresh identity
    pub fn shared(message: impl Into<Cow<'static, str>>) -> SharedError {
        Arc::new(Self::new(message))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

static EOF: Lazy<SharedError> = Lazy::new(|| DefinedError::shared("EOF"));

static UNEXPECTED_EOF: Lazy<SharedError> =
    Lazy::new(|| DefinedError::shared("unexpected EOF"));

/// The end-of-stream sentinel. Every call returns the same error.
pub fn eof() -> SharedError {
    Arc::clone(&EOF)
}

/// The sentinel for a stream that ended in the middle of a record.
pub fn unexpected_eof() -> SharedError {
    Arc::clone(&UNEXPECTED_EOF)
}

/// Turn any error into a [`SharedError`].
///
/// Accepts everything that converts into a boxed error: concrete error
/// types, `anyhow::Error`, `String` and `&str` messages.
pub fn shared<E>(err: E) -> SharedError
where
    E: Into<Box<dyn StdError + Send + Sync + 'static>>,
{
    Arc::from(err.into())
}

/// Whether two errors are the same allocation.
pub fn same(a: &(dyn StdError + 'static), b: &(dyn StdError + 'static)) -> bool {
    std::ptr::eq(
        a as *const dyn StdError as *const (),
        b as *const dyn StdError as *const (),
    )
}
