//! Options that let specific errors skip annotation

use std::fmt;
use std::sync::Arc;

use crate::sentinel::{eof, same, unexpected_eof, SharedError};

type BypassFn = dyn Fn(Option<&SharedError>) -> Option<SharedError> + Send + Sync;

/// A hook that runs before a builder creates a [`Checkpoint`](crate::Checkpoint).
///
/// It receives the error that is about to be annotated. Returning `Some`
/// replaces the whole result of the builder and no node gets created;
/// returning `None` lets the normal annotation happen.
///
/// Builders evaluate their options in order and stop at the first `Some`.
#[derive(Clone)]
pub struct Bypass(Arc<BypassFn>);

impl Bypass {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<&SharedError>) -> Option<SharedError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn apply(&self, err: Option<&SharedError>) -> Option<SharedError> {
        (self.0)(err)
    }
}

impl fmt::Debug for Bypass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Bypass(..)")
    }
}

/// Runs the options in order and returns the first override.
pub(crate) fn first_override(options: &[Bypass], err: Option<&SharedError>) -> Option<SharedError> {
    options.iter().find_map(|o| o.apply(err))
}

/// Return either of two sentinels unchanged instead of annotating them.
///
/// Matching is by identity, a different error with the same message is
/// annotated as usual.
pub fn ignore_sentinels(a: SharedError, b: SharedError) -> Bypass {
    ignore_any([a, b])
}

/// Return any of the given sentinels unchanged instead of annotating them.
pub fn ignore_any<I>(sentinels: I) -> Bypass
where
    I: IntoIterator<Item = SharedError>,
{
    let sentinels: Vec<SharedError> = sentinels.into_iter().collect();
    Bypass::new(move |err| {
        let err = err?;
        sentinels
            .iter()
            .find(|s| same(&***s, &**err))
            .map(Arc::clone)
    })
}

/// Return [`eof()`] and [`unexpected_eof()`] unchanged.
///
/// Readers usually signal the end of a stream with these sentinels and
/// their callers compare against them directly rather than walking the
/// chain, so they must not be hidden inside a node.
pub fn ignore_eof() -> Bypass {
    ignore_sentinels(eof(), unexpected_eof())
}
