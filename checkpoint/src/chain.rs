//! Walking error chains
//!
//! These functions follow `source()` from link to link. Whenever they pass a
//! [`Checkpoint`] they also look into its annotation, so the descriptive
//! error attached at a checkpoint is found as well as every cause below it.
//!
//! The walk assumes the chain ends. A chain that loops back onto itself can
//! only be built by hand and is not supported.

use std::error::Error as StdError;
use std::iter::FusedIterator;

use crate::error::Checkpoint;
use crate::kind::Link;
use crate::sentinel::{same, SharedError};

/// Whether `target` is `err` or part of its chain, compared by identity.
pub fn is(err: &(dyn StdError + 'static), target: &(dyn StdError + 'static)) -> bool {
    let target = unshare(target);
    let mut current = Some(err);
    while let Some(e) = current {
        let e = unshare(e);
        if same(e, target) {
            return true;
        }
        if let Some(cp) = e.downcast_ref::<Checkpoint>() {
            if cp.is(target) {
                return true;
            }
        }
        current = e.source();
    }
    false
}

/// The first error of type `T` in the chain of `err`.
pub fn find<'a, T: StdError + 'static>(err: &'a (dyn StdError + 'static)) -> Option<&'a T> {
    let mut current = Some(err);
    while let Some(e) = current {
        let e = unshare(e);
        if let Some(found) = e.downcast_ref::<T>() {
            return Some(found);
        }
        if let Some(found) = e.downcast_ref::<Checkpoint>().and_then(Checkpoint::find::<T>) {
            return Some(found);
        }
        current = e.source();
    }
    None
}

/// Iterate over `err` and its sources, newest first.
///
/// Annotations are not visited, only the links themselves.
pub fn links<'a>(err: &'a (dyn StdError + 'static)) -> Links<'a> {
    Links { next: Some(err) }
}

/// The last link of the chain.
pub fn root_cause<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    let mut current = unshare(err);
    while let Some(source) = current.source() {
        current = unshare(source);
    }
    current
}

/// Number of links in the chain, `err` included.
pub fn depth(err: &(dyn StdError + 'static)) -> usize {
    links(err).count()
}

/// The error behind a [`SharedError`] handle.
///
/// A foreign error that keeps a `SharedError` field and returns it from
/// `source()` hands out the `Arc`, not the allocation it points to. The
/// `Arc` forwards `source()` to its content, so walking on from it would
/// skip the content itself.
fn unshare<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    err.downcast_ref::<SharedError>()
        .map_or(err, |shared| &**shared as &(dyn StdError + 'static))
}

/// Iterator returned by [`links`].
#[derive(Debug, Clone)]
pub struct Links<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Iterator for Links<'a> {
    type Item = Link<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = unshare(self.next?);
        self.next = current.source();
        Some(Link::of(current))
    }
}

impl FusedIterator for Links<'_> {}
