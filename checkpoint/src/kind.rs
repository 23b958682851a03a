//! Kinds of links in an error chain

use std::error::Error as StdError;
use std::fmt;

use crate::error::Checkpoint;

/// What a single link of an error chain is.
///
/// The chain has no other taxonomy: a link either carries a location
/// (a [`Checkpoint`]) or it does not (any other error). An absent link is
/// the end of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// An annotated node with an optional site
    Checkpoint,

    /// Any error that is not a checkpoint
    Foreign,
}

impl LinkKind {
    /// Returns the link kind as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::Checkpoint => "checkpoint",
            LinkKind::Foreign => "foreign",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One step of a walk along `source()`.
#[derive(Debug, Clone, Copy)]
pub enum Link<'a> {
    Checkpoint(&'a Checkpoint),
    Foreign(&'a (dyn StdError + 'static)),
}

impl<'a> Link<'a> {
    pub(crate) fn of(err: &'a (dyn StdError + 'static)) -> Self {
        match err.downcast_ref::<Checkpoint>() {
            Some(cp) => Link::Checkpoint(cp),
            None => Link::Foreign(err),
        }
    }

    pub fn kind(&self) -> LinkKind {
        match self {
            Link::Checkpoint(_) => LinkKind::Checkpoint,
            Link::Foreign(_) => LinkKind::Foreign,
        }
    }

    /// The link as a plain error
    pub fn as_error(&self) -> &'a (dyn StdError + 'static) {
        match *self {
            Link::Checkpoint(cp) => cp as &(dyn StdError + 'static),
            Link::Foreign(err) => err,
        }
    }

    /// The text this link contributes on its own: the annotation of a
    /// checkpoint or the message of a foreign error.
    pub fn message(&self) -> String {
        match self {
            Link::Checkpoint(cp) => cp
                .annotation()
                .map(|a| a.to_string())
                .unwrap_or_default(),
            Link::Foreign(err) => err.to_string(),
        }
    }
}
