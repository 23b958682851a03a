//! # checkpoint
//!
//! Annotated error chains - something close to a stack trace, built by hand
//! at the places that handle errors.
//!
//! ## Design Philosophy
//!
//! - **Checkpoint**: one immutable node holding an annotation, a cause and
//!   the file and line it was created at
//! - **from / wrap**: the only ways to build a node, both record the caller
//! - **Bypass**: options that let special errors (like [`eof()`]) skip
//!   annotation entirely
//! - **chain**: membership and typed lookups that see every annotation and
//!   every cause
//!
//! ## Usage
//!
//! ```rust
//! use checkpoint::{chain, DefinedError, SharedError};
//!
//! fn read_config() -> Option<SharedError> {
//!     let io = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml");
//!     checkpoint::from(Some(checkpoint::shared(io)), &[])
//! }
//!
//! let config_missing = DefinedError::shared("no usable configuration");
//! let err = checkpoint::wrap(read_config(), Some(config_missing.clone()), &[]).unwrap();
//!
//! assert!(chain::is(&*err, &*config_missing));
//! assert!(chain::find::<std::io::Error>(&*err).is_some());
//! println!("{err}");
//! ```
//!
//! The trace lists the newest checkpoint first:
//!
//! ```text
//! File: main.rs:27
//!     no usable configuration
//! File: main.rs:22
//!     config.toml
//! ```
//!
//! ## Principles
//!
//! - Building a checkpoint never fails and never panics
//! - `None` in gives `None` out, nothing gets wrapped
//! - Identity is the identity of the shared allocation
//! - The library does no I/O; printing the trace is up to the caller

pub mod chain;
mod builder;
mod error;
mod ext;
mod kind;
mod location;
mod option;
mod sentinel;

pub use builder::{from, wrap, Annotator};
pub use error::Checkpoint;
pub use ext::ResultExt;
pub use kind::{Link, LinkKind};
pub use location::{CallerSite, Locate, NoSite, Site};
pub use option::{ignore_any, ignore_eof, ignore_sentinels, Bypass};
pub use sentinel::{eof, same, shared, unexpected_eof, DefinedError, SharedError};

/// Result type whose error may be a checkpoint chain
pub type Result<T> = std::result::Result<T, SharedError>;
