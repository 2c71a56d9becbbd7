//!
//! This crate contains the pieces shared by every other crate of the runtime:
//! the error taxonomy and its exception scopes, the call backtrace, the class registry
//! and the capacity arithmetic of object buffers.
//!

/// The call backtrace.
pub mod backtrace;
/// Capacity limits and the growth policy of object buffers.
pub mod capacity;
/// The static class registry.
pub mod class;
/// The error type and the macros used to raise errors.
pub mod error;
/// Exception scopes built on top of `Result`.
pub mod exception;

pub use crate::backtrace::{Backtrace, Frame};
pub use crate::class::Class;
pub use crate::error::{Error, ErrorKind, Location, Result};
