//!
//! This is the object model of the runtime.
//!
//! Every value is an [`Object`]: a growable vector of a single [`Class`] of elements, optionally
//! carrying an attribute table. Objects live in the collector's heap and are manipulated through
//! a [`Runtime`], which owns that heap together with the call backtrace.
//!

/// Named attributes attached to objects.
pub mod attribute;
/// Elementwise comparisons.
pub mod compare;
/// Conversions between primitive classes.
pub mod convert;
/// Rendering objects as text.
pub mod display;
/// Element types and their missing sentinels.
pub mod element;
/// Operations taking objects as control parameters.
pub mod generic;
/// The object representation.
pub mod object;
/// The runtime session.
pub mod runtime;
/// Frame-scoped variable bindings.
pub mod variables;
/// Primitive vector operations.
pub mod vector;

pub use crate::element::{Element, CHAR_NA, DOUBLE_NA, INT_NA, LONG_NA};
pub use crate::object::{Data, External, Object};
pub use crate::runtime::Runtime;
pub use crate::variables::Variables;

pub use pl_core::{Class, Error, ErrorKind, Result};
pub use pl_gc::{Collection, Gc, GcParams, Report};
