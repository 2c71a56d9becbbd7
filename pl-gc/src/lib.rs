//!
//! A stop-the-world mark-and-sweep collector.
//!
//! Values live in the slots of a [`GcHeap`] and are referred to through copyable [`Gc`] handles.
//! The heap tracks every value it allocated in a sorted table, keeps a separate sorted table of
//! roots, and frees everything that is not reachable from those roots when it is asked to.
//!

mod gc;
mod gc_box;
mod heap;
mod table;
mod trace;

pub use crate::gc::Gc;
pub use crate::heap::{Collection, GcHeap, GcParams, GcStats, Report, ReportRow};
pub use crate::table::RefTable;
pub use crate::trace::{Measure, Measurement, Trace, Tracer};
