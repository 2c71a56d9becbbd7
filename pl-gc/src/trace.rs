use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::gc::Gc;

/// Collects the outgoing edges of the values visited during a reachability pass.
#[derive(Debug, Default)]
pub struct Tracer {
    edges: Vec<Gc>,
}

impl Tracer {
    /// Creates an empty tracer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an edge to the given value.
    #[inline]
    pub fn visit(&mut self, gc: Gc) {
        self.edges.push(gc);
    }

    /// The edges recorded so far, in visiting order.
    pub fn edges(&self) -> &[Gc] {
        &self.edges
    }

    pub(crate) fn take(&mut self) -> std::vec::Drain<'_, Gc> {
        self.edges.drain(..)
    }
}

/// Values that may hold references to other GC-allocated values.
pub trait Trace {
    /// Reports every handle held by this value to the tracer.
    fn trace(&self, tracer: &mut Tracer);
}

/// The footprint of a GC-allocated value, as shown in heap reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    /// A short name for the kind of value.
    pub kind: &'static str,
    /// The number of elements in use.
    pub length: usize,
    /// The size (in bytes) of a single element.
    pub element_size: usize,
    /// The size (in bytes) of the out-of-line storage owned by the value.
    pub bytes: usize,
}

/// Values the heap can account for.
pub trait Measure {
    fn measure(&self) -> Measurement;
}

macro_rules! trivial_trace {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::trace::Trace for $ty {
                #[inline]
                fn trace(&self, _: &mut $crate::trace::Tracer) {}
            }
        )*
    };
}

trivial_trace![
    (),
    bool,
    isize,
    usize,
    i8,
    u8,
    i16,
    u16,
    i32,
    u32,
    i64,
    u64,
    f32,
    f64,
    char,
    String,
    Box<str>,
    Rc<str>,
];

macro_rules! iter_1_trace {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<T: $crate::trace::Trace> $crate::trace::Trace for $ty {
                #[inline]
                fn trace(&self, tracer: &mut $crate::trace::Tracer) {
                    for it in self.iter() {
                        it.trace(tracer);
                    }
                }
            }
        )*
    };
}

iter_1_trace!(Vec<T>, VecDeque<T>, [T]);

impl<T: Trace + ?Sized> Trace for &T {
    #[inline]
    fn trace(&self, tracer: &mut Tracer) {
        (**self).trace(tracer);
    }
}

impl<T: Trace + ?Sized> Trace for Box<T> {
    #[inline]
    fn trace(&self, tracer: &mut Tracer) {
        (**self).trace(tracer);
    }
}

impl<T: Trace> Trace for RefCell<T> {
    #[inline]
    fn trace(&self, tracer: &mut Tracer) {
        self.borrow().trace(tracer);
    }
}

impl<T: Trace> Trace for Option<T> {
    #[inline]
    fn trace(&self, tracer: &mut Tracer) {
        if let Some(value) = self {
            value.trace(tracer);
        }
    }
}
