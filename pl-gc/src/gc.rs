use std::fmt;
use std::num::NonZeroU32;

use crate::trace::{Trace, Tracer};

/// Represent a handle to a GC-allocated value.
///
/// A handle is the index of a heap slot paired with the generation that slot had when the value
/// was allocated, so a handle to a swept value never resolves to whatever reuses its slot.
/// Handles are ordered by slot, which plays the role of the address in the heap's sorted tables.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gc {
    /// The slot index, offset by one.
    index: NonZeroU32,
    generation: u32,
}

impl Gc {
    #[inline]
    pub(crate) fn new(slot: u32, generation: u32) -> Self {
        let index = NonZeroU32::new(slot.wrapping_add(1)).unwrap_or(NonZeroU32::MIN);
        Self { index, generation }
    }

    /// The index of the slot this handle points to.
    #[inline]
    pub fn slot(self) -> usize {
        (self.index.get() - 1) as usize
    }

    /// The generation of the slot this handle was issued for.
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }

    #[inline]
    pub fn ptr_eq(self, other: Self) -> bool {
        self == other
    }
}

impl fmt::Debug for Gc {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gc(#{}@{})", self.slot(), self.generation)
    }
}

impl fmt::Display for Gc {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{:#06x}:{}>", self.slot(), self.generation)
    }
}

impl Trace for Gc {
    #[inline]
    fn trace(&self, tracer: &mut Tracer) {
        tracer.visit(*self);
    }
}
