/// Represents a heap slot, as it is stored within the GC.
pub(crate) struct GcBox<T> {
    /// Bumped every time the slot is released, invalidating the handles issued for it.
    generation: u32,
    value: Option<T>,
}

impl<T> GcBox<T> {
    /// Creates an empty slot.
    pub fn vacant() -> Self {
        Self {
            generation: 0,
            value: None,
        }
    }

    /// Stores a value in this (vacant) slot, returning the generation to issue handles for.
    pub fn occupy(&mut self, value: T) -> u32 {
        debug_assert!(self.value.is_none());
        self.value = Some(value);
        self.generation
    }

    /// Takes the value out of this slot, invalidating every handle issued for it.
    pub fn release(&mut self) -> Option<T> {
        let value = self.value.take();
        if value.is_some() {
            self.generation = self.generation.wrapping_add(1);
        }
        value
    }

    /// Returns the value, if the slot still holds the given generation.
    pub fn get(&self, generation: u32) -> Option<&T> {
        self.value.as_ref().filter(|_| self.generation == generation)
    }

    /// Returns the value mutably, if the slot still holds the given generation.
    pub fn get_mut(&mut self, generation: u32) -> Option<&mut T> {
        if self.generation == generation {
            self.value.as_mut()
        } else {
            None
        }
    }
}
