use std::slice;

use pl_core::capacity;
use pl_core::error::{ErrorKind, Result};

use crate::gc::Gc;

/// A set of handles kept sorted, so that lookups, insertions and removals locate their position
/// by binary search.
///
/// Growth follows the buffer growth policy of [`capacity::grow`] and is fallible: an insertion
/// that cannot reserve room leaves the table untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefTable {
    entries: Vec<Gc>,
}

impl RefTable {
    /// Creates an empty table able to hold `capacity` handles.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut entries = Vec::new();
        reserve_exact(&mut entries, capacity)?;
        Ok(Self { entries })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Gc] {
        &self.entries
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, Gc> {
        self.entries.iter()
    }

    /// Returns the position of the handle, if present.
    #[inline]
    pub fn find(&self, gc: Gc) -> Option<usize> {
        self.entries.binary_search(&gc).ok()
    }

    #[inline]
    pub fn contains(&self, gc: Gc) -> bool {
        self.find(gc).is_some()
    }

    /// Makes room for at least `capacity` handles.
    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        if capacity <= self.entries.capacity() {
            return Ok(());
        }
        let target = capacity::grow(self.entries.capacity(), capacity)?;
        reserve_exact(&mut self.entries, target)
    }

    /// Inserts the handle at its sorted position. Returns `false` if it was already present.
    pub fn record(&mut self, gc: Gc) -> Result<bool> {
        match self.entries.binary_search(&gc) {
            Ok(_) => Ok(false),
            Err(position) => {
                self.reserve(self.entries.len() + 1)?;
                self.entries.insert(position, gc);
                Ok(true)
            }
        }
    }

    /// Inserts every handle, or none of them if room cannot be made.
    pub fn record_all(&mut self, handles: &[Gc]) -> Result<usize> {
        self.reserve(self.entries.len().saturating_add(handles.len()))?;
        let mut inserted = 0;
        for gc in handles {
            if self.record(*gc)? {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    /// Removes the handle. Returns `false` if it was not present.
    pub fn untrack(&mut self, gc: Gc) -> bool {
        match self.entries.binary_search(&gc) {
            Ok(position) => {
                self.entries.remove(position);
                true
            }
            Err(_) => false,
        }
    }

    /// Keeps only the handles for which the predicate holds.
    pub fn retain(&mut self, mut keep: impl FnMut(Gc) -> bool) {
        self.entries.retain(|gc| keep(*gc));
    }

    /// Replaces the contents of this table with those of `other`.
    pub fn copy_from(&mut self, other: &RefTable) -> Result<()> {
        self.reserve(other.len().max(1))?;
        self.entries.clear();
        self.entries.extend_from_slice(&other.entries);
        Ok(())
    }

    /// Shrinks the storage down to the current length (but never below one slot).
    ///
    /// On failure the table keeps its current storage and contents.
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        let target = self.entries.len().max(1);
        if self.entries.capacity() == target {
            return Ok(());
        }
        let mut entries = Vec::new();
        reserve_exact(&mut entries, target)?;
        entries.extend_from_slice(&self.entries);
        self.entries = entries;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Grows the vector to hold at least `capacity` elements, reporting failures as errors.
pub(crate) fn reserve_exact(entries: &mut Vec<Gc>, capacity: usize) -> Result<()> {
    capacity::check(capacity)?;
    let additional = capacity.saturating_sub(entries.len());
    if entries.try_reserve_exact(additional).is_err() {
        pl_core::throw!(
            ErrorKind::AllocFailed,
            "Failed to allocate a table of capacity [{}]!",
            capacity
        );
    }
    Ok(())
}
