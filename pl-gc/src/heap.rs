use std::fmt;
use std::mem;
use std::time::{Duration, Instant};

use pl_core::capacity;
use pl_core::error::{ErrorKind, Result};
use pl_core::exception::try_catch;

use crate::gc::Gc;
use crate::gc_box::GcBox;
use crate::table::{self, RefTable};
use crate::trace::{Measure, Trace, Tracer};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GcStats {
    pub collections_performed: usize,
    pub objects_allocated: usize,
    pub objects_swept: usize,
    pub bytes_allocated: usize,
    pub bytes_swept: usize,
    pub total_time_spent: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GcParams {
    /// The capacity the tracking tables start with.
    pub initial_table_capacity: usize,
    /// The maximum number of bytes tracked values may occupy, if any.
    pub max_bytes: Option<usize>,
}

impl Default for GcParams {
    fn default() -> Self {
        Self {
            initial_table_capacity: 8,
            max_bytes: None,
        }
    }
}

/// The outcome of a single collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Collection {
    /// The number of values that survived.
    pub reachable: usize,
    /// The number of values that were freed.
    pub swept: usize,
    /// The number of bytes that were freed.
    pub bytes_swept: usize,
}

/// The bookkeeping tables, created on first use.
struct Tables {
    /// Every value the heap tracks.
    allocated: RefTable,
    /// The roots.
    directly_reachable: RefTable,
    /// The reachable closure, sorted for membership tests.
    reachable: RefTable,
    /// The reachable closure in discovery order, used as the traversal queue.
    reachable_unordered: Vec<Gc>,
}

impl Tables {
    fn new(capacity: usize) -> Result<Self> {
        let mut reachable_unordered = Vec::new();
        table::reserve_exact(&mut reachable_unordered, capacity)?;
        Ok(Self {
            allocated: RefTable::with_capacity(capacity)?,
            directly_reachable: RefTable::with_capacity(capacity)?,
            reachable: RefTable::with_capacity(capacity)?,
            reachable_unordered,
        })
    }

    /// Computes the closure of the roots, breadth-first.
    ///
    /// A value enters the queue only when it is first added to the sorted closure, so each value
    /// is traced at most once.
    fn update_reachable<T: Trace>(&mut self, slots: &[GcBox<T>]) -> Result<()> {
        let Tables {
            directly_reachable,
            reachable,
            reachable_unordered: queue,
            ..
        } = self;

        reachable.copy_from(directly_reachable)?;
        queue.clear();
        table::reserve_exact(queue, directly_reachable.len().max(1))?;
        queue.extend_from_slice(directly_reachable.as_slice());

        let mut tracer = Tracer::new();
        let mut head = 0;
        while let Some(gc) = queue.get(head).copied() {
            head += 1;
            let Some(value) = lookup(slots, gc) else {
                continue;
            };
            value.trace(&mut tracer);
            for edge in tracer.take() {
                if lookup(slots, edge).is_none() {
                    tracing::warn!(from = ?gc, to = ?edge, "skipping a dangling reference");
                    continue;
                }
                if reachable.record(edge)? {
                    if queue.len() == queue.capacity() {
                        let target = capacity::grow(queue.capacity(), queue.len() + 1)?;
                        table::reserve_exact(queue, target)?;
                    }
                    queue.push(edge);
                }
            }
        }
        Ok(())
    }
}

/// The GC heap itself, which is the storage for all GC-ed values.
pub struct GcHeap<T> {
    stats: GcStats,
    params: GcParams,
    slots: Vec<GcBox<T>>,
    /// Released slots, ready for reuse.
    vacant: Vec<u32>,
    tables: Option<Tables>,
}

fn lookup<T>(slots: &[GcBox<T>], gc: Gc) -> Option<&T> {
    slots.get(gc.slot())?.get(gc.generation())
}

/// The bytes a value accounts for: its inline size plus the storage it owns.
fn footprint<T: Measure>(value: &T) -> usize {
    mem::size_of::<T>().saturating_add(value.measure().bytes)
}

impl<T: Trace + Measure> Default for GcHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Trace + Measure> GcHeap<T> {
    /// Creates a new empty GC heap, with the default parameters.
    pub fn new() -> Self {
        Self::with_params(GcParams::default())
    }

    /// Creates a new empty GC heap, with the specified parameters.
    pub fn with_params(params: GcParams) -> Self {
        Self {
            params,
            stats: GcStats::default(),
            slots: Vec::new(),
            vacant: Vec::new(),
            tables: None,
        }
    }

    /// Returns a reference to the GC's stats.
    pub fn stats(&self) -> &GcStats {
        &self.stats
    }

    /// Returns a reference to the GC's parameters.
    pub fn params(&self) -> &GcParams {
        &self.params
    }

    /// Returns a mutable reference to the GC's parameters.
    pub fn params_mut(&mut self) -> &mut GcParams {
        &mut self.params
    }

    /// Whether the bookkeeping tables are initialized.
    pub fn status(&self) -> bool {
        self.tables.is_some()
    }

    /// The number of values currently tracked.
    pub fn len(&self) -> usize {
        self.tables.as_ref().map_or(0, |tables| tables.allocated.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every tracked value, sorted.
    pub fn tracked(&self) -> &[Gc] {
        self.tables
            .as_ref()
            .map(|tables| tables.allocated.as_slice())
            .unwrap_or_default()
    }

    /// The roots, sorted.
    pub fn roots(&self) -> &[Gc] {
        self.tables
            .as_ref()
            .map(|tables| tables.directly_reachable.as_slice())
            .unwrap_or_default()
    }

    /// Whether the handle is currently a root.
    pub fn is_directly_reachable(&self, gc: Gc) -> bool {
        self.tables
            .as_ref()
            .map_or(false, |tables| tables.directly_reachable.contains(gc))
    }

    /// Whether the handle still resolves to a value.
    pub fn contains(&self, gc: Gc) -> bool {
        lookup(&self.slots, gc).is_some()
    }

    /// Resolves a handle.
    pub fn get(&self, gc: Gc) -> Result<&T> {
        match lookup(&self.slots, gc) {
            Some(value) => Ok(value),
            None => pl_core::throw!(
                ErrorKind::UnexpectedNullPointer,
                "Unexpected reference {:?} to a freed object!",
                gc
            ),
        }
    }

    /// Resolves a handle mutably.
    pub fn get_mut(&mut self, gc: Gc) -> Result<&mut T> {
        match self
            .slots
            .get_mut(gc.slot())
            .and_then(|slot| slot.get_mut(gc.generation()))
        {
            Some(value) => Ok(value),
            None => pl_core::throw!(
                ErrorKind::UnexpectedNullPointer,
                "Unexpected reference {:?} to a freed object!",
                gc
            ),
        }
    }

    /// Checks that `additional` more bytes fit within the configured limit.
    pub fn request(&self, additional: usize) -> Result<()> {
        if let Some(max_bytes) = self.params.max_bytes {
            let total = self.stats.bytes_allocated.saturating_add(additional);
            pl_core::expect!(
                total <= max_bytes,
                ErrorKind::AllocFailed,
                "Failed to allocate [{}] bytes! [{}] of [{}] bytes are in use.",
                additional,
                self.stats.bytes_allocated,
                max_bytes
            );
        }
        Ok(())
    }

    /// Records that a tracked value released `released` bytes of storage and acquired `acquired`.
    pub fn account(&mut self, released: usize, acquired: usize) {
        self.stats.bytes_allocated = self
            .stats
            .bytes_allocated
            .saturating_sub(released)
            .saturating_add(acquired);
    }

    /// Lazily creates the bookkeeping tables.
    fn tables(&mut self) -> Result<&mut Tables> {
        if self.tables.is_none() {
            self.tables = Some(Tables::new(self.params.initial_table_capacity)?);
            tracing::debug!(
                capacity = self.params.initial_table_capacity,
                "initialized the collector"
            );
        }
        match self.tables.as_mut() {
            Some(tables) => Ok(tables),
            None => pl_core::throw!(
                ErrorKind::UnexpectedNullPointer,
                "The collector is not initialized!"
            ),
        }
    }

    /// Stores a value in a free slot.
    fn occupy(&mut self, value: T) -> Result<Gc> {
        if let Some(slot) = self.vacant.pop() {
            let generation = self.slots[slot as usize].occupy(value);
            return Ok(Gc::new(slot, generation));
        }
        let slot = self.slots.len();
        pl_core::expect!(
            slot < u32::MAX as usize,
            ErrorKind::AllocFailed,
            "The heap is out of slots!"
        );
        if self.slots.try_reserve(1).is_err() || self.vacant.try_reserve(slot + 1).is_err() {
            pl_core::throw!(ErrorKind::AllocFailed, "Failed to allocate a heap slot!");
        }
        let mut gc_box = GcBox::vacant();
        let generation = gc_box.occupy(value);
        self.slots.push(gc_box);
        Ok(Gc::new(slot as u32, generation))
    }

    /// Takes a value out of its slot, making the slot available again.
    fn release(&mut self, gc: Gc) -> Option<T> {
        release(&mut self.slots, &mut self.vacant, gc)
    }

    /// Allocates a value on the GC heap, tracking it, and returns its handle.
    ///
    /// If the value cannot be tracked, it is dropped before the error is returned.
    pub fn allocate(&mut self, value: T) -> Result<Gc> {
        let bytes = footprint(&value);
        self.request(bytes)?;
        self.tables()?;
        let gc = self.occupy(value)?;
        try_catch(
            self,
            |heap| heap.tables()?.allocated.record(gc),
            |heap, error| {
                drop(heap.release(gc));
                Err(error)
            },
        )?;
        self.stats.objects_allocated += 1;
        self.stats.bytes_allocated += bytes;
        tracing::trace!(?gc, bytes, "allocated");
        Ok(gc)
    }

    /// Pins a value as a root.
    pub fn directly_reachable(&mut self, gc: Gc) -> Result<()> {
        self.directly_reachable_many(&[gc])
    }

    /// Pins every value as a root, or none of them.
    pub fn directly_reachable_many(&mut self, handles: &[Gc]) -> Result<()> {
        for gc in handles {
            self.get(*gc)?;
        }
        let tables = self.tables()?;
        let pinned = tables.directly_reachable.record_all(handles)?;
        tracing::debug!(pinned, roots = tables.directly_reachable.len(), "pinned roots");
        Ok(())
    }

    /// Unpins a root. Unpinning a value that is not a root does nothing.
    pub fn directly_unreachable(&mut self, gc: Gc) -> Result<()> {
        self.directly_unreachable_many(&[gc])
    }

    /// Unpins every given root.
    pub fn directly_unreachable_many(&mut self, handles: &[Gc]) -> Result<()> {
        let tables = self.tables()?;
        let unpinned = handles
            .iter()
            .filter(|gc| tables.directly_reachable.untrack(**gc))
            .count();
        tracing::debug!(unpinned, roots = tables.directly_reachable.len(), "unpinned roots");
        Ok(())
    }

    /// Performs garbage collection (mark-and-sweep) on the GC heap.
    ///
    /// If the allocation table cannot be shrunk afterwards, the error is returned but the
    /// collection itself has completed and every survivor is still tracked.
    pub fn collect_garbage(&mut self) -> Result<Collection> {
        let start = Instant::now();
        self.tables()?;
        let Self {
            stats,
            slots,
            vacant,
            tables,
            ..
        } = self;
        let Some(tables) = tables.as_mut() else {
            return Ok(Collection::default());
        };

        tables.update_reachable(slots)?;

        let Tables {
            allocated,
            reachable,
            ..
        } = tables;
        let mut collection = Collection {
            reachable: reachable.len(),
            ..Collection::default()
        };
        for gc in allocated.iter() {
            if reachable.contains(*gc) {
                continue;
            }
            if let Some(value) = release(slots, vacant, *gc) {
                collection.swept += 1;
                collection.bytes_swept += footprint(&value);
                tracing::trace!(?gc, "swept");
            }
        }
        allocated.retain(|gc| reachable.contains(gc));
        let shrunk = allocated.shrink_to_fit();

        stats.collections_performed += 1;
        stats.objects_swept += collection.swept;
        stats.bytes_swept += collection.bytes_swept;
        stats.bytes_allocated = stats.bytes_allocated.saturating_sub(collection.bytes_swept);
        stats.total_time_spent += start.elapsed();
        tracing::debug!(
            reachable = collection.reachable,
            swept = collection.swept,
            bytes_swept = collection.bytes_swept,
            "collection finished"
        );

        if let Err(error) = shrunk {
            tracing::warn!(%error, "could not shrink the allocation table");
            return Err(error);
        }
        Ok(collection)
    }

    /// Frees every value and the bookkeeping tables, returning the heap to its initial state.
    ///
    /// Handles issued before this call no longer resolve.
    pub fn kill(&mut self) {
        let mut released = 0;
        for slot in 0..self.slots.len() {
            if self.slots[slot].release().is_some() {
                self.vacant.push(slot as u32);
                released += 1;
            }
        }
        self.tables = None;
        self.stats.bytes_allocated = 0;
        tracing::debug!(released, "killed the collector");
    }

    /// Summarizes every tracked value.
    pub fn report(&self) -> Report {
        let Some(tables) = self.tables.as_ref() else {
            return Report::default();
        };
        let base_size = mem::size_of::<T>();
        let rows: Vec<ReportRow> = tables
            .allocated
            .iter()
            .filter_map(|gc| lookup(&self.slots, *gc).map(|value| (*gc, value.measure())))
            .enumerate()
            .map(|(index, (gc, measurement))| ReportRow {
                index,
                gc,
                kind: measurement.kind,
                length: measurement.length,
                element_size: measurement.element_size,
                base_size,
                total_size: base_size + measurement.bytes,
            })
            .collect();
        Report {
            capacity: tables.allocated.capacity(),
            length: tables.allocated.len(),
            total_size: rows.iter().map(|row| row.total_size).sum(),
            rows,
        }
    }
}

fn release<T>(slots: &mut [GcBox<T>], vacant: &mut Vec<u32>, gc: Gc) -> Option<T> {
    let slot = slots.get_mut(gc.slot())?;
    slot.get(gc.generation())?;
    let value = slot.release();
    vacant.push(gc.slot() as u32);
    value
}

/// A single line of a [`Report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub index: usize,
    pub gc: Gc,
    pub kind: &'static str,
    pub length: usize,
    pub element_size: usize,
    pub base_size: usize,
    pub total_size: usize,
}

/// A summary of the allocation table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    /// The capacity of the allocation table.
    pub capacity: usize,
    /// The number of tracked values.
    pub length: usize,
    /// The bytes occupied by all tracked values.
    pub total_size: usize,
    pub rows: Vec<ReportRow>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Object table summary:")?;
        writeln!(
            f,
            "[Capacity = {}, Length = {}, Heap memory usage = {} bytes]",
            self.capacity, self.length, self.total_size
        )?;
        writeln!(
            f,
            "  {:<6} {:<16} {:<10} {:>10} {:>14} {:>12} {:>12}",
            "Object", "Address", "Class", "Length", "Element size", "Base size", "Total size"
        )?;
        for row in self.rows.iter() {
            writeln!(
                f,
                "  {:<6} {:<16} {:<10} {:>10} {:>14} {:>12} {:>12}",
                row.index,
                row.gc.to_string(),
                row.kind,
                row.length,
                format!("{} B", row.element_size),
                format!("{} B", row.base_size),
                format!("{} B", row.total_size),
            )?;
        }
        Ok(())
    }
}
