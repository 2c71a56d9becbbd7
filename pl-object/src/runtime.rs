//!
//! The runtime session.
//!
//! A [`Runtime`] owns the collector's heap and the call backtrace. All objects are created,
//! resized and collected through it.
//!

use std::mem;

use pl_core::backtrace::{Backtrace, Frame};
use pl_core::capacity;
use pl_core::error::{Error, Result};
use pl_core::exception;
use pl_core::frame;
use pl_core::Class;
use pl_gc::{Collection, Gc, GcHeap, GcParams, Report};

use crate::object::Object;

/// A runtime session.
pub struct Runtime {
    heap: GcHeap<Object>,
    backtrace: Backtrace,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Creates a new runtime, with the default collector parameters.
    pub fn new() -> Self {
        Self::with_params(GcParams::default())
    }

    /// Creates a new runtime, with the specified collector parameters.
    pub fn with_params(params: GcParams) -> Self {
        Self {
            heap: GcHeap::with_params(params),
            backtrace: Backtrace::new(),
        }
    }

    pub fn heap(&self) -> &GcHeap<Object> {
        &self.heap
    }

    /// Returns a mutable reference to the collector's parameters.
    pub fn params_mut(&mut self) -> &mut GcParams {
        self.heap.params_mut()
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    /// Runs `body` inside a traced call.
    ///
    /// The frame is pushed for the duration of the call. An error leaving the call carries a
    /// copy of the backtrace as it was at the innermost traced call it crossed.
    pub fn traced<T>(&mut self, frame: Frame, body: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if let Err(mut error) = self.backtrace.push(frame) {
            error.back_up(&self.backtrace);
            return Err(error);
        }
        let result = body(self).map_err(|mut error| {
            error.back_up(&self.backtrace);
            error
        });
        self.backtrace.pop();
        result
    }

    /// Runs `body`, handing any error it raises to `handler` together with the runtime.
    pub fn try_catch<T>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<T>,
        handler: impl FnOnce(&mut Self, Error) -> Result<T>,
    ) -> Result<T> {
        exception::try_catch(self, body, handler)
    }

    /// Resolves a handle.
    pub fn get(&self, x: Gc) -> Result<&Object> {
        self.heap.get(x)
    }

    pub(crate) fn get_mut(&mut self, x: Gc) -> Result<&mut Object> {
        self.heap.get_mut(x)
    }

    /// Tracks a fully built object.
    pub(crate) fn adopt(&mut self, object: Object) -> Result<Gc> {
        self.heap.allocate(object)
    }

    /// Allocates an empty object of the given class, able to hold `capacity` elements.
    pub fn allocate(&mut self, class: Class, capacity: usize) -> Result<Gc> {
        self.traced(frame!("allocate"), |rt| {
            capacity::check(capacity)?;
            let bytes = class.data_size(capacity).unwrap_or(usize::MAX);
            rt.heap.request(mem::size_of::<Object>().saturating_add(bytes))?;
            let object = Object::new(class, capacity)?;
            rt.adopt(object)
        })
    }

    /// Reallocates the buffer of `x` to hold exactly `capacity` elements.
    ///
    /// If `capacity` is smaller than the length of `x`, the length is truncated.
    pub fn grow_to(&mut self, x: Gc, capacity: usize) -> Result<()> {
        self.traced(frame!("grow_to"), |rt| {
            capacity::check(capacity)?;
            let object = rt.get(x)?;
            let released = object.data_size();
            let acquired = object
                .class()
                .data_size(capacity)
                .unwrap_or(usize::MAX);
            rt.heap.request(acquired.saturating_sub(released))?;

            let object = rt.get_mut(x)?;
            object.data_mut().resize(capacity)?;
            if object.length() > capacity {
                object.set_length(capacity);
            }
            rt.heap.account(released, acquired);
            Ok(())
        })
    }

    /// Shrinks the buffer of `x` to exactly `capacity` elements.
    pub fn shrink(&mut self, x: Gc, capacity: usize) -> Result<()> {
        self.grow_to(x, capacity)
    }

    /// Makes sure `x` can hold at least `capacity` elements, growing it by the growth policy.
    ///
    /// The capacity of `x` never decreases.
    pub fn reserve(&mut self, x: Gc, capacity: usize) -> Result<()> {
        self.traced(frame!("reserve"), |rt| {
            let current = rt.get(x)?.capacity();
            let target = capacity::grow(current, capacity)?;
            if target > current {
                rt.grow_to(x, target)?;
            }
            Ok(())
        })
    }

    /// The size (in bytes) of `x`.
    pub fn heap_size(&self, x: Gc) -> Result<usize> {
        Ok(self.get(x)?.size())
    }

    /// Pins `x` as a root.
    pub fn directly_reachable(&mut self, x: Gc) -> Result<()> {
        self.traced(frame!("directly_reachable"), |rt| {
            rt.heap.directly_reachable(x)
        })
    }

    /// Pins every object as a root, or none of them.
    pub fn directly_reachable_many(&mut self, objects: &[Gc]) -> Result<()> {
        self.traced(frame!("directly_reachable_many"), |rt| {
            rt.heap.directly_reachable_many(objects)
        })
    }

    /// Unpins `x`.
    pub fn directly_unreachable(&mut self, x: Gc) -> Result<()> {
        self.traced(frame!("directly_unreachable"), |rt| {
            rt.heap.directly_unreachable(x)
        })
    }

    /// Unpins every given object.
    pub fn directly_unreachable_many(&mut self, objects: &[Gc]) -> Result<()> {
        self.traced(frame!("directly_unreachable_many"), |rt| {
            rt.heap.directly_unreachable_many(objects)
        })
    }

    /// Frees every object not reachable from the roots.
    pub fn collect(&mut self) -> Result<Collection> {
        self.traced(frame!("garbage_collect"), |rt| rt.heap.collect_garbage())
    }

    /// Summarizes the tracked objects.
    pub fn report(&self) -> Report {
        self.heap.report()
    }

    /// Prints the summary of the tracked objects to the standard output.
    pub fn print_report(&self) {
        print!("{}", self.heap.report());
    }

    /// Frees every object and resets the collector.
    pub fn kill(&mut self) {
        self.heap.kill();
    }

    /// Whether the collector is initialized.
    pub fn status(&self) -> bool {
        self.heap.status()
    }

    /// The number of tracked objects.
    pub fn tracked(&self) -> usize {
        self.heap.len()
    }
}
