use std::mem;
use std::num::NonZeroUsize;

use pl_core::error::{ErrorKind, Result};
use pl_core::Class;
use pl_gc::{Gc, Measure, Measurement, Trace, Tracer};

use crate::element::Element;

/// An opaque handle to memory owned outside of the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct External(NonZeroUsize);

impl External {
    /// Wraps a non-zero address.
    pub fn new(address: usize) -> Option<Self> {
        NonZeroUsize::new(address).map(Self)
    }

    pub fn address(self) -> usize {
        self.0.get()
    }
}

/// The data buffer of an object.
///
/// A buffer always holds exactly `capacity` elements; the slots past the object's length hold
/// the missing sentinel or stale values.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    Char(Vec<u8>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Double(Vec<f64>),
    List(Vec<Option<Gc>>),
    External(Vec<Option<External>>),
}

/// Binds the buffer of a [`Data`] value, whatever its element type, and evaluates the body
/// with it.
macro_rules! with_buffer {
    ($data:expr, $buffer:ident => $body:expr) => {
        match $data {
            $crate::object::Data::Char($buffer) => $body,
            $crate::object::Data::Int($buffer) => $body,
            $crate::object::Data::Long($buffer) => $body,
            $crate::object::Data::Double($buffer) => $body,
            $crate::object::Data::List($buffer) => $body,
            $crate::object::Data::External($buffer) => $body,
        }
    };
}

pub(crate) use with_buffer;

impl Data {
    fn empty(class: Class) -> Self {
        match class {
            Class::Char => Data::Char(Vec::new()),
            Class::Int => Data::Int(Vec::new()),
            Class::Long => Data::Long(Vec::new()),
            Class::Double => Data::Double(Vec::new()),
            Class::List => Data::List(Vec::new()),
            Class::External => Data::External(Vec::new()),
        }
    }

    /// The class of the elements held by this buffer.
    pub fn class(&self) -> Class {
        match self {
            Data::Char(_) => Class::Char,
            Data::Int(_) => Class::Int,
            Data::Long(_) => Class::Long,
            Data::Double(_) => Class::Double,
            Data::List(_) => Class::List,
            Data::External(_) => Class::External,
        }
    }

    /// The number of elements this buffer holds.
    pub fn capacity(&self) -> usize {
        with_buffer!(self, buffer => buffer.len())
    }

    /// Reallocates the buffer to hold exactly `capacity` elements.
    ///
    /// On failure the buffer is left untouched.
    pub(crate) fn resize(&mut self, capacity: usize) -> Result<()> {
        with_buffer!(self, buffer => resize_buffer(buffer, capacity))
    }
}

fn resize_buffer<T: Element>(buffer: &mut Vec<T>, capacity: usize) -> Result<()> {
    if capacity > buffer.len() {
        let additional = capacity - buffer.len();
        if buffer.try_reserve_exact(additional).is_err() {
            pl_core::throw!(
                ErrorKind::AllocFailed,
                "Failed to allocate a buffer of [{}] elements!",
                capacity
            );
        }
        buffer.resize(capacity, T::NA);
    } else {
        buffer.truncate(capacity);
        buffer.shrink_to_fit();
    }
    Ok(())
}

/// Allocates an empty vector able to hold `capacity` elements.
pub(crate) fn try_vec<T>(capacity: usize) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    if buffer.try_reserve_exact(capacity).is_err() {
        pl_core::throw!(
            ErrorKind::AllocFailed,
            "Failed to allocate a buffer of [{}] elements!",
            capacity
        );
    }
    Ok(buffer)
}

/// The single universal value representation.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    class: Class,
    length: usize,
    attribute: Option<Gc>,
    data: Data,
}

impl Object {
    /// Creates an empty object able to hold `capacity` elements.
    pub(crate) fn new(class: Class, capacity: usize) -> Result<Self> {
        pl_core::capacity::check(capacity)?;
        let mut data = Data::empty(class);
        data.resize(capacity)?;
        Ok(Self {
            class,
            length: 0,
            attribute: None,
            data,
        })
    }

    /// Creates an object holding exactly the given elements (with a capacity of at least one).
    pub(crate) fn from_elements<T: Element>(mut elements: Vec<T>) -> Result<Self> {
        let length = elements.len();
        pl_core::capacity::check(length.max(1))?;
        if elements.is_empty() {
            elements = try_vec(1)?;
            elements.push(T::NA);
        }
        Ok(Self {
            class: T::CLASS,
            length,
            attribute: None,
            data: T::into_data(elements),
        })
    }

    #[inline]
    pub fn class(&self) -> Class {
        self.class
    }

    /// The number of elements in use.
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The number of elements the buffer can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// The attribute table, if any.
    #[inline]
    pub fn attribute(&self) -> Option<Gc> {
        self.attribute
    }

    #[inline]
    pub fn data(&self) -> &Data {
        &self.data
    }

    /// The elements in use, if this object holds elements of type `T`.
    pub fn elements<T: Element>(&self) -> Option<&[T]> {
        T::buffer(&self.data).map(|buffer| &buffer[..self.length])
    }

    pub(crate) fn elements_mut<T: Element>(&mut self) -> Option<&mut [T]> {
        let length = self.length;
        T::buffer_mut(&mut self.data).map(|buffer| &mut buffer[..length])
    }

    pub(crate) fn buffer_mut<T: Element>(&mut self) -> Option<&mut Vec<T>> {
        T::buffer_mut(&mut self.data)
    }

    pub(crate) fn data_mut(&mut self) -> &mut Data {
        &mut self.data
    }

    pub(crate) fn set_length(&mut self, length: usize) {
        debug_assert!(length <= self.capacity());
        self.length = length;
    }

    pub(crate) fn set_attribute(&mut self, attribute: Option<Gc>) {
        self.attribute = attribute;
    }

    /// The size (in bytes) of the data buffer.
    pub fn data_size(&self) -> usize {
        self.capacity() * self.class.element_size()
    }

    /// The size (in bytes) of this object: fixed overhead plus the data buffer.
    pub fn size(&self) -> usize {
        mem::size_of::<Object>() + self.data_size()
    }
}

impl Trace for Object {
    fn trace(&self, tracer: &mut Tracer) {
        if self.class.underlying() == Class::List {
            if let Some(items) = self.elements::<Option<Gc>>() {
                items.trace(tracer);
            }
        }
        self.attribute.trace(tracer);
    }
}

impl Measure for Object {
    fn measure(&self) -> Measurement {
        Measurement {
            kind: self.class.name(),
            length: self.length,
            element_size: self.class.element_size(),
            bytes: self.data_size(),
        }
    }
}
