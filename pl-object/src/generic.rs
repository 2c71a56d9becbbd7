//!
//! Operations whose control parameters are themselves objects.
//!
//! Indices, capacities and class tags are passed as int vectors. A scalar parameter must be an
//! int vector of length one, and must not be missing where a real value is required.
//!

use std::convert::TryFrom;

use pl_core::error::{ErrorKind, Result};
use pl_core::{capacity, expect, frame, throw, Class};
use pl_gc::Gc;

use crate::element::Element;
use crate::object::{try_vec, with_buffer, Data, Object};
use crate::runtime::Runtime;
use crate::vector::{check_index, check_not_na, typed};

/// Reads a scalar control parameter.
fn scalar(rt: &Runtime, x: Gc, name: &str) -> Result<i32> {
    let elements = typed::<i32>(rt.get(x)?)?;
    expect!(
        elements.len() == 1,
        ErrorKind::InvalidLength,
        "Expect [{}] to be of length [1], got [{}]!",
        name,
        elements.len()
    );
    Ok(elements[0])
}

/// Reads a capacity control parameter.
fn capacity_of(rt: &Runtime, x: Gc) -> Result<usize> {
    let value = scalar(rt, x, "capacity")?;
    check_not_na(value, "capacity")?;
    let capacity = usize::try_from(value).unwrap_or(0);
    capacity::check(capacity)?;
    Ok(capacity)
}

/// Copies the elements of an object out, so they can be written into another one.
fn snapshot(object: &Object) -> Result<Data> {
    let length = object.length();
    with_buffer!(object.data(), buffer => {
        let mut elements = try_vec(length)?;
        elements.extend_from_slice(&buffer[..length]);
        Ok(Element::into_data(elements))
    })
}

fn check_same_class(x: &Object, y: &Object) -> Result<()> {
    expect!(
        x.class() == y.class(),
        ErrorKind::InvalidClass,
        "Expect objects of the same class, got [{}] and [{}]!",
        x.class(),
        y.class()
    );
    Ok(())
}

impl Runtime {
    /// Allocates an empty object, reading its class tag and capacity from int scalars.
    pub fn new_with(&mut self, class: Gc, capacity: Gc) -> Result<Gc> {
        self.traced(frame!("new"), |rt| {
            let tag = scalar(rt, class, "class")?;
            check_not_na(tag, "class")?;
            let capacity = capacity_of(rt, capacity)?;
            let class = Class::from_tag(tag)?;
            rt.allocate(class, capacity)
        })
    }

    /// Like [`Runtime::reserve`], reading the capacity from an int scalar.
    pub fn reserve_with(&mut self, x: Gc, capacity: Gc) -> Result<()> {
        self.traced(frame!("reserve"), |rt| {
            rt.get(x)?;
            let capacity = capacity_of(rt, capacity)?;
            rt.reserve(x, capacity)
        })
    }

    /// Sets the elements of `x` at `indices` (an int vector) to the elements of `items`.
    pub fn set_with(&mut self, x: Gc, indices: Gc, items: Gc) -> Result<()> {
        self.traced(frame!("set"), |rt| {
            let target = rt.get(x)?;
            let indices = rt.to_vec::<i32>(indices)?;
            let items = rt.get(items)?;
            check_same_class(target, items)?;
            let items = snapshot(items)?;
            with_buffer!(&items, items => rt.set_by_indices(x, &indices, items))
        })
    }

    /// Appends `item` to the list `x`.
    pub fn append(&mut self, x: Gc, item: Gc) -> Result<()> {
        self.traced(frame!("append"), |rt| {
            rt.get(item)?;
            rt.extend::<Option<Gc>>(x, Some(item))
        })
    }

    /// Extracts the element at `index` (an int scalar).
    ///
    /// For a list this is the referenced object itself; for other classes it is a new object of
    /// length one.
    pub fn extract_with(&mut self, x: Gc, index: Gc) -> Result<Gc> {
        self.traced(frame!("extract"), |rt| {
            let object = rt.get(x)?;
            let index = scalar(rt, index, "index")?;
            check_not_na(index, "index")?;
            let position = check_index(index, object.length())?;
            if object.class().underlying() != Class::List {
                return rt.subset(x, &[index]);
            }
            match typed::<Option<Gc>>(object)?[position] {
                Some(element) => Ok(element),
                None => throw!(
                    ErrorKind::UnexpectedNullPointer,
                    "The element at index [{}] is missing!",
                    index
                ),
            }
        })
    }

    /// Appends the elements of `y` to `x`. Both must be of the same class.
    pub fn extend_with(&mut self, x: Gc, y: Gc) -> Result<()> {
        self.traced(frame!("extend"), |rt| {
            let items = rt.get(y)?;
            check_same_class(rt.get(x)?, items)?;
            let items = snapshot(items)?;
            with_buffer!(&items, items => rt.extend_from(x, items))
        })
    }

    /// Like [`Runtime::subset`], reading the indices from an int vector.
    pub fn subset_with(&mut self, x: Gc, indices: Gc) -> Result<Gc> {
        self.traced(frame!("subset"), |rt| {
            rt.get(x)?;
            let indices = rt.to_vec::<i32>(indices)?;
            rt.subset(x, &indices)
        })
    }

    /// Like [`Runtime::subset_exclude`], reading the indices from an int vector.
    pub fn subset_exclude_with(&mut self, x: Gc, indices: Gc) -> Result<Gc> {
        self.traced(frame!("subset_exclude"), |rt| {
            rt.get(x)?;
            let indices = rt.to_vec::<i32>(indices)?;
            rt.subset_exclude(x, &indices)
        })
    }
}
