//!
//! Primitive vector operations.
//!
//! Every operation validates all of its inputs before touching the object it mutates, so a
//! failed call leaves every object exactly as it found it. A missing index (`INT_NA`) is
//! accepted wherever an index selects an element: setting it is a no-op, extracting it yields
//! the missing sentinel.
//!

use std::convert::TryFrom;

use pl_core::error::{ErrorKind, Result};
use pl_core::{capacity, expect, frame, throw};
use pl_gc::Gc;

use crate::element::{Element, INT_NA};
use crate::object::{try_vec, with_buffer, Object};
use crate::runtime::Runtime;

/// The elements of `object`, if it holds elements of type `T`.
pub(crate) fn typed<T: Element>(object: &Object) -> Result<&[T]> {
    match object.elements::<T>() {
        Some(elements) => Ok(elements),
        None => throw!(
            ErrorKind::InvalidClass,
            "Expect an object of class [{}], got [{}]!",
            T::CLASS,
            object.class()
        ),
    }
}

pub(crate) fn typed_mut<T: Element>(object: &mut Object) -> Result<&mut [T]> {
    let class = object.class();
    match object.elements_mut::<T>() {
        Some(elements) => Ok(elements),
        None => throw!(
            ErrorKind::InvalidClass,
            "Expect an object of class [{}], got [{}]!",
            T::CLASS,
            class
        ),
    }
}

/// Checks a (non-missing) index against a length.
pub(crate) fn check_index(index: i32, length: usize) -> Result<usize> {
    match usize::try_from(index) {
        Ok(position) if position < length => Ok(position),
        _ => throw!(
            ErrorKind::IndexOutOfBound,
            "Index [{}] out of bound [0, {})!",
            index,
            length
        ),
    }
}

/// Checks every non-missing index against a length.
pub(crate) fn check_indices(indices: &[i32], length: usize) -> Result<()> {
    for index in indices.iter().copied().filter(|it| *it != INT_NA) {
        check_index(index, length)?;
    }
    Ok(())
}

/// Checks that a control parameter is not missing.
pub(crate) fn check_not_na(value: i32, name: &str) -> Result<()> {
    expect!(
        value != INT_NA,
        ErrorKind::InvalidNa,
        "Unexpected missing value for [{}]!",
        name
    );
    Ok(())
}

/// Checks a boolean mask against a length, returning the number of set entries.
fn check_mask(mask: &[i32], length: usize) -> Result<usize> {
    expect!(
        mask.len() == length,
        ErrorKind::IncompatibleLength,
        "Expect a mask of length [{}], got [{}]!",
        length,
        mask.len()
    );
    expect!(
        mask.iter().all(|it| *it != INT_NA),
        ErrorKind::InvalidNa,
        "Unexpected missing value in a boolean mask!"
    );
    Ok(mask.iter().filter(|it| **it != 0).count())
}

fn check_count(expected: usize, actual: usize) -> Result<()> {
    expect!(
        expected == actual,
        ErrorKind::IncompatibleLength,
        "Expect [{}] items, got [{}]!",
        expected,
        actual
    );
    Ok(())
}

/// Checks that every list element refers to a live object.
pub(crate) fn check_references<T: Element>(rt: &Runtime, items: &[T]) -> Result<()> {
    for gc in items.iter().filter_map(Element::reference) {
        rt.get(gc)?;
    }
    Ok(())
}

/// A keep-mask of length `length` with the positions named by `indices` cleared.
fn exclusion_mask(indices: &[i32], length: usize) -> Result<Vec<bool>> {
    let mut keep = try_vec(length)?;
    keep.resize(length, true);
    for index in indices.iter().filter(|it| **it != INT_NA) {
        keep[*index as usize] = false;
    }
    Ok(keep)
}

fn gather<T: Element>(source: &[T], indices: &[i32]) -> Result<Object> {
    let mut elements = try_vec(indices.len().max(1))?;
    elements.extend(indices.iter().map(|index| match *index {
        INT_NA => T::NA,
        index => source[index as usize],
    }));
    Object::from_elements(elements)
}

fn select<T: Element>(source: &[T], keep: &[bool]) -> Result<Object> {
    let count = keep.iter().filter(|it| **it).count();
    let mut elements = try_vec(count.max(1))?;
    elements.extend(
        source
            .iter()
            .zip(keep)
            .filter(|(_, keep)| **keep)
            .map(|(item, _)| *item),
    );
    Object::from_elements(elements)
}

fn duplicate<T: Element>(source: &[T]) -> Result<Object> {
    let mut elements = try_vec(source.len().max(1))?;
    elements.extend_from_slice(source);
    Object::from_elements(elements)
}

/// Moves the kept elements to the front, returning how many were kept.
fn compact<T: Element>(elements: &mut [T], keep: &[bool]) -> usize {
    let mut kept = 0;
    for position in 0..elements.len() {
        if keep[position] {
            elements[kept] = elements[position];
            kept += 1;
        }
    }
    kept
}

impl Runtime {
    /// Creates a vector holding the given elements.
    pub fn new_vector<T: Element>(&mut self, items: &[T]) -> Result<Gc> {
        self.traced(frame!("new_vector"), |rt| {
            check_references(rt, items)?;
            let object = duplicate(items)?;
            rt.adopt(object)
        })
    }

    /// Creates a char vector holding the bytes of `text`.
    pub fn new_string(&mut self, text: &str) -> Result<Gc> {
        self.new_vector(text.as_bytes())
    }

    /// Copies the elements of `x` out.
    pub fn to_vec<T: Element>(&self, x: Gc) -> Result<Vec<T>> {
        let elements = typed::<T>(self.get(x)?)?;
        let mut copy = try_vec(elements.len())?;
        copy.extend_from_slice(elements);
        Ok(copy)
    }

    /// Sets the element at `index`.
    pub fn set<T: Element>(&mut self, x: Gc, index: i32, item: T) -> Result<()> {
        self.traced(frame!("set"), |rt| {
            let length = typed::<T>(rt.get(x)?)?.len();
            if index == INT_NA {
                return Ok(());
            }
            let position = check_index(index, length)?;
            check_references(rt, &[item])?;
            typed_mut::<T>(rt.get_mut(x)?)?[position] = item;
            Ok(())
        })
    }

    /// Gets the element at `index`.
    pub fn extract<T: Element>(&self, x: Gc, index: i32) -> Result<T> {
        let elements = typed::<T>(self.get(x)?)?;
        if index == INT_NA {
            return Ok(T::NA);
        }
        let position = check_index(index, elements.len())?;
        Ok(elements[position])
    }

    /// Appends one element to `x`.
    pub fn extend<T: Element>(&mut self, x: Gc, item: T) -> Result<()> {
        self.extend_from(x, &[item])
    }

    /// Appends the given elements to `x`.
    pub fn extend_from<T: Element>(&mut self, x: Gc, items: &[T]) -> Result<()> {
        self.traced(frame!("extend"), |rt| {
            let length = typed::<T>(rt.get(x)?)?.len();
            check_references(rt, items)?;
            if items.is_empty() {
                return Ok(());
            }
            let new_length = length.saturating_add(items.len());
            capacity::check(new_length)?;
            rt.reserve(x, new_length)?;

            let object = rt.get_mut(x)?;
            if let Some(buffer) = object.buffer_mut::<T>() {
                buffer[length..new_length].copy_from_slice(items);
            }
            object.set_length(new_length);
            Ok(())
        })
    }

    /// Sets the elements at the given indices. Missing indices are skipped.
    pub fn set_by_indices<T: Element>(&mut self, x: Gc, indices: &[i32], items: &[T]) -> Result<()> {
        self.traced(frame!("set_by_indices"), |rt| {
            let length = typed::<T>(rt.get(x)?)?.len();
            check_count(indices.len(), items.len())?;
            check_indices(indices, length)?;
            check_references(rt, items)?;

            let elements = typed_mut::<T>(rt.get_mut(x)?)?;
            for (index, item) in indices.iter().zip(items) {
                if *index != INT_NA {
                    elements[*index as usize] = *item;
                }
            }
            Ok(())
        })
    }

    /// Sets the elements from `start` to `end` (both included).
    pub fn set_range<T: Element>(&mut self, x: Gc, start: i32, end: i32, items: &[T]) -> Result<()> {
        self.traced(frame!("set_range"), |rt| {
            let length = typed::<T>(rt.get(x)?)?.len();
            check_not_na(start, "start")?;
            check_not_na(end, "end")?;
            let start = check_index(start, length)?;
            let end = check_index(end, length)?;
            expect!(
                start <= end,
                ErrorKind::InvalidLength,
                "Invalid range [{}, {}]!",
                start,
                end
            );
            check_count(end - start + 1, items.len())?;
            check_references(rt, items)?;

            typed_mut::<T>(rt.get_mut(x)?)?[start..=end].copy_from_slice(items);
            Ok(())
        })
    }

    /// Sets the elements whose mask entry is set, consuming `items` in order.
    pub fn set_by_bool<T: Element>(&mut self, x: Gc, mask: &[i32], items: &[T]) -> Result<()> {
        self.traced(frame!("set_by_bool"), |rt| {
            let length = typed::<T>(rt.get(x)?)?.len();
            let count = check_mask(mask, length)?;
            check_count(count, items.len())?;
            check_references(rt, items)?;

            let elements = typed_mut::<T>(rt.get_mut(x)?)?;
            let targets = mask.iter().enumerate().filter(|(_, it)| **it != 0);
            for ((position, _), item) in targets.zip(items) {
                elements[position] = *item;
            }
            Ok(())
        })
    }

    /// Creates a new object holding the elements of `x` at the given indices.
    ///
    /// Missing indices produce missing elements.
    pub fn subset(&mut self, x: Gc, indices: &[i32]) -> Result<Gc> {
        self.traced(frame!("subset"), |rt| {
            let object = rt.get(x)?;
            let length = object.length();
            check_indices(indices, length)?;
            let subset = with_buffer!(object.data(), buffer => gather(&buffer[..length], indices))?;
            rt.adopt(subset)
        })
    }

    /// Creates a new object holding the elements of `x` not named by `indices`.
    ///
    /// Missing and duplicate indices are ignored.
    pub fn subset_exclude(&mut self, x: Gc, indices: &[i32]) -> Result<Gc> {
        self.traced(frame!("subset_exclude"), |rt| {
            let object = rt.get(x)?;
            let length = object.length();
            check_indices(indices, length)?;
            let keep = exclusion_mask(indices, length)?;
            let subset = with_buffer!(object.data(), buffer => select(&buffer[..length], &keep))?;
            rt.adopt(subset)
        })
    }

    /// Creates a new object holding the elements of `x` whose mask entry is set.
    pub fn subset_by_bool(&mut self, x: Gc, mask: &[i32]) -> Result<Gc> {
        self.traced(frame!("subset_by_bool"), |rt| {
            let object = rt.get(x)?;
            let length = object.length();
            check_mask(mask, length)?;
            let keep: Vec<bool> = mask.iter().map(|it| *it != 0).collect();
            let subset = with_buffer!(object.data(), buffer => select(&buffer[..length], &keep))?;
            rt.adopt(subset)
        })
    }

    /// Removes the elements from `start` to `end` (both included).
    pub fn remove(&mut self, x: Gc, start: i32, end: i32) -> Result<()> {
        self.traced(frame!("remove"), |rt| {
            let length = rt.get(x)?.length();
            check_not_na(start, "start")?;
            check_not_na(end, "end")?;
            let start = check_index(start, length)?;
            let end = check_index(end, length)?;
            expect!(
                start <= end,
                ErrorKind::InvalidLength,
                "Invalid range [{}, {}]!",
                start,
                end
            );

            let object = rt.get_mut(x)?;
            with_buffer!(object.data_mut(), buffer => buffer.copy_within(end + 1..length, start));
            object.set_length(length - (end - start + 1));
            Ok(())
        })
    }

    /// Removes the elements named by `indices`, keeping the others in order.
    ///
    /// Missing and duplicate indices are ignored.
    pub fn remove_by_indices(&mut self, x: Gc, indices: &[i32]) -> Result<()> {
        self.traced(frame!("remove_by_indices"), |rt| {
            let length = rt.get(x)?.length();
            check_indices(indices, length)?;
            let keep = exclusion_mask(indices, length)?;

            let object = rt.get_mut(x)?;
            let kept = with_buffer!(object.data_mut(), buffer => compact(&mut buffer[..length], &keep));
            object.set_length(kept);
            Ok(())
        })
    }

    /// Creates a shallow copy of `x`, without its attribute.
    pub fn copy(&mut self, x: Gc) -> Result<Gc> {
        self.traced(frame!("copy"), |rt| {
            let object = rt.get(x)?;
            let length = object.length();
            let copy = with_buffer!(object.data(), buffer => duplicate(&buffer[..length]))?;
            rt.adopt(copy)
        })
    }
}
