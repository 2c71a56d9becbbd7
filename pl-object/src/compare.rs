//!
//! Elementwise comparisons.
//!
//! Both produce an int vector of the length of `x` holding `1`, `0`, or `INT_NA`.
//! Missing values compare the same way in every class, doubles included: for `equal`, a missing
//! value on either side yields a missing result; for `is_in`, a missing value is found only if
//! the other side holds a missing value too.
//!

use pl_core::error::{ErrorKind, Result};
use pl_core::{expect, frame};
use pl_gc::Gc;

use crate::element::{Element, INT_NA};
use crate::object::{try_vec, with_buffer, Object};
use crate::runtime::Runtime;
use crate::vector::typed;

fn check_comparable(x: &Object, y: &Object) -> Result<()> {
    expect!(
        x.class().underlying() == y.class().underlying(),
        ErrorKind::InvalidClass,
        "Can not compare a [{}] object with a [{}] object!",
        x.class(),
        y.class()
    );
    Ok(())
}

fn equal_elements<T: Element>(x: &[T], y: &[T]) -> Result<Object> {
    let mut result = try_vec(x.len().max(1))?;
    result.extend(x.iter().enumerate().map(|(position, left)| {
        let right = if y.len() == 1 { y[0] } else { y[position] };
        if left.is_na() || right.is_na() {
            INT_NA
        } else {
            (*left == right) as i32
        }
    }));
    Object::from_elements(result)
}

fn in_elements<T: Element>(x: &[T], y: &[T]) -> Result<Object> {
    let mut result = try_vec(x.len().max(1))?;
    result.extend(x.iter().map(|left| {
        let found = if left.is_na() {
            y.iter().any(Element::is_na)
        } else {
            y.iter().any(|right| !right.is_na() && left == right)
        };
        found as i32
    }));
    Object::from_elements(result)
}

impl Runtime {
    /// Compares `x` and `y` elementwise, recycling `y` if it is of length one.
    pub fn equal(&mut self, x: Gc, y: Gc) -> Result<Gc> {
        self.traced(frame!("equal"), |rt| {
            let left = rt.get(x)?;
            let right = rt.get(y)?;
            check_comparable(left, right)?;
            expect!(
                right.length() == 1 || right.length() == left.length(),
                ErrorKind::IncompatibleLength,
                "Can not compare an object of length [{}] with an object of length [{}]!",
                left.length(),
                right.length()
            );
            let length = left.length();
            let result = with_buffer!(left.data(), buffer => {
                equal_elements(&buffer[..length], typed(right)?)
            })?;
            rt.adopt(result)
        })
    }

    /// Tests, for each element of `x`, whether it occurs anywhere in `y`.
    pub fn is_in(&mut self, x: Gc, y: Gc) -> Result<Gc> {
        self.traced(frame!("in"), |rt| {
            let left = rt.get(x)?;
            let right = rt.get(y)?;
            check_comparable(left, right)?;
            let length = left.length();
            let result = with_buffer!(left.data(), buffer => {
                in_elements(&buffer[..length], typed(right)?)
            })?;
            rt.adopt(result)
        })
    }
}
