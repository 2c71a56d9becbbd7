use std::fmt;

use pl_core::error::Result;
use pl_gc::Gc;

use crate::element::Element;
use crate::object::{Data, Object};
use crate::runtime::Runtime;

/// Renders an object as a bracketed, comma-separated list of its elements.
///
/// Chars are quoted (`'a'`), longs carry an `L` suffix, doubles show two decimals, list elements
/// show the class of the object they refer to (`<INT>`) and missing values show as `NA`.
pub struct ObjectDisplay<'a> {
    runtime: &'a Runtime,
    object: &'a Object,
}

impl Runtime {
    /// Returns a [`fmt::Display`] adapter for `x`.
    pub fn display(&self, x: Gc) -> Result<ObjectDisplay<'_>> {
        Ok(ObjectDisplay {
            runtime: self,
            object: self.get(x)?,
        })
    }

    /// Prints `x` to the standard output.
    pub fn print(&self, x: Gc) -> Result<()> {
        println!("{}", self.display(x)?);
        Ok(())
    }
}

fn write_elements<T: Element>(
    f: &mut fmt::Formatter<'_>,
    elements: &[T],
    mut write: impl FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    for (position, element) in elements.iter().enumerate() {
        if position > 0 {
            f.write_str(", ")?;
        }
        if element.is_na() {
            f.write_str("NA")?;
        } else {
            write(f, element)?;
        }
    }
    Ok(())
}

impl fmt::Display for ObjectDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let length = self.object.length();
        f.write_str("[")?;
        match self.object.data() {
            Data::Char(buffer) => write_elements(f, &buffer[..length], |f, it| {
                write!(f, "'{}'", char::from(*it))
            })?,
            Data::Int(buffer) => write_elements(f, &buffer[..length], |f, it| write!(f, "{}", it))?,
            Data::Long(buffer) => {
                write_elements(f, &buffer[..length], |f, it| write!(f, "{}L", it))?
            }
            Data::Double(buffer) => {
                write_elements(f, &buffer[..length], |f, it| write!(f, "{:.2}", it))?
            }
            Data::List(buffer) => write_elements(f, &buffer[..length], |f, it| {
                match it.and_then(|gc| self.runtime.get(gc).ok()) {
                    Some(object) => write!(f, "<{}>", object.class()),
                    None => f.write_str("<NULL>"),
                }
            })?,
            Data::External(buffer) => write_elements(f, &buffer[..length], |f, it| match it {
                Some(external) => write!(f, "<{:#x}>", external.address()),
                None => f.write_str("NA"),
            })?,
        }
        f.write_str("]")
    }
}
