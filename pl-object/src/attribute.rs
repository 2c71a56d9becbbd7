//!
//! Named attributes.
//!
//! The attribute table of an object is a list of two lists of the same length: the attribute
//! names (char vectors) and the attribute values. The table is created by the first
//! [`Runtime::set_attribute`] on the object. Names are compared byte for byte.
//!

use pl_core::error::{ErrorKind, Result};
use pl_core::{frame, throw, Class};
use pl_gc::Gc;

use crate::runtime::Runtime;
use crate::vector::typed;

const NAMES: usize = 0;
const VALUES: usize = 1;

impl Runtime {
    /// The names and values lists of the attribute table of `x`, if it has one.
    fn attribute_lists(&self, x: Gc) -> Result<Option<(Gc, Gc)>> {
        let Some(table) = self.get(x)?.attribute() else {
            return Ok(None);
        };
        let lists = typed::<Option<Gc>>(self.get(table)?)?;
        match (lists.get(NAMES), lists.get(VALUES)) {
            (Some(Some(names)), Some(Some(values))) => Ok(Some((*names, *values))),
            _ => throw!(
                ErrorKind::UnexpectedNullPointer,
                "Malformed attribute table {:?}!",
                table
            ),
        }
    }

    /// The position of the attribute `name` in the attribute table of `x`.
    fn index_attribute(&self, x: Gc, name: Gc) -> Result<Option<usize>> {
        self.get(x)?;
        let name = typed::<u8>(self.get(name)?)?;
        let Some((names, _)) = self.attribute_lists(x)? else {
            return Ok(None);
        };
        for (position, entry) in typed::<Option<Gc>>(self.get(names)?)?.iter().enumerate() {
            if let Some(entry) = entry {
                if typed::<u8>(self.get(*entry)?)? == name {
                    return Ok(Some(position));
                }
            }
        }
        Ok(None)
    }

    fn attribute_not_found(&self, name: Gc) -> pl_core::Error {
        let name = self.to_vec::<u8>(name).unwrap_or_default();
        pl_core::pl_error!(
            ErrorKind::AttributeNotFound,
            "Attribute [{}] not found!",
            String::from_utf8_lossy(&name)
        )
    }

    /// Whether `x` has an attribute called `name`.
    pub fn has_attribute(&self, x: Gc, name: Gc) -> Result<bool> {
        Ok(self.index_attribute(x, name)?.is_some())
    }

    /// The value of the attribute `name` of `x`.
    pub fn get_attribute(&self, x: Gc, name: Gc) -> Result<Gc> {
        let Some(position) = self.index_attribute(x, name)? else {
            return Err(self.attribute_not_found(name));
        };
        let Some((_, values)) = self.attribute_lists(x)? else {
            return Err(self.attribute_not_found(name));
        };
        match typed::<Option<Gc>>(self.get(values)?)?.get(position) {
            Some(Some(value)) => Ok(*value),
            _ => Err(self.attribute_not_found(name)),
        }
    }

    /// The names of the attributes of `x`, in insertion order.
    pub fn attribute_names(&self, x: Gc) -> Result<Vec<Vec<u8>>> {
        let Some((names, _)) = self.attribute_lists(x)? else {
            return Ok(Vec::new());
        };
        typed::<Option<Gc>>(self.get(names)?)?
            .iter()
            .flatten()
            .map(|name| self.to_vec::<u8>(*name))
            .collect()
    }

    /// Creates an empty attribute table for `x`.
    fn new_attribute_table(&mut self, x: Gc) -> Result<(Gc, Gc)> {
        let names = self.allocate(Class::List, 1)?;
        let values = self.allocate(Class::List, 1)?;
        let table = self.new_vector(&[Some(names), Some(values)])?;
        self.get_mut(x)?.set_attribute(Some(table));
        Ok((names, values))
    }

    /// Sets the attribute `name` of `x` to `value`, adding it if it is not present.
    ///
    /// The name is copied. Adding an attribute either appends to both the names and the values
    /// list, or to neither of them.
    pub fn set_attribute(&mut self, x: Gc, name: Gc, value: Gc) -> Result<()> {
        self.traced(frame!("set_attribute"), |rt| {
            rt.get(value)?;
            if let Some(position) = rt.index_attribute(x, name)? {
                if let Some((_, values)) = rt.attribute_lists(x)? {
                    return rt.set(values, position as i32, Some(value));
                }
            }

            let (names, values) = match rt.attribute_lists(x)? {
                Some(lists) => lists,
                None => rt.new_attribute_table(x)?,
            };
            let name = rt.copy(name)?;
            let names_length = rt.get(names)?.length();
            let values_length = rt.get(values)?.length();

            rt.try_catch(
                |rt| {
                    rt.extend(names, Some(name))?;
                    rt.extend(values, Some(value))
                },
                |rt, error| {
                    for (list, length) in [(names, names_length), (values, values_length)] {
                        if let Ok(list) = rt.get_mut(list) {
                            list.set_length(length);
                        }
                    }
                    Err(error)
                },
            )
        })
    }

    /// Removes the attribute `name` of `x`.
    pub fn remove_attribute(&mut self, x: Gc, name: Gc) -> Result<()> {
        self.traced(frame!("remove_attribute"), |rt| {
            let Some(position) = rt.index_attribute(x, name)? else {
                return Err(rt.attribute_not_found(name));
            };
            let Some((names, values)) = rt.attribute_lists(x)? else {
                return Err(rt.attribute_not_found(name));
            };
            let position = position as i32;
            rt.remove(names, position, position)?;
            rt.remove(values, position, position)
        })
    }
}
