//!
//! Conversions between the primitive classes.
//!
//! A source value that is missing, or that does not fit in the destination type, converts to the
//! destination's missing sentinel. Doubles are truncated toward zero. Lists and externals can not
//! be converted.
//!

use num_traits::{NumCast, ToPrimitive};

use pl_core::error::{ErrorKind, Result};
use pl_core::{frame, throw};
use pl_gc::Gc;

use crate::element::Element;
use crate::object::{try_vec, Data, Object};
use crate::runtime::Runtime;

fn convert<S, D>(source: &[S]) -> Result<Object>
where
    S: Element + ToPrimitive,
    D: Element + NumCast,
{
    let mut result = try_vec(source.len().max(1))?;
    result.extend(source.iter().map(|item| {
        if item.is_na() {
            D::NA
        } else {
            <D as NumCast>::from(*item).unwrap_or(D::NA)
        }
    }));
    Object::from_elements::<D>(result)
}

impl Runtime {
    fn convert_to<D: Element + NumCast>(&mut self, x: Gc) -> Result<Gc> {
        let object = self.get(x)?;
        let length = object.length();
        let converted = match object.data() {
            Data::Char(buffer) => convert::<u8, D>(&buffer[..length]),
            Data::Int(buffer) => convert::<i32, D>(&buffer[..length]),
            Data::Long(buffer) => convert::<i64, D>(&buffer[..length]),
            Data::Double(buffer) => convert::<f64, D>(&buffer[..length]),
            Data::List(_) | Data::External(_) => throw!(
                ErrorKind::InvalidClass,
                "Can not convert a [{}] object to a [{}] object!",
                object.class(),
                D::CLASS
            ),
        }?;
        self.adopt(converted)
    }

    /// Converts `x` to a char vector. Values outside `[0, 255]` become missing.
    pub fn as_char(&mut self, x: Gc) -> Result<Gc> {
        self.traced(frame!("as_char"), |rt| rt.convert_to::<u8>(x))
    }

    /// Converts `x` to an int vector.
    pub fn as_int(&mut self, x: Gc) -> Result<Gc> {
        self.traced(frame!("as_int"), |rt| rt.convert_to::<i32>(x))
    }

    /// Converts `x` to a long vector.
    pub fn as_long(&mut self, x: Gc) -> Result<Gc> {
        self.traced(frame!("as_long"), |rt| rt.convert_to::<i64>(x))
    }

    /// Converts `x` to a double vector.
    pub fn as_double(&mut self, x: Gc) -> Result<Gc> {
        self.traced(frame!("as_double"), |rt| rt.convert_to::<f64>(x))
    }
}
