use std::fmt;

use pl_core::Class;
use pl_gc::Gc;

use crate::object::{Data, External};

/// The missing sentinel of the char class.
pub const CHAR_NA: u8 = 0;
/// The missing sentinel of the int class.
pub const INT_NA: i32 = i32::MAX;
/// The missing sentinel of the long class.
pub const LONG_NA: i64 = i64::MAX;
/// The missing sentinel of the double class.
pub const DOUBLE_NA: f64 = f64::NAN;

/// The element type of a class.
///
/// Each class reserves one in-band value as its missing sentinel.
pub trait Element: Copy + PartialEq + fmt::Debug + 'static {
    /// The class whose buffers hold this type.
    const CLASS: Class;
    /// The missing sentinel.
    const NA: Self;

    /// Whether this value is the missing sentinel.
    fn is_na(&self) -> bool;

    /// The buffer of `data`, if it holds this type.
    fn buffer(data: &Data) -> Option<&Vec<Self>>;

    /// The buffer of `data` mutably, if it holds this type.
    fn buffer_mut(data: &mut Data) -> Option<&mut Vec<Self>>;

    /// Wraps a buffer of this type.
    fn into_data(buffer: Vec<Self>) -> Data;

    /// The object this element refers to, for list elements.
    fn reference(&self) -> Option<Gc>;
}

macro_rules! element {
    ($ty:ty, $variant:ident, $na:expr, |$value:ident| $is_na:expr, |$item:pat_param| $reference:expr) => {
        impl Element for $ty {
            const CLASS: Class = Class::$variant;
            const NA: Self = $na;

            #[inline]
            fn is_na(&self) -> bool {
                let $value = self;
                $is_na
            }

            #[inline]
            fn buffer(data: &Data) -> Option<&Vec<Self>> {
                match data {
                    Data::$variant(buffer) => Some(buffer),
                    _ => None,
                }
            }

            #[inline]
            fn buffer_mut(data: &mut Data) -> Option<&mut Vec<Self>> {
                match data {
                    Data::$variant(buffer) => Some(buffer),
                    _ => None,
                }
            }

            #[inline]
            fn into_data(buffer: Vec<Self>) -> Data {
                Data::$variant(buffer)
            }

            #[inline]
            fn reference(&self) -> Option<Gc> {
                let $item = self;
                $reference
            }
        }
    };
}

element!(u8, Char, CHAR_NA, |value| *value == CHAR_NA, |_| None);
element!(i32, Int, INT_NA, |value| *value == INT_NA, |_| None);
element!(i64, Long, LONG_NA, |value| *value == LONG_NA, |_| None);
element!(f64, Double, DOUBLE_NA, |value| value.is_nan(), |_| None);
element!(Option<Gc>, List, None, |value| value.is_none(), |item| *item);
element!(Option<External>, External, None, |value| value.is_none(), |_| None);
