//!
//! The class registry.
//!
//! The set of classes is fixed at build time. Every class is currently its own base class, but
//! lookups go through [`Class::underlying`] so that derived classes can be added later without
//! touching the collector or the object model.
//!

use std::convert::TryFrom;
use std::fmt;
use std::mem;

use crate::error::{Error, ErrorKind, Result};

/// The number of classes in the registry.
pub const NUM_CLASSES: usize = 6;

/// The element kind of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Class {
    /// Single bytes.
    Char = 0,
    /// 32-bit signed integers.
    Int = 1,
    /// 64-bit signed integers.
    Long = 2,
    /// Double-precision floats.
    Double = 3,
    /// References to other objects.
    List = 4,
    /// Opaque handles to memory owned outside of the runtime.
    External = 5,
}

/// The parent of each class, indexed by tag.
const PARENTS: [Option<Class>; NUM_CLASSES] = [None; NUM_CLASSES];

impl Class {
    /// Every class, ordered by tag.
    pub const ALL: [Class; NUM_CLASSES] = [
        Class::Char,
        Class::Int,
        Class::Long,
        Class::Double,
        Class::List,
        Class::External,
    ];

    /// Look a class up by its tag.
    pub fn from_tag(tag: i32) -> Result<Self> {
        match usize::try_from(tag).ok().and_then(|tag| Self::ALL.get(tag)) {
            Some(class) => Ok(*class),
            None => crate::throw!(ErrorKind::UndefinedClass, "Undefined class [{}]!", tag),
        }
    }

    /// The integer tag of this class.
    pub fn tag(self) -> i32 {
        self as i32
    }

    /// The name of this class, as printed in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Class::Char => "CHAR",
            Class::Int => "INT",
            Class::Long => "LONG",
            Class::Double => "DOUBLE",
            Class::List => "LIST",
            Class::External => "EXTERNAL",
        }
    }

    /// The size (in bytes) of a single element of this class.
    pub fn element_size(self) -> usize {
        match self {
            Class::Char => mem::size_of::<u8>(),
            Class::Int => mem::size_of::<i32>(),
            Class::Long => mem::size_of::<i64>(),
            Class::Double => mem::size_of::<f64>(),
            Class::List | Class::External => mem::size_of::<usize>(),
        }
    }

    /// The size (in bytes) of a buffer of `capacity` elements, if it fits in a `usize`.
    pub fn data_size(self, capacity: usize) -> Option<usize> {
        capacity.checked_mul(self.element_size())
    }

    /// The direct parent of this class, if any.
    pub fn parent(self) -> Option<Class> {
        PARENTS[self as usize]
    }

    /// The base class this class ultimately derives from.
    pub fn underlying(self) -> Class {
        let mut class = self;
        while let Some(parent) = class.parent() {
            class = parent;
        }
        class
    }

    /// Whether this class is `base` or derives from it.
    pub fn inherits(self, base: Class) -> bool {
        let mut class = Some(self);
        while let Some(current) = class {
            if current == base {
                return true;
            }
            class = current.parent();
        }
        false
    }
}

impl TryFrom<i32> for Class {
    type Error = Error;

    fn try_from(tag: i32) -> Result<Self> {
        Self::from_tag(tag)
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
