//!
//! The error type of the runtime.
//!
//! Every fallible operation returns a [`Result`] whose error carries a kind from a closed
//! taxonomy, a bounded message, the call site that raised it and, once it has crossed a traced
//! call boundary, a copy of the backtrace at that point.
//!

use std::fmt;

use crate::backtrace::Backtrace;

/// The maximum length (in bytes) of an error message.
pub const MAX_MESSAGE_LEN: usize = 256;

/// The result type used throughout the runtime.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The closed taxonomy of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum ErrorKind {
    /// No error.
    None = 0,
    /// An index falls outside of `[0, length)`.
    IndexOutOfBound = 1,
    /// An allocation could not be satisfied.
    AllocFailed = 2,
    /// A class tag is not part of the registry.
    UndefinedClass = 3,
    /// A capacity falls outside of `(0, MAX_CAPACITY]`.
    InvalidCapacity = 4,
    /// A required object is missing or has already been collected.
    UnexpectedNullPointer = 5,
    /// The class of an object does not match what the operation expects.
    InvalidClass = 6,
    /// A quantity constraint on a single object is violated.
    InvalidLength = 7,
    /// A control parameter is the missing sentinel where a real value is required.
    InvalidNa = 8,
    /// A variable frame number is negative.
    InvalidFrame = 9,
    /// A variable is not bound in the requested frame.
    VariableNotFound = 10,
    /// A variable name is empty.
    InvalidVariableName = 11,
    /// The lengths of two operands are not compatible.
    IncompatibleLength = 12,
    /// An attribute name is not present on the object.
    AttributeNotFound = 13,
    /// The backtrace grew deeper than its maximum depth.
    StackOverflow = 14,
}

impl ErrorKind {
    /// Get the numeric code of this kind.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Get the name of this kind, as printed in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::None => "NONE",
            ErrorKind::IndexOutOfBound => "INDEX_OUT_OF_BOUND",
            ErrorKind::AllocFailed => "ALLOC_FAILED",
            ErrorKind::UndefinedClass => "UNDEFINED_CLASS",
            ErrorKind::InvalidCapacity => "INVALID_CAPACITY",
            ErrorKind::UnexpectedNullPointer => "UNEXPECTED_NULL_POINTER",
            ErrorKind::InvalidClass => "INVALID_CLASS",
            ErrorKind::InvalidLength => "INVALID_LENGTH",
            ErrorKind::InvalidNa => "INVALID_NA",
            ErrorKind::InvalidFrame => "INVALID_FRAME",
            ErrorKind::VariableNotFound => "VARIABLE_NOT_FOUND",
            ErrorKind::InvalidVariableName => "INVALID_VARIABLE_NAME",
            ErrorKind::IncompatibleLength => "INCOMPATIBLE_LENGTH",
            ErrorKind::AttributeNotFound => "ATTRIBUTE_NOT_FOUND",
            ErrorKind::StackOverflow => "STACKOVERFLOW",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The call site an error was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// The source file.
    pub file: &'static str,
    /// The enclosing function.
    pub function: &'static str,
    /// The source line.
    pub line: u32,
}

/// An error raised by the runtime.
#[derive(Debug, Clone, thiserror::Error)]
#[error(
    "[E{:03}] Error raised by <{}> at {}:{}: {}",
    .kind.code(),
    .location.function,
    .location.file,
    .location.line,
    .message
)]
pub struct Error {
    kind: ErrorKind,
    message: String,
    location: Location,
    backup: Option<Backtrace>,
}

impl Error {
    /// Create a new error, truncating its message to [`MAX_MESSAGE_LEN`] bytes.
    pub fn new(kind: ErrorKind, message: impl Into<String>, location: Location) -> Self {
        let mut message = message.into();
        if message.len() > MAX_MESSAGE_LEN {
            let mut end = MAX_MESSAGE_LEN;
            while !message.is_char_boundary(end) {
                end -= 1;
            }
            message.truncate(end);
        }
        Self {
            kind,
            message,
            location,
            backup: None,
        }
    }

    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Whether this error is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// The formatted message of this error.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Where this error was raised from.
    pub fn location(&self) -> Location {
        self.location
    }

    /// The backtrace as it was when the error first crossed a traced call.
    pub fn backtrace(&self) -> Option<&Backtrace> {
        self.backup.as_ref()
    }

    /// Snapshot the given backtrace into this error, unless one is already recorded.
    pub fn back_up(&mut self, backtrace: &Backtrace) {
        if self.backup.is_none() {
            self.backup = Some(backtrace.clone());
        }
    }

    /// Print the backed-up backtrace followed by the message, then terminate the process.
    pub fn exit(&self) -> ! {
        if let Some(backtrace) = self.backup.as_ref().filter(|it| it.depth() > 0) {
            print!("{}", backtrace);
        }
        println!("{}", self);
        std::process::exit(1)
    }
}

/// Get the name of the enclosing function, without its module path.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let path = __type_name_of(__here);
        let path = path.strip_suffix("::__here").unwrap_or(path);
        path.rsplit("::")
            .find(|segment| *segment != "{{closure}}")
            .unwrap_or(path)
    }};
}

/// Get the [`Location`](crate::error::Location) of the call site.
#[macro_export]
macro_rules! location {
    () => {
        $crate::error::Location {
            file: file!(),
            function: $crate::function_name!(),
            line: line!(),
        }
    };
}

/// Build an [`Error`](crate::error::Error) of the given kind with a formatted message.
#[macro_export]
macro_rules! pl_error {
    ($kind:expr, $($arg:tt)+) => {
        $crate::error::Error::new($kind, format!($($arg)+), $crate::location!())
    };
}

/// Return early with an error of the given kind.
#[macro_export]
macro_rules! throw {
    ($kind:expr, $($arg:tt)+) => {
        return ::std::result::Result::Err($crate::pl_error!($kind, $($arg)+))
    };
}

/// Return early with an error of the given kind if the condition does not hold.
#[macro_export]
macro_rules! expect {
    ($cond:expr, $kind:expr, $($arg:tt)+) => {
        if !($cond) {
            $crate::throw!($kind, $($arg)+);
        }
    };
}
