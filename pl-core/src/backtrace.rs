//!
//! The call backtrace.
//!
//! Traced calls push a [`Frame`] on entry and pop it on exit. The stack is bounded, pushing
//! past [`MAX_DEPTH`] frames raises a `STACKOVERFLOW` error.
//!

use std::fmt;

use crate::error::{ErrorKind, Result};

/// The maximum number of frames in a backtrace.
pub const MAX_DEPTH: usize = 256;

/// A recorded call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
    /// The source file.
    pub file: &'static str,
    /// The called function.
    pub function: &'static str,
    /// The source line of the call.
    pub line: u32,
}

impl Frame {
    /// Create a new frame.
    pub const fn new(file: &'static str, function: &'static str, line: u32) -> Self {
        Self {
            file,
            function,
            line,
        }
    }
}

/// Build a [`Frame`](crate::backtrace::Frame) for a call to `function` made at the call site.
#[macro_export]
macro_rules! frame {
    ($function:expr) => {
        $crate::backtrace::Frame::new(file!(), $function, line!())
    };
}

/// A bounded stack of call frames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Backtrace {
    frames: Vec<Frame>,
}

impl Backtrace {
    /// Create an empty backtrace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a frame onto the stack.
    pub fn push(&mut self, frame: Frame) -> Result<()> {
        crate::expect!(
            self.frames.len() < MAX_DEPTH,
            ErrorKind::StackOverflow,
            "Stackoverflow! Depth > [{}].",
            MAX_DEPTH
        );
        self.frames.push(frame);
        Ok(())
    }

    /// Pop the innermost frame, if any.
    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// The current number of frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Get the frame at the given depth (0 being the outermost call).
    pub fn frame(&self, depth: usize) -> Result<Frame> {
        match self.frames.get(depth) {
            Some(frame) => Ok(*frame),
            None => crate::throw!(
                ErrorKind::IndexOutOfBound,
                "Index [{}] out of bound [0, {})!",
                depth,
                self.frames.len()
            ),
        }
    }

    /// All frames, outermost first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Print the backtrace to the standard output.
    pub fn print(&self) {
        print!("{}", self);
    }
}

impl fmt::Display for Backtrace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "Backtrace - {} frames in stack:", self.frames.len())?;
        let width = self
            .frames
            .iter()
            .map(|frame| frame.function.len())
            .max()
            .unwrap_or(0);
        for (depth, frame) in self.frames.iter().enumerate().rev() {
            let branch = if depth != 0 { "  ║═" } else { "  ╚═" };
            let padding = width - frame.function.len();
            writeln!(
                f,
                "{}[{}] Calling <{}>{:padding$} from {}:{}",
                branch,
                depth,
                frame.function,
                "",
                frame.file,
                frame.line,
                padding = padding,
            )?;
        }
        Ok(())
    }
}
