//!
//! Frame-scoped variable bindings.
//!
//! Bindings live in the collector's heap as three parallel vectors: the frame numbers (ints),
//! the names (a list of char vectors) and the values (a list). A single list holding the three
//! is pinned as a root, which keeps every bound value alive across collections. The table only
//! goes through the object model and the root pinning API of the [`Runtime`].
//!

use pl_core::error::{ErrorKind, Result};
use pl_core::{expect, frame, throw, Class};
use pl_gc::Gc;

use crate::element::INT_NA;
use crate::runtime::Runtime;
use crate::vector::typed;

#[derive(Debug, Clone, Copy)]
struct Bindings {
    table: Gc,
    frames: Gc,
    names: Gc,
    values: Gc,
}

/// A table of variable bindings, bucketed by frame number.
#[derive(Debug, Default)]
pub struct Variables {
    bindings: Option<Bindings>,
}

fn check_frame(frame: i32) -> Result<()> {
    expect!(
        frame >= 0 && frame != INT_NA,
        ErrorKind::InvalidFrame,
        "Invalid frame [{}]!",
        frame
    );
    Ok(())
}

fn check_name(name: &str) -> Result<()> {
    expect!(
        !name.is_empty(),
        ErrorKind::InvalidVariableName,
        "Invalid variable name [{}]!",
        name
    );
    Ok(())
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// The binding vectors, created (again) if they do not exist or were freed.
    fn bindings(&mut self, rt: &mut Runtime) -> Result<Bindings> {
        if let Some(bindings) = self.bindings {
            if rt.heap().is_directly_reachable(bindings.table) {
                return Ok(bindings);
            }
        }
        let bindings = rt.traced(frame!("init_variables"), |rt| {
            let frames = rt.allocate(Class::Int, 1)?;
            let names = rt.allocate(Class::List, 1)?;
            let values = rt.allocate(Class::List, 1)?;
            let table = rt.new_vector(&[Some(frames), Some(names), Some(values)])?;
            rt.directly_reachable(table)?;
            Ok(Bindings {
                table,
                frames,
                names,
                values,
            })
        })?;
        tracing::debug!(table = ?bindings.table, "initialized the variable table");
        self.bindings = Some(bindings);
        Ok(bindings)
    }

    /// The position of the binding of `name` in `frame`.
    fn find(&mut self, rt: &mut Runtime, name: &str, frame: i32) -> Result<Option<usize>> {
        check_frame(frame)?;
        check_name(name)?;
        let bindings = self.bindings(rt)?;
        let frames = typed::<i32>(rt.get(bindings.frames)?)?;
        let names = typed::<Option<Gc>>(rt.get(bindings.names)?)?;
        for (position, (bound_frame, bound_name)) in frames.iter().zip(names).enumerate() {
            if *bound_frame != frame {
                continue;
            }
            if let Some(bound_name) = bound_name {
                if typed::<u8>(rt.get(*bound_name)?)? == name.as_bytes() {
                    return Ok(Some(position));
                }
            }
        }
        Ok(None)
    }

    /// The positions of the bindings whose frame satisfies the predicate.
    fn positions(
        &mut self,
        rt: &mut Runtime,
        predicate: impl Fn(i32) -> bool,
    ) -> Result<(Bindings, Vec<i32>)> {
        let bindings = self.bindings(rt)?;
        let positions = typed::<i32>(rt.get(bindings.frames)?)?
            .iter()
            .enumerate()
            .filter(|(_, frame)| predicate(**frame))
            .map(|(position, _)| position as i32)
            .collect();
        Ok((bindings, positions))
    }

    /// Removes the bindings at the given positions.
    fn remove_positions(rt: &mut Runtime, bindings: Bindings, positions: &[i32]) -> Result<()> {
        if positions.is_empty() {
            return Ok(());
        }
        rt.remove_by_indices(bindings.frames, positions)?;
        rt.remove_by_indices(bindings.names, positions)?;
        rt.remove_by_indices(bindings.values, positions)
    }

    /// The value bound to `name` in `frame`.
    pub fn get(&mut self, rt: &mut Runtime, name: &str, frame: i32) -> Result<Gc> {
        let Some(position) = self.find(rt, name, frame)? else {
            throw!(
                ErrorKind::VariableNotFound,
                "Variable [{}] not found in frame [{}]!",
                name,
                frame
            );
        };
        let bindings = self.bindings(rt)?;
        match rt.extract::<Option<Gc>>(bindings.values, position as i32)? {
            Some(value) => Ok(value),
            None => throw!(
                ErrorKind::VariableNotFound,
                "Variable [{}] not found in frame [{}]!",
                name,
                frame
            ),
        }
    }

    /// Binds `name` to `value` in `frame`, replacing any previous binding.
    pub fn set(&mut self, rt: &mut Runtime, name: &str, value: Gc, frame: i32) -> Result<()> {
        let found = self.find(rt, name, frame)?;
        rt.get(value)?;
        let bindings = self.bindings(rt)?;
        if let Some(position) = found {
            return rt.set(bindings.values, position as i32, Some(value));
        }

        let name = rt.new_string(name)?;
        let lengths = [
            rt.get(bindings.frames)?.length(),
            rt.get(bindings.names)?.length(),
            rt.get(bindings.values)?.length(),
        ];
        rt.try_catch(
            |rt| {
                rt.extend(bindings.frames, frame)?;
                rt.extend(bindings.names, Some(name))?;
                rt.extend(bindings.values, Some(value))
            },
            |rt, error| {
                let lists = [bindings.frames, bindings.names, bindings.values];
                for (list, length) in lists.iter().zip(lengths) {
                    if let Ok(list) = rt.get_mut(*list) {
                        list.set_length(length);
                    }
                }
                Err(error)
            },
        )
    }

    /// Removes the binding of `name` in `frame`. Returns whether there was one.
    pub fn delete(&mut self, rt: &mut Runtime, name: &str, frame: i32) -> Result<bool> {
        let Some(position) = self.find(rt, name, frame)? else {
            return Ok(false);
        };
        let bindings = self.bindings(rt)?;
        Self::remove_positions(rt, bindings, &[position as i32])?;
        Ok(true)
    }

    /// Removes every binding of `frame`.
    pub fn delete_frame(&mut self, rt: &mut Runtime, frame: i32) -> Result<()> {
        check_frame(frame)?;
        let (bindings, positions) = self.positions(rt, |bound| bound == frame)?;
        Self::remove_positions(rt, bindings, &positions)
    }

    /// Removes every binding of the frames above `frame`.
    pub fn delete_frames_greater(&mut self, rt: &mut Runtime, frame: i32) -> Result<()> {
        check_frame(frame)?;
        let (bindings, positions) = self.positions(rt, |bound| bound > frame)?;
        Self::remove_positions(rt, bindings, &positions)
    }

    /// The highest frame holding a binding, or `-1` if there are none.
    pub fn max_frame_number(&mut self, rt: &mut Runtime) -> Result<i32> {
        let bindings = self.bindings(rt)?;
        let frames = typed::<i32>(rt.get(bindings.frames)?)?;
        Ok(frames.iter().copied().max().unwrap_or(-1))
    }

    /// The number of bindings, across all frames.
    pub fn len(&mut self, rt: &mut Runtime) -> Result<usize> {
        let bindings = self.bindings(rt)?;
        Ok(rt.get(bindings.frames)?.length())
    }
}
