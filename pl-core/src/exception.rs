//!
//! Exception scopes.
//!
//! A scope runs a body against some context. If the body fails, the handler receives the
//! context back together with the error, so it can restore whatever the body left behind.
//! A handler returning `Err` rethrows (the message is left untouched), a handler returning `Ok`
//! clears the error.
//!

use crate::error::{Error, Result};

/// Run `body`, handing any error it raises to `handler`.
pub fn try_catch<C, T, B, H>(ctx: &mut C, body: B, handler: H) -> Result<T>
where
    C: ?Sized,
    B: FnOnce(&mut C) -> Result<T>,
    H: FnOnce(&mut C, Error) -> Result<T>,
{
    match body(ctx) {
        Ok(value) => Ok(value),
        Err(error) => {
            tracing::debug!(kind = %error.kind(), "caught error");
            handler(ctx, error)
        }
    }
}

/// Unwrap a result, or report the error and terminate the process.
///
/// This is the handler of last resort, used where no scope is active.
pub fn unwrap_or_exit<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(error) => error.exit(),
    }
}
