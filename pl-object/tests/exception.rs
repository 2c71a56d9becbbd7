use pl_core::{frame, throw};
use pl_object::{Class, ErrorKind, Result, Runtime};

fn functions(error: &pl_object::Error) -> Vec<&'static str> {
    error
        .backtrace()
        .map(|backtrace| backtrace.frames().iter().map(|it| it.function).collect())
        .unwrap_or_default()
}

#[test]
fn errors_carry_the_innermost_backtrace() {
    let mut rt = Runtime::new();
    let result: Result<()> = rt.traced(frame!("outer"), |rt| {
        rt.traced(frame!("inner"), |_| {
            throw!(ErrorKind::InvalidLength, "Nothing to see here!")
        })
    });
    let error = result.unwrap_err();
    assert_eq!(functions(&error), vec!["outer", "inner"]);
    assert_eq!(rt.backtrace().depth(), 0);
}

#[test]
fn runtime_operations_record_their_frames() {
    let mut rt = Runtime::new();
    let x = rt.new_vector(&[1i32, 2]).unwrap();
    let in_use = rt.heap().stats().bytes_allocated;
    rt.params_mut().max_bytes = Some(in_use);

    let error = rt.extend(x, 3).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::AllocFailed);
    assert_eq!(functions(&error), vec!["extend", "reserve", "grow_to"]);
    assert_eq!(rt.backtrace().depth(), 0);
}

#[test]
fn messages_name_the_raising_function() {
    let mut rt = Runtime::new();
    let x = rt.new_vector(&[1i32]).unwrap();
    let error = rt.set(x, 0, 1.0f64).unwrap_err();
    let rendered = error.to_string();
    assert!(rendered.starts_with("[E006] Error raised by <typed> at "));
    assert!(rendered.ends_with("Expect an object of class [DOUBLE], got [INT]!"));
}

#[test]
fn runaway_recursion_overflows_the_stack() {
    fn recurse(rt: &mut Runtime, depth: usize) -> Result<usize> {
        rt.traced(frame!("recurse"), |rt| recurse(rt, depth + 1))
    }

    let mut rt = Runtime::new();
    let error = recurse(&mut rt, 0).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::StackOverflow);
    assert_eq!(
        error.backtrace().map(|it| it.depth()),
        Some(pl_core::backtrace::MAX_DEPTH)
    );
    assert_eq!(rt.backtrace().depth(), 0);
    assert!(rt.allocate(Class::Int, 1).is_ok());
}

#[test]
fn handlers_restore_and_clear() {
    let mut rt = Runtime::new();
    let x = rt.new_vector(&[1i32, 2, 3]).unwrap();

    let length = rt
        .try_catch(
            |rt| {
                rt.remove(x, 0, 0)?;
                rt.remove(x, 5, 5)?;
                Ok(0)
            },
            |rt, error| {
                assert!(error.is(ErrorKind::IndexOutOfBound));
                Ok(rt.get(x)?.length())
            },
        )
        .unwrap();
    assert_eq!(length, 2);

    let error = rt
        .try_catch(|rt| rt.extract::<i32>(x, 9), |_, error| Err(error))
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::IndexOutOfBound);
}
