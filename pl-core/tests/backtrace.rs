use pl_core::backtrace::MAX_DEPTH;
use pl_core::error::ErrorKind;
use pl_core::{frame, Backtrace, Frame};

#[test]
fn push_pop_and_lookup() {
    let mut backtrace = Backtrace::new();
    backtrace.push(Frame::new("main.rs", "main", 3)).unwrap();
    backtrace.push(Frame::new("gc.rs", "collect", 42)).unwrap();
    assert_eq!(backtrace.depth(), 2);
    assert_eq!(backtrace.frame(1).unwrap().function, "collect");

    let error = backtrace.frame(2).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::IndexOutOfBound);

    backtrace.pop();
    backtrace.pop();
    backtrace.pop();
    assert_eq!(backtrace.depth(), 0);
}

#[test]
fn overflow() {
    let mut backtrace = Backtrace::new();
    for _ in 0..MAX_DEPTH {
        backtrace.push(frame!("recurse")).unwrap();
    }
    let error = backtrace.push(frame!("recurse")).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::StackOverflow);
    assert_eq!(backtrace.depth(), MAX_DEPTH);
}

#[test]
fn rendering() {
    let mut backtrace = Backtrace::new();
    assert_eq!(backtrace.to_string(), "");

    backtrace.push(Frame::new("main.rs", "main", 3)).unwrap();
    backtrace.push(Frame::new("gc.rs", "collect", 42)).unwrap();
    let expected = "Backtrace - 2 frames in stack:\n  \
                    ║═[1] Calling <collect> from gc.rs:42\n  \
                    ╚═[0] Calling <main>    from main.rs:3\n";
    assert_eq!(backtrace.to_string(), expected);
}
