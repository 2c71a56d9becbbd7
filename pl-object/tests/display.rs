use pl_object::{Class, External, Gc, Runtime, DOUBLE_NA, INT_NA, LONG_NA};

fn render(rt: &Runtime, x: Gc) -> String {
    rt.display(x).unwrap().to_string()
}

#[test]
fn primitive_classes() {
    let mut rt = Runtime::new();
    let chars = rt.new_string("ab").unwrap();
    let ints = rt.new_vector(&[1i32, INT_NA, -3]).unwrap();
    let longs = rt.new_vector(&[1i64, LONG_NA]).unwrap();
    let doubles = rt.new_vector(&[1.5f64, DOUBLE_NA, 2.0]).unwrap();

    assert_eq!(render(&rt, chars), "['a', 'b']");
    assert_eq!(render(&rt, ints), "[1, NA, -3]");
    assert_eq!(render(&rt, longs), "[1L, NA]");
    assert_eq!(render(&rt, doubles), "[1.50, NA, 2.00]");
}

#[test]
fn references() {
    let mut rt = Runtime::new();
    let ints = rt.new_vector(&[1i32]).unwrap();
    let chars = rt.new_string("a").unwrap();
    let list = rt.new_vector(&[Some(ints), None, Some(chars)]).unwrap();
    assert_eq!(render(&rt, list), "[<INT>, NA, <CHAR>]");

    let externals = rt
        .new_vector(&[External::new(0x10), External::new(0)])
        .unwrap();
    assert_eq!(render(&rt, externals), "[<0x10>, NA]");
}

#[test]
fn empty_objects() {
    let mut rt = Runtime::new();
    let x = rt.allocate(Class::Double, 4).unwrap();
    assert_eq!(render(&rt, x), "[]");
    assert!(rt.print(x).is_ok());
}
