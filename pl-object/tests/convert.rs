use pl_object::{Class, ErrorKind, Runtime, CHAR_NA, DOUBLE_NA, INT_NA, LONG_NA};

#[test]
fn widening() {
    let mut rt = Runtime::new();
    let x = rt.new_vector(&[1i32, -7, INT_NA]).unwrap();

    let longs = rt.as_long(x).unwrap();
    assert_eq!(rt.get(longs).unwrap().class(), Class::Long);
    assert_eq!(rt.to_vec::<i64>(longs).unwrap(), vec![1, -7, LONG_NA]);

    let doubles = rt.as_double(x).unwrap();
    let doubles = rt.to_vec::<f64>(doubles).unwrap();
    assert_eq!(&doubles[..2], &[1.0, -7.0]);
    assert!(doubles[2].is_nan());
}

#[test]
fn narrowing_maps_out_of_range_to_missing() {
    let mut rt = Runtime::new();
    let x = rt.new_vector(&[5i64, 1 << 40, -1]).unwrap();
    let ints = rt.as_int(x).unwrap();
    assert_eq!(rt.to_vec::<i32>(ints).unwrap(), vec![5, INT_NA, -1]);

    let chars = rt.as_char(x).unwrap();
    assert_eq!(rt.to_vec::<u8>(chars).unwrap(), vec![5, CHAR_NA, CHAR_NA]);
}

#[test]
fn doubles_truncate() {
    let mut rt = Runtime::new();
    let x = rt.new_vector(&[2.7f64, -2.7, DOUBLE_NA, 1e300]).unwrap();
    let ints = rt.as_int(x).unwrap();
    assert_eq!(rt.to_vec::<i32>(ints).unwrap(), vec![2, -2, INT_NA, INT_NA]);
}

#[test]
fn chars_convert_to_their_codes() {
    let mut rt = Runtime::new();
    let x = rt.new_string("AZ").unwrap();
    let ints = rt.as_int(x).unwrap();
    assert_eq!(rt.to_vec::<i32>(ints).unwrap(), vec![65, 90]);

    let back = rt.as_char(ints).unwrap();
    assert_eq!(rt.to_vec::<u8>(back).unwrap(), b"AZ".to_vec());
}

#[test]
fn conversion_leaves_the_source_alone() {
    let mut rt = Runtime::new();
    let x = rt.new_vector(&[1.5f64]).unwrap();
    let y = rt.as_double(x).unwrap();
    assert_ne!(x, y);
    assert_eq!(rt.to_vec::<f64>(y).unwrap(), vec![1.5]);
}

#[test]
fn lists_do_not_convert() {
    let mut rt = Runtime::new();
    let x = rt.allocate(Class::List, 1).unwrap();
    let tracked = rt.tracked();
    let error = rt.as_int(x).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidClass);

    let y = rt.allocate(Class::External, 1).unwrap();
    let error = rt.as_double(y).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidClass);
    assert_eq!(rt.tracked(), tracked + 1);
}
