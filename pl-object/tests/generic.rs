use pl_object::{Class, ErrorKind, Gc, Runtime, INT_NA};

fn int(rt: &mut Runtime, value: i32) -> Gc {
    rt.new_vector(&[value]).unwrap()
}

#[test]
fn new_from_control_objects() {
    let mut rt = Runtime::new();
    let class = int(&mut rt, Class::Double.tag());
    let capacity = int(&mut rt, 3);
    let x = rt.new_with(class, capacity).unwrap();
    assert_eq!(rt.get(x).unwrap().class(), Class::Double);
    assert_eq!(rt.get(x).unwrap().capacity(), 3);

    let bad_tag = int(&mut rt, 42);
    let error = rt.new_with(bad_tag, capacity).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UndefinedClass);

    let missing = int(&mut rt, INT_NA);
    let error = rt.new_with(class, missing).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidNa);

    let zero = int(&mut rt, 0);
    let error = rt.new_with(class, zero).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidCapacity);

    let pair = rt.new_vector(&[1i32, 2]).unwrap();
    let error = rt.new_with(pair, capacity).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidLength);

    let long = rt.new_vector(&[3i64]).unwrap();
    let error = rt.new_with(class, long).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidClass);
}

#[test]
fn reserve_from_a_control_object() {
    let mut rt = Runtime::new();
    let x = rt.allocate(Class::Int, 2).unwrap();
    let capacity = int(&mut rt, 3);
    rt.reserve_with(x, capacity).unwrap();
    assert_eq!(rt.get(x).unwrap().capacity(), 4);
}

#[test]
fn set_and_extend_by_objects() {
    let mut rt = Runtime::new();
    let x = rt.new_vector(&[0i32, 0, 0]).unwrap();
    let indices = rt.new_vector(&[2i32, 0]).unwrap();
    let items = rt.new_vector(&[7i32, 8]).unwrap();
    rt.set_with(x, indices, items).unwrap();
    assert_eq!(rt.to_vec::<i32>(x).unwrap(), vec![8, 0, 7]);

    rt.extend_with(x, items).unwrap();
    assert_eq!(rt.to_vec::<i32>(x).unwrap(), vec![8, 0, 7, 7, 8]);

    rt.extend_with(x, x).unwrap();
    assert_eq!(rt.get(x).unwrap().length(), 10);

    let doubles = rt.new_vector(&[1.0f64, 2.0]).unwrap();
    let error = rt.set_with(x, indices, doubles).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidClass);
    let error = rt.extend_with(x, doubles).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidClass);
    assert_eq!(rt.get(x).unwrap().length(), 10);
}

#[test]
fn extract_from_vectors_and_lists() {
    let mut rt = Runtime::new();
    let x = rt.new_string("xyz").unwrap();
    let l = rt.allocate(Class::List, 1).unwrap();
    rt.append(l, x).unwrap();
    rt.extend::<Option<Gc>>(l, None).unwrap();

    let one = int(&mut rt, 1);
    let zero = int(&mut rt, 0);
    let y = rt.extract_with(x, one).unwrap();
    assert_eq!(rt.to_vec::<u8>(y).unwrap(), b"y".to_vec());
    assert_eq!(rt.extract_with(l, zero).unwrap(), x);

    let error = rt.extract_with(l, one).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UnexpectedNullPointer);
    let three = int(&mut rt, 3);
    let error = rt.extract_with(x, three).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::IndexOutOfBound);
    let missing = int(&mut rt, INT_NA);
    let error = rt.extract_with(x, missing).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidNa);
}

#[test]
fn append_needs_a_list_and_a_live_item() {
    let mut rt = Runtime::new();
    let x = rt.new_vector(&[1i32]).unwrap();
    let item = rt.new_vector(&[2i32]).unwrap();
    let error = rt.append(x, item).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidClass);

    let l = rt.allocate(Class::List, 1).unwrap();
    rt.directly_reachable(l).unwrap();
    rt.collect().unwrap();
    let error = rt.append(l, item).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UnexpectedNullPointer);
    assert_eq!(rt.get(l).unwrap().length(), 0);
}

#[test]
fn subsets_by_objects() {
    let mut rt = Runtime::new();
    let x = rt.new_vector(&[1.5f64, 2.5, 3.5]).unwrap();
    let indices = rt.new_vector(&[2i32, 0]).unwrap();

    let y = rt.subset_with(x, indices).unwrap();
    assert_eq!(rt.to_vec::<f64>(y).unwrap(), vec![3.5, 1.5]);
    let y = rt.subset_exclude_with(x, indices).unwrap();
    assert_eq!(rt.to_vec::<f64>(y).unwrap(), vec![2.5]);

    let error = rt.subset_with(x, x).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidClass);
}
