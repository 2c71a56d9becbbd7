use pl_core::error::ErrorKind;
use pl_gc::{GcHeap, GcParams, Measure, Measurement, Trace, Tracer};

struct Test {
    value: usize,
}

impl Trace for Test {
    fn trace(&self, _: &mut Tracer) {}
}

impl Measure for Test {
    fn measure(&self) -> Measurement {
        Measurement {
            kind: "TEST",
            length: 1,
            element_size: 0,
            bytes: 0,
        }
    }
}

#[test]
fn lazy_initialization() {
    let mut heap: GcHeap<Test> = GcHeap::new();
    assert!(!heap.status());
    assert!(heap.tracked().is_empty());

    heap.allocate(Test { value: 1 }).unwrap();
    assert!(heap.status());
    assert_eq!(heap.len(), 1);
}

#[test]
fn roots_survive() {
    let mut heap = GcHeap::new();

    let stack: Vec<_> = (3..6)
        .map(|value| heap.allocate(Test { value }).unwrap())
        .collect();
    heap.directly_reachable_many(&stack).unwrap();

    let collection = heap.collect_garbage().unwrap();
    assert_eq!(collection.reachable, 3);
    assert_eq!(collection.swept, 0);
    assert_eq!(heap.len(), 3);

    heap.directly_unreachable(stack[1]).unwrap();
    let collection = heap.collect_garbage().unwrap();
    assert_eq!(collection.swept, 1);
    assert_eq!(heap.len(), 2);

    assert_eq!(heap.get(stack[0]).unwrap().value, 3);
    assert_eq!(heap.get(stack[2]).unwrap().value, 5);
    let error = heap.get(stack[1]).map(|it| it.value).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UnexpectedNullPointer);

    assert_eq!(heap.stats().collections_performed, 2);
    assert_eq!(heap.stats().objects_allocated, 3);
    assert_eq!(heap.stats().objects_swept, 1);
}

#[test]
fn pinning_is_idempotent() {
    let mut heap = GcHeap::new();
    let a = heap.allocate(Test { value: 1 }).unwrap();
    heap.directly_reachable(a).unwrap();
    heap.directly_reachable(a).unwrap();
    assert_eq!(heap.roots(), &[a]);
    assert!(heap.is_directly_reachable(a));

    heap.directly_unreachable(a).unwrap();
    heap.directly_unreachable(a).unwrap();
    assert!(heap.roots().is_empty());
}

#[test]
fn freed_slots_are_reused_with_new_generations() {
    let mut heap = GcHeap::new();
    let old = heap.allocate(Test { value: 1 }).unwrap();
    heap.collect_garbage().unwrap();
    assert!(!heap.contains(old));

    let new = heap.allocate(Test { value: 2 }).unwrap();
    assert_eq!(new.slot(), old.slot());
    assert_ne!(new, old);
    assert!(heap.get(old).is_err());
    assert_eq!(heap.get(new).unwrap().value, 2);
}

#[test]
fn pinning_a_freed_value_fails() {
    let mut heap = GcHeap::new();
    let a = heap.allocate(Test { value: 1 }).unwrap();
    let b = heap.allocate(Test { value: 2 }).unwrap();
    heap.collect_garbage().unwrap();

    let c = heap.allocate(Test { value: 3 }).unwrap();
    let error = heap.directly_reachable_many(&[c, a]).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UnexpectedNullPointer);
    assert!(heap.roots().is_empty());
    assert!(heap.directly_reachable(b).is_err());
}

#[test]
fn allocation_limit() {
    let per_value = std::mem::size_of::<Test>();
    let mut heap = GcHeap::with_params(GcParams {
        max_bytes: Some(per_value * 2),
        ..GcParams::default()
    });
    let a = heap.allocate(Test { value: 1 }).unwrap();
    heap.allocate(Test { value: 2 }).unwrap();

    let error = heap.allocate(Test { value: 3 }).map(|_| ()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::AllocFailed);
    assert_eq!(heap.len(), 2);
    assert_eq!(heap.stats().bytes_allocated, per_value * 2);

    heap.directly_reachable(a).unwrap();
    heap.collect_garbage().unwrap();
    assert_eq!(heap.stats().bytes_allocated, per_value);
    heap.allocate(Test { value: 3 }).unwrap();
}

#[test]
fn kill_resets_everything() {
    let mut heap = GcHeap::new();
    let a = heap.allocate(Test { value: 1 }).unwrap();
    heap.directly_reachable(a).unwrap();

    heap.kill();
    assert!(!heap.status());
    assert_eq!(heap.len(), 0);
    assert!(heap.roots().is_empty());
    assert!(!heap.contains(a));
    assert_eq!(heap.stats().bytes_allocated, 0);

    let b = heap.allocate(Test { value: 2 }).unwrap();
    assert!(heap.status());
    assert_eq!(heap.tracked(), &[b]);
}

#[test]
fn report_lists_every_value() {
    let mut heap = GcHeap::new();
    assert_eq!(heap.report().rows.len(), 0);

    let a = heap.allocate(Test { value: 1 }).unwrap();
    let b = heap.allocate(Test { value: 2 }).unwrap();
    let report = heap.report();
    assert_eq!(report.length, 2);
    assert_eq!(report.capacity, 8);
    assert_eq!(report.rows[0].gc, a);
    assert_eq!(report.rows[1].gc, b);
    assert_eq!(report.rows[0].kind, "TEST");
    assert_eq!(report.total_size, 2 * std::mem::size_of::<Test>());

    let rendered = report.to_string();
    assert!(rendered.starts_with("Object table summary:\n"));
    assert!(rendered.contains("TEST"));
}
