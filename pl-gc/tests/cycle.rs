use pl_gc::{Gc, GcHeap, Measure, Measurement, Trace, Tracer};

struct Node {
    id: usize,
    edges: Vec<Gc>,
    attribute: Option<Gc>,
}

impl Node {
    fn new(id: usize) -> Self {
        Self {
            id,
            edges: Vec::new(),
            attribute: None,
        }
    }
}

impl Trace for Node {
    fn trace(&self, tracer: &mut Tracer) {
        self.edges.trace(tracer);
        self.attribute.trace(tracer);
    }
}

impl Measure for Node {
    fn measure(&self) -> Measurement {
        Measurement {
            kind: "NODE",
            length: self.edges.len(),
            element_size: std::mem::size_of::<Gc>(),
            bytes: self.edges.capacity() * std::mem::size_of::<Gc>(),
        }
    }
}

fn link(heap: &mut GcHeap<Node>, from: Gc, to: Gc) {
    heap.get_mut(from).unwrap().edges.push(to);
}

#[test]
fn cycles_are_collected() {
    let mut heap = GcHeap::new();

    let a = heap.allocate(Node::new(1)).unwrap();
    let b = heap.allocate(Node::new(2)).unwrap();
    link(&mut heap, a, b);
    link(&mut heap, b, a);

    heap.directly_reachable(a).unwrap();
    let collection = heap.collect_garbage().unwrap();
    assert_eq!(collection.reachable, 2);
    assert_eq!(heap.get(b).unwrap().id, 2);

    heap.directly_unreachable(a).unwrap();
    let collection = heap.collect_garbage().unwrap();
    assert_eq!(collection.swept, 2);
    assert!(heap.is_empty());
}

#[test]
fn list_keeps_its_element_alive() {
    let mut heap = GcHeap::new();

    let element = heap.allocate(Node::new(1)).unwrap();
    let list = heap.allocate(Node::new(2)).unwrap();
    link(&mut heap, list, element);

    heap.directly_reachable(list).unwrap();
    heap.collect_garbage().unwrap();
    assert!(heap.contains(element));
    assert!(heap.contains(list));

    heap.directly_unreachable(list).unwrap();
    heap.collect_garbage().unwrap();
    assert!(!heap.contains(element));
    assert!(!heap.contains(list));
}

#[test]
fn attributes_are_edges() {
    let mut heap = GcHeap::new();

    let owner = heap.allocate(Node::new(1)).unwrap();
    let attribute = heap.allocate(Node::new(2)).unwrap();
    let unrelated = heap.allocate(Node::new(3)).unwrap();
    heap.get_mut(owner).unwrap().attribute = Some(attribute);

    heap.directly_reachable(owner).unwrap();
    let collection = heap.collect_garbage().unwrap();
    assert_eq!(collection.reachable, 2);
    assert!(heap.contains(attribute));
    assert!(!heap.contains(unrelated));
}

#[test]
fn shared_and_self_references_are_traced_once() {
    let mut heap = GcHeap::new();

    let shared = heap.allocate(Node::new(0)).unwrap();
    let root = heap.allocate(Node::new(1)).unwrap();
    link(&mut heap, root, root);
    for _ in 0..4 {
        link(&mut heap, root, shared);
    }

    heap.directly_reachable(root).unwrap();
    let collection = heap.collect_garbage().unwrap();
    assert_eq!(collection.reachable, 2);
    assert_eq!(heap.tracked().len(), 2);
}

#[test]
fn dangling_edges_are_skipped() {
    let mut heap = GcHeap::new();

    let doomed = heap.allocate(Node::new(0)).unwrap();
    heap.collect_garbage().unwrap();
    assert!(!heap.contains(doomed));

    let root = heap.allocate(Node::new(1)).unwrap();
    let reused = heap.allocate(Node::new(2)).unwrap();
    link(&mut heap, root, doomed);

    heap.directly_reachable(root).unwrap();
    let collection = heap.collect_garbage().unwrap();
    assert_eq!(collection.reachable, 1);
    assert!(!heap.contains(reused));
}
