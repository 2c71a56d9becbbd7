use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pl_gc::{Gc, GcHeap, Measure, Measurement, Trace, Tracer};

struct Node {
    edges: Vec<Gc>,
}

impl Trace for Node {
    fn trace(&self, tracer: &mut Tracer) {
        self.edges.trace(tracer);
    }
}

impl Measure for Node {
    fn measure(&self) -> Measurement {
        Measurement {
            kind: "NODE",
            length: self.edges.len(),
            element_size: std::mem::size_of::<Gc>(),
            bytes: self.edges.len() * std::mem::size_of::<Gc>(),
        }
    }
}

/// Computes the closure of `roots` over the adjacency list, independently of the heap.
fn expected_closure(adjacency: &[Vec<usize>], roots: &[usize]) -> BTreeSet<usize> {
    let mut seen = BTreeSet::new();
    let mut stack = roots.to_vec();
    while let Some(node) = stack.pop() {
        if seen.insert(node) {
            stack.extend(adjacency[node].iter().copied());
        }
    }
    seen
}

#[test]
fn random_graphs() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for round in 0..20 {
        let mut heap = GcHeap::new();
        let count = rng.gen_range(1..200);
        let handles: Vec<Gc> = (0..count)
            .map(|_| heap.allocate(Node { edges: Vec::new() }).unwrap())
            .collect();

        let mut adjacency = vec![Vec::new(); count];
        for (from, edges) in adjacency.iter_mut().enumerate() {
            for _ in 0..rng.gen_range(0..4) {
                let to = rng.gen_range(0..count);
                edges.push(to);
                heap.get_mut(handles[from]).unwrap().edges.push(handles[to]);
            }
        }

        let roots: Vec<usize> = (0..count).filter(|_| rng.gen_bool(0.05)).collect();
        let pinned: Vec<Gc> = roots.iter().map(|it| handles[*it]).collect();
        heap.directly_reachable_many(&pinned).unwrap();

        let expected = expected_closure(&adjacency, &roots);
        let collection = heap.collect_garbage().unwrap();
        assert_eq!(collection.reachable, expected.len(), "round {}", round);
        assert_eq!(collection.swept, count - expected.len(), "round {}", round);
        for (index, gc) in handles.iter().enumerate() {
            assert_eq!(heap.contains(*gc), expected.contains(&index), "round {}", round);
        }
        assert!(heap.tracked().windows(2).all(|pair| pair[0] < pair[1]));

        heap.directly_unreachable_many(&pinned).unwrap();
        heap.collect_garbage().unwrap();
        assert!(heap.is_empty());
    }
}
