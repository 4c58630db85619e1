// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::{Arc, OnceLock};

use deepeq::*;

// Graphs that loop back on themselves are tied through a OnceLock set after
// construction.
#[derive(Debug)]
struct Ring {
    label: String,
    next: OnceLock<Arc<Ring>>,
}

reflect!(Ring { label, next });

fn ring(labels: &[&str]) -> Arc<Ring> {
    let nodes: Vec<Arc<Ring>> = labels
        .iter()
        .map(|label| {
            Arc::new(Ring {
                label: label.to_string(),
                next: OnceLock::new(),
            })
        })
        .collect();
    for (i, node) in nodes.iter().enumerate() {
        let next = Arc::clone(&nodes[(i + 1) % nodes.len()]);
        assert!(node.next.set(next).is_ok());
    }
    Arc::clone(&nodes[0])
}

fn detecting() -> Comparer {
    Comparer::with_config(CompareConfig {
        detect_cycles: true,
        ..CompareConfig::default()
    })
}

#[test]
fn equal_cycles_terminate() {
    let comparer = detecting();
    assert!(comparer.deep_eq(&*ring(&["a", "b", "c"]), &*ring(&["a", "b", "c"])));

    // A node against itself.
    let single = ring(&["a"]);
    assert!(comparer.deep_eq(&*single, &*single));
}

#[test]
fn differing_cycles_are_detected() {
    let comparer = detecting();
    assert!(!comparer.deep_eq(&*ring(&["a", "b", "c"]), &*ring(&["a", "x", "c"])));
    assert!(!comparer.deep_eq(&*ring(&["a", "b", "c"]), &*ring(&["a", "b", "z"])));
}

#[test]
fn cycles_of_different_length() {
    let comparer = detecting();
    // a -> b -> a ... against a -> b -> a -> b ...: the walk revisits pairs
    // only after the labels have all agreed.
    assert!(comparer.deep_eq(&*ring(&["a", "b"]), &*ring(&["a", "b", "a", "b"])));
    assert!(!comparer.deep_eq(&*ring(&["a", "b"]), &*ring(&["a", "b", "c"])));
}

#[test]
fn open_chains_need_no_detection() {
    let tail = Arc::new(Ring {
        label: "end".to_string(),
        next: OnceLock::new(),
    });
    let head = |label: &str| Ring {
        label: label.to_string(),
        next: OnceLock::from(Arc::clone(&tail)),
    };

    let comparer = Comparer::with_config(CompareConfig::default());
    assert!(comparer.deep_eq(&head("start"), &head("start")));
    assert!(!comparer.deep_eq(&head("start"), &head("begin")));
}

#[test]
fn detection_is_read_per_call() {
    let mut comparer = Comparer::with_config(CompareConfig::default());
    let a = ring(&["a", "b"]);
    let b = ring(&["a", "b"]);

    // Build the comparator without detection, then enable it for the call.
    let _ = comparer.comparator::<Ring>();
    comparer.set_config(Some(CompareConfig {
        detect_cycles: true,
        ..CompareConfig::default()
    }));
    assert!(comparer.deep_eq(&*a, &*b));
}
