//! Property tests over the model and the engine.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use proptest::prelude::*;
use structviz::engine::{BuildInput, Request, StructureEngine, StructureKind};
use structviz::model::{Flavor, HuffmanForest, SearchTree, Side, Value};
use structviz::options::Options;
use structviz::record::Record;
use structviz::script::run_script;

fn values() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(-500i64..500, 0..60)
}

fn weights() -> impl Strategy<Value = Vec<(String, u64)>> {
    prop::collection::vec(1u64..1000, 1..24).prop_map(|ws| {
        ws.into_iter()
            .enumerate()
            .map(|(i, w)| (format!("s{i}"), w))
            .collect()
    })
}

/// Animated operations, each with the script that sets up its structure.
fn cancel_cases() -> Vec<(StructureKind, &'static str, Request)> {
    vec![
        (StructureKind::Stack, "BUILD: 1, 2, 3", Request::Push(9)),
        (StructureKind::Stack, "BUILD: 1, 2, 3", Request::Pop),
        (
            StructureKind::Sequence,
            "BUILD: 10, 20, 30",
            Request::Insert { value: 25, index: Some(1) },
        ),
        (StructureKind::Sequence, "BUILD: 10, 20, 30", Request::Remove { index: 0 }),
        (
            StructureKind::LinkedList,
            "BUILD: 1, 2, 3",
            Request::Insert { value: 9, index: Some(1) },
        ),
        (StructureKind::LinkedList, "BUILD: 1, 2, 3", Request::Remove { index: 1 }),
        (StructureKind::Bst, "BUILD: 50, 30, 70, 20, 40", Request::Delete(30)),
        (
            StructureKind::Bst,
            "BUILD: 50, 30, 70, 20, 40",
            Request::Insert { value: 60, index: None },
        ),
        (StructureKind::Avl, "BUILD: 10, 20, 30", Request::Delete(10)),
        (
            StructureKind::BinaryTree,
            "BUILD: 1, 2, 3, 4, 5",
            Request::Remove { index: 1 },
        ),
        (
            StructureKind::BinaryTree,
            "BUILD: 1, 2, 3",
            Request::InsertChild { parent_index: 2, value: 9, side: Side::Left },
        ),
        (
            StructureKind::Huffman,
            "",
            Request::Build(BuildInput::Weights(vec![
                ("a".to_owned(), 5),
                ("b".to_owned(), 2),
                ("c".to_owned(), 1),
                ("d".to_owned(), 1),
            ])),
        ),
    ]
}

fn set_up(kind: StructureKind, script: &str) -> StructureEngine {
    let mut engine = StructureEngine::new(kind, Options::default());
    assert!(run_script(&mut engine, script).is_success());
    engine
}

fn sorted_unique(mut v: Vec<Value>) -> Vec<Value> {
    v.sort_unstable();
    v.dedup();
    v
}

/// Cost of an optimal prefix code: the sum of every merged weight.
fn optimal_cost(weights: &[(String, u64)]) -> u64 {
    if weights.len() < 2 {
        return weights.iter().map(|(_, w)| *w).sum();
    }
    let mut heap: BinaryHeap<Reverse<u64>> =
        weights.iter().map(|(_, w)| Reverse(*w)).collect();
    let mut cost = 0;
    while heap.len() > 1 {
        let Reverse(a) = heap.pop().unwrap();
        let Reverse(b) = heap.pop().unwrap();
        cost += a + b;
        heap.push(Reverse(a + b));
    }
    cost
}

proptest! {
    #[test]
    fn bst_in_order_is_sorted_set(inserts in values(), deletes in values()) {
        let mut tree = SearchTree::new(Flavor::Bst);
        for v in &inserts {
            let _ = tree.insert(*v);
        }
        for v in &deletes {
            let _ = tree.delete(*v);
        }
        let expected: Vec<Value> = sorted_unique(inserts)
            .into_iter()
            .filter(|v| !deletes.contains(v))
            .collect();
        prop_assert_eq!(tree.in_order_values(), expected.clone());
        prop_assert_eq!(tree.len(), expected.len());
    }

    #[test]
    fn avl_stays_balanced(inserts in values(), deletes in values()) {
        let mut tree = SearchTree::new(Flavor::Avl);
        for v in &inserts {
            let _ = tree.insert(*v);
            prop_assert!(tree.is_balanced());
        }
        for v in &deletes {
            let _ = tree.delete(*v);
            prop_assert!(tree.is_balanced());
        }
        let n = tree.len();
        if n > 0 {
            let height = tree.arena().height(tree.root());
            // AVL height bound: h < 1.45 log2(n + 2)
            let bound = 1.45 * ((n + 2) as f64).log2();
            prop_assert!(f64::from(height) < bound + 1.0);
        }
    }

    #[test]
    fn huffman_codes_are_prefix_free_and_optimal(ws in weights()) {
        let mut forest = HuffmanForest::from_weights(&ws).unwrap();
        let merges = forest.reduce();
        prop_assert_eq!(merges.len(), ws.len() - 1);
        prop_assert!(forest.is_reduced());
        prop_assert_eq!(forest.root_weight(), ws.iter().map(|(_, w)| *w).sum::<u64>());

        let codes = forest.codes();
        prop_assert_eq!(codes.len(), ws.len());
        for (i, (_, a)) in codes.iter().enumerate() {
            for (j, (_, b)) in codes.iter().enumerate() {
                if i != j {
                    prop_assert!(!b.starts_with(a.as_str()), "{} prefixes {}", a, b);
                }
            }
        }
        if ws.len() > 1 {
            prop_assert_eq!(forest.weighted_path_length(), optimal_cost(&ws));
        }
    }

    #[test]
    fn search_tree_records_round_trip(inserts in values(), avl in any::<bool>()) {
        let kind = if avl { StructureKind::Avl } else { StructureKind::Bst };
        let mut engine = StructureEngine::new(kind, Options::immediate());
        let _ = engine.start(Request::Build(BuildInput::Values(inserts))).unwrap();
        let record = engine.to_record();
        let json = record.to_json().unwrap();
        let loaded = Record::from_json(&json).unwrap();
        prop_assert_eq!(&loaded, &record);

        let mut other = StructureEngine::new(StructureKind::Stack, Options::immediate());
        other.load_record(loaded).unwrap();
        prop_assert_eq!(other.kind(), kind);
        prop_assert_eq!(other.structure().values(), engine.structure().values());
        prop_assert_eq!(other.to_record(), record);
    }

    #[test]
    fn linear_and_plain_tree_records_round_trip(
        items in values(),
        kind in prop::sample::select(vec![
            StructureKind::Stack,
            StructureKind::Sequence,
            StructureKind::LinkedList,
            StructureKind::BinaryTree,
        ]),
    ) {
        let mut engine = StructureEngine::new(kind, Options::immediate());
        let _ = engine.start(Request::Build(BuildInput::Values(items))).unwrap();
        let record = engine.to_record();
        let loaded = Record::from_json(&record.to_json().unwrap()).unwrap();
        prop_assert_eq!(&loaded, &record);

        let mut other = StructureEngine::new(StructureKind::Huffman, Options::immediate());
        other.load_record(loaded).unwrap();
        prop_assert_eq!(other.kind(), kind);
        prop_assert_eq!(other.structure().values(), engine.structure().values());
        prop_assert_eq!(other.to_record(), record);
    }

    #[test]
    fn cancel_leaves_model_before_or_after_commit(
        case in 0usize..12,
        ticks in 0usize..240,
    ) {
        let (kind, script, request) = cancel_cases().swap_remove(case);

        let mut reference = set_up(kind, script);
        let before = reference.to_record();
        prop_assert_eq!(reference.start(request.clone()).unwrap(), None);
        prop_assert!(reference.finish().is_some());
        let committed = reference.to_record();
        prop_assert_ne!(&committed, &before);

        let mut engine = set_up(kind, script);
        prop_assert_eq!(engine.start(request.clone()).unwrap(), None);
        for _ in 0..ticks {
            engine.tick(1.0 / 60.0);
        }
        let _ = engine.cancel();
        engine.tick(1.0 / 60.0);
        prop_assert!(!engine.is_animating());
        let after = engine.to_record();
        prop_assert!(after == before || after == committed, "partial model {:?}", after);

        // The engine accepts new work once the cancelled operation is gone.
        engine.load_record(before.clone()).unwrap();
        prop_assert_eq!(engine.start(request).unwrap(), None);
        prop_assert_eq!(engine.finish().map(|_| engine.to_record()), Some(committed));
    }

    #[test]
    fn cancelling_mid_insert_keeps_model(
        base in prop::collection::vec(0i64..100, 1..20),
        value in 100i64..200,
        ticks in 1usize..40,
    ) {
        let mut engine = StructureEngine::new(StructureKind::Avl, Options::default());
        let _ = engine.start(Request::Build(BuildInput::Values(base))).unwrap();
        let before = engine.structure().values();
        prop_assert_eq!(engine.start(Request::Insert { value, index: None }).unwrap(), None);
        for _ in 0..ticks {
            engine.tick(1.0 / 60.0);
        }
        let committed = engine.structure().values().contains(&value);
        let _ = engine.cancel();
        engine.tick(1.0 / 60.0);
        prop_assert!(!engine.is_animating());
        let after = engine.structure().values();
        if committed {
            let mut expected = before;
            expected.push(value);
            expected.sort_unstable();
            prop_assert_eq!(after, expected);
        } else {
            prop_assert_eq!(after, before);
        }
        prop_assert!(engine.structure().as_search_tree().unwrap().is_balanced());
    }
}

#[test]
fn stale_continuation_does_not_resume_huffman_build() {
    let mut engine = StructureEngine::new(StructureKind::Huffman, Options::default());
    let weights = vec![
        ("a".to_owned(), 5),
        ("b".to_owned(), 2),
        ("c".to_owned(), 1),
    ];
    assert_eq!(
        engine.start(Request::Build(BuildInput::Weights(weights))).unwrap(),
        None
    );
    for _ in 0..10_000 {
        if engine.pending_continuations() > 0 {
            break;
        }
        engine.tick(1.0 / 60.0);
    }
    assert!(engine.pending_continuations() > 0);
    let generation = engine.generation();
    assert!(engine.cancel());
    assert_eq!(engine.generation(), generation + 1);

    for _ in 0..600 {
        engine.tick(1.0 / 60.0);
    }
    assert!(!engine.is_animating());
    assert_eq!(engine.pending_continuations(), 0);
    assert!(engine.structure().is_empty());
    assert_eq!(engine.last_outcome(), None);
}
