//! End-to-end scenarios driven through scripts and the tick loop.

use structviz::engine::{
    BuildInput, Outcome, Request, RunState, StructureEngine, StructureKind,
};
use structviz::error::StructvizError;
use structviz::options::Options;
use structviz::record::Record;
use structviz::script::{run_script, ScriptRunner};

const DT: f32 = 1.0 / 60.0;

/// Tick until idle, returning the distinct phases seen in order.
fn play(engine: &mut StructureEngine) -> Vec<&'static str> {
    let mut phases: Vec<&'static str> = Vec::new();
    for _ in 0..100_000 {
        if let Some(view) = engine.op_view() {
            if phases.last() != Some(&view.phase) {
                phases.push(view.phase);
            }
        }
        if !engine.is_animating() {
            return phases;
        }
        engine.tick(DT);
    }
    panic!("operation never settled; phases so far: {phases:?}");
}

fn run(engine: &mut StructureEngine, text: &str) -> ScriptRunner {
    let mut runner = ScriptRunner::new();
    runner.load(text, engine);
    let mut frames = 0;
    while runner.tick(engine, DT) {
        frames += 1;
        assert!(frames < 100_000, "script never settled");
    }
    runner
}

#[test]
fn animated_sequence_insert() {
    let mut engine = StructureEngine::new(StructureKind::Sequence, Options::default());
    assert!(run_script(&mut engine, "BUILD: 10, 20, 30").is_success());

    let started = engine
        .start(Request::Insert {
            value: 25,
            index: Some(2),
        })
        .unwrap();
    assert_eq!(started, None);
    engine.tick(DT);
    assert_eq!(engine.structure().values(), vec![10, 20, 30]);

    assert_eq!(play(&mut engine), vec!["shift-forward", "move-in"]);
    assert_eq!(engine.structure().values(), vec![10, 20, 25, 30]);
    assert_eq!(engine.last_outcome(), Some(Outcome::Inserted(25)));
}

#[test]
fn bst_delete_with_two_children() {
    let mut engine = StructureEngine::new(StructureKind::Bst, Options::default());
    let runner = run(&mut engine, "BUILD: 50, 30, 70, 20, 40\nDELETE: 30");
    assert!(runner.report().is_success());
    assert_eq!(engine.structure().values(), vec![20, 40, 50, 70]);
    assert_eq!(
        runner.outcomes(),
        &[(1, Outcome::Built(5)), (2, Outcome::Deleted(30))]
    );

    let json = engine.to_record().to_json().unwrap();
    let doc: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(doc["type"], "bst");
    assert_eq!(doc["size"], 4);
    assert_eq!(doc["root"]["data"], 50);
    assert_eq!(doc["root"]["left"]["data"], 40);
    assert_eq!(doc["root"]["left"]["left"]["data"], 20);
}

#[test]
fn sorted_bst_record_reloads_into_a_new_engine() {
    let values: Vec<i64> = (0..1000).collect();
    let mut engine = StructureEngine::new(StructureKind::Bst, Options::immediate());
    let _ = engine
        .start(Request::Build(BuildInput::Values(values.clone())))
        .unwrap();
    let json = engine.to_record().to_json().unwrap();

    let mut reloaded = StructureEngine::new(StructureKind::Stack, Options::default());
    reloaded.load_record(Record::from_json(&json).unwrap()).unwrap();
    assert_eq!(reloaded.kind(), StructureKind::Bst);
    assert_eq!(reloaded.structure().values(), values);
}

#[test]
fn search_walk_ends_in_terminal_phase_without_mutation() {
    let mut engine = StructureEngine::new(StructureKind::Bst, Options::default());
    assert!(run_script(&mut engine, "BUILD: 50, 30, 70").is_success());
    let before = engine.to_record();

    assert_eq!(engine.start(Request::Search(65)).unwrap(), None);
    let phases = play(&mut engine);
    assert_eq!(phases.first(), Some(&"appear"));
    assert_eq!(phases.last(), Some(&"not-found"));
    assert_eq!(engine.last_outcome(), Some(Outcome::NotFound(65)));
    assert_eq!(engine.to_record(), before);
}

#[test]
fn linked_remove_runs_every_phase() {
    let mut engine = StructureEngine::new(StructureKind::LinkedList, Options::default());
    assert!(run_script(&mut engine, "BUILD: 1, 2, 3").is_success());

    assert_eq!(engine.start(Request::Remove { index: 1 }).unwrap(), None);
    assert_eq!(
        play(&mut engine),
        vec![
            "fade-prev-link",
            "drop",
            "connect-bypass",
            "fade-next-link",
            "close"
        ]
    );
    assert_eq!(engine.structure().values(), vec![1, 3]);
}

#[test]
fn avl_rotation_morphs_to_final_layout() {
    let mut engine = StructureEngine::new(StructureKind::Avl, Options::default());
    assert!(run_script(&mut engine, "BUILD: 10, 20").is_success());

    assert_eq!(
        engine
            .start(Request::Insert {
                value: 30,
                index: None
            })
            .unwrap(),
        None
    );
    let phases = play(&mut engine);
    assert!(phases.contains(&"insert-found"), "{phases:?}");
    assert_eq!(phases.last(), Some(&"morph"));
    assert_eq!(engine.last_outcome(), Some(Outcome::Inserted(30)));

    let tree = engine.structure().as_search_tree().unwrap();
    assert!(tree.is_balanced());
    assert_eq!(tree.root().and_then(|r| tree.arena().value(r)), Some(20));

    let resting = engine.structure().layout(&engine.options().layout);
    assert_eq!(engine.layout().positions, resting.positions);
}

#[test]
fn huffman_script_builds_optimal_codes() {
    let mut engine = StructureEngine::new(StructureKind::Huffman, Options::default());
    let report = run_script(&mut engine, "BUILD: a:5, b:2, c:1");
    assert!(report.is_success(), "{report}");

    let forest = engine.structure().as_huffman().unwrap();
    assert!(forest.is_reduced());
    assert_eq!(forest.weighted_path_length(), 11);
    let mut lengths: Vec<(String, usize)> = forest
        .codes()
        .into_iter()
        .map(|(symbol, code)| (symbol, code.len()))
        .collect();
    lengths.sort();
    assert_eq!(
        lengths,
        vec![
            ("a".to_owned(), 1),
            ("b".to_owned(), 2),
            ("c".to_owned(), 2)
        ]
    );
}

#[test]
fn second_start_is_rejected_while_running() {
    let mut engine = StructureEngine::new(StructureKind::Stack, Options::default());
    assert_eq!(engine.start(Request::Push(1)).unwrap(), None);
    assert_eq!(engine.run_state(), RunState::Running);
    assert!(matches!(
        engine.start(Request::Push(2)),
        Err(StructvizError::Busy)
    ));
    let _ = play(&mut engine);
    assert_eq!(engine.structure().values(), vec![1]);
}

#[test]
fn bad_requests_leave_model_untouched() {
    let mut engine = StructureEngine::new(StructureKind::Huffman, Options::default());
    assert!(matches!(
        engine.start(Request::Build(BuildInput::Values(vec![1, 2]))),
        Err(StructvizError::InvalidArgument(_))
    ));
    assert!(matches!(
        engine.start(Request::Search(3)),
        Err(StructvizError::Unsupported { .. })
    ));
    assert!(engine.structure().is_empty());
    assert_eq!(engine.run_state(), RunState::Idle);
}
