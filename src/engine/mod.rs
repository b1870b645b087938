//! The structure engine: one model, one in-flight operation, one clock.
//!
//! [`StructureEngine::start`] validates a [`Request`] and either applies it
//! at once (immediate mode, or operations with nothing to animate) or hands
//! it to a choreography. [`StructureEngine::tick`] then advances that
//! choreography and commits its [`Mutation`] when it reaches its commit
//! point. Cancelling bumps a generation token so that continuations
//! scheduled earlier fall on the floor.

mod accessors;
mod command;
mod snapshot;
mod structure;

pub use command::{BuildInput, Mutation, Outcome, Request};
pub use snapshot::{NodeView, Snapshot};
pub use structure::{Structure, StructureKind};

use self::structure::{Applied, Plan, Resolved};
use crate::animation::{Advance, Choreography, Continuation, DeferredQueue, Flow, MorphOp};
use crate::error::StructvizError;
use crate::options::Options;

/// Upper bound on steps taken by [`StructureEngine::finish`].
const FINISH_STEP_LIMIT: usize = 1_000_000;

/// Lifecycle of the engine's single operation slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Nothing in flight; `start` is accepted.
    Idle,
    /// An operation is animating; `start` is rejected.
    Running,
    /// An operation was just cancelled. Becomes `Idle` on the next tick.
    Cancelling,
}

/// Owns one data structure and animates operations on it.
///
/// All driving is cooperative: the caller owns the clock and calls
/// [`tick`](Self::tick) once per frame. Replaying the same sequence of tick
/// deltas yields the same sequence of phases.
#[derive(Debug)]
pub struct StructureEngine {
    structure: Structure,
    options: Options,
    state: RunState,
    generation: u64,
    deferred: DeferredQueue,
    active: Option<Box<dyn Choreography>>,
    /// Active operation is waiting for a continuation.
    parked: bool,
    last_outcome: Option<Outcome>,
}

impl StructureEngine {
    /// Engine over an empty structure of `kind`.
    #[must_use]
    pub fn new(kind: StructureKind, options: Options) -> Self {
        Self::with_structure(Structure::new(kind), options)
    }

    /// Engine over an existing structure.
    #[must_use]
    pub fn with_structure(structure: Structure, options: Options) -> Self {
        log::debug!("engine created for {}", structure.kind());
        Self {
            structure,
            options,
            state: RunState::Idle,
            generation: 0,
            deferred: DeferredQueue::new(),
            active: None,
            parked: false,
            last_outcome: None,
        }
    }

    /// Begin `request`.
    ///
    /// Returns the outcome when the request completed synchronously
    /// (immediate mode, builds, clears) and `None` when it is now
    /// animating. Fails with [`StructvizError::Busy`] while another
    /// operation is running; every other error is detected before the model
    /// changes.
    pub fn start(
        &mut self,
        request: Request,
    ) -> Result<Option<Outcome>, StructvizError> {
        if self.state == RunState::Running {
            log::warn!(
                "{} rejected: {} is still animating",
                request.name(),
                self.structure.kind()
            );
            return Err(StructvizError::Busy);
        }
        let resolved = self.structure.resolve(&request)?;
        self.last_outcome = None;
        if !self.options.animation.enabled {
            let outcome = self.run_now(resolved)?;
            self.last_outcome = Some(outcome);
            self.state = RunState::Idle;
            return Ok(Some(outcome));
        }
        match self.structure.choreograph(resolved, &self.options)? {
            Plan::Instant(mutation) => {
                let outcome = self.commit(mutation)?.outcome;
                self.last_outcome = Some(outcome);
                self.state = RunState::Idle;
                Ok(Some(outcome))
            }
            Plan::Animate { upfront, mut op } => {
                if let Some(mutation) = upfront {
                    if let Some(key) = self.commit(mutation)?.touched {
                        op.bind_target(key);
                    }
                }
                log::debug!("{} started", op.kind().name());
                self.active = Some(op);
                self.parked = false;
                self.state = RunState::Running;
                Ok(None)
            }
        }
    }

    /// Advance by `dt` seconds of wall time.
    pub fn tick(&mut self, dt: f32) {
        let fired = self.deferred.advance(dt, self.generation);
        if self.state == RunState::Cancelling {
            self.state = RunState::Idle;
        }
        for continuation in fired {
            self.deliver(continuation);
        }
        if self.state != RunState::Running || self.parked {
            return;
        }
        let delta = self.options.animation.phase_delta(dt);
        let Some(op) = self.active.as_mut() else {
            self.state = RunState::Idle;
            return;
        };
        let advance = op.step(delta);
        self.handle(advance);
    }

    /// Run the in-flight operation to completion synchronously, committing
    /// at its commit point and firing its continuations without delay.
    /// Returns its outcome, or `None` when nothing was running.
    pub fn finish(&mut self) -> Option<Outcome> {
        if self.state != RunState::Running {
            return None;
        }
        for _ in 0..FINISH_STEP_LIMIT {
            if self.state != RunState::Running {
                return self.last_outcome;
            }
            if self.parked {
                let fired = self.deferred.drain(self.generation);
                if fired.is_empty() {
                    log::warn!("parked operation has nothing to wake it");
                    self.abort();
                    return None;
                }
                for continuation in fired {
                    self.deliver(continuation);
                }
                continue;
            }
            let Some(op) = self.active.as_mut() else {
                self.state = RunState::Idle;
                return None;
            };
            let advance = op.step(1.0);
            self.handle(advance);
        }
        log::warn!("operation did not settle; aborting");
        self.abort();
        None
    }

    /// Abort the in-flight operation without committing anything further.
    /// Returns whether there was one.
    pub fn cancel(&mut self) -> bool {
        if self.state != RunState::Running {
            return false;
        }
        if let Some(op) = &self.active {
            log::info!("{} cancelled", op.kind().name());
        }
        self.reset();
        true
    }

    /// Invalidate every pending continuation and drop the in-flight
    /// operation. The model keeps its last committed state.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.active = None;
        self.parked = false;
        self.state = RunState::Cancelling;
        log::debug!("reset to generation {}", self.generation);
    }

    fn run_now(&mut self, resolved: Resolved) -> Result<Outcome, StructvizError> {
        match resolved {
            Resolved::Mutate(mutation) => Ok(self.commit(mutation)?.outcome),
            Resolved::Search(value) => Ok(self.structure.observe(value)),
            Resolved::Huffman(mut leaves) => {
                let merges = leaves.reduce();
                log::debug!("huffman reduced in {} merges", merges.len());
                let mutation = Mutation::InstallForest(Box::new(leaves));
                Ok(self.commit(mutation)?.outcome)
            }
        }
    }

    fn commit(&mut self, mutation: Mutation) -> Result<Applied, StructvizError> {
        let name = mutation.name();
        let applied = self.structure.apply(mutation, &self.options.layout)?;
        log::info!(
            "{name} on {}: {} (size {})",
            self.structure.kind(),
            applied.outcome,
            self.structure.len()
        );
        Ok(applied)
    }

    fn handle(&mut self, advance: Advance) {
        let mut morph = None;
        if let Some(mutation) = advance.commit {
            match self.commit(mutation) {
                Ok(applied) => morph = applied.morph.filter(|m| !m.is_still()),
                Err(err) => {
                    log::warn!("commit rejected: {err}");
                    self.abort();
                    return;
                }
            }
        }
        match advance.flow {
            Flow::Continue => {}
            Flow::Wait { delay, then } => {
                self.parked = true;
                self.deferred.schedule(delay, self.generation, then);
            }
            Flow::Finish(outcome) => match morph {
                Some(morph) => {
                    self.active = Some(Box::new(MorphOp::new(morph, outcome)));
                    self.parked = true;
                    self.deferred.schedule(
                        self.options.animation.scaled_delay(),
                        self.generation,
                        Continuation::BeginMorph,
                    );
                }
                None => self.complete(outcome),
            },
        }
    }

    fn deliver(&mut self, continuation: Continuation) {
        let waiting = if self.parked { self.active.as_mut() } else { None };
        let Some(op) = waiting else {
            log::trace!("{continuation:?} arrived with nothing waiting");
            return;
        };
        self.parked = false;
        if continuation != Continuation::BeginMorph {
            op.resume(continuation);
        }
    }

    fn complete(&mut self, outcome: Outcome) {
        if let Some(op) = self.active.take() {
            log::debug!("{} finished: {outcome}", op.kind().name());
        }
        self.parked = false;
        self.state = RunState::Idle;
        self.last_outcome = Some(outcome);
    }

    fn abort(&mut self) {
        self.active = None;
        self.parked = false;
        self.state = RunState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Side;

    fn engine(kind: StructureKind) -> StructureEngine {
        StructureEngine::new(kind, Options::default())
    }

    fn build(engine: &mut StructureEngine, values: &[i64]) {
        let request = Request::Build(BuildInput::Values(values.to_vec()));
        assert!(matches!(engine.start(request), Ok(Some(Outcome::Built(_)))));
    }

    #[test]
    fn immediate_mode_applies_synchronously() {
        let mut e = StructureEngine::new(StructureKind::Sequence, Options::immediate());
        build(&mut e, &[10, 20, 30]);
        let outcome = e.start(Request::Insert {
            value: 25,
            index: Some(2),
        });
        assert_eq!(outcome.ok().flatten(), Some(Outcome::Inserted(25)));
        assert_eq!(e.structure().values(), vec![10, 20, 25, 30]);
        assert!(!e.is_animating());
    }

    #[test]
    fn second_start_is_busy() {
        let mut e = engine(StructureKind::Stack);
        assert!(matches!(e.start(Request::Push(1)), Ok(None)));
        assert!(matches!(e.start(Request::Push(2)), Err(StructvizError::Busy)));
        assert_eq!(e.finish(), Some(Outcome::Pushed(1)));
        assert!(e.start(Request::Push(2)).is_ok());
    }

    #[test]
    fn push_commits_before_the_animation() {
        let mut e = engine(StructureKind::Stack);
        let _ = e.start(Request::Push(5));
        assert_eq!(e.structure().values(), vec![5]);
        assert!(e.is_animating());
        e.tick(10.0);
        assert!(!e.is_animating());
        assert_eq!(e.last_outcome(), Some(Outcome::Pushed(5)));
    }

    #[test]
    fn cancel_before_commit_leaves_model_untouched() {
        let mut e = engine(StructureKind::Stack);
        build(&mut e, &[1, 2]);
        let _ = e.start(Request::Pop);
        e.tick(0.1);
        assert!(e.cancel());
        assert_eq!(e.run_state(), RunState::Cancelling);
        assert_eq!(e.structure().values(), vec![1, 2]);
        e.tick(0.1);
        assert_eq!(e.run_state(), RunState::Idle);
        assert!(!e.cancel());
    }

    #[test]
    fn bst_delete_commits_at_terminal_hold() {
        let mut e = engine(StructureKind::Bst);
        build(&mut e, &[50, 30, 70, 20, 40]);
        let _ = e.start(Request::Delete(30));
        let phase_time = e.options().animation.phase_seconds;
        e.tick(phase_time);
        assert_eq!(e.structure().len(), 5);
        assert_eq!(e.finish(), Some(Outcome::Deleted(30)));
        assert_eq!(e.structure().values(), vec![20, 40, 50, 70]);
    }

    #[test]
    fn avl_rotation_is_shown_as_a_parked_morph() {
        let mut e = engine(StructureKind::Avl);
        build(&mut e, &[10, 20]);
        let _ = e.start(Request::Insert {
            value: 30,
            index: None,
        });
        let step = e.options().animation.phase_seconds;
        while e.op_view().is_some_and(|v| v.phase != "morph") {
            e.tick(step);
        }
        assert_eq!(e.structure().values(), vec![10, 20, 30]);
        assert_eq!(e.pending_continuations(), 1);
        assert!(e.is_animating());
        assert_eq!(e.finish(), Some(Outcome::Inserted(30)));
        assert!(e
            .structure()
            .as_search_tree()
            .is_some_and(|t| t.is_balanced()));
    }

    #[test]
    fn reset_discards_pending_huffman_merge() {
        let mut e = engine(StructureKind::Huffman);
        let weights = vec![("a".to_owned(), 1), ("b".to_owned(), 2), ("c".to_owned(), 4)];
        let _ = e.start(Request::Build(BuildInput::Weights(weights)));
        let step = e.options().animation.phase_seconds;
        while e.pending_continuations() == 0 {
            e.tick(step);
        }
        let before = e.generation();
        e.reset();
        assert_eq!(e.generation(), before + 1);
        for _ in 0..20 {
            e.tick(step);
        }
        assert!(e.structure().is_empty());
        assert_eq!(e.pending_continuations(), 0);
        assert_eq!(e.run_state(), RunState::Idle);
    }

    #[test]
    fn huffman_build_installs_reduced_tree() {
        let mut e = engine(StructureKind::Huffman);
        let weights = vec![("a".to_owned(), 1), ("b".to_owned(), 2), ("c".to_owned(), 4)];
        let _ = e.start(Request::Build(BuildInput::Weights(weights)));
        assert_eq!(e.finish(), Some(Outcome::Built(3)));
        let forest = e.structure().as_huffman();
        assert!(forest.is_some_and(|f| f.is_reduced() && f.len() == 5));
    }

    #[test]
    fn child_insert_targets_new_leaf() {
        let mut e = engine(StructureKind::BinaryTree);
        build(&mut e, &[1, 2, 3]);
        let _ = e.start(Request::InsertChild {
            parent_index: 1,
            value: 4,
            side: Side::Left,
        });
        let view = e.op_view();
        assert!(view.is_some_and(|v| v.current.is_some() && v.phase == "grow-in"));
        assert_eq!(e.finish(), Some(Outcome::Inserted(4)));
    }

    #[test]
    fn clear_is_instant_even_when_animating() {
        let mut e = engine(StructureKind::LinkedList);
        build(&mut e, &[1, 2, 3]);
        assert!(matches!(e.start(Request::Clear), Ok(Some(Outcome::Cleared))));
        assert!(e.structure().is_empty());
    }
}
