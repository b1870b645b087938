use std::mem;

use super::super::choreography::{
    Advance, Choreography, Emphasis, FrameContext, OpKind, OpView,
};
use super::super::deferred::Continuation;
use super::super::phase::{HuffmanPhase, Phase, PhaseClock};
use crate::engine::{Mutation, Outcome};
use crate::layout::{layout_forest, Layout, Morph, NodeKey};
use crate::model::HuffmanForest;

/// Animated greedy reduction of a Huffman forest.
///
/// Merges happen in a private working copy as each pair reaches the staging
/// area; the model only receives the finished tree after the final move.
/// Between merges the op parks on a [`Continuation::NextMerge`].
#[derive(Debug)]
pub(crate) struct HuffmanBuildOp {
    working: HuffmanForest,
    clock: PhaseClock<HuffmanPhase>,
    /// Roots drawn lifted in the current frame.
    stage: Vec<usize>,
    pair: Option<(usize, usize)>,
    delay: f32,
}

impl HuffmanBuildOp {
    /// Animate the reduction of `leaves` (an unreduced forest).
    pub(crate) fn new(leaves: HuffmanForest, flash_repeats: u32, delay: f32) -> Self {
        Self {
            working: leaves,
            clock: PhaseClock::new(
                OpKind::HuffmanBuild.name(),
                HuffmanPhase::Sort,
                flash_repeats,
            ),
            stage: Vec::new(),
            pair: None,
            delay,
        }
    }

    fn stage_next_pair(&mut self) {
        self.pair = self.working.next_pair();
        self.stage.clear();
        self.clock.enter(HuffmanPhase::MoveToStage);
    }

    /// Layouts at the start and end of the current phase.
    fn endpoints(&self, ctx: &FrameContext<'_>) -> (Layout, Layout) {
        let opts = ctx.layout;
        match self.clock.phase() {
            HuffmanPhase::Sort => {
                let mut sorted = self.working.clone();
                sorted.sort_roots();
                (
                    layout_forest(&self.working, &[], opts),
                    layout_forest(&sorted, &[], opts),
                )
            }
            HuffmanPhase::MoveToStage => {
                let pair: Vec<usize> =
                    self.pair.map(|(a, b)| vec![a, b]).unwrap_or_default();
                (
                    layout_forest(&self.working, &[], opts),
                    layout_forest(&self.working, &pair, opts),
                )
            }
            HuffmanPhase::Flash => {
                let staged = layout_forest(&self.working, &self.stage, opts);
                (staged.clone(), staged)
            }
            HuffmanPhase::FinalMove => (
                layout_forest(&self.working, &self.stage, opts),
                layout_forest(&self.working, &[], opts),
            ),
        }
    }
}

impl Choreography for HuffmanBuildOp {
    fn kind(&self) -> OpKind {
        OpKind::HuffmanBuild
    }

    fn step(&mut self, delta: f32) -> Advance {
        if !self.clock.advance(delta) {
            return Advance::proceed();
        }
        match self.clock.phase() {
            HuffmanPhase::Sort => {
                self.working.sort_roots();
                if self.working.is_reduced() {
                    self.clock.enter(HuffmanPhase::FinalMove);
                } else {
                    self.stage_next_pair();
                }
                Advance::proceed()
            }
            HuffmanPhase::MoveToStage => {
                self.stage = self
                    .working
                    .merge_smallest()
                    .map(|m| vec![m.parent])
                    .unwrap_or_default();
                self.pair = None;
                self.clock.enter(HuffmanPhase::Flash);
                Advance::proceed()
            }
            HuffmanPhase::Flash => {
                if self.working.is_reduced() {
                    self.clock.enter(HuffmanPhase::FinalMove);
                    Advance::proceed()
                } else {
                    Advance::wait(self.delay, Continuation::NextMerge)
                }
            }
            HuffmanPhase::FinalMove => {
                let leaves = self.working.leaf_count();
                let finished = mem::take(&mut self.working);
                Advance::finish(Outcome::Built(leaves))
                    .committing(Mutation::InstallForest(Box::new(finished)))
            }
        }
    }

    fn resume(&mut self, continuation: Continuation) {
        match continuation {
            Continuation::NextMerge if self.clock.phase() == HuffmanPhase::Flash => {
                self.working.sort_roots();
                self.stage_next_pair();
            }
            other => log::trace!("huffman build: ignoring {other:?}"),
        }
    }

    fn view(&self, _ctx: &FrameContext<'_>) -> OpView {
        let phase = self.clock.phase();
        let progress = self.clock.progress();
        let mut view = OpView::new(self.kind(), phase.name(), progress);
        match phase {
            HuffmanPhase::MoveToStage => {
                if let Some((a, b)) = self.pair {
                    for i in [a, b] {
                        view.emphasis
                            .push(Emphasis::new(NodeKey::Forest(i)).highlighted(true));
                    }
                    view.current = Some(NodeKey::Forest(a));
                }
            }
            HuffmanPhase::Flash => {
                for &i in &self.stage {
                    view.emphasis.push(
                        Emphasis::new(NodeKey::Forest(i)).highlighted(progress < 0.5),
                    );
                    view.current = Some(NodeKey::Forest(i));
                }
            }
            HuffmanPhase::FinalMove => {
                view.current = self.working.root().map(NodeKey::Forest);
            }
            HuffmanPhase::Sort => {}
        }
        view
    }

    fn decorate(&self, layout: &mut Layout, ctx: &FrameContext<'_>) {
        let (from, mut to) = self.endpoints(ctx);
        let t = ctx.ease(self.clock.progress());
        to.positions = Morph::new(from.positions, mem::take(&mut to.positions)).at(t);
        *layout = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Flow;
    use crate::options::Options;

    fn leaves(pairs: &[(&str, u64)]) -> HuffmanForest {
        let weights: Vec<(String, u64)> =
            pairs.iter().map(|(s, w)| ((*s).to_owned(), *w)).collect();
        HuffmanForest::from_weights(&weights).unwrap()
    }

    /// Run to completion, answering every wait immediately.
    fn run(op: &mut HuffmanBuildOp) -> (Vec<&'static str>, usize, Advance) {
        let mut phases = vec![op.clock.phase().name()];
        let mut waits = 0;
        loop {
            let advance = op.step(1.0);
            match advance.flow {
                Flow::Continue => {}
                Flow::Wait { then, .. } => {
                    waits += 1;
                    op.resume(then);
                }
                Flow::Finish(_) => return (phases, waits, advance),
            }
            if phases.last() != Some(&op.clock.phase().name()) {
                phases.push(op.clock.phase().name());
            }
        }
    }

    #[test]
    fn merges_one_pair_per_round_then_installs() {
        let mut op = HuffmanBuildOp::new(leaves(&[("a", 5), ("b", 2), ("c", 1)]), 1, 0.3);
        let (phases, waits, advance) = run(&mut op);
        assert_eq!(
            phases,
            vec!["sort", "move-to-stage", "flash", "move-to-stage", "flash", "final-move"]
        );
        assert_eq!(waits, 1);
        assert_eq!(advance.flow, Flow::Finish(Outcome::Built(3)));
        match advance.commit {
            Some(Mutation::InstallForest(forest)) => {
                assert!(forest.is_reduced());
                assert_eq!(forest.len(), 5);
                assert_eq!(forest.weighted_path_length(), 11);
            }
            other => panic!("unexpected commit {other:?}"),
        }
    }

    #[test]
    fn single_leaf_skips_merging() {
        let mut op = HuffmanBuildOp::new(leaves(&[("x", 4)]), 1, 0.3);
        let (phases, waits, advance) = run(&mut op);
        assert_eq!(phases, vec!["sort", "final-move"]);
        assert_eq!(waits, 0);
        assert_eq!(advance.flow, Flow::Finish(Outcome::Built(1)));
    }

    #[test]
    fn staged_pair_rises_during_move() {
        let options = Options::default();
        let ctx = FrameContext::new(&options);
        let mut op = HuffmanBuildOp::new(leaves(&[("a", 3), ("b", 1), ("c", 2)]), 1, 0.3);
        let _ = op.step(1.0);
        assert_eq!(op.pair, Some((1, 2)));
        let _ = op.step(0.999);
        let mut layout = Layout::default();
        op.decorate(&mut layout, &ctx);
        let lifted = layout.position(NodeKey::Forest(1)).unwrap().y;
        let resting = layout.position(NodeKey::Forest(0)).unwrap().y;
        assert!(lifted < resting);
    }

    #[test]
    fn stale_continuation_is_ignored_outside_flash() {
        let mut op = HuffmanBuildOp::new(leaves(&[("a", 1), ("b", 2)]), 1, 0.3);
        op.resume(Continuation::NextMerge);
        assert_eq!(op.clock.phase(), HuffmanPhase::Sort);
    }
}
