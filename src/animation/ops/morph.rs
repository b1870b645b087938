use super::super::choreography::{
    Advance, Choreography, FrameContext, OpKind, OpView,
};
use super::super::phase::{MorphPhase, Phase, PhaseClock};
use crate::engine::Outcome;
use crate::layout::{Layout, Morph};

/// Glide every node from its pre-rotation to its post-rotation position.
///
/// The rotations themselves were committed before this starts; the morph
/// only carries the outcome of the operation that triggered them.
#[derive(Debug)]
pub(crate) struct MorphOp {
    morph: Morph,
    outcome: Outcome,
    clock: PhaseClock<MorphPhase>,
}

impl MorphOp {
    pub(crate) fn new(morph: Morph, outcome: Outcome) -> Self {
        Self {
            morph,
            outcome,
            clock: PhaseClock::new(OpKind::Rebalance.name(), MorphPhase::Morph, 1),
        }
    }
}

impl Choreography for MorphOp {
    fn kind(&self) -> OpKind {
        OpKind::Rebalance
    }

    fn step(&mut self, delta: f32) -> Advance {
        if self.clock.advance(delta) {
            Advance::finish(self.outcome)
        } else {
            Advance::proceed()
        }
    }

    fn view(&self, _ctx: &FrameContext<'_>) -> OpView {
        let phase = self.clock.phase();
        OpView::new(self.kind(), phase.name(), self.clock.progress())
    }

    fn decorate(&self, layout: &mut Layout, ctx: &FrameContext<'_>) {
        for (key, position) in self.morph.at(ctx.ease(self.clock.progress())) {
            layout.move_to(key, position);
        }
    }
}
