use super::super::choreography::{
    Advance, Choreography, Emphasis, FrameContext, OpKind, OpView,
};
use super::super::phase::{ElementPhase, Phase, PhaseClock};
use crate::engine::{Mutation, Outcome};
use crate::layout::NodeKey;
use crate::model::Value;

/// Single-element animation: grow-in for elements committed up front,
/// highlight then shrink-out for elements committed at the end.
#[derive(Debug)]
pub(crate) struct ElementOp {
    kind: OpKind,
    clock: PhaseClock<ElementPhase>,
    targets: Vec<NodeKey>,
    value: Option<Value>,
    commit: Option<Mutation>,
    outcome: Outcome,
}

impl ElementOp {
    /// Growth of an element that is already in the model. Its key arrives
    /// through [`Choreography::bind_target`].
    pub(crate) fn grow_in(kind: OpKind, value: Value, outcome: Outcome) -> Self {
        Self {
            kind,
            clock: PhaseClock::new(kind.name(), ElementPhase::GrowIn, 1),
            targets: Vec::new(),
            value: Some(value),
            commit: None,
            outcome,
        }
    }

    /// Highlight `targets`, shrink them away, then commit `mutation`.
    pub(crate) fn shrink_out(
        kind: OpKind,
        targets: Vec<NodeKey>,
        value: Option<Value>,
        mutation: Mutation,
        outcome: Outcome,
    ) -> Self {
        Self {
            kind,
            clock: PhaseClock::new(kind.name(), ElementPhase::Highlight, 1),
            targets,
            value,
            commit: Some(mutation),
            outcome,
        }
    }
}

impl Choreography for ElementOp {
    fn kind(&self) -> OpKind {
        self.kind
    }

    fn step(&mut self, delta: f32) -> Advance {
        if !self.clock.advance(delta) {
            return Advance::proceed();
        }
        match self.clock.phase() {
            ElementPhase::Highlight => {
                self.clock.enter(ElementPhase::ShrinkOut);
                Advance::proceed()
            }
            ElementPhase::GrowIn | ElementPhase::ShrinkOut => {
                let done = Advance::finish(self.outcome);
                match self.commit.take() {
                    Some(mutation) => done.committing(mutation),
                    None => done,
                }
            }
        }
    }

    fn bind_target(&mut self, key: NodeKey) {
        self.targets.push(key);
    }

    fn view(&self, ctx: &FrameContext<'_>) -> OpView {
        let phase = self.clock.phase();
        let t = ctx.ease(self.clock.progress());
        let mut view = OpView::new(self.kind, phase.name(), self.clock.progress());
        view.target = self.value;
        view.current = self.targets.first().copied();
        view.emphasis = self
            .targets
            .iter()
            .map(|&key| {
                let e = Emphasis::new(key);
                match phase {
                    ElementPhase::GrowIn => e.scaled(t),
                    ElementPhase::Highlight => e.highlighted(true),
                    ElementPhase::ShrinkOut => e.scaled(1.0 - t).highlighted(true),
                }
            })
            .collect();
        view
    }
}
