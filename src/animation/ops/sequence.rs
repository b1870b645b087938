use glam::Vec2;

use super::super::choreography::{
    Advance, Choreography, Emphasis, FrameContext, OpKind, OpView,
};
use super::super::phase::{Phase, PhaseClock, SequencePhase};
use crate::engine::{Mutation, Outcome};
use crate::layout::{row_slot, Layout, NodeKey};
use crate::model::Value;
use crate::options::LayoutOptions;

/// Where a new element waits above the row before moving in.
fn hover(index: usize, opts: &LayoutOptions) -> Vec2 {
    row_slot(index, opts) - Vec2::new(0.0, opts.slot_spacing * 1.5)
}

/// Shift the tail right one element at a time, then move the new value in.
#[derive(Debug)]
pub(crate) struct SequenceInsertOp {
    index: usize,
    value: Value,
    len: usize,
    shifted: usize,
    clock: PhaseClock<SequencePhase>,
}

impl SequenceInsertOp {
    pub(crate) fn new(index: usize, value: Value, len: usize) -> Self {
        let first = if index < len {
            SequencePhase::ShiftForward
        } else {
            SequencePhase::MoveIn
        };
        Self {
            index,
            value,
            len,
            shifted: 0,
            clock: PhaseClock::new(OpKind::SequenceInsert.name(), first, 1),
        }
    }

    /// Element currently moving right; the rightmost ones go first.
    fn shifting(&self) -> Option<usize> {
        (self.clock.phase() == SequencePhase::ShiftForward)
            .then(|| self.len - 1 - self.shifted)
    }
}

impl Choreography for SequenceInsertOp {
    fn kind(&self) -> OpKind {
        OpKind::SequenceInsert
    }

    fn step(&mut self, delta: f32) -> Advance {
        if !self.clock.advance(delta) {
            return Advance::proceed();
        }
        if self.clock.phase() == SequencePhase::ShiftForward {
            self.shifted += 1;
            let next = if self.shifted < self.len - self.index {
                SequencePhase::ShiftForward
            } else {
                SequencePhase::MoveIn
            };
            self.clock.enter(next);
            return Advance::proceed();
        }
        Advance::finish(Outcome::Inserted(self.value)).committing(
            Mutation::SequenceInsert {
                index: self.index,
                value: self.value,
            },
        )
    }

    fn view(&self, _ctx: &FrameContext<'_>) -> OpView {
        let phase = self.clock.phase();
        let mut view =
            OpView::new(self.kind(), phase.name(), self.clock.progress());
        view.target = Some(self.value);
        view.current = Some(self.shifting().map_or(NodeKey::Pending, NodeKey::Slot));
        view.emphasis.push(Emphasis::new(NodeKey::Pending).highlighted(true));
        if let Some(i) = self.shifting() {
            view.emphasis.push(Emphasis::new(NodeKey::Slot(i)).highlighted(true));
        }
        view
    }

    fn decorate(&self, layout: &mut Layout, ctx: &FrameContext<'_>) {
        let opts = ctx.layout;
        let t = ctx.ease(self.clock.progress());
        for i in (self.len - self.shifted)..self.len {
            layout.move_to(NodeKey::Slot(i), row_slot(i + 1, opts));
        }
        if let Some(i) = self.shifting() {
            let from = row_slot(i, opts);
            layout.move_to(NodeKey::Slot(i), from.lerp(row_slot(i + 1, opts), t));
        }
        let start = hover(self.index, opts);
        let position = match self.clock.phase() {
            SequencePhase::MoveIn => start.lerp(row_slot(self.index, opts), t),
            _ => start,
        };
        layout.place(NodeKey::Pending, position, self.value.to_string());
    }
}

/// Flash the doomed element, move it out, commit, then close the gap one
/// element at a time.
#[derive(Debug)]
pub(crate) struct SequenceRemoveOp {
    index: usize,
    value: Value,
    len: usize,
    shifted: usize,
    committed: bool,
    clock: PhaseClock<SequencePhase>,
}

impl SequenceRemoveOp {
    pub(crate) fn new(
        index: usize,
        value: Value,
        len: usize,
        flash_repeats: u32,
    ) -> Self {
        Self {
            index,
            value,
            len,
            shifted: 0,
            committed: false,
            clock: PhaseClock::new(
                OpKind::SequenceRemove.name(),
                SequencePhase::FlashTarget,
                flash_repeats,
            ),
        }
    }

    fn to_shift(&self) -> usize {
        self.len - 1 - self.index
    }
}

impl Choreography for SequenceRemoveOp {
    fn kind(&self) -> OpKind {
        OpKind::SequenceRemove
    }

    fn step(&mut self, delta: f32) -> Advance {
        if !self.clock.advance(delta) {
            return Advance::proceed();
        }
        match self.clock.phase() {
            SequencePhase::FlashTarget => {
                self.clock.enter(SequencePhase::MoveOut);
                Advance::proceed()
            }
            SequencePhase::MoveOut => {
                self.committed = true;
                let next = if self.to_shift() > 0 {
                    SequencePhase::ShiftBackward
                } else {
                    SequencePhase::Cleanup
                };
                self.clock.enter(next);
                Advance::proceed()
                    .committing(Mutation::SequenceRemove { index: self.index })
            }
            SequencePhase::ShiftBackward => {
                self.shifted += 1;
                let next = if self.shifted < self.to_shift() {
                    SequencePhase::ShiftBackward
                } else {
                    SequencePhase::Cleanup
                };
                self.clock.enter(next);
                Advance::proceed()
            }
            _ => Advance::finish(Outcome::Removed(self.value)),
        }
    }

    fn view(&self, ctx: &FrameContext<'_>) -> OpView {
        let phase = self.clock.phase();
        let progress = self.clock.progress();
        let mut view = OpView::new(self.kind(), phase.name(), progress);
        view.target = Some(self.value);
        let focus = match phase {
            SequencePhase::FlashTarget => {
                Emphasis::new(NodeKey::Slot(self.index)).highlighted(progress < 0.5)
            }
            SequencePhase::MoveOut => Emphasis::new(NodeKey::Slot(self.index))
                .faded(1.0 - ctx.ease(progress))
                .highlighted(true),
            _ => Emphasis::new(NodeKey::Slot(self.index + self.shifted))
                .highlighted(phase == SequencePhase::ShiftBackward),
        };
        view.current = Some(focus.key);
        view.emphasis.push(focus);
        view
    }

    fn decorate(&self, layout: &mut Layout, ctx: &FrameContext<'_>) {
        let opts = ctx.layout;
        let t = ctx.ease(self.clock.progress());
        if !self.committed {
            if self.clock.phase() == SequencePhase::MoveOut {
                let drop = Vec2::new(0.0, opts.slot_spacing * 1.5 * t);
                layout.move_to(
                    NodeKey::Slot(self.index),
                    row_slot(self.index, opts) + drop,
                );
            }
            return;
        }
        let moving = (self.clock.phase() == SequencePhase::ShiftBackward)
            .then_some(self.index + self.shifted);
        for j in self.index..self.len - 1 {
            let position = if j < self.index + self.shifted {
                row_slot(j, opts)
            } else if Some(j) == moving {
                row_slot(j + 1, opts).lerp(row_slot(j, opts), t)
            } else {
                row_slot(j + 1, opts)
            };
            layout.move_to(NodeKey::Slot(j), position);
        }
    }
}
