use glam::Vec2;

use super::super::choreography::{
    Advance, Choreography, Emphasis, FrameContext, OpKind, OpView,
    TransientEdge,
};
use super::super::phase::{LinkedPhase, Phase, PhaseClock};
use crate::engine::{Mutation, Outcome};
use crate::layout::{row_slot, Layout, NodeKey};
use crate::model::Value;

fn link(from: NodeKey, to: NodeKey, opacity: f32) -> TransientEdge {
    TransientEdge {
        from,
        to,
        opacity: opacity.clamp(0.0, 1.0),
    }
}

fn cut(layout: &mut Layout, a: Option<NodeKey>, b: Option<NodeKey>) {
    if let (Some(a), Some(b)) = (a, b) {
        layout
            .edges
            .retain(|&edge| edge != (a, b) && edge != (b, a));
    }
}

/// Predecessor of list position `index`.
fn predecessor(slots: &[usize], index: usize) -> Option<NodeKey> {
    index
        .checked_sub(1)
        .and_then(|i| slots.get(i))
        .map(|&s| NodeKey::Slot(s))
}

/// Open a gap, build the new node's links, then settle it into the row.
#[derive(Debug)]
pub(crate) struct LinkedInsertOp {
    index: usize,
    value: Value,
    slots: Vec<usize>,
    clock: PhaseClock<LinkedPhase>,
}

impl LinkedInsertOp {
    /// `slots` is the list's slot order before the insert.
    pub(crate) fn new(index: usize, value: Value, slots: Vec<usize>) -> Self {
        let first = if index < slots.len() {
            LinkedPhase::Shift
        } else {
            LinkedPhase::Appear
        };
        Self {
            index,
            value,
            slots,
            clock: PhaseClock::new(OpKind::LinkedInsert.name(), first, 1),
        }
    }

    fn prev(&self) -> Option<NodeKey> {
        predecessor(&self.slots, self.index)
    }

    fn next(&self) -> Option<NodeKey> {
        self.slots.get(self.index).map(|&s| NodeKey::Slot(s))
    }
}

impl Choreography for LinkedInsertOp {
    fn kind(&self) -> OpKind {
        OpKind::LinkedInsert
    }

    fn step(&mut self, delta: f32) -> Advance {
        if !self.clock.advance(delta) {
            return Advance::proceed();
        }
        let next = match self.clock.phase() {
            LinkedPhase::Shift => LinkedPhase::Appear,
            LinkedPhase::Appear => LinkedPhase::LinkNext,
            LinkedPhase::LinkNext => LinkedPhase::LinkPrev,
            LinkedPhase::LinkPrev => LinkedPhase::Lift,
            _ => {
                return Advance::finish(Outcome::Inserted(self.value))
                    .committing(Mutation::LinkedInsert {
                        index: self.index,
                        value: self.value,
                    });
            }
        };
        self.clock.enter(next);
        Advance::proceed()
    }

    fn view(&self, ctx: &FrameContext<'_>) -> OpView {
        let phase = self.clock.phase();
        let t = ctx.ease(self.clock.progress());
        let mut view = OpView::new(self.kind(), phase.name(), self.clock.progress());
        view.target = Some(self.value);
        view.current = Some(NodeKey::Pending);
        let pending = Emphasis::new(NodeKey::Pending).highlighted(true);
        view.emphasis.push(match phase {
            LinkedPhase::Shift => pending.scaled(0.0),
            LinkedPhase::Appear => pending.scaled(t),
            _ => pending,
        });
        let (prev, next) = (self.prev(), self.next());
        let (next_link, prev_link) = match phase {
            LinkedPhase::LinkNext => (t, 0.0),
            LinkedPhase::LinkPrev => (1.0, t),
            LinkedPhase::Lift => (1.0, 1.0),
            _ => (0.0, 0.0),
        };
        if let Some(next) = next.filter(|_| next_link > 0.0) {
            view.transient_edges.push(link(NodeKey::Pending, next, next_link));
            view.transient_edges.push(link(next, NodeKey::Pending, next_link));
        }
        if let Some(prev) = prev.filter(|_| prev_link > 0.0) {
            view.transient_edges.push(link(prev, NodeKey::Pending, prev_link));
            view.transient_edges.push(link(NodeKey::Pending, prev, prev_link));
        }
        view
    }

    fn decorate(&self, layout: &mut Layout, ctx: &FrameContext<'_>) {
        let opts = ctx.layout;
        let phase = self.clock.phase();
        let t = ctx.ease(self.clock.progress());
        let shift = if phase == LinkedPhase::Shift { t } else { 1.0 };
        for (k, &slot) in self.slots.iter().enumerate().skip(self.index) {
            let from = row_slot(k, opts);
            layout.move_to(NodeKey::Slot(slot), from.lerp(row_slot(k + 1, opts), shift));
        }
        if matches!(phase, LinkedPhase::LinkPrev | LinkedPhase::Lift) {
            cut(layout, self.prev(), self.next());
        }
        if phase == LinkedPhase::Shift {
            return;
        }
        let target = row_slot(self.index, opts);
        let hover = target - Vec2::new(0.0, opts.slot_spacing * 1.5);
        let position = if phase == LinkedPhase::Lift {
            hover.lerp(target, t)
        } else {
            hover
        };
        layout.place(NodeKey::Pending, position, self.value.to_string());
    }
}

/// Unhook the target from both neighbours around a bypass link, then close
/// the gap.
#[derive(Debug)]
pub(crate) struct LinkedRemoveOp {
    index: usize,
    value: Value,
    slots: Vec<usize>,
    clock: PhaseClock<LinkedPhase>,
}

impl LinkedRemoveOp {
    /// `slots` is the list's slot order before the removal.
    pub(crate) fn new(index: usize, value: Value, slots: Vec<usize>) -> Self {
        Self {
            index,
            value,
            slots,
            clock: PhaseClock::new(
                OpKind::LinkedRemove.name(),
                LinkedPhase::FadePrevLink,
                1,
            ),
        }
    }

    fn target(&self) -> Option<NodeKey> {
        self.slots.get(self.index).map(|&s| NodeKey::Slot(s))
    }

    fn prev(&self) -> Option<NodeKey> {
        predecessor(&self.slots, self.index)
    }

    fn next(&self) -> Option<NodeKey> {
        self.slots.get(self.index + 1).map(|&s| NodeKey::Slot(s))
    }

    fn reached(&self, phase: LinkedPhase) -> bool {
        const ORDER: [LinkedPhase; 5] = [
            LinkedPhase::FadePrevLink,
            LinkedPhase::Drop,
            LinkedPhase::ConnectBypass,
            LinkedPhase::FadeNextLink,
            LinkedPhase::Close,
        ];
        let rank = |p| ORDER.iter().position(|&o| o == p).unwrap_or(0);
        rank(self.clock.phase()) >= rank(phase)
    }
}

impl Choreography for LinkedRemoveOp {
    fn kind(&self) -> OpKind {
        OpKind::LinkedRemove
    }

    fn step(&mut self, delta: f32) -> Advance {
        if !self.clock.advance(delta) {
            return Advance::proceed();
        }
        let next = match self.clock.phase() {
            LinkedPhase::FadePrevLink => LinkedPhase::Drop,
            LinkedPhase::Drop => LinkedPhase::ConnectBypass,
            LinkedPhase::ConnectBypass => LinkedPhase::FadeNextLink,
            LinkedPhase::FadeNextLink => LinkedPhase::Close,
            _ => {
                return Advance::finish(Outcome::Removed(self.value))
                    .committing(Mutation::LinkedRemove { index: self.index });
            }
        };
        self.clock.enter(next);
        Advance::proceed()
    }

    fn view(&self, ctx: &FrameContext<'_>) -> OpView {
        let phase = self.clock.phase();
        let t = ctx.ease(self.clock.progress());
        let mut view = OpView::new(self.kind(), phase.name(), self.clock.progress());
        view.target = Some(self.value);
        view.current = self.target();
        let Some(target) = self.target() else {
            return view;
        };
        let fade = if phase == LinkedPhase::Close { 1.0 - t } else { 1.0 };
        view.emphasis
            .push(Emphasis::new(target).highlighted(true).faded(fade));
        let (prev, next) = (self.prev(), self.next());
        if let Some(prev) = prev.filter(|_| phase == LinkedPhase::FadePrevLink) {
            view.transient_edges.push(link(prev, target, 1.0 - t));
            view.transient_edges.push(link(target, prev, 1.0 - t));
        }
        if let (Some(prev), Some(next)) = (prev, next) {
            if self.reached(LinkedPhase::ConnectBypass) {
                let bypass = if phase == LinkedPhase::ConnectBypass { t } else { 1.0 };
                view.transient_edges.push(link(prev, next, bypass));
                view.transient_edges.push(link(next, prev, bypass));
            }
        }
        if let Some(next) = next.filter(|_| phase == LinkedPhase::FadeNextLink) {
            view.transient_edges.push(link(target, next, 1.0 - t));
            view.transient_edges.push(link(next, target, 1.0 - t));
        }
        view
    }

    fn decorate(&self, layout: &mut Layout, ctx: &FrameContext<'_>) {
        let opts = ctx.layout;
        let phase = self.clock.phase();
        let t = ctx.ease(self.clock.progress());
        let target = self.target();
        cut(layout, self.prev(), target);
        if self.reached(LinkedPhase::FadeNextLink) {
            cut(layout, target, self.next());
        }
        if let Some(target) = target.filter(|_| self.reached(LinkedPhase::Drop)) {
            let depth = if phase == LinkedPhase::Drop { t } else { 1.0 };
            let drop = Vec2::new(0.0, opts.slot_spacing * 1.5 * depth);
            layout.move_to(target, row_slot(self.index, opts) + drop);
        }
        if phase == LinkedPhase::Close {
            for (k, &slot) in self.slots.iter().enumerate().skip(self.index + 1) {
                let from = row_slot(k, opts);
                layout.move_to(NodeKey::Slot(slot), from.lerp(row_slot(k - 1, opts), t));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout_linked;
    use crate::model::LinkedList;
    use crate::options::Options;

    fn run(op: &mut dyn Choreography) -> (Vec<&'static str>, Option<Mutation>) {
        let options = Options::default();
        let ctx = FrameContext::new(&options);
        let mut phases = vec![op.view(&ctx).phase];
        for _ in 0..16 {
            let advance = op.step(1.0);
            if advance.commit.is_some() {
                return (phases, advance.commit);
            }
            phases.push(op.view(&ctx).phase);
        }
        (phases, None)
    }

    #[test]
    fn insert_runs_full_phase_table() {
        let mut op = LinkedInsertOp::new(1, 9, vec![0, 1, 2]);
        let (phases, commit) = run(&mut op);
        assert_eq!(phases, vec!["shift", "appear", "link-next", "link-prev", "lift"]);
        assert_eq!(commit, Some(Mutation::LinkedInsert { index: 1, value: 9 }));
    }

    #[test]
    fn append_skips_the_shift() {
        let mut op = LinkedInsertOp::new(3, 9, vec![0, 1, 2]);
        let (phases, _) = run(&mut op);
        assert_eq!(phases.first(), Some(&"appear"));
    }

    #[test]
    fn remove_runs_full_phase_table() {
        let mut op = LinkedRemoveOp::new(1, 2, vec![0, 1, 2]);
        let (phases, commit) = run(&mut op);
        assert_eq!(
            phases,
            vec!["fade-prev-link", "drop", "connect-bypass", "fade-next-link", "close"]
        );
        assert_eq!(commit, Some(Mutation::LinkedRemove { index: 1 }));
    }

    #[test]
    fn bypass_replaces_target_links() {
        let options = Options::default();
        let ctx = FrameContext::new(&options);
        let list = LinkedList::from_values(&[1, 2, 3]);
        let mut op = LinkedRemoveOp::new(1, 2, list.slots_in_order());
        for _ in 0..3 {
            let _ = op.step(1.0);
        }
        let mut layout = layout_linked(&list, &options.layout);
        op.decorate(&mut layout, &ctx);
        assert!(layout.edges.is_empty());
        let view = op.view(&ctx);
        assert!(view
            .transient_edges
            .iter()
            .any(|e| e.from == NodeKey::Slot(0) && e.to == NodeKey::Slot(2)));
    }
}
