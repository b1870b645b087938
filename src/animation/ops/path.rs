use std::cmp::Ordering;

use glam::Vec2;

use super::super::choreography::{
    Advance, Choreography, Emphasis, FrameContext, OpKind, OpView,
};
use super::super::phase::{PathPhase, Phase, PhaseClock};
use crate::engine::{Mutation, Outcome};
use crate::layout::{Layout, NodeKey};
use crate::model::{NodeId, SearchTree, Value};
use crate::options::LayoutOptions;

/// What the walk is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WalkMode {
    Search,
    Insert,
    Delete,
}

impl WalkMode {
    fn kind(self) -> OpKind {
        match self {
            Self::Search => OpKind::Search,
            Self::Insert => OpKind::TreeInsert,
            Self::Delete => OpKind::TreeDelete,
        }
    }
}

/// Probe walking from the root toward `value`, one comparison per node.
///
/// The path is fixed when the walk starts; the model cannot change under it
/// because nothing else runs while it animates.
#[derive(Debug)]
pub(crate) struct PathWalkOp {
    mode: WalkMode,
    value: Value,
    path: Vec<NodeId>,
    hit: bool,
    goes_left: bool,
    cursor: usize,
    clock: PhaseClock<PathPhase>,
}

impl PathWalkOp {
    pub(crate) fn new(mode: WalkMode, value: Value, tree: &SearchTree) -> Self {
        let arena = tree.arena();
        let mut path = Vec::new();
        let mut hit = false;
        let mut goes_left = false;
        let mut cursor = tree.root();
        while let Some(id) = cursor {
            if path.len() > arena.len() {
                break;
            }
            let Some(node) = arena.get(id) else {
                break;
            };
            path.push(id);
            cursor = match value.cmp(&node.value) {
                Ordering::Equal => {
                    hit = true;
                    None
                }
                Ordering::Less => {
                    goes_left = true;
                    node.left
                }
                Ordering::Greater => {
                    goes_left = false;
                    node.right
                }
            };
        }
        Self {
            mode,
            value,
            path,
            hit,
            goes_left,
            cursor: 0,
            clock: PhaseClock::new(mode.kind().name(), PathPhase::Appear, 1),
        }
    }

    fn terminal(&self) -> PathPhase {
        match (self.mode, self.hit) {
            (WalkMode::Search | WalkMode::Insert, true) => PathPhase::Found,
            (WalkMode::Search | WalkMode::Delete, false) => PathPhase::NotFound,
            (WalkMode::Insert, false) => PathPhase::InsertFound,
            (WalkMode::Delete, true) => PathPhase::DeleteFound,
        }
    }

    fn outcome(&self) -> Advance {
        match (self.mode, self.hit) {
            (WalkMode::Search, true) => Advance::finish(Outcome::Found(self.value)),
            (WalkMode::Search | WalkMode::Delete, false) => {
                Advance::finish(Outcome::NotFound(self.value))
            }
            (WalkMode::Insert, true) => {
                Advance::finish(Outcome::Duplicate(self.value))
            }
            (WalkMode::Insert, false) => Advance::finish(Outcome::Inserted(self.value))
                .committing(Mutation::TreeInsert(self.value)),
            (WalkMode::Delete, true) => Advance::finish(Outcome::Deleted(self.value))
                .committing(Mutation::TreeDelete(self.value)),
        }
    }

    fn current(&self) -> Option<NodeId> {
        self.path.get(self.cursor).copied()
    }

    fn beside(node: Vec2, opts: &LayoutOptions) -> Vec2 {
        node + Vec2::new(opts.node_diameter * 0.9, -opts.node_diameter * 0.9)
    }

    /// Where a missing value would be attached.
    fn leaf_target(&self, layout: &Layout, opts: &LayoutOptions) -> Vec2 {
        let last = self.path.last().and_then(|&id| layout.position(NodeKey::Tree(id)));
        match last {
            Some(p) => {
                let dx = opts.node_diameter * 1.5;
                p + Vec2::new(if self.goes_left { -dx } else { dx }, opts.level_spacing)
            }
            None => Vec2::new(opts.center_x(), opts.top_margin),
        }
    }
}

impl Choreography for PathWalkOp {
    fn kind(&self) -> OpKind {
        self.mode.kind()
    }

    fn step(&mut self, delta: f32) -> Advance {
        if !self.clock.advance(delta) {
            return Advance::proceed();
        }
        let phase = self.clock.phase();
        let next = match phase {
            PathPhase::Appear if self.path.is_empty() => self.terminal(),
            PathPhase::Appear => PathPhase::Compare,
            PathPhase::Compare if self.cursor + 1 < self.path.len() => PathPhase::Move,
            PathPhase::Compare => self.terminal(),
            PathPhase::Move => {
                self.cursor += 1;
                PathPhase::Compare
            }
            _ => return self.outcome(),
        };
        self.clock.enter(next);
        Advance::proceed()
    }

    fn view(&self, ctx: &FrameContext<'_>) -> OpView {
        let phase = self.clock.phase();
        let t = ctx.ease(self.clock.progress());
        let mut view = OpView::new(self.kind(), phase.name(), self.clock.progress());
        view.target = Some(self.value);
        view.current = self.current().map(NodeKey::Tree);
        view.path = self
            .path
            .iter()
            .take(self.cursor + 1)
            .map(|&id| NodeKey::Tree(id))
            .collect();
        if let Some(current) = view.current.filter(|_| phase != PathPhase::Appear) {
            let focus = Emphasis::new(current).highlighted(true);
            view.emphasis.push(match phase {
                PathPhase::DeleteFound => focus.scaled(1.0 - t),
                _ => focus,
            });
        }
        let probe = Emphasis::new(NodeKey::Pending).highlighted(true);
        view.emphasis.push(match phase {
            PathPhase::Appear => probe.scaled(t),
            PathPhase::NotFound => probe.faded(1.0 - t),
            _ => probe,
        });
        view
    }

    fn decorate(&self, layout: &mut Layout, ctx: &FrameContext<'_>) {
        let opts = ctx.layout;
        let t = ctx.ease(self.clock.progress());
        let at = |id: Option<NodeId>| {
            id.and_then(|id| layout.position(NodeKey::Tree(id)))
                .map(|p| Self::beside(p, opts))
        };
        let top = Vec2::new(opts.center_x(), opts.top_margin - opts.level_spacing);
        let here = at(self.current()).unwrap_or(top);
        let position = match self.clock.phase() {
            PathPhase::Appear => at(self.path.first().copied()).unwrap_or(top),
            PathPhase::Move => {
                let next = at(self.path.get(self.cursor + 1).copied()).unwrap_or(here);
                here.lerp(next, t)
            }
            PathPhase::InsertFound => {
                let start = if self.path.is_empty() { top } else { here };
                start.lerp(self.leaf_target(layout, opts), t)
            }
            _ => here,
        };
        layout.place(NodeKey::Pending, position, self.value.to_string());
    }
}
