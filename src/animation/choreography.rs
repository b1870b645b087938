//! The choreography trait and the read-only view it exposes to renderers.

use std::fmt;

use super::deferred::Continuation;
use crate::engine::{Mutation, Outcome};
use crate::layout::{Layout, NodeKey};
use crate::model::Value;
use crate::options::{LayoutOptions, Options};
use crate::util::easing::EasingFunction;

/// Per-frame inputs shared by every choreography.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    /// Canvas geometry.
    pub layout: &'a LayoutOptions,
    /// Curve applied to movement phases.
    pub easing: EasingFunction,
}

impl<'a> FrameContext<'a> {
    /// Context for the given options.
    #[must_use]
    pub fn new(options: &'a Options) -> Self {
        Self {
            layout: &options.layout,
            easing: options.animation.easing,
        }
    }

    /// Eased progress.
    #[must_use]
    pub fn ease(&self, t: f32) -> f32 {
        self.easing.evaluate(t)
    }
}

/// Which operation is animating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// Stack push.
    Push,
    /// Stack pop.
    Pop,
    /// Sequence-list insert.
    SequenceInsert,
    /// Sequence-list remove.
    SequenceRemove,
    /// Linked-list insert.
    LinkedInsert,
    /// Linked-list remove.
    LinkedRemove,
    /// Search-tree lookup.
    Search,
    /// Search-tree insert.
    TreeInsert,
    /// Search-tree delete.
    TreeDelete,
    /// Plain binary tree leaf insert.
    ChildInsert,
    /// Plain binary tree subtree removal.
    SubtreeRemove,
    /// AVL rebalance morph.
    Rebalance,
    /// Huffman build.
    HuffmanBuild,
}

impl OpKind {
    /// Short name used in logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Pop => "pop",
            Self::SequenceInsert => "sequence insert",
            Self::SequenceRemove => "sequence remove",
            Self::LinkedInsert => "linked insert",
            Self::LinkedRemove => "linked remove",
            Self::Search => "search",
            Self::TreeInsert => "tree insert",
            Self::TreeDelete => "tree delete",
            Self::ChildInsert => "child insert",
            Self::SubtreeRemove => "subtree remove",
            Self::Rebalance => "rebalance",
            Self::HuffmanBuild => "huffman build",
        }
    }
}

/// Visual emphasis for one node in the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emphasis {
    /// Node affected.
    pub key: NodeKey,
    /// Size multiplier (1 = normal).
    pub scale: f32,
    /// Opacity (1 = opaque).
    pub opacity: f32,
    /// Draw with the highlight colour.
    pub highlight: bool,
}

impl Emphasis {
    /// Neutral emphasis.
    #[must_use]
    pub fn new(key: NodeKey) -> Self {
        Self {
            key,
            scale: 1.0,
            opacity: 1.0,
            highlight: false,
        }
    }

    /// With a size multiplier.
    #[must_use]
    pub fn scaled(mut self, scale: f32) -> Self {
        self.scale = scale.clamp(0.0, 1.0);
        self
    }

    /// With an opacity.
    #[must_use]
    pub fn faded(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// With the highlight colour.
    #[must_use]
    pub fn highlighted(mut self, on: bool) -> Self {
        self.highlight = on;
        self
    }
}

/// An edge that only exists while an operation animates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransientEdge {
    /// Source node.
    pub from: NodeKey,
    /// Target node.
    pub to: NodeKey,
    /// Opacity (1 = fully drawn).
    pub opacity: f32,
}

/// Read-only state of the in-flight operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OpView {
    /// Operation kind.
    pub kind: OpKind,
    /// Current phase name.
    pub phase: &'static str,
    /// Progress within the phase, in `[0, 1)`.
    pub progress: f32,
    /// Value the operation is about.
    pub target: Option<Value>,
    /// Node currently in focus.
    pub current: Option<NodeKey>,
    /// Nodes visited so far (path walks).
    pub path: Vec<NodeKey>,
    /// Per-node emphasis.
    pub emphasis: Vec<Emphasis>,
    /// Edges drawn only during this operation.
    pub transient_edges: Vec<TransientEdge>,
}

impl OpView {
    /// View with no emphasis.
    #[must_use]
    pub fn new(kind: OpKind, phase: &'static str, progress: f32) -> Self {
        Self {
            kind,
            phase,
            progress,
            target: None,
            current: None,
            path: Vec::new(),
            emphasis: Vec::new(),
            transient_edges: Vec::new(),
        }
    }

    /// Emphasis recorded for `key`.
    #[must_use]
    pub fn emphasis_for(&self, key: NodeKey) -> Option<&Emphasis> {
        self.emphasis.iter().find(|e| e.key == key)
    }
}

/// What the engine should do after a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    /// Keep ticking.
    Continue,
    /// Park until `then` fires after `delay` seconds.
    Wait {
        /// Seconds to wait.
        delay: f32,
        /// Continuation to deliver.
        then: Continuation,
    },
    /// The operation is over.
    Finish(Outcome),
}

/// Answer of a choreography to one step.
#[derive(Debug, Clone, PartialEq)]
pub struct Advance {
    /// Mutation to apply before acting on `flow`.
    pub commit: Option<Mutation>,
    /// Control flow.
    pub flow: Flow,
}

impl Advance {
    /// Keep going, nothing to commit.
    #[must_use]
    pub fn proceed() -> Self {
        Self {
            commit: None,
            flow: Flow::Continue,
        }
    }

    /// Park until a continuation fires.
    #[must_use]
    pub fn wait(delay: f32, then: Continuation) -> Self {
        Self {
            commit: None,
            flow: Flow::Wait { delay, then },
        }
    }

    /// Finish with `outcome`.
    #[must_use]
    pub fn finish(outcome: Outcome) -> Self {
        Self {
            commit: None,
            flow: Flow::Finish(outcome),
        }
    }

    /// Attach a mutation to commit.
    #[must_use]
    pub fn committing(mut self, mutation: Mutation) -> Self {
        self.commit = Some(mutation);
        self
    }
}

/// An animated operation.
///
/// A choreography never touches the model: it hands mutations back through
/// [`Advance::commit`], so dropping it at any point leaves the model at its
/// last committed state.
pub(crate) trait Choreography: fmt::Debug {
    /// Operation kind.
    fn kind(&self) -> OpKind;

    /// Advance by `delta` phase progress.
    fn step(&mut self, delta: f32) -> Advance;

    /// Deliver a continuation this choreography waited for.
    fn resume(&mut self, continuation: Continuation) {
        log::trace!("{}: ignoring {continuation:?}", self.kind().name());
    }

    /// Learn the key of a node created by an up-front commit.
    fn bind_target(&mut self, _key: NodeKey) {}

    /// Read-only state for renderers.
    fn view(&self, ctx: &FrameContext<'_>) -> OpView;

    /// Adjust the model's layout for the current frame.
    fn decorate(&self, _layout: &mut Layout, _ctx: &FrameContext<'_>) {}
}
