//! Phase enumerations and the per-operation progress clock.

use std::fmt;

/// A named sub-step of an operation.
pub trait Phase: Copy + Eq + fmt::Debug {
    /// Kebab-case name exposed to renderers.
    fn name(self) -> &'static str;

    /// Flash-style phases repeat a fixed number of times before
    /// transitioning.
    fn is_flash(self) -> bool {
        false
    }
}

/// Phases of single-element operations (stack, plain binary tree).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementPhase {
    /// Element scales up from nothing.
    GrowIn,
    /// Element is marked before it leaves.
    Highlight,
    /// Element scales down to nothing.
    ShrinkOut,
}

impl Phase for ElementPhase {
    fn name(self) -> &'static str {
        match self {
            Self::GrowIn => "grow-in",
            Self::Highlight => "highlight",
            Self::ShrinkOut => "shrink-out",
        }
    }
}

/// Phases of sequence-list insert and remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencePhase {
    /// One element moves one cell to the right.
    ShiftForward,
    /// The new element drops into its cell.
    MoveIn,
    /// The doomed element blinks.
    FlashTarget,
    /// The doomed element leaves the row.
    MoveOut,
    /// One element moves one cell to the left.
    ShiftBackward,
    /// Final settle.
    Cleanup,
}

impl Phase for SequencePhase {
    fn name(self) -> &'static str {
        match self {
            Self::ShiftForward => "shift-forward",
            Self::MoveIn => "move-in",
            Self::FlashTarget => "flash-target",
            Self::MoveOut => "move-out",
            Self::ShiftBackward => "shift-backward",
            Self::Cleanup => "cleanup",
        }
    }

    fn is_flash(self) -> bool {
        self == Self::FlashTarget
    }
}

/// Phases of linked-list insert and remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkedPhase {
    /// Successors slide right to open a gap.
    Shift,
    /// New node appears above the gap.
    Appear,
    /// New node's `next` link is drawn.
    LinkNext,
    /// Predecessor's `next` link is redirected to the new node.
    LinkPrev,
    /// New node settles into the row.
    Lift,
    /// Link between predecessor and target fades.
    FadePrevLink,
    /// Target drops out of the row.
    Drop,
    /// Predecessor is linked to the successor.
    ConnectBypass,
    /// Link between target and successor fades.
    FadeNextLink,
    /// Target vanishes and successors close the gap.
    Close,
}

impl Phase for LinkedPhase {
    fn name(self) -> &'static str {
        match self {
            Self::Shift => "shift",
            Self::Appear => "appear",
            Self::LinkNext => "link-next",
            Self::LinkPrev => "link-prev",
            Self::Lift => "lift",
            Self::FadePrevLink => "fade-prev-link",
            Self::Drop => "drop",
            Self::ConnectBypass => "connect-bypass",
            Self::FadeNextLink => "fade-next-link",
            Self::Close => "close",
        }
    }
}

/// Phases of a search-tree path walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPhase {
    /// Probe appears above the root.
    Appear,
    /// Probe is compared with the current node.
    Compare,
    /// Probe travels to the next node.
    Move,
    /// Terminal: the value is present.
    Found,
    /// Terminal: the value is absent.
    NotFound,
    /// Terminal: the free slot for an insert was reached.
    InsertFound,
    /// Terminal: the node to delete was reached.
    DeleteFound,
}

impl PathPhase {
    /// Whether the walk ends in this phase.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Found | Self::NotFound | Self::InsertFound | Self::DeleteFound
        )
    }
}

impl Phase for PathPhase {
    fn name(self) -> &'static str {
        match self {
            Self::Appear => "appear",
            Self::Compare => "compare",
            Self::Move => "move",
            Self::Found => "found",
            Self::NotFound => "not-found",
            Self::InsertFound => "insert-found",
            Self::DeleteFound => "delete-found",
        }
    }
}

/// The single phase of a rebalance morph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphPhase {
    /// Nodes glide from pre- to post-rotation positions.
    Morph,
}

impl Phase for MorphPhase {
    fn name(self) -> &'static str {
        "morph"
    }
}

/// Phases of an animated Huffman build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuffmanPhase {
    /// Leaves reorder by weight.
    Sort,
    /// The two lightest roots rise to the staging area.
    MoveToStage,
    /// The freshly merged parent blinks.
    Flash,
    /// The finished tree settles into place.
    FinalMove,
}

impl Phase for HuffmanPhase {
    fn name(self) -> &'static str {
        match self {
            Self::Sort => "sort",
            Self::MoveToStage => "move-to-stage",
            Self::Flash => "flash",
            Self::FinalMove => "final-move",
        }
    }

    fn is_flash(self) -> bool {
        self == Self::Flash
    }
}

/// Current phase plus progress within it.
///
/// Progress resets to 0 on every transition; any overshoot of a tick is
/// dropped, so identical tick sequences always yield identical phase
/// sequences.
#[derive(Debug, Clone)]
pub(crate) struct PhaseClock<P> {
    label: &'static str,
    phase: P,
    progress: f32,
    flash_repeats: u32,
    repeats_left: u32,
}

impl<P: Phase> PhaseClock<P> {
    pub(crate) fn new(label: &'static str, phase: P, flash_repeats: u32) -> Self {
        let flash_repeats = flash_repeats.max(1);
        Self {
            label,
            phase,
            progress: 0.0,
            flash_repeats,
            repeats_left: flash_repeats,
        }
    }

    pub(crate) fn phase(&self) -> P {
        self.phase
    }

    pub(crate) fn progress(&self) -> f32 {
        self.progress
    }

    /// Add `delta` progress. Returns `true` once the phase is complete;
    /// flash phases complete only after their last repeat.
    pub(crate) fn advance(&mut self, delta: f32) -> bool {
        self.progress += delta.max(0.0);
        if self.progress < 1.0 {
            return false;
        }
        self.progress = 0.0;
        if self.phase.is_flash() && self.repeats_left > 1 {
            self.repeats_left -= 1;
            return false;
        }
        true
    }

    pub(crate) fn enter(&mut self, phase: P) {
        log::debug!(
            "{}: {} -> {}",
            self.label,
            self.phase.name(),
            phase.name()
        );
        self.phase = phase;
        self.progress = 0.0;
        self.repeats_left = self.flash_repeats;
    }
}
