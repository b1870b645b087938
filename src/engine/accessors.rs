//! Read-only queries and option handling for [`StructureEngine`].

use super::{Outcome, RunState, Snapshot, Structure, StructureEngine, StructureKind};
use crate::animation::{FrameContext, OpView};
use crate::error::StructvizError;
use crate::layout::Layout;
use crate::options::Options;
use crate::record::Record;

// ── State ──

impl StructureEngine {
    /// Whether an operation is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.state == RunState::Running
    }

    /// Lifecycle state.
    #[must_use]
    pub fn run_state(&self) -> RunState {
        self.state
    }

    /// Current generation token; bumped by every cancel and reset.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Outcome of the most recently finished operation; `None` while one is
    /// in flight or after it was cancelled.
    #[must_use]
    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    /// Deferred tasks still queued, stale ones included.
    #[must_use]
    pub fn pending_continuations(&self) -> usize {
        self.deferred.len()
    }

    /// The committed model.
    #[must_use]
    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    /// Kind of the owned structure.
    #[must_use]
    pub fn kind(&self) -> StructureKind {
        self.structure.kind()
    }
}

// ── Frames ──

impl StructureEngine {
    /// Phase state of the in-flight operation.
    #[must_use]
    pub fn op_view(&self) -> Option<OpView> {
        let ctx = FrameContext::new(&self.options);
        self.active.as_ref().map(|op| op.view(&ctx))
    }

    /// Layout of the current frame: the committed model, adjusted by the
    /// in-flight operation.
    #[must_use]
    pub fn layout(&self) -> Layout {
        let mut layout = self.structure.layout(&self.options.layout);
        if let Some(op) = &self.active {
            op.decorate(&mut layout, &FrameContext::new(&self.options));
        }
        layout
    }

    /// Everything a renderer needs for the current frame.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let layout = self.layout();
        for fault in &layout.faults {
            log::warn!("layout fault at {}: {:?}", fault.node, fault.kind);
        }
        Snapshot::capture(
            layout,
            self.op_view(),
            self.structure.len(),
            self.state,
            self.generation,
        )
    }
}

// ── Persistence and options ──

impl StructureEngine {
    /// Persistable form of the committed model. An in-flight operation's
    /// uncommitted work is not included.
    #[must_use]
    pub fn to_record(&self) -> Record {
        Record::from_structure(&self.structure)
    }

    /// Replace the model with one loaded from `record`. The engine takes
    /// the record's structure kind.
    pub fn load_record(&mut self, record: Record) -> Result<(), StructvizError> {
        if self.state == RunState::Running {
            return Err(StructvizError::Busy);
        }
        self.structure = record.into_structure()?;
        self.last_outcome = None;
        log::info!(
            "loaded {} with {} elements",
            self.structure.kind(),
            self.structure.len()
        );
        Ok(())
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replace options. Takes effect from the next tick.
    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }
}
