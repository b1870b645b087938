//! Phase-driven choreography of structure operations.
//!
//! Every animated operation is a small state machine implementing
//! `Choreography`. The engine feeds it progress on each tick; the
//! choreography answers with an [`Advance`] that may carry the
//! [`Mutation`](crate::engine::Mutation) to commit and says whether to keep
//! going, wait for a deferred continuation, or finish.
//!
//! Phase tables:
//!
//! | Operation | Phases | Commit |
//! |---|---|---|
//! | stack push, child insert | grow-in | before the animation |
//! | stack pop, subtree remove | highlight, shrink-out | after shrink-out |
//! | sequence insert | shift-forward (per element), move-in | after move-in |
//! | sequence remove | flash-target, move-out, shift-backward (per element), cleanup | after move-out |
//! | linked insert | shift, appear, link-next, link-prev, lift | after lift |
//! | linked remove | fade-prev-link, drop, connect-bypass, fade-next-link, close | after close |
//! | search-tree walk | appear, (compare, move)*, terminal | after the terminal hold |
//! | AVL rebalance | morph | before the morph |
//! | Huffman build | sort, (move-to-stage, flash)*, final-move | after final-move |

mod choreography;
mod deferred;
mod ops;
mod phase;

pub use choreography::{
    Advance, Emphasis, Flow, FrameContext, OpKind, OpView, TransientEdge,
};
pub(crate) use choreography::Choreography;
pub use deferred::{Continuation, DeferredQueue};
pub(crate) use ops::{
    ElementOp, HuffmanBuildOp, LinkedInsertOp, LinkedRemoveOp, MorphOp,
    PathWalkOp, SequenceInsertOp, SequenceRemoveOp, WalkMode,
};
pub use phase::{
    ElementPhase, HuffmanPhase, LinkedPhase, MorphPhase, PathPhase, Phase,
    SequencePhase,
};
