//! Concrete choreographies, one per operation family.

mod element;
mod huffman;
mod linked;
mod morph;
mod path;
mod sequence;

pub(crate) use element::ElementOp;
pub(crate) use huffman::HuffmanBuildOp;
pub(crate) use linked::{LinkedInsertOp, LinkedRemoveOp};
pub(crate) use morph::MorphOp;
pub(crate) use path::{PathWalkOp, WalkMode};
pub(crate) use sequence::{SequenceInsertOp, SequenceRemoveOp};
