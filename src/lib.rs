// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Tick-driven animation engine for classic data-structure mutations.
//!
//! structviz owns a data structure (stack, sequence list, linked list,
//! binary tree, BST, AVL tree or Huffman tree) and plays each mutation on it
//! as a short sequence of phases: highlight, shift, grow in, walk a search
//! path, rebalance. The caller drives time by calling
//! [`StructureEngine::tick`](engine::StructureEngine::tick) and reads
//! positioned frames back with
//! [`snapshot`](engine::StructureEngine::snapshot). Nothing here draws.
//!
//! # Key entry points
//!
//! - [`engine::StructureEngine`] - the engine: start, tick, finish, cancel
//! - [`engine::Request`] - what a caller can ask for
//! - [`options::Options`] - timing, easing and layout spacing, TOML-backed
//! - [`record::Record`] - JSON persistence of structure contents
//! - [`script`] - line-oriented command scripts
//!
//! # Architecture
//!
//! Each operation is a choreography that only
//! reports what it wants: a mutation to commit, a delay to wait, or an
//! outcome. The engine applies mutations to the model, recomputes the
//! [`layout`] and schedules continuations on a generation-stamped queue,
//! so cancelling an operation drops its pending work without touching the
//! last committed model.

pub mod animation;
pub mod engine;
pub mod error;
pub mod layout;
pub mod model;
pub mod options;
pub mod record;
pub mod script;
pub mod util;
