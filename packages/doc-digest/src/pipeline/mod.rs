//! Digest pipeline - the core of the library.
//!
//! The pipeline orchestrates:
//! - Recursive reduction of long text to a summary
//! - Chunked entity recognition
//! - Canonicalization and vocabulary tagging
//! - Batch runs (skip stored → reuse cache → retrieve → enrich → persist)

pub mod orchestrator;
pub mod recognize;
pub mod reduce;

pub use orchestrator::{BatchReport, DocumentOutcome, Pipeline};
pub use recognize::recognize_mentions;
pub use reduce::{ReductionOutcome, Reducer, DEFAULT_MAX_ROUNDS};
