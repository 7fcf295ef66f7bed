//! Text utilities: normalization and token chunking.

pub mod chunker;
pub mod normalize;

pub use chunker::{chunk_tokens, is_end_of_sentence, is_sentence_valid, Chunk};
pub use normalize::normalize;
