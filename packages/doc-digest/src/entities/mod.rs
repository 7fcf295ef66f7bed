//! Entity post-processing: canonical ranking and vocabulary tags.

pub mod canonical;
pub mod tags;

pub use canonical::{canonicalize, initials, is_valid_entity, EntityList};
pub use tags::{TagExtractor, COUNTRIES, UN_BODIES};
