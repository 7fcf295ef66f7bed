//! Core trait abstractions for the digest library.
//!
//! These traits define the interfaces that applications implement
//! to provide models, storage and retrieval.

pub mod model;
pub mod store;
