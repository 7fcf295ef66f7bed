//! Data types for the digest library.

pub mod config;
pub mod document;
pub mod mention;
