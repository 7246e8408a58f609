//! Core types for the docqa retrieval pipeline
//!
//! This crate provides foundational types used across all other crates:
//! - Document / chunk / indexed-item records
//! - Scored retrieval hits with diagnostic metadata
//! - Answer verification results
//! - Error types

pub mod document;
pub mod error;

pub use document::{Chunk, Document, Filters, IndexedItem, Metadata, ScoredHit};
pub use error::{Error, Result, VerificationResult};
