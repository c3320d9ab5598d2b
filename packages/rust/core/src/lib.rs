//! Core pipeline orchestration and domain logic for kbsync.
//!
//! This crate ties together CSV ingestion, topic grouping, document emission,
//! and remote sync into end-to-end workflows (`export`, `push`).

pub mod emit;
pub mod grouper;
pub mod pipeline;
