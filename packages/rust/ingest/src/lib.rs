//! CSV ingestion for kbsync knowledge-base spreadsheets.
//!
//! This crate provides:
//! - [`parser`]: headerless CSV → [`RawRow`] sequences for a fixed column schema
//! - [`normalize`]: per-kind row validation into typed records ([`FromRow`])
//! - [`contexts`]: hierarchical context derivation for slash-delimited topics

pub mod contexts;
pub mod normalize;
pub mod parser;

pub use contexts::{default_input_context, derive_contexts, output_prefixes};
pub use normalize::{FromRow, IntentSheet, NormalizeOptions, load_intents, load_records};
pub use parser::{
    ANSWER_COLUMNS, ENTITY_COLUMNS, INTENT_COLUMNS, INTENT_COLUMNS_EXTENDED, RawRow, Rows,
    parse_rows,
};
