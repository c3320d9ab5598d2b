//! Shared types, error model, and configuration for kbsync.
//!
//! This crate is the foundation depended on by all other kbsync crates.
//! It provides:
//! - [`KbSyncError`]: the unified error type
//! - Domain records ([`EntityRecord`], [`IntentRecord`], [`AnswerRecord`]) and
//!   output documents ([`EntityDocument`], [`UnderstandingRecord`])
//! - Configuration ([`AppConfig`], [`RemoteConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, EnvironmentConfig, RemoteConfig, config_dir, config_file_path,
    init_config, init_config_at, load_config, load_config_from,
};
pub use error::{KbSyncError, Result};
pub use types::{
    AnswerGroup, AnswerRecord, EntityDocument, EntityRecord, IntentRecord, QuestionGroup,
    RecordKind, SynonymGroup, UnderstandingRecord,
};
