//! Client for the conversational platform's REST API.
//!
//! This crate provides:
//! - [`RemoteClient`]: authenticated create/list/delete calls with bounded
//!   concurrency for batches
//! - [`SubjectFilter`]: name-prefix selection of records to delete
//! - [`payload`]: request bodies built from normalized records

pub mod client;
pub mod filter;
pub mod payload;

pub use client::{RemoteClient, RemoteId, RemoteItem, RemoteSummary, SyncReport};
pub use filter::SubjectFilter;
pub use payload::{EntityPayload, IntentPayload, entity_payload, intent_payload};
