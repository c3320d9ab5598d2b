//! Output document emission.
//!
//! Writes `output-entities-<unixtime>.json` and
//! `output-understandings-<unixtime>.json` for the downstream importer.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use kbsync_shared::{
    EntityDocument, EntityRecord, KbSyncError, Result, SynonymGroup, UnderstandingRecord,
};

/// Values shared by every document produced in one run.
#[derive(Debug, Clone)]
pub struct RunStamp {
    /// Run start time; used for `created`/`updated` and the file-name suffix.
    pub started_at: DateTime<Utc>,
    /// Channel tag for synonym and answer groups.
    pub messaging_service: String,
}

impl RunStamp {
    /// Stamp the current instant.
    pub fn now(messaging_service: impl Into<String>) -> Self {
        Self {
            started_at: Utc::now(),
            messaging_service: messaging_service.into(),
        }
    }
}

/// Paths of the two documents written by [`write_documents`].
#[derive(Debug, Clone)]
pub struct WrittenDocuments {
    pub entities_path: PathBuf,
    pub understandings_path: PathBuf,
}

/// Wrap each entity in a single synonym group.
pub fn build_entities(entities: &[EntityRecord], stamp: &RunStamp) -> Vec<EntityDocument> {
    entities
        .iter()
        .map(|entity| EntityDocument {
            created: stamp.started_at,
            updated: stamp.started_at,
            name: entity.name.clone(),
            synonym_groups: vec![SynonymGroup {
                messaging_service: stamp.messaging_service.clone(),
                synonyms: entity.synonyms.clone(),
            }],
        })
        .collect()
}

/// Write both documents into `output_dir`, creating it if needed.
#[instrument(skip_all, fields(output_dir = %output_dir.display(), entities = entities.len(), understandings = understandings.len()))]
pub fn write_documents(
    output_dir: &Path,
    stamp: &RunStamp,
    entities: &[EntityDocument],
    understandings: &[UnderstandingRecord],
) -> Result<WrittenDocuments> {
    std::fs::create_dir_all(output_dir).map_err(|e| KbSyncError::io(output_dir, e))?;

    let suffix = stamp.started_at.timestamp();
    let entities_path = output_dir.join(format!("output-entities-{suffix}.json"));
    let understandings_path = output_dir.join(format!("output-understandings-{suffix}.json"));

    write_json(&entities_path, &entities)?;
    info!(path = %entities_path.display(), "wrote entities file");

    write_json(&understandings_path, &understandings)?;
    info!(path = %understandings_path.display(), "wrote understandings file");

    Ok(WrittenDocuments {
        entities_path,
        understandings_path,
    })
}

/// Write a JSON file (pretty-printed).
fn write_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| KbSyncError::Serialize(format!("{}: {e}", path.display())))?;
    std::fs::write(path, json).map_err(|e| KbSyncError::io(path, e))?;
    debug!(path = %path.display(), "wrote JSON file");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
