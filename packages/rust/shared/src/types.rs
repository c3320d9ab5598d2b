//! Core domain types for kbsync knowledge bases.
//!
//! Normalized records ([`EntityRecord`], [`IntentRecord`], [`AnswerRecord`]) are
//! produced from CSV rows; the document types ([`EntityDocument`],
//! [`UnderstandingRecord`]) are the JSON shapes handed to the import pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Normalized records
// ---------------------------------------------------------------------------

/// A named list of interchangeable terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    /// Lower-cased name with the spreadsheet sentinel character removed.
    pub name: String,
    /// Trimmed, non-empty synonyms in cell order. Never empty.
    pub synonyms: Vec<String>,
}

/// One intents-sheet row after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentRecord {
    /// Lower-cased, trimmed topic key.
    pub topic: String,
    /// Primary statement first, then its synonyms.
    pub questions: Vec<String>,
    /// Contexts that must be active for this intent to match.
    pub input_contexts: Vec<String>,
    /// Contexts activated when this intent matches.
    pub output_contexts: Vec<String>,
}

/// The response text for one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    /// Lower-cased, trimmed topic key.
    pub topic: String,
    /// Trimmed answer text.
    pub answer: String,
}

// ---------------------------------------------------------------------------
// RecordKind
// ---------------------------------------------------------------------------

/// Record kinds that exist on the remote platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Intents,
    Entities,
}

impl RecordKind {
    /// Path segment used by the remote API (`{base}/intents`, `{base}/entities`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intents => "intents",
            Self::Entities => "entities",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Output documents
// ---------------------------------------------------------------------------

/// Entry of `output-entities-<unixtime>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDocument {
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub name: String,
    pub synonym_groups: Vec<SynonymGroup>,
}

/// Synonyms scoped to one messaging service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynonymGroup {
    pub messaging_service: String,
    pub synonyms: Vec<String>,
}

/// Entry of `output-understandings-<unixtime>.json`: every question variant
/// for one topic joined with that topic's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnderstandingRecord {
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub topic: String,
    /// Always empty; present for the importer's schema.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// One group per intents-sheet row, in file order.
    pub question_groups: Vec<QuestionGroup>,
    pub answer_groups: Vec<AnswerGroup>,
    #[serde(default)]
    pub output_contexts: Vec<String>,
}

impl UnderstandingRecord {
    /// Every fuzzy question across all groups, in order.
    pub fn all_questions(&self) -> impl Iterator<Item = &str> {
        self.question_groups
            .iter()
            .flat_map(|g| g.fuzzy_questions.iter().map(String::as_str))
    }

    /// Ordered union of the input contexts of all question groups.
    pub fn input_contexts(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for ctx in self.question_groups.iter().flat_map(|g| &g.input_contexts) {
            if !out.contains(ctx) {
                out.push(ctx.clone());
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionGroup {
    pub input_contexts: Vec<String>,
    pub fuzzy_questions: Vec<String>,
    /// Always empty.
    #[serde(default)]
    pub exact_questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerGroup {
    pub messaging_service: String,
    pub answers: Vec<String>,
}
