//! Row validation and normalization into typed records.
//!
//! Rows that miss required cells are dropped, not reported: spreadsheets are
//! hand-edited and routinely contain blank or half-filled lines.

use kbsync_shared::{AnswerRecord, AppConfig, EntityRecord, IntentRecord, Result};
use tracing::debug;

use crate::contexts::derive_contexts;
use crate::parser::{
    ANSWER_COLUMNS, ENTITY_COLUMNS, INTENT_COLUMNS, INTENT_COLUMNS_EXTENDED, RawRow, parse_rows,
};

/// Sub-delimiter for multi-value cells.
const MULTI_VALUE_SEPARATOR: char = ';';

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Knobs that change how rows are normalized.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Intent rows whose raw `info` cell starts with this literal are dropped.
    pub skip_marker: String,
    /// Derive hierarchical contexts from slash-delimited topics.
    pub derive_contexts: bool,
    /// Intents sheet uses the extended column layout.
    pub extended_intents: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            skip_marker: "SKIP".into(),
            derive_contexts: false,
            extended_intents: false,
        }
    }
}

impl From<&AppConfig> for NormalizeOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            skip_marker: config.defaults.skip_marker.clone(),
            derive_contexts: config.defaults.derive_contexts,
            extended_intents: false,
        }
    }
}

// ---------------------------------------------------------------------------
// FromRow
// ---------------------------------------------------------------------------

/// A record type that can be built from one CSV row.
pub trait FromRow: Sized {
    /// Positional schema of the sheet this record is read from.
    fn columns(opts: &NormalizeOptions) -> &'static [&'static str];

    /// Validate and convert `row`; `None` means the row is discarded.
    fn from_row(row: &RawRow, opts: &NormalizeOptions) -> Option<Self>;
}

impl FromRow for EntityRecord {
    fn columns(_opts: &NormalizeOptions) -> &'static [&'static str] {
        ENTITY_COLUMNS
    }

    fn from_row(row: &RawRow, _opts: &NormalizeOptions) -> Option<Self> {
        // First character is the sheet's entity sentinel (e.g. `@colour`).
        let name: String = row.get("name").trim().chars().skip(1).collect();
        let name = name.to_lowercase();
        let synonyms = split_multi(row.get("synonyms"));

        if name.is_empty() || synonyms.is_empty() {
            return None;
        }

        Some(Self { name, synonyms })
    }
}

impl FromRow for IntentRecord {
    fn columns(opts: &NormalizeOptions) -> &'static [&'static str] {
        if opts.extended_intents {
            INTENT_COLUMNS_EXTENDED
        } else {
            INTENT_COLUMNS
        }
    }

    fn from_row(row: &RawRow, opts: &NormalizeOptions) -> Option<Self> {
        if is_skipped(row, opts) {
            return None;
        }

        let topic = row.get("topic").trim().to_lowercase();
        let statement = row.get("statement").trim();
        if topic.is_empty() || statement.is_empty() {
            return None;
        }

        let mut questions = vec![statement.to_string()];
        questions.extend(split_multi(row.get("synonyms")));

        let mut input_contexts = split_contexts(row.get("inputContext"));
        let mut output_contexts = split_contexts(row.get("outputContext"));
        if opts.derive_contexts {
            (input_contexts, output_contexts) =
                derive_contexts(&topic, input_contexts, output_contexts);
        }

        Some(Self {
            topic,
            questions,
            input_contexts,
            output_contexts,
        })
    }
}

impl FromRow for AnswerRecord {
    fn columns(_opts: &NormalizeOptions) -> &'static [&'static str] {
        ANSWER_COLUMNS
    }

    fn from_row(row: &RawRow, _opts: &NormalizeOptions) -> Option<Self> {
        let topic = row.get("topic").trim().to_lowercase();
        let answer = row.get("answer").trim();
        if topic.is_empty() || answer.is_empty() {
            return None;
        }

        Some(Self {
            topic,
            answer: answer.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parse and normalize a whole sheet, dropping invalid rows.
pub fn load_records<T: FromRow>(text: &str, opts: &NormalizeOptions) -> Result<Vec<T>> {
    let mut records = Vec::new();
    let mut dropped = 0usize;

    for row in parse_rows(text, T::columns(opts))? {
        match T::from_row(&row?, opts) {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }

    debug!(kept = records.len(), dropped, "normalized sheet");
    Ok(records)
}

/// Normalized contents of an intents sheet.
#[derive(Debug, Clone, Default)]
pub struct IntentSheet {
    pub intents: Vec<IntentRecord>,
    /// Answers carried in the extended layout's `answer` column, in file order.
    pub inline_answers: Vec<AnswerRecord>,
}

/// Parse the intents sheet, collecting inline answers when the extended
/// layout is in use. A row's inline answer is only kept if the row itself is a
/// valid intent.
pub fn load_intents(text: &str, opts: &NormalizeOptions) -> Result<IntentSheet> {
    let mut sheet = IntentSheet::default();
    let mut dropped = 0usize;

    for row in parse_rows(text, IntentRecord::columns(opts))? {
        let row = row?;
        let Some(intent) = IntentRecord::from_row(&row, opts) else {
            dropped += 1;
            continue;
        };

        if opts.extended_intents {
            if let Some(answer) = AnswerRecord::from_row(&row, opts) {
                sheet.inline_answers.push(answer);
            }
        }
        sheet.intents.push(intent);
    }

    debug!(
        kept = sheet.intents.len(),
        inline_answers = sheet.inline_answers.len(),
        dropped,
        "normalized intents sheet"
    );
    Ok(sheet)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn is_skipped(row: &RawRow, opts: &NormalizeOptions) -> bool {
    !opts.skip_marker.is_empty() && row.get("info").starts_with(opts.skip_marker.as_str())
}

/// Split a `;`-separated cell into trimmed, non-empty pieces.
fn split_multi(cell: &str) -> Vec<String> {
    cell.split(MULTI_VALUE_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Like [`split_multi`], lower-cased and without duplicates.
fn split_contexts(cell: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for ctx in split_multi(cell) {
        let ctx = ctx.to_lowercase();
        if !out.contains(&ctx) {
            out.push(ctx);
        }
    }
    out
}
