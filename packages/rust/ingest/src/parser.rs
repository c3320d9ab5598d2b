//! Headerless CSV row parser.
//!
//! Spreadsheet exports carry no header line; each sheet has a fixed positional
//! schema. Ragged rows are tolerated: missing trailing cells read as empty and
//! surplus cells are ignored.

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use kbsync_shared::{KbSyncError, Result};

// ---------------------------------------------------------------------------
// Schemas
// ---------------------------------------------------------------------------

/// `Intents.csv` columns.
pub const INTENT_COLUMNS: &[&str] = &[
    "info",
    "statement",
    "synonyms",
    "topic",
    "outputContext",
    "inputContext",
];

/// `Intents.csv` columns for sheets that carry answers and links inline.
pub const INTENT_COLUMNS_EXTENDED: &[&str] = &[
    "info",
    "statement",
    "synonyms",
    "topic",
    "outputContext",
    "inputContext",
    "url",
    "data",
    "answer",
    "link",
    "additionalInfo",
];

/// `Entities.csv` columns.
pub const ENTITY_COLUMNS: &[&str] = &["name", "synonyms"];

/// `Answers.csv` columns.
pub const ANSWER_COLUMNS: &[&str] = &["topic", "answer"];

// ---------------------------------------------------------------------------
// RawRow
// ---------------------------------------------------------------------------

/// One CSV line keyed by the schema's column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line number the record started on.
    pub line: u64,
    columns: &'static [&'static str],
    values: Vec<String>,
}

impl RawRow {
    /// Build a row from positional cells, padding or truncating to the schema.
    pub fn new(line: u64, columns: &'static [&'static str], cells: Vec<String>) -> Self {
        let mut values = cells;
        values.resize(columns.len(), String::new());
        Self {
            line,
            columns,
            values,
        }
    }

    /// Raw cell for `column`; empty when the column is not part of the schema.
    pub fn get(&self, column: &str) -> &str {
        self.columns
            .iter()
            .position(|c| *c == column)
            .map(|i| self.values[i].as_str())
            .unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Lazy iterator over the rows of one CSV document.
pub struct Rows<'a> {
    records: StringRecordsIntoIter<&'a [u8]>,
    columns: &'static [&'static str],
}

impl Iterator for Rows<'_> {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(
            record
                .map(|r| to_row(&r, self.columns))
                .map_err(|e| KbSyncError::parse(format!("malformed CSV: {e}"))),
        )
    }
}

/// Parse `text` as headerless CSV using `columns` as the positional schema.
///
/// Returns an error up front when the document contains an unterminated quoted
/// field; per-record failures surface through the iterator.
pub fn parse_rows<'a>(text: &'a str, columns: &'static [&'static str]) -> Result<Rows<'a>> {
    if let Some(line) = unterminated_quote_line(text) {
        return Err(KbSyncError::parse(format!(
            "unterminated quoted field starting on line {line}"
        )));
    }

    let records = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes())
        .into_records();

    Ok(Rows { records, columns })
}

fn to_row(record: &StringRecord, columns: &'static [&'static str]) -> RawRow {
    let line = record.position().map_or(0, |p| p.line());
    let cells = record
        .iter()
        .take(columns.len())
        .map(str::to_string)
        .collect();
    RawRow::new(line, columns, cells)
}

/// Line of the opening quote that is never closed, if any.
///
/// Only a quote at the start of a cell opens a quoted field; quotes inside an
/// unquoted cell (`Our 55" model`) are literal, as the csv reader treats them.
fn unterminated_quote_line(text: &str) -> Option<u64> {
    let mut line = 1u64;
    let mut open_line = None;
    let mut at_cell_start = true;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
        }

        if open_line.is_some() {
            if c == '"' {
                // `""` is an escaped quote inside a quoted field.
                if chars.peek() == Some(&'"') {
                    chars.next();
                } else {
                    open_line = None;
                }
            }
            continue;
        }

        match c {
            '"' if at_cell_start => open_line = Some(line),
            ',' | '\n' => {
                at_cell_start = true;
                continue;
            }
            _ => {}
        }
        at_cell_start = false;
    }

    open_line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str, columns: &'static [&'static str]) -> Vec<RawRow> {
        parse_rows(text, columns)
            .expect("parse")
            .collect::<Result<Vec<_>>>()
            .expect("rows")
    }

    #[test]
    fn rows_follow_file_order() {
        let rows = collect("greeting,Hello there!\nfarewell,Bye\n", ANSWER_COLUMNS);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("topic"), "greeting");
        assert_eq!(rows[0].get("answer"), "Hello there!");
        assert_eq!(rows[1].get("topic"), "farewell");
        assert_eq!(rows[1].line, 2);
    }

    #[test]
    fn ragged_rows_are_padded() {
        let rows = collect(",Hi,Hello;Hey,Greeting\n", INTENT_COLUMNS);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("topic"), "Greeting");
        assert_eq!(rows[0].get("outputContext"), "");
        assert_eq!(rows[0].get("inputContext"), "");
    }

    #[test]
    fn surplus_cells_are_ignored() {
        let rows = collect("@colour,red;blue,extra,cells\n", ENTITY_COLUMNS);
        assert_eq!(rows[0].get("synonyms"), "red;blue");
        assert_eq!(rows[0].get("extra"), "");
    }

    #[test]
    fn unknown_column_reads_empty() {
        let rows = collect("greeting,Hi\n", ANSWER_COLUMNS);
        assert_eq!(rows[0].get("statement"), "");
    }

    #[test]
    fn quoted_cells_keep_commas_and_newlines() {
        let text = "greeting,\"Hello, friend.\nHow are you?\"\nfarewell,\"She said \"\"bye\"\"\"\n";
        let rows = collect(text, ANSWER_COLUMNS);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("answer"), "Hello, friend.\nHow are you?");
        assert_eq!(rows[1].get("answer"), "She said \"bye\"");
    }

    #[test]
    fn unterminated_quote_is_parse_error() {
        let text = "greeting,Hi\nfarewell,\"Bye\n";
        match parse_rows(text, ANSWER_COLUMNS) {
            Err(KbSyncError::Parse { message }) => assert!(message.contains("line 2")),
            Err(other) => panic!("expected parse error, got {other}"),
            Ok(_) => panic!("expected parse error"),
        }
    }

    #[test]
    fn quotes_inside_unquoted_cells_are_literal() {
        let rows = collect("tv,Our 55\" model\nradio,Our 5\" and 7\" sets\n", ANSWER_COLUMNS);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("answer"), "Our 55\" model");
        assert_eq!(rows[1].get("answer"), "Our 5\" and 7\" sets");
    }

    #[test]
    fn unclosed_quote_after_literal_quotes_is_still_detected() {
        let text = "tv,Our 55\" model\nradio,\"Our 5 sets\n";
        match parse_rows(text, ANSWER_COLUMNS) {
            Err(KbSyncError::Parse { message }) => assert!(message.contains("line 2")),
            Err(other) => panic!("expected parse error, got {other}"),
            Ok(_) => panic!("expected parse error"),
        }
    }

    #[test]
    fn parsing_is_restartable() {
        let text = "greeting,Hi\n";
        let first = collect(text, ANSWER_COLUMNS);
        let second = collect(text, ANSWER_COLUMNS);
        assert_eq!(first, second);
    }
}
