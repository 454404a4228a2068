//! Delimited-text ingestion with column type inference.
//!
//! Parses comma-separated text into a [`Table`](crate::table::Table) and
//! classifies each column as Numeric or Categorical from a sample of its
//! values.
//!
//! # Format
//!
//! - First non-blank line is the header; names are trimmed.
//! - `\r\n`, `\n` and lone `\r` line endings are accepted.
//! - Blank lines are skipped; short rows are padded with empty cells and
//!   surplus cells are dropped.
//! - Cells are split positionally on the delimiter. Quoting and escaping
//!   are **not** supported: `"a,b"` is two cells.
//! - Parsing never fails. Malformed rows are absorbed, and an input with no
//!   header yields an empty table.
//!
//! # Type inference
//!
//! The first `sample_size` rows (default 100) of each column are sampled.
//! Among the *present* values (non-empty and not a missing marker), the
//! column is Numeric when the fraction that parses as a number is strictly
//! greater than `numeric_threshold` (default 0.8). A column with no present
//! values is Categorical.
//!
//! # Example
//!
//! ```
//! use lss_stats::ingest::parse;
//! use lss_stats::table::ColumnType;
//!
//! let table = parse("Weight,Line\n10.0,A\n12.0,A\n9.0,B\n11.0,B\n");
//! assert_eq!(table.row_count(), 4);
//! assert_eq!(table.column(0).unwrap().column_type, ColumnType::Numeric);
//! assert_eq!(table.column(1).unwrap().column_type, ColumnType::Categorical);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StatsError;
use crate::table::{numeric_value, Column, ColumnType, Table};

/// Rows sampled per column for type inference.
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// Fraction of present sampled values that must parse as numbers
/// (strictly exceeded) for a column to be Numeric.
pub const DEFAULT_NUMERIC_THRESHOLD: f64 = 0.8;

/// Parses delimited text with default settings.
///
/// Shorthand for `CsvParser::new().parse_str(raw)`.
pub fn parse(raw: &str) -> Table {
    CsvParser::new().parse_str(raw)
}

/// Ingestion configuration and entry point.
///
/// ```
/// use lss_stats::ingest::CsvParser;
///
/// let table = CsvParser::new().delimiter(';').parse_str("a;b\n1;2\n3;4\n");
/// assert_eq!(table.row_count(), 2);
/// assert_eq!(table.column_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvParser {
    delimiter: char,
    sample_size: usize,
    numeric_threshold: f64,
    missing_markers: Vec<String>,
}

impl CsvParser {
    /// Creates a parser with default settings (comma delimiter, 100-row
    /// sample, 0.8 numeric threshold, no extra missing markers).
    pub fn new() -> Self {
        Self {
            delimiter: ',',
            sample_size: DEFAULT_SAMPLE_SIZE,
            numeric_threshold: DEFAULT_NUMERIC_THRESHOLD,
            missing_markers: Vec::new(),
        }
    }

    /// Sets the cell delimiter (default: comma).
    pub fn delimiter(mut self, delim: char) -> Self {
        self.delimiter = delim;
        self
    }

    /// Sets how many leading rows are sampled for type inference.
    pub fn sample_size(mut self, rows: usize) -> Self {
        self.sample_size = rows;
        self
    }

    /// Sets the numeric fraction that must be exceeded for a Numeric column.
    pub fn numeric_threshold(mut self, threshold: f64) -> Self {
        self.numeric_threshold = threshold;
        self
    }

    /// Sets values treated as missing during inference, in addition to the
    /// empty string (e.g. `NA`).
    pub fn missing_markers(mut self, markers: Vec<String>) -> Self {
        self.missing_markers = markers;
        self
    }

    /// Parses text into a table. Never fails.
    ///
    /// Whitespace-only lines are skipped rather than kept as rows of empty
    /// cells, so they never count toward an empty-string level.
    pub fn parse_str(&self, input: &str) -> Table {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        let normalized = input.replace("\r\n", "\n").replace('\r', "\n");

        let mut lines = normalized.split('\n').filter(|l| !l.trim().is_empty());
        let Some(header_line) = lines.next() else {
            debug!("no header line; returning empty table");
            return Table::empty();
        };

        let (names, slots) = self.header(header_line);
        let rows: Vec<Vec<String>> = lines
            .map(|line| {
                let cells = self.split_cells(line);
                slots
                    .iter()
                    .map(|&pos| cells.get(pos).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        let columns: Vec<Column> = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let ty = self.infer_type(rows.iter().map(|r| r[idx].as_str()));
                Column::new(name, ty)
            })
            .collect();

        debug!(
            columns = columns.len(),
            rows = rows.len(),
            numeric = columns.iter().filter(|c| c.is_numeric()).count(),
            "parsed table"
        );

        Table::new(columns, rows)
    }

    /// Reads and parses a file from disk.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Table, StatsError> {
        let content = std::fs::read_to_string(path)?;
        Ok(self.parse_str(&content))
    }

    // ── Internal parsing ─────────────────────────────────────────

    /// Returns unique column names (first-occurrence order) and, for each,
    /// the source cell position to read. A repeated name reads from its
    /// last occurrence.
    fn header(&self, line: &str) -> (Vec<String>, Vec<usize>) {
        let mut names: Vec<String> = Vec::new();
        let mut slots: Vec<usize> = Vec::new();
        for (pos, token) in self.split_cells(line).into_iter().enumerate() {
            match names.iter().position(|n| *n == token) {
                Some(existing) => slots[existing] = pos,
                None => {
                    names.push(token);
                    slots.push(pos);
                }
            }
        }
        (names, slots)
    }

    fn split_cells(&self, line: &str) -> Vec<String> {
        line.split(self.delimiter)
            .map(|cell| cell.trim().to_string())
            .collect()
    }

    fn is_missing(&self, value: &str) -> bool {
        value.is_empty() || self.missing_markers.iter().any(|m| m == value)
    }

    /// Classifies a column from its leading values.
    fn infer_type<'a>(&self, values: impl Iterator<Item = &'a str>) -> ColumnType {
        let mut present = 0usize;
        let mut numeric = 0usize;
        for v in values.take(self.sample_size) {
            if self.is_missing(v) {
                continue;
            }
            present += 1;
            if numeric_value(v).is_some() {
                numeric += 1;
            }
        }

        if present > 0 && numeric as f64 / present as f64 > self.numeric_threshold {
            ColumnType::Numeric
        } else {
            ColumnType::Categorical
        }
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
