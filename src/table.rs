//! Row-oriented table of raw cell text with inferred column types.
//!
//! A [`Table`] keeps every cell exactly as ingested (trimmed text) and
//! records one inferred [`ColumnType`] per column. Numeric interpretation
//! happens lazily at analysis time through [`numeric_value`], so a cell
//! that does not parse is simply missing for numeric purposes while still
//! counting as its own level for categorical ones.
//!
//! # Column Types
//!
//! | Type | Inferred when | Used by |
//! |------|---------------|---------|
//! | [`Numeric`](ColumnType::Numeric) | > 80% of present sampled values parse | describe, correlation, compare target |
//! | [`Categorical`](ColumnType::Categorical) | everything else | frequencies, chi-square, compare grouping |
//!
//! # Example
//!
//! ```
//! use lss_stats::table::{Column, ColumnType, Table};
//!
//! let table = Table::new(
//!     vec![
//!         Column::new("Weight", ColumnType::Numeric),
//!         Column::new("Line", ColumnType::Categorical),
//!     ],
//!     vec![
//!         vec!["10.0".into(), "A".into()],
//!         vec!["12.0".into()],
//!     ],
//! );
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(table.column_count(), 2);
//! // Short rows are padded with empty cells.
//! assert_eq!(table.value(1, 1), "");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// Interprets a cell as a number.
///
/// The trimmed text must parse as a finite `f64`; empty cells, free text
/// and `inf`/`NaN` spellings all yield `None`.
///
/// ```
/// use lss_stats::table::numeric_value;
///
/// assert_eq!(numeric_value(" 2.5 "), Some(2.5));
/// assert_eq!(numeric_value("-4e2"), Some(-400.0));
/// assert_eq!(numeric_value(""), None);
/// assert_eq!(numeric_value("abc"), None);
/// assert_eq!(numeric_value("NaN"), None);
/// ```
#[inline]
pub fn numeric_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ── ColumnType ────────────────────────────────────────────────────────

/// Type inferred for a column from a sample of its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Values are (mostly) numbers.
    Numeric,
    /// Values are labels; also the fallback for columns with no data.
    Categorical,
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric => write!(f, "Numeric"),
            Self::Categorical => write!(f, "Categorical"),
        }
    }
}

// ── Column ────────────────────────────────────────────────────────────

/// Column metadata: a name and its inferred type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl Column {
    /// Creates a column descriptor.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    /// Returns `true` for numeric columns.
    pub fn is_numeric(&self) -> bool {
        self.column_type == ColumnType::Numeric
    }

    /// Returns `true` for categorical columns.
    pub fn is_categorical(&self) -> bool {
        self.column_type == ColumnType::Categorical
    }
}

// ── Record ────────────────────────────────────────────────────────────

/// One data row. Cells are positional, aligned with [`Table::columns`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    values: Vec<String>,
}

impl Record {
    /// Returns the raw cell at column position `idx`, or `""` if out of range.
    #[inline]
    pub fn get(&self, idx: usize) -> &str {
        self.values.get(idx).map_or("", String::as_str)
    }

    /// Returns all cells in column order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Number of cells (always the table's column count).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the record has no cells.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ── Table ─────────────────────────────────────────────────────────────

/// Immutable table: column descriptors in header order plus data rows.
///
/// Every record holds exactly one cell per column; construction pads short
/// rows with empty cells and drops surplus cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Record>,
}

impl Table {
    /// Builds a table, normalizing every row to the column count.
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut values| {
                values.resize(width, String::new());
                Record { values }
            })
            .collect();
        Self { columns, rows }
    }

    /// Creates a table with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the number of data rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of columns.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the table has no columns (empty input).
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns column descriptors in header order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns data rows in input order.
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Returns the column at position `index`.
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Returns the column with the given `name`.
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    /// Returns the position of the column with the given `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Returns the raw cell at (`row`, `col`).
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of range.
    #[inline]
    pub fn value(&self, row: usize, col: usize) -> &str {
        self.rows[row].get(col)
    }

    /// Iterates the raw cells of column position `col`, in row order.
    pub fn column_values(&self, col: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |r| r.get(col))
    }

    /// Iterates the raw cells of the named column.
    pub fn values_by_name(&self, name: &str) -> Result<impl Iterator<Item = &str> + '_, StatsError> {
        let col = self
            .column_index(name)
            .ok_or_else(|| StatsError::ColumnNotFound {
                name: name.to_string(),
            })?;
        Ok(self.column_values(col))
    }

    /// Positions of numeric columns, in header order.
    pub fn numeric_columns(&self) -> Vec<usize> {
        self.positions_of(ColumnType::Numeric)
    }

    /// Positions of categorical columns, in header order.
    pub fn categorical_columns(&self) -> Vec<usize> {
        self.positions_of(ColumnType::Categorical)
    }

    /// Returns `(name, type)` for every column.
    pub fn schema(&self) -> Vec<(&str, ColumnType)> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.column_type))
            .collect()
    }

    fn positions_of(&self, ty: ColumnType) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.column_type == ty)
            .map(|(i, _)| i)
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec![
                Column::new("x", ColumnType::Numeric),
                Column::new("g", ColumnType::Categorical),
                Column::new("y", ColumnType::Numeric),
            ],
            vec![
                vec!["1".into(), "A".into(), "2".into()],
                vec!["3".into(), "B".into()],
                vec!["5".into(), "A".into(), "6".into(), "extra".into()],
            ],
        )
    }

    // ── numeric_value ────────────────────────────────────────────

    #[test]
    fn numeric_value_accepts_numbers() {
        assert_eq!(numeric_value("42"), Some(42.0));
        assert_eq!(numeric_value("-1.5"), Some(-1.5));
        assert_eq!(numeric_value("+3"), Some(3.0));
        assert_eq!(numeric_value(".5"), Some(0.5));
        assert_eq!(numeric_value("2.3e10"), Some(2.3e10));
    }

    #[test]
    fn numeric_value_rejects_non_finite_and_text() {
        assert_eq!(numeric_value("   "), None);
        assert_eq!(numeric_value("inf"), None);
        assert_eq!(numeric_value("-infinity"), None);
        assert_eq!(numeric_value("nan"), None);
        assert_eq!(numeric_value("1,5"), None);
        assert_eq!(numeric_value("12kg"), None);
    }

    // ── Table shape ──────────────────────────────────────────────

    #[test]
    fn rows_normalized_to_width() {
        let t = sample();
        assert_eq!(t.row_count(), 3);
        for r in t.rows() {
            assert_eq!(r.len(), 3);
        }
        assert_eq!(t.value(1, 2), "");
        assert_eq!(t.value(2, 2), "6");
    }

    #[test]
    fn column_lookup() {
        let t = sample();
        assert_eq!(t.column_index("g"), Some(1));
        assert!(t.column_by_name("g").unwrap().is_categorical());
        assert!(t.column_by_name("missing").is_none());
        assert_eq!(t.column(2).unwrap().name, "y");
    }

    #[test]
    fn type_partitions_in_header_order() {
        let t = sample();
        assert_eq!(t.numeric_columns(), vec![0, 2]);
        assert_eq!(t.categorical_columns(), vec![1]);
        assert_eq!(
            t.schema(),
            vec![
                ("x", ColumnType::Numeric),
                ("g", ColumnType::Categorical),
                ("y", ColumnType::Numeric),
            ]
        );
    }

    #[test]
    fn values_by_name() {
        let t = sample();
        let g: Vec<&str> = t.values_by_name("g").unwrap().collect();
        assert_eq!(g, vec!["A", "B", "A"]);
        let err = t.values_by_name("nope").err().unwrap();
        assert_eq!(
            err,
            StatsError::ColumnNotFound {
                name: "nope".into()
            }
        );
    }

    #[test]
    fn empty_table() {
        let t = Table::empty();
        assert!(t.is_empty());
        assert_eq!(t.row_count(), 0);
        assert!(t.numeric_columns().is_empty());
    }

    #[test]
    fn serializes_type_lowercase() {
        let json = serde_json::to_string(&Column::new("w", ColumnType::Numeric)).unwrap();
        assert_eq!(json, r#"{"name":"w","type":"numeric"}"#);
    }
}
