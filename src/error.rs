//! Error types for lss-stats.

use std::fmt;

use crate::analysis::AnalysisGoal;
use crate::table::ColumnType;

/// All errors produced by lss-stats operations.
///
/// Dirty data is never an error: unparseable cells are treated as missing
/// and degenerate statistics use fixed fallbacks. Only requests that cannot
/// be satisfied at all are reported.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsError {
    /// An explicitly requested goal cannot run on this table with these parameters.
    InvalidParameters {
        goal: AnalysisGoal,
        reason: ParameterIssue,
    },
    /// Column not found in the table.
    ColumnNotFound { name: String },
    /// I/O error while reading input.
    Io(String),
    /// Result could not be serialized.
    Serialization(String),
}

/// Why a set of analysis parameters was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterIssue {
    /// A required column parameter was not supplied (or was blank).
    MissingColumn(ColumnRole),
    /// A column parameter names a column the table does not have.
    UnknownColumn(String),
    /// A column parameter names a column of the wrong inferred type.
    WrongColumnType {
        column: String,
        expected: ColumnType,
        actual: ColumnType,
    },
    /// The table lacks enough numeric or categorical columns.
    InsufficientColumns {
        min_required: usize,
        numeric: usize,
        categorical: usize,
    },
}

/// Role a column plays in a group comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Target,
    Group,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Target => write!(f, "target column"),
            Self::Group => write!(f, "group column"),
        }
    }
}

impl fmt::Display for ParameterIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn(role) => write!(f, "{role} not set"),
            Self::UnknownColumn(name) => write!(f, "column '{name}' not found"),
            Self::WrongColumnType {
                column,
                expected,
                actual,
            } => write!(f, "column '{column}' is {actual}, expected {expected}"),
            Self::InsufficientColumns {
                min_required,
                numeric,
                categorical,
            } => write!(
                f,
                "need at least {min_required} numeric or categorical columns, \
                 got {numeric} numeric and {categorical} categorical"
            ),
        }
    }
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameters { goal, reason } => {
                write!(f, "invalid parameters for {goal}: {reason}")
            }
            Self::ColumnNotFound { name } => write!(f, "column '{name}' not found"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::Serialization(msg) => write!(f, "serialization error: {msg}"),
        }
    }
}

impl std::error::Error for StatsError {}

impl From<std::io::Error> for StatsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for StatsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_parameters() {
        let err = StatsError::InvalidParameters {
            goal: AnalysisGoal::Compare,
            reason: ParameterIssue::MissingColumn(ColumnRole::Group),
        };
        assert_eq!(
            err.to_string(),
            "invalid parameters for Compare: group column not set"
        );
    }

    #[test]
    fn display_wrong_type() {
        let issue = ParameterIssue::WrongColumnType {
            column: "Line".into(),
            expected: ColumnType::Numeric,
            actual: ColumnType::Categorical,
        };
        assert_eq!(
            issue.to_string(),
            "column 'Line' is Categorical, expected Numeric"
        );
    }

    #[test]
    fn io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        let err: StatsError = io.into();
        assert!(matches!(err, StatsError::Io(_)));
    }
}
