//! Analysis engine over an ingested [`Table`].
//!
//! [`analyze`] runs up to four independent blocks, selected by the
//! requested [`AnalysisGoal`]:
//!
//! | Block | Goals | Precondition |
//! |-------|-------|--------------|
//! | Describe (numeric summaries + categorical frequencies) | Describe, Auto | none |
//! | Correlation (Pearson r per numeric pair) | Associate, Auto | ≥ 2 numeric columns |
//! | Group comparison | Compare, Auto | numeric target + categorical group supplied |
//! | Chi-square association | Associate, Auto | ≥ 2 categorical columns |
//!
//! Dirty data is tolerated: a cell that does not parse as a number is
//! missing wherever a column is used numerically. Degenerate cases use
//! fixed substitutions instead of failing:
//!
//! - sample standard deviation divides by `n − 1`, or by 1 when `n = 1`;
//! - a correlation whose standard-deviation product is zero divides the
//!   covariance by 1;
//! - chi-square cells with zero expected count contribute nothing.
//!
//! Only an explicit (non-Auto) goal whose preconditions fail is reported,
//! as [`StatsError::InvalidParameters`]. Under [`AnalysisGoal::Auto`] such
//! blocks are skipped.
//!
//! # Example
//!
//! ```
//! use lss_stats::analysis::{analyze, AnalysisGoal, AnalysisParams};
//! use lss_stats::ingest::parse;
//!
//! let table = parse("Weight,Line\n10.0,A\n12.0,A\n9.0,B\n11.0,B\n");
//! let params = AnalysisParams::compare("Weight", "Line");
//! let bundle = analyze(&table, AnalysisGoal::Compare, &params).unwrap();
//!
//! let groups = bundle.group_summary.unwrap();
//! let a = groups.group("A").unwrap();
//! assert_eq!(a.n, 2);
//! assert!((a.mean - 11.0).abs() < 1e-10);
//! assert!((a.sd - 2f64.sqrt()).abs() < 1e-10);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{ColumnRole, ParameterIssue, StatsError};
use crate::table::{numeric_value, ColumnType, Table};

/// Minimum paired observations for a correlation to be reported.
const MIN_CORRELATION_PAIRS: usize = 3;

// ── Request types ─────────────────────────────────────────────────────

/// What the caller wants to learn from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisGoal {
    /// Numeric summaries and categorical frequency tables.
    Describe,
    /// Numeric target summarized per level of a categorical column.
    Compare,
    /// Numeric correlations and categorical chi-square.
    Associate,
    /// Every block whose preconditions hold.
    Auto,
}

impl AnalysisGoal {
    fn describes(self) -> bool {
        matches!(self, Self::Describe | Self::Auto)
    }

    fn associates(self) -> bool {
        matches!(self, Self::Associate | Self::Auto)
    }

    fn compares(self) -> bool {
        matches!(self, Self::Compare | Self::Auto)
    }
}

impl fmt::Display for AnalysisGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Describe => write!(f, "Describe"),
            Self::Compare => write!(f, "Compare"),
            Self::Associate => write!(f, "Associate"),
            Self::Auto => write!(f, "Auto"),
        }
    }
}

/// Optional column selections for a group comparison.
///
/// Blank names count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisParams {
    pub target_column: Option<String>,
    pub group_column: Option<String>,
}

impl AnalysisParams {
    /// Parameters for comparing `target` across the levels of `group`.
    pub fn compare(target: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            target_column: Some(target.into()),
            group_column: Some(group.into()),
        }
    }

    fn target(&self) -> Option<&str> {
        non_blank(self.target_column.as_deref())
    }

    fn group(&self) -> Option<&str> {
        non_blank(self.group_column.as_deref())
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}

// ── Result types ──────────────────────────────────────────────────────

/// Summary of the parseable values of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub column: String,
    pub n: usize,
    pub mean: f64,
    /// Sample standard deviation (`n − 1` denominator, 1 when `n = 1`).
    pub sd: f64,
    pub min: f64,
    pub max: f64,
}

/// Occurrence count of one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frequency {
    pub level: String,
    pub count: usize,
}

/// Level counts of one categorical column, in first-encounter order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable {
    pub column: String,
    pub levels: Vec<Frequency>,
}

impl FrequencyTable {
    /// Count for `level`, if it occurs.
    pub fn count(&self, level: &str) -> Option<usize> {
        self.levels
            .iter()
            .find(|f| f.level == level)
            .map(|f| f.count)
    }
}

/// Pearson correlation between two numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub a: String,
    pub b: String,
    pub r: f64,
}

/// Target statistics for one group level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub level: String,
    pub n: usize,
    pub mean: f64,
    pub sd: f64,
}

/// Numeric target summarized per level of a grouping column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub target: String,
    pub group_by: String,
    /// Non-empty groups in first-encounter order.
    pub groups: Vec<GroupStats>,
}

impl GroupSummary {
    /// Statistics for `level`, if that group has any values.
    pub fn group(&self, level: &str) -> Option<&GroupStats> {
        self.groups.iter().find(|g| g.level == level)
    }
}

/// Pearson chi-squared test of association between two categorical columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChiSquare {
    pub a: String,
    pub b: String,
    pub chi_squared: f64,
    pub degrees_of_freedom: usize,
}

/// Output of one [`analyze`] call.
///
/// `None` means the section was not computed (goal excluded it or its
/// preconditions failed). `Some` with an empty collection means it ran and
/// found nothing to report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub describe: Option<Vec<NumericSummary>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequencies: Option<Vec<FrequencyTable>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlations: Option<Vec<Correlation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_summary: Option<GroupSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chi_square: Option<ChiSquare>,
}

impl ResultBundle {
    /// Returns `true` if no section was computed.
    pub fn is_empty(&self) -> bool {
        self.describe.is_none()
            && self.frequencies.is_none()
            && self.correlations.is_none()
            && self.group_summary.is_none()
            && self.chi_square.is_none()
    }

    /// Numeric summary for `column`, if described.
    pub fn summary(&self, column: &str) -> Option<&NumericSummary> {
        self.describe.as_ref()?.iter().find(|s| s.column == column)
    }

    /// Frequency table for `column`, if described.
    pub fn frequency_table(&self, column: &str) -> Option<&FrequencyTable> {
        self.frequencies.as_ref()?.iter().find(|f| f.column == column)
    }

    /// Correlation between `a` and `b` (either order), if computed.
    pub fn correlation(&self, a: &str, b: &str) -> Option<&Correlation> {
        self.correlations
            .as_ref()?
            .iter()
            .find(|c| (c.a == a && c.b == b) || (c.a == b && c.b == a))
    }
}

// ── Entry point ───────────────────────────────────────────────────────

/// Runs the blocks selected by `goal` over `table`.
///
/// Pure and deterministic: the table is only read, and identical inputs
/// produce identical bundles.
///
/// # Errors
///
/// [`StatsError::InvalidParameters`] when `goal` is `Compare` and the
/// target/group columns are unset, unknown, or of the wrong type, or when
/// `goal` is `Associate` and the table has fewer than two numeric and
/// fewer than two categorical columns. `Auto` never fails.
pub fn analyze(
    table: &Table,
    goal: AnalysisGoal,
    params: &AnalysisParams,
) -> Result<ResultBundle, StatsError> {
    let numeric = table.numeric_columns();
    let categorical = table.categorical_columns();
    debug!(
        %goal,
        rows = table.row_count(),
        numeric = numeric.len(),
        categorical = categorical.len(),
        "analyze"
    );

    let compare_columns = if goal.compares() {
        match resolve_compare_columns(table, params) {
            Ok(cols) => Some(cols),
            Err(reason) if goal == AnalysisGoal::Compare => {
                return Err(StatsError::InvalidParameters { goal, reason });
            }
            Err(reason) => {
                debug!(%reason, "skipping group comparison");
                None
            }
        }
    } else {
        None
    };

    if goal == AnalysisGoal::Associate && numeric.len() < 2 && categorical.len() < 2 {
        return Err(StatsError::InvalidParameters {
            goal,
            reason: ParameterIssue::InsufficientColumns {
                min_required: 2,
                numeric: numeric.len(),
                categorical: categorical.len(),
            },
        });
    }

    let mut bundle = ResultBundle::default();

    if goal.describes() {
        bundle.describe = Some(describe_numeric(table, &numeric));
        bundle.frequencies = Some(frequencies(table, &categorical));
    }

    if goal.associates() {
        if numeric.len() >= 2 {
            bundle.correlations = Some(correlations(table, &numeric));
        } else {
            debug!(numeric = numeric.len(), "skipping correlations");
        }
    }

    if let Some((target, group)) = compare_columns {
        bundle.group_summary = Some(group_summary(table, target, group));
    }

    if goal.associates() {
        if let &[a, b, ..] = categorical.as_slice() {
            bundle.chi_square = chi_square(table, a, b);
        } else {
            debug!(categorical = categorical.len(), "skipping chi-square");
        }
    }

    Ok(bundle)
}

/// Checks the comparison parameters and returns (target, group) positions.
fn resolve_compare_columns(
    table: &Table,
    params: &AnalysisParams,
) -> Result<(usize, usize), ParameterIssue> {
    let target = params
        .target()
        .ok_or(ParameterIssue::MissingColumn(ColumnRole::Target))?;
    let group = params
        .group()
        .ok_or(ParameterIssue::MissingColumn(ColumnRole::Group))?;

    let target_idx = typed_column(table, target, ColumnType::Numeric)?;
    let group_idx = typed_column(table, group, ColumnType::Categorical)?;
    Ok((target_idx, group_idx))
}

fn typed_column(table: &Table, name: &str, expected: ColumnType) -> Result<usize, ParameterIssue> {
    let idx = table
        .column_index(name)
        .ok_or_else(|| ParameterIssue::UnknownColumn(name.to_string()))?;
    let actual = table.columns()[idx].column_type;
    if actual != expected {
        return Err(ParameterIssue::WrongColumnType {
            column: name.to_string(),
            expected,
            actual,
        });
    }
    Ok(idx)
}

// ── Describe ──────────────────────────────────────────────────────────

fn describe_numeric(table: &Table, numeric: &[usize]) -> Vec<NumericSummary> {
    numeric
        .iter()
        .filter_map(|&col| {
            let values: Vec<f64> = table.column_values(col).filter_map(numeric_value).collect();
            if values.is_empty() {
                debug!(column = %table.columns()[col].name, "no numeric values; omitted");
                return None;
            }
            let (mean, sd) = mean_sd(&values);
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            Some(NumericSummary {
                column: table.columns()[col].name.clone(),
                n: values.len(),
                mean,
                sd,
                min,
                max,
            })
        })
        .collect()
}

fn frequencies(table: &Table, categorical: &[usize]) -> Vec<FrequencyTable> {
    categorical
        .iter()
        .map(|&col| {
            let (levels, codes) = encode_levels(table, col);
            let mut counts = vec![0usize; levels.len()];
            for code in codes {
                counts[code] += 1;
            }
            FrequencyTable {
                column: table.columns()[col].name.clone(),
                levels: levels
                    .into_iter()
                    .zip(counts)
                    .map(|(level, count)| Frequency {
                        level: level.to_string(),
                        count,
                    })
                    .collect(),
            }
        })
        .collect()
}

// ── Correlation ───────────────────────────────────────────────────────

fn correlations(table: &Table, numeric: &[usize]) -> Vec<Correlation> {
    let mut out = Vec::new();
    for (i, &a) in numeric.iter().enumerate() {
        for &b in &numeric[i + 1..] {
            let (xs, ys): (Vec<f64>, Vec<f64>) = table
                .rows()
                .iter()
                .filter_map(|row| Some((numeric_value(row.get(a))?, numeric_value(row.get(b))?)))
                .unzip();

            let name_a = &table.columns()[a].name;
            let name_b = &table.columns()[b].name;
            match pearson_r(&xs, &ys) {
                Some(r) => out.push(Correlation {
                    a: name_a.clone(),
                    b: name_b.clone(),
                    r,
                }),
                None => trace!(a = %name_a, b = %name_b, pairs = xs.len(), "too few pairs"),
            }
        }
    }
    out
}

/// Pearson correlation of paired samples.
///
/// `r = cov(x, y) / (sd(x) · sd(y))` with `n − 1` denominators. When the
/// product of standard deviations is zero the covariance is divided by 1
/// instead, so a constant variable yields `r = 0`.
///
/// Returns `None` when the slices differ in length or hold fewer than three
/// pairs.
///
/// ```
/// use lss_stats::analysis::pearson_r;
///
/// let r = pearson_r(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 8.0]).unwrap();
/// assert!((r - 1.0).abs() < 1e-10);
/// assert!(pearson_r(&[1.0, 2.0], &[3.0, 4.0]).is_none());
/// ```
pub fn pearson_r(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n < MIN_CORRELATION_PAIRS || n != y.len() {
        return None;
    }

    let denom = (n - 1) as f64;
    let mx = mean(x);
    let my = mean(y);
    let cov = x
        .iter()
        .zip(y)
        .map(|(a, b)| (a - mx) * (b - my))
        .sum::<f64>()
        / denom;
    let sx = (x.iter().map(|a| (a - mx).powi(2)).sum::<f64>() / denom).sqrt();
    let sy = (y.iter().map(|b| (b - my).powi(2)).sum::<f64>() / denom).sqrt();

    let scale = sx * sy;
    Some(if scale == 0.0 { cov } else { cov / scale })
}

// ── Group comparison ──────────────────────────────────────────────────

fn group_summary(table: &Table, target: usize, group: usize) -> GroupSummary {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<f64>)> = Vec::new();

    for row in table.rows() {
        let Some(v) = numeric_value(row.get(target)) else {
            continue;
        };
        let level = row.get(group);
        let slot = *index.entry(level).or_insert_with(|| {
            groups.push((level, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(v);
    }

    GroupSummary {
        target: table.columns()[target].name.clone(),
        group_by: table.columns()[group].name.clone(),
        groups: groups
            .into_iter()
            .map(|(level, values)| {
                let (mean, sd) = mean_sd(&values);
                GroupStats {
                    level: level.to_string(),
                    n: values.len(),
                    mean,
                    sd,
                }
            })
            .collect(),
    }
}

// ── Chi-square ────────────────────────────────────────────────────────

fn chi_square(table: &Table, a: usize, b: usize) -> Option<ChiSquare> {
    let (levels_a, codes_a) = encode_levels(table, a);
    let (levels_b, codes_b) = encode_levels(table, b);
    let (n_rows, n_cols) = (levels_a.len(), levels_b.len());

    // Sparse and ordered: ID-like columns would make a dense table
    // quadratic in rows, and a fixed order keeps the sum reproducible.
    let mut row_totals = vec![0usize; n_rows];
    let mut col_totals = vec![0usize; n_cols];
    let mut observed: BTreeMap<(usize, usize), usize> = BTreeMap::new();
    for (i, j) in codes_a.into_iter().zip(codes_b) {
        row_totals[i] += 1;
        col_totals[j] += 1;
        *observed.entry((i, j)).or_insert(0) += 1;
    }

    let grand: usize = row_totals.iter().sum();
    if grand == 0 {
        debug!("empty contingency table; chi-square omitted");
        return None;
    }

    // Levels come from the data, so every marginal is nonzero and the
    // expected counts over all cells sum to the grand total. Unobserved
    // cells each contribute their expected count.
    let grand = grand as f64;
    let mut chi_squared = grand;
    for (&(i, j), &count) in &observed {
        let expected = row_totals[i] as f64 * col_totals[j] as f64 / grand;
        chi_squared += (count as f64 - expected).powi(2) / expected - expected;
    }
    trace!(
        cells = observed.len(),
        possible = n_rows.saturating_mul(n_cols),
        "contingency table counted"
    );

    Some(ChiSquare {
        a: table.columns()[a].name.clone(),
        b: table.columns()[b].name.clone(),
        chi_squared,
        degrees_of_freedom: n_rows.saturating_sub(1) * n_cols.saturating_sub(1),
    })
}

/// Pearson chi-squared statistic of a contingency table.
///
/// `table` is a flat row-major `n_rows × n_cols` array of observed counts.
/// Cells whose expected count is zero (an all-zero row or column) are
/// skipped and contribute nothing.
///
/// Returns `None` if the dimensions do not match or the grand total is zero.
///
/// ```
/// use lss_stats::analysis::chi_squared_statistic;
///
/// // No association
/// let chi = chi_squared_statistic(&[10, 10, 10, 10], 2, 2).unwrap();
/// assert!(chi.abs() < 1e-10);
///
/// // Zero row is tolerated
/// let chi = chi_squared_statistic(&[5, 0, 0, 0, 0, 5], 3, 2).unwrap();
/// assert!((chi - 10.0).abs() < 1e-10);
/// ```
pub fn chi_squared_statistic(table: &[usize], n_rows: usize, n_cols: usize) -> Option<f64> {
    if table.len() != n_rows * n_cols {
        return None;
    }

    let mut row_totals = vec![0usize; n_rows];
    let mut col_totals = vec![0usize; n_cols];
    for i in 0..n_rows {
        for j in 0..n_cols {
            let v = table[i * n_cols + j];
            row_totals[i] += v;
            col_totals[j] += v;
        }
    }
    let grand: usize = row_totals.iter().sum();
    if grand == 0 {
        return None;
    }

    let grand = grand as f64;
    let mut chi = 0.0;
    for i in 0..n_rows {
        for j in 0..n_cols {
            let expected = row_totals[i] as f64 * col_totals[j] as f64 / grand;
            if expected > 0.0 {
                let observed = table[i * n_cols + j] as f64;
                chi += (observed - expected).powi(2) / expected;
            }
        }
    }
    Some(chi)
}

// ── Shared helpers ────────────────────────────────────────────────────

/// Distinct raw values of a column in first-encounter order, plus each
/// row's level index.
fn encode_levels(table: &Table, col: usize) -> (Vec<&str>, Vec<usize>) {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut levels: Vec<&str> = Vec::new();
    let codes = table
        .column_values(col)
        .map(|v| {
            *index.entry(v).or_insert_with(|| {
                levels.push(v);
                levels.len() - 1
            })
        })
        .collect();
    (levels, codes)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean and sample standard deviation; a single value divides by 1.
fn mean_sd(values: &[f64]) -> (f64, f64) {
    let m = mean(values);
    let denom = if values.len() > 1 {
        (values.len() - 1) as f64
    } else {
        1.0
    };
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (m, (ss / denom).sqrt())
}

// ── Tests ─────────────────────────────────────────────────────────────
