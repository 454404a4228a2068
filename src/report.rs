//! Rendering of a [`ResultBundle`] for export.
//!
//! [`summary_csv`] produces the sectioned summary sheet; [`to_json`] the
//! full bundle. Both are pure; writing the text anywhere is up to the caller.

use crate::analysis::ResultBundle;
use crate::error::StatsError;

/// Renders the bundle as a sectioned CSV summary.
///
/// Sections appear in a fixed order (numeric summary, frequencies, group
/// summary, correlations, chi-square), each only when present and
/// non-empty. Lines are joined with `\n` without a trailing newline.
///
/// ```
/// use lss_stats::analysis::{analyze, AnalysisGoal, AnalysisParams};
/// use lss_stats::ingest::parse;
/// use lss_stats::report::summary_csv;
///
/// let table = parse("x\n1\n3\n");
/// let bundle = analyze(&table, AnalysisGoal::Describe, &AnalysisParams::default()).unwrap();
/// let csv = summary_csv(&bundle);
/// assert_eq!(
///     csv,
///     "--- Summary (numeric) ---\nColumn,N,Mean,SD,Min,Max\nx,2,2,1.4142135623730951,1,3"
/// );
/// ```
pub fn summary_csv(bundle: &ResultBundle) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some(describe) = bundle.describe.as_ref().filter(|d| !d.is_empty()) {
        lines.push("--- Summary (numeric) ---".into());
        lines.push("Column,N,Mean,SD,Min,Max".into());
        for s in describe {
            lines.push(format!(
                "{},{},{},{},{},{}",
                s.column, s.n, s.mean, s.sd, s.min, s.max
            ));
        }
    }

    if let Some(frequencies) = bundle.frequencies.as_ref().filter(|f| !f.is_empty()) {
        lines.push("--- Frequencies (categorical) ---".into());
        for table in frequencies {
            lines.push(format!("Column: {}", table.column));
            lines.push("Level,Count".into());
            for f in &table.levels {
                lines.push(format!("{},{}", f.level, f.count));
            }
        }
    }

    if let Some(g) = bundle.group_summary.as_ref().filter(|g| !g.groups.is_empty()) {
        lines.push("--- Group Summary ---".into());
        lines.push(format!("Target,{}", g.target));
        lines.push(format!("Group By,{}", g.group_by));
        lines.push("Group,N,Mean,SD".into());
        for s in &g.groups {
            lines.push(format!("{},{},{},{}", s.level, s.n, s.mean, s.sd));
        }
    }

    if let Some(correlations) = bundle.correlations.as_ref().filter(|c| !c.is_empty()) {
        lines.push("--- Correlations (numeric pairs) ---".into());
        lines.push("A,B,r".into());
        for c in correlations {
            lines.push(format!("{},{},{}", c.a, c.b, c.r));
        }
    }

    if let Some(chi) = &bundle.chi_square {
        lines.push("--- Chi-Square (categorical pairs) ---".into());
        lines.push("A,B,Chi2,df".into());
        lines.push(format!(
            "{},{},{},{}",
            chi.a, chi.b, chi.chi_squared, chi.degrees_of_freedom
        ));
    }

    lines.join("\n")
}

/// Serializes the bundle as pretty-printed JSON; absent sections are omitted.
pub fn to_json(bundle: &ResultBundle) -> Result<String, StatsError> {
    Ok(serde_json::to_string_pretty(bundle)?)
}
