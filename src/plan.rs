//! Goal-driven analysis plans.
//!
//! Before running an analysis the workspace shows which methods suit the
//! chosen goal and the ordered steps a practitioner should follow. Plans
//! are descriptive only; they do not run any test.
//!
//! ```
//! use lss_stats::analysis::AnalysisGoal;
//! use lss_stats::plan::{analysis_plan, recommended_methods};
//!
//! let steps = analysis_plan(AnalysisGoal::Describe);
//! assert_eq!(steps[0], "Profile columns & data quality");
//! assert!(recommended_methods(AnalysisGoal::Associate).contains(&"Chi-square (cat-cat)"));
//! ```

use serde::Serialize;

use crate::analysis::AnalysisGoal;
use crate::error::StatsError;
use crate::table::{Column, Table};

const DESCRIBE_STEPS: &[&str] = &[
    "Profile columns & data quality",
    "Compute summary stats for numeric features",
    "Frequency tables for categorical features",
];

const COMPARE_STEPS: &[&str] = &[
    "Validate target numeric and grouping categorical",
    "Check group sizes & variance homogeneity",
    "Perform t-test (2 groups) or ANOVA (3+)",
    "Compute effect size and visualize",
];

const ASSOCIATE_STEPS: &[&str] = &[
    "Compute Pearson correlations for numeric pairs",
    "Build contingency and chi-square for categorical pairs",
    "Visualize correlations",
];

/// Ordered steps for `goal`. `Auto` chains describe, associate and compare.
pub fn analysis_plan(goal: AnalysisGoal) -> Vec<&'static str> {
    match goal {
        AnalysisGoal::Describe => DESCRIBE_STEPS.to_vec(),
        AnalysisGoal::Compare => COMPARE_STEPS.to_vec(),
        AnalysisGoal::Associate => ASSOCIATE_STEPS.to_vec(),
        AnalysisGoal::Auto => DESCRIBE_STEPS
            .iter()
            .chain(ASSOCIATE_STEPS)
            .chain(COMPARE_STEPS)
            .copied()
            .collect(),
    }
}

/// Methods worth considering for `goal`.
pub fn recommended_methods(goal: AnalysisGoal) -> &'static [&'static str] {
    match goal {
        AnalysisGoal::Describe => &[
            "Summary Statistics",
            "Histograms",
            "Box Plots",
            "Pareto (if defects)",
        ],
        AnalysisGoal::Compare => &[
            "Two-sample t-test / ANOVA",
            "Levene's Test",
            "Effect Size",
            "Visual: Box/Violin",
        ],
        AnalysisGoal::Associate => &[
            "Correlation / Regression (num-num)",
            "Chi-square (cat-cat)",
            "Scatter / Heatmap",
        ],
        AnalysisGoal::Auto => &[
            "Summary Statistics",
            "Correlation / Regression (num-num)",
            "Chi-square (cat-cat)",
            "Two-sample t-test / ANOVA",
        ],
    }
}

/// A plan bound to a dataset, exportable as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisPlan {
    pub goal: AnalysisGoal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub steps: Vec<&'static str>,
    pub columns: Vec<Column>,
}

impl AnalysisPlan {
    /// Builds the plan for `goal` over `table`'s schema.
    pub fn new(goal: AnalysisGoal, table: &Table) -> Self {
        Self {
            goal,
            source: None,
            steps: analysis_plan(goal),
            columns: table.columns().to_vec(),
        }
    }

    /// Records the name of the file the table came from.
    pub fn with_source(mut self, name: impl Into<String>) -> Self {
        self.source = Some(name.into());
        self
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, StatsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
