//! # lss-stats
//!
//! Tabular statistics engine for Lean Six Sigma improvement workspaces.
//!
//! lss-stats takes a delimited dataset as uploaded by a practitioner,
//! infers which columns are numeric and which are categorical, and computes
//! the statistics a workspace displays for the chosen analysis goal. Dirty
//! data is expected: unparseable cells are treated as missing, never as
//! errors.
//!
//! ## Modules
//!
//! - [`table`]: Table model (Column, ColumnType, Record, Table)
//! - [`ingest`]: CSV ingestion with sampled type inference
//! - [`analysis`]: Describe, correlation, group comparison, chi-square association
//! - [`plan`]: Goal-driven analysis plans and recommended methods
//! - [`report`]: Summary CSV and JSON rendering of results
//! - [`ffi`]: C FFI bindings (JSON / CSV strings in and out, C header generated via cbindgen)
//! - [`error`]: Error types
//!
//! ## Quick Start
//!
//! ```
//! use lss_stats::analysis::{analyze, AnalysisGoal, AnalysisParams};
//! use lss_stats::ingest::parse;
//! use lss_stats::table::ColumnType;
//!
//! let csv = "Weight,Height,Line,Shift\n\
//!            10.0,1.2,A,Day\n\
//!            12.0,1.4,A,Night\n\
//!            9.0,1.1,B,Day\n\
//!            11.0,1.3,B,Night\n";
//! let table = parse(csv);
//!
//! let schema = table.schema();
//! assert_eq!(schema[0], ("Weight", ColumnType::Numeric));
//! assert_eq!(schema[2], ("Line", ColumnType::Categorical));
//!
//! let bundle = analyze(&table, AnalysisGoal::Auto, &AnalysisParams::default()).unwrap();
//! assert_eq!(bundle.summary("Weight").unwrap().n, 4);
//! assert!(bundle.correlation("Weight", "Height").unwrap().r > 0.9);
//! assert!(bundle.chi_square.is_some());
//! assert!(bundle.group_summary.is_none());
//! ```

pub mod analysis;
pub mod error;
pub mod ffi;
pub mod ingest;
pub mod plan;
pub mod report;
pub mod table;
