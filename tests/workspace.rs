//! End-to-end: raw text → table → analysis → report.

use lss_stats::analysis::{analyze, AnalysisGoal, AnalysisParams};
use lss_stats::error::{ColumnRole, ParameterIssue, StatsError};
use lss_stats::ingest::{parse, CsvParser};
use lss_stats::plan::AnalysisPlan;
use lss_stats::report::{summary_csv, to_json};
use lss_stats::table::ColumnType;

const WEIGHTS: &str = "Weight,Line\n10.0,A\n12.0,A\n9.0,B\n11.0,B\n";

const LINE_STUDY: &str = "\
Weight,Length,Line,Shift
10.2,30.1,A,Day
11.0,31.4,A,Night
9.8,29.7,B,Day
10.5,,B,Night
12.1,33.0,A,Day
,30.5,B,Night
10.9,31.0,C,Day
";

#[test]
fn weights_round_trip() {
    let table = parse(WEIGHTS);
    let bundle = analyze(
        &table,
        AnalysisGoal::Compare,
        &AnalysisParams::compare("Weight", "Line"),
    )
    .unwrap();

    let g = bundle.group_summary.unwrap();
    let a = g.group("A").unwrap();
    let b = g.group("B").unwrap();
    assert_eq!((a.n, b.n), (2, 2));
    assert!((a.mean - 11.0).abs() < 1e-10);
    assert!((b.mean - 10.0).abs() < 1e-10);
    assert!((a.sd - 1.414_213_562_373_095).abs() < 1e-10);
    assert!((b.sd - 1.414_213_562_373_095).abs() < 1e-10);
}

#[test]
fn auto_goal_completeness() {
    let table = parse(LINE_STUDY);
    assert_eq!(
        table.schema(),
        vec![
            ("Weight", ColumnType::Numeric),
            ("Length", ColumnType::Numeric),
            ("Line", ColumnType::Categorical),
            ("Shift", ColumnType::Categorical),
        ]
    );

    let bundle = analyze(&table, AnalysisGoal::Auto, &AnalysisParams::default()).unwrap();
    assert!(bundle.describe.is_some());
    assert!(bundle.frequencies.is_some());
    assert!(bundle.correlations.is_some());
    assert!(bundle.chi_square.is_some());
    assert!(bundle.group_summary.is_none());

    // Missing cells are dropped per column.
    assert_eq!(bundle.summary("Weight").unwrap().n, 6);
    assert_eq!(bundle.summary("Length").unwrap().n, 6);

    // Pairwise-complete: rows 4 and 6 each miss one value.
    let r = bundle.correlation("Weight", "Length").unwrap().r;
    assert!(r > 0.9 && r <= 1.0 + 1e-12);

    let chi = bundle.chi_square.unwrap();
    assert_eq!((chi.a.as_str(), chi.b.as_str()), ("Line", "Shift"));
    assert_eq!(chi.degrees_of_freedom, 2);
}

#[test]
fn auto_with_params_adds_group_summary() {
    let table = parse(LINE_STUDY);
    let bundle = analyze(
        &table,
        AnalysisGoal::Auto,
        &AnalysisParams::compare("Weight", "Line"),
    )
    .unwrap();
    let g = bundle.group_summary.unwrap();
    let levels: Vec<&str> = g.groups.iter().map(|s| s.level.as_str()).collect();
    assert_eq!(levels, vec!["A", "B", "C"]);
    assert_eq!(g.group("B").unwrap().n, 2);
}

#[test]
fn explicit_goal_errors_are_distinguishable() {
    let table = parse(WEIGHTS);

    let err = analyze(&table, AnalysisGoal::Compare, &AnalysisParams::default()).unwrap_err();
    assert!(matches!(
        err,
        StatsError::InvalidParameters {
            goal: AnalysisGoal::Compare,
            reason: ParameterIssue::MissingColumn(ColumnRole::Target),
        }
    ));

    let err = analyze(&table, AnalysisGoal::Associate, &AnalysisParams::default()).unwrap_err();
    assert!(matches!(
        err,
        StatsError::InvalidParameters {
            reason: ParameterIssue::InsufficientColumns { .. },
            ..
        }
    ));

    // Same table under Auto: nothing to compare or associate, but no error.
    let bundle = analyze(&table, AnalysisGoal::Auto, &AnalysisParams::default()).unwrap();
    assert!(bundle.group_summary.is_none());
    assert!(bundle.correlations.is_none());
    assert!(bundle.chi_square.is_none());
}

#[test]
fn empty_input_yields_empty_table() {
    let table = parse("");
    assert!(table.is_empty());
    let bundle = analyze(&table, AnalysisGoal::Auto, &AnalysisParams::default()).unwrap();
    assert_eq!(bundle.describe, Some(vec![]));
    assert_eq!(summary_csv(&bundle), "");
}

#[test]
fn repeated_analysis_is_byte_identical() {
    let table = parse(LINE_STUDY);
    let params = AnalysisParams::compare("Length", "Shift");
    let first = to_json(&analyze(&table, AnalysisGoal::Auto, &params).unwrap()).unwrap();
    let second = to_json(&analyze(&table, AnalysisGoal::Auto, &params).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn crlf_and_missing_markers_end_to_end() {
    let csv = "Temp,Status\r\n20.5,OK\r\nNA,FAIL\r\n21.0,OK\r\n19.5,OK\r\n";
    // Without markers "NA" makes Temp only 75% numeric.
    assert_eq!(
        parse(csv).column(0).unwrap().column_type,
        ColumnType::Categorical
    );

    let table = CsvParser::new()
        .missing_markers(vec!["NA".into()])
        .parse_str(csv);
    assert_eq!(table.column(0).unwrap().column_type, ColumnType::Numeric);

    let bundle = analyze(&table, AnalysisGoal::Describe, &AnalysisParams::default()).unwrap();
    let temp = bundle.summary("Temp").unwrap();
    assert_eq!(temp.n, 3);
    assert_eq!(temp.min, 19.5);
    assert_eq!(temp.max, 21.0);
    assert_eq!(bundle.frequency_table("Status").unwrap().count("OK"), Some(3));
}

#[test]
fn plan_and_summary_export() {
    let table = parse(WEIGHTS);
    let plan = AnalysisPlan::new(AnalysisGoal::Compare, &table).with_source("weights.csv");
    let json = plan.to_json().unwrap();
    assert!(json.contains("\"goal\": \"compare\""));

    let bundle = analyze(
        &table,
        AnalysisGoal::Compare,
        &AnalysisParams::compare("Weight", "Line"),
    )
    .unwrap();
    let csv = summary_csv(&bundle);
    assert!(csv.contains("Group,N,Mean,SD\nA,2,11,"));
    assert!(csv.contains("\nB,2,10,"));
}
