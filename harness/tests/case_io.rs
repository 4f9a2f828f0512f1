use std::{env, fs, path::PathBuf};

use matcheck_core::{HarnessConfig, SweepMode};
use matcheck_harness::{
    case_io::{load_sweep_report, write_sweep_report, SweepReport, REPORT_SCHEMA_VERSION},
    sweep::ReportedMismatch,
    CaseOutcome, CaseRecord, SweepOutcome, SweepStatus,
};

#[test]
fn sweep_report_round_trips_through_json() {
    let cfg = HarnessConfig {
        min_size: 2,
        max_size: 4,
        mode: SweepMode::CollectAll,
        ..HarnessConfig::default()
    };
    let outcome = SweepOutcome {
        status: SweepStatus::Failed {
            sizes: vec![3, 4],
        },
        cases: vec![
            CaseRecord {
                size: 2,
                elapsed_ms: 1.5,
                outcome: CaseOutcome::Passed {
                    max_abs_error: Some(2.5e-7),
                },
            },
            CaseRecord {
                size: 3,
                elapsed_ms: 2.0,
                outcome: CaseOutcome::NumericMismatch {
                    mismatch_count: 1,
                    max_abs_error: None,
                    first_mismatches: vec![ReportedMismatch {
                        row: 3,
                        col: 3,
                        computed: Some(1.0),
                        expected: None,
                        diff: None,
                    }],
                },
            },
            CaseRecord {
                size: 4,
                elapsed_ms: 0.25,
                outcome: CaseOutcome::Error {
                    kind: "parse_failure".into(),
                    message: "expected 3 matrices, found 2 blocks".into(),
                },
            },
        ],
    };
    let report = SweepReport::new(&cfg, &outcome);

    let path = temp_file_path();
    write_sweep_report(&path, &report).expect("failed to write report");
    let raw = fs::read_to_string(&path).expect("report exists");
    let loaded = load_sweep_report(&path).expect("failed to load report");
    fs::remove_file(&path).ok();

    assert!(raw.contains("\"status\": \"numeric_mismatch\""), "{raw}");
    assert!(raw.contains("\"mode\": \"collect_all\""), "{raw}");
    assert_eq!(loaded, report);
    assert_eq!(loaded.schema_version, REPORT_SCHEMA_VERSION);
}

#[test]
fn unknown_schema_version_is_rejected() {
    let cfg = HarnessConfig::default();
    let outcome = SweepOutcome {
        status: SweepStatus::AllPassed,
        cases: Vec::new(),
    };
    let mut report = SweepReport::new(&cfg, &outcome);
    report.schema_version = REPORT_SCHEMA_VERSION + 1;

    let path = temp_file_path();
    write_sweep_report(&path, &report).expect("failed to write report");
    let err = load_sweep_report(&path).expect_err("newer schema must be rejected");
    fs::remove_file(&path).ok();
    assert!(err.to_string().contains("unsupported sweep report schema"));
}

fn temp_file_path() -> PathBuf {
    let mut path = env::temp_dir();
    let unique = format!(
        "matcheck_report_{}_{}.json",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    );
    path.push(unique);
    path
}
