//! Size sweep: invoke, parse, validate and report for every size in the configured range.
//!
//! In [`SweepMode::FailFast`] the first failing size ends the sweep. In
//! [`SweepMode::CollectAll`] failures are recorded and probing continues, unless the
//! program cannot be launched at all.

use std::{io::Write, time::Instant};

use anyhow::{Context, Result};
use matcheck_core::{
    parse_matrices, validate, HarnessConfig, MatrixTriple, ParseError, ShapeError, SweepMode,
    Verdict,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    invoker::{Dimensions, ExternalProgram, InvokeError},
    report,
};

/// Everything that can end a size before a verdict is reached.
#[derive(Debug, Error)]
pub enum CaseError {
    #[error(transparent)]
    Process(#[from] InvokeError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

impl CaseError {
    /// Stable tag used in JSON reports.
    pub fn kind(&self) -> &'static str {
        match self {
            CaseError::Process(_) => "process_failure",
            CaseError::Parse(_) => "parse_failure",
            CaseError::Shape(_) => "shape_mismatch",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CaseError::Process(_) => "Process failure",
            CaseError::Parse(_) => "Parse failure",
            CaseError::Shape(_) => "Shape mismatch",
        }
    }

    fn is_launch_failure(&self) -> bool {
        matches!(self, CaseError::Process(InvokeError::Spawn { .. }))
    }
}

/// Parsed matrices plus the verdict for one size.
#[derive(Debug, Clone)]
pub struct CaseCheck {
    pub triple: MatrixTriple,
    pub verdict: Verdict,
}

/// Runs the full pipeline for one dimension triple.
pub fn check_case(
    program: &ExternalProgram,
    dims: Dimensions,
    config: &HarnessConfig,
) -> Result<CaseCheck, CaseError> {
    let captured = program.run(dims)?;
    let triple = parse_matrices(&captured.stdout, config.trailing_block)?;
    let verdict = validate(&triple.a, &triple.b, &triple.c, config.tolerance)?;
    Ok(CaseCheck { triple, verdict })
}

/// One reported cell in a JSON report; coordinates are 1-based, non-finite values become `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportedMismatch {
    pub row: usize,
    pub col: usize,
    pub computed: Option<f64>,
    pub expected: Option<f64>,
    pub diff: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseOutcome {
    Passed {
        max_abs_error: Option<f64>,
    },
    NumericMismatch {
        mismatch_count: usize,
        max_abs_error: Option<f64>,
        first_mismatches: Vec<ReportedMismatch>,
    },
    Error {
        kind: String,
        message: String,
    },
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, CaseOutcome::Passed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub size: usize,
    pub elapsed_ms: f64,
    pub outcome: CaseOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SweepStatus {
    AllPassed,
    /// Fail-fast sweep halted here.
    FailedAt { size: usize },
    /// Every failing size of a collect-all sweep, ascending.
    Failed { sizes: Vec<usize> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepOutcome {
    pub status: SweepStatus,
    pub cases: Vec<CaseRecord>,
}

impl SweepOutcome {
    pub fn passed(&self) -> bool {
        self.status == SweepStatus::AllPassed
    }

    /// Process exit status for the harness: 0 when every size passed, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            0
        } else {
            1
        }
    }
}

/// Sweeps `config.min_size..=config.max_size` with square dimensions, writing progress and
/// diagnostics to `out`.
///
/// Per-size failures are reported and folded into the outcome; only I/O errors on `out`
/// and configuration errors are returned as `Err`.
pub fn run_sweep<W: Write>(config: &HarnessConfig, out: &mut W) -> Result<SweepOutcome> {
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid harness configuration")?;

    let program =
        ExternalProgram::new(&config.executable).with_leading_args(&config.leading_args);
    info!(
        executable = %config.executable.display(),
        min_size = config.min_size,
        max_size = config.max_size,
        tolerance = config.tolerance.abs,
        mode = ?config.mode,
        "starting sweep"
    );

    let mut cases = Vec::new();
    let mut failed_sizes = Vec::new();
    for size in config.sizes() {
        let dims = Dimensions::square(size);
        report::case_started(out, dims)?;

        let started = Instant::now();
        let result = check_case(&program, dims, config);
        let elapsed_ms = started.elapsed().as_secs_f64() * 1e3;

        let (outcome, stop) = match result {
            Ok(CaseCheck {
                verdict: Verdict::Pass { max_abs_error },
                ..
            }) => {
                report::case_passed(out, dims)?;
                (
                    CaseOutcome::Passed {
                        max_abs_error: finite(max_abs_error),
                    },
                    false,
                )
            }
            Ok(CaseCheck {
                triple,
                verdict:
                    Verdict::Fail {
                        mismatches,
                        product,
                        max_abs_error,
                    },
            }) => {
                warn!(size, count = mismatches.len(), max_abs_error, "numeric mismatch");
                report::numeric_mismatch(
                    out,
                    dims,
                    &triple,
                    &product,
                    &mismatches,
                    config.max_reported_mismatches,
                )?;
                let first_mismatches = mismatches
                    .iter()
                    .take(config.max_reported_mismatches)
                    .map(|m| ReportedMismatch {
                        row: m.row + 1,
                        col: m.col + 1,
                        computed: finite(m.computed),
                        expected: finite(m.expected),
                        diff: finite(m.diff),
                    })
                    .collect();
                (
                    CaseOutcome::NumericMismatch {
                        mismatch_count: mismatches.len(),
                        max_abs_error: finite(max_abs_error),
                        first_mismatches,
                    },
                    config.mode == SweepMode::FailFast,
                )
            }
            Err(err) => {
                warn!(size, kind = err.kind(), error = %err, "size failed");
                report::case_error(out, dims, &err)?;
                let stop = config.mode == SweepMode::FailFast || err.is_launch_failure();
                (
                    CaseOutcome::Error {
                        kind: err.kind().to_string(),
                        message: err.to_string(),
                    },
                    stop,
                )
            }
        };

        if !outcome.passed() {
            failed_sizes.push(size);
        }
        cases.push(CaseRecord {
            size,
            elapsed_ms,
            outcome,
        });
        if stop {
            break;
        }
    }

    let status = match (failed_sizes.first(), config.mode) {
        (None, _) => SweepStatus::AllPassed,
        (Some(&size), SweepMode::FailFast) => SweepStatus::FailedAt { size },
        (Some(_), SweepMode::CollectAll) => SweepStatus::Failed {
            sizes: failed_sizes,
        },
    };
    report::sweep_summary(out, config, &status)?;
    info!(status = ?status, sizes_run = cases.len(), "sweep finished");

    Ok(SweepOutcome { status, cases })
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
