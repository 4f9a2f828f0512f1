use std::{
    fs,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{bail, Context, Result};
use matcheck_core::{HarnessConfig, SweepMode, Tolerance};
use serde::{Deserialize, Serialize};

use crate::sweep::{CaseRecord, SweepOutcome, SweepStatus};

pub const REPORT_SCHEMA_VERSION: u8 = 1;

/// Machine-readable record of one sweep, written next to the console report on request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub schema_version: u8,
    pub generated_at_unix_ms: u128,
    pub executable: String,
    pub leading_args: Vec<String>,
    pub min_size: usize,
    pub max_size: usize,
    pub tolerance: Tolerance,
    pub mode: SweepMode,
    pub status: SweepStatus,
    pub cases: Vec<CaseRecord>,
}

impl SweepReport {
    pub fn new(config: &HarnessConfig, outcome: &SweepOutcome) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            generated_at_unix_ms: now_unix_ms(),
            executable: config.executable.display().to_string(),
            leading_args: config.leading_args.clone(),
            min_size: config.min_size,
            max_size: config.max_size,
            tolerance: config.tolerance,
            mode: config.mode,
            status: outcome.status.clone(),
            cases: outcome.cases.clone(),
        }
    }
}

fn now_unix_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

/// Writes the report as pretty-printed JSON, creating parent directories as needed.
pub fn write_sweep_report<P: AsRef<Path>>(path: P, report: &SweepReport) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(report).context("failed to serialize sweep report")?;
    fs::write(path, json)
        .with_context(|| format!("failed to write sweep report to {}", path.display()))?;
    Ok(())
}

pub fn load_sweep_report<P: AsRef<Path>>(path: P) -> Result<SweepReport> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read sweep report {}", path.display()))?;
    let report: SweepReport = serde_json::from_str(&text)
        .with_context(|| format!("invalid sweep report JSON in {}", path.display()))?;
    if report.schema_version != REPORT_SCHEMA_VERSION {
        bail!(
            "unsupported sweep report schema {} (expected {REPORT_SCHEMA_VERSION})",
            report.schema_version
        );
    }
    Ok(report)
}
