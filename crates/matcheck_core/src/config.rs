//! Shared configuration types for a matcheck sweep.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::Scalar;

/// Closeness thresholds applied to every cell of one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub abs: Scalar,
    pub rel: Scalar,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self { abs: 1e-5, rel: 0.0 }
    }
}

impl Tolerance {
    pub fn absolute(abs: Scalar) -> Self {
        Self { abs, rel: 0.0 }
    }

    /// Inclusive closeness test. Equal values (including equal infinities) always pass; NaN never does.
    pub fn is_close(&self, computed: Scalar, expected: Scalar) -> bool {
        if computed == expected {
            return true;
        }
        (computed - expected).abs() <= self.abs + self.rel * expected.abs()
    }
}

/// What happens after a size fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepMode {
    /// Stop at the first failing size.
    #[default]
    FailFast,
    /// Keep probing remaining sizes and summarize every failure at the end.
    CollectAll,
}

/// Treatment of lines that follow the last `---` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingBlock {
    /// Unterminated trailing content is dropped (multipliers print timing lines there).
    #[default]
    Discard,
    /// A non-empty unterminated trailing block counts as closed.
    Close,
}

/// Harness settings; the defaults reproduce the fixed 2..=128 sweep against `./main`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarnessConfig {
    pub executable: PathBuf,
    pub leading_args: Vec<String>,
    pub min_size: usize,
    pub max_size: usize,
    pub tolerance: Tolerance,
    pub mode: SweepMode,
    pub trailing_block: TrailingBlock,
    pub max_reported_mismatches: usize,
    pub report_json: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("./main"),
            leading_args: Vec::new(),
            min_size: 2,
            max_size: 128,
            tolerance: Tolerance::default(),
            mode: SweepMode::FailFast,
            trailing_block: TrailingBlock::Discard,
            max_reported_mismatches: 10,
            report_json: None,
        }
    }
}

impl HarnessConfig {
    /// Checks the invariants the sweep relies on, returning a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_size == 0 {
            return Err("min_size must be a positive integer".to_string());
        }
        if self.min_size > self.max_size {
            return Err(format!(
                "min_size ({}) exceeds max_size ({})",
                self.min_size, self.max_size
            ));
        }
        for (name, value) in [
            ("tolerance", self.tolerance.abs),
            ("relative tolerance", self.tolerance.rel),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be finite and non-negative, got {value}"));
            }
        }
        if self.max_reported_mismatches == 0 {
            return Err("max_reported_mismatches must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn sizes(&self) -> std::ops::RangeInclusive<usize> {
        self.min_size..=self.max_size
    }
}
