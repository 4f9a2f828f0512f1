//! Launches the external multiplier and captures what it prints.

use std::{
    ffi::OsString,
    fmt, io,
    path::{Path, PathBuf},
    process::Command,
    string::FromUtf8Error,
    time::{Duration, Instant},
};

use thiserror::Error;
use tracing::debug;

/// Operand shapes `A (m×n)` and `B (n×p)`; the product is `m×p`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub m: usize,
    pub n: usize,
    pub p: usize,
}

impl Dimensions {
    pub fn square(size: usize) -> Self {
        Self {
            m: size,
            n: size,
            p: size,
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}×{}", self.m, self.n, self.p)
    }
}

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' exited with {}: {}", describe_code(.code), .stderr.trim())]
    ProcessFailure {
        program: String,
        /// `None` when the child was terminated by a signal.
        code: Option<i32>,
        stderr: String,
    },

    #[error("'{program}' wrote non-UTF-8 output")]
    NonUtf8Output {
        program: String,
        #[source]
        source: FromUtf8Error,
    },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// Stdout of one successful run.
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub stdout: String,
    pub elapsed: Duration,
}

/// How to start the multiplier: a program plus fixed arguments placed before `m n p`.
#[derive(Debug, Clone)]
pub struct ExternalProgram {
    program: PathBuf,
    leading_args: Vec<OsString>,
}

impl ExternalProgram {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Adds arguments passed ahead of the dimensions, e.g. a script path for an interpreter.
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs `<program> [leading args] <m> <n> <p>` to completion and returns its stdout.
    ///
    /// Blocks until the child exits; there is no timeout.
    pub fn run(&self, dims: Dimensions) -> Result<CapturedOutput, InvokeError> {
        let program = self.program.display().to_string();
        debug!(%program, %dims, "invoking multiplier");

        let started = Instant::now();
        let output = Command::new(&self.program)
            .args(&self.leading_args)
            .arg(dims.m.to_string())
            .arg(dims.n.to_string())
            .arg(dims.p.to_string())
            .output()
            .map_err(|source| InvokeError::Spawn {
                program: program.clone(),
                source,
            })?;
        let elapsed = started.elapsed();

        if !output.status.success() {
            return Err(InvokeError::ProcessFailure {
                program,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|source| InvokeError::NonUtf8Output {
                program: program.clone(),
                source,
            })?;
        debug!(
            %program,
            bytes = stdout.len(),
            elapsed_ms = elapsed.as_secs_f64() * 1e3,
            "captured multiplier output"
        );
        Ok(CapturedOutput { stdout, elapsed })
    }
}
