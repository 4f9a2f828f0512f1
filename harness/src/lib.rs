//! Matcheck harness crate: child-process glue, console reports and size sweeps around the
//! core wire format and validator.

#[path = "../cpu/mod.rs"]
pub mod cpu;

pub mod case_io;
pub mod invoker;
pub mod report;
pub mod sweep;

pub use invoker::{CapturedOutput, Dimensions, ExternalProgram, InvokeError};
pub use sweep::{run_sweep, CaseError, CaseOutcome, CaseRecord, SweepOutcome, SweepStatus};
