//! Core matcheck domain logic that stays independent of process handling or CLI shells.
//!
//! This crate hosts:
//! - the dense [`Matrix`] type and its reference product
//! - the text wire format exchanged with external multipliers
//! - tolerance-based validation of a claimed product
//! - configuration shared between the harness and the CLI

pub mod config;
pub mod error;
pub mod matrix;
pub mod metrics;
pub mod validate;
pub mod wire;

/// Convenience re-export for the scalar type used across the harness.
pub type Scalar = f64;

pub use config::{HarnessConfig, SweepMode, Tolerance, TrailingBlock};
pub use error::{ParseError, ShapeError};
pub use matrix::Matrix;
pub use validate::{validate, Mismatch, Verdict};
pub use wire::{parse_matrices, MatrixTriple};
