//! Recomputes `A · B` and compares it cell by cell against a claimed product.

use crate::{
    config::Tolerance, error::ShapeError, matrix::Matrix, metrics::max_abs_diff, Scalar,
};

/// One cell where the reference product and the claimed product disagree.
///
/// `row`/`col` are 0-based; reports print them 1-based.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch {
    pub row: usize,
    pub col: usize,
    pub computed: Scalar,
    pub expected: Scalar,
    pub diff: Scalar,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass {
        max_abs_error: Scalar,
    },
    Fail {
        /// Row-major order.
        mismatches: Vec<Mismatch>,
        product: Matrix,
        max_abs_error: Scalar,
    },
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Pass { .. })
    }

    pub fn max_abs_error(&self) -> Scalar {
        match self {
            Verdict::Pass { max_abs_error } | Verdict::Fail { max_abs_error, .. } => *max_abs_error,
        }
    }
}

/// Validates the claimed product `c` against `a · b`.
///
/// Shape problems are errors, never numeric mismatches.
pub fn validate(
    a: &Matrix,
    b: &Matrix,
    c: &Matrix,
    tolerance: Tolerance,
) -> Result<Verdict, ShapeError> {
    let product = a.matmul(b)?;
    if product.shape() != c.shape() {
        return Err(ShapeError::ProductShape {
            computed: product.shape(),
            claimed: c.shape(),
        });
    }

    let mismatches = collect_mismatches(&product, c, tolerance);
    let max_abs_error = max_abs_diff(product.as_slice(), c.as_slice());
    if mismatches.is_empty() {
        Ok(Verdict::Pass { max_abs_error })
    } else {
        Ok(Verdict::Fail {
            mismatches,
            product,
            max_abs_error,
        })
    }
}

fn collect_mismatches(computed: &Matrix, expected: &Matrix, tolerance: Tolerance) -> Vec<Mismatch> {
    let cols = computed.cols();
    computed
        .as_slice()
        .iter()
        .zip(expected.as_slice())
        .enumerate()
        .filter_map(|(idx, (&d, &c))| {
            (!tolerance.is_close(d, c)).then(|| Mismatch {
                row: idx / cols,
                col: idx % cols,
                computed: d,
                expected: c,
                diff: d - c,
            })
        })
        .collect()
}
