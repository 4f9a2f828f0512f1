//! Human-readable console output: progress lines, failure dumps and the sweep summary.

use std::io::{self, Write};

use matcheck_core::{wire::format_rows, HarnessConfig, Matrix, MatrixTriple, Mismatch};

use crate::{
    invoker::Dimensions,
    sweep::{CaseError, SweepStatus},
};

const DISPLAY_PRECISION: usize = 2;

pub fn case_started<W: Write>(out: &mut W, dims: Dimensions) -> io::Result<()> {
    writeln!(out, "Testing {dims}...")?;
    out.flush()
}

pub fn case_passed<W: Write>(out: &mut W, dims: Dimensions) -> io::Result<()> {
    writeln!(out, " ✓ OK ({dims})")
}

/// Prints `name` with its shape, then one indented row per line at two decimals.
pub fn matrix<W: Write>(out: &mut W, name: &str, matrix: &Matrix) -> io::Result<()> {
    let (rows, cols) = matrix.shape();
    writeln!(out, "\nMatrix {name} ({rows}×{cols}):")?;
    for line in format_rows(matrix, DISPLAY_PRECISION) {
        writeln!(out, "  {line}")?;
    }
    Ok(())
}

/// Full dump for a numeric mismatch: A, B, C, the reference product, then up to `limit` cells.
pub fn numeric_mismatch<W: Write>(
    out: &mut W,
    dims: Dimensions,
    triple: &MatrixTriple,
    product: &Matrix,
    mismatches: &[Mismatch],
    limit: usize,
) -> io::Result<()> {
    writeln!(out, "\n❌ Mismatch at size {}:", dims.m)?;
    matrix(out, "A", &triple.a)?;
    matrix(out, "B", &triple.b)?;
    matrix(out, "C (from external program)", &triple.c)?;
    matrix(out, "D = A·B (reference)", product)?;

    writeln!(out, "\nFirst few differing entries:")?;
    for m in mismatches.iter().take(limit) {
        writeln!(
            out,
            "  row {}, col {}: computed={:?}, expected={:?}, diff={:?}",
            m.row + 1,
            m.col + 1,
            m.computed,
            m.expected,
            m.diff
        )?;
    }
    if mismatches.len() > limit {
        writeln!(out, "  ... {} more", mismatches.len() - limit)?;
    }
    Ok(())
}

pub fn case_error<W: Write>(out: &mut W, dims: Dimensions, err: &CaseError) -> io::Result<()> {
    writeln!(out, "\n❌ {} at size {}: {err}", err.title(), dims.m)
}

pub fn sweep_summary<W: Write>(
    out: &mut W,
    config: &HarnessConfig,
    status: &SweepStatus,
) -> io::Result<()> {
    match status {
        SweepStatus::AllPassed => writeln!(
            out,
            "\n✅ All sizes {}–{} validated successfully.",
            config.min_size, config.max_size
        ),
        SweepStatus::FailedAt { size } => writeln!(out, "\nSweep stopped at size {size}."),
        SweepStatus::Failed { sizes } => {
            let total = config.max_size - config.min_size + 1;
            let listed = sizes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(
                out,
                "\n❌ {} of {total} sizes failed: {listed}",
                sizes.len()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn matrix_dump_uses_two_decimals() {
        let m = Matrix::from_rows(vec![vec![1.0, 0.126], vec![-2.5, 3.0]]).unwrap();
        let text = render(|out| matrix(out, "A", &m));
        assert_eq!(text, "\nMatrix A (2×2):\n  1.00, 0.13\n  -2.50, 3.00\n");
    }

    #[test]
    fn mismatch_listing_is_one_based_and_truncated() {
        let triple = MatrixTriple {
            a: Matrix::identity(2),
            b: Matrix::identity(2),
            c: Matrix::zeros(2, 2),
        };
        let mismatches = vec![
            Mismatch {
                row: 0,
                col: 0,
                computed: 1.0,
                expected: 0.0,
                diff: 1.0,
            },
            Mismatch {
                row: 1,
                col: 1,
                computed: 1.0,
                expected: 0.0,
                diff: 1.0,
            },
        ];
        let text = render(|out| {
            numeric_mismatch(
                out,
                Dimensions::square(2),
                &triple,
                &Matrix::identity(2),
                &mismatches,
                1,
            )
        });
        assert!(text.starts_with("\n❌ Mismatch at size 2:\n"));
        assert!(text.contains("Matrix D = A·B (reference) (2×2):"));
        assert!(text.contains("  row 1, col 1: computed=1.0, expected=0.0, diff=1.0\n"));
        assert!(!text.contains("row 2, col 2"));
        assert!(text.ends_with("  ... 1 more\n"));
    }

    #[test]
    fn summary_lists_failed_sizes() {
        let cfg = HarnessConfig {
            min_size: 2,
            max_size: 6,
            ..HarnessConfig::default()
        };
        let text = render(|out| {
            sweep_summary(
                out,
                &cfg,
                &SweepStatus::Failed {
                    sizes: vec![3, 5],
                },
            )
        });
        assert_eq!(text, "\n❌ 2 of 5 sizes failed: 3, 5\n");

        let text = render(|out| sweep_summary(out, &cfg, &SweepStatus::AllPassed));
        assert_eq!(text, "\n✅ All sizes 2–6 validated successfully.\n");
    }
}
