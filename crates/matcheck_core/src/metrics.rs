//! Numeric summaries used when comparing computed and claimed products.

use crate::Scalar;

/// Largest absolute element-wise difference. Identical cells (equal infinities included)
/// contribute zero; any NaN difference makes the result NaN.
pub fn max_abs_diff(lhs: &[Scalar], rhs: &[Scalar]) -> Scalar {
    debug_assert_eq!(lhs.len(), rhs.len());
    lhs.iter()
        .zip(rhs)
        .map(|(l, r)| if l == r { 0.0 } else { (l - r).abs() })
        .fold(0.0, |acc: Scalar, d| {
            if acc.is_nan() || d.is_nan() {
                Scalar::NAN
            } else {
                acc.max(d)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_largest_difference() {
        assert_eq!(max_abs_diff(&[1.0, 2.0, 3.0], &[1.0, 2.5, 1.0]), 2.0);
        assert_eq!(max_abs_diff(&[], &[]), 0.0);
    }

    #[test]
    fn nan_is_not_hidden() {
        assert!(max_abs_diff(&[1.0, f64::NAN], &[1.0, 0.0]).is_nan());
        assert_eq!(max_abs_diff(&[f64::INFINITY], &[f64::INFINITY]), 0.0);
    }
}
