//! CPU-side operand generation for the reference multiplier and tests.

use matcheck_core::{Matrix, Scalar, ShapeError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::invoker::Dimensions;

/// Decimal places the reference multiplier prints (matches `%.6f`).
pub const WIRE_PRECISION: usize = 6;

/// Seed used by the reference multiplier when none is given.
pub const DEFAULT_SEED: u64 = 314;

/// Operands and their exact product, all representable at [`WIRE_PRECISION`] decimals
/// for the operands.
#[derive(Debug, Clone)]
pub struct ProductCase {
    pub a: Matrix,
    pub b: Matrix,
    pub c: Matrix,
}

/// Deterministic generator: operands in `[0, 1)`, quantized so that printing them loses nothing.
pub fn generate_product_case(dims: Dimensions, seed: u64) -> Result<ProductCase, ShapeError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let a = random_matrix(&mut rng, dims.m, dims.n)?;
    let b = random_matrix(&mut rng, dims.n, dims.p)?;
    let c = a.matmul(&b)?;
    Ok(ProductCase { a, b, c })
}

fn random_matrix<R: Rng + ?Sized>(
    rng: &mut R,
    rows: usize,
    cols: usize,
) -> Result<Matrix, ShapeError> {
    let data = (0..rows * cols)
        .map(|_| quantize(rng.gen::<Scalar>()))
        .collect();
    Matrix::from_row_major(rows, cols, data)
}

fn quantize(value: Scalar) -> Scalar {
    let scale = 10f64.powi(WIRE_PRECISION as i32);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let dims = Dimensions { m: 3, n: 4, p: 2 };
        let first = generate_product_case(dims, 0xA11CE).unwrap();
        let again = generate_product_case(dims, 0xA11CE).unwrap();
        assert_eq!(first.a, again.a);
        assert_eq!(first.b, again.b);
        assert_eq!(first.c.shape(), (3, 2));
    }

    #[test]
    fn operands_are_quantized_to_wire_precision() {
        let case = generate_product_case(Dimensions::square(5), DEFAULT_SEED).unwrap();
        for &value in case.a.as_slice().iter().chain(case.b.as_slice()) {
            assert!((0.0..=1.0).contains(&value));
            let printed: f64 = format!("{value:.6}").parse().unwrap();
            assert_eq!(printed, value);
        }
    }
}
