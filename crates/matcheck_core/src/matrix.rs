//! Dense row-major matrix used for operands, claimed products and the reference product.

use crate::{error::ShapeError, Scalar};

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Scalar>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    /// Builds a matrix from a row-major buffer; the buffer length must equal `rows * cols`.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<Scalar>) -> Result<Self, ShapeError> {
        if data.len() != rows * cols {
            return Err(ShapeError::BufferLength {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Builds a matrix from rows that must all share the first row's length.
    pub fn from_rows(rows: Vec<Vec<Scalar>>) -> Result<Self, ShapeError> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(ShapeError::RaggedRow {
                row: idx + 1,
                expected: cols,
                found: row.len(),
            });
        }
        let row_count = rows.len();
        let data = rows.into_iter().flatten().collect();
        Ok(Self {
            rows: row_count,
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Scalar {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: Scalar) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[Scalar] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn rows_iter(&self) -> impl Iterator<Item = &[Scalar]> + '_ {
        (0..self.rows).map(move |r| self.row(r))
    }

    pub fn as_slice(&self) -> &[Scalar] {
        &self.data
    }

    /// Reference product `self · rhs` (row-by-column dot products, shape `rows(self) × cols(rhs)`).
    pub fn matmul(&self, rhs: &Matrix) -> Result<Matrix, ShapeError> {
        if self.cols != rhs.rows {
            return Err(ShapeError::InnerDimension {
                lhs_rows: self.rows,
                lhs_cols: self.cols,
                rhs_rows: rhs.rows,
                rhs_cols: rhs.cols,
            });
        }
        let mut out = Matrix::zeros(self.rows, rhs.cols);
        // i-k-j order keeps the inner loop on contiguous rows of `rhs` and `out`.
        for i in 0..self.rows {
            for k in 0..self.cols {
                let lhs = self.data[i * self.cols + k];
                let rhs_row = rhs.row(k);
                let out_row = &mut out.data[i * rhs.cols..(i + 1) * rhs.cols];
                for (dst, &r) in out_row.iter_mut().zip(rhs_row) {
                    *dst += lhs * r;
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_matrix(rng: &mut ChaCha8Rng, rows: usize, cols: usize) -> Matrix {
        let data = (0..rows * cols).map(|_| rng.gen_range(-2.0..=2.0)).collect();
        Matrix::from_row_major(rows, cols, data).unwrap()
    }

    #[test]
    fn matmul_matches_naive_dot_products() {
        let mut rng = ChaCha8Rng::seed_from_u64(0xDEADBEEF);
        let a = random_matrix(&mut rng, 3, 5);
        let b = random_matrix(&mut rng, 5, 4);
        let d = a.matmul(&b).unwrap();
        assert_eq!(d.shape(), (3, 4));
        for i in 0..3 {
            for j in 0..4 {
                let expected: f64 = (0..5).map(|k| a.get(i, k) * b.get(k, j)).sum();
                assert!(
                    (d.get(i, j) - expected).abs() <= 1e-12,
                    "cell ({i}, {j}): expected {expected}, got {}",
                    d.get(i, j)
                );
            }
        }
    }

    #[test]
    fn identity_is_neutral() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let a = random_matrix(&mut rng, 4, 4);
        assert_eq!(a.matmul(&Matrix::identity(4)).unwrap(), a);
        assert_eq!(Matrix::identity(4).matmul(&a).unwrap(), a);
    }

    #[test]
    fn matmul_rejects_inner_dimension_mismatch() {
        let err = Matrix::zeros(2, 3).matmul(&Matrix::zeros(2, 3)).unwrap_err();
        assert_eq!(
            err,
            ShapeError::InnerDimension {
                lhs_rows: 2,
                lhs_cols: 3,
                rhs_rows: 2,
                rhs_cols: 3,
            }
        );
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            ShapeError::RaggedRow {
                row: 2,
                expected: 2,
                found: 1,
            }
        );
        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.row(1), &[3.0, 4.0]);
    }

    #[test]
    fn from_row_major_checks_length() {
        assert!(Matrix::from_row_major(2, 2, vec![1.0; 3]).is_err());
    }
}
