use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Index;

use crate::error::{NetworkError, Result};

/// Dense row-major matrix with explicit dimensions.
///
/// Every operation that combines a matrix with another operand checks the
/// dimensions and returns `ShapeMismatch` instead of broadcasting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Builds a matrix from row vectors. All rows must have equal length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Matrix> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in rows {
            if row.len() != n_cols {
                return Err(NetworkError::shape("Matrix::from_rows", n_cols, row.len()));
            }
            data.extend(row);
        }
        Ok(Matrix { rows: n_rows, cols: n_cols, data })
    }

    /// Wraps a flat row-major buffer of length `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Matrix> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(NetworkError::shape(
                "Matrix::from_vec",
                format!("{rows}x{cols} elements"),
                data.len(),
            ));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Number of elements `rows * cols` implies, or `None` on overflow.
    pub fn declared_len(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    /// Glorot (Xavier) uniform initialization: each entry drawn from
    /// U[-b, b] with b = sqrt(6 / (fan_in + fan_out)).
    ///
    /// Shape: (rows, cols) = (fan_out, fan_in).
    pub fn glorot<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let bound = (6.0 / (rows + cols) as f64).sqrt();
        let dist = Uniform::new_inclusive(-bound, bound);
        let data = (0..rows * cols).map(|_| dist.sample(&mut *rng)).collect();
        Matrix { rows, cols, data }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Matrix-vector product `self · v`.
    pub fn mul_vec(&self, v: &[f64]) -> Result<Vec<f64>> {
        if v.len() != self.cols {
            return Err(NetworkError::shape("Matrix::mul_vec", self.cols, v.len()));
        }
        Ok((0..self.rows)
            .map(|i| self.row(i).iter().zip(v).map(|(w, x)| w * x).sum())
            .collect())
    }

    /// Transposed product `selfᵀ · v`, without materializing the transpose.
    pub fn transpose_mul_vec(&self, v: &[f64]) -> Result<Vec<f64>> {
        if v.len() != self.rows {
            return Err(NetworkError::shape("Matrix::transpose_mul_vec", self.rows, v.len()));
        }
        let mut res = vec![0.0; self.cols];
        for (i, &vi) in v.iter().enumerate() {
            for (r, &w) in res.iter_mut().zip(self.row(i)) {
                *r += w * vi;
            }
        }
        Ok(res)
    }

    /// Outer product `col · rowᵀ`, shape (col.len(), row.len()).
    pub fn outer(col: &[f64], row: &[f64]) -> Matrix {
        let mut data = Vec::with_capacity(col.len() * row.len());
        for &c in col {
            data.extend(row.iter().map(|&r| c * r));
        }
        Matrix { rows: col.len(), cols: row.len(), data }
    }

    fn check_same_shape(&self, other: &Matrix, context: &'static str) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(NetworkError::shape(
                context,
                format!("{}x{}", self.rows, self.cols),
                format!("{}x{}", other.rows, other.cols),
            ));
        }
        Ok(())
    }

    pub fn add_assign(&mut self, other: &Matrix) -> Result<()> {
        self.check_same_shape(other, "Matrix::add_assign")?;
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += b;
        }
        Ok(())
    }

    pub fn scale(&mut self, factor: f64) {
        for x in &mut self.data {
            *x *= factor;
        }
    }

    /// `self -= factor * other`.
    pub fn sub_scaled_assign(&mut self, other: &Matrix, factor: f64) -> Result<()> {
        self.check_same_shape(other, "Matrix::sub_scaled_assign")?;
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a -= factor * b;
        }
        Ok(())
    }

    /// Checks that the matrix has the given shape.
    pub fn expect_shape(&self, rows: usize, cols: usize, context: &'static str) -> Result<()> {
        if self.shape() != (rows, cols) {
            return Err(NetworkError::shape(
                context,
                format!("{}x{}", rows, cols),
                format!("{}x{}", self.rows, self.cols),
            ));
        }
        Ok(())
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(row < self.rows && col < self.cols, "matrix index out of bounds");
        &self.data[row * self.cols + col]
    }
}
