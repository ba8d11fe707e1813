//! Length-checked element-wise operations over `f64` slices.

use crate::error::{NetworkError, Result};

fn check_len(a: &[f64], b: &[f64], context: &'static str) -> Result<()> {
    if a.len() != b.len() {
        return Err(NetworkError::shape(context, a.len(), b.len()));
    }
    Ok(())
}

pub fn add(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    check_len(a, b, "vector::add")?;
    Ok(a.iter().zip(b).map(|(x, y)| x + y).collect())
}

pub fn sub(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    check_len(a, b, "vector::sub")?;
    Ok(a.iter().zip(b).map(|(x, y)| x - y).collect())
}

/// Element-wise (Hadamard) product.
pub fn hadamard(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    check_len(a, b, "vector::hadamard")?;
    Ok(a.iter().zip(b).map(|(x, y)| x * y).collect())
}

pub fn add_assign(a: &mut [f64], b: &[f64]) -> Result<()> {
    check_len(a, b, "vector::add_assign")?;
    for (x, y) in a.iter_mut().zip(b) {
        *x += y;
    }
    Ok(())
}

/// `a -= factor * b`.
pub fn sub_scaled_assign(a: &mut [f64], b: &[f64], factor: f64) -> Result<()> {
    check_len(a, b, "vector::sub_scaled_assign")?;
    for (x, y) in a.iter_mut().zip(b) {
        *x -= factor * y;
    }
    Ok(())
}

pub fn scale(a: &mut [f64], factor: f64) {
    for x in a {
        *x *= factor;
    }
}

/// Index of the maximum element; the first one wins on ties.
/// Returns `None` for an empty slice.
pub fn argmax(v: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &x) in v.iter().enumerate() {
        match best {
            Some((_, b)) if x <= b => {}
            _ => best = Some((i, x)),
        }
    }
    best.map(|(i, _)| i)
}
