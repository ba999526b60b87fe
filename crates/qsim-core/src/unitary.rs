//! Dense complex matrix utilities.
//!
//! Gate matrices and embedded register operators are `ndarray` matrices of
//! [`Complex64`] in row-major order. The helpers here cover exactly what the
//! simulator needs: identities, Kronecker products, conjugate transposes and
//! a unitarity measure.

use ndarray::{Array1, Array2, linalg};
use num_complex::Complex64;

/// A dense complex matrix.
pub type Matrix = Array2<Complex64>;

/// Default tolerance for normalization and unitarity checks.
pub const NORM_TOLERANCE: f64 = 1e-9;

/// Shorthand for a real complex number.
#[inline]
pub(crate) fn re(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

/// Build a square matrix from rows of complex numbers.
pub(crate) fn from_rows<const N: usize>(rows: [[Complex64; N]; N]) -> Matrix {
    Array2::from_shape_fn((N, N), |(r, c)| rows[r][c])
}

/// The `dim × dim` identity.
pub fn identity(dim: usize) -> Matrix {
    Array2::from_shape_fn((dim, dim), |(r, c)| if r == c { re(1.0) } else { re(0.0) })
}

/// Kronecker (tensor) product `a ⊗ b`.
pub fn kron(a: &Matrix, b: &Matrix) -> Matrix {
    linalg::kron(a, b)
}

/// Conjugate transpose.
pub fn dagger(m: &Matrix) -> Matrix {
    m.t().mapv(|z| z.conj())
}

/// Largest entry-wise deviation of `m · m†` from the identity.
///
/// Zero for an exactly unitary matrix. Non-square input yields `f64::INFINITY`.
pub fn unitarity_deviation(m: &Matrix) -> f64 {
    let (rows, cols) = m.dim();
    if rows != cols {
        return f64::INFINITY;
    }
    let product = m.dot(&dagger(m));
    product
        .indexed_iter()
        .map(|((r, c), z)| {
            let expected = if r == c { re(1.0) } else { re(0.0) };
            (z - expected).norm()
        })
        .fold(0.0, f64::max)
}

/// Check unitarity within `tolerance`.
pub fn is_unitary(m: &Matrix, tolerance: f64) -> bool {
    unitarity_deviation(m) <= tolerance
}

/// Matrix-vector product on a plain amplitude slice.
pub fn apply_to(m: &Matrix, amplitudes: &[Complex64]) -> Vec<Complex64> {
    let v = Array1::from(amplitudes.to_vec());
    m.dot(&v).to_vec()
}

/// Entry-wise approximate equality.
pub fn approx_eq(a: &Matrix, b: &Matrix, tolerance: f64) -> bool {
    a.dim() == b.dim() && a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() <= tolerance)
}

/// Return `log2(dim)` if `dim` is a power of two of at least 2.
pub fn qubits_for_dim(dim: usize) -> Option<usize> {
    if dim >= 2 && dim.is_power_of_two() {
        Some(dim.trailing_zeros() as usize)
    } else {
        None
    }
}
