//! Thin adapter around `faer`'s dense linear-algebra kernels.
//!
//! The decomposition engine works in `ndarray::Array2<Complex64>` everywhere
//! else; this module is the only place that crosses into `faer`'s own
//! matrix type to run SVD, Householder QR, complex Schur (for
//! eigendecomposition of normal matrices) and column-pivoted least squares.

use faer::prelude::*;
use faer::{complex_native::c64, Mat, MatRef};
use ndarray::{s, Array1, Array2, ArrayView2};
use num_complex::Complex64;

use crate::error::{SynthError, SynthResult};

fn to_c64(z: Complex64) -> c64 {
    c64::new(z.re, z.im)
}

fn from_c64(z: c64) -> Complex64 {
    Complex64::new(z.re, z.im)
}

/// Convert an `ndarray` complex matrix into a `faer` matrix.
pub fn to_faer(a: ArrayView2<Complex64>) -> Mat<c64> {
    Mat::from_fn(a.nrows(), a.ncols(), |i, j| to_c64(a[(i, j)]))
}

/// Convert a `faer` complex matrix back into an `ndarray` matrix.
pub fn from_faer(m: MatRef<'_, c64>) -> Array2<Complex64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| from_c64(m.read(i, j)))
}

/// `N×N` identity, `N` from `n`.
pub fn eye(n: usize) -> Array2<Complex64> {
    Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            Complex64::new(1.0, 0.0)
        } else {
            Complex64::new(0.0, 0.0)
        }
    })
}

/// Conjugate transpose.
pub fn adjoint(a: ArrayView2<Complex64>) -> Array2<Complex64> {
    a.t().mapv(|z| z.conj())
}

/// The anti-diagonal permutation matrix `z` of size `n` (reverses column/row
/// order when multiplied on the right/left).
pub fn anti_diagonal(n: usize) -> Array2<Complex64> {
    Array2::from_shape_fn((n, n), |(i, j)| {
        if i + j == n - 1 {
            Complex64::new(1.0, 0.0)
        } else {
            Complex64::new(0.0, 0.0)
        }
    })
}

/// Result of a thin (reduced) SVD: `a = u * diag(s) * v^*`.
pub struct ThinSvd {
    /// Left singular vectors, `N×N` (square input, so thin == full here).
    pub u: Array2<Complex64>,
    /// Non-negative singular values in descending order, length `N`.
    pub s: Array1<f64>,
    /// Right singular vectors (not conjugate-transposed), `N×N`.
    pub v: Array2<Complex64>,
}

/// Thin SVD of a square complex matrix.
pub fn thin_svd(a: ArrayView2<Complex64>) -> SynthResult<ThinSvd> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(SynthError::LinAlgFailure(format!(
            "thin_svd expects a square matrix, got {}x{}",
            n,
            a.ncols()
        )));
    }
    if n == 1 {
        let z = a[(0, 0)];
        let s = z.norm();
        let phase = if s > 0.0 {
            z / s
        } else {
            Complex64::new(1.0, 0.0)
        };
        let mut u = eye(1);
        u[(0, 0)] = phase;
        return Ok(ThinSvd {
            u,
            s: Array1::from_vec(vec![s]),
            v: eye(1),
        });
    }

    let mat = to_faer(a);
    let svd = mat.thin_svd();
    let u = from_faer(svd.u());
    let v = from_faer(svd.v());
    let sdiag = svd.s_diagonal();
    let s = Array1::from_shape_fn(n, |i| sdiag.read(i));
    Ok(ThinSvd { u, s, v })
}

/// Householder Q factor of `a`'s (thin) QR decomposition: `a = q * r`.
pub fn householder_q(a: ArrayView2<Complex64>) -> SynthResult<Array2<Complex64>> {
    let mat = to_faer(a);
    let qr = mat.qr();
    Ok(from_faer(qr.compute_thin_q().as_ref()))
}

/// Full (square) Householder Q factor of a possibly rectangular `a`: for an
/// `m x k` input this returns the `m x m` unitary completing the thin `Q`
/// with an orthonormal basis for its complement, exactly the `householderQ()`
/// accessor on Eigen's `HouseholderQR`.
pub fn householder_full_q(a: ArrayView2<Complex64>) -> SynthResult<Array2<Complex64>> {
    let mat = to_faer(a);
    let qr = mat.qr();
    Ok(from_faer(qr.compute_q().as_ref()))
}

/// Eigendecomposition of a normal complex matrix (here: always `U1 * U2^*`,
/// which is unitary and therefore normal). A normal matrix's complex Schur
/// decomposition `a = q * t * q^*` has a strictly diagonal `t`, so the Schur
/// vectors `q` double as the eigenvectors and `diag(t)` as the eigenvalues.
pub struct Eig {
    /// Eigenvalues, in the order the Schur factorization produced them.
    pub values: Array1<Complex64>,
    /// Eigenvectors as columns, orthonormal since `a` is normal.
    pub vectors: Array2<Complex64>,
}

/// Eigendecomposition of a normal (in practice: unitary) complex matrix.
pub fn eig_normal(a: ArrayView2<Complex64>) -> SynthResult<Eig> {
    let n = a.nrows();
    let mat = to_faer(a);
    let schur = mat.complex_schur();
    let t = schur.s();
    let q = schur.u();
    let values = Array1::from_shape_fn(n, |i| from_c64(t.read(i, i)));
    let vectors = from_faer(q.as_ref());
    Ok(Eig { values, vectors })
}

/// Solve the real rank-revealing least-squares problem `m * x = v` with a
/// column-pivoted QR, returning the full solution vector.
pub fn solve_col_piv_qr(m: &Array2<f64>, v: &Array1<f64>) -> SynthResult<Array1<f64>> {
    let n = m.nrows();
    let mat = Mat::<f64>::from_fn(n, m.ncols(), |i, j| m[(i, j)]);
    let rhs = Mat::<f64>::from_fn(n, 1, |i, _| v[i]);
    let qr = mat.col_piv_qr();
    let sol = qr.solve(&rhs);
    Ok(Array1::from_shape_fn(m.ncols(), |i| sol.read(i, 0)))
}

/// `‖a * a^* − I‖_∞`, the unitarity deviation used by the recursion driver's
/// precheck.
pub fn unitarity_deviation(a: ArrayView2<Complex64>) -> f64 {
    let n = a.nrows();
    let prod = a.dot(&adjoint(a));
    let mut max_dev = 0.0_f64;
    for i in 0..n {
        for j in 0..n {
            let expected = if i == j {
                Complex64::new(1.0, 0.0)
            } else {
                Complex64::new(0.0, 0.0)
            };
            let dev = (prod[(i, j)] - expected).norm();
            if dev > max_dev {
                max_dev = dev;
            }
        }
    }
    max_dev
}

/// `true` if every element of `a[row_range, col_range]` has absolute value
/// at most `tol`.
pub fn block_is_zero(a: ArrayView2<Complex64>, tol: f64) -> bool {
    a.iter().all(|z| z.norm() <= tol)
}

/// Top-left, top-right, bottom-left and bottom-right `n/2`-blocks of a
/// `n×n` matrix, `n` even.
pub fn quarter_blocks(
    a: ArrayView2<Complex64>,
) -> (
    Array2<Complex64>,
    Array2<Complex64>,
    Array2<Complex64>,
    Array2<Complex64>,
) {
    let n = a.nrows();
    let h = n / 2;
    (
        a.slice(s![..h, ..h]).to_owned(),
        a.slice(s![..h, h..]).to_owned(),
        a.slice(s![h.., ..h]).to_owned(),
        a.slice(s![h.., h..]).to_owned(),
    )
}
