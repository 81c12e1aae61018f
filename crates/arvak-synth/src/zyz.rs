//! Single-qubit ZYZ Euler decomposition, the base case of the recursion.

use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;

/// The three Euler angles and global phase of a 2×2 special-unitary,
/// `U = e^{iδ} · Rz(α) · Ry(β) · Rz(γ)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZyzAngles {
    /// Rotation about Z applied last (closest to the ket).
    pub alpha: f64,
    /// Rotation about Y.
    pub beta: f64,
    /// Rotation about Z applied first.
    pub gamma: f64,
    /// Global phase, unused by the angle stream but kept for diagnostics.
    pub delta: f64,
}

/// Decompose a 2×2 unitary into ZYZ Euler angles.
///
/// `matrix` must be row-major `[[a, b], [c, d]]`.
pub fn decompose(matrix: ArrayView2<Complex64>) -> ZyzAngles {
    let a00 = matrix[(0, 0)];
    let a01 = matrix[(0, 1)];
    let a10 = matrix[(1, 0)];
    let a11 = matrix[(1, 1)];

    let det = a00 * a11 - a10 * a01;
    let delta = det.im.atan2(det.re) / 2.0;

    let phase = Complex64::new(0.0, -delta).exp();
    let a = phase * a00;
    let b = phase * a01;

    let sw = (b.im * b.im + b.re * b.re + a.im * a.im).sqrt();
    let (wx, wy, wz) = if sw > 0.0 {
        (b.im / sw, b.re / sw, a.im / sw)
    } else {
        (0.0, 0.0, 0.0)
    };

    let t1 = a.im.atan2(a.re);
    let t2 = b.im.atan2(b.re);
    let alpha = t1 + t2;
    let gamma = t1 - t2;
    let beta = 2.0 * (sw * (wx * wx + wy * wy).sqrt()).atan2((a.re * a.re + (wz * sw).powi(2)).sqrt());

    ZyzAngles {
        alpha,
        beta,
        gamma,
        delta,
    }
}

/// Append `(-gamma, -beta, -alpha)` to `instructions`, the order the
/// recursion driver's contract requires.
pub fn decompose_into(matrix: ArrayView2<Complex64>, instructions: &mut Vec<f64>) {
    let angles = decompose(matrix);
    instructions.push(-angles.gamma);
    instructions.push(-angles.beta);
    instructions.push(-angles.alpha);
}

/// Reconstruct `Rz(alpha) * Ry(beta) * Rz(gamma)` scaled by `e^{i*delta}`,
/// used by the test suite to check round-trip reconstruction.
#[cfg(test)]
pub fn reconstruct(angles: &ZyzAngles) -> Array2<Complex64> {
    fn rz(theta: f64) -> Array2<Complex64> {
        let e_neg = Complex64::new(0.0, -theta / 2.0).exp();
        let e_pos = Complex64::new(0.0, theta / 2.0).exp();
        ndarray::array![
            [e_neg, Complex64::new(0.0, 0.0)],
            [Complex64::new(0.0, 0.0), e_pos]
        ]
    }
    fn ry(theta: f64) -> Array2<Complex64> {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let s = Complex64::new((theta / 2.0).sin(), 0.0);
        ndarray::array![[c, -s], [s, c]]
    }
    let global = Complex64::new(0.0, angles.delta).exp();
    rz(angles.alpha).dot(&ry(angles.beta)).dot(&rz(angles.gamma)) * global
}
