//! Multi-controlled Y/Z rotation angle solvers.
//!
//! Both convert a diagonal produced upstream (the CSD sine diagonal, or a
//! demultiplexed phase diagonal) into `2^k` rotation angles by inverting the
//! Gray-code sign pattern in [`crate::graycode::m_k`].

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::error::SynthResult;
use crate::graycode::m_k;
use crate::linalg;

/// Solve `Mₖ · t = v` and append all `2^k` entries of `t` in order.
fn solve_and_append(v: Array1<f64>, k: usize, instructions: &mut Vec<f64>) -> SynthResult<()> {
    let dim = 1usize << k;
    let m = m_k(dim);
    let t = linalg::solve_col_piv_qr(&m, &v)?;
    instructions.extend(t.iter().copied());
    Ok(())
}

/// Uniformly-controlled Y rotation angles from the CSD sine diagonal `s`.
///
/// `v = 2·arcsin(Re(diag s))`, solved against `Mₖ`.
pub fn multicontrolled_y(
    s: &Array2<Complex64>,
    k: usize,
    instructions: &mut Vec<f64>,
) -> SynthResult<()> {
    let dim = s.nrows();
    let v = Array1::from_shape_fn(dim, |i| 2.0 * s[(i, i)].re.clamp(-1.0, 1.0).asin());
    solve_and_append(v, k, instructions)
}

/// Uniformly-controlled Z rotation angles from a demultiplexed phase
/// diagonal `d` (unit modulus on the diagonal).
///
/// `v = Re(2·ln(diag d) / i)`, which for unit-modulus `d` reduces to
/// `2·arg(d)`, solved against `Mₖ`.
pub fn multicontrolled_z(
    d: &Array2<Complex64>,
    k: usize,
    instructions: &mut Vec<f64>,
) -> SynthResult<()> {
    let dim = d.nrows();
    let v = Array1::from_shape_fn(dim, |i| 2.0 * d[(i, i)].arg());
    solve_and_append(v, k, instructions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graycode::m_k;

    #[test]
    fn multicontrolled_y_round_trips_through_mk() {
        // Pick angles, build the diagonal `s = sin(theta/2)` that would have
        // produced them, and check the solver recovers the original angles.
        let k = 2;
        let dim = 1usize << k;
        let angles = vec![0.1, -0.4, 0.7, 0.2];
        let m = m_k(dim);
        let v = m.dot(&Array1::from_vec(angles.clone()));
        let s_diag = Array2::from_shape_fn((dim, dim), |(i, j)| {
            if i == j {
                Complex64::new((v[i] / 2.0).sin(), 0.0)
            } else {
                Complex64::new(0.0, 0.0)
            }
        });
        let mut instr = Vec::new();
        multicontrolled_y(&s_diag, k, &mut instr).unwrap();
        for (got, want) in instr.iter().zip(angles.iter()) {
            assert!((got - want).abs() < 1e-8, "{got} vs {want}");
        }
    }

    #[test]
    fn multicontrolled_z_appends_dim_entries() {
        let k = 1;
        let dim = 1usize << k;
        let d = Array2::from_shape_fn((dim, dim), |(i, j)| {
            if i == j {
                Complex64::new(0.0, if i == 0 { 0.3 } else { -0.6 }).exp()
            } else {
                Complex64::new(0.0, 0.0)
            }
        });
        let mut instr = Vec::new();
        multicontrolled_z(&d, k, &mut instr).unwrap();
        assert_eq!(instr.len(), dim);
    }
}
