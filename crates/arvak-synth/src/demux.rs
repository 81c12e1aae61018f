//! Demultiplexing of a block-diagonal unitary `diag(U1, U2)` into
//! `U1 = V·D·W`, `U2 = V·D⁻¹·W` via eigendecomposition of `U1·U2*`.

use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;

use crate::driver;
use crate::error::{SynthError, SynthResult};
use crate::linalg;
use crate::ucr;
use crate::zyz;

fn matrices_equal(a: ArrayView2<Complex64>, b: ArrayView2<Complex64>, tol: f64) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (x - y).norm() <= tol)
}

fn diag_from_complex(v: &[Complex64]) -> Array2<Complex64> {
    let n = v.len();
    Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            v[i]
        } else {
            Complex64::new(0.0, 0.0)
        }
    })
}

/// Demultiplex `diag(u1, u2)` (each of size `2^k`) and append the angle
/// stream of `W`, the controlled-Z phases over `D`, then `V`, in that order.
pub fn demultiplex(
    u1: ArrayView2<Complex64>,
    u2: ArrayView2<Complex64>,
    k: u32,
    instructions: &mut Vec<f64>,
) -> SynthResult<()> {
    let size = u1.nrows();

    if matrices_equal(u1, u2, 1e-12) {
        if size == 2 {
            zyz::decompose_into(u1, instructions);
            instructions.extend_from_slice(&[0.0; 5]);
            return Ok(());
        }
        return Err(SynthError::NotImplemented { size });
    }

    let u2_adjoint = linalg::adjoint(u2);
    let product = u1.dot(&u2_adjoint);
    let eig = linalg::eig_normal(product.view())?;

    // Reverse both eigenvalues and eigenvectors in lockstep, mirroring the
    // anti-diagonal reversal used to stabilize the CSD singular-value order.
    let z = linalg::anti_diagonal(size);
    let vectors = eig.vectors.dot(&z);
    let values_rev: Vec<Complex64> = eig.values.iter().rev().copied().collect();
    let d = diag_from_complex(
        &values_rev
            .iter()
            .map(|v| v.sqrt())
            .collect::<Vec<_>>(),
    );

    let v_adjoint = linalg::adjoint(vectors.view());
    let w = d.dot(&v_adjoint).dot(&u2);

    driver::decomp_function(w.view(), k, instructions)?;
    ucr::multicontrolled_z(&d, k as usize, instructions)?;
    driver::decomp_function(vectors.view(), k, instructions)?;

    Ok(())
}
