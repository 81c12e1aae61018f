//! Public handle: construct from a flat matrix, decompose once, read angles.

use ndarray::{Array2, ShapeBuilder};
use num_complex::Complex64;

use crate::driver;
use crate::error::{SynthError, SynthResult};

/// An `N×N` unitary (`N = 2^n_qubits`) awaiting decomposition into a flat
/// angle stream.
///
/// Construct with [`Unitary::new`], call [`Unitary::decompose`] exactly
/// once, then read [`Unitary::instructions`].
#[derive(Debug, Clone)]
pub struct Unitary {
    name: String,
    input: Vec<Complex64>,
    n_qubits: u32,
    instructions: Vec<f64>,
    decomposed: bool,
}

impl Unitary {
    /// Build a handle from a flat, column-major `N²`-length matrix. `N` must
    /// be a power of two and at least 2.
    pub fn new(name: impl Into<String>, data: Vec<Complex64>) -> SynthResult<Self> {
        let len = data.len();
        let side = (len as f64).sqrt().round() as usize;
        if side * side != len || side < 2 || !side.is_power_of_two() {
            return Err(SynthError::BadShape { len });
        }
        let n_qubits = (side as f64).log2().round() as u32;

        Ok(Self {
            name: name.into(),
            input: data,
            n_qubits,
            instructions: Vec::new(),
            decomposed: false,
        })
    }

    /// Run the decomposition, populating [`Unitary::instructions`]. Must be
    /// called at most once; a second call returns
    /// [`SynthError::AlreadyDecomposed`] and leaves the handle untouched.
    pub fn decompose(&mut self) -> SynthResult<()> {
        if self.decomposed {
            return Err(SynthError::AlreadyDecomposed {
                name: self.name.clone(),
            });
        }

        let side = 1usize << self.n_qubits;
        // `self.input` is column-major; `.f()` tells `ndarray` to interpret
        // the flat buffer with Fortran (column-major) strides so indexing
        // lines up with the mathematical matrix. `driver::decompose` performs
        // the single transpose into the row-major form the recursion expects
        // (spec step: "transpose before descent") — doing it again here would
        // cancel it out.
        let column_major = Array2::from_shape_vec((side, side).f(), self.input.clone())
            .map_err(|_| SynthError::BadShape { len: self.input.len() })?;

        let instructions = driver::decompose(&self.name, column_major)?;
        self.instructions = instructions;
        self.decomposed = true;
        Ok(())
    }

    /// The flat input length (`N²`), returned as `f64` for parity with this
    /// handle's other numeric accessors.
    pub fn size(&self) -> f64 {
        self.input.len() as f64
    }

    /// The accumulated angle stream. Empty until [`Unitary::decompose`]
    /// succeeds.
    pub fn instructions(&self) -> &[f64] {
        &self.instructions
    }

    /// Whether [`Unitary::decompose`] has already succeeded.
    pub fn is_decomposed(&self) -> bool {
        self.decomposed
    }

    /// `log2(N)`, the qubit count.
    pub fn n_qubits(&self) -> u32 {
        self.n_qubits
    }

    /// The diagnostic name given at construction.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn rejects_non_square_power_of_two_length() {
        let data = vec![c(1.0, 0.0); 3];
        let err = Unitary::new("bad", data).unwrap_err();
        assert!(matches!(err, SynthError::BadShape { len: 3 }));
    }

    #[test]
    fn identity_decomposes_once() {
        let data = vec![c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(1.0, 0.0)];
        let mut u = Unitary::new("identity", data).unwrap();
        assert_eq!(u.n_qubits(), 1);
        u.decompose().unwrap();
        assert!(u.is_decomposed());
        assert_eq!(u.instructions().len(), 3);
    }

    #[test]
    fn second_decompose_call_is_rejected() {
        let data = vec![c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(1.0, 0.0)];
        let mut u = Unitary::new("identity", data).unwrap();
        u.decompose().unwrap();
        let err = u.decompose().unwrap_err();
        assert!(matches!(err, SynthError::AlreadyDecomposed { .. }));
    }

    #[test]
    fn non_unitary_input_surfaces_from_decompose() {
        let data = vec![c(2.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(2.0, 0.0)];
        let mut u = Unitary::new("scaled", data).unwrap();
        let err = u.decompose().unwrap_err();
        assert!(matches!(err, SynthError::NonUnitary { .. }));
    }
}
