//! Arvak Unitary Decomposition Engine
//!
//! This crate synthesizes an arbitrary N×N unitary (N = 2ⁿ) into a flat stream
//! of real-valued rotation angles: single-qubit ZYZ Euler angles at the
//! recursion base, and uniformly-controlled rotation angles everywhere else.
//! It is the numerical core of unitary synthesis; turning the angle stream
//! into concrete gate instructions on concrete qubits is the job of a
//! surrounding compiler driver and is out of scope here.
//!
//! # Architecture
//!
//! ```text
//! Unitary::new(name, data)
//!        │
//!        ▼
//! Unitary::decompose()
//!        │
//!        ├── unitarity check ──► SynthError::NonUnitary
//!        │
//!        ▼
//! driver::decompose (transpose, recurse)
//!        │
//!        ├── n == 1 ───────────► zyz::decompose
//!        ├── block-diagonal ───► demux::demultiplex × 2 (+ zero padding)
//!        └── general ──────────► csd::thin_csd, then
//!                                 demux (R) → ucr::multicontrolled_y(s) → demux (L)
//! ```
//!
//! # Example
//!
//! ```
//! use arvak_synth::Unitary;
//! use num_complex::Complex64;
//!
//! let one = Complex64::new(1.0, 0.0);
//! let zero = Complex64::new(0.0, 0.0);
//! // Identity on one qubit: column-major [[1,0],[0,1]].
//! let mut u = Unitary::new("identity", vec![one, zero, zero, one]).unwrap();
//! u.decompose().unwrap();
//! assert_eq!(u.instructions().len(), 3);
//! ```

pub mod csd;
pub mod demux;
pub mod driver;
pub mod error;
pub mod graycode;
pub mod linalg;
pub mod ucr;
pub mod unitary;
pub mod zyz;

pub use error::{SynthError, SynthResult};
pub use unitary::Unitary;
