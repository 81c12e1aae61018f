//! Error types for the unitary decomposition engine.

use thiserror::Error;

/// Errors produced while constructing or decomposing a [`crate::Unitary`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SynthError {
    /// Input length is not a perfect square, or its square root is not a
    /// power of two.
    #[error("input length {len} is not N\u{00B2} for N a power of two")]
    BadShape {
        /// The offending flat input length.
        len: usize,
    },

    /// `‖M·M* − I‖_∞` exceeded the unitarity tolerance.
    #[error("matrix '{name}' is not unitary: max deviation {deviation:e} exceeds tolerance {tolerance:e}")]
    NonUnitary {
        /// Name of the offending [`crate::Unitary`] handle, for diagnostics.
        name: String,
        /// The measured `‖M·M* − I‖_∞` deviation.
        deviation: f64,
        /// The tolerance that was exceeded.
        tolerance: f64,
    },

    /// The demultiplexer encountered two equal unitary blocks larger than
    /// 2×2, a case with no known closed-form decomposition wired up here.
    #[error("demultiplexing of equal {size}x{size} blocks is not implemented")]
    NotImplemented {
        /// Side length of the offending block.
        size: usize,
    },

    /// The underlying SVD/QR/eigensolver failed to converge or was handed a
    /// shape it cannot factor.
    #[error("linear algebra backend failed: {0}")]
    LinAlgFailure(String),

    /// `decompose` was called more than once on the same handle.
    #[error("unitary '{name}' has already been decomposed")]
    AlreadyDecomposed {
        /// Name of the handle that was re-invoked.
        name: String,
    },
}

/// Result type for decomposition operations.
pub type SynthResult<T> = Result<T, SynthError>;
