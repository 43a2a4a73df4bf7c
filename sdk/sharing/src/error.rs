//! Error taxonomy for the sharing engine.
//!
//! Every precondition or arithmetic violation surfaces as a typed error
//! from `split`/`combine`; nothing is recovered silently. An ambiguous
//! state (singular system, out-of-bound reconstruction) is a hard
//! failure, never a plausible-but-wrong secret.

use thiserror::Error;

/// Errors raised by the sharing engine and its collaborators
#[derive(Debug, Error)]
pub enum ShareError {
    /// Threshold outside `1 <= k <= n`
    #[error("invalid parameters: k={k}, n={n}")]
    InvalidParameters { k: usize, n: usize },

    /// Fewer fragments supplied to `combine` than the declared threshold
    #[error("insufficient fragments: got {got}, need {need}")]
    InsufficientFragments { got: usize, need: usize },

    /// Fragments referencing mismatched scheme parameters, duplicate
    /// evaluation points or non-coprime moduli
    #[error("inconsistent fragments: {0}")]
    InconsistentFragments(String),

    /// Singular linear system, non-invertible modular value, or a
    /// reconstructed value outside the declared secret bound
    #[error("arithmetic failure: {0}")]
    ArithmeticFailure(String),

    /// A textual fragment record that does not parse
    #[error("malformed fragment record: {0}")]
    MalformedFragment(String),

    /// Payload ciphertext rejected by the symmetric cipher
    #[error("payload decryption failed")]
    DecryptionFailed,
}
