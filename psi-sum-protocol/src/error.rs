//! Error types for the PSI-Sum protocol.

use thiserror::Error;

/// Errors that can occur while setting up or running a PSI-Sum session.
///
/// Every variant is fatal for the session it occurs in. Exponents and keys
/// are single-use, so there is no retry-with-same-secrets path; the only
/// recovery is a fresh session with fresh randomness. An empty intersection
/// is not an error, it is a valid result with sum zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PsiSumError {
    /// The bounded search for a random prime ran out of candidates.
    #[error("exhausted {attempts} candidates searching for a {bits}-bit prime")]
    PrimalityGenerationExhausted { bits: u64, attempts: usize },

    /// No candidate below the scan limit generated a large subgroup of the
    /// prime field.
    #[error("no group generator found among candidates below {limit}")]
    GeneratorSearchExhausted { limit: u64 },

    /// A modular inverse was requested for an operand sharing a factor with
    /// the modulus. Indicates broken parameters; never expected in correct
    /// operation.
    #[error("no modular inverse: operand and modulus are not coprime")]
    NoModularInverse,

    /// A plaintext at or above the Paillier modulus cannot be encrypted.
    #[error("plaintext out of range: values must be below the Paillier modulus")]
    PlaintextOutOfRange,

    /// Decryption was invoked with a key pair that does not correspond to
    /// the ciphertext.
    #[error("ciphertext does not match the Paillier key pair")]
    PaillierKeyMismatch,
}

/// Result type for PSI-Sum operations.
pub type Result<T> = std::result::Result<T, PsiSumError>;
