//! Error taxonomy for signature and public key encoding checks.

use std::fmt;

/// Reason a signature or public key encoding failed validation.
///
/// Distinguishes unparseable input from input that parsed but violates the
/// active policy. The calling script interpreter decides how severe each kind
/// is; nothing here aborts evaluation on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptError {
    /// Signature is not a strict DER encoding
    SigDer,
    /// Signature S value is above half the curve order
    SigHighS,
    /// Signature hash type is missing or not understood
    SigHashType,
    /// Public key is neither compressed nor uncompressed
    PubKeyType,
    /// Public key is not in compressed form
    NonCompressedPubKey,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            ScriptError::SigDer => "Non-canonical DER signature",
            ScriptError::SigHighS => "Non-canonical signature: S value is unnecessarily high",
            ScriptError::SigHashType => "Signature hash type missing or not understood",
            ScriptError::PubKeyType => "Public key is neither compressed or uncompressed",
            ScriptError::NonCompressedPubKey => "Using non-compressed keys is not allowed",
        };
        write!(f, "{}", s)
    }
}

impl std::error::Error for ScriptError {}
