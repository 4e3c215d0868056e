//! Script-level validation of signature and public key encodings.
//!
//! The opcode interpreter pulls a signature byte string and a public key byte
//! string off the evaluation stack and runs them through these checks before
//! any elliptic curve verification. Which checks apply is controlled by the
//! verification flags below; with none of the strictness flags set the legacy
//! permissive behavior is preserved exactly.

mod error;
mod sigencoding;
mod sighash_type;

pub use self::error::ScriptError;
pub use self::sigencoding::{
    check_data_signature_encoding, check_pubkey_encoding, check_signature_encoding,
};
pub use self::sighash_type::{
    BaseSigHashType, SigHashType, SIGHASH_ALL, SIGHASH_ANYONECANPAY, SIGHASH_FORKID, SIGHASH_NONE,
    SIGHASH_SINGLE,
};

/// Require strict DER encoding for signatures and well-formed public keys.
pub const SCRIPT_VERIFY_STRICTENC: u32 = 1 << 1;
/// Require strict DER encoding for signatures (BIP-66).
pub const SCRIPT_VERIFY_DERSIG: u32 = 1 << 2;
/// Require the S value of ECDSA signatures to be at most half the curve order.
pub const SCRIPT_VERIFY_LOW_S: u32 = 1 << 3;
/// Accept compressed public keys only.
pub const SCRIPT_VERIFY_COMPRESSED_PUBKEYTYPE: u32 = 1 << 15;
/// Signatures commit to the fork id (BIP-143 style sighash).
///
/// Consulted by the script-verification caller when it builds the expected
/// hash type; the encoding checks themselves do not cross-check it.
pub const SCRIPT_ENABLE_SIGHASH_FORKID: u32 = 1 << 16;
