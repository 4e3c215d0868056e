//! Deterministic nonce derivation (RFC 6979) for ECDSA and Schnorr signing.
//!
//! Byte compatible with libsecp256k1's `nonce_function_rfc6979`: the HMAC
//! DRBG is keyed with `secret ‖ message` and, for Schnorr, a trailing 16-byte
//! algorithm tag. The tag is what domain separates the two schemes: the same
//! key and message never yield the same nonce for ECDSA and Schnorr, so
//! seeing one signature of each kind over one message leaks nothing.

use bitcoin_hashes::{sha256, Hash, HashEngine, Hmac, HmacEngine};

/// Algorithm tag mixed into Schnorr nonce derivation.
const SCHNORR_ALGO16: &[u8; 16] = b"Schnorr+SHA256  ";

fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> [u8; 32] {
    let mut engine = HmacEngine::<sha256::Hash>::new(key);
    for part in parts {
        engine.input(part);
    }
    Hmac::<sha256::Hash>::from_engine(engine).to_byte_array()
}

/// RFC 6979 HMAC-SHA256 DRBG, producing the nonce for the given attempt.
///
/// Attempt 0 is the first derivation; each further attempt re-keys the DRBG
/// the way libsecp256k1 retries after a degenerate nonce.
fn rfc6979(secret: &[u8; 32], message: &[u8; 32], algo16: Option<&[u8; 16]>, attempt: u32) -> [u8; 32] {
    let mut keydata = Vec::with_capacity(80);
    keydata.extend_from_slice(secret);
    keydata.extend_from_slice(message);
    if let Some(algo) = algo16 {
        keydata.extend_from_slice(algo);
    }

    let mut v = [0x01u8; 32];
    let mut k = [0x00u8; 32];
    k = hmac_sha256(&k, &[&v, &[0x00], &keydata]);
    v = hmac_sha256(&k, &[&v]);
    k = hmac_sha256(&k, &[&v, &[0x01], &keydata]);
    v = hmac_sha256(&k, &[&v]);

    for i in 0..=attempt {
        if i > 0 {
            k = hmac_sha256(&k, &[&v, &[0x00]]);
            v = hmac_sha256(&k, &[&v]);
        }
        v = hmac_sha256(&k, &[&v]);
    }
    v
}

/// Deterministic nonce for ECDSA signing.
#[must_use]
pub fn ecdsa_nonce(secret: &[u8; 32], message: &[u8; 32], attempt: u32) -> [u8; 32] {
    rfc6979(secret, message, None, attempt)
}

/// Deterministic nonce for Schnorr signing, domain separated from ECDSA.
#[must_use]
pub fn schnorr_nonce(secret: &[u8; 32], message: &[u8; 32], attempt: u32) -> [u8; 32] {
    rfc6979(secret, message, Some(SCHNORR_ALGO16), attempt)
}
