//! Deterministic ECDSA signing over secp256k1.
//!
//! Point multiplication comes from the `secp256k1` crate; the signature
//! equation `s = k⁻¹(z + r·d) mod n` and the canonical serialization live
//! here so the nonce always flows through [`crate::key::nonce`]. Signing
//! always emits low-S, regardless of what verification policy is active.

use crate::key::math;
use crate::key::nonce::ecdsa_nonce;
use crate::util::{Error, Hash256, Result};
use num_bigint::BigUint;
use num_traits::Zero;
use secp256k1::{PublicKey, Secp256k1, SecretKey, Signing};

/// Re-derivation attempts before signing gives up. A valid secret key cannot
/// exhaust this in practice.
pub(crate) const MAX_NONCE_ATTEMPTS: u32 = 255;

/// A raw ECDSA signature before serialization.
pub(crate) struct RawSignature {
    pub r: BigUint,
    pub s: BigUint,
    /// Which of the candidate curve points R the verifier must pick to
    /// recover the signing key: bit 0 is the parity of R.y, bit 1 is set
    /// when R.x overflowed the group order.
    pub recovery_id: u8,
}

/// Signs a message hash deterministically, returning (r, s, recovery id).
///
/// The nonce is RFC 6979; a degenerate nonce (zero, out of range, or one
/// producing r = 0 or s = 0) triggers re-derivation with the next attempt
/// counter. S is normalized to the low half of the order, flipping the
/// recovery parity when negated.
///
/// # Errors
/// [`Error::IllegalState`] if no valid nonce is found after
/// [`MAX_NONCE_ATTEMPTS`] attempts.
pub(crate) fn sign_raw<C: Signing>(
    secp: &Secp256k1<C>,
    secret: &SecretKey,
    hash: &Hash256,
) -> Result<RawSignature> {
    let n = math::order();
    let z = BigUint::from_bytes_be(&hash.0) % &n;
    let d = BigUint::from_bytes_be(&secret.secret_bytes());

    for attempt in 0..MAX_NONCE_ATTEMPTS {
        let nonce = ecdsa_nonce(&secret.secret_bytes(), &hash.0, attempt);
        let Ok(k_key) = SecretKey::from_slice(&nonce) else {
            continue;
        };
        let point = PublicKey::from_secret_key(secp, &k_key).serialize_uncompressed();
        let r_field = BigUint::from_bytes_be(&point[1..33]);
        let y_parity = point[64] & 1;

        let overflow = r_field >= n;
        let r = if overflow { &r_field - &n } else { r_field };
        if r.is_zero() {
            continue;
        }

        let k = BigUint::from_bytes_be(&nonce);
        let mut s = (math::invert_mod_order(&k) * (&z + &r * &d)) % &n;
        if s.is_zero() {
            continue;
        }

        let mut recovery_id = u8::from(overflow) << 1 | y_parity;
        if s > math::half_order() {
            s = &n - s;
            recovery_id ^= 1;
        }
        return Ok(RawSignature { r, s, recovery_id });
    }
    Err(Error::IllegalState("No usable ECDSA nonce found".to_string()))
}

/// One minimal-length DER INTEGER: leading zeros stripped, a single 0x00
/// pad added back only when the top bit would read as a sign.
fn push_der_integer(out: &mut Vec<u8>, value: &BigUint) {
    let bytes = math::be32(value);
    let mut start = 0;
    while start < 31 && bytes[start] == 0 {
        start += 1;
    }
    let pad = usize::from(bytes[start] & 0x80 != 0);
    out.push(0x02);
    out.push((32 - start + pad) as u8);
    if pad == 1 {
        out.push(0x00);
    }
    out.extend_from_slice(&bytes[start..]);
}

/// Serializes (r, s) as a strict DER SEQUENCE of two INTEGERs.
pub(crate) fn encode_der(r: &BigUint, s: &BigUint) -> Vec<u8> {
    let mut body = Vec::with_capacity(70);
    push_der_integer(&mut body, r);
    push_der_integer(&mut body, s);
    let mut out = Vec::with_capacity(body.len() + 2);
    out.push(0x30);
    out.push(body.len() as u8);
    out.extend_from_slice(&body);
    out
}

/// Base value of the compact signature header byte.
const COMPACT_HEADER_BASE: u8 = 27;
/// Added to the header when the signer's public key is compressed.
const COMPACT_COMPRESSED_FLAG: u8 = 4;

/// The header byte of a 65-byte compact signature, decomposed.
///
/// Encodes the 2-bit recovery id and whether the recovered public key should
/// be serialized in compressed form: `27 + recovery_id + 4·compressed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactHeader {
    /// Recovery id in 0..=3.
    pub recovery_id: u8,
    /// Serialize the recovered key compressed.
    pub compressed: bool,
}

impl CompactHeader {
    /// Decodes a header byte.
    ///
    /// # Errors
    /// [`Error::BadData`] when the byte is outside the valid 27..=34 range.
    pub fn decode(byte: u8) -> Result<CompactHeader> {
        if !(COMPACT_HEADER_BASE..COMPACT_HEADER_BASE + 8).contains(&byte) {
            return Err(Error::BadData(format!("Invalid compact signature header {}", byte)));
        }
        let bits = byte - COMPACT_HEADER_BASE;
        Ok(CompactHeader {
            recovery_id: bits & 3,
            compressed: bits & COMPACT_COMPRESSED_FLAG != 0,
        })
    }

    /// Encodes back to the header byte.
    #[must_use]
    pub fn encode(&self) -> u8 {
        COMPACT_HEADER_BASE
            + self.recovery_id
            + if self.compressed { COMPACT_COMPRESSED_FLAG } else { 0 }
    }
}
