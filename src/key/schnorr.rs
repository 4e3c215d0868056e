//! BCH-style Schnorr signatures over secp256k1.
//!
//! This is the scheme activated on Bitcoin Cash in 2019, not BIP-340: the
//! commitment hashes the full compressed public key, R is forced to have a
//! quadratic-residue y coordinate by negating the nonce, and the signature
//! is the fixed 64-byte `R.x ‖ s`. The public key is always hashed in
//! compressed form, so signatures do not depend on the key's serialization
//! preference.

use crate::key::math;
use crate::key::nonce::schnorr_nonce;
use crate::key::ecdsa::MAX_NONCE_ATTEMPTS;
use crate::util::{Error, Hash256, Result};
use bitcoin_hashes::{sha256, Hash, HashEngine};
use num_bigint::BigUint;
use num_traits::Zero;
use secp256k1::{PublicKey, Scalar, Secp256k1, SecretKey, Signing, Verification};

/// Commitment scalar `e = SHA256(R.x ‖ P_compressed ‖ m) mod n`.
fn compute_e(r_x: &[u8; 32], pubkey: &PublicKey, hash: &Hash256) -> BigUint {
    let mut engine = sha256::Hash::engine();
    engine.input(r_x);
    engine.input(&pubkey.serialize());
    engine.input(&hash.0);
    let digest = sha256::Hash::from_engine(engine).to_byte_array();
    BigUint::from_bytes_be(&digest) % math::order()
}

/// Signs a message hash, producing the 64-byte `R.x ‖ s` encoding.
///
/// Deterministic: the nonce comes from the Schnorr-tagged RFC 6979
/// derivation, re-derived with an attempt counter if degenerate.
///
/// # Errors
/// [`Error::IllegalState`] if no usable nonce is found after
/// [`MAX_NONCE_ATTEMPTS`] attempts.
pub(crate) fn sign<C: Signing>(
    secp: &Secp256k1<C>,
    secret: &SecretKey,
    hash: &Hash256,
) -> Result<[u8; 64]> {
    let n = math::order();
    let d = BigUint::from_bytes_be(&secret.secret_bytes());
    let pubkey = PublicKey::from_secret_key(secp, secret);

    for attempt in 0..MAX_NONCE_ATTEMPTS {
        let nonce = schnorr_nonce(&secret.secret_bytes(), &hash.0, attempt);
        let Ok(nonce_key) = SecretKey::from_slice(&nonce) else {
            continue;
        };
        let point = PublicKey::from_secret_key(secp, &nonce_key).serialize_uncompressed();
        let mut r_x = [0u8; 32];
        r_x.copy_from_slice(&point[1..33]);
        let r_y = BigUint::from_bytes_be(&point[33..65]);

        // R must have a quadratic-residue y; negating k mirrors R across
        // the x axis without changing R.x.
        let k0 = BigUint::from_bytes_be(&nonce);
        let k = if math::is_quad_residue(&r_y) { k0 } else { &n - k0 };

        let e = compute_e(&r_x, &pubkey, hash);
        let s = (k + e * &d) % &n;
        if s.is_zero() {
            continue;
        }

        let mut sig = [0u8; 64];
        sig[..32].copy_from_slice(&r_x);
        sig[32..].copy_from_slice(&math::be32(&s));
        return Ok(sig);
    }
    Err(Error::IllegalState("No usable Schnorr nonce found".to_string()))
}

/// Computes `s·G + (n − e)·P` as an optional point, None meaning infinity
/// or an unrepresentable term.
///
/// Needs a signing-capable context: the `s·G` term goes through
/// [`PublicKey::from_secret_key`], which is the only generator
/// multiplication the curve crate exposes.
fn recompute_r<C: Signing + Verification>(
    secp: &Secp256k1<C>,
    pubkey: &PublicKey,
    s: &BigUint,
    e: &BigUint,
) -> Option<PublicKey> {
    let s_term = if s.is_zero() {
        None
    } else {
        SecretKey::from_slice(&math::be32(s))
            .ok()
            .map(|sk| PublicKey::from_secret_key(secp, &sk))
    };
    let e_term = if e.is_zero() {
        None
    } else {
        let neg_e = math::order() - e;
        Scalar::from_be_bytes(math::be32(&neg_e))
            .ok()
            .and_then(|scalar| pubkey.mul_tweak(secp, &scalar).ok())
    };
    match (s_term, e_term) {
        (Some(a), Some(b)) => a.combine(&b).ok(),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

/// Verifies a 64-byte Schnorr signature against a public key. Returns false
/// on any malformed input rather than erroring.
pub(crate) fn verify<C: Signing + Verification>(
    secp: &Secp256k1<C>,
    pubkey: &PublicKey,
    hash: &Hash256,
    sig: &[u8; 64],
) -> bool {
    let mut r_x = [0u8; 32];
    r_x.copy_from_slice(&sig[..32]);
    let s = BigUint::from_bytes_be(&sig[32..]);
    if BigUint::from_bytes_be(&r_x) >= math::field_prime() || s >= math::order() {
        return false;
    }

    let e = compute_e(&r_x, pubkey, hash);
    let Some(r_point) = recompute_r(secp, pubkey, &s, &e) else {
        return false;
    };
    let serialized = r_point.serialize_uncompressed();
    let y = BigUint::from_bytes_be(&serialized[33..65]);
    math::is_quad_residue(&y) && serialized[1..33] == r_x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::sha256d;
    use pretty_assertions::assert_eq;

    fn secret(hex_str: &str) -> SecretKey {
        SecretKey::from_slice(&hex::decode(hex_str).unwrap()).unwrap()
    }

    #[test]
    fn sign_verify_round_trip() {
        let secp = Secp256k1::new();
        let key = secret("12b004fff7f4b69ef8650e767f18f11ede158148b425660723b9f9a66e61f747");
        let pubkey = PublicKey::from_secret_key(&secp, &key);
        let hash = sha256d(b"schnorr round trip");
        let sig = sign(&secp, &key, &hash).unwrap();
        assert!(verify(&secp, &pubkey, &hash, &sig));
    }

    #[test]
    fn wrong_key_fails() {
        let secp = Secp256k1::new();
        let key = secret("12b004fff7f4b69ef8650e767f18f11ede158148b425660723b9f9a66e61f747");
        let other = secret("b524c28b61c9b2c49b2c7dd4c2d75887abb78768c054bd7c01af4029f6c0d117");
        let hash = sha256d(b"schnorr wrong key");
        let sig = sign(&secp, &key, &hash).unwrap();
        let other_pub = PublicKey::from_secret_key(&secp, &other);
        assert!(!verify(&secp, &other_pub, &hash, &sig));
    }

    #[test]
    fn mutated_signature_fails() {
        let secp = Secp256k1::new();
        let key = secret("12b004fff7f4b69ef8650e767f18f11ede158148b425660723b9f9a66e61f747");
        let pubkey = PublicKey::from_secret_key(&secp, &key);
        let hash = sha256d(b"schnorr mutation");
        let sig = sign(&secp, &key, &hash).unwrap();
        for i in [0usize, 31, 32, 63] {
            let mut bad = sig;
            bad[i] ^= 0x01;
            assert!(!verify(&secp, &pubkey, &hash, &bad), "flip at {}", i);
        }
    }

    #[test]
    fn out_of_range_s_fails() {
        let secp = Secp256k1::new();
        let key = secret("12b004fff7f4b69ef8650e767f18f11ede158148b425660723b9f9a66e61f747");
        let pubkey = PublicKey::from_secret_key(&secp, &key);
        let hash = sha256d(b"schnorr overflow");
        let mut sig = sign(&secp, &key, &hash).unwrap();
        sig[32..].copy_from_slice(&[0xff; 32]);
        assert!(!verify(&secp, &pubkey, &hash, &sig));
    }

    #[test]
    fn deterministic_signatures() {
        let secp = Secp256k1::new();
        let key = secret("b524c28b61c9b2c49b2c7dd4c2d75887abb78768c054bd7c01af4029f6c0d117");
        let hash = sha256d(b"schnorr determinism");
        assert_eq!(sign(&secp, &key, &hash).unwrap(), sign(&secp, &key, &hash).unwrap());
    }
}
