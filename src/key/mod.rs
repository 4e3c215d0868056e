//! Private key engine: deterministic ECDSA, Schnorr, and recoverable compact
//! signing, plus the public key wrapper used by verification.
//!
//! Every operation is a pure function of its inputs; there is no state
//! shared across calls and everything here may run concurrently from
//! independent validation threads.

mod ecdsa;
mod math;
pub mod nonce;
mod schnorr;

pub use self::ecdsa::CompactHeader;

use crate::util::{Error, Hash256, Result};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId, Signature};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

/// A private key: a secret scalar plus a compression preference.
///
/// The preference only affects how the derived public key and the compact
/// signature header serialize; it never changes the signature math, and
/// signatures produced under either preference are byte identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrivateKey {
    secret: SecretKey,
    compressed: bool,
}

impl PrivateKey {
    /// Builds a key from a raw 32-byte secret.
    ///
    /// # Errors
    /// [`Error::Secp256k1Error`] if the bytes are zero or not below the
    /// curve order.
    pub fn from_bytes(bytes: &[u8; 32], compressed: bool) -> Result<PrivateKey> {
        let secret = SecretKey::from_slice(bytes)?;
        Ok(PrivateKey { secret, compressed })
    }

    /// Generates a fresh random key.
    #[must_use]
    pub fn generate(compressed: bool) -> PrivateKey {
        let secret = SecretKey::new(&mut rand::thread_rng());
        PrivateKey { secret, compressed }
    }

    /// The raw secret scalar.
    #[must_use]
    #[inline]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.secret.secret_bytes()
    }

    /// Whether the derived public key serializes compressed.
    #[must_use]
    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Derives the public key, serialized per the compression preference.
    #[must_use]
    pub fn public_key(&self) -> PubKey {
        let secp = Secp256k1::signing_only();
        let pubkey = PublicKey::from_secret_key(&secp, &self.secret);
        PubKey::from_inner(&pubkey, self.compressed)
    }

    /// Whether a candidate public key is byte-identical to this key's own.
    ///
    /// A compressed-preference key does not match the uncompressed
    /// serialization of the same curve point, and vice versa.
    #[must_use]
    pub fn verify_public_key(&self, candidate: &PubKey) -> bool {
        self.public_key() == *candidate
    }

    /// Signs a message hash with deterministic ECDSA, DER encoded.
    ///
    /// Always emits the canonical low-S form with minimal-length integers.
    /// Independent of the compression preference.
    ///
    /// # Errors
    /// [`Error::IllegalState`] if nonce derivation keeps degenerating, which
    /// cannot happen for a valid key.
    pub fn sign_ecdsa(&self, hash: &Hash256) -> Result<Vec<u8>> {
        let secp = Secp256k1::signing_only();
        let raw = ecdsa::sign_raw(&secp, &self.secret, hash)?;
        Ok(ecdsa::encode_der(&raw.r, &raw.s))
    }

    /// Signs a message hash as a 65-byte recoverable compact signature:
    /// header byte, then R and S as fixed-width 32-byte integers.
    ///
    /// # Errors
    /// [`Error::IllegalState`] on persistent nonce degeneration.
    pub fn sign_compact(&self, hash: &Hash256) -> Result<[u8; 65]> {
        let secp = Secp256k1::signing_only();
        let raw = ecdsa::sign_raw(&secp, &self.secret, hash)?;
        let header = CompactHeader {
            recovery_id: raw.recovery_id,
            compressed: self.compressed,
        };
        let mut sig = [0u8; 65];
        sig[0] = header.encode();
        sig[1..33].copy_from_slice(&math::be32(&raw.r));
        sig[33..65].copy_from_slice(&math::be32(&raw.s));
        Ok(sig)
    }

    /// Signs a message hash with the 64-byte Schnorr scheme.
    ///
    /// Nonce derivation is domain separated from ECDSA, so the two schemes
    /// never share an R for the same key and message. Independent of the
    /// compression preference.
    ///
    /// # Errors
    /// [`Error::IllegalState`] on persistent nonce degeneration.
    pub fn sign_schnorr(&self, hash: &Hash256) -> Result<[u8; 64]> {
        let secp = Secp256k1::signing_only();
        schnorr::sign(&secp, &self.secret, hash)
    }
}

/// An immutable, shape-validated public key: 33 bytes (0x02/0x03) or
/// 65 bytes (0x04).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubKey {
    bytes: Vec<u8>,
}

impl PubKey {
    /// Wraps a public key byte string, checking its shape and that it is a
    /// valid curve point.
    ///
    /// # Errors
    /// [`Error::BadData`] for a malformed shape, [`Error::Secp256k1Error`]
    /// for a well-shaped encoding that is not on the curve.
    pub fn from_slice(bytes: &[u8]) -> Result<PubKey> {
        let well_shaped = match bytes.len() {
            33 => bytes[0] == 0x02 || bytes[0] == 0x03,
            65 => bytes[0] == 0x04,
            _ => false,
        };
        if !well_shaped {
            return Err(Error::BadData("Malformed public key".to_string()));
        }
        PublicKey::from_slice(bytes)?;
        Ok(PubKey { bytes: bytes.to_vec() })
    }

    fn from_inner(pubkey: &PublicKey, compressed: bool) -> PubKey {
        let bytes = if compressed {
            pubkey.serialize().to_vec()
        } else {
            pubkey.serialize_uncompressed().to_vec()
        };
        PubKey { bytes }
    }

    /// The raw serialized bytes.
    #[must_use]
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether this key is in compressed form.
    #[must_use]
    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.bytes.len() == 33
    }

    /// Verifies a DER ECDSA signature over a message hash.
    ///
    /// Parses DER laxly and normalizes a high S before verifying, mirroring
    /// the historical node: encoding policy is the script layer's job, not
    /// the curve check's. Returns false on any malformed input.
    #[must_use]
    pub fn verify_ecdsa(&self, hash: &Hash256, sig: &[u8]) -> bool {
        let secp = Secp256k1::verification_only();
        let Ok(pubkey) = PublicKey::from_slice(&self.bytes) else {
            return false;
        };
        let Ok(mut signature) = Signature::from_der_lax(sig) else {
            return false;
        };
        signature.normalize_s();
        let message = Message::from_digest(hash.0);
        secp.verify_ecdsa(&message, &signature, &pubkey).is_ok()
    }

    /// Verifies a 64-byte Schnorr signature over a message hash. Returns
    /// false on any malformed input.
    #[must_use]
    pub fn verify_schnorr(&self, hash: &Hash256, sig: &[u8]) -> bool {
        let Ok(sig64) = <&[u8; 64]>::try_from(sig) else {
            return false;
        };
        // Recomputing R multiplies by the generator, so a verify-only
        // context is not enough here.
        let secp = Secp256k1::new();
        let Ok(pubkey) = PublicKey::from_slice(&self.bytes) else {
            return false;
        };
        schnorr::verify(&secp, &pubkey, hash, sig64)
    }

    /// Verifies a signature of either scheme, dispatched by payload shape.
    #[must_use]
    pub fn verify(&self, hash: &Hash256, sig: &[u8]) -> bool {
        match SignatureVariant::from_bytes(sig) {
            SignatureVariant::Schnorr(s) => self.verify_schnorr(hash, s),
            SignatureVariant::Ecdsa(s) => self.verify_ecdsa(hash, s),
        }
    }

    /// Recovers the signing public key from a 65-byte compact signature.
    ///
    /// The recovered key serializes per the header's compression flag.
    ///
    /// # Errors
    /// [`Error::BadArgument`] for a wrong-length input, [`Error::BadData`]
    /// for an out-of-range header, [`Error::Secp256k1Error`] when R or S is
    /// out of range or no valid point can be recovered.
    pub fn recover_compact(hash: &Hash256, sig: &[u8]) -> Result<PubKey> {
        if sig.len() != 65 {
            return Err(Error::BadArgument(format!(
                "Compact signature length {}",
                sig.len()
            )));
        }
        let header = CompactHeader::decode(sig[0])?;
        let recovery_id = RecoveryId::from_i32(i32::from(header.recovery_id))?;
        let signature = RecoverableSignature::from_compact(&sig[1..], recovery_id)?;
        let secp = Secp256k1::verification_only();
        let message = Message::from_digest(hash.0);
        let pubkey = secp.recover_ecdsa(&message, &signature)?;
        Ok(PubKey::from_inner(&pubkey, header.compressed))
    }
}

/// The two signature payload shapes the verification path dispatches over.
///
/// Selection is purely by length: exactly 64 bytes is a Schnorr signature,
/// anything else is treated as DER ECDSA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureVariant<'a> {
    /// DER-encoded ECDSA payload.
    Ecdsa(&'a [u8]),
    /// Fixed-width 64-byte Schnorr payload.
    Schnorr(&'a [u8]),
}

impl<'a> SignatureVariant<'a> {
    /// Classifies a signature payload (without hash type byte).
    #[must_use]
    pub fn from_bytes(sig: &'a [u8]) -> SignatureVariant<'a> {
        if sig.len() == 64 {
            SignatureVariant::Schnorr(sig)
        } else {
            SignatureVariant::Ecdsa(sig)
        }
    }
}
