//! Flag-gated validation of signature and public key byte encodings.
//!
//! These checks run on untrusted stack elements before any curve math. They
//! are consensus critical: acceptance or rejection must match the historical
//! node byte for byte, including the permissive legacy branch that accepts
//! arbitrary blobs when no strictness flag is active.

use crate::script::{
    ScriptError, SigHashType, SCRIPT_VERIFY_COMPRESSED_PUBKEYTYPE, SCRIPT_VERIFY_DERSIG,
    SCRIPT_VERIFY_LOW_S, SCRIPT_VERIFY_STRICTENC,
};
use num_bigint::BigUint;

/// Half the secp256k1 group order; the largest S accepted under LOW_S.
const HALF_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b,
    0x20, 0xa0,
];

/// Bounds-checked forward reader over a signature buffer.
struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Cursor<'a> {
        Cursor { buf, pos: 0 }
    }

    fn take_byte(&mut self) -> Option<u8> {
        let b = *self.buf.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }

    fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        let slice = self.buf.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
}

/// Reads one DER INTEGER: tag 0x02, a single length byte, then the payload.
///
/// Enforces the canonical rules: non-empty, no sign-bit overflow into
/// "negative", and no 0x00 padding unless the next byte's high bit requires it.
fn take_der_integer<'a>(cursor: &mut Cursor<'a>) -> Option<&'a [u8]> {
    if cursor.take_byte()? != 0x02 {
        return None;
    }
    let len = cursor.take_byte()? as usize;
    if len == 0 {
        return None;
    }
    let payload = cursor.take(len)?;
    // Negative integers are not valid.
    if payload[0] & 0x80 != 0 {
        return None;
    }
    // Null prefixes are only allowed to clear a would-be sign bit.
    if len > 1 && payload[0] == 0x00 && payload[1] & 0x80 == 0 {
        return None;
    }
    Some(payload)
}

/// Parses a strict DER ECDSA signature (without hash type byte) into (R, S).
///
/// Grammar: `0x30 <len> 0x02 <rlen> <R> 0x02 <slen> <S>`, where `len` covers
/// everything after itself and the total is 8..=72 bytes. A DER signature
/// over 32-byte integers can never exceed 72 bytes (33 + 33 + 6); the upper
/// bound also rejects oversized-integer encodings that are otherwise
/// internally consistent.
fn parse_der_signature(sig: &[u8]) -> Option<(&[u8], &[u8])> {
    if sig.len() < 8 || sig.len() > 72 {
        return None;
    }
    let mut cursor = Cursor::new(sig);
    if cursor.take_byte()? != 0x30 {
        return None;
    }
    if cursor.take_byte()? as usize != cursor.remaining() {
        return None;
    }
    let r = take_der_integer(&mut cursor)?;
    let s = take_der_integer(&mut cursor)?;
    if cursor.remaining() != 0 {
        return None;
    }
    Some((r, s))
}

/// Validates a signature payload that carries no trailing hash type byte.
///
/// An empty signature is always valid: it is the compact way to push an
/// invalid signature for CHECK(MULTI)SIG. With none of DERSIG, LOW_S, or
/// STRICTENC set, any non-empty blob is accepted without structural checks;
/// that permissive branch is historical consensus behavior, not a bug.
///
/// # Errors
/// [`ScriptError::SigDer`] for any structural violation under a strictness
/// flag, [`ScriptError::SigHighS`] when the signature parses but its S value
/// exceeds half the curve order and LOW_S is active.
pub fn check_data_signature_encoding(sig: &[u8], flags: u32) -> Result<(), ScriptError> {
    if sig.is_empty() {
        return Ok(());
    }
    if flags & (SCRIPT_VERIFY_DERSIG | SCRIPT_VERIFY_LOW_S | SCRIPT_VERIFY_STRICTENC) == 0 {
        return Ok(());
    }
    let (_, s) = parse_der_signature(sig).ok_or(ScriptError::SigDer)?;
    if flags & SCRIPT_VERIFY_LOW_S != 0
        && BigUint::from_bytes_be(s) > BigUint::from_bytes_be(&HALF_ORDER)
    {
        return Err(ScriptError::SigHighS);
    }
    Ok(())
}

/// Validates a full signature: payload plus one trailing hash type byte.
///
/// Empty input is valid. Otherwise the final byte is split off as the hash
/// type and the remainder goes through [`check_data_signature_encoding`]
/// under the same flags. Under STRICTENC the hash type must additionally be
/// defined (base ALL/NONE/SINGLE, no reserved bit). Whether the fork-id bit
/// agrees with the active fork policy is deliberately not checked here; that
/// cross-check belongs to the script-verification caller, which knows which
/// fork rules are live.
///
/// # Errors
/// Propagates [`check_data_signature_encoding`] errors, plus
/// [`ScriptError::SigHashType`] for an undefined hash type under STRICTENC.
pub fn check_signature_encoding(sig: &[u8], flags: u32) -> Result<(), ScriptError> {
    if sig.is_empty() {
        return Ok(());
    }
    let (payload, hash_type) = sig.split_at(sig.len() - 1);
    check_data_signature_encoding(payload, flags)?;
    if flags & SCRIPT_VERIFY_STRICTENC != 0 && !SigHashType::from_byte(hash_type[0]).is_defined() {
        return Err(ScriptError::SigHashType);
    }
    Ok(())
}

fn is_compressed_pubkey(key: &[u8]) -> bool {
    key.len() == 33 && (key[0] == 0x02 || key[0] == 0x03)
}

fn is_compressed_or_uncompressed_pubkey(key: &[u8]) -> bool {
    is_compressed_pubkey(key) || (key.len() == 65 && key[0] == 0x04)
}

/// Validates a public key byte encoding against the policy flags.
///
/// Compressed keys (33 bytes, 0x02/0x03) always pass. Uncompressed keys
/// (65 bytes, 0x04) pass unless COMPRESSED_PUBKEYTYPE is set. Every other
/// shape is malformed and rejected under STRICTENC or COMPRESSED_PUBKEYTYPE;
/// with neither flag set even malformed keys are accepted (legacy behavior).
///
/// # Errors
/// [`ScriptError::PubKeyType`] for a malformed key under STRICTENC,
/// [`ScriptError::NonCompressedPubKey`] for anything non-compressed under
/// COMPRESSED_PUBKEYTYPE.
pub fn check_pubkey_encoding(key: &[u8], flags: u32) -> Result<(), ScriptError> {
    if flags & SCRIPT_VERIFY_STRICTENC != 0 && !is_compressed_or_uncompressed_pubkey(key) {
        return Err(ScriptError::PubKeyType);
    }
    if flags & SCRIPT_VERIFY_COMPRESSED_PUBKEYTYPE != 0 && !is_compressed_pubkey(key) {
        return Err(ScriptError::NonCompressedPubKey);
    }
    Ok(())
}
