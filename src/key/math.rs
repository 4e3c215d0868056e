//! secp256k1 scalar and field arithmetic helpers for the manual signature
//! equations. Point multiplication stays in the `secp256k1` crate; only the
//! mod-n bookkeeping around it lives here.

use num_bigint::BigUint;
use num_traits::One;

/// Group order n of secp256k1.
const ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xfe, 0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36,
    0x41, 0x41,
];

/// Field prime p of secp256k1.
const FIELD_PRIME: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe, 0xff, 0xff,
    0xfc, 0x2f,
];

/// The group order as a big integer.
pub(crate) fn order() -> BigUint {
    BigUint::from_bytes_be(&ORDER)
}

/// Half the group order, the low-S boundary.
pub(crate) fn half_order() -> BigUint {
    order() >> 1
}

/// The field prime as a big integer.
pub(crate) fn field_prime() -> BigUint {
    BigUint::from_bytes_be(&FIELD_PRIME)
}

/// Serializes a value below 2^256 as 32 big-endian bytes, zero padded.
pub(crate) fn be32(value: &BigUint) -> [u8; 32] {
    let bytes = value.to_bytes_be();
    debug_assert!(bytes.len() <= 32);
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// Modular inverse of a nonzero scalar mod the group order.
///
/// n is prime, so Fermat's little theorem applies.
pub(crate) fn invert_mod_order(value: &BigUint) -> BigUint {
    let n = order();
    value.modpow(&(&n - 2u32), &n)
}

/// Whether a field element is a quadratic residue mod p (Euler's criterion).
///
/// Zero is not a residue here, which is the convention the Schnorr scheme
/// needs; y = 0 cannot occur on the curve anyway.
pub(crate) fn is_quad_residue(value: &BigUint) -> bool {
    let p = field_prime();
    value.modpow(&((&p - 1u32) >> 1), &p) == BigUint::one()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn half_order_matches_known_value() {
        assert_eq!(
            hex::encode(be32(&half_order())),
            "7fffffffffffffffffffffffffffffff5d576e7357a4501ddfe92f46681b20a0"
        );
    }

    #[test]
    fn be32_pads_short_values() {
        let one = BigUint::one();
        let bytes = be32(&one);
        assert_eq!(bytes[31], 1);
        assert!(bytes[..31].iter().all(|&b| b == 0));
    }

    #[test]
    fn invert_round_trip() {
        let n = order();
        let x = BigUint::from(123456789u64);
        let inv = invert_mod_order(&x);
        assert_eq!((x * inv) % n, BigUint::one());
    }

    #[test]
    fn quad_residue_samples() {
        // 4 = 2^2 is a residue; p - 1 is a non-residue for p = 3 mod 4.
        assert!(is_quad_residue(&BigUint::from(4u32)));
        assert!(!is_quad_residue(&(field_prime() - 1u32)));
    }
}
