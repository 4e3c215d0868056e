//! The signature hash type byte appended to transaction signatures.

/// Signs all outputs.
pub const SIGHASH_ALL: u8 = 0x01;
/// Signs no outputs (anyone can spend).
pub const SIGHASH_NONE: u8 = 0x02;
/// Signs only the matching output.
pub const SIGHASH_SINGLE: u8 = 0x03;
/// BCH/BSV fork flag (post-2017 replay protection).
pub const SIGHASH_FORKID: u8 = 0x40;
/// Anyone can add inputs.
pub const SIGHASH_ANYONECANPAY: u8 = 0x80;

const BASE_TYPE_MASK: u8 = !(SIGHASH_FORKID | SIGHASH_ANYONECANPAY);

/// Which outputs a signature commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseSigHashType {
    /// Any base pattern outside ALL/NONE/SINGLE, including reserved bits.
    Unsupported,
    /// Commit to all outputs.
    All,
    /// Commit to no outputs.
    None,
    /// Commit to the output at the input's index.
    Single,
}

impl BaseSigHashType {
    /// Low-bits value of this base type in the raw byte.
    #[must_use]
    #[inline]
    pub fn to_raw(self) -> u8 {
        match self {
            BaseSigHashType::Unsupported => 0,
            BaseSigHashType::All => SIGHASH_ALL,
            BaseSigHashType::None => SIGHASH_NONE,
            BaseSigHashType::Single => SIGHASH_SINGLE,
        }
    }
}

/// Signature hash type: base scope plus anyone-can-pay and fork-id flags.
///
/// Wraps the raw byte losslessly; every one of the 256 values round-trips
/// through [`from_byte`](Self::from_byte) / [`to_byte`](Self::to_byte).
/// Construction never fails; unrecognized bit patterns decode to an
/// [`BaseSigHashType::Unsupported`] base and only [`is_defined`](Self::is_defined)
/// judges validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigHashType(u8);

impl SigHashType {
    /// Decodes a raw hash type byte. Total: never fails.
    #[must_use]
    #[inline]
    pub fn from_byte(b: u8) -> SigHashType {
        SigHashType(b)
    }

    /// Encodes back to the raw byte. Exact inverse of [`from_byte`](Self::from_byte).
    #[must_use]
    #[inline]
    pub fn to_byte(self) -> u8 {
        self.0
    }

    /// The base signing scope.
    ///
    /// Only the fork-id and anyone-can-pay bits are masked out, so a set
    /// reserved bit (0x20) makes the base unsupported rather than being
    /// silently ignored.
    #[must_use]
    pub fn base_type(self) -> BaseSigHashType {
        match self.0 & BASE_TYPE_MASK {
            SIGHASH_ALL => BaseSigHashType::All,
            SIGHASH_NONE => BaseSigHashType::None,
            SIGHASH_SINGLE => BaseSigHashType::Single,
            _ => BaseSigHashType::Unsupported,
        }
    }

    /// Whether the anyone-can-pay bit is set.
    #[must_use]
    #[inline]
    pub fn has_anyone_can_pay(self) -> bool {
        self.0 & SIGHASH_ANYONECANPAY != 0
    }

    /// Whether the fork-id bit is set.
    #[must_use]
    #[inline]
    pub fn has_fork_id(self) -> bool {
        self.0 & SIGHASH_FORKID != 0
    }

    /// Returns a copy with the low five base bits replaced, other bits untouched.
    #[must_use]
    pub fn with_base_type(self, base: BaseSigHashType) -> SigHashType {
        SigHashType((self.0 & !0x1f) | base.to_raw())
    }

    /// Returns a copy with the anyone-can-pay bit set or cleared.
    #[must_use]
    pub fn with_anyone_can_pay(self, anyone_can_pay: bool) -> SigHashType {
        if anyone_can_pay {
            SigHashType(self.0 | SIGHASH_ANYONECANPAY)
        } else {
            SigHashType(self.0 & !SIGHASH_ANYONECANPAY)
        }
    }

    /// Returns a copy with the fork-id bit set or cleared.
    #[must_use]
    pub fn with_fork_id(self, fork_id: bool) -> SigHashType {
        if fork_id {
            SigHashType(self.0 | SIGHASH_FORKID)
        } else {
            SigHashType(self.0 & !SIGHASH_FORKID)
        }
    }

    /// Whether this hash type is acceptable under strict encoding rules.
    ///
    /// True iff the base is ALL, NONE, or SINGLE with no reserved bit set.
    #[must_use]
    pub fn is_defined(self) -> bool {
        !matches!(self.base_type(), BaseSigHashType::Unsupported)
    }
}

impl Default for SigHashType {
    fn default() -> SigHashType {
        SigHashType(SIGHASH_ALL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trip_all_bytes() {
        for b in 0..=255u8 {
            assert_eq!(SigHashType::from_byte(b).to_byte(), b);
        }
    }

    #[test]
    fn base_type_decode() {
        assert_eq!(SigHashType::from_byte(0x01).base_type(), BaseSigHashType::All);
        assert_eq!(SigHashType::from_byte(0x02).base_type(), BaseSigHashType::None);
        assert_eq!(SigHashType::from_byte(0x03).base_type(), BaseSigHashType::Single);
        assert_eq!(SigHashType::from_byte(0x00).base_type(), BaseSigHashType::Unsupported);
        assert_eq!(SigHashType::from_byte(0x04).base_type(), BaseSigHashType::Unsupported);
        // Reserved bit folds into the base rather than being masked away.
        assert_eq!(SigHashType::from_byte(0x21).base_type(), BaseSigHashType::Unsupported);
        // Fork-id and anyone-can-pay bits do not affect the base.
        assert_eq!(SigHashType::from_byte(0x41).base_type(), BaseSigHashType::All);
        assert_eq!(SigHashType::from_byte(0x81).base_type(), BaseSigHashType::All);
        assert_eq!(SigHashType::from_byte(0xc3).base_type(), BaseSigHashType::Single);
    }

    #[test]
    fn with_transforms_are_pure() {
        let t = SigHashType::from_byte(0x41);
        let u = t.with_anyone_can_pay(true);
        assert_eq!(t.to_byte(), 0x41);
        assert_eq!(u.to_byte(), 0xc1);
        assert!(u.has_anyone_can_pay());
        assert!(u.has_fork_id());
        assert_eq!(u.with_fork_id(false).to_byte(), 0x81);
        assert_eq!(u.with_base_type(BaseSigHashType::None).to_byte(), 0xc2);
    }

    #[test]
    fn with_base_type_keeps_high_bits() {
        let t = SigHashType::from_byte(0xe1);
        let u = t.with_base_type(BaseSigHashType::Single);
        assert_eq!(u.to_byte(), 0xe3);
        // The 0x20 bit survives the base replacement and keeps it undefined.
        assert!(!u.is_defined());
    }

    #[test]
    fn is_defined_table() {
        for b in 0..=255u8 {
            let expect = matches!(b & 0x3f, 0x01 | 0x02 | 0x03);
            assert_eq!(SigHashType::from_byte(b).is_defined(), expect, "byte {:#04x}", b);
        }
    }

    #[test]
    fn default_is_all() {
        assert_eq!(SigHashType::default().to_byte(), SIGHASH_ALL);
    }
}
