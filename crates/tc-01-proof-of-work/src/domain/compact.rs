//! Compact target codec ("nBits").
//!
//! A compact value packs a 256-bit target as `size << 24 | mantissa`:
//!
//! - `size` (high byte) is the length of the target in bytes
//! - the low 23 bits are the mantissa, bit 23 is a sign bit
//!
//! so `target = mantissa * 256^(size - 3)`. Decoding reports the sign bit and
//! exponents too wide for 256 bits instead of silently fixing them up; the
//! caller decides whether such a target is usable.
//!
//! Consensus-critical: every node must decode every 32-bit input identically.

use super::arith::ArithU256;
use crate::error::{MalformedTarget, PowError};

const SIGN_BIT: u32 = 0x0080_0000;
const MANTISSA_MASK: u32 = 0x007f_ffff;

/// Result of decoding a compact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedCompact {
    /// Decoded magnitude. Meaningless when `overflow` is set.
    pub value: ArithU256,
    /// Sign bit was set on a non-zero mantissa.
    pub negative: bool,
    /// Exponent places the mantissa beyond 256 bits.
    pub overflow: bool,
}

impl DecodedCompact {
    /// The magnitude as a usable target.
    ///
    /// Negative, overflowing and zero targets can never be met by a hash and
    /// are rejected.
    pub fn target(&self) -> Result<ArithU256, PowError> {
        if self.negative {
            return Err(PowError::MalformedTarget(MalformedTarget::Negative));
        }
        if self.overflow {
            return Err(PowError::MalformedTarget(MalformedTarget::Overflow));
        }
        if self.value.is_zero() {
            return Err(PowError::MalformedTarget(MalformedTarget::Zero));
        }
        Ok(self.value)
    }
}

/// Decode a compact value.
pub fn decode_compact(bits: u32) -> DecodedCompact {
    let size = bits >> 24;
    let mut word = bits & MANTISSA_MASK;

    let value = if size <= 3 {
        word >>= 8 * (3 - size);
        ArithU256::from_u64(u64::from(word))
    } else {
        ArithU256::from_u64(u64::from(word)) << (8 * (size - 3))
    };

    let negative = word != 0 && bits & SIGN_BIT != 0;
    let overflow = word != 0
        && (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32));

    DecodedCompact {
        value,
        negative,
        overflow,
    }
}

/// Encode a magnitude in its minimal compact form.
///
/// Low-order bits that do not fit the 23-bit mantissa are truncated.
pub fn encode_compact(value: ArithU256) -> u32 {
    let mut size = (value.bits() + 7) / 8;
    let mut compact = if size <= 3 {
        (value.low_u64() << (8 * (3 - size))) as u32
    } else {
        (value >> (8 * (size - 3))).low_u32()
    };

    // The mantissa is signed; move a set top bit into the next byte.
    if compact & SIGN_BIT != 0 {
        compact >>= 8;
        size += 1;
    }

    compact | (size << 24)
}

/// Decode `bits` straight to a usable target.
pub fn target_from_compact(bits: u32) -> Result<ArithU256, PowError> {
    decode_compact(bits).target()
}
