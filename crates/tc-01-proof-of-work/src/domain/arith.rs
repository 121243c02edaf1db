//! 256-bit unsigned arithmetic for targets and chain work.
//!
//! [`ArithU256`] wraps `primitive_types::U256` (four little-endian `u64`
//! words) and fixes the overflow behaviour of every operator:
//!
//! - `+`, `-`, `*` wrap modulo 2^256 (U256 itself panics on overflow)
//! - `/`, `%` panic on a zero divisor like native integers; use
//!   [`ArithU256::checked_div`] when the divisor may be zero
//! - `<<`, `>>` by 256 or more yield zero
//!
//! Consensus code must never depend on a value wider than 256 bits, so there
//! is deliberately no widening multiply here.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use shared_types::Hash;
use std::fmt;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Not, Rem, Shl, ShlAssign, Shr, ShrAssign, Sub,
    SubAssign,
};

/// Bit width of [`ArithU256`].
pub const WIDTH_BITS: u32 = 256;

/// Fixed-width 256-bit unsigned integer with wrapping arithmetic.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArithU256(U256);

impl ArithU256 {
    /// Zero.
    pub const ZERO: Self = Self(U256([0; 4]));
    /// One.
    pub const ONE: Self = Self(U256([1, 0, 0, 0]));
    /// 2^256 - 1.
    pub const MAX: Self = Self(U256([u64::MAX; 4]));

    /// Widen a `u64`.
    pub const fn from_u64(value: u64) -> Self {
        Self(U256([value, 0, 0, 0]))
    }

    /// Interpret 32 big-endian bytes.
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(U256::from_big_endian(&bytes))
    }

    /// Interpret 32 little-endian bytes.
    pub fn from_le_bytes(bytes: [u8; 32]) -> Self {
        Self(U256::from_little_endian(&bytes))
    }

    /// Read a block hash as a number.
    ///
    /// Block hashes are stored in internal byte order, least significant
    /// byte first, which is how proof-of-work compares them.
    pub fn from_hash(hash: &Hash) -> Self {
        Self::from_le_bytes(*hash)
    }

    /// Big-endian byte representation.
    pub fn to_be_bytes(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        self.0.to_big_endian(&mut out);
        out
    }

    /// Inner `U256`.
    pub fn into_inner(self) -> U256 {
        self.0
    }

    /// True if zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Position of the highest set bit plus one, zero for zero.
    pub fn bits(&self) -> u32 {
        self.0.bits() as u32
    }

    /// Lowest 64 bits.
    pub fn low_u64(&self) -> u64 {
        self.0.low_u64()
    }

    /// Lowest 32 bits.
    pub fn low_u32(&self) -> u32 {
        self.0.low_u32()
    }

    /// Addition modulo 2^256.
    pub fn wrapping_add(self, rhs: Self) -> Self {
        Self(self.0.overflowing_add(rhs.0).0)
    }

    /// Subtraction modulo 2^256.
    pub fn wrapping_sub(self, rhs: Self) -> Self {
        Self(self.0.overflowing_sub(rhs.0).0)
    }

    /// Multiplication modulo 2^256.
    pub fn wrapping_mul(self, rhs: Self) -> Self {
        Self(self.0.overflowing_mul(rhs.0).0)
    }

    /// Multiplication that reports whether bits were lost.
    pub fn overflowing_mul(self, rhs: Self) -> (Self, bool) {
        let (value, overflow) = self.0.overflowing_mul(rhs.0);
        (Self(value), overflow)
    }

    /// Truncating division, `None` for a zero divisor.
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        self.0.checked_div(rhs.0).map(Self)
    }

    fn shift_left(self, shift: u32) -> Self {
        if shift >= WIDTH_BITS {
            Self::ZERO
        } else {
            Self(self.0 << shift)
        }
    }

    fn shift_right(self, shift: u32) -> Self {
        if shift >= WIDTH_BITS {
            Self::ZERO
        } else {
            Self(self.0 >> shift)
        }
    }
}

impl From<u64> for ArithU256 {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<U256> for ArithU256 {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl From<ArithU256> for U256 {
    fn from(value: ArithU256) -> Self {
        value.0
    }
}

impl fmt::Debug for ArithU256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArithU256({:#x})", self.0)
    }
}

impl fmt::Display for ArithU256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for ArithU256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl Add for ArithU256 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }
}

impl Sub for ArithU256 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.wrapping_sub(rhs)
    }
}

impl Mul for ArithU256 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.wrapping_mul(rhs)
    }
}

impl Mul<u64> for ArithU256 {
    type Output = Self;

    fn mul(self, rhs: u64) -> Self {
        self.wrapping_mul(Self::from_u64(rhs))
    }
}

impl Div for ArithU256 {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self(self.0 / rhs.0)
    }
}

impl Div<u64> for ArithU256 {
    type Output = Self;

    fn div(self, rhs: u64) -> Self {
        Self(self.0 / U256::from(rhs))
    }
}

impl Rem for ArithU256 {
    type Output = Self;

    fn rem(self, rhs: Self) -> Self {
        Self(self.0 % rhs.0)
    }
}

impl Not for ArithU256 {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl Shl<u32> for ArithU256 {
    type Output = Self;

    fn shl(self, shift: u32) -> Self {
        self.shift_left(shift)
    }
}

impl Shr<u32> for ArithU256 {
    type Output = Self;

    fn shr(self, shift: u32) -> Self {
        self.shift_right(shift)
    }
}

impl AddAssign for ArithU256 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for ArithU256 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<u64> for ArithU256 {
    fn mul_assign(&mut self, rhs: u64) {
        *self = *self * rhs;
    }
}

impl DivAssign<u64> for ArithU256 {
    fn div_assign(&mut self, rhs: u64) {
        *self = *self / rhs;
    }
}

impl ShlAssign<u32> for ArithU256 {
    fn shl_assign(&mut self, shift: u32) {
        *self = *self << shift;
    }
}

impl ShrAssign<u32> for ArithU256 {
    fn shr_assign(&mut self, shift: u32) {
        *self = *self >> shift;
    }
}
