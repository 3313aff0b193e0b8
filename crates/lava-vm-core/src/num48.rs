//! 48-bit fixed-point numbers
//!
//! A `Num48` holds three digits in base [`K`](Num48::K): `c0 * K² + c1 * K + c2`.
//! Ints keep the last digit at zero; floats use it for the fraction, which gives
//! a precision of about 1/64000. Negative values are complemented against
//! [`FULL`](Num48::FULL), and anything at or above
//! [`NEG_POINT`](Num48::NEG_POINT) reads as `raw - FULL`.
//!
//! The valid int range is `-2_047_999_999..=2_047_999_999` (`32000 * K - 1`).
//! Nothing here checks it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A packed 48-bit fixed-point value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Num48(u64);

impl Num48 {
    /// Digit base
    pub const K: u64 = 64_000;
    /// Ring size, `K³`
    pub const FULL: u64 = Self::K * Self::K * Self::K;
    /// First raw value that denotes a negative number
    pub const NEG_POINT: u64 = 32_000 * Self::K * Self::K;
    /// Largest int that survives a round trip
    pub const MAX_INT: i32 = 2_047_999_999;
    /// Smallest int that survives a round trip
    pub const MIN_INT: i32 = -2_047_999_999;
    /// Zero
    pub const ZERO: Self = Self(0);

    /// Wrap a raw packed value
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw packed value
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Encode an int. The fractional digit stays zero.
    pub fn from_int(value: i32) -> Self {
        let scaled = i64::from(value) * Self::K as i64;
        Self(scaled.rem_euclid(Self::FULL as i64) as u64)
    }

    /// Encode a float, truncated to 1/64000
    pub fn from_float(value: f32) -> Self {
        // `as` saturates and maps NaN to zero
        let scaled = (f64::from(value) * Self::K as f64) as i64;
        Self(scaled.rem_euclid(Self::FULL as i64) as u64)
    }

    /// Build from raw digits. Each digit must be below `K`.
    pub fn from_chars(c0: u16, c1: u16, c2: u16) -> Self {
        Self(u64::from(c0) * Self::K * Self::K + u64::from(c1) * Self::K + u64::from(c2))
    }

    /// Decode to an int, dropping the fraction (truncates toward zero)
    pub fn to_int(self) -> i32 {
        (self.signed() / Self::K as i64) as i32
    }

    /// Decode to a float
    pub fn to_float(self) -> f32 {
        (self.signed() as f64 / Self::K as f64) as f32
    }

    /// Split into the three base-`K` digits, most significant first
    pub fn to_chars(self) -> (u16, u16, u16) {
        let mut v = self.0;
        let c2 = (v % Self::K) as u16;
        v /= Self::K;
        let c1 = (v % Self::K) as u16;
        v /= Self::K;
        (v as u16, c1, c2)
    }

    /// Whether the value denotes a negative number
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 >= Self::NEG_POINT
    }

    /// Magnitude of the value and whether it was negative
    pub fn magnitude_and_sign(self) -> (u64, bool) {
        if self.is_negative() {
            (Self::FULL - self.0, true)
        } else {
            (self.0, false)
        }
    }

    /// Fixed-point ("float") division. Keeps one fractional digit of the remainder.
    ///
    /// Dividing by zero logs an error and returns the zero divisor.
    pub fn fdiv(self, divisor: Self) -> Self {
        if divisor.0 == 0 {
            tracing::error!(target: "lava::num", dividend = self.0, "fdiv: division by zero");
            return divisor;
        }
        let (a, a_neg) = self.magnitude_and_sign();
        let (b, b_neg) = divisor.magnitude_and_sign();
        let (a, b, k) = (u128::from(a), u128::from(b), u128::from(Self::K));

        let quotient = a / b;
        let fraction = (a % b) * k / b;
        let result = Self::reduce(quotient * k + fraction);
        result.with_sign(a_neg != b_neg)
    }

    /// Integer division. The remainder is discarded entirely.
    ///
    /// Dividing by zero logs an error and returns the zero divisor.
    pub fn idiv(self, divisor: Self) -> Self {
        if divisor.0 == 0 {
            tracing::error!(target: "lava::num", dividend = self.0, "idiv: division by zero");
            return divisor;
        }
        let (a, a_neg) = self.magnitude_and_sign();
        let (b, b_neg) = divisor.magnitude_and_sign();

        let result = Self::reduce(u128::from(a / b) * u128::from(Self::K));
        result.with_sign(a_neg != b_neg)
    }

    /// Plain modulo of the raw values.
    ///
    /// Unlike every other operation the result is not scaled by `K`.
    pub fn irem(self, divisor: Self) -> Self {
        if divisor.0 == 0 {
            tracing::error!(target: "lava::num", dividend = self.0, "irem: division by zero");
            return divisor;
        }
        Self(self.0 % divisor.0)
    }

    /// Complement a magnitude back into a negative value when `negative` is set
    fn with_sign(self, negative: bool) -> Self {
        if negative {
            Self((Self::FULL - self.0) % Self::FULL)
        } else {
            self
        }
    }

    fn reduce(wide: u128) -> Self {
        Self((wide % u128::from(Self::FULL)) as u64)
    }

    fn signed(self) -> i64 {
        if self.is_negative() {
            self.0 as i64 - Self::FULL as i64
        } else {
            self.0 as i64
        }
    }
}

impl Add for Num48 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self((self.0 + rhs.0) % Self::FULL)
    }
}

impl Sub for Num48 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self((self.0 + Self::FULL - rhs.0 % Self::FULL) % Self::FULL)
    }
}

impl Neg for Num48 {
    type Output = Self;

    fn neg(self) -> Self {
        let (magnitude, negative) = self.magnitude_and_sign();
        if negative {
            Self(magnitude)
        } else {
            Self(magnitude).with_sign(true)
        }
    }
}

impl Mul for Num48 {
    type Output = Self;

    /// Both operands carry one fractional digit, so the product is rescaled by `K`.
    fn mul(self, rhs: Self) -> Self {
        let (a, a_neg) = self.magnitude_and_sign();
        let (b, b_neg) = rhs.magnitude_and_sign();

        let product = u128::from(a) * u128::from(b) / u128::from(Self::K);
        Self::reduce(product).with_sign(a_neg != b_neg)
    }
}

impl From<i32> for Num48 {
    fn from(value: i32) -> Self {
        Self::from_int(value)
    }
}

impl From<f32> for Num48 {
    fn from(value: f32) -> Self {
        Self::from_float(value)
    }
}

impl fmt::Display for Num48 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (_, _, fraction) = self.to_chars();
        if fraction == 0 {
            write!(f, "{}", self.to_int())
        } else {
            write!(f, "{}", self.to_float())
        }
    }
}
