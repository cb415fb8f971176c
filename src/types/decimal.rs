//! # Fixed-Point Decimal
//!
//! `Decimal` stores a scaled integer: the value is `digits / 10^scale`. This is
//! the same `{digits, scale}` representation the value layer has always used
//! for DECIMAL, widened to carry the 31-digit zoned and packed fields.
//!
//! ## Semantics
//!
//! - Equality, ordering and hashing compare values, so `1.50 == 1.5`.
//! - `rescale` truncates toward zero when dropping digits (COBOL MOVE);
//!   `rescale_rounded` rounds half away from zero (COBOL ROUNDED).
//! - `truncate_digits` keeps the low-order digits of the scaled integer, which
//!   is what a MOVE into a narrower numeric field does.
//!
//! ## Text Form
//!
//! `parse` accepts an optional leading or trailing sign, digits and at most one
//! decimal point: `"123"`, `"-1.5"`, `"0012.30+"`, `".5"`.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::FieldValueError;

/// Largest power of ten an i128 can hold.
const MAX_POW10: u32 = 38;

#[derive(Debug, Clone, Copy, Default)]
pub struct Decimal {
    digits: i128,
    scale: u8,
}

fn pow10(exp: u32) -> Option<i128> {
    if exp > MAX_POW10 {
        return None;
    }
    10i128.checked_pow(exp)
}

impl Decimal {
    pub const ZERO: Decimal = Decimal {
        digits: 0,
        scale: 0,
    };

    pub const ONE: Decimal = Decimal {
        digits: 1,
        scale: 0,
    };

    pub const fn new(digits: i128, scale: u8) -> Self {
        Self { digits, scale }
    }

    /// Scaled integer value.
    pub fn digits(&self) -> i128 {
        self.digits
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    pub fn is_negative(&self) -> bool {
        self.digits < 0
    }

    pub fn is_zero(&self) -> bool {
        self.digits == 0
    }

    pub fn abs(self) -> Self {
        Self::new(self.digits.saturating_abs(), self.scale)
    }

    /// Changes the scale, truncating toward zero when digits are dropped.
    /// Returns `None` if the widened value overflows.
    pub fn rescale(self, scale: u8) -> Option<Decimal> {
        match scale.cmp(&self.scale) {
            Ordering::Equal => Some(self),
            Ordering::Greater => {
                let factor = pow10((scale - self.scale) as u32)?;
                Some(Self::new(self.digits.checked_mul(factor)?, scale))
            }
            Ordering::Less => {
                let digits = match pow10((self.scale - scale) as u32) {
                    Some(divisor) => self.digits / divisor,
                    None => 0,
                };
                Some(Self::new(digits, scale))
            }
        }
    }

    /// Changes the scale, rounding half away from zero when digits are dropped.
    pub fn rescale_rounded(self, scale: u8) -> Option<Decimal> {
        if scale >= self.scale {
            return self.rescale(scale);
        }
        let Some(divisor) = pow10((self.scale - scale) as u32) else {
            return Some(Self::new(0, scale));
        };
        let mut quotient = self.digits / divisor;
        let remainder = self.digits % divisor;
        if remainder.unsigned_abs() * 2 >= divisor.unsigned_abs() {
            quotient += self.digits.signum();
        }
        Some(Self::new(quotient, scale))
    }

    /// Keeps only the `max_digits` low-order digits of the scaled integer.
    pub fn truncate_digits(self, max_digits: usize) -> Self {
        match pow10(max_digits as u32) {
            Some(modulus) => Self::new(self.digits % modulus, self.scale),
            None => self,
        }
    }

    /// Number of decimal digits in the scaled integer (zero has one digit).
    pub fn digit_count(&self) -> usize {
        let mut magnitude = self.digits.unsigned_abs();
        let mut count = 1;
        while magnitude >= 10 {
            magnitude /= 10;
            count += 1;
        }
        count
    }

    /// Integer part, truncated toward zero.
    pub fn trunc(&self) -> i128 {
        match pow10(self.scale as u32) {
            Some(divisor) => self.digits / divisor,
            None => 0,
        }
    }

    /// Keeps only the `max_digits` low-order digits of the integer part,
    /// leaving the fraction and scale as they are.
    pub fn truncate_integer_digits(self, max_digits: usize) -> Self {
        match pow10((max_digits as u32).saturating_add(self.scale as u32)) {
            Some(modulus) => Self::new(self.digits % modulus, self.scale),
            None => self,
        }
    }

    /// Integer part as i64, or `None` if it does not fit.
    pub fn to_i64(&self) -> Option<i64> {
        i64::try_from(self.trunc()).ok()
    }

    pub fn to_f64(&self) -> f64 {
        self.digits as f64 / 10f64.powi(self.scale as i32)
    }

    /// Converts a float, rounding half away from zero at `scale`.
    pub fn from_f64(value: f64, scale: u8) -> Option<Decimal> {
        if !value.is_finite() {
            return None;
        }
        let scaled = (value * 10f64.powi(scale as i32)).round();
        if scaled.abs() >= 1e38 {
            return None;
        }
        Some(Self::new(scaled as i128, scale))
    }

    /// Parses `[+-]digits[.digits][+-]`, surrounding spaces allowed.
    pub fn parse(text: &str) -> Option<Decimal> {
        let text = text.trim();
        let (negative, body) = match (text.strip_prefix(['+', '-']), text.strip_suffix(['+', '-'])) {
            (Some(rest), _) => (text.starts_with('-'), rest),
            (None, Some(rest)) => (text.ends_with('-'), rest),
            (None, None) => (false, text),
        };

        let mut digits: i128 = 0;
        let mut scale: u8 = 0;
        let mut seen_digit = false;
        let mut seen_point = false;

        for ch in body.chars() {
            match ch {
                '0'..='9' => {
                    digits = digits
                        .checked_mul(10)?
                        .checked_add((ch as u8 - b'0') as i128)?;
                    seen_digit = true;
                    if seen_point {
                        scale = scale.checked_add(1)?;
                    }
                }
                '.' if !seen_point => seen_point = true,
                _ => return None,
            }
        }

        if !seen_digit {
            return None;
        }
        Some(Self::new(if negative { -digits } else { digits }, scale))
    }

    /// Drops trailing fractional zeros.
    pub fn normalized(self) -> Self {
        let mut out = self;
        while out.scale > 0 && out.digits % 10 == 0 {
            out.digits /= 10;
            out.scale -= 1;
        }
        out
    }

    fn cmp_value(&self, other: &Decimal) -> Ordering {
        let scale = self.scale.max(other.scale);
        match (self.rescale(scale), other.rescale(scale)) {
            (Some(a), Some(b)) => a.digits.cmp(&b.digits),
            _ => self
                .to_f64()
                .partial_cmp(&other.to_f64())
                .unwrap_or(Ordering::Equal),
        }
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_value(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_value(other)
    }
}

impl Hash for Decimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let normalized = self.normalized();
        normalized.digits.hash(state);
        normalized.scale.hash(state);
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.digits < 0 { "-" } else { "" };
        let magnitude = self.digits.unsigned_abs().to_string();
        if self.scale == 0 {
            return write!(f, "{}{}", sign, magnitude);
        }
        let scale = self.scale as usize;
        let padded = format!("{:0>width$}", magnitude, width = scale + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{}{}.{}", sign, int_part, frac_part)
    }
}

impl FromStr for Decimal {
    type Err = FieldValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::parse(s).ok_or_else(|| FieldValueError::NotNumeric {
            text: s.to_string(),
        })
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self::new(value as i128, 0)
    }
}

impl From<i32> for Decimal {
    fn from(value: i32) -> Self {
        Self::new(value as i128, 0)
    }
}

impl From<u32> for Decimal {
    fn from(value: u32) -> Self {
        Self::new(value as i128, 0)
    }
}

impl From<i16> for Decimal {
    fn from(value: i16) -> Self {
        Self::new(value as i128, 0)
    }
}
