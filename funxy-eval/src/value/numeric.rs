//! Arbitrary-precision integer and rational arithmetic. Rationals are always stored reduced with a positive
//! denominator.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RationalValue {
    pub num: Arc<BigInt>,
    pub den: Arc<BigInt>,
}

impl RationalValue {
    /// Construct a reduced rational from a numerator/denominator pair.
    /// Panics on a zero denominator; callers must check first (the
    /// evaluator turns that into `ErrorKind::DivisionByZero`).
    pub fn new(num: BigInt, den: BigInt) -> Self {
        assert!(!den.is_zero(), "rational with zero denominator");
        let (num, den) = if den.is_negative() {
            (-num, -den)
        } else {
            (num, den)
        };
        let g = num.gcd(&den);
        let g = if g.is_zero() { BigInt::from(1) } else { g };
        Self {
            num: Arc::new(&num / &g),
            den: Arc::new(&den / &g),
        }
    }

    pub fn from_bigint(n: BigInt) -> Self {
        Self {
            num: Arc::new(n),
            den: Arc::new(BigInt::from(1)),
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        Self::new(
            &*self.num * &*other.den + &*other.num * &*self.den,
            &*self.den * &*other.den,
        )
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self::new(
            &*self.num * &*other.den - &*other.num * &*self.den,
            &*self.den * &*other.den,
        )
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self::new(&*self.num * &*other.num, &*self.den * &*other.den)
    }

    pub fn div(&self, other: &Self) -> Option<Self> {
        if other.num.is_zero() {
            return None;
        }
        Some(Self::new(
            &*self.num * &*other.den,
            &*self.den * &*other.num,
        ))
    }

    pub fn to_f64(&self) -> f64 {
        // BigInt has no infallible f64 conversion; fall back through string
        // parsing of the decimal quotient at reasonable precision.
        let num = self.num.to_string().parse::<f64>().unwrap_or(f64::NAN);
        let den = self.den.to_string().parse::<f64>().unwrap_or(f64::NAN);
        num / den
    }

    /// Rationals print with 10 decimal digits by default.
    pub fn display_decimal(&self) -> String {
        format!("{:.10}", self.to_f64())
    }
}

impl std::fmt::Display for RationalValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_decimal())
    }
}

/// Numeric tower promotion order: arithmetic promotes across
/// Int -> BigInt -> Rational -> Float as needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NumericRank {
    Int,
    BigInt,
    Rational,
    Float,
}
