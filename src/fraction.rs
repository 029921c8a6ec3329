//! Exact rational numbers over [`BigInt`].
//!
//! Lagrange terms are generally not integers even when their sum is, so
//! interpolation carries every term as a reduced fraction and only converts
//! to an integer once the whole sum is known.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::fmt;
use std::ops::{Add, Mul, Neg};

/// A reduced fraction `numer / denom` with `denom > 0`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fraction {
    numer: BigInt,
    denom: BigInt,
}

impl Fraction {
    /// Builds the reduced form of `numer / denom`, or `None` if `denom` is zero.
    pub fn new(numer: BigInt, denom: BigInt) -> Option<Self> {
        if denom.is_zero() {
            return None;
        }
        Some(Self::reduce(numer, denom))
    }

    pub fn from_integer(value: BigInt) -> Self {
        Fraction {
            numer: value,
            denom: BigInt::one(),
        }
    }

    pub fn zero() -> Self {
        Self::from_integer(BigInt::zero())
    }

    pub fn numer(&self) -> &BigInt {
        &self.numer
    }

    pub fn denom(&self) -> &BigInt {
        &self.denom
    }

    pub fn is_integer(&self) -> bool {
        self.denom.is_one()
    }

    /// Converts to an integer if the fraction is exactly integral, otherwise
    /// hands the fraction back unchanged.
    pub fn into_integer(self) -> Result<BigInt, Fraction> {
        if self.is_integer() {
            Ok(self.numer)
        } else {
            Err(self)
        }
    }

    fn reduce(numer: BigInt, denom: BigInt) -> Self {
        let gcd = numer.gcd(&denom);
        let (mut numer, mut denom) = if gcd.is_zero() || gcd.is_one() {
            (numer, denom)
        } else {
            (numer / &gcd, denom / &gcd)
        };
        if denom.is_negative() {
            numer = -numer;
            denom = -denom;
        }
        Fraction { numer, denom }
    }
}

impl Add for Fraction {
    type Output = Fraction;

    fn add(self, rhs: Fraction) -> Fraction {
        if self.denom == rhs.denom {
            return Self::reduce(self.numer + rhs.numer, self.denom);
        }
        let numer = self.numer * &rhs.denom + rhs.numer * &self.denom;
        Self::reduce(numer, self.denom * rhs.denom)
    }
}

impl Mul for Fraction {
    type Output = Fraction;

    fn mul(self, rhs: Fraction) -> Fraction {
        Self::reduce(self.numer * rhs.numer, self.denom * rhs.denom)
    }
}

impl Neg for Fraction {
    type Output = Fraction;

    fn neg(self) -> Fraction {
        Fraction {
            numer: -self.numer,
            denom: self.denom,
        }
    }
}

impl std::iter::Sum for Fraction {
    fn sum<I: Iterator<Item = Fraction>>(iter: I) -> Self {
        iter.fold(Fraction::zero(), |acc, term| acc + term)
    }
}

impl From<BigInt> for Fraction {
    fn from(value: BigInt) -> Self {
        Fraction::from_integer(value)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}
