//! Reconstruction step of Shamir's Secret Sharing over the integers.
//!
//! Shares are points `(x, y)` on an integer-coefficient polynomial of degree
//! `k - 1`; the secret is the polynomial's value at `x = 0`. Share values are
//! supplied as digit strings in bases 2 through 16 and may be arbitrarily
//! large. Interpolation is exact: every Lagrange term is kept as a rational
//! number and the secret is only accepted if the sum is an integer.
//! Based on Adi Shamir's paper "How to Share a Secret" (Communications of the ACM, 1979).

use num_bigint::{BigInt, BigUint};
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

pub mod batch;
pub mod collect;
pub mod config;
pub mod fraction;
pub mod radix;

use fraction::Fraction;

/// These are errors that can occur while decoding shares or recovering a secret
#[derive(Error, Debug)]
pub enum SssError {
    #[error("invalid character {character:?} for base {base}")]
    InvalidDigit { character: char, base: u32 },

    #[error("digit {digit} is out of range for base {base}")]
    DigitOutOfRange { digit: u32, base: u32 },

    #[error("unsupported base {0}, expected 2 to 16")]
    UnsupportedBase(u32),

    #[error("threshold k must be at least 1")]
    InvalidThreshold,

    #[error("not enough shares to reconstruct secret (need {threshold}, got {share_count})")]
    InsufficientShares {
        /// Required number of shares (k)
        threshold: usize,
        /// Actual number of shares provided
        share_count: usize,
    },

    /// Two shares claim the same x-coordinate
    #[error("duplicate x-coordinate {0}")]
    DuplicateXCoordinate(u64),

    /// The interpolated value at zero is not an integer, so the shares do
    /// not lie on a common integer polynomial
    #[error("shares are inconsistent: interpolated secret is {0}, not an integer")]
    NonIntegerResult(Fraction),

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A single share of a split secret, representing a point on the polynomial
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Share {
    /// The x-coordinate of the polynomial point (share index, never zero)
    pub x: u64,
    /// The y-coordinate of the polynomial point (share value)
    pub y: BigUint,
}

impl Share {
    pub fn new(x: u64, y: impl Into<BigUint>) -> Self {
        Share { x, y: y.into() }
    }

    /// Builds a share whose value is written in `base`.
    ///
    /// # Example
    /// ```
    /// use shamir_recover::Share;
    ///
    /// let share = Share::from_digits(6, 4, "213").unwrap();
    /// assert_eq!(share, Share::new(6, 39u32));
    /// ```
    pub fn from_digits(x: u64, base: u32, digits: &str) -> Result<Self, SssError> {
        Ok(Share {
            x,
            y: radix::decode(digits, base)?,
        })
    }
}

/// What to do when fewer shares than the threshold are available.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Shortfall {
    /// Fail with [`SssError::InsufficientShares`].
    #[default]
    Reject,
    /// Interpolate over the shares that exist and mark the result as
    /// non-authoritative.
    BestEffort,
}

/// The outcome of a reconstruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recovery {
    /// The polynomial's value at x = 0
    pub secret: BigInt,
    /// How many shares went into the interpolation
    pub used: usize,
    /// The threshold the shares were checked against
    pub threshold: usize,
    /// False when fewer than `threshold` shares were interpolated; such a
    /// value need not equal the real secret
    pub authoritative: bool,
}

/// A threshold together with the shares collected for it.
///
/// Shares are kept in ascending x order, which is the order used when more
/// than `threshold` shares are available.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareSet {
    threshold: usize,
    shares: Vec<Share>,
}

impl ShareSet {
    /// # Returns
    /// * `Ok(ShareSet)` - If every x is non-zero and unique
    /// * `Err(SssError::InvalidThreshold)` - If threshold is 0
    /// * `Err(SssError::MalformedInput)` - If a share has x = 0
    /// * `Err(SssError::DuplicateXCoordinate)` - If two shares have the same x
    pub fn new(threshold: usize, mut shares: Vec<Share>) -> Result<Self, SssError> {
        if threshold == 0 {
            return Err(SssError::InvalidThreshold);
        }
        if shares.iter().any(|share| share.x == 0) {
            return Err(SssError::MalformedInput(
                "share x-coordinate must be positive".into(),
            ));
        }
        check_unique(&shares)?;

        shares.sort_by_key(|share| share.x);
        Ok(ShareSet { threshold, shares })
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn shares(&self) -> &[Share] {
        &self.shares
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Recovers the secret from this set.
    pub fn reconstruct(&self, shortfall: Shortfall) -> Result<Recovery, SssError> {
        Scheme::new(self.threshold)?
            .with_shortfall(shortfall)
            .reconstruct_secret(&self.shares)
    }
}

/// Reconstructs secrets for a fixed threshold using exact Lagrange interpolation
#[derive(Debug, Clone)]
pub struct Scheme {
    /// Minimum number of shares needed to reconstruct (k)
    threshold: usize,
    shortfall: Shortfall,
}

impl Scheme {
    /// Creates a scheme that needs `threshold` shares.
    ///
    /// # Returns
    /// * `Ok(Scheme)` - If threshold is at least 1
    /// * `Err(SssError::InvalidThreshold)` - If threshold is 0
    pub fn new(threshold: usize) -> Result<Self, SssError> {
        if threshold == 0 {
            return Err(SssError::InvalidThreshold);
        }

        Ok(Scheme {
            threshold,
            shortfall: Shortfall::default(),
        })
    }

    pub fn with_shortfall(mut self, shortfall: Shortfall) -> Self {
        self.shortfall = shortfall;
        self
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Reconstructs a secret from k or more shares using Lagrange interpolation.
    ///
    /// When more than k shares are given, the k with the smallest x are used.
    ///
    /// # Returns
    /// * `Ok(Recovery)` - The reconstructed secret
    /// * `Err(SssError::InsufficientShares)` - If fewer than k shares are provided
    ///   and the scheme rejects shortfalls
    /// * `Err(SssError::DuplicateXCoordinate)` - If shares contain duplicate x values
    /// * `Err(SssError::NonIntegerResult)` - If the shares do not agree on an
    ///   integer secret
    ///
    /// # Example
    /// ```
    /// use num_bigint::BigInt;
    /// use shamir_recover::{Scheme, Share};
    ///
    /// // f(x) = 3x^2 + 2x + 7
    /// let shares = [Share::new(1, 12u32), Share::new(2, 23u32), Share::new(4, 63u32)];
    /// let recovery = Scheme::new(3).unwrap().reconstruct_secret(&shares).unwrap();
    /// assert_eq!(recovery.secret, BigInt::from(7));
    /// ```
    pub fn reconstruct_secret(&self, shares: &[Share]) -> Result<Recovery, SssError> {
        let (selected, authoritative) = self.select(shares)?;

        let secret = lagrange_at(&selected, &BigInt::from(0))?
            .into_integer()
            .map_err(SssError::NonIntegerResult)?;

        debug!(
            threshold = self.threshold,
            used = selected.len(),
            authoritative,
            "reconstructed secret"
        );

        Ok(Recovery {
            secret,
            used: selected.len(),
            threshold: self.threshold,
            authoritative,
        })
    }

    /// Evaluates the polynomial through the selected shares at an arbitrary `x`.
    ///
    /// The same selection and shortfall rules as [`Scheme::reconstruct_secret`]
    /// apply; the result is returned as an exact fraction.
    pub fn interpolate_at(&self, shares: &[Share], x: i64) -> Result<Fraction, SssError> {
        let (selected, _) = self.select(shares)?;
        lagrange_at(&selected, &BigInt::from(x))
    }

    /// Picks the shares to interpolate: the `threshold` smallest x values, or
    /// all of them under [`Shortfall::BestEffort`]. The flag is false when
    /// fewer than `threshold` shares were available.
    fn select<'a>(&self, shares: &'a [Share]) -> Result<(Vec<&'a Share>, bool), SssError> {
        check_unique(shares)?;

        let authoritative = shares.len() >= self.threshold;
        if shares.is_empty() || (!authoritative && self.shortfall == Shortfall::Reject) {
            return Err(SssError::InsufficientShares {
                threshold: self.threshold,
                share_count: shares.len(),
            });
        }

        let mut selected: Vec<&Share> = shares.iter().collect();
        selected.sort_by_key(|share| share.x);
        selected.truncate(self.threshold);

        Ok((selected, authoritative))
    }
}

/// Sums the Lagrange terms y_i * ∏(j≠i) (x - x_j)/(x_i - x_j).
///
/// Each term's numerator and denominator are multiplied out in full before
/// they become a [`Fraction`], and the terms are added as fractions. A zero
/// denominator means two shares share an x-coordinate.
fn lagrange_at(shares: &[&Share], x: &BigInt) -> Result<Fraction, SssError> {
    let xs: Vec<BigInt> = shares.iter().map(|share| BigInt::from(share.x)).collect();

    shares
        .iter()
        .enumerate()
        .map(|(i, share)| {
            let mut numerator = BigInt::from(share.y.clone());
            let mut denominator = BigInt::from(1);

            for (j, x_j) in xs.iter().enumerate() {
                if i != j {
                    numerator *= x - x_j;
                    denominator *= &xs[i] - x_j;
                }
            }

            Fraction::new(numerator, denominator)
                .ok_or(SssError::DuplicateXCoordinate(share.x))
        })
        .sum()
}

fn check_unique(shares: &[Share]) -> Result<(), SssError> {
    let mut seen = HashSet::new();
    for share in shares {
        if !seen.insert(share.x) {
            return Err(SssError::DuplicateXCoordinate(share.x));
        }
    }
    Ok(())
}
