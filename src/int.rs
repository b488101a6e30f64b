//! The multi-precision integer type and its storage layer.
//!
//! An [`Int`] is a signed arbitrary-precision integer in sign-magnitude
//! form: a little-endian limb vector, a count of significant limbs, a
//! two-valued sign and a small mode bitset. The storage layer below keeps
//! the canonical-form invariants every other layer relies on:
//!
//! 1. `used == 0` implies `sign == NonNegative` (one representation of zero),
//! 2. `used > 0` implies `digit[used - 1] != 0`,
//! 3. every limb at or above `used` is zero,
//! 4. every limb is at most [`MASK`](crate::digit::MASK),
//! 5. an initialized buffer never shrinks below `MIN_DIGIT_COUNT`.

use std::sync::LazyLock;

use crate::digit::{Digit, DEFAULT_DIGIT_COUNT, MASK, MIN_DIGIT_COUNT};
use crate::error::{Error, Result};

pub(crate) mod addition;
pub(crate) mod bits;
pub(crate) mod cmp;
pub(crate) mod convert;
pub(crate) mod division;
pub(crate) mod gcd;
pub(crate) mod multiplication;
pub(crate) mod power;
pub(crate) mod rand;
pub(crate) mod roots;
pub(crate) mod shift;
pub(crate) mod subtraction;
mod zeroize;

/// Sign of an [`Int`].
///
/// Zero is always `NonNegative`; the storage layer normalizes this in
/// [`Int::clamp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    NonNegative,
    Negative,
}

impl Sign {
    /// The opposite sign.
    #[inline]
    pub fn negated(self) -> Sign {
        match self {
            Sign::NonNegative => Sign::Negative,
            Sign::Negative => Sign::NonNegative,
        }
    }
}

bitflags::bitflags! {
    /// Mode flags attached to an [`Int`].
    ///
    /// `INF`, `NEG_INF` and `NAN` mark the non-finite sentinels; handling
    /// of these modes is not yet uniform across the kernel, so every
    /// arithmetic entry point rejects them with
    /// [`Error::InvalidArgument`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags: u8 {
        /// The value may only be read, never assigned to.
        const IMMUTABLE = 0b0001;
        /// Positive infinity.
        const INF = 0b0010;
        /// Negative infinity.
        const NEG_INF = 0b0100;
        /// Not a number.
        const NAN = 0b1000;
    }
}

impl Flags {
    /// Flags that mark a non-finite value.
    pub const NON_FINITE: Flags = Flags::INF.union(Flags::NEG_INF).union(Flags::NAN);
}

/// A signed arbitrary-precision integer.
#[derive(Debug, Clone)]
pub struct Int {
    /// Little-endian limbs; `digit.len()` is the allocated capacity and
    /// every position at or above `used` holds zero.
    pub(crate) digit: Vec<Digit>,
    /// Count of significant limbs.
    pub(crate) used: usize,
    pub(crate) sign: Sign,
    pub(crate) flags: Flags,
}

impl Default for Int {
    fn default() -> Int {
        Int::new()
    }
}

/// The immutable zero constant.
pub static INT_ZERO: LazyLock<Int> = LazyLock::new(|| Int::new().into_immutable());

/// The immutable one constant.
pub static INT_ONE: LazyLock<Int> = LazyLock::new(|| Int::from_digit(1).into_immutable());

/// The immutable minus-one constant.
pub static INT_MINUS_ONE: LazyLock<Int> = LazyLock::new(|| {
    let mut i = Int::from_digit(1);
    i.sign = Sign::Negative;
    i.into_immutable()
});

/// The immutable positive-infinity sentinel.
pub static INT_INF: LazyLock<Int> = LazyLock::new(|| {
    let mut i = Int::new();
    i.flags = Flags::INF;
    i.into_immutable()
});

/// The immutable negative-infinity sentinel.
pub static INT_MINUS_INF: LazyLock<Int> = LazyLock::new(|| {
    let mut i = Int::new();
    i.flags = Flags::NEG_INF;
    i.into_immutable()
});

/// The immutable not-a-number sentinel.
pub static INT_NAN: LazyLock<Int> = LazyLock::new(|| {
    let mut i = Int::new();
    i.flags = Flags::NAN;
    i.into_immutable()
});

impl Int {
    /// Creates a zero-valued integer without allocating.
    ///
    /// The first mutating operation reserves at least
    /// `DEFAULT_DIGIT_COUNT` limbs.
    pub fn new() -> Int {
        Int {
            digit: Vec::new(),
            used: 0,
            sign: Sign::NonNegative,
            flags: Flags::empty(),
        }
    }

    /// Creates a zero-valued integer with room for `capacity` limbs.
    pub fn with_capacity(capacity: usize) -> Result<Int> {
        let mut i = Int::new();
        i.grow(capacity)?;
        Ok(i)
    }

    /// Creates an integer holding a single limb.
    ///
    /// Internal constructor; callers guarantee `d <= MASK`.
    pub(crate) fn from_digit(d: Digit) -> Int {
        debug_assert!(d <= MASK);
        let mut i = Int::new();
        if d != 0 {
            i.digit = vec![d];
            i.used = 1;
        }
        i
    }

    fn into_immutable(mut self) -> Int {
        self.flags |= Flags::IMMUTABLE;
        self
    }

    /// The number of significant limbs.
    #[inline]
    pub fn used(&self) -> usize {
        self.used
    }

    /// The sign.
    #[inline]
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// The mode flags.
    #[inline]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// The significant limbs, least significant first.
    #[inline]
    pub fn digits(&self) -> &[Digit] {
        &self.digit[..self.used]
    }

    /// Marks the value immutable; it may only serve as a source afterwards.
    pub fn set_immutable(&mut self) {
        self.flags |= Flags::IMMUTABLE;
    }

    /// True when no non-finite mode flag is set.
    #[inline]
    pub fn is_finite(&self) -> bool {
        !self.flags.intersects(Flags::NON_FINITE)
    }

    /// Rejects non-finite operands.
    #[inline]
    pub(crate) fn ensure_finite(&self) -> Result<()> {
        if self.is_finite() {
            Ok(())
        } else {
            Err(Error::InvalidArgument)
        }
    }

    /// Rejects immutable destinations.
    #[inline]
    pub(crate) fn ensure_writable(&self) -> Result<()> {
        if self.flags.contains(Flags::IMMUTABLE) {
            Err(Error::AssignmentToImmutable)
        } else {
            Ok(())
        }
    }

    /// Readies `self` to receive a computed result: rejects immutable
    /// destinations and clears stale mode flags.
    #[inline]
    pub(crate) fn prepare(&mut self) -> Result<()> {
        self.ensure_writable()?;
        self.flags = Flags::empty();
        Ok(())
    }

    /// Limb `i`, reading zero past the allocated buffer.
    #[inline]
    pub(crate) fn digit_or_zero(&self, i: usize) -> Digit {
        self.digit.get(i).copied().unwrap_or(0)
    }

    /// Ensures capacity for at least `needed` limbs.
    ///
    /// Capacity never decreases here, newly exposed positions are zero,
    /// and the first allocation reserves at least `DEFAULT_DIGIT_COUNT`.
    pub(crate) fn grow(&mut self, needed: usize) -> Result<()> {
        let mut target = needed.max(self.used).max(MIN_DIGIT_COUNT);
        if self.digit.len() >= target {
            return Ok(());
        }
        if self.digit.is_empty() {
            target = target.max(DEFAULT_DIGIT_COUNT);
        }
        self.digit
            .try_reserve(target - self.digit.len())
            .map_err(|_| Error::OutOfMemory)?;
        self.digit.resize(target, 0);
        Ok(())
    }

    /// Shrinks capacity to `max(MIN_DIGIT_COUNT, used)`.
    pub fn shrink(&mut self) {
        let target = self.used.max(MIN_DIGIT_COUNT);
        if self.digit.len() > target {
            self.digit.truncate(target);
            self.digit.shrink_to_fit();
        }
    }

    /// Drops trailing zero limbs and normalizes the zero representation.
    pub(crate) fn clamp(&mut self) {
        while self.used > 0 && self.digit[self.used - 1] == 0 {
            self.used -= 1;
        }
        if self.used == 0 {
            self.sign = Sign::NonNegative;
        }
    }

    /// Zeros the limb range `[used, old_used)`.
    ///
    /// Called after an operation lowers `used` so invariant 3 holds again.
    pub(crate) fn zero_unused(&mut self, old_used: usize) {
        let end = old_used.min(self.digit.len());
        for d in &mut self.digit[self.used.min(end)..end] {
            *d = 0;
        }
    }

    /// Zeros every limb at or above `used`.
    pub(crate) fn zero_tail(&mut self) {
        let len = self.digit.len();
        self.zero_unused(len);
    }

    /// Sets the value to zero, keeping the buffer.
    pub fn set_zero(&mut self) {
        let old = self.used;
        self.used = 0;
        self.sign = Sign::NonNegative;
        self.zero_unused(old);
    }

    /// Exchanges the entire contents of two integers, buffers included.
    ///
    /// Raw storage-layer exchange; arithmetic entry points enforce the
    /// `Immutable` flag before results are swapped into a destination.
    pub fn swap(&mut self, other: &mut Int) {
        core::mem::swap(self, other);
    }

    /// Assigns `src`'s value to `self`.
    ///
    /// Copies the sign and every flag except `Immutable`, so sentinel
    /// constants can seed ordinary integers.
    pub fn assign(&mut self, src: &Int) -> Result<()> {
        self.ensure_writable()?;
        let old = self.used;
        self.grow(src.used)?;
        self.digit[..src.used].copy_from_slice(&src.digit[..src.used]);
        self.used = src.used;
        self.sign = src.sign;
        self.flags = src.flags & !Flags::IMMUTABLE;
        self.zero_unused(old);
        Ok(())
    }

    /// Zeroes the limb buffer and releases it, leaving the value zero.
    pub fn destroy(&mut self) {
        for d in &mut self.digit {
            *d = 0;
        }
        self.digit = Vec::new();
        self.used = 0;
        self.sign = Sign::NonNegative;
        self.flags = Flags::empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grow_zero_fills_and_respects_minimums() {
        let mut a = Int::new();
        assert_eq!(a.digit.len(), 0);
        a.grow(1).unwrap();
        assert!(a.digit.len() >= DEFAULT_DIGIT_COUNT);
        assert!(a.digit.iter().all(|&d| d == 0));

        let before = a.digit.len();
        a.grow(1).unwrap();
        assert_eq!(a.digit.len(), before, "grow never shrinks");
    }

    #[test]
    fn shrink_keeps_minimum_capacity() {
        let mut a = Int::with_capacity(200).unwrap();
        a.digit[0] = 7;
        a.used = 1;
        a.shrink();
        assert!(a.digit.len() >= MIN_DIGIT_COUNT);
        assert!(a.digit.len() <= MIN_DIGIT_COUNT.max(a.used));
        assert_eq!(a.digit[0], 7);
    }

    #[test]
    fn clamp_is_idempotent_and_normalizes_zero() {
        let mut a = Int::with_capacity(8).unwrap();
        a.digit[0] = 0;
        a.digit[1] = 0;
        a.used = 2;
        a.sign = Sign::Negative;
        a.clamp();
        assert_eq!(a.used, 0);
        assert_eq!(a.sign, Sign::NonNegative);
        a.clamp();
        assert_eq!(a.used, 0);
        assert_eq!(a.sign, Sign::NonNegative);
    }

    #[test]
    fn assign_copies_value_and_strips_immutable() {
        let mut a = Int::new();
        a.assign(&INT_MINUS_ONE).unwrap();
        assert_eq!(a.used, 1);
        assert_eq!(a.digit[0], 1);
        assert_eq!(a.sign, Sign::Negative);
        assert!(!a.flags.contains(Flags::IMMUTABLE));
    }

    #[test]
    fn assign_zeros_stale_tail() {
        let mut a = Int::with_capacity(8).unwrap();
        for i in 0..6 {
            a.digit[i] = MASK;
        }
        a.used = 6;
        let b = Int::from_digit(9);
        a.assign(&b).unwrap();
        assert_eq!(a.used, 1);
        assert!(a.digit[1..].iter().all(|&d| d == 0));
    }

    #[test]
    fn immutable_destination_is_rejected() {
        let mut a = Int::from_digit(3);
        a.set_immutable();
        let b = Int::from_digit(1);
        assert_eq!(a.assign(&b), Err(Error::AssignmentToImmutable));
    }

    #[test]
    fn non_finite_sources_are_flagged() {
        assert!(!INT_INF.is_finite());
        assert!(!INT_MINUS_INF.is_finite());
        assert!(!INT_NAN.is_finite());
        assert!(INT_ZERO.is_finite());
        assert_eq!(INT_NAN.ensure_finite(), Err(Error::InvalidArgument));
    }

    #[test]
    fn swap_exchanges_buffers() {
        let mut a = Int::from_digit(5);
        let mut b = Int::new();
        b.assign(&INT_MINUS_ONE).unwrap();
        a.swap(&mut b);
        assert_eq!(a.sign, Sign::Negative);
        assert_eq!(b.used, 1);
        assert_eq!(b.digit[0], 5);
        assert_eq!(b.sign, Sign::NonNegative);
    }

    #[test]
    fn destroy_releases_and_zeroes() {
        let mut a = Int::with_capacity(16).unwrap();
        a.digit[0] = 0xabc;
        a.used = 1;
        a.destroy();
        assert_eq!(a.digit.capacity(), 0);
        assert_eq!(a.used, 0);
        assert_eq!(a.sign, Sign::NonNegative);
    }
}
