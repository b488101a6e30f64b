//! Randomization of integers.
#![cfg(feature = "rand")]
#![cfg_attr(docsrs, doc(cfg(feature = "rand")))]

use rand::prelude::*;

use crate::digit::{Digit, BITS, MASK, MAX_BIT_COUNT};
use crate::error::{Error, Result};
use crate::int::{Int, Sign};

/// One uniformly random limb.
pub fn random_digit<R: Rng + ?Sized>(rng: &mut R) -> Digit {
    (rng.random::<u64>() as Digit) & MASK
}

/// Fills `dest` with `bits` random bits: `⌈bits/BITS⌉` random limbs with
/// the top limb masked down to the requested width.
pub fn rand_bits<R: Rng + ?Sized>(dest: &mut Int, bits: u32, rng: &mut R) -> Result<()> {
    dest.prepare()?;
    if bits > MAX_BIT_COUNT {
        return Err(Error::InvalidArgument);
    }
    if bits == 0 {
        dest.set_zero();
        return Ok(());
    }

    let limbs = bits.div_ceil(BITS) as usize;
    let old = dest.used;
    dest.grow(limbs)?;
    for i in 0..limbs {
        dest.digit[i] = random_digit(rng);
    }
    let rem = bits % BITS;
    if rem > 0 {
        dest.digit[limbs - 1] &= (1 << rem) - 1;
    }
    dest.used = limbs;
    dest.sign = Sign::NonNegative;
    dest.zero_unused(old);
    dest.clamp();
    Ok(())
}

/// A trait for drawing random integers straight from any [`Rng`].
///
/// The `rand` feature must be enabled to use this.
pub trait RandInt {
    /// Generate a random non-negative [`Int`] of the given bit size.
    fn random_int(&mut self, bits: u32) -> Result<Int>;
}

impl<R: Rng + ?Sized> RandInt for R {
    fn random_int(&mut self, bits: u32) -> Result<Int> {
        let mut i = Int::new();
        rand_bits(&mut i, bits, self)?;
        Ok(i)
    }
}
