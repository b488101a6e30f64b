//! Bit and whole-limb shifts.
//!
//! Shifts act on the magnitude and preserve the sign; `shr_signed` layers
//! two's-complement semantics on top for arithmetic right shifts.

use crate::digit::{Digit, BITS, MASK, MAX_BIT_COUNT};
use crate::error::{Error, Result};
use crate::int::addition::mag_incr;
use crate::int::subtraction::mag_decr;
use crate::int::{Int, Sign};

#[inline]
fn check_bits(bits: u32) -> Result<()> {
    if bits > MAX_BIT_COUNT {
        Err(Error::InvalidArgument)
    } else {
        Ok(())
    }
}

/// In-place whole-limb left shift by `n` limbs.
pub fn shl_digit(a: &mut Int, n: usize) -> Result<()> {
    a.ensure_writable()?;
    a.ensure_finite()?;
    if a.used == 0 || n == 0 {
        return Ok(());
    }
    a.grow(a.used + n)?;
    for i in (0..a.used).rev() {
        a.digit[i + n] = a.digit[i];
    }
    for d in &mut a.digit[..n] {
        *d = 0;
    }
    a.used += n;
    Ok(())
}

/// In-place whole-limb right shift by `n` limbs; shifting past the top
/// leaves zero.
pub fn shr_digit(a: &mut Int, n: usize) -> Result<()> {
    a.ensure_writable()?;
    a.ensure_finite()?;
    if n == 0 {
        return Ok(());
    }
    if n >= a.used {
        a.set_zero();
        return Ok(());
    }
    let old = a.used;
    for i in 0..a.used - n {
        a.digit[i] = a.digit[i + n];
    }
    a.used -= n;
    a.zero_unused(old);
    Ok(())
}

/// In-place left shift core; callers have validated `bits`.
pub(crate) fn shl_in_place(a: &mut Int, bits: u32) -> Result<()> {
    if a.used == 0 || bits == 0 {
        return Ok(());
    }
    let limbs = (bits / BITS) as usize;
    let rem = bits % BITS;
    a.grow(a.used + limbs + 1)?;
    if limbs > 0 {
        for i in (0..a.used).rev() {
            a.digit[i + limbs] = a.digit[i];
        }
        for d in &mut a.digit[..limbs] {
            *d = 0;
        }
        a.used += limbs;
    }
    if rem > 0 {
        let mut carry: Digit = 0;
        for i in limbs..a.used {
            let t = a.digit[i];
            a.digit[i] = ((t << rem) | carry) & MASK;
            carry = t >> (BITS - rem);
        }
        if carry != 0 {
            a.digit[a.used] = carry;
            a.used += 1;
        }
    }
    Ok(())
}

/// In-place right shift core; callers have validated `bits`.
pub(crate) fn shr_in_place(a: &mut Int, bits: u32) {
    if a.used == 0 || bits == 0 {
        return;
    }
    let limbs = (bits / BITS) as usize;
    if limbs >= a.used {
        a.set_zero();
        return;
    }
    if limbs > 0 {
        let old = a.used;
        for i in 0..a.used - limbs {
            a.digit[i] = a.digit[i + limbs];
        }
        a.used -= limbs;
        a.zero_unused(old);
    }
    let rem = bits % BITS;
    if rem > 0 {
        let low_mask: Digit = (1 << rem) - 1;
        let shift = BITS - rem;
        let mut carry: Digit = 0;
        for i in (0..a.used).rev() {
            let t = a.digit[i];
            a.digit[i] = (t >> rem) | (carry << shift);
            carry = t & low_mask;
        }
    }
    a.clamp();
}

/// `dest = src * 2`, single-bit doubling.
pub fn shl1(dest: &mut Int, src: &Int) -> Result<()> {
    dest.prepare()?;
    src.ensure_finite()?;
    let old = dest.used;
    dest.grow(src.used + 1)?;
    let mut carry: Digit = 0;
    for i in 0..src.used {
        let t = (src.digit[i] << 1) | carry;
        dest.digit[i] = t & MASK;
        carry = t >> BITS;
    }
    dest.digit[src.used] = carry;
    dest.used = src.used + 1;
    dest.sign = src.sign;
    dest.zero_unused(old);
    dest.clamp();
    Ok(())
}

/// `dest = src / 2` truncated, dropping the low bit.
pub fn shr1(dest: &mut Int, src: &Int) -> Result<()> {
    dest.prepare()?;
    src.ensure_finite()?;
    dest.assign(src)?;
    shr_in_place(dest, 1);
    Ok(())
}

/// `dest = src << bits`; a carry past the top becomes a new high limb.
pub fn shl(dest: &mut Int, src: &Int, bits: u32) -> Result<()> {
    dest.prepare()?;
    src.ensure_finite()?;
    check_bits(bits)?;
    dest.assign(src)?;
    shl_in_place(dest, bits)
}

/// `dest = src >> bits` on the magnitude (truncation toward zero).
pub fn shr(dest: &mut Int, src: &Int, bits: u32) -> Result<()> {
    shrmod(dest, None, src, bits)
}

/// Right shift with optional remainder: `quotient = numerator >> bits`
/// and, when requested, `remainder = numerator mod 2^bits`.
pub fn shrmod(
    quotient: &mut Int,
    remainder: Option<&mut Int>,
    numerator: &Int,
    bits: u32,
) -> Result<()> {
    quotient.ensure_writable()?;
    numerator.ensure_finite()?;
    check_bits(bits)?;
    if let Some(r) = remainder {
        mod_bits(r, numerator, bits)?;
    }
    quotient.assign(numerator)?;
    shr_in_place(quotient, bits);
    Ok(())
}

/// Arithmetic right shift with two's-complement semantics.
///
/// For a negative source the result is `-((-src - 1) >> bits) - 1`,
/// carried out on the magnitude.
pub fn shr_signed(dest: &mut Int, src: &Int, bits: u32) -> Result<()> {
    dest.prepare()?;
    src.ensure_finite()?;
    check_bits(bits)?;
    if src.sign == Sign::NonNegative {
        return shr(dest, src, bits);
    }
    dest.assign(src)?;
    dest.sign = Sign::NonNegative;
    mag_decr(dest);
    shr_in_place(dest, bits);
    mag_incr(dest)?;
    dest.sign = Sign::Negative;
    Ok(())
}

/// `r = n mod 2^bits`: zero every limb above the cut, mask the partial one.
pub fn mod_bits(r: &mut Int, n: &Int, bits: u32) -> Result<()> {
    r.ensure_writable()?;
    n.ensure_finite()?;
    check_bits(bits)?;
    r.assign(n)?;
    let limbs = (bits / BITS) as usize;
    if limbs >= r.used {
        return Ok(());
    }
    let rem = bits % BITS;
    let old = r.used;
    r.used = limbs + usize::from(rem > 0);
    if rem > 0 {
        r.digit[limbs] &= (1 << rem) - 1;
    }
    r.zero_unused(old);
    r.clamp();
    Ok(())
}
