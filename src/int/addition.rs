//! Signed addition and the unsigned magnitude core it dispatches to.

use crate::digit::{Digit, BITS, MASK};
use crate::error::{Error, Result};
use crate::int::cmp::compare_magnitude;
use crate::int::subtraction::{mag_decr, mag_sub, mag_sub_digit};
use crate::int::{Int, Sign};
use core::cmp::Ordering;

/// Magnitude addition, HAC 14.7: propagate a carry across the shorter
/// operand, extend it through the longer one's tail, and leave one extra
/// limb for the final carry.
pub(crate) fn mag_add(dest: &mut Int, a: &Int, b: &Int) -> Result<()> {
    let (x, y) = if a.used >= b.used { (a, b) } else { (b, a) };
    let old = dest.used;
    dest.grow(x.used + 1)?;

    let mut carry: Digit = 0;
    for i in 0..y.used {
        let t = x.digit[i] + y.digit[i] + carry;
        dest.digit[i] = t & MASK;
        carry = t >> BITS;
    }
    for i in y.used..x.used {
        let t = x.digit[i] + carry;
        dest.digit[i] = t & MASK;
        carry = t >> BITS;
    }
    dest.digit[x.used] = carry;
    dest.used = x.used + 1;
    dest.zero_unused(old);
    dest.clamp();
    Ok(())
}

/// Magnitude addition of a single limb.
pub(crate) fn mag_add_digit(dest: &mut Int, a: &Int, d: Digit) -> Result<()> {
    let old = dest.used;
    dest.grow(a.used + 1)?;

    let mut carry = d;
    for i in 0..a.used {
        let t = a.digit[i] + carry;
        dest.digit[i] = t & MASK;
        carry = t >> BITS;
    }
    dest.digit[a.used] = carry;
    dest.used = a.used + 1;
    dest.zero_unused(old);
    dest.clamp();
    Ok(())
}

/// In-place magnitude increment.
pub(crate) fn mag_incr(a: &mut Int) -> Result<()> {
    a.grow(a.used + 1)?;
    let mut i = 0;
    while i < a.used && a.digit[i] == MASK {
        a.digit[i] = 0;
        i += 1;
    }
    a.digit[i] += 1;
    if i == a.used {
        a.used += 1;
    }
    Ok(())
}

/// `dest = a + b`.
///
/// Equal signs add magnitudes and inherit the sign; mixed signs subtract
/// the smaller magnitude from the larger and take the larger's sign.
pub fn add(dest: &mut Int, a: &Int, b: &Int) -> Result<()> {
    dest.prepare()?;
    a.ensure_finite()?;
    b.ensure_finite()?;

    if a.sign == b.sign {
        dest.sign = a.sign;
        mag_add(dest, a, b)
    } else if compare_magnitude(a, b) == Ordering::Less {
        dest.sign = b.sign;
        mag_sub(dest, b, a)
    } else {
        dest.sign = a.sign;
        mag_sub(dest, a, b)
    }
}

/// `dest = a + d` for a single unsigned limb.
pub fn add_digit(dest: &mut Int, a: &Int, d: Digit) -> Result<()> {
    dest.prepare()?;
    a.ensure_finite()?;
    if d > MASK {
        return Err(Error::InvalidArgument);
    }

    if a.sign == Sign::Negative {
        if a.used > 1 || a.digit_or_zero(0) > d {
            // Stays on the negative side of zero.
            dest.sign = Sign::Negative;
            mag_sub_digit(dest, a, d)
        } else {
            // Crosses (or lands on) zero: |a| fits one limb and d >= |a|.
            let r = d - a.digit_or_zero(0);
            let old = dest.used;
            dest.grow(1)?;
            dest.digit[0] = r;
            dest.used = usize::from(r != 0);
            dest.sign = Sign::NonNegative;
            dest.zero_unused(old.max(1));
            Ok(())
        }
    } else {
        dest.sign = Sign::NonNegative;
        mag_add_digit(dest, a, d)
    }
}

/// In-place `a += 1`.
pub fn incr(a: &mut Int) -> Result<()> {
    a.ensure_writable()?;
    a.ensure_finite()?;
    if a.sign == Sign::Negative {
        mag_decr(a);
        a.clamp();
        Ok(())
    } else {
        mag_incr(a)
    }
}
