//! Signed subtraction, negation, and the borrowing magnitude core.

use crate::digit::{Digit, MASK};
use crate::error::{Error, Result};
use crate::int::addition::{mag_add, mag_add_digit, mag_incr};
use crate::int::cmp::compare_magnitude;
use crate::int::{Int, Sign};
use core::cmp::Ordering;

/// Magnitude subtraction, HAC 14.9. Requires `|a| >= |b|`.
///
/// The borrow out of each limb is the top bit of the wrapped difference:
/// limbs carry at most `BITS` significant bits, so an underflow is the
/// only way the native top bit can be set.
pub(crate) fn mag_sub(dest: &mut Int, a: &Int, b: &Int) -> Result<()> {
    debug_assert!(compare_magnitude(a, b) != Ordering::Less);
    let old = dest.used;
    dest.grow(a.used)?;

    let mut borrow: Digit = 0;
    for i in 0..b.used {
        let t = a.digit[i].wrapping_sub(b.digit[i]).wrapping_sub(borrow);
        borrow = t >> (Digit::BITS - 1);
        dest.digit[i] = t & MASK;
    }
    for i in b.used..a.used {
        let t = a.digit[i].wrapping_sub(borrow);
        borrow = t >> (Digit::BITS - 1);
        dest.digit[i] = t & MASK;
    }
    dest.used = a.used;
    dest.zero_unused(old);
    dest.clamp();
    Ok(())
}

/// Magnitude subtraction of a single limb. Requires `|a| >= d`.
pub(crate) fn mag_sub_digit(dest: &mut Int, a: &Int, d: Digit) -> Result<()> {
    let old = dest.used;
    dest.grow(a.used)?;

    let mut borrow = d;
    for i in 0..a.used {
        let t = a.digit[i].wrapping_sub(borrow);
        borrow = t >> (Digit::BITS - 1);
        dest.digit[i] = t & MASK;
    }
    dest.used = a.used;
    dest.zero_unused(old);
    dest.clamp();
    Ok(())
}

/// In-place magnitude decrement. Requires a non-zero magnitude.
pub(crate) fn mag_decr(a: &mut Int) {
    debug_assert!(a.used > 0);
    let mut i = 0;
    loop {
        if a.digit[i] > 0 {
            a.digit[i] -= 1;
            break;
        }
        a.digit[i] = MASK;
        i += 1;
    }
    a.clamp();
}

/// `dest = a - b`.
pub fn sub(dest: &mut Int, a: &Int, b: &Int) -> Result<()> {
    dest.prepare()?;
    a.ensure_finite()?;
    b.ensure_finite()?;

    if a.sign != b.sign {
        dest.sign = a.sign;
        mag_add(dest, a, b)
    } else if compare_magnitude(a, b) != Ordering::Less {
        dest.sign = a.sign;
        mag_sub(dest, a, b)
    } else {
        dest.sign = a.sign.negated();
        mag_sub(dest, b, a)
    }
}

/// `dest = a - d` for a single unsigned limb.
pub fn sub_digit(dest: &mut Int, a: &Int, d: Digit) -> Result<()> {
    dest.prepare()?;
    a.ensure_finite()?;
    if d > MASK {
        return Err(Error::InvalidArgument);
    }

    if a.sign == Sign::Negative {
        dest.sign = Sign::Negative;
        mag_add_digit(dest, a, d)
    } else if a.used > 1 || a.digit_or_zero(0) >= d {
        dest.sign = Sign::NonNegative;
        mag_sub_digit(dest, a, d)
    } else {
        // Crosses zero: |a| fits one limb and d > |a|.
        let r = d - a.digit_or_zero(0);
        let old = dest.used;
        dest.grow(1)?;
        dest.digit[0] = r;
        dest.used = 1;
        dest.sign = Sign::Negative;
        dest.zero_unused(old.max(1));
        Ok(())
    }
}

/// In-place `a -= 1`.
pub fn decr(a: &mut Int) -> Result<()> {
    a.ensure_writable()?;
    a.ensure_finite()?;
    if a.sign == Sign::Negative {
        mag_incr(a)
    } else if a.used == 0 {
        a.grow(1)?;
        a.digit[0] = 1;
        a.used = 1;
        a.sign = Sign::Negative;
        Ok(())
    } else {
        mag_decr(a);
        a.clamp();
        Ok(())
    }
}

/// `dest = -src`.
pub fn neg(dest: &mut Int, src: &Int) -> Result<()> {
    src.ensure_finite()?;
    dest.assign(src)?;
    if !dest.is_zero() {
        dest.sign = src.sign.negated();
    }
    Ok(())
}

/// `dest = |src|`.
pub fn abs(dest: &mut Int, src: &Int) -> Result<()> {
    src.ensure_finite()?;
    dest.assign(src)?;
    dest.sign = Sign::NonNegative;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::int::addition::add;
    use crate::int::convert::{get_i64, set_i64, set_u64};
    use rand::Rng;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn int_i64(v: i64) -> Int {
        let mut a = Int::new();
        set_i64(&mut a, v).unwrap();
        a
    }

    #[test]
    fn self_difference_is_canonical_zero() {
        let mut rng = XorShiftRng::from_seed([3u8; 16]);
        for _ in 0..100 {
            let a = int_i64(rng.random::<i64>() >> 1);
            let mut r = Int::from_digit(5);
            sub(&mut r, &a, &a).unwrap();
            assert!(r.is_zero());
            assert_eq!(r.sign, Sign::NonNegative);
        }
    }

    #[test]
    fn subtraction_undoes_addition() {
        let mut rng = XorShiftRng::from_seed([4u8; 16]);
        for _ in 0..500 {
            let x = rng.random::<i64>() >> 2;
            let y = rng.random::<i64>() >> 2;
            let (a, b) = (int_i64(x), int_i64(y));

            let mut sum = Int::new();
            add(&mut sum, &a, &b).unwrap();
            let mut back = Int::new();
            sub(&mut back, &sum, &b).unwrap();
            assert_eq!(back, a, "{x} + {y} - {y}");
            assert_eq!(get_i64(&back), x);
        }
    }

    #[test]
    fn borrow_ripples_through_zero_limbs() {
        // 2^(3*BITS) - 1 borrows across every limb.
        let mut a = Int::with_capacity(5).unwrap();
        a.digit[3] = 1;
        a.used = 4;
        let mut r = Int::new();
        sub_digit(&mut r, &a, 1).unwrap();
        assert_eq!(r.used, 3);
        assert!(r.digit[..3].iter().all(|&d| d == MASK));
    }

    #[test]
    fn digit_subtraction_crosses_zero() {
        let mut r = Int::new();
        sub_digit(&mut r, &int_i64(3), 10).unwrap();
        assert_eq!(r, int_i64(-7));

        sub_digit(&mut r, &int_i64(3), 3).unwrap();
        assert!(r.is_zero());

        sub_digit(&mut r, &int_i64(-3), 4).unwrap();
        assert_eq!(r, int_i64(-7));

        sub_digit(&mut r, &Int::new(), 2).unwrap();
        assert_eq!(r, int_i64(-2));
    }

    #[test]
    fn decrement_walks_signs() {
        let mut a = int_i64(1);
        decr(&mut a).unwrap();
        assert!(a.is_zero());
        decr(&mut a).unwrap();
        assert_eq!(a, int_i64(-1));
        decr(&mut a).unwrap();
        assert_eq!(a, int_i64(-2));
    }

    #[test]
    fn negation_and_abs() {
        let a = int_i64(-42);
        let mut r = Int::new();
        neg(&mut r, &a).unwrap();
        assert_eq!(r, int_i64(42));
        abs(&mut r, &a).unwrap();
        assert_eq!(r, int_i64(42));

        let z = Int::new();
        neg(&mut r, &z).unwrap();
        assert!(r.is_zero());
        assert_eq!(r.sign, Sign::NonNegative);
    }

    #[test]
    fn magnitude_core_handles_large_tails() {
        let mut rng = XorShiftRng::from_seed([5u8; 16]);
        for _ in 0..200 {
            let x = rng.random::<u64>();
            let y = rng.random::<u64>();
            let (hi, lo) = if x >= y { (x, y) } else { (y, x) };
            let mut a = Int::new();
            let mut b = Int::new();
            set_u64(&mut a, hi).unwrap();
            set_u64(&mut b, lo).unwrap();
            let mut r = Int::new();
            mag_sub(&mut r, &a, &b).unwrap();
            assert_eq!(crate::int::convert::get_u64(&r), hi - lo);
        }
    }
}
