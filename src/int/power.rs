//! Integer powers, logarithms, and factorials.

use crate::digit::{Digit, Word, FACTORIAL_BINARY_SPLIT_CUTOFF, MASK};
use crate::error::{Error, Result};
use crate::int::cmp::compare;
use crate::int::convert::{set_digit, set_u64};
use crate::int::multiplication::{mul, mul_digit, sqr};
use crate::int::Int;
use core::cmp::Ordering;

/// `dest = base^p` by right-to-left square-and-multiply.
///
/// `pow(0, p)` with negative `p` is a domain error and zeroes the
/// destination; any other negative exponent truncates to zero.
pub fn pow(dest: &mut Int, base: &Int, p: i64) -> Result<()> {
    dest.prepare()?;
    base.ensure_finite()?;

    if base.used == 0 && p < 0 {
        dest.set_zero();
        return Err(Error::MathDomainError);
    }
    if p == 0 {
        return set_digit(dest, 1);
    }
    if p == 1 {
        return dest.assign(base);
    }
    if p == 2 {
        return sqr(dest, base);
    }
    if p < 0 {
        // |base| >= 1, so the exact result is a fraction.
        dest.set_zero();
        return Ok(());
    }

    let mut g = Int::new();
    g.assign(base)?;
    set_digit(dest, 1)?;

    let mut e = p as u64;
    let mut t = Int::new();
    loop {
        if e & 1 == 1 {
            mul(&mut t, dest, &g)?;
            dest.swap(&mut t);
        }
        e >>= 1;
        if e == 0 {
            break;
        }
        sqr(&mut t, &g)?;
        g.swap(&mut t);
    }
    Ok(())
}

/// `base^k` within a `Word`, or `None` on overflow.
pub(crate) fn small_pow(base: Digit, k: u32) -> Option<Word> {
    let mut acc: Word = 1;
    for _ in 0..k {
        acc = acc.checked_mul(base as Word)?;
    }
    Some(acc)
}

/// Integer logarithm: the largest `e` with `base^e <= a`.
///
/// Power-of-two bases read straight off the bit count; single-limb
/// arguments bracket and bisect within a `Word`; everything else brackets
/// by repeated squaring and bisects with full-width powers.
pub fn log(a: &Int, base: Digit) -> Result<u32> {
    a.ensure_finite()?;
    if base < 2 || base > MASK {
        return Err(Error::InvalidArgument);
    }
    if a.used == 0 || a.is_negative() {
        return Err(Error::MathDomainError);
    }

    if base & (base - 1) == 0 {
        return Ok((a.count_bits() - 1) / base.trailing_zeros());
    }

    if a.used == 1 {
        let v = a.digit[0] as Word;
        let mut lo = 0u32;
        let mut hi = 1u32;
        while small_pow(base, hi).is_some_and(|p| p <= v) {
            lo = hi;
            hi *= 2;
        }
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            match small_pow(base, mid) {
                Some(p) if p <= v => lo = mid,
                _ => hi = mid,
            }
        }
        return Ok(lo);
    }

    // t tracks base^hi while the bracket doubles.
    let mut lo = 0u32;
    let mut hi = 1u32;
    let mut t = Int::from_digit(base);
    while compare(&t, a) != Ordering::Greater {
        lo = hi;
        hi = hi.checked_mul(2).ok_or(Error::InvalidArgument)?;
        let mut s = Int::new();
        sqr(&mut s, &t)?;
        t.swap(&mut s);
    }
    let b = Int::from_digit(base);
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        let mut m = Int::new();
        pow(&mut m, &b, i64::from(mid))?;
        if compare(&m, a) != Ordering::Greater {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(lo)
}

/// `0!` through `20!`, everything that fits a `u64`.
const FACTORIAL_TABLE: [u64; 21] = [
    1,
    1,
    2,
    6,
    24,
    120,
    720,
    5_040,
    40_320,
    362_880,
    3_628_800,
    39_916_800,
    479_001_600,
    6_227_020_800,
    87_178_291_200,
    1_307_674_368_000,
    20_922_789_888_000,
    355_687_428_096_000,
    6_402_373_705_728_000,
    121_645_100_408_832_000,
    2_432_902_008_176_640_000,
];

/// `dest = n!`: table lookup, then an iterative digit product, then
/// binary splitting once ranges get long enough to profit.
pub fn factorial(dest: &mut Int, n: u32) -> Result<()> {
    dest.prepare()?;
    if n as Word > MASK as Word {
        return Err(Error::InvalidArgument);
    }

    if n <= 20 {
        return set_u64(dest, FACTORIAL_TABLE[n as usize]);
    }

    if n < FACTORIAL_BINARY_SPLIT_CUTOFF {
        set_u64(dest, FACTORIAL_TABLE[20])?;
        let mut t = Int::new();
        for k in 21..=n {
            mul_digit(&mut t, dest, k as Digit)?;
            dest.swap(&mut t);
        }
        return Ok(());
    }

    let mut head = Int::new();
    set_u64(&mut head, FACTORIAL_TABLE[20])?;
    let mut tail = Int::new();
    range_product(&mut tail, 21, n)?;
    mul(dest, &head, &tail)
}

/// Product of `lo..=hi` by binary splitting.
fn range_product(dest: &mut Int, lo: u32, hi: u32) -> Result<()> {
    if hi - lo < 8 {
        set_u64(dest, u64::from(lo))?;
        let mut t = Int::new();
        for k in lo + 1..=hi {
            mul_digit(&mut t, dest, k as Digit)?;
            dest.swap(&mut t);
        }
        return Ok(());
    }
    let mid = lo + (hi - lo) / 2;
    let mut left = Int::new();
    let mut right = Int::new();
    range_product(&mut left, lo, mid)?;
    range_product(&mut right, mid + 1, hi)?;
    mul(dest, &left, &right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::int::convert::{get_u64, set_i64};
    use rand::Rng;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn int_i64(v: i64) -> Int {
        let mut a = Int::new();
        set_i64(&mut a, v).unwrap();
        a
    }

    #[test]
    fn small_powers_match_native() {
        let mut rng = XorShiftRng::from_seed([61u8; 16]);
        for _ in 0..200 {
            let b = i64::from(rng.random::<i16>());
            let p = rng.random_range(0..4i64);
            let mut r = Int::new();
            pow(&mut r, &int_i64(b), p).unwrap();
            assert_eq!(crate::int::convert::get_i64(&r), b.pow(p as u32), "{b}^{p}");
        }
    }

    #[test]
    fn pow_special_cases() {
        let mut r = Int::from_digit(7);
        pow(&mut r, &int_i64(5), 0).unwrap();
        assert_eq!(get_u64(&r), 1);

        pow(&mut r, &int_i64(-5), 1).unwrap();
        assert_eq!(r, int_i64(-5));

        pow(&mut r, &int_i64(-5), 2).unwrap();
        assert_eq!(get_u64(&r), 25);

        pow(&mut r, &int_i64(5), -3).unwrap();
        assert!(r.is_zero());

        assert_eq!(
            pow(&mut r, &Int::new(), -1),
            Err(Error::MathDomainError)
        );
        assert!(r.is_zero());

        pow(&mut r, &int_i64(-2), 5).unwrap();
        assert_eq!(r, int_i64(-32));
    }

    #[test]
    fn two_to_the_thousand() {
        let mut r = Int::new();
        pow(&mut r, &int_i64(2), 1000).unwrap();
        assert_eq!(r.count_bits(), 1001);
        assert!(r.is_power_of_two());
        assert_eq!(r.trailing_zeros(), 1000);
    }

    #[test]
    fn log_brackets_the_argument() {
        let mut rng = XorShiftRng::from_seed([62u8; 16]);
        for base in [3 as Digit, 7, 10, 16, 1000] {
            for _ in 0..40 {
                let v = rng.random::<u64>() | 1;
                let mut a = Int::new();
                crate::int::convert::set_u64(&mut a, v).unwrap();
                let e = log(&a, base).unwrap();

                let b = Int::from_digit(base);
                let mut low = Int::new();
                let mut high = Int::new();
                pow(&mut low, &b, i64::from(e)).unwrap();
                pow(&mut high, &b, i64::from(e) + 1).unwrap();
                assert!(compare(&low, &a) != Ordering::Greater, "base={base} v={v}");
                assert!(compare(&high, &a) == Ordering::Greater, "base={base} v={v}");
            }
        }
    }

    #[test]
    fn log_on_multi_limb_arguments() {
        let mut a = Int::new();
        pow(&mut a, &int_i64(10), 40).unwrap();
        assert_eq!(log(&a, 10).unwrap(), 40);
        assert_eq!(log(&a, 2).unwrap(), a.count_bits() - 1);
    }

    #[test]
    fn log_domain_errors() {
        let a = int_i64(8);
        assert_eq!(log(&a, 1), Err(Error::InvalidArgument));
        assert_eq!(log(&int_i64(-8), 2), Err(Error::MathDomainError));
        assert_eq!(log(&Int::new(), 2), Err(Error::MathDomainError));
    }

    #[test]
    fn factorial_growth() {
        let mut f20 = Int::new();
        factorial(&mut f20, 20).unwrap();
        assert_eq!(get_u64(&f20), FACTORIAL_TABLE[20]);

        // 21! = 21 * 20!
        let mut f21 = Int::new();
        factorial(&mut f21, 21).unwrap();
        let mut expected = Int::new();
        mul_digit(&mut expected, &f20, 21).unwrap();
        assert_eq!(f21, expected);
    }

    #[test]
    fn binary_split_agrees_with_the_iterative_product() {
        // Same value through both construction paths.
        let mut split = Int::new();
        range_product(&mut split, 21, 100).unwrap();

        let mut iter = Int::from_digit(21);
        let mut t = Int::new();
        for k in 22..=100u32 {
            mul_digit(&mut t, &iter, k as Digit).unwrap();
            iter.swap(&mut t);
        }
        assert_eq!(split, iter);
    }
}
