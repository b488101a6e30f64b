//! Narrow-integer and float conversion, plus direct constructors.
//!
//! The `get_*` reads are truncating: they fold the low limbs of the
//! magnitude into the target width and apply the sign afterwards. Signed
//! reads mask off the top bit of the target width before negating, so a
//! magnitude with that bit set loses it; tests below pin that behavior.

use crate::digit::{Digit, BITS, MASK, MAX_BIT_COUNT};
use crate::error::{Error, Result};
use crate::int::{Flags, Int, Sign};

/// Number of low limbs that can contribute to a 64-bit read.
const U64_LIMBS: usize = ((64 + BITS - 1) / BITS) as usize;

/// `dest = d` for a single limb.
pub fn set_digit(dest: &mut Int, d: Digit) -> Result<()> {
    dest.prepare()?;
    if d > MASK {
        return Err(Error::InvalidArgument);
    }
    let old = dest.used;
    dest.grow(1)?;
    dest.digit[0] = d;
    dest.used = usize::from(d != 0);
    dest.sign = Sign::NonNegative;
    dest.zero_unused(old.max(1));
    Ok(())
}

/// `dest = v`, emitting limbs low to high.
pub fn set_u64(dest: &mut Int, v: u64) -> Result<()> {
    dest.prepare()?;
    let old = dest.used;
    dest.grow(U64_LIMBS)?;
    let mut v = v;
    let mut used = 0;
    while v != 0 {
        dest.digit[used] = (v as Digit) & MASK;
        v >>= BITS;
        used += 1;
    }
    dest.used = used;
    dest.sign = Sign::NonNegative;
    dest.zero_unused(old);
    Ok(())
}

/// `dest = v`, sign taken from `v`.
pub fn set_i64(dest: &mut Int, v: i64) -> Result<()> {
    set_u64(dest, v.unsigned_abs())?;
    if v < 0 {
        dest.sign = Sign::Negative;
    }
    Ok(())
}

/// `dest = v`.
pub fn set_u32(dest: &mut Int, v: u32) -> Result<()> {
    set_u64(dest, u64::from(v))
}

/// `dest = v`.
pub fn set_i32(dest: &mut Int, v: i32) -> Result<()> {
    set_i64(dest, i64::from(v))
}

/// Low 64 bits of the magnitude.
pub fn get_u64(a: &Int) -> u64 {
    let take = U64_LIMBS.min(a.used);
    let mut acc: u64 = 0;
    for i in (0..take).rev() {
        acc = (acc << BITS) | a.digit[i] as u64;
    }
    acc
}

/// Signed 64-bit read: the top bit of the 64-bit window is masked off,
/// then the sign is applied.
pub fn get_i64(a: &Int) -> i64 {
    let m = (get_u64(a) & (u64::MAX >> 1)) as i64;
    if a.is_negative() {
        -m
    } else {
        m
    }
}

/// Low 32 bits of the magnitude.
pub fn get_u32(a: &Int) -> u32 {
    get_u64(a) as u32
}

/// Signed 32-bit read with the same top-bit mask as [`get_i64`].
pub fn get_i32(a: &Int) -> i32 {
    let m = (get_u64(a) as u32 & (u32::MAX >> 1)) as i32;
    if a.is_negative() {
        -m
    } else {
        m
    }
}

/// Coarse conversion to `f64`: accumulate the top 17 limbs, scale past
/// the rest, apply the sign. Non-finite modes map to their IEEE values.
pub fn get_f64(a: &Int) -> f64 {
    if a.flags.contains(Flags::NAN) {
        return f64::NAN;
    }
    if a.flags.contains(Flags::INF) {
        return f64::INFINITY;
    }
    if a.flags.contains(Flags::NEG_INF) {
        return f64::NEG_INFINITY;
    }

    let fac = ((1 as u64) << BITS) as f64;
    let mut d = 0.0_f64;
    for i in (0..a.used).rev() {
        if a.used - i <= 17 {
            d = d * fac + a.digit[i] as f64;
        } else {
            d *= fac;
        }
    }
    if a.is_negative() {
        -d
    } else {
        d
    }
}

/// `a = 2^k`: a single one-bit at limb `k / BITS`, offset `k % BITS`.
pub fn power_of_two(a: &mut Int, k: u32) -> Result<()> {
    a.prepare()?;
    if k >= MAX_BIT_COUNT {
        return Err(Error::InvalidArgument);
    }
    let limb = (k / BITS) as usize;
    a.grow(limb + 1)?;
    a.set_zero();
    a.digit[limb] = 1 << (k % BITS);
    a.used = limb + 1;
    a.sign = Sign::NonNegative;
    Ok(())
}

impl From<u64> for Int {
    fn from(v: u64) -> Int {
        let mut i = Int::new();
        set_u64(&mut i, v).expect("fresh integers are writable");
        i
    }
}

impl From<i64> for Int {
    fn from(v: i64) -> Int {
        let mut i = Int::new();
        set_i64(&mut i, v).expect("fresh integers are writable");
        i
    }
}

impl From<u32> for Int {
    fn from(v: u32) -> Int {
        Int::from(u64::from(v))
    }
}

impl From<i32> for Int {
    fn from(v: i32) -> Int {
        Int::from(i64::from(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    #[test]
    fn u64_round_trip() {
        let mut rng = XorShiftRng::from_seed([51u8; 16]);
        for _ in 0..500 {
            let v = rng.random::<u64>();
            let mut a = Int::new();
            set_u64(&mut a, v).unwrap();
            assert_eq!(get_u64(&a), v);
            assert!(a.digit[..a.used].iter().all(|&d| d <= MASK));
        }
    }

    #[test]
    fn i64_round_trip_within_the_maskable_range() {
        let mut rng = XorShiftRng::from_seed([52u8; 16]);
        for _ in 0..500 {
            let v = rng.random::<i64>() >> 1;
            let mut a = Int::new();
            set_i64(&mut a, v).unwrap();
            assert_eq!(get_i64(&a), v);
        }
    }

    #[test]
    fn signed_reads_mask_the_top_bit() {
        // The top bit of the target width is stripped before negation, so
        // a magnitude of exactly 2^63 reads back as zero.
        let mut a = Int::new();
        power_of_two(&mut a, 63).unwrap();
        assert_eq!(get_u64(&a), 1u64 << 63);
        assert_eq!(get_i64(&a), 0);

        let mut b = Int::new();
        set_i64(&mut b, i64::MIN).unwrap();
        assert_eq!(get_i64(&b), 0);

        let mut c = Int::new();
        set_i64(&mut c, i64::MAX).unwrap();
        assert_eq!(get_i64(&c), i64::MAX);

        let mut d = Int::new();
        set_i64(&mut d, -i64::MAX).unwrap();
        assert_eq!(get_i64(&d), -i64::MAX);

        let mut e = Int::new();
        set_i32(&mut e, i32::MIN).unwrap();
        assert_eq!(get_i32(&e), 0);
        assert_eq!(get_i64(&e), i64::from(i32::MIN));
    }

    #[test]
    fn narrow_reads_truncate() {
        let mut a = Int::new();
        set_u64(&mut a, 0x1_0000_0001).unwrap();
        assert_eq!(get_u32(&a), 1);

        let mut big = Int::new();
        power_of_two(&mut big, 100).unwrap();
        assert_eq!(get_u64(&big), 0);
    }

    #[test]
    fn float_reads() {
        let mut rng = XorShiftRng::from_seed([53u8; 16]);
        for _ in 0..300 {
            let v = rng.random::<u64>();
            let mut a = Int::new();
            set_u64(&mut a, v).unwrap();
            assert_eq!(get_f64(&a), v as f64);
        }

        let mut n = Int::new();
        set_i64(&mut n, -123456789).unwrap();
        assert_eq!(get_f64(&n), -123456789.0);

        assert!(get_f64(&crate::int::INT_NAN).is_nan());
        assert_eq!(get_f64(&crate::int::INT_INF), f64::INFINITY);
        assert_eq!(get_f64(&crate::int::INT_MINUS_INF), f64::NEG_INFINITY);
    }

    #[test]
    fn power_of_two_sets_a_single_bit() {
        for k in [0u32, 1, BITS - 1, BITS, 2 * BITS + 3, 1000] {
            let mut a = Int::new();
            power_of_two(&mut a, k).unwrap();
            assert!(a.is_power_of_two());
            assert_eq!(a.count_bits(), k + 1);
            assert_eq!(a.trailing_zeros(), k);
        }
    }

    #[test]
    fn set_digit_rejects_oversized_values() {
        let mut a = Int::new();
        assert_eq!(set_digit(&mut a, MASK + 1), Err(Error::InvalidArgument));
        set_digit(&mut a, MASK).unwrap();
        assert_eq!(a.used, 1);
    }
}
