//! Multiplication and squaring.
//!
//! `mul` and `sqr` pick an algorithm by operand shape: schoolbook rows for
//! small inputs, Comba column sums while the work array and carry headroom
//! allow it, then Karatsuba, Toom-3 and an unbalanced-operand slicer above
//! their cutoffs. Aliased operands (`a == b` by reference identity) route
//! to the squaring kernels.

use crate::digit::{
    Digit, Word, BITS, MASK, MAX_COMBA, MUL_KARATSUBA_CUTOFF, MUL_TOOM_CUTOFF,
    SQR_KARATSUBA_CUTOFF, SQR_TOOM_CUTOFF, WARRAY,
};
use crate::error::{Error, Result};
use crate::int::addition::add;
use crate::int::division::div3;
use crate::int::shift::{shl, shl1, shl_digit, shr_in_place};
use crate::int::subtraction::sub;
use crate::int::{Int, Sign};

/// Builds an integer from a little-endian limb slice.
pub(crate) fn from_digits(s: &[Digit]) -> Result<Int> {
    let mut i = Int::with_capacity(s.len())?;
    i.digit[..s.len()].copy_from_slice(s);
    i.used = s.len();
    i.clamp();
    Ok(i)
}

/// `dest = a * b`.
///
/// The sign is negative exactly when one operand is negative and the
/// product is non-zero.
pub fn mul(dest: &mut Int, a: &Int, b: &Int) -> Result<()> {
    dest.prepare()?;
    a.ensure_finite()?;
    b.ensure_finite()?;

    if core::ptr::eq(a, b) {
        return sqr(dest, a);
    }
    if a.used == 0 || b.used == 0 {
        dest.set_zero();
        return Ok(());
    }

    let negative = a.sign != b.sign;
    mul_abs(dest, a, b)?;
    dest.sign = if negative && dest.used > 0 {
        Sign::Negative
    } else {
        Sign::NonNegative
    };
    Ok(())
}

/// Magnitude product dispatch; operands are non-zero.
fn mul_abs(dest: &mut Int, a: &Int, b: &Int) -> Result<()> {
    let min_used = a.used.min(b.used);
    let max_used = a.used.max(b.used);

    if min_used >= MUL_KARATSUBA_CUTOFF && max_used / 2 >= min_used {
        mul_balance(dest, a, b)
    } else if min_used >= MUL_TOOM_CUTOFF {
        mul_toom(dest, a, b)
    } else if min_used >= MUL_KARATSUBA_CUTOFF {
        mul_karatsuba(dest, a, b)
    } else if a.used + b.used + 1 < WARRAY && min_used <= MAX_COMBA {
        mul_comba(dest, a, b)
    } else {
        mul_schoolbook(dest, a, b)
    }
}

/// `dest = src * m` for a single unsigned limb.
///
/// Multiplications by 0, 1, 2 and powers of two reduce to assignment and
/// shifts; the general path runs one Word-accumulator pass.
pub fn mul_digit(dest: &mut Int, src: &Int, m: Digit) -> Result<()> {
    dest.prepare()?;
    src.ensure_finite()?;
    if m > MASK {
        return Err(Error::InvalidArgument);
    }

    if m == 0 {
        dest.set_zero();
        return Ok(());
    }
    if m == 1 {
        return dest.assign(src);
    }
    if m == 2 {
        return shl1(dest, src);
    }
    if m & (m - 1) == 0 {
        return shl(dest, src, m.trailing_zeros());
    }

    let old = dest.used;
    dest.grow(src.used + 1)?;
    let mw = m as Word;
    let mut carry: Word = 0;
    for i in 0..src.used {
        let w = src.digit[i] as Word * mw + carry;
        dest.digit[i] = (w & MASK as Word) as Digit;
        carry = w >> BITS;
    }
    dest.digit[src.used] = carry as Digit;
    dest.used = src.used + 1;
    dest.sign = src.sign;
    dest.zero_unused(old);
    dest.clamp();
    Ok(())
}

/// `dest = a * a`.
pub fn sqr(dest: &mut Int, a: &Int) -> Result<()> {
    dest.prepare()?;
    a.ensure_finite()?;

    if a.used == 0 {
        dest.set_zero();
        return Ok(());
    }

    if a.used >= SQR_TOOM_CUTOFF {
        sqr_toom(dest, a)?;
    } else if a.used >= SQR_KARATSUBA_CUTOFF {
        sqr_karatsuba(dest, a)?;
    } else if a.used * 2 + 1 < WARRAY && a.used < MAX_COMBA / 2 {
        sqr_comba(dest, a)?;
    } else {
        sqr_schoolbook(dest, a)?;
    }
    dest.sign = Sign::NonNegative;
    Ok(())
}

/// Row-by-row schoolbook product.
fn mul_schoolbook(dest: &mut Int, a: &Int, b: &Int) -> Result<()> {
    let result_used = a.used + b.used;
    let old = dest.used;
    dest.grow(result_used)?;
    for d in &mut dest.digit[..result_used] {
        *d = 0;
    }

    for ix in 0..a.used {
        let ai = a.digit[ix] as Word;
        if ai == 0 {
            continue;
        }
        let mut carry: Word = 0;
        for iy in 0..b.used {
            let w = dest.digit[ix + iy] as Word + ai * b.digit[iy] as Word + carry;
            dest.digit[ix + iy] = (w & MASK as Word) as Digit;
            carry = w >> BITS;
        }
        dest.digit[ix + b.used] = carry as Digit;
    }

    dest.used = result_used;
    dest.zero_unused(old);
    dest.clamp();
    Ok(())
}

/// Comba product: sum whole columns in a Word accumulator and resolve the
/// carries once per column. Callers guarantee the output fits the work
/// array and the smaller operand is within `MAX_COMBA`.
pub(crate) fn mul_comba(dest: &mut Int, a: &Int, b: &Int) -> Result<()> {
    let digs = a.used + b.used;
    debug_assert!(digs < WARRAY);
    let old = dest.used;
    dest.grow(digs)?;

    let mut w = [0 as Digit; WARRAY];
    let mut acc: Word = 0;
    for ix in 0..digs {
        let ty = (b.used - 1).min(ix);
        let tx = ix - ty;
        let iy = (a.used - tx.min(a.used)).min(ty + 1);
        for iz in 0..iy {
            acc += a.digit[tx + iz] as Word * b.digit[ty - iz] as Word;
        }
        w[ix] = (acc & MASK as Word) as Digit;
        acc >>= BITS;
    }

    dest.digit[..digs].copy_from_slice(&w[..digs]);
    dest.used = digs;
    dest.zero_unused(old);
    dest.clamp();
    Ok(())
}

/// Karatsuba split: `x1*y1·β^2B + ((x1+x0)(y1+y0) − x1y1 − x0y0)·β^B + x0y0`.
fn mul_karatsuba(dest: &mut Int, a: &Int, b: &Int) -> Result<()> {
    let half = a.used.min(b.used) / 2;

    let x0 = from_digits(&a.digit[..half])?;
    let x1 = from_digits(&a.digit[half..a.used])?;
    let y0 = from_digits(&b.digit[..half])?;
    let y1 = from_digits(&b.digit[half..b.used])?;

    let mut x0y0 = Int::new();
    let mut x1y1 = Int::new();
    mul(&mut x0y0, &x0, &y0)?;
    mul(&mut x1y1, &x1, &y1)?;

    let mut t1 = Int::new();
    let mut t2 = Int::new();
    add(&mut t1, &x1, &x0)?;
    add(&mut t2, &y1, &y0)?;
    let mut mid = Int::new();
    mul(&mut mid, &t1, &t2)?;

    // mid -= x0y0 + x1y1, leaving the cross terms.
    add(&mut t1, &x0y0, &x1y1)?;
    sub(&mut t2, &mid, &t1)?;
    mid.swap(&mut t2);

    shl_digit(&mut mid, half)?;
    let mut high = x1y1;
    shl_digit(&mut high, 2 * half)?;

    let mut acc = Int::new();
    add(&mut acc, &x0y0, &mid)?;
    add(dest, &acc, &high)?;
    Ok(())
}

/// Toom-3: evaluate both operands at {0, 1, −1, 2, ∞}, multiply pointwise,
/// interpolate with exact divisions by 3 and 2, and recompose by limb
/// shifts.
fn mul_toom(dest: &mut Int, a: &Int, b: &Int) -> Result<()> {
    let third = a.used.min(b.used) / 3;

    let a0 = from_digits(&a.digit[..third])?;
    let a1 = from_digits(&a.digit[third..2 * third])?;
    let a2 = from_digits(&a.digit[2 * third..a.used])?;
    let b0 = from_digits(&b.digit[..third])?;
    let b1 = from_digits(&b.digit[third..2 * third])?;
    let b2 = from_digits(&b.digit[2 * third..b.used])?;

    let mut w0 = Int::new();
    let mut w4 = Int::new();
    mul(&mut w0, &a0, &b0)?;
    mul(&mut w4, &a2, &b2)?;

    let (ap1, am1, ap2) = toom_points(&a0, &a1, &a2)?;
    let (bp1, bm1, bp2) = toom_points(&b0, &b1, &b2)?;

    let mut w2 = Int::new(); // f(1)
    let mut w1 = Int::new(); // f(-1)
    let mut w3 = Int::new(); // f(2)
    mul(&mut w2, &ap1, &bp1)?;
    mul(&mut w1, &am1, &bm1)?;
    mul(&mut w3, &ap2, &bp2)?;

    toom_interpolate(dest, &mut w0, &mut w1, &mut w2, &mut w3, &mut w4, third)
}

/// Evaluations at 1, −1 and 2 of `a2·x² + a1·x + a0`.
fn toom_points(c0: &Int, c1: &Int, c2: &Int) -> Result<(Int, Int, Int)> {
    let mut s = Int::new();
    let mut t = Int::new();

    add(&mut s, c0, c2)?;
    let mut at1 = Int::new();
    add(&mut at1, &s, c1)?;
    let mut atm1 = Int::new();
    sub(&mut atm1, &s, c1)?;

    // ((c2 * 2) + c1) * 2 + c0
    shl1(&mut s, c2)?;
    add(&mut t, &s, c1)?;
    shl1(&mut s, &t)?;
    let mut at2 = Int::new();
    add(&mut at2, &s, c0)?;

    Ok((at1, atm1, at2))
}

/// Bodrato interpolation for the point set {0, 1, −1, 2, ∞} followed by
/// Horner recomposition in base `β^third`.
fn toom_interpolate(
    dest: &mut Int,
    w0: &mut Int,
    w1: &mut Int,
    w2: &mut Int,
    w3: &mut Int,
    w4: &mut Int,
    third: usize,
) -> Result<()> {
    let mut t = Int::new();
    let mut u = Int::new();

    // W3 = (W3 - W1) / 3
    sub(&mut t, w3, w1)?;
    div3(Some(&mut *w3), &t)?;
    // W1 = (W2 - W1) / 2
    sub(&mut t, w2, w1)?;
    shr_in_place(&mut t, 1);
    w1.swap(&mut t);
    // W2 = W2 - W0
    sub(&mut t, w2, w0)?;
    w2.swap(&mut t);
    // W3 = (W3 - W2) / 2 - 2*W4
    sub(&mut t, w3, w2)?;
    shr_in_place(&mut t, 1);
    shl1(&mut u, w4)?;
    sub(w3, &t, &u)?;
    // W2 = W2 - W1 - W4
    add(&mut t, w1, w4)?;
    sub(&mut u, w2, &t)?;
    w2.swap(&mut u);
    // W1 = W1 - W3
    sub(&mut t, w1, w3)?;
    w1.swap(&mut t);

    let mut acc = Int::new();
    acc.assign(w4)?;
    for w in [&*w3, &*w2, &*w1, &*w0] {
        shl_digit(&mut acc, third)?;
        add(&mut t, &acc, w)?;
        acc.swap(&mut t);
    }
    dest.swap(&mut acc);
    Ok(())
}

/// Unbalanced product: slice the larger operand into chunks the size of
/// the smaller one and accumulate the shifted partial products.
fn mul_balance(dest: &mut Int, a: &Int, b: &Int) -> Result<()> {
    let (big, small) = if a.used >= b.used { (a, b) } else { (b, a) };
    let bsize = small.used;
    let nblocks = big.used / bsize;

    let mut acc = Int::new();
    let mut t = Int::new();
    let mut sum = Int::new();
    let mut j = 0;
    for i in 0..nblocks {
        let chunk = from_digits(&big.digit[j..j + bsize])?;
        mul(&mut t, &chunk, small)?;
        shl_digit(&mut t, bsize * i)?;
        add(&mut sum, &acc, &t)?;
        acc.swap(&mut sum);
        j += bsize;
    }
    if j < big.used {
        let chunk = from_digits(&big.digit[j..big.used])?;
        mul(&mut t, &chunk, small)?;
        shl_digit(&mut t, bsize * nblocks)?;
        add(&mut sum, &acc, &t)?;
        acc.swap(&mut sum);
    }
    dest.swap(&mut acc);
    Ok(())
}

/// Schoolbook squaring: square terms on the diagonal, doubled cross terms
/// above it, carries propagated upward as each row finishes.
fn sqr_schoolbook(dest: &mut Int, a: &Int) -> Result<()> {
    let pa = a.used;
    let old = dest.used;
    dest.grow(2 * pa + 1)?;
    for d in &mut dest.digit[..2 * pa + 1] {
        *d = 0;
    }

    for ix in 0..pa {
        let r = dest.digit[2 * ix] as Word + a.digit[ix] as Word * a.digit[ix] as Word;
        dest.digit[2 * ix] = (r & MASK as Word) as Digit;
        let mut u = r >> BITS;

        for iy in ix + 1..pa {
            let cross = a.digit[ix] as Word * a.digit[iy] as Word;
            let r = dest.digit[ix + iy] as Word + (cross << 1) + u;
            dest.digit[ix + iy] = (r & MASK as Word) as Digit;
            u = r >> BITS;
        }

        let mut iy = ix + pa;
        while u != 0 {
            let r = dest.digit[iy] as Word + u;
            dest.digit[iy] = (r & MASK as Word) as Digit;
            u = r >> BITS;
            iy += 1;
        }
    }

    dest.used = 2 * pa + 1;
    dest.zero_unused(old);
    dest.clamp();
    Ok(())
}

/// Comba squaring: each column sums the distinct limb pairs once, doubles
/// them, and adds the diagonal square on even columns.
pub(crate) fn sqr_comba(dest: &mut Int, a: &Int) -> Result<()> {
    let pa = 2 * a.used;
    debug_assert!(pa + 1 < WARRAY);
    let old = dest.used;
    dest.grow(pa)?;

    let mut w = [0 as Digit; WARRAY];
    let mut carry: Word = 0;
    for ix in 0..pa {
        let ty = (a.used - 1).min(ix);
        let tx = ix - ty;
        let pairs = (a.used - tx.min(a.used)).min(ty + 1).min((ty + 1 - tx) >> 1);

        let mut acc: Word = 0;
        for iz in 0..pairs {
            acc += a.digit[tx + iz] as Word * a.digit[ty - iz] as Word;
        }
        acc = acc * 2 + carry;
        if ix & 1 == 0 {
            acc += a.digit[ix >> 1] as Word * a.digit[ix >> 1] as Word;
        }
        w[ix] = (acc & MASK as Word) as Digit;
        carry = acc >> BITS;
    }

    dest.digit[..pa].copy_from_slice(&w[..pa]);
    dest.used = pa;
    dest.zero_unused(old);
    dest.clamp();
    Ok(())
}

/// Karatsuba squaring: `x1²·β^2B + ((x1+x0)² − x1² − x0²)·β^B + x0²`.
fn sqr_karatsuba(dest: &mut Int, a: &Int) -> Result<()> {
    let half = a.used / 2;

    let x0 = from_digits(&a.digit[..half])?;
    let x1 = from_digits(&a.digit[half..a.used])?;

    let mut x0x0 = Int::new();
    let mut x1x1 = Int::new();
    sqr(&mut x0x0, &x0)?;
    sqr(&mut x1x1, &x1)?;

    let mut t1 = Int::new();
    add(&mut t1, &x1, &x0)?;
    let mut mid = Int::new();
    sqr(&mut mid, &t1)?;

    let mut t2 = Int::new();
    add(&mut t1, &x0x0, &x1x1)?;
    sub(&mut t2, &mid, &t1)?;
    mid.swap(&mut t2);

    shl_digit(&mut mid, half)?;
    let mut high = x1x1;
    shl_digit(&mut high, 2 * half)?;

    let mut acc = Int::new();
    add(&mut acc, &x0x0, &mid)?;
    add(dest, &acc, &high)?;
    Ok(())
}

/// Toom-3 squaring: the multiplication variant with every pointwise
/// product replaced by a square.
fn sqr_toom(dest: &mut Int, a: &Int) -> Result<()> {
    let third = a.used / 3;

    let a0 = from_digits(&a.digit[..third])?;
    let a1 = from_digits(&a.digit[third..2 * third])?;
    let a2 = from_digits(&a.digit[2 * third..a.used])?;

    let mut w0 = Int::new();
    let mut w4 = Int::new();
    sqr(&mut w0, &a0)?;
    sqr(&mut w4, &a2)?;

    let (ap1, am1, ap2) = toom_points(&a0, &a1, &a2)?;
    let mut w2 = Int::new();
    let mut w1 = Int::new();
    let mut w3 = Int::new();
    sqr(&mut w2, &ap1)?;
    sqr(&mut w1, &am1)?;
    sqr(&mut w3, &ap2)?;

    toom_interpolate(dest, &mut w0, &mut w1, &mut w2, &mut w3, &mut w4, third)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::int::convert::{get_u64, set_i64, set_u64};
    use rand::Rng;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn int_u64(v: u64) -> Int {
        let mut a = Int::new();
        set_u64(&mut a, v).unwrap();
        a
    }

    fn int_i64(v: i64) -> Int {
        let mut a = Int::new();
        set_i64(&mut a, v).unwrap();
        a
    }

    fn rand_int<R: Rng>(rng: &mut R, limbs: usize) -> Int {
        let mut a = Int::with_capacity(limbs).unwrap();
        for i in 0..limbs {
            a.digit[i] = (rng.random::<u64>() as Digit) & MASK;
        }
        a.used = limbs;
        a.clamp();
        a
    }

    #[test]
    fn small_products_match_native() {
        let mut rng = XorShiftRng::from_seed([21u8; 16]);
        for _ in 0..500 {
            let x = rng.random::<u32>() as u64;
            let y = rng.random::<u32>() as u64;
            let mut r = Int::new();
            mul(&mut r, &int_u64(x), &int_u64(y)).unwrap();
            assert_eq!(get_u64(&r), x * y);
        }
    }

    #[test]
    fn sign_rules() {
        let mut r = Int::new();
        mul(&mut r, &int_i64(-3), &int_i64(5)).unwrap();
        assert_eq!(r, int_i64(-15));
        mul(&mut r, &int_i64(-3), &int_i64(-5)).unwrap();
        assert_eq!(r, int_i64(15));
        mul(&mut r, &int_i64(-3), &Int::new()).unwrap();
        assert!(r.is_zero());
        assert_eq!(r.sign, Sign::NonNegative);
    }

    #[test]
    fn commutativity_on_random_operands() {
        let mut rng = XorShiftRng::from_seed([22u8; 16]);
        for _ in 0..50 {
            let a = rand_int(&mut rng, 12);
            let b = rand_int(&mut rng, 7);
            let mut ab = Int::new();
            let mut ba = Int::new();
            mul(&mut ab, &a, &b).unwrap();
            mul(&mut ba, &b, &a).unwrap();
            assert_eq!(ab, ba);
        }
    }

    #[test]
    fn comba_agrees_with_schoolbook() {
        let mut rng = XorShiftRng::from_seed([23u8; 16]);
        for _ in 0..40 {
            let a = rand_int(&mut rng, 30);
            let b = rand_int(&mut rng, 25);
            let mut fast = Int::new();
            let mut slow = Int::new();
            mul_comba(&mut fast, &a, &b).unwrap();
            mul_schoolbook(&mut slow, &a, &b).unwrap();
            assert_eq!(fast, slow);
        }
    }

    #[test]
    fn karatsuba_agrees_with_schoolbook() {
        let mut rng = XorShiftRng::from_seed([24u8; 16]);
        for _ in 0..5 {
            let a = rand_int(&mut rng, MUL_KARATSUBA_CUTOFF + 7);
            let b = rand_int(&mut rng, MUL_KARATSUBA_CUTOFF + 3);
            let mut fast = Int::new();
            let mut slow = Int::new();
            mul_karatsuba(&mut fast, &a, &b).unwrap();
            mul_schoolbook(&mut slow, &a, &b).unwrap();
            assert_eq!(fast, slow);
        }
    }

    #[test]
    fn toom_agrees_with_schoolbook() {
        let mut rng = XorShiftRng::from_seed([25u8; 16]);
        for _ in 0..3 {
            let a = rand_int(&mut rng, MUL_TOOM_CUTOFF + 11);
            let b = rand_int(&mut rng, MUL_TOOM_CUTOFF + 2);
            let mut fast = Int::new();
            let mut slow = Int::new();
            mul_toom(&mut fast, &a, &b).unwrap();
            mul_schoolbook(&mut slow, &a, &b).unwrap();
            assert_eq!(fast, slow);
        }
    }

    #[test]
    fn balance_agrees_with_schoolbook() {
        let mut rng = XorShiftRng::from_seed([26u8; 16]);
        let a = rand_int(&mut rng, 4 * MUL_KARATSUBA_CUTOFF);
        let b = rand_int(&mut rng, MUL_KARATSUBA_CUTOFF + 1);
        let mut fast = Int::new();
        let mut slow = Int::new();
        mul_balance(&mut fast, &a, &b).unwrap();
        mul_schoolbook(&mut slow, &a, &b).unwrap();
        assert_eq!(fast, slow);
    }

    #[test]
    fn squaring_variants_agree() {
        let mut rng = XorShiftRng::from_seed([27u8; 16]);
        for limbs in [5, 40, SQR_KARATSUBA_CUTOFF + 5, SQR_TOOM_CUTOFF + 5] {
            let a = rand_int(&mut rng, limbs);
            let mut via_sqr = Int::new();
            let mut via_mul = Int::new();
            sqr(&mut via_sqr, &a).unwrap();
            mul_schoolbook(&mut via_mul, &a, &a).unwrap();
            assert_eq!(via_sqr, via_mul, "limbs = {limbs}");
        }
    }

    #[test]
    fn aliased_operands_dispatch_to_squaring() {
        let a = int_i64(-12345);
        let mut r = Int::new();
        mul(&mut r, &a, &a).unwrap();
        assert_eq!(get_u64(&r), 12345 * 12345);
        assert_eq!(r.sign, Sign::NonNegative);
    }

    #[test]
    fn digit_multiply_fast_paths() {
        let mut rng = XorShiftRng::from_seed([28u8; 16]);
        for _ in 0..200 {
            let x = rng.random::<u32>() as u64;
            let a = int_u64(x);
            let mut r = Int::new();

            mul_digit(&mut r, &a, 0).unwrap();
            assert!(r.is_zero());
            mul_digit(&mut r, &a, 1).unwrap();
            assert_eq!(get_u64(&r), x);
            mul_digit(&mut r, &a, 2).unwrap();
            assert_eq!(get_u64(&r), x * 2);
            mul_digit(&mut r, &a, 16).unwrap();
            assert_eq!(get_u64(&r), x * 16);
            mul_digit(&mut r, &a, 1000).unwrap();
            assert_eq!(get_u64(&r), x * 1000);
        }
    }

    #[test]
    fn ten_to_the_twentieth_squared() {
        // 10^20 * 10^20 == 10^40, checked structurally via repeated
        // division by 10^20.
        let mut ten20 = Int::from_digit(1);
        for _ in 0..20 {
            let mut t = Int::new();
            mul_digit(&mut t, &ten20, 10).unwrap();
            ten20.swap(&mut t);
        }
        let mut sq = Int::new();
        mul(&mut sq, &ten20, &ten20).unwrap();

        let mut q = Int::new();
        let mut r = Int::new();
        crate::int::division::div_rem(Some(&mut q), Some(&mut r), &sq, &ten20).unwrap();
        assert!(r.is_zero());
        assert_eq!(q, ten20);
    }
}
