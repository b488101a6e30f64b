//! Division and modular reduction.
//!
//! Truncated division throughout: the quotient is negative exactly when
//! the operand signs differ and it is non-zero, and the remainder takes
//! the numerator's sign. `mod_floor` renormalizes the remainder onto the
//! divisor's sign afterwards.

use core::cmp::Ordering;

use crate::digit::{Digit, Word, BITS, MASK, MUL_KARATSUBA_CUTOFF};
use crate::error::{Error, Result};
use crate::int::addition::add;
use crate::int::cmp::{compare, compare_magnitude};
use crate::int::multiplication::{mul, mul_digit, sqr};
use crate::int::shift::{shl_digit, shl_in_place, shr_digit, shr_in_place};
use crate::int::subtraction::{decr, sub};
use crate::int::{Int, Sign};

/// `numerator = quotient * denominator + remainder` with `|remainder| <
/// |denominator|`. Either output may be omitted.
pub fn div_rem(
    quotient: Option<&mut Int>,
    remainder: Option<&mut Int>,
    numerator: &Int,
    denominator: &Int,
) -> Result<()> {
    numerator.ensure_finite()?;
    denominator.ensure_finite()?;
    if let Some(q) = &quotient {
        q.ensure_writable()?;
    }
    if let Some(r) = &remainder {
        r.ensure_writable()?;
    }
    if denominator.used == 0 {
        return Err(Error::DivisionByZero);
    }

    if compare_magnitude(numerator, denominator) == Ordering::Less {
        if let Some(r) = remainder {
            r.assign(numerator)?;
        }
        if let Some(q) = quotient {
            q.prepare()?;
            q.set_zero();
        }
        return Ok(());
    }

    let mut qt = Int::new();
    let mut rt = Int::new();
    if denominator.used > 2 * MUL_KARATSUBA_CUTOFF
        && numerator.used >= (3 * denominator.used) / 2
    {
        let mut na = Int::new();
        na.assign(numerator)?;
        na.sign = Sign::NonNegative;
        let mut da = Int::new();
        da.assign(denominator)?;
        da.sign = Sign::NonNegative;
        div_rem_recursive(&mut qt, &mut rt, &na, &da)?;
        qt.sign = if numerator.sign != denominator.sign && qt.used > 0 {
            Sign::Negative
        } else {
            Sign::NonNegative
        };
        rt.sign = if rt.used > 0 {
            numerator.sign
        } else {
            Sign::NonNegative
        };
    } else {
        div_rem_school(&mut qt, &mut rt, numerator, denominator)?;
    }

    if let Some(q) = quotient {
        q.prepare()?;
        q.swap(&mut qt);
    }
    if let Some(r) = remainder {
        r.prepare()?;
        r.swap(&mut rt);
    }
    Ok(())
}

/// Schoolbook long division (HAC 14.20, Knuth D): normalize so the
/// divisor's top limb has its high bit set, estimate each quotient limb
/// from the top two numerator limbs, and correct the estimate at most
/// twice.
fn div_rem_school(q_out: &mut Int, r_out: &mut Int, a: &Int, b: &Int) -> Result<()> {
    if compare_magnitude(a, b) == Ordering::Less {
        r_out.assign(a)?;
        q_out.set_zero();
        return Ok(());
    }

    let neg = if a.sign == b.sign {
        Sign::NonNegative
    } else {
        Sign::Negative
    };

    let mut x = Int::new();
    x.assign(a)?;
    x.sign = Sign::NonNegative;
    let mut y = Int::new();
    y.assign(b)?;
    y.sign = Sign::NonNegative;

    let mut norm = y.count_bits() % BITS;
    if norm < BITS - 1 {
        norm = BITS - 1 - norm;
        shl_in_place(&mut x, norm)?;
        shl_in_place(&mut y, norm)?;
    } else {
        norm = 0;
    }

    let n = x.used - 1;
    let t = y.used - 1;

    let mut q = Int::with_capacity(n + 2)?;
    q.used = n + 2;

    // Leading block: subtract y·β^(n-t) until x drops below it.
    shl_digit(&mut y, n - t)?;
    while compare(&x, &y) != Ordering::Less {
        q.digit[n - t] += 1;
        let mut nx = Int::new();
        sub(&mut nx, &x, &y)?;
        x.swap(&mut nx);
    }
    shr_digit(&mut y, n - t)?;

    let mut t1 = Int::with_capacity(3)?;
    let mut t2 = Int::with_capacity(3)?;
    for i in ((t + 1)..=n).rev() {
        if i > x.used {
            continue;
        }
        let qidx = i - t - 1;

        let mut qhat: Digit = if x.digit_or_zero(i) == y.digit[t] {
            MASK
        } else {
            let mut w = (x.digit_or_zero(i) as Word) << BITS;
            w |= x.digit_or_zero(i - 1) as Word;
            w /= y.digit[t] as Word;
            if w > MASK as Word {
                MASK
            } else {
                w as Digit
            }
        };

        // Walk the estimate down while qhat·(y[t]·β + y[t-1]) overshoots
        // the top three numerator limbs.
        qhat = qhat.wrapping_add(1) & MASK;
        let mut lhs = Int::new();
        loop {
            qhat = qhat.wrapping_sub(1) & MASK;

            t1.set_zero();
            t1.digit[0] = if t == 0 { 0 } else { y.digit[t - 1] };
            t1.digit[1] = y.digit[t];
            t1.used = 2;
            t1.clamp();
            mul_digit(&mut lhs, &t1, qhat)?;

            t2.digit[0] = if i < 2 { 0 } else { x.digit_or_zero(i - 2) };
            t2.digit[1] = x.digit_or_zero(i - 1);
            t2.digit[2] = x.digit_or_zero(i);
            t2.used = 3;
            t2.clamp();

            if compare_magnitude(&lhs, &t2) != Ordering::Greater {
                break;
            }
        }
        q.digit[qidx] = qhat;

        // x -= qhat · y · β^qidx, with a one-step fixup on overshoot.
        mul_digit(&mut t1, &y, qhat)?;
        shl_digit(&mut t1, qidx)?;
        let mut nx = Int::new();
        sub(&mut nx, &x, &t1)?;
        x.swap(&mut nx);
        if x.sign == Sign::Negative {
            t1.assign(&y)?;
            shl_digit(&mut t1, qidx)?;
            let mut fixed = Int::new();
            add(&mut fixed, &x, &t1)?;
            x.swap(&mut fixed);
            q.digit[qidx] = q.digit[qidx].wrapping_sub(1) & MASK;
        }
    }

    x.sign = if x.used == 0 { Sign::NonNegative } else { a.sign };
    q.clamp();
    q.sign = if q.used == 0 { Sign::NonNegative } else { neg };
    shr_in_place(&mut x, norm);

    q_out.swap(&mut q);
    r_out.swap(&mut x);
    Ok(())
}

/// Truncates `x` to its low `k` limbs.
fn keep_low_limbs(x: &mut Int, k: usize) {
    if x.used > k {
        let old = x.used;
        x.used = k;
        x.zero_unused(old);
        x.clamp();
    }
}

/// Recursive division for very large operands: split off `k` limbs, divide
/// the high parts, and repair each partial quotient against the low part
/// of the divisor. Operands are non-negative; the quotient gap shrinks
/// until schoolbook takes over.
fn div_rem_recursive(q: &mut Int, r: &mut Int, a: &Int, b: &Int) -> Result<()> {
    if a.used < b.used || a.used - b.used < MUL_KARATSUBA_CUTOFF {
        return div_rem_school(q, r, a, b);
    }
    let k = (a.used - b.used) / 2;

    let mut b1 = Int::new();
    b1.assign(b)?;
    shr_digit(&mut b1, k)?;
    let mut b0 = Int::new();
    b0.assign(b)?;
    keep_low_limbs(&mut b0, k);

    let mut a_hi = Int::new();
    a_hi.assign(a)?;
    shr_digit(&mut a_hi, 2 * k)?;
    let mut a_lo = Int::new();
    a_lo.assign(a)?;
    keep_low_limbs(&mut a_lo, 2 * k);

    let mut q1 = Int::new();
    let mut r1 = Int::new();
    div_rem_recursive(&mut q1, &mut r1, &a_hi, &b1)?;

    // A1 = (R1 << 2k) + (a mod β^2k) - (Q1 · B0) << k
    shl_digit(&mut r1, 2 * k)?;
    let mut acc = Int::new();
    add(&mut acc, &r1, &a_lo)?;
    let mut t = Int::new();
    mul(&mut t, &q1, &b0)?;
    shl_digit(&mut t, k)?;
    let mut a1 = Int::new();
    sub(&mut a1, &acc, &t)?;

    if a1.sign == Sign::Negative {
        let mut bk = Int::new();
        bk.assign(b)?;
        shl_digit(&mut bk, k)?;
        while a1.sign == Sign::Negative {
            decr(&mut q1)?;
            let mut fixed = Int::new();
            add(&mut fixed, &a1, &bk)?;
            a1.swap(&mut fixed);
        }
    }

    let mut a1_hi = Int::new();
    a1_hi.assign(&a1)?;
    shr_digit(&mut a1_hi, k)?;
    let mut a1_lo = Int::new();
    a1_lo.assign(&a1)?;
    keep_low_limbs(&mut a1_lo, k);

    let mut q0 = Int::new();
    let mut r0 = Int::new();
    div_rem_recursive(&mut q0, &mut r0, &a1_hi, &b1)?;

    // A2 = (R0 << k) + (A1 mod β^k) - Q0 · B0
    shl_digit(&mut r0, k)?;
    add(&mut acc, &r0, &a1_lo)?;
    mul(&mut t, &q0, &b0)?;
    let mut a2 = Int::new();
    sub(&mut a2, &acc, &t)?;
    while a2.sign == Sign::Negative {
        decr(&mut q0)?;
        let mut fixed = Int::new();
        add(&mut fixed, &a2, b)?;
        a2.swap(&mut fixed);
    }

    // q = (Q1 << k) + Q0, r = A2
    shl_digit(&mut q1, k)?;
    add(q, &q1, &q0)?;
    r.swap(&mut a2);
    Ok(())
}

/// Division by a single limb; returns the magnitude remainder and fills
/// the optional quotient.
pub fn div_rem_digit(quotient: Option<&mut Int>, numerator: &Int, d: Digit) -> Result<Digit> {
    numerator.ensure_finite()?;
    if let Some(q) = &quotient {
        q.ensure_writable()?;
    }
    if d > MASK {
        return Err(Error::InvalidArgument);
    }
    if d == 0 {
        return Err(Error::DivisionByZero);
    }

    if d == 1 || numerator.used == 0 {
        if let Some(q) = quotient {
            q.assign(numerator)?;
        }
        return Ok(0);
    }
    if d == 2 {
        let rem = numerator.digit_or_zero(0) & 1;
        if let Some(q) = quotient {
            q.assign(numerator)?;
            shr_in_place(q, 1);
        }
        return Ok(rem);
    }
    if d & (d - 1) == 0 {
        let rem = numerator.digit_or_zero(0) & (d - 1);
        if let Some(q) = quotient {
            q.assign(numerator)?;
            shr_in_place(q, d.trailing_zeros());
        }
        return Ok(rem);
    }
    if d == 3 {
        return div3(quotient, numerator);
    }

    let mut qt = Int::with_capacity(numerator.used)?;
    let mut w: Word = 0;
    for i in (0..numerator.used).rev() {
        w = (w << BITS) | numerator.digit[i] as Word;
        let t = if w >= d as Word {
            let t = w / d as Word;
            w -= t * d as Word;
            t
        } else {
            0
        };
        qt.digit[i] = t as Digit;
    }
    qt.used = numerator.used;
    qt.sign = numerator.sign;
    qt.clamp();

    if let Some(q) = quotient {
        q.prepare()?;
        q.swap(&mut qt);
    }
    Ok(w as Digit)
}

/// Division by three via reciprocal multiplication: approximate each
/// partial quotient with `⌊w·(β/3)⌋/β` and settle the remainder by at
/// most two corrections.
pub fn div3(quotient: Option<&mut Int>, numerator: &Int) -> Result<Digit> {
    numerator.ensure_finite()?;
    if let Some(q) = &quotient {
        q.ensure_writable()?;
    }

    let b: Word = ((1 as Word) << BITS) / 3;
    let mut qt = Int::with_capacity(numerator.used)?;
    let mut w: Word = 0;
    for i in (0..numerator.used).rev() {
        w = (w << BITS) | numerator.digit[i] as Word;
        let mut t: Word = 0;
        if w >= 3 {
            t = (w * b) >> BITS;
            w -= t * 3;
            while w >= 3 {
                t += 1;
                w -= 3;
            }
        }
        qt.digit[i] = t as Digit;
    }
    qt.used = numerator.used;
    qt.sign = numerator.sign;
    qt.clamp();

    if let Some(q) = quotient {
        q.prepare()?;
        q.swap(&mut qt);
    }
    Ok(w as Digit)
}

/// `r = n mod d`, normalized so a non-zero remainder takes the divisor's
/// sign.
pub fn mod_floor(r: &mut Int, n: &Int, d: &Int) -> Result<()> {
    div_rem(None, Some(r), n, d)?;
    if r.used > 0 && r.sign != d.sign {
        let mut t = Int::new();
        add(&mut t, r, d)?;
        r.swap(&mut t);
    }
    Ok(())
}

/// `dest = (a + b) mod m`.
pub fn addmod(dest: &mut Int, a: &Int, b: &Int, m: &Int) -> Result<()> {
    let mut t = Int::new();
    add(&mut t, a, b)?;
    mod_floor(dest, &t, m)
}

/// `dest = (a - b) mod m`.
pub fn submod(dest: &mut Int, a: &Int, b: &Int, m: &Int) -> Result<()> {
    let mut t = Int::new();
    sub(&mut t, a, b)?;
    mod_floor(dest, &t, m)
}

/// `dest = (a * b) mod m`.
pub fn mulmod(dest: &mut Int, a: &Int, b: &Int, m: &Int) -> Result<()> {
    let mut t = Int::new();
    mul(&mut t, a, b)?;
    mod_floor(dest, &t, m)
}

/// `dest = a² mod m`.
pub fn sqrmod(dest: &mut Int, a: &Int, m: &Int) -> Result<()> {
    let mut t = Int::new();
    sqr(&mut t, a)?;
    mod_floor(dest, &t, m)
}
