//! Integer square roots and nth roots by Newton iteration.

use core::cmp::Ordering;

use crate::digit::{Digit, Word, MASK, MAX_ITERATIONS_ROOT_N};
use crate::error::{Error, Result};
use crate::int::addition::add;
use crate::int::cmp::compare;
use crate::int::convert::power_of_two;
use crate::int::division::div_rem;
use crate::int::multiplication::{mul, mul_digit};
use crate::int::power::pow;
use crate::int::shift::shr_in_place;
use crate::int::subtraction::{decr, sub};
use crate::int::{Int, Sign};

/// `dest = ⌊√src⌋`.
///
/// Newton from above: start at `2^⌈bits/2⌉`, iterate
/// `y = (x + src/x) / 2`, stop once the iterate no longer decreases.
pub fn sqrt(dest: &mut Int, src: &Int) -> Result<()> {
    dest.prepare()?;
    src.ensure_finite()?;
    if src.is_negative() {
        return Err(Error::MathDomainError);
    }
    if src.used == 0 {
        dest.set_zero();
        return Ok(());
    }

    let mut x = Int::new();
    power_of_two(&mut x, src.count_bits().div_ceil(2))?;

    let mut t = Int::new();
    let mut y = Int::new();
    loop {
        div_rem(Some(&mut t), None, src, &x)?;
        add(&mut y, &x, &t)?;
        shr_in_place(&mut y, 1);
        if compare(&y, &x) != Ordering::Less {
            break;
        }
        x.swap(&mut y);
    }
    dest.swap(&mut x);
    Ok(())
}

/// `dest = ⌊src^(1/n)⌋`, with the sign preserved for odd `n`.
///
/// Newton with the classical update `x - (x^n - src) / (n·x^(n-1))` from
/// the overestimate `2^(bits/n + 2)`, bounded by
/// `MAX_ITERATIONS_ROOT_N`, then corrected by single steps in each
/// direction to land exactly on the floor root.
pub fn root_n(dest: &mut Int, src: &Int, n: u32) -> Result<()> {
    src.ensure_finite()?;
    dest.ensure_writable()?;
    if n == 0 || n as Word > MASK as Word {
        return Err(Error::InvalidArgument);
    }
    if n == 1 {
        return dest.assign(src);
    }
    if n == 2 {
        return sqrt(dest, src);
    }
    if src.is_negative() && n % 2 == 0 {
        return Err(Error::MathDomainError);
    }
    dest.prepare()?;
    if src.used == 0 {
        dest.set_zero();
        return Ok(());
    }

    let mut mag = Int::new();
    mag.assign(src)?;
    mag.sign = Sign::NonNegative;

    // 1 <= mag < 2^n collapses the root to 1 immediately.
    if n >= mag.count_bits() {
        crate::int::convert::set_digit(dest, 1)?;
        if src.is_negative() {
            dest.sign = Sign::Negative;
        }
        return Ok(());
    }

    let mut x = Int::new();
    power_of_two(&mut x, mag.count_bits() / n + 2)?;

    let mut t1 = Int::new();
    let mut t2 = Int::new();
    let mut t3 = Int::new();
    let mut step = Int::new();
    let mut converged = false;
    for _ in 0..MAX_ITERATIONS_ROOT_N {
        // t1 = x^(n-1), t2 = x^n
        pow(&mut t1, &x, i64::from(n - 1))?;
        mul(&mut t2, &t1, &x)?;
        sub(&mut t3, &t2, &mag)?;
        if t3.is_zero() {
            converged = true;
            break;
        }
        // step = (x^n - mag) / (n · x^(n-1))
        mul_digit(&mut t2, &t1, n as Digit)?;
        div_rem(Some(&mut step), None, &t3, &t2)?;

        let mut next = Int::new();
        sub(&mut next, &x, &step)?;
        if next.used == 0 {
            next.grow(1)?;
            next.digit[0] = 1;
            next.used = 1;
        }
        if compare(&next, &x) != Ordering::Less {
            converged = true;
            break;
        }
        x.swap(&mut next);
    }
    if !converged {
        return Err(Error::MaxIterationsReached);
    }

    // Undershoot correction: climb while (x + 1)^n still fits.
    loop {
        crate::int::addition::add_digit(&mut t1, &x, 1)?;
        pow(&mut t2, &t1, i64::from(n))?;
        if compare(&t2, &mag) == Ordering::Greater {
            break;
        }
        x.swap(&mut t1);
    }
    // Overshoot correction: descend while x^n exceeds the argument.
    loop {
        pow(&mut t2, &x, i64::from(n))?;
        if compare(&t2, &mag) != Ordering::Greater {
            break;
        }
        decr(&mut x)?;
    }

    dest.swap(&mut x);
    if src.is_negative() && dest.used > 0 {
        dest.sign = Sign::Negative;
    }
    Ok(())
}
