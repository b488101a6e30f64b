//! Greatest common divisor and least common multiple.
//!
//! Binary GCD: strip the common power of two, keep both values odd by
//! shifting after every subtraction, and restore the common factor at the
//! end. The LCM follows as `(|a| / gcd) * |b|`.

use core::cmp::Ordering;

use crate::error::Result;
use crate::int::cmp::compare_magnitude;
use crate::int::division::div_rem;
use crate::int::multiplication::mul;
use crate::int::shift::{shl_in_place, shr_in_place};
use crate::int::subtraction::sub;
use crate::int::{Int, Sign};

/// Computes `gcd(a, b)` and `lcm(a, b)`; either output may be omitted.
///
/// Both results are non-negative. `gcd(0, b) = |b|`, `gcd(0, 0) = 0`,
/// and the LCM of anything with zero is zero.
pub fn gcd_lcm(
    gcd: Option<&mut Int>,
    lcm: Option<&mut Int>,
    a: &Int,
    b: &Int,
) -> Result<()> {
    a.ensure_finite()?;
    b.ensure_finite()?;
    if let Some(g) = &gcd {
        g.ensure_writable()?;
    }
    if let Some(l) = &lcm {
        l.ensure_writable()?;
    }

    let mut g = Int::new();
    if a.used == 0 {
        g.assign(b)?;
        g.sign = Sign::NonNegative;
    } else if b.used == 0 {
        g.assign(a)?;
        g.sign = Sign::NonNegative;
    } else {
        let mut u = Int::new();
        u.assign(a)?;
        u.sign = Sign::NonNegative;
        let mut v = Int::new();
        v.assign(b)?;
        v.sign = Sign::NonNegative;

        let tz_u = u.trailing_zeros();
        let tz_v = v.trailing_zeros();
        let common = tz_u.min(tz_v);
        shr_in_place(&mut u, tz_u);
        shr_in_place(&mut v, tz_v);

        // Both odd from here on; the difference is even every round.
        while v.used != 0 {
            if compare_magnitude(&u, &v) == Ordering::Greater {
                u.swap(&mut v);
            }
            let mut t = Int::new();
            sub(&mut t, &v, &u)?;
            v.swap(&mut t);
            if v.used != 0 {
                let tz = v.trailing_zeros();
                shr_in_place(&mut v, tz);
            }
        }
        g = u;
        shl_in_place(&mut g, common)?;
    }

    if let Some(l) = lcm {
        l.prepare()?;
        if a.used == 0 || b.used == 0 {
            l.set_zero();
        } else {
            let mut aa = Int::new();
            aa.assign(a)?;
            aa.sign = Sign::NonNegative;
            let mut bb = Int::new();
            bb.assign(b)?;
            bb.sign = Sign::NonNegative;

            let mut q = Int::new();
            div_rem(Some(&mut q), None, &aa, &g)?;
            let mut prod = Int::new();
            mul(&mut prod, &q, &bb)?;
            l.swap(&mut prod);
        }
    }
    if let Some(gout) = gcd {
        gout.prepare()?;
        gout.swap(&mut g);
    }
    Ok(())
}
