//! Bitwise operations with two's-complement semantics over the
//! sign-magnitude representation.
//!
//! Negative operands are converted limb by limb on the fly: a running
//! carry starting at one turns each complemented limb into its
//! two's-complement form, and a second carry pass converts a negative
//! result back to sign-magnitude.

use crate::digit::{Digit, Word, BITS, MASK, MAX_BIT_COUNT, WORD_BITS};
use crate::error::{Error, Result};
use crate::int::subtraction::{decr, neg};
use crate::int::{Int, Sign};

#[derive(Clone, Copy)]
enum BitOp {
    And,
    Or,
    Xor,
}

fn bitwise(dest: &mut Int, a: &Int, b: &Int, op: BitOp) -> Result<()> {
    dest.prepare()?;
    a.ensure_finite()?;
    b.ensure_finite()?;

    let used = a.used.max(b.used) + 1;
    let negative = match op {
        BitOp::And => a.is_negative() && b.is_negative(),
        BitOp::Or => a.is_negative() || b.is_negative(),
        BitOp::Xor => a.is_negative() != b.is_negative(),
    };

    let old = dest.used;
    dest.grow(used)?;

    let mut ac: Digit = 1;
    let mut bc: Digit = 1;
    for i in 0..used {
        let x = if a.is_negative() {
            ac += if i < a.used { !a.digit[i] & MASK } else { MASK };
            let x = ac & MASK;
            ac >>= BITS;
            x
        } else if i < a.used {
            a.digit[i]
        } else {
            0
        };
        let y = if b.is_negative() {
            bc += if i < b.used { !b.digit[i] & MASK } else { MASK };
            let y = bc & MASK;
            bc >>= BITS;
            y
        } else if i < b.used {
            b.digit[i]
        } else {
            0
        };
        dest.digit[i] = match op {
            BitOp::And => x & y,
            BitOp::Or => x | y,
            BitOp::Xor => x ^ y,
        };
    }
    dest.used = used;

    if negative {
        let mut cc: Digit = 1;
        for i in 0..used {
            cc += !dest.digit[i] & MASK;
            dest.digit[i] = cc & MASK;
            cc >>= BITS;
        }
    }
    dest.sign = if negative {
        Sign::Negative
    } else {
        Sign::NonNegative
    };
    dest.zero_unused(old);
    dest.clamp();
    Ok(())
}

/// `dest = a & b`; negative iff both operands are negative.
pub fn and(dest: &mut Int, a: &Int, b: &Int) -> Result<()> {
    bitwise(dest, a, b, BitOp::And)
}

/// `dest = a | b`; negative iff either operand is negative.
pub fn or(dest: &mut Int, a: &Int, b: &Int) -> Result<()> {
    bitwise(dest, a, b, BitOp::Or)
}

/// `dest = a ^ b`; negative iff the operand signs differ.
pub fn xor(dest: &mut Int, a: &Int, b: &Int) -> Result<()> {
    bitwise(dest, a, b, BitOp::Xor)
}

/// `dest = ~src = -src - 1`.
pub fn complement(dest: &mut Int, src: &Int) -> Result<()> {
    neg(dest, src)?;
    decr(dest)
}

/// Extracts the `count`-bit window starting at bit `offset` of the
/// magnitude, packed into a `Word`. The window may span up to three
/// consecutive limbs.
pub fn bitfield_extract(a: &Int, offset: u32, count: u32) -> Result<Word> {
    a.ensure_finite()?;
    if count < 1 || count > WORD_BITS || offset > MAX_BIT_COUNT {
        return Err(Error::InvalidArgument);
    }

    let idx = (offset / BITS) as usize;
    let sh = offset % BITS;
    let mut out = (a.digit_or_zero(idx) >> sh) as Word;
    let mut got = BITS - sh;
    let mut i = idx + 1;
    while got < count {
        out |= (a.digit_or_zero(i) as Word) << got;
        got += BITS;
        i += 1;
    }
    if count < WORD_BITS {
        out &= ((1 as Word) << count) - 1;
    }
    Ok(out)
}
