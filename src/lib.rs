//! Low-level arbitrary-precision signed integer arithmetic.
//!
//! This crate is the kernel of a big-integer stack: the primitive
//! routines that operate directly on the limb representation. An
//! [`Int`] stores a sign, a count of significant limbs and a little-endian
//! limb vector in a reduced radix (28-bit limbs in `u32` by default, 60-bit
//! limbs in `u64` with the `u64_digit` feature), leaving headroom so
//! carries and Comba column sums fit the double-width [`Word`].
//!
//! Operations are free functions in destination-first form and return
//! [`Result`]; the destination may not alias an operand (the borrow
//! checker enforces this), while `a == b` operand aliasing is detected and
//! dispatched to squaring. Every routine re-establishes the canonical
//! form on exit: no trailing zero limbs, zero is non-negative, and limbs
//! above `used` stay zero.
//!
//! ```
//! use mpint::{add, get_u64, Int};
//!
//! let a = Int::from(1u64 << 40);
//! let mut sum = Int::new();
//! add(&mut sum, &a, &a).unwrap();
//! assert_eq!(get_u64(&sum), 1 << 41);
//! ```
//!
//! ## Features
//!
//! - `rand` (default): random integer generation via [`rand_bits`] and the
//!   [`RandInt`] extension trait.
//! - `zeroize` (default): a `zeroize::Zeroize` implementation for [`Int`].
//! - `u64_digit`: 60-bit limbs in `u64` with `u128` intermediates.
//!
//! Validation of user input (null checks, parsing, radix conversion)
//! belongs to the layers above; the kernel trusts its callers and limits
//! itself to the arithmetic contracts documented per function.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod digit;
mod error;
mod int;

pub use crate::digit::{Digit, Word};
pub use crate::error::{Error, Result};
pub use crate::int::{
    Flags, Int, Sign, INT_INF, INT_MINUS_INF, INT_MINUS_ONE, INT_NAN, INT_ONE, INT_ZERO,
};

// --- predicates & comparison ---
pub use crate::int::cmp::{compare, compare_digit, compare_magnitude};

// --- shifts ---
pub use crate::int::shift::{
    mod_bits, shl, shl1, shl_digit, shr, shr1, shr_digit, shr_signed, shrmod,
};

// --- additive core ---
pub use crate::int::addition::{add, add_digit, incr};
pub use crate::int::subtraction::{abs, decr, neg, sub, sub_digit};

// --- multiplicative core ---
pub use crate::int::multiplication::{mul, mul_digit, sqr};

// --- division core ---
pub use crate::int::division::{
    addmod, div3, div_rem, div_rem_digit, mod_floor, mulmod, sqrmod, submod,
};

// --- bitwise layer ---
pub use crate::int::bits::{and, bitfield_extract, complement, or, xor};

// --- algebraic layer ---
pub use crate::int::gcd::gcd_lcm;
pub use crate::int::power::{factorial, log, pow};
pub use crate::int::roots::{root_n, sqrt};

// --- conversion ---
pub use crate::int::convert::{
    get_f64, get_i32, get_i64, get_u32, get_u64, power_of_two, set_digit, set_i32, set_i64,
    set_u32, set_u64,
};

// --- randomization ---
#[cfg(feature = "rand")]
pub use crate::int::rand::{rand_bits, random_digit, RandInt};
