//! Bit-width-bounded arithmetic over `BigUint`.
//!
//! Every value handled by the optimizer is an unsigned integer in
//! `[0, 2^width - 1]`. Results wrap modulo `2^width`, and negation is
//! two's complement.

use fastrand::Rng;
use num_bigint::BigUint;
use num_traits::{One, Zero};

#[inline]
pub fn pow2(width: u32) -> BigUint {
    BigUint::one() << width
}

/// Largest value representable in `width` bits, `2^width - 1`.
#[inline]
pub fn max_value(width: u32) -> BigUint {
    pow2(width) - BigUint::one()
}

#[inline]
pub fn truncate(value: &BigUint, width: u32) -> BigUint {
    value & max_value(width)
}

#[inline]
pub fn is_even(value: &BigUint) -> bool {
    !value.bit(0)
}

pub fn flip_bit(value: &BigUint, bit: u32) -> BigUint {
    let mut out = value.clone();
    out.set_bit(u64::from(bit), !value.bit(u64::from(bit)));
    out
}

pub fn add(width: u32, a: &BigUint, b: &BigUint) -> BigUint {
    truncate(&(a + b), width)
}

pub fn sub(width: u32, a: &BigUint, b: &BigUint) -> BigUint {
    truncate(&(a + pow2(width) - b), width)
}

pub fn mul(width: u32, a: &BigUint, b: &BigUint) -> BigUint {
    truncate(&(a * b), width)
}

pub fn inc(width: u32, value: &BigUint) -> BigUint {
    add(width, value, &BigUint::one())
}

pub fn dec(width: u32, value: &BigUint) -> BigUint {
    sub(width, value, &BigUint::one())
}

/// Bitwise complement within `width` bits.
pub fn not(width: u32, value: &BigUint) -> BigUint {
    max_value(width) ^ truncate(value, width)
}

/// Two's-complement negation within `width` bits.
pub fn neg(width: u32, value: &BigUint) -> BigUint {
    inc(width, &not(width, value))
}

pub fn shl(width: u32, value: &BigUint, amount: &BigUint) -> BigUint {
    match shift_amount(width, amount) {
        Some(n) => truncate(&(value << n), width),
        None => BigUint::zero(),
    }
}

pub fn lshr(width: u32, value: &BigUint, amount: &BigUint) -> BigUint {
    match shift_amount(width, amount) {
        Some(n) => value >> n,
        None => BigUint::zero(),
    }
}

/// Unsigned division; division by zero yields all ones.
pub fn udiv(width: u32, a: &BigUint, b: &BigUint) -> BigUint {
    if b.is_zero() {
        max_value(width)
    } else {
        a / b
    }
}

/// Unsigned remainder; remainder by zero yields the dividend.
pub fn urem(a: &BigUint, b: &BigUint) -> BigUint {
    if b.is_zero() {
        a.clone()
    } else {
        a % b
    }
}

fn shift_amount(width: u32, amount: &BigUint) -> Option<u32> {
    if amount >= &BigUint::from(width) {
        None
    } else {
        amount.iter_u32_digits().next().or(Some(0))
    }
}

/// Uniformly random value of the given width.
pub fn random_value(rng: &mut Rng, width: u32) -> BigUint {
    let words = width.div_ceil(32) as usize;
    let digits: Vec<u32> = (0..words).map(|_| rng.u32(..)).collect();
    truncate(&BigUint::new(digits), width)
}

/// Uniformly random unsigned integer of at most `bits` bits (`bits <= 32`).
pub fn random_uint(rng: &mut Rng, bits: u32) -> u32 {
    if bits >= 32 {
        rng.u32(..)
    } else {
        rng.u32(..(1u32 << bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn test_wrapping_at_width_boundary() {
        assert_eq!(inc(8, &n(255)), n(0));
        assert_eq!(dec(8, &n(0)), n(255));
        assert_eq!(neg(8, &n(1)), n(255));
        assert_eq!(neg(8, &n(0)), n(0));
        assert_eq!(not(8, &n(0x0f)), n(0xf0));
    }

    #[test]
    fn test_wide_values_do_not_overflow() {
        let big = max_value(130);
        assert_eq!(inc(130, &big), n(0));
        assert_eq!(big.bits(), 130);
        assert!(big > n(u64::MAX));
    }

    #[test]
    fn test_shifts_past_width_clear() {
        assert_eq!(shl(8, &n(1), &n(8)), n(0));
        assert_eq!(shl(8, &n(0x81), &n(1)), n(0x02));
        assert_eq!(lshr(8, &n(0x80), &n(7)), n(1));
    }

    #[test]
    fn test_division_by_zero_conventions() {
        assert_eq!(udiv(4, &n(7), &n(0)), n(15));
        assert_eq!(urem(&n(7), &n(0)), n(7));
    }

    #[test]
    fn test_random_value_in_range() {
        let mut rng = Rng::with_seed(7);
        for width in [1, 5, 32, 33, 100] {
            for _ in 0..50 {
                assert!(random_value(&mut rng, width) <= max_value(width));
            }
        }
        for _ in 0..50 {
            assert!(random_uint(&mut rng, 4) < 16);
        }
    }
}
