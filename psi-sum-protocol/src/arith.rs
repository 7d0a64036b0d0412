//! Arbitrary-precision modular arithmetic helpers.
//!
//! Modular exponentiation is `BigUint::modpow` and gcd/lcm come from
//! `num-integer`; the one primitive the `num` stack does not provide in the
//! shape the protocol needs is a fallible modular inverse, implemented here
//! via the extended Euclidean algorithm.

use crate::error::{PsiSumError, Result};
use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};

/// Compute the multiplicative inverse of `a` modulo `modulus`.
///
/// The extended Euclidean loop is iterative, so the call stack stays flat no
/// matter how large the operands get. The Bezout coefficient is normalized
/// into `[0, modulus)` before being returned.
///
/// # Errors
/// Returns `PsiSumError::NoModularInverse` if `gcd(a, modulus) != 1`.
pub fn mod_inverse(a: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    let mut r0 = BigInt::from(modulus.clone());
    let mut r1 = BigInt::from(a % modulus);
    let mut t0 = BigInt::zero();
    let mut t1 = BigInt::one();

    while !r1.is_zero() {
        let quotient = &r0 / &r1;
        let remainder = &r0 - &quotient * &r1;
        r0 = std::mem::replace(&mut r1, remainder);
        let coefficient = &t0 - &quotient * &t1;
        t0 = std::mem::replace(&mut t1, coefficient);
    }

    if !r0.is_one() {
        return Err(PsiSumError::NoModularInverse);
    }

    let modulus = BigInt::from(modulus.clone());
    let normalized = ((t0 % &modulus) + &modulus) % modulus;
    let (_, inverse) = normalized.into_parts();
    Ok(inverse)
}
