//! Paillier additive-homomorphic cryptosystem.
//!
//! Party 2 owns the key pair; the protocol relies on exactly one algebraic
//! fact: multiplying ciphertexts modulo `n^2` adds the underlying
//! plaintexts modulo `n`. The Paillier modulus is a composite distinct from
//! the DDH group modulus.

use crate::arith::mod_inverse;
use crate::error::{PsiSumError, Result};
use crate::group::generate_prime;
use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use std::fmt;

/// A Paillier ciphertext: an integer in `[0, n^2)`.
pub type Ciphertext = BigUint;

/// Paillier public key, shared with Party 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaillierPublicKey {
    /// Composite modulus `n = p * q`.
    pub n: BigUint,
    /// `n^2`, the ciphertext modulus.
    pub n_squared: BigUint,
    /// Plaintext base, conventionally `n + 1`.
    pub g: BigUint,
}

/// Paillier private key, owned exclusively by Party 2 and never
/// transmitted.
#[derive(Clone, PartialEq, Eq)]
pub struct PaillierPrivateKey {
    p: BigUint,
    q: BigUint,
    /// `lcm(p - 1, q - 1)`.
    lambda: BigUint,
    /// `L(g^lambda mod n^2)^-1 mod n`.
    mu: BigUint,
}

impl fmt::Debug for PaillierPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PaillierPrivateKey(<redacted>)")
    }
}

/// `L(x) = (x - 1) / n`, defined on inputs congruent to 1 modulo `n`.
fn l_function(x: &BigUint, n: &BigUint) -> BigUint {
    (x - BigUint::one()) / n
}

/// Draw a uniform element of `[1, n)` coprime to `n`.
fn sample_unit(n: &BigUint, rng: &mut (impl RngCore + CryptoRng)) -> BigUint {
    loop {
        let r = rng.gen_biguint_range(&BigUint::one(), n);
        if r.gcd(n).is_one() {
            return r;
        }
    }
}

/// Generate a Paillier key pair with a modulus of roughly `bits` bits.
///
/// Draws two primes of `bits / 2` each, resampling if they collide: with
/// `p = q` the modulus is a square and the scheme loses its security
/// argument. `mu` is computed through the fallible modular inverse, so a
/// broken parameter set surfaces as an error instead of a bogus key.
pub fn keygen(
    bits: u64,
    mr_rounds: usize,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<(PaillierPublicKey, PaillierPrivateKey)> {
    let half = bits / 2;
    let p = generate_prime(half, mr_rounds, rng)?;
    let mut q = generate_prime(half, mr_rounds, rng)?;
    while q == p {
        q = generate_prime(half, mr_rounds, rng)?;
    }

    let n = &p * &q;
    let n_squared = &n * &n;
    let g = &n + BigUint::one();
    let lambda = (&p - BigUint::one()).lcm(&(&q - BigUint::one()));
    let mu = mod_inverse(&l_function(&g.modpow(&lambda, &n_squared), &n), &n)?;

    let public = PaillierPublicKey { n, n_squared, g };
    let private = PaillierPrivateKey { p, q, lambda, mu };
    Ok((public, private))
}

/// Encrypt a plaintext in `[0, n)`.
///
/// Randomized: the blinding factor `r` is fresh per call, so two
/// encryptions of the same plaintext differ.
///
/// # Errors
/// Returns `PsiSumError::PlaintextOutOfRange` if `m >= n`.
pub fn encrypt(
    pk: &PaillierPublicKey,
    m: &BigUint,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<Ciphertext> {
    if m >= &pk.n {
        return Err(PsiSumError::PlaintextOutOfRange);
    }
    let r = sample_unit(&pk.n, rng);
    let c = pk.g.modpow(m, &pk.n_squared) * r.modpow(&pk.n, &pk.n_squared) % &pk.n_squared;
    Ok(c)
}

/// Decrypt a ciphertext, recovering the plaintext in `[0, n)`.
///
/// Rejects ciphertexts outside `[0, n^2)`, ciphertexts sharing a factor
/// with `n`, and any ciphertext for which `c^lambda` is not congruent to 1
/// modulo `n`; the latter is what a decryption under a non-matching key
/// pair looks like.
pub fn decrypt(
    pk: &PaillierPublicKey,
    sk: &PaillierPrivateKey,
    c: &Ciphertext,
) -> Result<BigUint> {
    if c >= &pk.n_squared || (c % &sk.p).is_zero() || (c % &sk.q).is_zero() {
        return Err(PsiSumError::PaillierKeyMismatch);
    }
    let x = c.modpow(&sk.lambda, &pk.n_squared);
    if !((&x - BigUint::one()) % &pk.n).is_zero() {
        return Err(PsiSumError::PaillierKeyMismatch);
    }
    Ok(l_function(&x, &pk.n) * &sk.mu % &pk.n)
}

/// Combine two ciphertexts into one encrypting the sum of their
/// plaintexts modulo `n`.
pub fn homomorphic_add(pk: &PaillierPublicKey, c1: &Ciphertext, c2: &Ciphertext) -> Ciphertext {
    c1 * c2 % &pk.n_squared
}

/// Re-randomize a ciphertext without changing its plaintext.
///
/// The result is indistinguishable from a fresh encryption, so an observer
/// cannot link it back to the ciphertexts it was aggregated from.
pub fn randomize(
    pk: &PaillierPublicKey,
    c: &Ciphertext,
    rng: &mut (impl RngCore + CryptoRng),
) -> Ciphertext {
    let r = sample_unit(&pk.n, rng);
    c * r.modpow(&pk.n, &pk.n_squared) % &pk.n_squared
}
