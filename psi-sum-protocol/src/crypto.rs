//! Cryptographic operations for the PSI-Sum protocol: the hash-to-group
//! oracle and the exponent blinding both parties apply to its output.

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

/// Map an identifier to a nonzero element of `[1, modulus)`.
///
/// Models a random oracle: SHA-256 over `seed || identifier`, read as a
/// big-endian integer and reduced modulo the group modulus. A zero result
/// is remapped to 1, since zero carries no discrete-log information and
/// would remain trivially recognizable after blinding.
///
/// Both parties must call this with the same seed, otherwise their blinded
/// representations of equal identifiers never coincide after the double
/// exponentiation.
pub fn hash_to_group(seed: &[u8], identifier: &str, modulus: &BigUint) -> BigUint {
    let mut hasher = Sha256::new();
    hasher.update(seed);
    hasher.update(identifier.as_bytes());
    let digest = hasher.finalize();
    let value = BigUint::from_bytes_be(&digest) % modulus;
    if value.is_zero() {
        BigUint::one()
    } else {
        value
    }
}

/// Blind a group element by raising it to a private exponent.
pub fn blind(element: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    element.modpow(exponent, modulus)
}

/// Sample a private blinding exponent uniformly from `[2, modulus - 2]`.
///
/// Exponents are single-use: one per party per session, never reused and
/// never serialized.
pub fn random_exponent(modulus: &BigUint, rng: &mut (impl RngCore + CryptoRng)) -> BigUint {
    let low = BigUint::from(2u32);
    let high = modulus - BigUint::one();
    rng.gen_biguint_range(&low, &high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    // 1,000,003 is prime; small enough to keep the tests fast.
    fn modulus() -> BigUint {
        BigUint::from(1_000_003u64)
    }

    #[test]
    fn test_hash_to_group_deterministic() {
        let m = modulus();
        let a = hash_to_group(b"seed", "alice", &m);
        let b = hash_to_group(b"seed", "alice", &m);
        assert_eq!(a, b, "the oracle must be deterministic for a fixed seed");
    }

    #[test]
    fn test_hash_to_group_seed_sensitivity() {
        let m = modulus();
        let a = hash_to_group(b"seed-1", "alice", &m);
        let b = hash_to_group(b"seed-2", "alice", &m);
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_to_group_identifier_sensitivity() {
        let m = modulus();
        let a = hash_to_group(b"seed", "alice", &m);
        let b = hash_to_group(b"seed", "bob", &m);
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_to_group_range() {
        let m = modulus();
        for identifier in ["alice", "bob", "carol", "dave", "eve"] {
            let element = hash_to_group(b"seed", identifier, &m);
            assert!(!element.is_zero());
            assert!(element < m);
        }
    }

    #[test]
    fn test_random_exponent_range() {
        let m = modulus();
        let mut rng = OsRng;
        let low = BigUint::from(2u32);
        let high = &m - BigUint::from(2u32);
        for _ in 0..100 {
            let exponent = random_exponent(&m, &mut rng);
            assert!(exponent >= low && exponent <= high);
        }
    }

    #[test]
    fn test_double_blinding_commutes() {
        // (H(x)^k1)^k2 == (H(x)^k2)^k1 is the algebraic fact the matching
        // step depends on; check it over random exponents and identifiers.
        let m = modulus();
        let mut rng = OsRng;
        for run in 0..50 {
            let identifier = format!("identifier-{run}");
            let element = hash_to_group(b"seed", &identifier, &m);
            let k1 = random_exponent(&m, &mut rng);
            let k2 = random_exponent(&m, &mut rng);
            let one_then_two = blind(&blind(&element, &k1, &m), &k2, &m);
            let two_then_one = blind(&blind(&element, &k2, &m), &k1, &m);
            assert_eq!(one_then_two, two_then_one);
        }
    }
}
