//! DDH group parameter generation.
//!
//! The protocol blinds identifiers inside the multiplicative group of a
//! prime field. Parameters are generated once per session: a random prime
//! modulus of the requested size and a generator of a large subgroup.

use crate::error::{PsiSumError, Result};
use num_bigint::{BigUint, RandBigInt};
use num_prime::nt_funcs::is_prime;
use num_prime::PrimalityTestConfig;
use num_traits::One;
use rand::{CryptoRng, RngCore};

/// Highest generator candidate tried before giving up.
const GENERATOR_SCAN_LIMIT: u64 = 1000;

/// Prime-candidate budget per bit of requested size. Odd n-bit integers are
/// prime with probability about 2 / (n ln 2), so a budget linear in the bit
/// length leaves the search a vanishing failure probability.
const PRIME_ATTEMPTS_PER_BIT: usize = 40;

/// Public parameters of the group both parties blind in.
///
/// Shared by both parties and immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupParams {
    /// Prime modulus of the field.
    pub modulus: BigUint,
    /// Generator of a large subgroup. The scan accepts the first
    /// non-quadratic-residue, which need not be a primitive root of the
    /// full group; a large subgroup is sufficient for the DDH assumption
    /// the protocol rests on.
    pub generator: BigUint,
}

/// Build a Miller-Rabin configuration running `rounds` random-base trials
/// on top of the default fixed-base screen.
///
/// Each passing round cuts the false-positive probability by at least a
/// factor of four; callers trade speed for assurance through this knob.
fn primality_config(rounds: usize) -> PrimalityTestConfig {
    let mut config = PrimalityTestConfig::default();
    config.sprp_random_trials = rounds;
    config
}

/// Generate a random prime of exactly `bits` bits.
///
/// Candidates are drawn uniformly with the top bit forced (so the size is
/// exact) and the low bit forced (odd), then Miller-Rabin tested with
/// `mr_rounds` random bases. The candidate budget is bounded; running out
/// is a fatal configuration error, not retried.
pub(crate) fn generate_prime(
    bits: u64,
    mr_rounds: usize,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<BigUint> {
    let attempts = PRIME_ATTEMPTS_PER_BIT * bits as usize;
    for _ in 0..attempts {
        let mut candidate = rng.gen_biguint(bits);
        candidate |= BigUint::one() << (bits - 1);
        candidate |= BigUint::one();
        if is_prime(&candidate, Some(primality_config(mr_rounds))).probably() {
            return Ok(candidate);
        }
    }
    Err(PsiSumError::PrimalityGenerationExhausted { bits, attempts })
}

/// Generate group parameters: a `bits`-bit prime modulus and a generator.
///
/// The generator is found by linear scan from 2 upward, accepting the first
/// candidate `g` with `g^((p-1)/2) mod p != 1`. For a large prime the scan
/// practically never fails; exhausting it means the parameters are unusable.
pub fn generate_group(
    bits: u64,
    mr_rounds: usize,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<GroupParams> {
    let modulus = generate_prime(bits, mr_rounds, rng)?;
    let exponent = (&modulus - BigUint::one()) >> 1u32;
    for candidate in 2..GENERATOR_SCAN_LIMIT {
        let generator = BigUint::from(candidate);
        if generator.modpow(&exponent, &modulus) != BigUint::one() {
            return Ok(GroupParams { modulus, generator });
        }
    }
    Err(PsiSumError::GeneratorSearchExhausted {
        limit: GENERATOR_SCAN_LIMIT,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_integer::Integer;
    use rand::rngs::OsRng;

    #[test]
    fn test_generated_prime_size_and_parity() {
        let mut rng = OsRng;
        let prime = generate_prime(48, 8, &mut rng).unwrap();
        assert_eq!(prime.bits(), 48);
        assert!(prime.is_odd());
        assert!(is_prime(&prime, Some(primality_config(16))).probably());
    }

    #[test]
    fn test_generated_primes_differ() {
        let mut rng = OsRng;
        let a = generate_prime(48, 8, &mut rng).unwrap();
        let b = generate_prime(48, 8, &mut rng).unwrap();
        assert_ne!(a, b, "two 48-bit primes colliding is vanishingly unlikely");
    }

    #[test]
    fn test_generator_is_non_residue() {
        let mut rng = OsRng;
        let params = generate_group(48, 8, &mut rng).unwrap();
        assert!(params.generator >= BigUint::from(2u32));
        let exponent = (&params.modulus - BigUint::one()) >> 1u32;
        assert_ne!(
            params.generator.modpow(&exponent, &params.modulus),
            BigUint::one()
        );
    }

    #[test]
    fn test_primality_config_rounds() {
        let config = primality_config(12);
        assert_eq!(config.sprp_random_trials, 12);
    }
}
