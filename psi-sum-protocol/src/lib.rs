//! # Private Set Intersection with Sum (PSI-Sum)
//!
//! This library implements a two-party PSI-Sum protocol over the
//! multiplicative group of a prime field, combined with the Paillier
//! additive-homomorphic cryptosystem.
//!
//! Party 1 holds a set of identifiers; Party 2 holds a set of
//! (identifier, value) pairs. After four rounds Party 2 learns the sum of
//! the values attached to identifiers present on both sides, and nothing
//! else: Party 1 learns nothing about Party 2's set beyond the protocol
//! transcript, and Party 2 learns only the aggregate, not which of
//! Party 1's identifiers matched.
//!
//! ## Features
//!
//! - **Transport Agnostic**: The library handles the protocol logic but
//!   leaves message exchange to the user; round payloads are plain Rust
//!   structs, so any transport and serialization can carry them.
//! - **Explicit Randomness**: Every sampling operation takes a
//!   caller-supplied cryptographically secure RNG; there is no hidden
//!   global randomness, which keeps sessions independently seedable.
//! - **Configurable Assurance**: Bit lengths and Miller-Rabin round counts
//!   are session configuration, trading setup speed against security.
//!
//! ## Protocol Overview
//!
//! 1. **Init**: generate group parameters, Party 2's Paillier key pair,
//!    and one private exponent per party, all fresh for the session.
//! 2. **Round 1** (Party 1 → Party 2): hash each identifier into the
//!    group, blind by `k1`, shuffle, send.
//! 3. **Round 2** (Party 2 → Party 1): re-blind the received elements by
//!    `k2` into the set `Z`; send `Z` together with Party 2's own blinded
//!    identifiers paired with Paillier-encrypted values, both shuffled.
//! 4. **Round 3** (Party 1 → Party 2): raise Party 2's blinded
//!    identifiers to `k1`; elements landing in `Z` are the intersection.
//!    Homomorphically fold the matched ciphertexts and re-randomize the
//!    aggregate before sending it back.
//! 5. **Round 4** (Party 2, terminal): decrypt the aggregate and map the
//!    matched positions back to its own input.
//!
//! ## Example Usage
//!
//! ```ignore
//! use psi_sum_protocol::{run_psi_sum, SessionConfig};
//! use rand::rngs::OsRng;
//!
//! let party1_ids = vec!["alice".to_string(), "carol".to_string()];
//! let party2_pairs = vec![("carol".to_string(), 5), ("dave".to_string(), 3)];
//!
//! let result = run_psi_sum(
//!     &party1_ids,
//!     &party2_pairs,
//!     b"seed-agreed-out-of-band",
//!     &SessionConfig::default(),
//!     &mut OsRng,
//! )?;
//! assert_eq!(result.intersection_keys, vec!["carol".to_string()]);
//! # Ok::<(), psi_sum_protocol::PsiSumError>(())
//! ```
//!
//! ## Security Considerations
//!
//! - The default `SessionConfig` uses 2048-bit moduli. The small sizes in
//!   the examples and tests keep parameter generation fast and are NOT
//!   secure.
//! - The hash-to-group seed must be agreed out-of-band and kept identical
//!   on both sides; message exchange must be secured with TLS in
//!   production.
//! - Exponents and keys are single-use. An aborted session is recovered
//!   only by starting over with fresh randomness.
//! - The generator scan yields a large-subgroup generator, not necessarily
//!   a primitive root; that is sufficient for the DDH assumption.
//!
//! ## Modules
//!
//! - [`messages`](Round1Message) - Round payloads and the terminal result
//! - [`protocol`](run_psi_sum) - The four-round exchange
//! - [`state`](SessionConfig) - Session configuration and party state
//! - [`error`](PsiSumError) - Error types

pub use error::{PsiSumError, Result};
pub use group::{generate_group, GroupParams};
pub use messages::{PsiSumResult, Round1Message, Round2Message, Round3Message};
pub use paillier::{Ciphertext, PaillierPublicKey};
pub use protocol::run_psi_sum;
pub use state::{PartyOne, PartyTwo, SessionConfig, SessionParams};

mod arith;
mod crypto;
mod error;
mod group;
mod messages;
mod paillier;
mod protocol;
mod state;

/// Integration tests for the full PSI-Sum protocol.
#[cfg(test)]
mod integration_tests {
    use super::*;
    use num_bigint::BigUint;
    use num_traits::Zero;
    use rand::rngs::OsRng;
    use rand::RngCore;

    const SEED: &[u8] = b"session-001";

    fn small_config() -> SessionConfig {
        SessionConfig {
            group_bits: 48,
            paillier_bits: 96,
            miller_rabin_rounds: 8,
        }
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn pairs(entries: &[(&str, u64)]) -> Vec<(String, u64)> {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    #[test]
    fn test_reference_scenario() {
        let party1 = ids(&["alice", "bob", "carol"]);
        let party2 = pairs(&[("dave", 3), ("carol", 5), ("eve", 7), ("alice", 2)]);
        let result =
            run_psi_sum(&party1, &party2, SEED, &small_config(), &mut OsRng).unwrap();

        assert_eq!(result.intersection_keys, ids(&["carol", "alice"]));
        assert_eq!(result.intersection_indices, vec![1, 3]);
        assert_eq!(result.sum, BigUint::from(7u32));
    }

    #[test]
    fn test_empty_party_one() {
        let party2 = pairs(&[("carol", 5), ("alice", 2)]);
        let result = run_psi_sum(&[], &party2, SEED, &small_config(), &mut OsRng).unwrap();
        assert!(result.intersection_keys.is_empty());
        assert!(result.intersection_indices.is_empty());
        assert!(result.sum.is_zero());
    }

    #[test]
    fn test_empty_party_two() {
        let party1 = ids(&["alice", "bob"]);
        let result = run_psi_sum(&party1, &[], SEED, &small_config(), &mut OsRng).unwrap();
        assert!(result.is_empty());
        assert!(result.sum.is_zero());
    }

    #[test]
    fn test_full_overlap() {
        let party1 = ids(&["a", "b", "c"]);
        let party2 = pairs(&[("a", 1), ("b", 2), ("c", 3)]);
        let result = run_psi_sum(&party1, &party2, SEED, &small_config(), &mut OsRng).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result.intersection_indices, vec![0, 1, 2]);
        assert_eq!(result.sum, BigUint::from(6u32));
    }

    #[test]
    fn test_large_sets_with_known_overlap() {
        let mut rng = OsRng;
        let mut party1 = Vec::new();
        let mut party2 = Vec::new();
        for _ in 0..40 {
            party1.push(format!("p1-{:016x}", rng.next_u64()));
            party2.push((format!("p2-{:016x}", rng.next_u64()), 1_000));
        }
        // 10 shared identifiers carrying the values 0..10.
        let mut expected = 0u64;
        for value in 0..10u64 {
            let shared = format!("shared-{:016x}", rng.next_u64());
            party1.push(shared.clone());
            party2.push((shared, value));
            expected += value;
        }

        let result = run_psi_sum(&party1, &party2, SEED, &small_config(), &mut rng).unwrap();
        assert_eq!(result.len(), 10);
        assert_eq!(result.sum, BigUint::from(expected));
        for index in &result.intersection_indices {
            assert!(*index >= 40, "only the shared tail may match");
        }
    }

    #[test]
    fn test_no_false_matches_across_disjoint_sets() {
        // Fresh parameters, exponents, and keys per run; disjoint inputs
        // must never intersect.
        let mut rng = OsRng;
        let config = small_config();
        for _ in 0..100 {
            let party1 = vec![
                format!("a-{:016x}", rng.next_u64()),
                format!("a-{:016x}", rng.next_u64()),
                format!("a-{:016x}", rng.next_u64()),
            ];
            let party2 = vec![
                (format!("b-{:016x}", rng.next_u64()), 3),
                (format!("b-{:016x}", rng.next_u64()), 5),
            ];
            let result = run_psi_sum(&party1, &party2, SEED, &config, &mut rng).unwrap();
            assert!(result.is_empty());
            assert!(result.sum.is_zero());
        }
    }

    #[test]
    fn test_result_is_stable_across_sessions() {
        // Different random sessions over the same inputs agree on the
        // intersection and the sum.
        let party1 = ids(&["alice", "bob", "carol"]);
        let party2 = pairs(&[("carol", 5), ("mallory", 11), ("alice", 2)]);
        let first = run_psi_sum(&party1, &party2, SEED, &small_config(), &mut OsRng).unwrap();
        let second =
            run_psi_sum(&party1, &party2, b"another-seed", &small_config(), &mut OsRng).unwrap();
        assert_eq!(first.intersection_keys, second.intersection_keys);
        assert_eq!(first.intersection_indices, second.intersection_indices);
        assert_eq!(first.sum, second.sum);
    }
}
