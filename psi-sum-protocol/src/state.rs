//! Session configuration and per-party protocol state.

use crate::crypto::random_exponent;
use crate::error::Result;
use crate::group::GroupParams;
use crate::paillier::{self, PaillierPrivateKey, PaillierPublicKey};
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use std::fmt;

/// Bit lengths and primality confidence for one session.
///
/// The defaults target production use. Demonstrations and tests override
/// them with far smaller sizes, which keeps parameter generation fast but
/// is not secure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Bit length of the DDH group modulus.
    pub group_bits: u64,
    /// Bit length of the Paillier modulus `n`.
    pub paillier_bits: u64,
    /// Random-base Miller-Rabin rounds per primality test.
    pub miller_rabin_rounds: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            group_bits: 2048,
            paillier_bits: 2048,
            miller_rabin_rounds: 8,
        }
    }
}

/// The public data both parties share: group parameters, Party 2's
/// Paillier public key, and the hash-to-group seed the parties agreed on
/// out-of-band. Immutable once published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionParams {
    pub group: GroupParams,
    pub paillier_pk: PaillierPublicKey,
    pub seed: Vec<u8>,
}

/// Party 1's session state: the shared parameters and the private exponent
/// `k1`, drawn fresh per session.
///
/// Dropping the state at session end drops the exponent with it; the
/// exponent is never serialized and `Debug` redacts it.
pub struct PartyOne {
    pub(crate) params: SessionParams,
    pub(crate) k1: BigUint,
}

impl PartyOne {
    /// Create Party 1's state with a fresh private exponent.
    pub fn new(params: SessionParams, rng: &mut (impl RngCore + CryptoRng)) -> Self {
        let k1 = random_exponent(&params.group.modulus, rng);
        Self { params, k1 }
    }
}

impl fmt::Debug for PartyOne {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartyOne")
            .field("params", &self.params)
            .field("k1", &"<redacted>")
            .finish()
    }
}

/// Party 2's session state: the private exponent `k2`, the Paillier
/// private key, the value-carrying input pairs, and (after Round 2) the
/// permutation applied to them.
pub struct PartyTwo {
    pub(crate) params: SessionParams,
    pub(crate) k2: BigUint,
    pub(crate) paillier_sk: PaillierPrivateKey,
    pub(crate) pairs: Vec<(String, u64)>,
    /// Original input index of each transmitted pair position; recorded in
    /// Round 2 so Round 4 can translate matched positions back.
    pub(crate) sent_order: Option<Vec<usize>>,
}

impl PartyTwo {
    /// Create Party 2's state, generating its Paillier key pair and a
    /// fresh private exponent.
    ///
    /// Returns the state together with the public key, which the caller
    /// publishes into the session parameters shared with Party 1.
    pub fn new(
        group: GroupParams,
        seed: Vec<u8>,
        pairs: Vec<(String, u64)>,
        config: &SessionConfig,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(Self, PaillierPublicKey)> {
        let (paillier_pk, paillier_sk) =
            paillier::keygen(config.paillier_bits, config.miller_rabin_rounds, rng)?;
        let params = SessionParams {
            group,
            paillier_pk: paillier_pk.clone(),
            seed,
        };
        let k2 = random_exponent(&params.group.modulus, rng);
        let party = Self {
            params,
            k2,
            paillier_sk,
            pairs,
            sent_order: None,
        };
        Ok((party, paillier_pk))
    }
}

impl fmt::Debug for PartyTwo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartyTwo")
            .field("params", &self.params)
            .field("k2", &"<redacted>")
            .field("paillier_sk", &self.paillier_sk)
            .field("pairs", &self.pairs.len())
            .finish()
    }
}
