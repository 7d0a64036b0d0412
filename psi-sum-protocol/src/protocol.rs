//! The four-round PSI-Sum exchange.
//!
//! Rounds execute strictly in order, each consuming the payload the
//! previous round produced. `run_psi_sum` drives both in-process parties
//! end to end; a deployment with real message passing calls the round
//! methods on each side and ships the payloads itself.

use crate::crypto::{blind, hash_to_group};
use crate::error::Result;
use crate::group::generate_group;
use crate::messages::{PsiSumResult, Round1Message, Round2Message, Round3Message};
use crate::paillier;
use crate::state::{PartyOne, PartyTwo, SessionConfig, SessionParams};
use num_bigint::BigUint;
use num_traits::Zero;
use rand::seq::SliceRandom;
use rand::{CryptoRng, RngCore};
use std::collections::HashSet;
use tracing::{debug, info};

impl PartyOne {
    /// Round 1: blind every identifier and send the shuffled result.
    ///
    /// Duplicated identifiers are blinded once per occurrence; no
    /// deduplication happens at any stage. The shuffle removes the
    /// positional link between input order and transmitted order.
    pub fn round_one(
        &self,
        identifiers: &[String],
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Round1Message {
        let modulus = &self.params.group.modulus;
        let mut elements: Vec<BigUint> = identifiers
            .iter()
            .map(|id| blind(&hash_to_group(&self.params.seed, id, modulus), &self.k1, modulus))
            .collect();
        elements.shuffle(rng);
        debug!(count = elements.len(), "round 1: blinded local identifiers");
        Round1Message::new(elements)
    }

    /// Round 3: detect the intersection and fold the matched ciphertexts.
    ///
    /// Raising Party 2's blinded identifiers to `k1` makes genuinely shared
    /// identifiers collide with elements of `Z`, since
    /// `(H(id)^k1)^k2 == (H(id)^k2)^k1`. Membership is exact integer
    /// equality. The fold starts from a fresh encryption of zero, so an
    /// empty intersection still yields a well-formed aggregate, and the
    /// final ciphertext is re-randomized so Party 2 cannot correlate it
    /// with the ciphertexts it produced.
    pub fn round_three(
        &self,
        received: &Round2Message,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Round3Message> {
        let modulus = &self.params.group.modulus;
        let pk = &self.params.paillier_pk;
        let z: HashSet<&BigUint> = received.reblinded.iter().collect();

        let mut matched_positions = Vec::new();
        let mut sum = paillier::encrypt(pk, &BigUint::zero(), rng)?;
        for (position, (element, ciphertext)) in received.pairs.iter().enumerate() {
            let double_blinded = blind(element, &self.k1, modulus);
            if z.contains(&double_blinded) {
                matched_positions.push(position);
                sum = paillier::homomorphic_add(pk, &sum, ciphertext);
            }
        }
        let encrypted_sum = paillier::randomize(pk, &sum, rng);
        debug!(
            pairs = received.pairs.len(),
            matched = matched_positions.len(),
            "round 3: intersected and folded"
        );
        Ok(Round3Message {
            matched_positions,
            encrypted_sum,
        })
    }
}

impl PartyTwo {
    /// Round 2: re-blind Party 1's elements into `Z` and send the party's
    /// own blinded identifiers alongside their encrypted values.
    ///
    /// Both outgoing lists are shuffled. The permutation applied to the
    /// pair list is retained privately so Round 4 can translate matched
    /// positions back into input order.
    pub fn round_two(
        &mut self,
        received: &Round1Message,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Round2Message> {
        let modulus = &self.params.group.modulus;
        let mut reblinded: Vec<BigUint> = received
            .elements
            .iter()
            .map(|element| blind(element, &self.k2, modulus))
            .collect();
        reblinded.shuffle(rng);

        let pk = &self.params.paillier_pk;
        let mut order: Vec<usize> = (0..self.pairs.len()).collect();
        order.shuffle(rng);
        let mut pairs = Vec::with_capacity(order.len());
        for &index in &order {
            let (identifier, value) = &self.pairs[index];
            let element = blind(&hash_to_group(&self.params.seed, identifier, modulus), &self.k2, modulus);
            let ciphertext = paillier::encrypt(pk, &BigUint::from(*value), rng)?;
            pairs.push((element, ciphertext));
        }
        self.sent_order = Some(order);

        debug!(
            reblinded = reblinded.len(),
            pairs = pairs.len(),
            "round 2: re-blinded and encrypted"
        );
        Ok(Round2Message { reblinded, pairs })
    }

    /// Round 4 (terminal): decrypt the aggregate and name the matched
    /// pairs.
    ///
    /// Matched positions refer to the shuffled order sent in Round 2; they
    /// are mapped back through the recorded permutation, so the result
    /// reports identifiers and indices in Party 2's own input order.
    /// Consumes the party state, dropping the private exponent and the
    /// Paillier private key with it.
    pub fn round_four(self, received: &Round3Message) -> Result<PsiSumResult> {
        let sum = paillier::decrypt(
            &self.params.paillier_pk,
            &self.paillier_sk,
            &received.encrypted_sum,
        )?;
        let sent_order = self.sent_order.unwrap_or_default();
        let mut intersection_indices: Vec<usize> = received
            .matched_positions
            .iter()
            .filter_map(|&position| sent_order.get(position).copied())
            .collect();
        intersection_indices.sort_unstable();
        let intersection_keys = intersection_indices
            .iter()
            .map(|&index| self.pairs[index].0.clone())
            .collect();

        debug!(matched = intersection_indices.len(), "round 4: decrypted aggregate");
        Ok(PsiSumResult {
            intersection_keys,
            intersection_indices,
            sum,
        })
    }
}

/// Run a complete PSI-Sum session between two in-process parties.
///
/// Party 1 contributes identifiers; Party 2 contributes value-carrying
/// pairs and learns the sum of the values whose identifiers appear on both
/// sides. The seed must be agreed out-of-band and identical for both
/// parties. The call either produces the full result or fails atomically;
/// no partial state is surfaced.
pub fn run_psi_sum(
    party1_ids: &[String],
    party2_pairs: &[(String, u64)],
    seed: &[u8],
    config: &SessionConfig,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<PsiSumResult> {
    info!(
        group_bits = config.group_bits,
        paillier_bits = config.paillier_bits,
        "starting PSI-Sum session"
    );
    let group = generate_group(config.group_bits, config.miller_rabin_rounds, rng)?;
    let (mut party_two, paillier_pk) = PartyTwo::new(
        group.clone(),
        seed.to_vec(),
        party2_pairs.to_vec(),
        config,
        rng,
    )?;
    let party_one = PartyOne::new(
        SessionParams {
            group,
            paillier_pk,
            seed: seed.to_vec(),
        },
        rng,
    );

    let round1 = party_one.round_one(party1_ids, rng);
    let round2 = party_two.round_two(&round1, rng)?;
    let round3 = party_one.round_three(&round2, rng)?;
    party_two.round_four(&round3)
}
