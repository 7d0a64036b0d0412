//! In-memory example of a PSI-Sum session.
//!
//! This example runs both parties within a single process, simulating the
//! four-round message exchange without network I/O. Party 1 brings a set of
//! identifiers; Party 2 brings (identifier, value) pairs and ends up with
//! the sum of the values whose identifiers both sides hold.
//!
//! Run with:
//! ```bash
//! cargo run --bin in_memory
//! ```

use num_bigint::BigUint;
use psi_sum_protocol::{
    generate_group, PartyOne, PartyTwo, SessionConfig, SessionParams,
};
use rand::rngs::OsRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== PSI-Sum In-Memory Example ===\n");

    // Demonstration sizes only; production wants >= 2048-bit moduli.
    let config = SessionConfig {
        group_bits: 256,
        paillier_bits: 512,
        miller_rabin_rounds: 8,
    };
    let seed = b"session-001".to_vec();
    let mut rng = OsRng;

    // Party 1's identifiers
    let party1_ids: Vec<String> = vec![
        "alice@example.com".to_string(),
        "bob@example.com".to_string(),
        "carol@site".to_string(),
    ];

    // Party 2's (identifier, value) pairs
    let party2_pairs: Vec<(String, u64)> = vec![
        ("david@site".to_string(), 3),
        ("carol@site".to_string(), 5),
        ("eve@x".to_string(), 7),
        ("alice@example.com".to_string(), 2),
    ];

    println!("Party 1's identifiers ({}):", party1_ids.len());
    for (i, id) in party1_ids.iter().enumerate() {
        println!("  {}: {}", i + 1, id);
    }

    println!("\nParty 2's pairs ({}):", party2_pairs.len());
    for (i, (id, value)) in party2_pairs.iter().enumerate() {
        println!("  {}: {} -> {}", i + 1, id, value);
    }

    // === Init: group parameters, Paillier keys, private exponents ===
    println!("\n--- Init: Generate Session Parameters ---");
    let group = generate_group(config.group_bits, config.miller_rabin_rounds, &mut rng)?;
    println!(
        "Group: {}-bit prime modulus, generator {}",
        group.modulus.bits(),
        group.generator
    );

    let (mut party_two, paillier_pk) = PartyTwo::new(
        group.clone(),
        seed.clone(),
        party2_pairs.clone(),
        &config,
        &mut rng,
    )?;
    println!(
        "Party 2: Paillier key pair generated ({}-bit modulus)",
        paillier_pk.n.bits()
    );

    let party_one = PartyOne::new(
        SessionParams {
            group,
            paillier_pk,
            seed,
        },
        &mut rng,
    );
    println!("Party 1: private exponent drawn");

    // === Round 1: Party 1 -> Party 2 ===
    println!("\n--- Round 1: Party 1 Blinds Its Identifiers ---");
    let round1 = party_one.round_one(&party1_ids, &mut rng);
    println!("Sent {} blinded elements (shuffled)", round1.len());

    // === Round 2: Party 2 -> Party 1 ===
    println!("\n--- Round 2: Party 2 Re-Blinds and Encrypts ---");
    let round2 = party_two.round_two(&round1, &mut rng)?;
    println!(
        "Sent Z with {} elements and {} (blinded id, ciphertext) pairs",
        round2.reblinded.len(),
        round2.pairs.len()
    );

    // === Round 3: Party 1 -> Party 2 ===
    println!("\n--- Round 3: Party 1 Intersects and Folds ---");
    let round3 = party_one.round_three(&round2, &mut rng)?;
    println!(
        "Matched {} pairs; aggregate re-randomized before sending",
        round3.matched_positions.len()
    );

    // === Round 4: Party 2 decrypts ===
    println!("\n--- Round 4: Party 2 Decrypts the Aggregate ---");
    let result = party_two.round_four(&round3)?;

    // === Results ===
    println!("\n=== Results ===");
    println!("Intersection size: {}", result.len());
    for (key, index) in result
        .intersection_keys
        .iter()
        .zip(&result.intersection_indices)
    {
        println!("  matched: {} (Party 2 input #{})", key, index);
    }
    println!("Sum over the intersection: {}", result.sum);

    assert_eq!(result.sum, BigUint::from(7u32));
    println!("\n✓ Protocol completed successfully!");
    println!("✓ Party 2 learned only the aggregate sum");
    println!("✓ Party 1 learned nothing about Party 2's values");

    Ok(())
}
