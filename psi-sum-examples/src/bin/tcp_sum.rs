//! TCP-based PSI-Sum example.
//!
//! This example deploys the two parties as separate processes: Party 2 is
//! the server (it owns the Paillier key pair and ultimately learns the
//! sum), Party 1 is the client. Each round payload travels as one JSON
//! line whose big integers are hex strings of their minimal big-endian
//! byte representation, a fixed and unambiguous encoding on both sides.
//!
//! Run server (Party 2):
//! ```bash
//! cargo run --bin tcp_sum -- server
//! ```
//!
//! Run client (Party 1, in another terminal):
//! ```bash
//! cargo run --bin tcp_sum -- client
//! ```

use num_bigint::BigUint;
use psi_sum_protocol::{
    generate_group, GroupParams, PaillierPublicKey, PartyOne, PartyTwo, Round1Message,
    Round2Message, Round3Message, SessionConfig, SessionParams,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::env;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};

const ADDRESS: &str = "127.0.0.1:7878";

/// The seed would be agreed out-of-band in a real deployment; here both
/// roles compile it in.
const SEED: &[u8] = b"tcp-demo-seed";

/// Session parameters the server publishes before Round 1. The Paillier
/// public key travels as `n` alone; `n_squared` and `g = n + 1` are
/// recomputed on the client.
#[derive(Serialize, Deserialize)]
struct SetupWire {
    modulus: String,
    generator: String,
    paillier_n: String,
}

#[derive(Serialize, Deserialize)]
struct Round1Wire {
    elements: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct Round2Wire {
    reblinded: Vec<String>,
    pairs: Vec<(String, String)>,
}

#[derive(Serialize, Deserialize)]
struct Round3Wire {
    matched_positions: Vec<usize>,
    encrypted_sum: String,
}

/// Minimal big-endian bytes, hex-encoded.
fn big_to_hex(value: &BigUint) -> String {
    hex::encode(value.to_bytes_be())
}

fn hex_to_big(text: &str) -> Result<BigUint, Box<dyn std::error::Error>> {
    Ok(BigUint::from_bytes_be(&hex::decode(text)?))
}

/// Ship one JSON line.
fn send_line<T: Serialize>(stream: &mut TcpStream, payload: &T) -> Result<(), Box<dyn std::error::Error>> {
    let mut line = serde_json::to_string(payload)?;
    line.push('\n');
    stream.write_all(line.as_bytes())?;
    Ok(())
}

/// Receive one JSON line.
fn recv_line<T: for<'de> Deserialize<'de>>(
    reader: &mut BufReader<TcpStream>,
) -> Result<T, Box<dyn std::error::Error>> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(serde_json::from_str(line.trim_end())?)
}

/// Run the server (Party 2).
fn run_server() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== PSI-Sum TCP Server (Party 2) ===");
    println!("Listening on {}", ADDRESS);

    let listener = TcpListener::bind(ADDRESS)?;
    println!("Waiting for client connection...");
    let (stream, addr) = listener.accept()?;
    println!("Connected to {}", addr);
    let mut writer = stream.try_clone()?;
    let mut reader = BufReader::new(stream);

    let pairs: Vec<(String, u64)> = vec![
        ("david@site".to_string(), 3),
        ("carol@site".to_string(), 5),
        ("eve@x".to_string(), 7),
        ("alice@example.com".to_string(), 2),
    ];
    println!("\nServer's pairs ({}):", pairs.len());
    for (i, (id, value)) in pairs.iter().enumerate() {
        println!("  {}: {} -> {}", i + 1, id, value);
    }

    // Demonstration sizes only.
    let config = SessionConfig {
        group_bits: 256,
        paillier_bits: 512,
        miller_rabin_rounds: 8,
    };
    let mut rng = OsRng;

    println!("\n--- Init: Generate and Publish Session Parameters ---");
    let group = generate_group(config.group_bits, config.miller_rabin_rounds, &mut rng)?;
    let (mut party_two, paillier_pk) =
        PartyTwo::new(group.clone(), SEED.to_vec(), pairs, &config, &mut rng)?;
    send_line(
        &mut writer,
        &SetupWire {
            modulus: big_to_hex(&group.modulus),
            generator: big_to_hex(&group.generator),
            paillier_n: big_to_hex(&paillier_pk.n),
        },
    )?;
    println!("Published group parameters and Paillier public key");

    println!("\n--- Round 1: Receive Blinded Identifiers ---");
    let round1_wire: Round1Wire = recv_line(&mut reader)?;
    let elements = round1_wire
        .elements
        .iter()
        .map(|text| hex_to_big(text))
        .collect::<Result<Vec<_>, _>>()?;
    let round1 = Round1Message::new(elements);
    println!("Received {} blinded elements", round1.len());

    println!("\n--- Round 2: Re-Blind and Encrypt ---");
    let round2 = party_two.round_two(&round1, &mut rng)?;
    send_line(
        &mut writer,
        &Round2Wire {
            reblinded: round2.reblinded.iter().map(big_to_hex).collect(),
            pairs: round2
                .pairs
                .iter()
                .map(|(element, ciphertext)| (big_to_hex(element), big_to_hex(ciphertext)))
                .collect(),
        },
    )?;
    println!(
        "Sent Z ({} elements) and {} encrypted pairs",
        round2.reblinded.len(),
        round2.pairs.len()
    );

    println!("\n--- Round 4: Decrypt the Aggregate ---");
    let round3_wire: Round3Wire = recv_line(&mut reader)?;
    let round3 = Round3Message {
        matched_positions: round3_wire.matched_positions,
        encrypted_sum: hex_to_big(&round3_wire.encrypted_sum)?,
    };
    let result = party_two.round_four(&round3)?;

    println!("\n=== Results ===");
    println!("Intersection size: {}", result.len());
    for (key, index) in result
        .intersection_keys
        .iter()
        .zip(&result.intersection_indices)
    {
        println!("  matched: {} (input #{})", key, index);
    }
    println!("Sum over the intersection: {}", result.sum);
    println!("\n✓ Server protocol completed!");

    Ok(())
}

/// Run the client (Party 1).
fn run_client() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== PSI-Sum TCP Client (Party 1) ===");
    println!("Connecting to {}", ADDRESS);

    let stream = TcpStream::connect(ADDRESS)?;
    println!("Connected to server");
    let mut writer = stream.try_clone()?;
    let mut reader = BufReader::new(stream);

    let identifiers: Vec<String> = vec![
        "alice@example.com".to_string(),
        "bob@example.com".to_string(),
        "carol@site".to_string(),
    ];
    println!("\nClient's identifiers ({}):", identifiers.len());
    for (i, id) in identifiers.iter().enumerate() {
        println!("  {}: {}", i + 1, id);
    }

    println!("\n--- Init: Receive Session Parameters ---");
    let setup: SetupWire = recv_line(&mut reader)?;
    let n = hex_to_big(&setup.paillier_n)?;
    let params = SessionParams {
        group: GroupParams {
            modulus: hex_to_big(&setup.modulus)?,
            generator: hex_to_big(&setup.generator)?,
        },
        paillier_pk: PaillierPublicKey {
            n_squared: &n * &n,
            g: &n + 1u32,
            n,
        },
        seed: SEED.to_vec(),
    };
    println!(
        "Session: {}-bit group modulus, {}-bit Paillier modulus",
        params.group.modulus.bits(),
        params.paillier_pk.n.bits()
    );
    let party_one = PartyOne::new(params, &mut OsRng);

    println!("\n--- Round 1: Blind and Send Identifiers ---");
    let round1 = party_one.round_one(&identifiers, &mut OsRng);
    send_line(
        &mut writer,
        &Round1Wire {
            elements: round1.elements.iter().map(big_to_hex).collect(),
        },
    )?;
    println!("Sent {} blinded elements", round1.len());

    println!("\n--- Round 3: Intersect and Fold ---");
    let round2_wire: Round2Wire = recv_line(&mut reader)?;
    let round2 = Round2Message {
        reblinded: round2_wire
            .reblinded
            .iter()
            .map(|text| hex_to_big(text))
            .collect::<Result<Vec<_>, _>>()?,
        pairs: round2_wire
            .pairs
            .iter()
            .map(|(element, ciphertext)| Ok((hex_to_big(element)?, hex_to_big(ciphertext)?)))
            .collect::<Result<Vec<_>, Box<dyn std::error::Error>>>()?,
    };
    let round3 = party_one.round_three(&round2, &mut OsRng)?;
    send_line(
        &mut writer,
        &Round3Wire {
            matched_positions: round3.matched_positions.clone(),
            encrypted_sum: big_to_hex(&round3.encrypted_sum),
        },
    )?;
    println!(
        "Matched {} pairs; sent the re-randomized aggregate",
        round3.matched_positions.len()
    );

    println!("\n✓ Client protocol completed!");
    println!("✓ Only the server learns the decrypted sum");

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <server|client>", args[0]);
        eprintln!("\nRun server first: {} server", args[0]);
        eprintln!("Then run client: {} client", args[0]);
        std::process::exit(1);
    }

    match args[1].as_str() {
        "server" => run_server(),
        "client" => run_client(),
        _ => {
            eprintln!("Unknown mode: {}", args[1]);
            eprintln!("Usage: {} <server|client>", args[0]);
            std::process::exit(1);
        }
    }
}
