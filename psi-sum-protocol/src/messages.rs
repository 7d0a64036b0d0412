//! Round payloads exchanged between the two parties.
//!
//! The library treats both parties as in-process collaborators handing
//! these structs back and forth. A deployment that separates them must add
//! a transport layer serializing every big integer with a fixed,
//! unambiguous encoding (the `tcp_sum` example uses minimal big-endian
//! bytes in hex).

use crate::paillier::Ciphertext;
use num_bigint::BigUint;

/// Party 1's opening message: its identifiers hashed into the group,
/// blinded by `k1` and shuffled.
///
/// The shuffle destroys the positional link with Party 1's input order; a
/// receiver learns the set size and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round1Message {
    /// Blinded group elements, one per identifier occurrence.
    pub elements: Vec<BigUint>,
}

impl Round1Message {
    pub fn new(elements: Vec<BigUint>) -> Self {
        Self { elements }
    }

    /// Number of blinded elements carried.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when Party 1's set was empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Party 2's reply: Party 1's elements re-blinded by `k2` (the set `Z`),
/// plus Party 2's own blinded identifiers paired with their encrypted
/// values. Both lists are shuffled before sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round2Message {
    /// `Z`: every Round 1 element raised to `k2`.
    pub reblinded: Vec<BigUint>,
    /// `(H(id)^k2, Enc(value))` for each of Party 2's pairs.
    pub pairs: Vec<(BigUint, Ciphertext)>,
}

/// Party 1's closing message: which received pairs matched, and the
/// re-randomized homomorphic sum of their ciphertexts.
///
/// `matched_positions` index into `Round2Message::pairs`. Only Party 2 can
/// translate them back to identifiers, because only it knows the
/// permutation it applied before sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round3Message {
    pub matched_positions: Vec<usize>,
    pub encrypted_sum: Ciphertext,
}

/// Terminal output of a PSI-Sum session, produced by Party 2.
///
/// Party 2 learns the aggregate and which of its own pairs matched; which
/// of Party 1's identifiers matched stays hidden beyond that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsiSumResult {
    /// Identifiers from Party 2's input that also occur in Party 1's set,
    /// in Party 2's input order.
    pub intersection_keys: Vec<String>,
    /// Positions of those identifiers in Party 2's input.
    pub intersection_indices: Vec<usize>,
    /// Sum of the values attached to the matched pairs, reduced modulo the
    /// Paillier modulus.
    pub sum: BigUint,
}

impl PsiSumResult {
    /// Number of Party 2 pairs in the intersection.
    pub fn len(&self) -> usize {
        self.intersection_keys.len()
    }

    /// True when the intersection is empty. A valid outcome, not an error;
    /// the sum is zero in that case.
    pub fn is_empty(&self) -> bool {
        self.intersection_keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;

    #[test]
    fn test_round1_message() {
        let msg = Round1Message::new(vec![BigUint::from(7u32), BigUint::from(11u32)]);
        assert_eq!(msg.len(), 2);
        assert!(!msg.is_empty());

        let empty = Round1Message::new(vec![]);
        assert_eq!(empty.len(), 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_result_len() {
        let result = PsiSumResult {
            intersection_keys: vec!["alice".to_string()],
            intersection_indices: vec![3],
            sum: BigUint::from(2u32),
        };
        assert_eq!(result.len(), 1);
        assert!(!result.is_empty());
    }

    #[test]
    fn test_empty_result() {
        let result = PsiSumResult {
            intersection_keys: vec![],
            intersection_indices: vec![],
            sum: BigUint::zero(),
        };
        assert!(result.is_empty());
        assert!(result.sum.is_zero());
    }
}
