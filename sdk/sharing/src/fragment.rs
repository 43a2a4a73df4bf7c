//! Data model: the 256-bit secret and the per-scheme fragment.
//!
//! A fragment is one output unit of a `split`. All fragments of one
//! split carry identical scheme parameters (field prime or moduli,
//! plus the threshold), which is what lets `combine` reject a set that
//! mixes fragments from different splits instead of silently mixing
//! them.

use num_bigint::BigUint;
use num_traits::One;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::ShareError;

/// A fragment holder identifier (1-indexed)
pub type PartyId = u32;

/// A 256-bit symmetric key, interchangeable with its big-endian
/// integer value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret([u8; 32]);

impl Secret {
    /// Width of a secret in bits
    pub const BITS: usize = 256;

    /// Exclusive upper bound on a secret's integer value, `2^256`
    pub fn bound() -> BigUint {
        BigUint::one() << Self::BITS
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Fresh random secret from the supplied entropy source
    pub fn random<R: RngCore>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Big-endian integer value of the secret
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0)
    }

    /// Rebuild a secret from a reconstructed integer.
    ///
    /// A value at or above [`Secret::bound`] indicates a corrupted or
    /// mismatched fragment set and is rejected rather than truncated.
    pub fn from_biguint(value: &BigUint) -> Result<Self, ShareError> {
        if *value >= Self::bound() {
            return Err(ShareError::ArithmeticFailure(format!(
                "reconstructed value {value} exceeds the {}-bit secret bound",
                Self::BITS
            )));
        }
        let raw = value.to_bytes_be();
        let mut bytes = [0u8; 32];
        bytes[32 - raw.len()..].copy_from_slice(&raw);
        Ok(Self(bytes))
    }
}

impl From<u64> for Secret {
    fn from(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }
}

/// One fragment of a split secret, tagged by scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fragment {
    /// One hyperplane through the secret point in GF(p)^k
    Geometric {
        party_id: PartyId,
        threshold: usize,
        /// Field prime p
        modulus: BigUint,
        /// Hyperplane coefficient vector, length k
        coefficients: Vec<BigUint>,
        /// Constant term `b = a . x mod p`
        constant: BigUint,
    },
    /// One evaluation `(x, q(x))` of the secret polynomial mod p
    Polynomial {
        party_id: PartyId,
        threshold: usize,
        /// Field prime p
        modulus: BigUint,
        /// Evaluation point, never zero
        x: BigUint,
        /// Evaluation value `q(x) mod p`
        y: BigUint,
    },
    /// One residue of the lifted secret `M = S + r*m0` modulo `m_i`
    Congruence {
        party_id: PartyId,
        threshold: usize,
        /// Auxiliary modulus m0 shared by every fragment of the split
        aux_modulus: BigUint,
        /// This party's modulus `m_i`, pairwise coprime across the split
        modulus: BigUint,
        /// `M mod m_i`
        residue: BigUint,
    },
}

impl Fragment {
    pub fn party_id(&self) -> PartyId {
        match self {
            Fragment::Geometric { party_id, .. }
            | Fragment::Polynomial { party_id, .. }
            | Fragment::Congruence { party_id, .. } => *party_id,
        }
    }

    /// Threshold k declared at split time
    pub fn threshold(&self) -> usize {
        match self {
            Fragment::Geometric { threshold, .. }
            | Fragment::Polynomial { threshold, .. }
            | Fragment::Congruence { threshold, .. } => *threshold,
        }
    }
}
