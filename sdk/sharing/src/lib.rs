//! Keyshard Secret Sharing
//!
//! Splits a 256-bit payload key into n fragments under a
//! (k,n)-threshold guarantee: any k fragments reconstruct the key
//! exactly, any k-1 or fewer reveal nothing useful. Three independent
//! constructions sit behind one split/combine contract.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Split / Combine Flow                      │
//! │                                                                │
//! │  key ──▶ Scheme::split ──▶ n Fragments ──▶ codec ──▶ text      │
//! │                                                                │
//! │  text ──▶ codec ──▶ k..n Fragments ──▶ Scheme::combine ──▶ key │
//! │                                                                │
//! │  Schemes:                                                      │
//! │  • Geometric   (Blakley)       hyperplane intersection GF(p)   │
//! │  • Polynomial  (Shamir)        Lagrange interpolation  GF(p)   │
//! │  • Congruence  (Asmuth-Bloom)  CRT over coprime moduli         │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine performs no I/O and holds no global state; every split
//! takes an injected randomness source, so callers can run splits
//! concurrently or reproduce them in tests with a seeded rng.

pub mod codec;
pub mod congruence;
pub mod error;
pub mod field;
pub mod fragment;
pub mod geometric;
pub mod polynomial;
pub mod scheme;
pub mod sealed;

pub use codec::{decode_fragment, decode_fragments, encode_fragment, encode_fragments};
pub use congruence::CongruenceScheme;
pub use error::ShareError;
pub use fragment::{Fragment, PartyId, Secret};
pub use geometric::GeometricScheme;
pub use polynomial::PolynomialScheme;
pub use scheme::{Scheme, ThresholdScheme};
pub use sealed::{ChaChaPayloadCipher, PayloadCipher};
