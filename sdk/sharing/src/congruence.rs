//! Asmuth-Bloom congruence (CRT) scheme.
//!
//! The secret is lifted to `M = S + r*m0` for a random r, with m0 a
//! prime above the secret bound, and each party holds `M mod m_i` for
//! pairwise-coprime increasing primes m_1 < ... < m_n. Any k residues
//! pin M down exactly (the product of any k moduli exceeds M's range);
//! fewer leave M, and therefore `M mod m0`, undetermined.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::RngCore;

use crate::error::ShareError;
use crate::field::{gcd, mod_inv, prime_above, random_below};
use crate::fragment::{Fragment, Secret};
use crate::scheme::{ThresholdScheme, check_declared_threshold, check_threshold};

/// Asmuth-Bloom's congruence (k,n)-threshold scheme
#[derive(Debug, Clone, Default)]
pub struct CongruenceScheme;

impl CongruenceScheme {
    pub fn new() -> Self {
        Self
    }
}

/// Slack bits between the secret bound and m0. A reconstruction from
/// a corrupted or mismatched set lands anywhere in `[0, m0)`, so the
/// slack is what makes the out-of-bound check actually fire.
const AUX_SLACK_BITS: usize = 64;

/// Picks m0 and n increasing pairwise-coprime prime moduli sized so
/// the product of the k smallest exceeds `m0 * 2^256`.
///
/// The sizing also keeps the product of the k-1 largest times m0 below
/// the product of the k smallest, which is the scheme's security
/// margin; both conditions are validated, not assumed.
fn select_moduli<R: RngCore>(
    rng: &mut R,
    k: usize,
    n: usize,
) -> Result<(BigUint, Vec<BigUint>), ShareError> {
    let m0 = prime_above(rng, &(BigUint::one() << (Secret::BITS + AUX_SLACK_BITS)));

    let m0_bits = m0.bits() as usize;
    let bits = usize::max(m0_bits + 1, (m0_bits + Secret::BITS) / k + 1);
    let base = BigUint::one() << bits;

    let mut moduli = Vec::with_capacity(n);
    let mut last = base;
    for _ in 0..n {
        last = prime_above(rng, &last);
        moduli.push(last.clone());
    }

    for m in &moduli {
        if !gcd(m, &m0).is_one() {
            return Err(ShareError::ArithmeticFailure(format!(
                "modulus {m} is not coprime to m0"
            )));
        }
    }
    let smallest_k: BigUint = moduli[..k].iter().product();
    if smallest_k <= &m0 * Secret::bound() {
        return Err(ShareError::ArithmeticFailure(
            "modulus set too small: product of the k smallest moduli must exceed m0 * 2^256"
                .into(),
        ));
    }
    let largest_k_minus_one: BigUint = moduli[n - (k - 1)..].iter().product();
    if &m0 * largest_k_minus_one >= smallest_k {
        return Err(ShareError::ArithmeticFailure(
            "modulus set violates the Asmuth-Bloom security margin".into(),
        ));
    }

    Ok((m0, moduli))
}

impl ThresholdScheme for CongruenceScheme {
    fn split<R: RngCore>(
        &self,
        secret: &Secret,
        k: usize,
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<Fragment>, ShareError> {
        check_threshold(k, n)?;

        let (m0, moduli) = select_moduli(rng, k, n)?;
        let value = secret.to_biguint();

        // M = S + r*m0 with 0 <= M < product of the k smallest moduli
        let smallest_k: BigUint = moduli[..k].iter().product();
        let r_bound = (&smallest_k - &value) / &m0;
        let r = random_below(rng, &r_bound);
        let lifted = &value + r * &m0;

        let fragments = moduli
            .into_iter()
            .enumerate()
            .map(|(i, m)| Fragment::Congruence {
                party_id: (i + 1) as u32,
                threshold: k,
                aux_modulus: m0.clone(),
                residue: &lifted % &m,
                modulus: m,
            })
            .collect();

        Ok(fragments)
    }

    fn combine(&self, fragments: &[Fragment]) -> Result<Secret, ShareError> {
        let (m0, residues) = validate(fragments)?;

        // CRT over exactly the moduli present: M mod prod(m_i) is the
        // lifted secret, provided the fragments came from one split.
        let product: BigUint = residues.iter().map(|(m, _)| m).product();
        let mut lifted = BigUint::zero();
        for (m, y) in &residues {
            let z = &product / m;
            let b = mod_inv(&z, m)?;
            lifted = (lifted + y * z * b) % &product;
        }

        Secret::from_biguint(&(lifted % m0))
    }
}

/// Checks the fragment set is uniformly congruence-scheme, shares one
/// (m0, k) parameter set, has pairwise-coprime moduli and meets the
/// threshold.
fn validate(fragments: &[Fragment]) -> Result<(BigUint, Vec<(BigUint, BigUint)>), ShareError> {
    let first = fragments
        .first()
        .ok_or(ShareError::InsufficientFragments { got: 0, need: 1 })?;
    let (k, m0) = match first {
        Fragment::Congruence {
            threshold,
            aux_modulus,
            ..
        } => (*threshold, aux_modulus.clone()),
        _ => {
            return Err(ShareError::InconsistentFragments(
                "expected congruence fragments".into(),
            ));
        }
    };
    check_declared_threshold(k, fragments.len())?;

    let mut residues: Vec<(BigUint, BigUint)> = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        match fragment {
            Fragment::Congruence {
                threshold,
                aux_modulus,
                modulus,
                residue,
                ..
            } => {
                if *threshold != k || *aux_modulus != m0 {
                    return Err(ShareError::InconsistentFragments(
                        "fragments come from different splits (mismatched m0 or k)".into(),
                    ));
                }
                for (seen, _) in &residues {
                    if !gcd(seen, modulus).is_one() {
                        return Err(ShareError::InconsistentFragments(format!(
                            "moduli {seen} and {modulus} are not coprime"
                        )));
                    }
                }
                residues.push((modulus.clone(), residue.clone()));
            }
            _ => {
                return Err(ShareError::InconsistentFragments(
                    "mixed scheme fragments".into(),
                ));
            }
        }
    }
    Ok((m0, residues))
}
