//! Shamir polynomial-interpolation scheme.
//!
//! The secret is the constant term of a random polynomial of degree
//! k-1 over GF(p); party i holds the evaluation (i, q(i)). Any k
//! distinct evaluations determine q, so Lagrange interpolation at
//! x = 0 recovers the secret; k-1 evaluations are consistent with
//! every possible constant term.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::RngCore;

use crate::error::ShareError;
use crate::field::{mod_inv, mod_sub, prime_above, random_below};
use crate::fragment::{Fragment, Secret};
use crate::scheme::{ThresholdScheme, check_declared_threshold, check_threshold};

/// Shamir's polynomial (k,n)-threshold scheme
#[derive(Debug, Clone, Default)]
pub struct PolynomialScheme {
    /// Field prime fixed by the caller; chosen per split when `None`
    prime: Option<BigUint>,
}

impl PolynomialScheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the field prime, mainly for deterministic tests. The prime
    /// must exceed both the secret and the party count n.
    pub fn with_prime(prime: BigUint) -> Self {
        Self { prime: Some(prime) }
    }
}

impl ThresholdScheme for PolynomialScheme {
    fn split<R: RngCore>(
        &self,
        secret: &Secret,
        k: usize,
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<Fragment>, ShareError> {
        check_threshold(k, n)?;

        let value = secret.to_biguint();
        let p = match &self.prime {
            Some(p) => p.clone(),
            None => prime_above(rng, &Secret::bound()),
        };
        if value >= p {
            return Err(ShareError::ArithmeticFailure(format!(
                "secret does not fit in the field (p = {p})"
            )));
        }
        if BigUint::from(n) >= p {
            return Err(ShareError::ArithmeticFailure(format!(
                "party count {n} does not fit in the field (p = {p})"
            )));
        }

        // q(x) = secret + a_1 x + ... + a_{k-1} x^{k-1} mod p
        let mut coefficients = Vec::with_capacity(k);
        coefficients.push(value);
        for _ in 1..k {
            coefficients.push(random_below(rng, &p));
        }

        let fragments = (1..=n)
            .map(|i| {
                let x = BigUint::from(i);
                let y = evaluate(&coefficients, &x, &p);
                Fragment::Polynomial {
                    party_id: i as u32,
                    threshold: k,
                    modulus: p.clone(),
                    x,
                    y,
                }
            })
            .collect();

        Ok(fragments)
    }

    fn combine(&self, fragments: &[Fragment]) -> Result<Secret, ShareError> {
        let (k, p, points) = validate(fragments)?;

        // Interpolate q(0) from the first k points; every division is
        // a modular inverse.
        let secret = lagrange_at(&points[..k], &BigUint::zero(), &p)?;

        // Redundancy check: extra fragments must lie on the same
        // polynomial, otherwise the set mixes two splits.
        for (x, y) in &points[k..] {
            let expected = lagrange_at(&points[..k], x, &p)?;
            if expected != *y {
                return Err(ShareError::InconsistentFragments(format!(
                    "fragment at x={x} is not on the interpolated polynomial"
                )));
            }
        }

        Secret::from_biguint(&secret)
    }
}

/// Horner evaluation of the polynomial at `x` mod `p`
fn evaluate(coefficients: &[BigUint], x: &BigUint, p: &BigUint) -> BigUint {
    coefficients
        .iter()
        .rev()
        .fold(BigUint::zero(), |acc, c| (acc * x + c) % p)
}

/// Value of the unique degree-(len-1) polynomial through `points`,
/// evaluated at `at`, via the Lagrange basis mod `p`
fn lagrange_at(
    points: &[(BigUint, BigUint)],
    at: &BigUint,
    p: &BigUint,
) -> Result<BigUint, ShareError> {
    let mut acc = BigUint::zero();
    for (j, (xj, yj)) in points.iter().enumerate() {
        let mut numerator = BigUint::one();
        let mut denominator = BigUint::one();
        for (m, (xm, _)) in points.iter().enumerate() {
            if m == j {
                continue;
            }
            numerator = (numerator * mod_sub(at, xm, p)) % p;
            denominator = (denominator * mod_sub(xj, xm, p)) % p;
        }
        let basis = (numerator * mod_inv(&denominator, p)?) % p;
        acc = (acc + yj * basis) % p;
    }
    Ok(acc)
}

/// Checks the fragment set is uniformly polynomial, shares one (p, k)
/// parameter set, has pairwise-distinct x and meets the threshold.
fn validate(fragments: &[Fragment]) -> Result<(usize, BigUint, Vec<(BigUint, BigUint)>), ShareError> {
    let first = fragments
        .first()
        .ok_or(ShareError::InsufficientFragments { got: 0, need: 1 })?;
    let (k, p) = match first {
        Fragment::Polynomial {
            threshold, modulus, ..
        } => (*threshold, modulus.clone()),
        _ => {
            return Err(ShareError::InconsistentFragments(
                "expected polynomial fragments".into(),
            ));
        }
    };
    check_declared_threshold(k, fragments.len())?;

    let mut points = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        match fragment {
            Fragment::Polynomial {
                threshold,
                modulus,
                x,
                y,
                ..
            } => {
                if *threshold != k || *modulus != p {
                    return Err(ShareError::InconsistentFragments(
                        "fragments come from different splits (mismatched p or k)".into(),
                    ));
                }
                if x.is_zero() {
                    return Err(ShareError::InconsistentFragments(
                        "evaluation point x=0 would expose the secret".into(),
                    ));
                }
                if points.iter().any(|(seen, _)| seen == x) {
                    return Err(ShareError::InconsistentFragments(format!(
                        "duplicate evaluation point x={x}"
                    )));
                }
                points.push((x.clone(), y.clone()));
            }
            _ => {
                return Err(ShareError::InconsistentFragments(
                    "mixed scheme fragments".into(),
                ));
            }
        }
    }
    Ok((k, p, points))
}
