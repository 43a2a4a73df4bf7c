//! Blakley hyperplane-intersection scheme.
//!
//! The secret is fixed as the first coordinate of a point in GF(p)^k.
//! Each party holds one random hyperplane passing through that point;
//! any k independent hyperplanes intersect in the point alone, while
//! fewer leave a positive-dimensional flat that pins down nothing.
//!
//! Reconstruction solves the strict k-equation system from the first k
//! fragments (extra fragments are ignored once consistency is checked)
//! by Gaussian elimination mod p with partial pivoting.

use num_bigint::BigUint;
use num_traits::Zero;
use rand::RngCore;

use crate::error::ShareError;
use crate::field::{mod_inv, mod_sub, prime_above, random_below};
use crate::fragment::{Fragment, Secret};
use crate::scheme::{ThresholdScheme, check_declared_threshold, check_threshold};

/// Blakley's geometric (k,n)-threshold scheme
#[derive(Debug, Clone, Default)]
pub struct GeometricScheme {
    /// Field prime fixed by the caller; chosen per split when `None`
    prime: Option<BigUint>,
}

impl GeometricScheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the field prime, mainly for deterministic tests. The prime
    /// must exceed every secret split with it.
    pub fn with_prime(prime: BigUint) -> Self {
        Self { prime: Some(prime) }
    }
}

impl ThresholdScheme for GeometricScheme {
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

        // The secret point: first coordinate is the secret itself
        let mut point = Vec::with_capacity(k);
        point.push(value);
        for _ in 1..k {
            point.push(random_below(rng, &p));
        }

        let fragments = (1..=n)
            .map(|party| {
                // non-degenerate: at least one nonzero coefficient
                let coefficients = loop {
                    let row: Vec<BigUint> = (0..k).map(|_| random_below(rng, &p)).collect();
                    if row.iter().any(|c| !c.is_zero()) {
                        break row;
                    }
                };
                let constant = coefficients
                    .iter()
                    .zip(point.iter())
                    .fold(BigUint::zero(), |acc, (a, x)| (acc + a * x) % &p);
                Fragment::Geometric {
                    party_id: party as u32,
                    threshold: k,
                    modulus: p.clone(),
                    coefficients,
                    constant,
                }
            })
            .collect();

        Ok(fragments)
    }

    fn combine(&self, fragments: &[Fragment]) -> Result<Secret, ShareError> {
        let (k, p) = validate(fragments)?;

        // Augmented k x (k+1) matrix [A | b] from the first k fragments
        let mut rows: Vec<Vec<BigUint>> = fragments[..k]
            .iter()
            .map(|fragment| match fragment {
                Fragment::Geometric {
                    coefficients,
                    constant,
                    ..
                } => {
                    let mut row = coefficients.clone();
                    row.push(constant.clone());
                    row
                }
                _ => unreachable!("validated as geometric"),
            })
            .collect();

        // Gauss-Jordan elimination mod p with partial pivoting: for
        // each column pick the first row whose pivot entry is
        // invertible mod p.
        for col in 0..k {
            let pivot = (col..k)
                .find(|&r| !rows[r][col].is_zero() && mod_inv(&rows[r][col], &p).is_ok())
                .ok_or_else(|| {
                    ShareError::ArithmeticFailure(
                        "singular system: hyperplanes are not independent".into(),
                    )
                })?;
            rows.swap(col, pivot);

            let inv = mod_inv(&rows[col][col], &p)?;
            for entry in rows[col].iter_mut() {
                *entry = (&*entry * &inv) % &p;
            }

            for r in 0..k {
                if r == col || rows[r][col].is_zero() {
                    continue;
                }
                let factor = rows[r][col].clone();
                for c in 0..=k {
                    let scaled = (&factor * &rows[col][c]) % &p;
                    let reduced = mod_sub(&rows[r][c], &scaled, &p);
                    rows[r][c] = reduced;
                }
            }
        }

        // Unique solution; the secret is the first coordinate
        Secret::from_biguint(&rows[0][k])
    }
}

/// Checks the fragment set is uniformly geometric, shares one (p, k)
/// parameter set, and meets the threshold.
fn validate(fragments: &[Fragment]) -> Result<(usize, BigUint), ShareError> {
    let first = fragments
        .first()
        .ok_or(ShareError::InsufficientFragments { got: 0, need: 1 })?;
    let (k, p) = match first {
        Fragment::Geometric {
            threshold, modulus, ..
        } => (*threshold, modulus.clone()),
        _ => {
            return Err(ShareError::InconsistentFragments(
                "expected geometric fragments".into(),
            ));
        }
    };
    check_declared_threshold(k, fragments.len())?;

    for fragment in fragments {
        match fragment {
            Fragment::Geometric {
                threshold,
                modulus,
                coefficients,
                ..
            } => {
                if *threshold != k || *modulus != p {
                    return Err(ShareError::InconsistentFragments(
                        "fragments come from different splits (mismatched p or k)".into(),
                    ));
                }
                if coefficients.len() != k {
                    return Err(ShareError::InconsistentFragments(format!(
                        "hyperplane has {} coefficients, expected {k}",
                        coefficients.len()
                    )));
                }
            }
            _ => {
                return Err(ShareError::InconsistentFragments(
                    "mixed scheme fragments".into(),
                ));
            }
        }
    }
    Ok((k, p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn test_scheme() -> GeometricScheme {
        GeometricScheme::with_prime(BigUint::from(1_000_003u64))
    }

    #[test]
    fn test_split_combine_roundtrip() {
        let mut rng = StdRng::seed_from_u64(11);
        let scheme = test_scheme();
        let secret = Secret::from(987_654);

        let fragments = scheme.split(&secret, 3, 5, &mut rng).unwrap();
        assert_eq!(fragments.len(), 5);

        assert_eq!(scheme.combine(&fragments[0..3]).unwrap(), secret);
        assert_eq!(scheme.combine(&fragments[1..4]).unwrap(), secret);
        assert_eq!(scheme.combine(&fragments[2..5]).unwrap(), secret);
    }

    #[test]
    fn test_any_k_subset_reconstructs() {
        let mut rng = StdRng::seed_from_u64(12);
        let scheme = test_scheme();
        let secret = Secret::from(31_337);
        let fragments = scheme.split(&secret, 2, 4, &mut rng).unwrap();

        for i in 0..4 {
            for j in (i + 1)..4 {
                let subset = [fragments[i].clone(), fragments[j].clone()];
                assert_eq!(scheme.combine(&subset).unwrap(), secret);
            }
        }
    }

    #[test]
    fn test_full_width_secret_with_generated_prime() {
        let mut rng = StdRng::seed_from_u64(13);
        let scheme = GeometricScheme::new();
        let secret = Secret::from_biguint(&(Secret::bound() - 1u32)).unwrap();

        let fragments = scheme.split(&secret, 2, 3, &mut rng).unwrap();
        assert_eq!(scheme.combine(&fragments[1..]).unwrap(), secret);
    }

    #[test]
    fn test_insufficient_fragments() {
        let mut rng = StdRng::seed_from_u64(14);
        let scheme = test_scheme();
        let fragments = scheme.split(&Secret::from(5), 3, 5, &mut rng).unwrap();

        let result = scheme.combine(&fragments[0..2]);
        assert!(matches!(
            result,
            Err(ShareError::InsufficientFragments { got: 2, need: 3 })
        ));
        assert!(matches!(
            scheme.combine(&[]),
            Err(ShareError::InsufficientFragments { .. })
        ));
    }

    #[test]
    fn test_dependent_hyperplanes_fail() {
        let mut rng = StdRng::seed_from_u64(15);
        let scheme = test_scheme();
        let fragments = scheme.split(&Secret::from(5), 3, 5, &mut rng).unwrap();

        // The same hyperplane twice makes the system singular
        let dependent = [
            fragments[0].clone(),
            fragments[0].clone(),
            fragments[1].clone(),
        ];
        let result = scheme.combine(&dependent);
        assert!(matches!(result, Err(ShareError::ArithmeticFailure(_))));
    }

    #[test]
    fn test_mixed_splits_rejected() {
        let mut rng = StdRng::seed_from_u64(16);
        let scheme = test_scheme();
        let other = GeometricScheme::with_prime(BigUint::from(2_000_003u64));
        let secret = Secret::from(77);

        let mut fragments = scheme.split(&secret, 2, 3, &mut rng).unwrap();
        let foreign = other.split(&secret, 2, 3, &mut rng).unwrap();
        fragments[1] = foreign[1].clone();

        let result = scheme.combine(&fragments[0..2]);
        assert!(matches!(result, Err(ShareError::InconsistentFragments(_))));
    }

    #[test]
    fn test_two_splits_differ_but_agree_on_secret() {
        let mut rng = StdRng::seed_from_u64(17);
        let scheme = test_scheme();
        let secret = Secret::from(123_456);

        let a = scheme.split(&secret, 2, 3, &mut rng).unwrap();
        let b = scheme.split(&secret, 2, 3, &mut rng).unwrap();
        assert_ne!(a, b);
        assert_eq!(scheme.combine(&a[0..2]).unwrap(), secret);
        assert_eq!(scheme.combine(&b[0..2]).unwrap(), secret);
    }

    #[test]
    fn test_secret_must_fit_in_field() {
        let mut rng = StdRng::seed_from_u64(18);
        let scheme = GeometricScheme::with_prime(BigUint::from(101u32));
        let result = scheme.split(&Secret::from(500), 2, 3, &mut rng);
        assert!(matches!(result, Err(ShareError::ArithmeticFailure(_))));
    }

    #[test]
    fn test_k_equals_one() {
        let mut rng = StdRng::seed_from_u64(19);
        let scheme = test_scheme();
        let secret = Secret::from(42);
        let fragments = scheme.split(&secret, 1, 3, &mut rng).unwrap();
        assert_eq!(scheme.combine(&fragments[2..3]).unwrap(), secret);
    }
}
