//! Uniform split/combine contract over the three schemes.
//!
//! Callers are scheme-agnostic: they hold a [`Scheme`] value (a closed
//! set of exactly three variants) and call `split`/`combine` through
//! the shared [`ThresholdScheme`] trait.

use std::str::FromStr;

use rand::RngCore;

use crate::congruence::CongruenceScheme;
use crate::error::ShareError;
use crate::fragment::{Fragment, Secret};
use crate::geometric::GeometricScheme;
use crate::polynomial::PolynomialScheme;

/// The (k,n)-threshold contract every scheme implements identically
/// from the caller's perspective.
pub trait ThresholdScheme {
    /// Split `secret` into `n` fragments, any `k` of which reconstruct
    /// it. Validates `1 <= k <= n` before doing anything else.
    fn split<R: RngCore>(
        &self,
        secret: &Secret,
        k: usize,
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<Fragment>, ShareError>;

    /// Reconstruct the secret from a subset of fragments, or fail with
    /// a typed error. Never returns a plausible-but-wrong secret.
    fn combine(&self, fragments: &[Fragment]) -> Result<Secret, ShareError>;
}

/// Scheme selection by value
#[derive(Debug, Clone)]
pub enum Scheme {
    Geometric(GeometricScheme),
    Polynomial(PolynomialScheme),
    Congruence(CongruenceScheme),
}

impl Scheme {
    pub fn geometric() -> Self {
        Scheme::Geometric(GeometricScheme::new())
    }

    pub fn polynomial() -> Self {
        Scheme::Polynomial(PolynomialScheme::new())
    }

    pub fn congruence() -> Self {
        Scheme::Congruence(CongruenceScheme::new())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scheme::Geometric(_) => "geometric",
            Scheme::Polynomial(_) => "polynomial",
            Scheme::Congruence(_) => "congruence",
        }
    }
}

impl FromStr for Scheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "geometric" | "blakley" => Ok(Scheme::geometric()),
            "polynomial" | "shamir" => Ok(Scheme::polynomial()),
            "congruence" | "asmuth-bloom" => Ok(Scheme::congruence()),
            other => Err(format!(
                "unknown scheme '{other}' (expected geometric, polynomial or congruence)"
            )),
        }
    }
}

impl ThresholdScheme for Scheme {
    fn split<R: RngCore>(
        &self,
        secret: &Secret,
        k: usize,
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<Fragment>, ShareError> {
        match self {
            Scheme::Geometric(s) => s.split(secret, k, n, rng),
            Scheme::Polynomial(s) => s.split(secret, k, n, rng),
            Scheme::Congruence(s) => s.split(secret, k, n, rng),
        }
    }

    fn combine(&self, fragments: &[Fragment]) -> Result<Secret, ShareError> {
        match self {
            Scheme::Geometric(s) => s.combine(fragments),
            Scheme::Polynomial(s) => s.combine(fragments),
            Scheme::Congruence(s) => s.combine(fragments),
        }
    }
}

/// Shared split-time validation of the threshold parameters
pub(crate) fn check_threshold(k: usize, n: usize) -> Result<(), ShareError> {
    if k < 1 || k > n {
        return Err(ShareError::InvalidParameters { k, n });
    }
    Ok(())
}

/// Shared combine-time validation of a declared threshold carried in
/// fragments (a decoded record could claim k = 0).
pub(crate) fn check_declared_threshold(k: usize, got: usize) -> Result<(), ShareError> {
    if k < 1 {
        return Err(ShareError::InconsistentFragments(
            "fragments declare a zero threshold".into(),
        ));
    }
    if got < k {
        return Err(ShareError::InsufficientFragments { got, need: k });
    }
    Ok(())
}
