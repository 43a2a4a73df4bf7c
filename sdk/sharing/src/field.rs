//! Modular arithmetic over arbitrary-precision unsigned integers.
//!
//! Every operation is a pure function of its inputs plus, where
//! randomness is needed, a caller-supplied `RngCore`. Exponentiation
//! is `BigUint::modpow`; this module adds the pieces num-bigint does
//! not ship: inverses, bounded uniform draws and prime selection.

use num_bigint::{BigInt, BigUint, RandBigInt, Sign};
use num_traits::{One, Zero};
use rand::RngCore;

use crate::error::ShareError;

/// Primes used for trial division before a Miller-Rabin run
const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Miller-Rabin rounds; error probability is at most 4^-64
const MILLER_RABIN_ROUNDS: usize = 64;

/// Greatest common divisor (Euclid)
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    let mut a = a.clone();
    let mut b = b.clone();
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

/// Modular multiplicative inverse of `a` mod `m` via the extended
/// Euclidean algorithm.
///
/// Fails with `ArithmeticFailure` when `gcd(a, m) != 1`, i.e. when no
/// inverse exists.
pub fn mod_inv(a: &BigUint, m: &BigUint) -> Result<BigUint, ShareError> {
    let mut old_r = BigInt::from_biguint(Sign::Plus, a.clone());
    let mut r = BigInt::from_biguint(Sign::Plus, m.clone());
    let mut old_s = BigInt::one();
    let mut s = BigInt::zero();

    while !r.is_zero() {
        let quotient = &old_r / &r;
        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    if !old_r.is_one() {
        return Err(ShareError::ArithmeticFailure(format!(
            "{a} is not invertible mod {m}"
        )));
    }

    let modulus = BigInt::from_biguint(Sign::Plus, m.clone());
    let inv = ((old_s % &modulus) + &modulus) % &modulus;
    // non-negative after the shift above
    Ok(inv.to_biguint().expect("reduced inverse is non-negative"))
}

/// `(a - b) mod m` without leaving the unsigned domain
pub fn mod_sub(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    let a = a % m;
    let b = b % m;
    if a >= b { (a - b) % m } else { (m - b + a) % m }
}

/// Uniform random integer in `[0, bound)` from the supplied source.
///
/// A zero bound degenerates to zero.
pub fn random_below<R: RngCore>(rng: &mut R, bound: &BigUint) -> BigUint {
    if bound.is_zero() {
        return BigUint::zero();
    }
    rng.gen_biguint_below(bound)
}

/// Smallest probable prime strictly greater than `bound`.
///
/// Candidates are screened by trial division against [`SMALL_PRIMES`]
/// and then subjected to [`MILLER_RABIN_ROUNDS`] Miller-Rabin rounds
/// with bases drawn from `rng`.
pub fn prime_above<R: RngCore>(rng: &mut R, bound: &BigUint) -> BigUint {
    let two = BigUint::from(2u32);
    let mut candidate = bound + 1u32;
    if candidate <= two {
        return two;
    }
    if (&candidate % 2u32).is_zero() {
        candidate += 1u32;
    }
    loop {
        if is_probable_prime(rng, &candidate) {
            return candidate;
        }
        candidate += 2u32;
    }
}

/// Miller-Rabin primality test with random bases
pub(crate) fn is_probable_prime<R: RngCore>(rng: &mut R, n: &BigUint) -> bool {
    let two = BigUint::from(2u32);
    if n < &two {
        return false;
    }
    for p in SMALL_PRIMES {
        let p = BigUint::from(p);
        if n == &p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    // write n - 1 = d * 2^s with d odd
    let n_minus_one = n - 1u32;
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while (&d % 2u32).is_zero() {
        d >>= 1;
        s += 1;
    }

    'witness: for _ in 0..MILLER_RABIN_ROUNDS {
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_gcd() {
        assert_eq!(
            gcd(&BigUint::from(12u32), &BigUint::from(18u32)),
            BigUint::from(6u32)
        );
        assert_eq!(
            gcd(&BigUint::from(17u32), &BigUint::from(31u32)),
            BigUint::from(1u32)
        );
        assert_eq!(gcd(&BigUint::zero(), &BigUint::from(5u32)), BigUint::from(5u32));
    }

    #[test]
    fn test_mod_inv() {
        let p = BigUint::from(17u32);
        for a in 1u32..17 {
            let a = BigUint::from(a);
            let inv = mod_inv(&a, &p).unwrap();
            assert_eq!((&a * &inv) % &p, BigUint::one());
        }
    }

    #[test]
    fn test_mod_inv_not_coprime() {
        let result = mod_inv(&BigUint::from(6u32), &BigUint::from(15u32));
        assert!(matches!(result, Err(ShareError::ArithmeticFailure(_))));
    }

    #[test]
    fn test_mod_sub() {
        let p = BigUint::from(17u32);
        assert_eq!(
            mod_sub(&BigUint::from(10u32), &BigUint::from(3u32), &p),
            BigUint::from(7u32)
        );
        assert_eq!(
            mod_sub(&BigUint::from(3u32), &BigUint::from(10u32), &p),
            BigUint::from(10u32)
        );
    }

    #[test]
    fn test_random_below_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let bound = BigUint::from(1000u32);
        for _ in 0..100 {
            assert!(random_below(&mut rng, &bound) < bound);
        }
        assert!(random_below(&mut rng, &BigUint::zero()).is_zero());
    }

    #[test]
    fn test_prime_above_small_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(prime_above(&mut rng, &BigUint::zero()), BigUint::from(2u32));
        assert_eq!(prime_above(&mut rng, &BigUint::from(2u32)), BigUint::from(3u32));
        assert_eq!(prime_above(&mut rng, &BigUint::from(7u32)), BigUint::from(11u32));
        assert_eq!(
            prime_above(&mut rng, &BigUint::from(100u32)),
            BigUint::from(101u32)
        );
    }

    #[test]
    fn test_prime_above_large_bound() {
        let mut rng = StdRng::seed_from_u64(7);
        let bound = BigUint::one() << 128;
        let p = prime_above(&mut rng, &bound);
        assert!(p > bound);
        assert!(is_probable_prime(&mut rng, &p));
    }

    #[test]
    fn test_is_probable_prime() {
        let mut rng = StdRng::seed_from_u64(7);
        for p in [2u32, 3, 101, 257, 65537] {
            assert!(is_probable_prime(&mut rng, &BigUint::from(p)), "{p}");
        }
        for c in [0u32, 1, 100, 255, 65535] {
            assert!(!is_probable_prime(&mut rng, &BigUint::from(c)), "{c}");
        }
    }
}
