use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::PaillierError;

/// `a^-1 mod modulus`
pub(crate) fn mod_inverse(a: &BigUint, modulus: &BigUint) -> Result<BigUint, PaillierError> {
    let not_invertible = || PaillierError::NotInvertible {
        modulus: modulus.clone(),
    };

    if modulus.is_zero() {
        return Err(not_invertible());
    }

    let modulus_int = BigInt::from_biguint(Sign::Plus, modulus.clone());

    let (mut old_r, mut r) = (BigInt::from_biguint(Sign::Plus, a % modulus), modulus_int.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let quotient = &old_r / &r;
        (old_r, r) = (r.clone(), old_r - &quotient * &r);
        (old_s, s) = (s.clone(), old_s - &quotient * &s);
    }

    if !old_r.is_one() {
        return Err(not_invertible());
    }

    old_s
        .mod_floor(&modulus_int)
        .to_biguint()
        .ok_or_else(not_invertible)
}

/// Whether `a` is a unit modulo `modulus`, i.e. `0 < a < modulus` and `gcd(a, modulus) == 1`
pub(crate) fn is_unit(a: &BigUint, modulus: &BigUint) -> bool {
    !a.is_zero() && a < modulus && a.gcd(modulus).is_one()
}

/// The Paillier `L` function, `(x - 1) / n`
pub(crate) fn l_function(x: &BigUint, n: &BigUint) -> BigUint {
    (x - 1u32) / n
}
