use num_bigint::BigUint;
use paillier::{Ciphertext, PrivateKey, PublicKey, Randomness};
use zk_primitives::Element;

use crate::{
    witness::{to_big, to_field},
    WitnessError,
};

/// A public key input `[g, r, n]`, which carries the randomness of the ciphertext encrypted
/// under it
pub(crate) fn public_key_input(
    pk: &PublicKey,
    r: &Randomness,
    field: &'static str,
) -> Result<[Element; 3], WitnessError> {
    Ok([
        to_field(pk.g(), field)?,
        to_field(r.value(), field)?,
        to_field(pk.n(), field)?,
    ])
}

/// A private key input `[λ, μ, n]`
pub(crate) fn private_key_input(
    sk: &PrivateKey,
    field: &'static str,
) -> Result<[Element; 3], WitnessError> {
    Ok([
        to_field(sk.lambda(), field)?,
        to_field(sk.mu(), field)?,
        to_field(sk.n(), field)?,
    ])
}

/// Parse a `[g, r, n]` input back into a key and randomness
pub(crate) fn parse_public_key(
    [g, r, n]: [Element; 3],
) -> Result<(PublicKey, Randomness), WitnessError> {
    let pk = PublicKey::with_generator(to_big(n), to_big(g))?;
    let r = Randomness::new(&pk, to_big(r))?;
    Ok((pk, r))
}

/// Parse a `[λ, μ, n]` input, checking that it belongs to `pk`
pub(crate) fn parse_private_key(
    [lambda, mu, n]: [Element; 3],
    pk: &PublicKey,
    field: &'static str,
) -> Result<PrivateKey, WitnessError> {
    if &to_big(n) != pk.n() {
        return Err(WitnessError::KeyMismatch { field });
    }

    PrivateKey::new(to_big(lambda), to_big(mu), pk.clone())
        .map_err(|_| WitnessError::KeyMismatch { field })
}

/// Decrypt `balance` and check that it covers `value`
pub(crate) fn check_sufficient(
    sk: &PrivateKey,
    balance: &Ciphertext,
    value: &BigUint,
) -> Result<(), WitnessError> {
    let available = sk.decrypt(balance)?;
    if value > &available {
        return Err(WitnessError::InsufficientBalance);
    }

    Ok(())
}

/// A ciphertext under `pk` must be a field element for the circuit to take it as an input
pub(crate) fn ciphertext_input(
    c: &Ciphertext,
    field: &'static str,
) -> Result<Element, WitnessError> {
    to_field(c.value(), field)
}

pub(crate) fn ciphertext(element: Element) -> Ciphertext {
    Ciphertext::new(to_big(element))
}
