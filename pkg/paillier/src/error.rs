use num_bigint::BigUint;

/// Errors from Paillier key construction, encryption and decryption
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaillierError {
    /// The plaintext is not in `[0, n)`
    #[error("plaintext {plaintext} is not less than the modulus {n}")]
    PlaintextOutOfRange {
        /// The rejected plaintext
        plaintext: BigUint,
        /// The modulus of the key
        n: BigUint,
    },

    /// The randomness is not an element of `Z*_n`
    #[error("randomness is not a unit modulo n")]
    InvalidRandomness,

    /// The ciphertext is not an element of `Z*_{n^2}`
    #[error("ciphertext is not a unit modulo n^2")]
    InvalidCiphertext,

    /// A value that had to be inverted has no inverse
    #[error("value has no inverse modulo {modulus}")]
    NotInvertible {
        /// The modulus the inverse was taken in
        modulus: BigUint,
    },

    /// The key material doesn't describe a valid Paillier key
    #[error("invalid modulus: {0}")]
    InvalidModulus(&'static str),
}
