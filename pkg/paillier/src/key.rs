use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

use crate::{
    math::{is_unit, l_function, mod_inverse},
    Ciphertext, PaillierError, Randomness,
};

/// A Paillier public key `(n, g)`
///
/// All homomorphic operations live here, since they only need `n^2`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PublicKey {
    #[cfg_attr(feature = "serde", serde(with = "crate::decimal"))]
    n: BigUint,
    #[cfg_attr(feature = "serde", serde(with = "crate::decimal"))]
    g: BigUint,
    #[cfg_attr(feature = "serde", serde(with = "crate::decimal"))]
    n_squared: BigUint,
}

impl PublicKey {
    /// A public key with the standard generator `g = n + 1`
    pub fn new(n: BigUint) -> Result<Self, PaillierError> {
        let g = &n + 1u32;
        Self::with_generator(n, g)
    }

    /// A public key with an explicit generator
    ///
    /// `g` must be a unit modulo `n^2`. Whether its order is a multiple of `n` is only checked
    /// when a [`PrivateKey`] is derived for it.
    pub fn with_generator(n: BigUint, g: BigUint) -> Result<Self, PaillierError> {
        if n <= BigUint::one() {
            return Err(PaillierError::InvalidModulus("n must be greater than 1"));
        }

        let n_squared = &n * &n;
        if !is_unit(&g, &n_squared) {
            return Err(PaillierError::InvalidModulus("g is not a unit modulo n^2"));
        }

        Ok(Self { n, g, n_squared })
    }

    /// The modulus `n`
    #[must_use]
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// The generator `g`
    #[must_use]
    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// `n^2`, the modulus ciphertexts live in
    #[must_use]
    pub fn n_squared(&self) -> &BigUint {
        &self.n_squared
    }

    /// Encrypt `m` with freshly sampled randomness
    ///
    /// The randomness is returned as well, since circuits need it as a witness
    pub fn encrypt<R: RngCore + CryptoRng>(
        &self,
        m: &BigUint,
        rng: &mut R,
    ) -> Result<(Ciphertext, Randomness), PaillierError> {
        let r = Randomness::sample(self, rng);
        let c = self.encrypt_with(m, &r)?;
        Ok((c, r))
    }

    /// Encrypt `m` with known randomness: `g^m * r^n mod n^2`
    pub fn encrypt_with(&self, m: &BigUint, r: &Randomness) -> Result<Ciphertext, PaillierError> {
        if m >= &self.n {
            return Err(PaillierError::PlaintextOutOfRange {
                plaintext: m.clone(),
                n: self.n.clone(),
            });
        }

        if !r.is_valid_for(self) {
            return Err(PaillierError::InvalidRandomness);
        }

        let gm = self.g_pow(m);
        let rn = r.value().modpow(&self.n, &self.n_squared);

        Ok(Ciphertext::new(gm * rn % &self.n_squared))
    }

    /// Encrypt `n - m` with freshly sampled randomness, i.e. the additive inverse of `m`
    ///
    /// Adding the result to a balance debits `m` from it
    pub fn encrypt_negated<R: RngCore + CryptoRng>(
        &self,
        m: &BigUint,
        rng: &mut R,
    ) -> Result<(Ciphertext, Randomness), PaillierError> {
        let r = Randomness::sample(self, rng);
        let c = self.encrypt_negated_with(m, &r)?;
        Ok((c, r))
    }

    /// Encrypt `n - m` with known randomness
    ///
    /// `m = 0` encrypts `0`, since `n` itself is not a valid plaintext
    pub fn encrypt_negated_with(
        &self,
        m: &BigUint,
        r: &Randomness,
    ) -> Result<Ciphertext, PaillierError> {
        let negated = self.negate_plaintext(m)?;
        self.encrypt_with(&negated, r)
    }

    /// `(n - m) mod n`
    pub fn negate_plaintext(&self, m: &BigUint) -> Result<BigUint, PaillierError> {
        if m >= &self.n {
            return Err(PaillierError::PlaintextOutOfRange {
                plaintext: m.clone(),
                n: self.n.clone(),
            });
        }

        Ok((&self.n - m) % &self.n)
    }

    /// A ciphertext of the sum of the plaintexts of `c1` and `c2`, modulo `n`
    #[must_use]
    pub fn add(&self, c1: &Ciphertext, c2: &Ciphertext) -> Ciphertext {
        Ciphertext::new(c1.value() * c2.value() % &self.n_squared)
    }

    /// A ciphertext of the plaintext of `c` plus `m`, modulo `n`
    ///
    /// The result has the same randomness as `c`, so it should be [re-randomized] before it is
    /// published.
    ///
    /// [re-randomized]: PublicKey::rerandomize
    pub fn add_plain(&self, c: &Ciphertext, m: &BigUint) -> Result<Ciphertext, PaillierError> {
        if m >= &self.n {
            return Err(PaillierError::PlaintextOutOfRange {
                plaintext: m.clone(),
                n: self.n.clone(),
            });
        }

        Ok(Ciphertext::new(c.value() * self.g_pow(m) % &self.n_squared))
    }

    /// A ciphertext of `n` minus the plaintext of `c`, i.e. `c^-1 mod n^2`
    pub fn negate(&self, c: &Ciphertext) -> Result<Ciphertext, PaillierError> {
        mod_inverse(c.value(), &self.n_squared).map(Ciphertext::new)
    }

    /// A ciphertext of the plaintext of `c1` minus the plaintext of `c2`, modulo `n`
    pub fn sub(&self, c1: &Ciphertext, c2: &Ciphertext) -> Result<Ciphertext, PaillierError> {
        let negated = self.negate(c2)?;
        Ok(self.add(c1, &negated))
    }

    /// A fresh ciphertext of the same plaintext: `c * r^n mod n^2`
    pub fn rerandomize<R: RngCore + CryptoRng>(
        &self,
        c: &Ciphertext,
        rng: &mut R,
    ) -> (Ciphertext, Randomness) {
        let r = Randomness::sample(self, rng);
        let rn = r.value().modpow(&self.n, &self.n_squared);

        (Ciphertext::new(c.value() * rn % &self.n_squared), r)
    }

    /// Whether `c` is a well-formed ciphertext for this key
    #[must_use]
    pub fn is_valid_ciphertext(&self, c: &Ciphertext) -> bool {
        is_unit(c.value(), &self.n_squared)
    }

    /// `g^m mod n^2`, using `(n + 1)^m = 1 + m * n mod n^2` for the standard generator
    fn g_pow(&self, m: &BigUint) -> BigUint {
        if self.g == &self.n + 1u32 {
            (BigUint::one() + m * &self.n) % &self.n_squared
        } else {
            self.g.modpow(m, &self.n_squared)
        }
    }
}

/// A Paillier private key `(λ, μ)`, together with its public key
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PrivateKey {
    #[cfg_attr(feature = "serde", serde(with = "crate::decimal"))]
    lambda: BigUint,
    #[cfg_attr(feature = "serde", serde(with = "crate::decimal"))]
    mu: BigUint,
    public_key: PublicKey,
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

impl PrivateKey {
    /// Build a private key from `λ` and `μ`
    ///
    /// `μ` is checked to be consistent with `λ` and the generator
    pub fn new(lambda: BigUint, mu: BigUint, public_key: PublicKey) -> Result<Self, PaillierError> {
        let expected = Self::derive_mu(&lambda, &public_key)?;
        if expected != mu {
            return Err(PaillierError::InvalidModulus("mu does not match lambda and g"));
        }

        Ok(Self {
            lambda,
            mu,
            public_key,
        })
    }

    /// `λ`
    #[must_use]
    pub fn lambda(&self) -> &BigUint {
        &self.lambda
    }

    /// `μ`
    #[must_use]
    pub fn mu(&self) -> &BigUint {
        &self.mu
    }

    /// The modulus `n`
    #[must_use]
    pub fn n(&self) -> &BigUint {
        self.public_key.n()
    }

    /// The matching public key
    #[must_use]
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Recover the plaintext of `c`: `L(c^λ mod n^2) * μ mod n`
    pub fn decrypt(&self, c: &Ciphertext) -> Result<BigUint, PaillierError> {
        let pk = &self.public_key;
        if !pk.is_valid_ciphertext(c) {
            return Err(PaillierError::InvalidCiphertext);
        }

        let x = c.value().modpow(&self.lambda, pk.n_squared());
        Ok(l_function(&x, pk.n()) * &self.mu % pk.n())
    }

    fn derive_mu(lambda: &BigUint, pk: &PublicKey) -> Result<BigUint, PaillierError> {
        let x = pk.g().modpow(lambda, pk.n_squared());
        let l = l_function(&x, pk.n());

        mod_inverse(&l, pk.n())
            .map_err(|_| PaillierError::InvalidModulus("g does not have an order divisible by n"))
    }
}

/// A matching pair of [`PublicKey`] and [`PrivateKey`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct KeyPair {
    private_key: PrivateKey,
}

impl KeyPair {
    /// Derive a key pair with `g = n + 1` from two distinct primes
    ///
    /// Primality is not checked: generating (and checking) primes is up to the caller.
    ///
    /// ```rust
    /// # use paillier::*;
    /// # use num_bigint::BigUint;
    /// let keys = KeyPair::from_primes(&BigUint::from(5u32), &BigUint::from(7u32)).unwrap();
    ///
    /// assert_eq!(keys.public_key().n(), &BigUint::from(35u32));
    /// assert_eq!(keys.public_key().g(), &BigUint::from(36u32));
    /// assert_eq!(keys.private_key().lambda(), &BigUint::from(12u32));
    /// ```
    pub fn from_primes(p: &BigUint, q: &BigUint) -> Result<Self, PaillierError> {
        let one = BigUint::one();
        if p <= &one || q <= &one {
            return Err(PaillierError::InvalidModulus("primes must be greater than 1"));
        }

        if p == q {
            return Err(PaillierError::InvalidModulus("primes must be distinct"));
        }

        let n = p * q;
        let lambda = (p - &one).lcm(&(q - &one));

        if lambda.is_zero() || !n.gcd(&lambda).is_one() {
            return Err(PaillierError::InvalidModulus("gcd(n, lambda) must be 1"));
        }

        let public_key = PublicKey::new(n)?;
        let mu = PrivateKey::derive_mu(&lambda, &public_key)?;

        Ok(Self {
            private_key: PrivateKey {
                lambda,
                mu,
                public_key,
            },
        })
    }

    /// The public half
    #[must_use]
    pub fn public_key(&self) -> &PublicKey {
        self.private_key.public_key()
    }

    /// The private half
    #[must_use]
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }
}

impl From<PrivateKey> for KeyPair {
    fn from(private_key: PrivateKey) -> Self {
        Self { private_key }
    }
}
