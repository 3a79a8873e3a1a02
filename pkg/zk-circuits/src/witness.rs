use std::fmt;

use num_bigint::BigUint;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use zk_primitives::{commitment, compute_merkle_root, nullifier_hash, Element};

use crate::{
    ApproveInputs, CircuitKind, CreateDepositInputs, CreateWithdrawalInputs, NullifyDepositInputs,
    NullifyWithdrawalInputs, TransferFromInputs, TransferInputs, WitnessError,
};

/// The private inputs of one circuit, in the shape of its `input.json`
pub trait Circuit: Serialize + DeserializeOwned {
    /// The circuit these inputs are for
    const KIND: CircuitKind;

    /// Evaluate the circuit's relation natively
    ///
    /// Returns the public signals in verifier order if the inputs satisfy the circuit, which is
    /// what a real proof over these inputs would expose
    fn public_signals(&self) -> Result<Vec<Element>, WitnessError>;
}

/// The inputs to a circuit, together with the public signals they produce
///
/// `Debug` deliberately leaves out the inputs, which contain secrets.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Witness {
    kind: CircuitKind,
    inputs: Map<String, Value>,
    public_signals: Vec<Element>,
}

impl fmt::Debug for Witness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Witness")
            .field("kind", &self.kind)
            .field("public_signals", &self.public_signals)
            .finish_non_exhaustive()
    }
}

impl Witness {
    /// Type-erase `inputs`, evaluating the circuit to get its public signals
    pub fn new<C: Circuit>(inputs: &C) -> Result<Self, WitnessError> {
        let public_signals = inputs.public_signals()?;

        let inputs = match serde_json::to_value(inputs)? {
            Value::Object(map) => map,
            _ => return Err(WitnessError::Constraint("circuit inputs must be an object")),
        };

        Ok(Self {
            kind: C::KIND,
            inputs,
            public_signals,
        })
    }

    /// The circuit this witness is for
    #[must_use]
    pub fn kind(&self) -> CircuitKind {
        self.kind
    }

    /// The `input.json` object, field name to decimal string (or array of them)
    #[must_use]
    pub fn inputs(&self) -> &Map<String, Value> {
        &self.inputs
    }

    /// The public signals, in verifier order
    #[must_use]
    pub fn public_signals(&self) -> &[Element] {
        &self.public_signals
    }

    /// Recover the typed inputs
    pub fn decode<C: Circuit>(&self) -> Result<C, WitnessError> {
        if self.kind != C::KIND {
            return Err(WitnessError::WrongCircuit {
                expected: C::KIND,
                found: self.kind,
            });
        }

        Ok(serde_json::from_value(Value::Object(self.inputs.clone()))?)
    }

    /// Evaluate the circuit on the inputs again, ignoring the stored public signals
    pub fn evaluate(&self) -> Result<Vec<Element>, WitnessError> {
        match self.kind {
            CircuitKind::CreateDepositCommitment => {
                self.decode::<CreateDepositInputs>()?.public_signals()
            }
            CircuitKind::NullifyDepositCommitment => {
                self.decode::<NullifyDepositInputs>()?.public_signals()
            }
            CircuitKind::Transfer => self.decode::<TransferInputs>()?.public_signals(),
            CircuitKind::Approve => self.decode::<ApproveInputs>()?.public_signals(),
            CircuitKind::TransferFrom => self.decode::<TransferFromInputs>()?.public_signals(),
            CircuitKind::CreateWithdrawalCommitment => {
                self.decode::<CreateWithdrawalInputs>()?.public_signals()
            }
            CircuitKind::NullifyWithdrawalCommitment => {
                self.decode::<NullifyWithdrawalInputs>()?.public_signals()
            }
        }
    }
}

/// The secret opening of a deposit or withdrawal commitment
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// The amount the commitment is worth
    pub value: Element,
    /// A random blinding value
    pub secret: Element,
    /// The one-time value whose hash marks the commitment as spent
    pub nullifier: Element,
}

impl fmt::Debug for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Note")
            .field("commitment", &self.commitment())
            .finish_non_exhaustive()
    }
}

impl Note {
    /// A note with a freshly sampled secret and nullifier
    pub fn random<R: rand::RngCore + rand::CryptoRng>(value: Element, rng: &mut R) -> Self {
        Self {
            value,
            secret: Element::secure_random(&mut *rng),
            nullifier: Element::secure_random(rng),
        }
    }

    /// The commitment `H(value, secret, nullifier)` that goes in the tree
    #[must_use]
    pub fn commitment(&self) -> Element {
        commitment(self.value, self.secret, self.nullifier)
    }

    /// The hash revealed to the ledger when this note is spent
    #[must_use]
    pub fn nullifier_hash(&self) -> Element {
        nullifier_hash(self.nullifier)
    }
}

/// Convert an integer to a circuit input, checking that it is a canonical field element
pub(crate) fn to_field(value: &BigUint, field: &'static str) -> Result<Element, WitnessError> {
    match Element::try_from(value) {
        Ok(element) if element.is_canonical() => Ok(element),
        _ => Err(WitnessError::OutOfField { field }),
    }
}

pub(crate) fn to_big(element: Element) -> BigUint {
    BigUint::from(element)
}

/// Fold `leaf` up a `pathElements`/`pathIndices` pair, checking that every index is a bit
pub(crate) fn fold_path(
    leaf: Element,
    path_elements: &[Element],
    path_indices: &[Element],
) -> Result<Element, WitnessError> {
    let bits = path_indices
        .iter()
        .map(|index| match *index {
            i if i == Element::ZERO => Ok(false),
            i if i == Element::ONE => Ok(true),
            _ => Err(WitnessError::Constraint("pathIndices must be 0 or 1")),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(compute_merkle_root(
        leaf,
        path_elements.iter().copied().zip(bits),
    ))
}
