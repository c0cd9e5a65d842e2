//! Proof backends.
//!
//! The circuit core never looks inside keys or proofs; it hands a validated
//! [`Circuit`] to [`ProofBackend::setup`] and passes the resulting values back
//! by reference. [`mock::MockBackend`] answers with the evaluator's verdict
//! and is meant for testing circuit logic; [`groth16::Groth16Backend`] is a
//! real zk-SNARK over BN254.

pub mod groth16;
pub mod mock;

pub use groth16::{Groth16Backend, Groth16Proof, Groth16ProvingKey, Groth16VerifyingKey};
pub use mock::{MockBackend, MockProof, MockProvingKey, MockVerifyingKey};

use crate::{
    Circuit, EvaluationError,
    circuit::evaluation::{InputKind, check_arity},
};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Arity mismatch: {input} has {actual} bits, key expects {expected}")]
    ArityMismatch {
        input: InputKind,
        expected: usize,
        actual: usize,
    },
    /// Key or proof produced for a different circuit
    #[error("Key does not belong to this circuit: {0}")]
    ForeignKey(String),
    #[error("Witness evaluation failed: {0}")]
    Evaluation(EvaluationError),
    #[error("Constraint synthesis failed: {0}")]
    Synthesis(String),
    #[error("Malformed key: {0}")]
    MalformedKey(String),
}
pub type BackendError = Error;

impl From<EvaluationError> for Error {
    fn from(err: EvaluationError) -> Self {
        match err {
            EvaluationError::ArityMismatch {
                input,
                expected,
                actual,
            } => Error::ArityMismatch {
                input,
                expected,
                actual,
            },
            other => Error::Evaluation(other),
        }
    }
}

/// Input lengths the key was generated for
pub(crate) fn check_input_arity(
    circuit: &Circuit,
    primary_input: &[bool],
    auxiliary_input: Option<&[bool]>,
) -> Result<(), Error> {
    check_arity(
        InputKind::Primary,
        circuit.primary_input_size,
        primary_input.len(),
    )?;
    if let Some(auxiliary_input) = auxiliary_input {
        check_arity(
            InputKind::Auxiliary,
            circuit.auxiliary_input_size,
            auxiliary_input.len(),
        )?;
    }
    Ok(())
}

/// A zk-SNARK for two-input boolean circuit satisfiability.
///
/// `setup` is the trusted setup; it may be expensive and non-deterministic.
/// `prove` and `verify` block until done. Implementations must be shareable
/// across threads: the harness proves and verifies candidates concurrently
/// against one key pair.
pub trait ProofBackend: Send + Sync {
    type ProvingKey: Send + Sync;
    type VerifyingKey: Send + Sync;
    type Proof: Send + Sync;

    fn setup(&self, circuit: &Circuit) -> Result<(Self::ProvingKey, Self::VerifyingKey), Error>;

    /// Fails on input lengths differing from the circuit used at setup
    fn prove(
        &self,
        proving_key: &Self::ProvingKey,
        primary_input: &[bool],
        auxiliary_input: &[bool],
    ) -> Result<Self::Proof, Error>;

    fn verify(
        &self,
        verifying_key: &Self::VerifyingKey,
        primary_input: &[bool],
        proof: &Self::Proof,
    ) -> Result<bool, Error>;
}
