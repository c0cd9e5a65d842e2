use std::sync::Arc;

use super::{Error, ProofBackend, check_input_arity};
use crate::Circuit;

/// Backend whose proofs are the evaluator's verdict in the clear.
///
/// Sound and complete by construction, which isolates circuit-logic tests
/// from the cryptography.
#[derive(Clone, Copy, Debug, Default)]
pub struct MockBackend;

#[derive(Clone, Debug)]
pub struct MockProvingKey {
    circuit: Arc<Circuit>,
}

#[derive(Clone, Debug)]
pub struct MockVerifyingKey {
    circuit: Arc<Circuit>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockProof {
    pub primary_input: Vec<bool>,
    pub satisfied: bool,
    circuit: Arc<Circuit>,
}

impl ProofBackend for MockBackend {
    type ProvingKey = MockProvingKey;
    type VerifyingKey = MockVerifyingKey;
    type Proof = MockProof;

    fn setup(&self, circuit: &Circuit) -> Result<(MockProvingKey, MockVerifyingKey), Error> {
        let circuit = Arc::new(circuit.clone());
        Ok((
            MockProvingKey {
                circuit: circuit.clone(),
            },
            MockVerifyingKey { circuit },
        ))
    }

    fn prove(
        &self,
        proving_key: &MockProvingKey,
        primary_input: &[bool],
        auxiliary_input: &[bool],
    ) -> Result<MockProof, Error> {
        let circuit = &proving_key.circuit;
        check_input_arity(circuit, primary_input, Some(auxiliary_input))?;

        Ok(MockProof {
            primary_input: primary_input.to_vec(),
            satisfied: circuit.evaluate(primary_input, auxiliary_input)?,
            circuit: circuit.clone(),
        })
    }

    fn verify(
        &self,
        verifying_key: &MockVerifyingKey,
        primary_input: &[bool],
        proof: &MockProof,
    ) -> Result<bool, Error> {
        check_input_arity(&verifying_key.circuit, primary_input, None)?;

        if proof.circuit != verifying_key.circuit {
            return Err(Error::ForeignKey(
                "proof was produced for another circuit".to_owned(),
            ));
        }

        Ok(proof.satisfied && proof.primary_input == primary_input)
    }
}
