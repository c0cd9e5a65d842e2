use std::sync::Arc;

use crate::{
    BackendError, Circuit, OutputPolicy, ValidationError,
    backend::ProofBackend,
};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Circuit rejected before setup: {0}")]
    Validation(#[from] ValidationError),
    #[error("Backend failed: {0}")]
    Backend(#[from] BackendError),
}
pub type PipelineError = Error;

pub struct Keypair<B: ProofBackend> {
    /// The circuit the keys were generated for
    pub circuit: Arc<Circuit>,
    pub proving_key: B::ProvingKey,
    pub verifying_key: B::VerifyingKey,
}

impl<B: ProofBackend> Clone for Keypair<B>
where
    B::ProvingKey: Clone,
    B::VerifyingKey: Clone,
{
    fn clone(&self) -> Self {
        Self {
            circuit: Arc::clone(&self.circuit),
            proving_key: self.proving_key.clone(),
            verifying_key: self.verifying_key.clone(),
        }
    }
}

/// Drives a backend through setup, proving and verification.
///
/// Circuits are validated once, before setup; everything after that is
/// forwarded to the backend as is. Verdicts are never cached.
#[derive(Clone, Debug, Default)]
pub struct ProofPipeline<B> {
    backend: B,
    policy: OutputPolicy,
}

impl<B: ProofBackend> ProofPipeline<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            policy: OutputPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: OutputPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn policy(&self) -> OutputPolicy {
        self.policy
    }

    pub fn setup(&self, circuit: &Circuit) -> Result<Keypair<B>, Error> {
        circuit.validate(self.policy)?;

        log::info!(
            "setup: primary={} auxiliary={} {}",
            circuit.primary_input_size,
            circuit.auxiliary_input_size,
            circuit.gate_count()
        );
        let (proving_key, verifying_key) = self.backend.setup(circuit)?;

        Ok(Keypair {
            circuit: Arc::new(circuit.clone()),
            proving_key,
            verifying_key,
        })
    }

    pub fn prove(
        &self,
        proving_key: &B::ProvingKey,
        primary_input: &[bool],
        auxiliary_input: &[bool],
    ) -> Result<B::Proof, Error> {
        log::debug!(
            "prove: primary={primary_input:?} auxiliary={auxiliary_input:?}"
        );
        Ok(self
            .backend
            .prove(proving_key, primary_input, auxiliary_input)?)
    }

    pub fn verify(
        &self,
        verifying_key: &B::VerifyingKey,
        primary_input: &[bool],
        proof: &B::Proof,
    ) -> Result<bool, Error> {
        let verdict = self.backend.verify(verifying_key, primary_input, proof)?;
        log::debug!("verify: primary={primary_input:?} verdict={verdict}");
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::{
        InputKind, ValidationErrorKind,
        backend::MockBackend,
        circuits::{divisible_by_three, from_tuples},
    };

    fn no_output_circuit() -> Circuit {
        from_tuples(0, 2, &[(1, 2, 6, false)], OutputPolicy::Allow).unwrap()
    }

    #[test]
    fn test_setup_validates() {
        let pipeline = ProofPipeline::new(MockBackend);
        let mut broken = divisible_by_three();
        broken.gates[1].wire_c = crate::WireId(9);

        assert!(matches!(
            pipeline.setup(&broken),
            Err(Error::Validation(ValidationError {
                kind: ValidationErrorKind::MisnumberedOutput { .. },
                gate_index: Some(1),
            }))
        ));
    }

    #[test]
    fn test_output_policy() {
        let circuit = no_output_circuit();

        assert!(matches!(
            ProofPipeline::new(MockBackend).setup(&circuit),
            Err(Error::Validation(ValidationError {
                kind: ValidationErrorKind::NoCircuitOutput,
                ..
            }))
        ));

        let pipeline = ProofPipeline::new(MockBackend).with_policy(OutputPolicy::Warn);
        let keypair = pipeline.setup(&circuit).unwrap();
        // nothing to violate: every witness is accepted
        let proof = pipeline.prove(&keypair.proving_key, &[], &[true, false]).unwrap();
        assert_eq!(pipeline.verify(&keypair.verifying_key, &[], &proof), Ok(true));
    }

    #[test]
    fn test_round_trip() {
        let pipeline = ProofPipeline::new(MockBackend);
        let keypair = pipeline.setup(&divisible_by_three()).unwrap();
        assert_eq!(*keypair.circuit, divisible_by_three());

        let proof = pipeline
            .prove(&keypair.proving_key, &[], &[false, true, true])
            .unwrap();
        assert_eq!(pipeline.verify(&keypair.verifying_key, &[], &proof), Ok(true));

        let proof = pipeline
            .prove(&keypair.proving_key, &[], &[false, false, true])
            .unwrap();
        assert_eq!(pipeline.verify(&keypair.verifying_key, &[], &proof), Ok(false));
    }

    #[test]
    fn test_backend_errors_surface() {
        let pipeline = ProofPipeline::new(MockBackend);
        let keypair = pipeline.setup(&divisible_by_three()).unwrap();

        assert_eq!(
            pipeline.prove(&keypair.proving_key, &[], &[true]).unwrap_err(),
            Error::Backend(BackendError::ArityMismatch {
                input: InputKind::Auxiliary,
                expected: 3,
                actual: 1,
            })
        );
    }
}
