use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use ark_bn254::{Bn254, Fr};
use ark_crypto_primitives::snark::{CircuitSpecificSetupSNARK, SNARK};
use ark_ff::UniformRand;
use ark_groth16::{Groth16, Proof, ProvingKey, VerifyingKey};
use ark_relations::{
    lc,
    r1cs::{
        ConstraintSynthesizer, ConstraintSystem, ConstraintSystemRef, OptimizationGoal,
        SynthesisError, Variable,
    },
};
use ark_std::rand::{SeedableRng, rngs::StdRng};

use super::{Error, ProofBackend, check_input_arity};
use crate::{Circuit, OutputPolicy, WireAssignment, WireId};

pub type Groth16VerifyingKey = VerifyingKey<Bn254>;
pub type Groth16Proof = Proof<Bn254>;

impl From<SynthesisError> for Error {
    fn from(err: SynthesisError) -> Self {
        match err {
            SynthesisError::MalformedVerifyingKey => Error::MalformedKey(err.to_string()),
            other => Error::Synthesis(other.to_string()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Groth16ProvingKey {
    pub circuit: Arc<Circuit>,
    pub inner: ProvingKey<Bn254>,
}

/// R1CS view of a boolean circuit over the BN254 scalar field.
///
/// * every input wire `x` gets `x · (1 - x) = 0`; primary inputs are
///   instance variables, auxiliary inputs witnesses;
/// * every gate `c = f(a, b)` becomes one constraint from the multilinear
///   form `f = c0 + ca·a + cb·b + cab·a·b`: `(cab·a) · b = c - c0 - ca·a - cb·b`;
/// * every circuit-output wire additionally gets `1 · c = 0`.
///
/// Gate outputs need no booleanity constraint: the multilinear form maps
/// boolean inputs to a boolean.
struct BooleanCircuitSynthesizer<'a> {
    circuit: &'a Circuit,
    /// `None` during setup
    wires: Option<&'a WireAssignment>,
}

fn coefficient(value: i8) -> Fr {
    let magnitude = Fr::from(u64::from(value.unsigned_abs()));
    if value < 0 { -magnitude } else { magnitude }
}

impl ConstraintSynthesizer<Fr> for BooleanCircuitSynthesizer<'_> {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let value = |wire_id: WireId| -> Result<Fr, SynthesisError> {
            self.wires
                .ok_or(SynthesisError::AssignmentMissing)?
                .get(wire_id)
                .map(Fr::from)
                .map_err(|_| SynthesisError::AssignmentMissing)
        };

        let mut variables = Vec::with_capacity(self.circuit.num_wires());
        variables.push(Variable::One);

        for wire_id in self.circuit.input_wires() {
            let variable = if *wire_id <= self.circuit.primary_input_size {
                cs.new_input_variable(|| value(wire_id))?
            } else {
                cs.new_witness_variable(|| value(wire_id))?
            };
            cs.enforce_constraint(
                lc!() + variable,
                lc!() + Variable::One - variable,
                lc!(),
            )?;
            variables.push(variable);
        }

        for gate in &self.circuit.gates {
            let variable = |wire_id: WireId| {
                variables
                    .get(wire_id.0)
                    .copied()
                    .ok_or(SynthesisError::Unsatisfiable)
            };
            let (a, b) = (variable(gate.wire_a)?, variable(gate.wire_b)?);
            let [c0, ca, cb, cab] = gate.gate_type.multilinear_coefficients().map(coefficient);

            let c = cs.new_witness_variable(|| value(gate.wire_c))?;
            cs.enforce_constraint(
                lc!() + (cab, a),
                lc!() + b,
                lc!() + c - (c0, Variable::One) - (ca, a) - (cb, b),
            )?;
            if gate.is_circuit_output {
                cs.enforce_constraint(lc!() + Variable::One, lc!() + c, lc!())?;
            }

            variables.push(c);
        }

        Ok(())
    }
}

/// Groth16 over BN254.
///
/// Randomness comes from the OS unless the backend is seeded, in which case
/// every call draws from `seed` and a per-call nonce.
#[derive(Debug, Default)]
pub struct Groth16Backend {
    seed: Option<u64>,
    nonce: AtomicU64,
}

impl Groth16Backend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            nonce: AtomicU64::new(0),
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => {
                let nonce = self.nonce.fetch_add(1, Ordering::Relaxed);
                StdRng::seed_from_u64(seed ^ nonce.wrapping_mul(0x9e37_79b9_7f4a_7c15))
            }
            None => StdRng::from_seed(rand::random::<[u8; 32]>()),
        }
    }
}

impl ProofBackend for Groth16Backend {
    type ProvingKey = Groth16ProvingKey;
    type VerifyingKey = Groth16VerifyingKey;
    type Proof = Groth16Proof;

    fn setup(&self, circuit: &Circuit) -> Result<(Groth16ProvingKey, Groth16VerifyingKey), Error> {
        circuit
            .validate(OutputPolicy::Allow)
            .map_err(|err| Error::Synthesis(err.to_string()))?;

        log::debug!(
            "groth16 setup: wires={} gates={}",
            circuit.num_wires(),
            circuit.num_gates()
        );
        let synthesizer = BooleanCircuitSynthesizer {
            circuit,
            wires: None,
        };
        let (pk, vk) = Groth16::<Bn254>::setup(synthesizer, &mut self.rng())?;

        Ok((
            Groth16ProvingKey {
                circuit: Arc::new(circuit.clone()),
                inner: pk,
            },
            vk,
        ))
    }

    /// Proves whatever witness it is given. For an unsatisfying one the
    /// quotient is not a polynomial and the proof fails verification, which
    /// is what a soundness trial observes.
    fn prove(
        &self,
        proving_key: &Groth16ProvingKey,
        primary_input: &[bool],
        auxiliary_input: &[bool],
    ) -> Result<Groth16Proof, Error> {
        let circuit = &proving_key.circuit;
        check_input_arity(circuit, primary_input, Some(auxiliary_input))?;

        let evaluated = circuit.evaluate_wires(primary_input, auxiliary_input)?;
        if !evaluated.is_satisfied() {
            log::debug!("groth16 prove: witness does not satisfy the circuit");
        }

        let cs = ConstraintSystem::<Fr>::new_ref();
        cs.set_optimization_goal(OptimizationGoal::Constraints);
        BooleanCircuitSynthesizer {
            circuit,
            wires: Some(evaluated.wires()),
        }
        .generate_constraints(cs.clone())?;
        cs.finalize();

        let matrices = cs
            .to_matrices()
            .ok_or_else(|| Error::Synthesis("constraint matrices not constructed".to_owned()))?;
        let num_inputs = cs.num_instance_variables();
        let num_constraints = cs.num_constraints();
        let full_assignment = {
            let prover = cs
                .borrow()
                .ok_or_else(|| Error::Synthesis("constraint system unavailable".to_owned()))?;
            [
                prover.instance_assignment.as_slice(),
                prover.witness_assignment.as_slice(),
            ]
            .concat()
        };

        let mut rng = self.rng();
        let (r, s) = (Fr::rand(&mut rng), Fr::rand(&mut rng));
        let proof = Groth16::<Bn254>::create_proof_with_reduction_and_matrices(
            &proving_key.inner,
            r,
            s,
            &matrices,
            num_inputs,
            num_constraints,
            &full_assignment,
        )?;

        Ok(proof)
    }

    fn verify(
        &self,
        verifying_key: &Groth16VerifyingKey,
        primary_input: &[bool],
        proof: &Groth16Proof,
    ) -> Result<bool, Error> {
        let expected = verifying_key.gamma_abc_g1.len().saturating_sub(1);
        if primary_input.len() != expected {
            return Err(Error::ArityMismatch {
                input: crate::InputKind::Primary,
                expected,
                actual: primary_input.len(),
            });
        }

        let public_input: Vec<Fr> = primary_input.iter().map(|bit| Fr::from(*bit)).collect();
        Ok(Groth16::<Bn254>::verify(verifying_key, &public_input, proof)?)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::{
        Gate, GateType, InputKind,
        circuits::{bits_lsb_first, divisible_by_three},
    };

    fn constraint_count(circuit: &Circuit) -> usize {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let evaluated = circuit
            .evaluate_wires(&[], &vec![false; circuit.auxiliary_input_size])
            .unwrap();
        BooleanCircuitSynthesizer {
            circuit,
            wires: Some(evaluated.wires()),
        }
        .generate_constraints(cs.clone())
        .unwrap();
        cs.num_constraints()
    }

    #[test]
    fn test_r1cs_matches_evaluator() {
        let circuit = divisible_by_three();
        // 3 booleanity + 2 gates + 1 output
        assert_eq!(constraint_count(&circuit), 6);

        for value in 0..8 {
            let auxiliary = bits_lsb_first(value, 3);
            let evaluated = circuit.evaluate_wires(&[], &auxiliary).unwrap();
            let cs = ConstraintSystem::<Fr>::new_ref();
            BooleanCircuitSynthesizer {
                circuit: &circuit,
                wires: Some(evaluated.wires()),
            }
            .generate_constraints(cs.clone())
            .unwrap();

            assert_eq!(
                cs.is_satisfied().unwrap(),
                evaluated.is_satisfied(),
                "value {value}"
            );
        }
    }

    /// Synthesize with an arbitrary value on every non-constant wire
    fn r1cs_accepts(circuit: &Circuit, wire_values: &[bool]) -> bool {
        let mut wires = WireAssignment::new(circuit.num_wires());
        for (index, value) in wire_values.iter().enumerate() {
            wires.assign(WireId(index + 1), *value).unwrap();
        }

        let cs = ConstraintSystem::<Fr>::new_ref();
        BooleanCircuitSynthesizer {
            circuit,
            wires: Some(&wires),
        }
        .generate_constraints(cs.clone())
        .unwrap();
        cs.is_satisfied().unwrap()
    }

    #[test]
    fn test_forged_internal_wire_rejected() {
        let circuit = divisible_by_three();
        // inputs 0 1 0: the XOR wire is 0, claiming 1 zeroes the NAND output
        assert!(!r1cs_accepts(&circuit, &[false, true, false, true, false]));
        assert!(!r1cs_accepts(&circuit, &[false, true, false, false, false]));
        assert!(r1cs_accepts(&circuit, &[true, true, false, true, false]));
    }

    #[test]
    fn test_r1cs_matches_wire_table() {
        let circuit = divisible_by_three();
        let mut accepted = Vec::new();

        for row in 0..32u64 {
            let wire_values = bits_lsb_first(row, 5);
            let satisfied = r1cs_accepts(&circuit, &wire_values);
            assert_eq!(
                satisfied,
                circuit.check_full_assignment(&[], &wire_values).unwrap(),
                "row {row}"
            );
            if satisfied {
                accepted.push(row);
            }
        }

        assert_eq!(accepted, vec![11, 14]);
    }

    #[test]
    fn test_every_gate_type_constrained() {
        // one gate of each type over two auxiliary inputs, not a circuit output
        for gate_type in GateType::ALL {
            let mut circuit = Circuit::new(0, 2);
            circuit
                .gates
                .push(Gate::new(gate_type, WireId(1), WireId(2), WireId(3)));

            for row in 0..8u64 {
                let wire_values = bits_lsb_first(row, 3);
                let (a, b, c) = (wire_values[0], wire_values[1], wire_values[2]);
                assert_eq!(
                    r1cs_accepts(&circuit, &wire_values),
                    gate_type.evaluate(a, b) == c,
                    "{gate_type} on ({a}, {b}) -> {c}"
                );
            }
        }
    }

    #[test]
    fn test_prove_and_verify() {
        let backend = Groth16Backend::seeded(7);
        let (pk, vk) = backend.setup(&divisible_by_three()).unwrap();

        let proof = backend.prove(&pk, &[], &[true, true, false]).unwrap();
        assert_eq!(backend.verify(&vk, &[], &proof), Ok(true));

        let proof = backend.prove(&pk, &[], &[true, false, false]).unwrap();
        assert_eq!(backend.verify(&vk, &[], &proof), Ok(false));
    }

    #[test]
    fn test_public_input_binding() {
        // primary x, auxiliary y: satisfied iff x == y
        let mut circuit = Circuit::new(1, 1);
        circuit
            .gates
            .push(Gate::xor(WireId(1), WireId(2), WireId(3)).circuit_output());

        let backend = Groth16Backend::seeded(11);
        let (pk, vk) = backend.setup(&circuit).unwrap();

        let proof = backend.prove(&pk, &[true], &[true]).unwrap();
        assert_eq!(backend.verify(&vk, &[true], &proof), Ok(true));
        assert_eq!(backend.verify(&vk, &[false], &proof), Ok(false));
        assert_eq!(
            backend.verify(&vk, &[true, true], &proof),
            Err(Error::ArityMismatch {
                input: InputKind::Primary,
                expected: 1,
                actual: 2,
            })
        );
    }

    #[test]
    fn test_prove_arity() {
        let backend = Groth16Backend::seeded(3);
        let (pk, _) = backend.setup(&divisible_by_three()).unwrap();

        assert_eq!(
            backend.prove(&pk, &[], &[true, true]).unwrap_err(),
            Error::ArityMismatch {
                input: InputKind::Auxiliary,
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_setup_rejects_broken_wiring() {
        let mut circuit = divisible_by_three();
        circuit.gates[0].wire_b = WireId(5);

        assert!(matches!(
            Groth16Backend::new().setup(&circuit),
            Err(Error::Synthesis(_))
        ));
    }
}
