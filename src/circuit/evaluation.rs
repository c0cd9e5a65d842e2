use std::fmt;

use super::structure::Circuit;
use crate::{GateError, WireAssignment, WireError, WireId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Primary,
    Auxiliary,
    /// Full wire assignment, excluding the constant wire
    Wires,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Primary => write!(f, "primary input"),
            InputKind::Auxiliary => write!(f, "auxiliary input"),
            InputKind::Wires => write!(f, "wire assignment"),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Arity mismatch: {input} has {actual} bits, circuit expects {expected}")]
    ArityMismatch {
        input: InputKind,
        expected: usize,
        actual: usize,
    },
    #[error("Gate {gate_index} evaluation failed: {err}")]
    Gate { gate_index: usize, err: GateError },
    #[error("Wire error: {0}")]
    Wire(#[from] WireError),
}
pub type EvaluationError = Error;

pub(crate) fn check_arity(input: InputKind, expected: usize, actual: usize) -> Result<(), Error> {
    if expected != actual {
        return Err(Error::ArityMismatch {
            input,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Every wire value of a circuit under one input assignment
#[derive(Debug, Clone)]
pub struct EvaluatedCircuit<'c> {
    pub structure: &'c Circuit,
    pub(crate) wires: WireAssignment,
}

impl EvaluatedCircuit<'_> {
    pub fn value(&self, wire_id: WireId) -> Option<bool> {
        self.wires.get(wire_id).ok()
    }

    pub fn wires(&self) -> &WireAssignment {
        &self.wires
    }

    /// Values of the circuit-output wires, in gate order
    pub fn iter_output(&self) -> impl Iterator<Item = (WireId, bool)> + '_ {
        self.structure
            .output_wires()
            .filter_map(move |wire_id| self.value(wire_id).map(|value| (wire_id, value)))
    }

    /// All circuit-output wires carry `0`
    pub fn is_satisfied(&self) -> bool {
        self.iter_output().all(|(_, value)| !value)
    }
}

impl Circuit {
    /// Compute every wire from the inputs in one pass over the gates
    pub fn evaluate_wires(
        &self,
        primary_input: &[bool],
        auxiliary_input: &[bool],
    ) -> Result<EvaluatedCircuit<'_>, Error> {
        check_arity(InputKind::Primary, self.primary_input_size, primary_input.len())?;
        check_arity(
            InputKind::Auxiliary,
            self.auxiliary_input_size,
            auxiliary_input.len(),
        )?;

        let mut wires = WireAssignment::new(self.num_wires());
        for (wire_id, value) in self
            .input_wires()
            .zip(primary_input.iter().chain(auxiliary_input))
        {
            wires.assign(wire_id, *value)?;
        }

        for (gate_index, gate) in self.gates.iter().enumerate() {
            gate.evaluate_into(&mut wires)
                .map_err(|err| Error::Gate { gate_index, err })?;
        }

        Ok(EvaluatedCircuit {
            structure: self,
            wires,
        })
    }

    /// Whether the inputs satisfy the circuit
    pub fn evaluate(&self, primary_input: &[bool], auxiliary_input: &[bool]) -> Result<bool, Error> {
        let evaluated = self.evaluate_wires(primary_input, auxiliary_input)?;
        let satisfied = evaluated.is_satisfied();
        log::trace!(
            "evaluate: primary={primary_input:?} auxiliary={auxiliary_input:?} satisfied={satisfied}"
        );
        Ok(satisfied)
    }

    /// Check a full assignment of every non-constant wire as a constraint
    /// system would: gate outputs are checked, not computed.
    ///
    /// `auxiliary_wires` holds the auxiliary inputs followed by one value per
    /// gate output.
    pub fn check_full_assignment(
        &self,
        primary_input: &[bool],
        auxiliary_wires: &[bool],
    ) -> Result<bool, Error> {
        check_arity(InputKind::Primary, self.primary_input_size, primary_input.len())?;
        check_arity(
            InputKind::Wires,
            self.auxiliary_input_size + self.gates.len(),
            auxiliary_wires.len(),
        )?;

        let value = |wire_id: WireId| -> Result<bool, Error> {
            let value = match wire_id.0 {
                0 => Some(true),
                index if index <= self.primary_input_size => primary_input.get(index - 1).copied(),
                index => auxiliary_wires
                    .get(index - 1 - self.primary_input_size)
                    .copied(),
            };
            value.ok_or(Error::Wire(WireError::InvalidWireIndex(wire_id)))
        };

        for gate in &self.gates {
            if !gate.is_consistent(value(gate.wire_a)?, value(gate.wire_b)?, value(gate.wire_c)?) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::{Gate, GateType, circuits::divisible_by_three};

    #[test]
    fn test_wire_values() {
        let circuit = divisible_by_three();
        let evaluated = circuit.evaluate_wires(&[], &[true, true, false]).unwrap();

        assert_eq!(
            evaluated.wires().to_bits(),
            vec![true, true, false, true, false]
        );
        assert_eq!(evaluated.iter_output().collect::<Vec<_>>(), vec![(WireId(5), false)]);
        assert!(evaluated.is_satisfied());
        assert_eq!(evaluated.value(WireId(9)), None);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let circuit = divisible_by_three();
        for bits in 0u8..8 {
            let auxiliary: Vec<bool> = (0..3).map(|i| (bits >> i) & 1 == 1).collect();
            let first = circuit.evaluate(&[], &auxiliary).unwrap();
            for _ in 0..3 {
                assert_eq!(circuit.evaluate(&[], &auxiliary).unwrap(), first);
            }
        }
    }

    #[test]
    fn test_arity_mismatch() {
        let circuit = divisible_by_three();

        assert_eq!(
            circuit.evaluate(&[], &[true, true]),
            Err(Error::ArityMismatch {
                input: InputKind::Auxiliary,
                expected: 3,
                actual: 2,
            })
        );
        assert_eq!(
            circuit.evaluate(&[true], &[true, true, false]),
            Err(Error::ArityMismatch {
                input: InputKind::Primary,
                expected: 0,
                actual: 1,
            })
        );
        // never truncates longer inputs
        assert!(circuit.evaluate(&[], &[true, true, false, true, false]).is_err());
    }

    #[test]
    fn test_primary_inputs_precede_auxiliary() {
        // primary x, auxiliary y: satisfied iff x == y
        let mut circuit = Circuit::new(1, 1);
        circuit
            .gates
            .push(Gate::xor(WireId(1), WireId(2), WireId(3)).circuit_output());

        assert_eq!(circuit.evaluate(&[true], &[true]), Ok(true));
        assert_eq!(circuit.evaluate(&[true], &[false]), Ok(false));
        assert_eq!(circuit.evaluate(&[false], &[false]), Ok(true));
    }

    #[test]
    fn test_circuit_without_outputs_is_vacuous() {
        let mut circuit = Circuit::new(0, 1);
        circuit
            .gates
            .push(Gate::new(GateType::One, WireId(1), WireId(1), WireId(2)));

        assert_eq!(circuit.evaluate(&[], &[false]), Ok(true));
        assert_eq!(circuit.evaluate(&[], &[true]), Ok(true));
    }

    #[test]
    fn test_forward_reference_fails_evaluation() {
        let mut circuit = Circuit::new(0, 1);
        circuit
            .gates
            .push(Gate::and(WireId(1), WireId(3), WireId(2)).circuit_output());
        circuit.gates.push(Gate::and(WireId(1), WireId(1), WireId(3)));

        assert!(matches!(
            circuit.evaluate(&[], &[true]),
            Err(Error::Gate { gate_index: 0, .. })
        ));
    }

    #[test]
    fn test_full_assignment_table() {
        // rows of the five-wire table: inputs 1..=3, internal wire 4, output 5
        let circuit = divisible_by_three();
        let accepted: Vec<u8> = (0u8..32)
            .filter(|row| {
                let wires: Vec<bool> = (0..5).map(|i| (row >> i) & 1 == 1).collect();
                circuit.check_full_assignment(&[], &wires).unwrap()
            })
            .collect();

        // (1,1,0,1,0) and (0,1,1,1,0)
        assert_eq!(accepted, vec![11, 14]);
    }

    #[test]
    fn test_full_assignment_arity() {
        let circuit = divisible_by_three();
        assert_eq!(
            circuit.check_full_assignment(&[], &[true, true, false]),
            Err(Error::ArityMismatch {
                input: InputKind::Wires,
                expected: 5,
                actual: 3,
            })
        );
    }
}
