use super::{
    structure::Circuit,
    validation::{OutputPolicy, ValidationError},
};
use crate::{Gate, GateType, WireId};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StructuralError {
    /// The gate reads a wire that is neither an input nor an earlier output
    #[error("Gate {gate_index} reads wire {wire}, but only wires below {next_wire} are defined")]
    UndefinedWire {
        gate_index: usize,
        wire: WireId,
        next_wire: WireId,
    },
}

/// Incremental construction of a [`Circuit`].
///
/// Output wires are issued in gate order, and a gate may only read wires
/// issued before it. This makes every circuit produced here acyclic and
/// evaluable in a single pass.
#[derive(Clone, Debug)]
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    pub fn new(primary_input_size: usize, auxiliary_input_size: usize) -> Self {
        Self {
            circuit: Circuit::new(primary_input_size, auxiliary_input_size),
        }
    }

    pub fn constant_one(&self) -> WireId {
        self.circuit.get_true_wire_constant()
    }

    /// # Panics
    /// If `index` is not below the declared primary input size
    pub fn primary_input(&self, index: usize) -> WireId {
        self.circuit
            .primary_input_wire(index)
            .unwrap_or_else(|| panic!("primary input {index} not declared"))
    }

    /// # Panics
    /// If `index` is not below the declared auxiliary input size
    pub fn auxiliary_input(&self, index: usize) -> WireId {
        self.circuit
            .auxiliary_input_wire(index)
            .unwrap_or_else(|| panic!("auxiliary input {index} not declared"))
    }

    /// Wire the next gate will output to
    pub fn next_wire(&self) -> WireId {
        self.circuit.gate_output_wire(self.circuit.gates.len())
    }

    pub fn gate_count(&self) -> usize {
        self.circuit.gates.len()
    }

    pub fn add_gate(
        &mut self,
        left: WireId,
        right: WireId,
        gate_type: GateType,
        is_circuit_output: bool,
    ) -> Result<WireId, StructuralError> {
        let gate_index = self.circuit.gates.len();
        let next_wire = self.next_wire();

        if let Some(wire) = [left, right].into_iter().find(|wire| *wire >= next_wire) {
            log::debug!("add_gate: gate[{gate_index}] rejected, wire {wire} undefined");
            return Err(StructuralError::UndefinedWire {
                gate_index,
                wire,
                next_wire,
            });
        }

        let gate = Gate {
            wire_a: left,
            wire_b: right,
            wire_c: next_wire,
            gate_type,
            is_circuit_output,
        };
        log::trace!("add_gate: gate[{gate_index}] {gate}");
        self.circuit.gates.push(gate);

        Ok(next_wire)
    }

    pub fn add_output_gate(
        &mut self,
        left: WireId,
        right: WireId,
        gate_type: GateType,
    ) -> Result<WireId, StructuralError> {
        self.add_gate(left, right, gate_type, true)
    }

    /// Hand over the circuit without policy checks
    pub fn finish(self) -> Circuit {
        self.circuit
    }

    pub fn build(self, policy: OutputPolicy) -> Result<Circuit, ValidationError> {
        self.circuit.validate(policy)?;
        Ok(self.circuit)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::circuit::validation::ValidationErrorKind;

    #[test]
    fn test_outputs_allocated_in_order() {
        let mut builder = CircuitBuilder::new(1, 2);
        assert_eq!(builder.next_wire(), WireId(4));

        let x = builder
            .add_gate(builder.primary_input(0), builder.auxiliary_input(1), GateType::Xor, false)
            .unwrap();
        let y = builder
            .add_output_gate(x, builder.auxiliary_input(0), GateType::And)
            .unwrap();

        assert_eq!((x, y), (WireId(4), WireId(5)));
        let circuit = builder.build(OutputPolicy::Require).unwrap();
        assert_eq!(circuit.gates[1].wire_a, WireId(4));
        assert!(circuit.gates[1].is_circuit_output);
    }

    #[test]
    fn test_forward_reference_rejected() {
        let mut builder = CircuitBuilder::new(0, 2);

        // wire 3 is the output of this very gate
        assert_eq!(
            builder.add_gate(WireId(1), WireId(3), GateType::And, false),
            Err(StructuralError::UndefinedWire {
                gate_index: 0,
                wire: WireId(3),
                next_wire: WireId(3),
            })
        );
        assert_eq!(
            builder.add_gate(WireId(9), WireId(1), GateType::And, true),
            Err(StructuralError::UndefinedWire {
                gate_index: 0,
                wire: WireId(9),
                next_wire: WireId(3),
            })
        );
        // nothing was appended
        assert_eq!(builder.gate_count(), 0);

        let w3 = builder.add_gate(WireId(1), WireId(2), GateType::And, false).unwrap();
        assert!(builder.add_gate(w3, WireId(4), GateType::Or, true).is_err());
        assert!(builder.add_gate(w3, WireId(0), GateType::Or, true).is_ok());
    }

    #[test]
    fn test_build_without_output_follows_policy() {
        let mut builder = CircuitBuilder::new(0, 1);
        builder
            .add_gate(builder.auxiliary_input(0), builder.constant_one(), GateType::And, false)
            .unwrap();

        let err = builder.clone().build(OutputPolicy::Require).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::NoCircuitOutput);
        assert!(builder.clone().build(OutputPolicy::Warn).is_ok());
        assert_eq!(builder.finish().num_gates(), 1);
    }

    #[test]
    #[should_panic(expected = "auxiliary input 2 not declared")]
    fn test_undeclared_input_panics() {
        CircuitBuilder::new(0, 2).auxiliary_input(2);
    }
}
