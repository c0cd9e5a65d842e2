use serde::{Deserialize, Serialize};

use super::{
    structure::Circuit,
    validation::{
        OutputPolicy, ValidationError, ValidationErrorKind, check_circuit_outputs,
        check_gate_wires,
    },
};
use crate::{Gate, GateType, WireId};

/// One gate as authored by hand or read from JSON
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDescription {
    pub left_wire: usize,
    pub right_wire: usize,
    pub truth_table_index: u8,
    #[serde(default)]
    pub is_circuit_output: bool,
    /// Allocated from the gate position when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_wire: Option<usize>,
}

impl GateDescription {
    pub fn new(left_wire: usize, right_wire: usize, truth_table_index: u8, is_circuit_output: bool) -> Self {
        Self {
            left_wire,
            right_wire,
            truth_table_index,
            is_circuit_output,
            output_wire: None,
        }
    }
}

/// Raw, integer-encoded circuit
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitDescription {
    pub primary_input_size: usize,
    pub auxiliary_input_size: usize,
    pub gates: Vec<GateDescription>,
}

impl Circuit {
    pub fn from_description(
        description: &CircuitDescription,
        policy: OutputPolicy,
    ) -> Result<Self, ValidationError> {
        let mut circuit = Circuit::new(
            description.primary_input_size,
            description.auxiliary_input_size,
        );

        for (position, raw) in description.gates.iter().enumerate() {
            let gate_type = GateType::from_index(raw.truth_table_index).map_err(|_| {
                ValidationError::at_gate(
                    position,
                    ValidationErrorKind::InvalidTruthTable(raw.truth_table_index),
                )
            })?;

            let wire_c = raw
                .output_wire
                .map(WireId)
                .unwrap_or_else(|| circuit.gate_output_wire(position));
            let gate = Gate {
                wire_a: WireId(raw.left_wire),
                wire_b: WireId(raw.right_wire),
                wire_c,
                gate_type,
                is_circuit_output: raw.is_circuit_output,
            };
            check_gate_wires(circuit.num_inputs(), position, gate.input_wires(), gate.wire_c)?;

            circuit.gates.push(gate);
        }

        check_circuit_outputs(circuit.num_circuit_outputs(), policy)?;
        Ok(circuit)
    }

    pub fn to_description(&self) -> CircuitDescription {
        CircuitDescription {
            primary_input_size: self.primary_input_size,
            auxiliary_input_size: self.auxiliary_input_size,
            gates: self
                .gates
                .iter()
                .map(|gate| GateDescription {
                    left_wire: gate.wire_a.0,
                    right_wire: gate.wire_b.0,
                    truth_table_index: gate.gate_type.to_index(),
                    is_circuit_output: gate.is_circuit_output,
                    output_wire: Some(gate.wire_c.0),
                })
                .collect(),
        }
    }
}
