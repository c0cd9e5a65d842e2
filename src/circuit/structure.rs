use std::fmt;

use crate::{Gate, WireId, core::gate_type::GateCount};

/// A two-input boolean circuit.
///
/// Wire layout: wire 0 is the constant one, followed by the primary inputs,
/// the auxiliary inputs, and finally one output wire per gate in gate order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Circuit {
    pub primary_input_size: usize,
    pub auxiliary_input_size: usize,
    pub gates: Vec<Gate>,
}

impl Circuit {
    pub fn new(primary_input_size: usize, auxiliary_input_size: usize) -> Self {
        Self {
            primary_input_size,
            auxiliary_input_size,
            gates: Vec::new(),
        }
    }

    pub fn get_true_wire_constant(&self) -> WireId {
        WireId::CONSTANT_ONE
    }

    pub fn num_inputs(&self) -> usize {
        self.primary_input_size + self.auxiliary_input_size
    }

    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    pub fn num_wires(&self) -> usize {
        1 + self.num_inputs() + self.gates.len()
    }

    pub fn primary_input_wire(&self, index: usize) -> Option<WireId> {
        (index < self.primary_input_size).then(|| WireId(1 + index))
    }

    pub fn auxiliary_input_wire(&self, index: usize) -> Option<WireId> {
        (index < self.auxiliary_input_size)
            .then(|| WireId(1 + self.primary_input_size + index))
    }

    pub fn input_wires(&self) -> impl Iterator<Item = WireId> + use<> {
        (1..=self.num_inputs()).map(WireId)
    }

    /// Output wire allocated to the gate at `position`
    pub fn gate_output_wire(&self, position: usize) -> WireId {
        WireId(1 + self.num_inputs() + position)
    }

    /// Output wires of the gates constrained to zero
    pub fn output_wires(&self) -> impl Iterator<Item = WireId> + '_ {
        self.gates
            .iter()
            .filter(|gate| gate.is_circuit_output)
            .map(|gate| gate.wire_c)
    }

    pub fn num_circuit_outputs(&self) -> usize {
        self.gates.iter().filter(|gate| gate.is_circuit_output).count()
    }

    pub fn gate_count(&self) -> GateCount {
        let mut count = GateCount::default();
        for gate in &self.gates {
            count.handle(gate.gate_type, gate.is_circuit_output);
        }
        count
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "primary inputs: {}, auxiliary inputs: {}, wires: {}",
            self.primary_input_size,
            self.auxiliary_input_size,
            self.num_wires()
        )?;
        writeln!(f, "{}", self.gate_count())?;
        for (position, gate) in self.gates.iter().enumerate() {
            writeln!(f, "gate[{position}]: {gate}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GateType;

    #[test]
    fn test_wire_layout() {
        let circuit = Circuit::new(2, 3);

        assert_eq!(circuit.num_inputs(), 5);
        assert_eq!(circuit.num_wires(), 6);
        assert_eq!(circuit.primary_input_wire(0), Some(WireId(1)));
        assert_eq!(circuit.primary_input_wire(2), None);
        assert_eq!(circuit.auxiliary_input_wire(0), Some(WireId(3)));
        assert_eq!(circuit.auxiliary_input_wire(2), Some(WireId(5)));
        assert_eq!(circuit.auxiliary_input_wire(3), None);
        assert_eq!(circuit.gate_output_wire(0), WireId(6));
        assert_eq!(
            circuit.input_wires().collect::<Vec<_>>(),
            (1..=5).map(WireId).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_display_lists_gates() {
        let mut circuit = Circuit::new(0, 2);
        circuit
            .gates
            .push(Gate::new(GateType::Xor, WireId(1), WireId(2), WireId(3)).circuit_output());

        let printed = circuit.to_string();
        assert!(printed.starts_with("primary inputs: 0, auxiliary inputs: 2, wires: 4\n"));
        assert!(printed.contains("gate[0]: 1 XOR 2 -> 3 (circuit output)"));
        assert_eq!(circuit.output_wires().collect::<Vec<_>>(), vec![WireId(3)]);
    }
}
