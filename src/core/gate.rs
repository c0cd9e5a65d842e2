use std::fmt;

pub use crate::GateType;
use crate::{WireAssignment, WireError, WireId};

#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Error while get wire {wire}: {err:?}")]
    GetWire { wire: &'static str, err: WireError },
    #[error("Error while assign wire {wire}: {err:?}")]
    AssignWire { wire: &'static str, err: WireError },
}
pub type GateError = Error;

/// A two-input gate `wire_c = gate_type(wire_a, wire_b)`.
///
/// Circuit-output gates additionally constrain `wire_c` to `0`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gate {
    pub wire_a: WireId,
    pub wire_b: WireId,
    pub wire_c: WireId,
    pub gate_type: GateType,
    pub is_circuit_output: bool,
}

impl Gate {
    #[must_use]
    pub fn new(t: GateType, a: WireId, b: WireId, c: WireId) -> Self {
        Self {
            wire_a: a,
            wire_b: b,
            wire_c: c,
            gate_type: t,
            is_circuit_output: false,
        }
    }

    #[must_use]
    pub fn and(wire_a: WireId, wire_b: WireId, wire_c: WireId) -> Self {
        Self::new(GateType::And, wire_a, wire_b, wire_c)
    }

    #[must_use]
    pub fn nand(wire_a: WireId, wire_b: WireId, wire_c: WireId) -> Self {
        Self::new(GateType::Nand, wire_a, wire_b, wire_c)
    }

    #[must_use]
    pub fn nimp(wire_a: WireId, wire_b: WireId, wire_c: WireId) -> Self {
        Self::new(GateType::Nimp, wire_a, wire_b, wire_c)
    }

    #[must_use]
    pub fn nor(wire_a: WireId, wire_b: WireId, wire_c: WireId) -> Self {
        Self::new(GateType::Nor, wire_a, wire_b, wire_c)
    }

    #[must_use]
    pub fn or(wire_a: WireId, wire_b: WireId, wire_c: WireId) -> Self {
        Self::new(GateType::Or, wire_a, wire_b, wire_c)
    }

    #[must_use]
    pub fn xor(wire_a: WireId, wire_b: WireId, wire_c: WireId) -> Self {
        Self::new(GateType::Xor, wire_a, wire_b, wire_c)
    }

    /// Mark the output wire as constrained to zero
    #[must_use]
    pub fn circuit_output(mut self) -> Self {
        self.is_circuit_output = true;
        self
    }

    pub fn input_wires(&self) -> [WireId; 2] {
        [self.wire_a, self.wire_b]
    }

    pub fn evaluate(&self, a: bool, b: bool) -> bool {
        self.gate_type.evaluate(a, b)
    }

    /// Read both inputs from `wires`, assign the output and return it
    pub fn evaluate_into(&self, wires: &mut WireAssignment) -> Result<bool, GateError> {
        let a = wires
            .get(self.wire_a)
            .map_err(|err| Error::GetWire { wire: "a", err })?;
        let b = wires
            .get(self.wire_b)
            .map_err(|err| Error::GetWire { wire: "b", err })?;

        let c = self.evaluate(a, b);
        wires
            .assign(self.wire_c, c)
            .map_err(|err| Error::AssignWire { wire: "c", err })?;

        Ok(c)
    }

    /// The gate's constraint on a full wire assignment: `c` follows from
    /// `a` and `b`, and is `0` for circuit outputs
    pub fn is_consistent(&self, a: bool, b: bool, c: bool) -> bool {
        self.evaluate(a, b) == c && !(self.is_circuit_output && c)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} -> {}",
            self.wire_a, self.gate_type, self.wire_b, self.wire_c
        )?;
        if self.is_circuit_output {
            write!(f, " (circuit output)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_into_assigns_output() {
        let mut wires = WireAssignment::new(4);
        wires.assign(WireId(1), true).unwrap();
        wires.assign(WireId(2), false).unwrap();

        let gate = Gate::xor(WireId(1), WireId(2), WireId(3));
        assert_eq!(gate.evaluate_into(&mut wires), Ok(true));
        assert_eq!(wires.get(WireId(3)), Ok(true));
    }

    #[test]
    fn test_evaluate_into_reads_constant_wire() {
        let mut wires = WireAssignment::new(3);
        wires.assign(WireId(1), true).unwrap();

        // 0 AND NOT w behaves as NOT w
        let gate = Gate::nimp(WireId::CONSTANT_ONE, WireId(1), WireId(2));
        assert_eq!(gate.evaluate_into(&mut wires), Ok(false));
    }

    #[test]
    fn test_evaluate_into_unassigned_input() {
        let mut wires = WireAssignment::new(4);
        wires.assign(WireId(1), true).unwrap();

        let gate = Gate::and(WireId(1), WireId(2), WireId(3));
        assert_eq!(
            gate.evaluate_into(&mut wires),
            Err(Error::GetWire {
                wire: "b",
                err: WireError::WireNotAssigned(WireId(2)),
            })
        );
    }

    #[test]
    fn test_consistency_of_output_gate() {
        let gate = Gate::nand(WireId(1), WireId(2), WireId(3)).circuit_output();

        assert!(gate.is_consistent(true, true, false));
        // consistent with NAND but output must be zero
        assert!(!gate.is_consistent(false, true, true));
        assert!(!gate.is_consistent(true, true, true));

        let internal = Gate::nand(WireId(1), WireId(2), WireId(3));
        assert!(internal.is_consistent(false, true, true));
    }

    #[test]
    fn test_display() {
        let gate = Gate::xor(WireId(1), WireId(3), WireId(4));
        assert_eq!(gate.to_string(), "1 XOR 3 -> 4");
        assert_eq!(
            gate.circuit_output().to_string(),
            "1 XOR 3 -> 4 (circuit output)"
        );
    }
}
