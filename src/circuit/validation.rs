use std::fmt;

use serde::{Deserialize, Serialize};

use super::structure::Circuit;
use crate::WireId;

/// What to do with a circuit that has no circuit-output gate.
///
/// Such a circuit is satisfied by every assignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputPolicy {
    #[default]
    Require,
    Warn,
    Allow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Gate input is not the constant, an input, or an earlier gate output
    WireOutOfRange { wire: WireId, limit: WireId },
    /// Gate output is not the wire allocated to its position
    MisnumberedOutput { expected: WireId, actual: WireId },
    InvalidTruthTable(u8),
    NoCircuitOutput,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WireOutOfRange { wire, limit } => {
                write!(f, "input wire {wire} is not below {limit}")
            }
            Self::MisnumberedOutput { expected, actual } => {
                write!(f, "output wire is {actual}, expected {expected}")
            }
            Self::InvalidTruthTable(index) => write!(f, "truth-table index {index} is not below 16"),
            Self::NoCircuitOutput => write!(f, "no gate is marked as circuit output"),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Invalid circuit{}: {kind}", location(.gate_index))]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub gate_index: Option<usize>,
}

fn location(gate_index: &Option<usize>) -> String {
    gate_index
        .map(|index| format!(" at gate {index}"))
        .unwrap_or_default()
}

impl ValidationError {
    pub fn at_gate(gate_index: usize, kind: ValidationErrorKind) -> Self {
        Self {
            kind,
            gate_index: Some(gate_index),
        }
    }
}

/// Check a gate's wiring against its position. Shared with the description
/// surface, which has raw gates rather than [`crate::Gate`]s.
pub(crate) fn check_gate_wires(
    circuit_inputs: usize,
    position: usize,
    inputs: [WireId; 2],
    output: WireId,
) -> Result<(), ValidationError> {
    let expected = WireId(1 + circuit_inputs + position);

    if let Some(wire) = inputs.into_iter().find(|wire| *wire >= expected) {
        return Err(ValidationError::at_gate(
            position,
            ValidationErrorKind::WireOutOfRange {
                wire,
                limit: expected,
            },
        ));
    }

    if output != expected {
        return Err(ValidationError::at_gate(
            position,
            ValidationErrorKind::MisnumberedOutput {
                expected,
                actual: output,
            },
        ));
    }

    Ok(())
}

pub(crate) fn check_circuit_outputs(
    num_circuit_outputs: usize,
    policy: OutputPolicy,
) -> Result<(), ValidationError> {
    if num_circuit_outputs > 0 {
        return Ok(());
    }

    match policy {
        OutputPolicy::Require => Err(ValidationError {
            kind: ValidationErrorKind::NoCircuitOutput,
            gate_index: None,
        }),
        OutputPolicy::Warn => {
            log::warn!("validate: no circuit-output gate, every assignment satisfies the circuit");
            Ok(())
        }
        OutputPolicy::Allow => Ok(()),
    }
}

impl Circuit {
    /// Static well-formedness check, reporting the first violation
    pub fn validate(&self, policy: OutputPolicy) -> Result<(), ValidationError> {
        log::debug!(
            "validate: inputs={} gates={} policy={policy:?}",
            self.num_inputs(),
            self.gates.len()
        );

        for (position, gate) in self.gates.iter().enumerate() {
            check_gate_wires(self.num_inputs(), position, gate.input_wires(), gate.wire_c)?;
        }

        check_circuit_outputs(self.num_circuit_outputs(), policy)
    }

    pub fn is_valid(&self) -> bool {
        self.validate(OutputPolicy::Require).is_ok()
    }
}
