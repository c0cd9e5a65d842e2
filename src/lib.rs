pub mod backend;
mod circuit;
pub mod circuits;
mod core;
pub mod export;
pub mod harness;
pub mod pipeline;

pub use crate::core::{
    gate::{Gate, GateError},
    gate_type::{GateCount, GateType, GateTypeError, evaluate_truth_table},
    wire::{WireAssignment, WireError, WireId},
};

pub use backend::{BackendError, ProofBackend};
pub use circuit::{
    Circuit, CircuitBuilder, CircuitDescription, CircuitError, EvaluatedCircuit, EvaluationError,
    GateDescription, InputKind, OutputPolicy, StructuralError, ValidationError,
    ValidationErrorKind,
};
pub use export::{ExportError, ExportedProof, ExportedVerifyingKey};
pub use harness::{
    Candidate, Finding, Harness, HarnessConfig, HarnessError, HarnessReport, HarnessResult,
};
pub use pipeline::{Keypair, PipelineError, ProofPipeline};
