//! # Two-Input Boolean Circuits
//!
//! A circuit is an ordered list of two-input gates over boolean wires. It is
//! satisfied by an input assignment when every gate marked as *circuit
//! output* evaluates to `0`; the remaining gates are internal and their
//! outputs are whatever the gate function yields.
//!
//! ## Circuit Flow
//!
//! ```text
//! ┌────────────────┐    ┌─────────────┐    ┌──────────────┐    ┌──────────────────┐
//! │ CircuitBuilder │───▶│   Circuit   │───▶│  validate()  │───▶│ EvaluatedCircuit │
//! │  add_gate()    │    │ (immutable) │    │ OutputPolicy │    │  wire values     │
//! └────────────────┘    └─────────────┘    └──────────────┘    └──────────────────┘
//!         ▲                    │                                        │
//!         │                    │ to_description()                       │
//!   CircuitDescription ◀───────┘                                  is_satisfied()
//!   (JSON, raw indices)
//! ```
//!
//! ## Wire Layout
//!
//! | wire                    | meaning                         |
//! |-------------------------|---------------------------------|
//! | `0`                     | constant one                    |
//! | `1 ..= p`               | primary (public) inputs         |
//! | `p + 1 ..= p + a`       | auxiliary (private) inputs      |
//! | `p + a + 1 + k`         | output of gate `k`              |
//!
//! Output wires are allocated strictly in gate order and a gate may only read
//! wires below its own output. This ordering is the acyclicity guarantee: a
//! single pass over the gates evaluates the whole circuit, with no
//! topological sort. [`CircuitBuilder`] enforces it at insertion time and
//! [`Circuit::validate`] re-checks it for circuits assembled by other means.

pub mod builder;
pub mod description;
pub mod errors;
pub mod evaluation;
pub mod structure;
pub mod validation;

pub use builder::{CircuitBuilder, StructuralError};
pub use description::{CircuitDescription, GateDescription};
pub use errors::CircuitError;
pub use evaluation::{EvaluatedCircuit, EvaluationError, InputKind};
pub use structure::Circuit;
pub use validation::{OutputPolicy, ValidationError, ValidationErrorKind};
