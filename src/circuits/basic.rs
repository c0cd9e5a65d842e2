use crate::{
    Circuit, CircuitBuilder, CircuitError, GateType, OutputPolicy, ValidationError,
    ValidationErrorKind,
};

/// Build a circuit from `(left_wire, right_wire, truth_table_index,
/// is_circuit_output)` tuples, output wires allocated in order
pub fn from_tuples(
    primary_input_size: usize,
    auxiliary_input_size: usize,
    gates: &[(usize, usize, u8, bool)],
    policy: OutputPolicy,
) -> Result<Circuit, CircuitError> {
    let mut builder = CircuitBuilder::new(primary_input_size, auxiliary_input_size);

    for (position, &(left, right, index, is_circuit_output)) in gates.iter().enumerate() {
        let gate_type = GateType::from_index(index).map_err(|_| {
            ValidationError::at_gate(position, ValidationErrorKind::InvalidTruthTable(index))
        })?;
        builder.add_gate(left.into(), right.into(), gate_type, is_circuit_output)?;
    }

    Ok(builder.build(policy)?)
}

/// `width` bits of `value`, least significant first
pub fn bits_lsb_first(value: u64, width: usize) -> Vec<bool> {
    (0..width).map(|i| i < 64 && (value >> i) & 1 == 1).collect()
}

/// Three private bits `b0 b1 b2` (LSB first) satisfy the circuit iff the
/// number they encode is 3 or 6: `b0 != b2` and `b1 == 1`.
pub fn divisible_by_three() -> Circuit {
    let mut builder = CircuitBuilder::new(0, 3);
    let [b0, b1, b2] = [0, 1, 2].map(|i| builder.auxiliary_input(i));

    let opposite_ends = builder
        .add_gate(b0, b2, GateType::Xor, false)
        .expect("inputs are defined");
    builder
        .add_output_gate(opposite_ends, b1, GateType::Nand)
        .expect("gate output is defined");

    builder.finish()
}

/// Four private bits (LSB first) satisfy the circuit iff the number they
/// encode is prime.
///
/// The sum-of-products reads `(b1 & !b2 & !b3) | (b0 & b2 & !b3) |
/// (b0 & b3 & (b1 ^ b2))`; the last gate negates it against the constant wire
/// so primes drive the output to `0`.
pub fn prime_under_sixteen() -> Circuit {
    from_tuples(
        0,
        4,
        &[
            (0, 2, 1, false),   // 5: b1
            (3, 4, 8, false),   // 6: !b2 & !b3
            (0, 1, 1, false),   // 7: b0
            (3, 4, 4, false),   // 8: b2 & !b3
            (1, 4, 1, false),   // 9: b0 & b3
            (2, 3, 6, false),   // 10: b1 ^ b2
            (5, 6, 1, false),   // 11: 2, 3
            (7, 8, 1, false),   // 12: 5, 7
            (9, 10, 1, false),  // 13: 11, 13
            (11, 12, 7, false), // 14
            (14, 13, 7, false), // 15: prime
            (0, 15, 4, true),   // 16: !prime
        ],
        OutputPolicy::Require,
    )
    .expect("fixed wiring is valid")
}
