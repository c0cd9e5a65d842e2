use std::fmt;

/// Errors raised when converting raw truth-table indices
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Truth-table index {0} is outside 0..16")]
    InvalidTruthTable(u8),
}
pub type GateTypeError = Error;

/// All sixteen two-input boolean functions.
///
/// The discriminant is the truth-table index: the gate's output column read
/// over the rows `(0,0), (1,0), (0,1), (1,1)` of `(a, b)`, first row as the
/// most significant bit. NOR, for example, is `1000` = 8.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateType {
    Zero = 0,
    And = 1,
    Ncimp = 2, // !a & b
    B = 3,
    Nimp = 4, // a & !b
    A = 5,
    Xor = 6,
    Or = 7,
    Nor = 8,
    Xnor = 9,
    NotA = 10,
    Imp = 11, // a => b
    NotB = 12,
    Cimp = 13, // b => a
    Nand = 14,
    One = 15,
}

impl GateType {
    pub const ALL: [GateType; 16] = [
        GateType::Zero,
        GateType::And,
        GateType::Ncimp,
        GateType::B,
        GateType::Nimp,
        GateType::A,
        GateType::Xor,
        GateType::Or,
        GateType::Nor,
        GateType::Xnor,
        GateType::NotA,
        GateType::Imp,
        GateType::NotB,
        GateType::Cimp,
        GateType::Nand,
        GateType::One,
    ];

    pub fn from_index(index: u8) -> Result<Self, GateTypeError> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or(Error::InvalidTruthTable(index))
    }

    pub const fn to_index(self) -> u8 {
        self as u8
    }

    /// Row of the canonical ordering, `a + 2b`
    const fn row(a: bool, b: bool) -> u8 {
        a as u8 + 2 * (b as u8)
    }

    pub const fn evaluate(self, a: bool, b: bool) -> bool {
        (self.to_index() >> (3 - Self::row(a, b))) & 1 == 1
    }

    /// `[f(0,0), f(1,0), f(0,1), f(1,1)]`
    pub const fn truth_table(self) -> [bool; 4] {
        [
            self.evaluate(false, false),
            self.evaluate(true, false),
            self.evaluate(false, true),
            self.evaluate(true, true),
        ]
    }

    /// Coefficients `[c, ca, cb, cab]` of the multilinear form
    /// `c + ca·a + cb·b + cab·a·b`, which agrees with the gate on `{0,1}²`.
    pub const fn multilinear_coefficients(self) -> [i8; 4] {
        let [f00, f10, f01, f11] = self.truth_table();
        let (f00, f10, f01, f11) = (f00 as i8, f10 as i8, f01 as i8, f11 as i8);
        [f00, f10 - f00, f01 - f00, f11 - f10 - f01 + f00]
    }

    /// Output does not depend on either input
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Zero | Self::One)
    }

    pub const fn symbol(&self) -> &'static str {
        match self {
            GateType::Zero => "ZERO",
            GateType::And => "AND",
            GateType::Ncimp => "NCIMP",
            GateType::B => "B",
            GateType::Nimp => "NIMP",
            GateType::A => "A",
            GateType::Xor => "XOR",
            GateType::Or => "OR",
            GateType::Nor => "NOR",
            GateType::Xnor => "XNOR",
            GateType::NotA => "NOT_A",
            GateType::Imp => "IMP",
            GateType::NotB => "NOT_B",
            GateType::Cimp => "CIMP",
            GateType::Nand => "NAND",
            GateType::One => "ONE",
        }
    }
}

impl TryFrom<u8> for GateType {
    type Error = GateTypeError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::from_index(index)
    }
}

impl From<GateType> for u8 {
    fn from(gate_type: GateType) -> Self {
        gate_type.to_index()
    }
}

impl fmt::Display for GateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Gate evaluation straight from a raw truth-table index
pub fn evaluate_truth_table(index: u8, a: bool, b: bool) -> Result<bool, GateTypeError> {
    Ok(GateType::from_index(index)?.evaluate(a, b))
}

/// Number of gates of each type
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GateCount {
    by_type: [usize; 16],
    pub circuit_outputs: usize,
}

impl GateCount {
    pub fn handle(&mut self, gate_type: GateType, is_circuit_output: bool) {
        self.by_type[gate_type.to_index() as usize] += 1;
        if is_circuit_output {
            self.circuit_outputs += 1;
        }
    }

    pub fn get(&self, gate_type: GateType) -> usize {
        self.by_type[gate_type.to_index() as usize]
    }

    pub fn total(&self) -> usize {
        self.by_type.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GateType, usize)> + '_ {
        GateType::ALL
            .iter()
            .map(|gate_type| (*gate_type, self.get(*gate_type)))
            .filter(|(_, count)| *count > 0)
    }
}

impl fmt::Display for GateCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} gates", self.total())?;
        for (gate_type, count) in self.iter() {
            write!(f, " {gate_type}={count}")?;
        }
        write!(f, " (circuit outputs: {})", self.circuit_outputs)
    }
}
