use std::{fmt, ops::Deref};

use bitvec::vec::BitVec;

/// Errors that can occur during wire operations
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// Wire with the given ID has no value yet
    #[error("Wire with id {0} not assigned")]
    WireNotAssigned(WireId),
    /// Wire with the given ID is already assigned
    #[error("Wire with id {0} already assigned")]
    WireAlreadyAssigned(WireId),
    /// Invalid wire index provided
    #[error("Invalid wire index: {0}")]
    InvalidWireIndex(WireId),
}
pub type WireError = Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WireId(pub usize);

impl WireId {
    /// Wire 0 always carries `true`
    pub const CONSTANT_ONE: WireId = WireId(0);

    pub fn is_constant(&self) -> bool {
        *self == Self::CONSTANT_ONE
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for WireId {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<usize> for WireId {
    fn from(index: usize) -> Self {
        WireId(index)
    }
}

/// Values of a circuit's wires, filled in wire order.
///
/// Wires are assigned strictly in sequence: the constant wire at creation,
/// then inputs, then one gate output at a time. A wire is readable only once
/// it has been pushed, which is what makes reading a wire ahead of its gate an
/// error instead of a silent `false`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireAssignment {
    values: BitVec,
    capacity: usize,
}

impl WireAssignment {
    pub fn new(num_wires: usize) -> Self {
        let mut values = BitVec::with_capacity(num_wires);
        values.push(true);
        Self {
            values,
            capacity: num_wires,
        }
    }

    pub fn get(&self, wire_id: WireId) -> Result<bool, WireError> {
        if wire_id.0 >= self.capacity {
            return Err(Error::InvalidWireIndex(wire_id));
        }
        self.values
            .get(wire_id.0)
            .map(|bit| *bit)
            .ok_or(Error::WireNotAssigned(wire_id))
    }

    /// Assign `wire_id`, which must be the next unassigned wire
    pub fn assign(&mut self, wire_id: WireId, value: bool) -> Result<(), WireError> {
        if wire_id.0 >= self.capacity {
            return Err(Error::InvalidWireIndex(wire_id));
        }
        if wire_id.0 < self.values.len() {
            return Err(Error::WireAlreadyAssigned(wire_id));
        }
        if wire_id.0 != self.values.len() {
            return Err(Error::InvalidWireIndex(wire_id));
        }
        self.values.push(value);
        Ok(())
    }

    /// Next wire to be assigned
    pub fn next_wire(&self) -> WireId {
        WireId(self.values.len())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.values.len() == self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = (WireId, bool)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(index, bit)| (WireId(index), *bit))
    }

    /// Every wire value except the constant, in wire order
    pub fn to_bits(&self) -> Vec<bool> {
        self.values.iter().skip(1).map(|bit| *bit).collect()
    }
}
