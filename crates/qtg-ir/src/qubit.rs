//! Qubit and classical bit identifiers.
//!
//! Ids are dense and little-endian: qubit `k` is bit `k` of a computational
//! basis index, so the bitstring of a basis state lists qubit 0 first.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a qubit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub u32);

/// Identifier of a classical bit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

macro_rules! bit_id {
    ($ty:ident, $prefix:literal) => {
        impl $ty {
            /// Position of this bit, as an array index.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<u32> for $ty {
            fn from(id: u32) -> Self {
                $ty(id)
            }
        }
    };
}

bit_id!(QubitId, "q");
bit_id!(ClbitId, "c");

/// Position of a bit inside a named register.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegisterSlot {
    pub register: String,
    pub offset: u32,
}

/// A circuit bit and, if it was allocated as part of a register, its slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bit<I> {
    pub id: I,
    pub slot: Option<RegisterSlot>,
}

/// A qubit of a circuit.
pub type Qubit = Bit<QubitId>;
/// A classical bit of a circuit.
pub type Clbit = Bit<ClbitId>;

impl<I> Bit<I> {
    /// A bit outside any register.
    pub fn loose(id: I) -> Self {
        Self { id, slot: None }
    }

    /// Bit `offset` of register `register`.
    pub fn in_register(id: I, register: impl Into<String>, offset: u32) -> Self {
        Self {
            id,
            slot: Some(RegisterSlot {
                register: register.into(),
                offset,
            }),
        }
    }

    /// Name of the owning register.
    pub fn register(&self) -> Option<&str> {
        self.slot.as_ref().map(|s| s.register.as_str())
    }
}

impl<I: fmt::Display> fmt::Display for Bit<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.slot {
            Some(slot) => write!(f, "{}[{}]", slot.register, slot.offset),
            None => write!(f, "{}", self.id),
        }
    }
}
