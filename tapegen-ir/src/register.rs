//! Register definitions for the register-machine IR

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of machine registers
pub const NUM_REGISTERS: usize = 6;

/// Machine register (a, b, c, d, bp, sp)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Register {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    /// Base pointer
    Bp = 4,
    /// Stack pointer
    Sp = 5,
}

impl Register {
    /// All registers, in index order
    pub const ALL: [Register; NUM_REGISTERS] = [
        Register::A,
        Register::B,
        Register::C,
        Register::D,
        Register::Bp,
        Register::Sp,
    ];

    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::C => "c",
            Self::D => "d",
            Self::Bp => "bp",
            Self::Sp => "sp",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
