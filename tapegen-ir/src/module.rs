//! IR module: instruction list plus initial data segment
//!
//! A module is the complete unit a backend consumes. The text section is a
//! flat instruction list in program order; the data section is the initial
//! contents of memory, one byte per cell, addressed by position.

use crate::error::IrError;
use crate::instruction::{Inst, Op, Operand};
use serde::{Deserialize, Serialize};

/// Memory cells are addressed by 8-bit words, so a data segment can hold at
/// most 256 entries.
pub const MAX_DATA_CELLS: usize = 256;

/// A complete IR module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Instructions in program order
    pub text: Vec<Inst>,

    /// Initial memory contents, address = position
    pub data: Vec<u8>,
}

impl Module {
    pub fn new(text: Vec<Inst>, data: Vec<u8>) -> Self {
        Self { text, data }
    }

    /// Highest program counter in the text section (0 for an empty module)
    pub fn max_pc(&self) -> u32 {
        self.text.iter().map(|inst| inst.pc).max().unwrap_or(0)
    }

    /// Validate the module
    ///
    /// Checks the contract a backend relies on: program counters are
    /// non-decreasing, every immediate jump targets the pc of some
    /// instruction, and the data segment fits the 8-bit address space.
    pub fn validate(&self) -> Result<(), IrError> {
        let mut prev_pc = 0;
        for inst in &self.text {
            if inst.pc < prev_pc {
                return Err(IrError::NonMonotonicPc {
                    pc: inst.pc,
                    prev: prev_pc,
                });
            }
            prev_pc = inst.pc;
        }

        for inst in &self.text {
            if let Op::Jmp {
                target: Operand::Imm(target),
            } = inst.op
            {
                if !self.text.iter().any(|i| i.pc == target) {
                    return Err(IrError::JumpOutOfRange {
                        pc: inst.pc,
                        target,
                    });
                }
            }
        }

        if self.data.len() > MAX_DATA_CELLS {
            return Err(IrError::DataSegmentTooLarge {
                len: self.data.len(),
            });
        }

        Ok(())
    }
}
