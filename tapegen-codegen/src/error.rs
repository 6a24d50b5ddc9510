//! Error types for the Turing-machine backend

use tapegen_ir::IrError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("Invalid module: {0}")]
    InvalidModule(#[from] IrError),

    #[error("pc {pc}: register-indirect jumps are not supported")]
    IndirectJump { pc: u32 },

    #[error("pc {pc}: {op} with the same source and destination register ({reg}) is not supported")]
    SameRegisterArithmetic {
        pc: u32,
        op: &'static str,
        reg: &'static str,
    },

    #[error("pc {pc}: {mnemonic} is not supported by this backend")]
    UnsupportedOp { pc: u32, mnemonic: &'static str },

    // Table invariant violations; reaching these is a generator bug
    #[error("Duplicate transition for state {state} on symbol '{symbol}'")]
    DuplicateTransition { state: u32, symbol: &'static str },

    #[error("State {state} defines {defined} transitions (expected one per alphabet symbol)")]
    IncompleteState { state: u32, defined: usize },
}
