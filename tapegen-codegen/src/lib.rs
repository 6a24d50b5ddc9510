//! # Turing-Machine Backend
//!
//! Lowers the register-machine IR to a complete transition table for a
//! single-tape, single-head, deterministic Turing machine. Executing the
//! table from state 0 on an all-blank tape reproduces the observable
//! behavior of the source program: register and memory effects, and the
//! output byte stream.
//!
//! ## Key Features
//!
//! - **Fixed 12-symbol alphabet**: every emitted state defines a transition
//!   for every symbol, so the table is total and deterministic by
//!   construction
//! - **Marker-based tape layout**: registers, memory cells, and output
//!   cells are located by linear search for marker symbols, never by
//!   computed offsets
//! - **Composable tape operations**: search, register lookup, bit-serial
//!   copy, and binary arithmetic, each with a documented head-position
//!   calling convention
//! - **Pc-aliased states**: state `p` is the entry point of the basic block
//!   at pc `p`, so control transfer is state transfer
//!
//! ## Example
//!
//! ```rust
//! use tapegen_ir::{Inst, Module, Op, Operand};
//! use tapegen_codegen::generate;
//!
//! let module = Module::new(
//!     vec![
//!         Inst::new(0, Op::Putc { src: Operand::Imm(72) }),
//!         Inst::new(0, Op::Exit),
//!     ],
//!     vec![],
//! );
//! let machine = generate(&module).unwrap();
//! print!("{}", machine.table);
//! ```

pub mod emit;
pub mod error;
pub mod lower;
pub mod ops;
pub mod symbol;
pub mod table;

mod translate;

pub use emit::Codegen;
pub use error::CodegenError;
pub use lower::{generate, Machine};
pub use ops::CopyLayout;
pub use symbol::{Dir, Symbol, ALPHABET_SIZE};
pub use table::{State, Transition, TransitionTable};

/// Width in bits of every stored word (register indices, values, memory
/// addresses, output bytes)
pub const WORD_BITS: u32 = 8;
