//! Lowering driver
//!
//! Emits the tape prologue, then lowers instructions in program order,
//! threading the current state and stitching basic blocks onto their
//! program-counter states.

use crate::emit::Codegen;
use crate::error::CodegenError;
use crate::symbol::{Dir, Symbol};
use crate::table::{State, TransitionTable};
use tapegen_ir::{Module, Register};

/// The generated machine
#[derive(Clone, Debug)]
pub struct Machine {
    /// The complete transition table; execution starts in state 0 on an
    /// all-blank tape
    pub table: TransitionTable,

    /// The reject sink; a correctly generated table never reaches it
    pub reject: State,
}

/// Generate the transition table for `module`
///
/// Every basic block's entry point is the state with the same number as its
/// pc; additional states are numbered starting after the highest pc.
pub fn generate(module: &Module) -> Result<Machine, CodegenError> {
    module.validate()?;

    let mut cg = Codegen::new(module.max_pc());
    let mut q = cg.emit_prologue(module);

    let mut prev_pc = 0;
    for inst in &module.text {
        cg.comment(inst.to_string());

        // If new pc, transition to the state corresponding to it.
        if inst.pc != prev_pc && q != State(inst.pc) {
            q = cg.noop(q, State(inst.pc));
        }
        prev_pc = inst.pc;

        q = cg.lower_inst(q, inst)?;
    }

    let machine = Machine {
        reject: cg.reject(),
        table: cg.into_table(),
    };
    machine.table.validate()?;
    tracing::debug!(transitions = machine.table.len(), "generated transition table");
    Ok(machine)
}

impl Codegen {
    /// Emit the tape prologue: start sentinel, zero-initialized registers,
    /// memory cells from the data segment, end sentinel, rewind
    ///
    /// Starts in state 0 and returns the state the rewound machine is left
    /// in, with the head on the start sentinel.
    fn emit_prologue(&mut self, module: &Module) -> State {
        self.comment("beginning-of-tape marker");
        let mut q = self.chain_write(State(0), Symbol::Start, Dir::Right);

        for reg in Register::ALL {
            self.comment(format!("register {} value 0", reg));
            q = self.chain_write(q, Symbol::Blank, Dir::Right);
            q = self.chain_write(q, Symbol::Register, Dir::Right);
            q = self.chain_write_word(q, reg.index() as u32);
            q = self.chain_write(q, Symbol::Blank, Dir::Right);
            q = self.chain_write(q, Symbol::Value, Dir::Right);
            q = self.chain_write_word(q, 0);
        }

        for (address, &value) in module.data.iter().enumerate() {
            if value.is_ascii_graphic() || value == b' ' {
                self.comment(format!("address {} value {} '{}'", address, value, value as char));
            } else {
                self.comment(format!("address {} value {}", address, value));
            }
            q = self.chain_write(q, Symbol::Blank, Dir::Right);
            q = self.chain_write(q, Symbol::Address, Dir::Right);
            q = self.chain_write_word(q, address as u32);
            q = self.chain_write(q, Symbol::Blank, Dir::Right);
            q = self.chain_write(q, Symbol::Value, Dir::Right);
            q = self.chain_write_word(q, value as u32);
        }

        q = self.chain_write(q, Symbol::Blank, Dir::Right);
        q = self.chain_write(q, Symbol::End, Dir::Left);
        self.chain_rewind(q)
    }
}
