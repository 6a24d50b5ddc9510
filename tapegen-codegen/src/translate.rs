//! Instruction translation
//!
//! One handler per opcode, each composing the composite tape operations
//! with explicit head-position bookkeeping: every call must leave the head
//! exactly where the next call expects it. Every handler except JMP both
//! enters and leaves with the head on the start sentinel.

use crate::emit::Codegen;
use crate::error::CodegenError;
use crate::symbol::{Dir, Symbol};
use crate::table::State;
use std::cmp::Ordering;
use tapegen_ir::{Inst, Op, Operand, Register};

/// Direction in which a register-to-register copy scans for its marked
/// destination: register blocks sit on tape in index order
fn copy_dir(dst: Register, src: Register) -> Dir {
    match dst.index().cmp(&src.index()) {
        Ordering::Greater => Dir::Right,
        Ordering::Less => Dir::Left,
        Ordering::Equal => Dir::Stay,
    }
}

impl Codegen {
    /// Lower one instruction starting in state `q`; returns the state its
    /// emitted code ends in
    pub(crate) fn lower_inst(&mut self, q: State, inst: &Inst) -> Result<State, CodegenError> {
        tracing::trace!(pc = inst.pc, op = %inst.op, "lowering instruction");

        match inst.op {
            Op::Mov { dst, src } => Ok(match src {
                Operand::Reg(src_reg) if src_reg == dst => q,
                Operand::Reg(src_reg) => {
                    let mut q = self.chain_find_register(q, dst);
                    q = self.chain_write(q, Symbol::Dst, Dir::Left);
                    q = self.chain_rewind(q);
                    q = self.chain_find_register(q, src_reg);
                    q = self.chain_copy(q, copy_dir(dst, src_reg));
                    self.chain_rewind(q)
                }
                Operand::Imm(value) => {
                    let mut q = self.chain_find_register(q, dst);
                    q = self.chain_write_word(q, value);
                    self.chain_rewind(q)
                }
            }),

            Op::Add { dst, src } | Op::Sub { dst, src } => {
                // Positioning the head is tricky because add/sub consume
                // their operands right to left.
                let mut q = self.chain_find_register(q, dst);
                q = self.chain_step(q, Dir::Right);
                match src {
                    Operand::Reg(src_reg) if src_reg == dst => {
                        return Err(CodegenError::SameRegisterArithmetic {
                            pc: inst.pc,
                            op: inst.op.mnemonic(),
                            reg: dst.name(),
                        });
                    }
                    Operand::Reg(src_reg) => {
                        q = self.chain_step(q, Dir::Right);
                        q = self.chain_write(q, Symbol::Dst, Dir::Stay);
                        q = self.chain_rewind(q);
                        q = self.chain_find_register(q, src_reg);
                        q = self.chain_copy_to_scratch(q, copy_dir(dst, src_reg));
                        q = self.chain_step(q, Dir::Left);
                    }
                    Operand::Imm(value) => {
                        q = self.chain_write_word(q, value);
                    }
                }
                q = self.chain_step(q, Dir::Left);
                q = if matches!(inst.op, Op::Add { .. }) {
                    self.chain_add(q)
                } else {
                    self.chain_sub(q)
                };
                Ok(self.chain_rewind(q))
            }

            Op::Jmp { target } => match target {
                Operand::Imm(target) => {
                    self.noop(q, State(target));
                    // Control transfers unconditionally; the returned state
                    // is a fresh one so the fall-through stitch never emits
                    // a second transition set from the target state.
                    Ok(self.new_state())
                }
                Operand::Reg(_) => Err(CodegenError::IndirectJump { pc: inst.pc }),
            },

            Op::Putc { src } => {
                let mut q = self.chain_ffwd(q);
                q = self.chain_write(q, Symbol::Output, Dir::Right);
                match src {
                    Operand::Reg(src_reg) => {
                        q = self.chain_write(q, Symbol::Dst, Dir::Left);
                        q = self.chain_rewind(q);
                        q = self.chain_find_register(q, src_reg);
                        q = self.chain_copy(q, Dir::Right);
                    }
                    Operand::Imm(value) => {
                        q = self.chain_write_word(q, value);
                    }
                }
                q = self.chain_write(q, Symbol::Blank, Dir::Right);
                q = self.chain_write(q, Symbol::End, Dir::Stay);
                Ok(self.chain_rewind(q))
            }

            Op::Exit => {
                // Consolidate output cells at the left end of the tape.
                let mut q = self.chain_write(q, Symbol::Dst, Dir::Right);
                let clear = self.new_state();
                let find_output = q;
                let found = self.new_state();
                q = self.find(q, Dir::Right, Symbol::Output, found, clear);
                q = self.chain_write(q, Symbol::Blank, Dir::Right);
                q = self.chain_copy_compact(q, Dir::Left);
                self.write(q, Symbol::Dst, Dir::Right, find_output);

                // Clear the rest of the tape, then stop in a state with no
                // outgoing transitions.
                let clear = self.chain_ffwd(clear);
                let halt = self.new_state();
                self.write_if(
                    clear,
                    Symbol::Dst,
                    Symbol::Blank,
                    Dir::Stay,
                    halt,
                    Symbol::Blank,
                    Dir::Left,
                    clear,
                );
                Ok(self.new_state())
            }

            Op::Dump => Ok(q),

            Op::Load { .. } | Op::Store { .. } => Err(CodegenError::UnsupportedOp {
                pc: inst.pc,
                mnemonic: inst.op.mnemonic(),
            }),
        }
    }
}
