//! End-to-end tests for the Turing-machine backend
//!
//! Each test lowers a complete IR module to a transition table, executes
//! the table with the reference interpreter from state 0 on a blank tape,
//! and checks the output byte stream decoded from the halted tape.

mod common;

use common::Interpreter;
use tapegen_codegen::{generate, CodegenError};
use tapegen_ir::{Inst, Module, Op, Operand, Register};

fn run_program(module: &Module) -> (u32, common::Halted) {
    let machine = generate(module).unwrap();
    let halted = Interpreter::parse(&machine.table.to_string()).run();
    (machine.reject.0, halted)
}

// ============================================================================
// Generate -> Execute scenarios
// ============================================================================

#[test]
fn test_add_then_putc() {
    // a = 5; b = 3; a += b; output a
    let module = Module::new(
        vec![
            Inst::new(0, Op::Mov { dst: Register::A, src: Operand::Imm(5) }),
            Inst::new(0, Op::Mov { dst: Register::B, src: Operand::Imm(3) }),
            Inst::new(0, Op::Add { dst: Register::A, src: Operand::Reg(Register::B) }),
            Inst::new(0, Op::Putc { src: Operand::Reg(Register::A) }),
            Inst::new(0, Op::Exit),
        ],
        vec![],
    );

    let (reject, halted) = run_program(&module);
    assert_ne!(halted.state, reject, "machine fell into the reject state");
    assert_eq!(halted.output_bytes(), vec![8]);
}

#[test]
fn test_data_segment_is_laid_out_and_crossed() {
    // The backend has no load instruction, so memory contents are
    // observable only through the tape blocks the prologue emits; the
    // searches every putc and copy performs must cross them intact.
    let module = Module::new(
        vec![
            Inst::new(0, Op::Putc { src: Operand::Imm(72) }),
            Inst::new(0, Op::Putc { src: Operand::Imm(73) }),
            Inst::new(0, Op::Exit),
        ],
        vec![72, 73],
    );

    let machine = generate(&module).unwrap();
    let text = machine.table.to_string();
    assert!(text.contains("// address 0 value 72 'H'"));
    assert!(text.contains("// address 1 value 73 'I'"));

    let halted = Interpreter::parse(&text).run();
    assert_ne!(halted.state, machine.reject.0);
    assert_eq!(halted.output_bytes(), vec![72, 73]);
}

#[test]
fn test_backward_jump_loop() {
    // Block 0 jumps forward over block 1 into block 2; block 2 jumps back
    // to block 1, which exits. Counts a down from 3, emitting each value.
    let module = Module::new(
        vec![
            Inst::new(0, Op::Mov { dst: Register::A, src: Operand::Imm(3) }),
            Inst::new(0, Op::Jmp { target: Operand::Imm(2) }),
            Inst::new(1, Op::Putc { src: Operand::Reg(Register::A) }),
            Inst::new(1, Op::Sub { dst: Register::A, src: Operand::Imm(1) }),
            Inst::new(1, Op::Putc { src: Operand::Reg(Register::A) }),
            Inst::new(1, Op::Exit),
            Inst::new(2, Op::Putc { src: Operand::Reg(Register::A) }),
            Inst::new(2, Op::Sub { dst: Register::A, src: Operand::Imm(1) }),
            Inst::new(2, Op::Putc { src: Operand::Reg(Register::A) }),
            Inst::new(2, Op::Sub { dst: Register::A, src: Operand::Imm(1) }),
            Inst::new(2, Op::Jmp { target: Operand::Imm(1) }),
        ],
        vec![],
    );

    let (reject, halted) = run_program(&module);
    assert_ne!(halted.state, reject);
    assert_eq!(halted.output_bytes(), vec![3, 2, 1, 0]);
}

#[test]
fn test_forward_jump_skips_a_block() {
    let module = Module::new(
        vec![
            Inst::new(0, Op::Mov { dst: Register::A, src: Operand::Imm(1) }),
            Inst::new(0, Op::Jmp { target: Operand::Imm(2) }),
            Inst::new(1, Op::Putc { src: Operand::Imm(99) }),
            Inst::new(2, Op::Putc { src: Operand::Reg(Register::A) }),
            Inst::new(2, Op::Exit),
        ],
        vec![],
    );

    let (reject, halted) = run_program(&module);
    assert_ne!(halted.state, reject);
    assert_eq!(halted.output_bytes(), vec![1]);
}

#[test]
fn test_same_register_mov_is_a_noop() {
    let module = Module::new(
        vec![
            Inst::new(0, Op::Mov { dst: Register::A, src: Operand::Imm(7) }),
            Inst::new(0, Op::Mov { dst: Register::A, src: Operand::Reg(Register::A) }),
            Inst::new(0, Op::Putc { src: Operand::Reg(Register::A) }),
            Inst::new(0, Op::Exit),
        ],
        vec![],
    );

    let (reject, halted) = run_program(&module);
    assert_ne!(halted.state, reject);
    assert_eq!(halted.output_bytes(), vec![7]);
}

#[test]
fn test_dump_has_no_tape_effect() {
    let module = Module::new(
        vec![
            Inst::new(0, Op::Mov { dst: Register::A, src: Operand::Imm(4) }),
            Inst::new(0, Op::Dump),
            Inst::new(0, Op::Putc { src: Operand::Reg(Register::A) }),
            Inst::new(0, Op::Exit),
        ],
        vec![],
    );

    let (reject, halted) = run_program(&module);
    assert_ne!(halted.state, reject);
    assert_eq!(halted.output_bytes(), vec![4]);
}

#[test]
fn test_exit_with_no_output_blanks_the_tape() {
    let module = Module::new(
        vec![
            Inst::new(0, Op::Mov { dst: Register::A, src: Operand::Imm(1) }),
            Inst::new(0, Op::Exit),
        ],
        vec![],
    );

    let (reject, halted) = run_program(&module);
    assert_ne!(halted.state, reject);
    assert_eq!(halted.output_bytes(), vec![]);
    assert!(halted.is_blank(0..1000), "tape should be fully cleared");
}

#[test]
fn test_exit_blanks_everything_after_the_output() {
    let module = Module::new(
        vec![
            Inst::new(0, Op::Putc { src: Operand::Imm(255) }),
            Inst::new(0, Op::Putc { src: Operand::Imm(0) }),
            Inst::new(0, Op::Exit),
        ],
        vec![],
    );

    let (reject, halted) = run_program(&module);
    assert_ne!(halted.state, reject);
    assert_eq!(halted.output_bytes(), vec![255, 0]);
    // Two bytes occupy cells 0..16; everything beyond is cleared.
    assert!(halted.is_blank(16..1000));
}

// ============================================================================
// Unsupported IR shapes abort generation
// ============================================================================

#[test]
fn test_indirect_jump_aborts_generation() {
    let module = Module::new(
        vec![Inst::new(0, Op::Jmp { target: Operand::Reg(Register::A) })],
        vec![],
    );
    assert!(matches!(
        generate(&module),
        Err(CodegenError::IndirectJump { pc: 0 })
    ));
}

#[test]
fn test_same_register_arithmetic_aborts_generation() {
    let module = Module::new(
        vec![Inst::new(0, Op::Add {
            dst: Register::B,
            src: Operand::Reg(Register::B),
        })],
        vec![],
    );
    assert!(matches!(
        generate(&module),
        Err(CodegenError::SameRegisterArithmetic { pc: 0, op: "add", .. })
    ));
}

#[test]
fn test_load_and_store_abort_generation() {
    let load = Module::new(
        vec![Inst::new(0, Op::Load {
            dst: Register::A,
            addr: Operand::Imm(0),
        })],
        vec![],
    );
    assert!(matches!(
        generate(&load),
        Err(CodegenError::UnsupportedOp { mnemonic: "load", .. })
    ));

    let store = Module::new(
        vec![Inst::new(0, Op::Store {
            src: Register::A,
            addr: Operand::Imm(0),
        })],
        vec![],
    );
    assert!(matches!(
        generate(&store),
        Err(CodegenError::UnsupportedOp { mnemonic: "store", .. })
    ));
}
