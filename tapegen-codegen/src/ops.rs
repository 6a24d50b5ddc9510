//! Composite tape operations
//!
//! Built from the primitive emitters: linear search, rewind/fast-forward,
//! register lookup, the bit-serial copy engine, and binary arithmetic.
//!
//! Each operation documents its entry and exit head positions. Violating an
//! entry precondition is the caller's bug; an operation that discovers a
//! structurally impossible tape (a marker missing before the boundary
//! sentinel, an unexpected symbol mid-word) transitions to the reject state.

use crate::emit::Codegen;
use crate::symbol::{Dir, Symbol};
use crate::table::State;
use crate::WORD_BITS;
use tapegen_ir::Register;

/// Destination layout for the bit-serial copy engine
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CopyLayout {
    /// A blank scratch cell is inserted before each bit: the destination is
    /// a stored word (register or memory value, output cell)
    Spread,
    /// The cell after each bit is left undisturbed: the bits land in the
    /// scratch cells of an existing word, staging an arithmetic operand
    Interleaved,
    /// No extra cells: the bits land contiguously (output compaction)
    Compact,
}

impl Codegen {
    /// Scan in direction `d` until `target` is read (continue in `r_yes`,
    /// head on the matched cell) or the boundary sentinel in that direction
    /// is read first (continue in `r_no`, head on the sentinel)
    pub fn find(&mut self, q: State, d: Dir, target: Symbol, r_yes: State, r_no: State) -> State {
        let boundary = match d {
            Dir::Left => Symbol::Start,
            _ => Symbol::End,
        };
        self.step_if2(q, target, Dir::Stay, r_yes, boundary, Dir::Stay, r_no, d, q);
        r_yes
    }

    /// Move to the left end of the tape; the head ends on the start sentinel
    pub fn rewind(&mut self, q: State, r: State) -> State {
        self.step_if(q, Symbol::Start, Dir::Stay, r, Dir::Left, q);
        r
    }

    /// Move to the right end of the used portion of the tape; the head ends
    /// on the end sentinel
    pub fn ffwd(&mut self, q: State, r: State) -> State {
        self.step_if(q, Symbol::End, Dir::Stay, r, Dir::Right, q);
        r
    }

    /// Locate the register block whose stored index equals `reg`
    ///
    /// Scans right for a register marker and compares the stored index word
    /// bit by bit; any mismatch restarts the scan at the next marker, so
    /// registers are tried in tape order until a match or the end sentinel
    /// (reject). The head ends on the scratch cell to the left of the
    /// register's value word.
    pub fn find_register(&mut self, q: State, reg: Register, r: State) -> State {
        let rej = self.reject();
        let scan = q;
        let found = self.new_state();
        let mut q = self.find(q, Dir::Right, Symbol::Register, found, rej); // _[r]_0_1 ... _v_0_1
        q = self.chain_step(q, Dir::Right); //                                 _r[_]0_1 ... _v_0_1

        let index = reg.index() as u32;
        for i in (0..WORD_BITS).rev() {
            q = self.chain_step(q, Dir::Right); //                             _r_[0]_1 ... _v_0_1
            let bit = Symbol::bit(index >> i & 1 == 1);
            let matched = self.new_state();
            self.step_if2(
                q,
                bit,
                Dir::Right,
                matched, //                                                    _r_0[_]1 ... _v_0_1
                Symbol::End,
                Dir::Stay,
                rej,
                Dir::Right,
                scan,
            );
            q = matched;
        }
        q = self.chain_step(q, Dir::Right); //                                 _r_0_1 ... _[v]_0_1
        self.step_if(q, Symbol::Value, Dir::Right, r, Dir::Stay, rej); //      _r_0_1 ... _v[_]0_1
        r
    }

    /// Bit-serial copy from the current position to the position marked
    /// with the destination marker, scanning for it in direction `d`
    ///
    /// The head starts on the scratch cell to the left of the source word
    /// (spread layout) and ends on the cell to the right of the destination
    /// word, which is blanked. The source word is left intact.
    pub fn copy_helper(&mut self, q: State, d: Dir, layout: CopyLayout, r: State) -> State {
        let rej = self.reject();
        //                                                      [_]0_1 ... dx_x
        let mut q = self.chain_write(q, Symbol::Src, Dir::Stay); // [s]0_1 ... dx_x
        let next_bit = q;
        q = self.chain_write(q, Symbol::Blank, Dir::Right); //   _[0]_1 ... dx_x
        let mut q0 = self.new_state();
        let mut q1 = self.new_state();
        let cleanup = self.new_state();
        self.step_if2(
            q,
            Symbol::Zero,
            Dir::Right,
            q0, //                                               _0[_]1 ... dx_x
            Symbol::One,
            Dir::Right,
            q1,
            Dir::Stay,
            cleanup,
        );
        let join = self.new_state();

        q0 = self.chain_write(q0, Symbol::Src, Dir::Right); //   _0s[1] ... dx_x
        let hit0 = self.new_state();
        q0 = self.find(q0, d, Symbol::Dst, hit0, rej); //        _0s1 ... [d]x_x
        if layout == CopyLayout::Spread {
            q0 = self.chain_write(q0, Symbol::Blank, Dir::Right); // _0s1 ... _[x]_x
        }
        self.write(q0, Symbol::Zero, Dir::Right, join); //       _0s1 ... _0[_]x

        q1 = self.chain_write(q1, Symbol::Src, Dir::Right);
        let hit1 = self.new_state();
        q1 = self.find(q1, d, Symbol::Dst, hit1, rej);
        if layout == CopyLayout::Spread {
            q1 = self.chain_write(q1, Symbol::Blank, Dir::Right);
        }
        self.write(q1, Symbol::One, Dir::Right, join);

        q = join;
        if layout == CopyLayout::Interleaved {
            q = self.chain_step(q, Dir::Right);
        }
        q = self.chain_write(q, Symbol::Dst, Dir::Stay); //      _0s1 ... _0[d]x
        self.find(q, d.flip(), Symbol::Src, next_bit, rej); //   _0[s]1 ... _0dx

        let stale = self.new_state();
        let q = self.find(cleanup, d, Symbol::Dst, stale, rej);
        self.write(q, Symbol::Blank, Dir::Stay, r)
    }

    /// Copy a word into a stored-word destination (spread layout)
    pub fn copy(&mut self, q: State, d: Dir, r: State) -> State {
        self.copy_helper(q, d, CopyLayout::Spread, r)
    }

    /// Copy a word into the scratch cells of an existing word, producing
    /// the interleaved layout the arithmetic operations consume
    pub fn copy_to_scratch(&mut self, q: State, d: Dir, r: State) -> State {
        self.copy_helper(q, d, CopyLayout::Interleaved, r)
    }

    /// Copy a word into contiguous cells with no scratch space
    pub fn copy_compact(&mut self, q: State, d: Dir, r: State) -> State {
        self.copy_helper(q, d, CopyLayout::Compact, r)
    }

    /// Add the word in the scratch cells to the word in the main cells
    ///
    /// Operands are in the interleaved layout: each scratch bit sits to the
    /// right of its main bit, and the pairs are consumed right to left,
    /// least significant bit first, so the carry stays local. The head
    /// starts on the scratch cell to the right of the word and ends on the
    /// scratch cell to the left of it, with the sum mod 256 left in the
    /// main cells and the scratch bits consumed.
    pub fn add(&mut self, q: State, r: State) -> State {
        let rej = self.reject();
        // Scratch-read states (carry 0/1) and main-bit states (sum so far
        // 0/1/2); the first non-bit scratch cell terminates the loop.
        let s0 = q;
        let s1 = self.new_state();
        let m0 = self.new_state();
        let m1 = self.new_state();
        let m2 = self.new_state();
        self.write_if2(s0, Symbol::Zero, Symbol::Blank, Dir::Left, m0,
                       Symbol::One, Symbol::Blank, Dir::Left, m1,
                       Symbol::Blank, Dir::Stay, r);
        self.write_if2(s1, Symbol::Zero, Symbol::Blank, Dir::Left, m1,
                       Symbol::One, Symbol::Blank, Dir::Left, m2,
                       Symbol::Blank, Dir::Stay, r);
        self.write_if2(m0, Symbol::Zero, Symbol::Zero, Dir::Left, s0,
                       Symbol::One, Symbol::One, Dir::Left, s0,
                       Symbol::Zero, Dir::Stay, rej);
        self.write_if2(m1, Symbol::Zero, Symbol::One, Dir::Left, s0,
                       Symbol::One, Symbol::Zero, Dir::Left, s1,
                       Symbol::Zero, Dir::Stay, rej);
        self.write_if2(m2, Symbol::Zero, Symbol::Zero, Dir::Left, s1,
                       Symbol::One, Symbol::One, Dir::Left, s1,
                       Symbol::Zero, Dir::Stay, rej);
        r
    }

    /// Subtract the word in the scratch cells from the word in the main
    /// cells; same conventions as [`Codegen::add`], two's-complement
    /// wraparound, the final borrow is dropped
    pub fn sub(&mut self, q: State, r: State) -> State {
        let rej = self.reject();
        let s0 = q;
        let s1 = self.new_state();
        let m0 = self.new_state();
        let m1 = self.new_state();
        let m2 = self.new_state();
        self.write_if2(s0, Symbol::Zero, Symbol::Blank, Dir::Left, m0,
                       Symbol::One, Symbol::Blank, Dir::Left, m1,
                       Symbol::Blank, Dir::Stay, r);
        self.write_if2(s1, Symbol::Zero, Symbol::Blank, Dir::Left, m1,
                       Symbol::One, Symbol::Blank, Dir::Left, m2,
                       Symbol::Blank, Dir::Stay, r);
        self.write_if2(m0, Symbol::Zero, Symbol::Zero, Dir::Left, s0,
                       Symbol::One, Symbol::One, Dir::Left, s0,
                       Symbol::Zero, Dir::Stay, rej);
        self.write_if2(m1, Symbol::Zero, Symbol::One, Dir::Left, s1,
                       Symbol::One, Symbol::Zero, Dir::Left, s0,
                       Symbol::Zero, Dir::Stay, rej);
        self.write_if2(m2, Symbol::Zero, Symbol::Zero, Dir::Left, s1,
                       Symbol::One, Symbol::One, Dir::Left, s1,
                       Symbol::Zero, Dir::Stay, rej);
        r
    }

    /// [`Codegen::rewind`] into a freshly allocated successor state
    pub(crate) fn chain_rewind(&mut self, q: State) -> State {
        let r = self.new_state();
        self.rewind(q, r)
    }

    /// [`Codegen::ffwd`] into a freshly allocated successor state
    pub(crate) fn chain_ffwd(&mut self, q: State) -> State {
        let r = self.new_state();
        self.ffwd(q, r)
    }

    /// [`Codegen::find_register`] into a freshly allocated successor state
    pub(crate) fn chain_find_register(&mut self, q: State, reg: Register) -> State {
        let r = self.new_state();
        self.find_register(q, reg, r)
    }

    /// [`Codegen::copy`] into a freshly allocated successor state
    pub(crate) fn chain_copy(&mut self, q: State, d: Dir) -> State {
        let r = self.new_state();
        self.copy(q, d, r)
    }

    /// [`Codegen::copy_to_scratch`] into a freshly allocated successor state
    pub(crate) fn chain_copy_to_scratch(&mut self, q: State, d: Dir) -> State {
        let r = self.new_state();
        self.copy_to_scratch(q, d, r)
    }

    /// [`Codegen::copy_compact`] into a freshly allocated successor state
    pub(crate) fn chain_copy_compact(&mut self, q: State, d: Dir) -> State {
        let r = self.new_state();
        self.copy_compact(q, d, r)
    }

    /// [`Codegen::add`] into a freshly allocated successor state
    pub(crate) fn chain_add(&mut self, q: State) -> State {
        let r = self.new_state();
        self.add(q, r)
    }

    /// [`Codegen::sub`] into a freshly allocated successor state
    pub(crate) fn chain_sub(&mut self, q: State) -> State {
        let r = self.new_state();
        self.sub(q, r)
    }
}
