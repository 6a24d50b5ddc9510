//! Generation context and primitive transition emitters
//!
//! [`Codegen`] owns the transition table under construction, the monotonic
//! state counter, and the reserved reject state. The primitive emitters are
//! thin builders over raw transition records; each takes a start state and
//! the successor state(s), emits one transition per alphabet symbol, and
//! returns the state the operation ends in, so callers thread the "current
//! state" through a chain of calls.
//!
//! All primitives iterate the full alphabet, so every state they touch is
//! total and deterministic by construction.

use crate::symbol::{Dir, Symbol};
use crate::table::{State, Transition, TransitionTable};
use crate::WORD_BITS;

/// Code-generation context for one module
pub struct Codegen {
    table: TransitionTable,
    next_state: u32,
    reject: State,
}

impl Codegen {
    /// Create a context for a program whose highest pc is `max_pc`
    ///
    /// States `0..=max_pc` are reserved for IR program counters; the first
    /// allocated state is the reject state, a permanent sink for structural
    /// failures in the generated machine.
    pub fn new(max_pc: u32) -> Self {
        let mut next_state = max_pc + 1;
        let reject = State(next_state);
        next_state += 1;
        Self {
            table: TransitionTable::new(),
            next_state,
            reject,
        }
    }

    /// Allocate a fresh state, strictly greater than all previous ones
    pub fn new_state(&mut self) -> State {
        let state = State(self.next_state);
        self.next_state += 1;
        state
    }

    /// The reject state
    pub fn reject(&self) -> State {
        self.reject
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    pub fn into_table(self) -> TransitionTable {
        self.table
    }

    /// Append a comment line to the table
    pub fn comment(&mut self, text: impl Into<String>) {
        self.table.comment(text);
    }

    fn transition(&mut self, q: State, read: Symbol, write: Symbol, dir: Dir, r: State) {
        self.table.push(Transition {
            from: q,
            read,
            to: r,
            write,
            dir,
        });
    }

    /// Write `b` and move `d`, regardless of the symbol read
    pub fn write(&mut self, q: State, b: Symbol, d: Dir, r: State) -> State {
        for s in Symbol::ALL {
            self.transition(q, s, b, d, r);
        }
        r
    }

    /// Write transitions that do one thing for symbol `a` and another for
    /// all other symbols; returns the state for the latter case
    #[allow(clippy::too_many_arguments)]
    pub fn write_if(
        &mut self,
        q: State,
        a: Symbol,
        ba: Symbol,
        da: Dir,
        ra: State,
        b: Symbol,
        d: Dir,
        r: State,
    ) -> State {
        for s in Symbol::ALL {
            if s == a {
                self.transition(q, s, ba, da, ra);
            } else {
                self.transition(q, s, b, d, r);
            }
        }
        r
    }

    /// Two-symbol variant of [`Codegen::write_if`]
    #[allow(clippy::too_many_arguments)]
    pub fn write_if2(
        &mut self,
        q: State,
        a1: Symbol,
        b1: Symbol,
        d1: Dir,
        r1: State,
        a2: Symbol,
        b2: Symbol,
        d2: Dir,
        r2: State,
        b: Symbol,
        d: Dir,
        r: State,
    ) -> State {
        for s in Symbol::ALL {
            if s == a1 {
                self.transition(q, s, b1, d1, r1);
            } else if s == a2 {
                self.transition(q, s, b2, d2, r2);
            } else {
                self.transition(q, s, b, d, r);
            }
        }
        r
    }

    /// Move `d` without altering the tape
    pub fn step(&mut self, q: State, d: Dir, r: State) -> State {
        for s in Symbol::ALL {
            self.transition(q, s, s, d, r);
        }
        r
    }

    /// Move transitions that do one thing for symbol `a` and another for
    /// all other symbols; returns the state for the latter case
    pub fn step_if(&mut self, q: State, a: Symbol, da: Dir, ra: State, d: Dir, r: State) -> State {
        for s in Symbol::ALL {
            if s == a {
                self.transition(q, s, s, da, ra);
            } else {
                self.transition(q, s, s, d, r);
            }
        }
        r
    }

    /// Two-symbol variant of [`Codegen::step_if`]
    #[allow(clippy::too_many_arguments)]
    pub fn step_if2(
        &mut self,
        q: State,
        a: Symbol,
        da: Dir,
        ra: State,
        b: Symbol,
        db: Dir,
        rb: State,
        d: Dir,
        r: State,
    ) -> State {
        for s in Symbol::ALL {
            if s == a {
                self.transition(q, s, s, da, ra);
            } else if s == b {
                self.transition(q, s, s, db, rb);
            } else {
                self.transition(q, s, s, d, r);
            }
        }
        r
    }

    /// Change state without moving or writing
    pub fn noop(&mut self, q: State, r: State) -> State {
        self.step(q, Dir::Stay, r)
    }

    /// Write the low `bits` bits of `value`, most significant first, in the
    /// spread layout: one scratch cell is left blank before each bit, and
    /// the head advances one scratch+bit pair per emitted sub-chain
    pub fn write_bits(&mut self, q: State, value: u32, bits: u32, r: State) -> State {
        let mut q = q;
        for i in (1..bits).rev() {
            q = self.chain_step(q, Dir::Right);
            q = self.chain_write(q, Symbol::bit(value >> i & 1 == 1), Dir::Right);
        }
        q = self.chain_step(q, Dir::Right);
        self.write(q, Symbol::bit(value & 1 == 1), Dir::Right, r)
    }

    /// Write an 8-bit word in the spread layout
    pub fn write_word(&mut self, q: State, value: u32, r: State) -> State {
        self.write_bits(q, value, WORD_BITS, r)
    }

    /// [`Codegen::write`] into a freshly allocated successor state
    pub(crate) fn chain_write(&mut self, q: State, b: Symbol, d: Dir) -> State {
        let r = self.new_state();
        self.write(q, b, d, r)
    }

    /// [`Codegen::step`] into a freshly allocated successor state
    pub(crate) fn chain_step(&mut self, q: State, d: Dir) -> State {
        let r = self.new_state();
        self.step(q, d, r)
    }

    /// [`Codegen::write_word`] into a freshly allocated successor state
    pub(crate) fn chain_write_word(&mut self, q: State, value: u32) -> State {
        let r = self.new_state();
        self.write_word(q, value, r)
    }
}
