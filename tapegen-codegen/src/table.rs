//! Transition-table artifact
//!
//! The table is the sole output of code generation: an ordered list of
//! transition records, optionally interleaved with comment lines for human
//! traceability. It renders one line per transition:
//!
//! ```text
//! <state> <read> <next-state> <write> <L|N|R>
//! ```
//!
//! Comment lines start with `//` and must be ignored by any consumer.

use crate::error::CodegenError;
use crate::symbol::{Dir, Symbol, ALPHABET_SIZE};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Machine state identifier
///
/// States `0..=max_pc` coincide with IR program counters; all other states
/// are allocated monotonically above them and never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State(pub u32);

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single transition record
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: State,
    pub read: Symbol,
    pub to: State,
    pub write: Symbol,
    pub dir: Dir,
}

#[derive(Clone, Debug)]
enum Line {
    Transition(Transition),
    Comment(String),
}

/// The emitted transition table
#[derive(Clone, Debug, Default)]
pub struct TransitionTable {
    lines: Vec<Line>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transition record
    pub fn push(&mut self, transition: Transition) {
        self.lines.push(Line::Transition(transition));
    }

    /// Append a comment line
    pub fn comment(&mut self, text: impl Into<String>) {
        self.lines.push(Line::Comment(text.into()));
    }

    /// Iterate over the transition records, in emission order
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.lines.iter().filter_map(|line| match line {
            Line::Transition(t) => Some(t),
            Line::Comment(_) => None,
        })
    }

    /// Number of transition records
    pub fn len(&self) -> usize {
        self.transitions().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the structural invariants of the table
    ///
    /// Determinism: at most one transition per `(state, read)` pair.
    /// Totality: every state that emits at all emits all 12 symbols.
    pub fn validate(&self) -> Result<(), CodegenError> {
        let mut seen: HashSet<(State, Symbol)> = HashSet::new();
        let mut per_state: HashMap<State, usize> = HashMap::new();

        for t in self.transitions() {
            if !seen.insert((t.from, t.read)) {
                return Err(CodegenError::DuplicateTransition {
                    state: t.from.0,
                    symbol: t.read.token(),
                });
            }
            *per_state.entry(t.from).or_insert(0) += 1;
        }

        for (state, count) in per_state {
            if count != ALPHABET_SIZE {
                return Err(CodegenError::IncompleteState {
                    state: state.0,
                    defined: count,
                });
            }
        }

        Ok(())
    }
}

impl fmt::Display for TransitionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            match line {
                Line::Transition(t) => writeln!(
                    f,
                    "{} {} {} {} {}",
                    t.from, t.read, t.to, t.write, t.dir
                )?,
                Line::Comment(text) => writeln!(f, "// {}", text)?,
            }
        }
        Ok(())
    }
}
