//! Reference Turing-machine interpreter for the integration tests
//!
//! Parses the rendered transition-table text and executes it. The
//! production crates only emit tables; executing one is test tooling.
//!
//! Conventions: comment lines start with `//` and are ignored; the tape is
//! unbounded in both directions and blank (`_`) by default; the machine
//! halts when the current `(state, symbol)` pair has no transition.

#![allow(dead_code)]

use std::collections::HashMap;

/// Hard step limit; the generated machines trade speed for simplicity, but
/// a run that gets anywhere near this is looping.
pub const MAX_STEPS: u64 = 50_000_000;

/// A parsed transition table, ready to execute
pub struct Interpreter {
    rules: HashMap<(u32, char), (u32, char, i64)>,
}

/// Machine configuration after halting
pub struct Halted {
    pub state: u32,
    pub head: i64,
    pub steps: u64,
    tape: HashMap<i64, char>,
}

impl Interpreter {
    /// Parse the rendered table text, checking the line format and the
    /// determinism invariant as it goes
    pub fn parse(table: &str) -> Self {
        let mut rules = HashMap::new();
        for line in table.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            assert_eq!(fields.len(), 5, "malformed transition line: {line:?}");

            let state: u32 = fields[0].parse().expect("state is not an integer");
            let read = symbol(fields[1]);
            let next: u32 = fields[2].parse().expect("next state is not an integer");
            let write = symbol(fields[3]);
            let dir = match fields[4] {
                "L" => -1,
                "N" => 0,
                "R" => 1,
                other => panic!("invalid direction token: {other:?}"),
            };

            let prev = rules.insert((state, read), (next, write, dir));
            assert!(
                prev.is_none(),
                "duplicate transition for state {state} on {read:?}"
            );
        }
        Self { rules }
    }

    pub fn transitions(&self) -> &HashMap<(u32, char), (u32, char, i64)> {
        &self.rules
    }

    /// Run from state 0 on an all-blank tape
    pub fn run(&self) -> Halted {
        self.run_from(0, &[], 0)
    }

    /// Run from an arbitrary state, with `tape` laid out from cell 0 and
    /// the head at `head`
    pub fn run_from(&self, state: u32, tape: &[char], head: i64) -> Halted {
        let mut cells: HashMap<i64, char> = tape
            .iter()
            .enumerate()
            .filter(|(_, &c)| c != '_')
            .map(|(i, &c)| (i as i64, c))
            .collect();

        let mut state = state;
        let mut head = head;
        let mut steps = 0;
        loop {
            let read = *cells.get(&head).unwrap_or(&'_');
            let Some(&(next, write, dir)) = self.rules.get(&(state, read)) else {
                return Halted {
                    state,
                    head,
                    steps,
                    tape: cells,
                };
            };

            if write == '_' {
                cells.remove(&head);
            } else {
                cells.insert(head, write);
            }
            head += dir;
            state = next;
            steps += 1;
            assert!(steps <= MAX_STEPS, "machine exceeded {MAX_STEPS} steps");
        }
    }
}

fn symbol(token: &str) -> char {
    let mut chars = token.chars();
    let c = chars.next().expect("empty symbol token");
    assert!(chars.next().is_none(), "symbol token longer than one character");
    assert!(
        "_^$01ravosd.".contains(c),
        "token {c:?} is not in the tape alphabet"
    );
    c
}

impl Halted {
    /// Symbol in the given cell (blank if never written)
    pub fn cell(&self, index: i64) -> char {
        *self.tape.get(&index).unwrap_or(&'_')
    }

    /// Decode the compacted output stream: contiguous bits from cell 0,
    /// eight per byte, most significant first
    pub fn output_bytes(&self) -> Vec<u8> {
        let mut bits = Vec::new();
        let mut i = 0;
        loop {
            match self.cell(i) {
                '0' => bits.push(false),
                '1' => bits.push(true),
                _ => break,
            }
            i += 1;
        }
        assert_eq!(bits.len() % 8, 0, "output is not a whole number of bytes");
        bits.chunks(8)
            .map(|byte| byte.iter().fold(0u8, |acc, &b| acc << 1 | b as u8))
            .collect()
    }

    /// Decode a spread-layout word: a scratch cell before each of eight
    /// bits, most significant first, starting at `start`
    pub fn decode_spread_word(&self, start: i64) -> u8 {
        let mut value = 0u8;
        for k in 0..8 {
            value = match self.cell(start + 2 * k + 1) {
                '0' => value << 1,
                '1' => value << 1 | 1,
                other => panic!("cell {} holds {other:?}, not a bit", start + 2 * k + 1),
            };
        }
        value
    }

    /// True if every cell in `range` is blank
    pub fn is_blank(&self, mut range: std::ops::Range<i64>) -> bool {
        range.all(|i| self.cell(i) == '_')
    }
}
