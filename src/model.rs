/*!
The transition-system model the checker queries.

AIGER parsing and circuit-to-CNF encoding are out of scope for the checker
core (§1) -- the engine only ever sees the [`Model`] trait. This module still
supplies one concrete implementation, [`AigerModel`], reading the ASCII
(`aag`) AIGER 1.9 dialect, Tseitin-encoding AND gates the same way the
reference implementation's `CARSolver::add_equivalence` does (original_source/
carsolver.h), since without *some* producer of a [`Model`] the rest of the
crate has nothing to check.
*/

use std::collections::HashMap;
use std::io::BufRead;

use crate::structures::{Clause, Cube, Literal};
use crate::types::err::{ErrorKind, ParseError};

/// The transition system under check, as consumed by C2/C3/C4/C5.
///
/// Variable ids are partitioned as: `1..=num_inputs` the inputs,
/// `num_inputs+1..=num_inputs+num_latches` the latches, and everything up to
/// `num_vars` the internal (AND-gate) variables. Each latch additionally has
/// a primed copy reachable through [`Model::prime`].
pub trait Model {
    fn num_inputs(&self) -> usize;
    fn num_latches(&self) -> usize;
    fn num_vars(&self) -> usize;

    /// The unique initial state, as a cube over (unprimed) latch literals.
    fn init_cube(&self) -> Cube;

    /// The single output literal encoding the property violation.
    fn bad_lit(&self) -> Literal;

    /// CNF of the transition relation, over current-state, input and
    /// next-state (primed) literals.
    fn transition_clauses(&self) -> &[Clause];

    /// Maps a current-state latch literal to its next-state copy.
    fn prime(&self, lit: Literal) -> Literal;

    /// Maps a next-state (primed) latch literal back to its current-state
    /// copy. Inverse of [`Model::prime`].
    fn unprime(&self, lit: Literal) -> Literal;

    fn latches(&self) -> &[Literal];
    fn inputs(&self) -> &[Literal];
}

/// A model built from an ASCII AIGER (`aag`) file, or programmatically via
/// [`AigerModel::from_parts`] (used heavily in tests, where hand-building a
/// small transition system is far more legible than writing out `aag` text).
#[derive(Clone, Debug)]
pub struct AigerModel {
    num_inputs: usize,
    num_latches: usize,
    num_vars: usize,
    /// Offset added to a latch variable to obtain its primed copy.
    prime_offset: Literal,
    init_cube: Cube,
    bad_lit: Literal,
    transition_clauses: Vec<Clause>,
    latches: Vec<Literal>,
    inputs: Vec<Literal>,
}

impl Model for AigerModel {
    fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    fn num_latches(&self) -> usize {
        self.num_latches
    }

    fn num_vars(&self) -> usize {
        self.num_vars
    }

    fn init_cube(&self) -> Cube {
        self.init_cube.clone()
    }

    fn bad_lit(&self) -> Literal {
        self.bad_lit
    }

    fn transition_clauses(&self) -> &[Clause] {
        &self.transition_clauses
    }

    fn prime(&self, lit: Literal) -> Literal {
        let var = lit.abs();
        let primed_var = var + self.prime_offset;
        if lit > 0 {
            primed_var
        } else {
            -primed_var
        }
    }

    fn unprime(&self, lit: Literal) -> Literal {
        let var = lit.abs();
        debug_assert!(var > self.prime_offset, "literal is not a primed copy");
        let base_var = var - self.prime_offset;
        if lit > 0 {
            base_var
        } else {
            -base_var
        }
    }

    fn latches(&self) -> &[Literal] {
        &self.latches
    }

    fn inputs(&self) -> &[Literal] {
        &self.inputs
    }
}

/// A single AND gate: `lhs <-> rhs0 /\ rhs1`, in AIGER literal encoding
/// (even = positive, `lit / 2` is the variable).
struct AndGate {
    lhs: u32,
    rhs0: u32,
    rhs1: u32,
}

/// A latch: `lit` is its current-state literal, `next` the (unprimed,
/// current-cycle) AIGER literal computing its next-state value.
struct LatchDef {
    lit: u32,
    next: u32,
    /// `Some(true/false)` for a constant reset, `None` for a latch with no
    /// declared reset value (left out of `init_cube`).
    reset: Option<bool>,
}

impl AigerModel {
    /// Builds a model directly from a transition relation already expressed
    /// over (unprimed) current-state/input literals and primed next-state
    /// literals -- the path every hand-built test fixture and boundary
    /// scenario in this crate uses.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        num_inputs: usize,
        num_latches: usize,
        num_vars: usize,
        prime_offset: Literal,
        init_cube: Cube,
        bad_lit: Literal,
        transition_clauses: Vec<Clause>,
        latches: Vec<Literal>,
        inputs: Vec<Literal>,
    ) -> Self {
        Self {
            num_inputs,
            num_latches,
            num_vars,
            prime_offset,
            init_cube,
            bad_lit,
            transition_clauses,
            latches,
            inputs,
        }
    }

    /// Parses an ASCII AIGER (`aag`) file into a [`Model`], Tseitin-encoding
    /// AND gates and latch-update equations the way `CARSolver::add_equivalence`
    /// does in the reference implementation.
    pub fn parse_ascii(mut reader: impl BufRead) -> Result<Self, ErrorKind> {
        let mut header = String::new();
        reader
            .read_line(&mut header)
            .map_err(|_| ErrorKind::from(ParseError::Header))?;

        let mut fields = header.split_whitespace();
        if fields.next() != Some("aag") {
            return Err(ErrorKind::from(ParseError::Header));
        }
        let max_var: u32 = parse_field(&mut fields)?;
        let num_inputs: usize = parse_field::<u32>(&mut fields)? as usize;
        let num_latches: usize = parse_field::<u32>(&mut fields)? as usize;
        let num_outputs: usize = parse_field::<u32>(&mut fields)? as usize;
        let num_ands: usize = parse_field::<u32>(&mut fields)? as usize;

        if num_outputs != 1 {
            return Err(ErrorKind::from(ParseError::BadOutputCount(num_outputs)));
        }

        let mut line_no = 1usize;
        let mut next_line = || -> Result<String, ErrorKind> {
            let mut buf = String::new();
            line_no += 1;
            match reader.read_line(&mut buf) {
                Ok(0) => Err(ErrorKind::from(ParseError::Truncated)),
                Ok(_) => Ok(buf),
                Err(_) => Err(ErrorKind::from(ParseError::Literal(line_no))),
            }
        };

        let mut input_lits = Vec::with_capacity(num_inputs);
        for _ in 0..num_inputs {
            let line = next_line()?;
            let lit: u32 = line
                .trim()
                .parse()
                .map_err(|_| ErrorKind::from(ParseError::Literal(line_no)))?;
            input_lits.push(lit);
        }

        let mut latch_defs = Vec::with_capacity(num_latches);
        for _ in 0..num_latches {
            let line = next_line()?;
            let mut parts = line.split_whitespace();
            let lit: u32 = parse_field(&mut parts)?;
            let next: u32 = parse_field(&mut parts)?;
            let reset = match parts.next() {
                None => Some(false),
                Some("0") => Some(false),
                Some("1") => Some(true),
                Some(other) if other.parse::<u32>() == Ok(lit) => None,
                _ => return Err(ErrorKind::from(ParseError::Literal(line_no))),
            };
            latch_defs.push(LatchDef { lit, next, reset });
        }

        let bad_aiger_lit: u32 = {
            let line = next_line()?;
            line.trim()
                .parse()
                .map_err(|_| ErrorKind::from(ParseError::Literal(line_no)))?
        };

        let mut gates = Vec::with_capacity(num_ands);
        for _ in 0..num_ands {
            let line = next_line()?;
            let mut parts = line.split_whitespace();
            let lhs: u32 = parse_field(&mut parts)?;
            let rhs0: u32 = parse_field(&mut parts)?;
            let rhs1: u32 = parse_field(&mut parts)?;
            gates.push(AndGate { lhs, rhs0, rhs1 });
        }

        // Variables 1..=max_var are the AIGER inputs/latches/gates. A
        // dedicated constant-true variable follows, and primed latch copies
        // follow that.
        let const_true: Literal = max_var as Literal + 1;
        let prime_offset: Literal = const_true;

        let aiger_to_lit = |aiger_lit: u32| -> Literal {
            let var = aiger_lit >> 1;
            let negated = aiger_lit & 1 == 1;
            let base = if var == 0 { const_true } else { var as Literal };
            if negated {
                -base
            } else {
                base
            }
        };

        let mut clauses = vec![Clause::unit(const_true)];

        for gate in &gates {
            let out = aiger_to_lit(gate.lhs * 2);
            let a = aiger_to_lit(gate.rhs0);
            let b = aiger_to_lit(gate.rhs1);
            push_equivalence_and(&mut clauses, out, a, b);
        }

        let mut init_literals = Vec::new();
        let mut latch_lits = Vec::with_capacity(num_latches);
        for def in &latch_defs {
            let cur = aiger_to_lit(def.lit);
            latch_lits.push(cur);
            let primed = Literal::abs(cur) + prime_offset;
            let primed = if cur > 0 { primed } else { -primed };
            let next = aiger_to_lit(def.next);
            push_equivalence_eq(&mut clauses, primed, next);

            match def.reset {
                Some(true) => init_literals.push(cur),
                Some(false) => init_literals.push(-cur),
                None => {}
            }
        }

        let inputs: Vec<Literal> = input_lits.iter().map(|&l| aiger_to_lit(l)).collect();
        let bad_lit = aiger_to_lit(bad_aiger_lit);

        Ok(Self {
            num_inputs,
            num_latches,
            num_vars: (prime_offset as usize) + num_latches,
            prime_offset,
            init_cube: Cube::new(init_literals),
            bad_lit,
            transition_clauses: clauses,
            latches: latch_lits,
            inputs,
        })
    }
}

fn parse_field<T: std::str::FromStr>(fields: &mut std::str::SplitWhitespace) -> Result<T, ErrorKind> {
    fields
        .next()
        .ok_or_else(|| ErrorKind::from(ParseError::Header))?
        .parse::<T>()
        .map_err(|_| ErrorKind::from(ParseError::Header))
}

/// Adds the CNF for `out <-> a /\ b` (`CARSolver::add_equivalence(l, r1,
/// r2)` in original_source/carsolver.h).
fn push_equivalence_and(clauses: &mut Vec<Clause>, out: Literal, a: Literal, b: Literal) {
    clauses.push(Clause::new(vec![-out, a]));
    clauses.push(Clause::new(vec![-out, b]));
    clauses.push(Clause::new(vec![out, -a, -b]));
}

/// Adds the CNF for `l <-> r` (`CARSolver::add_equivalence(l, r)`).
fn push_equivalence_eq(clauses: &mut Vec<Clause>, l: Literal, r: Literal) {
    clauses.push(Clause::new(vec![-l, r]));
    clauses.push(Clause::new(vec![l, -r]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn trivially_unsafe_parses() {
        // One latch, no inputs, bad <-> latch, latch resets to 0 then is
        // immediately forced true by a single gate wired to a free input.
        let aag = "aag 2 1 1 1 0\n2\n4 4\n2\n";
        let model = AigerModel::parse_ascii(Cursor::new(aag)).unwrap();
        assert_eq!(model.num_inputs(), 1);
        assert_eq!(model.num_latches(), 1);
        assert_eq!(model.bad_lit(), 1);
        assert_eq!(model.init_cube().literals(), &[-2]);
    }
}
