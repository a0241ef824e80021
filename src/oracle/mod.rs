/*!
The SAT oracle wrapper (C1).

Wraps a single incremental [`otter_sat::context::Context`] and exposes
exactly the surface the rest of the checker needs: adding permanent and
flag-guarded clauses, replacing the assumption vector, solving, and reading
back a model or an unsat core. Every other component (C2-C4) holds one of
these rather than talking to `otter_sat` directly -- this is the "engine-
specific helpers live in a wrapper, not inside the oracle" re-architecture
called for in §9 (the reference implementation instead inherited from its
SAT solver class).
*/

use std::collections::HashSet;

use otter_sat::config::Config as OtterConfig;
use otter_sat::context::Context;
use otter_sat::reports::Report as OtterReport;
use otter_sat::structures::{
    clause::CClause as OtterClause,
    literal::{CLiteral, Literal as OtterLiteral},
};

use crate::structures::{Clause, Cube, Literal};
use crate::types::err::{ErrorKind, OracleContractError};

/// The outcome of the most recent [`SatOracle::solve`] call. `model`/
/// `unsat_core` are only well-defined relative to this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LastResult {
    None,
    Sat,
    Unsat,
}

/// Converts one of our plain integer literals to otter_sat's canonical
/// literal representation.
fn to_otter(lit: Literal) -> CLiteral {
    CLiteral::new(lit.unsigned_abs(), lit > 0)
}

/// Inverse of [`to_otter`].
fn from_otter(lit: CLiteral) -> Literal {
    let var = lit.atom() as Literal;
    if lit.polarity() {
        var
    } else {
        -var
    }
}

fn to_otter_clause(clause: &Clause) -> OtterClause {
    clause.literals().iter().map(|&l| to_otter(l)).collect()
}

/// An incremental SAT oracle: permanent/flag-guarded clause addition,
/// assumption-based solving, and model/unsat-core extraction.
pub struct SatOracle {
    context: Context,
    /// Fresh atoms allocated for activation flags, kept distinct from model
    /// variables so frame bookkeeping never collides with the model.
    next_flag: Literal,
    pending_assumptions: Vec<Literal>,
    last_result: LastResult,
}

impl SatOracle {
    /// Creates an oracle with no clauses beyond those implied by `num_vars`
    /// model variables already in use; flags are allocated starting above
    /// that range.
    pub fn new(num_vars: usize) -> Self {
        let mut context = Context::from_config(OtterConfig::default());
        for _ in 0..num_vars {
            let _ = context.fresh_atom();
        }
        Self {
            context,
            next_flag: num_vars as Literal + 1,
            pending_assumptions: Vec::new(),
            last_result: LastResult::None,
        }
    }

    /// Allocates a fresh activation literal, distinct from every model
    /// variable and every previously allocated flag.
    pub fn fresh_flag(&mut self) -> Literal {
        let flag = self.next_flag;
        self.next_flag += 1;
        let _ = self.context.fresh_atom();
        flag
    }

    /// Adds a permanent clause.
    pub fn add_clause(&mut self, clause: &Clause) {
        let _ = self.context.add_clause(to_otter_clause(clause));
    }

    /// Adds `¬flag ∨ ¬l_1 ∨ ... ∨ ¬l_n`: the cube is blocked only while
    /// `flag` is asserted as an assumption.
    pub fn add_clause_with_flag(&mut self, cube: &Cube, flag: Literal) {
        let mut literals: Vec<Literal> = vec![-flag];
        literals.extend(cube.literals().iter().map(|l| -l));
        self.add_clause(&Clause::new(literals));
    }

    /// Tseitin-encodes `l <-> r_1 /\ ... /\ r_n`.
    pub fn add_equivalence(&mut self, l: Literal, rs: &[Literal]) {
        for &r in rs {
            self.add_clause(&Clause::new(vec![-l, r]));
        }
        let mut last = vec![l];
        last.extend(rs.iter().map(|r| -r));
        self.add_clause(&Clause::new(last));
    }

    /// Replaces the current assumption vector. Takes effect on the next
    /// [`SatOracle::solve`].
    pub fn set_assumptions(&mut self, lits: &[Literal]) {
        self.pending_assumptions = lits.to_vec();
    }

    /// Solves under the assumptions set by [`SatOracle::set_assumptions`].
    ///
    /// Backjumps to decision level 0 first, since `otter_sat`'s context
    /// does not expose a standalone "clear assumptions" call -- this is the
    /// Rust analogue of `assumption_.clear()` in `carsolver.h`.
    pub fn solve(&mut self) -> bool {
        self.context.backjump(0);

        for &lit in &self.pending_assumptions.clone() {
            let _ = self.context.add_assumption(to_otter(lit));
        }

        let assert_result = unsafe { self.context.assert_assumptions() };
        if assert_result.is_err() {
            self.last_result = LastResult::Unsat;
            return false;
        }

        match self.context.solve() {
            Ok(OtterReport::Satisfiable) => {
                self.last_result = LastResult::Sat;
                true
            }
            Ok(OtterReport::Unsatisfiable) => {
                self.last_result = LastResult::Unsat;
                false
            }
            _ => {
                self.last_result = LastResult::Unsat;
                false
            }
        }
    }

    /// The full assignment, restricted to `vars_of_interest`, after a SAT
    /// result.
    pub fn model(&self, vars_of_interest: &[Literal]) -> Result<Cube, ErrorKind> {
        if self.last_result != LastResult::Sat {
            return Err(OracleContractError::ModelWithoutSat.into());
        }

        let mut literals = Vec::with_capacity(vars_of_interest.len());
        for &lit in vars_of_interest {
            let var = lit.unsigned_abs();
            if let Some(value) = self.context.atom_db.value_of(var) {
                literals.push(if value { var as Literal } else { -(var as Literal) });
            }
        }
        Ok(Cube::new(literals))
    }

    /// The subset of the current assumption vector that appears in the
    /// final conflict, after an UNSAT result.
    pub fn unsat_core(&self) -> Result<Cube, ErrorKind> {
        if self.last_result != LastResult::Unsat {
            return Err(OracleContractError::CoreWithoutUnsat.into());
        }

        let failed: Vec<CLiteral> = self.context.failed_assumpions();
        let seen: HashSet<Literal> = failed.into_iter().map(from_otter).collect();
        Ok(Cube::new(seen.into_iter().collect()))
    }
}
