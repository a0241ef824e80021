/*!
The start solver (C3).

Enumerates distinct seed states -- either states satisfying the initial
condition, or states satisfying the bad-state property, depending on
[`crate::config::Direction`] -- by blocking each one found behind a single
shared activation flag, the way `try_satisfy` blocks a start state in
`original_source/checker.h` so the next `solve` call is forced to produce a
different witness.
*/

use crate::oracle::SatOracle;
use crate::structures::{Clause, Cube, Literal};
use crate::types::err::ErrorKind;

pub struct StartSolver {
    oracle: SatOracle,
    block_flag: Literal,
    blocked_count: usize,
}

impl StartSolver {
    pub fn new(num_vars: usize, base_clauses: &[Clause]) -> Self {
        let mut oracle = SatOracle::new(num_vars);
        for clause in base_clauses {
            oracle.add_clause(clause);
        }
        let block_flag = oracle.fresh_flag();
        Self {
            oracle,
            block_flag,
            blocked_count: 0,
        }
    }

    /// Excludes `cube` from every future `solve` call on this solver.
    pub fn block_state(&mut self, cube: &Cube) {
        self.oracle.add_clause_with_flag(cube, self.block_flag);
        self.blocked_count += 1;
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked_count
    }

    /// Solves under `extra_assumptions` plus the blocking flag.
    pub fn solve(&mut self, extra_assumptions: &[Literal]) -> bool {
        let mut assumptions = Vec::with_capacity(extra_assumptions.len() + 1);
        assumptions.push(self.block_flag);
        assumptions.extend_from_slice(extra_assumptions);
        self.oracle.set_assumptions(&assumptions);
        self.oracle.solve()
    }

    pub fn model(&self, vars_of_interest: &[Literal]) -> Result<Cube, ErrorKind> {
        self.oracle.model(vars_of_interest)
    }

    /// Tears down and rebuilds the underlying oracle from `base_clauses`,
    /// forgetting every blocked state. Used on periodic reconstruction (§5,
    /// §9): unlike the reference implementation's `clear_frame`, which left
    /// the frame's clauses in place after "clearing" it, this actually
    /// starts the next generation of queries from a clean oracle.
    pub fn reset(&mut self, num_vars: usize, base_clauses: &[Clause]) {
        *self = Self::new(num_vars, base_clauses);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocking_increments_count() {
        let mut solver = StartSolver::new(2, &[]);
        assert_eq!(solver.blocked_count(), 0);
        solver.block_state(&Cube::new(vec![1, -2]));
        assert_eq!(solver.blocked_count(), 1);
    }

    #[test]
    fn reset_forgets_blocked_states() {
        let mut solver = StartSolver::new(2, &[]);
        solver.block_state(&Cube::new(vec![1]));
        solver.reset(2, &[]);
        assert_eq!(solver.blocked_count(), 0);
    }
}
