/*!
The main solver (C2).

Holds the transition relation permanently and one activation literal per
frame level. A clause learned while strengthening frame `i` is added gated
by that level's flag (`¬flag_i ∨ clause`), so checking "is state `s`
reachable in one transition step from something not yet excluded by frame
`i`" only has to assume `flag_0 ..= flag_i` rather than re-assert every
clause the frame has accumulated.
*/

use std::collections::HashSet;

use crate::oracle::SatOracle;
use crate::structures::{Clause, Cube, Literal};
use crate::types::err::ErrorKind;

pub struct MainSolver {
    oracle: SatOracle,
    level_flags: Vec<Literal>,
}

impl MainSolver {
    /// Builds a main solver whose permanent clauses are the model's
    /// transition relation, with `num_vars` model variables already
    /// allocated so flags never alias a model variable.
    pub fn new(num_vars: usize, transition_clauses: &[Clause]) -> Self {
        let mut oracle = SatOracle::new(num_vars);
        for clause in transition_clauses {
            oracle.add_clause(clause);
        }
        Self {
            oracle,
            level_flags: Vec::new(),
        }
    }

    /// Opens a new frame level and returns its index.
    pub fn add_new_frame(&mut self) -> usize {
        let flag = self.oracle.fresh_flag();
        self.level_flags.push(flag);
        self.level_flags.len() - 1
    }

    pub fn frame_count(&self) -> usize {
        self.level_flags.len()
    }

    /// Adds a blocking clause to frame `level`: `¬flag_level ∨ ¬cube`.
    pub fn add_clause_to_frame(&mut self, level: usize, cube: &Cube) {
        self.oracle.add_clause_with_flag(cube, self.level_flags[level]);
    }

    /// Sets up the assumption vector for checking whether `state` (a cube
    /// over current-state literals, or their primed copies if `forward` is
    /// false) has a predecessor/successor not excluded by frames
    /// `0..=frame_level`.
    pub fn set_assumption(&mut self, state: &Cube, frame_level: usize, forward: bool) {
        self.set_assumption_ex(state, frame_level, forward, &[]);
    }

    /// As [`MainSolver::set_assumption`], with extra literals folded into
    /// the assumption vector -- used for the direct-connection-to-init
    /// check at level 0, where the init cube has to be assumed alongside
    /// the (primed) state.
    pub fn set_assumption_ex(&mut self, state: &Cube, frame_level: usize, forward: bool, extra: &[Literal]) {
        let _ = forward; // direction only affects which literals the caller primes before calling in
        let mut assumptions: Vec<Literal> = self.level_flags[..=frame_level].to_vec();
        assumptions.extend(state.literals().iter().copied());
        assumptions.extend_from_slice(extra);
        self.oracle.set_assumptions(&assumptions);
    }

    pub fn solve_with_assumption(&mut self) -> bool {
        self.oracle.solve()
    }

    /// The satisfying assignment restricted to `vars_of_interest`, after a
    /// SAT result.
    pub fn get_state(&self, vars_of_interest: &[Literal]) -> Result<Cube, ErrorKind> {
        self.oracle.model(vars_of_interest)
    }

    /// The unsat core restricted to model literals: the level flags that
    /// `solve_with_assumption` necessarily assumed are never useful to a
    /// caller building a blocking cube, so they're filtered out here.
    pub fn get_uc(&self) -> Result<Cube, ErrorKind> {
        let core = self.oracle.unsat_core()?;
        let flags: HashSet<Literal> = self.level_flags.iter().map(|&f| f.abs()).collect();
        let filtered = core
            .into_literals()
            .into_iter()
            .filter(|lit| !flags.contains(&lit.abs()))
            .collect();
        Ok(Cube::new(filtered))
    }

    pub fn add_clause(&mut self, clause: &Clause) {
        self.oracle.add_clause(clause);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_get_distinct_flags() {
        let mut solver = MainSolver::new(4, &[]);
        let l0 = solver.add_new_frame();
        let l1 = solver.add_new_frame();
        assert_eq!(l0, 0);
        assert_eq!(l1, 1);
        assert_eq!(solver.frame_count(), 2);
    }
}
