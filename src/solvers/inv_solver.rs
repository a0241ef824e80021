/*!
The invariant solver (C4).

Used only to answer the fixpoint question: once frame `i` and frame `i+1`
contain exactly the same reachable-state restriction, frame `i` is an
inductive invariant and the property holds. Built fresh for each check
(§9's "global counters become instance state" applies here too, just taken
to its simplest conclusion: a solver with no long-lived state to reset).

Two constraints are layered onto a shared, otherwise-empty formula (no
transition relation -- this is a pure restriction-consistency check, not a
reachability query, per `original_source/checker.h`'s `inv_solver_*`
family):

- an OR constraint over `F_i`'s cubes, asserted under one flag, and
- an AND constraint over `F_{i-1}`'s blocking clauses, asserted under
  another.

`F_i ⊆ F_{i-1}` holds exactly when asserting both is UNSAT: no state
matches some cube of `F_i` while also escaping every blocking clause of
`F_{i-1}`.
*/

use crate::oracle::SatOracle;
use crate::structures::{Clause, Cube, Literal};

pub struct InvSolver {
    oracle: SatOracle,
    or_flag: Option<Literal>,
    and_flag: Option<Literal>,
}

impl InvSolver {
    pub fn new(num_vars: usize) -> Self {
        Self {
            oracle: SatOracle::new(num_vars),
            or_flag: None,
            and_flag: None,
        }
    }

    /// Asserts `⋁ cube` over every cube of a frame, accumulated behind a
    /// single flag via a chain of Tseitin ORs.
    pub fn inv_solver_add_constraint_or(&mut self, cubes: &[Cube]) {
        let mut accum: Option<Literal> = None;
        for cube in cubes {
            let cube_flag = self.oracle.fresh_flag();
            self.oracle.add_equivalence(cube_flag, cube.literals());
            accum = Some(match accum {
                None => cube_flag,
                Some(prev) => {
                    let new_accum = self.oracle.fresh_flag();
                    self.oracle
                        .add_clause(&Clause::new(vec![-new_accum, prev, cube_flag]));
                    self.oracle.add_clause(&Clause::new(vec![new_accum, -prev]));
                    self.oracle.add_clause(&Clause::new(vec![new_accum, -cube_flag]));
                    new_accum
                }
            });
        }
        self.or_flag = accum;
    }

    /// Asserts `⋀ ¬cube` over every cube of a frame, all gated by one fresh
    /// flag so [`InvSolver::inv_solver_release_constraint_and`] can drop
    /// the whole group at once.
    pub fn inv_solver_add_constraint_and(&mut self, cubes: &[Cube]) {
        let flag = self.oracle.fresh_flag();
        for cube in cubes {
            self.oracle.add_clause_with_flag(cube, flag);
        }
        self.and_flag = Some(flag);
    }

    /// Disables the most recently added AND constraint.
    pub fn inv_solver_release_constraint_and(&mut self) {
        self.and_flag = None;
    }

    /// `true` if the asserted constraints are jointly satisfiable.
    pub fn check(&mut self) -> bool {
        let mut assumptions: Vec<Literal> = Vec::with_capacity(2);
        if let Some(flag) = self.or_flag {
            assumptions.push(flag);
        }
        if let Some(flag) = self.and_flag {
            assumptions.push(flag);
        }
        self.oracle.set_assumptions(&assumptions);
        self.oracle.solve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_constraint_can_be_released() {
        let mut solver = InvSolver::new(3);
        solver.inv_solver_add_constraint_and(&[Cube::new(vec![1, 2])]);
        assert!(solver.and_flag.is_some());
        solver.inv_solver_release_constraint_and();
        assert!(solver.and_flag.is_none());
    }
}
