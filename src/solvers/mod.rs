//! The three specialised solvers built on top of [`crate::oracle::SatOracle`]
//! (§4): the main solver driving frame-extension queries, the start solver
//! enumerating distinct seed states, and the invariant solver used to detect
//! a fixpoint.

pub mod inv_solver;
pub mod main_solver;
pub mod start_solver;

pub use inv_solver::InvSolver;
pub use main_solver::MainSolver;
pub use start_solver::StartSolver;
