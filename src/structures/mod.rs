//! Core data types shared across the checker: literals, cubes, clauses,
//! states and frames (§3).

pub mod clause;
pub mod cube;
pub mod frame;
pub mod literal;
pub mod state;

pub use clause::Clause;
pub use cube::Cube;
pub use frame::{Bsequence, Frame, Fsequence};
pub use literal::Literal;
pub use state::{State, StateArena, StateId};
