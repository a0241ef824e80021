/*!
Configuration of a checker run.

Mirrors `otter_sat::config::Config`'s role: a single struct threaded through
construction, holding every tunable named in the spec plus the bounded
[`ConfigOption`] wrapper for numeric knobs the CLI can reject out-of-range
values for.
*/

mod config_option;
pub use config_option::ConfigOption;

use std::num::NonZeroUsize;

/// Which side of the model the engine treats as "forward" (§3). Fixed at
/// construction; direction-switching mid-run is not supported (§9).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// `F` approximates forward-reachable states from init; `B` tracks
    /// backward from bad.
    Forward,

    /// Roles of init/bad and priming direction are swapped.
    Backward,
}

impl Direction {
    pub fn is_forward(self) -> bool {
        matches!(self, Direction::Forward)
    }
}

/// How often a solver is torn down and rebuilt from the authoritative frame
/// state (§5, §9). `Calls(500)` matches `MAX_SOLVER_CALL` in
/// original_source/checker.h.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconstructionThreshold {
    Calls(NonZeroUsize),
    Never,
}

impl ReconstructionThreshold {
    pub fn default_threshold() -> Self {
        Self::Calls(NonZeroUsize::new(500).unwrap())
    }

    /// `true` if `calls` made since the last reconstruction means a fresh
    /// one is due now.
    pub fn is_due(self, calls: usize) -> bool {
        match self {
            Self::Calls(n) => calls >= n.get(),
            Self::Never => false,
        }
    }
}

/// Top-level configuration for a single checker run.
#[derive(Clone, Debug)]
pub struct Config {
    pub direction: Direction,

    pub reconstruction_threshold: ReconstructionThreshold,

    /// Enables extra UC minimization passes beyond the oracle's default
    /// (§9 Open Questions). Off by default.
    pub minimal_uc: bool,

    /// Emit a trace on UNSAFE (§6).
    pub evidence: bool,

    /// Diagnostic logging at each decision point (§7).
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            direction: Direction::Forward,
            reconstruction_threshold: ReconstructionThreshold::default_threshold(),
            minimal_uc: false,
            evidence: false,
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconstruction_threshold_fires_at_boundary() {
        let threshold = ReconstructionThreshold::Calls(NonZeroUsize::new(3).unwrap());
        assert!(!threshold.is_due(2));
        assert!(threshold.is_due(3));
        assert!(threshold.is_due(4));
    }

    #[test]
    fn never_threshold_never_fires() {
        assert!(!ReconstructionThreshold::Never.is_due(usize::MAX));
    }
}
