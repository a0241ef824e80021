/*!
Error types used by the checker.

- Most of these are very unlikely to occur during ordinary use.
- Some are internally expected --- e.g. an empty frame is handled as an
  immediate SAFE verdict rather than treated as an error.
- Others are external --- e.g. a malformed AIGER file surfaces as a
  [ParseError] before the engine is even constructed.

Names of the error enums overlap with the component they originate from, so
`err::{self}` is commonly used to prefix use of the types with `err::`.
*/

/// A union of varied error kinds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// A malformed AIGER input.
    Parse(ParseError),

    /// The oracle was asked for something it cannot answer in its current
    /// phase --- e.g. a model after UNSAT, or an unsat core after SAT.
    ///
    /// This always indicates a checker bug, not a problem with the input.
    OracleContract(OracleContractError),

    /// A resource was exhausted (solver memory, a configured time limit).
    /// The verdict is indeterminate; this is not recovered from.
    ResourceExhausted,

    /// Some part of the frame bookkeeping was found to be inconsistent.
    Frame(FrameError),
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "parse error: {e:?}"),
            Self::OracleContract(e) => write!(f, "oracle contract violation: {e:?}"),
            Self::ResourceExhausted => write!(f, "resource exhausted during solve"),
            Self::Frame(e) => write!(f, "inconsistent frame: {e:?}"),
        }
    }
}

impl std::error::Error for ErrorKind {}

impl From<ParseError> for ErrorKind {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<OracleContractError> for ErrorKind {
    fn from(e: OracleContractError) -> Self {
        Self::OracleContract(e)
    }
}

impl From<FrameError> for ErrorKind {
    fn from(e: FrameError) -> Self {
        Self::Frame(e)
    }
}

/// Errors while parsing an AIGER-style input file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The `aag`/`aig` header line could not be read.
    Header,

    /// A line was expected to hold a literal but did not.
    Literal(usize),

    /// The bad-output section did not contain exactly one literal.
    BadOutputCount(usize),

    /// No file was found at the given path.
    NoFile,

    /// The file ended before all declared latches/inputs/gates were read.
    Truncated,
}

/// Contract violations when driving the SAT oracle (C1).
///
/// These are programmer errors --- violating them is always a bug in one of
/// the solver components (C2-C4), never a property of the model under check.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OracleContractError {
    /// [`model`](crate::oracle::SatOracle::model) was called without a
    /// preceding SAT result.
    ModelWithoutSat,

    /// [`unsat_core`](crate::oracle::SatOracle::unsat_core) was called
    /// without a preceding UNSAT result.
    CoreWithoutUnsat,
}

/// Inconsistencies detected in the frame sequences `F`/`B`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FrameError {
    /// A cube was blocked at `F_i` but the blocking-soundness check (§8,
    /// invariant 1) failed against `F_{i-1}` and the transition relation.
    UnsoundBlock { level: usize },

    /// A state recorded at depth `d` in `B` did not have a parent at depth
    /// `d - 1` (§8, invariant 2).
    BrokenParentChain { depth: usize },
}

/// A cube reported as an unsat core / UC is empty: per §7, this is handled
/// as an immediate SAFE verdict rather than propagated as an error, but the
/// type is kept distinct so callers can tell the two apart in logs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmptyUnsatCore;
