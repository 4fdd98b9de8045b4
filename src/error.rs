use thiserror::Error;

/// Fatal, programmer-facing errors raised by the search core.
///
/// None of these are recoverable runtime conditions: they signal that a
/// caller handed the core a malformed solution or asked a question the core
/// cannot answer (e.g. a neighborhood query on a depot). The driver decides
/// whether to abort or recover.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("solution invariant violated: {0}")]
    InvariantViolation(String),

    #[error("move would exceed vehicle capacity: route {route} load {load} > capacity {capacity}")]
    CapacityOverflow {
        route: usize,
        load: i64,
        capacity: i64,
    },

    #[error("unknown node id {0}")]
    UnknownNode(usize),

    #[error("neighborhood query on depot node {0}")]
    EmptyNeighborhood(usize),
}

pub type CoreResult<T> = Result<T, CoreError>;
