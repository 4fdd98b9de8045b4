/// Tolerance used when comparing floating point improvements and distances.
pub const EPSILON: f64 = 1e-6;

/// Default neighborhood size `K`: the number of nearest non-depot nodes kept
/// per node.
pub const DEFAULT_NEIGHBORHOOD_SIZE: usize = 20;

/// Default penalty scaling constant applied to `baseline_cost` when an edge
/// is penalized.
pub const DEFAULT_PENALTY_SCALING: f64 = 0.1;
