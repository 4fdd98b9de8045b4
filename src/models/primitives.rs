/// Integer type used for rounded distances, demands and cumulative route
/// quantities.
pub type IntType = i64;

/// Floating point type used for badness scores and other ranking values.
pub type FloatType = f64;
