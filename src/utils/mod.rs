mod comparison;
pub use self::comparison::*;
