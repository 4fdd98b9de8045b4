mod cross_exchange;
pub use self::cross_exchange::*;
