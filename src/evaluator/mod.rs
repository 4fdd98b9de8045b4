mod heap;
pub use self::heap::*;

mod cost_evaluator;
pub use self::cost_evaluator::*;
