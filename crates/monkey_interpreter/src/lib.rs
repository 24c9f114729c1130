mod evaluator;
pub mod object;

pub use evaluator::Evaluator;
