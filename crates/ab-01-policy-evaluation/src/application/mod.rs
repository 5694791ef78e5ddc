//! Application layer: the evaluator service and the named policy table

pub mod evaluator;
pub mod manager;

pub use evaluator::PolicyEvaluator;
pub use manager::PolicyManager;
