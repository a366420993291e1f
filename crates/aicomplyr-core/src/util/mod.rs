pub mod deterministic;
pub mod digest;
