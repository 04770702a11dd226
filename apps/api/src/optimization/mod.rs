// Optimization: the run state machine, its routes, and the completeness
// rules that decide whether gap filling is needed.

pub mod completeness;
pub mod handlers;
pub mod orchestrator;
