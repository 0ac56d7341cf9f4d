//! Domain models

pub mod invocation;
pub mod outcome;
pub mod vehicle;
