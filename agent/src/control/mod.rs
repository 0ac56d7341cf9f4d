//! Wake, decide and act

pub mod decision;
pub mod geofence;
pub mod orchestrator;
pub mod retry;
pub mod wake;
