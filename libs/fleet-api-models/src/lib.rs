//! Fleet API wire models
//!
//! Serde shapes of the vehicle Fleet API and OAuth token endpoint. These mirror
//! the JSON on the wire; mapping into typed domain values happens in the agent.

pub mod models;
