//! Secret and policy configuration

pub mod config;
pub mod store;
