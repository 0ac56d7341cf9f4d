//! HTTP adapters for the OAuth and Fleet APIs

pub mod auth;
pub mod client;
pub mod fleet;
