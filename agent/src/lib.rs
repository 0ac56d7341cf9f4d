//! Sentry Toggle Library
//!
//! Core modules for the single-shot Sentry Mode toggle agent.

pub mod app;
pub mod authn;
pub mod clock;
pub mod control;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod secrets;
pub mod storage;
pub mod utils;
pub mod vehicle;
