//! File system helpers

pub mod dir;
pub mod file;
pub mod staged;
