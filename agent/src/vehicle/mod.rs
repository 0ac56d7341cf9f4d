//! Vehicle access ports

pub mod api;
