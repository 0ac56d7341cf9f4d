//! Access token acquisition

pub mod access_token;
pub mod token_mngr;
