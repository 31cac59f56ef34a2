pub mod cleanup;
pub mod config;
pub mod env_file;
pub mod error;
pub mod io;
pub mod manifest;
pub mod paths;
pub mod provision;

pub use error::{KickstartError, Result};
