//! Type definitions for grirust

pub mod config;
pub mod error;

pub use config::ClientConfig;
pub use error::{Error, Result};
