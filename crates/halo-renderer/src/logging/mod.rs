//! Logging utilities.
//!
//! Library code logs through the `log` facade only. This module initializes
//! `env_logger` for binaries and tests that want output.

mod init;

pub use init::{init_logging, LoggingConfig};
