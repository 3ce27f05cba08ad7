//! Utility modules for servicegen

pub mod logging;

pub use logging::{init_logging, parse_level, LoggingConfig};
