//! Configuration for the Pollux input tracker and its demo host.
//!
//! Settings persist to disk as RON files, tolerate missing or unknown fields,
//! and can be overridden from the command line via clap.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, InputConfig, WindowConfig};
pub use error::ConfigError;
