//! epgtimer library - command-line access to EpgTimer's EMWUI web interface
//!
//! The wire model lives in `emwui_protocol`; this crate adds the blocking
//! HTTP client, configuration, output rendering and the command handlers
//! behind the `epgtimer` binary.

pub mod channel_list;
pub mod client;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod output;

// Re-export commonly used types
pub use client::{ClientError, EmwuiClient, ErrorKind, TransportKind};
pub use config::Settings;
pub use error::AppError;
