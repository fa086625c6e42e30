//! Labmon Core Library
//!
//! Host and infrastructure status collection for a small homelab.
//! Provides functionality to:
//! - Build a port-usage report: listening sockets joined with docker
//!   published-port mappings into a versioned JSON document
//! - Check a single TCP port for availability at runtime
//! - Collect host, ping and NVMe status for the HTTP endpoints
//!
//! # External commands
//! All data comes from read-only queries against `ss`, `ps`,
//! `docker ps`, `ping` and `nvme smart-log`. Only the socket table
//! query is foundational; every other collector degrades gracefully
//! when its binary is missing.

pub mod checker;
pub mod config;
pub mod docker;
pub mod error;
pub mod html;
pub mod models;
pub mod monitor;
pub mod process;
pub mod report;
pub mod sockets;
mod util;

// Re-export commonly used types
pub use checker::{check_port, PortState};
pub use config::Settings;
pub use error::{Error, Result};
pub use models::{DockerMeta, PortRecord, Report};
pub use report::build_report;
