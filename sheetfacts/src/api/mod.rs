//! Automation host interface.
//!
//! This module provides the host-mode runner, the response types it prints
//! and the stderr log sink.

pub mod logs;
pub mod modules;
pub mod types;

pub use logs::*;
pub use modules::{run_module, HostModule};
pub use types::*;
