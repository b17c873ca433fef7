//! Shared utilities for stockbrief
//!
//! Logging setup shared by the binaries in this workspace.

pub mod logging;

pub use logging::init_tracing_with;
