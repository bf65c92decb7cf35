//! Batch Release Library
//!
//! The dashboard server and the terminal commands of the `batch-release`
//! binary.

pub mod cli;
pub mod server;

// Re-export AppState for convenience
pub use server::AppState;
