//! Type definitions for the relay agent

pub mod constants;
pub mod transfer;

// Re-export commonly used types
pub use constants::*;
pub use transfer::*;
