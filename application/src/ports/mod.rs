//! Port definitions (interfaces for logger adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod entry;
pub mod hook;
pub mod logger;
pub mod shutdown;
