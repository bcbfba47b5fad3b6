//! Application layer for contextlog
//!
//! This crate contains the logger ports, the propagation context and the
//! graceful shutdown channel. It depends only on the domain layer.

pub mod context;
pub mod ports;

// Re-export commonly used types
pub use context::Context;
pub use ports::{
    entry::{Entry, EntryExt},
    hook::{BoxError, Hook, HookError},
    logger::{Logger, NoLogger},
    shutdown::{SHUTDOWN_CHANNEL_CAPACITY, ShutdownReceiver, ShutdownSender, shutdown_channel},
};

#[doc(hidden)]
pub mod __private {
    pub use contextlog_domain::Caller;
}
