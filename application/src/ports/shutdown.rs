//! Graceful shutdown signal
//!
//! A logger holds the sending half; whatever supervises the process holds
//! the receiving half and decides how to wind down when a [`Context`]
//! arrives. Delivery is best effort: senders never wait for a receiver.
//! The channel holds one pending signal; later signals are dropped until
//! the receiver drains it.

use crate::context::Context;
use tokio::sync::mpsc;

pub type ShutdownSender = mpsc::Sender<Context>;
pub type ShutdownReceiver = mpsc::Receiver<Context>;

/// Signals that can wait for a receiver before further sends are dropped
pub const SHUTDOWN_CHANNEL_CAPACITY: usize = 1;

/// Create the channel a logger reports graceful-fatal requests on
pub fn shutdown_channel() -> (ShutdownSender, ShutdownReceiver) {
    mpsc::channel(SHUTDOWN_CHANNEL_CAPACITY)
}
