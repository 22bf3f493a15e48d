//! Background Tasks Module
//!
//! Contains background tasks that run alongside the invocation surface.
//!
//! # Tasks
//! - Signal log: Writes every emitted signal to the log

mod signal_log;

pub use signal_log::spawn_signal_logger;
