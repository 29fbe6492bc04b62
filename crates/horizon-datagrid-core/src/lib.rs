//! Core systems for Horizon Datagrid.
//!
//! This crate provides the foundational pieces the datagrid coordination layer
//! is built from:
//!
//! - **Signal/Slot System**: Type-safe, synchronous change notification
//! - **Subscriptions**: Connections released exactly once, on demand or on drop
//! - **Property System**: Values with change detection
//! - **Logging**: `tracing` targets, span names and convenience macros
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_datagrid_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Subscription Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_datagrid_core::Signal;
//!
//! let resized = Arc::new(Signal::<()>::new());
//! let mut subscription = resized.subscribe(|_| println!("columns resized"));
//! resized.emit(());
//!
//! assert!(subscription.unsubscribe().is_ok());
//! assert!(subscription.unsubscribe().is_err());
//! ```

mod error;
pub mod logging;
pub mod property;
pub mod signal;

pub use error::{Result, SignalError};
pub use logging::PerfSpan;
pub use property::Property;
pub use signal::{ConnectionId, Signal, SignalEmitter, Subscription};
