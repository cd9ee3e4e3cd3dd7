// SPDX-License-Identifier: MPL-2.0
//! Diagnostics module for collecting and exporting activity reports.
//!
//! This module captures what the user did and how the server answered,
//! stores it in a memory-bounded circular buffer, and exports it as a
//! JSON report from the settings screen.
//!
//! # Architecture
//!
//! - [`CircularBuffer`]: Generic ring buffer with validated capacity
//! - [`DiagnosticsCollector`]: Owns the buffer, drains handle channels
//! - [`DiagnosticsHandle`]: Cloneable, non-blocking sender for async tasks
//! - [`export`]: JSON rendering and atomic file writes

mod buffer;
mod collector;
mod events;
pub mod export;

pub use buffer::{buffer_capacity_bounds, BufferCapacity, CircularBuffer};
pub use collector::{DiagnosticsCollector, DiagnosticsHandle};
pub use events::{DiagnosticEvent, DiagnosticEventKind, UserAction};
