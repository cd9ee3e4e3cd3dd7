// SPDX-License-Identifier: MPL-2.0
//! Diagnostics collector for aggregating and storing diagnostic events.
//!
//! The collector lives on the update loop and owns the activity log.
//! Cloneable handles feed it from async tasks over a bounded channel,
//! and the log drains on each animation tick.

use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use super::buffer::{BufferCapacity, CircularBuffer};
use super::events::{DiagnosticEvent, DiagnosticEventKind, UserAction};

/// Default channel capacity for event buffering. Keeps memory bounded
/// even if the drain tick stalls.
const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Handle for sending diagnostic events to the collector.
///
/// Sends never block; when the channel is full the event is dropped,
/// which is acceptable for an activity log.
#[derive(Debug, Clone)]
pub struct DiagnosticsHandle {
    event_tx: mpsc::Sender<DiagnosticEvent>,
}

impl DiagnosticsHandle {
    /// Records a user action.
    pub fn log_action(&self, action: UserAction) {
        self.log_action_with_details(action, None);
    }

    /// Records a user action with extra context.
    pub fn log_action_with_details(&self, action: UserAction, details: Option<String>) {
        let event = DiagnosticEvent::new(DiagnosticEventKind::UserAction { action, details });
        let _ = self.event_tx.try_send(event);
    }

    /// Records how a server call went.
    pub fn log_server_call(&self, request: impl Into<String>, ok: bool, status: Option<u16>) {
        let event = DiagnosticEvent::new(DiagnosticEventKind::ServerCall {
            request: request.into(),
            ok,
            status,
        });
        let _ = self.event_tx.try_send(event);
    }

    /// Records a non-critical warning.
    pub fn log_warning(&self, message: impl Into<String>) {
        let event = DiagnosticEvent::new(DiagnosticEventKind::Warning {
            message: message.into(),
        });
        let _ = self.event_tx.try_send(event);
    }

    /// Records a critical error.
    pub fn log_error(&self, message: impl Into<String>) {
        let event = DiagnosticEvent::new(DiagnosticEventKind::Error {
            message: message.into(),
        });
        let _ = self.event_tx.try_send(event);
    }
}

/// Central collector for diagnostic events.
///
/// Events arrive either directly from the update loop or through
/// [`DiagnosticsHandle`] channels, and land in a memory-bounded
/// circular buffer.
#[derive(Debug)]
pub struct DiagnosticsCollector {
    buffer: CircularBuffer<DiagnosticEvent>,
    event_rx: mpsc::Receiver<DiagnosticEvent>,
    event_tx: mpsc::Sender<DiagnosticEvent>,
    /// When collection started, monotonic. Exports use this as the
    /// zero point for event offsets.
    collection_started_at: Instant,
    /// When collection started, wall clock, for export metadata.
    collection_started_at_utc: DateTime<Utc>,
}

impl Default for DiagnosticsCollector {
    fn default() -> Self {
        Self::new(BufferCapacity::default())
    }
}

impl DiagnosticsCollector {
    /// Creates a new diagnostics collector with the specified buffer capacity.
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        let (event_tx, event_rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);

        Self {
            buffer: CircularBuffer::new(capacity),
            event_rx,
            event_tx,
            collection_started_at: Instant::now(),
            collection_started_at_utc: Utc::now(),
        }
    }

    /// Creates a handle for sending events to this collector.
    ///
    /// Handles are cheap to clone and safe to move into async tasks.
    #[must_use]
    pub fn handle(&self) -> DiagnosticsHandle {
        DiagnosticsHandle {
            event_tx: self.event_tx.clone(),
        }
    }

    /// Drains all pending events from the channel into the buffer.
    ///
    /// Call this periodically from the update loop.
    pub fn process_pending(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.buffer.push(event);
        }
    }

    /// Records a user action directly, bypassing the channel.
    pub fn log_action(&mut self, action: UserAction) {
        self.log_action_with_details(action, None);
    }

    /// Records a user action with extra context directly.
    pub fn log_action_with_details(&mut self, action: UserAction, details: Option<String>) {
        let event = DiagnosticEvent::new(DiagnosticEventKind::UserAction { action, details });
        self.buffer.push(event);
    }

    /// Records a non-critical warning directly.
    pub fn log_warning(&mut self, message: impl Into<String>) {
        let event = DiagnosticEvent::new(DiagnosticEventKind::Warning {
            message: message.into(),
        });
        self.buffer.push(event);
    }

    /// Records a critical error directly.
    pub fn log_error(&mut self, message: impl Into<String>) {
        let event = DiagnosticEvent::new(DiagnosticEventKind::Error {
            message: message.into(),
        });
        self.buffer.push(event);
    }

    /// Returns the number of events currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if no events are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns an iterator over all stored events, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.buffer.iter()
    }

    /// Clears all stored events.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Returns the buffer capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// When collection started, monotonic.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.collection_started_at
    }

    /// When collection started, wall clock.
    #[must_use]
    pub fn started_at_utc(&self) -> DateTime<Utc> {
        self.collection_started_at_utc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_logging_lands_in_the_buffer() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::new(100));
        collector.log_action(UserAction::OpenCalendar);
        collector.log_warning("respuesta obsoleta descartada");

        assert_eq!(collector.len(), 2);
        let kinds: Vec<_> = collector.iter().map(|event| &event.kind).collect();
        assert!(matches!(
            kinds[0],
            DiagnosticEventKind::UserAction {
                action: UserAction::OpenCalendar,
                ..
            }
        ));
        assert!(matches!(kinds[1], DiagnosticEventKind::Warning { .. }));
    }

    #[test]
    fn handle_events_arrive_after_process_pending() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::new(100));
        let handle = collector.handle();

        handle.log_server_call("load_reservations", true, Some(200));
        handle.log_action_with_details(
            UserAction::SendMessage { template: None },
            Some("conversacion activa".to_string()),
        );
        assert!(collector.is_empty());

        collector.process_pending();
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn full_channel_drops_events_instead_of_blocking() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::new(100));
        let handle = collector.handle();

        for _ in 0..(DEFAULT_CHANNEL_CAPACITY + 50) {
            handle.log_action(UserAction::OpenDashboard);
        }

        collector.process_pending();
        assert_eq!(collector.len(), DEFAULT_CHANNEL_CAPACITY);
    }

    #[test]
    fn buffer_eviction_keeps_recent_events() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::new(100));
        for index in 0..150 {
            collector.log_action_with_details(UserAction::OpenDayDetail, Some(index.to_string()));
        }

        assert_eq!(collector.len(), 100);
        let first = collector.iter().next().expect("buffer is not empty");
        assert!(matches!(
            &first.kind,
            DiagnosticEventKind::UserAction { details: Some(details), .. } if details == "50"
        ));
    }

    #[test]
    fn clear_empties_the_log() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::new(100));
        collector.log_error("fallo de red");
        collector.clear();
        assert!(collector.is_empty());
    }
}
