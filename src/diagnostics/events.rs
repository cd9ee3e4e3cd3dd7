// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types for activity tracking.
//!
//! Events describe what the user was doing and how the server
//! responded, so an exported log can explain a misbehaving session.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// User-initiated actions worth keeping in the activity log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UserAction {
    // ==========================================================================
    // Screen Navigation
    // ==========================================================================
    /// Open the dashboard screen.
    OpenDashboard,

    /// Open the calendar screen.
    OpenCalendar,

    /// Open the reservations list screen.
    OpenReservations,

    /// Open the messaging screen.
    OpenMessages,

    /// Open the settings screen.
    OpenSettings,

    // ==========================================================================
    // Calendar
    // ==========================================================================
    /// Move the calendar by whole months.
    NavigateMonth {
        /// Signed month offset, `-1` for previous, `1` for next.
        delta: i32,
    },

    /// Open the day detail for a calendar cell.
    OpenDayDetail,

    // ==========================================================================
    // Reservations
    // ==========================================================================
    /// Submit the reservation form.
    SubmitReservation {
        /// How many dates the submission covered.
        dates: usize,
    },

    /// Delete a reservation after confirmation.
    DeleteReservation,

    /// Change a reservation's estado.
    ChangeEstado {
        /// Target estado, in wire form.
        estado: String,
    },

    /// Apply an estado filter to the reservations table.
    ApplyFilter {
        /// The selected filter, `todas` when cleared.
        filter: String,
    },

    // ==========================================================================
    // Messaging
    // ==========================================================================
    /// Select a conversation in the messaging panel.
    SelectConversation,

    /// Send a WhatsApp message.
    SendMessage {
        /// Whether a prewritten template filled the composer.
        #[serde(skip_serializing_if = "Option::is_none")]
        template: Option<String>,
    },

    // ==========================================================================
    // Settings
    // ==========================================================================
    /// Switch the interface language.
    ChangeLanguage {
        /// The selected locale identifier.
        locale: String,
    },

    /// Switch the color theme.
    ChangeTheme {
        /// The selected theme name.
        theme: String,
    },

    /// Export the activity log to disk.
    ExportDiagnostics,
}

/// A diagnostic event with timestamp.
///
/// The timestamp is monotonic; exports convert it to an offset from
/// the start of collection.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    /// When the event occurred.
    pub timestamp: Instant,
    /// The type and data of the event.
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    /// Creates a new diagnostic event with the current timestamp.
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self {
            timestamp: Instant::now(),
            kind,
        }
    }

    /// Creates a new diagnostic event with a specific timestamp.
    #[must_use]
    pub fn with_timestamp(kind: DiagnosticEventKind, timestamp: Instant) -> Self {
        Self { timestamp, kind }
    }
}

/// The type and associated data for a diagnostic event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    /// User-initiated action.
    UserAction {
        /// The specific action performed.
        action: UserAction,
        /// Optional extra context.
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },

    /// A finished server call and how it went.
    ServerCall {
        /// Short name of the endpoint, e.g. `delete_reservation`.
        request: String,
        /// Whether the call counted as a success.
        ok: bool,
        /// HTTP status when a response arrived at all.
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
    },

    /// Non-critical warning.
    Warning {
        /// Brief description of the warning.
        message: String,
    },

    /// Critical error.
    Error {
        /// Brief description of the error.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_current_timestamp() {
        let before = Instant::now();
        let event = DiagnosticEvent::new(DiagnosticEventKind::UserAction {
            action: UserAction::OpenCalendar,
            details: None,
        });
        let after = Instant::now();

        assert!(event.timestamp >= before);
        assert!(event.timestamp <= after);
    }

    #[test]
    fn with_timestamp_uses_provided_timestamp() {
        let timestamp = Instant::now();
        let event = DiagnosticEvent::with_timestamp(
            DiagnosticEventKind::Warning {
                message: "poll skipped".to_string(),
            },
            timestamp,
        );

        assert_eq!(event.timestamp, timestamp);
    }

    #[test]
    fn kinds_serialize_with_snake_case_tags() {
        let call = DiagnosticEventKind::ServerCall {
            request: "change_estado".to_string(),
            ok: false,
            status: Some(409),
        };
        let json = serde_json::to_string(&call).expect("serialize");
        assert!(json.contains("\"type\":\"server_call\""));
        assert!(json.contains("\"status\":409"));

        let action = DiagnosticEventKind::UserAction {
            action: UserAction::ChangeEstado {
                estado: "cancelada".to_string(),
            },
            details: None,
        };
        let json = serde_json::to_string(&action).expect("serialize");
        assert!(json.contains("\"action\":\"change_estado\""));
        assert!(json.contains("\"estado\":\"cancelada\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn network_failures_serialize_without_status() {
        let call = DiagnosticEventKind::ServerCall {
            request: "load_reservations".to_string(),
            ok: false,
            status: None,
        };
        let json = serde_json::to_string(&call).expect("serialize");
        assert!(!json.contains("status"));

        let parsed: DiagnosticEventKind = serde_json::from_str(&json).expect("round trip");
        assert_eq!(parsed, call);
    }
}
