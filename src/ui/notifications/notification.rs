// SPDX-License-Identifier: MPL-2.0
//! Core notification data structures.
//!
//! This module defines the `Notification` struct and `Severity` enum
//! used throughout the notification system.

use crate::i18n::Phrase;
use crate::ui::design_tokens::palette;
use iced::Color;
use std::time::{Duration, Instant};

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Creates a new unique notification ID.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Severity level determines display duration and visual styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Operation completed successfully (green, 4s duration).
    #[default]
    Success,
    /// Informational message (blue, 4s duration).
    Info,
    /// Warning that doesn't block operation (orange, 5s duration).
    Warning,
    /// Error requiring attention (red, 6s duration).
    Error,
    /// Operation in progress (stays until explicitly dismissed).
    Loading,
}

impl Severity {
    /// Returns the primary color for this severity level.
    #[must_use]
    pub fn color(&self) -> Color {
        match self {
            Severity::Success => palette::SUCCESS_500,
            Severity::Info => palette::INFO_500,
            Severity::Warning => palette::WARNING_500,
            Severity::Error => palette::ERROR_500,
            Severity::Loading => palette::PRIMARY_500,
        }
    }

    /// Returns the default auto-dismiss duration for this severity.
    /// Returns `None` for loading (dismissed by the caller when the
    /// operation settles).
    #[must_use]
    pub fn auto_dismiss_duration(&self) -> Option<Duration> {
        match self {
            Severity::Success | Severity::Info => Some(Duration::from_secs(4)),
            Severity::Warning => Some(Duration::from_secs(5)),
            Severity::Error => Some(Duration::from_secs(6)),
            Severity::Loading => None,
        }
    }
}

/// A notification to be displayed to the user.
///
/// Expiry and exit timestamps are fixed when state changes, so lifecycle
/// checks take an explicit `now` instead of re-reading the clock.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Unique identifier for this notification.
    id: NotificationId,
    /// Severity level (determines color and auto-dismiss behavior).
    severity: Severity,
    /// The message shown to the user, resolved at render time.
    content: Phrase,
    /// When this notification was created.
    created_at: Instant,
    /// When the notification auto-dismisses. `None` means it stays
    /// until explicitly dismissed.
    expires_at: Option<Instant>,
    /// When the exit animation started. `None` while fully visible.
    exiting_since: Option<Instant>,
}

impl Notification {
    /// Creates a new notification.
    ///
    /// `duration` overrides the severity default. `Some(Duration::ZERO)`
    /// pins the notification until it is dismissed explicitly.
    pub fn new(severity: Severity, content: Phrase, duration: Option<Duration>) -> Self {
        let lifetime = match duration {
            Some(custom) if custom.is_zero() => None,
            Some(custom) => Some(custom),
            None => severity.auto_dismiss_duration(),
        };
        let created_at = Instant::now();

        Self {
            id: NotificationId::new(),
            severity,
            content,
            created_at,
            expires_at: lifetime.map(|lifetime| created_at + lifetime),
            exiting_since: None,
        }
    }

    /// Returns the notification's unique ID.
    #[must_use]
    pub fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the severity level.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the message content.
    #[must_use]
    pub fn content(&self) -> &Phrase {
        &self.content
    }

    /// Returns when this notification was created.
    #[must_use]
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Returns when this notification auto-dismisses, if it does.
    #[must_use]
    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    /// Returns when the exit animation started, if it has.
    #[must_use]
    pub fn exiting_since(&self) -> Option<Instant> {
        self.exiting_since
    }

    /// Returns whether this notification is playing its exit animation.
    #[must_use]
    pub fn is_exiting(&self) -> bool {
        self.exiting_since.is_some()
    }

    /// Returns whether the auto-dismiss deadline has passed.
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }

    /// Starts the exit animation. Repeated calls keep the earliest
    /// start time, so the first dismissal wins.
    pub(super) fn begin_exit(&mut self, now: Instant) {
        self.exiting_since.get_or_insert(now);
    }
}
