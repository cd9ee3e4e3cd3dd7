// SPDX-License-Identifier: MPL-2.0
//! Notification lifecycle management.
//!
//! The `Manager` owns every live toast, including ones playing their exit
//! animation. Timing is driven by `tick`, which takes an explicit `now`
//! so expiry and removal stay deterministic under test.

use super::notification::{Notification, NotificationId, Severity};
use crate::diagnostics::DiagnosticsHandle;
use crate::i18n::Phrase;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Maximum number of notifications visible at once. When exceeded, the
/// oldest notifications start exiting so newer ones get their slot.
pub const MAX_VISIBLE: usize = 3;

/// How long a dismissed notification keeps fading before it is removed.
pub const EXIT_DURATION: Duration = Duration::from_millis(300);

/// Messages for notification state changes.
#[derive(Debug, Clone)]
pub enum Message {
    /// Dismiss a specific notification by ID.
    Dismiss(NotificationId),
}

/// Manages the live notifications, oldest first.
#[derive(Debug, Default)]
pub struct Manager {
    entries: VecDeque<Notification>,
    /// Optional diagnostics handle for logging warnings/errors.
    diagnostics: Option<DiagnosticsHandle>,
}

impl Manager {
    /// Creates a new empty notification manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the diagnostics handle for logging warnings and errors.
    pub fn set_diagnostics(&mut self, handle: DiagnosticsHandle) {
        self.diagnostics = Some(handle);
    }

    /// Shows a new notification and returns its ID.
    ///
    /// `duration` overrides the severity default; `Some(Duration::ZERO)`
    /// pins the notification until it is dismissed explicitly. If the
    /// display limit is exceeded, the oldest notifications start their
    /// exit animation.
    ///
    /// Warnings and errors are logged to the diagnostics system.
    pub fn show(
        &mut self,
        severity: Severity,
        content: Phrase,
        duration: Option<Duration>,
    ) -> NotificationId {
        let notification = Notification::new(severity, content, duration);
        let id = notification.id();
        let now = notification.created_at();

        if let Some(handle) = &self.diagnostics {
            match severity {
                Severity::Warning => handle.log_warning(log_text(notification.content())),
                Severity::Error => handle.log_error(log_text(notification.content())),
                Severity::Success | Severity::Info | Severity::Loading => {}
            }
        }

        self.entries.push_back(notification);
        self.evict_overflow(now);
        id
    }

    /// Shows a success notification with the default duration.
    pub fn success(&mut self, content: Phrase) -> NotificationId {
        self.show(Severity::Success, content, None)
    }

    /// Shows an info notification with the default duration.
    pub fn info(&mut self, content: Phrase) -> NotificationId {
        self.show(Severity::Info, content, None)
    }

    /// Shows a warning notification with the default duration.
    pub fn warning(&mut self, content: Phrase) -> NotificationId {
        self.show(Severity::Warning, content, None)
    }

    /// Shows an error notification with the default duration.
    pub fn error(&mut self, content: Phrase) -> NotificationId {
        self.show(Severity::Error, content, None)
    }

    /// Shows a loading notification that stays until dismissed.
    pub fn loading(&mut self, content: Phrase) -> NotificationId {
        self.show(Severity::Loading, content, None)
    }

    /// Starts the exit animation for a notification.
    ///
    /// Returns `true` if this call started the exit. Dismissing an
    /// unknown or already exiting notification is a no-op.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let now = Instant::now();
        match self.entries.iter_mut().find(|entry| entry.id() == id) {
            Some(entry) if !entry.is_exiting() => {
                entry.begin_exit(now);
                true
            }
            _ => false,
        }
    }

    /// Starts the exit animation for every notification still showing.
    pub fn dismiss_all(&mut self) {
        let now = Instant::now();
        for entry in &mut self.entries {
            entry.begin_exit(now);
        }
    }

    /// Advances notification lifecycles to `now`.
    ///
    /// Expired notifications start exiting, and notifications whose exit
    /// animation has finished are removed. Should be called on every
    /// animation tick.
    pub fn tick(&mut self, now: Instant) {
        for entry in &mut self.entries {
            if entry.is_expired(now) {
                entry.begin_exit(now);
            }
        }

        self.entries.retain(|entry| match entry.exiting_since() {
            Some(since) => now.saturating_duration_since(since) < EXIT_DURATION,
            None => true,
        });
    }

    /// Handles a notification message.
    pub fn handle_message(&mut self, message: &Message) {
        match message {
            Message::Dismiss(id) => {
                self.dismiss(*id);
            }
        }
    }

    /// Returns the live notifications, oldest first. Exiting entries are
    /// included so the view can fade them out.
    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    /// Returns the number of live notifications, exiting ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no notifications are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of notifications not yet exiting.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| !entry.is_exiting())
            .count()
    }

    /// Returns whether any notification still needs timing work, either
    /// a pending expiry or an exit animation in progress. Drives the
    /// animation subscription.
    #[must_use]
    pub fn has_pending_work(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.is_exiting() || entry.expires_at().is_some())
    }

    /// Drops all notifications immediately, without an exit animation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Starts the exit of the oldest entries beyond the display limit.
    /// Entries already exiting count toward the limit and soak up
    /// repeated exit requests, so a burst never skips past them.
    fn evict_overflow(&mut self, now: Instant) {
        let overflow = self.entries.len().saturating_sub(MAX_VISIBLE);
        for entry in self.entries.iter_mut().take(overflow) {
            entry.begin_exit(now);
        }
    }
}

/// Text logged to diagnostics for a notification: the translation key
/// when there is one, otherwise the literal message.
fn log_text(content: &Phrase) -> &str {
    match content {
        Phrase::Key(key) | Phrase::KeyWith { key, .. } => key,
        Phrase::Literal(text) => text,
    }
}
