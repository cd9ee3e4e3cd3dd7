// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::api::{self, BatchResult, Outcome};
use crate::i18n::Phrase;
use crate::ui::calendar;
use crate::ui::confirm_dialog;
use crate::ui::dashboard;
use crate::ui::loading_overlay;
use crate::ui::messaging;
use crate::ui::navbar;
use crate::ui::notifications::{NotificationId, NotificationMessage};
use crate::ui::reservations;
use crate::ui::settings;
use std::time::Instant;

use super::Screen;

/// Feedback bookkeeping riding along with an in-flight server call, so
/// the completion handler knows what to dismiss and what to announce.
#[derive(Debug, Clone, Default)]
pub struct Feedback {
    /// Loading toast to dismiss when the call settles.
    pub loading: Option<NotificationId>,
    /// The loading overlay was shown for this call.
    pub overlay: bool,
    /// Toast on success.
    pub success: Option<Phrase>,
    /// Prefix for the error toast; the server's message is appended.
    pub error_prefix: Option<Phrase>,
}

impl Feedback {
    #[must_use]
    pub fn silent() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_success(mut self, phrase: Phrase) -> Self {
        self.success = Some(phrase);
        self
    }

    #[must_use]
    pub fn with_error_prefix(mut self, phrase: Phrase) -> Self {
        self.error_prefix = Some(phrase);
        self
    }
}

/// Top-level messages consumed by `App::update`. The variants forward
/// lower-level component messages while keeping a single update
/// entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    Navbar(navbar::Message),
    Dashboard(dashboard::Message),
    Calendar(calendar::Message),
    Reservations(reservations::Message),
    Messaging(messaging::Message),
    Settings(settings::Message),
    SwitchScreen(Screen),
    Notification(NotificationMessage),
    Dialog(confirm_dialog::Message),
    Overlay(loading_overlay::Message),
    /// A server call finished.
    ApiCompleted {
        request: api::Request,
        outcome: Outcome,
        feedback: Feedback,
    },
    /// Every create call of a batch submit finished.
    BatchCompleted {
        result: BatchResult,
        feedback: Feedback,
        /// Screen whose form gets reset on full success.
        origin: Screen,
    },
    /// Periodic tick driving toast, overlay and dialog timing.
    Tick(Instant),
    /// Conversation list poll while the messaging screen is open.
    PollConversations(Instant),
    /// Active conversation poll.
    PollConversation(Instant),
    /// Drain queued diagnostics events into the ring buffer.
    ProcessDiagnostics(Instant),
    /// Window close was requested (user clicked X or pressed Alt+F4).
    WindowCloseRequested(iced::window::Id),
    EscapePressed,
}

/// Runtime flags passed in from the CLI or launcher to tweak startup
/// behavior.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `es`, `en-US`).
    pub lang: Option<String>,
    /// Optional directory containing Fluent `.ftl` files for custom builds.
    pub i18n_dir: Option<String>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `ICED_VENUE_CONFIG_DIR`.
    pub config_dir: Option<String>,
    /// Optional data directory override (for exported reports).
    /// Takes precedence over `ICED_VENUE_DATA_DIR`.
    pub data_dir: Option<String>,
    /// Optional server base URL override for this run; the stored
    /// configuration is not touched.
    pub server_url: Option<String>,
}
