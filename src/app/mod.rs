// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration between the screens.
//!
//! The `App` struct owns the server-backed data (reservations, message
//! feed, conversations) and the per-screen UI state, and wires messages
//! into side effects like server calls, config persistence and
//! diagnostics logging. Policy decisions (window size, poll cadence,
//! feedback contracts) stay close to the update loop so user-facing
//! behavior is easy to audit.

pub mod config;
mod message;
pub mod paths;
mod screen;
mod subscription;
mod update;
mod view;

pub use message::{Feedback, Flags, Message};
pub use screen::Screen;

use crate::api::{self, Client, ConversationMessage, ConversationSummary, Reservation};
use crate::diagnostics::DiagnosticsCollector;
use crate::i18n::fluent::I18n;
use crate::ui::confirm_dialog::Dialog;
use crate::ui::{
    calendar, dashboard, loading_overlay, messaging, notifications, reservations, settings,
};
use config::Config;
use iced::{window, Element, Subscription, Task, Theme};
use std::fmt;

/// Root Iced application state bridging the screens, the server client,
/// localization and persisted preferences.
pub struct App {
    pub i18n: I18n,
    config: Config,
    screen: Screen,
    client: Client,
    /// Confirmed reservations as last fetched from the server.
    reservations: Vec<Reservation>,
    /// Length of the WhatsApp feed, shown on the dashboard.
    message_count: usize,
    conversations: Vec<ConversationSummary>,
    /// Rows of the conversation open in the messaging screen.
    conversation_messages: Vec<ConversationMessage>,
    dashboard: dashboard::State,
    calendar: calendar::State,
    reservations_screen: reservations::State,
    messaging: messaging::State,
    settings: settings::State,
    /// Toast notification manager for user feedback.
    notifications: notifications::Manager,
    /// Pending confirmation, if any. At most one dialog is open.
    dialog: Option<Dialog<api::Request>>,
    overlay: loading_overlay::Overlay,
    diagnostics: DiagnosticsCollector,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("screen", &self.screen)
            .field("reservations", &self.reservations.len())
            .field("conversations", &self.conversations.len())
            .finish()
    }
}

pub const WINDOW_DEFAULT_WIDTH: u32 = 1200;
pub const WINDOW_DEFAULT_HEIGHT: u32 = 800;
pub const MIN_WINDOW_WIDTH: u32 = 800;
pub const MIN_WINDOW_HEIGHT: u32 = 600;

/// Builds the window settings.
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // Wrap flags in RefCell<Option<_>> to satisfy the Fn trait while
    // only consuming flags once (iced 0.14 requires Fn, not FnOnce)
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state
            .borrow_mut()
            .take()
            .expect("Boot function called more than once");
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl Default for App {
    fn default() -> Self {
        let config = Config::default();
        let today = chrono::Local::now().date_naive();
        Self {
            i18n: I18n::default(),
            client: Client::new(&config.server.base_url, config.server.timeout()),
            settings: settings::State::from_config(&config),
            calendar: calendar::State::new(today),
            config,
            screen: Screen::Dashboard,
            reservations: Vec::new(),
            message_count: 0,
            conversations: Vec::new(),
            conversation_messages: Vec::new(),
            dashboard: dashboard::State::new(),
            reservations_screen: reservations::State::new(),
            messaging: messaging::State::new(),
            notifications: notifications::Manager::new(),
            dialog: None,
            overlay: loading_overlay::Overlay::new(),
            diagnostics: DiagnosticsCollector::default(),
        }
    }
}

impl App {
    /// Initializes application state and kicks off the first data fetch.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let (config, config_warning) = config::load();
        let i18n = I18n::new(flags.lang.clone(), flags.i18n_dir.clone(), &config);

        let diagnostics = DiagnosticsCollector::default();
        // A --server-url override talks to that server for the session
        // without rewriting the stored config.
        let base_url = flags
            .server_url
            .clone()
            .unwrap_or_else(|| config.server.base_url.clone());
        let client =
            Client::new(&base_url, config.server.timeout()).with_diagnostics(diagnostics.handle());

        let mut app = App {
            i18n,
            client,
            settings: settings::State::from_config(&config),
            config,
            diagnostics,
            ..Self::default()
        };
        let handle = app.diagnostics.handle();
        app.notifications.set_diagnostics(handle);

        if config_warning.is_some() {
            // The loader reports exactly one failure mode: an unreadable
            // or unparseable settings file replaced by defaults.
            app.notifications
                .warning(crate::i18n::Phrase::key("notification-config-load-error"));
        }

        let task = {
            let mut ctx = app.update_context();
            update::initial_load(&mut ctx)
        };
        (app, task)
    }

    fn update_context(&mut self) -> update::UpdateContext<'_> {
        update::UpdateContext {
            i18n: &mut self.i18n,
            config: &mut self.config,
            screen: &mut self.screen,
            client: &mut self.client,
            reservations: &mut self.reservations,
            message_count: &mut self.message_count,
            conversations: &mut self.conversations,
            conversation_messages: &mut self.conversation_messages,
            dashboard: &mut self.dashboard,
            calendar: &mut self.calendar,
            reservations_screen: &mut self.reservations_screen,
            messaging: &mut self.messaging,
            settings: &mut self.settings,
            notifications: &mut self.notifications,
            dialog: &mut self.dialog,
            overlay: &mut self.overlay,
            diagnostics: &mut self.diagnostics,
        }
    }

    fn title(&self) -> String {
        self.i18n.tr("app-title")
    }

    fn theme(&self) -> Theme {
        self.config.general.theme_mode.to_iced_theme()
    }

    fn subscription(&self) -> Subscription<Message> {
        let has_pending_work = self.notifications.has_pending_work()
            || self.overlay.has_pending_work()
            || self.dialog.is_some();

        Subscription::batch([
            subscription::create_event_subscription(),
            subscription::create_tick_subscription(has_pending_work),
            subscription::create_conversations_poll(
                self.screen,
                self.config.messaging.conversations_poll_secs,
            ),
            subscription::create_conversation_poll(
                self.screen,
                self.messaging.active_telefono.is_some(),
                self.config.messaging.conversation_poll_secs,
            ),
            subscription::create_diagnostics_subscription(),
        ])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        let mut ctx = self.update_context();
        update::update(&mut ctx, message)
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(view::ViewContext {
            i18n: &self.i18n,
            config: &self.config,
            screen: self.screen,
            reservations: &self.reservations,
            message_count: self.message_count,
            conversations: &self.conversations,
            conversation_messages: &self.conversation_messages,
            dashboard: &self.dashboard,
            calendar: &self.calendar,
            reservations_screen: &self.reservations_screen,
            messaging: &self.messaging,
            settings: &self.settings,
            notifications: &self.notifications,
            dialog: self.dialog.as_ref(),
            overlay: &self.overlay,
            today: chrono::Local::now().date_naive(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_app_opens_on_the_dashboard() {
        let app = App::default();
        assert_eq!(app.screen, Screen::Dashboard);
        assert!(app.reservations.is_empty());
        assert!(app.dialog.is_none());
    }

    #[test]
    fn title_resolves_the_app_name() {
        let app = App::default();
        let title = app.title();
        assert!(!title.is_empty());
        assert!(!title.starts_with("MISSING"));
    }

    #[test]
    fn fixed_theme_modes_map_straight_through() {
        let mut app = App::default();
        app.config.general.theme_mode = crate::ui::theming::ThemeMode::Light;
        assert_eq!(app.theme(), Theme::Light);
        app.config.general.theme_mode = crate::ui::theming::ThemeMode::Dark;
        assert_eq!(app.theme(), Theme::Dark);
    }

    #[test]
    fn window_floor_stays_below_the_default_size() {
        assert!(MIN_WINDOW_WIDTH <= WINDOW_DEFAULT_WIDTH);
        assert!(MIN_WINDOW_HEIGHT <= WINDOW_DEFAULT_HEIGHT);
    }

    #[test]
    fn view_smoke_renders_every_screen() {
        let mut app = App::default();
        for screen in Screen::ALL {
            app.screen = screen;
            let _ = app.view();
        }
    }
}
