// SPDX-License-Identifier: MPL-2.0
//! Update logic and message handlers for the application.
//!
//! Every handler borrows the application state through [`UpdateContext`]
//! and returns the follow-up [`Task`]. Server calls are dispatched here
//! with a [`Feedback`] contract describing the toasts and overlay to
//! settle when the call completes; [`handle_api_completed`] honors that
//! contract in a fixed order (dismiss the loading toast, hide the
//! overlay, then show the result toast) before running the per-request
//! continuation.

use super::config::{self, Config};
use super::{Feedback, Message, Screen};
use crate::api::{
    self, Client, ConversationMessage, ConversationSummary, Estado, NewReservation,
    OutgoingMessage, Outcome, Reservation,
};
use crate::diagnostics::{export, DiagnosticsCollector, UserAction};
use crate::i18n::fluent::I18n;
use crate::i18n::Phrase;
use crate::ui::confirm_dialog::{self, Dialog, DialogKind};
use crate::ui::theming::ThemeMode;
use crate::ui::{
    calendar, dashboard, loading_overlay, messaging, navbar, notifications, reservations, settings,
};
use iced::{window, Task};
use std::time::Instant;

/// Mutable borrows of everything a handler may touch.
///
/// Handlers take this instead of the application struct so they can be
/// exercised in tests without a running window.
pub struct UpdateContext<'a> {
    pub i18n: &'a mut I18n,
    pub config: &'a mut Config,
    pub screen: &'a mut Screen,
    pub client: &'a mut Client,
    pub reservations: &'a mut Vec<Reservation>,
    pub message_count: &'a mut usize,
    pub conversations: &'a mut Vec<ConversationSummary>,
    pub conversation_messages: &'a mut Vec<ConversationMessage>,
    pub dashboard: &'a mut dashboard::State,
    pub calendar: &'a mut calendar::State,
    pub reservations_screen: &'a mut reservations::State,
    pub messaging: &'a mut messaging::State,
    pub settings: &'a mut settings::State,
    pub notifications: &'a mut notifications::Manager,
    pub dialog: &'a mut Option<Dialog<api::Request>>,
    pub overlay: &'a mut loading_overlay::Overlay,
    pub diagnostics: &'a mut DiagnosticsCollector,
}

/// Routes a message to its handler.
pub fn update(ctx: &mut UpdateContext<'_>, message: Message) -> Task<Message> {
    match message {
        Message::Navbar(message) => handle_navbar_message(ctx, message),
        Message::Dashboard(message) => handle_dashboard_message(ctx, message),
        Message::Calendar(message) => handle_calendar_message(ctx, message),
        Message::Reservations(message) => handle_reservations_message(ctx, message),
        Message::Messaging(message) => handle_messaging_message(ctx, message),
        Message::Settings(message) => handle_settings_message(ctx, message),
        Message::SwitchScreen(screen) => handle_screen_switch(ctx, screen),
        Message::Notification(message) => {
            ctx.notifications.handle_message(&message);
            Task::none()
        }
        Message::Dialog(message) => handle_dialog_message(ctx, message),
        // The overlay backdrop only swallows clicks.
        Message::Overlay(_) => Task::none(),
        Message::ApiCompleted {
            request,
            outcome,
            feedback,
        } => handle_api_completed(ctx, request, outcome, feedback),
        Message::BatchCompleted {
            result,
            feedback,
            origin,
        } => handle_batch_completed(ctx, result, feedback, origin),
        Message::Tick(now) => handle_tick(ctx, now),
        Message::PollConversations(_) => handle_poll_conversations(ctx),
        Message::PollConversation(_) => handle_poll_conversation(ctx),
        Message::ProcessDiagnostics(_) => {
            ctx.diagnostics.process_pending();
            Task::none()
        }
        Message::WindowCloseRequested(id) => window::close(id),
        Message::EscapePressed => handle_escape(ctx),
    }
}

// =============================================================================
// Navigation
// =============================================================================

pub fn handle_navbar_message(ctx: &mut UpdateContext<'_>, message: navbar::Message) -> Task<Message> {
    match navbar::update(message) {
        navbar::Event::Navigate(screen) => handle_screen_switch(ctx, screen),
    }
}

/// Switches the active screen and refreshes the data it shows. Refreshes
/// are silent; a failure keeps the previously loaded rows on screen.
pub fn handle_screen_switch(ctx: &mut UpdateContext<'_>, target: Screen) -> Task<Message> {
    if *ctx.screen == target {
        return Task::none();
    }
    *ctx.screen = target;
    ctx.diagnostics.log_action(target.open_action());

    match target {
        Screen::Dashboard => Task::batch([
            load_reservations(ctx, Feedback::silent()),
            load_messages(ctx),
        ]),
        Screen::Calendar | Screen::Reservations => load_reservations(ctx, Feedback::silent()),
        Screen::Messages => load_conversations(ctx),
        Screen::Settings => Task::none(),
    }
}

/// First data fetch after startup, run under the loading overlay.
pub fn initial_load(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    ctx.overlay.show_default();
    let feedback = Feedback {
        overlay: true,
        ..Feedback::default()
    }
    .with_error_prefix(Phrase::key("toast-load-error"));
    Task::batch([load_reservations(ctx, feedback), load_messages(ctx)])
}

// =============================================================================
// Screen events
// =============================================================================

pub fn handle_dashboard_message(
    ctx: &mut UpdateContext<'_>,
    message: dashboard::Message,
) -> Task<Message> {
    match dashboard::update(ctx.dashboard, message) {
        dashboard::Event::None => Task::none(),
        dashboard::Event::Warn(phrase) => {
            ctx.notifications.warning(phrase);
            Task::none()
        }
        dashboard::Event::CreateReservations(batch) => submit_batch(ctx, batch, Screen::Dashboard),
    }
}

pub fn handle_calendar_message(
    ctx: &mut UpdateContext<'_>,
    message: calendar::Message,
) -> Task<Message> {
    match calendar::update(ctx.calendar, message) {
        calendar::Event::None => Task::none(),
        calendar::Event::Warn(phrase) => {
            ctx.notifications.warning(phrase);
            Task::none()
        }
        calendar::Event::MonthChanged(delta) => {
            ctx.diagnostics.log_action(UserAction::NavigateMonth { delta });
            Task::none()
        }
        calendar::Event::DaySelected => {
            ctx.diagnostics.log_action(UserAction::OpenDayDetail);
            Task::none()
        }
        calendar::Event::ConfirmDelete { id, cliente } => {
            *ctx.dialog = Some(Dialog::confirm_delete(
                cliente,
                api::Request::DeleteReservation { id },
            ));
            Task::none()
        }
        calendar::Event::ChangeEstado { id, estado } => change_estado(ctx, id, estado),
        calendar::Event::SendWhatsApp { message, template } => send_whatsapp(ctx, message, template),
        calendar::Event::CreateReservations(batch) => submit_batch(ctx, batch, Screen::Calendar),
    }
}

pub fn handle_reservations_message(
    ctx: &mut UpdateContext<'_>,
    message: reservations::Message,
) -> Task<Message> {
    match reservations::update(ctx.reservations_screen, message) {
        reservations::Event::None => Task::none(),
        reservations::Event::Warn(phrase) => {
            ctx.notifications.warning(phrase);
            Task::none()
        }
        reservations::Event::FilterApplied { filter } => {
            ctx.diagnostics.log_action(UserAction::ApplyFilter { filter });
            Task::none()
        }
        reservations::Event::ConfirmDelete { id, .. } => {
            *ctx.dialog = Some(
                Dialog::new(api::Request::DeleteReservation { id })
                    .title(Phrase::key("dialog-delete-title"))
                    .message(Phrase::key("reservations-delete-question"))
                    .confirm_label(Phrase::key("dialog-delete-confirm"))
                    .kind(DialogKind::Danger),
            );
            Task::none()
        }
        reservations::Event::ChangeEstado { id, estado } => change_estado(ctx, id, estado),
        reservations::Event::SendWhatsApp { message, template } => {
            send_whatsapp(ctx, message, template)
        }
    }
}

pub fn handle_messaging_message(
    ctx: &mut UpdateContext<'_>,
    message: messaging::Message,
) -> Task<Message> {
    match messaging::update(ctx.messaging, message) {
        messaging::Event::None => Task::none(),
        messaging::Event::Warn(phrase) => {
            ctx.notifications.warning(phrase);
            Task::none()
        }
        messaging::Event::ConversationSelected { telefono } => {
            ctx.diagnostics.log_action(UserAction::SelectConversation);
            // The thread area shows the new conversation's rows only.
            ctx.conversation_messages.clear();
            load_conversation(ctx, telefono)
        }
        messaging::Event::SendMessage { message, template } => {
            send_whatsapp(ctx, message, template)
        }
    }
}

pub fn handle_settings_message(
    ctx: &mut UpdateContext<'_>,
    message: settings::Message,
) -> Task<Message> {
    match settings::update(ctx.settings, message) {
        settings::Event::None => Task::none(),
        settings::Event::Warn(phrase) => {
            ctx.notifications.warning(phrase);
            Task::none()
        }
        settings::Event::ChangeLanguage(locale) => {
            let logged = locale
                .as_ref()
                .map_or_else(|| "system".to_string(), ToString::to_string);
            ctx.diagnostics
                .log_action(UserAction::ChangeLanguage { locale: logged });
            match locale {
                Some(locale) => {
                    ctx.config.general.language = Some(locale.to_string());
                    ctx.i18n.set_locale(locale);
                }
                None => {
                    ctx.config.general.language = None;
                    ctx.i18n.use_system_locale();
                }
            }
            persist_config(ctx);
            Task::none()
        }
        settings::Event::ChangeTheme(mode) => {
            let theme = match mode {
                ThemeMode::Light => "light",
                ThemeMode::Dark => "dark",
                ThemeMode::System => "system",
            };
            ctx.diagnostics.log_action(UserAction::ChangeTheme {
                theme: theme.to_string(),
            });
            ctx.config.general.theme_mode = mode;
            persist_config(ctx);
            Task::none()
        }
        settings::Event::SaveServer {
            base_url,
            timeout_secs,
        } => {
            ctx.config.server.base_url = base_url;
            ctx.config.server.timeout_secs = timeout_secs;
            // Show the persisted form of the drafts back in the fields.
            ctx.settings.base_url = ctx.config.server.base_url.clone();
            ctx.settings.timeout_secs = timeout_secs.to_string();
            *ctx.client = Client::new(&ctx.config.server.base_url, ctx.config.server.timeout())
                .with_diagnostics(ctx.diagnostics.handle());
            persist_config(ctx);
            ctx.notifications
                .success(Phrase::key("toast-settings-saved"));
            Task::none()
        }
        settings::Event::ExportDiagnostics => handle_export_diagnostics(ctx),
    }
}

fn persist_config(ctx: &mut UpdateContext<'_>) {
    if let Err(error) = config::save(ctx.config) {
        ctx.diagnostics.log_error(error.to_string());
        ctx.notifications.error(Phrase::key(error.i18n_key()));
    }
}

pub fn handle_export_diagnostics(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    ctx.diagnostics.log_action(UserAction::ExportDiagnostics);
    ctx.diagnostics.process_pending();
    let path = export::default_export_directory().join(export::generate_default_filename());
    match export::export_to(ctx.diagnostics, &path) {
        Ok(()) => {
            ctx.notifications.success(
                Phrase::key("toast-export-success").with_arg("path", path.display().to_string()),
            );
        }
        Err(error) => {
            ctx.diagnostics.log_error(error.to_string());
            ctx.notifications.error(Phrase::key(error.i18n_key()));
        }
    }
    Task::none()
}

// =============================================================================
// Dialog and timers
// =============================================================================

pub fn handle_dialog_message(
    ctx: &mut UpdateContext<'_>,
    message: confirm_dialog::Message,
) -> Task<Message> {
    if let Some(dialog) = ctx.dialog.as_mut() {
        confirm_dialog::update(dialog, message);
    }
    Task::none()
}

/// Advances the animation clocks and dispatches a confirmed dialog once
/// its exit transition has played out.
pub fn handle_tick(ctx: &mut UpdateContext<'_>, now: Instant) -> Task<Message> {
    ctx.notifications.tick(now);
    ctx.overlay.tick(now);

    if ctx
        .dialog
        .as_ref()
        .is_some_and(|dialog| dialog.is_settled(now))
    {
        if let Some(dialog) = ctx.dialog.take() {
            if let Some(request) = dialog.into_accepted_request() {
                return dispatch_request(ctx, request);
            }
        }
    }
    Task::none()
}

pub fn handle_escape(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    if let Some(dialog) = ctx.dialog.as_mut() {
        dialog.resolve(false);
    }
    Task::none()
}

pub fn handle_poll_conversations(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    if *ctx.screen == Screen::Messages {
        load_conversations(ctx)
    } else {
        Task::none()
    }
}

pub fn handle_poll_conversation(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    match ctx.messaging.active_telefono.clone() {
        Some(telefono) if *ctx.screen == Screen::Messages => load_conversation(ctx, telefono),
        _ => Task::none(),
    }
}

/// Runs a request approved through a confirmation dialog.
fn dispatch_request(ctx: &mut UpdateContext<'_>, request: api::Request) -> Task<Message> {
    match request {
        api::Request::DeleteReservation { id } => delete_reservation(ctx, id),
        api::Request::ChangeEstado { id, estado } => change_estado(ctx, id, estado),
        api::Request::LoadReservations => load_reservations(ctx, Feedback::silent()),
        api::Request::LoadMessages => load_messages(ctx),
        api::Request::LoadConversations => load_conversations(ctx),
        api::Request::LoadConversation { telefono } => load_conversation(ctx, telefono),
        // Requests that carry a payload are never parked in a dialog.
        api::Request::UpdateReservation { .. } | api::Request::SendMessage { .. } => Task::none(),
    }
}

// =============================================================================
// Server dispatch
// =============================================================================

pub fn load_reservations(ctx: &mut UpdateContext<'_>, feedback: Feedback) -> Task<Message> {
    let client = ctx.client.clone();
    Task::perform(
        async move { client.reservations().await },
        move |outcome| Message::ApiCompleted {
            request: api::Request::LoadReservations,
            outcome,
            feedback: feedback.clone(),
        },
    )
}

fn load_messages(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    let client = ctx.client.clone();
    Task::perform(async move { client.messages().await }, |outcome| {
        Message::ApiCompleted {
            request: api::Request::LoadMessages,
            outcome,
            feedback: Feedback::silent(),
        }
    })
}

fn load_conversations(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    let client = ctx.client.clone();
    Task::perform(async move { client.conversations().await }, |outcome| {
        Message::ApiCompleted {
            request: api::Request::LoadConversations,
            outcome,
            feedback: Feedback::silent(),
        }
    })
}

fn load_conversation(ctx: &mut UpdateContext<'_>, telefono: String) -> Task<Message> {
    let client = ctx.client.clone();
    let request_telefono = telefono.clone();
    Task::perform(
        async move { client.conversation(&telefono).await },
        move |outcome| Message::ApiCompleted {
            request: api::Request::LoadConversation {
                telefono: request_telefono.clone(),
            },
            outcome,
            feedback: Feedback::silent(),
        },
    )
}

fn delete_reservation(ctx: &mut UpdateContext<'_>, id: i64) -> Task<Message> {
    ctx.diagnostics.log_action(UserAction::DeleteReservation);
    let loading = ctx.notifications.loading(Phrase::key("toast-processing"));
    let feedback = Feedback {
        loading: Some(loading),
        ..Feedback::default()
    }
    .with_success(Phrase::key("toast-delete-success"))
    .with_error_prefix(Phrase::key("toast-delete-error"));
    let client = ctx.client.clone();
    Task::perform(
        async move { client.delete_reservation(id).await },
        move |outcome| Message::ApiCompleted {
            request: api::Request::DeleteReservation { id },
            outcome,
            feedback: feedback.clone(),
        },
    )
}

fn change_estado(ctx: &mut UpdateContext<'_>, id: i64, estado: Estado) -> Task<Message> {
    ctx.diagnostics.log_action(UserAction::ChangeEstado {
        estado: estado.as_str().to_string(),
    });
    let feedback = Feedback::silent()
        .with_success(Phrase::key("toast-estado-success").with_arg("estado", estado.capitalized()))
        .with_error_prefix(Phrase::key("toast-estado-error"));
    let client = ctx.client.clone();
    Task::perform(
        async move { client.change_estado(id, estado).await },
        move |outcome| Message::ApiCompleted {
            request: api::Request::ChangeEstado { id, estado },
            outcome,
            feedback: feedback.clone(),
        },
    )
}

fn send_whatsapp(
    ctx: &mut UpdateContext<'_>,
    message: OutgoingMessage,
    template: Option<&'static str>,
) -> Task<Message> {
    ctx.diagnostics.log_action(UserAction::SendMessage {
        template: template.map(str::to_string),
    });
    let loading = ctx.notifications.loading(Phrase::key("toast-sending"));
    let feedback = Feedback {
        loading: Some(loading),
        ..Feedback::default()
    }
    .with_success(Phrase::key("toast-send-success"))
    .with_error_prefix(Phrase::key("toast-send-error"));
    let telefono = message.telefono.clone();
    let client = ctx.client.clone();
    Task::perform(
        async move { client.send_whatsapp(&message).await },
        move |outcome| Message::ApiCompleted {
            request: api::Request::SendMessage {
                telefono: telefono.clone(),
            },
            outcome,
            feedback: feedback.clone(),
        },
    )
}

fn submit_batch(
    ctx: &mut UpdateContext<'_>,
    batch: Vec<NewReservation>,
    origin: Screen,
) -> Task<Message> {
    ctx.diagnostics.log_action(UserAction::SubmitReservation {
        dates: batch.len(),
    });
    let loading = ctx.notifications.loading(Phrase::key("toast-processing"));
    let feedback = Feedback {
        loading: Some(loading),
        ..Feedback::default()
    };
    let client = ctx.client.clone();
    Task::perform(
        async move { client.create_reservations(batch).await },
        move |result| Message::BatchCompleted {
            result,
            feedback: feedback.clone(),
            origin,
        },
    )
}

// =============================================================================
// Completions
// =============================================================================

/// Settles the feedback contract for a finished call, then runs the
/// request's continuation. The loading toast is dismissed before any
/// result toast is pushed so a visible slot frees up first.
pub fn handle_api_completed(
    ctx: &mut UpdateContext<'_>,
    request: api::Request,
    outcome: Outcome,
    feedback: Feedback,
) -> Task<Message> {
    if let Some(id) = feedback.loading {
        ctx.notifications.dismiss(id);
    }
    if feedback.overlay {
        ctx.overlay.hide();
    }

    if outcome.ok {
        if let Some(phrase) = feedback.success {
            ctx.notifications.success(phrase);
        }
        handle_success(ctx, request, &outcome)
    } else {
        if let Some(phrase) = error_toast_phrase(ctx.i18n, feedback.error_prefix, &outcome) {
            ctx.notifications.error(phrase);
        }
        Task::none()
    }
}

/// Builds the error toast text. Without a prefix the failure stays
/// silent; background refreshes keep showing the rows they already have.
fn error_toast_phrase(i18n: &I18n, prefix: Option<Phrase>, outcome: &Outcome) -> Option<Phrase> {
    let prefix = prefix?;
    Some(match outcome.error_phrase() {
        Some(message) => Phrase::literal(format!(
            "{}: {}",
            prefix.resolve(i18n),
            message.resolve(i18n)
        )),
        None => prefix,
    })
}

fn handle_success(
    ctx: &mut UpdateContext<'_>,
    request: api::Request,
    outcome: &Outcome,
) -> Task<Message> {
    match request {
        api::Request::LoadReservations => {
            if let Some(rows) = outcome.decode::<Vec<Reservation>>() {
                *ctx.reservations = rows;
            }
            Task::none()
        }
        api::Request::LoadMessages => {
            if let Some(rows) = outcome.decode::<Vec<serde_json::Value>>() {
                *ctx.message_count = rows.len();
            }
            Task::none()
        }
        api::Request::LoadConversations => {
            if let Some(rows) = outcome.decode::<Vec<ConversationSummary>>() {
                *ctx.conversations = rows;
            }
            Task::none()
        }
        api::Request::LoadConversation { telefono } => {
            // The user may have switched threads while this was in
            // flight; a stale payload must not overwrite the new one.
            if ctx.messaging.is_active(&telefono) {
                if let Some(rows) = outcome.decode::<Vec<ConversationMessage>>() {
                    *ctx.conversation_messages = rows;
                }
            }
            Task::none()
        }
        api::Request::DeleteReservation { .. } => {
            ctx.calendar.clear_selection();
            load_reservations(ctx, Feedback::silent())
        }
        api::Request::ChangeEstado { .. } | api::Request::UpdateReservation { .. } => {
            load_reservations(ctx, Feedback::silent())
        }
        api::Request::SendMessage { telefono } => {
            // The gateway answers 200 with an `error` field when the
            // message was accepted but not delivered.
            if let Some(text) = outcome.payload_field("error") {
                ctx.notifications.warning(Phrase::literal(text));
            }
            if let Some(outgoing) = ctx.messaging.take_last_sent() {
                if ctx.messaging.is_active(&outgoing.telefono) {
                    // Same display format the server uses for stored rows,
                    // so the echo blends in until the next poll replaces it.
                    let fecha = chrono::Local::now().format("%d/%m/%Y %H:%M").to_string();
                    ctx.conversation_messages
                        .push(messaging::local_echo(&outgoing, fecha));
                }
            }
            let mut follow_ups = Vec::new();
            if *ctx.screen == Screen::Messages {
                follow_ups.push(load_conversations(ctx));
                if ctx.messaging.is_active(&telefono) {
                    follow_ups.push(load_conversation(ctx, telefono));
                }
            }
            Task::batch(follow_ups)
        }
    }
}

/// Reports a multi-create submission and refreshes the reservation list.
pub fn handle_batch_completed(
    ctx: &mut UpdateContext<'_>,
    result: api::BatchResult,
    feedback: Feedback,
    origin: Screen,
) -> Task<Message> {
    if let Some(id) = feedback.loading {
        ctx.notifications.dismiss(id);
    }
    if feedback.overlay {
        ctx.overlay.hide();
    }

    if result.created > 0 && result.failed == 0 {
        ctx.notifications.success(
            Phrase::key("toast-batch-success").with_arg("count", result.created.to_string()),
        );
        // Only a full success clears the form; a partial one keeps the
        // drafts so the user can retry the dates that failed.
        match origin {
            Screen::Dashboard => ctx.dashboard.form.reset(),
            Screen::Calendar => ctx.calendar.form.reset(),
            _ => {}
        }
    } else if result.created > 0 {
        ctx.notifications.warning(
            Phrase::key("toast-batch-partial")
                .with_arg("ok", result.created.to_string())
                .with_arg("failed", result.failed.to_string()),
        );
    } else {
        ctx.notifications.error(Phrase::key("toast-batch-failed"));
    }
    load_reservations(ctx, Feedback::silent())
}
