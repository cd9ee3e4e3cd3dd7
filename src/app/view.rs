// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.
//!
//! Composes the navbar, the active screen and the floating layers
//! (confirmation dialog, loading overlay, toasts) into one element tree.

use super::{Message, Screen};
use crate::api::{self, ConversationMessage, ConversationSummary, Reservation};
use crate::app::config::Config;
use crate::i18n::fluent::I18n;
use crate::ui::confirm_dialog::{self, Dialog};
use crate::ui::notifications::{Manager, Toast};
use crate::ui::{calendar, dashboard, loading_overlay, messaging, navbar, reservations, settings};
use chrono::NaiveDate;
use iced::widget::{Column, Container, Stack};
use iced::{Element, Length};

/// Borrows of everything the view reads.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub config: &'a Config,
    pub screen: Screen,
    pub reservations: &'a [Reservation],
    pub message_count: usize,
    pub conversations: &'a [ConversationSummary],
    pub conversation_messages: &'a [ConversationMessage],
    pub dashboard: &'a dashboard::State,
    pub calendar: &'a calendar::State,
    pub reservations_screen: &'a reservations::State,
    pub messaging: &'a messaging::State,
    pub settings: &'a settings::State,
    pub notifications: &'a Manager,
    pub dialog: Option<&'a Dialog<api::Request>>,
    pub overlay: &'a loading_overlay::Overlay,
    pub today: NaiveDate,
}

/// Renders the active screen under the navbar, then stacks the floating
/// layers on top in paint order: dialog, loading overlay, toasts.
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let screen: Element<'_, Message> = match ctx.screen {
        Screen::Dashboard => dashboard::view(dashboard::ViewContext {
            i18n: ctx.i18n,
            state: ctx.dashboard,
            reservations: ctx.reservations,
            message_count: ctx.message_count,
            today: ctx.today,
        })
        .map(Message::Dashboard),
        Screen::Calendar => calendar::view(calendar::ViewContext {
            i18n: ctx.i18n,
            state: ctx.calendar,
            reservations: ctx.reservations,
            today: ctx.today,
        })
        .map(Message::Calendar),
        Screen::Reservations => reservations::view(reservations::ViewContext {
            i18n: ctx.i18n,
            state: ctx.reservations_screen,
            reservations: ctx.reservations,
        })
        .map(Message::Reservations),
        Screen::Messages => messaging::view(messaging::ViewContext {
            i18n: ctx.i18n,
            state: ctx.messaging,
            conversations: ctx.conversations,
            messages: ctx.conversation_messages,
        })
        .map(Message::Messaging),
        Screen::Settings => settings::view(settings::ViewContext {
            i18n: ctx.i18n,
            state: ctx.settings,
            config: ctx.config,
        })
        .map(Message::Settings),
    };

    let base = Column::new()
        .push(
            navbar::view(navbar::ViewContext {
                i18n: ctx.i18n,
                active: ctx.screen,
            })
            .map(Message::Navbar),
        )
        .push(
            Container::new(screen)
                .width(Length::Fill)
                .height(Length::Fill),
        );

    let mut layers = Stack::new()
        .width(Length::Fill)
        .height(Length::Fill)
        .push(base);

    if let Some(dialog) = ctx.dialog {
        layers = layers.push(confirm_dialog::view(dialog, ctx.i18n).map(Message::Dialog));
    }
    if ctx.overlay.is_visible() {
        layers = layers.push(ctx.overlay.view(ctx.i18n).map(Message::Overlay));
    }
    layers = layers.push(Toast::view_overlay(ctx.notifications, ctx.i18n).map(Message::Notification));

    layers.into()
}
