// SPDX-License-Identifier: MPL-2.0
//! Modal confirmation dialog resolved as a boolean.
//!
//! One dialog shows at a time, held as `Option<Dialog<R>>` on the App.
//! The `request` tag carried by the dialog tells the app which follow-up
//! to run once the user confirms. Resolution is delivered only after a
//! short exit transition, driven by `tick` like the toast queue.

use crate::i18n::fluent::I18n;
use crate::i18n::Phrase;
use crate::ui::design_tokens::{opacity, sizing, spacing, typography};
use crate::ui::styles;
use iced::widget::{button, container, mouse_area, Column, Container, Row, Text};
use iced::{alignment, Background, Color, Element, Length, Theme};
use std::time::{Duration, Instant};

/// How long the dialog keeps fading after a choice before the boolean
/// is delivered.
pub const EXIT_DURATION: Duration = Duration::from_millis(200);

/// Visual intent of the dialog, shown as the title accent and the
/// confirm button style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogKind {
    #[default]
    Warning,
    Danger,
    Info,
    Success,
}

impl DialogKind {
    fn color(self) -> Color {
        use crate::ui::design_tokens::palette;
        match self {
            DialogKind::Warning => palette::WARNING_500,
            DialogKind::Danger => palette::ERROR_500,
            DialogKind::Info => palette::INFO_500,
            DialogKind::Success => palette::SUCCESS_500,
        }
    }
}

/// Messages emitted by the dialog view.
#[derive(Debug, Clone, Copy)]
pub enum Message {
    /// Confirm button activated; resolves `true`.
    Confirm,
    /// Cancel button, backdrop click or Escape; resolves `false`.
    Cancel,
    /// Click landed on the dialog card itself. Swallowed so it does not
    /// fall through to the backdrop.
    BodyPressed,
}

#[derive(Debug, Clone, Copy)]
struct Resolution {
    since: Instant,
    accepted: bool,
}

/// A pending confirmation. `R` is the follow-up request to run when the
/// user confirms.
#[derive(Debug, Clone)]
pub struct Dialog<R> {
    title: Phrase,
    message: Phrase,
    confirm_label: Phrase,
    cancel_label: Phrase,
    kind: DialogKind,
    request: R,
    resolution: Option<Resolution>,
}

impl<R> Dialog<R> {
    /// Creates a dialog with the default texts and the warning kind.
    pub fn new(request: R) -> Self {
        Self {
            title: Phrase::key("dialog-default-title"),
            message: Phrase::key("dialog-default-message"),
            confirm_label: Phrase::key("dialog-confirm"),
            cancel_label: Phrase::key("dialog-cancel"),
            kind: DialogKind::default(),
            request,
            resolution: None,
        }
    }

    /// Fixed template for delete confirmations.
    pub fn confirm_delete(name: impl Into<String>, request: R) -> Self {
        Self::new(request)
            .title(Phrase::key("dialog-delete-title"))
            .message(Phrase::key("dialog-delete-message").with_arg("name", name))
            .confirm_label(Phrase::key("dialog-delete-confirm"))
            .kind(DialogKind::Danger)
    }

    #[must_use]
    pub fn title(mut self, title: Phrase) -> Self {
        self.title = title;
        self
    }

    #[must_use]
    pub fn message(mut self, message: Phrase) -> Self {
        self.message = message;
        self
    }

    #[must_use]
    pub fn confirm_label(mut self, label: Phrase) -> Self {
        self.confirm_label = label;
        self
    }

    #[must_use]
    pub fn cancel_label(mut self, label: Phrase) -> Self {
        self.cancel_label = label;
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: DialogKind) -> Self {
        self.kind = kind;
        self
    }

    /// Records the user's choice and starts the exit transition. The
    /// first choice wins; later calls are ignored.
    pub fn resolve(&mut self, accepted: bool) {
        if self.resolution.is_none() {
            self.resolution = Some(Resolution {
                since: Instant::now(),
                accepted,
            });
        }
    }

    /// Returns whether the exit transition is playing.
    #[must_use]
    pub fn is_exiting(&self) -> bool {
        self.resolution.is_some()
    }

    /// Returns whether the exit transition has finished and the
    /// resolution is due for delivery.
    #[must_use]
    pub fn is_settled(&self, now: Instant) -> bool {
        self.resolution
            .is_some_and(|res| now.saturating_duration_since(res.since) >= EXIT_DURATION)
    }

    /// Consumes the dialog, returning the follow-up request if the user
    /// confirmed. Call after `is_settled` reports true.
    #[must_use]
    pub fn into_accepted_request(self) -> Option<R> {
        match self.resolution {
            Some(Resolution { accepted: true, .. }) => Some(self.request),
            _ => None,
        }
    }
}

/// Processes a dialog message.
pub fn update<R>(dialog: &mut Dialog<R>, message: Message) {
    match message {
        Message::Confirm => dialog.resolve(true),
        Message::Cancel => dialog.resolve(false),
        Message::BodyPressed => {}
    }
}

/// Renders the backdrop and the dialog card. The caller stacks the
/// result over the current screen.
pub fn view<'a, R>(dialog: &'a Dialog<R>, i18n: &'a I18n) -> Element<'a, Message> {
    let exiting = dialog.is_exiting();
    let accent = dialog.kind.color();

    let title = Text::new(dialog.title.resolve(i18n))
        .size(typography::TITLE_SM)
        .style(move |_theme: &Theme| iced::widget::text::Style {
            color: Some(faded(accent, exiting)),
        });

    let message = Text::new(dialog.message.resolve(i18n)).size(typography::BODY);

    let confirm_style = match dialog.kind {
        DialogKind::Danger => styles::button::danger,
        _ => styles::button::primary,
    };
    let buttons = Row::new()
        .spacing(spacing::SM)
        .push(
            button(Text::new(dialog.cancel_label.resolve(i18n)).size(typography::BODY))
                .padding([spacing::XS, spacing::MD])
                .style(styles::button::unselected)
                .on_press(Message::Cancel),
        )
        .push(
            button(Text::new(dialog.confirm_label.resolve(i18n)).size(typography::BODY))
                .padding([spacing::XS, spacing::MD])
                .style(confirm_style)
                .on_press(Message::Confirm),
        );

    let card = Container::new(
        Column::new()
            .spacing(spacing::MD)
            .push(title)
            .push(message)
            .push(
                Container::new(buttons)
                    .width(Length::Fill)
                    .align_x(alignment::Horizontal::Right),
            ),
    )
    .width(Length::Fixed(sizing::DIALOG_WIDTH))
    .padding(spacing::LG)
    .style(move |theme: &Theme| {
        let mut style = styles::overlay::modal_card(theme);
        if exiting {
            fade_container(&mut style);
        }
        style
    });

    // The card swallows its own clicks so only true backdrop clicks
    // cancel the dialog.
    let card = mouse_area(card).on_press(Message::BodyPressed);

    mouse_area(
        Container::new(card)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(alignment::Horizontal::Center)
            .align_y(alignment::Vertical::Center)
            .style(move |theme: &Theme| {
                let mut style = styles::overlay::backdrop(theme);
                if exiting {
                    fade_container(&mut style);
                }
                style
            }),
    )
    .on_press(Message::Cancel)
    .into()
}

fn faded(color: Color, exiting: bool) -> Color {
    if exiting {
        Color {
            a: color.a * opacity::OVERLAY_MEDIUM,
            ..color
        }
    } else {
        color
    }
}

fn fade_container(style: &mut container::Style) {
    if let Some(Background::Color(color)) = &mut style.background {
        color.a *= opacity::OVERLAY_MEDIUM;
    }
    if let Some(color) = &mut style.text_color {
        color.a *= opacity::OVERLAY_MEDIUM;
    }
    style.border.color.a *= opacity::OVERLAY_MEDIUM;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct DeleteBooking(i64);

    #[test]
    fn new_dialog_defaults_to_warning() {
        let dialog = Dialog::new(DeleteBooking(1));
        assert_eq!(dialog.kind, DialogKind::Warning);
        assert!(!dialog.is_exiting());
    }

    #[test]
    fn delete_template_is_danger_with_the_item_name() {
        let dialog = Dialog::confirm_delete("Boda - Laura", DeleteBooking(7));
        assert_eq!(dialog.kind, DialogKind::Danger);
        assert_eq!(
            dialog.message,
            Phrase::key("dialog-delete-message").with_arg("name", "Boda - Laura")
        );
    }

    #[test]
    fn first_choice_wins() {
        let mut dialog = Dialog::new(DeleteBooking(1));
        dialog.resolve(false);
        dialog.resolve(true);

        let settled = Instant::now() + EXIT_DURATION;
        assert!(dialog.is_settled(settled));
        assert_eq!(dialog.into_accepted_request(), None);
    }

    #[test]
    fn confirmation_yields_the_request_after_the_exit() {
        let mut dialog = Dialog::new(DeleteBooking(42));
        update(&mut dialog, Message::Confirm);

        let after_choice = Instant::now();
        assert!(!dialog.is_settled(after_choice));
        assert!(dialog.is_settled(after_choice + EXIT_DURATION));
        assert_eq!(dialog.into_accepted_request(), Some(DeleteBooking(42)));
    }

    #[test]
    fn backdrop_cancel_resolves_false() {
        let mut dialog = Dialog::new(DeleteBooking(3));
        update(&mut dialog, Message::Cancel);

        assert!(dialog.is_exiting());
        assert_eq!(dialog.into_accepted_request(), None);
    }

    #[test]
    fn body_clicks_do_not_resolve() {
        let mut dialog = Dialog::new(DeleteBooking(3));
        update(&mut dialog, Message::BodyPressed);
        assert!(!dialog.is_exiting());
    }

    #[test]
    fn unresolved_dialog_never_settles() {
        let dialog = Dialog::new(DeleteBooking(1));
        assert!(!dialog.is_settled(Instant::now() + Duration::from_secs(60)));
    }
}
