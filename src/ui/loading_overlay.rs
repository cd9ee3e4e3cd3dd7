// SPDX-License-Identifier: MPL-2.0
//! Full-window blocking overlay for operations that must not be
//! interrupted, like multi-date saves.
//!
//! A single `Overlay` lives on the App. Screens never construct their
//! own; they ask the app to wrap a request so show and hide stay paired
//! on both the success and the failure path.

use crate::i18n::fluent::I18n;
use crate::i18n::Phrase;
use crate::ui::design_tokens::{opacity, palette, radius, spacing, typography};
use crate::ui::styles;
use crate::ui::widgets::BusySpinner;
use iced::widget::{container, mouse_area, Column, Container, Text};
use iced::{alignment, Background, Element, Length, Theme};
use std::f32::consts::TAU;
use std::time::{Duration, Instant};

/// How long the overlay keeps fading after `hide` before it detaches.
pub const EXIT_DURATION: Duration = Duration::from_millis(200);

/// One full spinner turn.
const SPIN_PERIOD: Duration = Duration::from_millis(800);

/// Messages emitted by the overlay view. The backdrop swallows clicks
/// so the screen underneath stays blocked; the app ignores the message.
#[derive(Debug, Clone, Copy)]
pub enum Message {
    BackdropPressed,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Hidden,
    Visible { since: Instant },
    Exiting { since: Instant },
}

/// Blocking overlay with a spinner and a status message.
#[derive(Debug)]
pub struct Overlay {
    phase: Phase,
    message: Phrase,
    rotation: f32,
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new()
    }
}

impl Overlay {
    /// Creates a hidden overlay.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Phase::Hidden,
            message: Phrase::key("overlay-loading"),
            rotation: 0.0,
        }
    }

    /// Shows the overlay with the given message, or swaps the message
    /// if it is already showing. Showing during the exit transition
    /// revives the overlay without a flicker.
    pub fn show(&mut self, message: Phrase) {
        self.message = message;
        match self.phase {
            Phase::Visible { .. } => {}
            Phase::Hidden | Phase::Exiting { .. } => {
                self.phase = Phase::Visible {
                    since: Instant::now(),
                };
            }
        }
    }

    /// Shows the overlay with the default message.
    pub fn show_default(&mut self) {
        self.show(Phrase::key("overlay-loading"));
    }

    /// Starts the exit transition. No-op while hidden or already
    /// exiting.
    pub fn hide(&mut self) {
        if let Phase::Visible { .. } = self.phase {
            self.phase = Phase::Exiting {
                since: Instant::now(),
            };
        }
    }

    /// Advances the spinner and the exit transition to `now`.
    pub fn tick(&mut self, now: Instant) {
        match self.phase {
            Phase::Hidden => {}
            Phase::Visible { since } => {
                let elapsed = now.saturating_duration_since(since).as_secs_f32();
                self.rotation = elapsed * TAU / SPIN_PERIOD.as_secs_f32();
            }
            Phase::Exiting { since } => {
                if now.saturating_duration_since(since) >= EXIT_DURATION {
                    self.phase = Phase::Hidden;
                    self.rotation = 0.0;
                }
            }
        }
    }

    /// Returns whether the overlay is rendered, fading exit included.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !matches!(self.phase, Phase::Hidden)
    }

    /// Returns whether the overlay needs animation ticks.
    #[must_use]
    pub fn has_pending_work(&self) -> bool {
        self.is_visible()
    }

    /// Renders the backdrop with the spinner pill. The caller stacks
    /// the result over the current screen.
    pub fn view<'a>(&'a self, i18n: &'a I18n) -> Element<'a, Message> {
        let exiting = matches!(self.phase, Phase::Exiting { .. });

        let spinner = BusySpinner::new(palette::WHITE, self.rotation).into_element();
        let caption = Text::new(self.message.resolve(i18n))
            .size(typography::BODY_LG)
            .align_x(alignment::Horizontal::Center);

        let pill = Container::new(
            Column::new()
                .spacing(spacing::MD)
                .align_x(alignment::Horizontal::Center)
                .push(spinner)
                .push(caption),
        )
        .padding(spacing::LG)
        .style(move |theme: &Theme| {
            let mut style = styles::overlay::indicator(radius::LG)(theme);
            if exiting {
                fade_container(&mut style);
            }
            style
        });

        mouse_area(
            Container::new(pill)
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
        .on_press(Message::BackdropPressed)
        .into()
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
