// SPDX-License-Identifier: MPL-2.0
//! Navigation bar module for app-level navigation.
//!
//! Renders one tab per main screen plus a settings button on the right.
//! The active screen's tab is highlighted.

use crate::app::Screen;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{spacing, typography};
use crate::ui::styles;
use iced::{
    alignment::Vertical,
    widget::{button, space, Container, Row, Text},
    Element, Length,
};

/// Contextual data needed to render the navbar.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub active: Screen,
}

/// Messages emitted by the navbar.
#[derive(Debug, Clone)]
pub enum Message {
    Select(Screen),
}

/// Events propagated to the parent application.
#[derive(Debug, Clone)]
pub enum Event {
    Navigate(Screen),
}

/// Process a navbar message and return the corresponding event.
#[must_use]
pub fn update(message: Message) -> Event {
    match message {
        Message::Select(screen) => Event::Navigate(screen),
    }
}

/// Render the navigation bar.
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let brand = Text::new(ctx.i18n.tr("app-title")).size(typography::TITLE_SM);

    let mut row = Row::new()
        .spacing(spacing::SM)
        .padding(spacing::SM)
        .align_y(Vertical::Center)
        .push(brand)
        .push(space::horizontal().width(Length::Fixed(spacing::MD)));

    for screen in Screen::ALL {
        if screen == Screen::Settings {
            continue;
        }
        row = row.push(build_tab(ctx.i18n, screen, ctx.active));
    }

    row = row
        .push(space::horizontal())
        .push(build_tab(ctx.i18n, Screen::Settings, ctx.active));

    Container::new(row)
        .width(Length::Fill)
        .style(styles::container::panel)
        .into()
}

/// Build a single tab button, highlighted when it is the active screen.
fn build_tab<'a>(i18n: &I18n, screen: Screen, active: Screen) -> Element<'a, Message> {
    let label = Text::new(i18n.tr(screen.label_key()));

    let tab = if screen == active {
        button(label).style(styles::button::selected)
    } else {
        button(label).style(styles::button::unselected)
    };

    tab.on_press(Message::Select(screen))
        .padding([spacing::XS, spacing::SM])
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::fluent::I18n;

    #[test]
    fn navbar_view_renders() {
        let i18n = I18n::default();
        let ctx = ViewContext {
            i18n: &i18n,
            active: Screen::Dashboard,
        };
        let _element = view(ctx);
    }

    #[test]
    fn navbar_view_renders_for_every_screen() {
        let i18n = I18n::default();
        for screen in Screen::ALL {
            let ctx = ViewContext {
                i18n: &i18n,
                active: screen,
            };
            let _element = view(ctx);
        }
    }

    #[test]
    fn selecting_a_tab_emits_navigate() {
        let event = update(Message::Select(Screen::Calendar));
        assert!(matches!(event, Event::Navigate(Screen::Calendar)));
    }

    #[test]
    fn selecting_settings_emits_navigate() {
        let event = update(Message::Select(Screen::Settings));
        assert!(matches!(event, Event::Navigate(Screen::Settings)));
    }
}
