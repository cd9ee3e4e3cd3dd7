// SPDX-License-Identifier: MPL-2.0
//! Settings screen: language, theme, server connection and the
//! diagnostics export.

use crate::app::config::{self, Config};
use crate::domain::validation::{FieldRules, Validator};
use crate::i18n::fluent::I18n;
use crate::i18n::Phrase;
use crate::ui::design_tokens::{palette, spacing, typography};
use crate::ui::styles;
use crate::ui::theming::ThemeMode;
use iced::{
    widget::{button, scrollable, text_input, Column, Container, Row, Text},
    Element, Length,
};
use unic_langid::LanguageIdentifier;

/// Settings-owned state: the editable server drafts.
#[derive(Debug, Default)]
pub struct State {
    pub base_url: String,
    pub timeout_secs: String,
    validator: Validator,
}

impl State {
    /// Prefills the drafts from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.server.base_url.clone(),
            timeout_secs: config.server.timeout_secs.to_string(),
            validator: Validator::new(),
        }
    }

    fn validate(&mut self) -> bool {
        self.validator.validate_all(&[
            (
                "base-url",
                self.base_url.as_str(),
                FieldRules::new().required().custom(&url_rule),
            ),
            (
                "timeout-secs",
                self.timeout_secs.as_str(),
                FieldRules::new()
                    .required()
                    .number()
                    .min(config::MIN_TIMEOUT_SECS as f64)
                    .max(config::MAX_TIMEOUT_SECS as f64),
            ),
        ])
    }
}

/// Accepts `http://` / `https://` URLs with a non-empty host part.
fn url_rule(value: &str) -> Result<(), Option<Phrase>> {
    let trimmed = value.trim();
    let rest = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(Some(Phrase::key("validation-url"))),
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    /// `None` follows the system locale.
    LanguagePicked(Option<LanguageIdentifier>),
    ThemePicked(ThemeMode),
    BaseUrlChanged(String),
    TimeoutChanged(String),
    SaveServer,
    ExportDiagnostics,
}

/// Events propagated to the parent application.
#[derive(Debug)]
pub enum Event {
    None,
    /// Show a warning toast.
    Warn(Phrase),
    ChangeLanguage(Option<LanguageIdentifier>),
    ChangeTheme(ThemeMode),
    /// Persist the server section and rebuild the API client.
    SaveServer { base_url: String, timeout_secs: u64 },
    ExportDiagnostics,
}

/// Process a settings message and return the corresponding event.
#[must_use]
pub fn update(state: &mut State, message: Message) -> Event {
    match message {
        Message::LanguagePicked(locale) => Event::ChangeLanguage(locale),
        Message::ThemePicked(mode) => Event::ChangeTheme(mode),
        Message::BaseUrlChanged(text) => {
            state.base_url = text;
            Event::None
        }
        Message::TimeoutChanged(text) => {
            state.timeout_secs = text;
            Event::None
        }
        Message::SaveServer => {
            if !state.validate() {
                return Event::Warn(Phrase::key("toast-fields-invalid"));
            }
            let timeout_secs = state
                .timeout_secs
                .trim()
                .parse::<f64>()
                .map_or(config::DEFAULT_TIMEOUT_SECS, |secs| secs as u64);
            Event::SaveServer {
                base_url: state.base_url.trim().trim_end_matches('/').to_string(),
                timeout_secs,
            }
        }
        Message::ExportDiagnostics => Event::ExportDiagnostics,
    }
}

/// Contextual data needed to render the settings screen.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub state: &'a State,
    pub config: &'a Config,
}

/// Render the settings screen.
pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let ViewContext {
        i18n,
        state,
        config,
    } = ctx;

    let content = Column::new()
        .spacing(spacing::LG)
        .padding(spacing::LG)
        .max_width(700.0)
        .push(Text::new(i18n.tr("settings-title")).size(typography::TITLE_MD))
        .push(build_language_section(i18n, config))
        .push(build_theme_section(i18n, config))
        .push(build_server_section(i18n, state))
        .push(build_diagnostics_section(i18n));

    scrollable(content).into()
}

fn build_language_section<'a>(i18n: &I18n, config: &Config) -> Element<'a, Message> {
    let selected = config.general.language.clone();

    let mut row = Row::new().spacing(spacing::XS).push(build_choice_button(
        i18n.tr("settings-language-system"),
        Message::LanguagePicked(None),
        selected.is_none(),
    ));
    for locale in &i18n.available_locales {
        let label = i18n.tr(&format!("language-{locale}"));
        let active = selected.as_deref() == Some(locale.to_string().as_str());
        row = row.push(build_choice_button(
            label,
            Message::LanguagePicked(Some(locale.clone())),
            active,
        ));
    }

    build_section(i18n, "settings-language-title", row.into())
}

fn build_theme_section<'a>(i18n: &I18n, config: &Config) -> Element<'a, Message> {
    let mut row = Row::new().spacing(spacing::XS);
    for mode in ThemeMode::ALL {
        row = row.push(build_choice_button(
            i18n.tr(mode.label_key()),
            Message::ThemePicked(mode),
            mode == config.general.theme_mode,
        ));
    }

    build_section(i18n, "settings-theme-title", row.into())
}

fn build_server_section<'a>(i18n: &I18n, state: &'a State) -> Element<'a, Message> {
    let body = Column::new()
        .spacing(spacing::SM)
        .push(build_field(
            i18n,
            "settings-base-url",
            "http://localhost:5000",
            &state.base_url,
            Message::BaseUrlChanged,
            state.validator.error_for("base-url"),
        ))
        .push(build_field(
            i18n,
            "settings-timeout",
            "30",
            &state.timeout_secs,
            Message::TimeoutChanged,
            state.validator.error_for("timeout-secs"),
        ))
        .push(
            button(Text::new(i18n.tr("settings-save")).size(typography::BODY))
                .on_press(Message::SaveServer)
                .style(styles::button::primary)
                .padding([spacing::XS, spacing::LG]),
        );

    build_section(i18n, "settings-server-title", body.into())
}

fn build_diagnostics_section<'a>(i18n: &I18n) -> Element<'a, Message> {
    let body = Column::new()
        .spacing(spacing::SM)
        .push(
            Text::new(i18n.tr("settings-diagnostics-hint"))
                .size(typography::BODY_SM)
                .color(palette::GRAY_400),
        )
        .push(
            button(Text::new(i18n.tr("settings-export")).size(typography::BODY))
                .on_press(Message::ExportDiagnostics)
                .style(styles::button::unselected)
                .padding([spacing::XS, spacing::LG]),
        );

    build_section(i18n, "settings-diagnostics-title", body.into())
}

fn build_section<'a>(
    i18n: &I18n,
    title_key: &'static str,
    body: Element<'a, Message>,
) -> Element<'a, Message> {
    Container::new(
        Column::new()
            .spacing(spacing::SM)
            .push(Text::new(i18n.tr(title_key)).size(typography::TITLE_SM))
            .push(body),
    )
    .padding(spacing::MD)
    .width(Length::Fill)
    .style(styles::container::panel)
    .into()
}

fn build_choice_button<'a>(label: String, message: Message, active: bool) -> Element<'a, Message> {
    button(Text::new(label).size(typography::BODY))
        .on_press(message)
        .style(if active {
            styles::button::selected
        } else {
            styles::button::unselected
        })
        .padding([spacing::XS, spacing::SM])
        .into()
}

fn build_field<'a>(
    i18n: &I18n,
    label_key: &'static str,
    placeholder: &'static str,
    value: &'a str,
    on_input: fn(String) -> Message,
    error: Option<&'a Phrase>,
) -> Element<'a, Message> {
    let mut column = Column::new()
        .spacing(spacing::XXS)
        .push(Text::new(i18n.tr(label_key)).size(typography::BODY_SM))
        .push(
            text_input(placeholder, value)
                .on_input(on_input)
                .padding(spacing::XS),
        );

    if let Some(error) = error {
        column = column.push(
            Text::new(error.resolve(i18n))
                .size(typography::CAPTION)
                .color(palette::ERROR_500),
        );
    }

    column.into()
}
