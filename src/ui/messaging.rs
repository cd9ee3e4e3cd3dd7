// SPDX-License-Identifier: MPL-2.0
//! WhatsApp messaging screen: the conversation list, the active thread
//! and the composer with quick templates.
//!
//! The [`Template`] catalog lives here and is shared with the calendar
//! and reservations screens, which send the personalized variants.

use crate::api::models::{
    ConversationMessage, ConversationSummary, DeliveryState, Direction, OutgoingMessage,
};
use crate::i18n::fluent::I18n;
use crate::i18n::Phrase;
use crate::ui::design_tokens::{palette, sizing, spacing, typography};
use crate::ui::styles;
use iced::{
    alignment::{Horizontal, Vertical},
    widget::{button, scrollable, space, text_input, Column, Container, Row, Text},
    Element, Length,
};

/// Characters of the last message shown in a conversation row.
const PREVIEW_CHARS: usize = 40;

/// Canned WhatsApp message bodies.
///
/// Each template exists in a personalized form (addressed by client
/// name, used from the reservation screens) and a generic form (used
/// from the conversation composer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Confirmacion,
    Recordatorio,
    Recordatorio24h,
    Agradecimiento,
}

impl Template {
    pub const ALL: [Template; 4] = [
        Template::Confirmacion,
        Template::Recordatorio,
        Template::Recordatorio24h,
        Template::Agradecimiento,
    ];

    /// Stable identifier recorded with diagnostics events.
    pub fn slug(self) -> &'static str {
        match self {
            Template::Confirmacion => "confirmacion",
            Template::Recordatorio => "recordatorio",
            Template::Recordatorio24h => "recordatorio_24h",
            Template::Agradecimiento => "agradecimiento",
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            Template::Confirmacion => "template-confirmacion-label",
            Template::Recordatorio => "template-recordatorio-label",
            Template::Recordatorio24h => "template-recordatorio-24h-label",
            Template::Agradecimiento => "template-agradecimiento-label",
        }
    }

    /// Message body addressed to the given client.
    pub fn personalized(self, i18n: &I18n, nombre: &str) -> String {
        let key = match self {
            Template::Confirmacion => "template-confirmacion-personal",
            Template::Recordatorio => "template-recordatorio-personal",
            Template::Recordatorio24h => "template-recordatorio-24h-personal",
            Template::Agradecimiento => "template-agradecimiento-personal",
        };
        i18n.tr_with_args(key, &[("nombre", nombre)])
    }

    /// Message body without a client name.
    pub fn generic(self, i18n: &I18n) -> String {
        let key = match self {
            Template::Confirmacion => "template-confirmacion",
            Template::Recordatorio => "template-recordatorio",
            Template::Recordatorio24h => "template-recordatorio-24h",
            Template::Agradecimiento => "template-agradecimiento",
        };
        i18n.tr(key)
    }
}

/// Messaging-owned state. The conversation data itself is loaded by the
/// application and handed to [`view`].
#[derive(Debug, Default)]
pub struct State {
    pub active_telefono: Option<String>,
    pub compose: String,
    applied_template: Option<Template>,
    last_sent: Option<OutgoingMessage>,
}

impl State {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the given phone belongs to the open conversation.
    #[must_use]
    pub fn is_active(&self, telefono: &str) -> bool {
        self.active_telefono.as_deref() == Some(telefono)
    }

    /// The payload of the most recent send, for the local echo.
    pub fn take_last_sent(&mut self) -> Option<OutgoingMessage> {
        self.last_sent.take()
    }
}

/// Builds the locally-echoed copy of a just-sent message, shown until
/// the next conversation reload returns the server's version.
#[must_use]
pub fn local_echo(outgoing: &OutgoingMessage, fecha: String) -> ConversationMessage {
    ConversationMessage {
        id: 0,
        contenido: outgoing.mensaje.clone(),
        direccion: Direction::Saliente,
        estado: DeliveryState::Enviado,
        fecha,
        telefono_origen: None,
        telefono_destino: Some(outgoing.telefono.clone()),
        num_media: 0,
        media_urls: Vec::new(),
        media_types: Vec::new(),
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Select(String),
    ComposeChanged(String),
    /// A quick-template button; the view resolves the generic text.
    ApplyTemplate { template: Template, text: String },
    Send,
}

/// Events propagated to the parent application.
#[derive(Debug)]
pub enum Event {
    None,
    /// Show a warning toast.
    Warn(Phrase),
    /// A conversation was opened; load its messages.
    ConversationSelected { telefono: String },
    /// Send the composed message; the slug names the template it was
    /// based on, if any.
    SendMessage {
        message: OutgoingMessage,
        template: Option<&'static str>,
    },
}

/// Process a messaging message and return the corresponding event.
#[must_use]
pub fn update(state: &mut State, message: Message) -> Event {
    match message {
        Message::Select(telefono) => {
            if state.is_active(&telefono) {
                return Event::None;
            }
            state.active_telefono = Some(telefono.clone());
            state.compose.clear();
            state.applied_template = None;
            Event::ConversationSelected { telefono }
        }
        Message::ComposeChanged(text) => {
            state.compose = text;
            Event::None
        }
        Message::ApplyTemplate { template, text } => {
            if state.active_telefono.is_none() {
                return Event::Warn(Phrase::key("toast-conversation-missing"));
            }
            state.applied_template = Some(template);
            state.compose = text;
            Event::None
        }
        Message::Send => {
            let Some(telefono) = state.active_telefono.clone() else {
                return Event::Warn(Phrase::key("toast-conversation-missing"));
            };
            let mensaje = state.compose.trim().to_string();
            if mensaje.is_empty() {
                return Event::Warn(Phrase::key("toast-message-empty"));
            }
            let template = state.applied_template.take().map(Template::slug);
            state.compose.clear();
            let message = OutgoingMessage {
                telefono,
                mensaje,
                reserva_id: None,
            };
            state.last_sent = Some(message.clone());
            Event::SendMessage { message, template }
        }
    }
}

/// Contextual data needed to render the messaging screen.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub state: &'a State,
    pub conversations: &'a [ConversationSummary],
    pub messages: &'a [ConversationMessage],
}

/// Render the messaging screen.
pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let ViewContext {
        i18n,
        state,
        conversations,
        messages,
    } = ctx;

    let mut list = Column::new().spacing(spacing::XXS);
    if conversations.is_empty() {
        list = list.push(
            Text::new(i18n.tr("messaging-conversations-empty"))
                .size(typography::BODY_SM)
                .color(palette::GRAY_400),
        );
    }
    for summary in conversations {
        list = list.push(build_conversation_row(summary, state.is_active(&summary.telefono)));
    }

    let left = Column::new()
        .spacing(spacing::SM)
        .width(Length::Fixed(sizing::SIDEBAR_WIDTH))
        .push(Text::new(i18n.tr("messaging-conversations-title")).size(typography::TITLE_MD))
        .push(scrollable(list).height(Length::Fill));

    let thread: Element<'a, Message> = match &state.active_telefono {
        Some(telefono) => build_thread(i18n, conversations, messages, telefono),
        None => Container::new(
            Text::new(i18n.tr("messaging-placeholder"))
                .size(typography::BODY)
                .color(palette::GRAY_400),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(Horizontal::Center)
        .align_y(Vertical::Center)
        .into(),
    };

    let right = Column::new()
        .spacing(spacing::SM)
        .width(Length::Fill)
        .push(thread)
        .push(build_template_row(i18n))
        .push(build_composer(i18n, state));

    Row::new()
        .spacing(spacing::LG)
        .padding(spacing::LG)
        .push(left)
        .push(right)
        .into()
}

fn display_name(summary: &ConversationSummary) -> String {
    let nombre = summary.nombre.trim();
    if nombre.is_empty() {
        summary.telefono.clone()
    } else {
        nombre.to_string()
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push('…');
    out
}

fn build_conversation_row<'a>(summary: &ConversationSummary, active: bool) -> Element<'a, Message> {
    let header = Row::new()
        .spacing(spacing::XS)
        .push(
            Text::new(display_name(summary))
                .size(typography::BODY)
                .width(Length::Fill),
        )
        .push(
            Text::new(summary.ultimo_mensaje_fecha.clone())
                .size(typography::CAPTION)
                .color(palette::GRAY_400),
        );

    let mut footer = Row::new()
        .spacing(spacing::XS)
        .align_y(Vertical::Center)
        .push(
            Text::new(preview(&summary.ultimo_mensaje, PREVIEW_CHARS))
                .size(typography::CAPTION)
                .color(palette::GRAY_400)
                .width(Length::Fill),
        );
    if summary.tiene_multimedia {
        footer = footer.push(Text::new("📎").size(typography::CAPTION));
    }
    if summary.no_leidos > 0 {
        footer = footer.push(
            Container::new(
                Text::new(summary.no_leidos.to_string())
                    .size(typography::CAPTION)
                    .color(palette::WHITE),
            )
            .padding([0.0, spacing::XXS])
            .style(styles::container::bubble(palette::PRIMARY_500)),
        );
    }

    button(Column::new().spacing(spacing::XXS).push(header).push(footer))
        .on_press(Message::Select(summary.telefono.clone()))
        .style(if active {
            styles::button::selected
        } else {
            styles::button::unselected
        })
        .width(Length::Fill)
        .padding(spacing::XS)
        .into()
}

fn build_thread<'a>(
    i18n: &I18n,
    conversations: &[ConversationSummary],
    messages: &[ConversationMessage],
    telefono: &str,
) -> Element<'a, Message> {
    let nombre = conversations
        .iter()
        .find(|c| c.telefono == telefono)
        .map(display_name)
        .unwrap_or_else(|| telefono.to_string());

    let mut thread = Column::new().spacing(spacing::XS);
    if messages.is_empty() {
        thread = thread.push(
            Text::new(i18n.tr("messaging-thread-empty"))
                .size(typography::BODY_SM)
                .color(palette::GRAY_400),
        );
    }
    for message in messages {
        thread = thread.push(build_bubble(message));
    }

    Column::new()
        .spacing(spacing::SM)
        .push(Text::new(nombre).size(typography::TITLE_SM))
        .push(
            Text::new(telefono.to_string())
                .size(typography::CAPTION)
                .color(palette::GRAY_400),
        )
        .push(scrollable(thread).height(Length::Fill))
        .into()
}

fn build_bubble<'a>(message: &ConversationMessage) -> Element<'a, Message> {
    let mut meta = Row::new().spacing(spacing::XS).push(
        Text::new(message.fecha.clone())
            .size(typography::CAPTION)
            .color(palette::GRAY_400),
    );
    if message.direccion == Direction::Saliente {
        let (marker, color) = match message.estado {
            DeliveryState::Enviado => ("✓", palette::GRAY_400),
            DeliveryState::Recibido => ("✓✓", palette::GRAY_400),
            DeliveryState::Fallido => ("✗", palette::ERROR_500),
        };
        meta = meta.push(Text::new(marker).size(typography::CAPTION).color(color));
    }

    let mut body = Column::new().spacing(spacing::XXS);
    if message.num_media > 0 {
        body = body.push(
            Text::new(format!("📎 {}", message.num_media))
                .size(typography::CAPTION)
                .color(palette::GRAY_700),
        );
    }
    body = body
        .push(
            Text::new(message.contenido.clone())
                .size(typography::BODY)
                .color(palette::GRAY_900),
        )
        .push(meta);

    let tint = match message.direccion {
        Direction::Saliente => palette::PRIMARY_100,
        Direction::Entrante => palette::GRAY_100,
    };
    let bubble = Container::new(body)
        .padding(spacing::XS)
        .max_width(420.0)
        .style(styles::container::bubble(tint));

    match message.direccion {
        Direction::Saliente => Row::new().push(space::horizontal()).push(bubble).into(),
        Direction::Entrante => Row::new().push(bubble).push(space::horizontal()).into(),
    }
}

fn build_template_row<'a>(i18n: &I18n) -> Element<'a, Message> {
    let mut row = Row::new().spacing(spacing::XS);
    for template in Template::ALL {
        row = row.push(
            button(Text::new(i18n.tr(template.label_key())).size(typography::BODY_SM))
                .on_press(Message::ApplyTemplate {
                    template,
                    text: template.generic(i18n),
                })
                .style(styles::button::unselected)
                .padding([spacing::XXS, spacing::SM])
                .width(Length::Fill),
        );
    }
    row.into()
}

fn build_composer<'a>(i18n: &I18n, state: &'a State) -> Element<'a, Message> {
    Row::new()
        .spacing(spacing::XS)
        .push(
            text_input(&i18n.tr("compose-placeholder"), &state.compose)
                .on_input(Message::ComposeChanged)
                .on_submit(Message::Send)
                .padding(spacing::XS)
                .width(Length::Fill),
        )
        .push(
            button(Text::new(i18n.tr("messaging-send")).size(typography::BODY))
                .on_press(Message::Send)
                .style(styles::button::primary)
                .padding([spacing::XS, spacing::LG]),
        )
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(telefono: &str, nombre: &str, no_leidos: u32) -> ConversationSummary {
        ConversationSummary {
            telefono: telefono.to_string(),
            nombre: nombre.to_string(),
            ultimo_mensaje: "Hola, ¿sigue libre la fecha?".to_string(),
            ultimo_mensaje_fecha: "14/08 18:30".to_string(),
            no_leidos,
            tiene_multimedia: false,
        }
    }

    fn incoming(id: i64, contenido: &str) -> ConversationMessage {
        ConversationMessage {
            id,
            contenido: contenido.to_string(),
            direccion: Direction::Entrante,
            estado: DeliveryState::Recibido,
            fecha: "14/08/2026 18:30".to_string(),
            telefono_origen: Some("612345678".to_string()),
            telefono_destino: None,
            num_media: 0,
            media_urls: Vec::new(),
            media_types: Vec::new(),
        }
    }

    #[test]
    fn template_slugs_are_stable() {
        let slugs: Vec<_> = Template::ALL.into_iter().map(Template::slug).collect();
        assert_eq!(
            slugs,
            vec!["confirmacion", "recordatorio", "recordatorio_24h", "agradecimiento"]
        );
    }

    #[test]
    fn personalized_template_addresses_the_client() {
        let mut i18n = I18n::default();
        i18n.set_locale("es".parse().expect("locale"));

        let text = Template::Confirmacion.personalized(&i18n, "Ana");

        assert!(text.starts_with("Hola Ana"), "got: {text}");
        assert!(text.contains("confirmamos tu reserva"));
    }

    #[test]
    fn generic_template_has_no_placeholder() {
        let mut i18n = I18n::default();
        i18n.set_locale("es".parse().expect("locale"));

        let text = Template::Agradecimiento.generic(&i18n);

        assert!(text.contains("gracias por celebrar"));
        assert!(!text.contains("nombre"));
    }

    #[test]
    fn selecting_a_conversation_requests_its_messages() {
        let mut state = State::new();

        let event = update(&mut state, Message::Select("612345678".to_string()));

        match event {
            Event::ConversationSelected { telefono } => assert_eq!(telefono, "612345678"),
            other => panic!("expected selection, got {other:?}"),
        }
        assert!(state.is_active("612345678"));
    }

    #[test]
    fn reselecting_the_open_conversation_is_a_no_op() {
        let mut state = State::new();
        let _ = update(&mut state, Message::Select("612345678".to_string()));
        state.compose = "draft".to_string();

        let event = update(&mut state, Message::Select("612345678".to_string()));

        assert!(matches!(event, Event::None));
        assert_eq!(state.compose, "draft");
    }

    #[test]
    fn switching_conversations_clears_the_draft() {
        let mut state = State::new();
        let _ = update(&mut state, Message::Select("612345678".to_string()));
        state.compose = "draft".to_string();

        let _ = update(&mut state, Message::Select("698765432".to_string()));

        assert!(state.compose.is_empty());
        assert!(state.is_active("698765432"));
    }

    #[test]
    fn template_without_conversation_warns() {
        let mut state = State::new();

        let event = update(
            &mut state,
            Message::ApplyTemplate {
                template: Template::Confirmacion,
                text: "Hola".to_string(),
            },
        );

        match event {
            Event::Warn(phrase) => {
                assert_eq!(phrase, Phrase::key("toast-conversation-missing"));
            }
            other => panic!("expected warning, got {other:?}"),
        }
    }

    #[test]
    fn send_without_conversation_warns() {
        let mut state = State::new();
        state.compose = "Hola".to_string();

        let event = update(&mut state, Message::Send);

        match event {
            Event::Warn(phrase) => {
                assert_eq!(phrase, Phrase::key("toast-conversation-missing"));
            }
            other => panic!("expected warning, got {other:?}"),
        }
    }

    #[test]
    fn send_requires_text() {
        let mut state = State::new();
        let _ = update(&mut state, Message::Select("612345678".to_string()));
        state.compose = "   ".to_string();

        let event = update(&mut state, Message::Send);

        match event {
            Event::Warn(phrase) => assert_eq!(phrase, Phrase::key("toast-message-empty")),
            other => panic!("expected warning, got {other:?}"),
        }
    }

    #[test]
    fn send_builds_payload_and_remembers_it() {
        let mut state = State::new();
        let _ = update(&mut state, Message::Select("612345678".to_string()));
        state.compose = "  Hola  ".to_string();

        let event = update(&mut state, Message::Send);

        match event {
            Event::SendMessage { message, template } => {
                assert_eq!(message.telefono, "612345678");
                assert_eq!(message.mensaje, "Hola");
                assert_eq!(message.reserva_id, None);
                assert_eq!(template, None);
            }
            other => panic!("expected send, got {other:?}"),
        }
        assert!(state.compose.is_empty());

        let echoed = state.take_last_sent().expect("remembered payload");
        assert_eq!(echoed.mensaje, "Hola");
        assert!(state.take_last_sent().is_none());
    }

    #[test]
    fn applied_template_slug_rides_the_send_event() {
        let mut state = State::new();
        let _ = update(&mut state, Message::Select("612345678".to_string()));
        let _ = update(
            &mut state,
            Message::ApplyTemplate {
                template: Template::Recordatorio24h,
                text: "Mañana es tu gran día".to_string(),
            },
        );

        let event = update(&mut state, Message::Send);

        match event {
            Event::SendMessage { template, .. } => assert_eq!(template, Some("recordatorio_24h")),
            other => panic!("expected send, got {other:?}"),
        }
    }

    #[test]
    fn local_echo_marks_the_message_outgoing() {
        let outgoing = OutgoingMessage {
            telefono: "612345678".to_string(),
            mensaje: "Hola".to_string(),
            reserva_id: None,
        };

        let echo = local_echo(&outgoing, "15/08/2026 10:00".to_string());

        assert_eq!(echo.direccion, Direction::Saliente);
        assert_eq!(echo.estado, DeliveryState::Enviado);
        assert_eq!(echo.contenido, "Hola");
        assert_eq!(echo.telefono_destino.as_deref(), Some("612345678"));
    }

    #[test]
    fn display_name_falls_back_to_the_phone() {
        assert_eq!(display_name(&summary("612345678", "Ana", 0)), "Ana");
        assert_eq!(display_name(&summary("612345678", "  ", 0)), "612345678");
    }

    #[test]
    fn preview_truncates_long_messages() {
        assert_eq!(preview("corto", 10), "corto");

        let long = "a".repeat(50);
        let truncated = preview(&long, 40);
        assert_eq!(truncated.chars().count(), 41);
        assert!(truncated.ends_with('…'));
    }

    #[test]
    fn view_renders_conversations_and_thread() {
        let i18n = I18n::default();
        let mut state = State::new();
        let _ = update(&mut state, Message::Select("612345678".to_string()));
        let conversations = vec![summary("612345678", "Ana", 2), summary("698765432", "Luis", 0)];
        let messages = vec![incoming(1, "Hola, ¿sigue libre la fecha?")];

        let _ = view(ViewContext {
            i18n: &i18n,
            state: &state,
            conversations: &conversations,
            messages: &messages,
        });
    }

    #[test]
    fn view_renders_placeholder_without_selection() {
        let i18n = I18n::default();
        let state = State::new();

        let _ = view(ViewContext {
            i18n: &i18n,
            state: &state,
            conversations: &[],
            messages: &[],
        });
    }
}
