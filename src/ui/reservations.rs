// SPDX-License-Identifier: MPL-2.0
//! Reservations screen: the filterable table of confirmed reservations
//! with per-row WhatsApp, estado and delete actions.

use crate::api::models::{Estado, OutgoingMessage, Reservation};
use crate::domain::dates;
use crate::i18n::fluent::I18n;
use crate::i18n::Phrase;
use crate::ui::design_tokens::{palette, spacing, typography};
use crate::ui::messaging::Template;
use crate::ui::styles;
use crate::ui::theming;
use iced::{
    alignment::Vertical,
    widget::{button, scrollable, space, text_input, Column, Container, Row, Text},
    Element, Length,
};

/// Reservations-owned state: the live filter and the open compose panel.
#[derive(Debug, Default)]
pub struct State {
    pub filter: String,
    pub compose_for: Option<i64>,
    pub compose: String,
    applied_template: Option<Template>,
}

impl State {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Rows matching the live filter against client, phone or type.
pub fn filtered<'a>(reservations: &'a [Reservation], filter: &str) -> Vec<&'a Reservation> {
    let needle = filter.trim().to_lowercase();
    if needle.is_empty() {
        return reservations.iter().collect();
    }
    reservations
        .iter()
        .filter(|r| {
            r.cliente.to_lowercase().contains(&needle)
                || r.telefono.to_lowercase().contains(&needle)
                || r.celebration_type()
                    .is_some_and(|tipo| tipo.to_lowercase().contains(&needle))
        })
        .collect()
}

#[derive(Debug, Clone)]
pub enum Message {
    FilterChanged(String),
    FilterSubmitted,
    /// The per-row WhatsApp button; the view resolves the default
    /// template text with the row's client name.
    OpenCompose { id: i64, text: String },
    CloseCompose,
    ComposeChanged(String),
    /// A template button in the compose panel.
    ApplyTemplate { template: Template, text: String },
    SendWhatsApp { telefono: String },
    ChangeEstado { id: i64, estado: Estado },
    Delete { id: i64, cliente: String },
}

/// Events propagated to the parent application.
#[derive(Debug)]
pub enum Event {
    None,
    /// Show a warning toast.
    Warn(Phrase),
    /// The filter text was committed.
    FilterApplied { filter: String },
    /// Ask the user before deleting.
    ConfirmDelete { id: i64, cliente: String },
    ChangeEstado { id: i64, estado: Estado },
    /// Send the composed WhatsApp message; the slug names the template
    /// it was based on, if any.
    SendWhatsApp {
        message: OutgoingMessage,
        template: Option<&'static str>,
    },
}

/// Process a reservations message and return the corresponding event.
#[must_use]
pub fn update(state: &mut State, message: Message) -> Event {
    match message {
        Message::FilterChanged(text) => {
            state.filter = text;
            Event::None
        }
        Message::FilterSubmitted => Event::FilterApplied {
            filter: state.filter.trim().to_string(),
        },
        Message::OpenCompose { id, text } => {
            if state.compose_for == Some(id) {
                state.compose_for = None;
                state.compose.clear();
                state.applied_template = None;
                return Event::None;
            }
            state.compose_for = Some(id);
            state.compose = text;
            state.applied_template = Some(Template::Confirmacion);
            Event::None
        }
        Message::CloseCompose => {
            state.compose_for = None;
            state.compose.clear();
            state.applied_template = None;
            Event::None
        }
        Message::ComposeChanged(text) => {
            state.compose = text;
            Event::None
        }
        Message::ApplyTemplate { template, text } => {
            state.applied_template = Some(template);
            state.compose = text;
            Event::None
        }
        Message::SendWhatsApp { telefono } => {
            let mensaje = state.compose.trim().to_string();
            if mensaje.is_empty() {
                return Event::Warn(Phrase::key("toast-message-empty"));
            }
            let template = state.applied_template.take().map(Template::slug);
            let reserva_id = state.compose_for.take();
            state.compose.clear();
            Event::SendWhatsApp {
                message: OutgoingMessage {
                    telefono,
                    mensaje,
                    reserva_id,
                },
                template,
            }
        }
        Message::ChangeEstado { id, estado } => Event::ChangeEstado { id, estado },
        Message::Delete { id, cliente } => Event::ConfirmDelete { id, cliente },
    }
}

/// Contextual data needed to render the reservations screen.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub state: &'a State,
    pub reservations: &'a [Reservation],
}

/// Render the reservations screen.
pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let ViewContext {
        i18n,
        state,
        reservations,
    } = ctx;

    let filter_row = Row::new()
        .spacing(spacing::SM)
        .align_y(Vertical::Center)
        .push(Text::new(i18n.tr("reservations-title")).size(typography::TITLE_MD))
        .push(space::horizontal())
        .push(
            text_input(&i18n.tr("reservations-filter-placeholder"), &state.filter)
                .on_input(Message::FilterChanged)
                .on_submit(Message::FilterSubmitted)
                .padding(spacing::XS)
                .width(Length::Fixed(320.0)),
        );

    let rows = filtered(reservations, &state.filter);
    let mut table = Column::new().spacing(spacing::XS).push(build_header_row(i18n));
    if rows.is_empty() {
        table = table.push(
            Text::new(i18n.tr("reservations-empty"))
                .size(typography::BODY)
                .color(palette::GRAY_400),
        );
    }
    for reservation in rows {
        table = table.push(build_row(i18n, state, reservation));
        if state.compose_for == Some(reservation.id) {
            table = table.push(build_compose_panel(i18n, state, reservation));
        }
    }

    Column::new()
        .spacing(spacing::SM)
        .padding(spacing::LG)
        .push(filter_row)
        .push(scrollable(table).height(Length::Fill))
        .into()
}

fn build_header_row<'a>(i18n: &I18n) -> Element<'a, Message> {
    let label = |key: &'static str| {
        Text::new(i18n.tr(key))
            .size(typography::BODY_SM)
            .color(palette::GRAY_400)
    };

    Row::new()
        .spacing(spacing::SM)
        .push(label("reservations-col-fecha").width(Length::Fixed(88.0)))
        .push(label("reservations-col-cliente").width(Length::Fill))
        .push(label("reservations-col-telefono").width(Length::Fixed(110.0)))
        .push(label("reservations-col-tipo").width(Length::Fixed(110.0)))
        .push(label("reservations-col-invitados").width(Length::Fixed(72.0)))
        .push(label("reservations-col-precio").width(Length::Fixed(80.0)))
        .push(label("reservations-col-acciones").width(Length::Fixed(320.0)))
        .into()
}

fn build_row<'a>(i18n: &I18n, state: &State, reservation: &Reservation) -> Element<'a, Message> {
    let tipo = reservation
        .celebration_type()
        .map_or_else(|| "-".to_string(), str::to_string);
    let invitados = reservation
        .invitados
        .map_or_else(|| "-".to_string(), |n| n.to_string());
    let precio = reservation
        .precio
        .map_or_else(|| "-".to_string(), |p| format!("{p:.2}€"));

    let mut actions = Row::new()
        .spacing(spacing::XS)
        .align_y(Vertical::Center)
        .width(Length::Fixed(320.0))
        .push(
            button(Text::new(i18n.tr("reservations-whatsapp")).size(typography::BODY_SM))
                .on_press(Message::OpenCompose {
                    id: reservation.id,
                    text: Template::Confirmacion.personalized(i18n, &reservation.cliente),
                })
                .style(if state.compose_for == Some(reservation.id) {
                    styles::button::selected
                } else {
                    styles::button::unselected
                })
                .padding([spacing::XXS, spacing::XS]),
        );
    for estado in [Estado::Pendiente, Estado::Cancelada] {
        actions = actions.push(
            button(Text::new(estado.capitalized()).size(typography::BODY_SM))
                .on_press(Message::ChangeEstado {
                    id: reservation.id,
                    estado,
                })
                .style(styles::button::accent(theming::estado_accent(estado)))
                .padding([spacing::XXS, spacing::XS]),
        );
    }
    actions = actions.push(
        button(Text::new("×").size(typography::BODY_SM))
            .on_press(Message::Delete {
                id: reservation.id,
                cliente: reservation.cliente.clone(),
            })
            .style(styles::button::danger)
            .padding([spacing::XXS, spacing::XS]),
    );

    let row = Row::new()
        .spacing(spacing::SM)
        .align_y(Vertical::Center)
        .push(
            Text::new(dates::display_date(reservation.fecha()))
                .size(typography::BODY)
                .width(Length::Fixed(88.0)),
        )
        .push(
            Text::new(reservation.cliente.clone())
                .size(typography::BODY)
                .width(Length::Fill),
        )
        .push(
            Text::new(reservation.telefono.clone())
                .size(typography::BODY_SM)
                .width(Length::Fixed(110.0)),
        )
        .push(Text::new(tipo).size(typography::BODY_SM).width(Length::Fixed(110.0)))
        .push(
            Text::new(invitados)
                .size(typography::BODY_SM)
                .width(Length::Fixed(72.0)),
        )
        .push(Text::new(precio).size(typography::BODY).width(Length::Fixed(80.0)))
        .push(actions);

    Container::new(row)
        .padding(spacing::SM)
        .width(Length::Fill)
        .style(styles::container::panel)
        .into()
}

fn build_compose_panel<'a>(
    i18n: &I18n,
    state: &'a State,
    reservation: &Reservation,
) -> Element<'a, Message> {
    let mut templates = Row::new().spacing(spacing::XS);
    for template in Template::ALL {
        templates = templates.push(
            button(Text::new(i18n.tr(template.label_key())).size(typography::BODY_SM))
                .on_press(Message::ApplyTemplate {
                    template,
                    text: template.personalized(i18n, &reservation.cliente),
                })
                .style(styles::button::unselected)
                .padding([spacing::XXS, spacing::SM]),
        );
    }

    let composer = Row::new()
        .spacing(spacing::XS)
        .push(
            text_input(&i18n.tr("compose-placeholder"), &state.compose)
                .on_input(Message::ComposeChanged)
                .padding(spacing::XS)
                .width(Length::Fill),
        )
        .push(
            button(Text::new(i18n.tr("reservations-send")).size(typography::BODY))
                .on_press(Message::SendWhatsApp {
                    telefono: reservation.telefono.clone(),
                })
                .style(styles::button::primary)
                .padding([spacing::XS, spacing::LG]),
        )
        .push(
            button(Text::new(i18n.tr("reservations-cancel")).size(typography::BODY))
                .on_press(Message::CloseCompose)
                .style(styles::button::unselected)
                .padding([spacing::XS, spacing::SM]),
        );

    Container::new(
        Column::new()
            .spacing(spacing::XS)
            .push(templates)
            .push(composer),
    )
    .padding(spacing::SM)
    .width(Length::Fill)
    .style(styles::container::panel)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn reservation(id: i64, title: &str, telefono: &str) -> Reservation {
        let start = NaiveDateTime::parse_from_str("2026-08-20T12:00:00", "%Y-%m-%dT%H:%M:%S")
            .expect("datetime");
        Reservation {
            id,
            title: title.to_string(),
            start,
            end: start,
            cliente: title.split(" - ").next().unwrap_or("").to_string(),
            telefono: telefono.to_string(),
            invitados: Some(40),
            precio: Some(900.0),
        }
    }

    #[test]
    fn filter_matches_client_case_insensitive() {
        let reservations = vec![
            reservation(1, "Ana García - Boda", "612345678"),
            reservation(2, "Luis - Cumpleaños", "698765432"),
        ];

        let rows = filtered(&reservations, "GARCÍA");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 1);
    }

    #[test]
    fn filter_matches_phone_and_type() {
        let reservations = vec![
            reservation(1, "Ana - Boda", "612345678"),
            reservation(2, "Luis - Cumpleaños", "698765432"),
        ];

        assert_eq!(filtered(&reservations, "98765")[0].id, 2);
        assert_eq!(filtered(&reservations, "boda")[0].id, 1);
    }

    #[test]
    fn blank_filter_returns_everything() {
        let reservations = vec![
            reservation(1, "Ana - Boda", "612345678"),
            reservation(2, "Luis - Cumpleaños", "698765432"),
        ];

        assert_eq!(filtered(&reservations, "   ").len(), 2);
        assert!(filtered(&reservations, "zzz").is_empty());
    }

    #[test]
    fn filter_submit_reports_the_trimmed_text() {
        let mut state = State::new();
        let _ = update(&mut state, Message::FilterChanged("  boda ".to_string()));

        let event = update(&mut state, Message::FilterSubmitted);

        match event {
            Event::FilterApplied { filter } => assert_eq!(filter, "boda"),
            other => panic!("expected filter event, got {other:?}"),
        }
    }

    #[test]
    fn opening_compose_prefills_the_default_template() {
        let mut state = State::new();

        let event = update(
            &mut state,
            Message::OpenCompose {
                id: 1,
                text: "Hola Ana, confirmamos tu reserva".to_string(),
            },
        );

        assert!(matches!(event, Event::None));
        assert_eq!(state.compose_for, Some(1));
        assert!(state.compose.starts_with("Hola Ana"));
    }

    #[test]
    fn reopening_the_same_row_closes_the_panel() {
        let mut state = State::new();
        let open = || Message::OpenCompose {
            id: 1,
            text: "Hola".to_string(),
        };

        let _ = update(&mut state, open());
        let _ = update(&mut state, open());

        assert_eq!(state.compose_for, None);
        assert!(state.compose.is_empty());
    }

    #[test]
    fn opening_another_row_replaces_the_panel() {
        let mut state = State::new();
        let _ = update(
            &mut state,
            Message::OpenCompose {
                id: 1,
                text: "Hola Ana".to_string(),
            },
        );

        let _ = update(
            &mut state,
            Message::OpenCompose {
                id: 2,
                text: "Hola Luis".to_string(),
            },
        );

        assert_eq!(state.compose_for, Some(2));
        assert_eq!(state.compose, "Hola Luis");
    }

    #[test]
    fn send_requires_text() {
        let mut state = State::new();
        let _ = update(
            &mut state,
            Message::OpenCompose {
                id: 1,
                text: String::new(),
            },
        );

        let event = update(
            &mut state,
            Message::SendWhatsApp {
                telefono: "612345678".to_string(),
            },
        );

        match event {
            Event::Warn(phrase) => assert_eq!(phrase, Phrase::key("toast-message-empty")),
            other => panic!("expected warning, got {other:?}"),
        }
    }

    #[test]
    fn send_carries_the_reservation_and_template() {
        let mut state = State::new();
        let _ = update(
            &mut state,
            Message::OpenCompose {
                id: 5,
                text: "Hola Ana, confirmamos tu reserva".to_string(),
            },
        );

        let event = update(
            &mut state,
            Message::SendWhatsApp {
                telefono: "612345678".to_string(),
            },
        );

        match event {
            Event::SendWhatsApp { message, template } => {
                assert_eq!(message.telefono, "612345678");
                assert_eq!(message.reserva_id, Some(5));
                assert_eq!(template, Some("confirmacion"));
            }
            other => panic!("expected send, got {other:?}"),
        }
        assert_eq!(state.compose_for, None);
        assert!(state.compose.is_empty());
    }

    #[test]
    fn editing_after_a_template_keeps_its_slug() {
        let mut state = State::new();
        let _ = update(
            &mut state,
            Message::OpenCompose {
                id: 5,
                text: "Hola Ana".to_string(),
            },
        );
        let _ = update(
            &mut state,
            Message::ApplyTemplate {
                template: Template::Agradecimiento,
                text: "Muchas gracias".to_string(),
            },
        );
        let _ = update(
            &mut state,
            Message::ComposeChanged("Muchas gracias, un saludo".to_string()),
        );

        let event = update(
            &mut state,
            Message::SendWhatsApp {
                telefono: "612345678".to_string(),
            },
        );

        match event {
            Event::SendWhatsApp { template, .. } => assert_eq!(template, Some("agradecimiento")),
            other => panic!("expected send, got {other:?}"),
        }
    }

    #[test]
    fn estado_and_delete_bubble_up() {
        let mut state = State::new();

        let event = update(
            &mut state,
            Message::ChangeEstado {
                id: 3,
                estado: Estado::Cancelada,
            },
        );
        match event {
            Event::ChangeEstado { id, estado } => {
                assert_eq!(id, 3);
                assert_eq!(estado, Estado::Cancelada);
            }
            other => panic!("expected estado change, got {other:?}"),
        }

        let event = update(
            &mut state,
            Message::Delete {
                id: 3,
                cliente: "Ana".to_string(),
            },
        );
        match event {
            Event::ConfirmDelete { id, cliente } => {
                assert_eq!(id, 3);
                assert_eq!(cliente, "Ana");
            }
            other => panic!("expected confirmation request, got {other:?}"),
        }
    }

    #[test]
    fn view_renders_table_and_compose_panel() {
        let i18n = I18n::default();
        let mut state = State::new();
        state.filter = "ana".to_string();
        state.compose_for = Some(1);
        state.compose = "Hola Ana".to_string();
        let reservations = vec![
            reservation(1, "Ana - Boda", "612345678"),
            reservation(2, "Luis - Cumpleaños", "698765432"),
        ];

        let _ = view(ViewContext {
            i18n: &i18n,
            state: &state,
            reservations: &reservations,
        });
    }

    #[test]
    fn view_renders_empty_state() {
        let i18n = I18n::default();
        let state = State::new();

        let _ = view(ViewContext {
            i18n: &i18n,
            state: &state,
            reservations: &[],
        });
    }
}
