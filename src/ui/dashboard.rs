// SPDX-License-Identifier: MPL-2.0
//! Dashboard screen with month statistics, the upcoming reservation list,
//! the celebration-type breakdown and the quick-create form.

use crate::api::models::{NewReservation, Reservation};
use crate::domain::dates;
use crate::i18n::fluent::I18n;
use crate::i18n::Phrase;
use crate::ui::design_tokens::{palette, sizing, spacing, typography};
use crate::ui::reservation_form;
use crate::ui::styles;
use chrono::{Datelike, NaiveDate};
use iced::{
    alignment::Vertical,
    widget::{container, scrollable, Column, Container, Row, Space, Text},
    Color, Element, Length,
};

/// Dashboard-owned state: the quick-create form.
#[derive(Debug, Default)]
pub struct State {
    pub form: reservation_form::State,
}

impl State {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Aggregates shown on the stat cards.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthStats {
    /// Reservations starting in the current month.
    pub count: usize,
    /// Summed price of those reservations.
    pub revenue: f64,
    /// Date of the next reservation from today on, if any.
    pub next_event: Option<NaiveDate>,
}

/// Computes the current-month aggregates.
pub fn month_stats(reservations: &[Reservation], today: NaiveDate) -> MonthStats {
    let in_month = |fecha: NaiveDate| {
        fecha.year() == today.year() && fecha.month() == today.month()
    };

    let count = reservations
        .iter()
        .filter(|r| in_month(r.fecha()))
        .count();
    let revenue = reservations
        .iter()
        .filter(|r| in_month(r.fecha()))
        .filter_map(|r| r.precio)
        .sum();
    let next_event = reservations
        .iter()
        .map(Reservation::fecha)
        .filter(|fecha| *fecha >= today)
        .min();

    MonthStats {
        count,
        revenue,
        next_event,
    }
}

/// The next five reservations from today on, soonest first.
pub fn upcoming(reservations: &[Reservation], today: NaiveDate) -> Vec<&Reservation> {
    let mut future: Vec<&Reservation> = reservations
        .iter()
        .filter(|r| r.fecha() >= today)
        .collect();
    future.sort_by_key(|r| r.start);
    future.truncate(5);
    future
}

/// Reservation counts per celebration type, in first-seen order.
///
/// Reservations without a type in their title fall under `placeholder`.
pub fn type_breakdown(reservations: &[Reservation], placeholder: &str) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for reservation in reservations {
        let tipo = reservation.celebration_type().unwrap_or(placeholder);
        match counts.iter_mut().find(|(name, _)| name == tipo) {
            Some((_, count)) => *count += 1,
            None => counts.push((tipo.to_string(), 1)),
        }
    }
    counts
}

/// Messages emitted by the dashboard.
#[derive(Debug, Clone)]
pub enum Message {
    Form(reservation_form::Message),
}

/// Events propagated to the parent application.
#[derive(Debug)]
pub enum Event {
    None,
    /// Show a warning toast.
    Warn(Phrase),
    /// Send one create request per payload, then reload.
    CreateReservations(Vec<NewReservation>),
}

/// Process a dashboard message and return the corresponding event.
#[must_use]
pub fn update(state: &mut State, message: Message) -> Event {
    match message {
        Message::Form(message) => {
            let event = reservation_form::update(&mut state.form, message);
            if let Some(warning) = event.warning() {
                return Event::Warn(warning);
            }
            match event {
                reservation_form::Event::Submit(batch) => Event::CreateReservations(batch),
                _ => Event::None,
            }
        }
    }
}

/// Contextual data needed to render the dashboard.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub state: &'a State,
    pub reservations: &'a [Reservation],
    pub message_count: usize,
    pub today: NaiveDate,
}

/// Render the dashboard screen.
pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let i18n = ctx.i18n;
    let stats = month_stats(ctx.reservations, ctx.today);

    let next_event_text = stats
        .next_event
        .map(dates::display_date)
        .unwrap_or_else(|| "-".to_string());

    let stats_row = Row::new()
        .spacing(spacing::SM)
        .push(build_stat_card(
            i18n,
            "dashboard-stat-month-count",
            stats.count.to_string(),
            palette::PRIMARY_500,
        ))
        .push(build_stat_card(
            i18n,
            "dashboard-stat-month-revenue",
            format!("{:.2}€", stats.revenue),
            palette::SUCCESS_500,
        ))
        .push(build_stat_card(
            i18n,
            "dashboard-stat-next-event",
            next_event_text,
            palette::INFO_500,
        ))
        .push(build_stat_card(
            i18n,
            "dashboard-stat-messages",
            ctx.message_count.to_string(),
            palette::WARNING_500,
        ));

    let left = Column::new()
        .spacing(spacing::LG)
        .width(Length::Fill)
        .push(stats_row)
        .push(build_upcoming_section(i18n, ctx.reservations, ctx.today))
        .push(build_breakdown_section(i18n, ctx.reservations));

    let form_panel = Container::new(
        Column::new()
            .spacing(spacing::SM)
            .push(Text::new(i18n.tr("form-title")).size(typography::TITLE_MD))
            .push(reservation_form::view(reservation_form::ViewContext {
                i18n,
                state: &ctx.state.form,
            })
            .map(Message::Form)),
    )
    .padding(spacing::MD)
    .width(Length::Fixed(sizing::FORM_WIDTH))
    .style(styles::container::panel);

    let content = Row::new()
        .spacing(spacing::LG)
        .padding(spacing::LG)
        .push(left)
        .push(form_panel);

    scrollable(content).into()
}

fn build_stat_card<'a>(
    i18n: &I18n,
    label_key: &'static str,
    value: String,
    accent: Color,
) -> Element<'a, Message> {
    let card = Column::new()
        .spacing(spacing::XXS)
        .push(
            Text::new(i18n.tr(label_key))
                .size(typography::BODY_SM)
                .color(palette::GRAY_400),
        )
        .push(Text::new(value).size(typography::TITLE_MD));

    Container::new(card)
        .padding(spacing::MD)
        .width(Length::Fill)
        .style(styles::container::accent_card(accent))
        .into()
}

fn build_upcoming_section<'a>(
    i18n: &'a I18n,
    reservations: &'a [Reservation],
    today: NaiveDate,
) -> Element<'a, Message> {
    let mut section = Column::new()
        .spacing(spacing::XS)
        .push(Text::new(i18n.tr("dashboard-upcoming-title")).size(typography::TITLE_MD));

    let upcoming = upcoming(reservations, today);
    if upcoming.is_empty() {
        section = section.push(
            Text::new(i18n.tr("dashboard-upcoming-empty"))
                .size(typography::BODY)
                .color(palette::GRAY_400),
        );
        return section.into();
    }

    for reservation in upcoming {
        let tipo = reservation
            .celebration_type()
            .map(str::to_string)
            .unwrap_or_else(|| i18n.tr("dashboard-event-fallback"));
        let invitados = reservation
            .invitados
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        let precio = reservation
            .precio
            .map(|p| format!("{p:.2}€"))
            .unwrap_or_else(|| "-".to_string());

        let row = Row::new()
            .spacing(spacing::MD)
            .align_y(Vertical::Center)
            .push(
                Text::new(dates::display_date(reservation.fecha()))
                    .size(typography::BODY)
                    .width(Length::Fixed(96.0)),
            )
            .push(
                Text::new(reservation.cliente.as_str())
                    .size(typography::BODY)
                    .width(Length::Fill),
            )
            .push(Text::new(tipo).size(typography::BODY_SM).width(Length::Fill))
            .push(Text::new(invitados).size(typography::BODY_SM))
            .push(Text::new(precio).size(typography::BODY));

        section = section.push(
            Container::new(row)
                .padding(spacing::SM)
                .width(Length::Fill)
                .style(styles::container::panel),
        );
    }

    section.into()
}

fn build_breakdown_section<'a>(
    i18n: &'a I18n,
    reservations: &'a [Reservation],
) -> Element<'a, Message> {
    let mut section = Column::new()
        .spacing(spacing::XS)
        .push(Text::new(i18n.tr("dashboard-types-title")).size(typography::TITLE_MD));

    let breakdown = type_breakdown(reservations, &i18n.tr("dashboard-type-other"));
    if breakdown.is_empty() {
        section = section.push(
            Text::new(i18n.tr("dashboard-types-empty"))
                .size(typography::BODY)
                .color(palette::GRAY_400),
        );
        return section.into();
    }

    for (index, (tipo, count)) in breakdown.into_iter().enumerate() {
        let color = palette::CHART_SERIES[index % palette::CHART_SERIES.len()];
        let row = Row::new()
            .spacing(spacing::SM)
            .align_y(Vertical::Center)
            .push(build_swatch(color))
            .push(Text::new(tipo).size(typography::BODY).width(Length::Fill))
            .push(Text::new(count.to_string()).size(typography::BODY));
        section = section.push(row);
    }

    section.into()
}

fn build_swatch<'a>(color: Color) -> Element<'a, Message> {
    container(
        Space::new()
            .width(Length::Fixed(spacing::SM))
            .height(Length::Fixed(spacing::SM)),
    )
    .style(styles::container::swatch(color))
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn reservation(id: i64, title: &str, start: &str, precio: Option<f64>) -> Reservation {
        let start = NaiveDateTime::parse_from_str(start, "%Y-%m-%dT%H:%M:%S").expect("datetime");
        Reservation {
            id,
            title: title.to_string(),
            start,
            end: start,
            cliente: title.split(" - ").next().unwrap_or("").to_string(),
            telefono: "612345678".to_string(),
            invitados: Some(50),
            precio,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 15).expect("valid date")
    }

    #[test]
    fn month_stats_count_only_current_month() {
        let reservations = vec![
            reservation(1, "Ana - Boda", "2026-08-20T12:00:00", Some(1200.0)),
            reservation(2, "Luis - Cumpleaños", "2026-08-02T12:00:00", Some(300.0)),
            reservation(3, "Marta - Comunión", "2026-09-01T12:00:00", Some(500.0)),
        ];

        let stats = month_stats(&reservations, today());

        assert_eq!(stats.count, 2);
        assert!((stats.revenue - 1500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn month_stats_next_event_skips_past_dates() {
        let reservations = vec![
            reservation(1, "Ana - Boda", "2026-08-02T12:00:00", None),
            reservation(2, "Luis - Cumpleaños", "2026-08-20T12:00:00", None),
            reservation(3, "Marta - Comunión", "2026-09-01T12:00:00", None),
        ];

        let stats = month_stats(&reservations, today());

        assert_eq!(
            stats.next_event,
            Some(NaiveDate::from_ymd_opt(2026, 8, 20).expect("valid date"))
        );
    }

    #[test]
    fn month_stats_without_future_events_has_no_next() {
        let reservations = vec![reservation(1, "Ana - Boda", "2026-08-02T12:00:00", None)];
        let stats = month_stats(&reservations, today());
        assert_eq!(stats.next_event, None);
    }

    #[test]
    fn upcoming_returns_at_most_five_sorted() {
        let mut reservations = Vec::new();
        for day in [28, 16, 22, 19, 25, 30, 17] {
            reservations.push(reservation(
                i64::from(day),
                "Ana - Boda",
                &format!("2026-08-{day:02}T12:00:00"),
                None,
            ));
        }
        reservations.push(reservation(99, "Viejo - Boda", "2026-08-01T12:00:00", None));

        let upcoming = upcoming(&reservations, today());

        assert_eq!(upcoming.len(), 5);
        let days: Vec<u32> = upcoming.iter().map(|r| r.fecha().day()).collect();
        assert_eq!(days, vec![16, 17, 19, 22, 25]);
    }

    #[test]
    fn type_breakdown_counts_in_first_seen_order() {
        let reservations = vec![
            reservation(1, "Ana - Boda", "2026-08-20T12:00:00", None),
            reservation(2, "Luis - Cumpleaños", "2026-08-21T12:00:00", None),
            reservation(3, "Marta - Boda", "2026-08-22T12:00:00", None),
            reservation(4, "Solo Nombre", "2026-08-23T12:00:00", None),
        ];

        let breakdown = type_breakdown(&reservations, "Otro");

        assert_eq!(
            breakdown,
            vec![
                ("Boda".to_string(), 2),
                ("Cumpleaños".to_string(), 1),
                ("Otro".to_string(), 1),
            ]
        );
    }

    #[test]
    fn form_submit_bubbles_up_as_create_event() {
        let mut state = State::new();
        state.form.cliente_nombre = "Laura Martín".to_string();
        state.form.cliente_telefono = "612345678".to_string();
        state.form.fecha = "2026-09-12".to_string();

        let event = update(
            &mut state,
            Message::Form(reservation_form::Message::Submit),
        );

        match event {
            Event::CreateReservations(batch) => assert_eq!(batch.len(), 1),
            other => panic!("expected create event, got {other:?}"),
        }
    }

    #[test]
    fn form_rejections_bubble_up_as_warnings() {
        let mut state = State::new();

        let event = update(
            &mut state,
            Message::Form(reservation_form::Message::Submit),
        );

        assert!(matches!(event, Event::Warn(_)));
    }

    #[test]
    fn view_renders_with_data() {
        let i18n = I18n::default();
        let state = State::new();
        let reservations = vec![
            reservation(1, "Ana - Boda", "2026-08-20T12:00:00", Some(1200.0)),
            reservation(2, "Luis - Cumpleaños", "2026-08-02T12:00:00", None),
        ];
        let ctx = ViewContext {
            i18n: &i18n,
            state: &state,
            reservations: &reservations,
            message_count: 7,
            today: today(),
        };
        let _element = view(ctx);
    }

    #[test]
    fn view_renders_empty() {
        let i18n = I18n::default();
        let state = State::new();
        let ctx = ViewContext {
            i18n: &i18n,
            state: &state,
            reservations: &[],
            message_count: 0,
            today: today(),
        };
        let _element = view(ctx);
    }
}
