// SPDX-License-Identifier: MPL-2.0
//! Month calendar screen: Monday-first grid, a detail panel for the
//! selected reservation and the quick-create form for the selected day.

use crate::api::models::{Estado, NewReservation, OutgoingMessage, Reservation};
use crate::domain::dates;
use crate::i18n::fluent::I18n;
use crate::i18n::Phrase;
use crate::ui::design_tokens::{palette, sizing, spacing, typography};
use crate::ui::messaging::Template;
use crate::ui::reservation_form;
use crate::ui::styles;
use crate::ui::theming;
use chrono::{Datelike, NaiveDate};
use iced::{
    alignment::Horizontal,
    widget::{button, container, scrollable, space, text_input, Column, Container, Row, Space, Text},
    Element, Length,
};

/// Reservation chips shown per day cell before collapsing into a count.
const MAX_CHIPS: usize = 2;

const MONTH_KEYS: [&str; 12] = [
    "month-1", "month-2", "month-3", "month-4", "month-5", "month-6", "month-7", "month-8",
    "month-9", "month-10", "month-11", "month-12",
];

const WEEKDAY_KEYS: [&str; 7] = [
    "weekday-mon",
    "weekday-tue",
    "weekday-wed",
    "weekday-thu",
    "weekday-fri",
    "weekday-sat",
    "weekday-sun",
];

/// Calendar-owned state.
#[derive(Debug)]
pub struct State {
    /// First day of the displayed month.
    pub anchor: NaiveDate,
    pub selected_day: Option<NaiveDate>,
    pub selected_reservation: Option<i64>,
    /// Draft of the WhatsApp message in the detail panel.
    pub compose: String,
    applied_template: Option<Template>,
    pub form: reservation_form::State,
}

impl State {
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            anchor: dates::first_of_month(today),
            selected_day: None,
            selected_reservation: None,
            compose: String::new(),
            applied_template: None,
            form: reservation_form::State::new(),
        }
    }

    /// Drops the detail selection, e.g. after the reservation was deleted.
    pub fn clear_selection(&mut self) {
        self.selected_reservation = None;
        self.compose.clear();
        self.applied_template = None;
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    PreviousMonth,
    NextMonth,
    /// The "today" button; carries the current date from the view.
    JumpTo(NaiveDate),
    SelectDay(NaiveDate),
    SelectReservation(i64),
    CloseDetail,
    ChangeEstado(Estado),
    ComposeChanged(String),
    /// A template button; the view resolves the text with the client name.
    ApplyTemplate { template: Template, text: String },
    SendWhatsApp { telefono: String },
    Delete { id: i64, cliente: String },
    Form(reservation_form::Message),
}

/// Events propagated to the parent application.
#[derive(Debug)]
pub enum Event {
    None,
    /// Show a warning toast.
    Warn(Phrase),
    /// The displayed month moved by the given delta.
    MonthChanged(i32),
    /// A day was picked and the form prefilled with it.
    DaySelected,
    /// Ask the user before deleting.
    ConfirmDelete { id: i64, cliente: String },
    ChangeEstado { id: i64, estado: Estado },
    /// Send the composed WhatsApp message; the slug names the template
    /// it was based on, if any.
    SendWhatsApp {
        message: OutgoingMessage,
        template: Option<&'static str>,
    },
    /// Send one create request per payload, then reload.
    CreateReservations(Vec<NewReservation>),
}

/// Process a calendar message and return the corresponding event.
#[must_use]
pub fn update(state: &mut State, message: Message) -> Event {
    match message {
        Message::PreviousMonth => {
            state.anchor = dates::shift_month(state.anchor, -1);
            Event::MonthChanged(-1)
        }
        Message::NextMonth => {
            state.anchor = dates::shift_month(state.anchor, 1);
            Event::MonthChanged(1)
        }
        Message::JumpTo(date) => {
            state.anchor = dates::first_of_month(date);
            Event::None
        }
        Message::SelectDay(date) => {
            state.selected_day = Some(date);
            state.selected_reservation = None;
            state.form.set_date(date);
            Event::DaySelected
        }
        Message::SelectReservation(id) => {
            state.selected_reservation = Some(id);
            state.compose.clear();
            state.applied_template = None;
            Event::None
        }
        Message::CloseDetail => {
            state.clear_selection();
            Event::None
        }
        Message::ChangeEstado(estado) => match state.selected_reservation {
            Some(id) => Event::ChangeEstado { id, estado },
            None => Event::None,
        },
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
            state.compose.clear();
            Event::SendWhatsApp {
                message: OutgoingMessage {
                    telefono,
                    mensaje,
                    reserva_id: state.selected_reservation,
                },
                template,
            }
        }
        Message::Delete { id, cliente } => Event::ConfirmDelete { id, cliente },
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

/// Contextual data needed to render the calendar.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub state: &'a State,
    pub reservations: &'a [Reservation],
    pub today: NaiveDate,
}

/// Render the calendar screen.
pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let ViewContext {
        i18n,
        state,
        reservations,
        today,
    } = ctx;

    let mut grid = Column::new().spacing(spacing::XXS);
    for week in dates::month_grid(state.anchor.year(), state.anchor.month()) {
        let mut cells = Row::new().spacing(spacing::XXS);
        for cell in week {
            cells = cells.push(build_day_cell(state, reservations, today, cell));
        }
        grid = grid.push(cells);
    }

    let left = Column::new()
        .spacing(spacing::SM)
        .width(Length::Fill)
        .push(build_header(i18n, state.anchor, today))
        .push(build_weekday_row(i18n))
        .push(grid);

    let side: Element<'a, Message> = match selected_reservation(state, reservations) {
        Some(reservation) => build_detail(i18n, state, reservation),
        None => build_form_panel(i18n, state),
    };

    Row::new()
        .spacing(spacing::LG)
        .padding(spacing::LG)
        .push(left)
        .push(scrollable(side).width(Length::Fixed(sizing::FORM_WIDTH)))
        .into()
}

fn selected_reservation<'a>(
    state: &State,
    reservations: &'a [Reservation],
) -> Option<&'a Reservation> {
    let id = state.selected_reservation?;
    reservations.iter().find(|r| r.id == id)
}

fn build_header<'a>(i18n: &I18n, anchor: NaiveDate, today: NaiveDate) -> Element<'a, Message> {
    let title = format!("{} {}", i18n.tr(MONTH_KEYS[anchor.month0() as usize]), anchor.year());

    Row::new()
        .spacing(spacing::XS)
        .push(Text::new(title).size(typography::TITLE_SM))
        .push(space::horizontal())
        .push(build_nav_button("‹".to_string(), Message::PreviousMonth))
        .push(build_nav_button(i18n.tr("calendar-today"), Message::JumpTo(today)))
        .push(build_nav_button("›".to_string(), Message::NextMonth))
        .into()
}

fn build_nav_button<'a>(label: String, message: Message) -> Element<'a, Message> {
    button(Text::new(label).size(typography::BODY))
        .on_press(message)
        .style(styles::button::unselected)
        .padding([spacing::XXS, spacing::SM])
        .into()
}

fn build_weekday_row<'a>(i18n: &I18n) -> Element<'a, Message> {
    let mut row = Row::new().spacing(spacing::XXS);
    for key in WEEKDAY_KEYS {
        row = row.push(
            Text::new(i18n.tr(key))
                .size(typography::BODY_SM)
                .color(palette::GRAY_400)
                .width(Length::Fill)
                .align_x(Horizontal::Center),
        );
    }
    row.into()
}

fn build_day_cell<'a>(
    state: &State,
    reservations: &[Reservation],
    today: NaiveDate,
    cell: Option<NaiveDate>,
) -> Element<'a, Message> {
    let Some(date) = cell else {
        return container(
            Space::new()
                .width(Length::Fill)
                .height(Length::Fixed(sizing::CALENDAR_DAY_HEIGHT)),
        )
        .width(Length::Fill)
        .into();
    };

    let mut number = Text::new(date.day().to_string()).size(typography::BODY_SM);
    if date == today {
        number = number.color(palette::PRIMARY_500);
    }
    let mut content = Column::new().spacing(spacing::XXS).push(number);

    let starting: Vec<&Reservation> = reservations.iter().filter(|r| r.fecha() == date).collect();
    for reservation in starting.iter().take(MAX_CHIPS) {
        content = content.push(
            button(Text::new(reservation.cliente.clone()).size(typography::CAPTION))
                .on_press(Message::SelectReservation(reservation.id))
                .style(styles::button::primary)
                .padding([0.0, spacing::XXS])
                .width(Length::Fill),
        );
    }
    if starting.len() > MAX_CHIPS {
        content = content.push(
            Text::new(format!("+{}", starting.len() - MAX_CHIPS))
                .size(typography::CAPTION)
                .color(palette::GRAY_400),
        );
    }

    let style = if state.selected_day == Some(date) {
        styles::button::selected
    } else {
        styles::button::unselected
    };

    button(content)
        .on_press(Message::SelectDay(date))
        .style(style)
        .width(Length::Fill)
        .height(Length::Fixed(sizing::CALENDAR_DAY_HEIGHT))
        .into()
}

fn build_detail<'a>(i18n: &I18n, state: &'a State, reservation: &Reservation) -> Element<'a, Message> {
    let missing = i18n.tr("calendar-detail-missing");

    let rows = Column::new()
        .spacing(spacing::XS)
        .push(build_detail_row(i18n, "calendar-detail-cliente", reservation.cliente.clone()))
        .push(build_detail_row(i18n, "calendar-detail-telefono", reservation.telefono.clone()))
        .push(build_detail_row(
            i18n,
            "calendar-detail-fecha",
            dates::display_date(reservation.fecha()),
        ))
        .push(build_detail_row(
            i18n,
            "calendar-detail-hora",
            format!(
                "{} - {}",
                reservation.start.format("%H:%M"),
                reservation.end.format("%H:%M")
            ),
        ))
        .push(build_detail_row(
            i18n,
            "calendar-detail-tipo",
            reservation
                .celebration_type()
                .map_or_else(|| missing.clone(), str::to_string),
        ))
        .push(build_detail_row(
            i18n,
            "calendar-detail-invitados",
            reservation
                .invitados
                .map_or_else(|| missing.clone(), |n| n.to_string()),
        ))
        .push(build_detail_row(
            i18n,
            "calendar-detail-precio",
            reservation.precio.map_or(missing, |p| format!("{p:.2}€")),
        ));

    let mut estados = Row::new().spacing(spacing::XS);
    for estado in Estado::ALL {
        estados = estados.push(
            button(Text::new(estado.capitalized()).size(typography::BODY_SM))
                .on_press(Message::ChangeEstado(estado))
                .style(styles::button::accent(theming::estado_accent(estado)))
                .padding([spacing::XXS, spacing::SM]),
        );
    }

    let mut templates = Column::new().spacing(spacing::XS);
    let mut pair = Row::new().spacing(spacing::XS);
    for (index, template) in Template::ALL.into_iter().enumerate() {
        pair = pair.push(build_template_button(i18n, template, &reservation.cliente));
        if index % 2 == 1 {
            templates = templates.push(pair);
            pair = Row::new().spacing(spacing::XS);
        }
    }

    let compose = text_input(&i18n.tr("compose-placeholder"), &state.compose)
        .on_input(Message::ComposeChanged)
        .padding(spacing::XS);

    let send = button(Text::new(i18n.tr("calendar-send-whatsapp")).size(typography::BODY))
        .on_press(Message::SendWhatsApp {
            telefono: reservation.telefono.clone(),
        })
        .style(styles::button::primary)
        .padding([spacing::XS, spacing::LG]);

    let actions = Row::new()
        .spacing(spacing::SM)
        .push(
            button(Text::new(i18n.tr("calendar-delete")).size(typography::BODY))
                .on_press(Message::Delete {
                    id: reservation.id,
                    cliente: reservation.cliente.clone(),
                })
                .style(styles::button::danger)
                .padding([spacing::XS, spacing::SM]),
        )
        .push(space::horizontal())
        .push(
            button(Text::new(i18n.tr("calendar-close")).size(typography::BODY))
                .on_press(Message::CloseDetail)
                .style(styles::button::unselected)
                .padding([spacing::XS, spacing::SM]),
        );

    let panel = Column::new()
        .spacing(spacing::SM)
        .push(Text::new(i18n.tr("calendar-detail-title")).size(typography::TITLE_MD))
        .push(rows)
        .push(
            Text::new(i18n.tr("calendar-detail-estado"))
                .size(typography::BODY_SM)
                .color(palette::GRAY_400),
        )
        .push(estados)
        .push(
            Text::new(i18n.tr("calendar-detail-whatsapp"))
                .size(typography::BODY_SM)
                .color(palette::GRAY_400),
        )
        .push(templates)
        .push(compose)
        .push(send)
        .push(actions);

    Container::new(panel)
        .padding(spacing::MD)
        .width(Length::Fill)
        .style(styles::container::panel)
        .into()
}

fn build_detail_row<'a>(i18n: &I18n, label_key: &'static str, value: String) -> Element<'a, Message> {
    Row::new()
        .spacing(spacing::SM)
        .push(
            Text::new(i18n.tr(label_key))
                .size(typography::BODY_SM)
                .color(palette::GRAY_400)
                .width(Length::Fixed(96.0)),
        )
        .push(Text::new(value).size(typography::BODY).width(Length::Fill))
        .into()
}

fn build_template_button<'a>(i18n: &I18n, template: Template, nombre: &str) -> Element<'a, Message> {
    button(Text::new(i18n.tr(template.label_key())).size(typography::BODY_SM))
        .on_press(Message::ApplyTemplate {
            template,
            text: template.personalized(i18n, nombre),
        })
        .style(styles::button::unselected)
        .padding([spacing::XXS, spacing::SM])
        .width(Length::Fill)
        .into()
}

fn build_form_panel<'a>(i18n: &'a I18n, state: &'a State) -> Element<'a, Message> {
    Container::new(
        Column::new()
            .spacing(spacing::SM)
            .push(Text::new(i18n.tr("form-title")).size(typography::TITLE_MD))
            .push(
                reservation_form::view(reservation_form::ViewContext {
                    i18n,
                    state: &state.form,
                })
                .map(Message::Form),
            ),
    )
    .padding(spacing::MD)
    .width(Length::Fill)
    .style(styles::container::panel)
    .into()
}
