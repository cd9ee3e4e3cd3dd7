// SPDX-License-Identifier: MPL-2.0
//! Reservation creation form shared by the dashboard and the calendar.
//!
//! The form collects client data once and turns it into one reservation
//! per selected date. Dates can be picked as a single day, an inclusive
//! range, or an explicit list.

use crate::api::models::NewReservation;
use crate::domain::dates;
use crate::domain::validation::{FieldRules, Validator};
use crate::i18n::fluent::I18n;
use crate::i18n::Phrase;
use crate::ui::design_tokens::{palette, spacing, typography};
use crate::ui::styles;
use chrono::NaiveDate;
use iced::{
    alignment::Vertical,
    widget::{button, text_input, Column, Row, Text},
    Element, Length,
};

/// Start time preset for new reservations.
pub const DEFAULT_HORA_INICIO: &str = "12:00";

/// End time preset for new reservations.
pub const DEFAULT_HORA_FIN: &str = "23:00";

/// How the event dates are being picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateMode {
    #[default]
    Single,
    Range,
    Multiple,
}

/// Editable form state.
#[derive(Debug)]
pub struct State {
    pub cliente_nombre: String,
    pub cliente_telefono: String,
    pub cliente_email: String,
    pub tipo_celebracion: String,
    pub num_invitados: String,
    pub precio: String,
    pub notas: String,
    pub hora_inicio: String,
    pub hora_fin: String,
    pub date_mode: DateMode,
    pub fecha: String,
    pub fecha_inicio: String,
    pub fecha_fin: String,
    pub fecha_nueva: String,
    pub fechas: Vec<NaiveDate>,
    pub validator: Validator,
}

impl Default for State {
    fn default() -> Self {
        Self {
            cliente_nombre: String::new(),
            cliente_telefono: String::new(),
            cliente_email: String::new(),
            tipo_celebracion: String::new(),
            num_invitados: String::new(),
            precio: String::new(),
            notas: String::new(),
            hora_inicio: DEFAULT_HORA_INICIO.to_string(),
            hora_fin: DEFAULT_HORA_FIN.to_string(),
            date_mode: DateMode::Single,
            fecha: String::new(),
            fecha_inicio: String::new(),
            fecha_fin: String::new(),
            fecha_nueva: String::new(),
            fechas: Vec::new(),
            validator: Validator::new(),
        }
    }
}

impl State {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefills the single-date field, used when a calendar day is clicked.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.date_mode = DateMode::Single;
        self.fecha = dates::wire_date(date);
    }

    /// Clears every field back to the defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Dates the current selection resolves to, in order.
    ///
    /// An incomplete or reversed range resolves to no dates.
    pub fn selected_dates(&self) -> Vec<NaiveDate> {
        match self.date_mode {
            DateMode::Single => parse_date(&self.fecha).into_iter().collect(),
            DateMode::Range => {
                match (parse_date(&self.fecha_inicio), parse_date(&self.fecha_fin)) {
                    (Some(start), Some(end)) if start <= end => dates::expand_range(start, end),
                    _ => Vec::new(),
                }
            }
            DateMode::Multiple => self.fechas.clone(),
        }
    }

    /// Total-price line shown under the date section, when it applies.
    ///
    /// Only multi-day selections with a positive per-day price get one.
    pub fn price_summary(&self, i18n: &I18n) -> Option<String> {
        let days = self.selected_dates().len();
        let price: f64 = self.precio.trim().parse().ok()?;
        if days > 1 && price > 0.0 {
            let total = price * days as f64;
            let days_arg = days.to_string();
            let price_arg = format!("{price:.2}");
            let total_arg = format!("{total:.2}");
            Some(i18n.tr_with_args(
                "form-price-summary",
                &[
                    ("days", days_arg.as_str()),
                    ("price", price_arg.as_str()),
                    ("total", total_arg.as_str()),
                ],
            ))
        } else {
            None
        }
    }

    /// Runs every field rule and records the errors.
    pub fn validate(&mut self) -> bool {
        self.validator.validate_all(&[
            (
                "cliente-nombre",
                self.cliente_nombre.as_str(),
                FieldRules::new().required().min_length(3).max_length(100),
            ),
            (
                "cliente-telefono",
                self.cliente_telefono.as_str(),
                FieldRules::new().required().phone(),
            ),
            (
                "cliente-email",
                self.cliente_email.as_str(),
                FieldRules::new().email(),
            ),
            (
                "num-invitados",
                self.num_invitados.as_str(),
                FieldRules::new().number().min(1.0).max(500.0),
            ),
            (
                "precio",
                self.precio.as_str(),
                FieldRules::new().number().min(0.0),
            ),
        ])
    }

    /// One reservation payload per selected date.
    pub fn build_reservations(&self) -> Vec<NewReservation> {
        self.selected_dates()
            .into_iter()
            .map(|fecha_evento| NewReservation {
                cliente_nombre: self.cliente_nombre.trim().to_string(),
                cliente_telefono: self.cliente_telefono.trim().to_string(),
                cliente_email: optional(&self.cliente_email),
                fecha_evento,
                hora_inicio: self.hora_inicio.trim().to_string(),
                hora_fin: self.hora_fin.trim().to_string(),
                num_invitados: self.num_invitados.trim().parse().ok(),
                tipo_celebracion: optional(&self.tipo_celebracion),
                precio: self.precio.trim().parse().ok(),
                anticipo: None,
                notas: optional(&self.notas),
            })
            .collect()
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Messages emitted by the form.
#[derive(Debug, Clone)]
pub enum Message {
    NombreChanged(String),
    TelefonoChanged(String),
    EmailChanged(String),
    TipoChanged(String),
    InvitadosChanged(String),
    PrecioChanged(String),
    NotasChanged(String),
    HoraInicioChanged(String),
    HoraFinChanged(String),
    DateModeSelected(DateMode),
    FechaChanged(String),
    FechaInicioChanged(String),
    FechaFinChanged(String),
    FechaNuevaChanged(String),
    AddFecha,
    RemoveFecha(NaiveDate),
    Submit,
}

/// Events propagated to the parent screen.
#[derive(Debug)]
pub enum Event {
    None,
    /// The multi-date input was empty or not a date.
    EmptyDateInput,
    /// The entered date is already on the list.
    DuplicateDate,
    /// Submitted without any resolvable date.
    MissingDates,
    /// Submitted with at least one failing field rule.
    InvalidFields,
    /// Validation passed; one payload per date, ready to send.
    Submit(Vec<NewReservation>),
}

impl Event {
    /// Toast phrase the parent should show for rejected interactions.
    #[must_use]
    pub fn warning(&self) -> Option<Phrase> {
        match self {
            Event::EmptyDateInput => Some(Phrase::key("toast-date-missing-input")),
            Event::DuplicateDate => Some(Phrase::key("toast-date-duplicate")),
            Event::MissingDates => Some(Phrase::key("toast-dates-missing")),
            Event::InvalidFields => Some(Phrase::key("toast-fields-invalid")),
            Event::None | Event::Submit(_) => None,
        }
    }
}

/// Process a form message and return the corresponding event.
#[must_use]
pub fn update(state: &mut State, message: Message) -> Event {
    match message {
        Message::NombreChanged(value) => {
            state.cliente_nombre = value;
            Event::None
        }
        Message::TelefonoChanged(value) => {
            state.cliente_telefono = value;
            Event::None
        }
        Message::EmailChanged(value) => {
            state.cliente_email = value;
            Event::None
        }
        Message::TipoChanged(value) => {
            state.tipo_celebracion = value;
            Event::None
        }
        Message::InvitadosChanged(value) => {
            state.num_invitados = value;
            Event::None
        }
        Message::PrecioChanged(value) => {
            state.precio = value;
            Event::None
        }
        Message::NotasChanged(value) => {
            state.notas = value;
            Event::None
        }
        Message::HoraInicioChanged(value) => {
            state.hora_inicio = value;
            Event::None
        }
        Message::HoraFinChanged(value) => {
            state.hora_fin = value;
            Event::None
        }
        Message::DateModeSelected(mode) => {
            state.date_mode = mode;
            Event::None
        }
        Message::FechaChanged(value) => {
            state.fecha = value;
            Event::None
        }
        Message::FechaInicioChanged(value) => {
            state.fecha_inicio = value;
            Event::None
        }
        Message::FechaFinChanged(value) => {
            state.fecha_fin = value;
            Event::None
        }
        Message::FechaNuevaChanged(value) => {
            state.fecha_nueva = value;
            Event::None
        }
        Message::AddFecha => add_fecha(state),
        Message::RemoveFecha(date) => {
            state.fechas.retain(|fecha| *fecha != date);
            Event::None
        }
        Message::Submit => submit(state),
    }
}

fn add_fecha(state: &mut State) -> Event {
    let Some(date) = parse_date(&state.fecha_nueva) else {
        return Event::EmptyDateInput;
    };
    if state.fechas.contains(&date) {
        return Event::DuplicateDate;
    }
    state.fechas.push(date);
    state.fechas.sort_unstable();
    state.fecha_nueva.clear();
    Event::None
}

fn submit(state: &mut State) -> Event {
    // Date check first, matching the order the user fills the form in
    let dates = state.selected_dates();
    if dates.is_empty() {
        return Event::MissingDates;
    }
    if !state.validate() {
        return Event::InvalidFields;
    }
    Event::Submit(state.build_reservations())
}

/// Contextual data needed to render the form.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub state: &'a State,
}

/// Render the reservation form.
pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let i18n = ctx.i18n;
    let state = ctx.state;

    let client_row = Row::new()
        .spacing(spacing::SM)
        .push(build_text_field(
            i18n,
            "form-cliente-nombre",
            "",
            &state.cliente_nombre,
            Message::NombreChanged,
            state.validator.error_for("cliente-nombre"),
        ))
        .push(build_text_field(
            i18n,
            "form-cliente-telefono",
            "",
            &state.cliente_telefono,
            Message::TelefonoChanged,
            state.validator.error_for("cliente-telefono"),
        ));

    let contact_row = Row::new()
        .spacing(spacing::SM)
        .push(build_text_field(
            i18n,
            "form-cliente-email",
            "",
            &state.cliente_email,
            Message::EmailChanged,
            state.validator.error_for("cliente-email"),
        ))
        .push(build_text_field(
            i18n,
            "form-tipo-celebracion",
            "",
            &state.tipo_celebracion,
            Message::TipoChanged,
            None,
        ));

    let hours_row = Row::new()
        .spacing(spacing::SM)
        .push(build_text_field(
            i18n,
            "form-hora-inicio",
            "HH:MM",
            &state.hora_inicio,
            Message::HoraInicioChanged,
            None,
        ))
        .push(build_text_field(
            i18n,
            "form-hora-fin",
            "HH:MM",
            &state.hora_fin,
            Message::HoraFinChanged,
            None,
        ));

    let numbers_row = Row::new()
        .spacing(spacing::SM)
        .push(build_text_field(
            i18n,
            "form-num-invitados",
            "",
            &state.num_invitados,
            Message::InvitadosChanged,
            state.validator.error_for("num-invitados"),
        ))
        .push(build_text_field(
            i18n,
            "form-precio",
            "",
            &state.precio,
            Message::PrecioChanged,
            state.validator.error_for("precio"),
        ));

    let mut form = Column::new()
        .spacing(spacing::SM)
        .push(client_row)
        .push(contact_row)
        .push(hours_row)
        .push(numbers_row)
        .push(build_text_field(
            i18n,
            "form-notas",
            "",
            &state.notas,
            Message::NotasChanged,
            None,
        ))
        .push(build_date_section(i18n, state));

    if let Some(summary) = state.price_summary(i18n) {
        form = form.push(
            Text::new(summary)
                .size(typography::BODY_SM)
                .color(palette::PRIMARY_400),
        );
    }

    let count = state.selected_dates().len();
    let submit_label = if count > 1 {
        let count_arg = count.to_string();
        i18n.tr_with_args("form-submit-multiple", &[("count", count_arg.as_str())])
    } else {
        i18n.tr("form-submit-single")
    };

    form.push(
        button(Text::new(submit_label))
            .on_press(Message::Submit)
            .style(styles::button::primary)
            .padding([spacing::XS, spacing::LG]),
    )
    .into()
}

/// Build a labeled input with its validation error underneath.
fn build_text_field<'a>(
    i18n: &I18n,
    label_key: &'static str,
    placeholder: &'static str,
    value: &'a str,
    on_input: fn(String) -> Message,
    error: Option<&'a Phrase>,
) -> Element<'a, Message> {
    let mut column = Column::new()
        .width(Length::Fill)
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

/// Build the date mode switch plus the inputs for the active mode.
fn build_date_section<'a>(i18n: &'a I18n, state: &'a State) -> Element<'a, Message> {
    let mode_row = Row::new()
        .spacing(spacing::XS)
        .push(build_mode_button(
            i18n,
            "form-date-mode-single",
            DateMode::Single,
            state.date_mode,
        ))
        .push(build_mode_button(
            i18n,
            "form-date-mode-range",
            DateMode::Range,
            state.date_mode,
        ))
        .push(build_mode_button(
            i18n,
            "form-date-mode-multiple",
            DateMode::Multiple,
            state.date_mode,
        ));

    let inputs: Element<'a, Message> = match state.date_mode {
        DateMode::Single => build_text_field(
            i18n,
            "form-fecha",
            "AAAA-MM-DD",
            &state.fecha,
            Message::FechaChanged,
            None,
        ),
        DateMode::Range => Row::new()
            .spacing(spacing::SM)
            .push(build_text_field(
                i18n,
                "form-fecha-inicio",
                "AAAA-MM-DD",
                &state.fecha_inicio,
                Message::FechaInicioChanged,
                None,
            ))
            .push(build_text_field(
                i18n,
                "form-fecha-fin",
                "AAAA-MM-DD",
                &state.fecha_fin,
                Message::FechaFinChanged,
                None,
            ))
            .into(),
        DateMode::Multiple => build_multi_date_inputs(i18n, state),
    };

    Column::new()
        .spacing(spacing::XS)
        .push(mode_row)
        .push(inputs)
        .into()
}

fn build_mode_button<'a>(
    i18n: &I18n,
    label_key: &'static str,
    mode: DateMode,
    active: DateMode,
) -> Element<'a, Message> {
    let label = Text::new(i18n.tr(label_key)).size(typography::BODY_SM);

    let styled = if mode == active {
        button(label).style(styles::button::selected)
    } else {
        button(label).style(styles::button::unselected)
    };

    styled
        .on_press(Message::DateModeSelected(mode))
        .padding([spacing::XXS, spacing::SM])
        .into()
}

/// Build the add-date input plus the list of picked dates.
fn build_multi_date_inputs<'a>(i18n: &'a I18n, state: &'a State) -> Element<'a, Message> {
    let entry_row = Row::new()
        .spacing(spacing::XS)
        .align_y(Vertical::Bottom)
        .push(build_text_field(
            i18n,
            "form-fecha-nueva",
            "AAAA-MM-DD",
            &state.fecha_nueva,
            Message::FechaNuevaChanged,
            None,
        ))
        .push(
            button(Text::new(i18n.tr("form-add-date")).size(typography::BODY_SM))
                .on_press(Message::AddFecha)
                .style(styles::button::primary)
                .padding([spacing::XS, spacing::SM]),
        );

    let mut column = Column::new().spacing(spacing::XS).push(entry_row);

    if state.fechas.is_empty() {
        column = column.push(
            Text::new(i18n.tr("form-dates-empty"))
                .size(typography::CAPTION)
                .color(palette::GRAY_400),
        );
    } else {
        for date in &state.fechas {
            column = column.push(
                Row::new()
                    .spacing(spacing::SM)
                    .align_y(Vertical::Center)
                    .push(Text::new(dates::display_date(*date)).size(typography::BODY_SM))
                    .push(
                        button(Text::new("×").size(typography::BODY_SM))
                            .on_press(Message::RemoveFecha(*date))
                            .style(styles::button::danger)
                            .padding([spacing::XXS, spacing::XS]),
                    ),
            );
        }
    }

    column.into()
}
