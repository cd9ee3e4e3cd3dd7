// SPDX-License-Identifier: MPL-2.0
//! Payload types for the booking API.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Reservation lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Estado {
    Pendiente,
    #[default]
    Confirmada,
    Cancelada,
}

impl Estado {
    pub const ALL: [Estado; 3] = [Estado::Pendiente, Estado::Confirmada, Estado::Cancelada];

    pub fn as_str(self) -> &'static str {
        match self {
            Estado::Pendiente => "pendiente",
            Estado::Confirmada => "confirmada",
            Estado::Cancelada => "cancelada",
        }
    }

    /// Capitalized form used in feedback messages.
    pub fn capitalized(self) -> &'static str {
        match self {
            Estado::Pendiente => "Pendiente",
            Estado::Confirmada => "Confirmada",
            Estado::Cancelada => "Cancelada",
        }
    }
}

/// A reservation as served by `GET /api/reservas`.
///
/// `title` is composed by the server as "{cliente} - {tipo}".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub title: String,
    #[serde(with = "compact_datetime")]
    pub start: NaiveDateTime,
    #[serde(with = "compact_datetime")]
    pub end: NaiveDateTime,
    pub cliente: String,
    pub telefono: String,
    #[serde(default)]
    pub invitados: Option<u32>,
    #[serde(default)]
    pub precio: Option<f64>,
}

impl Reservation {
    pub fn fecha(&self) -> NaiveDate {
        self.start.date()
    }

    /// Celebration type, extracted from the composed title. Callers
    /// choose their own placeholder when the title carries none.
    pub fn celebration_type(&self) -> Option<&str> {
        self.title
            .split(" - ")
            .nth(1)
            .filter(|tipo| !tipo.is_empty())
    }
}

/// Body of `POST /api/reservas` and `PUT /api/reservas/{id}`.
///
/// Hours stay as `HH:MM` strings, the exact format the server parses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReservation {
    pub cliente_nombre: String,
    pub cliente_telefono: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente_email: Option<String>,
    pub fecha_evento: NaiveDate,
    pub hora_inicio: String,
    pub hora_fin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_invitados: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo_celebracion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anticipo: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notas: Option<String>,
}

/// Body of `PUT /api/reservas/{id}/estado`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstadoChange {
    pub estado: Estado,
}

/// Body of `POST /api/whatsapp/enviar`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingMessage {
    pub telefono: String,
    pub mensaje: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserva_id: Option<i64>,
}

/// One entry of `GET /api/mensajes/agrupados`.
///
/// Display fields (`ultimo_mensaje_fecha`) arrive pre-formatted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub telefono: String,
    pub nombre: String,
    pub ultimo_mensaje: String,
    pub ultimo_mensaje_fecha: String,
    #[serde(default)]
    pub no_leidos: u32,
    #[serde(default)]
    pub tiene_multimedia: bool,
}

/// Direction of a stored WhatsApp message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Entrante,
    Saliente,
}

/// Delivery state of a stored WhatsApp message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryState {
    Enviado,
    Fallido,
    Recibido,
}

/// One entry of `GET /api/conversacion/{telefono}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: i64,
    pub contenido: String,
    pub direccion: Direction,
    pub estado: DeliveryState,
    pub fecha: String,
    #[serde(default)]
    pub telefono_origen: Option<String>,
    #[serde(default)]
    pub telefono_destino: Option<String>,
    #[serde(default)]
    pub num_media: u32,
    #[serde(default)]
    pub media_urls: Vec<String>,
    #[serde(default)]
    pub media_types: Vec<String>,
}

/// Timestamps on the wire are `YYYY-MM-DDTHH:MM`, composed by the server
/// from a date column and an `HH:MM` string; a seconds part may appear in
/// other deployments, so reading accepts both.
mod compact_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const WRITE_FORMAT: &str = "%Y-%m-%dT%H:%M";
    const READ_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(WRITE_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        for format in READ_FORMATS {
            if let Ok(value) = NaiveDateTime::parse_from_str(&text, format) {
                return Ok(value);
            }
        }
        Err(serde::de::Error::custom(format!(
            "invalid timestamp: {text}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_reservation_json() -> &'static str {
        r#"{
            "id": 3,
            "title": "Laura Pérez - Boda",
            "start": "2026-09-12T12:00",
            "end": "2026-09-12T23:00",
            "cliente": "Laura Pérez",
            "telefono": "+34 612 345 678",
            "invitados": 120,
            "precio": 1500.0
        }"#
    }

    #[test]
    fn reservation_parses_timestamps_without_seconds() {
        let reservation: Reservation =
            serde_json::from_str(sample_reservation_json()).expect("parse");
        assert_eq!(
            reservation.start,
            NaiveDate::from_ymd_opt(2026, 9, 12)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
        );
        assert_eq!(reservation.fecha(), NaiveDate::from_ymd_opt(2026, 9, 12).unwrap());
    }

    #[test]
    fn reservation_parses_timestamps_with_seconds() {
        let json = sample_reservation_json().replace("T12:00", "T12:00:30");
        let reservation: Reservation = serde_json::from_str(&json).expect("parse");
        assert_eq!(reservation.start.format("%H:%M:%S").to_string(), "12:00:30");
    }

    #[test]
    fn reservation_serializes_timestamps_without_seconds() {
        let reservation: Reservation =
            serde_json::from_str(sample_reservation_json()).expect("parse");
        let value = serde_json::to_value(&reservation).expect("serialize");
        assert_eq!(value["start"], "2026-09-12T12:00");
    }

    #[test]
    fn celebration_type_reads_second_title_segment() {
        let mut reservation: Reservation =
            serde_json::from_str(sample_reservation_json()).expect("parse");
        assert_eq!(reservation.celebration_type(), Some("Boda"));

        reservation.title = "Laura Pérez".to_string();
        assert_eq!(reservation.celebration_type(), None);

        reservation.title = "Laura Pérez - ".to_string();
        assert_eq!(reservation.celebration_type(), None);
    }

    #[test]
    fn reservation_tolerates_missing_optionals() {
        let json = r#"{
            "id": 1,
            "title": "Juan - Evento",
            "start": "2026-01-02T10:00",
            "end": "2026-01-02T20:00",
            "cliente": "Juan",
            "telefono": "600111222"
        }"#;
        let reservation: Reservation = serde_json::from_str(json).expect("parse");
        assert_eq!(reservation.invitados, None);
        assert_eq!(reservation.precio, None);
    }

    #[test]
    fn estado_uses_lowercase_on_the_wire() {
        let json = serde_json::to_string(&EstadoChange {
            estado: Estado::Pendiente,
        })
        .expect("serialize");
        assert_eq!(json, r#"{"estado":"pendiente"}"#);

        let parsed: Estado = serde_json::from_str(r#""cancelada""#).expect("parse");
        assert_eq!(parsed, Estado::Cancelada);
    }

    #[test]
    fn new_reservation_omits_empty_optionals() {
        let body = NewReservation {
            cliente_nombre: "Ana".to_string(),
            cliente_telefono: "600123123".to_string(),
            cliente_email: None,
            fecha_evento: NaiveDate::from_ymd_opt(2026, 5, 9).unwrap(),
            hora_inicio: "12:00".to_string(),
            hora_fin: "23:00".to_string(),
            num_invitados: None,
            tipo_celebracion: Some("Cumpleaños".to_string()),
            precio: Some(400.0),
            anticipo: None,
            notas: None,
        };
        let value = serde_json::to_value(&body).expect("serialize");
        assert_eq!(value["fecha_evento"], "2026-05-09");
        assert_eq!(value["hora_inicio"], "12:00");
        assert!(value.get("cliente_email").is_none());
        assert!(value.get("anticipo").is_none());
    }

    #[test]
    fn conversation_message_parses_directions_and_states() {
        let json = r#"{
            "id": 9,
            "contenido": "Hola",
            "direccion": "entrante",
            "estado": "recibido",
            "fecha": "03/02/2026 18:40",
            "telefono_origen": "600111222",
            "telefono_destino": null,
            "num_media": 1,
            "media_urls": ["https://example.test/a.jpg"],
            "media_types": ["image/jpeg"]
        }"#;
        let message: ConversationMessage = serde_json::from_str(json).expect("parse");
        assert_eq!(message.direccion, Direction::Entrante);
        assert_eq!(message.estado, DeliveryState::Recibido);
        assert_eq!(message.num_media, 1);
    }

    #[test]
    fn conversation_summary_defaults_badges() {
        let json = r#"{
            "telefono": "600111222",
            "nombre": "Juan",
            "ultimo_mensaje": "Nos vemos",
            "ultimo_mensaje_fecha": "03/02 18:40"
        }"#;
        let summary: ConversationSummary = serde_json::from_str(json).expect("parse");
        assert_eq!(summary.no_leidos, 0);
        assert!(!summary.tiene_multimedia);
    }
}
