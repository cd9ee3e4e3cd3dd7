// SPDX-License-Identifier: MPL-2.0
//! HTTP transport for the booking API.
//!
//! Every method resolves to an [`Outcome`]; transport errors, a broken
//! server URL, and even a failed client build degrade to
//! `Failure::Network` values instead of surfacing as `Err` or panics.

use super::models::{Estado, EstadoChange, NewReservation, OutgoingMessage};
use super::outcome::{classify, BatchResult, Outcome};
use crate::diagnostics::DiagnosticsHandle;
use reqwest::{Method, Url};
use serde::Serialize;
use std::time::Duration;

/// User agent reported to the server.
const USER_AGENT: &str = concat!("IcedVenue/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
struct Transport {
    http: reqwest::Client,
    base: Url,
}

#[derive(Debug, Clone)]
pub struct Client {
    transport: Result<Transport, String>,
    diagnostics: Option<DiagnosticsHandle>,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            transport: build_transport(base_url, timeout),
            diagnostics: None,
        }
    }

    /// Attaches an activity log handle; every finished call records a
    /// `server_call` event through it.
    #[must_use]
    pub fn with_diagnostics(mut self, handle: DiagnosticsHandle) -> Self {
        self.diagnostics = Some(handle);
        self
    }

    pub async fn reservations(&self) -> Outcome {
        self.fetch("load_reservations", Method::GET, &["api", "reservas"])
            .await
    }

    pub async fn create_reservation(&self, data: &NewReservation) -> Outcome {
        self.fetch_json("create_reservation", Method::POST, &["api", "reservas"], data)
            .await
    }

    /// Issues one create per reservation concurrently and counts results.
    pub async fn create_reservations(&self, batch: Vec<NewReservation>) -> BatchResult {
        let outcomes = futures_util::future::join_all(
            batch.iter().map(|data| self.create_reservation(data)),
        )
        .await;
        let created = outcomes.iter().filter(|outcome| outcome.ok).count();
        BatchResult {
            created,
            failed: outcomes.len() - created,
        }
    }

    pub async fn update_reservation(&self, id: i64, data: &NewReservation) -> Outcome {
        self.fetch_json(
            "update_reservation",
            Method::PUT,
            &["api", "reservas", &id.to_string()],
            data,
        )
        .await
    }

    pub async fn delete_reservation(&self, id: i64) -> Outcome {
        self.fetch(
            "delete_reservation",
            Method::DELETE,
            &["api", "reservas", &id.to_string()],
        )
        .await
    }

    pub async fn change_estado(&self, id: i64, estado: Estado) -> Outcome {
        self.fetch_json(
            "change_estado",
            Method::PUT,
            &["api", "reservas", &id.to_string(), "estado"],
            &EstadoChange { estado },
        )
        .await
    }

    pub async fn send_whatsapp(&self, message: &OutgoingMessage) -> Outcome {
        self.fetch_json(
            "send_whatsapp",
            Method::POST,
            &["api", "whatsapp", "enviar"],
            message,
        )
        .await
    }

    pub async fn messages(&self) -> Outcome {
        self.fetch("load_messages", Method::GET, &["api", "mensajes"])
            .await
    }

    pub async fn conversations(&self) -> Outcome {
        self.fetch(
            "load_conversations",
            Method::GET,
            &["api", "mensajes", "agrupados"],
        )
        .await
    }

    pub async fn conversation(&self, telefono: &str) -> Outcome {
        self.fetch(
            "load_conversation",
            Method::GET,
            &["api", "conversacion", telefono],
        )
        .await
    }

    async fn fetch(&self, name: &'static str, method: Method, segments: &[&str]) -> Outcome {
        self.dispatch(name, method, segments, None).await
    }

    async fn fetch_json<T: Serialize>(
        &self,
        name: &'static str,
        method: Method,
        segments: &[&str],
        body: &T,
    ) -> Outcome {
        let value = match serde_json::to_value(body) {
            Ok(value) => value,
            Err(error) => {
                return self.record(name, Outcome::network_failure(error.to_string()), None)
            }
        };
        self.dispatch(name, method, segments, Some(value)).await
    }

    async fn dispatch(
        &self,
        name: &'static str,
        method: Method,
        segments: &[&str],
        body: Option<serde_json::Value>,
    ) -> Outcome {
        let transport = match &self.transport {
            Ok(transport) => transport,
            Err(error) => {
                return self.record(name, Outcome::network_failure(error.clone()), None)
            }
        };
        let url = match endpoint(&transport.base, segments) {
            Ok(url) => url,
            Err(error) => return self.record(name, Outcome::network_failure(error), None),
        };

        let mut request = transport.http.request(method, url);
        if let Some(body) = &body {
            request = request.json(body);
        }

        let (outcome, status) = match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                let content_type = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string);
                match response.bytes().await {
                    Ok(bytes) => (
                        classify(status, content_type.as_deref(), &bytes),
                        Some(status),
                    ),
                    Err(error) => (Outcome::network_failure(error.to_string()), Some(status)),
                }
            }
            Err(error) => (Outcome::network_failure(error.to_string()), None),
        };
        self.record(name, outcome, status)
    }

    fn record(&self, name: &'static str, outcome: Outcome, status: Option<u16>) -> Outcome {
        if let Some(diagnostics) = &self.diagnostics {
            diagnostics.log_server_call(name, outcome.ok, status);
        }
        outcome
    }
}

fn build_transport(base_url: &str, timeout: Duration) -> Result<Transport, String> {
    let base =
        Url::parse(base_url).map_err(|error| format!("invalid server URL: {error}"))?;
    let http = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|error| format!("failed to build HTTP client: {error}"))?;
    Ok(Transport { http, base })
}

/// Appends percent-encoded path segments to the configured base URL, so
/// phone numbers with `+` or spaces survive as conversation paths.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, String> {
    let mut url = base.clone();
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|()| "server URL cannot be a base".to_string())?;
        path.pop_if_empty();
        path.extend(segments);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn endpoint_joins_segments() {
        let base = Url::parse("http://localhost:5000").expect("base");
        let url = endpoint(&base, &["api", "reservas"]).expect("join");
        assert_eq!(url.as_str(), "http://localhost:5000/api/reservas");
    }

    #[test]
    fn endpoint_keeps_base_path_and_trailing_slash() {
        let base = Url::parse("https://example.test/finca/").expect("base");
        let url = endpoint(&base, &["api", "mensajes", "agrupados"]).expect("join");
        assert_eq!(
            url.as_str(),
            "https://example.test/finca/api/mensajes/agrupados"
        );
    }

    #[test]
    fn endpoint_percent_encodes_phone_segments() {
        let base = Url::parse("http://localhost:5000").expect("base");
        let url = endpoint(&base, &["api", "conversacion", "+34 612 345 678"]).expect("join");
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/conversacion/+34%20612%20345%20678"
        );
    }

    #[tokio::test]
    async fn invalid_base_url_resolves_to_network_outcome() {
        let client = Client::new("not a url", TIMEOUT);
        let outcome = client.reservations().await;
        assert!(!outcome.ok);
        assert!(outcome
            .details
            .as_deref()
            .is_some_and(|details| details.contains("invalid server URL")));
    }

    #[tokio::test]
    async fn unreachable_server_resolves_to_network_outcome() {
        // Reserved TEST-NET-1 address, nothing listens there
        let client = Client::new("http://192.0.2.1:9", Duration::from_millis(200));
        let outcome = client.reservations().await;
        assert!(!outcome.ok);
        assert_eq!(
            outcome.error,
            Some(super::super::outcome::Failure::Network)
        );
    }

    #[tokio::test]
    async fn attached_diagnostics_handle_records_calls() {
        use crate::diagnostics::{DiagnosticEventKind, DiagnosticsCollector};

        let mut collector = DiagnosticsCollector::default();
        let client = Client::new("not a url", TIMEOUT).with_diagnostics(collector.handle());
        let _ = client.delete_reservation(7).await;

        collector.process_pending();
        let event = collector.iter().next().expect("one event recorded");
        assert!(matches!(
            &event.kind,
            DiagnosticEventKind::ServerCall { request, ok: false, status: None }
                if request == "delete_reservation"
        ));
    }
}
