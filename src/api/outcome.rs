// SPDX-License-Identifier: MPL-2.0
//! Uniform result shape for API calls.
//!
//! Transport failures and HTTP-level failures normalize into the same
//! [`Outcome`] value, so callers branch once on `ok` instead of handling
//! two failure channels. No function in this module panics.

use crate::i18n::fluent::I18n;
use crate::i18n::Phrase;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Cause of a failed API call.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// A response arrived with a status outside the success range.
    Http {
        status: u16,
        /// Text supplied by the server, taken from the payload's `error`
        /// field or, failing that, its `message` field.
        server_message: Option<String>,
    },
    /// No response was obtained.
    Network,
}

/// Normalized result of an API call.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub ok: bool,
    pub data: Option<Value>,
    pub error: Option<Failure>,
    /// Extra context for the failure: the payload's `details` field, else
    /// its `message` field; for transport failures, the raw error text.
    pub details: Option<String>,
}

impl Outcome {
    pub fn success(data: Option<Value>) -> Self {
        Self {
            ok: true,
            data,
            error: None,
            details: None,
        }
    }

    pub fn network_failure(details: String) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(Failure::Network),
            details: Some(details),
        }
    }

    /// The user-facing error text, picked by priority: server `error`
    /// field, server `message` field, fixed per-status default.
    pub fn error_phrase(&self) -> Option<Phrase> {
        match &self.error {
            None => None,
            Some(Failure::Http {
                status,
                server_message,
            }) => Some(match server_message {
                Some(text) => Phrase::literal(text.clone()),
                None => status_phrase(*status),
            }),
            Some(Failure::Network) => Some(Phrase::key("http-error-network")),
        }
    }

    pub fn error_message(&self, i18n: &I18n) -> Option<String> {
        self.error_phrase().map(|phrase| phrase.resolve(i18n))
    }

    /// Deserializes `data` into a typed payload. Returns `None` when the
    /// call failed, carried no JSON body, or the shape does not match.
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        self.data
            .clone()
            .and_then(|value| serde_json::from_value(value).ok())
    }

    /// The server message of a success payload, shown when the gateway
    /// answers 200 but flags a degraded send via an `error` field.
    pub fn payload_field(&self, key: &str) -> Option<String> {
        self.data.as_ref().and_then(|payload| field_str(payload, key))
    }
}

/// Counts for a concurrent multi-create submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchResult {
    pub created: usize,
    pub failed: usize,
}

/// Classifies a received HTTP response.
///
/// The body is parsed as JSON only when the content type says so; a
/// success response without a JSON content type yields `data = None`.
pub fn classify(status: u16, content_type: Option<&str>, body: &[u8]) -> Outcome {
    let is_json = content_type
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"));
    let data: Option<Value> = if is_json {
        serde_json::from_slice(body).ok()
    } else {
        None
    };

    if (200..300).contains(&status) {
        return Outcome::success(data);
    }

    let server_message = data
        .as_ref()
        .and_then(|payload| field_str(payload, "error").or_else(|| field_str(payload, "message")));
    let details = data
        .as_ref()
        .and_then(|payload| field_str(payload, "details").or_else(|| field_str(payload, "message")));

    Outcome {
        ok: false,
        data,
        error: Some(Failure::Http {
            status,
            server_message,
        }),
        details,
    }
}

fn field_str(payload: &Value, key: &str) -> Option<String> {
    payload.get(key).and_then(Value::as_str).map(str::to_string)
}

fn status_phrase(status: u16) -> Phrase {
    match status {
        400 => Phrase::key("http-error-400"),
        401 => Phrase::key("http-error-401"),
        403 => Phrase::key("http-error-403"),
        404 => Phrase::key("http-error-404"),
        409 => Phrase::key("http-error-409"),
        422 => Phrase::key("http-error-422"),
        429 => Phrase::key("http-error-429"),
        500 => Phrase::key("http-error-500"),
        502 => Phrase::key("http-error-502"),
        503 => Phrase::key("http-error-503"),
        504 => Phrase::key("http-error-504"),
        other => Phrase::key("http-error-generic").with_arg("code", other.to_string()),
    }
}
