// SPDX-License-Identifier: MPL-2.0
//! Export functionality for the activity log.
//!
//! Reports are written as a single JSON document via a temp-file
//! rename, so a crash mid-write never leaves a truncated report.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;

use super::collector::DiagnosticsCollector;
use super::events::DiagnosticEventKind;
use crate::error::Result;

/// An event as it appears in an exported report. The monotonic
/// timestamp becomes an offset from the start of collection.
#[derive(Debug, Serialize)]
pub struct SerializableEvent {
    /// Milliseconds since collection started.
    pub elapsed_ms: u64,
    /// The event payload.
    #[serde(flatten)]
    pub kind: DiagnosticEventKind,
}

/// Top-level report document.
#[derive(Debug, Serialize)]
struct DiagnosticsReport {
    app: &'static str,
    app_version: &'static str,
    collected_since: String,
    event_count: usize,
    events: Vec<SerializableEvent>,
}

/// Renders the collector's current contents as pretty-printed JSON.
pub fn render_report(collector: &DiagnosticsCollector) -> Result<String> {
    let started = collector.started_at();
    let events: Vec<SerializableEvent> = collector
        .iter()
        .map(|event| SerializableEvent {
            elapsed_ms: u64::try_from(
                event
                    .timestamp
                    .saturating_duration_since(started)
                    .as_millis(),
            )
            .unwrap_or(u64::MAX),
            kind: event.kind.clone(),
        })
        .collect();

    let report = DiagnosticsReport {
        app: "iced_venue",
        app_version: env!("CARGO_PKG_VERSION"),
        collected_since: collector.started_at_utc().to_rfc3339(),
        event_count: events.len(),
        events,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Renders the report and writes it to `path` atomically, creating the
/// parent directory if needed.
pub fn export_to(collector: &DiagnosticsCollector, path: &Path) -> Result<()> {
    let content = render_report(collector)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    write_atomic(path, &content)?;
    Ok(())
}

/// Generates a default filename for exported reports.
///
/// Format: `iced_venue_diagnostics_YYYYMMDD_HHMMSS.json`, in local
/// time so files sort the way the user experienced the session.
#[must_use]
pub fn generate_default_filename() -> String {
    let now = Local::now();
    format!("iced_venue_diagnostics_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// Writes content to a temp file, then renames over the target.
pub fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let temp_path = path.with_extension("json.tmp");

    fs::write(&temp_path, content)?;

    if let Err(error) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(error);
    }

    Ok(())
}

/// Default directory for exported reports: the app data directory,
/// falling back to the working directory.
#[must_use]
pub fn default_export_directory() -> PathBuf {
    crate::app::paths::get_app_data_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default())
}
