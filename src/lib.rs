// SPDX-License-Identifier: MPL-2.0
//! `iced_venue` is an event-booking manager for small venues built with the Iced GUI framework.
//!
//! It talks to a booking server over HTTP and provides a dashboard, a
//! reservation calendar, a filterable reservation table, a WhatsApp-style
//! messaging panel and a settings screen. It demonstrates internationalization
//! with Fluent, user preference management, and modular UI design.

#![doc(html_root_url = "https://docs.rs/iced_venue/0.3.0")]

pub mod api;
pub mod app;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod ui;
