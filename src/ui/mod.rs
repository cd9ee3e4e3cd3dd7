// SPDX-License-Identifier: MPL-2.0
//! User interface components and state management.
//!
//! This module organizes all UI-related code following a component-based architecture
//! with the Elm-style "state down, messages up" pattern.
//!
//! # Screens
//!
//! - [`dashboard`] - Upcoming reservations, message feed size and quick booking
//! - [`calendar`] - Month grid with day detail, estado changes and WhatsApp sends
//! - [`reservations`] - Filterable reservation table with per-row actions
//! - [`messaging`] - WhatsApp conversation list, thread view and composer
//! - [`settings`] - Language, theme, server connection and diagnostics export
//!
//! # Shared Infrastructure
//!
//! - [`reservation_form`] - Booking form embedded by dashboard and calendar
//! - [`confirm_dialog`] - Modal confirmation for destructive actions
//! - [`loading_overlay`] - Full-window veil for startup loading
//! - [`notifications`] - Toast notification system for user feedback
//! - [`navbar`] - Top-level screen navigation
//! - [`widgets`] - Custom Iced widgets (busy spinner)
//! - [`styles`] - Centralized styling (buttons, containers, overlays)
//! - [`design_tokens`] - Design system constants (colors, spacing, sizing)
//! - [`theming`] - Light/Dark/System theme mode management

pub mod calendar;
pub mod confirm_dialog;
pub mod dashboard;
pub mod design_tokens;
pub mod loading_overlay;
pub mod messaging;
pub mod navbar;
pub mod notifications;
pub mod reservation_form;
pub mod reservations;
pub mod settings;
pub mod styles;
pub mod theming;
pub mod widgets;
