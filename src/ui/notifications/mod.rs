// SPDX-License-Identifier: MPL-2.0
//! Toast notification system for user feedback.
//!
//! This module provides a non-intrusive notification system following
//! toast/snackbar UX patterns. Notifications appear temporarily to inform
//! users about actions (save success, errors, etc.) without blocking interaction.
//!
//! # Components
//!
//! - [`notification`] - Core `Notification` struct with severity levels
//! - [`manager`] - `Manager` for lifecycle, timing and the display limit
//! - [`toast`] - Toast widget component for rendering notifications
//!
//! # Usage
//!
//! ```ignore
//! use crate::i18n::Phrase;
//! use crate::ui::notifications::Manager;
//!
//! let mut manager = Manager::new();
//!
//! // Show a toast; the returned ID can dismiss it later
//! let id = manager.loading(Phrase::key("toast-processing"));
//! manager.dismiss(id);
//!
//! // In the app update, advance timers on every animation tick
//! manager.tick(std::time::Instant::now());
//!
//! // In the view, render the overlay
//! let toast_overlay = Toast::view_overlay(&manager, &i18n).map(Message::Notification);
//! ```
//!
//! # Design Considerations
//!
//! - Toast duration: 4s for success/info, 5s for warnings, 6s for errors;
//!   loading toasts stay until the operation settles
//! - Max visible toasts: 3; beyond that the oldest start exiting
//! - Dismissed toasts fade for 300ms before removal
//! - Position: bottom-right corner, oldest on top

mod manager;
mod notification;
mod toast;

pub use manager::{Manager, Message as NotificationMessage, EXIT_DURATION, MAX_VISIBLE};
pub use notification::{Notification, NotificationId, Severity};
pub use toast::Toast;
