// SPDX-License-Identifier: MPL-2.0
//! Screen enumeration for application navigation.

use crate::diagnostics::UserAction;

/// Screens the user can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Calendar,
    Reservations,
    Messages,
    Settings,
}

impl Screen {
    /// All screens, in navbar order.
    pub const ALL: [Screen; 5] = [
        Screen::Dashboard,
        Screen::Calendar,
        Screen::Reservations,
        Screen::Messages,
        Screen::Settings,
    ];

    /// Localization key for the navbar label.
    pub fn label_key(self) -> &'static str {
        match self {
            Screen::Dashboard => "navbar-dashboard",
            Screen::Calendar => "navbar-calendar",
            Screen::Reservations => "navbar-reservations",
            Screen::Messages => "navbar-messages",
            Screen::Settings => "navbar-settings",
        }
    }

    /// Diagnostic action recorded when the user opens this screen.
    pub fn open_action(self) -> UserAction {
        match self {
            Screen::Dashboard => UserAction::OpenDashboard,
            Screen::Calendar => UserAction::OpenCalendar,
            Screen::Reservations => UserAction::OpenReservations,
            Screen::Messages => UserAction::OpenMessages,
            Screen::Settings => UserAction::OpenSettings,
        }
    }
}
