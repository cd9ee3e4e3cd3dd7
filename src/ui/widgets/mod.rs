// SPDX-License-Identifier: MPL-2.0
pub mod busy_spinner;

pub use busy_spinner::BusySpinner;
