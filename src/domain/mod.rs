// SPDX-License-Identifier: MPL-2.0
//! Domain layer - booking rules with no UI or network dependencies.
//!
//! This module contains the pure logic behind the screens so it can be
//! tested without a running server or an event loop.
//!
//! # Modules
//!
//! - [`dates`]: Calendar math ([`month_grid`](dates::month_grid),
//!   [`expand_range`](dates::expand_range), [`days_in_range`](dates::days_in_range))
//! - [`validation`]: Form rules ([`FieldRules`](validation::FieldRules),
//!   [`Validator`](validation::Validator), [`check`](validation::check))

pub mod dates;
pub mod validation;
