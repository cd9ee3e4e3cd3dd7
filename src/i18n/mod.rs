// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support for the application.
//!
//! This module provides localization capabilities using the Fluent localization system.
//! It handles language detection, translation file loading, and string formatting.
//!
//! # Features
//!
//! - Automatic locale detection from CLI, config, or system settings
//! - Embedded `.ftl` translation files with an optional on-disk override directory
//! - Runtime language switching
//! - Deferred rendering of user-visible text via [`Phrase`]

pub mod fluent;

use fluent::I18n;

/// A piece of user-visible text whose rendering is deferred until view time.
///
/// State-holding components (toasts, dialogs, validation errors) store
/// `Phrase` values instead of final strings, so the active locale is applied
/// when the text is actually shown. Server-provided messages are carried as
/// literals and displayed as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum Phrase {
    /// A Fluent message key.
    Key(&'static str),
    /// A Fluent message key with arguments.
    KeyWith {
        key: &'static str,
        args: Vec<(String, String)>,
    },
    /// Text shown verbatim, bypassing localization.
    Literal(String),
}

impl Phrase {
    pub fn key(key: &'static str) -> Self {
        Phrase::Key(key)
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Phrase::Literal(text.into())
    }

    /// Adds a Fluent argument, upgrading a plain key to a keyed-with-args
    /// phrase. Arguments on literals have no meaning and are ignored.
    #[must_use]
    pub fn with_arg(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            Phrase::Key(key) => Phrase::KeyWith {
                key,
                args: vec![(name.into(), value.into())],
            },
            Phrase::KeyWith { key, mut args } => {
                args.push((name.into(), value.into()));
                Phrase::KeyWith { key, args }
            }
            literal @ Phrase::Literal(_) => literal,
        }
    }

    /// Renders the phrase against the active locale.
    pub fn resolve(&self, i18n: &I18n) -> String {
        match self {
            Phrase::Key(key) => i18n.tr(key),
            Phrase::KeyWith { key, args } => {
                let refs: Vec<(&str, &str)> = args
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str()))
                    .collect();
                i18n.tr_with_args(key, &refs)
            }
            Phrase::Literal(text) => text.clone(),
        }
    }
}
