// SPDX-License-Identifier: MPL-2.0
//! Form validation rules and per-field error tracking.
//!
//! Rules run in a fixed order and stop at the first failure:
//! required → min length → max length → email → phone → number
//! (with optional bounds) → date → custom. Only `required` sees an
//! empty value; every other rule is skipped so optional fields stay
//! valid until filled in.

use crate::i18n::Phrase;
use std::collections::BTreeMap;
use std::fmt;

/// Caller-supplied predicate for the `custom` rule.
///
/// `Err(Some(phrase))` reports a specific message, `Err(None)` falls
/// back to the generic invalid-value message.
pub type CustomRule<'a> = &'a dyn Fn(&str) -> Result<(), Option<Phrase>>;

// =============================================================================
// FieldRules
// =============================================================================

/// Rule set for a single field, assembled with builder calls.
///
/// # Example
///
/// ```ignore
/// let rules = FieldRules::new().required().min_length(3).max_length(100);
/// assert!(check("Laura", &rules).is_none());
/// ```
#[derive(Clone, Copy, Default)]
pub struct FieldRules<'a> {
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    email: bool,
    phone: bool,
    number: bool,
    min: Option<f64>,
    max: Option<f64>,
    date: bool,
    custom: Option<CustomRule<'a>>,
}

impl<'a> FieldRules<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    #[must_use]
    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    #[must_use]
    pub fn email(mut self) -> Self {
        self.email = true;
        self
    }

    #[must_use]
    pub fn phone(mut self) -> Self {
        self.phone = true;
        self
    }

    #[must_use]
    pub fn number(mut self) -> Self {
        self.number = true;
        self
    }

    /// Lower bound for the `number` rule.
    #[must_use]
    pub fn min(mut self, bound: f64) -> Self {
        self.min = Some(bound);
        self
    }

    /// Upper bound for the `number` rule.
    #[must_use]
    pub fn max(mut self, bound: f64) -> Self {
        self.max = Some(bound);
        self
    }

    #[must_use]
    pub fn date(mut self) -> Self {
        self.date = true;
        self
    }

    #[must_use]
    pub fn custom(mut self, rule: CustomRule<'a>) -> Self {
        self.custom = Some(rule);
        self
    }
}

impl fmt::Debug for FieldRules<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRules")
            .field("required", &self.required)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("number", &self.number)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("date", &self.date)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

// =============================================================================
// Rule engine
// =============================================================================

/// Runs the rule chain over a raw field value and returns the first
/// failure, or `None` when every applicable rule passes.
///
/// The value is trimmed before any rule sees it.
#[must_use]
pub fn check(raw_value: &str, rules: &FieldRules<'_>) -> Option<Phrase> {
    let value = raw_value.trim();

    if rules.required && value.is_empty() {
        return Some(Phrase::key("validation-required"));
    }

    // Past the required check, an empty value passes everything: the
    // remaining rules constrain what was typed, not whether it was.
    if value.is_empty() {
        return None;
    }

    if let Some(min) = rules.min_length {
        if value.chars().count() < min {
            return Some(
                Phrase::key("validation-min-length").with_arg("n", min.to_string()),
            );
        }
    }
    if let Some(max) = rules.max_length {
        if value.chars().count() > max {
            return Some(
                Phrase::key("validation-max-length").with_arg("n", max.to_string()),
            );
        }
    }

    if rules.email && !looks_like_email(value) {
        return Some(Phrase::key("validation-email"));
    }

    if rules.phone && !looks_like_phone(value) {
        return Some(Phrase::key("validation-phone"));
    }

    if rules.number {
        match value.parse::<f64>().ok().filter(|number| number.is_finite()) {
            None => return Some(Phrase::key("validation-number")),
            Some(number) => {
                let mut bound_error = None;
                if let Some(min) = rules.min {
                    if number < min {
                        bound_error = Some(
                            Phrase::key("validation-number-min")
                                .with_arg("n", format_bound(min)),
                        );
                    }
                }
                if let Some(max) = rules.max {
                    if number > max {
                        bound_error = Some(
                            Phrase::key("validation-number-max")
                                .with_arg("n", format_bound(max)),
                        );
                    }
                }
                if let Some(error) = bound_error {
                    return Some(error);
                }
            }
        }
    }

    if rules.date && chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Some(Phrase::key("validation-date"));
    }

    if let Some(custom) = rules.custom {
        if let Err(message) = custom(value) {
            return Some(message.unwrap_or_else(|| Phrase::key("validation-custom")));
        }
    }

    None
}

/// Shape check equivalent to the `local@domain.tld` pattern: no
/// whitespace, exactly one `@` with text on both sides, and a dot in
/// the domain that is neither its first nor last character.
fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = value.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(index, ch)| ch == '.' && index > 0 && index + 1 < domain.len())
}

/// Digits, whitespace, `+`, `-` and parentheses only, with at least
/// nine digits overall.
fn looks_like_phone(value: &str) -> bool {
    let allowed = value.chars().all(|ch| {
        ch.is_ascii_digit() || ch.is_whitespace() || matches!(ch, '+' | '-' | '(' | ')')
    });
    allowed && value.chars().filter(char::is_ascii_digit).count() >= 9
}

fn format_bound(bound: f64) -> String {
    format!("{bound}")
}

// =============================================================================
// Validator
// =============================================================================

/// Tracks the current error per field name across validation passes.
#[derive(Debug, Default)]
pub struct Validator {
    errors: BTreeMap<String, Phrase>,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a single field and records or clears its error entry.
    ///
    /// Returns `true` when the value passes every applicable rule.
    pub fn validate_field(&mut self, name: &str, value: &str, rules: &FieldRules<'_>) -> bool {
        match check(value, rules) {
            Some(error) => {
                self.errors.insert(name.to_string(), error);
                false
            }
            None => {
                self.errors.remove(name);
                true
            }
        }
    }

    /// Resets the error map, then validates every listed field. All
    /// fields run even after a failure so the map ends up complete.
    pub fn validate_all(&mut self, fields: &[(&str, &str, FieldRules<'_>)]) -> bool {
        self.errors.clear();
        let mut all_valid = true;
        for (name, value, rules) in fields {
            if !self.validate_field(name, value, rules) {
                all_valid = false;
            }
        }
        all_valid
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    #[must_use]
    pub fn error_for(&self, name: &str) -> Option<&Phrase> {
        self.errors.get(name)
    }

    #[must_use]
    pub fn errors(&self) -> &BTreeMap<String, Phrase> {
        &self.errors
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Rule chain tests
    // -------------------------------------------------------------------------

    #[test]
    fn required_rejects_empty_and_whitespace() {
        let rules = FieldRules::new().required();
        assert_eq!(check("", &rules), Some(Phrase::key("validation-required")));
        assert_eq!(
            check("   ", &rules),
            Some(Phrase::key("validation-required"))
        );
        assert_eq!(check("Laura", &rules), None);
    }

    #[test]
    fn rules_run_in_order_and_stop_at_first_failure() {
        let rules = FieldRules::new().required().min_length(3).email();
        // Empty fails on required, never reaching min length.
        assert_eq!(check("", &rules), Some(Phrase::key("validation-required")));
        // Short fails on min length, never reaching email.
        assert_eq!(
            check("ab", &rules),
            Some(Phrase::key("validation-min-length").with_arg("n", "3"))
        );
        assert_eq!(check("a@b", &rules), Some(Phrase::key("validation-email")));
    }

    #[test]
    fn length_rules_count_characters_not_bytes() {
        let rules = FieldRules::new().min_length(4);
        assert_eq!(
            check("día", &rules),
            Some(Phrase::key("validation-min-length").with_arg("n", "4"))
        );
        assert_eq!(check("días", &rules), None);

        let rules = FieldRules::new().max_length(4);
        assert_eq!(check("días", &rules), None);
        assert!(check("diñas", &rules).is_some());
    }

    #[test]
    fn empty_optional_values_skip_the_later_rules() {
        let rules = FieldRules::new().min_length(3).email().number().date();
        assert_eq!(check("", &rules), None);
        assert_eq!(check("   ", &rules), None);
    }

    #[test]
    fn email_accepts_plain_addresses_only() {
        let rules = FieldRules::new().email();
        assert_eq!(check("laura@example.com", &rules), None);
        assert_eq!(check("laura.perez@mail.example.com", &rules), None);
        // Empty is fine, the rule is skipped.
        assert_eq!(check("", &rules), None);

        for bad in ["laura", "laura@", "@example.com", "a@b", "a@.com", "a@com.", "a b@c.d"] {
            assert_eq!(
                check(bad, &rules),
                Some(Phrase::key("validation-email")),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn phone_requires_nine_digits_and_allowed_punctuation() {
        let rules = FieldRules::new().phone();
        assert_eq!(check("+34 612 345 678", &rules), None);
        assert_eq!(check("(91) 234-56-78 9", &rules), None);
        assert_eq!(check("", &rules), None);

        assert_eq!(
            check("612 345 67", &rules),
            Some(Phrase::key("validation-phone")),
            "eight digits are not enough"
        );
        assert_eq!(
            check("612345678x", &rules),
            Some(Phrase::key("validation-phone")),
            "letters are not allowed"
        );
    }

    #[test]
    fn number_rule_parses_and_range_checks() {
        let rules = FieldRules::new().number().min(0.0).max(100.0);
        assert_eq!(check("42", &rules), None);
        assert_eq!(check("0", &rules), None);
        assert_eq!(check("100", &rules), None);
        assert_eq!(check("abc", &rules), Some(Phrase::key("validation-number")));
        assert_eq!(
            check("-1", &rules),
            Some(Phrase::key("validation-number-min").with_arg("n", "0"))
        );
        assert_eq!(
            check("150.5", &rules),
            Some(Phrase::key("validation-number-max").with_arg("n", "100"))
        );
    }

    #[test]
    fn number_rule_rejects_non_finite_values() {
        let rules = FieldRules::new().number();
        assert_eq!(check("NaN", &rules), Some(Phrase::key("validation-number")));
        assert_eq!(check("inf", &rules), Some(Phrase::key("validation-number")));
    }

    #[test]
    fn date_rule_requires_a_real_calendar_date() {
        let rules = FieldRules::new().date();
        assert_eq!(check("2026-09-12", &rules), None);
        assert_eq!(check("", &rules), None);
        assert_eq!(check("12/09/2026", &rules), Some(Phrase::key("validation-date")));
        assert_eq!(check("2026-02-30", &rules), Some(Phrase::key("validation-date")));
    }

    #[test]
    fn custom_rule_runs_last_with_fallback_message() {
        let no_zeros = |value: &str| {
            if value.contains('0') {
                Err(Some(Phrase::literal("sin ceros")))
            } else {
                Ok(())
            }
        };
        let rules = FieldRules::new().custom(&no_zeros);
        assert_eq!(check("12", &rules), None);
        assert_eq!(check("10", &rules), Some(Phrase::literal("sin ceros")));

        let always_invalid = |_: &str| Err(None);
        let rules = FieldRules::new().custom(&always_invalid);
        assert_eq!(check("x", &rules), Some(Phrase::key("validation-custom")));

        // A failing earlier rule short-circuits before custom runs.
        let rules = FieldRules::new().required().custom(&always_invalid);
        assert_eq!(check("", &rules), Some(Phrase::key("validation-required")));
    }

    // -------------------------------------------------------------------------
    // Validator tests
    // -------------------------------------------------------------------------

    #[test]
    fn validate_field_records_and_clears_errors() {
        let mut validator = Validator::new();
        assert!(!validator.validate_field("cliente_nombre", "", &FieldRules::new().required()));
        assert!(validator.has_errors());
        assert_eq!(
            validator.error_for("cliente_nombre"),
            Some(&Phrase::key("validation-required"))
        );

        assert!(validator.validate_field(
            "cliente_nombre",
            "Laura",
            &FieldRules::new().required()
        ));
        assert!(!validator.has_errors());
        assert_eq!(validator.error_for("cliente_nombre"), None);
    }

    #[test]
    fn validate_all_resets_previous_errors_and_checks_every_field() {
        let mut validator = Validator::new();
        assert!(!validator.validate_field("stale", "", &FieldRules::new().required()));

        let valid = validator.validate_all(&[
            ("cliente_nombre", "", FieldRules::new().required()),
            ("cliente_telefono", "x", FieldRules::new().required().phone()),
            ("cliente_email", "laura@example.com", FieldRules::new().email()),
        ]);
        assert!(!valid);
        // The stale entry is gone and both failing fields are present.
        assert_eq!(validator.error_for("stale"), None);
        assert_eq!(validator.errors().len(), 2);
        assert!(validator.error_for("cliente_nombre").is_some());
        assert!(validator.error_for("cliente_telefono").is_some());
        assert!(validator.error_for("cliente_email").is_none());
    }

    #[test]
    fn clear_errors_empties_the_map() {
        let mut validator = Validator::new();
        validator.validate_field("campo", "", &FieldRules::new().required());
        assert!(validator.has_errors());
        validator.clear_errors();
        assert!(!validator.has_errors());
        assert!(validator.errors().is_empty());
    }
}
