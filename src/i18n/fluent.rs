// SPDX-License-Identifier: MPL-2.0
use crate::app::config::Config;
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource};
use rust_embed::RustEmbed;
use std::collections::HashMap;
use std::path::Path;
use unic_langid::LanguageIdentifier;

#[derive(RustEmbed)]
#[folder = "assets/i18n/"]
struct Asset;

/// Locale used when neither CLI, config, nor OS resolves to a bundled one.
/// Spanish is the product's home language.
const FALLBACK_LOCALE: &str = "es";

pub struct I18n {
    bundles: HashMap<LanguageIdentifier, FluentBundle<FluentResource>>,
    pub available_locales: Vec<LanguageIdentifier>,
    current_locale: LanguageIdentifier,
}

impl Default for I18n {
    fn default() -> Self {
        Self::new(None, None, &Config::default())
    }
}

impl I18n {
    pub fn new(cli_lang: Option<String>, i18n_dir: Option<String>, config: &Config) -> Self {
        let mut bundles = HashMap::new();
        let mut available_locales = Vec::new();

        for file in Asset::iter() {
            let filename = file.as_ref();
            if let Some(locale_str) = filename.strip_suffix(".ftl") {
                if let Ok(locale) = locale_str.parse::<LanguageIdentifier>() {
                    if let Some(content) = Asset::get(filename) {
                        let source =
                            String::from_utf8_lossy(content.data.as_ref()).to_string();
                        if let Some(bundle) = build_bundle(locale.clone(), source) {
                            bundles.insert(locale.clone(), bundle);
                            available_locales.push(locale);
                        }
                    }
                }
            }
        }

        // An on-disk directory replaces embedded bundles for matching locales
        // and may add locales the binary does not ship.
        if let Some(dir) = i18n_dir {
            load_overrides(Path::new(&dir), &mut bundles, &mut available_locales);
        }

        let default_locale: LanguageIdentifier = FALLBACK_LOCALE.parse().unwrap();
        let current_locale =
            resolve_locale(cli_lang, config, &available_locales).unwrap_or(default_locale);

        Self {
            bundles,
            available_locales,
            current_locale,
        }
    }

    pub fn set_locale(&mut self, locale: LanguageIdentifier) {
        if self.bundles.contains_key(&locale) {
            self.current_locale = locale;
        }
    }

    /// Re-runs the resolution order with no explicit override, for
    /// switching back to the system language at runtime.
    pub fn use_system_locale(&mut self) {
        let fallback: LanguageIdentifier = FALLBACK_LOCALE.parse().unwrap();
        let locale = resolve_locale(None, &Config::default(), &self.available_locales)
            .unwrap_or(fallback);
        self.current_locale = locale;
    }

    pub fn current_locale(&self) -> &LanguageIdentifier {
        &self.current_locale
    }

    pub fn tr(&self, key: &str) -> String {
        if let Some(bundle) = self.bundles.get(&self.current_locale) {
            if let Some(msg) = bundle.get_message(key) {
                if let Some(pattern) = msg.value() {
                    let mut errors = vec![];
                    let value = bundle.format_pattern(pattern, None, &mut errors);
                    if errors.is_empty() {
                        return value.to_string();
                    }
                }
            }
        }
        format!("MISSING: {}", key)
    }

    pub fn tr_with_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        if let Some(bundle) = self.bundles.get(&self.current_locale) {
            if let Some(msg) = bundle.get_message(key) {
                if let Some(pattern) = msg.value() {
                    let mut fluent_args = FluentArgs::new();
                    for (name, value) in args {
                        fluent_args.set(*name, *value);
                    }
                    let mut errors = vec![];
                    let value = bundle.format_pattern(pattern, Some(&fluent_args), &mut errors);
                    if errors.is_empty() {
                        return value.to_string();
                    }
                }
            }
        }
        format!("MISSING: {}", key)
    }
}

fn build_bundle(
    locale: LanguageIdentifier,
    source: String,
) -> Option<FluentBundle<FluentResource>> {
    let res = FluentResource::try_new(source).ok()?;
    let mut bundle = FluentBundle::new(vec![locale]);
    // Interpolated values must compose into plain strings (dates, amounts,
    // phone numbers), so Unicode isolation marks are disabled.
    bundle.set_use_isolating(false);
    bundle.add_resource(res).ok()?;
    Some(bundle)
}

fn load_overrides(
    dir: &Path,
    bundles: &mut HashMap<LanguageIdentifier, FluentBundle<FluentResource>>,
    available_locales: &mut Vec<LanguageIdentifier>,
) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if path.extension().and_then(|e| e.to_str()) != Some("ftl") {
            continue;
        }
        let Ok(locale) = stem.parse::<LanguageIdentifier>() else {
            continue;
        };
        let Ok(source) = std::fs::read_to_string(&path) else {
            continue;
        };
        if let Some(bundle) = build_bundle(locale.clone(), source) {
            if !available_locales.contains(&locale) {
                available_locales.push(locale.clone());
            }
            bundles.insert(locale, bundle);
        }
    }
}

fn resolve_locale(
    cli_lang: Option<String>,
    config: &Config,
    available: &[LanguageIdentifier],
) -> Option<LanguageIdentifier> {
    // 1. Check CLI args
    if let Some(lang_str) = cli_lang {
        if let Ok(lang) = lang_str.parse::<LanguageIdentifier>() {
            if available.contains(&lang) {
                return Some(lang);
            }
        }
    }

    // 2. Check config file
    if let Some(lang_str) = &config.general.language {
        if let Ok(lang) = lang_str.parse::<LanguageIdentifier>() {
            if available.contains(&lang) {
                return Some(lang);
            }
        }
    }

    // 3. Check OS locale; "es-ES" must still find the bundled "es"
    if let Some(os_locale_str) = sys_locale::get_locale() {
        if let Ok(os_lang) = os_locale_str.parse::<LanguageIdentifier>() {
            if available.contains(&os_lang) {
                return Some(os_lang);
            }
            if let Some(lang) = available
                .iter()
                .find(|locale| locale.language == os_lang.language)
            {
                return Some(lang.clone());
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::Config;
    use std::io::Write;
    use unic_langid::LanguageIdentifier;

    #[test]
    fn resolve_locale_prefers_cli() {
        let mut config = Config::default();
        config.general.language = Some("en-US".to_string());
        let available: Vec<LanguageIdentifier> =
            vec!["en-US".parse().unwrap(), "es".parse().unwrap()];
        let lang = resolve_locale(Some("es".to_string()), &config, &available);
        assert_eq!(lang, Some("es".parse().unwrap()));
    }

    #[test]
    fn resolve_locale_reads_config() {
        let mut config = Config::default();
        config.general.language = Some("en-US".to_string());
        let available: Vec<LanguageIdentifier> =
            vec!["en-US".parse().unwrap(), "es".parse().unwrap()];
        let lang = resolve_locale(None, &config, &available);
        assert_eq!(lang, Some("en-US".parse().unwrap()));
    }

    #[test]
    fn resolve_locale_ignores_unavailable_cli_language() {
        let config = Config::default();
        let available: Vec<LanguageIdentifier> = vec!["es".parse().unwrap()];
        let lang = resolve_locale(Some("de".to_string()), &config, &available);
        // Falls through to the OS locale, which is system dependent
        if let Some(l) = lang {
            assert!(available.contains(&l));
        }
    }

    #[test]
    fn bundled_locales_include_spanish_and_english() {
        let i18n = I18n::default();
        assert!(i18n
            .available_locales
            .iter()
            .any(|locale| locale.to_string() == "es"));
        assert!(i18n
            .available_locales
            .iter()
            .any(|locale| locale.to_string() == "en-US"));
    }

    #[test]
    fn tr_returns_missing_marker_for_unknown_key() {
        let i18n = I18n::default();
        assert_eq!(i18n.tr("no-such-key"), "MISSING: no-such-key");
    }

    #[test]
    fn tr_with_args_interpolates_without_isolation_marks() {
        let mut i18n = I18n::default();
        i18n.set_locale("es".parse().unwrap());
        let text = i18n.tr_with_args("validation-min-length", &[("n", "3")]);
        assert_eq!(text, "Mínimo 3 caracteres");
    }

    #[test]
    fn set_locale_ignores_unknown_locale() {
        let mut i18n = I18n::default();
        let before = i18n.current_locale().clone();
        i18n.set_locale("zh".parse().unwrap());
        assert_eq!(i18n.current_locale(), &before);
    }

    #[test]
    fn override_directory_replaces_bundled_text() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("es.ftl");
        let mut file = std::fs::File::create(&path).expect("create ftl");
        writeln!(file, "toast-processing = Un momento").expect("write ftl");

        let i18n = I18n::new(
            Some("es".to_string()),
            Some(dir.path().to_string_lossy().into_owned()),
            &Config::default(),
        );
        assert_eq!(i18n.tr("toast-processing"), "Un momento");
    }
}
