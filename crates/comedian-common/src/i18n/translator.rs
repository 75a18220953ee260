//! Translation bundles and the per-language localizer
//!
//! Bundles are JSON objects embedded at compile time. A message is either a
//! plain template or an object of plural forms:
//!
//! ```json
//! {
//!   "show_deadline": "Standup deadline is {deadline}",
//!   "non_reporters": { "one": "{count} person", "other": "{count} people" }
//! }
//! ```
//!
//! Placeholders are written `{name}`. Lookups fall back from the requested
//! locale to English and finally to the message id itself.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

const EN_BUNDLE: &str = include_str!("../../locales/en.json");
const RU_BUNDLE: &str = include_str!("../../locales/ru.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ru => "ru",
        }
    }

    /// CLDR plural category of `count`
    pub fn plural_category(self, count: i64) -> &'static str {
        let n = count.abs();
        match self {
            Self::En => {
                if n == 1 {
                    "one"
                } else {
                    "other"
                }
            }
            Self::Ru => {
                let (rem10, rem100) = (n % 10, n % 100);
                if rem10 == 1 && rem100 != 11 {
                    "one"
                } else if (2..=4).contains(&rem10) && !(12..=14).contains(&rem100) {
                    "few"
                } else {
                    "many"
                }
            }
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    /// Accepts `en`, `ru`, and region-qualified forms like `en_US` or `ru-RU`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lang = s
            .split(['_', '-'])
            .next()
            .unwrap_or_default()
            .to_lowercase();
        match lang.as_str() {
            "en" => Ok(Self::En),
            "ru" => Ok(Self::Ru),
            _ => Err(s.to_string()),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Entry {
    Simple(String),
    Plural(HashMap<String, String>),
}

impl Entry {
    fn pick(&self, locale: Locale, count: Option<i64>) -> Option<&str> {
        match self {
            Self::Simple(text) => Some(text),
            Self::Plural(forms) => {
                let category = count.map_or("other", |c| locale.plural_category(c));
                forms
                    .get(category)
                    .or_else(|| forms.get("other"))
                    .or_else(|| forms.get("many"))
                    .map(String::as_str)
            }
        }
    }
}

type Bundle = HashMap<String, Entry>;

/// Errors raised while loading bundles
#[derive(Debug, thiserror::Error)]
pub enum I18nError {
    #[error("Failed to parse {locale} bundle: {source}")]
    Parse {
        locale: Locale,
        #[source]
        source: serde_json::Error,
    },
}

/// Holds every loaded bundle
#[derive(Debug)]
pub struct Translator {
    bundles: HashMap<Locale, Bundle>,
}

impl Translator {
    /// Load the embedded English and Russian bundles
    pub fn new() -> Result<Self, I18nError> {
        Self::from_sources(&[(Locale::En, EN_BUNDLE), (Locale::Ru, RU_BUNDLE)])
    }

    pub fn from_sources(sources: &[(Locale, &str)]) -> Result<Self, I18nError> {
        let mut bundles = HashMap::new();
        for (locale, source) in sources {
            let bundle: Bundle = serde_json::from_str(source).map_err(|source| I18nError::Parse {
                locale: *locale,
                source,
            })?;
            bundles.insert(*locale, bundle);
        }
        Ok(Self { bundles })
    }

    /// Look up `id` and fill in `{placeholders}` from `data`.
    ///
    /// `count` selects the plural form and is also available as `{count}`.
    pub fn translate(
        &self,
        locale: Locale,
        id: &str,
        count: Option<i64>,
        data: &[(&str, &str)],
    ) -> String {
        let template = [locale, Locale::En].iter().find_map(|l| {
            self.bundles
                .get(l)
                .and_then(|bundle| bundle.get(id))
                .and_then(|entry| entry.pick(*l, count))
        });

        let Some(template) = template else {
            tracing::warn!(message_id = id, locale = %locale, "missing translation");
            return id.to_string();
        };

        let mut out = template.to_string();
        if let Some(count) = count {
            out = out.replace("{count}", &count.to_string());
        }
        for (key, value) in data {
            out = out.replace(&format!("{{{key}}}"), value);
        }
        out
    }

    /// Bind this translator to one language
    pub fn localizer(self: &Arc<Self>, locale: Locale) -> Localizer {
        Localizer {
            translator: Arc::clone(self),
            locale,
        }
    }
}

/// A translator bound to the language of one workspace
#[derive(Debug, Clone)]
pub struct Localizer {
    translator: Arc<Translator>,
    locale: Locale,
}

impl Localizer {
    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn t(&self, id: &str) -> String {
        self.translator.translate(self.locale, id, None, &[])
    }

    pub fn t_with(&self, id: &str, data: &[(&str, &str)]) -> String {
        self.translator.translate(self.locale, id, None, data)
    }

    pub fn t_plural(&self, id: &str, count: i64, data: &[(&str, &str)]) -> String {
        self.translator.translate(self.locale, id, Some(count), data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator() -> Arc<Translator> {
        let en = r#"{
            "greeting": "Hello, {name}!",
            "only_en": "English only",
            "people": { "one": "{count} person", "other": "{count} people" }
        }"#;
        let ru = r#"{
            "greeting": "Привет, {name}!",
            "people": {
                "one": "{count} человек",
                "few": "{count} человека",
                "many": "{count} человек"
            }
        }"#;
        Arc::new(Translator::from_sources(&[(Locale::En, en), (Locale::Ru, ru)]).unwrap())
    }

    #[test]
    fn test_template_data() {
        let l = translator().localizer(Locale::En);
        assert_eq!(l.t_with("greeting", &[("name", "Anna")]), "Hello, Anna!");
        let l = translator().localizer(Locale::Ru);
        assert_eq!(l.t_with("greeting", &[("name", "Анна")]), "Привет, Анна!");
    }

    #[test]
    fn test_english_plurals() {
        let l = translator().localizer(Locale::En);
        assert_eq!(l.t_plural("people", 1, &[]), "1 person");
        assert_eq!(l.t_plural("people", 0, &[]), "0 people");
        assert_eq!(l.t_plural("people", 5, &[]), "5 people");
    }

    #[test]
    fn test_russian_plurals() {
        let l = translator().localizer(Locale::Ru);
        assert_eq!(l.t_plural("people", 1, &[]), "1 человек");
        assert_eq!(l.t_plural("people", 3, &[]), "3 человека");
        assert_eq!(l.t_plural("people", 11, &[]), "11 человек");
        assert_eq!(l.t_plural("people", 22, &[]), "22 человека");
    }

    #[test]
    fn test_fallbacks() {
        let l = translator().localizer(Locale::Ru);
        assert_eq!(l.t("only_en"), "English only");
        assert_eq!(l.t("nowhere"), "nowhere");
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!("en_US".parse::<Locale>(), Ok(Locale::En));
        assert_eq!("ru-RU".parse::<Locale>(), Ok(Locale::Ru));
        assert!("de".parse::<Locale>().is_err());
    }

    #[test]
    fn test_plural_categories() {
        assert_eq!(Locale::Ru.plural_category(21), "one");
        assert_eq!(Locale::Ru.plural_category(111), "many");
        assert_eq!(Locale::Ru.plural_category(104), "few");
        assert_eq!(Locale::En.plural_category(-1), "one");
    }

    #[test]
    fn test_embedded_bundles_load() {
        let translator = Translator::new().unwrap();
        assert_eq!(translator.bundles.len(), 2);
    }
}
