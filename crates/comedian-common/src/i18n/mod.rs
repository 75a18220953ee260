//! Translation context passed to everything that renders user-facing text

mod translator;

pub use translator::{I18nError, Locale, Localizer, Translator};
