//! Message catalog for user-facing strings
//!
//! Messages live in `locales/*.yml` and are compiled in by `rust-i18n`.
//! Lookups return `Option` so callers can walk an ordered list of candidate
//! keys and fall back explicitly.

pub const DEFAULT_LOCALE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCatalog {
    locale: String,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::english()
    }
}

impl MessageCatalog {
    pub fn english() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
        }
    }

    /// Catalog for `locale` (`nl`, `nl-BE`, `nl_NL`), or English when that
    /// language is not shipped
    pub fn for_locale(locale: &str) -> Self {
        let language = locale
            .split(['-', '_', '.'])
            .next()
            .unwrap_or(DEFAULT_LOCALE)
            .to_lowercase();
        let shipped = rust_i18n::available_locales!()
            .iter()
            .any(|available| available.to_string() == language);
        if !shipped {
            tracing::warn!("No messages for locale {locale}, using {DEFAULT_LOCALE}");
            return Self::english();
        }
        Self { locale: language }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Message for `key` in this locale, falling back to English per key
    pub fn lookup(&self, key: &str) -> Option<String> {
        crate::_rust_i18n_try_translate(&self.locale, key).map(|message| message.to_string())
    }

    /// Look up `key` and substitute `%{name}` placeholders
    pub fn render(&self, key: &str, params: &[(&str, &str)]) -> Option<String> {
        let template = self.lookup(key)?;
        let (names, values): (Vec<&str>, Vec<String>) = params
            .iter()
            .map(|(name, value)| (*name, value.to_string()))
            .unzip();
        Some(rust_i18n::replace_patterns(&template, &names, &values))
    }

    /// Look up `key`, falling back to the key itself
    pub fn text(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_else(|| key.to_string())
    }
}
