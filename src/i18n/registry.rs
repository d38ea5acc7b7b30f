//! Locale registry: Single source of truth for all supported locales.
//!
//! The table is static and initialized once through `OnceLock`; nothing
//! mutates it at runtime, so request handlers can read it concurrently.

use std::sync::OnceLock;

/// Configuration for a supported locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// Locale code used in URLs and cookies (e.g., "de", "ru")
    pub code: &'static str,

    /// Locale code the CMS expects in its `locale` query parameter (e.g., "ru-RU")
    pub cms_code: &'static str,

    /// Short display name for the language switcher (e.g., "DE")
    pub short_name: &'static str,

    /// Long display name in the language itself (e.g., "Deutsch")
    pub long_name: &'static str,

    /// Whether this is the fallback locale (exactly one must be true)
    pub is_default: bool,
}

/// Global locale registry singleton.
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Get a locale configuration by its URL code.
    ///
    /// Matching is exact: `"DE"` is not the same locale as `"de"`.
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// All locales in registry order.
    pub fn list(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().collect()
    }

    /// Get the default locale configuration.
    ///
    /// # Panics
    /// Panics if the static table does not define exactly one default locale.
    pub fn default_locale(&self) -> &LocaleConfig {
        let defaults: Vec<_> = self
            .locales
            .iter()
            .filter(|locale| locale.is_default)
            .collect();

        match defaults.as_slice() {
            [single] => single,
            [] => panic!("No default locale found in registry"),
            _ => panic!("Multiple default locales found in registry"),
        }
    }

    /// Check if a code names a supported locale.
    pub fn is_supported(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }
}

/// The first entry is the default locale.
fn default_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "de",
            cms_code: "de",
            short_name: "DE",
            long_name: "Deutsch",
            is_default: true,
        },
        LocaleConfig {
            code: "en",
            cms_code: "en",
            short_name: "EN",
            long_name: "English",
            is_default: false,
        },
        LocaleConfig {
            code: "ru",
            cms_code: "ru-RU",
            short_name: "RU",
            long_name: "Русский",
            is_default: false,
        },
    ]
}
