//! Locale type: a supported locale validated against the registry.

use crate::i18n::{LocaleConfig, LocaleRegistry, LocaleStrings};
use anyhow::{bail, Result};
use serde::{Serialize, Serializer};
use std::fmt;

/// A validated locale.
///
/// Only codes present in the registry can be turned into a `Locale`, so
/// everything downstream can treat it as supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locale {
    code: &'static str,
}

impl Locale {
    pub const GERMAN: Locale = Locale { code: "de" };
    pub const ENGLISH: Locale = Locale { code: "en" };
    pub const RUSSIAN: Locale = Locale { code: "ru" };

    /// Create a Locale from a URL/cookie code.
    ///
    /// # Example
    /// ```ignore
    /// let russian = Locale::from_code("ru")?;
    /// ```
    pub fn from_code(code: &str) -> Result<Locale> {
        match Self::parse(code) {
            Some(locale) => Ok(locale),
            None => bail!("Unknown locale code: '{}'", code),
        }
    }

    /// Non-failing variant of [`Locale::from_code`].
    pub fn parse(code: &str) -> Option<Locale> {
        LocaleRegistry::get()
            .get_by_code(code)
            .map(|config| Locale { code: config.code })
    }

    /// The registry's default locale.
    pub fn default_locale() -> Locale {
        Locale {
            code: LocaleRegistry::get().default_locale().code,
        }
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full locale configuration from the registry.
    ///
    /// # Panics
    /// Panics if the code is missing from the registry, which cannot happen
    /// for a `Locale` built through `parse`, `from_code` or the constants.
    pub fn config(&self) -> &'static LocaleConfig {
        LocaleRegistry::get()
            .get_by_code(self.code)
            .expect("Locale code should always be valid")
    }

    /// Locale code as the CMS expects it.
    pub fn cms_code(&self) -> &'static str {
        self.config().cms_code
    }

    pub fn short_name(&self) -> &'static str {
        self.config().short_name
    }

    pub fn long_name(&self) -> &'static str {
        self.config().long_name
    }

    pub fn is_default(&self) -> bool {
        self.config().is_default
    }

    /// Localized strings for this locale.
    pub fn strings(&self) -> &'static LocaleStrings {
        LocaleStrings::for_locale(*self)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::default_locale()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}
