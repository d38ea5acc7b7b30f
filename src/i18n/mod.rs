//! Internationalization (i18n) module.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all supported locales and their CMS mapping
//! - `locale`: Type-safe `Locale` value validated against the registry
//! - `strings`: Localized user-facing strings with default-locale fallback
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::i18n::{Locale, LocaleRegistry};
//!
//! let russian = Locale::from_code("ru")?;
//! assert_eq!(russian.cms_code(), "ru-RU");
//!
//! let default = Locale::default_locale();
//! let all = LocaleRegistry::get().list();
//! ```

mod locale;
mod registry;
mod strings;

pub use locale::Locale;
pub use registry::{LocaleConfig, LocaleRegistry};
pub use strings::LocaleStrings;
