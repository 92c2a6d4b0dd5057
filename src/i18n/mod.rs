//! Internationalization (i18n) for the bilingual site.
//!
//! # Architecture
//!
//! - `registry`: Static table of supported locales and their metadata
//! - `locale`: Typed `Locale` used everywhere a language is meant
//! - `accept_language`: Preferred-locale detection from request headers
//! - `strings`: Localized UI strings for the page renderer
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::i18n::{preferred_locale, Locale};
//!
//! let locale = preferred_locale(Some("zh-CN,zh;q=0.9"));
//! assert_eq!(locale, Locale::Chinese);
//! assert_eq!(locale.path("/blog"), "/zh/blog");
//! ```

mod accept_language;
mod locale;
mod registry;
mod strings;

pub use accept_language::{preferred_locale, primary_subtag};
pub use locale::Locale;
pub use registry::{LocaleConfig, LocaleRegistry};
pub use strings::LocaleStrings;
