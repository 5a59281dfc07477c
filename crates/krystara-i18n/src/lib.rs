//! Krystara I18n - translation of rendered records
//!
//! Every human-facing string in the dumps is a bracketed key such as
//! `[TROOP_6000_NAME]`. A [`Translator`] holds one key/string table per
//! locale and rewrites records into a requested locale, falling back to the
//! base locale and then to ordered key rewrites ([`FallbackChain`]).

mod error;
pub mod fallback;
mod locale;
mod translator;

pub use error::{Error, Result};
pub use fallback::{FallbackChain, Rewrite};
pub use locale::{LocaleNormalizer, StandardLocales, LANGUAGES};
pub use translator::{is_untranslated, select_plural, Translator, BASE_LOCALE, PLURAL_SEPARATOR};
