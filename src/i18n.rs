//! Localisation loader and helpers for user-facing messages.
//!
//! The loader embeds the Fluent resources under `locales/` so the binary
//! resolves translated strings without touching the filesystem at
//! runtime. The API is a thin wrapper around `fluent-templates` that
//! tracks whether the fallback bundle was used; lookups that miss fall
//! back to the message key so a translation gap never aborts an install.

use fluent_templates::{
    loader::{LanguageIdentifier, Loader},
    static_loader,
};
use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::collections::HashMap;
use std::str::FromStr;
use unic_langid::langid;

/// The product's source language, bundled with every build.
const FALLBACK_LITERAL: &str = "es";

static_loader! {
    static LOADER = {
        locales: "./locales",
        fallback_language: "es",
    };
}

/// The fallback locale tag.
pub const FALLBACK_LOCALE: &str = FALLBACK_LITERAL;

const FALLBACK_LANGUAGE: LanguageIdentifier = langid!("es");

static SUPPORTED: Lazy<Vec<LanguageIdentifier>> = Lazy::new(|| LOADER.locales().cloned().collect());

static SUPPORTED_STRINGS: Lazy<Vec<String>> = Lazy::new(|| {
    let mut locales: Vec<String> = SUPPORTED.iter().map(ToString::to_string).collect();
    locales.sort_unstable();
    locales
});

/// Fluent argument map used for message interpolation.
pub type Arguments<'a> = HashMap<Cow<'static, str>, fluent_bundle::FluentValue<'a>>;

/// Resolve localisation messages for a specific locale.
///
/// Constructed once at startup from the persisted language preference and
/// passed into the pipeline and CLI layer explicitly.
#[derive(Clone, Debug)]
pub struct Localiser {
    language: LanguageIdentifier,
    fallback_used: bool,
}

impl Localiser {
    /// Create a localiser for `locale`, falling back to [`FALLBACK_LOCALE`].
    ///
    /// Region-qualified tags degrade to their primary language when the
    /// exact tag has no bundle, so a host locale of `es-MX` still
    /// resolves Spanish.
    ///
    /// ```
    /// use proton_pass_installer::i18n::Localiser;
    ///
    /// assert_eq!(Localiser::new(Some("en")).locale(), "en");
    /// assert_eq!(Localiser::new(Some("es-MX")).locale(), "es");
    /// assert_eq!(Localiser::new(Some("zz")).locale(), "es");
    /// ```
    #[must_use]
    pub fn new(locale: Option<&str>) -> Self {
        let parsed = locale.and_then(|value| LanguageIdentifier::from_str(value).ok());

        let exact = parsed.clone().filter(is_supported);
        let primary = parsed
            .map(|identifier| {
                LanguageIdentifier::from_parts(identifier.language, None, None, &[])
            })
            .filter(is_supported);

        match exact.or(primary) {
            Some(identifier) => Self {
                language: identifier,
                fallback_used: false,
            },
            None => Self {
                language: FALLBACK_LANGUAGE.clone(),
                fallback_used: true,
            },
        }
    }

    /// Return the resolved locale as a string slice.
    ///
    /// Resolution always lands on a primary-language-only identifier,
    /// so the language subtag is the whole tag.
    #[must_use]
    pub fn locale(&self) -> &str {
        self.language.language.as_str()
    }

    /// Whether the fallback locale was used.
    #[must_use]
    pub fn used_fallback(&self) -> bool {
        self.fallback_used
    }

    /// Fetch the translated message for `key`, falling back to the key
    /// itself when the message is missing.
    #[must_use]
    pub fn text(&self, key: &str) -> String {
        self.lookup(key, None)
    }

    /// Fetch the translated message with Fluent arguments.
    #[must_use]
    pub fn text_with(&self, key: &str, args: &Arguments<'_>) -> String {
        self.lookup(key, Some(args))
    }

    fn lookup(&self, key: &str, args: Option<&Arguments<'_>>) -> String {
        let maybe_value = match args {
            Some(arguments) => LOADER.try_lookup_with_args(&self.language, key, arguments),
            None => LOADER.try_lookup(&self.language, key),
        };

        maybe_value.unwrap_or_else(|| {
            log::warn!("message `{key}` missing for locale `{}`", self.language);
            key.to_owned()
        })
    }
}

/// Build a single-argument Fluent argument map.
#[must_use]
pub fn arg<'a>(name: &'static str, value: impl Into<Cow<'a, str>>) -> Arguments<'a> {
    let mut args = Arguments::new();
    args.insert(
        Cow::Borrowed(name),
        fluent_bundle::FluentValue::from(value.into()),
    );
    args
}

fn is_supported(locale: &LanguageIdentifier) -> bool {
    SUPPORTED.iter().any(|candidate| candidate == locale)
}

/// Return a sorted slice of the bundled locales.
#[must_use]
pub fn bundled_locales() -> &'static [String] {
    SUPPORTED_STRINGS.as_slice()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, FALLBACK_LOCALE, true)]
    #[case(Some("es"), "es", false)]
    #[case(Some("en"), "en", false)]
    #[case(Some("en-GB"), "en", false)]
    #[case(Some("zz"), FALLBACK_LOCALE, true)]
    #[case(Some("not a tag"), FALLBACK_LOCALE, true)]
    fn resolves_locales(
        #[case] input: Option<&str>,
        #[case] expected: &str,
        #[case] fallback: bool,
    ) {
        let localiser = Localiser::new(input);
        assert_eq!(localiser.locale(), expected);
        assert_eq!(localiser.used_fallback(), fallback);
    }

    #[test]
    fn enumerates_bundled_locales() {
        let locales = bundled_locales();
        assert!(locales.contains(&"es".to_owned()));
        assert!(locales.contains(&"en".to_owned()));
    }

    #[test]
    fn message_lookup_differs_per_locale() {
        let spanish = Localiser::new(Some("es"));
        let english = Localiser::new(Some("en"));
        assert_ne!(spanish.text("checksum-match"), english.text("checksum-match"));
    }

    #[test]
    fn message_lookup_with_arguments_interpolates_values() {
        let localiser = Localiser::new(Some("en"));
        let message = localiser.text_with("starting-install", &arg("version", "1.32.5"));
        assert!(message.contains("1.32.5"), "message: {message}");
    }

    #[test]
    fn missing_message_falls_back_to_the_key() {
        let localiser = Localiser::new(Some("en"));
        assert_eq!(localiser.text("no-such-message"), "no-such-message");
    }
}
