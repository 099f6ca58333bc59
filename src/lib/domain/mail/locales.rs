//! Locale dictionaries and placeholder translation.

use std::collections::HashMap;

use serde_json::Value;

use crate::domain::mail::{
    errors::TemplateNotFoundError,
    loader::{ContentKind, ContentLoadError, ContentLoader},
};

/// Variables available to translation and template rendering.
pub type TemplateVariables = serde_json::Map<String, Value>;

/// A per-language lookup table mapping translation keys to template strings.
///
/// Dictionaries are flat JSON objects with string values. Each send loads the
/// dictionary it needs; nothing is cached across sends, so edited locale
/// files take effect on the next send.
#[derive(Debug, Clone)]
pub struct LocaleDictionary {
    language: String,
    entries: HashMap<String, String>,
}

impl LocaleDictionary {
    /// Load and parse the dictionary for `language`.
    ///
    /// # Arguments
    ///
    /// * `loader` - The [`ContentLoader`] resolving the locale file.
    /// * `language` - The language code, e.g. `en`.
    ///
    /// # Returns
    ///
    /// A [`Result`] containing the dictionary, or a [`TemplateNotFoundError`]
    /// when the locale file is absent or malformed.
    pub fn load<L>(loader: &L, language: &str) -> Result<Self, TemplateNotFoundError>
    where
        L: ContentLoader,
    {
        let raw = loader
            .load(ContentKind::Locale, language)
            .map_err(|err| match err {
                ContentLoadError::NotFound { .. } => TemplateNotFoundError::MissingLocale {
                    language: language.to_string(),
                },
                ContentLoadError::Unreadable { source, .. } => {
                    TemplateNotFoundError::MalformedLocale {
                        language: language.to_string(),
                        source: source.into(),
                    }
                }
            })?;

        let entries = serde_json::from_str(&raw).map_err(|err| {
            TemplateNotFoundError::MalformedLocale {
                language: language.to_string(),
                source: err.into(),
            }
        })?;

        Ok(Self {
            language: language.to_string(),
            entries,
        })
    }

    /// The language code this dictionary was loaded for.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Look up `key` and substitute its `{{name}}` placeholders from
    /// `variables`.
    ///
    /// A key with no dictionary entry falls back to the key itself, so an
    /// incomplete dictionary degrades to visible-but-untranslated text rather
    /// than an error.
    pub fn translate(&self, key: &str, variables: &TemplateVariables) -> String {
        let entry = self.entries.get(key).map_or(key, String::as_str);

        substitute(entry, variables)
    }
}

/// Replace every occurrence of each `{{name}}` token with the matching
/// variable. Tokens with no matching variable are left in place.
fn substitute(text: &str, variables: &TemplateVariables) -> String {
    let mut out = text.to_string();

    for (name, value) in variables {
        let token = format!("{{{{{name}}}}}");

        if out.contains(&token) {
            out = out.replace(&token, &variable_text(value));
        }
    }

    out
}

/// Renders a variable for interpolation. Strings render bare, everything
/// else renders as compact JSON.
fn variable_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;
    use crate::domain::mail::tests::MockContentLoader;

    fn variables(value: Value) -> TemplateVariables {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test variables must be a JSON object"),
        }
    }

    fn dictionary_loader(body: &str) -> MockContentLoader {
        let body = body.to_string();
        let mut loader = MockContentLoader::new();

        loader
            .expect_load()
            .withf(|kind, _| *kind == ContentKind::Locale)
            .returning(move |_, _| Ok(body.clone()));

        loader
    }

    #[test]
    fn test_translate_replaces_every_occurrence() -> TestResult {
        let loader = dictionary_loader(r#"{"repeat": "{{name}} and {{name}} again"}"#);
        let dictionary = LocaleDictionary::load(&loader, "en")?;

        let translated = dictionary.translate("repeat", &variables(json!({ "name": "Dan" })));

        assert_eq!(translated, "Dan and Dan again");

        Ok(())
    }

    #[test]
    fn test_translate_is_idempotent_once_tokens_are_resolved() -> TestResult {
        let loader = dictionary_loader(r#"{"repeat": "{{name}} and {{name}} again"}"#);
        let dictionary = LocaleDictionary::load(&loader, "en")?;
        let variables = variables(json!({ "name": "Dan" }));

        let translated = dictionary.translate("repeat", &variables);

        assert!(!translated.contains("{{"));
        assert_eq!(dictionary.translate(&translated, &variables), translated);

        Ok(())
    }

    #[test]
    fn test_translate_missing_key_falls_back_to_key() -> TestResult {
        let loader = dictionary_loader("{}");
        let dictionary = LocaleDictionary::load(&loader, "en")?;

        let translated = dictionary.translate("greeting", &TemplateVariables::new());

        assert_eq!(translated, "greeting");

        Ok(())
    }

    #[test]
    fn test_translate_fallback_key_still_interpolates() -> TestResult {
        let loader = dictionary_loader("{}");
        let dictionary = LocaleDictionary::load(&loader, "en")?;

        let translated =
            dictionary.translate("Hello {{name}}", &variables(json!({ "name": "Dan" })));

        assert_eq!(translated, "Hello Dan");

        Ok(())
    }

    #[test]
    fn test_translate_renders_non_string_variables() -> TestResult {
        let loader = dictionary_loader(r#"{"otp_line": "Your code is {{otp}} ({{valid}})"}"#);
        let dictionary = LocaleDictionary::load(&loader, "en")?;

        let translated = dictionary.translate(
            "otp_line",
            &variables(json!({ "otp": 1234, "valid": true })),
        );

        assert_eq!(translated, "Your code is 1234 (true)");

        Ok(())
    }

    #[test]
    fn test_translate_leaves_unknown_tokens_in_place() -> TestResult {
        let loader = dictionary_loader(r#"{"greeting": "Hi {{name}}"}"#);
        let dictionary = LocaleDictionary::load(&loader, "en")?;

        let translated = dictionary.translate("greeting", &TemplateVariables::new());

        assert_eq!(translated, "Hi {{name}}");

        Ok(())
    }

    #[test]
    fn test_load_missing_locale() {
        let mut loader = MockContentLoader::new();

        loader.expect_load().returning(|kind, name| {
            Err(ContentLoadError::NotFound {
                kind,
                name: name.to_string(),
            })
        });

        let result = LocaleDictionary::load(&loader, "fr");

        assert!(matches!(
            result,
            Err(TemplateNotFoundError::MissingLocale { language }) if language == "fr"
        ));
    }

    #[test]
    fn test_load_rejects_malformed_locale() {
        let loader = dictionary_loader(r#"{"nested": {"not": "flat"}}"#);

        let result = LocaleDictionary::load(&loader, "en");

        assert!(matches!(
            result,
            Err(TemplateNotFoundError::MalformedLocale { language, .. }) if language == "en"
        ));
    }

    #[test]
    fn test_substitute_without_variables_is_identity() {
        let text = "no placeholders here";

        assert_eq!(substitute(text, &TemplateVariables::new()), text);
    }
}
