//! Message content selection and validation.

use thiserror::Error;

use crate::domain::mail::locales::TemplateVariables;

/// The language used when a template request does not name one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Errors describing an invalid combination of content sources
#[derive(Debug, Error)]
pub enum InvalidContentError {
    /// No content source was supplied
    #[error("no email content supplied; provide text, html, or a template name")]
    NoContent,

    /// More than one content source was supplied
    #[error("{count} content sources supplied; provide exactly one of text, html, or a template name")]
    AmbiguousContent {
        /// How many content sources the request carried
        count: usize,
    },

    /// CSS was supplied without HTML to inline it into
    #[error("css supplied without html content to inline it into")]
    CssWithoutHtml,
}

/// The single content source of an outgoing message.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    /// A plain text body.
    PlainText(String),
    /// A raw HTML body with optional CSS to inline.
    HtmlCss {
        /// The HTML document.
        html: String,
        /// CSS inlined into the document before sending, if any.
        css: Option<String>,
    },
    /// A named template rendered against a locale dictionary.
    Template {
        /// The template name.
        name: String,
        /// Variables available to translation and rendering.
        variables: TemplateVariables,
        /// The locale dictionary language.
        language: String,
    },
}

impl MessageContent {
    /// Normalize optional content fields into exactly one variant.
    ///
    /// Blank fields count as absent. This runs before any file or network
    /// I/O, so an invalid request costs nothing but the check.
    ///
    /// # Arguments
    ///
    /// * `text` - Plain text body, if any.
    /// * `html` - Raw HTML body, if any.
    /// * `css` - CSS for `html`; invalid without it.
    /// * `template_name` - Named template, if any.
    /// * `variables` - Variables for translation and rendering.
    /// * `language` - Locale language; blank or absent falls back to
    ///   [`DEFAULT_LANGUAGE`].
    ///
    /// # Returns
    ///
    /// A [`Result`] containing the resolved [`MessageContent`], or an
    /// [`InvalidContentError`] when zero or several sources were supplied.
    pub fn resolve(
        text: Option<&str>,
        html: Option<&str>,
        css: Option<&str>,
        template_name: Option<&str>,
        variables: TemplateVariables,
        language: Option<&str>,
    ) -> Result<Self, InvalidContentError> {
        let text = non_blank(text);
        let html = non_blank(html);
        let css = non_blank(css);
        let template_name = non_blank(template_name);

        if css.is_some() && html.is_none() {
            return Err(InvalidContentError::CssWithoutHtml);
        }

        let count = [text.is_some(), html.is_some(), template_name.is_some()]
            .into_iter()
            .filter(|present| *present)
            .count();

        match (text, html, template_name) {
            (Some(text), None, None) => Ok(Self::PlainText(text.to_string())),
            (None, Some(html), None) => Ok(Self::HtmlCss {
                html: html.to_string(),
                css: css.map(String::from),
            }),
            (None, None, Some(name)) => Ok(Self::Template {
                name: name.to_string(),
                variables,
                language: non_blank(language)
                    .unwrap_or(DEFAULT_LANGUAGE)
                    .to_string(),
            }),
            (None, None, None) => Err(InvalidContentError::NoContent),
            _ => Err(InvalidContentError::AmbiguousContent { count }),
        }
    }
}

/// Treats empty and whitespace-only values as absent.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
