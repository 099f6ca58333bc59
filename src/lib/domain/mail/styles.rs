//! Stylesheet merging and CSS inlining.

use css_inline::CSSInliner;
use tracing::debug;

use crate::domain::mail::{
    errors::RenderError,
    loader::{ContentKind, ContentLoadError, ContentLoader},
};

/// Shared stylesheet files merged into every template render, in cascade
/// order. Later files win conflicting declarations.
pub const SHARED_STYLESHEETS: [&str; 4] = [
    "base.css",
    "responsive.css",
    "theme.css",
    "email-variables.css",
];

/// Assembles stylesheet sources for the inliner.
#[derive(Debug)]
pub struct Stylesheets;

impl Stylesheets {
    /// Concatenate stylesheet sources in cascade order, dropping blanks.
    pub fn merge<I, S>(sources: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut merged = String::new();

        for source in sources {
            let source = source.as_ref();

            if source.trim().is_empty() {
                continue;
            }

            if !merged.is_empty() {
                merged.push('\n');
            }

            merged.push_str(source);
        }

        merged
    }

    /// Load and merge the [`SHARED_STYLESHEETS`].
    ///
    /// A sheet the loader cannot find is skipped, so a content directory may
    /// ship any subset of the shared set. A sheet that exists but cannot be
    /// read fails the render.
    pub fn shared<L>(loader: &L) -> Result<String, RenderError>
    where
        L: ContentLoader,
    {
        let mut sheets = Vec::new();

        for name in SHARED_STYLESHEETS {
            match loader.load(ContentKind::Stylesheet, name) {
                Ok(sheet) => sheets.push(sheet),
                Err(ContentLoadError::NotFound { .. }) => {
                    debug!(stylesheet = name, "shared stylesheet absent, skipping");
                }
                Err(source) => {
                    return Err(RenderError::Stylesheet {
                        name: name.to_string(),
                        source,
                    });
                }
            }
        }

        Ok(Self::merge(sheets))
    }
}

/// Inline `css` into `html` as per-element `style` attributes.
///
/// Blank CSS returns the HTML unchanged. `<style>` blocks inside the
/// document are inlined and stripped as well; remote stylesheet references
/// are never fetched.
pub fn inline(html: &str, css: &str) -> Result<String, RenderError> {
    if css.trim().is_empty() {
        return Ok(html.to_string());
    }

    let inliner = CSSInliner::options()
        .load_remote_stylesheets(false)
        .extra_css(Some(css.into()))
        .build();

    Ok(inliner.inline(html)?)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::domain::mail::tests::MockContentLoader;

    fn squashed(html: &str) -> String {
        html.replace([' ', '\n'], "")
    }

    #[test]
    fn test_inline_moves_css_onto_elements() -> TestResult {
        let html = "<html><body><p>hello</p></body></html>";

        let inlined = inline(html, "p { color: red }")?;

        assert!(squashed(&inlined).contains("color:red"));
        assert!(inlined.contains("<p style="));

        Ok(())
    }

    #[test]
    fn test_inline_blank_css_returns_html_unchanged() -> TestResult {
        let html = "<p>hello</p>";

        assert_eq!(inline(html, "   ")?, html);

        Ok(())
    }

    #[test]
    fn test_inline_strips_style_blocks() -> TestResult {
        let html = "<html><head><style>p { color: red }</style></head>\
                    <body><p>hello</p></body></html>";

        let inlined = inline(html, "p { font-weight: bold }")?;

        assert!(!inlined.contains("<style>"));
        assert!(squashed(&inlined).contains("color:red"));
        assert!(squashed(&inlined).contains("font-weight:bold"));

        Ok(())
    }

    #[test]
    fn test_inline_later_sources_win_conflicts() -> TestResult {
        let css = Stylesheets::merge(["p { color: blue }", "p { color: red }"]);

        let inlined = inline("<html><body><p>hello</p></body></html>", &css)?;

        assert!(squashed(&inlined).contains("color:red"));
        assert!(!squashed(&inlined).contains("color:blue"));

        Ok(())
    }

    #[test]
    fn test_merge_drops_blank_sources() {
        let merged = Stylesheets::merge(["", "p { color: red }", "  \n"]);

        assert_eq!(merged, "p { color: red }");
    }

    #[test]
    fn test_shared_skips_missing_sheets() -> TestResult {
        let mut loader = MockContentLoader::new();

        loader.expect_load().returning(|kind, name| {
            if name == "base.css" {
                Ok("p { color: red }".to_string())
            } else {
                Err(ContentLoadError::NotFound {
                    kind,
                    name: name.to_string(),
                })
            }
        });

        let shared = Stylesheets::shared(&loader)?;

        assert_eq!(shared, "p { color: red }");

        Ok(())
    }

    #[test]
    fn test_shared_fails_on_unreadable_sheet() {
        let mut loader = MockContentLoader::new();

        loader.expect_load().returning(|kind, name| {
            Err(ContentLoadError::Unreadable {
                kind,
                name: name.to_string(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        });

        let result = Stylesheets::shared(&loader);

        assert!(matches!(
            result,
            Err(RenderError::Stylesheet { name, .. }) if name == "base.css"
        ));
    }
}
