//! Localized HTML template rendering.

use std::sync::Arc;

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext,
    RenderErrorReason,
};
use serde_json::Value;
use tracing::debug;

use crate::domain::mail::{
    errors::{RenderError, SendError, TemplateNotFoundError},
    loader::{ContentKind, ContentLoadError, ContentLoader},
    locales::{LocaleDictionary, TemplateVariables},
};

/// Renders named HTML templates with translated placeholders.
///
/// Translation happens through a registered `t` helper covering both the
/// bare `{{t "key"}}` macro and forms with hash arguments, e.g.
/// `{{t "expiry" minutes=10}}`, where hash arguments override the ambient
/// variables. Translated text is written straight to the output and never
/// re-parsed, so a `{{var}}` token with no matching variable stays visible
/// instead of vanishing.
#[derive(Debug, Clone)]
pub struct TemplateRenderer<L>
where
    L: ContentLoader,
{
    loader: Arc<L>,
}

impl<L> TemplateRenderer<L>
where
    L: ContentLoader,
{
    /// A renderer reading templates and locales through `loader`.
    pub fn new(loader: Arc<L>) -> Self {
        Self { loader }
    }

    /// Render the template `name` for `language` with `variables`.
    ///
    /// # Arguments
    ///
    /// * `name` - The template name.
    /// * `variables` - Variables for translation and `{{var}}` interpolation.
    /// * `language` - The locale dictionary language.
    ///
    /// # Returns
    ///
    /// A [`Result`] containing the rendered HTML, or a [`SendError`] when the
    /// template or locale is missing or rendering fails.
    pub fn render(
        &self,
        name: &str,
        variables: &TemplateVariables,
        language: &str,
    ) -> Result<String, SendError> {
        let source = self
            .loader
            .load(ContentKind::Template, name)
            .map_err(|err| {
                if let ContentLoadError::Unreadable { ref source, .. } = err {
                    debug!("unreadable template '{name}': {source}");
                }

                TemplateNotFoundError::MissingTemplate {
                    name: name.to_string(),
                }
            })?;

        let dictionary = LocaleDictionary::load(self.loader.as_ref(), language)?;

        let mut handlebars = Handlebars::new();
        handlebars.register_helper("t", Box::new(TranslateHelper { dictionary }));

        let html = handlebars
            .render_template(&source, &Value::Object(variables.clone()))
            .map_err(RenderError::from)?;

        Ok(html)
    }
}

/// The `t` helper: translates its first parameter against the dictionary,
/// merging hash arguments over the ambient render variables.
struct TranslateHelper {
    dictionary: LocaleDictionary,
}

impl HelperDef for TranslateHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let key = h
            .param(0)
            .and_then(|param| param.value().as_str())
            .ok_or(RenderErrorReason::ParamNotFoundForIndex("t", 0))?;

        let mut variables = match ctx.data() {
            Value::Object(map) => map.clone(),
            _ => TemplateVariables::new(),
        };

        for (name, value) in h.hash() {
            variables.insert((*name).to_string(), value.value().clone());
        }

        // Translations are trusted content; write them unescaped so markup
        // in dictionary entries survives rendering.
        out.write(&self.dictionary.translate(key, &variables))?;

        Ok(())
    }
}
