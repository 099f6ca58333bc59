//! Send request options.

use serde::Deserialize;

use crate::domain::mail::{
    content::{InvalidContentError, MessageContent},
    envelope::{Attachment, Priority, Recipients},
    locales::TemplateVariables,
};

/// Options for a single send.
///
/// Exactly one content source must be supplied: `text`, `html` with optional
/// `css`, or `template_name` with `variables` and `language`. There is no
/// sender field; the sender identity always comes from configuration.
///
/// Unset fields default to empty, so requests read well with struct update
/// syntax:
///
/// ```
/// use postbox::domain::mail::SendRequest;
///
/// let request = SendRequest {
///     to: "dan@example.com".into(),
///     subject: "Welcome".to_string(),
///     text: Some("Glad to have you aboard.".to_string()),
///     ..SendRequest::default()
/// };
/// ```
///
/// Requests also deserialize from JSON with the same defaults, so a stored
/// or piped request only names the fields it sets.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SendRequest {
    /// Primary recipients.
    pub to: Recipients,
    /// Carbon-copy recipients.
    pub cc: Recipients,
    /// Blind-carbon-copy recipients.
    pub bcc: Recipients,
    /// Subject line.
    pub subject: String,
    /// Plain text content source.
    pub text: Option<String>,
    /// Raw HTML content source.
    pub html: Option<String>,
    /// CSS inlined into `html`; invalid without it.
    pub css: Option<String>,
    /// Reply-To address.
    pub reply_to: Option<String>,
    /// Attachments in submission order.
    pub attachments: Vec<Attachment>,
    /// Delivery priority.
    pub priority: Priority,
    /// Ask the recipient's client to send a read receipt.
    pub request_read_receipt: bool,
    /// Named template content source.
    pub template_name: Option<String>,
    /// Variables for translation and template rendering.
    pub variables: TemplateVariables,
    /// Locale language for template rendering; defaults to `en`.
    pub language: Option<String>,
}

impl SendRequest {
    /// Normalize the content fields into exactly one [`MessageContent`].
    ///
    /// # Returns
    ///
    /// A [`Result`] containing the resolved content, or an
    /// [`InvalidContentError`] when zero or several sources were supplied.
    pub fn content(&self) -> Result<MessageContent, InvalidContentError> {
        MessageContent::resolve(
            self.text.as_deref(),
            self.html.as_deref(),
            self.css.as_deref(),
            self.template_name.as_deref(),
            self.variables.clone(),
            self.language.as_deref(),
        )
    }
}
