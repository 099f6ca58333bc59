//! Errors of the mail pipeline.

use thiserror::Error;
use tracing::debug;

use crate::domain::mail::{content::InvalidContentError, loader::ContentLoadError};

/// Errors raised while resolving a template or its locale dictionary
#[derive(Debug, Error)]
pub enum TemplateNotFoundError {
    /// No template file exists under the requested name
    #[error("email template '{name}' not found")]
    MissingTemplate {
        /// The template name that was requested
        name: String,
    },

    /// No locale dictionary exists for the requested language
    #[error("locale '{language}' not found")]
    MissingLocale {
        /// The language that was requested
        language: String,
    },

    /// The locale dictionary exists but could not be read or parsed
    #[error("locale '{language}' could not be loaded")]
    MalformedLocale {
        /// The language that was requested
        language: String,
        /// The underlying read or parse failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Errors raised while rendering message bodies
#[derive(Debug, Error)]
pub enum RenderError {
    /// The templating engine rejected the template or its data
    #[error(transparent)]
    Template(#[from] handlebars::RenderError),

    /// The CSS inliner rejected the stylesheet or the document
    #[error(transparent)]
    CssInline(#[from] css_inline::InlineError),

    /// A shared stylesheet exists but could not be read
    #[error("stylesheet '{name}' could not be read")]
    Stylesheet {
        /// The stylesheet file name
        name: String,
        /// The underlying loader failure
        #[source]
        source: ContentLoadError,
    },
}

/// The opaque error returned when the transport could not deliver a message.
///
/// Transport detail is logged where the failure happens and deliberately kept
/// out of the error the caller sees.
#[derive(Debug, Error)]
#[error("email sending failed")]
pub struct EmailSendFailedError;

/// Errors returned by the send pipeline
#[derive(Debug, Error)]
pub enum SendError {
    /// The request did not supply exactly one valid content source
    #[error(transparent)]
    InvalidContent(InvalidContentError),

    /// A template or locale file could not be resolved
    #[error(transparent)]
    TemplateNotFound(TemplateNotFoundError),

    /// Rendering or CSS inlining failed
    #[error(transparent)]
    Render(RenderError),

    /// The transport refused the message; detail is in the log
    #[error(transparent)]
    SendFailed(EmailSendFailedError),
}

impl From<InvalidContentError> for SendError {
    fn from(value: InvalidContentError) -> Self {
        debug!("InvalidContentError -> SendError::InvalidContent: {value}");

        Self::InvalidContent(value)
    }
}

impl From<TemplateNotFoundError> for SendError {
    fn from(value: TemplateNotFoundError) -> Self {
        debug!("TemplateNotFoundError -> SendError::TemplateNotFound: {value}");

        Self::TemplateNotFound(value)
    }
}

impl From<RenderError> for SendError {
    fn from(value: RenderError) -> Self {
        debug!("RenderError -> SendError::Render: {value}");

        Self::Render(value)
    }
}

impl From<EmailSendFailedError> for SendError {
    fn from(value: EmailSendFailedError) -> Self {
        Self::SendFailed(value)
    }
}
