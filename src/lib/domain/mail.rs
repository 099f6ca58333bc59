//! Mail sending: content validation, localized template rendering, CSS
//! inlining, and transport dispatch.

mod catalog;
mod content;
mod envelope;
mod errors;
mod loader;
mod locales;
mod mailer;
mod request;
mod service;
mod styles;
mod templates;

pub use catalog::{TemplateCatalog, TemplateInfo};
pub use content::{InvalidContentError, MessageContent, DEFAULT_LANGUAGE};
pub use envelope::{
    Attachment, AttachmentContent, MailEnvelope, ParsePriorityError, Priority, Recipients,
    SenderIdentity,
};
pub use errors::{EmailSendFailedError, RenderError, SendError, TemplateNotFoundError};
pub use loader::{ContentKind, ContentLoadError, ContentLoader};
pub use locales::{LocaleDictionary, TemplateVariables};
pub use mailer::{Mailer, MailerError, SendReceipt};
pub use request::SendRequest;
pub use service::MailService;
pub use styles::{Stylesheets, SHARED_STYLESHEETS};
pub use templates::TemplateRenderer;

#[cfg(test)]
pub mod tests {
    pub use super::loader::MockContentLoader;
    pub use super::mailer::MockMailer;
}
