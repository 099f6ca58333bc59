//! The mail sending pipeline.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::domain::mail::{
    content::MessageContent,
    envelope::{MailEnvelope, SenderIdentity},
    errors::{EmailSendFailedError, SendError},
    loader::ContentLoader,
    locales::TemplateVariables,
    mailer::{Mailer, SendReceipt},
    request::SendRequest,
    styles::{self, Stylesheets},
    templates::TemplateRenderer,
};

/// Header asking the recipient's client to report the message as read.
const READ_RECEIPT_HEADER: &str = "Disposition-Notification-To";

/// The mail sending pipeline.
///
/// Validates that a request carries exactly one content source, renders and
/// inlines the body, composes the envelope with the configured sender
/// identity, and hands it to the injected [`Mailer`] for delivery, either
/// immediately or at a scheduled future time.
#[derive(Debug, Clone)]
pub struct MailService<M, L>
where
    M: Mailer,
    L: ContentLoader,
{
    mailer: Arc<M>,
    loader: Arc<L>,
    renderer: TemplateRenderer<L>,
    sender: SenderIdentity,
}

impl<M, L> MailService<M, L>
where
    M: Mailer,
    L: ContentLoader,
{
    /// A service delivering through `mailer`, reading content through
    /// `loader`, and sending as `sender`.
    pub fn new(mailer: Arc<M>, loader: Arc<L>, sender: SenderIdentity) -> Self {
        let renderer = TemplateRenderer::new(Arc::clone(&loader));

        Self {
            mailer,
            loader,
            renderer,
            sender,
        }
    }

    /// Send an email now.
    ///
    /// # Arguments
    ///
    /// * `request` - The [`SendRequest`] carrying recipients, subject, and
    ///   exactly one content source.
    ///
    /// # Returns
    ///
    /// A [`Result`] containing the transport's [`SendReceipt`], or a
    /// [`SendError`]. Content validation runs before any file or network
    /// I/O. Transport failures are logged here with their detail and
    /// returned as the opaque
    /// [`EmailSendFailedError`](crate::domain::mail::EmailSendFailedError).
    pub async fn send(&self, request: SendRequest) -> Result<SendReceipt, SendError> {
        let content = request.content()?;

        let (text, html) = self.render_body(content)?;
        let envelope = self.compose(&request, text, html);

        match self.mailer.send(&envelope).await {
            Ok(receipt) => {
                info!(
                    to = %envelope.to,
                    message_id = %receipt.message_id,
                    "email sent"
                );

                Ok(receipt)
            }
            Err(err) => {
                error!(
                    to = %envelope.to,
                    subject = %envelope.subject,
                    error = %err,
                    "email sending failed"
                );

                Err(EmailSendFailedError.into())
            }
        }
    }

    /// Send an email when `fire_at` comes around.
    ///
    /// Spawns a single in-process timer and returns immediately; the request
    /// goes through [`send`](Self::send) exactly once when it fires. A
    /// `fire_at` already in the past fires straight away. Jobs live only in
    /// this process: there is no persistence, no cancellation handle, and a
    /// failed deferred send is reported in the error log alone.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule(&self, fire_at: DateTime<Utc>, request: SendRequest) {
        let service = self.clone();

        tokio::spawn(async move {
            let delay = (fire_at - Utc::now()).to_std().unwrap_or_default();

            if delay.is_zero() {
                debug!(%fire_at, "scheduled time already passed, sending immediately");
            }

            sleep(delay).await;

            if let Err(err) = service.send(request).await {
                error!(%fire_at, error = %err, "scheduled email failed");
            }
        });
    }

    /// Render the template `name` exactly as a send would, including the
    /// shared stylesheets, without sending anything.
    ///
    /// # Arguments
    ///
    /// * `name` - The template name.
    /// * `variables` - Variables for translation and interpolation.
    /// * `language` - The locale dictionary language.
    ///
    /// # Returns
    ///
    /// A [`Result`] containing the inlined HTML, or a [`SendError`].
    pub fn render_template(
        &self,
        name: &str,
        variables: &TemplateVariables,
        language: &str,
    ) -> Result<String, SendError> {
        let html = self.renderer.render(name, variables, language)?;
        let shared = Stylesheets::shared(self.loader.as_ref())?;

        Ok(styles::inline(&html, &shared)?)
    }

    /// Turn resolved content into the text and HTML bodies of the envelope.
    fn render_body(
        &self,
        content: MessageContent,
    ) -> Result<(Option<String>, Option<String>), SendError> {
        match content {
            MessageContent::PlainText(text) => Ok((Some(text), None)),
            MessageContent::HtmlCss { html, css } => {
                let html = match css {
                    Some(css) => styles::inline(&html, &css)?,
                    None => html,
                };

                Ok((None, Some(html)))
            }
            MessageContent::Template {
                name,
                variables,
                language,
            } => {
                let html = self.render_template(&name, &variables, &language)?;

                Ok((None, Some(html)))
            }
        }
    }

    /// Compose the envelope. The sender identity always comes from
    /// configuration, never from the request.
    fn compose(
        &self,
        request: &SendRequest,
        text: Option<String>,
        html: Option<String>,
    ) -> MailEnvelope {
        let mut headers = Vec::new();

        if request.request_read_receipt {
            headers.push((
                READ_RECEIPT_HEADER.to_string(),
                self.sender.address.clone(),
            ));
        }

        MailEnvelope {
            from: self.sender.clone(),
            to: request.to.clone(),
            cc: request.cc.clone(),
            bcc: request.bcc.clone(),
            subject: request.subject.clone(),
            text,
            html,
            reply_to: request.reply_to.clone(),
            attachments: request.attachments.clone(),
            priority: request.priority,
            headers,
        }
    }
}
