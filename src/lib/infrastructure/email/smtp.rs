//! SMTP mailer implementation.

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use lettre::{
    message::{
        header::{ContentType, HeaderName, HeaderValue},
        Attachment as AttachmentPart, MultiPart, SinglePart,
    },
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use rand::{distributions::Alphanumeric, Rng};
use tracing::debug;

use crate::domain::mail::{
    Attachment, AttachmentContent, MailEnvelope, Mailer, MailerError, Priority, SendReceipt,
    SenderIdentity,
};

/// SMTP configuration
#[derive(Clone, Default, Debug, Parser)]
pub struct SmtpConfig {
    /// The SMTP host
    #[clap(long, env = "SMTP_HOST", default_value = "localhost")]
    pub host: String,

    /// The SMTP port
    #[clap(long, env = "SMTP_PORT", default_value = "465")]
    pub port: u16,

    /// Connect over implicit TLS; disable for STARTTLS
    #[clap(long, env = "SMTP_SECURE", default_value = "true")]
    pub secure: bool,

    /// The SMTP username
    #[clap(long, env = "SMTP_USER")]
    pub username: Option<String>,

    /// The SMTP password
    #[clap(long, env = "SMTP_PASSWORD")]
    pub password: Option<String>,

    /// The sender display name
    #[clap(long, env = "FROM_NAME", default_value = "Postbox")]
    pub from_name: String,

    /// The sender email address
    #[clap(long, env = "FROM_EMAIL", default_value = "no-reply@example.com")]
    pub from_email: String,

    /// Verify the TLS certificate
    #[clap(long, env = "SMTP_VERIFY_TLS", default_value = "true")]
    pub verify_tls: bool,

    /// Log delivery attempts and server responses
    #[clap(long, env = "SMTP_LOGGER")]
    pub logger: bool,

    /// Log composed envelopes before delivery
    #[clap(long, env = "SMTP_DEBUG")]
    pub debug: bool,

    /// Reserved for a SendGrid transport; not read by the SMTP mailer
    #[clap(long, env = "SENDGRID_API_KEY", hide = true)]
    pub sendgrid_api_key: Option<String>,

    /// Reserved for an SES transport; not read by the SMTP mailer
    #[clap(long, env = "AWS_SES_ACCESS_KEY", hide = true)]
    pub ses_access_key: Option<String>,

    /// Reserved for an SES transport; not read by the SMTP mailer
    #[clap(long, env = "AWS_SES_SECRET_KEY", hide = true)]
    pub ses_secret_key: Option<String>,
}

impl SmtpConfig {
    /// The sender identity stamped on outgoing mail.
    pub fn sender(&self) -> SenderIdentity {
        SenderIdentity::new(&self.from_name, &self.from_email)
    }
}

/// SMTP mailer
#[derive(Debug, Default, Clone)]
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    /// Create a new SMTP mailer
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// The sender identity this mailer is configured with.
    pub fn sender(&self) -> SenderIdentity {
        self.config.sender()
    }

    /// Build the transport from the configuration.
    ///
    /// A fresh connection per send; no pooling.
    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let relay = if self.config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
        };

        let params = TlsParameters::builder(self.config.host.clone())
            .dangerous_accept_invalid_certs(!self.config.verify_tls)
            .build()?;

        let tls = if self.config.secure {
            Tls::Wrapper(params)
        } else {
            Tls::Required(params)
        };

        let relay = match (&self.config.username, &self.config.password) {
            (Some(username), Some(password)) => {
                relay.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => relay,
        };

        Ok(relay.port(self.config.port).tls(tls).build())
    }

    /// A fresh `Message-ID` under the sender's domain.
    fn message_id(&self) -> String {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();

        let domain = self
            .config
            .from_email
            .split('@')
            .nth(1)
            .unwrap_or("localhost");

        format!("<{token}@{domain}>")
    }

    /// Build the wire message from an envelope.
    async fn build_message(
        &self,
        envelope: &MailEnvelope,
        message_id: &str,
    ) -> Result<Message, MailerError> {
        let mut builder = Message::builder()
            .from(envelope.from.to_string().parse()?)
            .subject(envelope.subject.clone())
            .message_id(Some(message_id.to_string()));

        for to in envelope.to.addresses() {
            builder = builder.to(to.parse()?);
        }

        for cc in envelope.cc.addresses() {
            builder = builder.cc(cc.parse()?);
        }

        for bcc in envelope.bcc.addresses() {
            builder = builder.bcc(bcc.parse()?);
        }

        if let Some(reply_to) = &envelope.reply_to {
            builder = builder.reply_to(reply_to.parse()?);
        }

        let mut message = if envelope.attachments.is_empty() {
            match body_content(envelope) {
                BodyContent::Single(part) => builder.singlepart(part)?,
                BodyContent::Multi(part) => builder.multipart(part)?,
            }
        } else {
            let mut mixed = match body_content(envelope) {
                BodyContent::Single(part) => MultiPart::mixed().singlepart(part),
                BodyContent::Multi(part) => MultiPart::mixed().multipart(part),
            };

            for attachment in &envelope.attachments {
                mixed = mixed.singlepart(attachment_part(attachment).await?);
            }

            builder.multipart(mixed)?
        };

        let headers = message.headers_mut();

        for (name, value) in priority_headers(envelope.priority).iter().copied() {
            headers.insert_raw(HeaderValue::new(
                HeaderName::new_from_ascii_str(name),
                value.to_string(),
            ));
        }

        for (name, value) in &envelope.headers {
            let name = HeaderName::new_from_ascii(name.clone())
                .map_err(|err| MailerError::UnknownError(anyhow::anyhow!("{err}")))?;

            headers.insert_raw(HeaderValue::new(name, value.clone()));
        }

        Ok(message)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, envelope: &MailEnvelope) -> Result<SendReceipt, MailerError> {
        if self.config.debug {
            debug!(
                to = %envelope.to,
                subject = %envelope.subject,
                text_bytes = envelope.text.as_deref().map_or(0, str::len),
                html_bytes = envelope.html.as_deref().map_or(0, str::len),
                attachments = envelope.attachments.len(),
                "composed envelope"
            );
        }

        let message_id = self.message_id();
        let message = self.build_message(envelope, &message_id).await?;

        if self.config.logger {
            debug!(
                host = %self.config.host,
                port = self.config.port,
                %message_id,
                "smtp delivery attempt"
            );
        }

        match self.transport()?.send(message).await {
            Ok(response) => {
                if self.config.logger {
                    debug!(code = %response.code(), "smtp server accepted the message");
                }

                Ok(SendReceipt { message_id })
            }
            Err(e) => Err(MailerError::UnknownError(e.into())),
        }
    }
}

enum BodyContent {
    Single(SinglePart),
    Multi(MultiPart),
}

/// Pick the MIME shape the envelope's bodies call for.
fn body_content(envelope: &MailEnvelope) -> BodyContent {
    match (&envelope.text, &envelope.html) {
        (Some(text), Some(html)) => BodyContent::Multi(MultiPart::alternative_plain_html(
            text.clone(),
            html.clone(),
        )),
        (None, Some(html)) => BodyContent::Single(SinglePart::html(html.clone())),
        (Some(text), None) => BodyContent::Single(SinglePart::plain(text.clone())),
        (None, None) => BodyContent::Single(SinglePart::plain(String::new())),
    }
}

/// Read the attachment's bytes and wrap them with a guessed content type.
async fn attachment_part(attachment: &Attachment) -> Result<SinglePart, MailerError> {
    let bytes = match &attachment.content {
        AttachmentContent::Bytes(bytes) => bytes.clone(),
        AttachmentContent::Path(path) => tokio::fs::read(path)
            .await
            .map_err(|err| MailerError::UnknownError(err.into()))?,
    };

    let mime = mime_guess::from_path(&attachment.filename).first_or_octet_stream();
    let content_type = ContentType::parse(mime.as_ref())
        .map_err(|err| MailerError::UnknownError(err.into()))?;

    Ok(AttachmentPart::new(attachment.filename.clone()).body(bytes, content_type))
}

/// Priority headers as the major clients read them; normal adds none.
fn priority_headers(priority: Priority) -> &'static [(&'static str, &'static str)] {
    match priority {
        Priority::High => &[
            ("X-Priority", "1 (Highest)"),
            ("X-MSMail-Priority", "High"),
            ("Importance", "High"),
        ],
        Priority::Normal => &[],
        Priority::Low => &[
            ("X-Priority", "5 (Lowest)"),
            ("X-MSMail-Priority", "Low"),
            ("Importance", "Low"),
        ],
    }
}
