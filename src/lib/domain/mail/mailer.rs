//! Mail transport capability.

use async_trait::async_trait;
use lettre::address::AddressError;
use thiserror::Error;
use tracing::debug;

#[cfg(test)]
use mockall::mock;

use crate::domain::mail::envelope::MailEnvelope;

/// Transport-level failure detail.
///
/// Logged by [`MailService`](crate::domain::mail::MailService) and collapsed
/// into the opaque
/// [`EmailSendFailedError`](crate::domain::mail::EmailSendFailedError) before
/// reaching callers.
#[derive(Debug, Error)]
pub enum MailerError {
    /// The transport rejected or failed to deliver the message
    #[error("An error occurred while sending the email")]
    SendError,

    /// An address on the envelope could not be parsed
    #[error("Invalid email address")]
    InvalidEmail,

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for MailerError {
    fn from(value: anyhow::Error) -> Self {
        Self::UnknownError(value)
    }
}

impl From<AddressError> for MailerError {
    fn from(value: AddressError) -> Self {
        debug!("AddressError -> MailerError::InvalidEmail: {value}");

        Self::InvalidEmail
    }
}

impl From<lettre::error::Error> for MailerError {
    fn from(value: lettre::error::Error) -> Self {
        debug!("lettre::error::Error -> MailerError::UnknownError: {value}");

        Self::UnknownError(value.into())
    }
}

/// Identifiers assigned when the transport accepts a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    /// The Message-ID stamped on the outgoing message.
    pub message_id: String,
}

/// Mail transport capability
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Deliver a composed envelope.
    ///
    /// # Arguments
    ///
    /// * `envelope` - The [`MailEnvelope`] to deliver.
    ///
    /// # Returns
    ///
    /// A [`Result`] containing the [`SendReceipt`] the transport assigned, or
    /// a [`MailerError`] describing the failure.
    async fn send(&self, envelope: &MailEnvelope) -> Result<SendReceipt, MailerError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Clone for Mailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Mailer for Mailer {
        async fn send(&self, envelope: &MailEnvelope) -> Result<SendReceipt, MailerError>;
    }
}
