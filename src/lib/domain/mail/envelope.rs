//! Envelope types handed to the mail transport.

use std::{fmt, path::PathBuf, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

/// The sender identity stamped on every outgoing message.
///
/// Always comes from configuration; callers cannot override it per send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderIdentity {
    /// Display name.
    pub name: String,
    /// Email address.
    pub address: String,
}

impl SenderIdentity {
    /// A sender identity from a display name and an address.
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

impl fmt::Display for SenderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.address)
    }
}

/// One or more recipient addresses for a single header.
///
/// Deserializes from either a single address string or a list of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "OneOrMany")]
pub struct Recipients(Vec<String>);

impl Recipients {
    /// No recipients.
    pub fn none() -> Self {
        Self::default()
    }

    /// The addresses in submission order.
    pub fn addresses(&self) -> &[String] {
        &self.0
    }

    /// Whether any address is present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Recipients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

impl From<&str> for Recipients {
    fn from(address: &str) -> Self {
        Self(vec![address.to_string()])
    }
}

impl From<String> for Recipients {
    fn from(address: String) -> Self {
        Self(vec![address])
    }
}

impl From<Vec<String>> for Recipients {
    fn from(addresses: Vec<String>) -> Self {
        Self(addresses)
    }
}

impl<const N: usize> From<[&str; N]> for Recipients {
    fn from(addresses: [&str; N]) -> Self {
        Self(addresses.iter().map(ToString::to_string).collect())
    }
}

impl FromIterator<String> for Recipients {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The JSON shape of [`Recipients`].
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Recipients {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(address) => Self::from(address),
            OneOrMany::Many(addresses) => Self(addresses),
        }
    }
}

/// Delivery priority, mapped to priority headers by the transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Urgent delivery hint.
    High,
    /// No priority headers at all.
    #[default]
    Normal,
    /// Background delivery hint.
    Low,
}

/// The error returned when parsing an unrecognised priority
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown priority '{0}'; use high, normal, or low")]
pub struct ParsePriorityError(String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "normal" => Ok(Self::Normal),
            "low" => Ok(Self::Low),
            _ => Err(ParsePriorityError(value.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Normal => write!(f, "normal"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// A file attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Attachment {
    /// File name shown to the recipient; also drives content type guessing.
    pub filename: String,
    /// The attachment payload.
    pub content: AttachmentContent,
}

/// Where an attachment's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentContent {
    /// Bytes carried inline with the request.
    Bytes(Vec<u8>),
    /// A path the transport reads at send time.
    Path(PathBuf),
}

impl Attachment {
    /// An attachment carrying its bytes inline.
    pub fn from_bytes(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: AttachmentContent::Bytes(bytes.into()),
        }
    }

    /// An attachment read from `path` when the message is sent.
    pub fn from_path(filename: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            content: AttachmentContent::Path(path.into()),
        }
    }
}

/// A fully composed message, built fresh for every send.
#[derive(Debug, Clone, PartialEq)]
pub struct MailEnvelope {
    /// The configured sender identity.
    pub from: SenderIdentity,
    /// Primary recipients.
    pub to: Recipients,
    /// Carbon-copy recipients.
    pub cc: Recipients,
    /// Blind-carbon-copy recipients.
    pub bcc: Recipients,
    /// Subject line.
    pub subject: String,
    /// Plain text body, when the content source was plain text.
    pub text: Option<String>,
    /// HTML body, when the content source was HTML or a template.
    pub html: Option<String>,
    /// Reply-To address, if any.
    pub reply_to: Option<String>,
    /// Attachments in submission order.
    pub attachments: Vec<Attachment>,
    /// Delivery priority.
    pub priority: Priority,
    /// Extra headers as name and value pairs.
    pub headers: Vec<(String, String)>,
}
