//! Email infrastructure.

mod preview;
mod smtp;

pub use preview::PreviewWriter;
pub use smtp::{SmtpConfig, SmtpMailer};
