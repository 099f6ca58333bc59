#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Transactional email sending with localized templates.
//!
//! A message supplies exactly one content source: plain text, raw HTML with
//! optional CSS, or a named template rendered against a per-language locale
//! dictionary. Messages go out through an injected SMTP transport, either
//! immediately or at a scheduled future time.

pub mod domain;
pub mod infrastructure;
