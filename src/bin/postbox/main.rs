#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Command-line interface for sending and previewing emails

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use postbox::{
    domain::mail::{Attachment, MailService, SendRequest, TemplateCatalog, TemplateVariables},
    infrastructure::{
        content::{ContentDirConfig, FsContentLoader},
        email::{PreviewWriter, SmtpConfig, SmtpMailer},
    },
};

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The SMTP configuration
    #[clap(flatten)]
    pub smtp: SmtpConfig,

    /// The content directory configuration
    #[clap(flatten)]
    pub content: ContentDirConfig,

    /// The directory preview files are written to
    #[clap(long, env = "PREVIEW_DIR", default_value = "email-previews")]
    pub preview_dir: PathBuf,

    /// The action to run
    #[clap(subcommand)]
    pub command: Command,
}

/// Actions
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the known templates and the variables they require
    Templates,

    /// Render a template to a local preview file without sending
    Preview {
        /// The template name
        #[clap(long)]
        template: String,

        /// Template variables as a JSON object
        #[clap(long, default_value = "{}")]
        variables: String,

        /// The locale language
        #[clap(long, default_value = "en")]
        language: String,

        /// The subject, used for the preview file name
        #[clap(long, default_value = "preview")]
        subject: String,
    },

    /// Send a single email
    Send {
        /// A recipient address; repeat for several
        #[clap(long, required = true)]
        to: Vec<String>,

        /// A carbon-copy address; repeat for several
        #[clap(long)]
        cc: Vec<String>,

        /// A blind-carbon-copy address; repeat for several
        #[clap(long)]
        bcc: Vec<String>,

        /// The subject line
        #[clap(long)]
        subject: String,

        /// Plain text content
        #[clap(long)]
        text: Option<String>,

        /// Raw HTML content
        #[clap(long)]
        html: Option<String>,

        /// A CSS file inlined into the HTML content
        #[clap(long)]
        css_file: Option<PathBuf>,

        /// A named template to render as the content
        #[clap(long)]
        template: Option<String>,

        /// Template variables as a JSON object
        #[clap(long, default_value = "{}")]
        variables: String,

        /// The locale language for template rendering
        #[clap(long, default_value = "en")]
        language: String,

        /// The Reply-To address
        #[clap(long)]
        reply_to: Option<String>,

        /// Delivery priority: high, normal, or low
        #[clap(long, default_value = "normal")]
        priority: String,

        /// A file to attach; repeat for several
        #[clap(long)]
        attach: Vec<PathBuf>,

        /// Ask the recipient's client for a read receipt
        #[clap(long)]
        read_receipt: bool,
    },
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let Args {
        smtp,
        content,
        preview_dir,
        command,
    } = Args::parse();

    let loader = Arc::new(FsContentLoader::from_config(&content));
    let sender = smtp.sender();
    let service = MailService::new(Arc::new(SmtpMailer::new(smtp)), loader, sender);

    match command {
        Command::Templates => {
            for name in TemplateCatalog::names() {
                if let Some(info) = TemplateCatalog::info(name) {
                    println!("{name}: {}", info.required_variables.join(", "));
                }
            }
        }

        Command::Preview {
            template,
            variables,
            language,
            subject,
        } => {
            let variables = parse_variables(&variables)?;

            check_template_variables(&template, &variables)?;

            let html = service.render_template(&template, &variables, &language)?;
            let path = PreviewWriter::new(&preview_dir).write(&subject, &html)?;

            println!("Preview written to {}", path.display());
        }

        Command::Send {
            to,
            cc,
            bcc,
            subject,
            text,
            html,
            css_file,
            template,
            variables,
            language,
            reply_to,
            priority,
            attach,
            read_receipt,
        } => {
            let variables = parse_variables(&variables)?;

            if let Some(template) = &template {
                check_template_variables(template, &variables)?;
            }

            let css = match css_file {
                Some(path) => Some(fs::read_to_string(path)?),
                None => None,
            };

            let mut attachments = Vec::new();

            for path in &attach {
                attachments.push(attachment_from_path(path)?);
            }

            let request = SendRequest {
                to: to.into_iter().collect(),
                cc: cc.into_iter().collect(),
                bcc: bcc.into_iter().collect(),
                subject,
                text,
                html,
                css,
                reply_to,
                attachments,
                priority: priority.parse()?,
                request_read_receipt: read_receipt,
                template_name: template,
                variables,
                language: Some(language),
            };

            let receipt = service.send(request).await?;

            println!("Sent {}", receipt.message_id);
        }
    }

    Ok(())
}

/// Parse the `--variables` JSON object.
fn parse_variables(raw: &str) -> Result<TemplateVariables> {
    serde_json::from_str(raw).context("--variables must be a JSON object")
}

/// Fail early when a registered template is missing required variables.
fn check_template_variables(name: &str, variables: &TemplateVariables) -> Result<()> {
    if let Some(info) = TemplateCatalog::info(name) {
        let missing = info.missing_variables(variables);

        if !missing.is_empty() {
            bail!("template '{name}' requires variables: {}", missing.join(", "));
        }
    }

    Ok(())
}

/// An attachment read from `path`, named after its file name.
fn attachment_from_path(path: &Path) -> Result<Attachment> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("attachment path '{}' has no file name", path.display()))?;

    Ok(Attachment::from_path(filename, path))
}
