use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use postbox::{
    domain::mail::{MailService, SendRequest, TemplateVariables},
    infrastructure::{
        content::{ContentDirConfig, FsContentLoader},
        email::{SmtpConfig, SmtpMailer},
    },
};
use serde_json::json;

#[derive(Parser)]
pub struct Args {
    #[clap(flatten)]
    pub smtp: SmtpConfig,

    #[clap(flatten)]
    pub content: ContentDirConfig,
}

#[tokio::main]
pub async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let loader = Arc::new(FsContentLoader::from_config(&args.content));
    let sender = args.smtp.sender();
    let service = MailService::new(Arc::new(SmtpMailer::new(args.smtp)), loader, sender);

    let mut variables = TemplateVariables::new();
    variables.insert("name".to_string(), json!("Dan"));
    variables.insert("otp".to_string(), json!("493021"));

    let receipt = service
        .send(SendRequest {
            to: "dan@example.com".into(),
            subject: "Your one-time code".to_string(),
            template_name: Some("otp".to_string()),
            variables,
            ..SendRequest::default()
        })
        .await?;

    println!("Sent with Message-ID: {}", receipt.message_id);

    Ok(())
}
