//! Report delivery

use crate::config::MailConfig;
use crate::error::{BriefingError, Result};
use crate::model::{Report, ReportFormat};
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, instrument};

/// Port that speaks TLS from the first byte; any other port uses STARTTLS
pub const IMPLICIT_TLS_PORT: u16 = 465;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn deliver(&self, report: &Report) -> Result<()>;

    fn name(&self) -> &str;
}

/// Sends the report to its own sender address over authenticated SMTP
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    mailbox: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let address = config
            .address
            .as_deref()
            .ok_or_else(|| BriefingError::ConfigError("EMAIL_ADDRESS not set".into()))?;
        let password = config
            .password
            .as_deref()
            .ok_or_else(|| BriefingError::ConfigError("EMAIL_PASSWORD not set".into()))?;

        let mailbox: Mailbox = address
            .parse()
            .map_err(|e| BriefingError::ConfigError(format!("Invalid email address: {e}")))?;

        let builder = if config.smtp_port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        }
        .map_err(|e| BriefingError::MailError(format!("SMTP transport error: {e}")))?;

        let transport = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(address.to_string(), password.to_string()))
            .build();

        Ok(Self { transport, mailbox })
    }
}

/// Build the message for a report; sender and recipient are the same mailbox
pub fn build_message(mailbox: &Mailbox, report: &Report) -> Result<Message> {
    let content_type = match report.format {
        ReportFormat::Html => ContentType::TEXT_HTML,
        ReportFormat::Text => ContentType::TEXT_PLAIN,
    };

    Message::builder()
        .from(mailbox.clone())
        .to(mailbox.clone())
        .subject(report.subject.as_str())
        .header(content_type)
        .body(report.body.clone())
        .map_err(|e| BriefingError::MailError(format!("Failed to build email: {e}")))
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip_all, fields(subject = %report.subject))]
    async fn deliver(&self, report: &Report) -> Result<()> {
        let email = build_message(&self.mailbox, report)?;

        self.transport
            .send(email)
            .await
            .map_err(|e| BriefingError::MailError(format!("Failed to send email: {e}")))?;

        info!(to = %self.mailbox.email, "report mailed");
        Ok(())
    }

    fn name(&self) -> &str {
        "smtp"
    }
}

/// Prints the report instead of sending it
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunMailer;

#[async_trait]
impl Mailer for DryRunMailer {
    async fn deliver(&self, report: &Report) -> Result<()> {
        println!("Subject: {}\nContent-Type: {}\n", report.subject, report.format);
        println!("{}", report.body);
        info!("dry run, report printed instead of mailed");
        Ok(())
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}
