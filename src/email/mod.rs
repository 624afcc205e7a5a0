pub mod oauth;
pub mod templates;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, MultiPart};
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{MailConfig, OAuthConfig};
use oauth::TokenProvider;

#[derive(Debug, Clone)]
pub struct MailAttachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
    pub attachment: MailAttachment,
}

#[derive(Debug)]
pub struct MailError {
    pub message: String,
}

impl std::fmt::Display for MailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<String> for MailError {
    fn from(s: String) -> Self {
        MailError { message: s }
    }
}

impl From<&str> for MailError {
    fn from(s: &str) -> Self {
        MailError {
            message: s.to_string(),
        }
    }
}

/// Delivers one email. Success means the relay accepted the message.
#[async_trait]
pub trait MailDispatcher: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

/// SMTP relay authenticated with XOAUTH2.
pub struct OAuthMailer {
    tokens: TokenProvider,
    config: MailConfig,
}

impl OAuthMailer {
    pub fn new(oauth: &OAuthConfig, config: &MailConfig) -> Result<Self, String> {
        let tokens = TokenProvider::new(oauth.clone(), config.timeout)?;
        Ok(Self {
            tokens,
            config: config.clone(),
        })
    }

    fn build_message(&self, mail: OutgoingMail) -> Result<Message, String> {
        let content_type = ContentType::parse(&mail.attachment.content_type)
            .map_err(|e| format!("Invalid attachment content type: {e}"))?;
        let attachment = Attachment::new(mail.attachment.filename)
            .body(mail.attachment.content, content_type);

        Message::builder()
            .from(
                self.config
                    .from
                    .parse()
                    .map_err(|e| format!("Invalid from address: {e}"))?,
            )
            .to(mail
                .to
                .parse()
                .map_err(|e| format!("Invalid to address: {e}"))?)
            .subject(mail.subject)
            .multipart(
                MultiPart::mixed()
                    .multipart(MultiPart::alternative_plain_html(mail.text, mail.html))
                    .singlepart(attachment),
            )
            .map_err(|e| format!("Failed to build email: {e}"))
    }

    fn transport(&self, access_token: String) -> Result<AsyncSmtpTransport<Tokio1Executor>, String> {
        let creds = Credentials::new(self.config.from.clone(), access_token);

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
            .map_err(|e| format!("SMTP relay error: {e}"))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .authentication(vec![Mechanism::Xoauth2])
            .timeout(Some(self.config.timeout))
            .build();

        Ok(transport)
    }
}

#[async_trait]
impl MailDispatcher for OAuthMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let to = mail.to.clone();
        let message = self.build_message(mail)?;

        let access_token = self
            .tokens
            .access_token()
            .await
            .map_err(|e| MailError::from(format!("Failed to obtain access token: {e}")))?;

        self.transport(access_token)?
            .send(message)
            .await
            .map_err(|e| MailError::from(format!("Failed to send email: {e}")))?;

        tracing::info!("Email sent to {to}");
        Ok(())
    }
}
