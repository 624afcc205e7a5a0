use std::sync::Arc;

use crate::email::templates;
use crate::email::{MailAttachment, MailDispatcher, MailError, OutgoingMail};
use crate::qr::{QrEncoder, QrError};

/// Form data for one registration. Never persisted.
#[derive(Debug, Clone)]
pub struct Registrant {
    pub surname: String,
    pub name: String,
    pub email: String,
    /// Client-side id, the form sends its submission time in milliseconds.
    pub id: Option<String>,
}

impl Registrant {
    /// Human-readable text encoded into the QR code.
    pub fn payload(&self) -> String {
        let mut payload = format!(
            "Surname: {}, Name: {}, Email: {}",
            self.surname, self.name, self.email
        );
        if let Some(id) = &self.id {
            payload.push_str(&format!(", ID: {id}"));
        }
        payload
    }
}

#[derive(Debug)]
pub enum RegistrationError {
    Encode(QrError),
    Mail(MailError),
}

impl std::fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationError::Encode(err) => write!(f, "{err}"),
            RegistrationError::Mail(err) => write!(f, "{err}"),
        }
    }
}

impl From<QrError> for RegistrationError {
    fn from(err: QrError) -> Self {
        RegistrationError::Encode(err)
    }
}

impl From<MailError> for RegistrationError {
    fn from(err: MailError) -> Self {
        RegistrationError::Mail(err)
    }
}

/// Encodes a registrant's details as a QR code and mails it to them.
#[derive(Clone)]
pub struct RegistrationService {
    encoder: Arc<dyn QrEncoder>,
    mailer: Arc<dyn MailDispatcher>,
}

impl RegistrationService {
    pub fn new(encoder: Arc<dyn QrEncoder>, mailer: Arc<dyn MailDispatcher>) -> Self {
        Self { encoder, mailer }
    }

    pub async fn register(&self, registrant: &Registrant) -> Result<(), RegistrationError> {
        let png = self.encoder.encode_png(&registrant.payload())?;
        let html = templates::render_registration_html(&registrant.name, &registrant.surname)?;

        let mail = OutgoingMail {
            to: registrant.email.clone(),
            subject: templates::REGISTRATION_SUBJECT.to_string(),
            text: templates::render_registration_text(&registrant.name, &registrant.surname),
            html,
            attachment: MailAttachment {
                filename: "qrcode.png".to_string(),
                content_type: "image/png".to_string(),
                content: png,
            },
        };

        self.mailer.send(mail).await?;
        Ok(())
    }
}
