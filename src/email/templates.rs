use askama::Template;

use super::MailError;

pub const REGISTRATION_SUBJECT: &str = "Your QR code";

#[derive(Template)]
#[template(path = "email/registration.html")]
struct RegistrationMail<'a> {
    name: &'a str,
    surname: &'a str,
}

pub fn render_registration_text(name: &str, surname: &str) -> String {
    format!("Hello, {name} {surname}! Your QR code is attached.")
}

pub fn render_registration_html(name: &str, surname: &str) -> Result<String, MailError> {
    RegistrationMail { name, surname }
        .render()
        .map_err(|e| MailError::from(format!("Template error: {e}")))
}
