//! Outbound email.
//!
//! Delivery is best-effort from the caller's perspective: lifecycle operations
//! hand a composed [`Email`] to [`EmailSender::send_detached`], which spawns
//! the send and only logs a failure. No caller-visible operation ever blocks
//! on or fails because of delivery.

use crate::error::AppError;
use resend_rs::types::CreateEmailBaseOptions;
use resend_rs::Resend;

/// A composed message: recipient, subject, and a plain-text/HTML body pair.
#[derive(Debug, Clone)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Sends email through the Resend HTTP API.
///
/// Constructed once in `main` from [`crate::config::Config`] and injected into
/// the handlers via `web::Data`; there is one configured sender identity per
/// process.
#[derive(Clone)]
pub struct EmailSender {
    api_key: String,
    from: String,
}

impl EmailSender {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            from: from.into(),
        }
    }

    /// Composes the account-activation message sent right after registration.
    pub fn activation_email(username: &str, to: &str, activation_url: &str) -> Email {
        Email {
            to: to.to_string(),
            subject: "Account activation".to_string(),
            text: format!(
                "Hello {},\n\n\
                 Please click on the following link to activate your account:\n\n\
                 {}\n\n\
                 If you did not request this, please ignore this email.\n",
                username, activation_url
            ),
            html: format!(
                "Hello <b>{}</b>,<br><br>\
                 Please click on the following link to activate your account:<br><br>\
                 <a href=\"{}\">Activate account</a><br><br>\
                 If you did not request this, please ignore this email.<br>",
                username, activation_url
            ),
        }
    }

    /// Composes the password-recovery message carrying a reset token.
    pub fn recovery_email(username: &str, to: &str, reset_token: &str) -> Email {
        Email {
            to: to.to_string(),
            subject: "Password recovery".to_string(),
            text: format!(
                "Hello {},\n\n\
                 Use the following token to reset your password:\n\n\
                 {}\n\n\
                 If you did not request this, please ignore this email and \
                 your password will remain unchanged.\n",
                username, reset_token
            ),
            html: format!(
                "Hello <b>{}</b>,<br><br>\
                 Use the following token to reset your password:<br><br>\
                 <code>{}</code><br><br>\
                 If you did not request this, please ignore this email and \
                 your password will remain unchanged.<br>",
                username, reset_token
            ),
        }
    }

    /// Delivers a message, surfacing transport failures to the caller.
    pub async fn send(&self, email: Email) -> Result<(), AppError> {
        let resend = Resend::new(&self.api_key);
        let to = [email.to.as_str()];
        let options = CreateEmailBaseOptions::new(&self.from, to, &email.subject)
            .with_text(&email.text)
            .with_html(&email.html);

        resend
            .emails
            .send(options)
            .await
            .map_err(|e| AppError::InternalServerError(format!("Email delivery failed: {}", e)))?;

        Ok(())
    }

    /// Fire-and-forget delivery: spawns the send and logs the outcome.
    ///
    /// At-most-once, no retry. This is the only detached work in the process.
    pub fn send_detached(&self, email: Email) {
        let sender = self.clone();
        tokio::spawn(async move {
            let to = email.to.clone();
            match sender.send(email).await {
                Ok(()) => log::info!("Email sent to {}", to),
                Err(e) => log::error!("Email sending failed for {}: {}", to, e),
            }
        });
    }
}
