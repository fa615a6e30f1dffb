//! Transactional email over SMTP.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::AsyncSmtpTransport;
use lettre::AsyncTransport;
use lettre::Message;
use lettre::Tokio1Executor;

use crate::config::MailConfig;
use crate::domain::user::models::EmailAddress;
use crate::user::errors::MailerError;
use crate::user::ports::Mailer;

const VERIFY_SUBJECT: &str = "Verify your email address";
const RESET_SUBJECT: &str = "Reset your password";
const LOGIN_SUBJECT: &str = "New login to your account";

fn verify_body(link: &str) -> String {
    format!(
        "Welcome!\n\nPlease confirm your email address by opening the link below:\n\n{link}\n\n\
         If you did not create an account, you can ignore this message.\n"
    )
}

fn reset_body(link: &str) -> String {
    format!(
        "A password reset was requested for your account.\n\n\
         Open the link below to choose a new password:\n\n{link}\n\n\
         If you did not request a reset, you can ignore this message.\n"
    )
}

fn login_body(to: &EmailAddress) -> String {
    format!(
        "Hello,\n\nA new login to the account {to} was just recorded.\n\n\
         If this was not you, reset your password right away.\n"
    )
}

/// SMTP mailer sending plain-text messages.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build the SMTP transport from configuration.
    ///
    /// With credentials the connection is upgraded with STARTTLS; without
    /// them a plain connection is used (local relays and test catchers).
    ///
    /// # Errors
    /// * `BuildFailed` - Invalid sender address or relay host
    pub fn new(config: &MailConfig) -> Result<Self, MailerError> {
        let from: Mailbox = config
            .from_address
            .parse()
            .map_err(|e| MailerError::BuildFailed(format!("invalid from address: {}", e)))?;

        let transport = match (&config.smtp_username, &config.smtp_password) {
            (Some(username), Some(password)) => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                    .map_err(|e| MailerError::BuildFailed(e.to_string()))?
                    .port(config.smtp_port)
                    .credentials(Credentials::new(username.clone(), password.clone()))
                    .build()
            }
            _ => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build(),
        };

        Ok(Self { transport, from })
    }

    async fn send(&self, to: &EmailAddress, subject: &str, body: String) -> Result<(), MailerError> {
        let recipient: Mailbox = to
            .as_str()
            .parse()
            .map_err(|e| MailerError::BuildFailed(format!("invalid recipient: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| MailerError::BuildFailed(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailerError::DeliveryFailed(e.to_string()))?;

        tracing::info!(to = %to, subject = %subject, "Email sent");
        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_verify_email(&self, to: &EmailAddress, link: &str) -> Result<(), MailerError> {
        self.send(to, VERIFY_SUBJECT, verify_body(link)).await
    }

    async fn send_reset_password(
        &self,
        to: &EmailAddress,
        link: &str,
    ) -> Result<(), MailerError> {
        self.send(to, RESET_SUBJECT, reset_body(link)).await
    }

    async fn send_login(&self, to: &EmailAddress) -> Result<(), MailerError> {
        self.send(to, LOGIN_SUBJECT, login_body(to)).await
    }
}
