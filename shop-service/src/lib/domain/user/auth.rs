//! Account lifecycle: register → verify email → login, plus password reset.
//!
//! Every token handed out here is single-use: it is stored on the user row,
//! compared in constant time, and nulled by the operation that consumes it.

use std::sync::Arc;

use async_trait::async_trait;
use auth::token;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::identity::Role;
use crate::domain::user::models::AccountState;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::ResetPasswordCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::Mailer;
use crate::user::ports::UserRepository;

/// Base URLs used to build emailed links.
#[derive(Debug, Clone)]
pub struct AuthLinks {
    /// Server-rendered domain hosting `/api/users/verify-email/{id}/{token}`
    pub verify_email_base_url: String,
    /// Client domain hosting `/reset-password/{id}/{token}`
    pub reset_password_base_url: String,
}

impl AuthLinks {
    fn verification(&self, user_id: &UserId, token: &str) -> String {
        format!(
            "{}/api/users/verify-email/{}/{}",
            self.verify_email_base_url.trim_end_matches('/'),
            user_id,
            token
        )
    }

    fn reset_password(&self, user_id: &UserId, token: &str) -> String {
        format!(
            "{}/reset-password/{}/{}",
            self.reset_password_base_url.trim_end_matches('/'),
            user_id,
            token
        )
    }
}

/// Authentication state machine over the credential store and the mailer.
pub struct AuthService<UR, M>
where
    UR: UserRepository,
    M: Mailer,
{
    repository: Arc<UR>,
    mailer: Arc<M>,
    authenticator: Arc<Authenticator>,
    links: AuthLinks,
    notify_on_login: bool,
}

impl<UR, M> AuthService<UR, M>
where
    UR: UserRepository,
    M: Mailer,
{
    pub fn new(
        repository: Arc<UR>,
        mailer: Arc<M>,
        authenticator: Arc<Authenticator>,
        links: AuthLinks,
    ) -> Self {
        Self {
            repository,
            mailer,
            authenticator,
            links,
            notify_on_login: false,
        }
    }

    /// Send a login notification email after each successful login.
    pub fn with_login_notifications(mut self, enabled: bool) -> Self {
        self.notify_on_login = enabled;
        self
    }

    async fn send_verification(&self, user: &User, verification_token: &str) -> Result<(), UserError> {
        let link = self.links.verification(&user.id, verification_token);

        self.mailer
            .send_verify_email(&user.email, &link)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "Failed to send verification email");
                UserError::from(e)
            })
    }

    /// Load a user whose pending reset token matches `presented`.
    async fn find_pending_reset(&self, user_id: &UserId, presented: &str) -> Result<User, UserError> {
        let user = self
            .repository
            .find_by_id(user_id)
            .await?
            .ok_or(UserError::InvalidResetLink)?;

        match user.reset_password_token.as_deref() {
            Some(stored) if token::tokens_match(presented, stored) => Ok(user),
            _ => Err(UserError::InvalidResetLink),
        }
    }
}

#[async_trait]
impl<UR, M> AuthServicePort for AuthService<UR, M>
where
    UR: UserRepository,
    M: Mailer,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError> {
        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = self
            .authenticator
            .hash_password(command.password.expose())?;
        let verification_token = token::generate_token();
        let now = Utc::now();

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            role: Role::NormalUser,
            is_verified: false,
            verification_token: Some(verification_token.clone()),
            reset_password_token: None,
            profile_image: None,
            created_at: now,
            updated_at: now,
        };

        let user = self.repository.create(user).await?;
        tracing::info!(user_id = %user.id, "User registered");

        // Last step: on failure the account stays unverified and a later
        // login re-sends the same token.
        self.send_verification(&user, &verification_token).await?;

        Ok(user)
    }

    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, UserError> {
        let user = self
            .repository
            .find_by_email(&command.email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        self.authenticator
            .verify_password(&command.password, &user.password_hash)
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => UserError::InvalidCredentials,
                AuthenticationError::PasswordError(err) => UserError::Hashing(err.to_string()),
                AuthenticationError::JwtError(err) => UserError::TokenIssuance(err.to_string()),
            })?;

        match user.state() {
            AccountState::Unverified => {
                let (user, verification_token) = match user.verification_token.clone() {
                    Some(existing) => (user, existing),
                    None => {
                        let fresh = token::generate_token();
                        let mut user = user;
                        user.verification_token = Some(fresh.clone());
                        user.updated_at = Utc::now();
                        (self.repository.update(user).await?, fresh)
                    }
                };

                self.send_verification(&user, &verification_token).await?;
                tracing::info!(user_id = %user.id, "Login deferred until email is verified");

                Ok(LoginOutcome::VerificationRequired)
            }
            AccountState::Verified => {
                let access_token = self
                    .authenticator
                    .issue_token(user.id, user.role)
                    .map_err(|e| UserError::TokenIssuance(e.to_string()))?;

                if self.notify_on_login {
                    self.mailer.send_login(&user.email).await?;
                }

                tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
                Ok(LoginOutcome::Authenticated { access_token })
            }
        }
    }

    async fn verify_email(&self, user_id: &UserId, presented: &str) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound(user_id.to_string()))?;

        match user.verification_token.as_deref() {
            Some(stored) if token::tokens_match(presented, stored) => {
                user.mark_verified();
                let user = self.repository.update(user).await?;
                tracing::info!(user_id = %user.id, "Email verified");
                Ok(user)
            }
            Some(_) => Err(UserError::InvalidVerificationToken),
            // Replay against an account whose token was already consumed
            None if user.is_verified => Err(UserError::InvalidVerificationToken),
            None => Err(UserError::NoPendingVerification),
        }
    }

    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), UserError> {
        let mut user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or(UserError::NotFound(email.to_string()))?;

        let reset_token = token::generate_token();
        user.reset_password_token = Some(reset_token.clone());
        user.updated_at = Utc::now();
        let user = self.repository.update(user).await?;

        let link = self.links.reset_password(&user.id, &reset_token);
        self.mailer
            .send_reset_password(&user.email, &link)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "Failed to send reset password email");
                UserError::from(e)
            })?;

        tracing::info!(user_id = %user.id, "Password reset requested");
        Ok(())
    }

    async fn check_reset_link(&self, user_id: &UserId, presented: &str) -> Result<(), UserError> {
        self.find_pending_reset(user_id, presented).await.map(|_| ())
    }

    async fn reset_password(&self, command: ResetPasswordCommand) -> Result<(), UserError> {
        let mut user = self
            .find_pending_reset(&command.user_id, &command.reset_token)
            .await?;

        user.password_hash = self
            .authenticator
            .hash_password(command.new_password.expose())?;
        user.reset_password_token = None;
        user.updated_at = Utc::now();

        let user = self.repository.update(user).await?;
        tracing::info!(user_id = %user.id, "Password reset");

        Ok(())
    }
}
