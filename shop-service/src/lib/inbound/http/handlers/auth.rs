//! Public account lifecycle endpoints.

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::ResetPasswordCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, UserError> {
        let email = EmailAddress::new(self.email)?;
        let username = Username::new(self.username)?;
        let password = Password::new(self.password)?;
        Ok(RegisterCommand::new(email, username, password))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub id: String,
    pub email: String,
    pub message: String,
}

impl From<&User> for RegisterResponseData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            message: "A verification link was sent to your email, please verify your email address"
                .to_string(),
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    // A malformed email can never match an account
    let email = EmailAddress::new(body.email).map_err(|_| UserError::InvalidCredentials)?;

    let outcome = state
        .auth_service
        .login(LoginCommand {
            email,
            password: body.password,
        })
        .await?;

    Ok(ApiSuccess::new(StatusCode::OK, outcome.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoginResponseData {
    Authenticated { access_token: String },
    VerificationRequired { message: String },
}

impl From<LoginOutcome> for LoginResponseData {
    fn from(outcome: LoginOutcome) -> Self {
        match outcome {
            LoginOutcome::Authenticated { access_token } => Self::Authenticated { access_token },
            LoginOutcome::VerificationRequired => Self::VerificationRequired {
                message: "A verification link was sent to your email, please verify your email address"
                    .to_string(),
            },
        }
    }
}

pub async fn verify_email(
    State(state): State<AppState>,
    Path((user_id, token)): Path<(String, String)>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let user_id = UserId::from_string(&user_id).map_err(UserError::from)?;

    state.auth_service.verify_email(&user_id, &token).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new("Your email address has been verified, please log in to your account"),
    ))
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let email = EmailAddress::new(body.email).map_err(UserError::from)?;

    state.auth_service.request_password_reset(&email).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new("A password reset link was sent to your email, please check your inbox"),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForgotPasswordRequest {
    email: String,
}

pub async fn check_reset_link(
    State(state): State<AppState>,
    Path((user_id, token)): Path<(String, String)>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let user_id = UserId::from_string(&user_id).map_err(|_| UserError::InvalidResetLink)?;

    state.auth_service.check_reset_link(&user_id, &token).await?;

    Ok(ApiSuccess::new(StatusCode::OK, MessageData::new("Valid link")))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    state
        .auth_service
        .reset_password(body.try_into_command()?)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new("Your password has been reset, please log in to your account"),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetPasswordRequest {
    user_id: String,
    reset_password_token: String,
    new_password: String,
}

impl ResetPasswordRequest {
    fn try_into_command(self) -> Result<ResetPasswordCommand, UserError> {
        let user_id = UserId::from_string(&self.user_id).map_err(|_| UserError::InvalidResetLink)?;
        let new_password = Password::new(self.new_password)?;
        Ok(ResetPasswordCommand {
            user_id,
            reset_token: self.reset_password_token,
            new_password,
        })
    }
}
