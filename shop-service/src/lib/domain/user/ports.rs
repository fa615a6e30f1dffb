use async_trait::async_trait;

use crate::domain::identity::Identity;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::ImageUpload;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::ResetPasswordCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::ImageStorageError;
use crate::user::errors::MailerError;
use crate::user::errors::UserError;

/// Port for the registration, login, verification and password reset flows.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new, unverified account and email its verification link.
    ///
    /// # Returns
    /// Persisted user (unverified, holding a verification token)
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Mail` - Verification email could not be sent (the user stays persisted)
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError>;

    /// Check credentials.
    ///
    /// # Returns
    /// * `Authenticated` - Verified account, with a signed access token
    /// * `VerificationRequired` - Unverified account, verification link re-sent
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `Mail` - Verification email could not be sent
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, UserError>;

    /// Consume a verification token.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `NoPendingVerification` - Unverified account without a token
    /// * `InvalidVerificationToken` - Token mismatch or already consumed
    async fn verify_email(&self, user_id: &UserId, token: &str) -> Result<User, UserError>;

    /// Issue a reset token and email the reset link.
    ///
    /// # Errors
    /// * `NotFound` - No user with this email
    /// * `Mail` - Reset email could not be sent
    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), UserError>;

    /// Check a reset link without consuming it.
    ///
    /// # Errors
    /// * `InvalidResetLink` - Unknown user, no pending reset, or token mismatch
    async fn check_reset_link(&self, user_id: &UserId, token: &str) -> Result<(), UserError>;

    /// Set a new password and consume the reset token.
    ///
    /// # Errors
    /// * `InvalidResetLink` - Unknown user, no pending reset, or token mismatch
    async fn reset_password(&self, command: ResetPasswordCommand) -> Result<(), UserError>;
}

/// Port for account self-service and administration.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Retrieve every account.
    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    /// Update username and/or password of an account.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn update_user(&self, id: &UserId, command: UpdateUserCommand)
        -> Result<User, UserError>;

    /// Delete an account on behalf of `actor`.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Forbidden` - Actor is neither the account owner nor an admin
    async fn delete_user(&self, target: &UserId, actor: &Identity) -> Result<(), UserError>;

    /// Store a new profile image, replacing (and removing) any previous one.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `ImageStorage` - File could not be stored
    async fn set_profile_image(&self, id: &UserId, upload: ImageUpload)
        -> Result<User, UserError>;

    /// Remove the profile image.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `NoProfileImage` - Nothing to remove
    async fn remove_profile_image(&self, id: &UserId) -> Result<User, UserError>;
}

/// Persistence operations for user aggregate (the credential store).
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier (None if not found).
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by exact email (None if not found).
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Retrieve all users.
    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Overwrite every mutable column of an existing user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Remove user from storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}

/// Outbound transactional email.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Send the account verification link.
    async fn send_verify_email(&self, to: &EmailAddress, link: &str) -> Result<(), MailerError>;

    /// Send the password reset link.
    async fn send_reset_password(&self, to: &EmailAddress, link: &str)
        -> Result<(), MailerError>;

    /// Notify the account owner of a successful login.
    async fn send_login(&self, to: &EmailAddress) -> Result<(), MailerError>;
}

/// Storage for profile images.
#[async_trait]
pub trait ImageStorage: Send + Sync + 'static {
    /// Store an image and return the reference to persist on the user.
    async fn store(&self, upload: ImageUpload) -> Result<String, ImageStorageError>;

    /// Remove a previously stored image. Missing files are not an error.
    async fn remove(&self, reference: &str) -> Result<(), ImageStorageError>;
}
