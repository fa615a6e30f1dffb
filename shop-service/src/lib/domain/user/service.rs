use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::identity::Identity;
use crate::domain::product::ports::ProductCache;
use crate::domain::user::models::ImageUpload;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::ImageStorage;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for account self-service.
///
/// Deleting an account cascades to the products it created, so the service
/// holds the product listing cache and drops it after every deletion.
pub struct UserService<UR, IS, PC>
where
    UR: UserRepository,
    IS: ImageStorage,
    PC: ProductCache + ?Sized,
{
    repository: Arc<UR>,
    image_storage: Arc<IS>,
    product_cache: Arc<PC>,
    authenticator: Arc<Authenticator>,
}

impl<UR, IS, PC> UserService<UR, IS, PC>
where
    UR: UserRepository,
    IS: ImageStorage,
    PC: ProductCache + ?Sized,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `image_storage` - Profile image storage implementation
    /// * `product_cache` - Listing cache shared with the product service
    /// * `authenticator` - Password hashing for profile updates
    pub fn new(
        repository: Arc<UR>,
        image_storage: Arc<IS>,
        product_cache: Arc<PC>,
        authenticator: Arc<Authenticator>,
    ) -> Self {
        Self {
            repository,
            image_storage,
            product_cache,
            authenticator,
        }
    }

    async fn find(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn discard_image(&self, reference: &str) {
        if let Err(e) = self.image_storage.remove(reference).await {
            tracing::warn!(image = %reference, error = %e, "Failed to remove profile image");
        }
    }

    async fn invalidate_product_listings(&self) {
        match self.product_cache.invalidate_namespace().await {
            Ok(removed) => tracing::debug!(removed, "Product cache invalidated"),
            Err(e) => tracing::error!(error = %e, "Failed to invalidate product cache"),
        }
    }
}

#[async_trait]
impl<UR, IS, PC> UserServicePort for UserService<UR, IS, PC>
where
    UR: UserRepository,
    IS: ImageStorage,
    PC: ProductCache + ?Sized,
{
    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.find(id).await
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_all().await
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self.find(id).await?;

        if let Some(new_username) = command.username {
            user.username = new_username;
        }

        if let Some(new_password) = command.password {
            user.password_hash = self.authenticator.hash_password(new_password.expose())?;
        }

        user.updated_at = Utc::now();
        let updated_user = self.repository.update(user).await?;
        tracing::info!(user_id = %updated_user.id, "User updated");

        Ok(updated_user)
    }

    async fn delete_user(&self, target: &UserId, actor: &Identity) -> Result<(), UserError> {
        if !actor.owns_or_admin(target) {
            return Err(UserError::Forbidden(
                "only the account owner or an admin can delete this account".to_string(),
            ));
        }

        let user = self.find(target).await?;
        self.repository.delete(target).await?;

        // Products created by the account are gone with it
        self.invalidate_product_listings().await;

        if let Some(image) = user.profile_image.as_deref() {
            self.discard_image(image).await;
        }

        tracing::info!(user_id = %target, actor = %actor.user_id, "User deleted");
        Ok(())
    }

    async fn set_profile_image(
        &self,
        id: &UserId,
        upload: ImageUpload,
    ) -> Result<User, UserError> {
        let mut user = self.find(id).await?;

        let reference = self.image_storage.store(upload).await?;
        let previous = user.profile_image.replace(reference.clone());
        user.updated_at = Utc::now();

        let updated_user = match self.repository.update(user).await {
            Ok(user) => user,
            Err(e) => {
                self.discard_image(&reference).await;
                return Err(e);
            }
        };

        if let Some(previous) = previous.as_deref() {
            self.discard_image(previous).await;
        }

        Ok(updated_user)
    }

    async fn remove_profile_image(&self, id: &UserId) -> Result<User, UserError> {
        let mut user = self.find(id).await?;

        let image = user.profile_image.take().ok_or(UserError::NoProfileImage)?;
        user.updated_at = Utc::now();
        let updated_user = self.repository.update(user).await?;

        self.discard_image(&image).await;
        Ok(updated_user)
    }
}

#[cfg(test)]
mod tests {
    use auth::PasswordHasher;
    use mockall::mock;

    use super::*;
    use crate::domain::errors::ErrorKind;
    use crate::domain::identity::Role;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Password;
    use crate::domain::product::models::Product;
    use crate::domain::user::models::Username;
    use crate::product::errors::CacheError;
    use crate::user::errors::ImageStorageError;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
            async fn list_all(&self) -> Result<Vec<User>, UserError>;
            async fn update(&self, user: User) -> Result<User, UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), UserError>;
        }
    }

    mock! {
        pub TestImageStorage {}

        #[async_trait]
        impl ImageStorage for TestImageStorage {
            async fn store(&self, upload: ImageUpload) -> Result<String, ImageStorageError>;
            async fn remove(&self, reference: &str) -> Result<(), ImageStorageError>;
        }
    }

    mock! {
        pub TestProductCache {}

        #[async_trait]
        impl ProductCache for TestProductCache {
            async fn get(&self, key: &str) -> Result<Option<Vec<Product>>, CacheError>;
            async fn set(&self, key: &str, products: &[Product]) -> Result<(), CacheError>;
            async fn invalidate_namespace(&self) -> Result<usize, CacheError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::with_hasher(
            b"test-secret-key-for-jwt-signing-at-least-32-bytes",
            24,
            PasswordHasher::with_cost(1024, 1, 1).unwrap(),
        ))
    }

    type TestService =
        UserService<MockTestUserRepository, MockTestImageStorage, MockTestProductCache>;

    fn service(
        repository: MockTestUserRepository,
        image_storage: MockTestImageStorage,
    ) -> TestService {
        let mut product_cache = MockTestProductCache::new();
        product_cache
            .expect_invalidate_namespace()
            .returning(|| Ok(0));
        service_with_cache(repository, image_storage, product_cache)
    }

    fn service_with_cache(
        repository: MockTestUserRepository,
        image_storage: MockTestImageStorage,
        product_cache: MockTestProductCache,
    ) -> TestService {
        UserService::new(
            Arc::new(repository),
            Arc::new(image_storage),
            Arc::new(product_cache),
            authenticator(),
        )
    }

    fn test_user(profile_image: Option<&str>) -> User {
        User {
            id: UserId::new(),
            username: Username::new("testuser".to_string()).unwrap(),
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            role: Role::NormalUser,
            is_verified: true,
            verification_token: None,
            reset_password_token: None,
            profile_image: profile_image.map(str::to_string),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn upload() -> ImageUpload {
        ImageUpload {
            original_name: "avatar.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        }
    }

    #[tokio::test]
    async fn test_get_user_success() {
        let mut repository = MockTestUserRepository::new();

        let expected_user = test_user(None);
        let user_id = expected_user.id;
        let returned_user = expected_user.clone();
        repository
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(returned_user.clone())));

        let user = service(repository, MockTestImageStorage::new())
            .get_user(&user_id)
            .await
            .unwrap();

        assert_eq!(user.id, user_id);
        assert_eq!(user.username.as_str(), "testuser");
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(repository, MockTestImageStorage::new())
            .get_user(&UserId::new())
            .await;

        assert!(matches!(result.unwrap_err(), UserError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_user_rehashes_password() {
        let mut repository = MockTestUserRepository::new();

        let user = test_user(None);
        let user_id = user.id;
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repository
            .expect_update()
            .withf(|user| {
                user.username.as_str() == "renamed"
                    && authenticator()
                        .verify_password("brand-new-password", &user.password_hash)
                        .is_ok()
            })
            .times(1)
            .returning(Ok);

        let command = UpdateUserCommand {
            username: Some(Username::new("renamed".to_string()).unwrap()),
            password: Some(Password::new("brand-new-password".to_string()).unwrap()),
        };

        let updated = service(repository, MockTestImageStorage::new())
            .update_user(&user_id, command)
            .await
            .unwrap();

        assert_eq!(updated.username.as_str(), "renamed");
    }

    #[tokio::test]
    async fn test_update_user_keeps_password_when_absent() {
        let mut repository = MockTestUserRepository::new();

        let user = test_user(None);
        let user_id = user.id;
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repository
            .expect_update()
            .withf(|user| user.password_hash == "$argon2id$test_hash")
            .times(1)
            .returning(Ok);

        let result = service(repository, MockTestImageStorage::new())
            .update_user(&user_id, UpdateUserCommand::default())
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_user_by_stranger_is_forbidden() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_id().times(0);
        repository.expect_delete().times(0);

        let stranger = Identity {
            user_id: UserId::new(),
            role: Role::NormalUser,
        };

        let err = service(repository, MockTestImageStorage::new())
            .delete_user(&UserId::new(), &stranger)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_delete_user_by_admin_removes_image() {
        let mut repository = MockTestUserRepository::new();
        let mut image_storage = MockTestImageStorage::new();

        let user = test_user(Some("uploads/old.png"));
        let user_id = user.id;
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repository
            .expect_delete()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(|_| Ok(()));
        image_storage
            .expect_remove()
            .withf(|reference| reference == "uploads/old.png")
            .times(1)
            .returning(|_| Ok(()));

        let admin = Identity {
            user_id: UserId::new(),
            role: Role::Admin,
        };

        let result = service(repository, image_storage)
            .delete_user(&user_id, &admin)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_set_profile_image_replaces_previous() {
        let mut repository = MockTestUserRepository::new();
        let mut image_storage = MockTestImageStorage::new();

        let user = test_user(Some("uploads/old.png"));
        let user_id = user.id;
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repository
            .expect_update()
            .withf(|user| user.profile_image.as_deref() == Some("uploads/new.png"))
            .times(1)
            .returning(Ok);
        image_storage
            .expect_store()
            .times(1)
            .returning(|_| Ok("uploads/new.png".to_string()));
        image_storage
            .expect_remove()
            .withf(|reference| reference == "uploads/old.png")
            .times(1)
            .returning(|_| Ok(()));

        let user = service(repository, image_storage)
            .set_profile_image(&user_id, upload())
            .await
            .unwrap();

        assert_eq!(user.profile_image.as_deref(), Some("uploads/new.png"));
    }

    #[tokio::test]
    async fn test_set_profile_image_rejected_type() {
        let mut repository = MockTestUserRepository::new();
        let mut image_storage = MockTestImageStorage::new();

        let user = test_user(None);
        let user_id = user.id;
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repository.expect_update().times(0);
        image_storage
            .expect_store()
            .returning(|_| Err(ImageStorageError::UnsupportedType("text/plain".to_string())));

        let err = service(repository, image_storage)
            .set_profile_image(&user_id, upload())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_remove_profile_image_without_image() {
        let mut repository = MockTestUserRepository::new();
        let mut image_storage = MockTestImageStorage::new();

        let user = test_user(None);
        let user_id = user.id;
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        image_storage.expect_remove().times(0);

        let err = service(repository, image_storage)
            .remove_profile_image(&user_id)
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::NoProfileImage));
    }

    #[tokio::test]
    async fn test_remove_profile_image_clears_reference() {
        let mut repository = MockTestUserRepository::new();
        let mut image_storage = MockTestImageStorage::new();

        let user = test_user(Some("uploads/old.png"));
        let user_id = user.id;
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repository
            .expect_update()
            .withf(|user| user.profile_image.is_none())
            .times(1)
            .returning(Ok);
        image_storage
            .expect_remove()
            .times(1)
            .returning(|_| Ok(()));

        let user = service(repository, image_storage)
            .remove_profile_image(&user_id)
            .await
            .unwrap();

        assert!(user.profile_image.is_none());
    }

    #[tokio::test]
    async fn test_delete_user_drops_product_listings() {
        let mut repository = MockTestUserRepository::new();
        let mut product_cache = MockTestProductCache::new();

        let user = test_user(None);
        let user_id = user.id;
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repository.expect_delete().times(1).returning(|_| Ok(()));
        product_cache
            .expect_invalidate_namespace()
            .times(1)
            .returning(|| Ok(3));

        let owner = Identity {
            user_id,
            role: Role::Admin,
        };

        let result = service_with_cache(repository, MockTestImageStorage::new(), product_cache)
            .delete_user(&user_id, &owner)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_user_survives_cache_failure() {
        let mut repository = MockTestUserRepository::new();
        let mut product_cache = MockTestProductCache::new();

        let user = test_user(None);
        let user_id = user.id;
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repository.expect_delete().times(1).returning(|_| Ok(()));
        product_cache
            .expect_invalidate_namespace()
            .times(1)
            .returning(|| Err(CacheError::Connection("refused".to_string())));

        let owner = Identity {
            user_id,
            role: Role::NormalUser,
        };

        let result = service_with_cache(repository, MockTestImageStorage::new(), product_cache)
            .delete_user(&user_id, &owner)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_product_listings() {
        let mut repository = MockTestUserRepository::new();
        let mut product_cache = MockTestProductCache::new();

        let user = test_user(None);
        let user_id = user.id;
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repository
            .expect_delete()
            .returning(|_| Err(UserError::DatabaseError("connection reset".to_string())));
        product_cache.expect_invalidate_namespace().times(0);

        let owner = Identity {
            user_id,
            role: Role::NormalUser,
        };

        let err = service_with_cache(repository, MockTestImageStorage::new(), product_cache)
            .delete_user(&user_id, &owner)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn test_remove_profile_image_keeps_file_when_update_fails() {
        let mut repository = MockTestUserRepository::new();
        let mut image_storage = MockTestImageStorage::new();

        let user = test_user(Some("uploads/old.png"));
        let user_id = user.id;
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repository
            .expect_update()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("connection reset".to_string())));
        image_storage.expect_remove().times(0);

        let err = service(repository, image_storage)
            .remove_profile_image(&user_id)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
