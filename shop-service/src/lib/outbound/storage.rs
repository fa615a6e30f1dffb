use std::io::ErrorKind as IoErrorKind;
use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::user::models::ImageUpload;
use crate::user::errors::ImageStorageError;
use crate::user::ports::ImageStorage;

/// Profile images written to a local directory under generated names.
pub struct LocalImageStorage {
    directory: PathBuf,
    max_bytes: usize,
}

impl LocalImageStorage {
    const ALLOWED_TYPES: &'static [(&'static str, &'static str)] = &[
        ("image/png", "png"),
        ("image/jpeg", "jpg"),
        ("image/gif", "gif"),
        ("image/webp", "webp"),
    ];

    pub fn new(directory: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            directory: directory.into(),
            max_bytes,
        }
    }

    /// Pick the file extension from the declared type, falling back to the
    /// original file name.
    fn extension_for(upload: &ImageUpload) -> Result<&'static str, ImageStorageError> {
        let declared = upload.content_type.as_deref().unwrap_or_default();
        if let Some((_, ext)) = Self::ALLOWED_TYPES.iter().find(|(ty, _)| *ty == declared) {
            return Ok(*ext);
        }

        let from_name = Path::new(&upload.original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match from_name.as_deref() {
            Some("png") => Ok("png"),
            Some("jpg") | Some("jpeg") => Ok("jpg"),
            Some("gif") => Ok("gif"),
            Some("webp") => Ok("webp"),
            _ => Err(ImageStorageError::UnsupportedType(
                upload
                    .content_type
                    .clone()
                    .unwrap_or_else(|| upload.original_name.clone()),
            )),
        }
    }

    /// Stored references are bare file names; anything else is refused.
    fn resolve(&self, reference: &str) -> Result<PathBuf, ImageStorageError> {
        let name = Path::new(reference);
        if name.file_name().map(|n| n == name.as_os_str()) != Some(true) {
            return Err(ImageStorageError::Io(format!(
                "invalid image reference: {}",
                reference
            )));
        }
        Ok(self.directory.join(name))
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn store(&self, upload: ImageUpload) -> Result<String, ImageStorageError> {
        if upload.bytes.len() > self.max_bytes {
            return Err(ImageStorageError::TooLarge {
                max: self.max_bytes,
            });
        }

        let extension = Self::extension_for(&upload)?;
        let file_name = format!(
            "{}-{}.{}",
            chrono::Utc::now().timestamp_millis(),
            uuid::Uuid::new_v4().simple(),
            extension
        );

        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| ImageStorageError::Io(e.to_string()))?;
        tokio::fs::write(self.directory.join(&file_name), &upload.bytes)
            .await
            .map_err(|e| ImageStorageError::Io(e.to_string()))?;

        tracing::debug!(file = %file_name, bytes = upload.bytes.len(), "Profile image stored");
        Ok(file_name)
    }

    async fn remove(&self, reference: &str) -> Result<(), ImageStorageError> {
        let path = self.resolve(reference)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(ImageStorageError::Io(e.to_string())),
        }
    }
}
