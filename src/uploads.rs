// Multipart intake and on-disk storage for uploaded images
// Stored files are served read-only under the /uploads URL prefix

use axum::extract::Multipart;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("invalid multipart payload: {0}")]
    Malformed(String),

    #[error("only jpeg, jpg, png and gif files are allowed")]
    UnsupportedType,

    #[error("failed to store uploaded file")]
    Io(#[from] std::io::Error),
}

/// A parsed multipart request: plain text fields plus the public URL path of
/// the stored image, when an `image` part was present.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub image_url: Option<String>,
}

impl UploadForm {
    /// Fetch a trimmed text field, treating empty values as absent
    pub fn field(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Filesystem store for uploaded images
#[derive(Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Open the store, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Read every part of a multipart form. Text parts land in `fields`;
    /// the part named `image` is written to disk and exposed as
    /// `/uploads/<name>`. An empty image part is treated as absent.
    pub async fn read_form(&self, mut multipart: Multipart) -> Result<UploadForm, UploadError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| UploadError::Malformed(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == "image" {
                let original = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| UploadError::Malformed(e.to_string()))?;
                if data.is_empty() {
                    continue;
                }
                form.image_url = Some(self.save(&original, &data).await?);
            } else if !name.is_empty() {
                let value = field
                    .text()
                    .await
                    .map_err(|e| UploadError::Malformed(e.to_string()))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Store raw image bytes under a server-generated name and return the
    /// public URL path that gets persisted on the owning record.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<String, UploadError> {
        let ext = allowed_extension(original_name).ok_or(UploadError::UnsupportedType)?;
        let file_name = unique_name(&ext);
        let path = self.dir.join(&file_name);

        tokio::fs::write(&path, data).await?;
        tracing::debug!("Stored uploaded image at {}", path.display());

        Ok(format!("/uploads/{}", file_name))
    }
}

/// Millisecond timestamp plus a random suffix, keeping the original
/// extension. Concurrent uploads of the same file name never collide.
fn unique_name(ext: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::random();
    format!("{}-{}.{}", millis, suffix, ext)
}

fn allowed_extension(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "jpeg" | "jpg" | "png" | "gif" => Some(ext),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions() {
        assert_eq!(allowed_extension("photo.jpg"), Some("jpg".to_string()));
        assert_eq!(allowed_extension("photo.JPEG"), Some("jpeg".to_string()));
        assert_eq!(allowed_extension("logo.PNG"), Some("png".to_string()));
        assert_eq!(allowed_extension("anim.gif"), Some("gif".to_string()));
    }

    #[test]
    fn test_rejected_extensions() {
        assert_eq!(allowed_extension("script.sh"), None);
        assert_eq!(allowed_extension("doc.pdf"), None);
        assert_eq!(allowed_extension("noextension"), None);
        assert_eq!(allowed_extension(""), None);
    }

    #[test]
    fn test_unique_names_differ() {
        let a = unique_name("jpg");
        let b = unique_name("jpg");
        assert_ne!(a, b);
        assert!(a.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn test_save_writes_file_and_returns_url() {
        let dir = std::env::temp_dir().join(format!("market-uploads-{}", rand::random::<u32>()));
        let store = UploadStore::new(&dir).unwrap();

        let url = store.save("menu.png", b"fake image bytes").await.unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with(".png"));

        let file_name = url.strip_prefix("/uploads/").unwrap();
        let written = tokio::fs::read(dir.join(file_name)).await.unwrap();
        assert_eq!(written, b"fake image bytes");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_rejects_unsupported_type() {
        let dir = std::env::temp_dir().join(format!("market-uploads-{}", rand::random::<u32>()));
        let store = UploadStore::new(&dir).unwrap();

        let result = store.save("payload.exe", b"bytes").await;
        assert!(matches!(result, Err(UploadError::UnsupportedType)));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[test]
    fn test_form_field_normalization() {
        let mut form = UploadForm::default();
        form.fields.insert("name".to_string(), "  Ada Bakery  ".to_string());
        form.fields.insert("phone".to_string(), "   ".to_string());

        assert_eq!(form.field("name"), Some("Ada Bakery".to_string()));
        assert_eq!(form.field("phone"), None);
        assert_eq!(form.field("missing"), None);
    }
}
