use chrono::Utc;
use rand::Rng;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Only image files are allowed!")]
    NotAnImage,
    #[error("File too large. Maximum size is 5MB")]
    TooLarge,
    /// A second file part under the image field.
    #[error("Unexpected field")]
    UnexpectedField,
    #[error("failed to store upload {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An attached file as received, not yet written to disk.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Accepts only `image/*` content no larger than `limit` bytes.
    pub fn check(&self, limit: usize) -> Result<(), UploadError> {
        check_content_type(self.content_type.as_deref())?;
        if self.bytes.len() > limit {
            return Err(UploadError::TooLarge);
        }
        Ok(())
    }
}

pub fn check_content_type(content_type: Option<&str>) -> Result<(), UploadError> {
    match content_type {
        Some(ct) if ct.starts_with("image/") => Ok(()),
        _ => Err(UploadError::NotAnImage),
    }
}

/// Directory of uploaded images, addressed by generated filename.
#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, UploadError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| UploadError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<field>-<unix millis>-<random>.<ext>`, keeping the original extension.
    pub fn generate_name(field: &str, original_name: &str) -> String {
        let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
        let mut name = format!("{}-{}-{}", field, Utc::now().timestamp_millis(), suffix);

        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()));
        if let Some(ext) = ext {
            name.push('.');
            name.push_str(ext);
        }
        name
    }

    pub fn store(&self, upload: &ImageUpload) -> Result<String, UploadError> {
        let name = Self::generate_name(&upload.field, &upload.file_name);
        let path = self.root.join(&name);
        fs::write(&path, &upload.bytes).map_err(|source| UploadError::Io { path, source })?;
        tracing::debug!("Stored upload {} ({} bytes)", name, upload.bytes.len());
        Ok(name)
    }

    /// Path of an existing file named exactly `name` directly inside the
    /// directory. Anything that is not a single plain path component is
    /// refused.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) if part == name => {}
            _ => return None,
        }
        if name.contains(['/', '\\']) {
            return None;
        }

        let path = self.root.join(name);
        path.is_file().then_some(path)
    }

    pub fn remove(&self, name: &str) {
        if let Some(path) = self.resolve(name) {
            if let Err(e) = fs::remove_file(&path) {
                tracing::warn!("Failed to remove upload {:?}: {}", path, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn upload(content_type: Option<&str>, len: usize) -> ImageUpload {
        ImageUpload {
            field: "image".to_string(),
            file_name: "photo.png".to_string(),
            content_type: content_type.map(String::from),
            bytes: vec![7; len],
        }
    }

    #[test]
    fn test_generated_name_shape() {
        let name = UploadDir::generate_name("image", "holiday.photo.JPG");
        let parts: Vec<_> = name.splitn(3, '-').collect();
        assert_eq!(parts[0], "image");
        assert!(parts[1].parse::<i64>().is_ok());
        let (random, ext) = parts[2].split_once('.').unwrap();
        assert!(random.parse::<u32>().unwrap() < 1_000_000_000);
        assert_eq!(ext, "JPG");

        assert!(!UploadDir::generate_name("image", "noext").contains('.'));
        assert!(!UploadDir::generate_name("image", "bad.p/ng").contains('/'));
    }

    #[test]
    fn test_check_rejects_non_images_and_oversize() {
        assert!(upload(Some("image/png"), 10).check(MAX_IMAGE_BYTES).is_ok());
        assert!(matches!(
            upload(Some("text/plain"), 10).check(MAX_IMAGE_BYTES),
            Err(UploadError::NotAnImage)
        ));
        assert!(matches!(upload(None, 10).check(MAX_IMAGE_BYTES), Err(UploadError::NotAnImage)));
        assert!(matches!(
            upload(Some("image/jpeg"), MAX_IMAGE_BYTES + 1).check(MAX_IMAGE_BYTES),
            Err(UploadError::TooLarge)
        ));
        assert!(upload(Some("image/jpeg"), MAX_IMAGE_BYTES).check(MAX_IMAGE_BYTES).is_ok());
    }

    #[test]
    fn test_store_resolve_remove() {
        let dir = tempdir().unwrap();
        let uploads = UploadDir::open(dir.path().join("uploads")).unwrap();

        let name = uploads.store(&upload(Some("image/png"), 32)).unwrap();
        assert!(name.starts_with("image-") && name.ends_with(".png"));

        let path = uploads.resolve(&name).unwrap();
        assert_eq!(fs::read(&path).unwrap(), vec![7; 32]);

        uploads.remove(&name);
        assert!(uploads.resolve(&name).is_none());
    }

    #[test]
    fn test_resolve_is_confined() {
        let dir = tempdir().unwrap();
        let uploads = UploadDir::open(dir.path().join("uploads")).unwrap();
        fs::write(dir.path().join("secret.txt"), "x").unwrap();
        fs::create_dir(uploads.root().join("sub")).unwrap();
        fs::write(uploads.root().join("sub").join("a.png"), "x").unwrap();

        for name in ["", ".", "..", "../secret.txt", "sub/a.png", "sub", "/etc/passwd", "..\\secret.txt"] {
            assert!(uploads.resolve(name).is_none(), "{name} resolved");
        }
        assert!(uploads.resolve("doesnotexist.jpg").is_none());
    }
}
