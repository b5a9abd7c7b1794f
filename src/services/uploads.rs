use std::path::PathBuf;

use uuid::Uuid;

use crate::{Error, Result};

/// Writes uploaded images under the static-served directory and hands back
/// the generated filename, which is all the post row keeps.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub async fn save(&self, data: &[u8]) -> Result<String> {
        let format = image::guess_format(data)
            .map_err(|_| Error::BadRequest("Uploaded file must be an image".to_string()))?;
        let ext = format.extensions_str().first().copied().unwrap_or("bin");
        let filename = format!("{}.{}", Uuid::now_v7(), ext);

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&filename), data).await?;

        Ok(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Magic bytes are all `guess_format` looks at.
    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n0000000000";

    fn temp_store() -> ImageStore {
        ImageStore::new(std::env::temp_dir().join(format!("image-store-{}", Uuid::now_v7())))
    }

    #[tokio::test]
    async fn save_generates_a_png_filename() {
        let store = temp_store();
        let filename = store.save(PNG_HEADER).await.unwrap();

        assert!(filename.ends_with(".png"));
        assert!(store.dir.join(&filename).exists());
    }

    #[tokio::test]
    async fn save_rejects_non_image_data() {
        let store = temp_store();
        let err = store.save(b"plain text, not an image").await.unwrap_err();

        assert!(matches!(err, Error::BadRequest(_)));
        assert!(!store.dir.exists());
    }
}
