use std::{io::ErrorKind, path::PathBuf};

use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

use crate::forms::Upload;

/// Where uploaded post images land. Serving them is someone else's job.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Writes the upload and returns its reference relative to the root.
    pub async fn save(&self, upload: &Upload) -> anyhow::Result<String> {
        let reference = format!("posts/{}.{}", Uuid::now_v7().simple(), extension(&upload.file_name));
        let path = self.root.join(&reference);

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }
        fs::write(&path, &upload.bytes).await?;

        info!("stored {} bytes as {reference}", upload.bytes.len());
        Ok(reference)
    }

    /// Deletes a stored file. One that is already gone is fine.
    pub async fn remove(&self, reference: &str) -> anyhow::Result<()> {
        match fs::remove_file(self.root.join(reference)).await {
            Ok(()) => {
                info!("removed {reference}");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// [`remove`](Self::remove) for cleanup paths, failures are only logged.
    pub async fn discard(&self, reference: &str) {
        if let Err(err) = self.remove(reference).await {
            warn!("could not remove {reference}: {err:#}");
        }
    }

    pub fn path(&self, reference: &str) -> PathBuf {
        self.root.join(reference)
    }
}

fn extension(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "bin".to_owned())
}
