//! Backup file exchange backed by the local filesystem

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::FileExchange,
};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Desktop [`FileExchange`].
///
/// Exports are written into a directory (the user's downloads folder by
/// default). Imports read whichever file the host selected last through
/// [`select_import_file`](Self::select_import_file); the selection is
/// consumed by the read, mirroring a one-shot file picker.
pub struct DesktopFileExchange {
    export_dir: PathBuf,
    selected: Mutex<Option<PathBuf>>,
}

impl DesktopFileExchange {
    /// Export into the user's downloads directory, falling back to home.
    pub fn new() -> Self {
        let export_dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::with_export_dir(export_dir)
    }

    pub fn with_export_dir(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
            selected: Mutex::new(None),
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Record the file the user picked for the next import.
    pub async fn select_import_file(&self, path: impl Into<PathBuf>) {
        *self.selected.lock().await = Some(path.into());
    }
}

impl Default for DesktopFileExchange {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileExchange for DesktopFileExchange {
    async fn download_as(&self, content: &str, file_name: &str) -> Result<()> {
        if file_name.contains(['/', '\\']) {
            return Err(BridgeError::OperationFailed(format!(
                "Refusing to write outside the export directory: {}",
                file_name
            )));
        }

        fs::create_dir_all(&self.export_dir).await?;
        let target = self.export_dir.join(file_name);
        fs::write(&target, content.as_bytes()).await?;

        info!(file = file_name, bytes = content.len(), "Wrote backup file");
        Ok(())
    }

    async fn read_from_file(&self) -> Result<Option<String>> {
        let Some(path) = self.selected.lock().await.take() else {
            debug!("No import file selected");
            return Ok(None);
        };

        // Invalid UTF-8 becomes U+FFFD and fails later as a JSON error.
        let bytes = fs::read(&path).await?;
        let content = String::from_utf8_lossy(&bytes).into_owned();
        debug!(bytes = bytes.len(), "Read import file");
        Ok(Some(content))
    }
}
