use std::io::Write;
use std::path::{Path, PathBuf};

use crate::application::ports::{ScratchStore, ScratchStoreError};
use crate::domain::{ScratchFile, UploadedAudio};

const MAX_REQUEST_ID_CHARS: usize = 64;

/// Scratch files in a local directory, named `<request-id>-<random>.<ext>`.
pub struct LocalScratchStore {
    base_path: PathBuf,
}

impl LocalScratchStore {
    pub fn new(base_path: PathBuf) -> Result<Self, ScratchStoreError> {
        std::fs::create_dir_all(&base_path).map_err(|e| {
            ScratchStoreError::DirectoryUnavailable(format!("{}: {}", base_path.display(), e))
        })?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl ScratchStore for LocalScratchStore {
    fn persist(
        &self,
        upload: &UploadedAudio,
        request_id: &str,
    ) -> Result<ScratchFile, ScratchStoreError> {
        let prefix = format!("{}-", sanitize_request_id(request_id));
        let suffix = upload
            .extension()
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(&suffix)
            .tempfile_in(&self.base_path)?;

        // On error the temp file is dropped and removed.
        file.write_all(&upload.data)?;
        file.flush()?;

        let path = file.into_temp_path().keep().map_err(|e| e.error)?;

        tracing::debug!(
            bytes = upload.size_bytes(),
            filename = %upload.filename,
            "Upload written to scratch file"
        );

        Ok(ScratchFile::new(path))
    }
}

fn sanitize_request_id(request_id: &str) -> String {
    let cleaned: String = request_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .take(MAX_REQUEST_ID_CHARS)
        .collect();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
