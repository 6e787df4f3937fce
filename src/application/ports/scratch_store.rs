use crate::domain::{ScratchFile, UploadedAudio};

/// Writes uploads to uniquely named transient files.
pub trait ScratchStore: Send + Sync {
    fn persist(
        &self,
        upload: &UploadedAudio,
        request_id: &str,
    ) -> Result<ScratchFile, ScratchStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ScratchStoreError {
    #[error("scratch directory unavailable: {0}")]
    DirectoryUnavailable(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
