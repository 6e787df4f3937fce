/// Raw audio payload received with a transcription request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAudio {
    pub filename: String,
    pub data: Vec<u8>,
}

impl UploadedAudio {
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            data,
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }

    /// Lowercased file extension, if it looks like a real one.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.filename.rsplit_once('.')?;
        if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}
