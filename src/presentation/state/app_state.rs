use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::application::services::TranscriptionService;
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub transcription_service: Arc<TranscriptionService>,
    /// One permit per blocking transcription worker.
    pub worker_permits: Arc<Semaphore>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(transcription_service: Arc<TranscriptionService>, settings: Settings) -> Self {
        let permits = settings.server.max_concurrent_transcriptions.max(1);
        Self {
            transcription_service,
            worker_permits: Arc::new(Semaphore::new(permits)),
            settings,
        }
    }
}
