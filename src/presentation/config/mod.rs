mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment};
pub use settings::{
    AlignmentSettings, DEFAULT_PORT, LoggingSettings, ServerSettings, Settings, StorageSettings,
    TranscriptionProviderSetting, TranscriptionSettings,
};
