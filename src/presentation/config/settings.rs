use std::path::Path;

use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};

use crate::infrastructure::audio::TranscriptionProvider;

use super::Environment;

pub const DEFAULT_PORT: u16 = 10_000;
const ENV_PREFIX: &str = "APP";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub transcription: TranscriptionSettings,
    pub alignment: AlignmentSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub port: u16,
    pub max_upload_bytes: usize,
    pub max_concurrent_transcriptions: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            max_upload_bytes: 100 * 1024 * 1024,
            max_concurrent_transcriptions: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    pub provider: TranscriptionProviderSetting,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            provider: TranscriptionProviderSetting::Local,
            model: "openai/whisper-base".to_string(),
            api_key: None,
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProviderSetting {
    Local,
    #[serde(rename = "openai")]
    OpenAi,
}

impl From<TranscriptionProviderSetting> for TranscriptionProvider {
    fn from(setting: TranscriptionProviderSetting) -> Self {
        match setting {
            TranscriptionProviderSetting::Local => TranscriptionProvider::Local,
            TranscriptionProviderSetting::OpenAi => TranscriptionProvider::OpenAi,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentSettings {
    /// Holds one `<language>/model.onnx` + `vocab.json` directory per supported language.
    pub models_dir: String,
    pub preload: Vec<String>,
}

impl Default for AlignmentSettings {
    fn default() -> Self {
        Self {
            models_dir: "models/alignment".to_string(),
            preload: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub scratch_dir: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir()
                .join("wordstamp")
                .to_string_lossy()
                .into_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info,wordstamp=debug,tower_http=debug".to_string(),
            enable_json: false,
        }
    }
}

impl Settings {
    /// Reads `.env`, then layers defaults, `config/appsettings.{env}`, `APP__*` variables
    /// and finally `PORT`.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let environment = Environment::from_env().map_err(ConfigError::Message)?;

        Self::build(
            environment,
            Path::new("config"),
            std::env::var("PORT").ok().as_deref(),
        )
    }

    pub fn build(
        environment: Environment,
        config_dir: &Path,
        port_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let file_stem = config_dir.join(format!("appsettings.{}", environment));

        let settings: Settings = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name(&file_stem.to_string_lossy()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("alignment.preload"),
            )
            .set_override_option("server.port", port_override.map(str::to_string))?
            .build()?
            .try_deserialize()?;

        if settings.server.max_concurrent_transcriptions == 0 {
            return Err(ConfigError::Message(
                "server.max_concurrent_transcriptions must be at least 1".to_string(),
            ));
        }

        Ok(settings)
    }
}
