use std::time::Duration;

use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::detection::DetectConfig;
use crate::error::AppError;
use crate::intake::UploadLimits;

const CONFIG_FILE: &str = "lungscan";
const ENV_PREFIX: &str = "LUNGSCAN";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub detection: DetectionSettings,
    pub upload: UploadSettings,
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Stub,
    Http,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    pub backend: BackendKind,
    pub endpoint: String,
    pub timeout_ms: u64,
    pub confidence_floor: f64,
    pub stub_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    pub max_bytes: usize,
    pub accepted_media_types: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            detection: DetectionSettings::default(),
            upload: UploadSettings::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::Stub,
            endpoint: "http://127.0.0.1:8000/detect".to_string(),
            timeout_ms: 30_000,
            confidence_floor: 0.0,
            stub_delay_ms: 2_000,
        }
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            accepted_media_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
        }
    }
}

impl Settings {
    /// Defaults, then an optional `lungscan.*` file in the working directory,
    /// then `LUNGSCAN__SECTION__KEY` environment variables.
    pub fn load() -> Result<Self, AppError> {
        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("upload.accepted_media_types"),
            );
        Self::from_builder(builder)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, AppError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let detection = &self.detection;
        if detection.timeout_ms == 0 {
            return Err(AppError::InvalidSetting(
                "detection.timeout_ms",
                "must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&detection.confidence_floor) {
            return Err(AppError::InvalidSetting(
                "detection.confidence_floor",
                format!("{} is outside [0, 1]", detection.confidence_floor),
            ));
        }
        if detection.backend == BackendKind::Http {
            reqwest::Url::parse(&detection.endpoint).map_err(|e| {
                AppError::InvalidSetting("detection.endpoint", format!("{}: {}", detection.endpoint, e))
            })?;
        }
        if self.upload.max_bytes == 0 {
            return Err(AppError::InvalidSetting(
                "upload.max_bytes",
                "must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn detect_config(&self) -> DetectConfig {
        DetectConfig {
            endpoint: self.detection.endpoint.clone(),
            timeout: Duration::from_millis(self.detection.timeout_ms),
            confidence_floor: self.detection.confidence_floor,
        }
    }

    pub fn upload_limits(&self) -> UploadLimits {
        UploadLimits {
            max_bytes: self.upload.max_bytes,
            accepted_media_types: self.upload.accepted_media_types.clone(),
        }
    }
}
