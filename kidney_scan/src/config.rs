use crate::i18n::Language;
use serde::Deserialize;

pub const DEFAULT_PREDICTION_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    #[serde(default, deserialize_with = "deserialize_language")]
    pub default_language: Language,
    #[serde(default)]
    pub prediction_service: PredictionServiceConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.try_into().map_err(serde::de::Error::custom)
}

fn deserialize_language<'de, D>(deserializer: D) -> Result<Language, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.try_into().map_err(serde::de::Error::custom)
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn get_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where the external classification service lives.
#[derive(Debug, Deserialize, Clone)]
pub struct PredictionServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Left unset, requests rely on the transport defaults.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_PREDICTION_BASE_URL.to_string()
}

impl Default for PredictionServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

impl PredictionServiceConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn get_predict_url(&self) -> String {
        format!("{}/predict", self.trimmed_base_url())
    }

    pub fn get_health_url(&self) -> String {
        format!("{}/", self.trimmed_base_url())
    }

    fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[derive(Clone, Deserialize, Debug)]
pub struct UploadConfig {
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

fn default_max_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
        }
    }
}

impl UploadConfig {
    /// Request bodies are allowed slightly past the ceiling so oversize files
    /// reach intake validation instead of being cut off by the extractor.
    pub fn get_body_limit(&self) -> usize {
        self.max_bytes.saturating_add(1024 * 1024)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub enum LogLevel {
    Debug,
    Info,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            other => Err(format!(
                "{} is not a supported minimum log level. Use either `debug` or `info`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Config, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("current directory: {}", e)))?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    let config = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.yaml"),
        ))
        .add_source(
            config::File::from(
                configuration_directory.join(format!("{}.yaml", environment.as_str())),
            )
            .required(false),
        )
        .add_source(
            config::Environment::with_prefix("KS")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let config: Config = config.try_deserialize::<Config>()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_yaml(yaml: &str) -> Result<Config, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()?
            .try_deserialize::<Config>()
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = from_yaml("log_level: info\nserver:\n  host: 0.0.0.0\n  port: 3000\n")
            .expect("minimal config should load");

        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.default_language, Language::En);
        assert_eq!(config.prediction_service.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.prediction_service.timeout_secs, None);
        assert_eq!(config.upload.max_bytes, 10 * 1024 * 1024);
        assert_eq!(config.server.get_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides() {
        let yaml = r#"
log_level: DEBUG
default_language: fr
server:
  host: 127.0.0.1
  port: 4000
prediction_service:
  base_url: "http://classifier:9000/"
  timeout_secs: 30
upload:
  max_bytes: 2048
"#;
        let config = from_yaml(yaml).expect("config should load");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.default_language, Language::Fr);
        assert_eq!(
            config.prediction_service.get_predict_url(),
            "http://classifier:9000/predict"
        );
        assert_eq!(
            config.prediction_service.get_health_url(),
            "http://classifier:9000/"
        );
        assert_eq!(config.prediction_service.timeout_secs, Some(30));
        assert_eq!(config.upload.max_bytes, 2048);
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let err = from_yaml("log_level: trace\nserver:\n  host: a\n  port: 1\n").unwrap_err();
        assert!(err.to_string().contains("not a supported minimum log level"));
    }

    #[test]
    fn test_environment_parsing() {
        let env: Environment = "Production".to_string().try_into().unwrap();
        assert_eq!(env.as_str(), "production");
        assert!(Environment::try_from("staging".to_string()).is_err());
    }
}
