//! Environment-driven settings for the pipeline, the model server and the UI.
//!
//! Each struct reads its variables through `from_env`, which delegates to
//! `from_lookup` so tests can supply variables without touching the process
//! environment. Unset or empty variables fall back to the defaults.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::data::DEFAULT_NUM_SAMPLES;
use crate::model_manager::DEFAULT_MODEL_PATH;
use crate::server::BackendProtocol;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|value| !value.trim().is_empty()) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key: key.to_string(),
            value: value.clone(),
            reason: e.to_string(),
        }),
    }
}

fn string_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn process_env(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Settings shared by the generate, validate, train and predict commands.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub raw_data_path: PathBuf,
    pub num_samples: usize,
    pub model_path: PathBuf,
    pub random_seed: u64,
    pub max_features: usize,
    /// Fraction of the corpus held out for evaluation
    pub test_split: f64,
    pub max_iter: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            raw_data_path: PathBuf::from("data/raw"),
            num_samples: DEFAULT_NUM_SAMPLES,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            random_seed: 42,
            max_features: 5000,
            test_split: 0.2,
            max_iter: 1000,
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let test_split = parse_or(&lookup, "TRAIN_TEST_SPLIT", defaults.test_split)?;
        if !(test_split > 0.0 && test_split < 1.0) {
            return Err(ConfigError::Invalid {
                key: "TRAIN_TEST_SPLIT".to_string(),
                value: test_split.to_string(),
                reason: "must be between 0 and 1".to_string(),
            });
        }
        Ok(Self {
            raw_data_path: PathBuf::from(string_or(&lookup, "RAW_DATA_PATH", "data/raw")),
            num_samples: parse_or(&lookup, "NUM_SAMPLES", defaults.num_samples)?,
            model_path: PathBuf::from(string_or(&lookup, "MODEL_PATH", DEFAULT_MODEL_PATH)),
            random_seed: parse_or(&lookup, "RANDOM_SEED", defaults.random_seed)?,
            max_features: parse_or(&lookup, "MAX_FEATURES", defaults.max_features)?,
            test_split,
            max_iter: parse_or(&lookup, "MAX_ITER", defaults.max_iter)?,
        })
    }

    /// Where `generate` writes and `train` reads the CSV corpus
    pub fn corpus_csv_path(&self) -> PathBuf {
        self.raw_data_path.join("sentiment_data.csv")
    }

    pub fn corpus_json_path(&self) -> PathBuf {
        self.raw_data_path.join("sentiment_data.json")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelServerConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
}

impl Default for ModelServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
        }
    }
}

impl ModelServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            host: string_or(&lookup, "MODEL_SERVER_HOST", &defaults.host),
            port: parse_or(&lookup, "MODEL_SERVER_PORT", defaults.port)?,
            model_path: PathBuf::from(string_or(&lookup, "MODEL_PATH", DEFAULT_MODEL_PATH)),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UiConfig {
    pub host: String,
    pub port: u16,
    pub backend_host: String,
    pub backend_port: u16,
    pub backend_protocol: BackendProtocol,
    pub backend_timeout: Duration,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            backend_host: "localhost".to_string(),
            backend_port: 8001,
            backend_protocol: BackendProtocol::Direct,
            backend_timeout: Duration::from_secs(30),
        }
    }
}

impl UiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            host: string_or(&lookup, "UI_HOST", &defaults.host),
            port: parse_or(&lookup, "UI_PORT", defaults.port)?,
            backend_host: string_or(&lookup, "BACKEND_HOST", &defaults.backend_host),
            backend_port: parse_or(&lookup, "BACKEND_PORT", defaults.backend_port)?,
            backend_protocol: parse_or(&lookup, "BACKEND_PROTOCOL", defaults.backend_protocol)?,
            backend_timeout: Duration::from_secs(parse_or(
                &lookup,
                "BACKEND_TIMEOUT_SECS",
                defaults.backend_timeout.as_secs(),
            )?),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn backend_url(&self) -> String {
        format!("http://{}:{}", self.backend_host, self.backend_port)
    }
}
