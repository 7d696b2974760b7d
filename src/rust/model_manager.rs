use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::classifier::SentimentModel;

/// Default location of the trained model artifact
pub const DEFAULT_MODEL_PATH: &str = "models/sentiment_model.json";

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model not found at {0:?}")]
    NotFound(PathBuf),
    #[error("Model at {path:?} is unreadable: {reason}")]
    Unreadable { path: PathBuf, reason: String },
    #[error("Model already loaded")]
    AlreadyLoaded,
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Owns the location of the model artifact on disk.
#[derive(Debug, Clone)]
pub struct ModelManager {
    model_path: PathBuf,
}

impl ModelManager {
    pub fn new<P: AsRef<Path>>(model_path: P) -> Self {
        Self {
            model_path: model_path.as_ref().to_path_buf(),
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn is_model_available(&self) -> bool {
        let exists = self.model_path.is_file();
        log::info!("Model path: {:?} (exists: {})", self.model_path, exists);
        exists
    }

    pub fn save_model(&self, model: &SentimentModel) -> Result<(), ModelError> {
        log::info!("Saving model to {:?}", self.model_path);
        model.save(&self.model_path)
    }

    pub fn load_model(&self) -> Result<SentimentModel, ModelError> {
        log::info!("Loading model from {:?}", self.model_path);
        let model = SentimentModel::load(&self.model_path).map_err(|e| {
            log::error!("Failed to load model: {}", e);
            e
        })?;
        let info = model.info();
        log::info!(
            "Model ready: {} terms, {} classes",
            info.vocabulary_size,
            info.num_classes
        );
        Ok(model)
    }

    pub fn remove_model(&self) -> Result<(), ModelError> {
        if self.model_path.exists() {
            log::info!("Removing model at {:?}", self.model_path);
            fs::remove_file(&self.model_path)?;
        }
        Ok(())
    }
}
