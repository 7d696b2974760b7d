//! The one-time-loaded inference handle shared by every front end.

use std::path::Path;
use std::sync::OnceLock;

use log::info;
use serde::{Deserialize, Serialize};

use crate::classifier::{ClassifierError, Prediction, SentimentModel};
use crate::model_manager::{ModelError, ModelManager};

/// Text accepted by the prediction endpoints.
///
/// Clients send either a bare string, a one-element list, or a one-by-one
/// nested list. Every shape must carry exactly one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictInput {
    Batch(Vec<Vec<String>>),
    Single(Vec<String>),
    Scalar(String),
}

impl PredictInput {
    pub fn into_text(self) -> Result<String, ClassifierError> {
        match self {
            Self::Scalar(text) => Ok(text),
            Self::Single(items) => single(items, "list"),
            Self::Batch(rows) => {
                let row = single(rows, "batch")?;
                single(row, "batch row")
            }
        }
    }
}

fn single<T>(items: Vec<T>, shape: &str) -> Result<T, ClassifierError> {
    let len = items.len();
    let mut iter = items.into_iter();
    match (iter.next(), len) {
        (Some(item), 1) => Ok(item),
        _ => Err(ClassifierError::ValidationError(format!(
            "Expected exactly one text in {}, got {}",
            shape, len
        ))),
    }
}

impl From<&str> for PredictInput {
    fn from(text: &str) -> Self {
        Self::Scalar(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub model_loaded: bool,
}

/// Holds at most one model. Starts unloaded and becomes ready exactly once.
#[derive(Debug, Default)]
pub struct Predictor {
    model: OnceLock<SentimentModel>,
}

impl Predictor {
    /// An unloaded predictor
    pub fn new() -> Self {
        Self::default()
    }

    /// A predictor that is ready from the start
    pub fn with_model(model: SentimentModel) -> Self {
        Self {
            model: OnceLock::from(model),
        }
    }

    /// Loads the model at `path`. Fails if a model is already loaded.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        if self.is_ready() {
            return Err(ModelError::AlreadyLoaded);
        }
        let model = ModelManager::new(path).load_model()?;
        self.model
            .set(model)
            .map_err(|_| ModelError::AlreadyLoaded)?;
        info!("Predictor ready");
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.model.get().is_some()
    }

    pub fn model(&self) -> Result<&SentimentModel, ClassifierError> {
        self.model.get().ok_or(ClassifierError::ModelNotLoaded)
    }

    pub fn predict(&self, text: &str) -> Result<Prediction, ClassifierError> {
        self.model()?.predict_one(text)
    }

    pub fn predict_input(&self, input: PredictInput) -> Result<Prediction, ClassifierError> {
        let model = self.model()?;
        model.predict_one(&input.into_text()?)
    }

    pub fn health(&self) -> Result<HealthStatus, ClassifierError> {
        self.model()?;
        Ok(HealthStatus {
            status: "healthy",
            model_loaded: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_shapes_deserialize() {
        let scalar: PredictInput = serde_json::from_str(r#""great""#).unwrap();
        let single: PredictInput = serde_json::from_str(r#"["great"]"#).unwrap();
        let batch: PredictInput = serde_json::from_str(r#"[["great"]]"#).unwrap();
        assert_eq!(scalar, PredictInput::Scalar("great".into()));
        assert_eq!(single, PredictInput::Single(vec!["great".into()]));
        assert_eq!(batch, PredictInput::Batch(vec![vec!["great".into()]]));
        for input in [scalar, single, batch] {
            assert_eq!(input.into_text().unwrap(), "great");
        }
    }

    #[test]
    fn test_input_rejects_other_cardinalities() {
        let inputs = [
            PredictInput::Single(vec![]),
            PredictInput::Single(vec!["a".into(), "b".into()]),
            PredictInput::Batch(vec![vec!["a".into()], vec!["b".into()]]),
            PredictInput::Batch(vec![vec![]]),
        ];
        for input in inputs {
            assert!(matches!(
                input.into_text(),
                Err(ClassifierError::ValidationError(_))
            ));
        }
    }

    #[test]
    fn test_unloaded_predictor_refuses_work() {
        let predictor = Predictor::new();
        assert!(!predictor.is_ready());
        assert!(matches!(
            predictor.predict("amazing!"),
            Err(ClassifierError::ModelNotLoaded)
        ));
        assert!(matches!(
            predictor.health(),
            Err(ClassifierError::ModelNotLoaded)
        ));
    }
}
