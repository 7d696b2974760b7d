use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::info;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::builder::SentimentModelBuilder;
use super::error::ClassifierError;
use super::logistic::LogisticRegression;
use super::utils::argmax;
use super::vectorizer::TfidfVectorizer;
use super::{ClassProbabilities, ModelInfo, Prediction};
use crate::data::Sentiment;
use crate::model_manager::ModelError;

/// A trained sentiment classifier: a fitted TF-IDF vectorizer feeding a
/// three-class logistic regression.
///
/// The model is immutable once trained, so it is `Send + Sync` and can be
/// shared across threads or request handlers through `Arc`:
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use sentiment_pipeline::{generate, SentimentModel};
/// use std::sync::Arc;
/// use std::thread;
///
/// let model = Arc::new(SentimentModel::builder().fit(generate(30, 1).examples())?);
///
/// let shared = Arc::clone(&model);
/// let handle = thread::spawn(move || shared.predict_one("Terrible cable").map(|p| p.sentiment));
/// assert_eq!(handle.join().unwrap()?, model.predict_one("Terrible cable")?.sentiment);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentModel {
    vectorizer: TfidfVectorizer,
    classifier: LogisticRegression,
    random_state: u64,
}

#[allow(dead_code)]
fn assert_send_sync<T: Send + Sync>() {}
#[allow(dead_code)]
fn verify_thread_safety() {
    assert_send_sync::<SentimentModel>();
}

impl SentimentModel {
    /// Creates a new builder for training a model
    pub fn builder() -> SentimentModelBuilder {
        SentimentModelBuilder::new()
    }

    pub(crate) fn from_parts(
        vectorizer: TfidfVectorizer,
        classifier: LogisticRegression,
        random_state: u64,
    ) -> Self {
        Self {
            vectorizer,
            classifier,
            random_state,
        }
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &LogisticRegression {
        &self.classifier
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            vocabulary_size: self.vectorizer.vocabulary_size(),
            ngram_range: self.vectorizer.ngram_range(),
            num_classes: self.classifier.n_classes(),
            class_labels: Sentiment::ALL.iter().map(|s| s.as_str().to_string()).collect(),
            iterations: self.classifier.n_iter(),
            random_state: self.random_state,
        }
    }

    /// Posterior probabilities, one row per text, columns in [`Sentiment::ALL`] order.
    pub fn predict_proba<S: AsRef<str>>(&self, texts: &[S]) -> Result<Array2<f64>, ClassifierError> {
        let rows = self.vectorizer.transform_batch(texts)?;
        self.classifier.predict_proba(&rows)
    }

    pub fn predict<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<Sentiment>, ClassifierError> {
        let probabilities = self.predict_proba(texts)?;
        probabilities
            .rows()
            .into_iter()
            .map(|row| label_for(argmax(&row.to_owned()).0))
            .collect()
    }

    /// Classifies a single text. Confidence is the largest posterior.
    ///
    /// Text with no known terms (the empty string included) is still
    /// classified, from the intercept alone.
    pub fn predict_one(&self, text: &str) -> Result<Prediction, ClassifierError> {
        let probabilities = self.predict_proba(&[text])?;
        let (index, confidence) = argmax(&probabilities.row(0).to_owned());
        Ok(Prediction {
            sentiment: label_for(index)?,
            confidence,
            text: text.to_string(),
        })
    }

    pub fn class_probabilities(&self, text: &str) -> Result<ClassProbabilities, ClassifierError> {
        let probabilities = self.predict_proba(&[text])?;
        let row = probabilities.row(0);
        Ok(ClassProbabilities {
            negative: row[Sentiment::Negative.index()],
            neutral: row[Sentiment::Neutral.index()],
            positive: row[Sentiment::Positive.index()],
        })
    }

    /// Writes the model as JSON, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        info!("Model saved to {:?}", path);
        Ok(())
    }

    /// Reads a model written by [`SentimentModel::save`].
    ///
    /// # Errors
    /// `ModelError::NotFound` when nothing exists at `path`, and
    /// `ModelError::Unreadable` when the file cannot be read or decoded
    /// into a consistent model.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ModelError::NotFound(path.to_path_buf()));
        }
        let unreadable = |reason: String| ModelError::Unreadable {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path).map_err(|e| unreadable(e.to_string()))?;
        let model: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| unreadable(e.to_string()))?;
        model.check_consistency().map_err(unreadable)?;

        info!("Model loaded from {:?}", path);
        Ok(model)
    }

    fn check_consistency(&self) -> Result<(), String> {
        if !self.vectorizer.is_fitted() || !self.classifier.is_fitted() {
            return Err("model is not fitted".to_string());
        }
        if self.classifier.n_classes() != Sentiment::ALL.len() {
            return Err(format!(
                "expected {} classes, found {}",
                Sentiment::ALL.len(),
                self.classifier.n_classes()
            ));
        }
        if self.classifier.n_features() != self.vectorizer.vocabulary_size()
            || self.classifier.intercept().len() != self.classifier.n_classes()
        {
            return Err("weight dimensions do not match the vocabulary".to_string());
        }
        self.vectorizer.check_columns()?;
        if self
            .vectorizer
            .vocabulary()
            .values()
            .any(|&index| index >= self.classifier.n_features())
        {
            return Err("vocabulary column outside the weight matrix".to_string());
        }
        Ok(())
    }
}

fn label_for(index: usize) -> Result<Sentiment, ClassifierError> {
    Sentiment::from_index(index)
        .ok_or_else(|| ClassifierError::PredictionError(format!("No label for class {}", index)))
}
