use log::info;

use super::error::ClassifierError;
use super::logistic::LogisticRegression;
use super::model::SentimentModel;
use super::vectorizer::TfidfVectorizer;
use crate::data::{LabeledExample, Sentiment};

/// A builder for training a [`SentimentModel`] with a fluent interface.
///
/// # Example
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use sentiment_pipeline::{generate, SentimentModel};
///
/// let corpus = generate(60, 42);
/// let model = SentimentModel::builder()
///     .with_max_features(500)?
///     .with_max_iter(200)?
///     .fit(corpus.examples())?;
///
/// let prediction = model.predict_one("I absolutely love this laptop!")?;
/// println!("{} ({:.2})", prediction.sentiment, prediction.confidence);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SentimentModelBuilder {
    max_features: Option<usize>,
    ngram_range: (usize, usize),
    max_iter: usize,
    regularization: f64,
    random_state: u64,
}

impl Default for SentimentModelBuilder {
    fn default() -> Self {
        Self {
            max_features: Some(5000),
            ngram_range: (1, 2),
            max_iter: 1000,
            regularization: 1.0,
            random_state: 42,
        }
    }
}

impl SentimentModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the vocabulary at the `max_features` most frequent terms.
    ///
    /// # Errors
    /// `ValidationError` if `max_features` is zero.
    pub fn with_max_features(mut self, max_features: usize) -> Result<Self, ClassifierError> {
        if max_features == 0 {
            return Err(ClassifierError::ValidationError(
                "max_features must be positive".to_string(),
            ));
        }
        self.max_features = Some(max_features);
        Ok(self)
    }

    /// Keeps every term seen during fitting.
    pub fn with_unbounded_vocabulary(mut self) -> Self {
        self.max_features = None;
        self
    }

    /// Sets the inclusive n-gram range, e.g. `(1, 2)` for unigrams and bigrams.
    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Result<Self, ClassifierError> {
        if min_n == 0 || min_n > max_n {
            return Err(ClassifierError::ValidationError(format!(
                "Invalid n-gram range ({}, {})",
                min_n, max_n
            )));
        }
        self.ngram_range = (min_n, max_n);
        Ok(self)
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Result<Self, ClassifierError> {
        if max_iter == 0 {
            return Err(ClassifierError::ValidationError(
                "max_iter must be positive".to_string(),
            ));
        }
        self.max_iter = max_iter;
        Ok(self)
    }

    /// Sets the inverse L2 regularization strength `C`. Smaller values regularize more.
    pub fn with_regularization(mut self, c: f64) -> Result<Self, ClassifierError> {
        if !(c.is_finite() && c > 0.0) {
            return Err(ClassifierError::ValidationError(format!(
                "Regularization strength must be a positive number, got {}",
                c
            )));
        }
        self.regularization = c;
        Ok(self)
    }

    /// Seed recorded with the model. Fitting itself is deterministic.
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Validates that every class has at least one example.
    fn validate_class_data(examples: &[LabeledExample]) -> Result<(), ClassifierError> {
        if examples.is_empty() {
            return Err(ClassifierError::InsufficientData(
                "No training examples provided".to_string(),
            ));
        }
        for sentiment in Sentiment::ALL {
            if !examples.iter().any(|example| example.sentiment == sentiment) {
                return Err(ClassifierError::InsufficientData(format!(
                    "No training examples for class '{}'",
                    sentiment
                )));
            }
        }
        Ok(())
    }

    /// Fits the vectorizer and the classifier on `examples`.
    pub fn fit(self, examples: &[LabeledExample]) -> Result<SentimentModel, ClassifierError> {
        Self::validate_class_data(examples)?;
        info!("Training on {} examples", examples.len());

        let texts: Vec<&str> = examples.iter().map(|example| example.text.as_str()).collect();
        let labels: Vec<usize> = examples.iter().map(|example| example.sentiment.index()).collect();

        let mut vectorizer = TfidfVectorizer::new(self.max_features, self.ngram_range);
        vectorizer.fit(texts.as_slice())?;
        let rows = vectorizer.transform_batch(texts.as_slice())?;

        let mut classifier = LogisticRegression::new(self.regularization, self.max_iter);
        classifier.fit(
            &rows,
            &labels,
            vectorizer.vocabulary_size(),
            Sentiment::ALL.len(),
        )?;

        Ok(SentimentModel::from_parts(
            vectorizer,
            classifier,
            self.random_state,
        ))
    }
}
