use serde::Serialize;

use crate::data::Sentiment;

mod error;
mod logistic;
mod metrics;
mod model;
mod split;
mod stop_words;
mod trainer;
mod utils;
mod vectorizer;
pub mod builder;

pub use builder::SentimentModelBuilder;
pub use error::ClassifierError;
pub use logistic::LogisticRegression;
pub use metrics::{ClassMetrics, EvaluationReport};
pub use model::SentimentModel;
pub use split::stratified_split;
pub use stop_words::is_stop_word;
pub use trainer::{evaluate, train, TrainingConfig, TrainingOutcome};
pub use utils::SparseRow;
pub use vectorizer::TfidfVectorizer;

/// The outcome of classifying one text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub sentiment: Sentiment,
    /// Largest posterior over the three classes, in `[0, 1]`
    pub confidence: f64,
    pub text: String,
}

/// Posterior probability of every class for one text
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassProbabilities {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
}

/// Information about a trained model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    /// Number of terms in the fitted vocabulary
    pub vocabulary_size: usize,
    pub ngram_range: (usize, usize),
    /// Number of classes the model is trained on
    pub num_classes: usize,
    /// Labels of the classes in class index order
    pub class_labels: Vec<String>,
    /// Gradient-descent iterations used during fitting
    pub iterations: usize,
    pub random_state: u64,
}
