use std::fmt;

/// Represents the different types of errors that can occur while training or using the classifier.
#[derive(Debug)]
pub enum ClassifierError {
    /// Error occurred while tokenizing input text
    TokenizerError(String),
    /// Error occurred while fitting the vectorizer or the linear model
    TrainingError(String),
    /// The training data cannot support the requested split or fit
    InsufficientData(String),
    /// Error occurred while making predictions
    PredictionError(String),
    /// Error occurred due to invalid input parameters
    ValidationError(String),
    /// A prediction was requested before any model was loaded
    ModelNotLoaded,
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenizerError(msg) => write!(f, "Tokenizer error: {}", msg),
            Self::TrainingError(msg) => write!(f, "Training error: {}", msg),
            Self::InsufficientData(msg) => write!(f, "Insufficient data: {}", msg),
            Self::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::ModelNotLoaded => write!(f, "Model not loaded"),
        }
    }
}

impl std::error::Error for ClassifierError {}
