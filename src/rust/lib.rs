//! A small sentiment pipeline: synthetic data generation, a TF-IDF +
//! logistic regression classifier, and HTTP front ends for serving it.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use sentiment_pipeline::{generate, train, TrainingConfig};
//!
//! let corpus = generate(150, 42);
//! let config = TrainingConfig { max_iter: 200, ..TrainingConfig::default() };
//! let outcome = train(&corpus, &config)?;
//! println!("{}", outcome.report);
//!
//! let prediction = outcome.model.predict_one("This keyboard is awful!")?;
//! println!("Predicted class: {} ({:.2})", prediction.sentiment, prediction.confidence);
//! # Ok(())
//! # }
//! ```
//!
//! # Serving
//!
//! A [`Predictor`] starts unloaded and is loaded exactly once. It is shared
//! with request handlers through `Arc`:
//!
//! ```rust
//! use sentiment_pipeline::{model_server, Predictor};
//! use std::sync::Arc;
//!
//! let predictor = Arc::new(Predictor::new());
//! let app = model_server::router(Arc::clone(&predictor));
//! assert!(!predictor.is_ready());
//! # drop(app);
//! ```

pub mod classifier;
pub mod config;
pub mod data;
pub mod model_manager;
pub mod predictor;
pub mod server;

pub use classifier::{
    evaluate, stratified_split, train, ClassProbabilities, ClassifierError, EvaluationReport,
    ModelInfo, Prediction, SentimentModel, SentimentModelBuilder, TrainingConfig, TrainingOutcome,
};
pub use config::{ConfigError, ModelServerConfig, PipelineConfig, UiConfig};
pub use data::{
    generate, validate_count, Corpus, DataError, LabeledExample, Sentiment,
    SentimentDataGenerator,
};
pub use model_manager::{ModelError, ModelManager};
pub use predictor::{HealthStatus, PredictInput, Predictor};
pub use server::{model_server, ui};

/// Initialises `env_logger` at `info` level unless `RUST_LOG` says otherwise.
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
