pub mod corpus;
pub mod error;
pub mod generator;
pub mod templates;

pub use corpus::{Corpus, LabeledExample, Sentiment};
pub use error::DataError;
pub use generator::{generate, validate_count, SentimentDataGenerator, DEFAULT_NUM_SAMPLES};
