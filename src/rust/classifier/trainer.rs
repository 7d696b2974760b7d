use log::info;

use super::error::ClassifierError;
use super::metrics::EvaluationReport;
use super::model::SentimentModel;
use super::split::stratified_split;
use crate::data::{Corpus, LabeledExample};

/// Settings for one training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    pub max_features: usize,
    pub ngram_range: (usize, usize),
    pub test_size: f64,
    pub max_iter: usize,
    pub regularization: f64,
    pub random_state: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            max_features: 5000,
            ngram_range: (1, 2),
            test_size: 0.2,
            max_iter: 1000,
            regularization: 1.0,
            random_state: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub model: SentimentModel,
    pub report: EvaluationReport,
    pub train_size: usize,
    pub test_size: usize,
}

/// Splits `corpus`, fits a model on the training partition and evaluates it on the rest.
pub fn train(corpus: &Corpus, config: &TrainingConfig) -> Result<TrainingOutcome, ClassifierError> {
    let (train_set, test_set) = stratified_split(corpus, config.test_size, config.random_state)?;

    info!("Training model...");
    let model = SentimentModel::builder()
        .with_max_features(config.max_features)?
        .with_ngram_range(config.ngram_range.0, config.ngram_range.1)?
        .with_max_iter(config.max_iter)?
        .with_regularization(config.regularization)?
        .with_random_state(config.random_state)
        .fit(&train_set)?;

    let report = evaluate(&model, &test_set)?;
    info!("Accuracy: {:.4}", report.accuracy);

    Ok(TrainingOutcome {
        model,
        report,
        train_size: train_set.len(),
        test_size: test_set.len(),
    })
}

pub fn evaluate(
    model: &SentimentModel,
    test_set: &[LabeledExample],
) -> Result<EvaluationReport, ClassifierError> {
    let texts: Vec<&str> = test_set.iter().map(|example| example.text.as_str()).collect();
    let truth: Vec<_> = test_set.iter().map(|example| example.sentiment).collect();
    let predicted = model.predict(texts.as_slice())?;
    Ok(EvaluationReport::from_predictions(&truth, &predicted))
}
