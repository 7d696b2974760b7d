use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::corpus::{Corpus, LabeledExample, Sentiment};
use super::error::DataError;
use super::templates::{
    NEGATIVE_TEMPLATES, NEUTRAL_TEMPLATES, POSITIVE_TEMPLATES, PRODUCTS, PRODUCT_PLACEHOLDER,
};

/// Default number of samples produced by the CLI
pub const DEFAULT_NUM_SAMPLES: usize = 1000;

/// Checks a signed sample count coming from user input.
pub fn validate_count(count: i64) -> Result<usize, DataError> {
    usize::try_from(count).map_err(|_| DataError::InvalidCount(count))
}

/// Per-class sizes for `count` examples in generation order
/// (positive, neutral, negative). The negative bucket absorbs the remainder.
pub fn bucket_sizes(count: usize) -> [(Sentiment, usize); 3] {
    let positive = count / 3;
    let neutral = count / 3;
    let negative = count - positive - neutral;
    [
        (Sentiment::Positive, positive),
        (Sentiment::Neutral, neutral),
        (Sentiment::Negative, negative),
    ]
}

/// Generates labelled sentiment data from fixed templates.
///
/// Output is a pure function of `(num_samples, seed)`: the same pair always
/// yields the same texts, labels and order.
///
/// ```
/// use sentiment_pipeline::SentimentDataGenerator;
///
/// let corpus = SentimentDataGenerator::new(9, 42).generate();
/// assert_eq!(corpus.len(), 9);
/// ```
#[derive(Debug, Clone)]
pub struct SentimentDataGenerator {
    num_samples: usize,
    seed: u64,
}

impl SentimentDataGenerator {
    pub fn new(num_samples: usize, seed: u64) -> Self {
        Self { num_samples, seed }
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn generate(&self) -> Corpus {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut samples = Vec::with_capacity(self.num_samples);

        for (sentiment, size) in bucket_sizes(self.num_samples) {
            let templates = templates_for(sentiment);
            for _ in 0..size {
                let template = templates[rng.random_range(0..templates.len())];
                let product = PRODUCTS[rng.random_range(0..PRODUCTS.len())];
                let text = template.replace(PRODUCT_PLACEHOLDER, product);
                samples.push(LabeledExample::new(text, sentiment));
            }
        }

        samples.shuffle(&mut rng);

        let corpus = Corpus::new(samples);
        for (sentiment, count) in corpus.class_counts() {
            info!("{} samples: {}", sentiment, count);
        }
        corpus
    }
}

/// Shorthand for `SentimentDataGenerator::new(count, seed).generate()`.
pub fn generate(count: usize, seed: u64) -> Corpus {
    SentimentDataGenerator::new(count, seed).generate()
}

fn templates_for(sentiment: Sentiment) -> &'static [&'static str] {
    match sentiment {
        Sentiment::Positive => POSITIVE_TEMPLATES,
        Sentiment::Neutral => NEUTRAL_TEMPLATES,
        Sentiment::Negative => NEGATIVE_TEMPLATES,
    }
}
