use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::error::ClassifierError;
use crate::data::{Corpus, LabeledExample, Sentiment};

/// Splits `corpus` into `(train, test)` preserving per-class proportions.
///
/// Each class contributes `round(n_class * test_size)` examples to the test
/// partition, clamped so both partitions keep at least one example of every
/// class. The result depends only on the corpus and `seed`.
pub fn stratified_split(
    corpus: &Corpus,
    test_size: f64,
    seed: u64,
) -> Result<(Vec<LabeledExample>, Vec<LabeledExample>), ClassifierError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(ClassifierError::ValidationError(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    for (sentiment, count) in corpus.class_counts() {
        if count < 2 {
            return Err(ClassifierError::InsufficientData(format!(
                "Class '{}' has {} example(s); at least 2 are needed for a stratified split",
                sentiment, count
            )));
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for sentiment in Sentiment::ALL {
        let mut members: Vec<&LabeledExample> = corpus
            .examples()
            .iter()
            .filter(|example| example.sentiment == sentiment)
            .collect();
        members.shuffle(&mut rng);

        let n_class = members.len();
        let n_test = ((n_class as f64 * test_size).round() as usize).clamp(1, n_class - 1);
        let (class_test, class_train) = members.split_at(n_test);
        test.extend(class_test.iter().map(|&example| example.clone()));
        train.extend(class_train.iter().map(|&example| example.clone()));
    }

    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    info!("Training samples: {}", train.len());
    info!("Test samples: {}", test.len());
    Ok((train, test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate;

    #[test]
    fn test_split_preserves_class_proportions() {
        let corpus = generate(300, 42);
        let (train, test) = stratified_split(&corpus, 0.2, 42).unwrap();
        assert_eq!(train.len() + test.len(), 300);
        assert_eq!(test.len(), 60);

        let test_corpus = Corpus::new(test);
        for count in test_corpus.class_counts().values() {
            assert_eq!(*count, 20);
        }
    }

    #[test]
    fn test_split_is_deterministic() {
        let corpus = generate(90, 1);
        assert_eq!(
            stratified_split(&corpus, 0.3, 9).unwrap(),
            stratified_split(&corpus, 0.3, 9).unwrap()
        );
    }

    #[test]
    fn test_tiny_classes_keep_one_on_each_side() {
        let corpus = generate(6, 3);
        let (train, test) = stratified_split(&corpus, 0.2, 3).unwrap();
        assert_eq!(train.len(), 3);
        assert_eq!(test.len(), 3);
    }

    #[test]
    fn test_split_rejects_bad_inputs() {
        let corpus = generate(30, 42);
        assert!(matches!(
            stratified_split(&corpus, 1.0, 42),
            Err(ClassifierError::ValidationError(_))
        ));
        assert!(matches!(
            stratified_split(&generate(3, 42), 0.2, 42),
            Err(ClassifierError::InsufficientData(_))
        ));
    }
}
