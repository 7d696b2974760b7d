use sentiment_pipeline::data::templates::PRODUCTS;
use sentiment_pipeline::{generate, validate_count, Corpus, DataError, Sentiment};
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join("sentiment-pipeline-tests")
        .join(format!("generator-{}-{}", name, std::process::id()))
}

#[test]
fn test_same_seed_gives_byte_identical_files() -> Result<(), DataError> {
    let dir = scratch_dir("determinism");
    let first = dir.join("first.csv");
    let second = dir.join("second.csv");

    generate(200, 1234).write_csv(&first)?;
    generate(200, 1234).write_csv(&second)?;
    assert_eq!(std::fs::read(&first)?, std::fs::read(&second)?);

    generate(200, 1234).write_json(dir.join("first.json"))?;
    generate(200, 1234).write_json(dir.join("second.json"))?;
    assert_eq!(
        std::fs::read(dir.join("first.json"))?,
        std::fs::read(dir.join("second.json"))?
    );

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn test_different_seeds_differ() {
    assert_ne!(generate(100, 1), generate(100, 2));
}

#[test]
fn test_bucket_sizes_put_the_remainder_in_negative() {
    for count in [0usize, 1, 2, 3, 4, 5, 10, 11, 100, 1000] {
        let corpus = generate(count, 42);
        assert_eq!(corpus.len(), count);

        let third = count / 3;
        let counts = corpus.class_counts();
        assert_eq!(counts[&Sentiment::Positive], third, "positive of {}", count);
        assert_eq!(counts[&Sentiment::Neutral], third, "neutral of {}", count);
        assert_eq!(counts[&Sentiment::Negative], count - 2 * third, "negative of {}", count);
        assert_eq!(counts.values().sum::<usize>(), count);
    }
}

#[test]
fn test_nine_examples_with_seed_42() {
    let corpus = generate(9, 42);
    let counts = corpus.class_counts();
    assert_eq!(counts[&Sentiment::Positive], 3);
    assert_eq!(counts[&Sentiment::Neutral], 3);
    assert_eq!(counts[&Sentiment::Negative], 3);

    for example in corpus.examples() {
        assert!(
            PRODUCTS.iter().any(|product| example.text.contains(product)),
            "no product noun in {:?}",
            example.text
        );
        assert!(!example.text.contains("{product}"));
    }
}

#[test]
fn test_csv_read_back_matches() -> Result<(), DataError> {
    let dir = scratch_dir("readback");
    let path = dir.join("nested").join("data.csv");
    let corpus = generate(30, 5);
    corpus.write_csv(&path)?;
    assert_eq!(Corpus::read_csv(&path)?, corpus);
    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn test_negative_count_is_rejected() {
    assert!(matches!(validate_count(-10), Err(DataError::InvalidCount(-10))));
    tokio_test::assert_ok!(validate_count(0));
}

#[test]
fn test_missing_file_surfaces_io_error() {
    let result = Corpus::read_json(scratch_dir("missing").join("absent.json"));
    assert!(matches!(result, Err(DataError::IoError(_))));
}
