use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use log::info;
use serde::{Deserialize, Serialize};

use super::error::DataError;

/// The closed set of sentiment labels.
///
/// The declaration order (`Negative`, `Neutral`, `Positive`) is the class
/// index order used by the classifier, its probability rows and the
/// confusion matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    /// All labels in class index order
    pub const ALL: [Sentiment; 3] = [Sentiment::Negative, Sentiment::Neutral, Sentiment::Positive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Positive => "positive",
        }
    }

    /// Position of this label in [`Sentiment::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Self::Negative => 0,
            Self::Neutral => 1,
            Self::Positive => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            "positive" => Ok(Self::Positive),
            other => Err(DataError::UnknownLabel(other.to_string())),
        }
    }
}

/// One labelled text. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub text: String,
    pub sentiment: Sentiment,
}

impl LabeledExample {
    pub fn new(text: impl Into<String>, sentiment: Sentiment) -> Self {
        Self {
            text: text.into(),
            sentiment,
        }
    }
}

/// An ordered sequence of labelled examples.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    examples: Vec<LabeledExample>,
}

impl Corpus {
    pub fn new(examples: Vec<LabeledExample>) -> Self {
        Self { examples }
    }

    pub fn examples(&self) -> &[LabeledExample] {
        &self.examples
    }

    pub fn into_examples(self) -> Vec<LabeledExample> {
        self.examples
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Number of examples per label. Labels with no examples are reported as zero.
    pub fn class_counts(&self) -> BTreeMap<Sentiment, usize> {
        let mut counts: BTreeMap<Sentiment, usize> =
            Sentiment::ALL.iter().map(|&s| (s, 0)).collect();
        for example in &self.examples {
            *counts.entry(example.sentiment).or_default() += 1;
        }
        counts
    }

    /// Ratio of the smallest to the largest class count, `0.0` for an empty corpus.
    pub fn balance_ratio(&self) -> f64 {
        let counts = self.class_counts();
        let max = counts.values().copied().max().unwrap_or(0);
        let min = counts.values().copied().min().unwrap_or(0);
        if max == 0 {
            return 0.0;
        }
        min as f64 / max as f64
    }

    /// Writes the corpus as CSV with a `text,sentiment` header.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), DataError> {
        let path = path.as_ref();
        ensure_parent_dir(path)?;

        let mut writer = csv::Writer::from_writer(File::create(path)?);
        for example in &self.examples {
            writer.serialize(example)?;
        }
        writer.flush()?;

        info!("Wrote {} samples to {:?}", self.examples.len(), path);
        Ok(())
    }

    /// Writes the corpus as a pretty-printed JSON array of `{text, sentiment}` objects.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), DataError> {
        let path = path.as_ref();
        ensure_parent_dir(path)?;

        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &self.examples)?;
        writer.flush()?;

        info!("Wrote {} samples to {:?}", self.examples.len(), path);
        Ok(())
    }

    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let path = path.as_ref();
        info!("Loading data from {:?}", path);

        let mut reader = csv::Reader::from_reader(BufReader::new(File::open(path)?));
        let examples = reader
            .deserialize()
            .collect::<Result<Vec<LabeledExample>, _>>()?;

        info!("Loaded {} samples", examples.len());
        Ok(Self::new(examples))
    }

    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let path = path.as_ref();
        info!("Loading data from {:?}", path);

        let reader = BufReader::new(File::open(path)?);
        let examples: Vec<LabeledExample> = serde_json::from_reader(reader)?;

        info!("Loaded {} samples", examples.len());
        Ok(Self::new(examples))
    }
}

impl From<Vec<LabeledExample>> for Corpus {
    fn from(examples: Vec<LabeledExample>) -> Self {
        Self::new(examples)
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), DataError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join("sentiment-pipeline-tests")
            .join(format!("corpus-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_label_parsing() {
        assert_eq!("positive".parse::<Sentiment>().unwrap(), Sentiment::Positive);
        assert_eq!("neutral".parse::<Sentiment>().unwrap(), Sentiment::Neutral);
        assert_eq!("negative".parse::<Sentiment>().unwrap(), Sentiment::Negative);
        assert!(matches!(
            "Positive".parse::<Sentiment>(),
            Err(DataError::UnknownLabel(_))
        ));
    }

    #[test]
    fn test_class_index_order() {
        for (i, label) in Sentiment::ALL.iter().enumerate() {
            assert_eq!(label.index(), i);
            assert_eq!(Sentiment::from_index(i), Some(*label));
        }
        assert_eq!(Sentiment::from_index(3), None);
    }

    #[test]
    fn test_balance_ratio() {
        let corpus = Corpus::new(vec![
            LabeledExample::new("a", Sentiment::Positive),
            LabeledExample::new("b", Sentiment::Positive),
            LabeledExample::new("c", Sentiment::Neutral),
            LabeledExample::new("d", Sentiment::Negative),
        ]);
        assert_eq!(corpus.class_counts()[&Sentiment::Positive], 2);
        assert!((corpus.balance_ratio() - 0.5).abs() < 1e-12);
        assert_eq!(Corpus::default().balance_ratio(), 0.0);
    }

    #[test]
    fn test_csv_round_trip_with_commas() -> Result<(), DataError> {
        let dir = scratch_dir("csv");
        let path = dir.join("nested").join("data.csv");
        let corpus = Corpus::new(vec![
            LabeledExample::new("This desk is decent. Not great, not terrible.", Sentiment::Neutral),
            LabeledExample::new("I absolutely love my case! It's amazing!", Sentiment::Positive),
        ]);

        corpus.write_csv(&path)?;
        // Writing again into an existing directory must succeed
        corpus.write_csv(&path)?;

        let content = fs::read_to_string(&path)?;
        assert!(content.starts_with("text,sentiment"));
        assert_eq!(Corpus::read_csv(&path)?, corpus);

        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn test_json_round_trip() -> Result<(), DataError> {
        let dir = scratch_dir("json");
        let path = dir.join("data.json");
        let corpus = Corpus::new(vec![LabeledExample::new("Worst cable ever.", Sentiment::Negative)]);

        corpus.write_json(&path)?;
        let content = fs::read_to_string(&path)?;
        assert!(content.contains("\"sentiment\": \"negative\""));
        assert_eq!(Corpus::read_json(&path)?, corpus);

        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn test_unknown_label_rejected_on_read() -> Result<(), DataError> {
        let dir = scratch_dir("bad-label");
        fs::create_dir_all(&dir)?;
        let path = dir.join("data.csv");
        fs::write(&path, "text,sentiment\nhello,mixed\n")?;

        assert!(matches!(Corpus::read_csv(&path), Err(DataError::CsvError(_))));

        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn test_unwritable_path_surfaces_io_error() -> Result<(), DataError> {
        let dir = scratch_dir("unwritable");
        let occupied = dir.join("data");
        fs::create_dir_all(&occupied)?;
        let corpus = Corpus::new(vec![LabeledExample::new("Fine mouse.", Sentiment::Neutral)]);

        assert!(matches!(corpus.write_csv(&occupied), Err(DataError::IoError(_))));
        assert!(matches!(corpus.write_json(&occupied), Err(DataError::IoError(_))));
        assert!(matches!(
            Corpus::read_csv(dir.join("absent.csv")),
            Err(DataError::IoError(_))
        ));

        fs::remove_dir_all(&dir)?;
        Ok(())
    }
}
