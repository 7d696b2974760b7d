use std::collections::{BTreeMap, HashMap, HashSet};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokenizers::pre_tokenizers::whitespace::Whitespace;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer};

use super::error::ClassifierError;
use super::stop_words::is_stop_word;
use super::utils::{normalize_sparse, SparseRow};

/// Bag-of-n-grams TF-IDF vectorizer.
///
/// Text is lower-cased, split into word tokens, stripped of English stop
/// words and expanded into n-grams. The fitted vocabulary maps every kept
/// term to a column, assigned in alphabetical order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    max_features: Option<usize>,
    ngram_range: (usize, usize),
    stop_words: bool,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(Some(5000), (1, 2))
    }
}

impl TfidfVectorizer {
    pub fn new(max_features: Option<usize>, ngram_range: (usize, usize)) -> Self {
        Self {
            max_features,
            ngram_range,
            stop_words: true,
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
        }
    }

    /// Disables stop-word removal.
    pub fn without_stop_words(mut self) -> Self {
        self.stop_words = false;
        self
    }

    pub fn max_features(&self) -> Option<usize> {
        self.max_features
    }

    pub fn ngram_range(&self) -> (usize, usize) {
        self.ngram_range
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    /// Checks that every vocabulary column has an idf weight, as a
    /// deserialized vectorizer may not.
    pub(crate) fn check_columns(&self) -> Result<(), String> {
        if self.idf.len() != self.vocabulary.len() {
            return Err(format!(
                "vocabulary has {} terms but {} idf weights",
                self.vocabulary.len(),
                self.idf.len()
            ));
        }
        if let Some((term, index)) = self
            .vocabulary
            .iter()
            .find(|(_, index)| **index >= self.idf.len())
        {
            return Err(format!("term {:?} maps to out-of-range column {}", term, index));
        }
        Ok(())
    }

    /// Lower-cased word tokens with stop words removed.
    pub fn tokenize(&self, text: &str) -> Result<Vec<String>, ClassifierError> {
        let lowered = text.to_lowercase();
        let mut pretokenized = PreTokenizedString::from(lowered.as_str());
        Whitespace::default()
            .pre_tokenize(&mut pretokenized)
            .map_err(|e| ClassifierError::TokenizerError(e.to_string()))?;

        let tokens = pretokenized
            .get_splits(OffsetReferential::Original, OffsetType::Byte)
            .into_iter()
            .map(|(token, _, _)| token)
            .filter(|token| {
                token.chars().count() >= 2
                    && token.chars().all(|c| c.is_alphanumeric() || c == '_')
            })
            .filter(|token| !(self.stop_words && is_stop_word(token)))
            .map(str::to_string)
            .collect();
        Ok(tokens)
    }

    /// Every n-gram term of `text` within the configured range, in order of appearance.
    pub fn analyze(&self, text: &str) -> Result<Vec<String>, ClassifierError> {
        let tokens = self.tokenize(text)?;
        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n == 0 || n > tokens.len() {
                continue;
            }
            terms.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        Ok(terms)
    }

    /// Learns the vocabulary and inverse document frequencies from `texts`.
    pub fn fit<S: AsRef<str>>(&mut self, texts: &[S]) -> Result<(), ClassifierError> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ClassifierError::ValidationError(format!(
                "Invalid n-gram range ({}, {})",
                min_n, max_n
            )));
        }
        if self.max_features == Some(0) {
            return Err(ClassifierError::ValidationError(
                "max_features must be positive".to_string(),
            ));
        }

        let mut term_counts: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        for text in texts {
            let terms = self.analyze(text.as_ref())?;
            let unique: HashSet<&String> = terms.iter().collect();
            for term in unique {
                *document_frequency.entry(term.clone()).or_default() += 1;
            }
            for term in terms {
                *term_counts.entry(term).or_default() += 1;
            }
        }

        if term_counts.is_empty() {
            return Err(ClassifierError::TrainingError(
                "Empty vocabulary; the documents contain only stop words".to_string(),
            ));
        }

        let mut ranked: Vec<(String, usize)> = term_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        if let Some(limit) = self.max_features {
            ranked.truncate(limit);
        }

        let mut kept: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        kept.sort();

        let n_documents = texts.len() as f64;
        self.idf = kept
            .iter()
            .map(|term| {
                let df = document_frequency.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n_documents) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        self.vocabulary = kept
            .into_iter()
            .enumerate()
            .map(|(index, term)| (term, index))
            .collect();

        info!(
            "Fitted vectorizer on {} documents, vocabulary size {}",
            texts.len(),
            self.vocabulary.len()
        );
        Ok(())
    }

    /// Maps `text` to an L2-normalised sparse TF-IDF row. Unknown terms are ignored.
    pub fn transform(&self, text: &str) -> Result<SparseRow, ClassifierError> {
        if !self.is_fitted() {
            return Err(ClassifierError::PredictionError(
                "Vectorizer has not been fitted".to_string(),
            ));
        }

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.analyze(text)? {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_default() += 1.0;
            }
        }

        let mut row: SparseRow = counts
            .into_iter()
            .map(|(index, count)| (index, count * self.idf[index]))
            .collect();
        normalize_sparse(&mut row);

        if row.is_empty() {
            debug!("No known terms in input of {} bytes", text.len());
        }
        Ok(row)
    }

    pub fn transform_batch<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<SparseRow>, ClassifierError> {
        texts.iter().map(|text| self.transform(text.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_drops_stop_words() {
        let vectorizer = TfidfVectorizer::default();
        let tokens = vectorizer.tokenize("I LOVE this Laptop!").unwrap();
        assert_eq!(tokens, vec!["love", "laptop"]);
    }

    #[test]
    fn test_analyze_builds_bigrams() {
        let vectorizer = TfidfVectorizer::default();
        let terms = vectorizer.analyze("great coffee maker").unwrap();
        assert_eq!(
            terms,
            vec!["great", "coffee", "maker", "great coffee", "coffee maker"]
        );
    }

    #[test]
    fn test_vocabulary_is_alphabetical_and_capped() {
        let mut vectorizer = TfidfVectorizer::new(Some(2), (1, 1));
        vectorizer
            .fit(&["zebra zebra apple", "zebra mango", "apple"])
            .unwrap();
        let terms: Vec<&String> = vectorizer.vocabulary().keys().collect();
        assert_eq!(terms, vec!["apple", "zebra"]);
        assert_eq!(vectorizer.vocabulary()["apple"], 0);
        assert_eq!(vectorizer.vocabulary()["zebra"], 1);
    }

    #[test]
    fn test_transform_is_unit_norm() {
        let mut vectorizer = TfidfVectorizer::default();
        vectorizer.fit(&["great laptop", "awful laptop"]).unwrap();
        let row = vectorizer.transform("great laptop").unwrap();
        let norm: f64 = row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_and_unknown_text_map_to_zero_vector() {
        let mut vectorizer = TfidfVectorizer::default();
        vectorizer.fit(&["great laptop"]).unwrap();
        assert!(vectorizer.transform("").unwrap().is_empty());
        assert!(vectorizer.transform("completely unseen words").unwrap().is_empty());
    }

    #[test]
    fn test_fit_rejects_stop_word_only_corpus() {
        let mut vectorizer = TfidfVectorizer::default();
        let result = vectorizer.fit(&["the and of", "it is"]);
        assert!(matches!(result, Err(ClassifierError::TrainingError(_))));
    }

    #[test]
    fn test_stop_words_can_be_kept() {
        let vectorizer = TfidfVectorizer::default().without_stop_words();
        assert_eq!(vectorizer.tokenize("It is okay").unwrap(), vec!["it", "is", "okay"]);
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let vectorizer = TfidfVectorizer::default();
        assert!(matches!(
            vectorizer.transform("hello"),
            Err(ClassifierError::PredictionError(_))
        ));
    }
}
