use std::fmt;

use serde::Serialize;

use crate::data::Sentiment;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Held-out evaluation of a trained model. Reporting only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub accuracy: f64,
    /// Indexed by [`Sentiment::index`]
    pub per_class: [ClassMetrics; 3],
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
    /// `confusion[true][predicted]`
    pub confusion: [[usize; 3]; 3],
}

impl EvaluationReport {
    /// Builds the report from aligned true and predicted labels.
    /// Ratios with a zero denominator are reported as `0.0`.
    pub fn from_predictions(truth: &[Sentiment], predicted: &[Sentiment]) -> Self {
        let mut confusion = [[0usize; 3]; 3];
        for (t, p) in truth.iter().zip(predicted) {
            confusion[t.index()][p.index()] += 1;
        }

        let total: usize = confusion.iter().flatten().sum();
        let correct: usize = (0..3).map(|i| confusion[i][i]).sum();

        let per_class: [ClassMetrics; 3] = std::array::from_fn(|class| {
            let tp = confusion[class][class];
            let support: usize = confusion[class].iter().sum();
            let predicted_count: usize = confusion.iter().map(|row| row[class]).sum();
            let precision = ratio(tp, predicted_count);
            let recall = ratio(tp, support);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            ClassMetrics {
                precision,
                recall,
                f1,
                support,
            }
        });

        let macro_avg = average(&per_class, |_| 1.0 / 3.0, total);
        let weighted_avg = average(
            &per_class,
            |m| if total == 0 { 0.0 } else { m.support as f64 / total as f64 },
            total,
        );

        Self {
            accuracy: ratio(correct, total),
            per_class,
            macro_avg,
            weighted_avg,
            confusion,
        }
    }

    pub fn class(&self, sentiment: Sentiment) -> &ClassMetrics {
        &self.per_class[sentiment.index()]
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn average(per_class: &[ClassMetrics; 3], weight: impl Fn(&ClassMetrics) -> f64, total: usize) -> ClassMetrics {
    let mut avg = ClassMetrics {
        precision: 0.0,
        recall: 0.0,
        f1: 0.0,
        support: total,
    };
    for metrics in per_class {
        let w = weight(metrics);
        avg.precision += w * metrics.precision;
        avg.recall += w * metrics.recall;
        avg.f1 += w * metrics.f1;
    }
    avg
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for sentiment in Sentiment::ALL {
            write_row(f, sentiment.as_str(), self.class(sentiment))?;
        }
        writeln!(f)?;
        let total = self.macro_avg.support;
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10.2} {:>10}",
            "accuracy", "", "", self.accuracy, total
        )?;
        write_row(f, "macro avg", &self.macro_avg)?;
        write_row(f, "weighted avg", &self.weighted_avg)?;

        writeln!(f)?;
        writeln!(f, "Confusion matrix (rows = true, columns = predicted):")?;
        writeln!(
            f,
            "{:>10} {:>9} {:>9} {:>9}",
            "", "negative", "neutral", "positive"
        )?;
        for sentiment in Sentiment::ALL {
            let row = self.confusion[sentiment.index()];
            writeln!(
                f,
                "{:>10} {:>9} {:>9} {:>9}",
                sentiment.as_str(),
                row[0],
                row[1],
                row[2]
            )?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, name: &str, m: &ClassMetrics) -> fmt::Result {
    writeln!(
        f,
        "{:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
        name, m.precision, m.recall, m.f1, m.support
    )
}
