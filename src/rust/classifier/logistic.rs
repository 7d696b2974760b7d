use log::{debug, info};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::utils::{softmax, SparseRow};

const LEARNING_RATE: f64 = 1.0;

/// Multinomial logistic regression over sparse feature rows.
///
/// Minimises mean cross-entropy plus `||W||² / (2·C·n)` with full-batch
/// gradient descent. The intercept is not penalised. Training is
/// deterministic: the same rows and labels always give the same weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    c: f64,
    max_iter: usize,
    tol: f64,
    coef: Array2<f64>,
    intercept: Array1<f64>,
    n_iter: usize,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(1.0, 1000)
    }
}

impl LogisticRegression {
    pub fn new(c: f64, max_iter: usize) -> Self {
        Self {
            c,
            max_iter,
            tol: 1e-4,
            coef: Array2::zeros((0, 0)),
            intercept: Array1::zeros(0),
            n_iter: 0,
        }
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn coef(&self) -> &Array2<f64> {
        &self.coef
    }

    pub fn intercept(&self) -> &Array1<f64> {
        &self.intercept
    }

    pub fn n_classes(&self) -> usize {
        self.coef.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.coef.ncols()
    }

    /// Iterations run by the last `fit`.
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    pub fn is_fitted(&self) -> bool {
        self.coef.nrows() > 0
    }

    pub fn fit(
        &mut self,
        rows: &[SparseRow],
        labels: &[usize],
        n_features: usize,
        n_classes: usize,
    ) -> Result<(), ClassifierError> {
        if rows.is_empty() {
            return Err(ClassifierError::InsufficientData(
                "No training rows".to_string(),
            ));
        }
        if rows.len() != labels.len() {
            return Err(ClassifierError::ValidationError(format!(
                "{} rows but {} labels",
                rows.len(),
                labels.len()
            )));
        }
        if let Some(&bad) = labels.iter().find(|&&label| label >= n_classes) {
            return Err(ClassifierError::ValidationError(format!(
                "Label {} out of range for {} classes",
                bad, n_classes
            )));
        }
        if !(self.c > 0.0) {
            return Err(ClassifierError::ValidationError(
                "Regularization strength must be positive".to_string(),
            ));
        }

        let n = rows.len() as f64;
        let penalty = 1.0 / (self.c * n);
        let mut coef = Array2::<f64>::zeros((n_classes, n_features));
        let mut intercept = Array1::<f64>::zeros(n_classes);
        let mut n_iter = 0;

        for iteration in 0..self.max_iter {
            let mut grad_coef = Array2::<f64>::zeros((n_classes, n_features));
            let mut grad_intercept = Array1::<f64>::zeros(n_classes);
            let mut loss = 0.0;

            for (row, &label) in rows.iter().zip(labels) {
                let probs = softmax(&scores(&coef, &intercept, row));
                loss -= probs[label].max(f64::MIN_POSITIVE).ln();
                for class in 0..n_classes {
                    let residual = probs[class] - if class == label { 1.0 } else { 0.0 };
                    grad_intercept[class] += residual;
                    for &(feature, value) in row {
                        grad_coef[[class, feature]] += residual * value;
                    }
                }
            }

            grad_coef /= n;
            grad_intercept /= n;
            grad_coef.scaled_add(penalty, &coef);

            let max_grad = grad_coef
                .iter()
                .chain(grad_intercept.iter())
                .fold(0.0_f64, |acc, g| acc.max(g.abs()));

            n_iter = iteration + 1;
            if iteration % 100 == 0 {
                debug!(
                    "iter {}: loss {:.6}, max gradient {:.2e}",
                    iteration,
                    loss / n,
                    max_grad
                );
            }
            if max_grad < self.tol {
                break;
            }

            coef.scaled_add(-LEARNING_RATE, &grad_coef);
            intercept.scaled_add(-LEARNING_RATE, &grad_intercept);
        }

        if n_iter == self.max_iter {
            info!("Logistic regression reached max_iter={} before converging", self.max_iter);
        } else {
            info!("Logistic regression converged after {} iterations", n_iter);
        }

        self.coef = coef;
        self.intercept = intercept;
        self.n_iter = n_iter;
        Ok(())
    }

    /// One probability row per input row, columns in class index order.
    pub fn predict_proba(&self, rows: &[SparseRow]) -> Result<Array2<f64>, ClassifierError> {
        if !self.is_fitted() {
            return Err(ClassifierError::PredictionError(
                "Model has not been fitted".to_string(),
            ));
        }
        let mut out = Array2::<f64>::zeros((rows.len(), self.n_classes()));
        for (i, row) in rows.iter().enumerate() {
            if let Some(&(feature, _)) = row.iter().find(|(f, _)| *f >= self.n_features()) {
                return Err(ClassifierError::PredictionError(format!(
                    "Feature index {} out of range",
                    feature
                )));
            }
            out.row_mut(i)
                .assign(&softmax(&scores(&self.coef, &self.intercept, row)));
        }
        Ok(out)
    }
}

fn scores(coef: &Array2<f64>, intercept: &Array1<f64>, row: &[(usize, f64)]) -> Array1<f64> {
    let mut out = intercept.clone();
    for (class, score) in out.iter_mut().enumerate() {
        for &(feature, value) in row {
            *score += coef[[class, feature]] * value;
        }
    }
    out
}
