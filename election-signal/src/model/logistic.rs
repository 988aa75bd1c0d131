//! L2-regularised binary logistic regression over sparse features.
//!
//! Minimises `C * sum(log_loss) + 0.5 * ||w||^2` (intercept not penalised) by
//! full-batch gradient descent. The objective is divided through by `C * n`
//! so the step size can be fixed from the loss's Lipschitz bound.

use super::{ModelError, SparseVector};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct LogisticConfig {
    /// Inverse regularisation strength.
    pub c: f64,
    pub max_iter: usize,
    pub tolerance: f64,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 1000,
            tolerance: 1e-6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    coefficients: Vec<f64>,
    intercept: f64,
    iterations: usize,
}

impl LogisticRegression {
    pub fn fit(
        x: &[SparseVector],
        y: &[f64],
        n_features: usize,
        config: LogisticConfig,
    ) -> Result<Self, ModelError> {
        if x.len() != y.len() {
            return Err(ModelError::LengthMismatch { samples: x.len(), labels: y.len() });
        }
        if x.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        if !(config.c > 0.0) {
            return Err(ModelError::InvalidParameter(format!("C must be positive, got {}", config.c)));
        }

        let n = x.len() as f64;
        let alpha = 1.0 / (config.c * n);
        let max_sq_norm = x
            .iter()
            .map(|row| row.iter().map(|(_, v)| v * v).sum::<f64>())
            .fold(0.0, f64::max);
        // Sigmoid curvature is at most 1/4; the intercept adds a unit feature.
        let lipschitz = 0.25 * (max_sq_norm + 1.0) + alpha;
        let step = 1.0 / lipschitz;

        let mut weights = vec![0.0; n_features];
        let mut bias = 0.0;
        let mut grad_w = vec![0.0; n_features];
        let mut iterations = 0;

        for iter in 0..config.max_iter {
            iterations = iter + 1;
            grad_w.iter_mut().for_each(|g| *g = 0.0);
            let mut grad_b = 0.0;

            for (row, &target) in x.iter().zip(y) {
                let error = sigmoid(dot(&weights, row) + bias) - target;
                for &(idx, value) in row {
                    grad_w[idx] += error * value;
                }
                grad_b += error;
            }

            let mut largest = (grad_b / n).abs();
            for (g, w) in grad_w.iter_mut().zip(&weights) {
                *g = *g / n + alpha * w;
                largest = largest.max(g.abs());
            }

            if largest < config.tolerance {
                debug!("Logistic regression converged after {} iterations", iter);
                break;
            }

            for (w, g) in weights.iter_mut().zip(&grad_w) {
                *w -= step * g;
            }
            bias -= step * grad_b / n;
        }

        Ok(Self {
            coefficients: weights,
            intercept: bias,
            iterations,
        })
    }

    /// Probability of the positive class for each row.
    pub fn predict_proba(&self, x: &[SparseVector]) -> Vec<f64> {
        x.iter()
            .map(|row| sigmoid(dot(&self.coefficients, row) + self.intercept))
            .collect()
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

fn dot(weights: &[f64], row: &SparseVector) -> f64 {
    row.iter()
        .map(|&(idx, value)| weights.get(idx).copied().unwrap_or(0.0) * value)
        .sum()
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let exp_z = z.exp();
        exp_z / (1.0 + exp_z)
    }
}
