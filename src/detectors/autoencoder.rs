//! Autoencoder reconstruction-error detection
//!
//! An 8→8→4 encoder and 4→8→8 decoder with a sigmoid output layer. The
//! model is initialized once per segment and its weights persist across
//! detection calls; it is not trained on historical data, so its
//! reconstruction error is a relative-within-batch signal ranked against
//! the batch's own error quantile, not an absolute learned baseline.

use crate::error::{CarbonError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

/// Bottleneck width of the encoder
pub const ENCODING_DIM: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum Activation {
    ReLU,
    Sigmoid,
}

/// Encoder/decoder network for reconstruction-error scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoEncoder {
    weights: Vec<Array2<f64>>,
    biases: Vec<Array1<f64>>,
    activations: Vec<Activation>,
    input_size: usize,
}

impl AutoEncoder {
    /// Build a freshly initialized model for `input_size` features with
    /// Xavier-uniform weights drawn from the seeded generator.
    pub fn new(input_size: usize, encoding_dim: usize, seed: u64) -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

        // encoder: in -> 2e -> e, decoder: e -> 2e -> in
        let layer_sizes = [
            input_size,
            encoding_dim * 2,
            encoding_dim,
            encoding_dim * 2,
            input_size,
        ];
        let activations = vec![
            Activation::ReLU,
            Activation::ReLU,
            Activation::ReLU,
            Activation::Sigmoid,
        ];

        let mut weights = Vec::with_capacity(layer_sizes.len() - 1);
        let mut biases = Vec::with_capacity(layer_sizes.len() - 1);
        for pair in layer_sizes.windows(2) {
            let (n_in, n_out) = (pair[0], pair[1]);
            let scale = (2.0 / (n_in + n_out) as f64).sqrt();
            let values: Vec<f64> = (0..n_in * n_out)
                .map(|_| rng.gen::<f64>() * 2.0 * scale - scale)
                .collect();
            // Shape is n_in * n_out by construction
            weights.push(
                Array2::from_shape_vec((n_in, n_out), values)
                    .unwrap_or_else(|_| Array2::zeros((n_in, n_out))),
            );
            biases.push(Array1::zeros(n_out));
        }

        Self {
            weights,
            biases,
            activations,
            input_size,
        }
    }

    fn forward(&self, x: &Array2<f64>) -> Array2<f64> {
        let mut activation = x.clone();
        for ((w, b), act) in self
            .weights
            .iter()
            .zip(self.biases.iter())
            .zip(self.activations.iter())
        {
            let z = activation.dot(w) + b;
            activation = match act {
                Activation::ReLU => z.mapv(|v| v.max(0.0)),
                Activation::Sigmoid => z.mapv(|v| 1.0 / (1.0 + (-v).exp())),
            };
        }
        activation
    }

    /// Per-row mean squared reconstruction error
    pub fn reconstruction_errors(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.input_size {
            return Err(CarbonError::ShapeError(format!(
                "autoencoder expects {} features, got {}",
                self.input_size,
                x.ncols()
            )));
        }
        if x.nrows() == 0 {
            return Err(CarbonError::DataError(
                "cannot score an empty batch".to_string(),
            ));
        }

        let reconstructed = self.forward(x);
        let squared = (x - &reconstructed).mapv(|v| v * v);
        squared
            .mean_axis(Axis(1))
            .ok_or_else(|| CarbonError::DataError("failed to reduce reconstruction errors".to_string()))
    }

    /// Flag rows whose reconstruction error exceeds the `quantile`-quantile
    /// of the batch's own errors.
    pub fn detect(&self, x: &Array2<f64>, quantile: f64) -> Result<Vec<bool>> {
        let errors = self.reconstruction_errors(x)?;
        let cutoff = error_quantile(&errors, quantile)?;
        Ok(errors.iter().map(|&e| e > cutoff).collect())
    }
}

/// Linear-interpolated quantile of the error vector
fn error_quantile(errors: &Array1<f64>, q: f64) -> Result<f64> {
    if errors.is_empty() {
        return Err(CarbonError::DataError(
            "quantile of an empty error vector".to_string(),
        ));
    }

    let mut sorted: Vec<f64> = errors.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        Ok(sorted[lower])
    } else {
        let fraction = position - lower as f64;
        Ok(sorted[lower] + fraction * (sorted[upper] - sorted[lower]))
    }
}
