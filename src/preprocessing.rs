//! Feature standardization
//!
//! Z-score scaler over dense matrices, refit on every detection batch.

use crate::error::{CarbonError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Standard (z-score) scaler: `(x - mean) / std` per column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Array1<f64>,
    stds: Array1<f64>,
    is_fitted: bool,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self {
            means: Array1::zeros(0),
            stds: Array1::zeros(0),
            is_fitted: false,
        }
    }

    /// Fit column means and population standard deviations
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        if x.nrows() == 0 {
            return Err(CarbonError::DataError(
                "cannot fit scaler on an empty matrix".to_string(),
            ));
        }

        self.means = x
            .mean_axis(Axis(0))
            .ok_or_else(|| CarbonError::DataError("failed to compute column means".to_string()))?;
        // Population std; zero-variance columns pass through unscaled
        self.stds = x.std_axis(Axis(0), 0.0).mapv(|s| if s > 0.0 { s } else { 1.0 });
        self.is_fitted = true;
        Ok(self)
    }

    /// Standardize the matrix using the fitted parameters
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(CarbonError::DataError("scaler not fitted".to_string()));
        }
        if x.ncols() != self.means.len() {
            return Err(CarbonError::ShapeError(format!(
                "expected {} columns, got {}",
                self.means.len(),
                x.ncols()
            )));
        }

        let mut scaled = x.clone();
        for mut row in scaled.rows_mut() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = (*value - self.means[j]) / self.stds[j];
            }
        }
        Ok(scaled)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_standardized_columns_have_zero_mean() {
        let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0]];
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&x).unwrap();

        for j in 0..2 {
            let mean = scaled.column(j).mean().unwrap();
            assert!(mean.abs() < 1e-10);
        }
    }

    #[test]
    fn test_constant_column_passes_through() {
        let x = array![[5.0, 1.0], [5.0, 2.0], [5.0, 3.0]];
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&x).unwrap();

        // Zero variance: column is centered but not divided by zero
        for i in 0..3 {
            assert_eq!(scaled[[i, 0]], 0.0);
            assert!(scaled[[i, 0]].is_finite());
        }
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let x = array![[1.0], [2.0]];
        let scaler = StandardScaler::new();
        assert!(scaler.transform(&x).is_err());
    }

    #[test]
    fn test_column_count_mismatch_fails() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let mut scaler = StandardScaler::new();
        scaler.fit(&x).unwrap();

        let bad = array![[1.0], [2.0]];
        assert!(matches!(
            scaler.transform(&bad),
            Err(CarbonError::ShapeError(_))
        ));
    }

    #[test]
    fn test_empty_matrix_rejected() {
        let x = Array2::<f64>::zeros((0, 3));
        let mut scaler = StandardScaler::new();
        assert!(scaler.fit(&x).is_err());
    }
}
