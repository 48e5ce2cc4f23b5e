//! Ordinary least squares with an intercept
//!
//! Columns are centered so the intercept drops out, then the centered system is
//! solved through a thin SVD. Singular values below the rank cutoff are
//! discarded, so constant or collinear columns yield the minimum-norm fit
//! instead of an error.

use faer::Mat;

use crate::features::FeatureRow;
use crate::{Result, TitanicError};

const DIM: usize = FeatureRow::DIM;

/// Fitted coefficients in schema order plus the intercept
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquaresFit {
    pub coefficients: [f64; FeatureRow::DIM],
    pub intercept: f64,
    /// Numerical rank of the centered design matrix
    pub rank: usize,
}

/// Fit `y ≈ X·β + b` minimizing squared error
pub fn fit_least_squares(rows: &[FeatureRow], targets: &[f64]) -> Result<LeastSquaresFit> {
    if rows.len() != targets.len() {
        return Err(TitanicError::Training(format!(
            "{} rows but {} targets",
            rows.len(),
            targets.len()
        )));
    }
    if rows.is_empty() {
        return Err(TitanicError::Training("no training rows".to_string()));
    }

    let n = rows.len();
    let x: Vec<[f64; DIM]> = rows.iter().map(|r| r.to_array()).collect();

    let mut x_mean = [0.0; DIM];
    for values in &x {
        for (m, v) in x_mean.iter_mut().zip(values) {
            *m += v / n as f64;
        }
    }
    let y_mean = targets.iter().sum::<f64>() / n as f64;

    let centered = Mat::<f64>::from_fn(n, DIM, |i, j| x[i][j] - x_mean[j]);
    let svd = centered.thin_svd();
    let (u, s, v) = (svd.u(), svd.s_diagonal(), svd.v());

    let s_max = (0..s.nrows()).map(|i| s.read(i)).fold(0.0, f64::max);
    let cutoff = s_max * n.max(DIM) as f64 * f64::EPSILON;

    // β = V · Σ⁺ · Uᵀ · (y - ȳ)
    let mut beta = [0.0; DIM];
    let mut rank = 0;
    for k in 0..s.nrows() {
        let sigma = s.read(k);
        if sigma <= cutoff {
            continue;
        }
        rank += 1;
        let projection: f64 = (0..n).map(|i| u.read(i, k) * (targets[i] - y_mean)).sum();
        let scale = projection / sigma;
        for (j, b) in beta.iter_mut().enumerate() {
            *b += v.read(j, k) * scale;
        }
    }

    if rank < DIM {
        log::warn!(
            "Design matrix has rank {} of {}, using the minimum-norm fit",
            rank,
            DIM
        );
    }

    let intercept = y_mean - beta.iter().zip(x_mean).map(|(b, m)| b * m).sum::<f64>();
    Ok(LeastSquaresFit {
        coefficients: beta,
        intercept,
        rank,
    })
}
