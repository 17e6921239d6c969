//! Least squares regression for trend lines.
//!
//! The dashboard's "budget vs revenue" panel draws a fitted line with a
//! confidence band. We solve
//!
//! ```text
//! minimize Σ (y_i - (β0 + β1 x_i))^2
//! ```
//!
//! with an SVD solve (robust for tall design matrices), then derive the
//! coefficient covariance `s² (XᵀX)⁻¹` to get the band around the mean line.

use nalgebra::{DMatrix, DVector, Matrix2, Vector2};

/// Two-sided 95% normal quantile used for confidence bands.
pub const Z_95: f64 = 1.959_963_984_540_054;

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// A simple linear fit `y = intercept + slope * x`.
#[derive(Debug, Clone)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
    pub n: usize,
    /// Covariance of `(intercept, slope)`.
    pub covariance: Matrix2<f64>,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Confidence interval of the mean response at `x` for quantile `z`.
    pub fn band(&self, x: f64, z: f64) -> (f64, f64) {
        let g = Vector2::new(1.0, x);
        let var = (g.transpose() * self.covariance * g)[(0, 0)].max(0.0);
        let half = z * var.sqrt();
        let y = self.predict(x);
        (y - half, y + half)
    }
}

/// Fit a line through complete `(x, y)` pairs.
///
/// Needs at least three points (one residual degree of freedom) and some
/// spread in `x`.
pub fn fit_linear(points: &[(f64, f64)]) -> Option<LinearFit> {
    let n = points.len();
    if n < 3 {
        return None;
    }

    let x = DMatrix::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { points[i].0 });
    let y = DVector::from_iterator(n, points.iter().map(|p| p.1));

    let xtx = x.transpose() * &x;
    let xtx = Matrix2::new(xtx[(0, 0)], xtx[(0, 1)], xtx[(1, 0)], xtx[(1, 1)]);
    let xtx_inv = xtx.try_inverse()?;

    let beta = solve_least_squares(&x, &y)?;
    let residuals = &y - &x * &beta;
    let sigma2 = residuals.norm_squared() / (n - 2) as f64;

    Some(LinearFit {
        intercept: beta[0],
        slope: beta[1],
        n,
        covariance: xtx_inv * sigma2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn exact_line_has_zero_width_band() {
        let points: Vec<(f64, f64)> = (0..5).map(|i| (i as f64, 1.5 + 0.5 * i as f64)).collect();
        let fit = fit_linear(&points).unwrap();

        assert!((fit.intercept - 1.5).abs() < 1e-9);
        assert!((fit.slope - 0.5).abs() < 1e-9);
        let (lo, hi) = fit.band(2.0, Z_95);
        assert!((hi - lo).abs() < 1e-6);
    }

    #[test]
    fn band_is_narrowest_at_mean_x() {
        let points = [(0.0, 1.0), (1.0, 2.5), (2.0, 2.9), (3.0, 4.4), (4.0, 5.1)];
        let fit = fit_linear(&points).unwrap();

        let width = |x: f64| {
            let (lo, hi) = fit.band(x, Z_95);
            hi - lo
        };
        assert!(width(2.0) < width(0.0));
        assert!(width(2.0) < width(4.0));
    }

    #[test]
    fn degenerate_inputs_have_no_fit() {
        assert!(fit_linear(&[(1.0, 1.0), (2.0, 2.0)]).is_none());
        assert!(fit_linear(&[(1.0, 1.0), (1.0, 2.0), (1.0, 3.0)]).is_none());
    }
}
