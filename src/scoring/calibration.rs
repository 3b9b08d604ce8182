//! Batch-relative score calibration.
//!
//! Raw classifier scores for a city grid tend to cluster near one extreme,
//! which renders poorly as a probability surface. The calibration is a
//! rank-based normal-scores transform: tie-averaged ranks become plotting
//! positions `rank / (n + 1)`, pass through the standard-normal inverse CDF
//! and come back through the CDF. The result is rank-preserving and bounded
//! in (0, 1). It is computed over one request's batch, so calibrated values
//! are comparable within a response but not across responses.

use std::cmp::Ordering;

/// Calibrate a batch of raw probabilities. Output order matches input
/// order; equal inputs get equal outputs.
pub fn calibrate(raw: &[f64]) -> Vec<f64> {
    let n = raw.len();
    if n == 0 {
        return Vec::new();
    }

    let ranks = average_ranks(raw);
    ranks
        .iter()
        .map(|rank| {
            let p = rank / (n as f64 + 1.0);
            normal_cdf(normal_inverse_cdf(p))
        })
        .collect()
}

/// 1-based ranks with ties averaged.
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // Positions i..=j hold tied values; all get the mean rank.
        let mean_rank = (i + j + 2) as f64 / 2.0;
        for &idx in &order[i..=j] {
            ranks[idx] = mean_rank;
        }
        i = j + 1;
    }
    ranks
}

/// Standard normal CDF via erf.
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + libm::erf(z / std::f64::consts::SQRT_2))
}

/// Standard normal inverse CDF, Acklam's rational approximation
/// (relative error below 1.15e-9 on (0, 1)).
pub fn normal_inverse_cdf(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    debug_assert!(p > 0.0 && p < 1.0, "p must be in the open unit interval");

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_output_is_in_unit_interval() {
        let raw = vec![0.001, 0.002, 0.0021, 0.8, 0.3, 0.0001, 0.0019];
        for value in calibrate(&raw) {
            assert!(value > 0.0 && value < 1.0, "out of range: {value}");
        }
    }

    #[test]
    fn test_calibration_preserves_ranks() {
        let raw = vec![0.05, 0.9, 0.11, 0.02, 0.4];
        let calibrated = calibrate(&raw);
        for i in 0..raw.len() {
            for j in 0..raw.len() {
                if raw[i] < raw[j] {
                    assert!(
                        calibrated[i] < calibrated[j],
                        "rank order broken at ({i}, {j})"
                    );
                }
            }
        }
    }

    #[test]
    fn test_ties_calibrate_equal() {
        let calibrated = calibrate(&[0.3, 0.7, 0.3]);
        assert_relative_eq!(calibrated[0], calibrated[2]);
        assert!(calibrated[1] > calibrated[0]);
    }

    #[test]
    fn test_constant_batch_maps_to_half() {
        let calibrated = calibrate(&[0.9, 0.9, 0.9, 0.9]);
        for value in calibrated {
            assert_relative_eq!(value, 0.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_empty_and_singleton_batches() {
        assert!(calibrate(&[]).is_empty());
        let single = calibrate(&[0.87]);
        assert_relative_eq!(single[0], 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_clustered_scores_spread_out() {
        // Scores packed into [0.90, 0.99] should fan out across most of (0, 1).
        let raw: Vec<f64> = (0..9).map(|i| 0.90 + 0.01 * i as f64).collect();
        let calibrated = calibrate(&raw);
        assert!(calibrated[0] < 0.2);
        assert!(calibrated[8] > 0.8);
    }

    #[test]
    fn test_normal_cdf_reference_values() {
        assert_relative_eq!(normal_cdf(0.0), 0.5);
        assert_relative_eq!(normal_cdf(1.959964), 0.975, epsilon = 1e-5);
        assert_relative_eq!(normal_cdf(-1.959964), 0.025, epsilon = 1e-5);
    }

    #[test]
    fn test_inverse_cdf_round_trips() {
        for &p in &[0.001, 0.025, 0.1, 0.5, 0.9, 0.975, 0.999] {
            assert_relative_eq!(normal_cdf(normal_inverse_cdf(p)), p, epsilon = 1e-8);
        }
    }
}
