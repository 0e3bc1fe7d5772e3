//! Goodness-of-fit statistics used to validate the samplers.
//!
//! Samplers here are only correct in distribution, so their tests compare
//! empirical samples against a theoretical CDF with a one-sample
//! Kolmogorov-Smirnov test.

use std::f64::consts::PI;

/// Result of a one-sample Kolmogorov-Smirnov test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KsResult {
    /// Largest absolute gap between the empirical and reference CDFs.
    pub statistic: f64,
    /// Asymptotic p-value (Stephens' small-sample correction applied).
    pub pvalue: f64,
}

/// One-sample KS test of `samples` against the continuous CDF `cdf`.
///
/// NaN samples are ignored. An empty sample yields `statistic = 0` and
/// `pvalue = 1`.
pub fn ks_1samp<F>(samples: &[f64], cdf: F) -> KsResult
where
    F: Fn(f64) -> f64,
{
    let mut sorted: Vec<f64> = samples.iter().copied().filter(|x| !x.is_nan()).collect();
    if sorted.is_empty() {
        return KsResult {
            statistic: 0.0,
            pvalue: 1.0,
        };
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len() as f64;
    let mut d = 0.0f64;
    for (i, &x) in sorted.iter().enumerate() {
        let f = cdf(x);
        let lo = i as f64 / n;
        let hi = (i + 1) as f64 / n;
        d = d.max(hi - f).max(f - lo);
    }

    let sqrt_n = n.sqrt();
    let lambda = (sqrt_n + 0.12 + 0.11 / sqrt_n) * d;

    KsResult {
        statistic: d,
        pvalue: kolmogorov_survival(lambda),
    }
}

/// Two-sample KS test: were `a` and `b` drawn from the same distribution?
pub fn ks_2samp(a: &[f64], b: &[f64]) -> KsResult {
    let mut a: Vec<f64> = a.iter().copied().filter(|x| !x.is_nan()).collect();
    let mut b: Vec<f64> = b.iter().copied().filter(|x| !x.is_nan()).collect();
    if a.is_empty() || b.is_empty() {
        return KsResult {
            statistic: 0.0,
            pvalue: 1.0,
        };
    }
    a.sort_by(|x, y| x.total_cmp(y));
    b.sort_by(|x, y| x.total_cmp(y));

    let (na, nb) = (a.len() as f64, b.len() as f64);
    let (mut i, mut j) = (0usize, 0usize);
    let mut d = 0.0f64;
    while i < a.len() && j < b.len() {
        let x = a[i].min(b[j]);
        while i < a.len() && a[i] <= x {
            i += 1;
        }
        while j < b.len() && b[j] <= x {
            j += 1;
        }
        d = d.max((i as f64 / na - j as f64 / nb).abs());
    }

    let ne = na * nb / (na + nb);
    let sqrt_ne = ne.sqrt();
    let lambda = (sqrt_ne + 0.12 + 0.11 / sqrt_ne) * d;

    KsResult {
        statistic: d,
        pvalue: kolmogorov_survival(lambda),
    }
}

/// Survival function of the Kolmogorov distribution, `P(K > lambda)`.
///
/// Uses the Jacobi-theta form for small `lambda`, where the alternating
/// series converges too slowly.
pub fn kolmogorov_survival(lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return 1.0;
    }

    let p = if lambda < 1.18 {
        let y = (-PI * PI / (8.0 * lambda * lambda)).exp();
        let cdf = (2.0 * PI).sqrt() / lambda * (y + y.powi(9) + y.powi(25) + y.powi(49));
        1.0 - cdf
    } else {
        let x = (-2.0 * lambda * lambda).exp();
        2.0 * (x - x.powi(4) + x.powi(9))
    };

    p.clamp(0.0, 1.0)
}
