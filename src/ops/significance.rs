//! Population statistics over angle values sharing a state and a generic number.
//!
//! The Student-t distribution function is evaluated through the regularized incomplete beta
//! function, itself computed with a Lentz continued fraction on top of a Lanczos log-gamma.

use std::f64::consts::PI;

/// Score reported when the comparison population has no spread (or too few members).
pub const UNDEFINED_SIGNIFICANCE: f64 = 0.501;

/// Median of `values`: the middle element for odd counts, the mean of the two middle
/// elements for even counts. `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    })
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (`n - 1` denominator); NaN below two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Natural log of the gamma function (Lanczos, g = 7).
pub fn ln_gamma(x: f64) -> f64 {
    const COEFFS: [f64; 8] = [
        676.5203681218851,
        -1259.1392167224028,
        771.32342877765313,
        -176.61502916214059,
        12.507343278686905,
        -0.13857109526572012,
        9.9843695780195716e-6,
        1.5056327351493116e-7,
    ];

    if x < 0.5 {
        (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x)
    } else {
        let x = x - 1.0;
        let mut ag = 0.99999999999980993_f64;
        for (i, &c) in COEFFS.iter().enumerate() {
            ag += c / (x + i as f64 + 1.0);
        }
        let t = x + 7.5;
        0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + ag.ln()
    }
}

/// Regularized incomplete beta function `I_x(a, b)`; NaN for `x` outside `[0, 1]`.
pub fn betai(a: f64, b: f64, x: f64) -> f64 {
    if !(0.0..=1.0).contains(&x) {
        return f64::NAN;
    }
    if x == 0.0 || x == 1.0 {
        return x;
    }
    if x > (a + 1.0) / (a + b + 2.0) {
        return 1.0 - betai(b, a, 1.0 - x);
    }

    const TINY: f64 = 1e-30;
    const EPS: f64 = 1e-10;
    const MAX_ITER: usize = 200;

    let prefactor = (ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b)
        + a * x.ln()
        + b * (1.0 - x).ln())
    .exp();

    let guard = |v: f64| if v.abs() < TINY { TINY } else { v };

    let mut c = 1.0;
    let mut d = guard(1.0 - (a + b) * x / (a + 1.0)).recip();
    let mut h = d;

    for m in 1..=MAX_ITER {
        let m = m as f64;

        let even = m * (b - m) * x / ((a + 2.0 * m - 1.0) * (a + 2.0 * m));
        d = guard(1.0 + even * d).recip();
        c = guard(1.0 + even / c);
        h *= d * c;

        let odd = -((a + m) * (a + b + m) * x) / ((a + 2.0 * m) * (a + 2.0 * m + 1.0));
        d = guard(1.0 + odd * d).recip();
        c = guard(1.0 + odd / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPS {
            break;
        }
    }

    prefactor * h / a
}

/// Cumulative distribution function of Student's t with `df` degrees of freedom.
///
/// NaN for non-positive or non-finite `df` and for NaN `t`.
pub fn student_t_cdf(t: f64, df: f64) -> f64 {
    if t.is_nan() || !(df > 0.0) || !df.is_finite() {
        return f64::NAN;
    }
    if t.is_infinite() {
        return if t > 0.0 { 1.0 } else { 0.0 };
    }
    let tail = 0.5 * betai(df / 2.0, 0.5, df / (df + t * t));
    if t >= 0.0 { 1.0 - tail } else { tail }
}

/// Scores `value` against the rest of its population.
///
/// `population` contains `value` itself; one matching entry is set aside before the
/// comparison. The score is the t distribution function at
/// `|mean(others) − value| / s(others)` with `|others| − 1` degrees of freedom, or
/// [`UNDEFINED_SIGNIFICANCE`] when `s(others)` is zero or undefined.
pub fn significance(value: f64, population: &[f64]) -> f64 {
    let mut others = population.to_vec();
    if let Some(pos) = others.iter().position(|&v| v == value) {
        others.remove(pos);
    }

    let spread = sample_std_dev(&others);
    if !(spread > 0.0) {
        return UNDEFINED_SIGNIFICANCE;
    }

    let t = (mean(&others) - value).abs() / spread;
    let score = student_t_cdf(t, others.len() as f64 - 1.0);
    if score.is_finite() {
        score
    } else {
        UNDEFINED_SIGNIFICANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-8;

    #[test]
    fn median_ignores_input_order() {
        let values = [10.0, 12.0, 13.0, 14.0];
        let reversed: Vec<f64> = values.iter().rev().copied().collect();
        assert_eq!(median(&values), Some(12.5));
        assert_eq!(median(&reversed), Some(12.5));
    }

    #[test]
    fn median_handles_odd_and_even_counts() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[7.5]), Some(7.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn sample_std_dev_uses_bessel_correction() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((sample_std_dev(&values) - (32.0f64 / 7.0).sqrt()).abs() < TOL);
        assert!(sample_std_dev(&[1.0]).is_nan());
    }

    #[test]
    fn ln_gamma_matches_factorials() {
        assert!(ln_gamma(1.0).abs() < TOL);
        assert!((ln_gamma(5.0) - 24f64.ln()).abs() < TOL);
        assert!((ln_gamma(0.5) - PI.sqrt().ln()).abs() < TOL);
    }

    #[test]
    fn betai_boundaries_and_symmetry() {
        assert_eq!(betai(2.0, 3.0, 0.0), 0.0);
        assert_eq!(betai(2.0, 3.0, 1.0), 1.0);
        assert!((betai(1.0, 1.0, 0.3) - 0.3).abs() < TOL);
        let lhs = betai(2.5, 1.5, 0.4);
        let rhs = 1.0 - betai(1.5, 2.5, 0.6);
        assert!((lhs - rhs).abs() < TOL);
        assert!(betai(1.0, 1.0, 1.5).is_nan());
    }

    #[test]
    fn student_t_cdf_known_values() {
        assert!((student_t_cdf(0.0, 5.0) - 0.5).abs() < TOL);
        // t = 1 with one degree of freedom is the Cauchy quartile.
        assert!((student_t_cdf(1.0, 1.0) - 0.75).abs() < 1e-7);
        assert!((student_t_cdf(2.015_048_373, 5.0) - 0.95).abs() < 1e-6);
        assert!((student_t_cdf(-1.0, 1.0) - 0.25).abs() < 1e-7);
        assert!(student_t_cdf(1.0, 0.0).is_nan());
    }

    #[test]
    fn significance_excludes_the_observation_itself() {
        let population = [10.0, 11.0, 12.0, 13.0, 30.0];
        let score = significance(30.0, &population);
        let others = [10.0, 11.0, 12.0, 13.0];
        let t = (mean(&others) - 30.0).abs() / sample_std_dev(&others);
        assert!((score - student_t_cdf(t, 3.0)).abs() < TOL);
        assert!(score > 0.99);
    }

    #[test]
    fn significance_of_value_above_mean_of_others() {
        // Others [10, 12, 14]: mean 12, s = 2, t = 0.5 on two degrees of freedom.
        let score = significance(13.0, &[10.0, 12.0, 13.0, 14.0]);
        assert!((score - 2.0 / 3.0).abs() < 1e-9, "score {score}");
    }

    #[test]
    fn significance_falls_back_to_sentinel_without_spread() {
        assert_eq!(significance(5.0, &[5.0, 5.0, 5.0]), UNDEFINED_SIGNIFICANCE);
        assert_eq!(significance(5.0, &[5.0, 6.0]), UNDEFINED_SIGNIFICANCE);
        assert_eq!(significance(5.0, &[5.0]), UNDEFINED_SIGNIFICANCE);
        assert_eq!(significance(9.0, &[9.0, 5.0, 5.0]), UNDEFINED_SIGNIFICANCE);
    }
}
