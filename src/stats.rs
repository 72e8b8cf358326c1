//! Descriptive statistics primitives.
//!
//! Every function takes the non-missing values of one column and returns
//! `None` when the statistic is undefined for that input. Callers turn
//! `None` into a NaN sentinel; nothing here panics on empty or degenerate
//! data.
//!
//! # Algorithms
//!
//! - **Mean**: Neumaier compensated summation.
//! - **Variance/StdDev**: Welford's online algorithm, sample (n − 1) form.
//! - **Quantile**: R-7 linear interpolation (Hyndman-Fan type 7).
//! - **Skewness**: bias-corrected sample skewness G1.
//! - **Kurtosis**: bias-corrected sample excess kurtosis G2.
//!
//! Zero-variance input has skewness and kurtosis defined as `0.0`.

use std::collections::HashMap;

/// Neumaier compensated summation.
pub fn compensated_sum(data: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for &x in data {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

/// Arithmetic mean.
///
/// Returns `None` if `data` is empty or contains NaN/Inf.
///
/// ```
/// use eda_report::stats::mean;
/// assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
/// assert_eq!(mean(&[]), None);
/// ```
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    Some(compensated_sum(data) / data.len() as f64)
}

/// Sample variance (denominator `n − 1`) via Welford's algorithm.
///
/// Returns `None` if `data.len() < 2` or contains NaN/Inf.
pub fn variance(data: &[f64]) -> Option<f64> {
    if data.len() < 2 || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    let mut count = 0.0_f64;
    let mut running_mean = 0.0_f64;
    let mut m2 = 0.0_f64;
    for &x in data {
        count += 1.0;
        let delta = x - running_mean;
        running_mean += delta / count;
        m2 += delta * (x - running_mean);
    }
    Some(m2 / (count - 1.0))
}

/// Sample standard deviation.
///
/// ```
/// use eda_report::stats::std_dev;
/// let sd = std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
/// assert!((sd - 2.138089935299395).abs() < 1e-12);
/// assert_eq!(std_dev(&[1.0]), None);
/// ```
pub fn std_dev(data: &[f64]) -> Option<f64> {
    variance(data).map(f64::sqrt)
}

/// Population standard deviation (denominator `n`).
///
/// Returns `None` if `data` is empty or contains NaN/Inf.
pub fn population_std_dev(data: &[f64]) -> Option<f64> {
    let m = mean(data)?;
    let ss: f64 = data.iter().map(|&x| (x - m) * (x - m)).sum();
    Some((ss / data.len() as f64).sqrt())
}

/// Returns a sorted copy of `data`, or `None` if it contains NaN.
pub fn sorted(data: &[f64]) -> Option<Vec<f64>> {
    if data.iter().any(|x| x.is_nan()) {
        return None;
    }
    let mut sorted = data.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    Some(sorted)
}

/// Median (average of the two middle values for even counts).
///
/// ```
/// use eda_report::stats::median;
/// assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
/// ```
pub fn median(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    let sorted = sorted(data)?;
    let n = sorted.len();
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

/// `p`-th quantile by R-7 linear interpolation.
///
/// For sorted `x[0..n]`: `h = (n − 1)·p`, `j = ⌊h⌋`, `g = h − j`,
/// result `(1 − g)·x[j] + g·x[j+1]`.
///
/// Returns `None` if `data` is empty, `p` is outside `[0, 1]`, or data
/// contains NaN.
///
/// ```
/// use eda_report::stats::quantile;
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
/// assert_eq!(quantile(&data, 0.25), Some(2.25));
/// assert_eq!(quantile(&data, 0.75), Some(4.75));
/// ```
pub fn quantile(data: &[f64], p: f64) -> Option<f64> {
    if data.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    quantile_sorted(&sorted(data)?, p)
}

/// R-7 quantile on pre-sorted data.
pub fn quantile_sorted(sorted_data: &[f64], p: f64) -> Option<f64> {
    let n = sorted_data.len();
    if n == 0 || !(0.0..=1.0).contains(&p) {
        return None;
    }
    if n == 1 {
        return Some(sorted_data[0]);
    }

    let h = (n - 1) as f64 * p;
    let j = h.floor() as usize;
    let g = h - h.floor();

    if j + 1 >= n {
        Some(sorted_data[n - 1])
    } else {
        Some((1.0 - g) * sorted_data[j] + g * sorted_data[j + 1])
    }
}

/// Biased central moments `(m2, m3, m4)` divided by `n`.
fn central_moments(data: &[f64]) -> Option<(f64, f64, f64)> {
    let m = mean(data)?;
    let n = data.len() as f64;
    let (mut s2, mut s3, mut s4) = (0.0, 0.0, 0.0);
    for &x in data {
        let d = x - m;
        let d2 = d * d;
        s2 += d2;
        s3 += d2 * d;
        s4 += d2 * d2;
    }
    Some((s2 / n, s3 / n, s4 / n))
}

fn is_constant(data: &[f64]) -> bool {
    data.iter().all(|&x| x == data[0])
}

/// Bias-corrected sample skewness G1.
///
/// `G1 = √(n(n−1)) / (n−2) · m3 / m2^(3/2)`.
///
/// Returns `None` for fewer than 3 values or non-finite input, and
/// `Some(0.0)` when every value is identical.
///
/// ```
/// use eda_report::stats::skewness;
/// assert_eq!(skewness(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some(0.0));
/// assert_eq!(skewness(&[5.0, 5.0, 5.0]), Some(0.0));
/// assert!(skewness(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap() > 2.0);
/// ```
pub fn skewness(data: &[f64]) -> Option<f64> {
    if data.len() < 3 {
        return None;
    }
    let (m2, m3, _) = central_moments(data)?;
    if is_constant(data) {
        return Some(0.0);
    }
    let n = data.len() as f64;
    let g1 = m3 / m2.powf(1.5);
    Some((n * (n - 1.0)).sqrt() / (n - 2.0) * g1)
}

/// Bias-corrected sample excess kurtosis G2.
///
/// `G2 = (n−1) / ((n−2)(n−3)) · ((n+1)·m4/m2² − 3(n−1))`.
///
/// Returns `None` for fewer than 4 values or non-finite input, and
/// `Some(0.0)` when every value is identical.
///
/// ```
/// use eda_report::stats::kurtosis;
/// let k = kurtosis(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert!((k + 1.2).abs() < 1e-12);
/// ```
pub fn kurtosis(data: &[f64]) -> Option<f64> {
    if data.len() < 4 {
        return None;
    }
    let (m2, _, m4) = central_moments(data)?;
    if is_constant(data) {
        return Some(0.0);
    }
    let n = data.len() as f64;
    let ratio = m4 / (m2 * m2);
    Some((n - 1.0) / ((n - 2.0) * (n - 3.0)) * ((n + 1.0) * ratio - 3.0 * (n - 1.0)))
}

/// Most frequent value.
///
/// Returns `None` when `data` is empty or every value occurs exactly once.
/// Ties between equally frequent values resolve to the smallest one.
///
/// ```
/// use eda_report::stats::mode;
/// assert_eq!(mode(&[3.0, 1.0, 3.0, 1.0, 2.0]), Some(1.0));
/// assert_eq!(mode(&[1.0, 2.0, 3.0]), None);
/// ```
pub fn mode(data: &[f64]) -> Option<f64> {
    // Keyed by bit pattern for exact comparison; -0.0 folds into 0.0.
    let mut freq: HashMap<u64, (f64, usize)> = HashMap::new();
    for &v in data.iter().filter(|v| !v.is_nan()) {
        let v = if v == 0.0 { 0.0 } else { v };
        freq.entry(v.to_bits()).or_insert((v, 0)).1 += 1;
    }

    let max_count = freq.values().map(|&(_, c)| c).max()?;
    if max_count < 2 {
        return None;
    }
    freq.values()
        .filter(|&&(_, c)| c == max_count)
        .map(|&(v, _)| v)
        .min_by(f64::total_cmp)
}
