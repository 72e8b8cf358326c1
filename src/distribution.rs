//! Histogram binning and distribution-shape classification.
//!
//! The same auto-binned [`Histogram`] feeds both the shape classifier
//! (peak counting, uniformity check) and the per-column figure, so the
//! report's label and the saved image always agree.
//!
//! # Auto bin rule
//!
//! [`BinMethod::Auto`] takes the narrower of two classic widths:
//!
//! - Sturges width `h_s = (max − min) / (log2(n) + 1)`
//! - Freedman–Diaconis width `h_fd = 2 · IQR · n^(−1/3)` (R-7 quartiles)
//! - `h = min(h_fd, h_s)` when `h_fd > 0`, otherwise `h_s`
//! - `k = ceil((last − first) / h)` bins, or one bin when `h == 0`
//!
//! The outer edges are the data minimum and maximum, widened by 0.5 on each
//! side when they coincide. Bins are half-open except the last, which also
//! includes its right edge.
//!
//! # Example
//!
//! ```
//! use eda_report::distribution::{classify_distribution, DistributionShape};
//! use eda_report::stats::{kurtosis, skewness};
//!
//! let values = [1.0, 2.0, 3.0];
//! let shape = classify_distribution(&values, f64::NAN, f64::NAN);
//! assert_eq!(shape, DistributionShape::InsufficientData);
//!
//! let values = [2.0, 3.0, 3.0, 4.0, 4.0, 4.0, 4.0, 5.0, 5.0, 5.0,
//!               5.0, 5.0, 5.0, 6.0, 6.0, 6.0, 6.0, 7.0, 7.0, 8.0];
//! let skew = skewness(&values).unwrap();
//! let kurt = kurtosis(&values).unwrap();
//! assert_eq!(classify_distribution(&values, skew, kurt), DistributionShape::Normal);
//! ```

use serde::Serialize;

use crate::stats;

/// Upper bound on the number of bins produced by width-based rules.
///
/// Only reached by pathological inputs (a huge range with a near-zero
/// IQR); keeps memory bounded.
pub const MAX_BINS: usize = 10_000;

// ── Histogram ───────────────────────────────────────────────────────

/// Method for choosing the histogram bin width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinMethod {
    /// Sturges' rule: h = range / (log2(n) + 1).
    Sturges,
    /// Freedman-Diaconis rule: h = 2 * IQR * n^(-1/3).
    FreedmanDiaconis,
    /// The smaller of the Sturges and Freedman-Diaconis widths, falling back
    /// to Sturges when the IQR is zero.
    Auto,
}

/// Equal-width frequency histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// Bin method used.
    pub method: BinMethod,
    /// Bin edges (length = number of bins + 1).
    pub edges: Vec<f64>,
    /// Count of observations in each bin.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Number of bins.
    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    /// Width of each bin.
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(first), Some(last)) if !self.counts.is_empty() => {
                (last - first) / self.counts.len() as f64
            }
            _ => f64::NAN,
        }
    }

    /// Counts local interior peaks: bins other than the first and last
    /// whose count is strictly greater than both neighbours.
    ///
    /// ```
    /// use eda_report::distribution::{BinMethod, Histogram};
    ///
    /// let h = Histogram {
    ///     method: BinMethod::Auto,
    ///     edges: (0..=7).map(f64::from).collect(),
    ///     counts: vec![5, 1, 4, 1, 3, 3, 9],
    /// };
    /// assert_eq!(h.interior_peaks(), 1); // the last bin is never a peak
    /// ```
    pub fn interior_peaks(&self) -> usize {
        self.counts
            .windows(3)
            .filter(|w| w[1] > w[0] && w[1] > w[2])
            .count()
    }

    /// Returns `true` if the population standard deviation of the bin
    /// counts is below `tolerance` times their mean.
    pub fn is_flat(&self, tolerance: f64) -> bool {
        let counts: Vec<f64> = self.counts.iter().map(|&c| c as f64).collect();
        match (stats::mean(&counts), stats::population_std_dev(&counts)) {
            (Some(mean), Some(std)) => std < tolerance * mean,
            _ => false,
        }
    }
}

/// Bins `data` with the given method.
///
/// Non-finite values are ignored. Empty input yields a single empty bin
/// spanning `[0, 1]`.
///
/// ```
/// use eda_report::distribution::{histogram, BinMethod};
///
/// let data: Vec<f64> = (0..3).flat_map(|_| (0..6).map(f64::from)).collect();
/// let h = histogram(&data, BinMethod::Auto);
/// assert_eq!(h.counts, vec![3, 3, 3, 3, 3, 3]);
/// assert_eq!(h.counts.iter().sum::<usize>(), 18);
/// ```
pub fn histogram(data: &[f64], method: BinMethod) -> Histogram {
    let finite: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    let Some(sorted) = stats::sorted(&finite).filter(|s| !s.is_empty()) else {
        return Histogram {
            method,
            edges: vec![0.0, 1.0],
            counts: vec![0],
        };
    };

    let (min, max) = (sorted[0], sorted[sorted.len() - 1]);
    let (first, last) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };

    let width = bin_width(&sorted, method);
    let n_bins = if width > 0.0 {
        (((last - first) / width).ceil() as usize).clamp(1, MAX_BINS)
    } else {
        1
    };

    let step = (last - first) / n_bins as f64;
    let mut edges: Vec<f64> = (0..=n_bins).map(|i| first + i as f64 * step).collect();
    edges[n_bins] = last;

    let mut counts = vec![0usize; n_bins];
    for &v in &sorted {
        counts[bin_index(v, first, last, &edges)] += 1;
    }

    Histogram {
        method,
        edges,
        counts,
    }
}

fn sturges_width(sorted: &[f64]) -> f64 {
    let range = sorted[sorted.len() - 1] - sorted[0];
    range / ((sorted.len() as f64).log2() + 1.0)
}

fn freedman_diaconis_width(sorted: &[f64]) -> f64 {
    let q1 = stats::quantile_sorted(sorted, 0.25).unwrap_or(0.0);
    let q3 = stats::quantile_sorted(sorted, 0.75).unwrap_or(0.0);
    2.0 * (q3 - q1) * (sorted.len() as f64).powf(-1.0 / 3.0)
}

fn bin_width(sorted: &[f64], method: BinMethod) -> f64 {
    match method {
        BinMethod::Sturges => sturges_width(sorted),
        BinMethod::FreedmanDiaconis => freedman_diaconis_width(sorted),
        BinMethod::Auto => {
            let fd = freedman_diaconis_width(sorted);
            let sturges = sturges_width(sorted);
            if fd > 0.0 {
                fd.min(sturges)
            } else {
                sturges
            }
        }
    }
}

/// Locates the bin for `v`, correcting the arithmetic estimate against the
/// actual edges so that `edges[i] <= v < edges[i + 1]` (last bin closed).
fn bin_index(v: f64, first: f64, last: f64, edges: &[f64]) -> usize {
    let n_bins = edges.len() - 1;
    let estimate = (v - first) / (last - first) * n_bins as f64;
    let mut idx = (estimate.max(0.0) as usize).min(n_bins - 1);
    if idx > 0 && v < edges[idx] {
        idx -= 1;
    } else if idx + 1 < n_bins && v >= edges[idx + 1] {
        idx += 1;
    }
    idx
}

// ── Shape classification ────────────────────────────────────────────

/// Estimated shape of a column's distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DistributionShape {
    /// Symmetric bell: |skew| < 0.3 and excess kurtosis in (−1, 1).
    Normal,
    /// Long tail towards small values.
    LeftSkewed,
    /// Long tail towards large values.
    RightSkewed,
    /// Two interior histogram peaks.
    Bimodal,
    /// Three or more interior histogram peaks.
    Multimodal,
    /// Near-constant bin counts.
    Uniform,
    /// None of the rules matched.
    Undefined,
    /// Fewer values than the classifier needs.
    InsufficientData,
}

impl DistributionShape {
    /// All labels, in glossary order.
    pub const ALL: [DistributionShape; 8] = [
        Self::Normal,
        Self::LeftSkewed,
        Self::RightSkewed,
        Self::Bimodal,
        Self::Multimodal,
        Self::Uniform,
        Self::Undefined,
        Self::InsufficientData,
    ];

    /// Report label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::LeftSkewed => "Sesgada a la izquierda",
            Self::RightSkewed => "Sesgada a la derecha",
            Self::Bimodal => "Bimodal",
            Self::Multimodal => "Multimodal",
            Self::Uniform => "Uniforme",
            Self::Undefined => "Indefinida",
            Self::InsufficientData => "Sin datos suficientes",
        }
    }

    /// One-sentence interpretation used in the report narrative.
    pub fn interpretation(self) -> &'static str {
        match self {
            Self::Normal => "Distribución normal (campana simétrica).",
            Self::LeftSkewed => {
                "Distribución sesgada a la izquierda, los valores se concentran hacia un extremo del rango."
            }
            Self::RightSkewed => {
                "Distribución sesgada a la derecha, los valores se concentran hacia un extremo del rango."
            }
            Self::Bimodal => {
                "Distribución con dos picos principales, posibles grupos o segmentos en los datos."
            }
            Self::Multimodal => {
                "Distribución con múltiples picos, sugiere heterogeneidad o subpoblaciones."
            }
            Self::Uniform => {
                "Distribución casi uniforme, los valores ocurren con frecuencia similar."
            }
            Self::Undefined => {
                "No se detectó una forma de distribución clara (posiblemente uniforme o datos discretos)."
            }
            Self::InsufficientData => "Distribución sin datos suficientes.",
        }
    }
}

impl std::fmt::Display for DistributionShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Thresholds used by the shape classifier.
#[derive(Debug, Clone)]
pub struct ShapeThresholds {
    /// Minimum number of values to attempt classification. Default: 5.
    pub min_values: usize,
    /// |skewness| bound for Normal and the skew cut-off. Default: 0.3.
    pub skew: f64,
    /// |excess kurtosis| bound for Normal. Default: 1.0.
    pub kurtosis: f64,
    /// Bin-count coefficient of variation below which the histogram is
    /// considered flat. Default: 0.1.
    pub uniform_cv: f64,
}

impl Default for ShapeThresholds {
    fn default() -> Self {
        Self {
            min_values: 5,
            skew: 0.3,
            kurtosis: 1.0,
            uniform_cv: 0.1,
        }
    }
}

/// Classifies a column's distribution with default thresholds.
///
/// `values` are the column's non-missing values; `skew` and `kurt` its
/// sample skewness and excess kurtosis (NaN when undefined).
pub fn classify_distribution(values: &[f64], skew: f64, kurt: f64) -> DistributionShape {
    classify_with(values, skew, kurt, &ShapeThresholds::default())
}

/// Classifies a column's distribution.
///
/// Rules apply in order and the first match wins:
///
/// 1. fewer than `min_values` values: insufficient data
/// 2. three or more interior peaks in the auto histogram: multimodal
/// 3. exactly two interior peaks: bimodal
/// 4. |skew| < `skew` and −`kurtosis` < kurt < `kurtosis`: normal;
///    else skew < −`skew`: left-skewed; else skew > `skew`: right-skewed
/// 5. flat bin counts: uniform
/// 6. otherwise undefined
///
/// NaN skewness or kurtosis fails every comparison in rule 4.
pub fn classify_with(
    values: &[f64],
    skew: f64,
    kurt: f64,
    thresholds: &ShapeThresholds,
) -> DistributionShape {
    if values.len() < thresholds.min_values {
        return DistributionShape::InsufficientData;
    }

    let hist = histogram(values, BinMethod::Auto);
    match hist.interior_peaks() {
        p if p >= 3 => return DistributionShape::Multimodal,
        2 => return DistributionShape::Bimodal,
        _ => {}
    }

    if skew.abs() < thresholds.skew && kurt > -thresholds.kurtosis && kurt < thresholds.kurtosis {
        return DistributionShape::Normal;
    } else if skew < -thresholds.skew {
        return DistributionShape::LeftSkewed;
    } else if skew > thresholds.skew {
        return DistributionShape::RightSkewed;
    }

    if hist.is_flat(thresholds.uniform_cv) {
        DistributionShape::Uniform
    } else {
        DistributionShape::Undefined
    }
}

// ── Tests ───────────────────────────────────────────────────────────
