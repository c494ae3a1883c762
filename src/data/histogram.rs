use std::f64::consts::PI;

use clap::ValueEnum;

// ---------------------------------------------------------------------------
// Bin edges
// ---------------------------------------------------------------------------

/// Non-uniform pT bin edges (GeV) for the midrapidity spectra.
pub const PT_BIN_EDGES: [f64; 16] = [
    0.0, 0.0072, 0.038, 0.094, 0.175, 0.28, 0.42, 0.58, 0.78, 1.01, 1.3, 1.6, 1.97, 2.4, 2.96, 3.7,
];

/// `n` equal-width bins over `[lo, hi]`. The outer edges are exactly `lo` and `hi`.
pub fn uniform_edges(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    let width = (hi - lo) / n as f64;
    (0..=n)
        .map(|i| if i == n { hi } else { lo + width * i as f64 })
        .collect()
}

/// Upper bound on the number of automatic bins. A lone outlier against a
/// narrow interquartile range would otherwise ask for ~1e16 bins.
pub const MAX_AUTO_BINS: usize = 100_000;

/// Bin edges from the "auto" rule: the narrower of the Sturges and
/// Freedman–Diaconis widths, over the range of the finite values.
///
/// * empty sample → one bin over `[0, 1]`
/// * zero range   → one bin over `[v - 0.5, v + 0.5]`
/// * zero IQR     → Sturges width alone
/// * never more than [`MAX_AUTO_BINS`] bins
pub fn auto_edges(data: &[f64]) -> Vec<f64> {
    auto_edges_with_min_width(data, 0.0)
}

/// [`auto_edges`] for integer-valued data (species ids): bins are at least
/// one unit wide.
pub fn auto_integer_edges(data: &[f64]) -> Vec<f64> {
    auto_edges_with_min_width(data, 1.0)
}

fn auto_edges_with_min_width(data: &[f64], min_width: f64) -> Vec<f64> {
    let mut finite: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return vec![0.0, 1.0];
    }
    finite.sort_by(f64::total_cmp);

    let n = finite.len() as f64;
    let lo = finite[0];
    let hi = finite[finite.len() - 1];
    if hi == lo {
        return vec![lo - 0.5, hi + 0.5];
    }
    let range = hi - lo;
    if !range.is_finite() {
        log::warn!("auto binning: range [{lo}, {hi}] overflows, using a single bin");
        return vec![lo, hi];
    }

    let sturges = range / (n.log2() + 1.0);
    let iqr = percentile(&finite, 0.75) - percentile(&finite, 0.25);
    let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);
    let width = (if fd > 0.0 { fd.min(sturges) } else { sturges }).max(min_width);

    let wanted = (range / width).ceil();
    let bins = if wanted > MAX_AUTO_BINS as f64 {
        log::warn!(
            "auto binning: {wanted:e} bins requested over [{lo}, {hi}], clamped to {MAX_AUTO_BINS}"
        );
        MAX_AUTO_BINS
    } else {
        (wanted as usize).max(1)
    };
    log::debug!("auto binning: {} values, sturges={sturges:.4}, fd={fd:.4}, {bins} bins", finite.len());
    uniform_edges(lo, hi, bins)
}

/// Linear-interpolated percentile of already sorted data, `q` in [0, 1].
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let below = pos.floor() as usize;
    let above = pos.ceil() as usize;
    let frac = pos - below as f64;
    sorted[below] + (sorted[above] - sorted[below]) * frac
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// How bin contents are scaled for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Normalization {
    /// Raw entries per bin.
    #[default]
    Counts,
    /// Entries divided by bin width (dN/dx).
    PerWidth,
    /// 1/(2π pT Δy) dN/dpT, pT at the bin centre.
    Invariant,
}

impl Normalization {
    pub const ALL: [Normalization; 3] = [Normalization::Counts, Normalization::PerWidth, Normalization::Invariant];

    pub fn label(self) -> &'static str {
        match self {
            Normalization::Counts => "Counts",
            Normalization::PerWidth => "dN/dpT",
            Normalization::Invariant => "dN/2πpTdpTdy",
        }
    }
}

/// A filled 1D histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bin edges (length = number of bins + 1).
    pub edges: Vec<f64>,
    /// Bin contents.
    pub counts: Vec<f64>,
    /// Values that landed in a bin.
    pub entries: usize,
}

impl Histogram {
    /// Count `data` into the bins described by `edges`.
    ///
    /// Bins are `[a, b)` except the last, which also takes values equal to the
    /// upper edge. Values outside the range and non-finite values are not
    /// counted. Empty `data` gives an all-zero histogram.
    pub fn fill(data: &[f64], edges: &[f64]) -> Self {
        let n_bins = edges.len().saturating_sub(1);
        let mut counts = vec![0.0; n_bins];
        let mut entries = 0;

        for &v in data {
            if let Some(b) = find_bin(edges, v) {
                counts[b] += 1.0;
                entries += 1;
            }
        }

        Histogram {
            edges: edges.to_vec(),
            counts,
            entries,
        }
    }

    /// Fill with bin edges chosen by [`auto_edges`].
    pub fn auto(data: &[f64]) -> Self {
        Self::fill(data, &auto_edges(data))
    }

    /// Fill with bin edges chosen by [`auto_integer_edges`].
    pub fn auto_integer(data: &[f64]) -> Self {
        Self::fill(data, &auto_integer_edges(data))
    }

    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    /// `(lower, upper)` for every bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.edges.windows(2).map(|w| (w[0], w[1]))
    }

    /// Rescaled copy. `delta_y` is the rapidity window width used by
    /// [`Normalization::Invariant`].
    pub fn normalized(&self, mode: Normalization, delta_y: f64) -> Histogram {
        let counts = match mode {
            Normalization::Counts => self.counts.clone(),
            Normalization::PerWidth => self
                .bins()
                .zip(&self.counts)
                .map(|((lo, hi), c)| c / (hi - lo))
                .collect(),
            Normalization::Invariant => self
                .bins()
                .zip(&self.counts)
                .map(|((lo, hi), c)| {
                    let centre = 0.5 * (lo + hi);
                    c / (2.0 * PI * centre * (hi - lo) * delta_y)
                })
                .collect(),
        };
        Histogram {
            edges: self.edges.clone(),
            counts,
            entries: self.entries,
        }
    }
}

/// Bin index for `val`, or `None` for out-of-range and NaN.
fn find_bin(edges: &[f64], val: f64) -> Option<usize> {
    let (&first, &last) = (edges.first()?, edges.last()?);
    if edges.len() < 2 || !(val >= first && val <= last) {
        return None;
    }
    if val == last {
        return Some(edges.len() - 2);
    }
    // number of edges <= val, minus one
    let upper = edges.partition_point(|&e| e <= val);
    Some(upper - 1)
}
