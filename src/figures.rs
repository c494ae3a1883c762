use std::fmt;

use crate::analysis::Analysis;
use crate::config::AnalysisConfig;
use crate::data::histogram::{uniform_edges, Histogram, Normalization, PT_BIN_EDGES};
use crate::data::model::{ParticleTable, Species};

/// Rapidity axis of the dN/dy overlay.
const RAPIDITY_RANGE: f64 = 4.0;
const RAPIDITY_BINS: usize = 40;

// ---------------------------------------------------------------------------
// Figure – one histogram view
// ---------------------------------------------------------------------------

/// One histogram drawn in a figure. Species series get species colours.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub species: Option<Species>,
    pub histogram: Histogram,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub series: Vec<Series>,
}

impl Figure {
    fn single(title: impl Into<String>, x_label: &'static str, y_label: &'static str, series: Series) -> Self {
        Figure {
            title: title.into(),
            x_label,
            y_label,
            series: vec![series],
        }
    }

    /// Whether nothing landed in any bin.
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.histogram.entries == 0)
    }
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==  [x: {}, y: {}]", self.title, self.x_label, self.y_label)?;
        for s in &self.series {
            writeln!(
                f,
                "  {} ({} entries, {} bins)",
                s.name,
                s.histogram.entries,
                s.histogram.n_bins()
            )?;
            for ((lo, hi), c) in s.histogram.bins().zip(&s.histogram.counts) {
                writeln!(f, "    [{lo:>10.4}, {hi:>10.4})  {c:.6}")?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// The figure sequence
// ---------------------------------------------------------------------------

/// Build every figure, in display order:
/// yields, proper time, the three midrapidity spectra, then the dN/dy overlay.
pub fn build_figures(table: &ParticleTable, analysis: &Analysis, config: &AnalysisConfig) -> Vec<Figure> {
    let mut figures = Vec::with_capacity(6);

    let ids: Vec<f64> = table.mcid().iter().map(|&id| id as f64).collect();
    figures.push(Figure::single(
        "Particle Yields",
        "MC ID",
        "Counts",
        Series {
            name: "all particles".into(),
            species: None,
            histogram: Histogram::auto_integer(&ids),
        },
    ));

    figures.push(Figure::single(
        "Proper time of particle production",
        "tau (fm/c)",
        "Counts",
        Series {
            name: "all particles".into(),
            species: None,
            histogram: Histogram::auto(table.tau()),
        },
    ));

    for species in Species::ALL {
        let raw = Histogram::fill(analysis.midrapidity_pt(species), &PT_BIN_EDGES);
        figures.push(Figure::single(
            format!("{} spectra midrapidity", species.label()),
            "pT (GeV)",
            config.normalization.label(),
            Series {
                name: format!("{} |y| < {}", species.label(), config.ymax),
                species: Some(species),
                histogram: raw.normalized(config.normalization, config.delta_y()),
            },
        ));
    }

    let y_edges = uniform_edges(-RAPIDITY_RANGE, RAPIDITY_RANGE, RAPIDITY_BINS);
    figures.push(Figure {
        title: "Rapidity distribution".into(),
        x_label: "y",
        y_label: "dN/dy",
        series: analysis
            .kinematics
            .buckets()
            .iter()
            .map(|b| Series {
                name: b.species.label().into(),
                species: Some(b.species),
                histogram: Histogram::fill(&b.rapidity, &y_edges).normalized(Normalization::PerWidth, 1.0),
            })
            .collect(),
    });

    figures
}
