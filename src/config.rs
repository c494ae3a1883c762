use std::path::PathBuf;

use clap::Parser;

use crate::data::filter::DEFAULT_YMAX;
use crate::data::histogram::Normalization;
use crate::data::kinematics::AzimuthMode;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Kinematics and midrapidity spectra of a sampled particle list
#[derive(Parser, Debug)]
#[command(name = "hadron-spectra")]
#[command(version)]
pub struct Cli {
    /// Particle list (.csv/.dat with header, .json or .parquet)
    pub particle_list: PathBuf,

    /// Half-width of the midrapidity window, |y| < ymax
    #[arg(long, default_value_t = DEFAULT_YMAX)]
    pub ymax: f64,

    /// Never bucket the first row (and the first entry of every species),
    /// matching the legacy histogram script
    #[arg(long)]
    pub skip_first_row: bool,

    /// Azimuthal angle convention
    #[arg(long, value_enum, default_value_t = AzimuthMode::Folded)]
    pub azimuth: AzimuthMode,

    /// Scaling of the pT spectra
    #[arg(long, value_enum, default_value_t = Normalization::Counts)]
    pub normalization: Normalization,

    /// Print the histograms instead of opening a window
    #[arg(long)]
    pub no_display: bool,
}

impl Cli {
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            ymax: self.ymax,
            skip_first_row: self.skip_first_row,
            azimuth: self.azimuth,
            normalization: self.normalization,
        }
    }
}

// ---------------------------------------------------------------------------
// Analysis settings
// ---------------------------------------------------------------------------

/// Knobs of the analysis pipeline. `Default` reproduces the reference plots
/// except for the first-row skip, which is off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    pub ymax: f64,
    pub skip_first_row: bool,
    pub azimuth: AzimuthMode,
    pub normalization: Normalization,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ymax: DEFAULT_YMAX,
            skip_first_row: false,
            azimuth: AzimuthMode::Folded,
            normalization: Normalization::Counts,
        }
    }
}

impl AnalysisConfig {
    /// First index visited by the deriver and the midrapidity filter.
    pub fn start_index(&self) -> usize {
        usize::from(self.skip_first_row)
    }

    /// Width of the rapidity window, used by the invariant normalisation.
    pub fn delta_y(&self) -> f64 {
        2.0 * self.ymax
    }
}
