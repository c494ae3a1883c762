use std::path::{Path, PathBuf};

use crate::analysis::{species_summary, Analysis, SpeciesSummary};
use crate::color::SpeciesColors;
use crate::config::AnalysisConfig;
use crate::data::error::DataLoadError;
use crate::data::histogram::Normalization;
use crate::data::loader::load_file;
use crate::data::model::ParticleTable;
use crate::figures::{build_figures, Figure};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct AppState {
    pub config: AnalysisConfig,

    /// File the current table came from.
    pub source: Option<PathBuf>,

    /// Loaded particle list (None until a file is loaded).
    pub table: Option<ParticleTable>,

    pub analysis: Option<Analysis>,

    /// Figures in display order (cached, rebuilt on load / normalisation change).
    pub figures: Vec<Figure>,

    /// Per-species counts for the side panel.
    pub summary: Vec<SpeciesSummary>,

    /// Index of the figure on screen.
    pub current: usize,

    pub colors: SpeciesColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            source: None,
            table: None,
            analysis: None,
            figures: Vec::new(),
            summary: Vec::new(),
            current: 0,
            colors: SpeciesColors::default(),
            status_message: None,
        }
    }

    /// Load a particle list and make it current. On failure the previous
    /// table stays in place.
    pub fn load(&mut self, path: &Path) -> Result<(), DataLoadError> {
        let table = load_file(path)?;
        let [pions, kaons, protons] = table.species_counts();
        log::info!(
            "Loaded {} particles from {} ({pions} pions, {kaons} kaons, {protons} protons)",
            table.len(),
            path.display()
        );
        self.set_table(table, Some(path.to_path_buf()));
        Ok(())
    }

    /// Ingest a table: run the analysis and build the figures.
    pub fn set_table(&mut self, table: ParticleTable, source: Option<PathBuf>) {
        let analysis = Analysis::run(&table, &self.config);
        self.summary = species_summary(&table, &analysis);
        self.figures = build_figures(&table, &analysis, &self.config);
        self.current = 0;

        self.table = Some(table);
        self.analysis = Some(analysis);
        self.source = source;
        self.status_message = None;
    }

    /// Switch the spectra scaling and rebuild the figures in place.
    pub fn set_normalization(&mut self, normalization: Normalization) {
        if self.config.normalization == normalization {
            return;
        }
        self.config.normalization = normalization;
        if let (Some(table), Some(analysis)) = (&self.table, &self.analysis) {
            self.figures = build_figures(table, analysis, &self.config);
        }
    }

    pub fn current_figure(&self) -> Option<&Figure> {
        self.figures.get(self.current)
    }

    pub fn select_figure(&mut self, index: usize) {
        if index < self.figures.len() {
            self.current = index;
        }
    }

    pub fn next_figure(&mut self) {
        self.select_figure(self.current + 1);
    }

    pub fn previous_figure(&mut self) {
        if let Some(prev) = self.current.checked_sub(1) {
            self.select_figure(prev);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;

    fn write_list(dir: &TempDir, rows: &str) -> PathBuf {
        let path = dir.path().join("particle_list_1.dat");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "mcid,tau,x,y,eta,E,px,py,pz").unwrap();
        f.write_all(rows.as_bytes()).unwrap();
        path
    }

    #[test]
    fn load_builds_figures_and_summary() {
        let dir = TempDir::new().unwrap();
        let path = write_list(&dir, "211,1,0,0,0,1,1,0,0\n321,2,0,0,0,1,0.5,0,0\n");

        let mut state = AppState::new(AnalysisConfig::default());
        state.load(&path).unwrap();

        assert_eq!(state.source.as_deref(), Some(path.as_path()));
        assert_eq!(state.figures.len(), 6);
        assert_eq!(state.summary.len(), 3);
        assert_eq!(state.current_figure().unwrap().title, "Particle Yields");
    }

    #[test]
    fn failed_load_keeps_previous_table() {
        let dir = TempDir::new().unwrap();
        let path = write_list(&dir, "211,1,0,0,0,1,1,0,0\n");

        let mut state = AppState::new(AnalysisConfig::default());
        state.load(&path).unwrap();
        assert!(state.load(&dir.path().join("missing.csv")).is_err());
        assert_eq!(state.table.as_ref().map(ParticleTable::len), Some(1));
    }

    #[test]
    fn navigation_is_clamped() {
        let mut state = AppState::new(AnalysisConfig::default());
        state.set_table(ParticleTable::default(), None);

        state.previous_figure();
        assert_eq!(state.current, 0);
        for _ in 0..10 {
            state.next_figure();
        }
        assert_eq!(state.current, state.figures.len() - 1);
        state.select_figure(99);
        assert_eq!(state.current, state.figures.len() - 1);
        state.select_figure(2);
        assert_eq!(state.current_figure().unwrap().title, "Pion spectra midrapidity");
    }

    #[test]
    fn normalisation_rebuilds_spectra_only() {
        let mut state = AppState::new(AnalysisConfig::default());
        state.set_table(ParticleTable::default(), None);
        state.select_figure(3);

        state.set_normalization(Normalization::Invariant);
        assert_eq!(state.current, 3);
        assert_eq!(state.figures[3].y_label, "dN/2πpTdpTdy");
        assert_eq!(state.figures[0].y_label, "Counts");
    }
}
