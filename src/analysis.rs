use crate::config::AnalysisConfig;
use crate::data::filter::bucket_midrapidity;
use crate::data::kinematics::{derive_kinematics, SpeciesKinematics};
use crate::data::model::{ParticleTable, Species};

/// Everything derived from one particle table.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub kinematics: SpeciesKinematics,
    /// Midrapidity pT per species, in [`Species::ALL`] order.
    pub midrapidity: [Vec<f64>; 3],
}

impl Analysis {
    /// Run the deriver and the midrapidity filter.
    pub fn run(table: &ParticleTable, config: &AnalysisConfig) -> Self {
        let start = config.start_index();
        let kinematics = derive_kinematics(table, start, config.azimuth);
        let midrapidity = Species::ALL.map(|s| bucket_midrapidity(kinematics.bucket(s), config.ymax, start));

        for bucket in kinematics.buckets() {
            let errors = bucket.numeric_errors();
            if let Some(first) = errors.first() {
                log::warn!(
                    "{} of {} {}s have a non-finite rapidity (first: {first})",
                    errors.len(),
                    bucket.len(),
                    bucket.species
                );
            }
        }

        Analysis {
            kinematics,
            midrapidity,
        }
    }

    pub fn midrapidity_pt(&self, species: Species) -> &[f64] {
        &self.midrapidity[species.index()]
    }
}

/// One line of the species summary table.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesSummary {
    pub species: Species,
    /// Rows in the table with this id.
    pub in_table: usize,
    /// Entries in the species bucket.
    pub derived: usize,
    pub midrapidity: usize,
    pub non_finite_rapidity: usize,
}

pub fn species_summary(table: &ParticleTable, analysis: &Analysis) -> Vec<SpeciesSummary> {
    let in_table = table.species_counts();
    Species::ALL
        .into_iter()
        .map(|s| {
            let bucket = analysis.kinematics.bucket(s);
            SpeciesSummary {
                species: s,
                in_table: in_table[s.index()],
                derived: bucket.len(),
                midrapidity: analysis.midrapidity_pt(s).len(),
                non_finite_rapidity: bucket.numeric_errors().len(),
            }
        })
        .collect()
}
