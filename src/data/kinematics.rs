use clap::ValueEnum;

use super::error::NumericError;
use super::model::{ParticleTable, Species};

// ---------------------------------------------------------------------------
// Per-particle observables
// ---------------------------------------------------------------------------

/// How the azimuthal angle is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum AzimuthMode {
    /// `atan(py / px)`, folded into (-π/2, π/2). px = 0 gives ±π/2 or NaN.
    #[default]
    Folded,
    /// Quadrant-aware `atan2(py, px)` over (-π, π].
    Full,
}

/// sqrt(px² + py²)
pub fn transverse_momentum(px: f64, py: f64) -> f64 {
    (px * px + py * py).sqrt()
}

/// Longitudinal rapidity 0.5·ln((E + pz)/(E − pz)).
///
/// Unguarded: E = pz gives +inf, E = −pz gives −inf, and |pz| > E gives NaN.
pub fn rapidity(energy: f64, pz: f64) -> f64 {
    0.5 * ((energy + pz) / (energy - pz)).ln()
}

pub fn azimuth(px: f64, py: f64, mode: AzimuthMode) -> f64 {
    match mode {
        AzimuthMode::Folded => (py / px).atan(),
        AzimuthMode::Full => py.atan2(px),
    }
}

// ---------------------------------------------------------------------------
// Species buckets
// ---------------------------------------------------------------------------

/// Index-aligned observables for every particle of one species, in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesBucket {
    pub species: Species,
    pub pt: Vec<f64>,
    pub rapidity: Vec<f64>,
    pub phi: Vec<f64>,
}

impl SpeciesBucket {
    pub fn new(species: Species) -> Self {
        Self {
            species,
            pt: Vec::new(),
            rapidity: Vec::new(),
            phi: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.pt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pt.is_empty()
    }

    /// Entries whose rapidity came out non-finite.
    pub fn numeric_errors(&self) -> Vec<NumericError> {
        self.rapidity
            .iter()
            .enumerate()
            .filter(|(_, y)| !y.is_finite())
            .map(|(index, &value)| NumericError {
                species: self.species,
                index,
                quantity: "rapidity",
                value,
            })
            .collect()
    }
}

/// One bucket per identified species, in [`Species::ALL`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesKinematics {
    buckets: [SpeciesBucket; 3],
}

impl SpeciesKinematics {
    pub fn bucket(&self, species: Species) -> &SpeciesBucket {
        &self.buckets[species.index()]
    }

    pub fn buckets(&self) -> &[SpeciesBucket] {
        &self.buckets
    }
}

/// Compute pT, y and φ for every identified particle from row `start` on.
///
/// `start` is 0 for the full table; 1 reproduces the legacy behaviour where
/// the first row never reached a bucket. Unknown ids are skipped silently.
pub fn derive_kinematics(table: &ParticleTable, start: usize, azimuth_mode: AzimuthMode) -> SpeciesKinematics {
    let mut buckets = Species::ALL.map(SpeciesBucket::new);

    for p in table.records().skip(start) {
        let Some(species) = Species::from_mcid(p.mcid) else {
            continue;
        };
        let bucket = &mut buckets[species.index()];
        bucket.pt.push(transverse_momentum(p.px, p.py));
        bucket.rapidity.push(rapidity(p.energy, p.pz));
        bucket.phi.push(azimuth(p.px, p.py, azimuth_mode));
    }

    SpeciesKinematics { buckets }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    use approx::assert_relative_eq;

    use super::*;
    use crate::data::model::ParticleRecord;

    fn particle(mcid: i64, energy: f64, px: f64, py: f64, pz: f64) -> ParticleRecord {
        ParticleRecord {
            mcid,
            tau: 1.0,
            x: 0.0,
            eta: 0.0,
            energy,
            px,
            py,
            pz,
        }
    }

    #[test]
    fn pt_is_transverse_magnitude() {
        assert_relative_eq!(transverse_momentum(3.0, 4.0), 5.0);
        assert_relative_eq!(transverse_momentum(-0.3, 0.4), 0.5, epsilon = 1e-15);
        assert_eq!(transverse_momentum(0.0, 0.0), 0.0);
    }

    #[test]
    fn rapidity_is_odd_in_pz() {
        for &(e, pz) in &[(1.0, 0.3), (5.0, 4.9), (0.2, 0.01), (2.0, 0.0)] {
            assert_relative_eq!(rapidity(e, -pz), -rapidity(e, pz), epsilon = 1e-12);
        }
    }

    #[test]
    fn rapidity_at_rest_is_zero() {
        assert_eq!(rapidity(1.0, 0.0), 0.0);
    }

    #[test]
    fn rapidity_is_not_guarded() {
        assert_eq!(rapidity(1.0, 1.0), f64::INFINITY);
        assert_eq!(rapidity(1.0, -1.0), f64::NEG_INFINITY);
        assert!(rapidity(1.0, 2.0).is_nan());
    }

    #[test]
    fn folded_azimuth_loses_quadrant() {
        assert_relative_eq!(azimuth(1.0, 1.0, AzimuthMode::Folded), FRAC_PI_4);
        // third quadrant folds onto the first
        assert_relative_eq!(azimuth(-1.0, -1.0, AzimuthMode::Folded), FRAC_PI_4);
        assert_relative_eq!(azimuth(0.0, 1.0, AzimuthMode::Folded), FRAC_PI_2);
        assert!(azimuth(0.0, 0.0, AzimuthMode::Folded).is_nan());
    }

    #[test]
    fn full_azimuth_keeps_quadrant() {
        assert_relative_eq!(azimuth(-1.0, -1.0, AzimuthMode::Full), -3.0 * FRAC_PI_4);
        assert_relative_eq!(azimuth(-1.0, 0.0, AzimuthMode::Full), PI);
    }

    #[test]
    fn buckets_follow_species_and_table_order() {
        let table = ParticleTable::from_records([
            particle(211, 1.0, 1.0, 0.0, 0.0),
            particle(2212, 2.0, 0.3, 0.4, 0.5),
            particle(211, 2.0, 0.0, 0.5, 0.1),
            particle(22, 1.0, 1.0, 0.0, 0.0),
        ]);

        let kin = derive_kinematics(&table, 0, AzimuthMode::Folded);
        let pions = kin.bucket(Species::Pion);
        assert_eq!(pions.pt, vec![1.0, 0.5]);
        assert_eq!(pions.rapidity[0], 0.0);
        assert_eq!(kin.bucket(Species::Proton).len(), 1);
        assert_relative_eq!(kin.bucket(Species::Proton).pt[0], 0.5, epsilon = 1e-15);
        assert!(kin.bucket(Species::Kaon).is_empty());
    }

    #[test]
    fn unknown_species_are_excluded_everywhere() {
        let table = ParticleTable::from_records([
            particle(-211, 1.0, 1.0, 0.0, 0.0),
            particle(111, 1.0, 1.0, 0.0, 0.0),
        ]);
        let kin = derive_kinematics(&table, 0, AzimuthMode::Folded);
        assert!(kin.buckets().iter().all(SpeciesBucket::is_empty));
    }

    #[test]
    fn legacy_start_skips_first_row() {
        let table = ParticleTable::from_records([
            particle(211, 1.0, 1.0, 0.0, 0.0),
            particle(211, 1.0, 0.5, 0.0, 0.0),
        ]);

        assert_eq!(derive_kinematics(&table, 0, AzimuthMode::Folded).bucket(Species::Pion).pt, vec![1.0, 0.5]);
        assert_eq!(derive_kinematics(&table, 1, AzimuthMode::Folded).bucket(Species::Pion).pt, vec![0.5]);
    }

    #[test]
    fn non_finite_rapidity_is_reported_not_raised() {
        let table = ParticleTable::from_records([
            particle(321, 1.0, 0.1, 0.1, 0.5),
            particle(321, 1.0, 0.1, 0.1, 1.0),
        ]);
        let kin = derive_kinematics(&table, 0, AzimuthMode::Folded);
        let kaons = kin.bucket(Species::Kaon);
        assert_eq!(kaons.len(), 2);

        let errs = kaons.numeric_errors();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].index, 1);
        assert_eq!(errs[0].value, f64::INFINITY);
    }
}
