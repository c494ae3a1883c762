use std::fmt;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Species – the hadrons we bucket by
// ---------------------------------------------------------------------------

/// The identified hadron species. Any other Monte Carlo id is left unbucketed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Species {
    Pion,
    Kaon,
    Proton,
}

impl Species {
    /// Fixed display / bucket order.
    pub const ALL: [Species; 3] = [Species::Pion, Species::Kaon, Species::Proton];

    /// Monte Carlo (PDG) identifier.
    pub fn mcid(self) -> i64 {
        match self {
            Species::Pion => 211,
            Species::Kaon => 321,
            Species::Proton => 2212,
        }
    }

    pub fn from_mcid(mcid: i64) -> Option<Self> {
        Species::ALL.into_iter().find(|s| s.mcid() == mcid)
    }

    /// Capitalised name, as used in figure titles.
    pub fn label(self) -> &'static str {
        match self {
            Species::Pion => "Pion",
            Species::Kaon => "Kaon",
            Species::Proton => "Proton",
        }
    }

    /// Position in [`Species::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label().to_ascii_lowercase())
    }
}

// ---------------------------------------------------------------------------
// ParticleRecord – one row of the particle list
// ---------------------------------------------------------------------------

/// A row as it comes off disk.
///
/// `mcid` is read as a float so that lists written with `211.0` still load;
/// the loader checks that it is integral before building the table.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RawRecord {
    pub mcid: f64,
    pub tau: f64,
    pub x: f64,
    pub eta: f64,
    #[serde(rename = "E")]
    pub energy: f64,
    pub px: f64,
    pub py: f64,
    pub pz: f64,
}

/// A single sampled particle (one row of the input table).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleRecord {
    /// Monte Carlo species identifier.
    pub mcid: i64,
    /// Proper time of production (fm/c).
    pub tau: f64,
    /// Transverse position of production (fm).
    pub x: f64,
    /// Spacetime rapidity of production.
    pub eta: f64,
    /// Total energy (GeV).
    pub energy: f64,
    pub px: f64,
    pub py: f64,
    pub pz: f64,
}

// ---------------------------------------------------------------------------
// ParticleTable – the complete loaded list, column oriented
// ---------------------------------------------------------------------------

/// Column names every input format must provide.
pub const REQUIRED_COLUMNS: [&str; 8] = ["mcid", "tau", "x", "eta", "E", "px", "py", "pz"];

/// The full particle list. Built once by the loader and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleTable {
    mcid: Vec<i64>,
    tau: Vec<f64>,
    x: Vec<f64>,
    eta: Vec<f64>,
    energy: Vec<f64>,
    px: Vec<f64>,
    py: Vec<f64>,
    pz: Vec<f64>,
}

impl ParticleTable {
    pub fn from_records(records: impl IntoIterator<Item = ParticleRecord>) -> Self {
        let mut table = ParticleTable::default();
        for r in records {
            table.mcid.push(r.mcid);
            table.tau.push(r.tau);
            table.x.push(r.x);
            table.eta.push(r.eta);
            table.energy.push(r.energy);
            table.px.push(r.px);
            table.py.push(r.py);
            table.pz.push(r.pz);
        }
        table
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.mcid.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.mcid.is_empty()
    }

    /// Reassemble row `i`, or `None` past the end.
    pub fn record(&self, i: usize) -> Option<ParticleRecord> {
        Some(ParticleRecord {
            mcid: *self.mcid.get(i)?,
            tau: self.tau[i],
            x: self.x[i],
            eta: self.eta[i],
            energy: self.energy[i],
            px: self.px[i],
            py: self.py[i],
            pz: self.pz[i],
        })
    }

    pub fn records(&self) -> impl Iterator<Item = ParticleRecord> + '_ {
        (0..self.len()).filter_map(|i| self.record(i))
    }

    pub fn mcid(&self) -> &[i64] {
        &self.mcid
    }

    pub fn tau(&self) -> &[f64] {
        &self.tau
    }

    /// How many rows carry each identified species id.
    pub fn species_counts(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for &id in &self.mcid {
            if let Some(s) = Species::from_mcid(id) {
                counts[s.index()] += 1;
            }
        }
        counts
    }
}
