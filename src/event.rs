use std::fmt::{self, Display, Formatter};

use particle_id::ParticleID;
use thiserror::Error;

use crate::kinematics::{intrinsic, DisObservables, Intrinsic};
use crate::vec4::FourVector;

/// Monte Carlo status code
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub enum Status {
    /// Stable final-state particle
    FinalState,
    /// Decayed or fragmented particle
    Decayed,
    /// Initial-state beam or documentation entry
    Beam,
    /// Unknown
    Unknown(i32),
}

const FINAL_STATE: i32 = 1;
const DECAYED: i32 = 11;
const BEAM: i32 = 21;

impl From<i32> for Status {
    fn from(status: i32) -> Self {
        match status {
            FINAL_STATE => Self::FinalState,
            DECAYED => Self::Decayed,
            BEAM => Self::Beam,
            s => Self::Unknown(s),
        }
    }
}

impl From<Status> for i32 {
    fn from(status: Status) -> Self {
        match status {
            Status::FinalState => FINAL_STATE,
            Status::Decayed => DECAYED,
            Status::Beam => BEAM,
            Status::Unknown(s) => s,
        }
    }
}

impl Status {
    pub fn is_beam(&self) -> bool {
        *self == Self::Beam
    }

    pub fn is_final_state(&self) -> bool {
        *self == Self::FinalState
    }
}

/// Convert a 1-based Monte Carlo track index to a 0-based storage index.
///
/// The single place where the [1, N] numbering of input records meets the
/// [0, N) numbering of the particle list. Indices below 1 mean "no track".
pub fn from_one_based(index: i32) -> Option<usize> {
    if index < 1 {
        None
    } else {
        Some(index as usize - 1)
    }
}

/// Number of whitespace-separated fields in a particle record
pub const RECORD_FIELDS: usize = 14;

/// Failure to build a particle from an input record
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum RecordError {
    #[error("particle record has {found} fields, expected {RECORD_FIELDS}")]
    FieldCount { found: usize },
    #[error("malformed `{field}` field in particle record")]
    BadField { field: &'static str },
}

/// One entry in an event's particle list
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// 1-based track number from the input record
    pub index: i32,
    pub status: Status,
    /// Particle species, `None` if unset
    pub id: Option<ParticleID>,
    /// 1-based index of the parent track, < 1 if there is none
    pub orig: i32,
    /// 1-based index of the first daughter track, 0 if there are none
    pub daughter: i32,
    /// 1-based index of the last daughter track
    pub ldaughter: i32,
    /// Invariant mass
    pub m: f64,
    /// Production vertex
    pub vertex: [f64; 3],
    momentum: FourVector,
    intrinsic: Intrinsic,
    /// Frame-dependent observables, `None` until the owning event's beam
    /// roles have been resolved
    pub dis: Option<DisObservables>,
}

impl Particle {
    pub fn new(status: Status, id: Option<ParticleID>, momentum: FourVector, m: f64) -> Self {
        Self {
            index: 0,
            status,
            id,
            orig: 0,
            daughter: 0,
            ldaughter: 0,
            m,
            vertex: [0.; 3],
            momentum,
            intrinsic: intrinsic(momentum),
            dis: None,
        }
    }

    /// Build a particle from a whitespace-separated input record with the
    /// fields
    /// `index status id orig daughter ldaughter px py pz E m xv yv zv`.
    ///
    /// A species code of `i32::MIN` marks an unset species. The record must
    /// contain exactly [`RECORD_FIELDS`] fields; surplus, missing or
    /// malformed fields fail without producing a particle.
    pub fn from_record(line: &str) -> Result<Self, RecordError> {
        fn int(fields: &[&str], at: usize, field: &'static str) -> Result<i32, RecordError> {
            fields[at]
                .parse()
                .map_err(|_| RecordError::BadField { field })
        }
        fn real(fields: &[&str], at: usize, field: &'static str) -> Result<f64, RecordError> {
            fields[at]
                .parse()
                .map_err(|_| RecordError::BadField { field })
        }

        let fields = Vec::from_iter(line.split_whitespace());
        if fields.len() != RECORD_FIELDS {
            return Err(RecordError::FieldCount {
                found: fields.len(),
            });
        }
        let id = int(&fields, 2, "id")?;
        let id = if id == i32::MIN {
            None
        } else {
            Some(ParticleID::new(id))
        };
        let momentum = FourVector::new(
            real(&fields, 6, "px")?,
            real(&fields, 7, "py")?,
            real(&fields, 8, "pz")?,
            real(&fields, 9, "E")?,
        );
        Ok(Self {
            index: int(&fields, 0, "index")?,
            status: int(&fields, 1, "status")?.into(),
            id,
            orig: int(&fields, 3, "orig")?,
            daughter: int(&fields, 4, "daughter")?,
            ldaughter: int(&fields, 5, "ldaughter")?,
            m: real(&fields, 10, "m")?,
            vertex: [
                real(&fields, 11, "xv")?,
                real(&fields, 12, "yv")?,
                real(&fields, 13, "zv")?,
            ],
            momentum,
            intrinsic: intrinsic(momentum),
            dis: None,
        })
    }

    pub fn momentum(&self) -> FourVector {
        self.momentum
    }

    /// Replace the four-momentum, recomputing the intrinsic quantities
    pub fn set_momentum(&mut self, momentum: FourVector) {
        self.momentum = momentum;
        self.intrinsic = intrinsic(momentum);
    }

    pub fn set_vertex(&mut self, vertex: [f64; 3]) {
        self.vertex = vertex;
    }

    /// Transverse momentum
    pub fn pt(&self) -> f64 {
        self.intrinsic.pt
    }

    /// Magnitude of the spatial momentum
    pub fn p(&self) -> f64 {
        self.intrinsic.p
    }

    /// Polar angle in [0, π]
    pub fn theta(&self) -> f64 {
        self.intrinsic.theta
    }

    /// Azimuthal angle in [0, 2π)
    pub fn phi(&self) -> f64 {
        self.intrinsic.phi
    }

    pub fn rapidity(&self) -> f64 {
        self.intrinsic.rapidity
    }

    /// Pseudorapidity
    pub fn eta(&self) -> f64 {
        self.intrinsic.eta
    }

    pub fn n_children(&self) -> u32 {
        if self.daughter < 1 {
            0
        } else {
            (self.ldaughter - self.daughter + 1).max(0) as u32
        }
    }

    /// The particle this one originates from, if its parent index
    /// resolves to a track of `event`
    pub fn parent<'a>(&self, event: &'a Event) -> Option<&'a Particle> {
        event.track(from_one_based(self.orig)?)
    }

    /// The daughter track at `offset` within [0, [`n_children`](Self::n_children))
    pub fn child<'a>(&self, event: &'a Event, offset: u32) -> Option<&'a Particle> {
        if offset >= self.n_children() {
            return None;
        }
        event.track(from_one_based(self.daughter + offset as i32)?)
    }

    /// Whether any resolvable daughter has the given species
    pub fn has_child(&self, event: &Event, id: ParticleID) -> bool {
        (0..self.n_children())
            .filter_map(|offset| self.child(event, offset))
            .any(|child| child.id == Some(id))
    }

    /// Four-momentum in the hadron-boson frame, reconstructed from the
    /// stored frame-dependent observables
    pub fn momentum_in_hadron_boson_frame(&self) -> Option<FourVector> {
        let dis = self.dis.as_ref()?;
        let p = dis.pt_vs_gamma / dis.theta_gamma.sin();
        Some(FourVector::new(
            dis.pt_vs_gamma * dis.phi_prf.cos(),
            dis.pt_vs_gamma * dis.phi_prf.sin(),
            dis.pt_vs_gamma / dis.theta_gamma.tan(),
            p.hypot(self.m),
        ))
    }
}

impl Display for Particle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let id = self.id.map(|id| id.id()).unwrap_or(i32::MIN);
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.index,
            i32::from(self.status),
            id,
            self.orig,
            self.daughter,
            self.ldaughter,
            self.momentum.px,
            self.momentum.py,
            self.momentum.pz,
            self.momentum.e,
            self.m,
            self.vertex[0],
            self.vertex[1],
            self.vertex[2],
        )
    }
}

/// An ordered list of particles together with the externally supplied
/// invariant mass squared of the hadronic system
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Event {
    pub particles: Vec<Particle>,
    /// W², supplied by the event loader
    pub w2: f64,
}

impl Event {
    pub fn new(particles: Vec<Particle>, w2: f64) -> Self {
        Self { particles, w2 }
    }

    /// The particle at the 0-based index `i`
    pub fn track(&self, i: usize) -> Option<&Particle> {
        self.particles.get(i)
    }

    pub fn n_tracks(&self) -> usize {
        self.particles.len()
    }
}
