//! Identification of the beam roles within an event's particle list:
//! incident lepton, incident hadron, exchanged boson and scattered lepton.

use particle_id::ParticleID;

use crate::event::{from_one_based, Event, Particle};
use crate::vec4::FourVector;

/// Classification of particles into beam roles.
///
/// Injected into [`identify_beams`] so that experiments with different
/// status or species conventions can replace single predicates. The
/// default rules live in [`StandardClassifier`].
pub trait BeamClassifier {
    /// Whether the particle is the incident lepton beam
    fn is_incident_lepton(&self, particle: &Particle) -> bool;

    /// Whether the particle is the incident hadron beam
    fn is_incident_hadron(&self, particle: &Particle) -> bool;

    /// Whether the particle could be the scattered beam lepton.
    /// Candidates are disambiguated by [`scattered_lepton_policy`](Self::scattered_lepton_policy).
    fn is_scattered_lepton_candidate(&self, particle: &Particle) -> bool;

    /// Whether the particle is the exchanged boson
    fn is_boson(&self, particle: &Particle) -> bool;

    /// Whether the particle is internal bookkeeping that identification
    /// should ignore
    fn skip(&self, particle: &Particle) -> bool;

    fn scattered_lepton_policy(&self) -> ScatteredLeptonPolicy {
        ScatteredLeptonPolicy::default()
    }
}

/// How to choose the scattered lepton among several final-state particles
/// of the lepton beam species
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ScatteredLeptonPolicy {
    /// Prefer a candidate produced directly by the incident lepton, fall
    /// back to the most energetic one
    #[default]
    LineageThenHighestEnergy,
    /// Only accept a candidate produced directly by the incident lepton
    LineageOnly,
    /// Take the most energetic candidate
    HighestEnergy,
}

/// The classification rules of this analysis convention.
///
/// Beam particles carry the beam status code; the lepton beam species is
/// configurable, the hadron beam must be a nucleon. Identification of the
/// scattered hadron beam is not implemented.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct StandardClassifier {
    /// PDG code of the lepton beam
    pub lepton: ParticleID,
    pub scattered_lepton_policy: ScatteredLeptonPolicy,
}

impl StandardClassifier {
    pub fn new(lepton: ParticleID) -> Self {
        Self {
            lepton,
            scattered_lepton_policy: Default::default(),
        }
    }
}

fn is_nucleon(id: ParticleID) -> bool {
    matches!(id.id().abs(), 2112 | 2212)
}

fn is_boson_id(id: ParticleID) -> bool {
    // photon, Z, W
    matches!(id.id().abs(), 22..=24)
}

impl BeamClassifier for StandardClassifier {
    fn is_incident_lepton(&self, particle: &Particle) -> bool {
        particle.status.is_beam() && particle.id == Some(self.lepton)
    }

    fn is_incident_hadron(&self, particle: &Particle) -> bool {
        particle.status.is_beam() && particle.id.map_or(false, is_nucleon)
    }

    fn is_scattered_lepton_candidate(&self, particle: &Particle) -> bool {
        particle.status.is_final_state() && particle.id == Some(self.lepton)
    }

    fn is_boson(&self, particle: &Particle) -> bool {
        particle.status.is_beam() && particle.id.map_or(false, is_boson_id)
    }

    // Absolute value, so that e.g. an anti-down quark entry (id −1) is
    // skipped like a down quark entry
    fn skip(&self, particle: &Particle) -> bool {
        particle.id.map_or(false, |id| id.id().abs() < 10)
    }

    fn scattered_lepton_policy(&self) -> ScatteredLeptonPolicy {
        self.scattered_lepton_policy
    }
}

/// The exchanged boson, either an explicit particle-list entry or
/// reconstructed from the incident and scattered leptons
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Boson {
    /// 0-based index of an explicit entry in the particle list
    Listed(usize),
    /// No explicit entry; the four-momentum is the difference of the
    /// incident and scattered lepton momenta
    Synthesized(FourVector),
}

/// The four beam roles of an event, as 0-based indices into its
/// particle list
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BeamSummary {
    pub incident_lepton: Option<usize>,
    pub incident_hadron: Option<usize>,
    pub boson: Option<Boson>,
    pub scattered_lepton: Option<usize>,
}

impl BeamSummary {
    /// Whether all four roles are resolved. A [synthesized](Boson::Synthesized)
    /// boson counts as resolved.
    pub fn is_complete(&self) -> bool {
        self.incident_lepton.is_some()
            && self.incident_hadron.is_some()
            && self.boson.is_some()
            && self.scattered_lepton.is_some()
    }

    /// The roles as particle-list indices, in the fixed order
    /// [incident lepton, incident hadron, boson, scattered lepton].
    ///
    /// A synthesized boson has no particle-list entry and yields `None`
    /// here even though [`is_complete`](Self::is_complete) counts it.
    pub fn roles(&self) -> [Option<usize>; 4] {
        let boson = match self.boson {
            Some(Boson::Listed(i)) => Some(i),
            _ => None,
        };
        [
            self.incident_lepton,
            self.incident_hadron,
            boson,
            self.scattered_lepton,
        ]
    }

    /// Four-momentum of the exchanged boson
    pub fn boson_momentum(&self, event: &Event) -> Option<FourVector> {
        match self.boson? {
            Boson::Listed(i) => Some(event.track(i)?.momentum()),
            Boson::Synthesized(p) => Some(p),
        }
    }
}

/// Locate the beam roles in an event's particle list.
///
/// The first particle matching each role in list order wins. If no
/// explicit boson entry exists but both leptons are found, the boson is
/// [synthesized](Boson::Synthesized) from their difference. The scattered
/// hadron beam is never identified.
pub fn identify_beams(event: &Event, classifier: &impl BeamClassifier) -> BeamSummary {
    let mut beams = BeamSummary::default();
    let mut candidates = Vec::new();
    for (i, particle) in event.particles.iter().enumerate() {
        if classifier.skip(particle) {
            continue;
        }
        if beams.incident_lepton.is_none() && classifier.is_incident_lepton(particle) {
            beams.incident_lepton = Some(i);
        } else if beams.incident_hadron.is_none() && classifier.is_incident_hadron(particle) {
            beams.incident_hadron = Some(i);
        } else if beams.boson.is_none() && classifier.is_boson(particle) {
            beams.boson = Some(Boson::Listed(i));
        } else if classifier.is_scattered_lepton_candidate(particle) {
            candidates.push(i);
        }
    }
    beams.scattered_lepton = select_scattered_lepton(
        event,
        &candidates,
        beams.incident_lepton,
        classifier.scattered_lepton_policy(),
    );
    if beams.boson.is_none() {
        if let (Some(incident), Some(scattered)) = (beams.incident_lepton, beams.scattered_lepton)
        {
            let q = event.particles[incident].momentum() - event.particles[scattered].momentum();
            beams.boson = Some(Boson::Synthesized(q));
        }
    }
    beams
}

fn select_scattered_lepton(
    event: &Event,
    candidates: &[usize],
    incident_lepton: Option<usize>,
    policy: ScatteredLeptonPolicy,
) -> Option<usize> {
    let by_lineage = || {
        let beam = incident_lepton?;
        candidates.iter().copied().find(|&i| {
            event
                .track(i)
                .and_then(|p| from_one_based(p.orig))
                == Some(beam)
        })
    };
    let by_energy = || {
        candidates
            .iter()
            .copied()
            .max_by(|&a, &b| {
                let ea = event.particles[a].momentum().e;
                let eb = event.particles[b].momentum().e;
                ea.total_cmp(&eb)
            })
    };
    use ScatteredLeptonPolicy::*;
    match policy {
        LineageOnly => by_lineage(),
        HighestEnergy => by_energy(),
        LineageThenHighestEnergy => by_lineage().or_else(by_energy),
    }
}
