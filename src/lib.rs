//! Per-particle kinematics and beam identification for simulated
//! deep-inelastic scattering events.
//!
//! An [`Event`] owns a flat list of [`Particle`]s with their Monte Carlo
//! lineage indices. Frame-independent quantities (pt, angles, rapidity)
//! are computed when a particle is built; [`identify_beams`] locates the
//! incident lepton, incident hadron, exchanged boson and scattered lepton,
//! after which the frame-dependent DIS observables (z, Feynman x, angles
//! in the virtual-photon frame) can be filled.

pub mod beams;
pub mod event;
pub mod frame;
pub mod kinematics;
pub mod vec4;

pub use beams::{identify_beams, BeamClassifier, BeamSummary, Boson, StandardClassifier};
pub use event::{Event, Particle, Status};
pub use kinematics::{DisObservables, FrameError, Intrinsic};
pub use vec4::FourVector;

/// Identify the beam roles of `event` and fill the frame-dependent
/// observables of each particle.
///
/// Particles whose observables cannot be computed keep them unset; a
/// partially identified event never aborts processing.
pub fn process_event(event: &mut Event, classifier: &impl BeamClassifier) -> BeamSummary {
    let beams = identify_beams(event, classifier);
    event.compute_dis_observables(&beams);
    beams
}
