//! Derived kinematic quantities: frame-independent intrinsics computed at
//! particle construction, and the DIS observables that need the event's
//! beam roles.

use itertools::izip;
use particle_id::ParticleID;
use thiserror::Error;

use crate::beams::BeamSummary;
use crate::event::{from_one_based, Event, Particle};
use crate::frame::boost_to_rest_frame;
use crate::vec4::{cross, dot3, phi_0_2pi, unit3, FourVector};

/// Placeholder for rapidity and pseudorapidity when the logarithm
/// argument would be zero or infinite
pub const RAPIDITY_SENTINEL: f64 = -19.;

/// Frame-independent quantities derived from a four-momentum alone
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Intrinsic {
    /// Transverse momentum
    pub pt: f64,
    /// Magnitude of the spatial momentum
    pub p: f64,
    /// Polar angle in [0, π]
    pub theta: f64,
    /// Azimuthal angle in [0, 2π)
    pub phi: f64,
    pub rapidity: f64,
    /// Pseudorapidity
    pub eta: f64,
}

/// Compute the frame-independent quantities of a four-momentum.
///
/// Rapidity and pseudorapidity fall back to [`RAPIDITY_SENTINEL`] whenever
/// E−pz ≤ 0, E+pz ≤ 0, p−pz = 0 or p+pz = 0.
pub fn intrinsic(v: FourVector) -> Intrinsic {
    let pt = v.pt();
    let p = pt.hypot(v.pz);
    let e_plus = v.e + v.pz;
    let e_minus = v.e - v.pz;
    let p_plus = p + v.pz;
    let p_minus = p - v.pz;
    let (rapidity, eta) = if e_minus <= 0. || e_plus <= 0. || p_minus == 0. || p_plus == 0. {
        (RAPIDITY_SENTINEL, RAPIDITY_SENTINEL)
    } else {
        (
            0.5 * (e_plus / e_minus).ln(),
            0.5 * (p_plus / p_minus).ln(),
        )
    };
    Intrinsic {
        pt,
        p,
        theta: pt.atan2(v.pz),
        phi: v.phi(),
        rapidity,
        eta,
    }
}

/// Observables that depend on the event's beam roles
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct DisObservables {
    /// Energy fraction of the boson carried by this particle,
    /// `(hadron·particle) / (hadron·boson)`
    pub z: f64,
    /// Feynman x, `2 pz / W` in the boson-hadron centre-of-mass frame
    pub x_feynman: f64,
    /// Polar angle with respect to the boson in the hadron rest frame
    pub theta_gamma: f64,
    /// Transverse momentum with respect to the boson in the hadron rest frame
    pub pt_vs_gamma: f64,
    /// Azimuthal angle around the boson axis, HERMES convention
    pub phi_prf: f64,
    /// Species of the parent track, if there is one
    pub parent_id: Option<ParticleID>,
}

/// Failure to compute the frame-dependent observables
#[derive(Copy, Clone, Debug, Error, Eq, PartialEq)]
pub enum FrameError {
    #[error("beam role `{0}` has not been identified")]
    MissingBeam(&'static str),
    #[error("vanishing denominator computing {0}")]
    DivisionByZero(&'static str),
}

/// Azimuthal angle of `hadron` around the axis of `photon`, measured from
/// the lepton scattering plane following the HERMES convention.
///
/// All three vectors must already be expressed in the same frame
/// (usually the target rest frame).
pub fn hermes_phi_h(hadron: FourVector, lepton: FourVector, photon: FourVector) -> f64 {
    let q = photon.spatial();
    let y_axis = unit3(cross(q, lepton.spatial()));
    let z_axis = unit3(q);
    let x_axis = cross(y_axis, z_axis);
    let h = hadron.spatial();
    phi_0_2pi(dot3(h, y_axis).atan2(dot3(h, x_axis)))
}

/// Compute the frame-dependent observables of one particle.
///
/// Requires the incident hadron, incident lepton and exchanged boson of
/// `beams` to be resolved.
pub fn event_dependent(
    particle: &Particle,
    event: &Event,
    beams: &BeamSummary,
) -> Result<DisObservables, FrameError> {
    let hadron = beams
        .incident_hadron
        .and_then(|i| event.track(i))
        .ok_or(FrameError::MissingBeam("incident hadron"))?
        .momentum();
    let lepton = beams
        .incident_lepton
        .and_then(|i| event.track(i))
        .ok_or(FrameError::MissingBeam("incident lepton"))?
        .momentum();
    let boson = beams
        .boson_momentum(event)
        .ok_or(FrameError::MissingBeam("exchanged boson"))?;

    // The 4-vector definition of z is frame independent
    let denominator = hadron.dot(&boson);
    if denominator == 0. {
        return Err(FrameError::DivisionByZero("z"));
    }
    let z = hadron.dot(&particle.momentum()) / denominator;

    // Transverse momentum and angles with respect to the boson, in the
    // hadron rest frame with the boson defining z
    let to_hadron_rest = boost_to_rest_frame(hadron, Some(boson));
    let in_rest_frame = to_hadron_rest.apply(particle.momentum());
    let theta_gamma = in_rest_frame.theta();
    let pt_vs_gamma = in_rest_frame.pt();
    let phi_prf = hermes_phi_h(
        in_rest_frame,
        to_hadron_rest.apply(lepton),
        to_hadron_rest.apply(boson),
    );

    // Feynman x from the boson-hadron centre-of-mass frame
    if event.w2 <= 0. {
        return Err(FrameError::DivisionByZero("x_feynman"));
    }
    let to_cm = boost_to_rest_frame(boson + hadron, Some(boson));
    let x_feynman = 2. * to_cm.apply(particle.momentum()).pz / event.w2.sqrt();

    let parent_id = from_one_based(particle.orig)
        .and_then(|i| event.track(i))
        .and_then(|parent| parent.id);

    Ok(DisObservables {
        z,
        x_feynman,
        theta_gamma,
        pt_vs_gamma,
        phi_prf,
        parent_id,
    })
}

impl Event {
    /// Fill the frame-dependent observables of every particle.
    ///
    /// A particle whose computation fails keeps `None`; the failure is
    /// logged and never aborts the rest of the event.
    pub fn compute_dis_observables(&mut self, beams: &BeamSummary) {
        if beams.incident_hadron.is_none()
            || beams.incident_lepton.is_none()
            || beams.boson.is_none()
        {
            log::debug!("beam roles unresolved, leaving frame-dependent observables unset");
            return;
        }
        let results = Vec::from_iter(
            self.particles
                .iter()
                .map(|particle| event_dependent(particle, self, beams)),
        );
        for (particle, result) in izip!(&mut self.particles, results) {
            match result {
                Ok(observables) => particle.dis = Some(observables),
                Err(err) => {
                    log::warn!(
                        "frame-dependent observables unset for track {}: {err}",
                        particle.index
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::PI;

    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::Rng;

    use crate::frame::LorentzTransform;

    #[test]
    fn intrinsic_ranges() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let v = FourVector::new(
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
                rng.gen_range(0.1..20.0),
            );
            let kin = intrinsic(v);
            assert!(kin.pt >= 0.);
            assert!(kin.p >= kin.pt);
            assert!((0. ..=PI).contains(&kin.theta));
            assert!((0. ..2. * PI).contains(&kin.phi));
        }
    }

    #[test]
    fn degenerate_rapidity_uses_sentinel() {
        // E − pz ≤ 0
        let lightlike = intrinsic(FourVector::new(0., 0., 3., 3.));
        assert_eq!(lightlike.rapidity, RAPIDITY_SENTINEL);
        assert_eq!(lightlike.eta, RAPIDITY_SENTINEL);
        // E + pz ≤ 0
        let backward = intrinsic(FourVector::new(0., 0., -3., 2.));
        assert_eq!(backward.rapidity, RAPIDITY_SENTINEL);
        assert_eq!(backward.eta, RAPIDITY_SENTINEL);
        // p − pz = 0 for a vector along +z even with E > |pz|
        let along_z = intrinsic(FourVector::new(0., 0., 1., 2.));
        assert_eq!(along_z.eta, RAPIDITY_SENTINEL);
        let ok = intrinsic(FourVector::new(0.5, 0., 1., 2.));
        assert!(ok.rapidity != RAPIDITY_SENTINEL);
        assert!(ok.eta != RAPIDITY_SENTINEL);
    }

    #[test]
    fn z_is_frame_invariant() {
        let hadron = FourVector::new(0., 0., 920., (920.0_f64 * 920. + 0.88).sqrt());
        let boson = FourVector::new(0.5, -0.2, -7., 6.8);
        let pion = FourVector::new(0.4, 0.3, 12., 12.01);
        let z = hadron.dot(&pion) / hadron.dot(&boson);
        let boost = LorentzTransform::boost([0.2, -0.5, 0.6]);
        let z_boosted = boost.apply(hadron).dot(&boost.apply(pion))
            / boost.apply(hadron).dot(&boost.apply(boson));
        assert_relative_eq!(z, z_boosted, max_relative = 1e-9);
    }

    #[test]
    fn hermes_phi_of_in_plane_hadron() {
        // A hadron inside the lepton scattering plane has φ of 0 or π;
        // one along +y (the q×l axis) has φ = π/2.
        let photon = FourVector::new(0., 0., 5., 5.);
        let lepton = FourVector::new(2., 0., -20., 20.1);
        let in_plane = FourVector::new(1., 0., 3., 3.3);
        let phi = hermes_phi_h(in_plane, lepton, photon);
        assert!(
            phi.abs() < 1e-12 || (phi - PI).abs() < 1e-12,
            "phi = {phi}"
        );
        let out_of_plane = FourVector::new(0., 1., 3., 3.3);
        let phi = hermes_phi_h(out_of_plane, lepton, photon);
        assert!(
            (phi - PI / 2.).abs() < 1e-12 || (phi - 1.5 * PI).abs() < 1e-12,
            "phi = {phi}"
        );
    }

    #[test]
    fn hermes_phi_distinguishes_sides() {
        let photon = FourVector::new(0., 0., 5., 5.);
        let lepton = FourVector::new(2., 0., -20., 20.1);
        let above = hermes_phi_h(FourVector::new(0.3, 0.4, 3., 3.1), lepton, photon);
        let below = hermes_phi_h(FourVector::new(0.3, -0.4, 3., 3.1), lepton, photon);
        assert_abs_diff_eq!(above + below, 2. * PI, epsilon = 1e-9);
    }
}
