//! Lorentz-frame transformations: boosts, spatial rotations and the
//! rest-frame builder used for the virtual-photon frame definitions.

use std::f64::consts::PI;

use crate::vec4::{cross, norm3, unit3, FourVector};

/// Spatial rotation as a 3×3 matrix
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rotation([[f64; 3]; 3]);

impl Rotation {
    pub const fn identity() -> Self {
        Self([[1., 0., 0.], [0., 1., 0.], [0., 0., 1.]])
    }

    /// Rotation by `angle` about the unit vector `axis`
    pub fn from_axis_angle(axis: [f64; 3], angle: f64) -> Self {
        let [x, y, z] = axis;
        let (s, c) = angle.sin_cos();
        let t = 1. - c;
        Self([
            [t * x * x + c, t * x * y - s * z, t * x * z + s * y],
            [t * x * y + s * z, t * y * y + c, t * y * z - s * x],
            [t * x * z - s * y, t * y * z + s * x, t * z * z + c],
        ])
    }

    /// Frame rotation whose z axis points along `v`.
    ///
    /// This rotates the coordinate axes, carrying ẑ onto the direction of
    /// `v`. To express vectors in the rotated frame apply the [inverse](Self::inverse)
    /// instead. A zero `v` leaves the rotation undefined; the caller is
    /// responsible for not passing one (the identity is returned).
    pub fn with_z_axis(v: [f64; 3]) -> Self {
        if norm3(v) == 0. {
            return Self::identity();
        }
        let u = unit3(v);
        let axis = cross([0., 0., 1.], u);
        let s = norm3(axis);
        if s == 0. {
            // v already along ±z
            return if u[2] > 0. {
                Self::identity()
            } else {
                Self::from_axis_angle([1., 0., 0.], PI)
            };
        }
        Self::from_axis_angle(unit3(axis), s.atan2(u[2]))
    }

    /// Inverse rotation (transpose)
    pub fn inverse(&self) -> Self {
        let m = &self.0;
        let mut t = [[0.; 3]; 3];
        for (i, row) in m.iter().enumerate() {
            for (j, x) in row.iter().enumerate() {
                t[j][i] = *x;
            }
        }
        Self(t)
    }

    pub fn apply(&self, v: [f64; 3]) -> [f64; 3] {
        let m = &self.0;
        let mut out = [0.; 3];
        for (o, row) in out.iter_mut().zip(m) {
            *o = row[0] * v[0] + row[1] * v[1] + row[2] * v[2];
        }
        out
    }
}

/// Combined Lorentz boost and spatial rotation, stored as a 4×4 matrix
/// acting on (px, py, pz, E)
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LorentzTransform([[f64; 4]; 4]);

impl LorentzTransform {
    /// Pure boost with velocity `beta`.
    ///
    /// `|beta| ≥ 1` is unphysical and the caller's responsibility to avoid.
    pub fn boost(beta: [f64; 3]) -> Self {
        let b2 = beta[0] * beta[0] + beta[1] * beta[1] + beta[2] * beta[2];
        let gamma = 1. / (1. - b2).sqrt();
        // (γ−1)/β² stays finite as β → 0
        let k = if b2 > 0. { (gamma - 1.) / b2 } else { 0. };
        let mut m = [[0.; 4]; 4];
        for i in 0..3 {
            for j in 0..3 {
                m[i][j] = k * beta[i] * beta[j] + if i == j { 1. } else { 0. };
            }
            m[i][3] = gamma * beta[i];
            m[3][i] = gamma * beta[i];
        }
        m[3][3] = gamma;
        Self(m)
    }

    /// Compose with a spatial rotation applied after this transform
    pub fn then_rotate(self, r: &Rotation) -> Self {
        let mut r4 = [[0.; 4]; 4];
        for i in 0..3 {
            for j in 0..3 {
                r4[i][j] = r.0[i][j];
            }
        }
        r4[3][3] = 1.;
        let mut out = [[0.; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                out[i][j] = (0..4).map(|k| r4[i][k] * self.0[k][j]).sum();
            }
        }
        Self(out)
    }

    pub fn apply(&self, v: FourVector) -> FourVector {
        let x = [v.px, v.py, v.pz, v.e];
        let mut out = [0.; 4];
        for (o, row) in out.iter_mut().zip(&self.0) {
            *o = row[0] * x[0] + row[1] * x[1] + row[2] * x[2] + row[3] * x[3];
        }
        out.into()
    }
}

/// Returns the transform to the rest frame of `rest`.
///
/// If `z_hint` is given, the hint is itself boosted by the same transform
/// and the frame is rotated so that the boosted hint defines the positive
/// z direction. e.g. to go from the lab frame to the proton rest frame
/// with the virtual photon defining z:
/// `boost_to_rest_frame(proton_lab, Some(photon_lab))`.
pub fn boost_to_rest_frame(rest: FourVector, z_hint: Option<FourVector>) -> LorentzTransform {
    let [bx, by, bz] = rest.beta();
    let to_rest = LorentzTransform::boost([-bx, -by, -bz]);
    match z_hint {
        None => to_rest,
        Some(hint) => {
            let boosted = to_rest.apply(hint);
            // We need the rotation of the frame axes, so vectors transform
            // with the inverse.
            let rotate = Rotation::with_z_axis(boosted.spatial()).inverse();
            to_rest.then_rotate(&rotate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const PROTON_M: f64 = 0.938272;

    fn proton(pz: f64) -> FourVector {
        FourVector::new(0., 0., pz, pz.hypot(PROTON_M))
    }

    #[test]
    fn boost_to_rest_frame_stops_target() {
        let p = proton(920.);
        let rest = boost_to_rest_frame(p, None).apply(p);
        assert_abs_diff_eq!(rest.px, 0., epsilon = 1e-9);
        assert_abs_diff_eq!(rest.py, 0., epsilon = 1e-9);
        // γ ≈ 10³ amplifies the cancellation in pz − βE
        assert_abs_diff_eq!(rest.pz, 0., epsilon = 1e-5);
        assert_relative_eq!(rest.e, PROTON_M, max_relative = 1e-5);
    }

    #[test]
    fn z_hint_lands_on_positive_z() {
        // Active/passive duality: with_z_axis carries ẑ onto the hint
        // direction, so its inverse must carry the boosted hint onto +z.
        let p = proton(920.);
        let hint = FourVector::new(1.3, -0.7, -25., 25.2);
        let transform = boost_to_rest_frame(p, Some(hint));
        let h = transform.apply(hint);
        assert_abs_diff_eq!(h.px, 0., epsilon = 1e-9);
        assert_abs_diff_eq!(h.py, 0., epsilon = 1e-9);
        assert!(h.pz > 0.);
        // Rotations preserve the energy and the spatial magnitude
        let plain = boost_to_rest_frame(p, None).apply(hint);
        assert_relative_eq!(h.e, plain.e, max_relative = 1e-12);
        assert_relative_eq!(h.mag(), plain.mag(), max_relative = 1e-12);
    }

    #[test]
    fn with_z_axis_is_frame_rotation() {
        let v = [0.3, -1.2, 0.4];
        let r = Rotation::with_z_axis(v);
        let z_image = r.apply([0., 0., 1.]);
        let u = unit3(v);
        for (a, b) in z_image.iter().zip(&u) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn with_z_axis_degenerate_directions() {
        let up = Rotation::with_z_axis([0., 0., 3.]);
        assert_eq!(up, Rotation::identity());
        let down = Rotation::with_z_axis([0., 0., -3.]);
        let flipped = down.inverse().apply([0., 0., -1.]);
        assert_relative_eq!(flipped[2], 1., epsilon = 1e-12);
    }

    #[test]
    fn boost_preserves_invariant_mass() {
        let v = FourVector::new(0.4, -0.2, 3., 3.2);
        let boosted = LorentzTransform::boost([0.3, -0.1, 0.85]).apply(v);
        assert_relative_eq!(boosted.m2(), v.m2(), epsilon = 1e-9);
    }
}
