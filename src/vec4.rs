use std::f64::consts::PI;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Energy-momentum four-vector with metric signature (+,−,−,−)
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct FourVector {
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    pub e: f64,
}

impl FourVector {
    pub const fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self { px, py, pz, e }
    }

    /// Minkowski product `E₁E₂ − p₁·p₂`
    pub fn dot(&self, rhs: &Self) -> f64 {
        self.e * rhs.e - self.px * rhs.px - self.py * rhs.py - self.pz * rhs.pz
    }

    /// Invariant mass squared `E² − |p|²`
    pub fn m2(&self) -> f64 {
        self.dot(self)
    }

    /// Transverse momentum
    pub fn pt(&self) -> f64 {
        self.px.hypot(self.py)
    }

    /// Magnitude of the spatial momentum
    pub fn mag(&self) -> f64 {
        self.pt().hypot(self.pz)
    }

    /// Polar angle in [0, π]
    pub fn theta(&self) -> f64 {
        self.pt().atan2(self.pz)
    }

    /// Azimuthal angle in [0, 2π)
    pub fn phi(&self) -> f64 {
        phi_0_2pi(self.py.atan2(self.px))
    }

    /// Velocity `p/E`
    pub fn beta(&self) -> [f64; 3] {
        [self.px / self.e, self.py / self.e, self.pz / self.e]
    }

    pub fn spatial(&self) -> [f64; 3] {
        [self.px, self.py, self.pz]
    }
}

impl Add for FourVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.px + rhs.px,
            self.py + rhs.py,
            self.pz + rhs.pz,
            self.e + rhs.e,
        )
    }
}

impl AddAssign for FourVector {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for FourVector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.px - rhs.px,
            self.py - rhs.py,
            self.pz - rhs.pz,
            self.e - rhs.e,
        )
    }
}

impl SubAssign for FourVector {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for FourVector {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.px, -self.py, -self.pz, -self.e)
    }
}

impl From<[f64; 4]> for FourVector {
    fn from([px, py, pz, e]: [f64; 4]) -> Self {
        Self::new(px, py, pz, e)
    }
}

/// Wrap an angle into [0, 2π)
pub fn phi_0_2pi(phi: f64) -> f64 {
    phi.rem_euclid(2. * PI)
}

pub(crate) fn dot3(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub(crate) fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub(crate) fn norm3(a: [f64; 3]) -> f64 {
    dot3(a, a).sqrt()
}

pub(crate) fn unit3(a: [f64; 3]) -> [f64; 3] {
    let n = norm3(a);
    [a[0] / n, a[1] / n, a[2] / n]
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use rand::Rng;

    #[test]
    fn angular_ranges() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let px = rng.gen_range(-10.0..10.0);
            let py = rng.gen_range(-10.0..10.0);
            let pz = rng.gen_range(-10.0..10.0);
            let v = FourVector::new(px, py, pz, rng.gen_range(0.0..40.0));
            assert!(v.pt() >= 0.);
            assert!(v.mag() >= v.pt());
            assert!((0. ..=PI).contains(&v.theta()));
            assert!((0. ..2. * PI).contains(&v.phi()));
        }
    }

    #[test]
    fn minkowski_metric() {
        let v = FourVector::new(1., 2., 3., 5.);
        assert_relative_eq!(v.m2(), 25. - 1. - 4. - 9.);
        let w = FourVector::new(-1., 0., 2., 4.);
        assert_relative_eq!(v.dot(&w), 20. + 1. - 0. - 6.);
    }

    #[test]
    fn phi_wraps_into_range() {
        assert_relative_eq!(phi_0_2pi(-PI / 2.), 1.5 * PI);
        assert_relative_eq!(phi_0_2pi(2. * PI), 0.);
        let v = FourVector::new(0., -1., 0., 1.);
        assert_relative_eq!(v.phi(), 1.5 * PI);
    }

    #[test]
    fn vector_ops() {
        let v = FourVector::new(1., 2., 3., 4.);
        let w = FourVector::new(4., 3., 2., 1.);
        assert_eq!(v + w, FourVector::new(5., 5., 5., 5.));
        assert_eq!(v - w, FourVector::new(-3., -1., 1., 3.));
        assert_eq!(-v, FourVector::new(-1., -2., -3., -4.));
    }
}
