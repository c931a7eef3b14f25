use serde::{Deserialize, Serialize};

/// A point in the head coordinate frame, in metres
///
/// +x points right, +y anterior (through the nasion), +z superior.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinate {
    /// Creates a new coordinate
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Creates a coordinate from the first three values of a slice
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [x, y, z, ..] => Some(Self::new(*x, *y, *z)),
            _ => None,
        }
    }

    /// Creates a coordinate from spherical angles in degrees
    ///
    /// `polar` is measured from the vertex (+z), `azimuth` from the front
    /// (+y) toward the left (-x).
    pub fn from_spherical(radius: f64, polar: f64, azimuth: f64) -> Self {
        let (theta, phi) = (polar.to_radians(), azimuth.to_radians());
        Self::new(
            -radius * theta.sin() * phi.sin(),
            radius * theta.sin() * phi.cos(),
            radius * theta.cos(),
        )
    }

    /// Euclidean distance to another coordinate
    pub fn distance(&self, other: &Coordinate) -> f64 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Length of the vector from the origin
    pub fn norm(&self) -> f64 {
        self.distance(&Coordinate::default())
    }

    /// Returns true when every component is finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Multiplies every component by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Mirror image across the midsagittal plane
    pub fn mirrored(&self) -> Self {
        Self::new(-self.x, self.y, self.z)
    }

    /// Spherical interpolation between two directions from the origin
    ///
    /// Both endpoints are assumed to share the same radius.
    pub fn slerp(&self, other: &Coordinate, t: f64) -> Self {
        let radius = self.norm();
        let dot = (self.x * other.x + self.y * other.y + self.z * other.z) / (radius * other.norm());
        let omega = dot.clamp(-1.0, 1.0).acos();
        if omega.abs() < 1e-12 {
            return *self;
        }
        let a = ((1.0 - t) * omega).sin() / omega.sin();
        let b = (t * omega).sin() / omega.sin();
        Self::new(
            a * self.x + b * other.x,
            a * self.y + b * other.y,
            a * self.z + b * other.z,
        )
    }
}
