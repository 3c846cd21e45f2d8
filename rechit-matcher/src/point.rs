use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// A point in the frame of one detector surface.
#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct LocalPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl LocalPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for LocalPoint {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<LocalPoint> for [f64; 3] {
    fn from(point: LocalPoint) -> Self {
        [point.x, point.y, point.z]
    }
}

/// A point in the global detector frame.
///
/// The default value, the origin, doubles as the "no position" sentinel returned by
/// position queries that cannot resolve a hit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct GlobalPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl GlobalPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn origin() -> Self {
        Default::default()
    }

    pub fn is_origin(&self) -> bool {
        *self == Self::origin()
    }
}

impl Add for GlobalPoint {
    type Output = GlobalPoint;

    fn add(self, rhs: Self) -> Self::Output {
        GlobalPoint::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Mul<f64> for GlobalPoint {
    type Output = GlobalPoint;

    fn mul(self, rhs: f64) -> Self::Output {
        GlobalPoint::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl From<[f64; 3]> for GlobalPoint {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<GlobalPoint> for [f64; 3] {
    fn from(point: GlobalPoint) -> Self {
        [point.x, point.y, point.z]
    }
}
