//! Defines the [GemGeometry] trait through which the matcher turns a
//! (detector id, strip) pair into a global position.
//!
//! [PlanarGemGeometry] implements it from a list of flat eta partitions, each
//! placed in the global frame by a [Surface] and carrying a [RectangularStripTopology].
mod planar;

use crate::point::{GlobalPoint, LocalPoint};
use gem_validation_common::{GemDetId, Strip};
use serde::{Deserialize, Serialize};

pub use planar::{EtaPartition, GeometryDescription, PlanarGemGeometry};

/// Read-only view of the GEM geometry valid for one event.
/// Every method returns `None` for an id that is not a known eta partition.
pub trait GemGeometry {
    /// Number of strips in the eta partition.
    fn number_of_strips(&self, id: GemDetId) -> Option<Strip>;

    /// Local position of the centre of `strip` (counted from 1).
    fn centre_of_strip(&self, id: GemDetId, strip: Strip) -> Option<LocalPoint>;

    /// Zero-based channel whose strip covers `point`, clamped to the partition.
    fn channel(&self, id: GemDetId, point: &LocalPoint) -> Option<Strip>;

    /// Transforms a point on the partition's surface into the global frame.
    fn to_global(&self, id: GemDetId, point: &LocalPoint) -> Option<GlobalPoint>;
}

fn identity() -> [[f64; 3]; 3] {
    [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
}

/// Placement of a detector surface.
/// Rows of `rotation` are the local x, y and z axes expressed in the global frame.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Surface {
    pub position: GlobalPoint,
    #[serde(default = "identity")]
    pub rotation: [[f64; 3]; 3],
}

impl Surface {
    pub fn new(position: GlobalPoint) -> Self {
        Self {
            position,
            rotation: identity(),
        }
    }

    pub fn to_global(&self, point: &LocalPoint) -> GlobalPoint {
        let [x_axis, y_axis, z_axis] = self.rotation.map(GlobalPoint::from);
        self.position + x_axis * point.x + y_axis * point.y + z_axis * point.z
    }
}

/// Parallel strips of equal pitch centred on the local origin.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RectangularStripTopology {
    pub nstrips: Strip,
    pub pitch: f64,
}

impl RectangularStripTopology {
    fn offset(&self) -> f64 {
        -0.5 * self.nstrips as f64 * self.pitch
    }

    /// Local position at fractional strip coordinate `strip`, where strip `n`
    /// spans `[n - 1, n)`.
    pub fn local_position(&self, strip: f64) -> LocalPoint {
        LocalPoint::new(strip * self.pitch + self.offset(), 0.0, 0.0)
    }

    pub fn centre_of_strip(&self, strip: Strip) -> LocalPoint {
        self.local_position(strip as f64 - 0.5)
    }

    /// Zero-based channel covering `point`, clamped to the strips present.
    /// `None` if the topology has no strips.
    pub fn channel(&self, point: &LocalPoint) -> Option<Strip> {
        let last = self.nstrips.checked_sub(1).filter(|last| *last >= 0)?;
        let channel = ((point.x - self.offset()) / self.pitch).floor() as Strip;
        Some(channel.clamp(0, last))
    }
}
