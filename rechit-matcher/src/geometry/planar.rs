use super::{GemGeometry, RectangularStripTopology, Surface};
use crate::{
    error::GeometryError,
    point::{GlobalPoint, LocalPoint},
};
use gem_validation_common::{GemDetId, Strip};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EtaPartition {
    pub id: GemDetId,
    pub surface: Surface,
    pub topology: RectangularStripTopology,
}

/// Serialized form of [PlanarGemGeometry].
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GeometryDescription {
    pub eta_partitions: Vec<EtaPartition>,
}

/// GEM geometry assembled from flat eta partitions.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(try_from = "GeometryDescription")]
pub struct PlanarGemGeometry {
    eta_partitions: HashMap<GemDetId, EtaPartition>,
}

impl PlanarGemGeometry {
    pub fn new(eta_partitions: Vec<EtaPartition>) -> Result<Self, GeometryError> {
        let mut geometry = Self::default();
        for partition in eta_partitions {
            geometry.add(partition)?;
        }
        Ok(geometry)
    }

    pub fn add(&mut self, partition: EtaPartition) -> Result<(), GeometryError> {
        let id = partition.id;
        if id.roll() == 0 {
            return Err(GeometryError::NotAnEtaPartition(id));
        }
        let topology = &partition.topology;
        if topology.nstrips < 1 || !(topology.pitch > 0.0) {
            return Err(GeometryError::InvalidTopology {
                id,
                nstrips: topology.nstrips,
                pitch: topology.pitch,
            });
        }
        if self.eta_partitions.insert(id, partition).is_some() {
            return Err(GeometryError::DuplicatePartition(id));
        }
        Ok(())
    }

    pub fn eta_partition(&self, id: GemDetId) -> Option<&EtaPartition> {
        self.eta_partitions.get(&id)
    }

    pub fn len(&self) -> usize {
        self.eta_partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eta_partitions.is_empty()
    }
}

impl TryFrom<GeometryDescription> for PlanarGemGeometry {
    type Error = GeometryError;

    fn try_from(description: GeometryDescription) -> Result<Self, Self::Error> {
        Self::new(description.eta_partitions)
    }
}

impl GemGeometry for PlanarGemGeometry {
    fn number_of_strips(&self, id: GemDetId) -> Option<Strip> {
        self.eta_partition(id)
            .map(|partition| partition.topology.nstrips)
    }

    fn centre_of_strip(&self, id: GemDetId, strip: Strip) -> Option<LocalPoint> {
        self.eta_partition(id)
            .map(|partition| partition.topology.centre_of_strip(strip))
    }

    fn channel(&self, id: GemDetId, point: &LocalPoint) -> Option<Strip> {
        self.eta_partition(id)
            .and_then(|partition| partition.topology.channel(point))
    }

    fn to_global(&self, id: GemDetId, point: &LocalPoint) -> Option<GlobalPoint> {
        self.eta_partition(id)
            .map(|partition| partition.surface.to_global(point))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn partition(roll: i32, y: f64) -> EtaPartition {
        EtaPartition {
            id: GemDetId::new(1, 1, 1, 1, 1, roll).unwrap(),
            surface: Surface::new(GlobalPoint::new(0.0, y, 568.0)),
            topology: RectangularStripTopology {
                nstrips: 384,
                pitch: 0.05,
            },
        }
    }

    #[test]
    fn lookup_by_partition() {
        let geometry = PlanarGemGeometry::new(vec![partition(1, 140.0), partition(2, 160.0)]).unwrap();
        assert_eq!(geometry.len(), 2);

        let id = GemDetId::new(1, 1, 1, 1, 1, 2).unwrap();
        assert_eq!(geometry.number_of_strips(id), Some(384));

        let local = geometry.centre_of_strip(id, 192).unwrap();
        let global = geometry.to_global(id, &local).unwrap();
        assert_approx_eq!(global.x, -0.025);
        assert_approx_eq!(global.y, 160.0);
        assert_approx_eq!(global.z, 568.0);
    }

    #[test]
    fn unknown_partition_is_none() {
        let geometry = PlanarGemGeometry::new(vec![partition(1, 140.0)]).unwrap();
        let id = GemDetId::new(1, 1, 1, 2, 1, 1).unwrap();
        assert_eq!(geometry.number_of_strips(id), None);
        assert_eq!(geometry.centre_of_strip(id, 1), None);
    }

    #[test]
    fn duplicate_partition_rejected() {
        let result = PlanarGemGeometry::new(vec![partition(1, 140.0), partition(1, 150.0)]);
        assert!(matches!(result, Err(GeometryError::DuplicatePartition(_))));
    }

    #[test]
    fn chamber_level_id_rejected() {
        let result = PlanarGemGeometry::new(vec![partition(0, 140.0)]);
        assert!(matches!(result, Err(GeometryError::NotAnEtaPartition(_))));
    }

    #[test]
    fn load_from_json() {
        let id = GemDetId::new(-1, 1, 1, 2, 3, 4).unwrap();
        let json = format!(
            r#"{{ "eta-partitions": [ {{
                "id": {},
                "surface": {{ "position": [1.0, 2.0, -570.0] }},
                "topology": {{ "nstrips": 10, "pitch": 1.0 }}
            }} ] }}"#,
            id.raw()
        );
        let geometry: PlanarGemGeometry = serde_json::from_str(&json).unwrap();
        let global = geometry
            .to_global(id, &geometry.centre_of_strip(id, 10).unwrap())
            .unwrap();
        assert_approx_eq!(global.x, 5.5);
        assert_approx_eq!(global.y, 2.0);
        assert_approx_eq!(global.z, -570.0);
    }
}
