//! Reconstructed GEM hits, both as read from the event and as kept by the matcher.
use gem_validation_common::{BunchCrossing, GemDetId, Strip};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A reconstructed GEM cluster as stored in the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GemRecHit {
    pub det_id: GemDetId,
    pub bunch_x: BunchCrossing,
    pub first_cluster_strip: Strip,
    #[serde(default = "single_strip")]
    pub cluster_size: i32,
}

fn single_strip() -> i32 {
    1
}

impl GemRecHit {
    pub fn new(det_id: GemDetId, first_cluster_strip: Strip, bunch_x: BunchCrossing) -> Self {
        Self {
            det_id,
            bunch_x,
            first_cluster_strip,
            cluster_size: single_strip(),
        }
    }
}

/// Rec hits grouped by detector id.
///
/// Hits are kept sorted by id; within one id they stay in the order they were
/// supplied, so [GemRecHitCollection::get] returns them in their natural order.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "Vec<GemRecHit>", into = "Vec<GemRecHit>")]
pub struct GemRecHitCollection {
    hits: Vec<GemRecHit>,
}

impl GemRecHitCollection {
    pub fn new(mut hits: Vec<GemRecHit>) -> Self {
        // stable, so per-id order is preserved
        hits.sort_by_key(|hit| hit.det_id);
        Self { hits }
    }

    /// All hits recorded at exactly `det_id`; empty if there are none.
    pub fn get(&self, det_id: GemDetId) -> &[GemRecHit] {
        let begin = self.hits.partition_point(|hit| hit.det_id < det_id);
        let end = self.hits.partition_point(|hit| hit.det_id <= det_id);
        self.hits.get(begin..end).unwrap_or_default()
    }

    pub fn det_ids(&self) -> impl Iterator<Item = GemDetId> + '_ {
        self.hits.iter().map(|hit| hit.det_id).dedup()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

impl From<Vec<GemRecHit>> for GemRecHitCollection {
    fn from(hits: Vec<GemRecHit>) -> Self {
        Self::new(hits)
    }
}

impl From<GemRecHitCollection> for Vec<GemRecHit> {
    fn from(collection: GemRecHitCollection) -> Self {
        collection.hits
    }
}

impl FromIterator<GemRecHit> for GemRecHitCollection {
    fn from_iter<T: IntoIterator<Item = GemRecHit>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Kind of readout element a matched hit refers to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, strum::Display, Serialize)]
pub enum DigiType {
    #[default]
    #[strum(to_string = "invalid")]
    Invalid,
    #[strum(to_string = "GEM strip")]
    GemStrip,
}

/// A rec hit accepted by the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MatchedRecHit {
    pub det_id: GemDetId,
    pub strip: Strip,
    pub bunch_x: BunchCrossing,
    pub kind: DigiType,
}

impl MatchedRecHit {
    pub fn new(det_id: GemDetId, strip: Strip, bunch_x: BunchCrossing, kind: DigiType) -> Self {
        Self {
            det_id,
            strip,
            bunch_x,
            kind,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn id(layer: i32, roll: i32) -> GemDetId {
        GemDetId::new(1, 1, 1, layer, 4, roll).unwrap()
    }

    #[test]
    fn get_returns_hits_for_one_id_in_supplied_order() {
        let collection = GemRecHitCollection::new(vec![
            GemRecHit::new(id(2, 1), 7, 0),
            GemRecHit::new(id(1, 1), 5, 0),
            GemRecHit::new(id(2, 1), 3, 1),
            GemRecHit::new(id(1, 2), 9, 0),
            GemRecHit::new(id(2, 1), 4, -1),
        ]);
        let strips: Vec<_> = collection
            .get(id(2, 1))
            .iter()
            .map(|hit| hit.first_cluster_strip)
            .collect();
        assert_eq!(strips, [7, 3, 4]);
        assert_eq!(collection.get(id(1, 2)).len(), 1);
        assert_eq!(collection.len(), 5);
    }

    #[test]
    fn get_unknown_id_is_empty() {
        let collection: GemRecHitCollection =
            [GemRecHit::new(id(1, 1), 5, 0)].into_iter().collect();
        assert!(collection.get(id(2, 3)).is_empty());
        assert!(GemRecHitCollection::default().get(id(1, 1)).is_empty());
    }

    #[test]
    fn det_ids_are_distinct_and_sorted() {
        let collection = GemRecHitCollection::new(vec![
            GemRecHit::new(id(2, 1), 7, 0),
            GemRecHit::new(id(1, 1), 5, 0),
            GemRecHit::new(id(2, 1), 3, 1),
        ]);
        let ids: Vec<_> = collection.det_ids().collect();
        assert_eq!(ids, [id(1, 1), id(2, 1)]);
    }

    #[test]
    fn collection_from_json() {
        let json = format!(
            r#"[ {{ "det-id": {}, "bunch-x": 0, "first-cluster-strip": 12 }},
                 {{ "det-id": {}, "bunch-x": -1, "first-cluster-strip": 40, "cluster-size": 3 }} ]"#,
            id(1, 1).raw(),
            id(1, 1).raw()
        );
        let collection: GemRecHitCollection = serde_json::from_str(&json).unwrap();
        let hits = collection.get(id(1, 1));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].cluster_size, 1);
        assert_eq!(hits[1].cluster_size, 3);
        assert_eq!(hits[1].bunch_x, -1);
    }

    #[test]
    fn digi_type_names() {
        assert_eq!(DigiType::GemStrip.to_string(), "GEM strip");
        assert_eq!(DigiType::default(), DigiType::Invalid);
    }
}
