use gem_rechit_matcher::{GemRecHitMatcher, GlobalPoint, MatchedRecHit, SimHitMatcher};
use gem_validation_common::{GemDetId, Roll};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct ChamberReport {
    id: GemDetId,
    name: String,
    num_rechits: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct SuperChamberReport {
    id: GemDetId,
    name: String,
    num_rechits: usize,
    /// `[0, 0, 0]` when no hit could be placed.
    mean_position: GlobalPoint,
}

/// Matching results for one simulated track.
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct MatchReport {
    pub(crate) track_id: u32,
    pub(crate) enabled: bool,
    pub(crate) det_ids: Vec<GemDetId>,
    pub(crate) partition_numbers: BTreeSet<Roll>,
    pub(crate) chambers: Vec<ChamberReport>,
    pub(crate) super_chambers: Vec<SuperChamberReport>,
    pub(crate) rechits: Vec<MatchedRecHit>,
}

impl MatchReport {
    pub(crate) fn new<M: SimHitMatcher>(matcher: &GemRecHitMatcher<M>) -> Self {
        let chambers = matcher
            .chamber_hit_counts()
            .into_iter()
            .map(|(id, num_rechits)| ChamberReport {
                id,
                name: id.to_string(),
                num_rechits,
            })
            .collect();

        let super_chambers = matcher
            .super_chamber_ids()
            .into_iter()
            .map(|id| {
                let rechits = matcher.rechits_in_super_chamber(id);
                SuperChamberReport {
                    id,
                    name: id.to_string(),
                    num_rechits: rechits.len(),
                    mean_position: matcher.rechit_mean_position(rechits),
                }
            })
            .collect();

        let det_ids: Vec<_> = matcher.det_ids().into_iter().collect();
        let rechits = det_ids
            .iter()
            .flat_map(|id| matcher.rechits_in_det_id(*id))
            .copied()
            .collect();

        Self {
            track_id: matcher.sim_hit_matcher().track().track_id,
            enabled: matcher.parameters().is_enabled(),
            det_ids,
            partition_numbers: matcher.partition_numbers(),
            chambers,
            super_chambers,
            rechits,
        }
    }

    pub(crate) fn num_rechits(&self) -> usize {
        self.rechits.len()
    }
}
