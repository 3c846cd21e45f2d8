//! The truth side of the matching: which GEM partitions a simulated track crossed,
//! and which strips its simulated hits are consistent with.
use crate::{
    error::MatcherResult,
    event::{Event, EventSetup},
    geometry::GemGeometry,
    parameters::ParameterSet,
    point::{GlobalPoint, LocalPoint},
};
use gem_validation_common::{GemDetId, Strip};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SimTrack {
    pub track_id: u32,
    pub pdg_id: i32,
    #[serde(default)]
    pub momentum: [f64; 3],
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SimVertex {
    pub position: GlobalPoint,
}

/// Matches simulated hits to one simulated track and exposes the context it was
/// built with, so that downstream matchers can share it.
pub trait SimHitMatcher {
    fn track(&self) -> &SimTrack;

    fn vertex(&self) -> &SimVertex;

    fn parameters(&self) -> &ParameterSet;

    fn event(&self) -> &dyn Event;

    fn event_setup(&self) -> &dyn EventSetup;

    /// Eta partitions crossed by the track.
    fn det_ids_gem(&self) -> BTreeSet<GemDetId>;

    /// Strips in `det_id` consistent with the track's simulated hits, widened by
    /// `margin` strips on either side.
    fn hit_strips_in_det_id(&self, det_id: GemDetId, margin: Strip) -> BTreeSet<Strip>;
}

/// A [SimHitMatcher] backed by a table of simulated hit entry points.
pub struct SimHitTable<'a> {
    track: SimTrack,
    vertex: SimVertex,
    parameters: ParameterSet,
    event: &'a dyn Event,
    event_setup: &'a dyn EventSetup,
    geometry: &'a dyn GemGeometry,
    hits: BTreeMap<GemDetId, Vec<LocalPoint>>,
}

impl<'a> SimHitTable<'a> {
    pub fn new(
        track: SimTrack,
        vertex: SimVertex,
        parameters: ParameterSet,
        event: &'a dyn Event,
        event_setup: &'a dyn EventSetup,
    ) -> MatcherResult<Self> {
        let geometry = event_setup.gem_geometry()?;
        Ok(Self {
            track,
            vertex,
            parameters,
            event,
            event_setup,
            geometry,
            hits: Default::default(),
        })
    }

    /// Records a simulated hit of the track entering `det_id` at `entry_point`.
    pub fn add_sim_hit(&mut self, det_id: GemDetId, entry_point: LocalPoint) {
        self.hits.entry(det_id).or_default().push(entry_point);
    }

    pub fn sim_hits_in_det_id(&self, det_id: GemDetId) -> &[LocalPoint] {
        self.hits.get(&det_id).map(Vec::as_slice).unwrap_or_default()
    }
}

impl SimHitMatcher for SimHitTable<'_> {
    fn track(&self) -> &SimTrack {
        &self.track
    }

    fn vertex(&self) -> &SimVertex {
        &self.vertex
    }

    fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    fn event(&self) -> &dyn Event {
        self.event
    }

    fn event_setup(&self) -> &dyn EventSetup {
        self.event_setup
    }

    fn det_ids_gem(&self) -> BTreeSet<GemDetId> {
        self.hits.keys().copied().collect()
    }

    fn hit_strips_in_det_id(&self, det_id: GemDetId, margin: Strip) -> BTreeSet<Strip> {
        let Some(max_strips) = self.geometry.number_of_strips(det_id) else {
            warn!(%det_id, "Simulated hits in a partition missing from the geometry");
            return BTreeSet::new();
        };
        self.sim_hits_in_det_id(det_id)
            .iter()
            .filter_map(|entry_point| self.geometry.channel(det_id, entry_point))
            .flat_map(|channel| {
                let central_strip = channel + 1;
                let min_strip = central_strip.saturating_sub(margin).max(1);
                let max_strip = central_strip.saturating_add(margin).min(max_strips);
                min_strip..=max_strip
            })
            .collect()
    }
}
