//! Matches GEM rec hits to the simulated hits of one simulated track.
//!
//! A [GemRecHitMatcher] is built once per track from a [SimHitMatcher] and is
//! read-only afterwards. Matched hits are indexed three ways: by eta partition,
//! by chamber and by super-chamber.
use crate::{
    error::MatcherResult,
    geometry::GemGeometry,
    parameters::RecHitMatcherParameters,
    point::GlobalPoint,
    rechit::{DigiType, GemRecHitCollection, MatchedRecHit},
    sim_hit_matcher::SimHitMatcher,
};
use gem_validation_common::{GemDetId, Roll, Strip};
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

pub type RecHitContainer = Vec<MatchedRecHit>;

pub struct GemRecHitMatcher<'a, M: SimHitMatcher> {
    sim_hit_matcher: &'a M,
    parameters: RecHitMatcherParameters,
    /// Set by a successful initialisation.
    geometry: Option<&'a dyn GemGeometry>,
    det_id_to_rechits: BTreeMap<GemDetId, RecHitContainer>,
    chamber_to_rechits: BTreeMap<GemDetId, RecHitContainer>,
    super_chamber_to_rechits: BTreeMap<GemDetId, RecHitContainer>,
}

impl<'a, M: SimHitMatcher> GemRecHitMatcher<'a, M> {
    /// Reads the matcher parameters from the sim hit matcher's parameter set and,
    /// unless the input is disabled, matches the event's rec hits.
    ///
    /// # Errors
    /// A malformed parameter, or (when enabled) a missing rec hit collection or
    /// geometry. Either is fatal for the event.
    pub fn new(sim_hit_matcher: &'a M) -> MatcherResult<Self> {
        let parameters = RecHitMatcherParameters::from_parameter_set(sim_hit_matcher.parameters())?;
        Self::with_parameters(sim_hit_matcher, parameters)
    }

    pub fn with_parameters(
        sim_hit_matcher: &'a M,
        parameters: RecHitMatcherParameters,
    ) -> MatcherResult<Self> {
        let mut matcher = Self {
            sim_hit_matcher,
            parameters,
            geometry: None,
            det_id_to_rechits: Default::default(),
            chamber_to_rechits: Default::default(),
            super_chamber_to_rechits: Default::default(),
        };
        if matcher.parameters.is_enabled() {
            matcher.initialize()?;
        } else {
            debug!("GEM rec hit input is empty, matcher disabled");
        }
        Ok(matcher)
    }

    fn initialize(&mut self) -> MatcherResult<()> {
        let sim_hit_matcher = self.sim_hit_matcher;
        let rechits = sim_hit_matcher
            .event()
            .gem_rechits(&self.parameters.input)?;
        let geometry = sim_hit_matcher.event_setup().gem_geometry()?;
        self.geometry = Some(geometry);
        self.match_rechits_to_sim_track(rechits);
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(
        track_id = self.sim_hit_matcher.track().track_id,
        num_rechits = rechits.len(),
        num_matched
    ))]
    fn match_rechits_to_sim_track(&mut self, rechits: &GemRecHitCollection) {
        let verbose = self.parameters.is_verbose();
        let bx_window = self.parameters.bx_window();
        let mut num_matched = 0;
        if verbose {
            info!(det_ids = %rechits.det_ids().format(", "), "Partitions with rec hits");
        }

        for det_id in self.sim_hit_matcher.det_ids_gem() {
            let chamber_id = det_id.chamber_id();
            let super_chamber_id = det_id.super_chamber_id();

            let hit_strips = self
                .sim_hit_matcher
                .hit_strips_in_det_id(det_id, self.parameters.match_delta_strip);
            if verbose {
                info!(%det_id, ?hit_strips, "Truth-consistent strips");
            }

            for rechit in rechits.get(det_id) {
                if verbose {
                    info!(%det_id, bx = rechit.bunch_x, strip = rechit.first_cluster_strip, "Rec hit");
                }
                if !bx_window.contains(&rechit.bunch_x) {
                    continue;
                }
                if !hit_strips.contains(&rechit.first_cluster_strip) {
                    continue;
                }
                let matched = MatchedRecHit::new(
                    det_id,
                    rechit.first_cluster_strip,
                    rechit.bunch_x,
                    DigiType::GemStrip,
                );
                if verbose {
                    info!(%det_id, strip = matched.strip, kind = %matched.kind, "Matched");
                }
                self.det_id_to_rechits
                    .entry(det_id)
                    .or_default()
                    .push(matched);
                self.chamber_to_rechits
                    .entry(chamber_id)
                    .or_default()
                    .push(matched);
                self.super_chamber_to_rechits
                    .entry(super_chamber_id)
                    .or_default()
                    .push(matched);
                num_matched += 1;
            }
        }
        tracing::Span::current().record("num_matched", num_matched);
    }

    pub fn sim_hit_matcher(&self) -> &'a M {
        self.sim_hit_matcher
    }

    pub fn parameters(&self) -> &RecHitMatcherParameters {
        &self.parameters
    }

    /// True once rec hits have been read and matched.
    pub fn is_initialized(&self) -> bool {
        self.geometry.is_some()
    }

    /// Eta partitions with at least one matched rec hit.
    pub fn det_ids(&self) -> BTreeSet<GemDetId> {
        self.det_id_to_rechits.keys().copied().collect()
    }

    /// Chambers with at least one matched rec hit.
    pub fn chamber_ids(&self) -> BTreeSet<GemDetId> {
        self.chamber_to_rechits.keys().copied().collect()
    }

    /// Super-chambers with at least one matched rec hit.
    pub fn super_chamber_ids(&self) -> BTreeSet<GemDetId> {
        self.super_chamber_to_rechits.keys().copied().collect()
    }

    pub fn rechits_in_det_id(&self, det_id: GemDetId) -> &[MatchedRecHit] {
        Self::rechits_in(&self.det_id_to_rechits, det_id)
    }

    pub fn rechits_in_chamber(&self, chamber_id: GemDetId) -> &[MatchedRecHit] {
        Self::rechits_in(&self.chamber_to_rechits, chamber_id)
    }

    pub fn rechits_in_super_chamber(&self, super_chamber_id: GemDetId) -> &[MatchedRecHit] {
        Self::rechits_in(&self.super_chamber_to_rechits, super_chamber_id)
    }

    fn rechits_in(map: &BTreeMap<GemDetId, RecHitContainer>, id: GemDetId) -> &[MatchedRecHit] {
        map.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of matched rec hits in each chamber.
    pub fn chamber_hit_counts(&self) -> BTreeMap<GemDetId, usize> {
        self.chamber_to_rechits
            .iter()
            .map(|(id, rechits)| (*id, rechits.len()))
            .collect()
    }

    /// Always zero: counting layers from the matched hits is disabled.
    pub fn n_layers_with_rechits_in_super_chamber(&self, _super_chamber_id: GemDetId) -> usize {
        0
    }

    /// Always empty: collecting strips from the matched hits is disabled.
    pub fn strip_numbers_in_det_id(&self, _det_id: GemDetId) -> BTreeSet<Strip> {
        BTreeSet::new()
    }

    /// Eta partition numbers of all partitions with matched rec hits.
    pub fn partition_numbers(&self) -> BTreeSet<Roll> {
        self.det_id_to_rechits.keys().map(GemDetId::roll).collect()
    }

    /// Global position of the centre of the rec hit's strip.
    /// Hits that cannot be placed resolve to the origin.
    pub fn rechit_position(&self, rechit: &MatchedRecHit) -> GlobalPoint {
        match rechit.kind {
            DigiType::GemStrip => self
                .geometry
                .and_then(|geometry| {
                    let local = geometry.centre_of_strip(rechit.det_id, rechit.strip)?;
                    geometry.to_global(rechit.det_id, &local)
                })
                .unwrap_or_else(|| {
                    warn!(det_id = %rechit.det_id, strip = rechit.strip, "Cannot place rec hit");
                    GlobalPoint::origin()
                }),
            DigiType::Invalid => GlobalPoint::origin(),
        }
    }

    /// Mean global position of the rec hits that resolve to a position other
    /// than the origin. The origin is returned if there are none.
    pub fn rechit_mean_position(&self, rechits: &[MatchedRecHit]) -> GlobalPoint {
        let (sum, count) = rechits
            .iter()
            .map(|rechit| self.rechit_position(rechit))
            .filter(|position| !position.is_origin())
            .fold((GlobalPoint::origin(), 0usize), |(sum, count), position| {
                (sum + position, count + 1)
            });
        if count == 0 {
            return GlobalPoint::origin();
        }
        sum * (1.0 / count as f64)
    }
}
