//! Matching of reconstructed GEM hits to simulated muon tracks, for offline validation.
//!
//! Given a [SimHitMatcher] for one simulated track, a [GemRecHitMatcher] selects the
//! rec hits of the event that are in time and on a strip consistent with the
//! track's simulated hits, and offers read-only views of them grouped by eta
//! partition, chamber and super-chamber.
pub mod error;
pub mod event;
pub mod geometry;
pub mod matcher;
pub mod parameters;
pub mod point;
pub mod rechit;
pub mod sim_hit_matcher;

pub use error::{GeometryError, MatcherError, MatcherResult, ParameterError};
pub use event::{Event, EventSetup, InMemoryEvent, InMemoryEventSetup};
pub use geometry::{GemGeometry, PlanarGemGeometry};
pub use matcher::{GemRecHitMatcher, RecHitContainer};
pub use parameters::{InputTag, ParameterSet, RecHitMatcherParameters};
pub use point::{GlobalPoint, LocalPoint};
pub use rechit::{DigiType, GemRecHit, GemRecHitCollection, MatchedRecHit};
pub use sim_hit_matcher::{SimHitMatcher, SimHitTable, SimTrack, SimVertex};
