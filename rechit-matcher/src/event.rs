//! Access to per-event data products and per-event conditions.
//!
//! [Event] and [EventSetup] are the seams through which the matcher obtains its
//! inputs. [InMemoryEvent] and [InMemoryEventSetup] back them with owned data,
//! for the validation binary and for tests.
use crate::{
    error::{MatcherError, MatcherResult},
    geometry::{GemGeometry, PlanarGemGeometry},
    parameters::InputTag,
    rechit::GemRecHitCollection,
};
use std::collections::HashMap;

pub trait Event {
    /// The rec hit collection selected by `input`.
    fn gem_rechits(&self, input: &InputTag) -> MatcherResult<&GemRecHitCollection>;
}

pub trait EventSetup {
    /// The GEM geometry valid for the current event's conditions.
    fn gem_geometry(&self) -> MatcherResult<&dyn GemGeometry>;
}

#[derive(Debug, Default)]
pub struct InMemoryEvent {
    collections: HashMap<InputTag, GemRecHitCollection>,
}

impl InMemoryEvent {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_collection(mut self, input: InputTag, collection: GemRecHitCollection) -> Self {
        self.insert(input, collection);
        self
    }

    pub fn insert(&mut self, input: InputTag, collection: GemRecHitCollection) {
        self.collections.insert(input, collection);
    }
}

impl Event for InMemoryEvent {
    fn gem_rechits(&self, input: &InputTag) -> MatcherResult<&GemRecHitCollection> {
        self.collections
            .get(input)
            .ok_or_else(|| MatcherError::MissingCollection(input.clone()))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryEventSetup {
    geometry: Option<PlanarGemGeometry>,
}

impl InMemoryEventSetup {
    pub fn new(geometry: PlanarGemGeometry) -> Self {
        Self {
            geometry: Some(geometry),
        }
    }

    /// An event setup without GEM geometry.
    pub fn empty() -> Self {
        Default::default()
    }
}

impl EventSetup for InMemoryEventSetup {
    fn gem_geometry(&self) -> MatcherResult<&dyn GemGeometry> {
        self.geometry
            .as_ref()
            .map(|geometry| geometry as &dyn GemGeometry)
            .ok_or(MatcherError::MissingGeometry)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_collection_is_an_error() {
        let event = InMemoryEvent::new()
            .with_collection(InputTag::new("gemRecHits"), GemRecHitCollection::default());
        assert!(event.gem_rechits(&InputTag::new("gemRecHits")).is_ok());
        assert!(matches!(
            event.gem_rechits(&InputTag::new("otherRecHits")),
            Err(MatcherError::MissingCollection(tag)) if tag.label == "otherRecHits"
        ));
    }

    #[test]
    fn missing_geometry_is_an_error() {
        assert!(matches!(
            InMemoryEventSetup::empty().gem_geometry(),
            Err(MatcherError::MissingGeometry)
        ));
        assert!(
            InMemoryEventSetup::new(PlanarGemGeometry::default())
                .gem_geometry()
                .is_ok()
        );
    }
}
