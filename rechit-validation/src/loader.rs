use anyhow::{Context, Result};
use gem_rechit_matcher::{
    GemRecHitCollection, InMemoryEvent, InputTag, LocalPoint, ParameterSet, PlanarGemGeometry,
    SimTrack, SimVertex,
};
use gem_validation_common::GemDetId;
use serde::{Deserialize, de::DeserializeOwned};
use std::{collections::HashMap, fs::File, io::BufReader, path::Path};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct SimHitRecord {
    pub(crate) det_id: GemDetId,
    pub(crate) entry_point: LocalPoint,
}

/// One simulated track and the simulated GEM hits it left.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct TrackRecord {
    pub(crate) track: SimTrack,
    #[serde(default)]
    pub(crate) vertex: SimVertex,
    #[serde(default)]
    pub(crate) sim_hits: Vec<SimHitRecord>,
}

/// A simulated event: rec hit collections keyed by input tag, and the tracks to validate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct EventFile {
    #[serde(default)]
    pub(crate) rechits: HashMap<InputTag, GemRecHitCollection>,
    #[serde(default)]
    pub(crate) tracks: Vec<TrackRecord>,
}

impl EventFile {
    /// Moves the rec hit collections into an event, leaving the tracks.
    pub(crate) fn into_parts(self) -> (InMemoryEvent, Vec<TrackRecord>) {
        let event = self
            .rechits
            .into_iter()
            .fold(InMemoryEvent::new(), |event, (input, collection)| {
                event.with_collection(input, collection)
            });
        (event, self.tracks)
    }
}

fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let file = File::open(path)
        .with_context(|| format!("Cannot open {what} file {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Cannot parse {what} file {}", path.display()))
}

pub(crate) fn load_event_file(path: &Path) -> Result<EventFile> {
    load_json(path, "event")
}

pub(crate) fn load_geometry(path: &Path) -> Result<PlanarGemGeometry> {
    load_json(path, "geometry")
}

pub(crate) fn load_parameters(path: &Path) -> Result<ParameterSet> {
    load_json(path, "parameter")
}

#[cfg(test)]
mod test {
    use super::*;
    use gem_rechit_matcher::{Event, GemGeometry};

    const EVENT: &str = include_str!("../data/event.json");
    const GEOMETRY: &str = include_str!("../data/geometry.json");
    const PARAMETERS: &str = include_str!("../data/parameters.json");

    #[test]
    fn sample_event_parses() {
        let event_file: EventFile = serde_json::from_str(EVENT).unwrap();
        assert_eq!(event_file.tracks.len(), 2);
        assert_eq!(event_file.tracks[0].sim_hits.len(), 2);

        let (event, tracks) = event_file.into_parts();
        assert_eq!(tracks[1].track.track_id, 2);
        let collection = event.gem_rechits(&InputTag::new("gemRecHits")).unwrap();
        assert_eq!(collection.len(), 5);
    }

    #[test]
    fn sample_geometry_parses() {
        let geometry: PlanarGemGeometry = serde_json::from_str(GEOMETRY).unwrap();
        assert_eq!(geometry.len(), 4);
        let id = GemDetId::new(1, 1, 1, 1, 10, 2).unwrap();
        assert_eq!(geometry.number_of_strips(id), Some(384));
    }

    #[test]
    fn sample_parameters_parse() {
        let parameters: ParameterSet = serde_json::from_str(PARAMETERS).unwrap();
        assert!(parameters.contains("gemRecHitInput"));
    }

    #[test]
    fn invalid_det_id_rejected() {
        let json = r#"{ "rechits": { "gemRecHits": [
            { "det-id": 1, "bunch-x": 0, "first-cluster-strip": 1 } ] } }"#;
        assert!(serde_json::from_str::<EventFile>(json).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let error = load_event_file(Path::new("does/not/exist.json")).unwrap_err();
        assert!(error.to_string().contains("does/not/exist.json"));
    }
}
