use crate::parameters::InputTag;
use gem_validation_common::{GemDetId, Strip};
use thiserror::Error;

pub type MatcherResult<T> = Result<T, MatcherError>;

#[derive(Debug, Error)]
pub enum MatcherError {
    #[error("Parameter Error: {0}")]
    Parameter(#[from] ParameterError),
    #[error("Rec hit collection '{0}' not found in event")]
    MissingCollection(InputTag),
    #[error("GEM geometry not available in event setup")]
    MissingGeometry,
}

#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("Parameter '{key}' has the wrong type: {source}")]
    WrongType {
        key: String,
        source: serde_json::Error,
    },
    #[error("Invalid input tag '{0}', expected 'label[:instance[:process]]'")]
    InputTag(String),
}

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Eta partition {0} defined more than once")]
    DuplicatePartition(GemDetId),
    #[error("{0} is not an eta partition (roll must be non-zero)")]
    NotAnEtaPartition(GemDetId),
    #[error("Eta partition {id} has invalid topology: {nstrips} strips with pitch {pitch}")]
    InvalidTopology {
        id: GemDetId,
        nstrips: Strip,
        pitch: f64,
    },
}
