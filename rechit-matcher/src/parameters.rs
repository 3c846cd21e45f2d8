//! Untracked parameter lookup and the parameters read by the rec hit matcher.
use crate::error::ParameterError;
use gem_validation_common::{BunchCrossing, Strip};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::{
    fmt::{Display, Formatter},
    ops::RangeInclusive,
    str::FromStr,
};

/// A set of named configuration values.
/// Lookups are "untracked": a missing key silently falls back to the caller's default.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ParameterSet(Map<String, Value>);

impl ParameterSet {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_owned(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the value at `key`, or `default` if the key is absent.
    /// A present value that does not deserialize into `T` is an error, not a fallback.
    pub fn untracked<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, ParameterError> {
        match self.0.get(key) {
            Some(value) => {
                T::deserialize(value).map_err(|source| ParameterError::WrongType {
                    key: key.to_owned(),
                    source,
                })
            }
            None => Ok(default),
        }
    }
}

/// Selects one product in the event by module label, instance and process name.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct InputTag {
    pub label: String,
    pub instance: String,
    pub process: String,
}

impl InputTag {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_empty()
    }
}

impl FromStr for InputTag {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let tag = InputTag {
            label: parts.next().unwrap_or_default().trim().to_owned(),
            instance: parts.next().unwrap_or_default().trim().to_owned(),
            process: parts.next().unwrap_or_default().trim().to_owned(),
        };
        if parts.next().is_some() {
            return Err(ParameterError::InputTag(s.to_owned()));
        }
        Ok(tag)
    }
}

impl TryFrom<String> for InputTag {
    type Error = ParameterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InputTag> for String {
    fn from(tag: InputTag) -> Self {
        tag.to_string()
    }
}

impl Display for InputTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)?;
        if !self.instance.is_empty() || !self.process.is_empty() {
            write!(f, ":{}", self.instance)?;
        }
        if !self.process.is_empty() {
            write!(f, ":{}", self.process)?;
        }
        Ok(())
    }
}

pub const REC_HIT_INPUT_KEY: &str = "gemRecHitInput";
pub const MIN_BX_KEY: &str = "minBXGEM";
pub const MAX_BX_KEY: &str = "maxBXGEM";
pub const MATCH_DELTA_STRIP_KEY: &str = "matchDeltaStripGEM";
pub const VERBOSE_KEY: &str = "verboseGEMRecHit";

pub const DEFAULT_REC_HIT_INPUT: &str = "gemRecHits";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecHitMatcherParameters {
    /// Collection to read. An empty label disables the matcher.
    pub input: InputTag,
    pub min_bx: BunchCrossing,
    pub max_bx: BunchCrossing,
    /// Tolerance, in strips, used when asking for truth-consistent strips.
    pub match_delta_strip: Strip,
    pub verbose: i32,
}

impl Default for RecHitMatcherParameters {
    fn default() -> Self {
        Self {
            input: InputTag::new(DEFAULT_REC_HIT_INPUT),
            min_bx: -1,
            max_bx: 1,
            match_delta_strip: 1,
            verbose: 0,
        }
    }
}

impl RecHitMatcherParameters {
    pub fn from_parameter_set(parameters: &ParameterSet) -> Result<Self, ParameterError> {
        let defaults = Self::default();
        Ok(Self {
            input: parameters.untracked(REC_HIT_INPUT_KEY, defaults.input)?,
            min_bx: parameters.untracked(MIN_BX_KEY, defaults.min_bx)?,
            max_bx: parameters.untracked(MAX_BX_KEY, defaults.max_bx)?,
            match_delta_strip: parameters
                .untracked(MATCH_DELTA_STRIP_KEY, defaults.match_delta_strip)?,
            verbose: parameters.untracked(VERBOSE_KEY, defaults.verbose)?,
        })
    }

    pub fn is_enabled(&self) -> bool {
        !self.input.is_empty()
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose != 0
    }

    pub fn bx_window(&self) -> RangeInclusive<BunchCrossing> {
        self.min_bx..=self.max_bx
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_when_keys_absent() {
        let parameters = RecHitMatcherParameters::from_parameter_set(&ParameterSet::new()).unwrap();
        assert_eq!(parameters, RecHitMatcherParameters::default());
        assert_eq!(parameters.input.label, "gemRecHits");
        assert_eq!(parameters.bx_window(), -1..=1);
        assert_eq!(parameters.match_delta_strip, 1);
        assert!(parameters.is_enabled());
        assert!(!parameters.is_verbose());
    }

    #[test]
    fn values_read_from_keys() {
        let set = ParameterSet::new()
            .with(REC_HIT_INPUT_KEY, "myRecHits:local")
            .with(MIN_BX_KEY, -2)
            .with(MAX_BX_KEY, 3)
            .with(MATCH_DELTA_STRIP_KEY, 2)
            .with(VERBOSE_KEY, 1);
        let parameters = RecHitMatcherParameters::from_parameter_set(&set).unwrap();
        assert_eq!(parameters.input.label, "myRecHits");
        assert_eq!(parameters.input.instance, "local");
        assert_eq!(parameters.bx_window(), -2..=3);
        assert_eq!(parameters.match_delta_strip, 2);
        assert!(parameters.is_verbose());
    }

    #[test]
    fn empty_input_disables() {
        let set = ParameterSet::new().with(REC_HIT_INPUT_KEY, "");
        let parameters = RecHitMatcherParameters::from_parameter_set(&set).unwrap();
        assert!(!parameters.is_enabled());
    }

    #[test]
    fn wrong_type_is_an_error() {
        let set = ParameterSet::new().with(MIN_BX_KEY, "minus one");
        let result = RecHitMatcherParameters::from_parameter_set(&set);
        assert!(matches!(result, Err(ParameterError::WrongType { key, .. }) if key == MIN_BX_KEY));
    }

    #[test]
    fn input_tag_parsing() {
        let tag: InputTag = "gemRecHits::RECO".parse().unwrap();
        assert_eq!(tag.label, "gemRecHits");
        assert_eq!(tag.instance, "");
        assert_eq!(tag.process, "RECO");
        assert_eq!(tag.to_string(), "gemRecHits::RECO");
        assert_eq!(InputTag::new("gemRecHits").to_string(), "gemRecHits");
        assert!("a:b:c:d".parse::<InputTag>().is_err());
    }

    #[test]
    fn parameter_set_from_json() {
        let set: ParameterSet =
            serde_json::from_str(r#"{ "minBXGEM": 0, "maxBXGEM": 0, "gemRecHitInput": "gemRecHits" }"#)
                .unwrap();
        assert!(set.contains(MIN_BX_KEY));
        let parameters = RecHitMatcherParameters::from_parameter_set(&set).unwrap();
        assert_eq!(parameters.bx_window(), 0..=0);
    }
}
