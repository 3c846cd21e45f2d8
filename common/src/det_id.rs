//! Packing and unpacking of GEM detector identifiers.
//!
//! A [GemDetId] addresses one eta partition ("roll") of one layer of one chamber.
//! The same packing is used for chamber ids (roll set to zero) and super-chamber
//! ids (layer and roll set to zero), so all three kinds of id can be used as keys
//! in the same maps.
use crate::RawDetId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

const DETECTOR_START_BIT: u32 = 28;
const DETECTOR_MASK: u32 = 0xF;
const SUBDETECTOR_START_BIT: u32 = 25;
const SUBDETECTOR_MASK: u32 = 0x7;
const MUON_DETECTOR: u32 = 2;
const GEM_SUBDETECTOR: u32 = 4;

/// Position, width and offset of one packed field.
struct Field {
    name: &'static str,
    start_bit: u32,
    mask: u32,
    min: i32,
    max: i32,
    /// Subtracted from the value before packing.
    offset: i32,
}

impl Field {
    fn encode(&self, value: i32) -> Result<u32, DetIdError> {
        if !(self.min..=self.max).contains(&value) {
            return Err(DetIdError::OutOfRange {
                field: self.name,
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok((((value - self.offset) as u32) & self.mask) << self.start_bit)
    }

    fn decode(&self, raw: RawDetId) -> i32 {
        ((raw >> self.start_bit) & self.mask) as i32 + self.offset
    }

    fn clear(&self, raw: RawDetId) -> RawDetId {
        raw & !(self.mask << self.start_bit)
    }
}

const REGION: Field = Field {
    name: "region",
    start_bit: 0,
    mask: 0x3,
    min: -1,
    max: 1,
    offset: -1,
};
const RING: Field = Field {
    name: "ring",
    start_bit: 2,
    mask: 0x7,
    min: 1,
    max: 3,
    offset: 1,
};
const STATION: Field = Field {
    name: "station",
    start_bit: 5,
    mask: 0x7,
    min: 1,
    max: 3,
    offset: 1,
};
const CHAMBER: Field = Field {
    name: "chamber",
    start_bit: 8,
    mask: 0x3F,
    min: 1,
    max: 36,
    offset: 1,
};
const LAYER: Field = Field {
    name: "layer",
    start_bit: 14,
    mask: 0x1F,
    min: 0,
    max: 2,
    offset: 0,
};
const ROLL: Field = Field {
    name: "roll",
    start_bit: 19,
    mask: 0x1F,
    min: 0,
    max: 12,
    offset: 0,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DetIdError {
    #[error("GEM {field} {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },
    #[error("Raw id {0:#010x} is not a GEM detector id")]
    NotGem(RawDetId),
}

/// Serialized as the packed raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "RawDetId", into = "RawDetId")]
pub struct GemDetId(RawDetId);

impl GemDetId {
    pub fn new(
        region: i32,
        ring: i32,
        station: i32,
        layer: i32,
        chamber: i32,
        roll: i32,
    ) -> Result<Self, DetIdError> {
        let raw = (MUON_DETECTOR << DETECTOR_START_BIT)
            | (GEM_SUBDETECTOR << SUBDETECTOR_START_BIT)
            | REGION.encode(region)?
            | RING.encode(ring)?
            | STATION.encode(station)?
            | CHAMBER.encode(chamber)?
            | LAYER.encode(layer)?
            | ROLL.encode(roll)?;
        Ok(Self(raw))
    }

    pub fn from_raw(raw: RawDetId) -> Result<Self, DetIdError> {
        let detector = (raw >> DETECTOR_START_BIT) & DETECTOR_MASK;
        let subdetector = (raw >> SUBDETECTOR_START_BIT) & SUBDETECTOR_MASK;
        if detector != MUON_DETECTOR || subdetector != GEM_SUBDETECTOR {
            return Err(DetIdError::NotGem(raw));
        }
        Ok(Self(raw))
    }

    pub fn raw(&self) -> RawDetId {
        self.0
    }

    pub fn region(&self) -> i32 {
        REGION.decode(self.0)
    }

    pub fn ring(&self) -> i32 {
        RING.decode(self.0)
    }

    pub fn station(&self) -> i32 {
        STATION.decode(self.0)
    }

    pub fn chamber(&self) -> i32 {
        CHAMBER.decode(self.0)
    }

    pub fn layer(&self) -> i32 {
        LAYER.decode(self.0)
    }

    pub fn roll(&self) -> i32 {
        ROLL.decode(self.0)
    }

    /// The id of the chamber (all eta partitions of one layer) containing this id.
    pub fn chamber_id(&self) -> Self {
        Self(ROLL.clear(self.0))
    }

    /// The id of the super-chamber (both layers of a chamber) containing this id.
    /// Every layer and roll of the same chamber maps to the same value.
    pub fn super_chamber_id(&self) -> Self {
        Self(LAYER.clear(ROLL.clear(self.0)))
    }
}

impl From<GemDetId> for RawDetId {
    fn from(id: GemDetId) -> Self {
        id.0
    }
}

impl TryFrom<RawDetId> for GemDetId {
    type Error = DetIdError;

    fn try_from(raw: RawDetId) -> Result<Self, Self::Error> {
        Self::from_raw(raw)
    }
}

impl Display for GemDetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GEM({}, {}, {}, {}, {}, {})",
            self.region(),
            self.ring(),
            self.station(),
            self.layer(),
            self.chamber(),
            self.roll()
        )
    }
}
