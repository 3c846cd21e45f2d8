pub mod det_id;
pub mod tracer;

pub use det_id::{DetIdError, GemDetId};

/// Packed 32-bit detector identifier as it appears in hit collections.
pub type RawDetId = u32;
/// Strip number within an eta partition, counted from 1.
pub type Strip = i32;
/// Bunch crossing relative to the triggered one.
pub type BunchCrossing = i32;
/// Eta partition ("roll") number within a chamber.
pub type Roll = i32;
