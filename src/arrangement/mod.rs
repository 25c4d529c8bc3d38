// Arrangement module
// Interval model for clips on a track timeline, generic over the time unit

pub mod clip;
pub mod store;
pub mod unit;

pub use clip::{Clip, ClipId};
pub use store::{ClipStore, EditError};
pub use unit::{ClipUnit, Pulses, Seconds};
