pub mod gate;
pub mod tier;

pub use gate::{GateCountdown, GateError};
pub use tier::{AccessController, AccessTier, UnlockOffer, visible_subset};
