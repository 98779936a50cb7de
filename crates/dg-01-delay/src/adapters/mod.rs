//! Adapters layer for the delay component.
//!
//! In-memory stand-ins for the protected wallet and the clock.

pub mod avatar;
pub mod clock;

pub use avatar::InMemoryAvatar;
pub use clock::ManualTimeSource;
