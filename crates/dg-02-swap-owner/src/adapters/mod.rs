//! Adapters layer for the recovery module.

pub mod delay;

pub use delay::LocalDelayQueue;
