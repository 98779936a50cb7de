//! Adapters layer for the recovery orchestrator.

pub mod deployer;
pub mod recording;

pub use deployer::DeterministicDeployer;
pub use recording::RecordingProposalSubmitter;
