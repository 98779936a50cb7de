//! # DG-03 Recovery Orchestrator - Wallet Proposal Builder
//!
//! **Component ID:** 3
//! **Status:** Boundary
//!
//! ## Purpose
//!
//! Produces the wallet calls that install and drive the recovery flow. It
//! never signs or broadcasts anything: its job ends at a list of
//! `{to, value, data}` triples handed to the proposal boundary.
//!
//! | Batch | Calls |
//! |-------|-------|
//! | setup | `deployModule` (delay), `deployModule` (swap), `enableModule` on the wallet, `enableModule` on the delay |
//! | recovery | `startRecovery` on the swap module |
//! | follow-up | `executeNextTx` on the delay, once the cooldown has elapsed |
//!
//! ## Outbound Dependencies
//!
//! | Port | Purpose |
//! |------|---------|
//! | `ModuleDeployer` | Predicts the identity of a factory deployment |
//! | `ProposalSubmitter` | Collects signatures for a batch |

// Crate-level lints
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{DeterministicDeployer, RecordingProposalSubmitter};
pub use domain::*;
pub use ports::{ModuleDeployer, ProposalSubmitter};
pub use service::{deploy_module_tx, propose, DeployModuleTx, RecoveryPlanner};

/// Component identifier.
pub const COMPONENT_ID: u8 = 3;
