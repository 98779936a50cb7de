//! Proposal submitter that keeps every batch in memory.

use parking_lot::Mutex;
use shared_types::entities::Hash;
use tracing::info;

use crate::domain::{OrchestratorError, Proposal};
use crate::ports::ProposalSubmitter;

/// Records proposals instead of sending them anywhere.
#[derive(Debug, Default)]
pub struct RecordingProposalSubmitter {
    proposals: Mutex<Vec<Proposal>>,
}

impl RecordingProposalSubmitter {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every proposal submitted so far, oldest first.
    #[must_use]
    pub fn proposals(&self) -> Vec<Proposal> {
        self.proposals.lock().clone()
    }
}

impl ProposalSubmitter for RecordingProposalSubmitter {
    fn submit(&self, proposal: Proposal) -> Result<Hash, OrchestratorError> {
        let hash = proposal.hash;
        info!(
            safe = %proposal.safe,
            sender = %proposal.sender,
            calls = proposal.transactions.len(),
            %hash,
            "Proposal recorded"
        );
        self.proposals.lock().push(proposal);
        Ok(hash)
    }
}
