//! Operation slots - supersession for one class of cancellable operation
//!
//! Each slot holds a generation counter and the cancellation token of the
//! live operation. Beginning a new operation cancels the previous token and
//! bumps the generation, so a completion can tell whether it still owns the
//! slot before touching shared state.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::domain::errors::ProviderError;

#[derive(Debug, Default)]
pub(crate) struct OperationSlot {
    generation: u64,
    token: Option<CancellationToken>,
}

/// Proof of which generation an operation was started under
#[derive(Debug, Clone)]
pub(crate) struct OperationTicket {
    generation: u64,
    token: CancellationToken,
}

impl OperationSlot {
    /// Supersede the live operation (if any) and start a new one
    pub(crate) fn begin(&mut self) -> OperationTicket {
        self.invalidate();
        let token = CancellationToken::new();
        self.token = Some(token.clone());
        OperationTicket {
            generation: self.generation,
            token,
        }
    }

    /// Supersede the live operation without starting another
    pub(crate) fn invalidate(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    pub(crate) fn is_live(&self, ticket: &OperationTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Release the slot after the live operation completed
    pub(crate) fn finish(&mut self, ticket: &OperationTicket) {
        if self.is_live(ticket) {
            self.token = None;
        }
    }

    pub(crate) fn in_flight(&self) -> bool {
        self.token.is_some()
    }
}

impl OperationTicket {
    /// Drive `operation` until it completes or the ticket is superseded
    pub(crate) async fn run<T, F>(&self, operation: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(ProviderError::Cancelled),
            outcome = operation => outcome,
        }
    }
}
