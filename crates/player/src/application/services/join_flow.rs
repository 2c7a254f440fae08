//! Join/create flow state machine
//!
//! ```text
//! Idle -> Validating -> Invalid
//!                    -> RequestingSession -> AwaitingLogin -> Denied
//!                                                         -> Connecting -> Connected
//!                    -> CreatingTown -> Validating (chained join)
//! any active state -> Failed
//! ```
//!
//! A terminal state may start a new attempt. Each attempt gets its own `FlowId` so log
//! lines of one attempt can be told apart from the next.

use covey_domain::{DomainError, FlowId};
use tokio::sync::watch;

use crate::application::error::{JoinError, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowState {
    #[default]
    Idle,
    Validating,
    CreatingTown,
    RequestingSession,
    AwaitingLogin,
    Connecting,
    Connected,
    Invalid,
    Failed,
    Denied,
}

impl FlowState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            FlowState::Connected | FlowState::Invalid | FlowState::Failed | FlowState::Denied
        )
    }

    /// A flow is running and owns the orchestrator.
    pub fn is_active(self) -> bool {
        self != FlowState::Idle && !self.is_terminal()
    }

    pub fn can_transition_to(self, next: FlowState) -> bool {
        use FlowState::*;
        match (self, next) {
            (Idle, Validating) => true,
            (from, Validating) if from.is_terminal() => true,
            (Validating, Invalid | RequestingSession | CreatingTown) => true,
            (CreatingTown, Validating) => true,
            (RequestingSession, AwaitingLogin) => true,
            (AwaitingLogin, Denied | Connecting) => true,
            (Connecting, Connected) => true,
            (from, Failed) => from.is_active(),
            _ => false,
        }
    }
}

/// One attempt moving through `FlowState`, publishing every step.
pub(crate) struct JoinFlow<'a> {
    id: FlowId,
    state: FlowState,
    published: &'a watch::Sender<FlowState>,
}

impl<'a> JoinFlow<'a> {
    /// Start a new attempt from whatever state the previous one left behind.
    pub(crate) fn begin(published: &'a watch::Sender<FlowState>) -> Result<Self, JoinError> {
        let mut flow = Self {
            id: FlowId::new(),
            state: *published.borrow(),
            published,
        };
        flow.advance(FlowState::Validating)?;
        Ok(flow)
    }

    pub(crate) fn id(&self) -> FlowId {
        self.id
    }

    pub(crate) fn advance(&mut self, next: FlowState) -> Result<(), JoinError> {
        if !self.state.can_transition_to(next) {
            let err = DomainError::invalid_state_transition(format!(
                "{:?} -> {:?}",
                self.state, next
            ));
            tracing::error!(flow_id = %self.id, error = %err, "Join flow left its state machine");
            self.set(FlowState::Failed);
            return Err(JoinError::invariant(err.to_string()));
        }
        self.set(next);
        Ok(())
    }

    /// Mark the attempt invalid and hand back the error.
    pub(crate) fn reject(&mut self, err: ValidationError) -> JoinError {
        match self.advance(FlowState::Invalid) {
            Ok(()) => err.into(),
            Err(e) => e,
        }
    }

    /// Mark the attempt failed and hand back the error.
    pub(crate) fn fail(&mut self, err: JoinError) -> JoinError {
        if self.state.is_active() {
            self.set(FlowState::Failed);
        }
        err
    }

    fn set(&mut self, next: FlowState) {
        self.state = next;
        self.published.send_replace(next);
    }
}

/// An attempt dropped mid-flight (caller cancelled, timed out) ends as `Failed`.
impl Drop for JoinFlow<'_> {
    fn drop(&mut self) {
        if self.state.is_active() {
            tracing::debug!(flow_id = %self.id, state = ?self.state, "Join flow abandoned");
            self.set(FlowState::Failed);
        }
    }
}
