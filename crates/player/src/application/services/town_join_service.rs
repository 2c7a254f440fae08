//! Town join/create orchestration
//!
//! A join validates the input, asks the directory for a session, lets the login gate
//! confirm it and finally hands the provider token to the video subsystem. A create
//! makes the town first, discloses its credentials once and then runs the same join.
//!
//! Only one attempt runs at a time; a second request while one is active is refused
//! without touching the network. Every failed attempt produces exactly one
//! notification. A denied login is a normal outcome and produces none.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use covey_domain::{
    DisplayName, FriendlyName, SessionCreateRequest, SessionCreateResult, SessionJoinRequest,
    TownId,
};
use tokio::sync::watch;

use super::join_flow::{FlowState, JoinFlow};
use crate::application::error::{JoinError, ValidationError};
use crate::ports::outbound::{
    LoginGatePort, Notification, NotifierPort, TownCreatedNotice, TownDirectoryPort,
    VideoHandoffPort,
};
use crate::state::{ActiveConnection, SessionContext};

const SERVICE_ERROR_TITLE: &str = "Unable to connect to Towns Service";

/// How a join attempt ended when nothing went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    Connected(ActiveConnection),
    /// The user declined the login prompt
    LoginDenied,
}

/// Result of a create: the new town's credentials plus the chained join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    pub town: SessionCreateResult,
    pub join: JoinOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowKind {
    Join,
    Create,
}

impl FlowKind {
    fn title(self) -> &'static str {
        match self {
            FlowKind::Join => "Unable to join town",
            FlowKind::Create => "Unable to create town",
        }
    }

    fn hint(self, err: ValidationError) -> &'static str {
        match (self, err) {
            (FlowKind::Join, ValidationError::MissingName) => "Please select a username",
            (FlowKind::Create, ValidationError::MissingName) => {
                "Please select a username before creating a town"
            }
            (_, ValidationError::MissingTownId) => "Please enter a town ID",
            (_, ValidationError::MissingTownName) => "Please enter a town name",
        }
    }

    fn notification(self, err: &JoinError) -> Notification {
        match err {
            JoinError::Validation(v) => Notification::error(self.title(), self.hint(*v)),
            JoinError::Service(msg) => Notification::error(SERVICE_ERROR_TITLE, msg.clone()),
            JoinError::InvariantViolation(_) => Notification::error(self.title(), err.to_string()),
            JoinError::FlowInProgress => {
                Notification::error(FlowKind::Join.title(), err.to_string())
            }
        }
    }
}

/// Releases the single-flight flag when the attempt ends, however it ends.
struct FlowGuard<'a>(&'a AtomicBool);

impl Drop for FlowGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct TownJoinService {
    directory: Arc<dyn TownDirectoryPort>,
    login_gate: Arc<dyn LoginGatePort>,
    video: Arc<dyn VideoHandoffPort>,
    notifier: Arc<dyn NotifierPort>,
    context: SessionContext,
    busy: AtomicBool,
    state: watch::Sender<FlowState>,
}

impl TownJoinService {
    pub fn new(
        directory: Arc<dyn TownDirectoryPort>,
        login_gate: Arc<dyn LoginGatePort>,
        video: Arc<dyn VideoHandoffPort>,
        notifier: Arc<dyn NotifierPort>,
        context: SessionContext,
    ) -> Self {
        let (state, _) = watch::channel(FlowState::Idle);
        Self {
            directory,
            login_gate,
            video,
            notifier,
            context,
            busy: AtomicBool::new(false),
            state,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// State of the current (or last) attempt.
    pub fn state(&self) -> FlowState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<FlowState> {
        self.state.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Join an existing town by ID.
    pub async fn join(&self, display_name: &str, town_id: &str) -> Result<JoinOutcome, JoinError> {
        let kind = FlowKind::Join;
        let Some(_guard) = self.try_begin() else {
            return Err(self.report(kind, JoinError::FlowInProgress));
        };

        let result = match JoinFlow::begin(&self.state) {
            Ok(mut flow) => self.run_join(&mut flow, display_name, town_id).await,
            Err(e) => Err(e),
        };
        result.map_err(|e| self.report(kind, e))
    }

    /// Create a town, disclose its credentials, then join it as `display_name`.
    pub async fn create(
        &self,
        friendly_name: &str,
        is_publicly_listed: bool,
        display_name: &str,
    ) -> Result<CreateOutcome, JoinError> {
        let kind = FlowKind::Create;
        let Some(_guard) = self.try_begin() else {
            return Err(self.report(kind, JoinError::FlowInProgress));
        };

        let result = match JoinFlow::begin(&self.state) {
            Ok(mut flow) => {
                self.run_create(&mut flow, friendly_name, is_publicly_listed, display_name)
                    .await
            }
            Err(e) => Err(e),
        };
        result.map_err(|e| self.report(kind, e))
    }

    fn try_begin(&self) -> Option<FlowGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlowGuard(&self.busy))
    }

    fn report(&self, kind: FlowKind, err: JoinError) -> JoinError {
        match &err {
            JoinError::InvariantViolation(msg) => {
                tracing::error!(session_id = %self.context.id(), error = %msg, "Join attempt hit an invariant violation");
            }
            other => {
                tracing::info!(session_id = %self.context.id(), error = %other, "Join attempt failed");
            }
        }
        self.notifier.notify(kind.notification(&err));
        err
    }

    async fn run_join(
        &self,
        flow: &mut JoinFlow<'_>,
        display_name: &str,
        town_id: &str,
    ) -> Result<JoinOutcome, JoinError> {
        let display_name =
            DisplayName::new(display_name).map_err(|_| flow.reject(ValidationError::MissingName))?;
        let town_id =
            TownId::new(town_id).map_err(|_| flow.reject(ValidationError::MissingTownId))?;
        let request = SessionJoinRequest {
            display_name,
            town_id,
        };

        flow.advance(FlowState::RequestingSession)?;
        tracing::info!(
            flow_id = %flow.id(),
            session_id = %self.context.id(),
            town_id = %request.town_id,
            "Requesting town session"
        );
        let session = self
            .directory
            .join_session(&request)
            .await
            .map_err(|e| flow.fail(e.into()))?;

        flow.advance(FlowState::AwaitingLogin)?;
        let confirmed = self
            .login_gate
            .confirm(&session)
            .await
            .map_err(|e| flow.fail(e.into()))?;
        if !confirmed {
            flow.advance(FlowState::Denied)?;
            tracing::info!(flow_id = %flow.id(), town_id = %request.town_id, "Login denied");
            return Ok(JoinOutcome::LoginDenied);
        }

        if !session.has_video_token() {
            tracing::error!(
                flow_id = %flow.id(),
                town_id = %request.town_id,
                "Confirmed session carries no video token"
            );
            return Err(flow.fail(JoinError::invariant(
                "confirmed session carries no video token",
            )));
        }

        flow.advance(FlowState::Connecting)?;
        let connection = ActiveConnection {
            town_id: request.town_id.clone(),
            user_id: session.user_id.clone(),
            session_token: session.session_token.clone(),
            friendly_name: session.friendly_name.clone(),
        };
        self.video
            .connect(&self.context, session.into_video_token())
            .await
            .map_err(|e| flow.fail(e.into()))?;

        flow.advance(FlowState::Connected)?;
        tracing::info!(
            flow_id = %flow.id(),
            town_id = %connection.town_id,
            user_id = %connection.user_id,
            "Connected to town"
        );
        self.context.remember_display_name(request.display_name);
        self.context.set_connection(connection.clone());
        Ok(JoinOutcome::Connected(connection))
    }

    async fn run_create(
        &self,
        flow: &mut JoinFlow<'_>,
        friendly_name: &str,
        is_publicly_listed: bool,
        display_name: &str,
    ) -> Result<CreateOutcome, JoinError> {
        let display_name =
            DisplayName::new(display_name).map_err(|_| flow.reject(ValidationError::MissingName))?;
        let friendly_name = FriendlyName::new(friendly_name)
            .map_err(|_| flow.reject(ValidationError::MissingTownName))?;

        flow.advance(FlowState::CreatingTown)?;
        tracing::info!(
            flow_id = %flow.id(),
            friendly_name = %friendly_name,
            is_publicly_listed,
            "Creating town"
        );
        let request = SessionCreateRequest {
            friendly_name,
            is_publicly_listed,
        };
        let town = self
            .directory
            .create_town(&request)
            .await
            .map_err(|e| flow.fail(e.into()))?;

        tracing::info!(flow_id = %flow.id(), town_id = %town.town_id, "Town created");
        self.notifier
            .notify(Notification::TownCreated(TownCreatedNotice {
                friendly_name: request.friendly_name.to_string(),
                town_id: town.town_id.clone(),
                edit_password: town.edit_password.clone(),
                is_publicly_listed,
            }));

        flow.advance(FlowState::Validating)?;
        let join = self
            .run_join(flow, display_name.as_str(), town.town_id.as_str())
            .await?;
        Ok(CreateOutcome { town, join })
    }
}
