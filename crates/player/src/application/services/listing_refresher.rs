//! Listing refresher
//!
//! Polls the towns directory on a fixed interval and publishes the sorted listing
//! through a `watch` channel. A failed poll keeps the previous listing and is only
//! logged.
//!
//! Every fetch takes a ticket from a monotonically increasing counter and a result is
//! applied only if its ticket is newer than the last applied one. `stop()` retires
//! every ticket handed out so far, so a fetch still in flight when the refresher stops
//! can never overwrite the listing. A tick that finds a fetch already in flight is
//! skipped rather than queued.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use covey_domain::TownListing;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::ports::outbound::TownDirectoryPort;
use crate::state::SessionContext;

/// Shortest poll interval accepted by `start`.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// What a single refresh did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The listing was replaced
    Applied,
    /// Another fetch was still in flight
    Skipped,
    /// The directory call failed; the previous listing stays
    Failed,
    /// The refresher stopped while fetching
    Cancelled,
    /// A newer result, or a stop, superseded this one
    Stale,
}

struct Shared {
    directory: Arc<dyn TownDirectoryPort>,
    context: SessionContext,
    listing: watch::Sender<TownListing>,
    in_flight: AtomicBool,
    next_ticket: AtomicU64,
    applied_ticket: Mutex<u64>,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Shared {
    async fn refresh(&self, cancel: &CancellationToken) -> RefreshOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(session_id = %self.context.id(), "Listing fetch still in flight, skipping");
            return RefreshOutcome::Skipped;
        }
        let _in_flight = InFlight(&self.in_flight);
        let ticket = self.next_ticket.fetch_add(1, Ordering::AcqRel) + 1;

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return RefreshOutcome::Cancelled,
            result = self.directory.list_towns() => result,
        };

        match fetched {
            Ok(towns) => self.apply(ticket, TownListing::from_towns(towns)),
            Err(e) => {
                tracing::warn!(
                    session_id = %self.context.id(),
                    ticket,
                    error = %e,
                    "Failed to refresh town listing"
                );
                RefreshOutcome::Failed
            }
        }
    }

    fn apply(&self, ticket: u64, listing: TownListing) -> RefreshOutcome {
        let mut applied = self
            .applied_ticket
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if ticket <= *applied {
            tracing::debug!(ticket, applied = *applied, "Discarding stale listing");
            return RefreshOutcome::Stale;
        }
        *applied = ticket;
        tracing::debug!(
            session_id = %self.context.id(),
            ticket,
            towns = listing.len(),
            "Town listing refreshed"
        );
        self.listing.send_replace(listing);
        RefreshOutcome::Applied
    }

    /// Make every ticket handed out so far stale.
    fn retire_outstanding(&self) {
        let mut applied = self
            .applied_ticket
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *applied = (*applied).max(self.next_ticket.load(Ordering::Acquire));
    }
}

struct RunningLoop {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

pub struct ListingRefresher {
    shared: Arc<Shared>,
    running: Mutex<Option<RunningLoop>>,
}

impl ListingRefresher {
    pub fn new(directory: Arc<dyn TownDirectoryPort>, context: SessionContext) -> Self {
        let (listing, _) = watch::channel(TownListing::default());
        Self {
            shared: Arc::new(Shared {
                directory,
                context,
                listing,
                in_flight: AtomicBool::new(false),
                next_ticket: AtomicU64::new(0),
                applied_ticket: Mutex::new(0),
            }),
            running: Mutex::new(None),
        }
    }

    /// Current listing, sorted by descending occupancy.
    pub fn listing(&self) -> TownListing {
        self.shared.listing.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TownListing> {
        self.shared.listing.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|running| !running.task.is_finished())
    }

    /// Start polling every `period`, fetching once right away.
    ///
    /// Returns `false` if the refresher is already running or no tokio runtime is
    /// available.
    pub fn start(&self, period: Duration) -> bool {
        let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        if running.as_ref().is_some_and(|r| !r.task.is_finished()) {
            return false;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::error!("Listing refresher needs a tokio runtime to start");
            return false;
        };

        let period = period.max(MIN_REFRESH_INTERVAL);
        let cancel = CancellationToken::new();
        let task = handle.spawn(run_loop(self.shared.clone(), period, cancel.clone()));
        tracing::info!(
            session_id = %self.shared.context.id(),
            period_ms = period.as_millis() as u64,
            "Listing refresher started"
        );
        *running = Some(RunningLoop { cancel, task });
        true
    }

    /// Stop polling. No fetch started before this call will update the listing.
    pub fn stop(&self) {
        let stopped = self
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(running) = stopped {
            running.cancel.cancel();
            tracing::info!(session_id = %self.shared.context.id(), "Listing refresher stopped");
        }
        self.shared.retire_outstanding();
    }

    /// Fetch once outside the regular schedule.
    pub async fn refresh_now(&self) -> RefreshOutcome {
        let cancel = self
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|running| running.cancel.clone())
            .unwrap_or_default();
        self.shared.refresh(&cancel).await
    }
}

impl Drop for ListingRefresher {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_loop(shared: Arc<Shared>, period: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        if shared.refresh(&cancel).await == RefreshOutcome::Cancelled {
            break;
        }
    }
    tracing::debug!(session_id = %shared.context.id(), "Listing refresh loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::{DirectoryError, MockTownDirectoryPort};
    use async_trait::async_trait;
    use covey_domain::{
        SessionCreateRequest, SessionCreateResult, SessionJoinRequest, SessionJoinResult, TownId,
        TownSummary,
    };
    use mockall::Sequence;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    fn town(id: &str, current: u32, max: u32) -> TownSummary {
        TownSummary {
            id: TownId::new(id).unwrap(),
            display_name: format!("Town {id}"),
            is_public: true,
            current_occupancy: current,
            maximum_occupancy: max,
        }
    }

    fn ids(listing: &TownListing) -> Vec<String> {
        listing.iter().map(|t| t.id.to_string()).collect()
    }

    #[tokio::test]
    async fn listing_follows_last_successful_fetch() {
        let mut directory = MockTownDirectoryPort::new();
        let mut seq = Sequence::new();
        directory
            .expect_list_towns()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![town("a", 1, 5)]));
        directory
            .expect_list_towns()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(DirectoryError::request("timeout")));
        directory
            .expect_list_towns()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![town("b", 2, 5), town("c", 4, 5), town("d", 2, 5)]));
        directory
            .expect_list_towns()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|| Err(DirectoryError::request("timeout")));
        let refresher = ListingRefresher::new(Arc::new(directory), SessionContext::new());

        let outcomes = [
            refresher.refresh_now().await,
            refresher.refresh_now().await,
            refresher.refresh_now().await,
            refresher.refresh_now().await,
            refresher.refresh_now().await,
        ];

        assert_eq!(
            outcomes,
            [
                RefreshOutcome::Applied,
                RefreshOutcome::Failed,
                RefreshOutcome::Applied,
                RefreshOutcome::Failed,
                RefreshOutcome::Failed,
            ]
        );
        assert_eq!(ids(&refresher.listing()), ["c", "b", "d"]);
    }

    #[tokio::test]
    async fn full_town_sorts_first_and_is_not_joinable() {
        let mut directory = MockTownDirectoryPort::new();
        directory
            .expect_list_towns()
            .returning(|| Ok(vec![town("open", 3, 5), town("full", 5, 5)]));
        let refresher = ListingRefresher::new(Arc::new(directory), SessionContext::new());

        refresher.refresh_now().await;

        let listing = refresher.listing();
        assert_eq!(ids(&listing), ["full", "open"]);
        assert!(!listing.towns()[0].is_joinable());
        assert!(listing.towns()[1].is_joinable());
    }

    #[tokio::test]
    async fn repeated_fetches_of_same_data_are_equal() {
        let mut directory = MockTownDirectoryPort::new();
        directory
            .expect_list_towns()
            .times(2)
            .returning(|| Ok(vec![town("a", 2, 5), town("b", 2, 5), town("c", 3, 5)]));
        let refresher = ListingRefresher::new(Arc::new(directory), SessionContext::new());
        let mut updates = refresher.subscribe();

        refresher.refresh_now().await;
        let first = updates.borrow_and_update().clone();
        refresher.refresh_now().await;

        assert_eq!(first, *updates.borrow());
        assert_eq!(ids(&first), ["c", "a", "b"]);
    }

    /// Directory whose listing call parks until released.
    struct ParkedDirectory {
        entered: Notify,
        release: Notify,
    }

    impl ParkedDirectory {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                entered: Notify::new(),
                release: Notify::new(),
            })
        }
    }

    #[async_trait]
    impl TownDirectoryPort for ParkedDirectory {
        async fn list_towns(&self) -> Result<Vec<TownSummary>, DirectoryError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(vec![town("late", 1, 5)])
        }

        async fn create_town(
            &self,
            _request: &SessionCreateRequest,
        ) -> Result<SessionCreateResult, DirectoryError> {
            Err(DirectoryError::request("unexpected create"))
        }

        async fn join_session(
            &self,
            _request: &SessionJoinRequest,
        ) -> Result<SessionJoinResult, DirectoryError> {
            Err(DirectoryError::request("unexpected join"))
        }
    }

    #[tokio::test]
    async fn refresh_is_skipped_while_one_is_in_flight() {
        let directory = ParkedDirectory::new();
        let refresher = Arc::new(ListingRefresher::new(
            directory.clone(),
            SessionContext::new(),
        ));

        let first = tokio::spawn({
            let refresher = refresher.clone();
            async move { refresher.refresh_now().await }
        });
        directory.entered.notified().await;

        assert_eq!(refresher.refresh_now().await, RefreshOutcome::Skipped);

        directory.release.notify_one();
        assert_eq!(first.await.unwrap(), RefreshOutcome::Applied);
        assert_eq!(ids(&refresher.listing()), ["late"]);
    }

    #[tokio::test]
    async fn fetch_in_flight_at_stop_does_not_update_listing() {
        let directory = ParkedDirectory::new();
        let refresher = Arc::new(ListingRefresher::new(
            directory.clone(),
            SessionContext::new(),
        ));

        let pending = tokio::spawn({
            let refresher = refresher.clone();
            async move { refresher.refresh_now().await }
        });
        directory.entered.notified().await;

        refresher.stop();
        directory.release.notify_one();

        assert_eq!(pending.await.unwrap(), RefreshOutcome::Stale);
        assert!(refresher.listing().is_empty());
    }

    #[tokio::test]
    async fn stopping_cancels_the_loop_fetch() {
        let directory = ParkedDirectory::new();
        let refresher = ListingRefresher::new(directory.clone(), SessionContext::new());

        assert!(refresher.start(Duration::from_secs(2)));
        directory.entered.notified().await;
        refresher.stop();
        directory.release.notify_one();
        tokio::task::yield_now().await;

        assert!(!refresher.is_running());
        assert!(refresher.listing().is_empty());
    }

    /// Directory that counts listing calls.
    #[derive(Default)]
    struct CountingDirectory {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TownDirectoryPort for CountingDirectory {
        async fn list_towns(&self) -> Result<Vec<TownSummary>, DirectoryError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as u32;
            Ok(vec![town("a", n, 50)])
        }

        async fn create_town(
            &self,
            _request: &SessionCreateRequest,
        ) -> Result<SessionCreateResult, DirectoryError> {
            Err(DirectoryError::request("unexpected create"))
        }

        async fn join_session(
            &self,
            _request: &SessionJoinRequest,
        ) -> Result<SessionJoinResult, DirectoryError> {
            Err(DirectoryError::request("unexpected join"))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn polls_on_schedule_until_stopped() {
        let directory = Arc::new(CountingDirectory::default());
        let refresher = ListingRefresher::new(directory.clone(), SessionContext::new());

        assert!(refresher.start(Duration::from_secs(2)));
        assert!(!refresher.start(Duration::from_secs(2)));
        tokio::time::sleep(Duration::from_millis(4_500)).await;
        assert_eq!(directory.calls.load(Ordering::SeqCst), 3);
        assert_eq!(refresher.listing().towns()[0].current_occupancy, 2);

        refresher.stop();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(directory.calls.load(Ordering::SeqCst), 3);
        assert!(!refresher.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn interval_is_clamped_to_minimum() {
        let directory = Arc::new(CountingDirectory::default());
        let refresher = ListingRefresher::new(directory.clone(), SessionContext::new());

        refresher.start(Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(250)).await;
        refresher.stop();

        assert_eq!(directory.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn dropping_the_refresher_stops_the_loop() {
        let directory = Arc::new(CountingDirectory::default());
        let refresher = ListingRefresher::new(directory.clone(), SessionContext::new());
        refresher.start(Duration::from_secs(60));
        let mut updates = refresher.subscribe();
        updates.changed().await.unwrap();

        drop(refresher);
        tokio::task::yield_now().await;

        assert_eq!(directory.calls.load(Ordering::SeqCst), 1);
    }
}
