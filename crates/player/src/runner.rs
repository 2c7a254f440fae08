//! Headless runner: composition root for the `covey-player` binary.

use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::services::{JoinOutcome, ListingRefresher, TownJoinService};
use crate::infrastructure::{
    AutoConfirmLoginGate, LoggingVideoHandoff, PlayerConfig, TownsServiceClient, TracingNotifier,
};
use crate::ports::outbound::TownDirectoryPort;
use crate::state::SessionContext;

/// Spawns a task that cancels `cancel_token` on Ctrl+C or SIGTERM
fn setup_shutdown_signal(cancel_token: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, shutting down");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, shutting down");
            }
        }

        cancel_token.cancel();
    });
}

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "covey_player=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Covey player");

    let cancel_token = CancellationToken::new();
    setup_shutdown_signal(cancel_token.clone());

    let config = PlayerConfig::from_env()?;
    tracing::info!(
        towns_service = %config.towns_service_url,
        refresh_ms = config.listing_refresh.as_millis() as u64,
        "Configuration loaded"
    );

    let context = SessionContext::new();
    let directory: Arc<dyn TownDirectoryPort> = Arc::new(TownsServiceClient::from_config(&config));

    let refresher = ListingRefresher::new(directory.clone(), context.clone());
    let mut listing = refresher.subscribe();
    refresher.start(config.listing_refresh);

    let joins = TownJoinService::new(
        directory,
        Arc::new(AutoConfirmLoginGate),
        Arc::new(LoggingVideoHandoff),
        Arc::new(TracingNotifier),
        context,
    );

    if let Some(auto_join) = &config.auto_join {
        let attempt = tokio::select! {
            _ = cancel_token.cancelled() => None,
            result = joins.join(&auto_join.user_name, &auto_join.town_id) => Some(result),
        };
        match attempt {
            Some(Ok(JoinOutcome::Connected(connection))) => {
                tracing::info!(town = %connection.friendly_name, town_id = %connection.town_id, "Joined town");
            }
            Some(Ok(JoinOutcome::LoginDenied)) => tracing::info!("Login was not confirmed"),
            Some(Err(e)) => tracing::warn!(error = %e, "Startup join failed"),
            None => {}
        }
    }

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => break,
            changed = listing.changed() => {
                if changed.is_err() {
                    break;
                }
                let towns = listing.borrow_and_update().clone();
                tracing::info!(count = towns.len(), "Public towns updated");
                for town in towns.iter() {
                    tracing::info!(
                        town_id = %town.id,
                        joinable = town.is_joinable(),
                        "{} ({})",
                        town.display_name,
                        town.occupancy_label()
                    );
                }
            }
        }
    }

    refresher.stop();
    tracing::info!("Covey player stopped");
    Ok(())
}
