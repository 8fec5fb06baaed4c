use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::error::AppError;
use crate::gql::subscriptions::{cleanup_slot_channel, prune_idle_channels};
use crate::services::classes;
use crate::AppState;
use infra::repos::time_slots;

/// Slots handled per tick; the rest wait for the next one.
const EXPIRY_BATCH: i64 = 100;

/// Background sweep that cancels classes whose start time passed before any
/// modality filled, and retries court assignment for filled classes that
/// could not get one when they completed.
pub struct ExpiryService {
    state: AppState,
    interval: Interval,
}

impl ExpiryService {
    pub fn new(state: AppState) -> Self {
        Self::with_period(state.clone(), state.server_config().expiry_interval)
    }

    pub fn with_period(state: AppState, period: Duration) -> Self {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self { state, interval }
    }

    pub async fn run(&mut self) {
        info!("Starting class expiry service");

        loop {
            self.interval.tick().await;

            if let Err(e) = self.sweep().await {
                error!("Error expiring classes: {}", e);
            }
        }
    }

    /// One pass: expire stale classes, retry pending court assignments, then
    /// close the live channels of classes that have ended.
    pub async fn sweep(&self) -> Result<(), AppError> {
        let now = Utc::now();

        loop {
            let expired = classes::expire_stale(&self.state.db, now, EXPIRY_BATCH).await?;
            if !expired.is_empty() {
                info!(count = expired.len(), "expired unfilled classes");
            }
            if (expired.len() as i64) < EXPIRY_BATCH {
                break;
            }
        }

        for club_id in time_slots::clubs_awaiting_court(&self.state.db, now).await? {
            match classes::assign_pending_for_club(&self.state.db, club_id, now).await {
                Ok(assigned) if !assigned.is_empty() => {
                    info!(%club_id, count = assigned.len(), "assigned courts to waiting classes");
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(%club_id, "Failed to retry court assignment: {}", e);
                }
            }
        }

        self.close_finished_channels(now).await?;

        Ok(())
    }

    async fn close_finished_channels(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        // Two periods back so a delayed tick does not skip a class
        let lookback =
            TimeDelta::from_std(self.interval.period() * 2).unwrap_or(TimeDelta::hours(1));
        for slot_id in time_slots::finished_between(&self.state.db, now - lookback, now).await? {
            cleanup_slot_channel(slot_id);
        }

        let pruned = prune_idle_channels();
        if pruned > 0 {
            debug!(count = pruned, "dropped idle subscription channels");
        }
        Ok(())
    }
}

pub fn spawn_expiry_service(state: AppState) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut service = ExpiryService::new(state);
        service.run().await;
    })
}
