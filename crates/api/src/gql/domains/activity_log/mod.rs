pub mod resolvers;
pub mod types;

pub use resolvers::ActivityLogQuery;

use crate::gql::subscriptions::publish_activity_event;
use sqlx::PgPool;
use types::{ActivityEventCategory, ActivityLogEntry};
use uuid::Uuid;

/// Persist an activity log entry and broadcast it via subscription.
/// Failures are logged and swallowed.
pub async fn log_and_publish(
    pool: &PgPool,
    time_slot_id: Uuid,
    category: ActivityEventCategory,
    event_action: &str,
    actor_id: Option<Uuid>,
    subject_id: Option<Uuid>,
    metadata: serde_json::Value,
) {
    match infra::repos::activity_log::log_activity(
        pool,
        time_slot_id,
        category.as_str(),
        event_action,
        actor_id,
        subject_id,
        metadata,
    )
    .await
    {
        Ok(row) => {
            let entry = ActivityLogEntry::from(row);
            publish_activity_event(time_slot_id, entry);
        }
        Err(e) => {
            tracing::error!(
                time_slot_id = %time_slot_id,
                event_category = category.as_str(),
                event_action,
                "Failed to log activity: {e}"
            );
        }
    }
}
