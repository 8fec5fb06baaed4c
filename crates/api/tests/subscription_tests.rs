mod common;

use std::time::Duration;

use api::auth::AuthUser;
use api::gql::build_schema;
use api::gql::subscriptions::{
    open_channels_for, prune_idle_channels, publish_activity_event, publish_slot_update,
    publish_user_notification,
};
use api::gql::types::{
    ActivityEventCategory, ActivityLogEntry, Role, SlotEventType, SlotStatus, SlotUpdateEvent,
    UserNotification,
};
use api::services::classes::{self, BookClassParams};
use api::services::ExpiryService;
use async_graphql::Request;
use chrono::Utc;
use common::*;
use domain::{BookingRequest, GroupSize, PaymentMethod, ProposalDraft};
use futures_util::StreamExt;
use uuid::Uuid;

fn club_event(club_id: Uuid) -> SlotUpdateEvent {
    SlotUpdateEvent {
        club_id: club_id.into(),
        time_slot_id: Uuid::new_v4().into(),
        event_type: SlotEventType::Booked,
        status: SlotStatus::PreRegistration,
        court_number: None,
        occurred_at: Utc::now(),
    }
}

fn slot_updates_request(club_id: Uuid) -> Request {
    Request::new(format!(
        r#"subscription {{ slotUpdates(clubId: "{club_id}") {{ eventType }} }}"#
    ))
}

#[tokio::test]
async fn test_publishing_without_subscribers_opens_no_channel() {
    let club_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    publish_slot_update(club_event(club_id));
    publish_activity_event(
        slot_id,
        ActivityLogEntry {
            id: Uuid::new_v4().into(),
            time_slot_id: slot_id.into(),
            event_category: ActivityEventCategory::Booking,
            event_action: "booked".to_string(),
            actor_id: None,
            subject_id: None,
            metadata: async_graphql::Json(serde_json::json!({})),
            event_time: Utc::now(),
        },
    );
    publish_user_notification(UserNotification {
        user_id: user_id.into(),
        title: "Class Confirmed".to_string(),
        message: "See you on court".to_string(),
        time_slot_id: None,
        created_at: Utc::now(),
    });

    assert_eq!(open_channels_for(club_id), 0);
    assert_eq!(open_channels_for(slot_id), 0);
    assert_eq!(open_channels_for(user_id), 0);
}

#[tokio::test]
async fn test_subscriber_receives_club_updates_until_it_leaves() {
    let schema = build_schema(lazy_state());
    let club_id = Uuid::new_v4();

    let mut stream = schema.execute_stream(slot_updates_request(club_id));
    // First poll runs the resolver and registers the receiver
    let idle = tokio::time::timeout(Duration::from_millis(50), stream.next()).await;
    assert!(idle.is_err(), "No event was published yet");
    assert_eq!(open_channels_for(club_id), 1);

    publish_slot_update(club_event(club_id));
    let response = tokio::time::timeout(Duration::from_secs(1), stream.next())
        .await
        .expect("Subscriber should receive the update")
        .expect("Stream should stay open");
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(data["slotUpdates"]["eventType"], "BOOKED");

    drop(stream);
    publish_slot_update(club_event(club_id));
    assert_eq!(open_channels_for(club_id), 0);
}

#[tokio::test]
async fn test_prune_drops_channels_whose_subscribers_left() {
    let schema = build_schema(lazy_state());
    let club_id = Uuid::new_v4();

    let mut stream = schema.execute_stream(slot_updates_request(club_id));
    let _ = tokio::time::timeout(Duration::from_millis(50), stream.next()).await;
    assert_eq!(open_channels_for(club_id), 1);

    prune_idle_channels();
    assert_eq!(open_channels_for(club_id), 1, "Live channels survive pruning");

    drop(stream);
    prune_idle_channels();
    assert_eq!(open_channels_for(club_id), 0);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_sweep_closes_activity_channel_of_finished_class() {
    let app_state = setup_test_db().await;
    let club_id = create_test_club(&app_state, "Finished Club").await;
    create_test_court(&app_state, club_id, 1).await;
    let (coach_id, coach) = create_test_user(&app_state, Role::Instructor, 0, None).await;
    let start = tomorrow_at(9);

    let slot = classes::propose_class(
        &app_state.db,
        &AuthUser::from_claims(&coach).unwrap(),
        ProposalDraft {
            club_id: Some(club_id),
            instructor_id: Some(coach_id),
            start: Some(start),
            end: Some(start + chrono::Duration::minutes(90)),
            level: Some("open".to_string()),
            max_players: Some(4),
            total_price_cents: Some(4800),
            ..Default::default()
        },
        Utc::now(),
    )
    .await
    .unwrap();

    let (player, _) = create_test_user(&app_state, Role::Player, 0, None).await;
    classes::book_class(
        &app_state.db,
        BookClassParams {
            slot_id: slot.id,
            user_id: player,
            request: BookingRequest {
                group_size: GroupSize::ONE,
                payment_method: PaymentMethod::Currency,
                private: false,
            },
            now: Utc::now(),
        },
    )
    .await
    .unwrap();

    let schema = build_schema(app_state.clone());
    let mut stream = schema.execute_stream(
        Request::new(format!(
            r#"subscription {{ slotActivity(timeSlotId: "{}") {{ eventAction }} }}"#,
            slot.id
        ))
        .data(coach),
    );
    let _ = tokio::time::timeout(Duration::from_millis(50), stream.next()).await;
    assert_eq!(open_channels_for(slot.id), 1);

    sqlx::query(
        "UPDATE time_slots
         SET start_time = NOW() - INTERVAL '100 minutes', end_time = NOW() - INTERVAL '10 seconds'
         WHERE id = $1",
    )
    .bind(slot.id)
    .execute(&app_state.db)
    .await
    .unwrap();

    ExpiryService::with_period(app_state.clone(), Duration::from_secs(60))
        .sweep()
        .await
        .unwrap();

    assert_eq!(open_channels_for(slot.id), 0);
}
