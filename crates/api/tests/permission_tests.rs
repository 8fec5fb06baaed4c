mod common;

use api::gql::build_schema;
use api::gql::types::Role;
use async_graphql::Variables;
use common::*;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_anonymous_booking_is_rejected() {
    let schema = build_schema(lazy_state());

    let query = r#"
        mutation BookClass($input: BookClassInput!) {
            bookClass(input: $input) {
                pointsBalance
            }
        }
    "#;
    let variables = Variables::from_json(json!({
        "input": {
            "timeSlotId": Uuid::new_v4().to_string(),
            "groupSize": 2
        }
    }));

    let response = execute_graphql(&schema, query, Some(variables), None).await;

    assert_eq!(response.errors.len(), 1);
    assert!(
        response.errors[0].message.contains("must be logged in"),
        "Expected login error, got: '{}'",
        response.errors[0].message
    );
}

#[tokio::test]
async fn test_player_cannot_propose_class() {
    let schema = build_schema(lazy_state());

    let query = r#"
        mutation ProposeClass($input: ProposeClassInput!) {
            proposeClass(input: $input) {
                id
            }
        }
    "#;
    let variables = Variables::from_json(json!({
        "input": {
            "clubId": Uuid::new_v4().to_string(),
            "startTime": "2030-01-01T10:00:00Z",
            "endTime": "2030-01-01T11:30:00Z",
            "level": "open",
            "category": "open",
            "maxPlayers": 4,
            "totalPriceCents": 4800
        }
    }));

    let response = execute_graphql(
        &schema,
        query,
        Some(variables),
        Some(claims_for(Uuid::new_v4(), Role::Player)),
    )
    .await;

    assert!(!response.errors.is_empty(), "Players should not propose classes");
    assert!(
        response.errors[0].message.contains("Instructor privileges required"),
        "Expected instructor error, got: '{}'",
        response.errors[0].message
    );
}

#[tokio::test]
async fn test_admin_calendar_requires_admin() {
    let schema = build_schema(lazy_state());

    let query = r#"
        query AdminCalendar($clubId: UUID!) {
            adminCalendar(clubId: $clubId, from: "2030-01-01T00:00:00Z", to: "2030-01-02T00:00:00Z") {
                clubId
            }
        }
    "#;

    for role in [Role::Player, Role::Instructor] {
        let variables = Variables::from_json(json!({ "clubId": Uuid::new_v4().to_string() }));
        let response = execute_graphql(
            &schema,
            query,
            Some(variables),
            Some(claims_for(Uuid::new_v4(), role)),
        )
        .await;

        assert!(
            !response.errors.is_empty(),
            "{:?} should not read the admin calendar",
            role
        );
        assert!(response.errors[0]
            .message
            .contains("Administrator privileges required"));
    }
}

#[tokio::test]
async fn test_user_listing_requires_admin() {
    let schema = build_schema(lazy_state());

    let query = r#"
        query {
            users {
                totalCount
            }
        }
    "#;

    let response = execute_graphql(
        &schema,
        query,
        None,
        Some(claims_for(Uuid::new_v4(), Role::Instructor)),
    )
    .await;

    assert!(!response.errors.is_empty());
    assert!(response.errors[0].message.contains("Access denied"));
}

#[tokio::test]
async fn test_slot_activity_log_hidden_from_players() {
    let schema = build_schema(lazy_state());

    let query = r#"
        query Activity($slotId: UUID!) {
            slotActivityLog(timeSlotId: $slotId) {
                totalCount
            }
        }
    "#;
    let variables = Variables::from_json(json!({ "slotId": Uuid::new_v4().to_string() }));

    let response = execute_graphql(
        &schema,
        query,
        Some(variables),
        Some(claims_for(Uuid::new_v4(), Role::Player)),
    )
    .await;

    assert!(!response.errors.is_empty());
    assert!(response.errors[0].message.contains("Access denied"));
}

#[tokio::test]
async fn test_me_requires_login() {
    let schema = build_schema(lazy_state());

    let response = execute_graphql(&schema, "query { me { id } }", None, None).await;

    assert!(!response.errors.is_empty());
    assert!(response.errors[0].message.contains("must be logged in"));
}

#[tokio::test]
async fn test_invalid_group_size_rejected_before_lookup() {
    let schema = build_schema(lazy_state());

    let query = r#"
        mutation BookClass($input: BookClassInput!) {
            bookClass(input: $input) {
                pointsBalance
            }
        }
    "#;
    let variables = Variables::from_json(json!({
        "input": {
            "timeSlotId": Uuid::new_v4().to_string(),
            "groupSize": 5
        }
    }));

    let response = execute_graphql(
        &schema,
        query,
        Some(variables),
        Some(claims_for(Uuid::new_v4(), Role::Player)),
    )
    .await;

    assert_eq!(response.errors.len(), 1);
    assert!(
        response.errors[0].message.to_lowercase().contains("group size"),
        "Expected group size error, got: '{}'",
        response.errors[0].message
    );
}
