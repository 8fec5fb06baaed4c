mod common;

use api::auth::password::PasswordService;
use api::auth::{AuthConfig, JwtService};
use api::error::AppError;
use api::gql::types::{PaginationInput, Role};
use axum::http::StatusCode;
use common::*;
use domain::{BookingError, GroupSize};
use uuid::Uuid;

#[test]
fn test_token_round_trip_keeps_identity_and_role() {
    let jwt = JwtService::new(&test_auth_config());
    let user_id = Uuid::new_v4();

    let token = jwt
        .create_token(user_id, "coach@test.com".to_string(), Role::Instructor)
        .unwrap();
    let claims = jwt.verify_token(&token).unwrap();

    assert_eq!(claims.user_id().unwrap(), user_id);
    assert_eq!(claims.email, "coach@test.com");
    assert_eq!(claims.role(), Role::Instructor);
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_token_signed_with_other_secret_is_rejected() {
    let issuer = JwtService::new(&AuthConfig {
        jwt_secret: "another-secret-entirely-5678".to_string(),
        access_token_expiration_minutes: 60,
    });
    let token = issuer
        .create_token(Uuid::new_v4(), "p@test.com".to_string(), Role::Admin)
        .unwrap();

    let verifier = JwtService::new(&test_auth_config());
    let err = verifier.verify_token(&token).unwrap_err();

    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

#[test]
fn test_unknown_role_degrades_to_player() {
    assert_eq!(Role::from("superuser".to_string()), Role::Player);
    assert_eq!(Role::from("admin".to_string()), Role::Admin);
    assert_eq!(String::from(Role::Instructor), "instructor");
}

#[test]
fn test_password_hash_verifies_only_original() {
    let hash = PasswordService::hash_password("volea2024").unwrap();

    assert!(PasswordService::verify_password("volea2024", &hash).unwrap());
    assert!(!PasswordService::verify_password("volea2025", &hash).unwrap());
}

#[test]
fn test_password_strength_rules() {
    assert!(PasswordService::validate_password_strength("short1").is_err());
    assert!(PasswordService::validate_password_strength("lettersonly").is_err());
    assert!(PasswordService::validate_password_strength("12345678").is_err());
    assert!(PasswordService::validate_password_strength("bandeja99").is_ok());
}

#[test]
fn test_booking_errors_map_to_http_statuses() {
    let status = |e: BookingError| AppError::from(e).status();

    assert_eq!(
        status(BookingError::InsufficientPoints {
            required: 12,
            available: 3
        }),
        StatusCode::PAYMENT_REQUIRED
    );
    assert_eq!(status(BookingError::BookingNotFound), StatusCode::NOT_FOUND);
    assert_eq!(status(BookingError::InvalidGroupSize(7)), StatusCode::BAD_REQUEST);
    assert_eq!(status(BookingError::AlreadyBooked), StatusCode::CONFLICT);
    assert_eq!(
        status(BookingError::ModalityFull(GroupSize::FOUR)),
        StatusCode::CONFLICT
    );
    assert_eq!(status(BookingError::BookingNotActive), StatusCode::CONFLICT);
    assert_eq!(
        status(BookingError::CurrencyOnlySeat(GroupSize::FOUR)),
        StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[test]
fn test_app_errors_map_to_http_statuses() {
    assert_eq!(
        AppError::Unauthorized("x".into()).status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(AppError::Forbidden("x".into()).status(), StatusCode::FORBIDDEN);
    assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        AppError::Db(sqlx::Error::RowNotFound).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_pagination_is_clamped() {
    let page = PaginationInput {
        limit: Some(10_000),
        offset: Some(-5),
    }
    .to_limit_offset();
    assert_eq!(page.limit, 200);
    assert_eq!(page.offset, 0);

    let page = PaginationInput {
        limit: Some(0),
        offset: None,
    }
    .to_limit_offset();
    assert_eq!(page.limit, 1);
}
