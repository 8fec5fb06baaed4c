use std::sync::Arc;
use std::time::Duration;

use async_graphql::{ObjectType, Schema, SubscriptionType};
use async_graphql_axum::{GraphQLProtocol, GraphQLWebSocket};
use axum::{
    extract::{Request, State, WebSocketUpgrade},
    http::{
        header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE},
        Method, StatusCode,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::Claims;
use crate::error::AppError;
use crate::middleware::jwt::jwt_middleware;
use crate::routes::{auth, calendar, classes, timeslots};
use crate::state::AppState;

/// Build the Axum router: health probe, password auth, the class REST API and
/// GraphQL. Generic over the schema roots so tests can mount their own schema.
pub fn build_router<Q, M, S>(state: AppState, schema: Schema<Q, M, S>) -> Router
where
    Q: ObjectType + Send + Sync + 'static,
    M: ObjectType + Send + Sync + 'static,
    S: SubscriptionType + Send + Sync + 'static,
{
    let auth_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register));

    // Rate limiting: about 10 requests per minute per IP on auth endpoints
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(6)
        .burst_size(10)
        .key_extractor(SmartIpKeyExtractor)
        .finish();

    let auth_routes = match governor_conf {
        Some(conf) => auth_routes.layer(GovernorLayer::new(Arc::new(conf))),
        None => {
            tracing::warn!("Invalid rate limit configuration; auth routes are not rate limited");
            auth_routes
        }
    };

    let api_routes = Router::new()
        .route("/api/classes/book", post(classes::book))
        .route("/api/classes/cancel", post(classes::cancel))
        .route("/api/timeslots", get(timeslots::list).post(timeslots::propose))
        .route("/api/admin/calendar", get(calendar::admin_calendar));

    let cors = {
        let origins: Vec<HeaderValue> = state
            .server_config()
            .allowed_origins
            .iter()
            .filter_map(|o| o.trim().parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE, AUTHORIZATION])
            .allow_credentials(true)
    };

    Router::new()
        // Simple liveness check; also proves DB connectivity.
        .route("/health", get(health))
        .merge(auth_routes)
        .merge(api_routes)
        // GraphQL endpoint with custom handler that includes JWT claims in context
        .route(
            "/graphql",
            post({
                let schema_clone = schema.clone();
                move |state, req| graphql_handler(state, req, schema_clone)
            })
            .get({
                let schema_clone = schema.clone();
                move |state, protocol, upgrade| {
                    graphql_ws_handler(state, protocol, upgrade, schema_clone)
                }
            }),
        )
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state, jwt_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors)
}

/// Custom GraphQL handler that extracts JWT claims from request extensions
/// and adds them to the GraphQL context
async fn graphql_handler<Q, M, S>(
    State(state): State<AppState>,
    req: Request,
    schema: Schema<Q, M, S>,
) -> Result<Response, AppError>
where
    Q: ObjectType + Send + Sync + 'static,
    M: ObjectType + Send + Sync + 'static,
    S: SubscriptionType + Send + Sync + 'static,
{
    // Extract claims from request extensions (set by JWT middleware)
    let claims = req.extensions().get::<Claims>().cloned();

    // Extract the GraphQL request from the HTTP request
    let (_parts, body) = req.into_parts();
    let body_bytes = axum::body::to_bytes(body, 2 * 1024 * 1024)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read request body: {}", e)))?;

    let gql_request: async_graphql::Request = serde_json::from_slice(&body_bytes)
        .map_err(|e| AppError::BadRequest(format!("Invalid GraphQL request: {}", e)))?;

    // Add the AppState and optionally claims to the GraphQL context
    let mut gql_request = gql_request.data(state);
    if let Some(claims) = claims {
        gql_request = gql_request.data(claims);
    }

    // Execute the GraphQL request
    let gql_response = schema.execute(gql_request).await;

    Ok(Json(gql_response).into_response())
}

/// WebSocket handler for GraphQL subscriptions with JWT authentication.
/// Extracts the JWT from the `connection_init` payload and injects Claims into the context.
async fn graphql_ws_handler<Q, M, S>(
    State(state): State<AppState>,
    protocol: GraphQLProtocol,
    upgrade: WebSocketUpgrade,
    schema: Schema<Q, M, S>,
) -> Response
where
    Q: ObjectType + Send + Sync + 'static,
    M: ObjectType + Send + Sync + 'static,
    S: SubscriptionType + Send + Sync + 'static,
{
    let jwt_service = state.jwt_service().clone();

    upgrade
        .protocols(["graphql-transport-ws", "graphql-ws"])
        .on_upgrade(move |stream| {
            GraphQLWebSocket::new(stream, schema, protocol)
                .on_connection_init(move |value: serde_json::Value| {
                    async move {
                        let mut data = async_graphql::Data::default();

                        // Extract token from connectionParams: { headers: { Authorization: "Bearer <token>" } }
                        let token = value
                            .get("headers")
                            .and_then(|h| h.get("Authorization"))
                            .and_then(|v| v.as_str())
                            .and_then(|s| s.strip_prefix("Bearer "))
                            .or_else(|| value.get("token").and_then(|v| v.as_str()));

                        if let Some(token) = token {
                            match jwt_service.verify_token(token) {
                                Ok(claims) => {
                                    data.insert(claims);
                                }
                                Err(_) => {
                                    return Err(async_graphql::Error::new(
                                        "Invalid or expired token",
                                    ));
                                }
                            }
                        }

                        Ok(data)
                    }
                })
                .serve()
        })
}

/// Liveness + quick DB probe.
async fn health(State(state): State<AppState>) -> Result<&'static str, AppError> {
    let _one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&state.db).await?;
    Ok("ok")
}
