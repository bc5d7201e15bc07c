//! HTTP routes.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;
use worldkeeper_domain::{ArchivedConversation, EngineId, InputId, PlayerId, TilePoint, WorldId};

use crate::app::App;
use crate::use_cases::lifecycle::{HeartbeatOutcome, WorldStatusView};
use crate::use_cases::world::{current_user, WorldSnapshot};
use crate::use_cases::LifecycleError;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/worlds/default/status", get(default_world_status))
        .route("/api/worlds/{id}/heartbeat", post(heartbeat))
        .route("/api/worlds/{id}/join", post(join_world))
        .route("/api/worlds/{id}/leave", post(leave_world))
        .route("/api/worlds/{id}/user", get(user_status))
        .route("/api/worlds/{id}/state", get(world_state))
        .route(
            "/api/worlds/{id}/players/{player_id}/previous-conversation",
            get(previous_conversation),
        )
        .route("/api/engines/{id}/inputs", post(send_input))
        .route("/api/engines/{id}/move", post(move_to))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Lifecycle
// =============================================================================

async fn default_world_status(
    State(app): State<Arc<App>>,
) -> Result<Json<WorldStatusView>, ApiError> {
    let view = app.use_cases.lifecycle.default_status.execute().await?;
    Ok(Json(view))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HeartbeatResponse {
    outcome: HeartbeatOutcome,
}

async fn heartbeat(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<HeartbeatResponse>, ApiError> {
    let outcome = app
        .use_cases
        .lifecycle
        .heartbeat
        .execute(WorldId::from_uuid(id))
        .await?;
    Ok(Json(HeartbeatResponse { outcome }))
}

// =============================================================================
// Input queue
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InputResponse {
    input_id: Option<InputId>,
}

async fn join_world(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<InputResponse>, ApiError> {
    let input_id = app.use_cases.input.join.execute(WorldId::from_uuid(id)).await?;
    Ok(Json(InputResponse {
        input_id: Some(input_id),
    }))
}

async fn leave_world(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<InputResponse>, ApiError> {
    let input_id = app.use_cases.input.leave.execute(WorldId::from_uuid(id)).await?;
    Ok(Json(InputResponse { input_id }))
}

#[derive(Debug, Deserialize)]
struct SendInputRequest {
    name: String,
    #[serde(default)]
    args: Value,
}

async fn send_input(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(request): Json<SendInputRequest>,
) -> Result<Json<InputResponse>, ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Input name must not be empty".into()));
    }

    let input_id = app
        .use_cases
        .input
        .send
        .execute(EngineId::from_uuid(id), &request.name, request.args)
        .await?;
    Ok(Json(InputResponse {
        input_id: Some(input_id),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveRequest {
    player_id: PlayerId,
    destination: Option<TilePoint>,
}

async fn move_to(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<InputResponse>, ApiError> {
    let input_id = app
        .use_cases
        .input
        .move_to
        .execute(EngineId::from_uuid(id), request.player_id, request.destination)
        .await?;
    Ok(Json(InputResponse {
        input_id: Some(input_id),
    }))
}

// =============================================================================
// World reads
// =============================================================================

async fn user_status(Path(_id): Path<Uuid>) -> Json<Option<&'static str>> {
    Json(Some(current_user()))
}

async fn world_state(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorldSnapshot>, ApiError> {
    let snapshot = app
        .use_cases
        .world
        .state
        .execute(WorldId::from_uuid(id))
        .await?;
    Ok(Json(snapshot))
}

async fn previous_conversation(
    State(app): State<Arc<App>>,
    Path((id, player_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Option<ArchivedConversation>>, ApiError> {
    let conversation = app
        .use_cases
        .history
        .execute(WorldId::from_uuid(id), PlayerId::from_uuid(player_id))
        .await?;
    Ok(Json(conversation))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound(msg) => (axum::http::StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::BadRequest(msg) => {
                (axum::http::StatusCode::BAD_REQUEST, msg).into_response()
            }
            ApiError::Internal(_) => (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error",
            )
                .into_response(),
        }
    }
}

impl From<LifecycleError> for ApiError {
    fn from(e: LifecycleError) -> Self {
        match e {
            LifecycleError::NoDefaultWorld | LifecycleError::UnknownWorld(_) => {
                ApiError::NotFound(e.to_string())
            }
            e if e.is_integrity_violation() => {
                tracing::error!(error = %e, "Data integrity violation");
                ApiError::Internal(e.to_string())
            }
            e => {
                tracing::warn!(error = %e, "Request failed");
                ApiError::Internal(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LifecycleConfig;
    use crate::infrastructure::clock::{FixedClock, FixedRandom};
    use crate::infrastructure::ports::{EngineRepo, InputRepo, WorldRepo, WorldStatusRepo};
    use crate::infrastructure::sqlite::{open_in_memory, SqliteRepositories};
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;
    use tower::ServiceExt;
    use worldkeeper_domain::{Engine, World, WorldStatus, WorldStatusKind};

    struct TestApp {
        router: Router,
        repos: SqliteRepositories,
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    async fn test_app() -> TestApp {
        let pool = open_in_memory().await.expect("open db");
        let app = Arc::new(App::with_ports(
            SqliteRepositories::new(pool.clone()).into(),
            LifecycleConfig::default(),
            Arc::new(FixedClock(now())),
            Arc::new(FixedRandom(0)),
        ));
        TestApp {
            router: routes().with_state(app),
            repos: SqliteRepositories::new(pool),
        }
    }

    async fn seed_world(repos: &SqliteRepositories, status: WorldStatusKind) -> WorldStatus {
        let world = World::new(WorldId::new());
        repos.world.save(&world).await.unwrap();
        let engine = Engine {
            running: status == WorldStatusKind::Running,
            current_time: Some(now()),
            ..Engine::new(EngineId::new())
        };
        repos.engine.save(&engine).await.unwrap();
        let world_status = WorldStatus::new(world.id, engine.id)
            .as_default()
            .with_status(status);
        repos.world_status.insert(&world_status).await.unwrap();
        world_status
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn health_is_ok() {
        let test_app = test_app().await;
        let (status, _) = send(&test_app.router, Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn default_status_without_default_world_is_not_found() {
        let test_app = test_app().await;
        let (status, _) =
            send(&test_app.router, Method::GET, "/api/worlds/default/status", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn default_status_fills_write_once_fields() {
        let test_app = test_app().await;
        let world = seed_world(&test_app.repos, WorldStatusKind::Running).await;

        let (status, body) =
            send(&test_app.router, Method::GET, "/api/worlds/default/status", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["worldId"], world.world_id.to_string());
        assert_eq!(body["status"], "running");
        assert_eq!(body["creatures"], 5);
        assert_eq!(body["serverStartMs"], now().timestamp_millis());
        assert_eq!(body["elapsedMs"], 0);
        assert_eq!(body["breathValues"].as_array().map(Vec::len), Some(20));
        assert_eq!(body["serverNowMs"], now().timestamp_millis());

        let stored = test_app
            .repos
            .world_status
            .get_by_world(world.world_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(body["seed"], json!(stored.seed));
    }

    #[tokio::test]
    async fn heartbeat_restarts_inactive_world() {
        let test_app = test_app().await;
        let world = seed_world(&test_app.repos, WorldStatusKind::Inactive).await;

        let (status, body) = send(
            &test_app.router,
            Method::POST,
            &format!("/api/worlds/{}/heartbeat", world.world_id),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "restarted");
        let stored = test_app
            .repos
            .world_status
            .get_by_world(world.world_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, WorldStatusKind::Running);
        assert_eq!(stored.last_viewed, Some(now()));
        let engine = test_app.repos.engine.get(world.engine_id).await.unwrap().unwrap();
        assert!(engine.running);
    }

    #[tokio::test]
    async fn heartbeat_on_unknown_world_is_not_found() {
        let test_app = test_app().await;
        let (status, _) = send(
            &test_app.router,
            Method::POST,
            &format!("/api/worlds/{}/heartbeat", WorldId::new()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn join_queues_input_and_leave_without_roster_entry_does_not() {
        let test_app = test_app().await;
        let world = seed_world(&test_app.repos, WorldStatusKind::Running).await;

        let (status, body) = send(
            &test_app.router,
            Method::POST,
            &format!("/api/worlds/{}/join", world.world_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["inputId"].is_string());

        let (status, body) = send(
            &test_app.router,
            Method::POST,
            &format!("/api/worlds/{}/leave", world.world_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["inputId"].is_null());

        let pending = test_app.repos.input.list_pending(world.engine_id).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "join");
        assert_eq!(pending[0].args["character"], "f1");
    }

    #[tokio::test]
    async fn engine_inputs_are_queued_in_order() {
        let test_app = test_app().await;
        let world = seed_world(&test_app.repos, WorldStatusKind::Running).await;
        let player_id = PlayerId::new();

        let (status, _) = send(
            &test_app.router,
            Method::POST,
            &format!("/api/engines/{}/move", world.engine_id),
            Some(json!({ "playerId": player_id, "destination": { "x": 3, "y": 4 } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &test_app.router,
            Method::POST,
            &format!("/api/engines/{}/inputs", world.engine_id),
            Some(json!({ "name": "finishRememberConversation", "args": { "agentId": "a1" } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let pending = test_app.repos.input.list_pending(world.engine_id).await.unwrap();
        let names: Vec<&str> = pending.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["moveTo", "finishRememberConversation"]);
        assert_eq!(pending[0].args["destination"], json!({ "x": 3, "y": 4 }));
    }

    #[tokio::test]
    async fn empty_input_name_is_rejected() {
        let test_app = test_app().await;
        let world = seed_world(&test_app.repos, WorldStatusKind::Running).await;

        let (status, _) = send(
            &test_app.router,
            Method::POST,
            &format!("/api/engines/{}/inputs", world.engine_id),
            Some(json!({ "name": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn user_and_world_state_reads() {
        let test_app = test_app().await;
        let world = seed_world(&test_app.repos, WorldStatusKind::Running).await;

        let (status, body) = send(
            &test_app.router,
            Method::GET,
            &format!("/api/worlds/{}/user", world.world_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("Me"));

        let (status, body) = send(
            &test_app.router,
            Method::GET,
            &format!("/api/worlds/{}/state", world.world_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["engine"]["id"], world.engine_id.to_string());
        assert_eq!(body["status"]["status"], "running");
    }

    #[tokio::test]
    async fn previous_conversation_without_history_is_null() {
        let test_app = test_app().await;
        let world = seed_world(&test_app.repos, WorldStatusKind::Running).await;

        let (status, body) = send(
            &test_app.router,
            Method::GET,
            &format!(
                "/api/worlds/{}/players/{}/previous-conversation",
                world.world_id,
                PlayerId::new()
            ),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_null());
    }
}
