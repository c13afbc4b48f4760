//! HTTP surface.
//!
//! | Method & path | Operation |
//! |---------------|-----------|
//! | `GET /voting?requestor=` | list polls |
//! | `GET /voting/:id` | poll detail |
//! | `POST /voting` | create poll |
//! | `POST /vote` | cast ballot |
//! | `POST /user-data` | identity profile |
//! | `GET /health` | liveness |
//! | `GET /metrics` | Prometheus text |
//!
//! Errors are returned as `{ "status", "code", "message" }` with a stable
//! `code` clients can branch on.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{OptionIndex, PollId};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, warn};
use tv_voting_engine::{
    CastBallot, CastReceipt, PollDetail, PollDraft, PollSummary, RejectionReason, ReportingApi,
    UserProfile, ValidationError, VotingApi, VotingError,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub voting: Arc<dyn VotingApi>,
    pub reporting: Arc<dyn ReportingApi>,
}

/// Build the HTTP router.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .route("/voting", get(list_polls).post(create_poll))
        .route("/voting/:id", get(get_poll))
        .route("/vote", post(cast_vote))
        .route("/user-data", post(user_data))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .layer(middleware)
        .with_state(state)
}

// =============================================================================
// REQUEST / RESPONSE BODIES
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub requestor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateVotingRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_private: bool,
    pub min_votes: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub options: Vec<String>,
    pub creator_address: String,
}

impl From<CreateVotingRequest> for PollDraft {
    fn from(req: CreateVotingRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            creator: req.creator_address,
            is_private: req.is_private,
            options: req.options,
            start_time: req.start_date,
            end_time: req.end_date,
            min_votes: req.min_votes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateVotingResponse {
    pub voting_id: PollId,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub voting_id: String,
    pub user_address: String,
    pub selected_option_index: OptionIndex,
}

#[derive(Debug, Deserialize)]
pub struct UserDataRequest {
    pub user_address: String,
}

/// Error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub code: String,
    pub message: String,
}

/// Engine error rendered as an HTTP response.
pub struct ApiError(pub VotingError);

impl From<VotingError> for ApiError {
    fn from(err: VotingError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            VotingError::Validation(_) => StatusCode::BAD_REQUEST,
            VotingError::NotFound { .. } => StatusCode::NOT_FOUND,
            VotingError::Rejected(RejectionReason::AlreadyVoted) => StatusCode::CONFLICT,
            VotingError::Rejected(RejectionReason::NotActive { .. }) => StatusCode::FORBIDDEN,
            VotingError::Rejected(RejectionReason::InvalidOption { .. }) => {
                StatusCode::BAD_REQUEST
            }
            VotingError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.0.code(), error = %self.0, "Request failed");
        }
        let body = ErrorBody {
            status: status.as_u16(),
            code: self.0.code().to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

fn parse_poll_id(raw: &str) -> ApiResult<PollId> {
    raw.parse::<PollId>()
        .map_err(|e| ApiError(VotingError::Validation(ValidationError::from(e))))
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn list_polls(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<PollSummary>>> {
    let polls = state.voting.list_polls(query.requestor.as_deref()).await?;
    Ok(Json(polls))
}

async fn get_poll(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PollDetail>> {
    let poll_id = parse_poll_id(&id)?;
    Ok(Json(state.voting.get_poll(poll_id).await?))
}

async fn create_poll(
    State(state): State<AppState>,
    Json(request): Json<CreateVotingRequest>,
) -> ApiResult<(StatusCode, Json<CreateVotingResponse>)> {
    let voting_id = state.voting.create_poll(request.into()).await?;
    Ok((StatusCode::CREATED, Json(CreateVotingResponse { voting_id })))
}

async fn cast_vote(
    State(state): State<AppState>,
    Json(request): Json<VoteRequest>,
) -> ApiResult<Json<CastReceipt>> {
    let poll_id = parse_poll_id(&request.voting_id)?;
    let receipt = state
        .voting
        .cast_vote(CastBallot {
            poll_id,
            voter: request.user_address,
            option_index: request.selected_option_index,
        })
        .await?;
    Ok(Json(receipt))
}

async fn user_data(
    State(state): State<AppState>,
    Json(request): Json<UserDataRequest>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(state.reporting.user_history(&request.user_address).await?))
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "tv-node",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn metrics() -> Response {
    match tv_telemetry::encode_metrics() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
