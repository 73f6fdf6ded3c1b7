use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use shared::api::{
    BidOutcomeResponse, BidResponse, CreateProjectRequest, ListBidsResponse,
    ListProjectsResponse, PlaceBidRequest, ProjectResponse,
};
use shared::models::{BidAction, BidStatus, Role};

use crate::auth::types::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

// Project handlers

pub async fn create_project(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<ProjectResponse>)> {
    payload.validate()?;

    if user.role == Role::Freelancer {
        return Err(ApiError::Forbidden(
            "Only clients can post projects".to_string(),
        ));
    }

    let project = state.store.create_project(&payload.title, &user.email).await;
    tracing::info!("Project {} posted by {}", project.id, user.email);

    Ok((StatusCode::CREATED, Json(ProjectResponse { project })))
}

pub async fn list_projects(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthUser>,
) -> ApiResult<Json<ListProjectsResponse>> {
    let projects = state.store.list_projects().await;
    let total = projects.len();

    Ok(Json(ListProjectsResponse { projects, total }))
}

// Bid handlers

pub async fn place_bid(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<PlaceBidRequest>,
) -> ApiResult<(StatusCode, Json<BidResponse>)> {
    payload.validate()?;

    if user.role == Role::Client {
        return Err(ApiError::Forbidden(
            "Only freelancers can place bids".to_string(),
        ));
    }

    let bid = state
        .store
        .place_bid(project_id, &user.email, payload.amount_cents, payload.message)
        .await?;
    tracing::info!("Bid {} placed on project {}", bid.id, project_id);

    Ok((StatusCode::CREATED, Json(BidResponse { bid })))
}

pub async fn list_bids(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthUser>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<ListBidsResponse>> {
    let bids = state.store.list_bids(project_id).await?;
    let total = bids.len();

    Ok(Json(ListBidsResponse { bids, total }))
}

/// Confirmation-link endpoint: accept the bid.
pub async fn confirm_bid(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((project_id, bid_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<BidOutcomeResponse>> {
    respond_to_bid(&state, &user, project_id, bid_id, BidAction::Confirm).await
}

/// Confirmation-link endpoint: decline the bid.
pub async fn decline_bid(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((project_id, bid_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<BidOutcomeResponse>> {
    respond_to_bid(&state, &user, project_id, bid_id, BidAction::Decline).await
}

async fn respond_to_bid(
    state: &AppState,
    user: &AuthUser,
    project_id: Uuid,
    bid_id: Uuid,
    action: BidAction,
) -> ApiResult<Json<BidOutcomeResponse>> {
    let bid = state
        .store
        .decide_bid(project_id, bid_id, action, &user.email)
        .await?;

    let message = match bid.status {
        BidStatus::Confirmed => "Bid confirmed",
        BidStatus::Declined => "Bid declined",
        BidStatus::Submitted => {
            return Err(ApiError::Internal(anyhow::anyhow!(
                "bid {} left undecided",
                bid.id
            )))
        }
    };

    tracing::info!("Bid {} on project {}: {}", bid_id, project_id, message);

    Ok(Json(BidOutcomeResponse {
        message: message.to_string(),
    }))
}
