//! Matching engine handlers.
//!
//! ```text
//! POST /api/swipe {"targetUserId":"...","direction":"right"}
//! POST /api/loads/{loadId}/swipe {"direction":"right"}
//! GET  /api/matches
//! POST /api/matches/{matchId}/respond {"decision":"accept"}
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::MatchDecision;
use crate::domain::{Error, LoadId, MatchId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{MatchDto, SwipeResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_direction};

/// Person-to-person swipe request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwipeRequest {
    pub target_user_id: Uuid,
    /// `right` to accept, `left` to decline.
    #[schema(example = "right")]
    pub direction: String,
}

/// Load swipe request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoadSwipeRequest {
    /// `right` to accept, `left` to decline.
    #[schema(example = "right")]
    pub direction: String,
}

/// Shipper decision request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RespondRequest {
    /// `accept` or `reject`.
    #[schema(example = "accept")]
    pub decision: String,
}

fn parse_decision(value: &str) -> Result<MatchDecision, Error> {
    match value {
        "accept" => Ok(MatchDecision::Accept),
        "reject" => Ok(MatchDecision::Reject),
        other => Err(
            Error::invalid_request("decision must be \"accept\" or \"reject\"")
                .with_details(json!({ "field": "decision", "value": other })),
        ),
    }
}

/// Swipe on another user.
#[utoipa::path(
    post,
    path = "/api/swipe",
    request_body = SwipeRequest,
    responses(
        (status = 200, description = "Swipe recorded", body = SwipeResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Concurrent decision", body = Error)
    ),
    tags = ["matches"],
    operation_id = "swipe"
)]
#[post("/swipe")]
pub async fn swipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SwipeRequest>,
) -> ApiResult<web::Json<SwipeResponse>> {
    let actor = session.require_identity()?;
    let payload = payload.into_inner();
    let direction = parse_direction(&payload.direction, FieldName::new("direction"))?;
    let outcome = state
        .matching
        .swipe(actor, UserId::from_uuid(payload.target_user_id), direction)
        .await?;
    Ok(web::Json(outcome.into()))
}

/// Swipe on a load; truckers only.
#[utoipa::path(
    post,
    path = "/api/loads/{loadId}/swipe",
    params(("loadId" = Uuid, Path, description = "Load identifier")),
    request_body = LoadSwipeRequest,
    responses(
        (status = 200, description = "Swipe recorded", body = MatchDto),
        (status = 400, description = "Invalid request or decided match", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Load not found", body = Error),
        (status = 409, description = "Concurrent decision", body = Error)
    ),
    tags = ["matches"],
    operation_id = "swipeOnLoad"
)]
#[post("/loads/{load_id}/swipe")]
pub async fn swipe_on_load(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<LoadSwipeRequest>,
) -> ApiResult<web::Json<MatchDto>> {
    let actor = session.require_identity()?;
    let direction = parse_direction(&payload.direction, FieldName::new("direction"))?;
    let record = state
        .matching
        .swipe_on_load(actor, LoadId::from_uuid(path.into_inner()), direction)
        .await?;
    Ok(web::Json(record.into()))
}

/// List the matches visible to the caller.
#[utoipa::path(
    get,
    path = "/api/matches",
    responses(
        (status = 200, description = "Matches visible to the caller", body = [MatchDto]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["matches"],
    operation_id = "listMatches"
)]
#[get("/matches")]
pub async fn list_matches(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<MatchDto>>> {
    let actor = session.require_identity()?;
    let matches = state.matching.matches_for(actor).await?;
    Ok(web::Json(matches.into_iter().map(Into::into).collect()))
}

/// Respond to a pending match; shippers only.
#[utoipa::path(
    post,
    path = "/api/matches/{matchId}/respond",
    params(("matchId" = Uuid, Path, description = "Match identifier")),
    request_body = RespondRequest,
    responses(
        (status = 200, description = "Decided match", body = MatchDto),
        (status = 400, description = "Invalid request or non-pending match", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Match not found", body = Error),
        (status = 409, description = "Concurrent decision", body = Error)
    ),
    tags = ["matches"],
    operation_id = "respondToMatch"
)]
#[post("/matches/{match_id}/respond")]
pub async fn respond_to_match(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<RespondRequest>,
) -> ApiResult<web::Json<MatchDto>> {
    let actor = session.require_identity()?;
    let decision = parse_decision(&payload.decision)?;
    let record = state
        .matching
        .respond_to_match(actor, MatchId::from_uuid(path.into_inner()), decision)
        .await?;
    Ok(web::Json(record.into()))
}
