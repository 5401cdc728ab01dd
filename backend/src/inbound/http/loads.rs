//! Load lifecycle handlers.
//!
//! ```text
//! POST   /api/loads
//! GET    /api/loads
//! GET    /api/loads/available
//! PUT    /api/loads/{loadId}/status {"status":"IN_TRANSIT"}
//! POST   /api/loads/{loadId}/cancel
//! DELETE /api/loads/{loadId}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Address, Error, LoadDraft, LoadId, LoadStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{CancellationResponse, LoadDto};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Load creation request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoadRequest {
    pub origin: String,
    pub destination: String,
    #[schema(example = "1200")]
    pub weight: Decimal,
    #[schema(example = "850.00")]
    pub budget: Decimal,
    /// ISO date, `YYYY-MM-DD`.
    pub deadline: NaiveDate,
    #[serde(default)]
    pub description: String,
}

/// Status transition request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateStatusRequest {
    /// Requested target status: `IN_TRANSIT` or `COMPLETED`.
    pub status: String,
}

fn address_field(raw: String, field: &'static str) -> Result<Address, Error> {
    Address::new(raw).map_err(|error| {
        Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
    })
}

/// Post a new load.
#[utoipa::path(
    post,
    path = "/api/loads",
    request_body = CreateLoadRequest,
    responses(
        (status = 201, description = "Load created", body = LoadDto),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["loads"],
    operation_id = "createLoad"
)]
#[post("/loads")]
pub async fn create_load(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateLoadRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_identity()?;
    let payload = payload.into_inner();
    let draft = LoadDraft {
        origin: address_field(payload.origin, "origin")?,
        destination: address_field(payload.destination, "destination")?,
        weight: payload.weight,
        budget: payload.budget,
        deadline: payload.deadline,
        description: payload.description,
    };
    let load = state.lifecycle.create_load(actor, draft).await?;
    Ok(HttpResponse::Created().json(LoadDto::from(load)))
}

/// List the caller's own loads.
#[utoipa::path(
    get,
    path = "/api/loads",
    responses(
        (status = 200, description = "Loads owned by the caller", body = [LoadDto]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["loads"],
    operation_id = "listLoads"
)]
#[get("/loads")]
pub async fn list_loads(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<LoadDto>>> {
    let actor = session.require_identity()?;
    let loads = state.lifecycle.loads_for_shipper(actor).await?;
    Ok(web::Json(loads.into_iter().map(Into::into).collect()))
}

/// List `PENDING` loads the calling trucker has not swiped on yet.
#[utoipa::path(
    get,
    path = "/api/loads/available",
    responses(
        (status = 200, description = "Loads open to the caller", body = [LoadDto]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["loads"],
    operation_id = "listAvailableLoads"
)]
#[get("/loads/available")]
pub async fn list_available_loads(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<LoadDto>>> {
    let actor = session.require_identity()?;
    let loads = state.lifecycle.available_loads(actor).await?;
    Ok(web::Json(loads.into_iter().map(Into::into).collect()))
}

/// Drive a load forward: confirm transit or mark completion.
///
/// `IN_TRANSIT` records the caller's confirmation; the load only advances
/// once both parties have confirmed. `COMPLETED` closes the load and is
/// the shipper's alone. Every other status is managed by the engine and
/// cannot be set directly.
#[utoipa::path(
    put,
    path = "/api/loads/{loadId}/status",
    params(("loadId" = Uuid, Path, description = "Load identifier")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated load", body = LoadDto),
        (status = 400, description = "Invalid request or illegal transition", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Load not found", body = Error),
        (status = 409, description = "Concurrent update", body = Error)
    ),
    tags = ["loads"],
    operation_id = "updateLoadStatus"
)]
#[put("/loads/{load_id}/status")]
pub async fn update_load_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateStatusRequest>,
) -> ApiResult<web::Json<LoadDto>> {
    let actor = session.require_identity()?;
    let load_id = LoadId::from_uuid(path.into_inner());
    let requested = payload.into_inner().status;

    let load = match requested.parse::<LoadStatus>() {
        Ok(LoadStatus::InTransit) => state.lifecycle.request_transit(actor, load_id).await?,
        Ok(LoadStatus::Completed) => state.lifecycle.complete_load(actor, load_id).await?,
        Ok(other) => {
            return Err(Error::invalid_request(format!(
                "status {other} cannot be set directly"
            ))
            .with_details(json!({ "field": "status", "value": requested })));
        }
        Err(_) => {
            return Err(
                Error::invalid_request("status must be IN_TRANSIT or COMPLETED")
                    .with_details(json!({ "field": "status", "value": requested })),
            );
        }
    };
    Ok(web::Json(load.into()))
}

/// Cancel a `MATCHED` load, paying the cancellation fee.
#[utoipa::path(
    post,
    path = "/api/loads/{loadId}/cancel",
    params(("loadId" = Uuid, Path, description = "Load identifier")),
    responses(
        (status = 200, description = "Cancelled load and remaining balance", body = CancellationResponse),
        (status = 400, description = "Illegal transition or insufficient funds", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Load not found", body = Error),
        (status = 409, description = "Concurrent update", body = Error)
    ),
    tags = ["loads"],
    operation_id = "cancelLoad"
)]
#[post("/loads/{load_id}/cancel")]
pub async fn cancel_load(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<CancellationResponse>> {
    let actor = session.require_identity()?;
    let load_id = LoadId::from_uuid(path.into_inner());
    let receipt = state.lifecycle.cancel_load(actor, load_id).await?;
    Ok(web::Json(receipt.into()))
}

/// Delete a `PENDING` load.
#[utoipa::path(
    delete,
    path = "/api/loads/{loadId}",
    params(("loadId" = Uuid, Path, description = "Load identifier")),
    responses(
        (status = 204, description = "Load deleted"),
        (status = 400, description = "Load is no longer pending", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Load not found", body = Error)
    ),
    tags = ["loads"],
    operation_id = "deleteLoad"
)]
#[delete("/loads/{load_id}")]
pub async fn delete_load(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_identity()?;
    let load_id = LoadId::from_uuid(path.into_inner());
    state.lifecycle.delete_load(actor, load_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
