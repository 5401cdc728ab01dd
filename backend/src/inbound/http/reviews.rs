//! Review ledger handlers.
//!
//! ```text
//! POST /api/reviews {"loadId":"...","rating":5,"comment":"..."}
//! GET  /api/reviews/{userId}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, LoadId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{ReviewDto, ReviewsResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_rating};

/// Review submission body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub load_id: Uuid,
    /// Stars, 1 to 5.
    #[schema(example = 5, minimum = 1, maximum = 5)]
    pub rating: i16,
    #[serde(default)]
    pub comment: String,
}

/// Review the counterparty of a completed load.
#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review recorded", body = ReviewDto),
        (status = 400, description = "Invalid request or load not completed", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Load not found", body = Error),
        (status = 409, description = "Already reviewed", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "createReview"
)]
#[post("/reviews")]
pub async fn create_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateReviewRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_identity()?;
    let payload = payload.into_inner();
    let rating = parse_rating(payload.rating, FieldName::new("rating"))?;
    let review = state
        .reviews
        .submit_review(
            actor,
            LoadId::from_uuid(payload.load_id),
            rating,
            payload.comment,
        )
        .await?;
    Ok(HttpResponse::Created().json(ReviewDto::from(review)))
}

/// List the reviews about a user with their average rating.
#[utoipa::path(
    get,
    path = "/api/reviews/{userId}",
    params(("userId" = Uuid, Path, description = "Reviewed user identifier")),
    responses(
        (status = 200, description = "Reviews and average rating", body = ReviewsResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "listReviewsForUser"
)]
#[get("/reviews/{user_id}")]
pub async fn list_reviews_for_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<ReviewsResponse>> {
    session.require_identity()?;
    let summary = state
        .reviews
        .reviews_for(&UserId::from_uuid(path.into_inner()))
        .await?;
    Ok(web::Json(summary.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test as actix_test};
    use serde_json::{Value, json};

    use crate::domain::ports::{MockReviewLedger, ReviewSummary};
    use crate::domain::{Identity, Rating, Review, Role};
    use crate::inbound::http::state::HttpState;
    use crate::inbound::http::test_utils::{StateBuilder, test_session_middleware};

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_session_middleware())
            .service(
                web::scope("/api")
                    .service(create_review)
                    .service(list_reviews_for_user),
            )
            .route(
                "/seed-session",
                web::get().to(|session: SessionContext| async move {
                    session.persist_identity(Identity::new(UserId::random(), Role::Shipper))?;
                    Ok::<_, Error>(actix_web::HttpResponse::Ok())
                }),
            )
    }

    async fn session_cookie<S>(app: &S) -> actix_web::cookie::Cookie<'static>
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = actix_web::dev::ServiceResponse,
                Error = actix_web::Error,
            >,
    {
        let res = actix_test::call_service(
            app,
            actix_test::TestRequest::get()
                .uri("/seed-session")
                .to_request(),
        )
        .await;
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned()
    }

    #[actix_web::test]
    async fn out_of_range_ratings_fail_before_the_ledger() {
        let app = actix_test::init_service(test_app(StateBuilder::new().build())).await;
        let cookie = session_cookie(&app).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/reviews")
                .cookie(cookie)
                .set_json(json!({ "loadId": Uuid::new_v4(), "rating": 6 }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "rating");
    }

    #[actix_web::test]
    async fn a_valid_review_is_created() {
        let mut ledger = MockReviewLedger::new();
        ledger
            .expect_submit_review()
            .times(1)
            .return_once(|actor, load_id, rating, comment| {
                Ok(Review::new(
                    load_id,
                    actor.user_id,
                    UserId::random(),
                    rating,
                    comment,
                ))
            });
        let state = StateBuilder::new().reviews(ledger).build();

        let app = actix_test::init_service(test_app(state)).await;
        let cookie = session_cookie(&app).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/reviews")
                .cookie(cookie)
                .set_json(json!({
                    "loadId": Uuid::new_v4(),
                    "rating": 5,
                    "comment": "prompt delivery",
                }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["rating"], 5);
        assert_eq!(body["comment"], "prompt delivery");
    }

    #[actix_web::test]
    async fn the_user_summary_includes_the_average() {
        let reviewed = UserId::random();
        let mut ledger = MockReviewLedger::new();
        ledger.expect_reviews_for().times(1).return_once(move |_| {
            Ok(ReviewSummary {
                reviews: vec![Review::new(
                    LoadId::random(),
                    UserId::random(),
                    reviewed,
                    Rating::new(4).expect("rating"),
                    "good",
                )],
                average_rating: Some(4.0),
            })
        });
        let state = StateBuilder::new().reviews(ledger).build();

        let app = actix_test::init_service(test_app(state)).await;
        let cookie = session_cookie(&app).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/reviews/{}", reviewed))
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["averageRating"], 4.0);
        assert_eq!(body["reviews"].as_array().map(Vec::len), Some(1));
    }
}
