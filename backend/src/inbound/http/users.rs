//! User directory handler.
//!
//! ```text
//! GET /api/users
//! ```

use actix_web::{get, web};
use serde_json::json;

use crate::domain::Error;
use crate::domain::ports::UserPersistenceError;
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::UserDto;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

fn map_directory_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user directory query failed: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => {
            Error::invalid_request("email already exists")
                .with_details(json!({ "field": "email", "value": email }))
        }
    }
}

/// List every registered account.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = [UserDto]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UserDto>>> {
    session.require_identity()?;
    let users = state.users.list().await.map_err(map_directory_error)?;
    Ok(web::Json(users.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test as actix_test};
    use rust_decimal_macros::dec;
    use serde_json::Value;

    use crate::domain::{Identity, Role, User, UserId};
    use crate::inbound::http::test_utils::{StateBuilder, test_session_middleware};
    use crate::domain::ports::MockUserRepository;

    fn test_app(
        state: crate::inbound::http::state::HttpState,
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
            .service(web::scope("/api").service(list_users))
            .route(
                "/seed-session",
                web::get().to(|session: SessionContext| async move {
                    session.persist_identity(Identity::new(UserId::random(), Role::Admin))?;
                    Ok::<_, Error>(actix_web::HttpResponse::Ok())
                }),
            )
    }

    #[actix_web::test]
    async fn listing_requires_a_session() {
        let app = actix_test::init_service(test_app(StateBuilder::new().build())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/users").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn listing_returns_camel_case_accounts() {
        let mut users = MockUserRepository::new();
        users.expect_list().times(1).return_once(|| {
            Ok(vec![User::new(
                "Ada",
                "ada@example.com",
                Role::Trucker,
                dec!(100.00),
            )])
        });
        let state = StateBuilder::new().users(users).build();

        let app = actix_test::init_service(test_app(state)).await;
        let seed = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/seed-session")
                .to_request(),
        )
        .await;
        let cookie = seed
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/users")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        let first = &body.as_array().expect("array")[0];
        assert_eq!(first["name"], "Ada");
        assert_eq!(first["role"], "TRUCKER");
        assert!(first.get("balance").is_some());
    }
}
