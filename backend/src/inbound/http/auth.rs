//! Account signup and session establishment.
//!
//! ```text
//! POST /api/auth/signup {"name":"Pat","email":"pat@example.com","password":"...","role":"SHIPPER"}
//! POST /api/auth/login  {"email":"pat@example.com","password":"..."}
//! POST /api/auth/logout
//! ```
//!
//! Credential verification sits behind the `LoginService` port; this
//! adapter only provisions directory accounts and persists the resolved
//! identity in the session cookie.

use actix_web::{HttpResponse, post, web};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::{LoginError, UserPersistenceError};
use crate::domain::{Error, Identity, Role, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::UserDto;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Balance granted to every new account.
pub const STARTING_BALANCE: Decimal = dec!(100.00);

/// Signup request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    /// Forwarded to the identity provider; never stored here.
    pub password: String,
    pub role: Role,
}

/// Login request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

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

fn map_login_error(error: LoginError) -> Error {
    match error {
        LoginError::InvalidCredentials => Error::unauthorized("invalid credentials"),
        LoginError::Unavailable { message } => {
            Error::service_unavailable(format!("identity provider unavailable: {message}"))
        }
    }
}

/// Create an account and establish a session for it.
///
/// Admin accounts are provisioned out of band; signup only issues the two
/// party roles.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = UserDto),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Directory unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    if payload.role == Role::Admin {
        return Err(Error::forbidden("admin accounts cannot be self-registered"));
    }
    if payload.name.trim().is_empty() {
        return Err(Error::invalid_request("name must not be empty")
            .with_details(json!({ "field": "name" })));
    }
    if !payload.email.contains('@') {
        return Err(Error::invalid_request("email must be a valid address")
            .with_details(json!({ "field": "email" })));
    }

    let user = User::new(
        payload.name.trim(),
        payload.email.trim().to_lowercase(),
        payload.role,
        STARTING_BALANCE,
    );
    state
        .users
        .insert(&user)
        .await
        .map_err(map_directory_error)?;

    session.persist_identity(Identity::new(user.id, user.role))?;
    Ok(HttpResponse::Created().json(UserDto::from(user)))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserDto,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Identity provider unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let authenticated = state
        .login
        .authenticate(&payload.email, &payload.password)
        .await
        .map_err(map_login_error)?;

    session.persist_identity(Identity::new(authenticated.user_id, authenticated.role))?;

    let user = state
        .users
        .find_by_id(&authenticated.user_id)
        .await
        .map_err(map_directory_error)?
        .ok_or_else(|| Error::unauthorized("invalid credentials"))?;
    Ok(HttpResponse::Ok().json(UserDto::from(user)))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 204, description = "Session ended")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test as actix_test};
    use serde_json::Value;

    use crate::domain::UserId;
    use crate::domain::ports::{AuthenticatedUser, MockLoginService, MockUserRepository};
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
                    .service(signup)
                    .service(login)
                    .service(logout),
            )
    }

    fn signup_body(role: &str) -> Value {
        json!({
            "name": "Pat",
            "email": "pat@example.com",
            "password": "hunter2",
            "role": role,
        })
    }

    #[actix_web::test]
    async fn signup_creates_the_account_and_the_session() {
        let mut users = MockUserRepository::new();
        users.expect_insert().times(1).return_once(|_| Ok(()));
        let state = StateBuilder::new().users(users).build();

        let app = actix_test::init_service(test_app(state)).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/signup")
                .set_json(signup_body("TRUCKER"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        assert!(
            res.response()
                .cookies()
                .any(|cookie| cookie.name() == "session")
        );
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["role"], "TRUCKER");
        assert_eq!(body["balance"], "100.00");
    }

    #[actix_web::test]
    async fn signup_rejects_admin_roles() {
        let app = actix_test::init_service(test_app(StateBuilder::new().build())).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/signup")
                .set_json(signup_body("ADMIN"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn signup_surfaces_duplicate_emails() {
        let mut users = MockUserRepository::new();
        users.expect_insert().times(1).return_once(|_| {
            Err(UserPersistenceError::duplicate_email(
                "pat@example.com".to_owned(),
            ))
        });
        let state = StateBuilder::new().users(users).build();

        let app = actix_test::init_service(test_app(state)).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/signup")
                .set_json(signup_body("SHIPPER"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["message"], "email already exists");
    }

    #[actix_web::test]
    async fn login_rejects_wrong_credentials_with_unauthorised_status() {
        let mut login_service = MockLoginService::new();
        login_service
            .expect_authenticate()
            .times(1)
            .return_once(|_, _| Err(LoginError::invalid_credentials()));
        let state = StateBuilder::new().login(login_service).build();

        let app = actix_test::init_service(test_app(state)).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({ "email": "pat@example.com", "password": "wrong" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn login_returns_the_account_and_sets_the_cookie() {
        let user_id = UserId::random();
        let account = User {
            id: user_id,
            ..User::new("Pat", "pat@example.com", Role::Shipper, STARTING_BALANCE)
        };

        let mut login_service = MockLoginService::new();
        login_service
            .expect_authenticate()
            .times(1)
            .return_once(move |_, _| {
                Ok(AuthenticatedUser {
                    user_id,
                    role: Role::Shipper,
                    name: "Pat".to_owned(),
                })
            });
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(account)));
        let state = StateBuilder::new().login(login_service).users(users).build();

        let app = actix_test::init_service(test_app(state)).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({ "email": "pat@example.com", "password": "hunter2" }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(
            res.response()
                .cookies()
                .any(|cookie| cookie.name() == "session")
        );
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["email"], "pat@example.com");
    }
}
