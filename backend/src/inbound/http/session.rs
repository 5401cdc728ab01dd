//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! the domain identity context: the authenticated `(user id, role)` pair.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, Identity, Role, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ROLE_KEY: &str = "role";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated identity in the session cookie.
    pub fn persist_identity(&self, identity: Identity) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, identity.user_id.to_string())
            .and_then(|()| self.0.insert(ROLE_KEY, identity.role.as_str()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop the stored identity, ending the session.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Fetch the current identity from the session, if present and intact.
    pub fn identity(&self) -> Result<Option<Identity>, Error> {
        let read = |key: &str| {
            self.0
                .get::<String>(key)
                .map_err(|error| Error::internal(format!("failed to read session: {error}")))
        };
        let (Some(raw_id), Some(raw_role)) = (read(USER_ID_KEY)?, read(ROLE_KEY)?) else {
            return Ok(None);
        };
        let user_id = match raw_id.parse::<UserId>() {
            Ok(id) => id,
            Err(error) => {
                tracing::warn!("invalid user id in session cookie: {error}");
                return Ok(None);
            }
        };
        let role = match raw_role.parse::<Role>() {
            Ok(role) => role,
            Err(error) => {
                tracing::warn!("invalid role in session cookie: {error}");
                return Ok(None);
            }
        };
        Ok(Some(Identity::new(user_id, role)))
    }

    /// Require an authenticated identity or return `401 Unauthorized`.
    pub fn require_identity(&self) -> Result<Identity, Error> {
        self.identity()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_session::Session;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().wrap(crate::inbound::http::test_utils::test_session_middleware())
    }

    const FIXTURE_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    #[actix_web::test]
    async fn round_trips_the_identity() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        let id = FIXTURE_ID.parse::<UserId>().expect("fixture id");
                        session.persist_identity(Identity::new(id, Role::Trucker))?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let identity = session.require_identity()?;
                        Ok::<_, Error>(
                            HttpResponse::Ok()
                                .body(format!("{}:{}", identity.user_id, identity.role)),
                        )
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let get_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        let body = test::read_body(get_res).await;
        assert_eq!(body, format!("{FIXTURE_ID}:TRUCKER").as_bytes());
    }

    #[actix_web::test]
    async fn missing_identity_is_unauthorised() {
        let app = test::init_service(session_test_app().route(
            "/require",
            web::get().to(|session: SessionContext| async move {
                let _ = session.require_identity()?;
                Ok::<_, Error>(HttpResponse::Ok())
            }),
        ))
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/require").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn tampered_role_is_unauthorised() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set-invalid",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(USER_ID_KEY, FIXTURE_ID)
                            .expect("set user id");
                        session
                            .insert(ROLE_KEY, "DISPATCHER")
                            .expect("set invalid role");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/require",
                    web::get().to(|session: SessionContext| async move {
                        let _ = session.require_identity()?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                ),
        )
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/require")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
