//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::DirectoryLoginService;
use crate::domain::{LoadLifecycleService, MatchingService, ReviewService};
use crate::inbound::http::auth::{login, logout, signup};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::loads::{
    cancel_load, create_load, delete_load, list_available_loads, list_loads, update_load_status,
};
use crate::inbound::http::matches::{list_matches, respond_to_match, swipe, swipe_on_load};
use crate::inbound::http::reviews::{create_review, list_reviews_for_user};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::list_users;
use crate::middleware::Trace;
use crate::outbound::persistence::{
    DbPool, DieselCancellationGateway, DieselLoadRepository, DieselMatchRepository,
    DieselReviewRepository, DieselUserRepository,
};

/// Wire the domain services over their Diesel adapters.
fn build_http_state(pool: &DbPool) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let loads = Arc::new(DieselLoadRepository::new(pool.clone()));
    let matches = Arc::new(DieselMatchRepository::new(pool.clone()));
    let reviews = Arc::new(DieselReviewRepository::new(pool.clone()));
    let settlement = Arc::new(DieselCancellationGateway::new(pool.clone()));

    let matching = Arc::new(MatchingService::new(matches.clone(), loads.clone()));
    let lifecycle = Arc::new(LoadLifecycleService::new(
        loads.clone(),
        matches.clone(),
        users.clone(),
        settlement,
        Arc::new(DefaultClock),
    ));
    let ledger = Arc::new(ReviewService::new(loads, matches, reviews));
    let directory: Arc<dyn crate::domain::ports::UserRepository> = users;
    let login_service = Arc::new(DirectoryLoginService::new(directory.clone()));

    HttpState::new(matching, lifecycle, ledger, login_service, directory)
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api")
        .wrap(session)
        .service(signup)
        .service(login)
        .service(logout)
        .service(list_users)
        .service(swipe)
        .service(list_matches)
        .service(respond_to_match)
        .service(create_load)
        .service(list_loads)
        .service(list_available_loads)
        .service(swipe_on_load)
        .service(update_load_status)
        .service(cancel_load)
        .service(delete_load)
        .service(create_review)
        .service(list_reviews_for_user);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool,
    } = config;

    let http_state = web::Data::new(build_http_state(&db_pool));

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
