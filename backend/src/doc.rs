//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: every endpoint of the inbound layer, the response and
//! request body schemas, and the session cookie security scheme. The
//! generated document feeds Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Role};
use crate::inbound::http::auth::{LoginRequest, SignupRequest};
use crate::inbound::http::dto::{
    CancellationResponse, LoadDto, MatchDto, ReviewDto, ReviewsResponse, SwipeResponse, UserDto,
};
use crate::inbound::http::loads::{CreateLoadRequest, UpdateStatusRequest};
use crate::inbound::http::matches::{LoadSwipeRequest, RespondRequest, SwipeRequest};
use crate::inbound::http::reviews::CreateReviewRequest;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/login or /api/auth/signup.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "FreightSwipe backend API",
        description = "Swipe-based freight matching: loads, matches, cancellation settlement, and reviews."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::users::list_users,
        crate::inbound::http::matches::swipe,
        crate::inbound::http::matches::swipe_on_load,
        crate::inbound::http::matches::list_matches,
        crate::inbound::http::matches::respond_to_match,
        crate::inbound::http::loads::create_load,
        crate::inbound::http::loads::list_loads,
        crate::inbound::http::loads::list_available_loads,
        crate::inbound::http::loads::update_load_status,
        crate::inbound::http::loads::cancel_load,
        crate::inbound::http::loads::delete_load,
        crate::inbound::http::reviews::create_review,
        crate::inbound::http::reviews::list_reviews_for_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Role,
        UserDto,
        LoadDto,
        MatchDto,
        SwipeResponse,
        CancellationResponse,
        ReviewDto,
        ReviewsResponse,
        SignupRequest,
        LoginRequest,
        SwipeRequest,
        LoadSwipeRequest,
        RespondRequest,
        CreateLoadRequest,
        UpdateStatusRequest,
        CreateReviewRequest,
    )),
    tags(
        (name = "auth", description = "Signup, login, and logout"),
        (name = "users", description = "User directory"),
        (name = "matches", description = "Swipes and match responses"),
        (name = "loads", description = "Load posting and lifecycle transitions"),
        (name = "reviews", description = "Post-completion reviews"),
        (name = "health", description = "Readiness and liveness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_endpoint_is_registered() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for expected in [
            "/api/auth/signup",
            "/api/auth/login",
            "/api/auth/logout",
            "/api/users",
            "/api/swipe",
            "/api/loads/{loadId}/swipe",
            "/api/matches",
            "/api/matches/{matchId}/respond",
            "/api/loads",
            "/api/loads/available",
            "/api/loads/{loadId}/status",
            "/api/loads/{loadId}/cancel",
            "/api/loads/{loadId}",
            "/api/reviews",
            "/api/reviews/{userId}",
            "/health/ready",
            "/health/live",
        ] {
            assert!(paths.contains_key(expected), "missing path: {expected}");
        }
    }

    #[test]
    fn the_session_cookie_scheme_is_declared() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
