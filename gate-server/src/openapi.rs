use texas_client::{IntrospectionResponse, TokenErrorResponse, TokenSuccess};
use utoipa::OpenApi;

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const IDENTITY_TAG: &str = "Identity API";
pub(crate) const TOKEN_TAG: &str = "Token API";

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = HEALTH_TAG, description = "Liveness and readiness endpoints"),
        (name = IDENTITY_TAG, description = "Identity of the authenticated caller"),
        (name = TOKEN_TAG, description = "Token exchange and introspection endpoints"),
    ),
    paths(
        crate::api::health::is_alive,
        crate::api::health::is_ready,
        crate::api::identity::me,
        crate::api::identity::request_headers,
        crate::api::tokens::obo,
        crate::api::tokens::m2m,
        crate::api::tokens::token,
        crate::api::tokens::introspect,
        crate::api::public::public_obo,
    ),
    components(schemas(TokenSuccess, TokenErrorResponse, IntrospectionResponse)),
    info(
        title = "Gate Server API",
        description = "Token exchange demo service guarded by sidecar token introspection",
        version = "0.1.0"
    )
)]
pub(crate) struct ApiDoc;
