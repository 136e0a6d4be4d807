use std::any::Any;

use log::{error, warn};
use poem::{
    http::StatusCode,
    middleware::{CatchPanic, Cors, Tracing},
    web::RemoteAddr,
    Endpoint, EndpointExt, Response, Route,
};
use poem_openapi::{
    param::{Header, Query},
    payload::Json,
    registry::{MetaMediaType, MetaResponse, MetaResponses, Registry},
    types::{ToJSON, Type},
    ApiResponse, Object, OpenApi, OpenApiService,
};

use crate::{
    database::DatabaseError,
    ip::resolve_client_ip,
    lookup::{LookupError, LookupService},
    shaper::{shape, DecoratedResult},
};

pub struct Api {
    service: LookupService,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    InvalidIpAddress,
    IpAddressNotFound,
    DatabaseUnavailable,
    Unexpected,
}

#[derive(Debug, Object)]
struct ApiErrorResponse {
    error: String,
}

impl Api {
    pub fn new(service: LookupService) -> Self {
        Self { service }
    }
}

#[OpenApi]
impl Api {
    #[oai(path = "/geoip", method = "get")]
    /// Gets the geolocation of an IP address
    ///
    /// Looks up `ip` when given. Otherwise the first `X-Forwarded-For` entry or the peer
    /// address is used.
    async fn get_geoip(
        &self,
        ip: Query<Option<String>>,
        #[oai(name = "X-Forwarded-For")] forwarded_for: Header<Option<String>>,
        remote_addr: &RemoteAddr,
    ) -> Result<Json<DecoratedResult>, ApiError> {
        let ip = requested_ip(ip.0.as_deref(), forwarded_for.0.as_deref(), remote_addr);
        let record = self.service.lookup(&ip)?;

        Ok(Json(shape(&ip, &record)))
    }
}

fn requested_ip(
    query_ip: Option<&str>,
    forwarded_for: Option<&str>,
    peer: &RemoteAddr,
) -> String {
    resolve_client_ip(
        query_ip,
        forwarded_for,
        peer.as_socket_addr().map(|addr| addr.ip()),
    )
}

/// Builds the HTTP application: the lookup API plus its OpenAPI document and Swagger UI.
pub fn build_app(service: LookupService) -> impl Endpoint {
    let api_service = OpenApiService::new(Api::new(service), "geoipd", env!("CARGO_PKG_VERSION"));

    Route::new()
        .nest("/openapi", api_service.spec_endpoint())
        .nest("/swagger", api_service.swagger_ui())
        .nest("/", api_service.with(Cors::new()).with(Tracing))
        .with(
            CatchPanic::new().with_handler(|_: Box<dyn Any + Send + 'static>| {
                error!("Request handler panicked");
                ApiError::Unexpected.to_response()
            }),
        )
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidIpAddress => StatusCode::BAD_REQUEST,
            Self::IpAddressNotFound => StatusCode::NOT_FOUND,
            Self::DatabaseUnavailable | Self::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn to_response(self) -> Response {
        let status_code = self.status_code();
        let response: ApiErrorResponse = self.into();

        Response::builder()
            .status(status_code)
            .content_type("application/json")
            .body(response.to_json_string())
    }
}

impl From<LookupError> for ApiError {
    fn from(value: LookupError) -> Self {
        match value {
            LookupError::InvalidIp => Self::InvalidIpAddress,
            LookupError::IpNotFound => Self::IpAddressNotFound,
            LookupError::Database(err @ DatabaseError::Query { .. }) => {
                error!("GeoIP query failed: {}", err);
                Self::DatabaseUnavailable
            }
            LookupError::Database(err) => {
                warn!("GeoIP database unavailable: {}", err);
                Self::DatabaseUnavailable
            }
        }
    }
}

impl ApiResponse for ApiError {
    fn meta() -> MetaResponses {
        let error_response = |status: u16, description: &'static str| MetaResponse {
            description,
            status: Some(status),
            content: vec![MetaMediaType {
                content_type: "application/json",
                schema: ApiErrorResponse::schema_ref(),
            }],
            headers: vec![],
        };

        MetaResponses {
            responses: vec![
                error_response(400, "Invalid IP address provided"),
                error_response(404, "IP address not found in the database"),
                error_response(500, "GeoIP database unavailable or unexpected failure"),
            ],
        }
    }

    fn register(registry: &mut Registry) {
        <ApiErrorResponse as Type>::register(registry);
    }
}

impl From<ApiError> for poem::Error {
    fn from(value: ApiError) -> Self {
        Self::from_response(value.to_response())
    }
}

impl From<ApiError> for ApiErrorResponse {
    fn from(value: ApiError) -> Self {
        let message = match value {
            ApiError::InvalidIpAddress => "Invalid IP address provided",
            ApiError::IpAddressNotFound => "IP address not found in the database",
            ApiError::DatabaseUnavailable => "Error accessing the GeoIP database",
            ApiError::Unexpected => "An unexpected error occurred",
        };

        Self {
            error: message.into(),
        }
    }
}
