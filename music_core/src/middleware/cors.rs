//! CORS (Cross-Origin Resource Sharing) middleware configuration

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer as TowerCorsLayer};

use crate::config::CorsConfig;

/// Media players read these to drive seeking.
const EXPOSED_HEADERS: [header::HeaderName; 4] = [
    header::ACCEPT_RANGES,
    header::CONTENT_RANGE,
    header::CONTENT_LENGTH,
    header::CONTENT_TYPE,
];

pub fn cors_layer_from_config(config: &CorsConfig) -> TowerCorsLayer {
    let allow_origin = if config.origins.iter().any(|origin| origin == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        AllowOrigin::list(origins)
    };

    TowerCorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([header::RANGE, header::ACCEPT, header::CONTENT_TYPE])
        .expose_headers(EXPOSED_HEADERS)
        .max_age(std::time::Duration::from_secs(3600))
}
