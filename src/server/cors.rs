//! Cross-origin policy built from the `[cors]` section.

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::config::{ConfigError, CorsConfig};

/// Build the CORS layer for `config`.
///
/// A disabled policy yields a layer that adds no CORS headers, so browsers
/// refuse cross-origin reads. Entries that are not valid origins, methods or
/// header names are rejected rather than dropped, and so is a wildcard
/// origin combined with credentials, which tower-http refuses at startup.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, ConfigError> {
    if !config.enabled {
        return Ok(CorsLayer::new());
    }

    let any_origin = config.allow_origins.iter().any(|o| o == "*");
    if any_origin && config.allow_credentials {
        return Err(ConfigError::Invalid(
            "cors.allow_credentials requires explicit cors.allow_origins, not \"*\"".to_string(),
        ));
    }

    let origin = if any_origin {
        AllowOrigin::from(Any)
    } else {
        let origins = config
            .allow_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).map_err(|_| invalid("cors.allow_origins", o))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    let methods = config
        .allow_methods
        .iter()
        .map(|m| Method::from_bytes(m.as_bytes()).map_err(|_| invalid("cors.allow_methods", m)))
        .collect::<Result<Vec<_>, _>>()?;

    let headers = config
        .allow_headers
        .iter()
        .map(|h| HeaderName::from_bytes(h.as_bytes()).map_err(|_| invalid("cors.allow_headers", h)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(config.allow_credentials)
        .max_age(Duration::from_secs(config.max_age)))
}

fn invalid(field: &str, value: &str) -> ConfigError {
    ConfigError::Invalid(format!("{} entry {:?} is not valid", field, value))
}
