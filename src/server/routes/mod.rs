//! API routes and handlers.

mod dashboard;
mod hosts;

use axum::{
    Router,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;

use super::{
    content::{AcceptFormat, ContentFormat, FormatResponse},
    error::ApiError,
    state::AppState,
};

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api", get(api_index))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/hosts", get(hosts::list_hosts))
        .route("/hosts/{host}", get(hosts::list_timestamps))
        .route("/hosts/{host}/latest", get(hosts::latest))
        .route("/hosts/{host}/dates/{date}", get(hosts::get_exact))
        .route("/hosts/{host}/on/{date}", get(hosts::get_nearest))
        .route("/hosts/{host}/diff/{from}/{to}", get(hosts::diff))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// A documented route.
#[derive(Debug, Serialize)]
struct Endpoint {
    path: &'static str,
    description: &'static str,
}

const ENDPOINTS: &[Endpoint] = &[
    Endpoint {
        path: "/dashboard",
        description: "every host with the age of its latest snapshot",
    },
    Endpoint {
        path: "/hosts",
        description: "all host names",
    },
    Endpoint {
        path: "/hosts/{host}",
        description: "snapshot timestamps of a host, newest first",
    },
    Endpoint {
        path: "/hosts/{host}/latest",
        description: "most recent snapshot of a host",
    },
    Endpoint {
        path: "/hosts/{host}/dates/{date}",
        description: "snapshot taken exactly at date",
    },
    Endpoint {
        path: "/hosts/{host}/on/{date}",
        description: "latest snapshot taken at or before date",
    },
    Endpoint {
        path: "/hosts/{host}/diff/{from}/{to}",
        description: "line diff between two exact snapshots",
    },
    Endpoint {
        path: "/health",
        description: "liveness check",
    },
];

/// Route index. Dates use the form `YYYY-MM-DDTHH:MM:SSZ`.
async fn api_index(AcceptFormat(format): AcceptFormat) -> Result<Response, ApiError> {
    render(format, &ENDPOINTS, |endpoints| {
        let width = endpoints.iter().map(|e| e.path.len()).max().unwrap_or(0);
        endpoints
            .iter()
            .map(|e| format!("GET {:<width$}  {}\n", e.path, e.description))
            .collect()
    })
}

async fn root() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/dashboard")]).into_response()
}

/// Serialize `value` as JSON, or render it with `text` for plain text clients.
fn render<T: Serialize>(
    format: ContentFormat,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<Response, ApiError> {
    match format {
        ContentFormat::Json => Ok(FormatResponse::json(value)?.into_response()),
        ContentFormat::Text => Ok(FormatResponse::text(text(value)).into_response()),
    }
}

/// One item per line, each terminated by a newline.
fn lines<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: std::fmt::Display,
{
    items.into_iter().map(|item| format!("{}\n", item)).collect()
}
