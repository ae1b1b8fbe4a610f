//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::catalog::params::REGION;
use crate::feed::{self, CalendarFeed, FeedError};
use crate::query::{QueryError, Scope, ValidationError};
use crate::routes::{Endpoint, OutputFormat, parse_format, validate_query};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/*path", get(dispatch))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Serve any generated route.
///
/// The path suffix and query string are validated against the matched
/// route before the store is queried.
async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let (route, extension) =
        state
            .routes
            .resolve(&method, uri.path())
            .ok_or_else(|| AppError::NotFound {
                message: format!("no such resource: {}", uri.path()),
            })?;
    let route = Arc::clone(route);

    let format = parse_format(extension, route.formats)?;
    let params = validate_query(&route.params, &pairs)?;
    debug!(route = %route.template(), %format, params = params.len(), "dispatching");

    match &route.endpoint {
        Endpoint::Stations => {
            let page = state.engine.stations(&params, Scope::default()).await?;
            Ok(Json(Envelope::from_page(page)).into_response())
        }
        Endpoint::Calendar { region, waste_type } => {
            let scope = Scope::new(region.as_deref(), waste_type.as_deref());
            let page = state.engine.calendar(&params, scope).await?;
            match format {
                OutputFormat::Json => Ok(Json(Envelope::from_page(page)).into_response()),
                OutputFormat::Ical => {
                    let body =
                        CalendarFeed::new(&state.catalog, route.description.as_str())
                            .render(&page.rows)?;
                    Ok(([(header::CONTENT_TYPE, feed::CONTENT_TYPE)], body).into_response())
                }
            }
        }
        Endpoint::Regions => {
            let slugs: Vec<String> = state.catalog.regions().keys().cloned().collect();
            Ok(Json(Envelope::complete(slugs)).into_response())
        }
        Endpoint::Types => {
            let types: Vec<String> = match params.text(REGION) {
                Some(slug) => state
                    .catalog
                    .region(slug)
                    .map(|r| r.types.clone())
                    .ok_or_else(|| AppError::NotFound {
                        message: format!("unknown region: {slug}"),
                    })?,
                None => state
                    .catalog
                    .all_types()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            };
            Ok(Json(Envelope::complete(types)).into_response())
        }
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::Validation(e) => e.into(),
            QueryError::Store(e) => {
                error!(error = %e, "record store query failed");
                AppError::Internal {
                    message: "failed to retrieve records".into(),
                }
            }
        }
    }
}

impl From<FeedError> for AppError {
    fn from(e: FeedError) -> Self {
        error!(error = %e, "calendar feed generation failed");
        AppError::Internal {
            message: "failed to generate calendar feed".into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        debug!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
