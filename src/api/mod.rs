//! HTTP API: `GET /scrape/{retailer}?q=...` returning product records as JSON.

use crate::models::to_records;
use crate::retailers::Retailer;
use crate::scrapers::Scraper;
use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info};

pub const MISSING_QUERY: &str = "A search query 'q' is required.";

/// Scrapers available to the API, keyed by retailer.
pub struct AppState {
    scrapers: HashMap<Retailer, Arc<dyn Scraper>>,
}

impl AppState {
    pub fn new(scrapers: HashMap<Retailer, Arc<dyn Scraper>>) -> Self {
        Self { scrapers }
    }

    /// Retailers with a registered scraper.
    pub fn retailers(&self) -> Vec<Retailer> {
        let mut retailers: Vec<_> = self.scrapers.keys().copied().collect();
        retailers.sort_by_key(|r| r.to_string());
        retailers
    }
}

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/scrape/:retailer", get(scrape))
        .layer(middleware::from_fn(allow_any_origin))
        .with_state(Arc::new(state))
}

async fn health() -> &'static str {
    "OK"
}

async fn scrape(
    State(state): State<Arc<AppState>>,
    Path(retailer): Path<String>,
    Query(params): Query<SearchParams>,
) -> Response {
    let retailer = match retailer.parse::<Retailer>() {
        Ok(r) => r,
        Err(e) => return error_response(StatusCode::NOT_FOUND, e.to_string()),
    };

    let Some(scraper) = state.scrapers.get(&retailer) else {
        return error_response(StatusCode::NOT_FOUND, format!("Retailer '{}' is not enabled", retailer));
    };

    let Some(query) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, MISSING_QUERY);
    };

    info!("Scrape request: {} '{}'", retailer, query);

    match scraper.scrape(query).await {
        Ok(products) => {
            debug!("Returning {} products from {}", products.len(), retailer);
            Json(to_records(&products)).into_response()
        }
        Err(e) => {
            error!("Scrape of {} failed: {}", retailer, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody { error: message.into() })).into_response()
}

/// Permissive CORS: every response may be read from any origin, and
/// preflight requests are answered directly.
async fn allow_any_origin(req: Request, next: Next) -> Response {
    let mut response = if req.method() == Method::OPTIONS {
        let mut preflight = StatusCode::NO_CONTENT.into_response();
        let headers = preflight.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET, OPTIONS"));
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
        preflight
    } else {
        next.run(req).await
    };

    response
        .headers_mut()
        .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}
