// bucket browsing request handler

use std::time::Duration;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::Response,
};
use tracing::{error, info, instrument, warn};

use crate::browse::{browse, Browse};
use crate::server::{app::AppState, render};

/// the `prefix` query parameter; when repeated the last value wins
fn requested_prefix(params: &[(String, String)]) -> &str {
    params
        .iter()
        .rev()
        .find(|(name, _)| name == "prefix")
        .map(|(_, value)| value.as_str())
        .unwrap_or_default()
}

// list the requested prefix and render it
#[instrument(skip_all, fields(prefix = requested_prefix(&params)))]
pub async fn handle_browse_request(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, StatusCode> {
    info!("processing browse request");

    let bucket = &state.config.store.bucket;
    let listing = &state.config.listing;
    let work = browse(
        state.store.as_ref(),
        bucket,
        requested_prefix(&params),
        listing.freshness_concurrency,
    );

    let outcome = match listing.request_timeout_secs {
        Some(secs) => match tokio::time::timeout(Duration::from_secs(secs), work).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!("browse request exceeded {}s deadline", secs);
                return html_response(StatusCode::GATEWAY_TIMEOUT, render::render_failure());
            }
        },
        None => work.await,
    };

    match outcome {
        Ok(Browse::Listed(page)) => {
            html_response(StatusCode::OK, render::render_listing(bucket, &page))
        }
        Ok(Browse::Denied { .. }) => {
            html_response(StatusCode::FORBIDDEN, render::render_forbidden())
        }
        Err(e) => {
            error!("object store request failed: {}", e);
            html_response(StatusCode::INTERNAL_SERVER_ERROR, render::render_failure())
        }
    }
}

fn html_response(status: StatusCode, html: String) -> Result<Response, StatusCode> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Body::from(html))
        .map_err(|e| {
            error!("failed to build response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
