//! JSON API handlers.
//!
//! Each handler performs exactly one aggregator operation and returns its
//! resolved status and body unchanged.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::SignedCookieJar;

use crate::catalog::Product;
use crate::http::server::AppState;
use crate::http::session::current_user;
use crate::services::{CallResult, RequestContext};

impl IntoResponse for CallResult {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub async fn products(State(state): State<AppState>) -> Json<&'static [Product]> {
    Json(state.aggregator.products())
}

pub async fn product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    jar: SignedCookieJar,
    headers: HeaderMap,
) -> CallResult {
    let ctx = RequestContext::new(&headers, current_user(&jar));
    state.aggregator.fetch_details(&product_id, &ctx).await
}

pub async fn reviews(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    jar: SignedCookieJar,
    headers: HeaderMap,
) -> CallResult {
    let ctx = RequestContext::new(&headers, current_user(&jar));
    state.aggregator.fetch_reviews(&product_id, &ctx).await
}

pub async fn ratings(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    jar: SignedCookieJar,
    headers: HeaderMap,
) -> CallResult {
    let ctx = RequestContext::new(&headers, current_user(&jar));
    state.aggregator.fetch_ratings(&product_id, &ctx).await
}
