//! HTML page handlers.

use axum::{extract::State, http::HeaderMap, response::Html};
use axum_extra::extract::cookie::SignedCookieJar;

use crate::http::server::AppState;
use crate::http::session::current_user;
use crate::http::views::{self, ProductPage};
use crate::services::RequestContext;

/// The page always shows the single catalog product.
const PRODUCT_ID: u64 = 0;

pub async fn index(State(state): State<AppState>, jar: SignedCookieJar) -> Html<String> {
    let user = current_user(&jar);
    Html(views::index(&state.aggregator.topology().productpage, user.as_deref()))
}

/// Compose the product page. Always answers 200; unavailable sections are
/// rendered with their error message instead.
pub async fn product_page(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    headers: HeaderMap,
) -> Html<String> {
    let ctx = RequestContext::new(&headers, current_user(&jar));
    let product_id = PRODUCT_ID.to_string();
    let aggregator = &state.aggregator;

    let product = aggregator.fetch_catalog_entry(PRODUCT_ID);
    let details = aggregator.fetch_details(&product_id, &ctx).await;

    aggregator.flood_reviews(&product_id, &ctx).await;

    let reviews = aggregator.fetch_reviews(&product_id, &ctx).await;

    tracing::info!(
        details_status = details.status.as_u16(),
        reviews_status = reviews.status.as_u16(),
        user = ctx.user().unwrap_or(""),
        "Rendered product page"
    );

    Html(views::product_page(&ProductPage {
        product,
        details: &details,
        reviews: &reviews,
        user: ctx.user(),
    }))
}
