//! Product data aggregation.
//!
//! Each operation maps onto exactly one downstream service. Only the reviews
//! lookup retries, and only once.

use std::sync::Arc;

use crate::catalog::{self, Product};
use crate::resilience::RetryPolicy;
use crate::services::client::{CallResult, DownstreamClient};
use crate::services::context::RequestContext;
use crate::services::endpoint::Topology;

/// Attempts allowed for the reviews lookup.
pub const REVIEWS_RETRY_POLICY: RetryPolicy = RetryPolicy::retry_once();

/// Fetches product data from the downstream services.
#[derive(Clone)]
pub struct Aggregator {
    pub(super) client: DownstreamClient,
    pub(super) topology: Arc<Topology>,
    pub(super) flood_factor: u32,
}

impl Aggregator {
    pub fn new(client: DownstreamClient, topology: Arc<Topology>, flood_factor: u32) -> Self {
        Self {
            client,
            topology,
            flood_factor,
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub async fn fetch_details(&self, product_id: &str, ctx: &RequestContext) -> CallResult {
        self.client.call(&self.topology.details, product_id, ctx).await
    }

    pub async fn fetch_reviews(&self, product_id: &str, ctx: &RequestContext) -> CallResult {
        let client = &self.client;
        let endpoint = &self.topology.reviews;
        REVIEWS_RETRY_POLICY
            .run(move |_| client.call(endpoint, product_id, ctx))
            .await
    }

    pub async fn fetch_ratings(&self, product_id: &str, ctx: &RequestContext) -> CallResult {
        self.client.call(&self.topology.ratings, product_id, ctx).await
    }

    /// The catalog entry for `product_id`, if it exists.
    pub fn fetch_catalog_entry(&self, product_id: u64) -> Option<&'static Product> {
        catalog::product(product_id)
    }

    pub fn products(&self) -> &'static [Product] {
        catalog::PRODUCTS
    }
}
