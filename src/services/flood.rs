//! Synthetic load against the reviews service.
//!
//! With a non-zero flood factor, the product page issues that many extra
//! reviews calls before rendering, so that mesh rate limits have something to
//! reject. Their outcomes are never looked at.

use futures_util::future::join_all;

use crate::services::aggregator::Aggregator;
use crate::services::context::RequestContext;

impl Aggregator {
    /// Issue `flood_factor` concurrent single-attempt reviews calls and wait for all
    /// of them. Each call runs in its own task, so a failing or panicking call
    /// cannot cancel its siblings or the caller.
    pub async fn flood_reviews(&self, product_id: &str, ctx: &RequestContext) {
        if self.flood_factor == 0 {
            return;
        }

        let tasks = (0..self.flood_factor).map(|_| {
            let client = self.client.clone();
            let topology = self.topology.clone();
            let product_id = product_id.to_string();
            let ctx = ctx.clone();
            tokio::spawn(async move {
                client.call(&topology.reviews, &product_id, &ctx).await;
            })
        });

        let failed = join_all(tasks)
            .await
            .into_iter()
            .filter(Result::is_err)
            .count();

        tracing::debug!(
            calls = self.flood_factor,
            failed_tasks = failed,
            "Flooded reviews"
        );
    }
}
