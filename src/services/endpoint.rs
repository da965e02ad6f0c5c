//! Downstream service endpoints and the display topology.

use crate::config::ServicesConfig;

/// The downstream services the product page talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Details,
    Reviews,
    Ratings,
}

impl Service {
    /// Name used as the `destination_app` metrics label and URL path segment.
    pub const fn app_name(&self) -> &'static str {
        match self {
            Service::Details => "details",
            Service::Reviews => "reviews",
            Service::Ratings => "ratings",
        }
    }

    /// Message placed in the error body when the service is unavailable.
    pub const fn unavailable_message(&self) -> &'static str {
        match self {
            Service::Details => "Sorry, product details are currently unavailable for this book.",
            Service::Reviews => "Sorry, product reviews are currently unavailable for this book.",
            Service::Ratings => "Sorry, product ratings are currently unavailable for this book.",
        }
    }
}

/// Location of a downstream service, plus the services it calls in turn.
///
/// `children` only feeds the topology table on the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub service: Service,
    /// Scheme, host and port, e.g. `http://details:9080`.
    pub base_url: String,
    /// Path segment under which the service exposes products.
    pub path: String,
    pub children: Vec<ServiceEndpoint>,
}

impl ServiceEndpoint {
    pub fn new(service: Service, base_url: String) -> Self {
        Self {
            service,
            base_url,
            path: service.app_name().to_string(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<ServiceEndpoint>) -> Self {
        self.children = children;
        self
    }

    /// `base_url/path/suffix`.
    pub fn url(&self, suffix: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.path, suffix)
    }
}

/// All endpoints, built once at startup.
#[derive(Debug, Clone)]
pub struct Topology {
    /// Root of the display tree: the product page and everything it calls.
    pub productpage: ServiceEndpoint,
    pub details: ServiceEndpoint,
    pub reviews: ServiceEndpoint,
    pub ratings: ServiceEndpoint,
}

impl Topology {
    pub fn from_config(config: &ServicesConfig) -> Self {
        let domain = config.domain.as_deref();

        let details = ServiceEndpoint::new(Service::Details, config.details.base_url(domain));
        let ratings = ServiceEndpoint::new(Service::Ratings, config.ratings.base_url(domain));
        let reviews = ServiceEndpoint::new(Service::Reviews, config.reviews.base_url(domain))
            .with_children(vec![ratings.clone()]);

        // The product page has no address of its own; the table lists it
        // under the details location.
        let productpage = details
            .clone()
            .with_children(vec![details.clone(), reviews.clone()]);

        Self {
            productpage,
            details,
            reviews,
            ratings,
        }
    }
}
