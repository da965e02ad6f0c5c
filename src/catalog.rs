//! Static product catalog.

use serde::Serialize;

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: u64,
    pub title: &'static str,
    /// Trusted HTML, rendered as-is.
    #[serde(rename = "descriptionHtml")]
    pub description_html: &'static str,
}

/// Every product on sale.
pub const PRODUCTS: &[Product] = &[Product {
    id: 0,
    title: "The Comedy of Errors",
    description_html: "<a href=\"https://en.wikipedia.org/wiki/The_Comedy_of_Errors\">Wikipedia Summary</a>: \
        The Comedy of Errors is one of <b>William Shakespeare's</b> early plays. It is his shortest and one \
        of his most farcical comedies, with a major part of the humour coming from slapstick and mistaken \
        identity, in addition to puns and word play.",
}];

/// Look up a product by id.
pub fn product(id: u64) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.id == id)
}
