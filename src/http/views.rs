//! HTML rendering for the index and product pages.

use std::fmt::Write;

use serde_json::Value;

use crate::catalog::Product;
use crate::services::{CallResult, ServiceEndpoint};

const STYLE: &str = "body{font-family:sans-serif;margin:2em}\
    table{border-collapse:collapse}\
    td,th{border:1px solid #ccc;padding:4px 8px;text-align:left;vertical-align:top}\
    .error{color:#a94442}\
    .stars{letter-spacing:2px}";

/// Everything the product page shows.
pub struct ProductPage<'a> {
    pub product: Option<&'a Product>,
    pub details: &'a CallResult,
    pub reviews: &'a CallResult,
    pub user: Option<&'a str>,
}

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
         <style>{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        escape(title)
    )
}

fn user_bar(user: Option<&str>) -> String {
    match user {
        Some(user) => format!(
            "<p>Signed in as <b>{}</b> <a href=\"/logout\">sign out</a></p>\n",
            escape(user)
        ),
        None => "<form method=\"post\" action=\"/login\">\n\
                 <input type=\"text\" name=\"username\" placeholder=\"User name\">\n\
                 <button type=\"submit\">Sign in</button>\n</form>\n"
            .to_string(),
    }
}

/// Index page: the service topology table.
pub fn index(topology: &ServiceEndpoint, user: Option<&str>) -> String {
    let mut body = String::new();
    body.push_str("<h2>Simple Bookstore App</h2>\n");
    body.push_str(&user_bar(user));
    body.push_str("<p>Click on one of the links below to auto generate a request to the backend as a real user or a tester</p>\n");
    body.push_str("<p><a href=\"/productpage?u=normal\">Normal user</a></p>\n");
    body.push_str("<p><a href=\"/productpage?u=test\">Test user</a></p>\n");
    body.push_str("<h3>Microservices:</h3>\n");
    body.push_str(&service_table(topology));
    layout("Simple Bookstore App", &body)
}

/// Nested table of an endpoint and the services it calls.
pub fn service_table(endpoint: &ServiceEndpoint) -> String {
    let mut out = String::from("<table>\n");
    let _ = writeln!(out, "<tr><th>name</th><td>{}</td></tr>", escape(&endpoint.base_url));
    let _ = writeln!(out, "<tr><th>endpoint</th><td>{}</td></tr>", escape(&endpoint.path));
    out.push_str("<tr><th>children</th><td>");
    if !endpoint.children.is_empty() {
        out.push('\n');
        for child in &endpoint.children {
            out.push_str(&service_table(child));
        }
    }
    out.push_str("</td></tr>\n</table>\n");
    out
}

/// The composed product page.
pub fn product_page(page: &ProductPage<'_>) -> String {
    let mut body = String::new();
    body.push_str(&user_bar(page.user));

    match page.product {
        Some(product) => {
            let _ = writeln!(body, "<h1>{}</h1>", escape(product.title));
            let _ = writeln!(body, "<p>{}</p>", product.description_html);
        }
        None => body.push_str("<h1>Unknown product</h1>\n"),
    }

    body.push_str("<h3>Book Details</h3>\n");
    body.push_str(&details_section(page.details));

    body.push_str("<h3>Book Reviews</h3>\n");
    body.push_str(&reviews_section(page.reviews));

    let title = page.product.map(|p| p.title).unwrap_or("Simple Bookstore App");
    layout(title, &body)
}

fn error_block(section: &str, result: &CallResult) -> String {
    let message = result.error_message().unwrap_or("Unavailable");
    format!(
        "<p class=\"error\">Error fetching product {section} ({}): {}</p>\n",
        result.status.as_u16(),
        escape(message)
    )
}

fn details_section(details: &CallResult) -> String {
    if !details.is_ok() {
        return error_block("details", details);
    }

    let mut out = String::from("<table>\n");
    for (label, key) in [
        ("Author", "author"),
        ("Year", "year"),
        ("Type", "type"),
        ("Pages", "pages"),
        ("Publisher", "publisher"),
        ("Language", "language"),
        ("ISBN-10", "ISBN-10"),
        ("ISBN-13", "ISBN-13"),
    ] {
        if let Some(value) = details.body.get(key) {
            let _ = writeln!(out, "<tr><th>{label}</th><td>{}</td></tr>", escape(&display(value)));
        }
    }
    out.push_str("</table>\n");
    out
}

fn reviews_section(reviews: &CallResult) -> String {
    if !reviews.is_ok() {
        return error_block("reviews", reviews);
    }

    let mut out = String::new();
    let list = reviews
        .body
        .get("reviews")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    if list.is_empty() {
        out.push_str("<p>No reviews yet.</p>\n");
    }

    for review in list {
        out.push_str("<blockquote>\n");
        if let Some(text) = review.get("text").and_then(Value::as_str) {
            let _ = writeln!(out, "<p>{}</p>", escape(text));
        }
        if let Some(reviewer) = review.get("reviewer").and_then(Value::as_str) {
            let _ = writeln!(out, "<small>{}</small>", escape(reviewer));
        }
        if let Some(rating) = review.get("rating") {
            out.push_str(&rating_line(rating));
        }
        out.push_str("</blockquote>\n");
    }

    if let Some(pod) = reviews.body.get("podname").and_then(Value::as_str) {
        let cluster = reviews.body.get("clustername").and_then(Value::as_str).unwrap_or("");
        let _ = writeln!(
            out,
            "<p><small>Reviews served by: {} {}</small></p>",
            escape(pod),
            escape(cluster)
        );
    }
    out
}

fn rating_line(rating: &Value) -> String {
    if let Some(error) = rating.get("error").and_then(Value::as_str) {
        return format!("<p class=\"error\">{}</p>\n", escape(error));
    }

    let Some(stars) = rating.get("stars").and_then(Value::as_u64) else {
        return String::new();
    };
    let stars = stars.min(5) as usize;
    let color = rating.get("color").and_then(Value::as_str).unwrap_or("black");
    format!(
        "<p class=\"stars\" style=\"color:{}\">{}{}</p>\n",
        escape(color),
        "\u{2605}".repeat(stars),
        "\u{2606}".repeat(5 - stars)
    )
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::config::ServicesConfig;
    use crate::services::{Service, Topology};
    use axum::http::StatusCode;
    use serde_json::json;

    fn ok(body: Value) -> CallResult {
        CallResult {
            status: StatusCode::OK,
            body,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"Tom\" & 'Jerry'</b>"), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_service_table_nests_children() {
        let topology = Topology::from_config(&ServicesConfig::default());
        let table = service_table(&topology.productpage);

        assert_eq!(table.matches("<table>").count(), 4);
        assert!(table.contains("http://reviews:9080"));
        assert!(table.contains("<td>ratings</td>"));
    }

    #[test]
    fn test_product_page_success() {
        let details = ok(json!({ "author": "William Shakespeare", "pages": 200, "ISBN-10": "1234567890" }));
        let reviews = ok(json!({
            "reviews": [
                { "reviewer": "Reviewer1", "text": "An extremely entertaining play <3", "rating": { "stars": 4, "color": "red" } },
                { "reviewer": "Reviewer2", "text": "Absolutely fun", "rating": { "error": "Ratings service is currently unavailable" } }
            ]
        }));

        let html = product_page(&ProductPage {
            product: catalog::product(0),
            details: &details,
            reviews: &reviews,
            user: Some("jason"),
        });

        assert!(html.contains("<h1>The Comedy of Errors</h1>"));
        assert!(html.contains("<td>William Shakespeare</td>"));
        assert!(html.contains("<td>200</td>"));
        assert!(html.contains("An extremely entertaining play &lt;3"));
        assert!(html.contains("\u{2605}\u{2605}\u{2605}\u{2605}\u{2606}"));
        assert!(html.contains("Ratings service is currently unavailable"));
        assert!(html.contains("Signed in as <b>jason</b>"));
    }

    #[test]
    fn test_product_page_degraded() {
        let details = CallResult::unavailable(Service::Details, StatusCode::INTERNAL_SERVER_ERROR);
        let reviews = CallResult::unavailable(Service::Reviews, StatusCode::SERVICE_UNAVAILABLE);

        let html = product_page(&ProductPage {
            product: None,
            details: &details,
            reviews: &reviews,
            user: None,
        });

        assert!(html.contains("Unknown product"));
        assert!(html.contains("Sorry, product details are currently unavailable for this book."));
        assert!(html.contains("Sorry, product reviews are currently unavailable for this book."));
        assert!(html.contains("action=\"/login\""));
    }
}
