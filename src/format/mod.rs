//! Rendering of the view body (text cards, markdown, JSON).

use crate::api::{Product, Region};
use crate::config::OutputFormat;
use crate::view::Body;
use serde_json::json;

/// Label of the outbound link on every product card.
pub const VIEW_LINK_LABEL: &str = "View on Amazon";

/// Text shown while a fetch cycle is in flight.
pub fn loading_message(region: Region) -> String {
    format!("Loading products for {}...", region)
}

/// Text shown when the API returned no products.
pub fn empty_message(region: Region) -> String {
    format!("No products found for {}.", region)
}

fn heading(region: Region) -> String {
    format!("Available Products ({})", region)
}

/// Formats the view body for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Renders exactly one display mode: loading, error, empty or the list.
    pub fn render(&self, body: &Body<'_>) -> String {
        match self.format {
            OutputFormat::Json => self.json_body(body),
            OutputFormat::Text => self.text_body(body),
            OutputFormat::Markdown => self.markdown_body(body),
        }
    }

    // JSON formatting

    fn json_body(&self, body: &Body<'_>) -> String {
        let value = match body {
            Body::Loading(region) => json!({
                "state": "loading",
                "region": region,
                "message": loading_message(*region),
            }),
            Body::Error(message) => json!({
                "state": "error",
                "message": message,
            }),
            Body::Empty(region) => json!({
                "state": "empty",
                "region": region,
                "message": empty_message(*region),
            }),
            Body::Products(region, products) => json!({
                "state": "loaded",
                "region": region,
                "products": products,
            }),
        };

        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    // Text formatting

    fn text_body(&self, body: &Body<'_>) -> String {
        match body {
            Body::Loading(region) => loading_message(*region),
            Body::Error(message) => message.to_string(),
            Body::Empty(region) => empty_message(*region),
            Body::Products(region, products) => {
                let mut blocks = vec![heading(*region)];
                blocks.extend(products.iter().enumerate().map(|(i, p)| self.text_card(i + 1, p)));
                blocks.join("\n\n")
            }
        }
    }

    fn text_card(&self, position: usize, product: &Product) -> String {
        let mut lines = Vec::new();

        if let Some(image) = &product.image_url {
            lines.push(format!("[image: {}] {} -> {}", product.title, image, product.url));
        }

        lines.push(format!("{}. {}", position, product.title));
        lines.push(format!("   <{}>", product.url));

        if let Some(price) = &product.price {
            lines.push(format!("   {}", price));
        }

        if let Some(rating) = product.rating_line() {
            lines.push(format!("   {}", rating));
        }

        lines.push(format!("   {}: {}", VIEW_LINK_LABEL, product.url));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_body(&self, body: &Body<'_>) -> String {
        match body {
            Body::Loading(region) => format!("_{}_", loading_message(*region)),
            Body::Error(message) => format!("**{}**", message),
            Body::Empty(region) => empty_message(*region),
            Body::Products(region, products) => {
                let mut blocks = vec![format!("## {}", heading(*region))];
                blocks.extend(products.iter().map(|p| self.markdown_card(p)));
                blocks.join("\n\n")
            }
        }
    }

    fn markdown_card(&self, product: &Product) -> String {
        let title = Self::markdown_escape(&product.title);
        let mut lines = Vec::new();

        if let Some(image) = &product.image_url {
            lines.push(format!("[![{}]({})]({})", title, image, product.url));
            lines.push(String::new());
        }

        lines.push(format!("### [{}]({})", title, product.url));

        if let Some(price) = &product.price {
            lines.push(String::new());
            lines.push(format!("**{}**", price));
        }

        if let Some(rating) = product.rating_line() {
            lines.push(String::new());
            lines.push(rating);
        }

        lines.push(String::new());
        lines.push(format!("[{}]({})", VIEW_LINK_LABEL, product.url));

        lines.join("\n")
    }

    fn markdown_escape(s: &str) -> String {
        s.replace('[', "\\[").replace(']', "\\]")
    }
}
