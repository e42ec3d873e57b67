//! Product records as returned by the product API.

use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A product listing, kept exactly as the API sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Amazon Standard Identification Number
    pub asin: String,
    /// Product title
    pub title: String,
    /// Outbound (affiliate) product URL
    pub url: String,
    /// Product image URL
    #[serde(default, alias = "image")]
    pub image_url: Option<String>,
    /// Display price, already formatted by the API (e.g. "$19.99")
    #[serde(default)]
    pub price: Option<String>,
    /// Star rating out of 5
    #[serde(default)]
    pub rating: Option<f64>,
    /// Number of reviews behind the rating
    #[serde(default, deserialize_with = "deserialize_count")]
    pub reviews_count: Option<u64>,
}

impl Product {
    /// Returns the rating line, or `None` for unrated products.
    ///
    /// A missing review count is shown as zero.
    pub fn rating_line(&self) -> Option<String> {
        self.rating.map(|rating| {
            format!("Rating: {} / 5 ({} reviews)", rating, self.reviews_count.unwrap_or(0))
        })
    }
}

/// Accepts any JSON number for a count; `1500.0` reads as 1500.
///
/// Fractional, negative or non-finite values are dropped to `None`.
fn deserialize_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw
        .filter(|n| n.is_finite() && *n >= 0.0 && n.fract() == 0.0 && *n <= u64::MAX as f64)
        .map(|n| n as u64))
}

/// Response body of `GET /api/products`.
///
/// The endpoint answers with a bare array; older backends wrap the list
/// together with the upstream errors they ran into.
#[derive(Debug, Clone)]
pub enum ProductsPayload {
    List(Vec<Product>),
    Envelope { products: Vec<Product>, api_errors: Vec<String> },
}

#[derive(Deserialize)]
struct Envelope {
    products: Vec<Product>,
    #[serde(default)]
    api_errors: Vec<String>,
}

// Branching on the JSON shape first keeps the field-level error (e.g. a
// missing `title`) instead of a generic "no variant matched".
impl<'de> Deserialize<'de> for ProductsPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            value @ Value::Array(_) => Vec::<Product>::deserialize(value)
                .map(ProductsPayload::List)
                .map_err(D::Error::custom),
            value @ Value::Object(_) => Envelope::deserialize(value)
                .map(|e| ProductsPayload::Envelope { products: e.products, api_errors: e.api_errors })
                .map_err(D::Error::custom),
            other => Err(D::Error::custom(format!(
                "expected a list of products, found {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl ProductsPayload {
    /// Splits the payload into products and upstream errors.
    pub fn into_parts(self) -> (Vec<Product>, Vec<String>) {
        match self {
            ProductsPayload::List(products) => (products, Vec::new()),
            ProductsPayload::Envelope { products, api_errors } => (products, api_errors),
        }
    }
}
