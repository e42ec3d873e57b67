//! Market regions served by the product API.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Supported markets. The upper-case code is what the API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Region {
    #[default]
    Us,
    Uk,
    Au,
    Ca,
    Nz,
}

impl Region {
    /// Returns the region code as sent in `?region=`.
    pub fn code(&self) -> &'static str {
        match self {
            Region::Us => "US",
            Region::Uk => "UK",
            Region::Au => "AU",
            Region::Ca => "CA",
            Region::Nz => "NZ",
        }
    }

    /// Returns the Amazon storefront that fulfils this market.
    pub fn domain(&self) -> &'static str {
        match self {
            Region::Us => "amazon.com",
            Region::Uk => "amazon.co.uk",
            // No dedicated NZ storefront; NZ orders ship from AU.
            Region::Au | Region::Nz => "amazon.com.au",
            Region::Ca => "amazon.ca",
        }
    }

    /// Returns the currency code prices are quoted in.
    pub fn currency(&self) -> &'static str {
        match self {
            Region::Us => "USD",
            Region::Uk => "GBP",
            Region::Au => "AUD",
            Region::Ca => "CAD",
            Region::Nz => "NZD",
        }
    }

    /// Returns all supported regions in selector order.
    pub fn all() -> &'static [Region] {
        &[Region::Us, Region::Uk, Region::Au, Region::Ca, Region::Nz]
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = RegionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "us" | "usa" | "united states" => Ok(Region::Us),
            "uk" | "gb" | "united kingdom" => Ok(Region::Uk),
            "au" | "australia" => Ok(Region::Au),
            "ca" | "canada" => Ok(Region::Ca),
            "nz" | "new zealand" => Ok(Region::Nz),
            _ => Err(RegionParseError(s.to_string())),
        }
    }
}

impl Serialize for Region {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Input that does not name one of the supported regions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown region '{0}'. Valid regions: US, UK, AU, CA, NZ")]
pub struct RegionParseError(pub String);
