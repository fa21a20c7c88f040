//! Core data models and retrieval clients for parkfinder
//!
//! This module contains the records produced by the retrieval pipeline (park
//! sites and nearby places) together with the clients that fetch and extract
//! them: documents, the state catalog, site pages and the search API.

pub mod catalog;
pub mod document;
pub mod html;
pub mod nearby;
pub mod sites;

pub use catalog::{capitalize, resolve_state_url, CatalogError, StateCatalogIndex};
pub use document::{DocumentFetcher, FetchError};
pub use html::ExtractionError;
pub use nearby::{NearbyClient, NearbyError};
pub use sites::{extract_site, extract_site_links};

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A national park site as listed on its catalog page
///
/// Built from one site page by [`extract_site`]. Only the page it came from
/// is cached; the record itself is rebuilt on every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkSite {
    /// Designation such as "National Park"; some sites have none
    pub category: String,
    /// Display name, e.g. "Isle Royale"
    pub name: String,
    /// "City, State", e.g. "Houghton, MI"
    pub address: String,
    /// 5-digit or ZIP+4 postal code
    pub zipcode: String,
    /// Phone number as printed on the page
    pub phone: String,
}

impl ParkSite {
    /// One-line summary used in numbered site listings
    pub fn info(&self) -> String {
        format!(
            "{} ({}): {} {}",
            self.name, self.category, self.address, self.zipcode
        )
    }
}

/// Raw decoded response from the search API
///
/// Cached verbatim; nothing about its shape is checked until [`places`] is
/// called.
///
/// [`places`]: NearbyResult::places
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NearbyResult(pub Value);

impl NearbyResult {
    /// Reads the `searchResults` entries in response order
    pub fn places(&self) -> Result<Vec<NearbyPlace>, NearbyError> {
        let results = self
            .0
            .get("searchResults")
            .ok_or(NearbyError::MissingResults)?;
        Ok(serde_json::from_value(results.clone())?)
    }
}

/// One entry of a search API response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NearbyPlace {
    pub name: String,
    #[serde(default)]
    pub fields: PlaceFields,
}

/// Optional descriptive fields of a nearby place
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlaceFields {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    /// Business category
    #[serde(default)]
    pub group_sic_code_name_ext: Option<String>,
}

/// Returns the field value, or `fallback` when it is absent or empty
fn or_placeholder<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v,
        _ => fallback,
    }
}

impl fmt::Display for NearbyPlace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- {} ({}): {}, {}",
            self.name,
            or_placeholder(&self.fields.group_sic_code_name_ext, "no category"),
            or_placeholder(&self.fields.address, "no address"),
            or_placeholder(&self.fields.city, "no city"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn isle_royale() -> ParkSite {
        ParkSite {
            category: "National Park".to_string(),
            name: "Isle Royale".to_string(),
            address: "Houghton, MI".to_string(),
            zipcode: "49931".to_string(),
            phone: "(906) 482-0984".to_string(),
        }
    }

    #[test]
    fn test_park_site_info() {
        assert_eq!(
            isle_royale().info(),
            "Isle Royale (National Park): Houghton, MI 49931"
        );
    }

    #[test]
    fn test_park_site_info_with_blank_category() {
        let site = ParkSite {
            category: String::new(),
            ..isle_royale()
        };
        assert_eq!(site.info(), "Isle Royale (): Houghton, MI 49931");
    }

    #[test]
    fn test_places_reads_search_results_in_order() {
        let result = NearbyResult(json!({
            "searchResults": [
                {"name": "Lakeside Diner", "fields": {"address": "1 Main St", "city": "Houghton", "group_sic_code_name_ext": "Restaurants"}},
                {"name": "Bait Shop", "fields": {}}
            ]
        }));

        let places = result.places().unwrap();

        assert_eq!(places.len(), 2);
        assert_eq!(places[0].name, "Lakeside Diner");
        assert_eq!(places[0].fields.city.as_deref(), Some("Houghton"));
        assert_eq!(places[1].name, "Bait Shop");
    }

    #[test]
    fn test_places_empty_results() {
        let result = NearbyResult(json!({"searchResults": []}));
        assert!(result.places().unwrap().is_empty());
    }

    #[test]
    fn test_places_missing_search_results() {
        let result = NearbyResult(json!({"info": {"statuscode": 401, "messages": ["bad key"]}}));
        assert!(matches!(result.places(), Err(NearbyError::MissingResults)));
    }

    #[test]
    fn test_places_malformed_entry() {
        let result = NearbyResult(json!({"searchResults": [{"fields": {}}]}));
        assert!(matches!(result.places(), Err(NearbyError::Decode(_))));
    }

    #[test]
    fn test_nearby_place_display_with_all_fields() {
        let place = NearbyPlace {
            name: "Lakeside Diner".to_string(),
            fields: PlaceFields {
                address: Some("1 Main St".to_string()),
                city: Some("Houghton".to_string()),
                group_sic_code_name_ext: Some("Restaurants".to_string()),
            },
        };
        assert_eq!(
            place.to_string(),
            "- Lakeside Diner (Restaurants): 1 Main St, Houghton"
        );
    }

    #[test]
    fn test_nearby_place_display_uses_placeholders() {
        let place = NearbyPlace {
            name: "Bait Shop".to_string(),
            fields: PlaceFields {
                address: Some(String::new()),
                city: None,
                group_sic_code_name_ext: None,
            },
        };
        assert_eq!(
            place.to_string(),
            "- Bait Shop (no category): no address, no city"
        );
    }
}
