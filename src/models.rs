// Data structures exchanged with the car store backend.
// The backend owns all of these; the client only reads them.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Display-oriented projection of a catalog car, as returned in result pages
/// and in the `similar_cars` list of a detail response.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ListingSummary {
    pub id: u64,
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub price: Option<f64>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub car_type: Option<String>,
    pub performance_level: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

/// Full record of a single car.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CarDetail {
    #[serde(flatten)]
    pub listing: ListingSummary,
    pub engine_size: Option<f64>,
    pub doors: Option<u32>,
    pub color: Option<String>,
    pub mileage: Option<u64>,
    pub country_origin: Option<String>,
    #[serde(default)]
    pub leather_seats: bool,
    #[serde(default)]
    pub sunroof: bool,
    #[serde(default)]
    pub gps_system: bool,
    #[serde(default)]
    pub backup_camera: bool,
    #[serde(default)]
    pub entertainment_system: bool,
    #[serde(default)]
    pub safety_features: bool,
}

impl CarDetail {
    /// Labels of the optional equipment this car has.
    pub fn features(&self) -> Vec<&'static str> {
        [
            (self.leather_seats, "Leather seats"),
            (self.sunroof, "Sunroof"),
            (self.gps_system, "GPS navigation"),
            (self.backup_camera, "Backup camera"),
            (self.entertainment_system, "Entertainment system"),
            (self.safety_features, "Safety features"),
        ]
        .into_iter()
        .filter_map(|(present, label)| present.then_some(label))
        .collect()
    }
}

/// Body of `GET /api/cars/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CarDetailResponse {
    pub car: CarDetail,
    #[serde(default)]
    pub similar_cars: Vec<ListingSummary>,
}

/// Paginated result envelope shared by the listing and search endpoints.
///
/// The search endpoint names the page count `total_pages`; the listing
/// endpoint names it `pages`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PageResult {
    #[serde(rename = "cars", default)]
    pub items: Vec<ListingSummary>,
    #[serde(default)]
    pub total: Option<u64>,
    pub page: u32,
    #[serde(alias = "total_pages", default)]
    pub pages: u32,
    #[serde(default)]
    pub has_prev: bool,
    #[serde(default)]
    pub has_next: bool,
}

impl PageResult {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SortOption {
    pub value: String,
    pub label: String,
}

/// Facet values for populating the filter controls (`GET /api/filters`).
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FilterOptions {
    pub brands: Vec<String>,
    pub car_types: Vec<String>,
    pub fuel_types: Vec<String>,
    pub transmissions: Vec<String>,
    pub performance_levels: Vec<String>,
    pub colors: Vec<String>,
    pub countries: Vec<String>,
    pub year_range: Option<NumericRange>,
    pub price_range: Option<NumericRange>,
    pub sort_options: Vec<SortOption>,
}

/// Numeric admin dashboard statistics keyed by stat name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSnapshot(pub BTreeMap<String, f64>);

impl StatsSnapshot {
    /// Keeps only the top-level numeric entries of a stats payload.
    pub fn from_value(value: &Value) -> Self {
        let stats = value
            .as_object()
            .map(|map| {
                map.iter()
                    .filter_map(|(name, v)| v.as_f64().map(|n| (name.clone(), n)))
                    .collect()
            })
            .unwrap_or_default();
        StatsSnapshot(stats)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_envelope_decodes() {
        let body = json!({
            "cars": [{
                "id": 5,
                "name": "Camry",
                "brand": "Toyota",
                "year": 2022,
                "price": 9500.0,
                "fuel_type": "petrol",
                "transmission": "automatic",
                "description": null,
                "image_url": null,
                "created_at": "2024-03-01T10:15:30.123456"
            }],
            "total": 13,
            "page": 1,
            "pages": 2,
            "has_prev": false,
            "has_next": true
        });
        let result: PageResult = serde_json::from_value(body).unwrap();
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].brand.as_deref(), Some("Toyota"));
        assert!(result.items[0].created_at.is_some());
        assert_eq!(result.pages, 2);
        assert!(result.has_next);
    }

    #[test]
    fn search_envelope_uses_total_pages() {
        let body = json!({
            "cars": [],
            "total": 0,
            "page": 1,
            "per_page": 12,
            "total_pages": 0,
            "errors": {"price_min": "invalid"}
        });
        let result: PageResult = serde_json::from_value(body).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.pages, 0);
        assert!(!result.has_prev && !result.has_next);
    }

    #[test]
    fn detail_lists_features() {
        let body = json!({
            "car": {
                "id": 7,
                "name": "Model 3",
                "engine_size": 0.0,
                "doors": 4,
                "mileage": 12000,
                "sunroof": true,
                "gps_system": true
            },
            "similar_cars": [{"id": 8, "name": "Model Y", "price": 21000}]
        });
        let detail: CarDetailResponse = serde_json::from_value(body).unwrap();
        assert_eq!(detail.car.listing.id, 7);
        assert_eq!(detail.car.features(), vec!["Sunroof", "GPS navigation"]);
        assert_eq!(detail.similar_cars[0].price, Some(21000.0));
    }

    #[test]
    fn stats_snapshot_keeps_numbers_only() {
        let snapshot = StatsSnapshot::from_value(&json!({
            "total_cars": 40,
            "available_cars": 31,
            "total_searches": 1200,
            "recent_cars": [{"id": 1}]
        }));
        assert_eq!(snapshot.0.len(), 3);
        assert_eq!(snapshot.get("available_cars"), Some(31.0));
        assert_eq!(snapshot.get("recent_cars"), None);
    }
}
