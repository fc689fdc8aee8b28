// Filter/query building for the listing and search endpoints.
//
// Raw input from the filter controls is normalized into a `PageRequest`:
// a page number, the fixed page size and a sparse `FilterSet` in which a
// blank value is never present.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Page size used for every listing and search request.
pub const PER_PAGE: u32 = 12;

/// A filter recognized by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterKey {
    SearchText,
    Brand,
    FuelType,
    Transmission,
    CarType,
    PerformanceLevel,
    PriceMin,
    PriceMax,
    YearFrom,
    YearTo,
    SortBy,
}

impl FilterKey {
    pub const ALL: [FilterKey; 11] = [
        FilterKey::SearchText,
        FilterKey::Brand,
        FilterKey::FuelType,
        FilterKey::Transmission,
        FilterKey::CarType,
        FilterKey::PerformanceLevel,
        FilterKey::PriceMin,
        FilterKey::PriceMax,
        FilterKey::YearFrom,
        FilterKey::YearTo,
        FilterKey::SortBy,
    ];

    /// Query parameter name sent to the backend.
    pub const fn as_str(&self) -> &'static str {
        match self {
            FilterKey::SearchText => "search_text",
            FilterKey::Brand => "brand",
            FilterKey::FuelType => "fuel_type",
            FilterKey::Transmission => "transmission",
            FilterKey::CarType => "car_type",
            FilterKey::PerformanceLevel => "performance_level",
            FilterKey::PriceMin => "price_min",
            FilterKey::PriceMax => "price_max",
            FilterKey::YearFrom => "year_from",
            FilterKey::YearTo => "year_to",
            FilterKey::SortBy => "sort_by",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown filter key `{0}`")]
pub struct UnknownFilterKey(pub String);

impl FromStr for FilterKey {
    type Err = UnknownFilterKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownFilterKey(s.to_owned()))
    }
}

/// Unvalidated values taken straight from the filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInputs(BTreeMap<FilterKey, String>);

impl RawInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: FilterKey, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: FilterKey, value: impl Into<String>) {
        self.0.insert(key, value.into());
    }

    /// Builds inputs from `name=value` pairs, ignoring names the backend does not know.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut inputs = Self::new();
        for (name, value) in pairs {
            match name.parse::<FilterKey>() {
                Ok(key) => inputs.set(key, value),
                Err(e) => tracing::debug!("Ignoring input: {}", e),
            }
        }
        inputs
    }

    pub fn get(&self, key: FilterKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }
}

/// Sparse set of filter constraints. Absence means "no constraint"; a key is
/// never stored with a blank value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet(BTreeMap<FilterKey, String>);

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the trimmed `value` under `key`, or removes `key` when the value is blank.
    pub fn insert(&mut self, key: FilterKey, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.0.remove(&key);
        } else {
            self.0.insert(key, value.to_owned());
        }
    }

    pub fn get(&self, key: FilterKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: FilterKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = FilterKey> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilterKey, &str)> + '_ {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// A single listing/search request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
    filters: FilterSet,
}

impl PageRequest {
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Same filters at another page. The page is not clamped against the
    /// result's page count; an out-of-range page is answered by the backend.
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: self.per_page,
            filters: self.filters.clone(),
        }
    }

    /// Query parameters in wire order: `page`, `per_page`, then the filters.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2 + self.filters.len());
        pairs.push(("page", self.page.to_string()));
        pairs.push(("per_page", self.per_page.to_string()));
        pairs.extend(self.filters.iter().map(|(k, v)| (k.as_str(), v.to_owned())));
        pairs
    }
}

/// Normalizes raw filter input into a request for `page`.
///
/// Keys whose trimmed value is empty are dropped. Page numbers start at 1;
/// a `page` of 0 is treated as 1.
pub fn build_query(raw: &RawInputs, page: u32) -> PageRequest {
    let mut filters = FilterSet::new();
    for (key, value) in &raw.0 {
        filters.insert(*key, value);
    }
    PageRequest {
        page: page.max(1),
        per_page: PER_PAGE,
        filters,
    }
}
