// Client-side core of the car store: catalog browsing against the store's
// JSON API, a persistent comparison list, debounced search suggestions and
// admin panel helpers. Rendering is delegated to a `render::Renderer`.

pub mod admin;
pub mod api;
pub mod catalog;
pub mod compare;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod query;
pub mod render;
pub mod storage;
pub mod suggest;

pub use api::{Backend, HttpBackend};
pub use catalog::Catalog;
pub use compare::{CompareList, CompareManager, ToggleOutcome};
pub use config::Settings;
pub use error::{ActionFailure, ApiError, CompareError};
pub use query::{build_query, FilterKey, FilterSet, PageRequest, RawInputs};
