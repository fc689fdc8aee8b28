// Scripted in-memory backend shared by the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use car_store::api::Backend;
use car_store::error::ApiError;
use car_store::models::{
    CarDetail, CarDetailResponse, FilterOptions, ListingSummary, PageResult, StatsSnapshot,
};
use car_store::query::PageRequest;
use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub endpoint: &'static str,
    pub query: Vec<(&'static str, String)>,
}

pub struct FakeBackend {
    pub pages: u32,
    pub failing: AtomicBool,
    pub calls: Mutex<Vec<Call>>,
    pub suggestion_queries: Mutex<Vec<String>>,
    pub suggestion_latency: Duration,
    pub completed_suggestions: AtomicUsize,
    pub stats_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn with_pages(pages: u32) -> Self {
        Self {
            pages,
            failing: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
            suggestion_queries: Mutex::new(Vec::new()),
            suggestion_latency: Duration::ZERO,
            completed_suggestions: AtomicUsize::new(0),
            stats_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_suggestion_latency(mut self, latency: Duration) -> Self {
        self.suggestion_latency = latency;
        self
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn check(&self) -> Result<(), ApiError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(ApiError::Response { status: 500 })
        } else {
            Ok(())
        }
    }

    fn page(&self, endpoint: &'static str, request: &PageRequest) -> Result<PageResult, ApiError> {
        self.calls.lock().push(Call {
            endpoint,
            query: request.query_pairs(),
        });
        self.check()?;
        let page = request.page();
        let items = if page <= self.pages {
            vec![car(u64::from(page), &format!("Car on page {page}"))]
        } else {
            Vec::new()
        };
        Ok(PageResult {
            items,
            total: Some(u64::from(self.pages) * u64::from(request.per_page())),
            page,
            pages: self.pages,
            has_prev: page > 1,
            has_next: page < self.pages,
        })
    }
}

pub fn car(id: u64, name: &str) -> ListingSummary {
    ListingSummary {
        id,
        name: name.to_owned(),
        brand: Some("Toyota".into()),
        model: None,
        year: Some(2021),
        price: Some(12500.0),
        fuel_type: Some("petrol".into()),
        transmission: Some("automatic".into()),
        car_type: None,
        performance_level: None,
        description: None,
        image_url: None,
        created_at: None,
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn list_cars(&self, request: &PageRequest) -> Result<PageResult, ApiError> {
        self.page("/api/cars", request)
    }

    async fn search_cars(&self, request: &PageRequest) -> Result<PageResult, ApiError> {
        self.page("/api/search", request)
    }

    async fn car_details(&self, id: u64) -> Result<CarDetailResponse, ApiError> {
        self.check()?;
        Ok(CarDetailResponse {
            car: CarDetail {
                listing: car(id, "Camry"),
                engine_size: Some(2.5),
                doors: Some(4),
                color: Some("white".into()),
                mileage: Some(30000),
                country_origin: None,
                leather_seats: true,
                sunroof: false,
                gps_system: false,
                backup_camera: true,
                entertainment_system: false,
                safety_features: false,
            },
            similar_cars: vec![car(id + 1, "Corolla")],
        })
    }

    async fn filter_options(&self) -> Result<FilterOptions, ApiError> {
        self.check()?;
        Ok(FilterOptions {
            brands: vec!["BMW".into(), "Toyota".into()],
            ..FilterOptions::default()
        })
    }

    async fn search_suggestions(&self, query: &str) -> Result<Vec<String>, ApiError> {
        self.suggestion_queries.lock().push(query.to_owned());
        if !self.suggestion_latency.is_zero() {
            tokio::time::sleep(self.suggestion_latency).await;
        }
        self.completed_suggestions.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(vec![format!("{query} Camry"), "Toyota".to_owned()])
    }

    async fn admin_stats(&self) -> Result<StatsSnapshot, ApiError> {
        let n = self.stats_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.check()?;
        let mut stats = StatsSnapshot::default();
        stats.0.insert("total_cars".into(), n as f64);
        Ok(stats)
    }
}
