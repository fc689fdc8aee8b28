// Catalog browsing session.
//
// Composes the query builder with a `Backend`. The session remembers the
// last request that succeeded so pagination links can re-issue it at another
// page; a failed request leaves that memory untouched.

use crate::api::Backend;
use crate::error::{Action, ActionFailure, ActionResult};
use crate::models::{CarDetailResponse, FilterOptions, PageResult};
use crate::query::{build_query, PageRequest, RawInputs};

/// Endpoint a page request was sent to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// Plain listing, `GET /api/cars`.
    Listing,

    /// Filtered search, `GET /api/search`.
    Search,
}

impl Endpoint {
    const fn action(self) -> Action {
        match self {
            Endpoint::Listing => Action::Load,
            Endpoint::Search => Action::Search,
        }
    }
}

/// Result of [`Catalog::bootstrap`].
#[derive(Debug)]
pub struct Bootstrap {
    pub cars: ActionResult<PageResult>,
    pub filters: ActionResult<FilterOptions>,
}

pub struct Catalog<B> {
    backend: B,
    current: Option<(Endpoint, PageRequest)>,
}

impl<B: Backend> Catalog<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            current: None,
        }
    }

    /// Last successfully answered request and the endpoint it went to.
    pub fn current(&self) -> Option<(Endpoint, &PageRequest)> {
        self.current.as_ref().map(|(endpoint, request)| (*endpoint, request))
    }

    /// Loads a page of the plain listing.
    pub async fn load(&mut self, page: u32, raw: &RawInputs) -> ActionResult<PageResult> {
        self.fetch(Endpoint::Listing, build_query(raw, page)).await
    }

    /// Runs a fresh search, starting at the first page.
    pub async fn search(&mut self, raw: &RawInputs) -> ActionResult<PageResult> {
        self.search_page(raw, 1).await
    }

    pub async fn search_page(&mut self, raw: &RawInputs, page: u32) -> ActionResult<PageResult> {
        self.fetch(Endpoint::Search, build_query(raw, page)).await
    }

    /// Re-issues the current request at `page` on the same endpoint, or loads
    /// the unfiltered listing if nothing was loaded yet.
    pub async fn go_to_page(&mut self, page: u32) -> ActionResult<PageResult> {
        let (endpoint, request) = match &self.current {
            Some((endpoint, request)) => (*endpoint, request.with_page(page)),
            None => (Endpoint::Listing, build_query(&RawInputs::new(), page)),
        };
        self.fetch(endpoint, request).await
    }

    /// Drops all filters and reloads the first listing page.
    pub async fn reset(&mut self) -> ActionResult<PageResult> {
        self.load(1, &RawInputs::new()).await
    }

    pub async fn show_details(&self, id: u64) -> ActionResult<CarDetailResponse> {
        self.backend
            .car_details(id)
            .await
            .map_err(|cause| ActionFailure::new(Action::Detail, cause))
    }

    pub async fn filter_options(&self) -> ActionResult<FilterOptions> {
        self.backend
            .filter_options()
            .await
            .map_err(|cause| ActionFailure::new(Action::Filters, cause))
    }

    /// Loads the first listing page and the filter facets concurrently.
    pub async fn bootstrap(&mut self) -> Bootstrap {
        let request = build_query(&RawInputs::new(), 1);
        let (cars, filters) = futures::join!(
            self.backend.list_cars(&request),
            self.backend.filter_options()
        );

        let cars = match cars {
            Ok(result) => {
                self.remember(Endpoint::Listing, request, &result);
                Ok(result)
            }
            Err(cause) => Err(ActionFailure::new(Action::Load, cause)),
        };
        let filters = filters.map_err(|cause| ActionFailure::new(Action::Filters, cause));
        Bootstrap { cars, filters }
    }

    async fn fetch(&mut self, endpoint: Endpoint, request: PageRequest) -> ActionResult<PageResult> {
        let response = match endpoint {
            Endpoint::Listing => self.backend.list_cars(&request).await,
            Endpoint::Search => self.backend.search_cars(&request).await,
        };
        match response {
            Ok(result) => {
                self.remember(endpoint, request, &result);
                Ok(result)
            }
            Err(cause) => Err(ActionFailure::new(endpoint.action(), cause)),
        }
    }

    fn remember(&mut self, endpoint: Endpoint, request: PageRequest, result: &PageResult) {
        tracing::info!(
            ?endpoint,
            page = result.page,
            pages = result.pages,
            items = result.items.len(),
            "Loaded result page"
        );
        self.current = Some((endpoint, request));
    }
}
