// Pagination control derived from a `PageResult`.

use crate::models::PageResult;

/// Number of page links shown on each side of the current page.
pub const WINDOW_RADIUS: u32 = 2;

/// Logical contents of the pagination control. Markup is up to the renderer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaginationControl {
    /// Page currently displayed.
    pub current: u32,

    /// Page numbers to link, ascending.
    pub window: Vec<u32>,

    /// Target of the "previous" link, if shown.
    pub previous: Option<u32>,

    /// Target of the "next" link, if shown.
    pub next: Option<u32>,
}

impl PaginationControl {
    /// Returns whether there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty() && self.previous.is_none() && self.next.is_none()
    }
}

/// Computes the pagination control for `result`.
///
/// The window is `[max(1, page - 2), min(pages, page + 2)]`. Previous/next
/// links follow the envelope's `has_prev`/`has_next` flags. A result with at
/// most one page has an empty control.
#[must_use]
pub fn render_pagination(result: &PageResult) -> PaginationControl {
    if result.pages <= 1 {
        return PaginationControl::default();
    }

    let page = result.page;
    let start = page.saturating_sub(WINDOW_RADIUS).max(1);
    let end = page.saturating_add(WINDOW_RADIUS).min(result.pages);

    PaginationControl {
        current: page,
        window: (start..=end).collect(),
        previous: result.has_prev.then(|| page.saturating_sub(1)),
        next: result.has_next.then(|| page.saturating_add(1)),
    }
}
