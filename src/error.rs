// Error types shared across the client.
// Backend failures are categorized per user action; the underlying cause is
// logged and never shown to the user.

use thiserror::Error;

/// Failure talking to the HTTP backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or connection level failure (DNS, refused, timeout, reset).
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status code.
    #[error("backend responded with status {status}")]
    Response { status: u16 },

    /// The body could not be decoded into the expected shape.
    #[error("malformed response body: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::Decode(error.to_string())
    }
}

/// User action that triggered a backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    Search,
    Detail,
    Filters,
    Suggestions,
    Stats,
}

/// A backend failure collapsed into the category of the action that caused it.
///
/// `Display` is the fixed user-facing message. The cause is reachable through
/// [`std::error::Error::source`] for diagnostics.
#[derive(Debug, Error)]
pub enum ActionFailure {
    #[error("Failed to load cars")]
    LoadFailed(#[source] ApiError),

    #[error("Failed to search cars")]
    SearchFailed(#[source] ApiError),

    #[error("Failed to load car details")]
    DetailFailed(#[source] ApiError),

    #[error("Failed to load filter options")]
    FiltersFailed(#[source] ApiError),

    #[error("Failed to fetch search suggestions")]
    SuggestionsFailed(#[source] ApiError),

    #[error("Failed to refresh statistics")]
    StatsFailed(#[source] ApiError),
}

impl ActionFailure {
    /// Wraps `cause` in the category for `action` and logs the cause.
    pub fn new(action: Action, cause: ApiError) -> Self {
        Self::log(action, &cause);
        match action {
            Action::Load => ActionFailure::LoadFailed(cause),
            Action::Search => ActionFailure::SearchFailed(cause),
            Action::Detail => ActionFailure::DetailFailed(cause),
            Action::Filters => ActionFailure::FiltersFailed(cause),
            Action::Suggestions => ActionFailure::SuggestionsFailed(cause),
            Action::Stats => ActionFailure::StatsFailed(cause),
        }
    }

    /// Logs a failed backend call for `action` without building a failure,
    /// for background work that has no one to report it to.
    pub fn log(action: Action, cause: &ApiError) {
        tracing::error!(?action, error = %cause, "Backend request failed");
    }

    pub fn action(&self) -> Action {
        match self {
            ActionFailure::LoadFailed(_) => Action::Load,
            ActionFailure::SearchFailed(_) => Action::Search,
            ActionFailure::DetailFailed(_) => Action::Detail,
            ActionFailure::FiltersFailed(_) => Action::Filters,
            ActionFailure::SuggestionsFailed(_) => Action::Suggestions,
            ActionFailure::StatsFailed(_) => Action::Stats,
        }
    }

    pub fn cause(&self) -> &ApiError {
        match self {
            ActionFailure::LoadFailed(e)
            | ActionFailure::SearchFailed(e)
            | ActionFailure::DetailFailed(e)
            | ActionFailure::FiltersFailed(e)
            | ActionFailure::SuggestionsFailed(e)
            | ActionFailure::StatsFailed(e) => e,
        }
    }

    /// Converts the failure into the message shown to the user.
    pub fn notice(&self) -> Notice {
        Notice::new(self.to_string(), Severity::Danger)
    }
}

/// Durable storage failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Comparison list failure.
#[derive(Debug, Error)]
pub enum CompareError {
    #[error("Select at least two cars to compare")]
    InsufficientSelection { selected: usize },

    #[error("Failed to save the comparison list")]
    Storage(#[from] StorageError),
}

impl CompareError {
    pub fn notice(&self) -> Notice {
        match self {
            CompareError::InsufficientSelection { .. } => {
                Notice::new(self.to_string(), Severity::Warning)
            }
            CompareError::Storage(e) => {
                tracing::error!(error = %e, "Comparison list storage failed");
                Notice::new(self.to_string(), Severity::Danger)
            }
        }
    }
}

/// Local form validation failure in the admin panel.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all required fields")]
    MissingFields { fields: Vec<String> },

    #[error("Invalid image URL")]
    InvalidImageUrl,
}

impl ValidationError {
    pub fn notice(&self) -> Notice {
        match self {
            ValidationError::MissingFields { .. } => Notice::new(self.to_string(), Severity::Danger),
            ValidationError::InvalidImageUrl => Notice::new(self.to_string(), Severity::Warning),
        }
    }
}

/// How prominently a [`Notice`] should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Danger,
}

/// A message for the render layer to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

pub type ActionResult<T> = Result<T, ActionFailure>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn failure_message_depends_only_on_action() {
        let a = ActionFailure::new(Action::Search, ApiError::Response { status: 500 });
        let b = ActionFailure::new(Action::Search, ApiError::Decode("eof".into()));
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.to_string(), "Failed to search cars");
        assert_eq!(a.action(), Action::Search);
    }

    #[test]
    fn cause_is_kept_as_source_but_not_displayed() {
        let failure = ActionFailure::new(Action::Detail, ApiError::Response { status: 404 });
        assert!(!failure.to_string().contains("404"));
        let source = failure.source().map(|s| s.to_string()).unwrap_or_default();
        assert!(source.contains("404"));
        assert!(matches!(failure.cause(), ApiError::Response { status: 404 }));
        assert_eq!(failure.notice().severity, Severity::Danger);
    }

    #[test]
    fn insufficient_selection_is_a_warning() {
        let notice = CompareError::InsufficientSelection { selected: 1 }.notice();
        assert_eq!(notice.severity, Severity::Warning);
        assert_eq!(notice.message, "Select at least two cars to compare");
    }
}
