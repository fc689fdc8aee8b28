// Side-by-side comparison list.
//
// Holds up to `MAX_COMPARE` distinct car identifiers in insertion order,
// persisted under `COMPARE_KEY` in a `KeyValueStore` as a JSON array of
// strings. The stored list is loaded lazily and written back after every
// mutation. Concurrent writers (another process using the same store) are
// not coordinated; the last write wins.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{CompareError, Notice, Severity, StorageError};
use crate::storage::KeyValueStore;

/// Storage key of the persisted list.
pub const COMPARE_KEY: &str = "compareList";

/// Maximum number of cars that can be compared at once.
pub const MAX_COMPARE: usize = 4;

/// Minimum number of cars needed to open the comparison view.
pub const MIN_COMPARE: usize = 2;

/// Path of the comparison page.
pub const COMPARE_PATH: &str = "/compare";

// Placeholder origin used only to build the relative comparison URL.
const COMPARE_ORIGIN: &str = "http://localhost";

/// Ordered, duplicate-free list of selected car identifiers.
///
/// Deserializing goes through [`CompareList::from_ids`], so decoded lists are
/// deduplicated and capped like any other.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CompareList {
    ids: Vec<String>,
}

impl From<Vec<String>> for CompareList {
    fn from(ids: Vec<String>) -> Self {
        Self::from_ids(ids)
    }
}

impl From<CompareList> for Vec<String> {
    fn from(list: CompareList) -> Self {
        list.ids
    }
}

impl CompareList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from stored identifiers, dropping duplicates and
    /// anything past [`MAX_COMPARE`].
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = String>) -> Self {
        let mut list = Self::new();
        for id in ids {
            if list.ids.len() == MAX_COMPARE {
                break;
            }
            if !list.contains(&id) {
                list.ids.push(id);
            }
        }
        list
    }

    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.ids.len() >= MAX_COMPARE
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|x| x == id)
    }

    /// Removes `id` if present, otherwise appends it unless the list is full.
    pub fn toggle(&mut self, id: &str) -> ToggleOutcome {
        if let Some(index) = self.ids.iter().position(|x| x == id) {
            self.ids.remove(index);
            ToggleOutcome::Removed
        } else if self.is_full() {
            ToggleOutcome::RejectedCapacity
        } else {
            self.ids.push(id.to_owned());
            ToggleOutcome::Added
        }
    }

    /// Decodes a stored value. Anything unreadable is treated as an empty list.
    #[must_use]
    pub fn decode(stored: &str) -> Self {
        match serde_json::from_str::<Self>(stored) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable comparison list");
                Self::new()
            }
        }
    }

    /// Encodes the list for storage.
    pub fn encode(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Result of [`CompareManager::toggle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    RejectedCapacity,
}

impl ToggleOutcome {
    /// Fixed user feedback for each outcome.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            ToggleOutcome::Added => "Car added to comparison",
            ToggleOutcome::Removed => "Car removed from comparison",
            ToggleOutcome::RejectedCapacity => "You can compare up to 4 cars",
        }
    }

    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            ToggleOutcome::Added => Severity::Success,
            ToggleOutcome::Removed => Severity::Info,
            ToggleOutcome::RejectedCapacity => Severity::Warning,
        }
    }

    #[must_use]
    pub fn notice(&self) -> Notice {
        Notice::new(self.message(), self.severity())
    }
}

/// Navigation target of the comparison page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComparisonTarget {
    ids: Vec<String>,
}

impl ComparisonTarget {
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Relative URL with one `cars` parameter per identifier, in order.
    #[must_use]
    pub fn path(&self) -> String {
        let params = self.ids.iter().map(|id| ("cars", id.as_str()));
        match Url::parse_with_params(&format!("{COMPARE_ORIGIN}{COMPARE_PATH}"), params) {
            Ok(url) => format!("{}?{}", url.path(), url.query().unwrap_or_default()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build comparison URL");
                COMPARE_PATH.to_owned()
            }
        }
    }
}

/// Comparison list bound to its durable store.
pub struct CompareManager<S> {
    store: S,
    list: Option<CompareList>,
}

impl<S: KeyValueStore> CompareManager<S> {
    pub fn new(store: S) -> Self {
        Self { store, list: None }
    }

    /// Current list, reading it from the store on first access.
    pub fn list(&mut self) -> Result<&CompareList, StorageError> {
        if self.list.is_none() {
            let loaded = match self.store.get(COMPARE_KEY)? {
                Some(stored) => CompareList::decode(&stored),
                None => CompareList::new(),
            };
            tracing::debug!(count = loaded.len(), "Loaded comparison list");
            self.list = Some(loaded);
        }
        Ok(&*self.list.get_or_insert_with(CompareList::new))
    }

    /// Adds or removes `id`, persisting the list when it changes.
    ///
    /// If persisting fails the in-memory list is left as it was.
    pub fn toggle(&mut self, id: &str) -> Result<ToggleOutcome, StorageError> {
        let mut next = self.list()?.clone();
        let outcome = next.toggle(id);
        if outcome != ToggleOutcome::RejectedCapacity {
            self.store.set(COMPARE_KEY, &next.encode()?)?;
            self.list = Some(next);
        }
        tracing::debug!(id, ?outcome, "Toggled comparison entry");
        Ok(outcome)
    }

    /// Number of selected cars.
    pub fn current_count(&mut self) -> Result<usize, StorageError> {
        Ok(self.list()?.len())
    }

    /// Whether the counter badge should be visible.
    pub fn badge_visible(&mut self) -> Result<bool, StorageError> {
        Ok(self.current_count()? > 0)
    }

    pub fn is_selected(&mut self, id: &str) -> Result<bool, StorageError> {
        Ok(self.list()?.contains(id))
    }

    /// Navigation target for the comparison page, if at least
    /// [`MIN_COMPARE`] cars are selected.
    pub fn request_comparison_view(&mut self) -> Result<ComparisonTarget, CompareError> {
        let list = self.list()?;
        if list.len() < MIN_COMPARE {
            return Err(CompareError::InsufficientSelection {
                selected: list.len(),
            });
        }
        Ok(ComparisonTarget {
            ids: list.ids().to_vec(),
        })
    }

    /// Empties the list and removes it from the store.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.store.remove(COMPARE_KEY)?;
        self.list = Some(CompareList::new());
        Ok(())
    }
}
