// Search suggestion autocomplete.
//
// Each keystroke cancels the pending fetch and schedules a new one after the
// debounce delay, so a burst of typing produces a single request. Results are
// delivered as `SuggestionEvent`s on a channel owned by the render layer.
// In-flight requests are not cancelled; only the pending timer is.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::api::Backend;
use crate::error::{Action, ActionFailure};

pub type Task = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Runs a task after a delay, with a handle to cancel it before it fires.
pub trait Scheduler: Send + Sync {
    type Handle: TaskHandle;

    fn schedule(&self, delay: Duration, task: Task) -> Self::Handle;
}

pub trait TaskHandle: Send {
    fn cancel(&self);
}

/// [`Scheduler`] running delayed tasks on the tokio runtime.
///
/// Cancelling a handle stops the delay only. Once the delay has elapsed the
/// task runs detached and is no longer affected by `cancel`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioScheduler;

#[derive(Debug)]
pub struct TokioHandle(JoinHandle<()>);

impl TaskHandle for TokioHandle {
    fn cancel(&self) {
        self.0.abort();
    }
}

impl Scheduler for TokioScheduler {
    type Handle = TokioHandle;

    fn schedule(&self, delay: Duration, task: Task) -> TokioHandle {
        TokioHandle(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task);
        }))
    }
}

/// Keeps at most one scheduled task pending.
pub struct Debouncer<S: Scheduler> {
    scheduler: S,
    delay: Duration,
    pending: Option<S::Handle>,
}

impl<S: Scheduler> Debouncer<S> {
    pub fn new(scheduler: S, delay: Duration) -> Self {
        Self {
            scheduler,
            delay,
            pending: None,
        }
    }

    /// Cancels the pending task, if any, and schedules `task` in its place.
    pub fn call(&mut self, task: Task) {
        self.cancel();
        self.pending = Some(self.scheduler.schedule(self.delay, task));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
    }
}

impl<S: Scheduler> Drop for Debouncer<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Part of a suggestion, flagged if it matches the typed query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub matched: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    pub text: String,
    pub segments: Vec<Segment>,
}

impl Suggestion {
    pub fn new(text: String, query: &str) -> Self {
        let segments = highlight_match(&text, query);
        Self { text, segments }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SuggestionEvent {
    Show {
        query: String,
        suggestions: Vec<Suggestion>,
    },
    Hide,
}

/// Splits `text` into segments, marking every case-insensitive occurrence of `query`.
pub fn highlight_match(text: &str, query: &str) -> Vec<Segment> {
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return vec![Segment {
            text: text.to_owned(),
            matched: false,
        }];
    }

    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut pos = 0;
    while pos < text.len() {
        match match_len(&text[pos..], &needle) {
            Some(len) => {
                if plain_start < pos {
                    segments.push(Segment {
                        text: text[plain_start..pos].to_owned(),
                        matched: false,
                    });
                }
                segments.push(Segment {
                    text: text[pos..pos + len].to_owned(),
                    matched: true,
                });
                pos += len;
                plain_start = pos;
            }
            None => {
                pos += text[pos..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    if plain_start < text.len() {
        segments.push(Segment {
            text: text[plain_start..].to_owned(),
            matched: false,
        });
    }
    segments
}

// Byte length of the prefix of `haystack` equal to `needle` ignoring case.
fn match_len(haystack: &str, needle: &[char]) -> Option<usize> {
    let mut lowered = Vec::with_capacity(needle.len());
    for (offset, c) in haystack.char_indices() {
        lowered.extend(c.to_lowercase());
        if lowered.len() == needle.len() {
            return (lowered == needle).then(|| offset + c.len_utf8());
        }
        if lowered.len() > needle.len() || !needle.starts_with(&lowered) {
            return None;
        }
    }
    None
}

/// Debounced suggestion fetching for a search box.
pub struct Autocomplete<B, S: Scheduler> {
    backend: Arc<B>,
    debouncer: Debouncer<S>,
    min_chars: usize,
    events: UnboundedSender<SuggestionEvent>,
}

impl<B, S> Autocomplete<B, S>
where
    B: Backend + 'static,
    S: Scheduler,
{
    pub fn new(
        backend: Arc<B>,
        scheduler: S,
        delay: Duration,
        min_chars: usize,
        events: UnboundedSender<SuggestionEvent>,
    ) -> Self {
        Self {
            backend,
            debouncer: Debouncer::new(scheduler, delay),
            min_chars,
            events,
        }
    }

    /// Handles the current content of the search box.
    pub fn on_input(&mut self, text: &str) {
        let query = text.trim();
        if query.chars().count() < self.min_chars {
            self.debouncer.cancel();
            let _ = self.events.send(SuggestionEvent::Hide);
            return;
        }

        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        let query = query.to_owned();
        self.debouncer.call(Box::pin(async move {
            let event = match backend.search_suggestions(&query).await {
                Ok(found) if !found.is_empty() => SuggestionEvent::Show {
                    suggestions: found
                        .into_iter()
                        .map(|text| Suggestion::new(text, &query))
                        .collect(),
                    query,
                },
                Ok(_) => SuggestionEvent::Hide,
                Err(cause) => {
                    ActionFailure::log(Action::Suggestions, &cause);
                    SuggestionEvent::Hide
                }
            };
            let _ = events.send(event);
        }));
    }

    /// Drops any pending fetch, e.g. when the search box loses focus.
    pub fn dismiss(&mut self) {
        self.debouncer.cancel();
        let _ = self.events.send(SuggestionEvent::Hide);
    }
}
