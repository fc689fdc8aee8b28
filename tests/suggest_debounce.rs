mod support;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use car_store::suggest::{Autocomplete, SuggestionEvent, TokioScheduler};
use support::FakeBackend;
use tokio::sync::mpsc;
use tokio::time::sleep;

const DELAY: Duration = Duration::from_millis(300);

#[tokio::test(start_paused = true)]
async fn burst_of_typing_sends_one_request() {
    let backend = Arc::new(FakeBackend::with_pages(1));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut autocomplete = Autocomplete::new(Arc::clone(&backend), TokioScheduler, DELAY, 2, tx);

    for text in ["to", "toy", "toyo", "toyot"] {
        autocomplete.on_input(text);
        sleep(Duration::from_millis(100)).await;
    }
    autocomplete.on_input("toyota");
    assert!(backend.suggestion_queries.lock().is_empty());

    sleep(Duration::from_millis(350)).await;

    assert_eq!(*backend.suggestion_queries.lock(), vec!["toyota".to_string()]);
    match rx.recv().await {
        Some(SuggestionEvent::Show { query, suggestions }) => {
            assert_eq!(query, "toyota");
            assert_eq!(suggestions[0].text, "toyota Camry");
            assert!(suggestions[0].segments[0].matched);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn short_query_cancels_pending_fetch() {
    let backend = Arc::new(FakeBackend::with_pages(1));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut autocomplete = Autocomplete::new(Arc::clone(&backend), TokioScheduler, DELAY, 2, tx);

    autocomplete.on_input("ki");
    sleep(Duration::from_millis(100)).await;
    autocomplete.on_input(" k ");
    sleep(Duration::from_millis(500)).await;

    assert!(backend.suggestion_queries.lock().is_empty());
    assert_eq!(rx.recv().await, Some(SuggestionEvent::Hide));
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_hides_suggestions() {
    let backend = Arc::new(FakeBackend::with_pages(1));
    backend.fail(true);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut autocomplete = Autocomplete::new(Arc::clone(&backend), TokioScheduler, DELAY, 2, tx);

    autocomplete.on_input("bmw");
    sleep(Duration::from_millis(350)).await;

    assert_eq!(rx.recv().await, Some(SuggestionEvent::Hide));
    assert_eq!(backend.suggestion_queries.lock().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn keystroke_after_delay_keeps_request_in_flight() {
    let backend = Arc::new(FakeBackend::with_pages(1).with_suggestion_latency(Duration::from_millis(500)));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut autocomplete = Autocomplete::new(Arc::clone(&backend), TokioScheduler, DELAY, 2, tx);

    autocomplete.on_input("toy");
    sleep(Duration::from_millis(400)).await;
    autocomplete.on_input("toyota");
    sleep(Duration::from_secs(2)).await;

    assert_eq!(backend.completed_suggestions.load(Ordering::SeqCst), 2);
    let mut shown = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let SuggestionEvent::Show { query, .. } = event {
            shown.push(query);
        }
    }
    assert_eq!(shown, ["toy", "toyota"]);
}
