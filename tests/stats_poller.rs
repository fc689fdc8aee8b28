mod support;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use car_store::admin::StatsPoller;
use support::FakeBackend;
use tokio::sync::mpsc;
use tokio::time::sleep;

const PERIOD: Duration = Duration::from_secs(30);

#[tokio::test(start_paused = true)]
async fn polls_once_per_period() {
    let backend = Arc::new(FakeBackend::with_pages(1));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = StatsPoller::new(Arc::clone(&backend), PERIOD).spawn(tx);

    sleep(Duration::from_secs(29)).await;
    assert_eq!(backend.stats_calls.load(Ordering::SeqCst), 0);

    let first = rx.recv().await.unwrap();
    assert_eq!(first.get("total_cars"), Some(1.0));
    let second = rx.recv().await.unwrap();
    assert_eq!(second.get("total_cars"), Some(2.0));

    handle.abort();
}

#[tokio::test(start_paused = true)]
async fn failed_poll_is_skipped() {
    let backend = Arc::new(FakeBackend::with_pages(1));
    backend.fail(true);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = StatsPoller::new(Arc::clone(&backend), PERIOD).spawn(tx);

    sleep(Duration::from_secs(31)).await;
    assert_eq!(backend.stats_calls.load(Ordering::SeqCst), 1);
    assert!(rx.try_recv().is_err());

    backend.fail(false);
    let snapshot = rx.recv().await.unwrap();
    assert_eq!(snapshot.get("total_cars"), Some(2.0));

    handle.abort();
}

#[tokio::test(start_paused = true)]
async fn stops_when_receiver_is_dropped() {
    let backend = Arc::new(FakeBackend::with_pages(1));
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = StatsPoller::new(Arc::clone(&backend), PERIOD).spawn(tx);

    drop(rx);
    sleep(Duration::from_secs(31)).await;

    assert!(handle.await.is_ok());
    assert_eq!(backend.stats_calls.load(Ordering::SeqCst), 0);
}
