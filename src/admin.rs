// Admin panel helpers: form checks, live stats polling and counter animation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::api::Backend;
use crate::error::{Action, ActionFailure, ValidationError};
use crate::models::StatsSnapshot;

/// Length of the counter animation shown when a stat changes.
pub const COUNTER_ANIMATION: Duration = Duration::from_millis(1000);

/// Checks that every required field has a non-blank value.
///
/// `fields` are `(name, value)` pairs of the required inputs. On failure the
/// error lists the blank field names in the given order.
pub fn validate_required<'a>(
    fields: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<(), ValidationError> {
    let missing: Vec<String> = fields
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name.to_owned())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields { fields: missing })
    }
}

/// Checks an image URL before previewing it. A blank value means "no image".
pub fn check_image_url(raw: &str) -> Result<Option<Url>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => {
            Ok(Some(url))
        }
        _ => Err(ValidationError::InvalidImageUrl),
    }
}

/// Value shown by an animated counter moving from `start` to `target`.
///
/// `progress` is clamped to `[0, 1]`; intermediate values are floored.
pub fn counter_value(start: i64, target: i64, progress: f64) -> i64 {
    let progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
    let value = start as f64 + (target as f64 - start as f64) * progress;
    value.floor() as i64
}

/// Animated counter over [`COUNTER_ANIMATION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterAnimation {
    pub start: i64,
    pub target: i64,
}

impl CounterAnimation {
    pub fn value_at(&self, elapsed: Duration) -> i64 {
        let progress = elapsed.as_secs_f64() / COUNTER_ANIMATION.as_secs_f64();
        counter_value(self.start, self.target, progress)
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= COUNTER_ANIMATION
    }
}

/// Polls the admin stats endpoint at a fixed period.
pub struct StatsPoller<B> {
    backend: Arc<B>,
    period: Duration,
}

impl<B: Backend + 'static> StatsPoller<B> {
    pub fn new(backend: Arc<B>, period: Duration) -> Self {
        Self { backend, period }
    }

    /// Spawns the polling loop. The first poll happens one period from now.
    /// Failed polls are logged and skipped. The loop ends when `sink` is closed.
    pub fn spawn(self, sink: UnboundedSender<StatsSnapshot>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + self.period, self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if sink.is_closed() {
                    break;
                }
                match self.backend.admin_stats().await {
                    Ok(snapshot) => {
                        tracing::debug!(stats = snapshot.0.len(), "Polled admin stats");
                        if sink.send(snapshot).is_err() {
                            break;
                        }
                    }
                    Err(cause) => ActionFailure::log(Action::Stats, &cause),
                }
            }
            tracing::debug!("Stats polling stopped");
        })
    }
}
