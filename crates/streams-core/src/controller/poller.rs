use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use crate::controller::{CommitReport, Controller, FetchMode, FetchOutcome, ViewState};

/// Background refresh on a fixed wall-clock interval.
///
/// Ticks are never held back by fetches still in flight. Results commit in
/// completion order and the controller drops any that are older than what it
/// already shows.
pub struct Poller {
    interval: Duration,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn for_controller(controller: &Controller) -> Self {
        Self::new(controller.config().poll_interval)
    }

    /// Poll until `shutdown` resolves or the user turns out to be unauthorized.
    /// `on_commit` runs after every committed result.
    pub async fn run<S, F>(&self, controller: &mut Controller, shutdown: S, mut on_commit: F)
    where
        S: Future<Output = ()>,
        F: FnMut(&Controller, &CommitReport),
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately; the mount already loaded
        ticker.tick().await;

        let mut in_flight: FuturesUnordered<BoxFuture<'static, FetchOutcome>> =
            FuturesUnordered::new();
        if controller.take_refresh_request() {
            in_flight.push(Self::start(controller, FetchMode::Explicit));
        }

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::debug!("Polling stopped with {} fetches in flight", in_flight.len());
                    break;
                }
                _ = ticker.tick() => {
                    in_flight.push(Self::start(controller, FetchMode::Poll));
                }
                Some(outcome) = in_flight.next(), if !in_flight.is_empty() => {
                    let report = controller.commit(outcome);
                    if report != CommitReport::Stale {
                        on_commit(&*controller, &report);
                    }
                    if *controller.view() == ViewState::Unauthorized {
                        tracing::warn!("Stopping polling, user is unauthorized");
                        break;
                    }
                    if controller.take_refresh_request() {
                        in_flight.push(Self::start(controller, FetchMode::Explicit));
                    }
                }
            }
        }
    }

    fn start(controller: &mut Controller, mode: FetchMode) -> BoxFuture<'static, FetchOutcome> {
        let request = controller.begin_fetch(mode);
        controller.fetcher().execute(request).boxed()
    }
}
