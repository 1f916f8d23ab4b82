use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use minitranslator_languages::LanguagePair;
use tokio_util::sync::CancellationToken;

use crate::clients::{AvailabilityProbe, ProbeStatus};

/// Delay between two probe calls
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// How a poll loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollExit {
    /// A terminal status was applied
    Finished { retry: bool },
    /// The owning request is no longer current
    Superseded,
    /// The cancellation token fired
    Cancelled,
}

/// Drives an [`AvailabilityProbe`] at a fixed interval.
///
/// The poller only schedules probe calls; what an observation means is
/// decided by the callback, which returns `Break` to stop the loop.
#[derive(Clone)]
pub struct AvailabilityPoller {
    probe: Arc<dyn AvailabilityProbe>,
    interval: Duration,
}

impl AvailabilityPoller {
    pub fn new(probe: Arc<dyn AvailabilityProbe>) -> Self {
        Self {
            probe,
            interval: POLL_INTERVAL,
        }
    }

    /// Poll until the callback breaks or `cancel` fires.
    ///
    /// The first probe runs immediately. A probe error is passed to the
    /// callback as `None` and polling goes on. There is no attempt limit.
    pub async fn run<F>(
        &self,
        pair: LanguagePair,
        cancel: &CancellationToken,
        mut on_observed: F,
    ) -> PollExit
    where
        F: FnMut(Option<ProbeStatus>) -> ControlFlow<PollExit>,
    {
        let mut tick: u64 = 0;

        loop {
            let result = tokio::select! {
                _ = cancel.cancelled() => return PollExit::Cancelled,
                result = self.probe.status(pair) => result,
            };

            let observed = match result {
                Ok(status) => {
                    debug!("Availability of {} (tick {}): {}", pair, tick, status);
                    Some(status)
                }
                Err(e) => {
                    warn!("Availability check for {} failed: {}", pair, e);
                    None
                }
            };

            if let ControlFlow::Break(exit) = on_observed(observed) {
                debug!("Stopped polling {} after {} ticks: {:?}", pair, tick + 1, exit);
                return exit;
            }

            tick += 1;

            tokio::select! {
                _ = cancel.cancelled() => return PollExit::Cancelled,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }
}
