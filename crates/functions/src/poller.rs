//! Readiness poller.
//!
//! The host's registration capability is not there yet when the library
//! loads. Check on a fixed delay until it is, then hand it over exactly
//! once. The number of checks is bounded unless configured otherwise.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rangefn_config::Settings;

use crate::host::{FunctionHost, HostSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between checks
    pub interval: Duration,
    /// Check limit; `None` polls until the process ends
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl PollPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            interval: settings.poll_interval(),
            max_attempts: settings.max_attempts,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Capability found on check number `attempts`
    Ready { attempts: u32 },
    /// Attempt limit reached without seeing the capability
    GaveUp { attempts: u32 },
}

pub struct ReadinessPoller {
    policy: PollPolicy,
}

impl ReadinessPoller {
    pub fn new(policy: PollPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Check with `check`, sleeping between attempts, on this thread.
    pub fn run<H, P, F>(&self, check: P, on_ready: F) -> PollOutcome
    where
        P: FnMut() -> Option<H>,
        F: FnOnce(H),
    {
        self.poll(check, thread::sleep, on_ready)
    }

    /// Check `slot`. An install wakes the wait early.
    pub fn run_for_slot<F>(&self, slot: &HostSlot, on_ready: F) -> PollOutcome
    where
        F: FnOnce(Arc<dyn FunctionHost>),
    {
        self.poll(
            || slot.get(),
            |interval| {
                slot.wait_for(interval);
            },
            on_ready,
        )
    }

    /// Run [`run_for_slot`](Self::run_for_slot) on a background thread.
    pub fn spawn<F>(self, slot: Arc<HostSlot>, on_ready: F) -> std::io::Result<thread::JoinHandle<PollOutcome>>
    where
        F: FnOnce(Arc<dyn FunctionHost>) + Send + 'static,
    {
        thread::Builder::new()
            .name("rangefn-readiness".into())
            .spawn(move || self.run_for_slot(&slot, on_ready))
    }

    fn poll<H, P, W, F>(&self, mut check: P, mut wait: W, on_ready: F) -> PollOutcome
    where
        P: FnMut() -> Option<H>,
        W: FnMut(Duration),
        F: FnOnce(H),
    {
        let limit = self.policy.max_attempts.map(|n| n.max(1));
        let mut attempts: u32 = 0;

        loop {
            attempts = attempts.saturating_add(1);

            if let Some(host) = check() {
                log::debug!("Host capability available after {} check(s)", attempts);
                on_ready(host);
                return PollOutcome::Ready { attempts };
            }

            if limit.is_some_and(|limit| attempts >= limit) {
                log::error!(
                    "Host capability not available after {} checks; custom functions will not be registered",
                    attempts
                );
                return PollOutcome::GaveUp { attempts };
            }

            log::trace!("Host capability not ready, retrying in {:?}", self.policy.interval);
            wait(self.policy.interval);
        }
    }
}
