//! Override attempt policy.
//!
//! The default is open: failed supervisor checks may be retried
//! indefinitely. Deployments that want hardening configure a bounded
//! policy: N consecutive failures lock the flow for a cooldown.

use std::time::{Duration, Instant};

use crate::error::GateError;

/// How many failed override attempts to tolerate.
#[derive(Debug, Clone, Copy)]
pub struct OverridePolicy {
    max_failures: Option<u32>,
    cooldown: Duration,
}

impl OverridePolicy {
    /// Unlimited attempts, no cooldown.
    pub fn open() -> Self {
        Self {
            max_failures: None,
            cooldown: Duration::ZERO,
        }
    }

    /// Lock for `cooldown` after `max_failures` consecutive failures.
    pub fn bounded(max_failures: u32, cooldown: Duration) -> Self {
        Self {
            max_failures: Some(max_failures.max(1)),
            cooldown,
        }
    }
}

impl Default for OverridePolicy {
    fn default() -> Self {
        Self::open()
    }
}

/// Attempt bookkeeping for one override flow.
#[derive(Debug)]
pub struct OverrideAttempts {
    policy: OverridePolicy,
    consecutive_failures: u32,
    locked_until: Option<Instant>,
}

impl OverrideAttempts {
    pub fn new(policy: OverridePolicy) -> Self {
        Self {
            policy,
            consecutive_failures: 0,
            locked_until: None,
        }
    }

    /// May another attempt be made right now?
    ///
    /// An expired lock is dropped and the failure counter reset.
    pub fn check(&mut self) -> Result<(), GateError> {
        if let Some(until) = self.locked_until {
            if Instant::now() < until {
                return Err(GateError::OverrideLocked);
            }
            self.locked_until = None;
            self.consecutive_failures = 0;
        }
        Ok(())
    }

    /// Record a denied attempt; may engage the lock.
    pub fn record_failure(&mut self) {
        self.consecutive_failures += 1;
        if let Some(max) = self.policy.max_failures {
            if self.consecutive_failures >= max {
                self.locked_until = Some(Instant::now() + self.policy.cooldown);
            }
        }
    }

    /// Record a granted attempt; clears all bookkeeping.
    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
        self.locked_until = None;
    }

    pub fn failures(&self) -> u32 {
        self.consecutive_failures
    }
}

impl Default for OverrideAttempts {
    fn default() -> Self {
        Self::new(OverridePolicy::default())
    }
}
