//! Endpoint rotation.
//!
//! The rotator owns the current endpoint id and a count of requests accounted
//! since the last rotation. Both live behind one mutex, so incrementing the
//! count, rotating and resetting happen in a single critical section: with a
//! threshold of `t`, `n` accounted requests always produce exactly `n / t`
//! rotations however many threads are calling.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use dsnsync_types::EndpointId;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use tracing::info;

/// Requests accounted before the endpoint rotates, unless configured.
pub const DEFAULT_ROTATION_THRESHOLD: NonZeroU32 = NonZeroU32::MIN.saturating_add(99);

/// What a rotation does when the endpoint id is already `999`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Start over at `001`.
    #[default]
    Wrap,
    /// Fail with [`SyncError::RotationOverflow`], leaving the id and the
    /// request count unchanged.
    Reject,
}

#[derive(Debug)]
struct RotationState {
    current: EndpointId,
    count: u32,
}

/// Owns the current endpoint id and rotates it every `threshold` requests.
#[derive(Debug)]
pub struct EndpointRotator {
    state: Mutex<RotationState>,
    threshold: NonZeroU32,
    policy: OverflowPolicy,
}

impl Default for EndpointRotator {
    fn default() -> Self {
        Self::new(DEFAULT_ROTATION_THRESHOLD, OverflowPolicy::default())
    }
}

impl EndpointRotator {
    /// Creates a rotator starting at `001` with an empty counter.
    pub fn new(threshold: NonZeroU32, policy: OverflowPolicy) -> Self {
        Self {
            state: Mutex::new(RotationState {
                current: EndpointId::FIRST,
                count: 0,
            }),
            threshold,
            policy,
        }
    }

    /// Creates a rotator from the rotation settings of `config`.
    pub fn from_config(config: &SyncConfig) -> SyncResult<Self> {
        let threshold = NonZeroU32::new(config.rotation_threshold).ok_or_else(|| {
            SyncError::Config("rotation_threshold must be at least 1".to_string())
        })?;
        Ok(Self::new(threshold, config.overflow_policy))
    }

    /// Starts the rotator at `id` instead of `001`.
    #[must_use]
    pub fn starting_at(mut self, id: EndpointId) -> Self {
        self.state.get_mut().current = id;
        self
    }

    /// Returns the current endpoint id.
    pub fn current(&self) -> EndpointId {
        self.state.lock().current
    }

    /// Returns the number of requests accounted since the last rotation.
    pub fn request_count(&self) -> u32 {
        self.state.lock().count
    }

    pub fn threshold(&self) -> NonZeroU32 {
        self.threshold
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Accounts one request and returns the endpoint id after it.
    ///
    /// When the count reaches the threshold the id advances and the count
    /// goes back to zero. Under [`OverflowPolicy::Reject`] a request that
    /// would rotate past `999` is not accounted.
    pub fn account_request(&self) -> SyncResult<EndpointId> {
        let mut state = self.state.lock();
        let count = state.count.saturating_add(1);
        if count >= self.threshold.get() {
            self.advance(&mut state)?;
        } else {
            state.count = count;
        }
        Ok(state.current)
    }

    /// Rotates immediately, regardless of the counter, and resets it.
    pub fn rotate(&self) -> SyncResult<EndpointId> {
        let mut state = self.state.lock();
        self.advance(&mut state)?;
        Ok(state.current)
    }

    /// Sets the request count back to zero without rotating.
    pub fn reset_counter(&self) {
        self.state.lock().count = 0;
    }

    /// Returns true if `s` is a well-formed endpoint id (`1..=999`).
    pub fn validate_format(s: &str) -> bool {
        EndpointId::is_valid(s)
    }

    fn advance(&self, state: &mut RotationState) -> SyncResult<()> {
        let previous = state.current;
        let next = match (previous.next(), self.policy) {
            (Some(next), _) => next,
            (None, OverflowPolicy::Wrap) => EndpointId::FIRST,
            (None, OverflowPolicy::Reject) => {
                return Err(SyncError::RotationOverflow { current: previous });
            }
        };
        state.current = next;
        state.count = 0;
        info!(from = %previous, to = %next, "Rotated endpoint");
        Ok(())
    }
}
