// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the trait for polling backoff policies and a fixed interval
//! implementation.
//!
//! The poller waits before each status query of a long-running operation.
//! These policies determine how long to wait.
//!
//! # Example
//! ```
//! # use mlengine_gax::polling_backoff_policy::*;
//! # use mlengine_gax::polling_state::PollingState;
//! use std::time::Duration;
//! let policy = FixedInterval::new(Duration::from_secs(1));
//! assert_eq!(policy.wait_period(&PollingState::default()), Duration::from_secs(1));
//! ```

use crate::polling_state::PollingState;
use std::sync::Arc;
use std::time::Duration;

/// Defines the trait implemented by all polling backoff strategies.
pub trait PollingBackoffPolicy: Send + Sync + std::fmt::Debug {
    /// Returns how long to wait before the next status query.
    ///
    /// # Parameters
    /// * `state` - the state of the polling loop. The attempt count does not
    ///   include the query that follows the wait.
    fn wait_period(&self, state: &PollingState) -> Duration;
}

/// A helper type to use [PollingBackoffPolicy] in client and request options.
#[derive(Clone, Debug)]
pub struct PollingBackoffPolicyArg(pub Arc<dyn PollingBackoffPolicy>);

impl<T: PollingBackoffPolicy + 'static> std::convert::From<T> for PollingBackoffPolicyArg {
    fn from(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl std::convert::From<Arc<dyn PollingBackoffPolicy>> for PollingBackoffPolicyArg {
    fn from(value: Arc<dyn PollingBackoffPolicy>) -> Self {
        Self(value)
    }
}

/// Waits the same amount of time before each status query.
///
/// The default interval is 300 milliseconds.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedInterval {
    interval: Duration,
}

impl FixedInterval {
    /// The default wait between status queries.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(300);

    /// Creates a policy waiting `interval` before each status query.
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// The wait between status queries.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for FixedInterval {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

impl PollingBackoffPolicy for FixedInterval {
    fn wait_period(&self, _state: &PollingState) -> Duration {
        self.interval
    }
}
