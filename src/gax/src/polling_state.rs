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

//! The state of a polling loop.

use std::time::Instant;

/// Tracks the progress of a polling loop.
///
/// The poller updates this state before each status query, and passes it to
/// the polling policies.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct PollingState {
    /// When the polling loop started.
    pub loop_start: Instant,

    /// The number of status queries, including the current one.
    ///
    /// This is zero before the first query.
    pub attempt_count: u32,
}

impl PollingState {
    /// Creates a new state for a polling loop starting now.
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes the loop start time.
    pub fn with_loop_start(mut self, v: Instant) -> Self {
        self.loop_start = v;
        self
    }

    /// Changes the attempt count.
    pub fn with_attempt_count(mut self, v: u32) -> Self {
        self.attempt_count = v;
        self
    }
}

impl Default for PollingState {
    fn default() -> Self {
        Self {
            loop_start: Instant::now(),
            attempt_count: 0,
        }
    }
}
