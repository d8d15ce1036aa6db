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


//! The decision a polling error policy makes after each failed status query.
//!
//! Only custom [PollingErrorPolicy][crate::polling_error_policy::PollingErrorPolicy]
//! implementations need this module.

use crate::error::Error;

/// What the polling loop does after a failed status query.
#[derive(Debug)]
pub enum LoopState {
    /// Stop polling and report the error.
    Permanent(Error),

    /// Stop polling because a limit was reached, even though the error might
    /// go away on a later query.
    Exhausted(Error),

    /// Report the error and keep polling.
    Continue(Error),
}

impl LoopState {
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Permanent(_))
    }
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted(_))
    }
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }
}
