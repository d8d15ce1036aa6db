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

//! Helpers to wait for long-running operations.
//!
//! Creating a model version starts a long-running operation (LRO) in the
//! service. The operation is represented by a resource, the client queries this
//! resource until it reports the operation as done.
//!
//! The [Poller] trait represents this polling loop. Applications call
//! [Poller::until_done] to wait until the operation completes, or call
//! [Poller::poll] in a loop to examine the intermediate states.

pub use gax::Result;
pub use gax::error::Error;
pub use gax::polling_backoff_policy::PollingBackoffPolicy;
pub use gax::polling_error_policy::PollingErrorPolicy;
use std::future::Future;

/// One step of a polling loop.
///
/// `R` is the value produced by a successful operation, `M` is the value
/// reported while the operation runs. For Cloud ML Engine both are the
/// `Operation` resource.
#[derive(Debug)]
pub enum PollingResult<R, M> {
    /// The operation is running. Contains the latest status, if any.
    InProgress(Option<M>),
    /// The polling loop is over.
    ///
    /// Holds an error if the operation failed, if a status query failed and
    /// the polling error policy stopped the loop, or if the policy limits were
    /// reached.
    Completed(Result<R>),
    /// A status query failed and the polling error policy chose to continue.
    ///
    /// The default policy never continues after an error.
    PollingError(Error),
}

pub(crate) mod sealed {
    pub trait Poller {}
}

/// Waits for a long-running operation.
///
/// Implementations are returned by the `poller()` method of the request
/// builders. The trait is sealed.
pub trait Poller<R, M>: Send + sealed::Poller {
    /// Runs one step of the polling loop.
    ///
    /// The first step of a poller that starts the operation sends the start
    /// request right away. Every other step sleeps for the polling backoff
    /// period and then queries the operation status.
    ///
    /// After returning [PollingResult::Completed] the poller is finished, and
    /// any further call returns `None`.
    fn poll(&mut self) -> impl Future<Output = Option<PollingResult<R, M>>> + Send;

    /// Runs the polling loop to completion and returns the final result.
    fn until_done(self) -> impl Future<Output = Result<R>> + Send;

    /// Returns the polling steps as a [Stream][futures::Stream].
    #[cfg(feature = "unstable-stream")]
    fn into_stream(self) -> impl futures::Stream<Item = PollingResult<R, M>> + Unpin;
}

pub mod internal;
