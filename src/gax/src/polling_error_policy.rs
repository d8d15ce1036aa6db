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

//! Defines the types for polling error policies.
//!
//! # Example
//! ```
//! # use mlengine_gax::polling_error_policy::*;
//! use std::time::Duration;
//! // Poll for at most 15 minutes or at most 50 attempts: whichever limit is
//! // reached first stops the polling loop.
//! let policy = StopOnError
//!     .with_time_limit(Duration::from_secs(15 * 60))
//!     .with_attempt_limit(50);
//! ```
//!
//! The poller queries the policy after each failed status query, and after
//! each status query that reports the operation as still in progress. The
//! policy decides if the loop continues.
//!
//! The default policy, [StopOnError], treats every polling error as final and
//! never limits the number of attempts. Use the [PollingErrorPolicyExt]
//! decorators to bound the polling loop.

use crate::error::Error;
use crate::loop_state::LoopState;
use crate::polling_state::PollingState;
use std::sync::Arc;

/// Decides if the polling loop continues.
///
/// The poller consults the policy after every status query that fails, and
/// after every status query that reports a running operation.
pub trait PollingErrorPolicy: Send + Sync + std::fmt::Debug {
    /// Called after a failed status query.
    ///
    /// `state.attempt_count` already counts the failed query.
    fn on_error(&self, state: &PollingState, error: Error) -> LoopState;

    /// Called when a status query reports that the operation is running.
    ///
    /// Returning an error stops the polling loop with that error.
    fn on_in_progress(&self, _state: &PollingState, _operation_name: &str) -> Option<Error> {
        None
    }
}

/// Accepts any [PollingErrorPolicy] in the `with_polling_error_policy()`
/// setters.
#[derive(Clone, Debug)]
pub struct PollingErrorPolicyArg(pub Arc<dyn PollingErrorPolicy>);

impl<T> std::convert::From<T> for PollingErrorPolicyArg
where
    T: PollingErrorPolicy + 'static,
{
    fn from(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl std::convert::From<Arc<dyn PollingErrorPolicy>> for PollingErrorPolicyArg {
    fn from(value: Arc<dyn PollingErrorPolicy>) -> Self {
        Self(value)
    }
}

/// Limits for any [PollingErrorPolicy].
pub trait PollingErrorPolicyExt: PollingErrorPolicy + Sized {
    /// Stops the polling loop once `maximum_duration` has passed since the
    /// loop started, sleeps included.
    ///
    /// The loop then completes with an [exhausted][Error::is_exhausted] error.
    ///
    /// # Example
    /// ```
    /// # use mlengine_gax::polling_error_policy::*;
    /// # use mlengine_gax::polling_state::PollingState;
    /// use std::time::{Duration, Instant};
    /// let policy = StopOnError.with_time_limit(Duration::from_secs(10));
    /// let state = PollingState::default()
    ///     .with_loop_start(Instant::now() - Duration::from_secs(20))
    ///     .with_attempt_count(3);
    /// let error = policy.on_in_progress(&state, "projects/p/operations/op-1").unwrap();
    /// assert!(error.is_exhausted());
    /// ```
    fn with_time_limit(self, maximum_duration: std::time::Duration) -> LimitedElapsedTime<Self> {
        LimitedElapsedTime::custom(self, maximum_duration)
    }

    /// Stops the polling loop after `maximum_attempts` status queries.
    ///
    /// The loop then completes with an [exhausted][Error::is_exhausted] error.
    ///
    /// # Example
    /// ```
    /// # use mlengine_gax::polling_error_policy::*;
    /// # use mlengine_gax::polling_state::PollingState;
    /// let policy = StopOnError.with_attempt_limit(3);
    /// let name = "projects/p/operations/op-1";
    /// let state = PollingState::default().with_attempt_count(2);
    /// assert!(policy.on_in_progress(&state, name).is_none());
    /// let state = PollingState::default().with_attempt_count(3);
    /// assert!(policy.on_in_progress(&state, name).is_some());
    /// ```
    fn with_attempt_limit(self, maximum_attempts: u32) -> LimitedAttemptCount<Self> {
        LimitedAttemptCount::custom(self, maximum_attempts)
    }
}

impl<T: PollingErrorPolicy> PollingErrorPolicyExt for T {}

/// A polling policy that stops on the first error.
///
/// Any error querying the status of the operation, including transient
/// network problems, stops the polling loop. The error is reported to the
/// caller. This policy does not limit the number of attempts or the time
/// spent polling.
///
/// # Example
/// ```
/// # use mlengine_gax::polling_error_policy::*;
/// # use mlengine_gax::polling_state::PollingState;
/// use mlengine_gax::error::{Error, rpc::Status};
/// let policy = StopOnError;
/// let error = Error::service(Status::default().set_code(503).set_message("try again"));
/// assert!(policy.on_error(&PollingState::default(), error).is_permanent());
/// ```
#[derive(Clone, Debug, Default)]
pub struct StopOnError;

impl PollingErrorPolicy for StopOnError {
    fn on_error(&self, _state: &PollingState, error: Error) -> LoopState {
        LoopState::Permanent(error)
    }
}

/// Wraps the policy `P` with a limit on the time spent polling.
///
/// Past the limit, a [Continue][LoopState::Continue] decision of `P` becomes
/// [Exhausted][LoopState::Exhausted], and a running operation ends the loop
/// with an [exhausted][Error::is_exhausted] error.
#[derive(Debug)]
pub struct LimitedElapsedTime<P = StopOnError>
where
    P: PollingErrorPolicy,
{
    inner: P,
    maximum_duration: std::time::Duration,
}

impl LimitedElapsedTime {
    /// Creates a new instance, with the default inner policy.
    pub fn new(maximum_duration: std::time::Duration) -> Self {
        Self {
            inner: StopOnError,
            maximum_duration,
        }
    }
}

impl<P> LimitedElapsedTime<P>
where
    P: PollingErrorPolicy,
{
    /// Creates a new instance with a custom inner policy.
    pub fn custom(inner: P, maximum_duration: std::time::Duration) -> Self {
        Self {
            inner,
            maximum_duration,
        }
    }

    fn in_progress_impl(&self, start: std::time::Instant, operation_name: &str) -> Option<Error> {
        let elapsed = start.elapsed();
        if elapsed < self.maximum_duration {
            return None;
        }
        Some(Error::exhausted(Exhausted::new(
            operation_name,
            "elapsed time",
            format!("{elapsed:?}"),
            format!("{:?}", self.maximum_duration),
        )))
    }
}

impl<P> PollingErrorPolicy for LimitedElapsedTime<P>
where
    P: PollingErrorPolicy + 'static,
{
    fn on_error(&self, state: &PollingState, error: Error) -> LoopState {
        match self.inner.on_error(state, error) {
            LoopState::Continue(e) if state.loop_start.elapsed() >= self.maximum_duration => {
                LoopState::Exhausted(e)
            }
            s => s,
        }
    }

    fn on_in_progress(&self, state: &PollingState, operation_name: &str) -> Option<Error> {
        self.inner
            .on_in_progress(state, operation_name)
            .or_else(|| self.in_progress_impl(state.loop_start, operation_name))
    }
}

/// Wraps the policy `P` with a limit on the number of status queries.
///
/// Once `attempt_count` reaches the limit, a [Continue][LoopState::Continue]
/// decision of `P` becomes [Exhausted][LoopState::Exhausted], and a running
/// operation ends the loop with an [exhausted][Error::is_exhausted] error.
#[derive(Debug)]
pub struct LimitedAttemptCount<P = StopOnError>
where
    P: PollingErrorPolicy,
{
    inner: P,
    maximum_attempts: u32,
}

impl LimitedAttemptCount {
    /// Creates a new instance, with the default inner policy.
    pub fn new(maximum_attempts: u32) -> Self {
        Self {
            inner: StopOnError,
            maximum_attempts,
        }
    }
}

impl<P> LimitedAttemptCount<P>
where
    P: PollingErrorPolicy,
{
    /// Creates a new instance with a custom inner policy.
    pub fn custom(inner: P, maximum_attempts: u32) -> Self {
        Self {
            inner,
            maximum_attempts,
        }
    }

    fn in_progress_impl(&self, count: u32, operation_name: &str) -> Option<Error> {
        if count < self.maximum_attempts {
            return None;
        }
        Some(Error::exhausted(Exhausted::new(
            operation_name,
            "attempt count",
            count.to_string(),
            self.maximum_attempts.to_string(),
        )))
    }
}

impl<P> PollingErrorPolicy for LimitedAttemptCount<P>
where
    P: PollingErrorPolicy,
{
    fn on_error(&self, state: &PollingState, error: Error) -> LoopState {
        match self.inner.on_error(state, error) {
            LoopState::Continue(e) if state.attempt_count >= self.maximum_attempts => {
                LoopState::Exhausted(e)
            }
            s => s,
        }
    }

    fn on_in_progress(&self, state: &PollingState, operation_name: &str) -> Option<Error> {
        self.inner
            .on_in_progress(state, operation_name)
            .or_else(|| self.in_progress_impl(state.attempt_count, operation_name))
    }
}

/// The source of the errors returned when a polling limit is reached.
#[derive(thiserror::Error, Debug)]
#[error(
    "gave up waiting for {operation_name}, the {limit_name} ({value}) reached the limit ({limit})"
)]
pub struct Exhausted {
    operation_name: String,
    limit_name: &'static str,
    value: String,
    limit: String,
}

impl Exhausted {
    pub fn new(
        operation_name: &str,
        limit_name: &'static str,
        value: String,
        limit: String,
    ) -> Self {
        Self {
            operation_name: operation_name.to_string(),
            limit_name,
            value,
            limit,
        }
    }

    /// The name of the operation that was being polled.
    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::rpc::Status;
    use std::error::Error as _;
    use std::time::{Duration, Instant};
    use test_case::test_case;

    const NAME: &str = "projects/test-project/operations/create_model_v1";

    // Used to exercise the `Continue` branches of the decorators.
    #[derive(Debug)]
    struct ContinueOnError;

    impl PollingErrorPolicy for ContinueOnError {
        fn on_error(&self, _state: &PollingState, error: Error) -> LoopState {
            LoopState::Continue(error)
        }
    }

    #[test_case(service_error())]
    #[test_case(Error::io("connection reset"))]
    #[test_case(Error::http(503, http::HeaderMap::new(), bytes::Bytes::from_static(b"unavailable")))]
    fn stop_on_error(error: Error) {
        let policy = StopOnError;
        let state = PollingState::default().with_attempt_count(1);
        let flow = policy.on_error(&state, error);
        assert!(flow.is_permanent(), "{flow:?}");
        assert!(policy.on_in_progress(&state, NAME).is_none());

        let state = PollingState::default().with_attempt_count(u32::MAX);
        assert!(policy.on_in_progress(&state, NAME).is_none());
    }

    #[test]
    fn polling_error_policy_arg() {
        let _ = PollingErrorPolicyArg::from(StopOnError);
        let policy: Arc<dyn PollingErrorPolicy> = Arc::new(StopOnError.with_attempt_limit(3));
        let _ = PollingErrorPolicyArg::from(policy);
    }

    #[test]
    fn attempt_limit_in_progress() {
        let policy = StopOnError.with_attempt_limit(3);
        for count in 0..3 {
            let state = PollingState::default().with_attempt_count(count);
            assert!(policy.on_in_progress(&state, NAME).is_none(), "{count}");
        }
        let state = PollingState::default().with_attempt_count(3);
        let error = policy.on_in_progress(&state, NAME).unwrap();
        assert!(error.is_exhausted(), "{error:?}");
        let exhausted = error
            .source()
            .and_then(|e| e.downcast_ref::<Exhausted>())
            .unwrap();
        assert_eq!(exhausted.operation_name(), NAME);
        assert!(error.to_string().contains("attempt count"), "{error}");
    }

    #[test]
    fn attempt_limit_on_error() {
        let policy = LimitedAttemptCount::custom(ContinueOnError, 2);
        let state = PollingState::default().with_attempt_count(1);
        assert!(policy.on_error(&state, service_error()).is_continue());
        let state = PollingState::default().with_attempt_count(2);
        assert!(policy.on_error(&state, service_error()).is_exhausted());

        let policy = LimitedAttemptCount::new(2);
        let state = PollingState::default().with_attempt_count(1);
        assert!(policy.on_error(&state, service_error()).is_permanent());
    }

    #[test]
    fn time_limit_in_progress() {
        let policy = StopOnError.with_time_limit(Duration::from_secs(10));
        let state = PollingState::default();
        assert!(policy.on_in_progress(&state, NAME).is_none());

        let state = state.with_loop_start(Instant::now() - Duration::from_secs(20));
        let error = policy.on_in_progress(&state, NAME).unwrap();
        assert!(error.is_exhausted(), "{error:?}");
        assert!(error.to_string().contains("elapsed time"), "{error}");
    }

    #[test]
    fn time_limit_on_error() {
        let policy = LimitedElapsedTime::custom(ContinueOnError, Duration::from_secs(10));
        let state = PollingState::default();
        assert!(policy.on_error(&state, service_error()).is_continue());
        let state = state.with_loop_start(Instant::now() - Duration::from_secs(20));
        assert!(policy.on_error(&state, service_error()).is_exhausted());

        let policy = LimitedElapsedTime::new(Duration::from_secs(10));
        assert!(policy.on_error(&state, service_error()).is_permanent());
    }

    #[test]
    fn combined_limits() {
        let policy = StopOnError
            .with_time_limit(Duration::from_secs(60))
            .with_attempt_limit(5);
        let state = PollingState::default().with_attempt_count(4);
        assert!(policy.on_in_progress(&state, NAME).is_none());
        let state = state.with_attempt_count(5);
        assert!(policy.on_in_progress(&state, NAME).is_some());
        let state = PollingState::default()
            .with_attempt_count(1)
            .with_loop_start(Instant::now() - Duration::from_secs(120));
        assert!(policy.on_in_progress(&state, NAME).is_some());
    }

    fn service_error() -> Error {
        Error::service(
            Status::default()
                .set_code(429)
                .set_message("quota exceeded")
                .set_status("RESOURCE_EXHAUSTED"),
        )
    }
}
