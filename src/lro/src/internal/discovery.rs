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


//! Long-running operations for discovery-based services.
//!
//! Services described by discovery documents, such as Cloud ML Engine, return
//! a service-specific "Operation" resource. The operation has a name, which is
//! the handle used to query its status, a `done` flag, and an error payload
//! when the operation fails.

use crate::{Error, PollingBackoffPolicy, PollingErrorPolicy, PollingResult, Result};
use gax::error::rpc::Status;
use gax::loop_state::LoopState;
use gax::polling_state::PollingState;
use std::future::Future;
use std::sync::Arc;

/// The "Operation" resource of a discovery-based service.
///
/// Client libraries implement this trait so the poller can find the operation
/// handle, and can determine when the operation completed and if it failed.
pub trait DiscoveryOperation {
    /// Returns true once the operation completed, successfully or not.
    fn done(&self) -> bool;

    /// The operation handle.
    ///
    /// The poller reads this once, from the response that started the
    /// operation. Every later status query uses that value.
    fn name(&self) -> Option<&String>;

    /// The error payload, if the operation failed.
    fn status(&self) -> Option<Status>;
}

/// Returns a poller that calls `start` and then queries the operation status.
///
/// The first [poll()][crate::Poller::poll] calls `start` without waiting.
/// Each following call waits for the period returned by `backoff_policy` and
/// then calls `query` with the name of the started operation.
pub fn new_discovery_poller<S, SF, Q, QF, O>(
    error_policy: Arc<dyn PollingErrorPolicy>,
    backoff_policy: Arc<dyn PollingBackoffPolicy>,
    start: S,
    query: Q,
) -> impl crate::Poller<O, O>
where
    O: DiscoveryOperation + Send,
    S: FnOnce() -> SF + Send + Sync,
    SF: Future<Output = Result<O>> + Send + 'static,
    Q: FnMut(String) -> QF + Send + Sync + Clone,
    QF: Future<Output = Result<O>> + Send + 'static,
{
    DiscoveryPoller {
        error_policy,
        backoff_policy,
        query,
        stage: Stage::Start(start),
        state: PollingState::default(),
    }
}

/// Returns a poller for the running operation called `name`.
///
/// Each call to [poll()][crate::Poller::poll] waits for the period returned by
/// `backoff_policy` and then calls `query` with `name`. An empty `name`
/// completes the poller with a [binding][Error::is_binding] error, `query` is
/// never called in that case.
pub fn resume_discovery_poller<Q, QF, O>(
    error_policy: Arc<dyn PollingErrorPolicy>,
    backoff_policy: Arc<dyn PollingBackoffPolicy>,
    name: String,
    query: Q,
) -> impl crate::Poller<O, O>
where
    O: DiscoveryOperation + Send + 'static,
    Q: FnMut(String) -> QF + Send + Sync + Clone,
    QF: Future<Output = Result<O>> + Send + 'static,
{
    let empty_name =
        || std::future::ready(Err::<O, Error>(Error::binding("the operation name is empty")));
    let stage = if name.is_empty() {
        Stage::Start(empty_name)
    } else {
        Stage::Polling(name)
    };
    DiscoveryPoller {
        error_policy,
        backoff_policy,
        query,
        stage,
        state: PollingState::default(),
    }
}

/// Where the poller is in the life of the operation.
enum Stage<S> {
    /// The operation has not started.
    Start(S),
    /// The operation is running, the value is its handle.
    Polling(String),
    /// The poller reported the final result.
    Done,
}

/// The next stage, and the result reported by `poll()`.
type Transition<O> = (Option<String>, PollingResult<O, O>);

struct DiscoveryPoller<S, Q> {
    error_policy: Arc<dyn PollingErrorPolicy>,
    backoff_policy: Arc<dyn PollingBackoffPolicy>,
    query: Q,
    stage: Stage<S>,
    state: PollingState,
}

impl<S, Q> crate::sealed::Poller for DiscoveryPoller<S, Q> {}

impl<O, S, SF, Q, QF> crate::Poller<O, O> for DiscoveryPoller<S, Q>
where
    O: DiscoveryOperation + Send,
    S: FnOnce() -> SF + Send + Sync,
    SF: Future<Output = Result<O>> + Send + 'static,
    Q: FnMut(String) -> QF + Send + Sync + Clone,
    QF: Future<Output = Result<O>> + Send + 'static,
{
    async fn poll(&mut self) -> Option<PollingResult<O, O>> {
        let (next, result) = match std::mem::replace(&mut self.stage, Stage::Done) {
            Stage::Done => return None,
            Stage::Start(start) => on_started(start().await),
            Stage::Polling(name) => {
                let wait = self.backoff_policy.wait_period(&self.state);
                tokio::time::sleep(wait).await;
                self.state.attempt_count += 1;
                tracing::debug!(
                    operation = %name,
                    attempt = self.state.attempt_count,
                    "querying the operation status"
                );
                let response = (self.query)(name.clone()).await;
                on_queried(self.error_policy.as_ref(), &self.state, name, response)
            }
        };
        if let Some(name) = next {
            self.stage = Stage::Polling(name);
        }
        Some(result)
    }

    async fn until_done(mut self) -> Result<O> {
        loop {
            match self.poll().await {
                Some(PollingResult::Completed(r)) => return r,
                Some(PollingResult::InProgress(_)) => {}
                Some(PollingResult::PollingError(e)) => {
                    tracing::warn!("error querying the operation status, continuing: {e}");
                }
                // `poll()` returns `Completed` before it returns `None`.
                None => unreachable!("the poller completed without a result"),
            }
        }
    }

    #[cfg(feature = "unstable-stream")]
    fn into_stream(self) -> impl futures::Stream<Item = PollingResult<O, O>> + Unpin {
        Box::pin(futures::stream::unfold(self, |mut poller| async move {
            poller.poll().await.map(|r| (r, poller))
        }))
    }
}

fn on_started<O: DiscoveryOperation>(response: Result<O>) -> Transition<O> {
    let op = match response {
        Err(e) => return (None, PollingResult::Completed(Err(e))),
        Ok(op) => op,
    };
    if op.done() {
        return (None, on_finished(op));
    }
    if let Some(status) = op.status() {
        return (None, PollingResult::Completed(Err(Error::service(status))));
    }
    match op.name().filter(|n| !n.is_empty()).cloned() {
        Some(name) => (Some(name), PollingResult::InProgress(Some(op))),
        None => (
            None,
            PollingResult::Completed(Err(Error::deser(
                "the service returned a running operation without a name",
            ))),
        ),
    }
}

fn on_queried<O: DiscoveryOperation>(
    error_policy: &dyn PollingErrorPolicy,
    state: &PollingState,
    name: String,
    response: Result<O>,
) -> Transition<O> {
    let op = match response {
        Err(e) => return on_query_error(error_policy.on_error(state, e), name),
        Ok(op) => op,
    };
    if op.done() {
        return (None, on_finished(op));
    }
    if let Some(status) = op.status() {
        return (None, PollingResult::Completed(Err(Error::service(status))));
    }
    match error_policy.on_in_progress(state, &name) {
        Some(e) => (None, PollingResult::Completed(Err(e))),
        None => (Some(name), PollingResult::InProgress(Some(op))),
    }
}

fn on_query_error<O>(flow: LoopState, name: String) -> Transition<O> {
    match flow {
        LoopState::Continue(e) => (Some(name), PollingResult::PollingError(e)),
        LoopState::Permanent(e) | LoopState::Exhausted(e) => {
            (None, PollingResult::Completed(Err(e)))
        }
    }
}

fn on_finished<O: DiscoveryOperation>(op: O) -> PollingResult<O, O> {
    if let Some(status) = op.status() {
        return PollingResult::Completed(Err(Error::service(status)));
    }
    tracing::info!(operation = ?op.name(), "the operation completed");
    PollingResult::Completed(Ok(op))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Poller;
    use gax::polling_backoff_policy::FixedInterval;
    use gax::polling_error_policy::{PollingErrorPolicyExt, StopOnError};
    use std::time::Duration;
    use test_case::test_case;

    const HANDLE: &str = "projects/test-project/operations/create_census_v1-1234";

    #[derive(Clone, Debug, Default, PartialEq)]
    struct FakeOperation {
        finished: bool,
        handle: Option<String>,
        failure: Option<Status>,
        payload: Option<&'static str>,
    }

    impl FakeOperation {
        fn running() -> Self {
            Self {
                handle: Some(HANDLE.to_string()),
                ..Self::default()
            }
        }

        fn succeeded(payload: &'static str) -> Self {
            Self {
                finished: true,
                payload: Some(payload),
                ..Self::running()
            }
        }

        fn failed(failure: Status) -> Self {
            Self {
                finished: true,
                failure: Some(failure),
                ..Self::running()
            }
        }
    }

    impl DiscoveryOperation for FakeOperation {
        fn done(&self) -> bool {
            self.finished
        }
        fn name(&self) -> Option<&String> {
            self.handle.as_ref()
        }
        fn status(&self) -> Option<Status> {
            self.failure.clone()
        }
    }

    fn quota_status() -> Status {
        Status::default()
            .set_code(429)
            .set_message("quota exceeded")
            .set_status("RESOURCE_EXHAUSTED")
    }

    fn bad_model_status() -> Status {
        Status::default()
            .set_code(3)
            .set_message("Create Version failed. Bad model detected.")
    }

    fn has_status(result: &PollingResult<FakeOperation, FakeOperation>, want: &Status) -> bool {
        matches!(result, PollingResult::Completed(Err(e)) if e.status() == Some(want))
    }

    fn backoff() -> Arc<dyn PollingBackoffPolicy> {
        Arc::new(FixedInterval::new(Duration::from_millis(10)))
    }

    #[tokio::test(start_paused = true)]
    async fn start_then_query() -> anyhow::Result<()> {
        let mut poller = new_discovery_poller(
            Arc::new(StopOnError),
            backoff(),
            || async { Ok(FakeOperation::running()) },
            |name: String| async move {
                assert_eq!(name, HANDLE);
                Ok(FakeOperation::succeeded("census-v1"))
            },
        );
        let got = poller.poll().await;
        assert!(
            matches!(&got, Some(PollingResult::InProgress(Some(op))) if !op.finished),
            "{got:?}"
        );
        let got = poller.until_done().await?;
        assert_eq!(got.payload, Some("census-v1"));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn start_fails() {
        let query = |_name: String| -> std::future::Ready<Result<FakeOperation>> {
            unreachable!("no status queries after a failed start");
        };
        let got = new_discovery_poller(
            Arc::new(StopOnError),
            backoff(),
            || async { Err(Error::service(quota_status())) },
            query,
        )
        .until_done()
        .await;
        assert!(
            matches!(&got, Err(e) if e.status() == Some(&quota_status())),
            "{got:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn finished_with_failure() {
        let got = new_discovery_poller(
            Arc::new(StopOnError),
            backoff(),
            || async { Ok(FakeOperation::running()) },
            |_name: String| async { Ok(FakeOperation::failed(bad_model_status())) },
        )
        .until_done()
        .await;
        assert!(
            matches!(&got, Err(e) if e.status() == Some(&bad_model_status())),
            "{got:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn query_error_is_final() {
        let mut calls = 0;
        let query = move |_name: String| {
            calls += 1;
            assert_eq!(calls, 1, "no status queries after an error");
            async { Err::<FakeOperation, Error>(Error::service(quota_status())) }
        };
        let mut poller = new_discovery_poller(
            Arc::new(StopOnError),
            backoff(),
            || async { Ok(FakeOperation::running()) },
            query,
        );
        let _ = poller.poll().await;
        let got = poller.poll().await;
        assert!(
            got.as_ref().is_some_and(|r| has_status(r, &quota_status())),
            "{got:?}"
        );
        let got = poller.poll().await;
        assert!(got.is_none(), "{got:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn resume_empty_name() {
        let query = |_name: String| -> std::future::Ready<Result<FakeOperation>> {
            unreachable!("no status queries without a name");
        };
        let mut poller =
            resume_discovery_poller(Arc::new(StopOnError), backoff(), String::new(), query);
        let got = poller.poll().await;
        assert!(
            matches!(&got, Some(PollingResult::Completed(Err(e))) if e.is_binding()),
            "{got:?}"
        );
        assert!(poller.poll().await.is_none());
    }

    #[cfg(feature = "unstable-stream")]
    #[tokio::test(start_paused = true)]
    async fn stream() {
        use futures::StreamExt;
        let stream = new_discovery_poller(
            Arc::new(StopOnError),
            backoff(),
            || async { Ok(FakeOperation::running()) },
            |_name: String| async { Ok(FakeOperation::succeeded("census-v1")) },
        )
        .into_stream();
        let got: Vec<_> = stream.collect().await;
        assert_eq!(got.len(), 2, "{got:?}");
        assert!(
            matches!(got[0], PollingResult::InProgress(Some(_))),
            "{got:?}"
        );
        assert!(
            matches!(&got[1], PollingResult::Completed(Ok(op)) if op.payload == Some("census-v1")),
            "{got:?}"
        );
    }

    #[test]
    fn started_running() {
        let (next, result) = on_started(Ok(FakeOperation::running()));
        assert_eq!(next.as_deref(), Some(HANDLE));
        assert!(matches!(result, PollingResult::InProgress(Some(_))), "{result:?}");
    }

    #[test_case(Ok(FakeOperation::succeeded("census-v1")), true; "finished")]
    #[test_case(Ok(FakeOperation::failed(bad_model_status())), false; "finished with failure")]
    #[test_case(Err(Error::service(quota_status())), false; "rejected")]
    #[test_case(Ok(FakeOperation { failure: Some(quota_status()), ..FakeOperation::running() }), false; "running with failure")]
    fn started_final(response: Result<FakeOperation>, success: bool) {
        let (next, result) = on_started(response);
        assert!(next.is_none(), "{next:?}");
        match result {
            PollingResult::Completed(r) => assert_eq!(r.is_ok(), success, "{r:?}"),
            r => panic!("unexpected result {r:?}"),
        }
    }

    #[test_case(None; "missing")]
    #[test_case(Some(String::new()); "empty")]
    fn started_without_name(handle: Option<String>) {
        let response = FakeOperation {
            handle,
            ..FakeOperation::default()
        };
        let (next, result) = on_started(Ok(response));
        assert!(next.is_none(), "{next:?}");
        assert!(
            matches!(&result, PollingResult::Completed(Err(e)) if e.is_deserialization()),
            "{result:?}"
        );
    }

    #[test_case(Some("projects/test-project/operations/other"); "different")]
    #[test_case(Some(""); "empty")]
    #[test_case(None; "missing")]
    fn queried_keeps_handle(echoed: Option<&str>) {
        let state = PollingState::default().with_attempt_count(1);
        let response = FakeOperation {
            handle: echoed.map(str::to_string),
            ..FakeOperation::default()
        };
        let (next, result) = on_queried(&StopOnError, &state, HANDLE.to_string(), Ok(response));
        assert_eq!(next.as_deref(), Some(HANDLE));
        assert!(matches!(result, PollingResult::InProgress(Some(_))), "{result:?}");
    }

    #[test]
    fn queried_finished() {
        let state = PollingState::default().with_attempt_count(2);
        let response = Ok(FakeOperation::succeeded("census-v1"));
        let (next, result) = on_queried(&StopOnError, &state, HANDLE.to_string(), response);
        assert!(next.is_none(), "{next:?}");
        assert!(matches!(result, PollingResult::Completed(Ok(_))), "{result:?}");

        let response = Ok(FakeOperation::failed(bad_model_status()));
        let (next, result) = on_queried(&StopOnError, &state, HANDLE.to_string(), response);
        assert!(next.is_none(), "{next:?}");
        assert!(has_status(&result, &bad_model_status()), "{result:?}");
    }

    #[test]
    fn queried_error() {
        let state = PollingState::default().with_attempt_count(1);
        let response = Err(Error::service(quota_status()));
        let (next, result) = on_queried(&StopOnError, &state, HANDLE.to_string(), response);
        assert!(next.is_none(), "{next:?}");
        assert!(has_status(&result, &quota_status()), "{result:?}");
    }

    #[test]
    fn queried_attempt_limit() {
        let policy = StopOnError.with_attempt_limit(3);
        let state = PollingState::default().with_attempt_count(2);
        let (next, _) = on_queried(
            &policy,
            &state,
            HANDLE.to_string(),
            Ok(FakeOperation::running()),
        );
        assert_eq!(next.as_deref(), Some(HANDLE));

        let state = PollingState::default().with_attempt_count(3);
        let (next, result) = on_queried(
            &policy,
            &state,
            HANDLE.to_string(),
            Ok(FakeOperation::running()),
        );
        assert!(next.is_none(), "{next:?}");
        assert!(
            matches!(&result, PollingResult::Completed(Err(e)) if e.is_exhausted()),
            "{result:?}"
        );
    }

    #[test_case(LoopState::Continue(Error::service(quota_status())), true; "continue")]
    #[test_case(LoopState::Permanent(Error::service(quota_status())), false; "permanent")]
    #[test_case(LoopState::Exhausted(Error::service(quota_status())), false; "exhausted")]
    fn query_error_flow(flow: LoopState, keeps_polling: bool) {
        let (next, result) = on_query_error::<FakeOperation>(flow, HANDLE.to_string());
        assert_eq!(next.is_some(), keeps_polling, "{next:?}");
        let error = match result {
            PollingResult::PollingError(e) if keeps_polling => e,
            PollingResult::Completed(Err(e)) if !keeps_polling => e,
            r => panic!("unexpected result {r:?}"),
        };
        assert_eq!(error.status(), Some(&quota_status()));
    }
}
