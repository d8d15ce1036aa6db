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


use crate::client_builder::{self, ClientConfig};
use auth::credentials::{CacheableResource, Credentials};
use gax::Result;
use gax::error::Error;
use gax::error::rpc::Status;
use gax::polling_backoff_policy::{FixedInterval, PollingBackoffPolicy};
use gax::polling_error_policy::{PollingErrorPolicy, StopOnError};
use http::Extensions;
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use std::sync::Arc;

/// Sends JSON requests to the service and decodes the responses.
///
/// Cloning is cheap, the clones share the connection pool and credentials.
#[derive(Clone, Debug)]
pub(crate) struct HttpTransport {
    client: reqwest::Client,
    credentials: Credentials,
    endpoint: String,
    polling: PollingDefaults,
}

/// The client-wide polling policies, used when a request does not set its own.
#[derive(Clone, Debug, Default)]
struct PollingDefaults {
    error_policy: Option<Arc<dyn PollingErrorPolicy>>,
    backoff_policy: Option<Arc<dyn PollingBackoffPolicy>>,
}

impl HttpTransport {
    pub async fn new(config: ClientConfig, default_endpoint: &str) -> client_builder::Result<Self> {
        let credentials = match config.cred {
            Some(c) => c,
            None => auth::credentials::Builder::default()
                .build()
                .map_err(client_builder::Error::cred)?,
        };
        let client = reqwest::Client::builder()
            .build()
            .map_err(client_builder::Error::transport)?;
        Ok(Self {
            client,
            credentials,
            endpoint: config
                .endpoint
                .unwrap_or_else(|| default_endpoint.to_string()),
            polling: PollingDefaults {
                error_policy: config.polling_error_policy,
                backoff_policy: config.polling_backoff_policy,
            },
        })
    }

    /// Sends `body` as JSON to `path` and decodes the response.
    pub async fn post<I, O>(&self, path: &str, body: &I) -> Result<O>
    where
        I: serde::Serialize,
        O: serde::de::DeserializeOwned,
    {
        let body = serde_json::to_vec(body).map_err(Error::ser)?;
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn get<O: serde::de::DeserializeOwned>(&self, path: &str) -> Result<O> {
        self.send(Method::GET, path, None).await
    }

    async fn send<O: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<O> {
        let mut builder = self
            .client
            .request(method, format!("{}{path}", self.endpoint));
        for (name, value) in self.auth_headers().await?.iter() {
            builder = builder.header(name, value);
        }
        if let Some(body) = body {
            builder = builder
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body);
        }
        let request = builder.build().map_err(Error::ser)?;
        tracing::debug!(method = %request.method(), url = %request.url(), "sending request");
        let response = self.client.execute(request).await.map_err(send_error)?;
        decode(response).await
    }

    async fn auth_headers(&self) -> Result<http::HeaderMap> {
        match self
            .credentials
            .headers(Extensions::new())
            .await
            .map_err(Error::authentication)?
        {
            CacheableResource::New { data, .. } => Ok(data),
            // Only returned when the request carries an entity tag.
            CacheableResource::NotModified => Ok(http::HeaderMap::new()),
        }
    }

    /// The polling error policy for a request, falling back to the client
    /// configuration and then to [StopOnError].
    pub fn error_policy(
        &self,
        options: &crate::builder::RequestOptions,
    ) -> Arc<dyn PollingErrorPolicy> {
        options
            .polling_error_policy
            .as_ref()
            .or(self.polling.error_policy.as_ref())
            .cloned()
            .unwrap_or_else(|| Arc::new(StopOnError))
    }

    /// The polling backoff policy for a request, falling back to the client
    /// configuration and then to a [FixedInterval] of 300ms.
    pub fn backoff_policy(
        &self,
        options: &crate::builder::RequestOptions,
    ) -> Arc<dyn PollingBackoffPolicy> {
        options
            .polling_backoff_policy
            .as_ref()
            .or(self.polling.backoff_policy.as_ref())
            .cloned()
            .unwrap_or_else(|| Arc::new(FixedInterval::default()))
    }
}

fn send_error(error: reqwest::Error) -> Error {
    tracing::warn!("error sending request: {error}");
    if error.is_timeout() {
        return Error::timeout(error);
    }
    Error::io(error)
}

/// Decodes a successful response as `O`, or converts a failed response into
/// an [Error].
///
/// Failed responses carrying a service [Status] become service errors, any
/// other payload is kept as a HTTP error.
async fn decode<O: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<O> {
    let (parts, body) = http::Response::from(response).into_parts();
    let payload = http_body_util::BodyExt::collect(body)
        .await
        .map_err(Error::io)?
        .to_bytes();
    if parts.status.is_success() {
        return serde_json::from_slice(&payload).map_err(Error::deser);
    }
    let code = parts.status.as_u16();
    let error = match Status::try_from(&payload) {
        Ok(status) => Error::service_with_http_metadata(status, Some(code), Some(parts.headers)),
        Err(_) => Error::http(code, parts.headers, payload),
    };
    tracing::warn!(status_code = code, "request failed: {error}");
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderMap;
    use test_case::test_case;
    type TestResult = anyhow::Result<()>;

    #[derive(Debug, Default, PartialEq, serde::Deserialize)]
    #[serde(default)]
    struct Progress {
        name: String,
        done: bool,
    }

    fn response(code: u16, body: impl Into<String>) -> anyhow::Result<reqwest::Response> {
        let response = http::Response::builder()
            .header("content-type", "application/json")
            .status(code)
            .body(body.into())?;
        Ok(response.into())
    }

    #[tokio::test]
    #[test_case(r#"{"name": "op-1", "done": true}"#, "op-1", true; "all fields")]
    #[test_case(r#"{"name": "op-1"}"#, "op-1", false; "missing done")]
    #[test_case("{}", "", false; "empty object")]
    async fn decode_success(body: &str, name: &str, done: bool) -> TestResult {
        let got = decode::<Progress>(response(200, body)?).await?;
        let want = Progress {
            name: name.to_string(),
            done,
        };
        assert_eq!(got, want);
        Ok(())
    }

    #[tokio::test]
    #[test_case(""; "empty")]
    #[test_case("<html>oops</html>"; "not json")]
    async fn decode_success_bad_payload(body: &str) -> TestResult {
        let got = decode::<Progress>(response(200, body)?).await;
        assert!(
            matches!(&got, Err(e) if e.is_deserialization()),
            "{got:?}"
        );
        Ok(())
    }

    #[tokio::test]
    async fn decode_service_error() -> TestResult {
        let detail = serde_json::json!({
            "@type": "type.googleapis.com/google.rpc.ErrorInfo",
            "reason": "RATE_LIMIT_EXCEEDED",
        });
        let body = serde_json::json!({"error": {
            "code": 429,
            "message": "Quota exceeded for quota metric 'Create requests'.",
            "status": "RESOURCE_EXHAUSTED",
            "details": [detail.clone()],
        }});
        let got = decode::<Progress>(response(429, body.to_string())?).await;
        let err = got.expect_err("429 responses are errors");
        let want = Status::default()
            .set_code(429)
            .set_message("Quota exceeded for quota metric 'Create requests'.")
            .set_status("RESOURCE_EXHAUSTED")
            .set_details([detail]);
        assert_eq!(err.status(), Some(&want));
        assert_eq!(err.http_status_code(), Some(429));
        assert!(err.http_payload().is_none(), "{err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn decode_http_error() -> TestResult {
        let body = r#"{"error": "bad request"}"#;
        let got = decode::<Progress>(response(400, body)?).await;
        let err = got.expect_err("400 responses are errors");
        assert!(err.status().is_none(), "{err:?}");
        assert!(err.is_transport(), "{err:?}");
        assert_eq!(err.http_status_code(), Some(400));
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        assert_eq!(err.http_headers(), Some(&headers));
        assert_eq!(err.http_payload(), Some(&bytes::Bytes::from(body)));
        Ok(())
    }

    #[tokio::test]
    async fn policy_precedence() -> TestResult {
        use gax::polling_error_policy::PollingErrorPolicyExt;
        use std::time::Duration;
        let config = ClientConfig {
            cred: Some(auth::credentials::anonymous::Builder::new().build()),
            polling_backoff_policy: Some(Arc::new(FixedInterval::new(Duration::from_secs(5)))),
            ..ClientConfig::default()
        };
        let transport = HttpTransport::new(config, "https://ml.googleapis.com").await?;
        let state = gax::polling_state::PollingState::default();

        let mut options = crate::builder::RequestOptions::default();
        let backoff = transport.backoff_policy(&options);
        assert_eq!(backoff.wait_period(&state), Duration::from_secs(5));
        let error = transport.error_policy(&options);
        assert!(error.on_in_progress(&state, "op-1").is_none());

        options.set_polling_backoff_policy(FixedInterval::new(Duration::from_secs(1)));
        options.set_polling_error_policy(StopOnError.with_attempt_limit(1));
        let backoff = transport.backoff_policy(&options);
        assert_eq!(backoff.wait_period(&state), Duration::from_secs(1));
        let error = transport.error_policy(&options);
        let state = state.with_attempt_count(1);
        assert!(error.on_in_progress(&state, "op-1").is_some());
        Ok(())
    }
}
