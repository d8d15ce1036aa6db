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


//! Configure and create a [Client][crate::client::Client].

use auth::credentials::Credentials;
use gax::polling_backoff_policy::{PollingBackoffPolicy, PollingBackoffPolicyArg};
use gax::polling_error_policy::{PollingErrorPolicy, PollingErrorPolicyArg};
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, Error>;

/// The client could not be created.
///
/// Most failures come from the environment: Application Default Credentials
/// are not configured, or the TLS stack could not be initialized.
///
/// # Example
/// ```no_run
/// # use mlengine_v1::client::Client;
/// # async fn sample() -> anyhow::Result<()> {
/// let client = Client::builder().build().await.inspect_err(|e| {
///     if e.is_default_credentials() {
///         eprintln!("see https://cloud.google.com/docs/authentication/client-libraries");
///     }
/// })?;
/// # Ok(()) }
/// ```
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct Error(ErrorKind);

impl Error {
    /// Returns true if the default credentials could not be loaded.
    pub fn is_default_credentials(&self) -> bool {
        matches!(self.0, ErrorKind::Credentials(_))
    }

    /// Returns true if the HTTP client could not be created.
    pub fn is_transport(&self) -> bool {
        matches!(self.0, ErrorKind::HttpClient(_))
    }

    pub(crate) fn cred<T: Into<BoxError>>(source: T) -> Self {
        Self(ErrorKind::Credentials(source.into()))
    }

    pub(crate) fn transport<T: Into<BoxError>>(source: T) -> Self {
        Self(ErrorKind::HttpClient(source.into()))
    }
}

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(thiserror::Error, Debug)]
enum ErrorKind {
    #[error("cannot load the default credentials")]
    Credentials(#[source] BoxError),
    #[error("cannot create the HTTP transport")]
    HttpClient(#[source] BoxError),
}

/// Configures a [Client][crate::client::Client].
///
/// ```no_run
/// # use mlengine_v1::client::Client;
/// # async fn sample() -> mlengine_v1::client_builder::Result<()> {
/// let client = Client::builder()
///     .with_endpoint("https://us-central1-ml.googleapis.com")
///     .build()
///     .await?;
/// # Ok(()) }
/// ```
#[derive(Clone, Debug, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Creates the client, loading the default credentials if none were
    /// configured.
    pub async fn build(self) -> Result<crate::client::Client> {
        crate::client::Client::new(self.config).await
    }

    /// Overrides the service endpoint, `https://ml.googleapis.com` by default.
    ///
    /// Include the scheme, as in `http://127.0.0.1:8080` for a local test
    /// server.
    pub fn with_endpoint<V: Into<String>>(mut self, v: V) -> Self {
        self.config.endpoint = Some(v.into());
        self
    }

    /// Uses `v` instead of [Application Default Credentials].
    ///
    /// ```no_run
    /// # use mlengine_v1::client::Client;
    /// # async fn sample() -> anyhow::Result<()> {
    /// use auth::credentials::anonymous;
    /// let client = Client::builder()
    ///     .with_endpoint("http://127.0.0.1:8080")
    ///     .with_credentials(anonymous::Builder::new().build())
    ///     .build()
    ///     .await?;
    /// # Ok(()) }
    /// ```
    ///
    /// [Application Default Credentials]: https://cloud.google.com/docs/authentication/application-default-credentials
    pub fn with_credentials<T: Into<Credentials>>(mut self, v: T) -> Self {
        self.config.cred = Some(v.into());
        self
    }

    /// Sets the default polling error policy for long-running operations.
    ///
    /// Without this call the client stops polling on the first error, and
    /// waits for running operations without limit.
    ///
    /// ```no_run
    /// # use mlengine_v1::client::Client;
    /// # async fn sample() -> mlengine_v1::client_builder::Result<()> {
    /// use gax::polling_error_policy::{PollingErrorPolicyExt, StopOnError};
    /// use std::time::Duration;
    /// let client = Client::builder()
    ///     .with_polling_error_policy(
    ///         StopOnError
    ///             .with_time_limit(Duration::from_secs(20 * 60))
    ///             .with_attempt_limit(4_000),
    ///     )
    ///     .build()
    ///     .await?;
    /// # Ok(()) }
    /// ```
    pub fn with_polling_error_policy<V: Into<PollingErrorPolicyArg>>(mut self, v: V) -> Self {
        self.config.polling_error_policy = Some(v.into().0);
        self
    }

    /// Sets the default wait between operation status queries, 300ms unless
    /// configured.
    pub fn with_polling_backoff_policy<V: Into<PollingBackoffPolicyArg>>(mut self, v: V) -> Self {
        self.config.polling_backoff_policy = Some(v.into().0);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct ClientConfig {
    pub endpoint: Option<String>,
    pub cred: Option<Credentials>,
    pub polling_error_policy: Option<Arc<dyn PollingErrorPolicy>>,
    pub polling_backoff_policy: Option<Arc<dyn PollingBackoffPolicy>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use gax::polling_backoff_policy::FixedInterval;
    use gax::polling_error_policy::{PollingErrorPolicyExt, StopOnError};
    use std::error::Error as _;
    use std::time::Duration;

    #[test]
    fn unset_by_default() {
        let ClientConfig {
            endpoint,
            cred,
            polling_error_policy,
            polling_backoff_policy,
        } = ClientBuilder::new().config;
        assert!(endpoint.is_none(), "{endpoint:?}");
        assert!(cred.is_none(), "{cred:?}");
        assert!(polling_error_policy.is_none(), "{polling_error_policy:?}");
        assert!(polling_backoff_policy.is_none(), "{polling_backoff_policy:?}");
    }

    #[test]
    fn configured() {
        let config = ClientBuilder::new()
            .with_endpoint("http://127.0.0.1:8080")
            .with_credentials(auth::credentials::anonymous::Builder::new().build())
            .with_polling_error_policy(StopOnError.with_attempt_limit(5))
            .with_polling_backoff_policy(FixedInterval::new(Duration::from_secs(1)))
            .config;
        assert_eq!(config.endpoint.as_deref(), Some("http://127.0.0.1:8080"));
        assert!(config.cred.is_some());
        assert!(config.polling_error_policy.is_some());
        assert!(config.polling_backoff_policy.is_some());
    }

    #[test]
    fn credentials_error() {
        let error = Error::cred("no credentials");
        assert!(error.is_default_credentials(), "{error:?}");
        assert!(!error.is_transport(), "{error:?}");
        assert!(error.source().is_some(), "{error:?}");
    }

    #[test]
    fn transport_error() {
        let error = Error::transport("no TLS provider");
        assert!(error.is_transport(), "{error:?}");
        assert!(!error.is_default_credentials(), "{error:?}");
        assert_eq!(error.to_string(), "cannot create the HTTP transport");
    }
}
