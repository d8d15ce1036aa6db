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


//! Request builders for [Client][crate::client::Client].
//!
//! Each builder holds the request fields and the request options. Applications
//! set the fields and call `.send()`. The builders for methods that start a
//! long-running operation also offer `.poller()`.

use crate::model;
use crate::transport::HttpTransport;
use gax::Result;
use gax::error::Error;
use gax::polling_backoff_policy::{PollingBackoffPolicy, PollingBackoffPolicyArg};
use gax::polling_error_policy::{PollingErrorPolicy, PollingErrorPolicyArg};
use std::sync::Arc;

/// Per-request configuration.
///
/// Values set here override the client defaults.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    pub(crate) polling_error_policy: Option<Arc<dyn PollingErrorPolicy>>,
    pub(crate) polling_backoff_policy: Option<Arc<dyn PollingBackoffPolicy>>,
}

impl RequestOptions {
    /// Sets the polling error policy.
    pub fn set_polling_error_policy<V: Into<PollingErrorPolicyArg>>(&mut self, v: V) {
        self.polling_error_policy = Some(v.into().0);
    }

    /// Sets the polling backoff policy.
    pub fn set_polling_backoff_policy<V: Into<PollingBackoffPolicyArg>>(&mut self, v: V) {
        self.polling_backoff_policy = Some(v.into().0);
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    if value.is_empty() {
        return Err(Error::binding(format!(
            "missing required field `{field}`, the value must be non-empty"
        )));
    }
    Ok(value)
}

/// The request builder for [Client::create_model][crate::client::Client::create_model].
///
/// ```no_run
/// # use mlengine_v1::client::Client;
/// # use mlengine_v1::model::Model;
/// # async fn sample(client: &Client) -> gax::Result<()> {
/// let model = client
///     .create_model()
///     .set_parent("projects/my-project")
///     .set_model(Model::new().set_name("census").set_description("income classifier"))
///     .send()
///     .await?;
/// println!("created {model:?}");
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct CreateModel {
    stub: HttpTransport,
    parent: String,
    model: model::Model,
}

impl CreateModel {
    pub(crate) fn new(stub: HttpTransport) -> Self {
        Self {
            stub,
            parent: String::new(),
            model: model::Model::default(),
        }
    }

    /// Sets the project that owns the model, e.g. `projects/my-project`.
    ///
    /// This is a **required** field for requests.
    pub fn set_parent<T: Into<String>>(mut self, v: T) -> Self {
        self.parent = v.into();
        self
    }

    /// Sets the model to create.
    ///
    /// This is a **required** field for requests.
    pub fn set_model<T: Into<model::Model>>(mut self, v: T) -> Self {
        self.model = v.into();
        self
    }

    /// Sends the request.
    pub async fn send(self) -> Result<model::Model> {
        let path = format!("/v1/{}/models", required("parent", &self.parent)?);
        self.stub.post(&path, &self.model).await
    }
}

/// The request builder for [Client::create_version][crate::client::Client::create_version].
///
/// ```no_run
/// # use mlengine_v1::client::Client;
/// # use mlengine_v1::model::Version;
/// # async fn sample(client: &Client) -> gax::Result<()> {
/// use lro::Poller;
/// let operation = client
///     .create_version()
///     .set_parent("projects/my-project/models/census")
///     .set_version(
///         Version::new()
///             .set_name("v1")
///             .set_deployment_uri("gs://my-bucket/census/model")
///             .set_runtime_version("1.10"),
///     )
///     .poller()
///     .until_done()
///     .await?;
/// println!("version deployed {:?}", operation.response);
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct CreateVersion {
    stub: HttpTransport,
    parent: String,
    version: model::Version,
    options: RequestOptions,
}

impl CreateVersion {
    pub(crate) fn new(stub: HttpTransport) -> Self {
        Self {
            stub,
            parent: String::new(),
            version: model::Version::default(),
            options: RequestOptions::default(),
        }
    }

    /// Sets the model that owns the version, e.g.
    /// `projects/my-project/models/census`.
    ///
    /// This is a **required** field for requests.
    pub fn set_parent<T: Into<String>>(mut self, v: T) -> Self {
        self.parent = v.into();
        self
    }

    /// Sets the version to create.
    ///
    /// This is a **required** field for requests.
    pub fn set_version<T: Into<model::Version>>(mut self, v: T) -> Self {
        self.version = v.into();
        self
    }

    /// Overrides the polling error policy for this request.
    pub fn with_polling_error_policy<V: Into<PollingErrorPolicyArg>>(mut self, v: V) -> Self {
        self.options.set_polling_error_policy(v);
        self
    }

    /// Overrides the polling backoff policy for this request.
    pub fn with_polling_backoff_policy<V: Into<PollingBackoffPolicyArg>>(mut self, v: V) -> Self {
        self.options.set_polling_backoff_policy(v);
        self
    }

    /// Sends the request.
    ///
    /// Returns the long-running operation, the version is ready once the
    /// operation completes. Consider using [poller()][CreateVersion::poller]
    /// to wait for the result.
    pub async fn send(self) -> Result<model::Operation> {
        let path = format!("/v1/{}/versions", required("parent", &self.parent)?);
        self.stub.post(&path, &self.version).await
    }

    /// Creates a [Poller][lro::Poller] to work with `create_version`.
    pub fn poller(self) -> impl lro::Poller<model::Operation, model::Operation> {
        let polling_error_policy = self.stub.error_policy(&self.options);
        let polling_backoff_policy = self.stub.backoff_policy(&self.options);
        let stub = self.stub.clone();
        let query = move |name: String| {
            let stub = stub.clone();
            async { GetOperation::new(stub).set_name(name).send().await }
        };
        let start = move || async { self.send().await };
        lro::internal::new_discovery_poller(
            polling_error_policy,
            polling_backoff_policy,
            start,
            query,
        )
    }
}

/// The request builder for [Client::get_operation][crate::client::Client::get_operation].
///
/// ```no_run
/// # use mlengine_v1::client::Client;
/// # async fn sample(client: &Client) -> gax::Result<()> {
/// use lro::Poller;
/// let operation = client
///     .get_operation()
///     .set_name("projects/my-project/operations/create_census_v1-1234")
///     .poller()
///     .until_done()
///     .await?;
/// println!("operation completed {operation:?}");
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct GetOperation {
    stub: HttpTransport,
    name: String,
    options: RequestOptions,
}

impl GetOperation {
    pub(crate) fn new(stub: HttpTransport) -> Self {
        Self {
            stub,
            name: String::new(),
            options: RequestOptions::default(),
        }
    }

    /// Sets the name of the operation resource.
    ///
    /// This is a **required** field for requests.
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Overrides the polling error policy for this request.
    pub fn with_polling_error_policy<V: Into<PollingErrorPolicyArg>>(mut self, v: V) -> Self {
        self.options.set_polling_error_policy(v);
        self
    }

    /// Overrides the polling backoff policy for this request.
    pub fn with_polling_backoff_policy<V: Into<PollingBackoffPolicyArg>>(mut self, v: V) -> Self {
        self.options.set_polling_backoff_policy(v);
        self
    }

    /// Sends the request, fetching the current status of the operation once.
    pub async fn send(self) -> Result<model::Operation> {
        let path = format!("/v1/{}", required("name", &self.name)?);
        self.stub.get(&path).await
    }

    /// Creates a [Poller][lro::Poller] that waits for the operation to
    /// complete.
    ///
    /// Each poll waits for the polling backoff period and then fetches the
    /// operation status, always using the name set in this builder.
    pub fn poller(self) -> impl lro::Poller<model::Operation, model::Operation> {
        let polling_error_policy = self.stub.error_policy(&self.options);
        let polling_backoff_policy = self.stub.backoff_policy(&self.options);
        let stub = self.stub;
        let query = move |name: String| {
            let stub = stub.clone();
            async { GetOperation::new(stub).set_name(name).send().await }
        };
        lro::internal::resume_discovery_poller(
            polling_error_policy,
            polling_backoff_policy,
            self.name,
            query,
        )
    }
}
