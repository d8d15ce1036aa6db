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


use crate::builder;
use crate::transport::HttpTransport;

const DEFAULT_HOST: &str = "https://ml.googleapis.com";

/// Implements a client for the AI Platform Training & Prediction API.
///
/// # Example
/// ```no_run
/// # use mlengine_v1::client::Client;
/// # use mlengine_v1::model::Model;
/// # async fn sample() -> anyhow::Result<()> {
/// let client = Client::builder().build().await?;
/// let model = client
///     .create_model()
///     .set_parent("projects/my-project")
///     .set_model(Model::new().set_name("census"))
///     .send()
///     .await?;
/// println!("created {}", model.name);
/// # Ok(()) }
/// ```
///
/// # Configuration
///
/// To configure `Client` use the `with_*` methods in the type returned by
/// [builder()][Client::builder]. The default configuration should work for
/// most applications. Common configuration changes include
///
/// * [with_endpoint()]: by default this client uses the global default endpoint
///   (`https://ml.googleapis.com`). Applications using regional endpoints or
///   running in restricted networks (e.g. a network configured with
///   [Private Google Access with VPC Service Controls]) may want to override
///   this default.
/// * [with_credentials()]: by default this client uses
///   [Application Default Credentials]. Applications using custom
///   authentication may need to override this default.
///
/// [with_endpoint()]: crate::client_builder::ClientBuilder::with_endpoint
/// [with_credentials()]: crate::client_builder::ClientBuilder::with_credentials
/// [Private Google Access with VPC Service Controls]: https://cloud.google.com/vpc-service-controls/docs/private-connectivity
/// [Application Default Credentials]: https://cloud.google.com/docs/authentication#adc
///
/// # Pooling and Cloning
///
/// `Client` holds a connection pool internally, it is advised to
/// create one and then reuse it. You do not need to wrap `Client` in
/// an [Rc](std::rc::Rc) or [Arc](std::sync::Arc) to reuse it, because it
/// already uses an `Arc` internally.
#[derive(Clone, Debug)]
pub struct Client {
    inner: HttpTransport,
}

impl Client {
    /// Returns a builder for [Client].
    ///
    /// ```no_run
    /// # async fn sample() -> anyhow::Result<()> {
    /// # use mlengine_v1::client::Client;
    /// let client = Client::builder().build().await?;
    /// # Ok(()) }
    /// ```
    pub fn builder() -> crate::client_builder::ClientBuilder {
        crate::client_builder::ClientBuilder::new()
    }

    pub(crate) async fn new(
        config: crate::client_builder::ClientConfig,
    ) -> crate::client_builder::Result<Self> {
        let inner = HttpTransport::new(config, DEFAULT_HOST).await?;
        Ok(Self { inner })
    }

    /// Creates a model which will later contain one or more versions.
    pub fn create_model(&self) -> builder::CreateModel {
        builder::CreateModel::new(self.inner.clone())
    }

    /// Creates a new version of a model from a trained TensorFlow,
    /// scikit-learn, or XGBoost model.
    ///
    /// # Long running operations
    ///
    /// This method is used to start, and/or poll a [long-running Operation].
    /// The request builder offers a `poller()` method that returns a
    /// [Poller][lro::Poller] to wait for the operation to complete.
    ///
    /// [long-running Operation]: https://google.aip.dev/151
    pub fn create_version(&self) -> builder::CreateVersion {
        builder::CreateVersion::new(self.inner.clone())
    }

    /// Gets the latest state of a long-running operation.
    pub fn get_operation(&self) -> builder::GetOperation {
        builder::GetOperation::new(self.inner.clone())
    }
}
