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


//! The resources and messages used by the client.
//!
//! These types mirror the JSON representation of the AI Platform Training &
//! Prediction API (`ml.googleapis.com/v1`). Fields missing in a response take
//! their default values.

use gax::error::rpc::Status;
use lro::internal::DiscoveryOperation;
use std::collections::HashMap;

/// Represents a machine learning solution.
///
/// A model can have multiple versions, each of which is a deployed, trained
/// model ready to receive prediction requests. The model itself is just a
/// container.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct Model {
    /// The name specified for the model when it was created.
    ///
    /// The model name must be unique within the project it is created in.
    pub name: String,

    /// The description specified for the model when it was created.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// The list of regions where the model is going to be deployed.
    ///
    /// Only one region per model is supported.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<String>,

    /// If true, online prediction access logs are sent to Cloud Logging.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub online_prediction_logging: bool,

    /// One or more labels used to organize the models.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,

    /// Used to prevent simultaneous updates of a model.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub etag: String,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][Model::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [description][Model::description].
    pub fn set_description<T: Into<String>>(mut self, v: T) -> Self {
        self.description = v.into();
        self
    }

    /// Sets the value of [regions][Model::regions].
    pub fn set_regions<T, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.regions = v.into_iter().map(|i| i.into()).collect();
        self
    }

    /// Sets the value of [online_prediction_logging][Model::online_prediction_logging].
    pub fn set_online_prediction_logging<T: Into<bool>>(mut self, v: T) -> Self {
        self.online_prediction_logging = v.into();
        self
    }

    /// Sets the value of [labels][Model::labels].
    pub fn set_labels<T, K, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.labels = v.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }
}

/// Represents a version of the model.
///
/// Each version is a trained model deployed in the cloud, ready to handle
/// prediction requests.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct Version {
    /// The name specified for the version when it was created.
    ///
    /// The version name must be unique within the model it is created in.
    pub name: String,

    /// The description specified for the version when it was created.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// The Cloud Storage URI of a directory containing the trained model
    /// artifacts.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub deployment_uri: String,

    /// The runtime version to use for this deployment, e.g. `1.10`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub runtime_version: String,

    /// The machine learning framework used to train the model, e.g.
    /// `TENSORFLOW` or `SCIKIT_LEARN`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub framework: String,

    /// The version of Python used in prediction.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub python_version: String,

    /// The type of machine on which to serve the model.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub machine_type: String,

    /// One or more labels used to organize the versions.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,

    /// Output only. The state of the version, e.g. `CREATING` or `READY`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub state: String,

    /// Output only. The time the version was created, in RFC 3339 format.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub create_time: String,

    /// Output only. The details of a failure or a cancellation.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error_message: String,
}

impl Version {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][Version::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [description][Version::description].
    pub fn set_description<T: Into<String>>(mut self, v: T) -> Self {
        self.description = v.into();
        self
    }

    /// Sets the value of [deployment_uri][Version::deployment_uri].
    pub fn set_deployment_uri<T: Into<String>>(mut self, v: T) -> Self {
        self.deployment_uri = v.into();
        self
    }

    /// Sets the value of [runtime_version][Version::runtime_version].
    pub fn set_runtime_version<T: Into<String>>(mut self, v: T) -> Self {
        self.runtime_version = v.into();
        self
    }

    /// Sets the value of [framework][Version::framework].
    pub fn set_framework<T: Into<String>>(mut self, v: T) -> Self {
        self.framework = v.into();
        self
    }

    /// Sets the value of [python_version][Version::python_version].
    pub fn set_python_version<T: Into<String>>(mut self, v: T) -> Self {
        self.python_version = v.into();
        self
    }

    /// Sets the value of [machine_type][Version::machine_type].
    pub fn set_machine_type<T: Into<String>>(mut self, v: T) -> Self {
        self.machine_type = v.into();
        self
    }

    /// Sets the value of [labels][Version::labels].
    pub fn set_labels<T, K, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.labels = v.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }
}

/// This resource represents a long-running operation.
///
/// Creating a version returns one of these. Query its status using
/// [Client::get_operation][crate::client::Client::get_operation].
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct Operation {
    /// The server-assigned name, e.g. `projects/p/operations/create_m_v-1234`.
    pub name: String,

    /// If the value is `false`, the operation is still in progress. If `true`,
    /// the operation is completed, and either `error` or `response` is
    /// available.
    pub done: bool,

    /// Service-specific metadata associated with the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<OperationMetadata>,

    /// The error result of the operation in case of failure or cancellation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,

    /// The normal response of the operation in case of success.
    ///
    /// For version creation this is the new [Version].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
}

impl Operation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][Operation::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [done][Operation::done].
    pub fn set_done<T: Into<bool>>(mut self, v: T) -> Self {
        self.done = v.into();
        self
    }

    /// Sets the value of [metadata][Operation::metadata].
    pub fn set_metadata<T: Into<OperationMetadata>>(mut self, v: T) -> Self {
        self.metadata = Some(v.into());
        self
    }

    /// Sets the value of [error][Operation::error].
    pub fn set_error<T: Into<Status>>(mut self, v: T) -> Self {
        self.error = Some(v.into());
        self
    }

    /// Sets the value of [response][Operation::response].
    pub fn set_response<T: Into<serde_json::Value>>(mut self, v: T) -> Self {
        self.response = Some(v.into());
        self
    }

    /// Decodes the [response][Operation::response] into `T`.
    ///
    /// Returns `None` if there is no response, and an error if the response
    /// does not have the expected format.
    ///
    /// # Example
    /// ```
    /// # use mlengine_v1::model::{Operation, Version};
    /// let op = Operation::new()
    ///     .set_done(true)
    ///     .set_response(serde_json::json!({"name": "projects/p/models/m/versions/v"}));
    /// let version = op.response_as::<Version>().unwrap().unwrap();
    /// assert_eq!(version.name, "projects/p/models/m/versions/v");
    /// ```
    pub fn response_as<T>(&self) -> Option<gax::Result<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        self.response
            .as_ref()
            .map(|v| T::deserialize(v).map_err(gax::error::Error::deser))
    }
}

impl DiscoveryOperation for Operation {
    fn done(&self) -> bool {
        self.done
    }
    fn name(&self) -> Option<&String> {
        Some(&self.name)
    }
    fn status(&self) -> Option<Status> {
        self.error.clone()
    }
}

/// Represents the metadata of the long-running operation.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct OperationMetadata {
    /// The type name of the metadata message.
    #[serde(rename = "@type", skip_serializing_if = "String::is_empty")]
    pub type_url: String,

    /// The time the operation was submitted.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub create_time: String,

    /// The time operation processing started.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub start_time: String,

    /// The time operation processing completed.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub end_time: String,

    /// Indicates whether a request to cancel this operation has been made.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_cancellation_requested: bool,

    /// The operation type, e.g. `CREATE_VERSION`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub operation_type: String,

    /// Contains the name of the model associated with the operation.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub model_name: String,

    /// Contains the version associated with the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,

    /// The user labels, inherited from the model or the model version.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
}

impl OperationMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [operation_type][OperationMetadata::operation_type].
    pub fn set_operation_type<T: Into<String>>(mut self, v: T) -> Self {
        self.operation_type = v.into();
        self
    }

    /// Sets the value of [model_name][OperationMetadata::model_name].
    pub fn set_model_name<T: Into<String>>(mut self, v: T) -> Self {
        self.model_name = v.into();
        self
    }

    /// Sets the value of [version][OperationMetadata::version].
    pub fn set_version<T: Into<Version>>(mut self, v: T) -> Self {
        self.version = Some(v.into());
        self
    }
}
