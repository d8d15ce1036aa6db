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


//! Client for the AI Platform Training & Prediction API (Cloud ML Engine v1).
//!
//! This crate contains a client to create models, create model versions, and
//! wait for the long-running operations that deploy the versions.
//!
//! # Example
//! ```no_run
//! # async fn sample() -> anyhow::Result<()> {
//! use lro::Poller;
//! use mlengine_v1::client::Client;
//! use mlengine_v1::model::{Model, Version};
//!
//! let client = Client::builder().build().await?;
//! client
//!     .create_model()
//!     .set_parent("projects/my-project")
//!     .set_model(Model::new().set_name("census"))
//!     .send()
//!     .await?;
//! let operation = client
//!     .create_version()
//!     .set_parent("projects/my-project/models/census")
//!     .set_version(
//!         Version::new()
//!             .set_name("v1")
//!             .set_deployment_uri("gs://my-bucket/census/model")
//!             .set_runtime_version("1.10"),
//!     )
//!     .poller()
//!     .until_done()
//!     .await?;
//! println!("version deployed: {:?}", operation.response_as::<Version>());
//! # Ok(()) }
//! ```

/// The client.
pub mod client;

pub mod builder;
pub mod client_builder;
pub mod model;

mod transport;

pub use gax::Result;
pub use gax::error::Error;
