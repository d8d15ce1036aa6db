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


//! Create a Cloud ML Engine model and a model version, then wait until the
//! version is deployed.
//!
//! The flow runs three steps in order:
//!
//! 1. [create_model] creates the model, a container for versions.
//! 2. [create_version] creates a version from trained model artifacts in Cloud
//!    Storage. The service returns a long-running operation.
//! 3. [wait_for_version] polls the operation until the deployment completes.
//!
//! [run] executes all the steps, printing a diagnostic for each failure.

pub mod args;
mod config;
mod deploy;
mod error;

pub use config::{DeploymentConfig, PollingConfig};
pub use deploy::{Report, create_model, create_version, run, wait_for_version};
pub use error::{Resource, StepError};
