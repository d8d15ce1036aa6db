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


use crate::config::{DeploymentConfig, PollingConfig};
use crate::error::{Resource, StepError};
use lro::Poller;
use mlengine::client::Client;
use mlengine::model::{Model, Operation};
use std::io::Write;

/// Creates the model described by `config`.
pub async fn create_model(client: &Client, config: &DeploymentConfig) -> Result<Model, StepError> {
    tracing::info!(parent = %config.project_name(), model = %config.model.name, "creating model");
    client
        .create_model()
        .set_parent(config.project_name())
        .set_model(config.model.clone())
        .send()
        .await
        .map_err(|source| StepError::Creation {
            resource: Resource::Model,
            source,
        })
}

/// Starts the creation of the version described by `config`.
///
/// Returns the long-running operation that tracks the deployment, its name is
/// the handle used by [wait_for_version].
pub async fn create_version(
    client: &Client,
    config: &DeploymentConfig,
) -> Result<Operation, StepError> {
    tracing::info!(parent = %config.model_name(), version = %config.version.name, "creating version");
    client
        .create_version()
        .set_parent(config.model_name())
        .set_version(config.version.clone())
        .send()
        .await
        .map_err(|source| StepError::Creation {
            resource: Resource::Version,
            source,
        })
}

/// Polls the operation named `operation_name` until it completes.
///
/// Each status query is preceded by a wait of `polling.interval`. Any error
/// querying the status stops the loop.
pub async fn wait_for_version(
    client: &Client,
    operation_name: &str,
    polling: &PollingConfig,
) -> Result<Operation, StepError> {
    tracing::info!(operation = %operation_name, "waiting for the version deployment");
    client
        .get_operation()
        .set_name(operation_name)
        .with_polling_error_policy(polling.error_policy())
        .with_polling_backoff_policy(polling.backoff_policy())
        .poller()
        .until_done()
        .await
        .map_err(|source| StepError::polling(operation_name, source))
}

/// The outcome of each step in [run].
#[derive(Debug)]
pub struct Report {
    /// The created model, or why the service rejected it.
    pub model: Result<Model, StepError>,
    /// The operation returned by the version creation request, or why the
    /// service rejected it.
    pub version: Result<Operation, StepError>,
    /// `None` if the version creation failed, as there is no operation to
    /// wait for.
    pub operation: Option<Result<Operation, StepError>>,
}

impl Report {
    /// Returns true if all the steps succeeded.
    pub fn is_success(&self) -> bool {
        self.model.is_ok()
            && self.version.is_ok()
            && self.operation.as_ref().is_some_and(|r| r.is_ok())
    }
}

/// Creates the model, creates the version, and waits for the deployment.
///
/// A failure creating the model does not stop the flow, the model may already
/// exist. A failure creating the version skips the wait. Each failure is
/// reported on `out` with the reason given by the service.
pub async fn run<W: Write>(
    client: &Client,
    config: &DeploymentConfig,
    polling: &PollingConfig,
    out: &mut W,
) -> std::io::Result<Report> {
    let model = create_model(client, config).await;
    diagnose(&model, out)?;

    let version = create_version(client, config).await;
    diagnose(&version, out)?;

    let operation = match &version {
        Ok(op) => {
            let result = wait_for_version(client, &op.name, polling).await;
            diagnose(&result, out)?;
            Some(result)
        }
        Err(_) => None,
    };
    if let Some(Ok(op)) = &operation {
        tracing::info!(operation = %op.name, "the version deployment completed");
    }

    Ok(Report {
        model,
        version,
        operation,
    })
}

fn diagnose<T, W: Write>(result: &Result<T, StepError>, out: &mut W) -> std::io::Result<()> {
    if let Err(e) = result {
        tracing::warn!("{e}");
        writeln!(out, "{}", e.headline())?;
        writeln!(out, "{}", e.reason())?;
    }
    Ok(())
}
