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


use gax::polling_backoff_policy::FixedInterval;
use gax::polling_error_policy::{PollingErrorPolicy, PollingErrorPolicyExt, StopOnError};
use mlengine::model::{Model, Version};
use std::sync::Arc;
use std::time::Duration;

/// The resources created by the flow.
///
/// The `name` fields of `model` and `version` hold the short resource ids,
/// e.g. `census`, not the full resource names.
#[derive(Clone, Debug, PartialEq)]
pub struct DeploymentConfig {
    /// The project id, e.g. `my-project`.
    pub project: String,
    /// The model to create.
    pub model: Model,
    /// The version to create within the model.
    pub version: Version,
}

impl DeploymentConfig {
    /// The resource name of the project, e.g. `projects/my-project`.
    pub fn project_name(&self) -> String {
        format!("projects/{}", self.project)
    }

    /// The resource name of the model, e.g. `projects/my-project/models/census`.
    pub fn model_name(&self) -> String {
        format!("projects/{}/models/{}", self.project, self.model.name)
    }
}

/// Controls how the flow waits for the version deployment.
#[derive(Clone, Debug, PartialEq)]
pub struct PollingConfig {
    /// The time to wait before each status query.
    pub interval: Duration,
    /// Stop after this many status queries, if set.
    pub max_attempts: Option<u32>,
    /// Stop after this much time polling, if set.
    pub timeout: Option<Duration>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: FixedInterval::default().interval(),
            max_attempts: None,
            timeout: None,
        }
    }
}

impl PollingConfig {
    /// Any error querying the status stops the loop. The limits, if any, are
    /// applied on top of that.
    pub fn error_policy(&self) -> Arc<dyn PollingErrorPolicy> {
        match (self.max_attempts, self.timeout) {
            (None, None) => Arc::new(StopOnError),
            (Some(n), None) => Arc::new(StopOnError.with_attempt_limit(n)),
            (None, Some(t)) => Arc::new(StopOnError.with_time_limit(t)),
            (Some(n), Some(t)) => Arc::new(StopOnError.with_time_limit(t).with_attempt_limit(n)),
        }
    }

    pub fn backoff_policy(&self) -> FixedInterval {
        FixedInterval::new(self.interval)
    }
}
