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


//! Command-line arguments for `create_model_version`.

use crate::config::{DeploymentConfig, PollingConfig};
use anyhow::bail;
use clap::Parser;
use humantime::parse_duration;
use mlengine::model::{Model, Version};
use std::time::Duration;

const DESCRIPTION: &str = concat!(
    "Creates a model and a model version in Cloud ML Engine, then waits",
    " until the version is deployed.",
    " Authentication uses Application Default Credentials, for example the",
    " service account file named by GOOGLE_APPLICATION_CREDENTIALS."
);

/// Configuration options for the deployment.
#[derive(Clone, Debug, Parser)]
#[command(about, long_about = DESCRIPTION)]
pub struct Args {
    /// The project that owns the model.
    #[arg(long, env = "GOOGLE_CLOUD_PROJECT")]
    pub project: String,

    /// The model id.
    ///
    /// Unless `--no-timestamp-suffix` is set, a `%Y%m%d_%H%M%S` timestamp is
    /// appended to make the id unique.
    #[arg(long)]
    pub model: String,

    /// The model description.
    #[arg(long, default_value = "Another model for testing.")]
    pub model_description: String,

    /// The version id.
    ///
    /// Unless `--no-timestamp-suffix` is set, a `%Y%m%d_%H%M%S` timestamp is
    /// appended to make the id unique.
    #[arg(long)]
    pub version: String,

    /// The version description.
    #[arg(long)]
    pub version_description: Option<String>,

    /// The Cloud Storage directory with the trained model, e.g.
    /// `gs://my-bucket/census/model/`.
    #[arg(long)]
    pub deployment_uri: String,

    /// The runtime version used to serve the model.
    #[arg(long, default_value = "1.10")]
    pub runtime_version: String,

    /// The framework used to train the model, e.g. `SCIKIT_LEARN` or
    /// `XGBOOST`. The service assumes `TENSORFLOW` if not set.
    #[arg(long)]
    pub framework: Option<String>,

    /// The Python version used in prediction.
    #[arg(long)]
    pub python_version: Option<String>,

    /// Override the service endpoint, e.g. to use a regional endpoint.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// The time to wait before each operation status query.
    #[arg(long, value_parser = parse_duration, default_value = "300ms")]
    pub poll_interval: Duration,

    /// Stop waiting after this many operation status queries.
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Stop waiting after this much time.
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Use the model and version ids as given.
    #[arg(long, default_value_t = false)]
    pub no_timestamp_suffix: bool,

    /// The log level for the messages written to stderr.
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,
}

impl Args {
    /// Validates the arguments after parsing.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_attempts.is_some_and(|v| v == 0) {
            bail!("invalid number of polling attempts, should be > 0")
        }
        if self.poll_interval.is_zero() {
            bail!("invalid polling interval, should be > 0")
        }
        if self.timeout.is_some_and(|v| v.is_zero()) {
            bail!("invalid timeout, should be > 0")
        }
        Ok(())
    }

    /// The resources to create, with the timestamp suffix applied if needed.
    pub fn deployment_config(&self) -> DeploymentConfig {
        self.deployment_config_at(chrono::Local::now().naive_local())
    }

    fn deployment_config_at(&self, now: chrono::NaiveDateTime) -> DeploymentConfig {
        let suffix = if self.no_timestamp_suffix {
            String::new()
        } else {
            now.format("%Y%m%d_%H%M%S").to_string()
        };
        let version = Version::new()
            .set_name(format!("{}{suffix}", self.version))
            .set_description(self.version_description.clone().unwrap_or_default())
            .set_deployment_uri(&self.deployment_uri)
            .set_runtime_version(&self.runtime_version);
        let version = self
            .framework
            .iter()
            .fold(version, |v, f| v.set_framework(f));
        let version = self
            .python_version
            .iter()
            .fold(version, |v, p| v.set_python_version(p));
        DeploymentConfig {
            project: self.project.clone(),
            model: Model::new()
                .set_name(format!("{}{suffix}", self.model))
                .set_description(&self.model_description),
            version,
        }
    }

    pub fn polling_config(&self) -> PollingConfig {
        PollingConfig {
            interval: self.poll_interval,
            max_attempts: self.max_attempts,
            timeout: self.timeout,
        }
    }
}
