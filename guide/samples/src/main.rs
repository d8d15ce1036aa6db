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


use clap::Parser;
use mlengine::client::Client;
use mlengine_samples::args::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    args.validate()?;
    enable_tracing(&args)?;
    tracing::info!("Configuration: {args:?}");

    let config = args.deployment_config();
    let polling = args.polling_config();
    let builder = args
        .endpoint
        .iter()
        .fold(Client::builder(), |b, e| b.with_endpoint(e));
    let client = builder.build().await?;

    let report = mlengine_samples::run(&client, &config, &polling, &mut std::io::stdout()).await?;
    if report.is_success() {
        tracing::info!(
            model = %config.model_name(),
            version = %config.version.name,
            "DONE"
        );
    }

    Ok(())
}

fn enable_tracing(args: &Args) -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_level(true)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_max_level(args.log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
