// This file is part of the terraform-provider-unionai project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::{Mutex, PoisonError};

use tracing::{debug, trace};

use crate::connection::{Connection, ExecutionResult};

use super::ansi::strip_ansi_codes;
use super::table::extract_table;
use super::{DeployError, DeployTarget, FlyteCli};

const ENVIRONMENT_COLUMNS: [&str; 2] = ["Environment", "Image"];
const ENTITY_COLUMNS: [&str; 3] = ["Type", "Name", "Version"];

/// What a dry run reports about a task environment
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnvironmentDetails {
    pub name: String,
    pub version: String,
    pub tasks: Vec<String>,
}

/// Resolves and publishes task environments with `flyte deploy`
#[derive(Debug)]
pub struct FlyteEnvironment<T: Connection> {
    connect: T,
    runs: Mutex<u32>,
}

impl<T: Connection> FlyteEnvironment<T> {
    pub fn new(connect: T) -> Self {
        Self {
            connect,
            runs: Mutex::new(0),
        }
    }

    /// Number of dry runs started so far, discarded ones included
    pub fn runs(&self) -> u32 {
        *self.runs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_run(&self) -> u32 {
        let mut runs = self.runs.lock().unwrap_or_else(PoisonError::into_inner);
        *runs = runs.saturating_add(1);
        *runs
    }

    /// Dry-run the deployment and report the name, version and tasks it would publish
    pub async fn resolve(
        &self,
        cli: &FlyteCli,
        target: &DeployTarget<'_>,
    ) -> Result<EnvironmentDetails, DeployError> {
        // The first dry run of a process computes a wrong hash: run it once for nothing.
        // Only the counter is locked, concurrent dry runs are allowed.
        if self.next_run() == 1 {
            debug!(path = target.path, "discarding first dry run");
            self.next_run();
            self.dry_run(cli, target).await?;
        }

        self.dry_run(cli, target).await
    }

    /// Publish the current version of the environment
    pub async fn upload(
        &self,
        cli: &FlyteCli,
        target: &DeployTarget<'_>,
    ) -> Result<(), DeployError> {
        debug!(
            path = target.path,
            project = target.project,
            domain = target.domain,
            id = target.id,
            "publishing task environment"
        );
        self.run(cli, &target.args(false)).await?;
        Ok(())
    }

    async fn dry_run(
        &self,
        cli: &FlyteCli,
        target: &DeployTarget<'_>,
    ) -> Result<EnvironmentDetails, DeployError> {
        let res = self.run(cli, &target.args(true)).await?;
        let output = res.combined_output();
        let output = strip_ansi_codes(&output);
        let details = parse_deploy_output(&output)?;

        trace!(
            name = %details.name,
            version = %details.version,
            output = %output,
            "parsed dry run"
        );

        Ok(details)
    }

    async fn run(&self, cli: &FlyteCli, args: &[&str]) -> Result<ExecutionResult, DeployError> {
        let res = self
            .connect
            .execute(&cli.program, args, &cli.env)
            .await
            .map_err(|err| DeployError::Launch {
                program: cli.program.clone(),
                message: format!("{err:#}"),
            })?;

        if res.success() {
            Ok(res)
        } else {
            Err(DeployError::Failed {
                program: cli.program.clone(),
                status: res.status,
                output: res.combined_output(),
            })
        }
    }
}

/// Read the environment name, version and tasks out of the dry-run tables
///
/// The version is the one of the first task of the environment, in table order.
pub fn parse_deploy_output(output: &str) -> Result<EnvironmentDetails, DeployError> {
    let name = extract_table(&ENVIRONMENT_COLUMNS, output)
        .into_iter()
        .next()
        .and_then(|row| row.into_iter().next())
        .unwrap_or_default();

    let mut version = String::new();
    let mut tasks = Vec::new();
    if !name.is_empty() {
        let prefix = format!("{name}.");
        for row in extract_table(&ENTITY_COLUMNS, output) {
            let [kind, task, task_version]: [String; 3] = match row.try_into() {
                Ok(cells) => cells,
                Err(_) => continue,
            };
            if kind != "task" || !task.starts_with(&prefix) {
                continue;
            }
            if version.is_empty() {
                version = task_version;
            }
            tasks.push(task);
        }
    }

    let missing = [("name", &name), ("version", &version)]
        .into_iter()
        .filter_map(|(field, value)| value.is_empty().then_some(field))
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(DeployError::Parse { missing });
    }

    Ok(EnvironmentDetails {
        name,
        version,
        tasks,
    })
}
