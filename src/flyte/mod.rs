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

//! Driving the `flyte` CLI: dry runs to compute the version of a task environment,
//! and deployments to publish it.

mod ansi;
mod cli;
mod error;
mod resolver;
mod table;

pub use cli::{DeployTarget, FlyteCli, SharedCli, DEFAULT_PROGRAM};
pub use error::DeployError;
pub use resolver::{EnvironmentDetails, FlyteEnvironment};

/// Dry-run output of an environment `hello_world` with two tasks, as printed on a color terminal
#[cfg(test)]
pub(crate) const SAMPLE_DRY_RUN: &str = "\
Deploying root - environment: env
\x1b[32m⠏\x1b[0m Deploying...13:26:17.239626 WARNING  _deploy.py:261 -  Built Image for environment hello_world
                         Environments
┌──────────────────────────┬────────────────┐
│ \x1b[1mEnvironment\x1b[0m              │ Image          │
╞══════════════════════════╪════════════════╡
│ \x1b[36mhello_world\x1b[0m              │ auto           │
└──────────────────────────┴────────────────┘
                                   Entities
┌──────┬──────────────────┬─────────┬──────────┐
│ Type │ Name             │ Version │ Triggers │
╞══════╪══════════════════╪═════════╪══════════╡
│ task │ hello_world.fn   │ abc123  │          │
│ task │ hello_world.fn2  │ abc123  │          │
│ task │ other_env.fn     │ zzz999  │          │
└──────┴──────────────────┴─────────┴──────────┘
";
