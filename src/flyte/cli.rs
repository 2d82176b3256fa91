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

use std::sync::{Arc, PoisonError, RwLock};

pub const DEFAULT_PROGRAM: &str = "flyte";

/// How the flyte CLI is launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlyteCli {
    pub program: String,
    pub env: Vec<(String, String)>,
}

impl Default for FlyteCli {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_owned(),
            env: Vec::new(),
        }
    }
}

/// CLI settings, written when the provider is configured and read by the resources
#[derive(Debug, Default, Clone)]
pub struct SharedCli(Arc<RwLock<FlyteCli>>);

impl SharedCli {
    pub fn get(&self) -> FlyteCli {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set(&self, cli: FlyteCli) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = cli;
    }
}

/// Where an environment is deployed from and to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployTarget<'a> {
    pub path: &'a str,
    pub project: &'a str,
    pub domain: &'a str,
    pub id: &'a str,
}

impl<'a> DeployTarget<'a> {
    /// `deploy [--dry-run] --project <project> --domain <domain> <path> <id>`
    pub fn args(&self, dry_run: bool) -> Vec<&'a str> {
        let mut args = vec!["deploy"];
        if dry_run {
            args.push("--dry-run");
        }
        args.extend([
            "--project",
            self.project,
            "--domain",
            self.domain,
            self.path,
            self.id,
        ]);
        args
    }
}
