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

use anyhow::Result;
use async_trait::async_trait;

pub mod local;
#[cfg(test)]
pub(crate) mod scripted;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    /// stdout followed by stderr
    pub fn combined_output(&self) -> String {
        let mut output = String::with_capacity(self.stdout.len() + self.stderr.len());
        output.push_str(&self.stdout);
        output.push_str(&self.stderr);
        output
    }

    pub fn success(&self) -> bool {
        self.status == 0
    }
}

#[async_trait]
pub trait Connection: Send + Sync + 'static {
    const NAME: &'static str;

    /// execute a program over the connection, without going through a shell
    async fn execute(
        &self,
        program: &str,
        args: &[&str],
        env: &[(String, String)],
    ) -> Result<ExecutionResult>;
}
