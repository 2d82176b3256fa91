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

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::{Connection, ExecutionResult};

/// Replays canned results and records every invocation
#[derive(Debug, Default, Clone)]
pub(crate) struct ScriptedConnection {
    results: Arc<Mutex<VecDeque<Result<ExecutionResult, String>>>>,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl ScriptedConnection {
    pub(crate) fn push(&self, status: i32, stdout: &str) -> &Self {
        self.results.lock().unwrap().push_back(Ok(ExecutionResult {
            status,
            stdout: stdout.to_owned(),
            stderr: String::new(),
        }));
        self
    }

    pub(crate) fn push_launch_error(&self, message: &str) -> &Self {
        self.results
            .lock()
            .unwrap()
            .push_back(Err(message.to_owned()));
        self
    }

    /// Program and arguments of every invocation so far
    pub(crate) fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connection for ScriptedConnection {
    const NAME: &'static str = "scripted";

    async fn execute(
        &self,
        program: &str,
        args: &[&str],
        _env: &[(String, String)],
    ) -> Result<ExecutionResult> {
        let mut call = vec![program.to_owned()];
        call.extend(args.iter().map(|arg| arg.to_string()));
        self.calls.lock().unwrap().push(call);

        match self.results.lock().unwrap().pop_front() {
            Some(Ok(res)) => Ok(res),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no scripted result left")),
        }
    }
}
