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

use thiserror::Error;

use crate::utils::DisplayJoinable;

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("could not launch `{program}`: {message}")]
    Launch { program: String, message: String },

    #[error("`{program} deploy` failed with status code {status}:\n{output}")]
    Failed {
        program: String,
        status: i32,
        output: String,
    },

    #[error("failed to parse {} from flyte deploy output", .missing.iter().join_with(" and "))]
    Parse { missing: Vec<&'static str> },
}
