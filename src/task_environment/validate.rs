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

use async_trait::async_trait;
use tf_provider::{AttributePath, Diagnostics};

use crate::utils::WithValidate;

use super::state::TaskEnvironmentState;

#[async_trait]
impl<'a> WithValidate for TaskEnvironmentState<'a> {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        for (name, value) in [
            ("id", &self.id),
            ("path", &self.path),
            ("project", &self.project),
            ("domain", &self.domain),
        ] {
            // Unknown values are checked again once known
            if let Some(value) = value.as_deref_option() {
                if value.trim().is_empty() {
                    diags.error_short(
                        format!("`{name}` must not be empty"),
                        attr_path.clone().attribute(name),
                    );
                }
            }
        }
    }
}
