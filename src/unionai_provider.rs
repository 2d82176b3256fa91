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
use serde::{Deserialize, Serialize};
use tracing::info;

use tf_provider::schema::{
    Attribute, AttributeConstraint, AttributeType, Block, Description, Schema,
};
use tf_provider::value::{Value, ValueEmpty, ValueMap, ValueString};
use tf_provider::{map, AttributePath, Provider};

use crate::{
    connection::local::ConnectionLocal,
    flyte::{FlyteCli, SharedCli, DEFAULT_PROGRAM},
    task_environment::TaskEnvironmentResource,
};

/// Environment variable overriding the flyte program when the provider block does not set it
pub const FLYTE_COMMAND_ENV: &str = "UNIONAI_FLYTE_COMMAND";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig<'a> {
    #[serde(borrow = "'a")]
    pub flyte_command: ValueString<'a>,
    pub flyte_env: ValueMap<'a, ValueString<'a>>,
}

impl<'a> ProviderConfig<'a> {
    fn cli(&self, command_from_env: Option<String>) -> FlyteCli {
        let program = match self.flyte_command.as_deref_option() {
            Some(command) => command.to_owned(),
            None => command_from_env
                .filter(|command| !command.is_empty())
                .unwrap_or_else(|| DEFAULT_PROGRAM.to_owned()),
        };
        let env = match &self.flyte_env {
            Value::Value(env) => env
                .iter()
                .filter_map(|(k, v)| Some((k.to_string(), v.as_deref_option()?.to_owned())))
                .collect(),
            _ => Vec::new(),
        };

        FlyteCli { program, env }
    }
}

#[derive(Debug, Default, Clone)]
pub struct UnionaiProvider {
    cli: SharedCli,
}

#[async_trait]
impl Provider for UnionaiProvider {
    type Config<'a> = ProviderConfig<'a>;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut tf_provider::Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: Block {
                attributes: map! {
                    "flyte_command" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain(format!(
                            "Program used to deploy task environments. Can be specified by {FLYTE_COMMAND_ENV}, defaults to `{DEFAULT_PROGRAM}`"
                        )),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "flyte_env" => Attribute {
                        attr_type: AttributeType::Map(AttributeType::String.into()),
                        description: Description::plain("Environment variables given to the flyte program"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                },
                description: Description::plain("unionai"),
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(
        &self,
        diags: &mut tf_provider::Diagnostics,
        config: Self::Config<'a>,
    ) -> Option<()> {
        if let Some(command) = config.flyte_command.as_deref_option() {
            if command.trim().is_empty() {
                diags.error_short(
                    "`flyte_command` must not be empty",
                    AttributePath::new("flyte_command"),
                );
                return None;
            }
        }
        Some(())
    }

    async fn configure<'a>(
        &self,
        _diags: &mut tf_provider::Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        let cli = config.cli(std::env::var(FLYTE_COMMAND_ENV).ok());
        info!(
            terraform_version = %terraform_version,
            program = %cli.program,
            env = cli.env.len(),
            "provider configured"
        );
        self.cli.set(cli);
        Some(())
    }

    fn get_resources(
        &self,
        _diags: &mut tf_provider::Diagnostics,
    ) -> Option<std::collections::HashMap<String, Box<dyn tf_provider::DynamicResource>>>
    {
        Some(map! {
            "task_environment" => TaskEnvironmentResource::new(ConnectionLocal::default(), self.cli.clone()),
        })
    }

    fn get_data_sources(
        &self,
        _diags: &mut tf_provider::Diagnostics,
    ) -> Option<
        std::collections::HashMap<String, Box<dyn tf_provider::DynamicDataSource>>,
    > {
        Some(Default::default())
    }
}
