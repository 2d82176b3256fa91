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

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use tf_provider::map;
use tf_provider::schema::{
    Attribute, AttributeConstraint, AttributeType, Block, Description, Schema,
};
use tf_provider::value::{Value, ValueList, ValueString};

use crate::flyte::{DeployTarget, EnvironmentDetails};
use crate::utils::WithSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TaskEnvironmentState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub path: ValueString<'a>,
    pub project: ValueString<'a>,
    pub domain: ValueString<'a>,
    pub version: ValueString<'a>,
    pub tasks: ValueList<ValueString<'a>>,
}

impl<'a> TaskEnvironmentState<'a> {
    /// Where to deploy from, `None` while any input is not known yet
    pub fn target(&self) -> Option<DeployTarget<'_>> {
        Some(DeployTarget {
            path: self.path.as_deref_option()?,
            project: self.project.as_deref_option()?,
            domain: self.domain.as_deref_option()?,
            id: self.id.as_deref_option()?,
        })
    }

    pub fn has_details(&self) -> bool {
        !self.name.is_unknown() && !self.version.is_unknown() && !self.tasks.is_unknown()
    }

    pub fn set_details(&mut self, details: EnvironmentDetails) {
        self.name = Value::Value(Cow::Owned(details.name));
        self.version = Value::Value(Cow::Owned(details.version));
        self.tasks = Value::Value(
            details
                .tasks
                .into_iter()
                .map(|task| Value::Value(Cow::Owned(task)))
                .collect(),
        );
    }

    pub fn set_details_unknown(&mut self) {
        self.name = Value::Unknown;
        self.version = Value::Unknown;
        self.tasks = Value::Unknown;
    }
}

impl<'a> WithSchema for TaskEnvironmentState<'a> {
    fn schema() -> Schema {
        let replaced_string = |description: &str| Attribute {
            attr_type: AttributeType::String,
            description: Description::plain(format!(
                "{description}. Changing it replaces the resource"
            )),
            constraint: AttributeConstraint::Required,
            ..Default::default()
        };
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => replaced_string("Task environment identifier"),
                    "project" => replaced_string("Project name"),
                    "domain" => replaced_string("Domain name"),
                    "path" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Path of the Python file defining the tasks"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "name" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Name of the task environment"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                    "version" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain(
                            "Version of the task environment, as computed by `flyte deploy`",
                        ),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                    "tasks" => Attribute {
                        attr_type: AttributeType::List(AttributeType::String.into()),
                        description: Description::plain("Tasks of the environment"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                },
                description: Description::plain("Task environment deployed with the flyte CLI"),
                ..Default::default()
            },
        }
    }
}
