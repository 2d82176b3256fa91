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
use std::fmt::Debug;
use std::io::ErrorKind;

use async_trait::async_trait;
use tracing::{debug, info};

use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{schema::Schema, AttributePath, Diagnostics, Resource};

use crate::connection::Connection;
use crate::flyte::{FlyteEnvironment, SharedCli};
use crate::utils::{WithSchema, WithValidate};

use super::state::TaskEnvironmentState;

#[derive(Debug)]
pub struct TaskEnvironmentResource<T: Connection> {
    pub(super) flyte: FlyteEnvironment<T>,
    pub(super) cli: SharedCli,
}

impl<T: Connection> TaskEnvironmentResource<T> {
    pub fn new(connect: T, cli: SharedCli) -> Self {
        Self {
            flyte: FlyteEnvironment::new(connect),
            cli,
        }
    }

    /// Fill the computed attributes with what the next deployment would publish
    async fn plan_details(
        &self,
        diags: &mut Diagnostics,
        state: &mut TaskEnvironmentState<'_>,
    ) -> Option<()> {
        let Some(target) = state.target() else {
            // Inputs depend on other resources: details are computed at apply time
            state.set_details_unknown();
            return Some(());
        };

        let cli = self.cli.get();
        let resolved = self.flyte.resolve(&cli, &target).await;
        match resolved {
            Ok(details) => {
                debug!(
                    connection = T::NAME,
                    runs = self.flyte.runs(),
                    name = %details.name,
                    version = %details.version,
                    "resolved task environment"
                );
                state.set_details(details);
                Some(())
            }
            Err(err) => {
                diags.error(
                    "Task environment version calculation failed",
                    format!("Failed to calculate version for {}: {err}", target.path),
                    AttributePath::new("path"),
                );
                None
            }
        }
    }

    /// Deploy the environment, and compute the details left unknown at plan time
    async fn publish(
        &self,
        diags: &mut Diagnostics,
        state: &mut TaskEnvironmentState<'_>,
        action: &str,
    ) -> Option<()> {
        let Some(target) = state.target() else {
            diags.error_short(
                format!("Task environment {action} failed: inputs are not known"),
                AttributePath::default(),
            );
            return None;
        };

        let cli = self.cli.get();
        if let Err(err) = self.flyte.upload(&cli, &target).await {
            diags.error(
                format!("Task environment {action} failed"),
                format!("Failed to upload new version for {}: {err}", target.path),
                AttributePath::new("path"),
            );
            return None;
        }
        info!(path = target.path, id = target.id, "task environment deployed");

        if !state.has_details() {
            self.plan_details(diags, state).await?;
        }
        Some(())
    }
}

#[async_trait]
impl<T> Resource for TaskEnvironmentResource<T>
where
    T: Connection,
    T: Debug,
{
    type State<'a> = TaskEnvironmentState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(TaskEnvironmentState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        config.validate(diags, AttributePath::default()).await;

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        _diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        // Nothing to query: the version is refreshed when planning
        Some((state, private_state))
    }

    async fn plan_create<'a>(
        &self,
        diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = proposed_state;
        self.plan_details(diags, &mut state).await?;

        Some((state, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(
        Self::State<'a>,
        Self::PrivateState<'a>,
        Vec<tf_provider::AttributePath>,
    )> {
        let trigger_replace = find_replaced(&prior_state, &proposed_state);

        let mut state = proposed_state;
        self.plan_details(diags, &mut state).await?;

        Some((state, prior_private_state, trigger_replace))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::PrivateState<'a>> {
        Some(prior_private_state)
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = planned_state;

        let path = state.path.as_str();
        if let Err(err) = tokio::fs::metadata(path).await {
            if err.kind() == ErrorKind::NotFound {
                diags.error(
                    "Task environment path does not exist",
                    format!(
                        "The path {path} does not exist. Please check the path and try again."
                    ),
                    AttributePath::new("path"),
                );
            } else {
                diags.error(
                    "Task environment path is not accessible",
                    format!("Failed to access {path}: {err}"),
                    AttributePath::new("path"),
                );
            }
            return None;
        }

        self.publish(diags, &mut state, "creation").await?;

        Some((state, private_state))
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = planned_state;
        self.publish(diags, &mut state, "update").await?;

        Some((state, private_state))
    }

    async fn destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        // Published versions are immutable: the resource is only removed from the state
        debug!(id = state.id.as_str(), "forgetting task environment");
        Some(())
    }

    async fn import<'a>(
        &self,
        _diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = Self::State {
            id: Value::Value(Cow::Owned(id)),
            ..Default::default()
        };
        Some((state, Default::default()))
    }
}

/// Inputs whose change requires a new resource
fn find_replaced(
    prior: &TaskEnvironmentState<'_>,
    proposed: &TaskEnvironmentState<'_>,
) -> Vec<AttributePath> {
    [
        ("id", &prior.id, &proposed.id),
        ("project", &prior.project, &proposed.project),
        ("domain", &prior.domain, &proposed.domain),
    ]
    .into_iter()
    .filter(|(_, prior, proposed)| prior != proposed)
    .map(|(name, _, _)| AttributePath::new(name))
    .collect()
}

#[cfg(test)]
mod tests {
    use tf_provider::value::ValueString;

    use crate::connection::scripted::ScriptedConnection;
    use crate::flyte::{FlyteCli, SAMPLE_DRY_RUN};

    use super::*;

    fn known(s: &str) -> ValueString<'static> {
        Value::Value(Cow::Owned(s.to_owned()))
    }

    fn config(path: &str) -> TaskEnvironmentState<'static> {
        TaskEnvironmentState {
            id: known("env"),
            path: known(path),
            project: known("nelson"),
            domain: known("development"),
            ..Default::default()
        }
    }

    fn resource(connect: &ScriptedConnection) -> TaskEnvironmentResource<ScriptedConnection> {
        TaskEnvironmentResource::new(connect.clone(), SharedCli::default())
    }

    #[test]
    fn replacement_on_identity_change() {
        let prior = config("hello.py");
        assert!(find_replaced(&prior, &config("other.py")).is_empty());

        let mut proposed = config("hello.py");
        proposed.project = known("other");
        proposed.domain = Value::Unknown;
        assert_eq!(find_replaced(&prior, &proposed).len(), 2);
    }

    #[tokio::test]
    async fn plan_update_replaces_on_project_change() {
        let connect = ScriptedConnection::default();
        connect.push(0, SAMPLE_DRY_RUN).push(0, SAMPLE_DRY_RUN);
        let resource = resource(&connect);

        let mut proposed = config("hello.py");
        proposed.project = known("other");

        let mut diags = Diagnostics::default();
        let (state, _, trigger_replace) = resource
            .plan_update(
                &mut diags,
                config("hello.py"),
                proposed.clone(),
                proposed,
                Value::Null,
                Value::Null,
            )
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
        assert_eq!(trigger_replace, vec![AttributePath::new("project")]);
        assert_eq!(state.project, known("other"));
        assert_eq!(state.version, known("abc123"));
    }

    #[tokio::test]
    async fn plan_fills_details() {
        let connect = ScriptedConnection::default();
        connect.push(0, SAMPLE_DRY_RUN).push(0, SAMPLE_DRY_RUN);
        let resource = resource(&connect);

        let mut diags = Diagnostics::default();
        let (state, _) = resource
            .plan_create(&mut diags, config("hello.py"), config("hello.py"), Value::Null)
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
        assert_eq!(state.name, known("hello_world"));
        assert_eq!(state.version, known("abc123"));
        assert_eq!(
            state.tasks,
            Value::Value(vec![known("hello_world.fn"), known("hello_world.fn2")])
        );
        // Warm-up included
        assert_eq!(connect.calls().len(), 2);
    }

    #[tokio::test]
    async fn plan_with_unknown_inputs() {
        let connect = ScriptedConnection::default();
        let resource = resource(&connect);

        let mut proposed = config("hello.py");
        proposed.path = Value::Unknown;

        let mut diags = Diagnostics::default();
        let (state, _) = resource
            .plan_create(&mut diags, proposed.clone(), proposed, Value::Null)
            .await
            .unwrap();
        assert!(state.version.is_unknown());
        assert!(state.tasks.is_unknown());
        assert!(connect.calls().is_empty());
    }

    #[tokio::test]
    async fn plan_failure_is_reported() {
        let connect = ScriptedConnection::default();
        connect.push(1, "Error: boom");
        let resource = resource(&connect);

        let mut diags = Diagnostics::default();
        let planned = resource
            .plan_create(&mut diags, config("hello.py"), config("hello.py"), Value::Null)
            .await;
        assert!(planned.is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[tokio::test]
    async fn update_publishes() {
        let connect = ScriptedConnection::default();
        connect.push(0, "");
        let resource = resource(&connect);

        let mut planned = config("hello.py");
        planned.set_details(crate::flyte::EnvironmentDetails {
            name: "hello_world".to_owned(),
            version: "abc123".to_owned(),
            tasks: vec![],
        });

        let mut diags = Diagnostics::default();
        let (state, _) = resource
            .update(
                &mut diags,
                config("hello.py"),
                planned.clone(),
                planned.clone(),
                Value::Null,
                Value::Null,
            )
            .await
            .unwrap();
        assert_eq!(state, planned);
        assert_eq!(
            connect.calls(),
            [[
                "flyte",
                "deploy",
                "--project",
                "nelson",
                "--domain",
                "development",
                "hello.py",
                "env"
            ]]
        );
    }

    #[tokio::test]
    async fn create_requires_existing_path() {
        let connect = ScriptedConnection::default();
        let resource = resource(&connect);

        let mut diags = Diagnostics::default();
        let created = resource
            .create(
                &mut diags,
                config("/nonexistent/unionai/hello.py"),
                config("/nonexistent/unionai/hello.py"),
                Value::Null,
                Value::Null,
            )
            .await;
        assert!(created.is_none());
        assert_eq!(diags.errors.len(), 1);
        assert!(connect.calls().is_empty());
    }

    #[tokio::test]
    async fn create_resolves_unknown_details() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.py");
        std::fs::write(&path, "import flyte\n").unwrap();
        let path = path.to_str().unwrap();

        let connect = ScriptedConnection::default();
        connect
            .push(0, "")
            .push(0, SAMPLE_DRY_RUN)
            .push(0, SAMPLE_DRY_RUN);
        let resource = resource(&connect);

        let mut planned = config(path);
        planned.set_details_unknown();

        let mut diags = Diagnostics::default();
        let (state, _) = resource
            .create(&mut diags, planned, config(path), Value::Null, Value::Null)
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
        assert_eq!(state.version, known("abc123"));
        assert_eq!(connect.calls().len(), 3);
        assert!(!connect.calls()[0].contains(&"--dry-run".to_owned()));
    }

    #[tokio::test]
    async fn import_keeps_id() {
        let resource = resource(&ScriptedConnection::default());
        let mut diags = Diagnostics::default();
        let (state, _) = resource
            .import(&mut diags, "env".to_owned())
            .await
            .unwrap();
        assert_eq!(state.id, known("env"));
        assert!(state.path.is_null());
    }

    #[test]
    fn uses_configured_program() {
        let resource = resource(&ScriptedConnection::default());
        resource.cli.set(FlyteCli {
            program: "union".to_owned(),
            env: vec![],
        });
        assert_eq!(resource.cli.get().program, "union");
    }
}
