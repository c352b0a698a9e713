// This file is part of the terraform-provider-catalog project
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
use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tf_provider::map;
use tf_provider::schema::{AttributeConstraint, Block, Description, Schema};
use tf_provider::value::{Value, ValueBool, ValueList, ValueMap, ValueNumber, ValueString};

use crate::api::model::{LastOperation, OfferingInstance};
use crate::attr::{self, WithSchema};
use crate::convert;
use crate::tracked::Identified;

use AttributeConstraint::{Computed, Optional, OptionalComputed, Required};

/// Default of `wait_timeout`, in seconds
pub const DEFAULT_WAIT_TIMEOUT: i64 = 600;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OfferingInstanceState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub rev: ValueString<'a>,
    pub url: ValueString<'a>,
    pub crn: ValueString<'a>,
    pub label: ValueString<'a>,
    pub catalog_id: ValueString<'a>,
    pub offering_id: ValueString<'a>,
    pub kind_format: ValueString<'a>,
    pub version: ValueString<'a>,
    pub version_id: ValueString<'a>,
    pub cluster_id: ValueString<'a>,
    pub cluster_region: ValueString<'a>,
    pub cluster_namespaces: ValueList<ValueString<'a>>,
    pub cluster_all_namespaces: ValueBool,
    pub schematics_workspace_id: ValueString<'a>,
    pub install_plan: ValueString<'a>,
    pub channel: ValueString<'a>,
    pub plan_id: ValueString<'a>,
    pub parameters: ValueMap<'a, ValueString<'a>>,
    pub resource_group_id: ValueString<'a>,
    pub created: ValueString<'a>,
    pub updated: ValueString<'a>,
    pub last_operation: Value<LastOperationState<'a>>,
    pub wait_until_successful: ValueBool,
    pub wait_timeout: ValueNumber,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LastOperationState<'a> {
    #[serde(borrow = "'a")]
    pub operation: ValueString<'a>,
    pub state: ValueString<'a>,
    pub message: ValueString<'a>,
    pub transaction_id: ValueString<'a>,
    pub updated: ValueString<'a>,
    pub code: ValueString<'a>,
}

impl LastOperationState<'_> {
    fn from_remote(operation: LastOperation) -> Self {
        Self {
            operation: convert::string(operation.operation),
            state: convert::string(operation.state),
            message: convert::string(operation.message),
            transaction_id: convert::string(operation.transaction_id),
            updated: convert::string(operation.updated),
            code: convert::string(operation.code),
        }
    }
}

/// Parameter values are strings locally; other JSON values are rendered as JSON
fn parameter_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(value) => value,
        value => value.to_string(),
    }
}

impl Identified for OfferingInstanceState<'_> {
    fn is_removed(&self) -> bool {
        self.id.is_null()
    }
}

impl WithSchema for OfferingInstanceState<'_> {
    fn schema() -> Schema {
        let last_operation = map! {
            "operation" => attr::string(Computed, "Kind of operation"),
            "state" => attr::string(Computed, "State of the operation"),
            "message" => attr::string(Computed, "Message of the operation"),
            "transaction_id" => attr::string(Computed, "Transaction of the operation"),
            "updated" => attr::string(Computed, "Last update of the operation"),
            "code" => attr::string(Computed, "Error code of the operation"),
        };

        Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::plain("Deployed instance of an offering version"),
                attributes: map! {
                    "id" => attr::string(Computed, "Identifier of the instance"),
                    "rev" => attr::string(Computed, "Cloudant revision of the instance"),
                    "url" => attr::string(Computed, "URL of the instance"),
                    "crn" => attr::string(Computed, "CRN of the instance"),
                    "label" => attr::string(Optional, "Display name of the instance"),
                    "catalog_id" => attr::string(Required, "Catalog of the deployed offering"),
                    "offering_id" => attr::string(Required, "Deployed offering"),
                    "kind_format" => attr::string(Required, "Kind of the deployed content (helm, operator, terraform...)"),
                    "version" => attr::string(Required, "Deployed version"),
                    "version_id" => attr::string(Optional, "Identifier of the deployed version"),
                    "cluster_id" => attr::string(Optional, "Cluster the instance is deployed to"),
                    "cluster_region" => attr::string(Optional, "Region of the cluster"),
                    "cluster_namespaces" => attr::string_list(OptionalComputed, "Namespaces the instance is deployed to"),
                    "cluster_all_namespaces" => attr::boolean(OptionalComputed, "Instance is deployed to every namespace"),
                    "schematics_workspace_id" => attr::string(Optional, "Schematics workspace of the instance"),
                    "install_plan" => attr::string(Optional, "Install plan of the operator subscription"),
                    "channel" => attr::string(Optional, "Channel of the operator subscription"),
                    "plan_id" => attr::string(Optional, "Pricing plan of the instance"),
                    "parameters" => attr::string_map(Optional, "Deployment parameters"),
                    "resource_group_id" => attr::string(OptionalComputed, "Resource group of the instance"),
                    "created" => attr::string(Computed, "Creation date"),
                    "updated" => attr::string(Computed, "Last update date"),
                    "last_operation" => attr::single(last_operation, Computed, "Last operation performed on the instance"),
                    "wait_until_successful" => attr::boolean(Optional, "Wait for the operations to succeed (default: true)"),
                    "wait_timeout" => attr::number(Optional, "Maximum time to wait for an operation, in seconds (default: 600)"),
                },
                ..Default::default()
            },
        }
    }
}

impl<'a> OfferingInstanceState<'a> {
    /// Instance sent to the service
    pub fn to_remote(&self) -> OfferingInstance {
        OfferingInstance {
            label: convert::opt_string(&self.label),
            catalog_id: convert::opt_string(&self.catalog_id),
            offering_id: convert::opt_string(&self.offering_id),
            kind_format: convert::opt_string(&self.kind_format),
            version: convert::opt_string(&self.version),
            version_id: convert::opt_string(&self.version_id),
            cluster_id: convert::opt_string(&self.cluster_id),
            cluster_region: convert::opt_string(&self.cluster_region),
            cluster_namespaces: convert::opt_string_list(&self.cluster_namespaces),
            cluster_all_namespaces: convert::opt_bool(&self.cluster_all_namespaces),
            schematics_workspace_id: convert::opt_string(&self.schematics_workspace_id),
            install_plan: convert::opt_string(&self.install_plan),
            channel: convert::opt_string(&self.channel),
            plan_id: convert::opt_string(&self.plan_id),
            parameters: convert::opt_string_map(&self.parameters).map(|parameters| {
                parameters
                    .into_iter()
                    .map(|(key, value)| (key, serde_json::Value::String(value)))
                    .collect()
            }),
            resource_group_id: convert::opt_string(&self.resource_group_id),
            ..Default::default()
        }
    }

    /// State mirroring the remote instance, local settings are left null
    pub fn from_remote(instance: OfferingInstance) -> Self {
        Self {
            id: convert::string(instance.id),
            rev: convert::string(instance.rev),
            url: convert::string(instance.url),
            crn: convert::string(instance.crn),
            label: convert::string(instance.label),
            catalog_id: convert::string(instance.catalog_id),
            offering_id: convert::string(instance.offering_id),
            kind_format: convert::string(instance.kind_format),
            version: convert::string(instance.version),
            version_id: convert::string(instance.version_id),
            cluster_id: convert::string(instance.cluster_id),
            cluster_region: convert::string(instance.cluster_region),
            cluster_namespaces: convert::string_list(instance.cluster_namespaces),
            cluster_all_namespaces: convert::boolean(instance.cluster_all_namespaces),
            schematics_workspace_id: convert::string(instance.schematics_workspace_id),
            install_plan: convert::string(instance.install_plan),
            channel: convert::string(instance.channel),
            plan_id: convert::string(instance.plan_id),
            parameters: convert::string_map(instance.parameters.map(|parameters| {
                parameters
                    .into_iter()
                    .map(|(key, value)| (key, parameter_string(value)))
                    .collect::<BTreeMap<_, _>>()
            })),
            resource_group_id: convert::string(instance.resource_group_id),
            created: convert::string(instance.created),
            updated: convert::string(instance.updated),
            last_operation: convert::nested(instance.last_operation, LastOperationState::from_remote),
            wait_until_successful: Value::Null,
            wait_timeout: Value::Null,
        }
    }

    /// Carry over the settings that only exist in the Terraform state
    pub fn with_local_settings(mut self, local: &Self) -> Self {
        self.wait_until_successful = local.wait_until_successful.clone();
        self.wait_timeout = local.wait_timeout.clone();
        self
    }

    /// Keep an empty parameter map written by the practitioner when the service omits it
    pub fn keep_empty_parameters(&mut self, planned: &Self) {
        if self.parameters.is_null() && planned.parameters.as_ref_option().is_some_and(BTreeMap::is_empty) {
            self.parameters = Value::Value(BTreeMap::<Cow<'a, str>, ValueString<'a>>::new());
        }
    }

    /// Operations must be waited for
    pub fn waits(&self) -> bool {
        convert::opt_bool(&self.wait_until_successful).unwrap_or(true)
    }

    /// Maximum time to wait for an operation
    pub fn wait_timeout(&self) -> Duration {
        let seconds = self
            .wait_timeout
            .as_ref_option()
            .copied()
            .unwrap_or(DEFAULT_WAIT_TIMEOUT);
        Duration::from_secs(u64::try_from(seconds).unwrap_or_default())
    }

    /// Attributes sent to the service differ from `prior`
    pub fn remote_changed(&self, prior: &Self) -> bool {
        self.to_remote() != prior.to_remote()
    }

    /// Optional attributes left to the service, and attributes computed by it
    pub fn plan_computed(&mut self) {
        convert::computed_if_null(&mut self.cluster_namespaces);
        convert::computed_if_null(&mut self.cluster_all_namespaces);
        convert::computed_if_null(&mut self.resource_group_id);
        self.id = Value::Unknown;
        self.rev = Value::Unknown;
        self.url = Value::Unknown;
        self.crn = Value::Unknown;
        self.created = Value::Unknown;
        self.updated = Value::Unknown;
        self.last_operation = Value::Unknown;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parameters_are_strings_locally() {
        let instance = OfferingInstance {
            id: Some("instance-1".to_owned()),
            parameters: Some(BTreeMap::from([
                ("region".to_owned(), json!("eu-de")),
                ("replicas".to_owned(), json!(3)),
                ("tags".to_owned(), json!(["a", "b"])),
            ])),
            ..Default::default()
        };

        let state = OfferingInstanceState::from_remote(instance);
        let parameters = convert::opt_string_map(&state.parameters).unwrap();
        assert_eq!(parameters["region"], "eu-de");
        assert_eq!(parameters["replicas"], "3");
        assert_eq!(parameters["tags"], r#"["a","b"]"#);

        let remote = state.to_remote();
        assert_eq!(remote.parameters.unwrap()["region"], json!("eu-de"));
    }

    #[test]
    fn wait_settings_default() {
        let mut state = OfferingInstanceState::default();
        assert!(state.waits());
        assert_eq!(state.wait_timeout(), Duration::from_secs(600));

        state.wait_until_successful = Value::Value(false);
        state.wait_timeout = Value::Value(30);
        assert!(!state.waits());
        assert_eq!(state.wait_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn local_settings_are_not_sent() {
        let prior = OfferingInstanceState {
            version: Value::from("1.0.0"),
            ..Default::default()
        };
        let mut planned = prior.clone();
        planned.wait_timeout = Value::Value(60);
        assert!(!planned.remote_changed(&prior));

        planned.version = Value::from("1.1.0");
        assert!(planned.remote_changed(&prior));
    }

    #[test]
    fn local_settings_are_carried_over() {
        let local = OfferingInstanceState {
            wait_until_successful: Value::Value(false),
            wait_timeout: Value::Value(42),
            ..Default::default()
        };
        let state = OfferingInstanceState::from_remote(OfferingInstance::default())
            .with_local_settings(&local);
        assert_eq!(state.wait_until_successful, Value::Value(false));
        assert_eq!(state.wait_timeout, Value::Value(42));
        assert!(state.last_operation.is_null());
    }
}
