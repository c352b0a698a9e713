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

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tf_provider::schema::Schema;
use tf_provider::value::{Value, ValueBool, ValueEmpty, ValueList, ValueMap, ValueString};
use tf_provider::{AttributePath, DataSource, Diagnostics};

use crate::attr::{self, WithSchema};
use crate::errors::ReportExt;
use crate::session::Session;

use super::state::{LastOperationState, OfferingInstanceState};

const DATA_SOURCE: &str = "data.ibm_cm_offering_instance";

/// Attributes of the resource that only exist in the Terraform state
const LOCAL_SETTINGS: [&str; 2] = ["wait_until_successful", "wait_timeout"];

/// Offering instance looked up by identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OfferingInstanceDataState<'a> {
    #[serde(borrow = "'a")]
    pub instance_identifier: ValueString<'a>,
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
}

impl<'a> OfferingInstanceDataState<'a> {
    fn new(instance_identifier: ValueString<'a>, state: OfferingInstanceState<'a>) -> Self {
        Self {
            instance_identifier,
            id: state.id,
            rev: state.rev,
            url: state.url,
            crn: state.crn,
            label: state.label,
            catalog_id: state.catalog_id,
            offering_id: state.offering_id,
            kind_format: state.kind_format,
            version: state.version,
            version_id: state.version_id,
            cluster_id: state.cluster_id,
            cluster_region: state.cluster_region,
            cluster_namespaces: state.cluster_namespaces,
            cluster_all_namespaces: state.cluster_all_namespaces,
            schematics_workspace_id: state.schematics_workspace_id,
            install_plan: state.install_plan,
            channel: state.channel,
            plan_id: state.plan_id,
            parameters: state.parameters,
            resource_group_id: state.resource_group_id,
            created: state.created,
            updated: state.updated,
            last_operation: state.last_operation,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OfferingInstanceDataSource {
    session: Session,
}

impl OfferingInstanceDataSource {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl DataSource for OfferingInstanceDataSource {
    type State<'a> = OfferingInstanceDataState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        let mut schema = attr::data_source_schema(
            OfferingInstanceState::schema(),
            "Deployed instance of an offering version",
            &["instance_identifier"],
        );
        for setting in LOCAL_SETTINGS {
            schema.block.attributes.remove(setting);
        }
        Some(schema)
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let Some(instance_id) = config.instance_identifier.as_deref_option() else {
            diags.error_short(
                "`instance_identifier` must be known",
                AttributePath::new("instance_identifier"),
            );
            return None;
        };

        let api = self.session.api(diags)?;
        let instance = api
            .get_offering_instance(instance_id)
            .await
            .or_report(diags, DATA_SOURCE, "GetOfferingInstance")?;
        let state = OfferingInstanceState::from_remote(instance);
        Some(OfferingInstanceDataState::new(
            config.instance_identifier.clone(),
            state,
        ))
    }
}
