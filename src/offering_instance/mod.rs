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

//! `ibm_cm_offering_instance`: deployment of an offering version

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tf_provider::schema::Schema;
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::api::model::OfferingInstance;
use crate::api::CatalogManagement;
use crate::attr::WithSchema;
use crate::errors::{deleted, lookup, ReportExt};
use crate::session::Session;
use crate::tracked::Tracked;
use crate::wait::{wait_until_successful, WaitError};

mod data_source;
mod state;

pub use data_source::OfferingInstanceDataSource;
pub use state::OfferingInstanceState;

const RESOURCE: &str = "ibm_cm_offering_instance";

/// Delay between two checks of a running operation
const POLL_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Default)]
pub struct OfferingInstanceResource {
    session: Session,
}

impl OfferingInstanceResource {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

fn missing_identifier(diags: &mut Diagnostics) {
    diags.root_error(
        "Missing instance identifier",
        "The identifier of the offering instance must be known",
    );
}

/// Wait for the operation started on `instance` when the plan asks for it
///
/// A failed or timed out operation is reported as an error, and the instance is returned
/// as last seen so that it stays tracked.
async fn settle<'a>(
    api: Arc<dyn CatalogManagement>,
    diags: &mut Diagnostics,
    instance: OfferingInstance,
    planned: &OfferingInstanceState<'a>,
) -> OfferingInstanceState<'a> {
    let Some(instance_id) = instance.id.clone().filter(|_| planned.waits()) else {
        return OfferingInstanceState::from_remote(instance);
    };
    let timeout = planned.wait_timeout();
    let poll = || {
        let api = api.clone();
        let instance_id = instance_id.clone();
        async move { api.get_offering_instance(&instance_id).await }
    };

    let instance = match wait_until_successful(poll, POLL_INTERVAL, timeout).await {
        Ok(instance) => instance,
        Err(err) => {
            let summary = match err {
                WaitError::Timeout(_) => "Offering instance operation timed out",
                _ => "Offering instance operation failed",
            };
            tracing::error!(resource = RESOURCE, instance_id = instance_id.as_str(), "{err}");
            diags.root_error(summary, format!("{RESOURCE} `{instance_id}`: {err}"));
            match api.get_offering_instance(&instance_id).await {
                Ok(latest) => latest,
                Err(err) => {
                    tracing::warn!(
                        resource = RESOURCE,
                        instance_id = instance_id.as_str(),
                        "could not refresh instance: {err}"
                    );
                    instance
                }
            }
        }
    };
    OfferingInstanceState::from_remote(instance)
}

/// Final state of an applied instance
fn applied<'a>(
    state: OfferingInstanceState<'a>,
    planned: &OfferingInstanceState<'a>,
) -> OfferingInstanceState<'a> {
    let mut state = state.with_local_settings(planned);
    state.keep_empty_parameters(planned);
    state
}

#[async_trait]
impl Resource for OfferingInstanceResource {
    type State<'a> = Tracked<OfferingInstanceState<'a>>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(OfferingInstanceState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        if let Value::Value(timeout) = config.wait_timeout {
            if timeout <= 0 {
                diags.error(
                    "Invalid wait timeout",
                    format!("`wait_timeout` must be a positive number of seconds, got {timeout}"),
                    AttributePath::new("wait_timeout"),
                );
                return None;
            }
        }
        Some(())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let Some(instance_id) = state.id.as_deref_option() else {
            missing_identifier(diags);
            return None;
        };
        let api = self.session.api(diags)?;
        let instance = lookup(
            api.get_offering_instance(instance_id).await,
            diags,
            RESOURCE,
            "GetOfferingInstance",
        )?;

        let new_state = match instance {
            Some(instance) => applied(OfferingInstanceState::from_remote(instance), &state),
            None => Default::default(),
        };
        Some((Tracked(new_state), private_state))
    }

    async fn plan_create<'a>(
        &self,
        _diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = proposed_state;
        state.plan_computed();
        Some((state, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        _diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>, Vec<AttributePath>)> {
        let mut state = proposed_state;
        let replace = [
            ("catalog_id", &state.catalog_id, &prior_state.catalog_id),
            ("offering_id", &state.offering_id, &prior_state.offering_id),
            ("kind_format", &state.kind_format, &prior_state.kind_format),
            ("cluster_id", &state.cluster_id, &prior_state.cluster_id),
            ("cluster_region", &state.cluster_region, &prior_state.cluster_region),
        ]
        .into_iter()
        .filter(|(_, planned, prior)| planned != prior)
        .map(|(name, _, _)| AttributePath::new(name))
        .collect::<Vec<_>>();

        if state.remote_changed(&prior_state) {
            state.rev = Value::Unknown;
            state.updated = Value::Unknown;
            state.last_operation = Value::Unknown;
        }
        Some((state, prior_private_state, replace))
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
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let api = self.session.api(diags)?;
        let created = api
            .create_offering_instance(&planned_state.to_remote())
            .await
            .or_report(diags, RESOURCE, "CreateOfferingInstance")?;
        if created.id.is_none() {
            missing_identifier(diags);
            return None;
        }
        tracing::info!(
            resource = RESOURCE,
            instance_id = created.id.as_deref().unwrap_or_default(),
            "offering instance created"
        );

        let state = settle(api, diags, created, &planned_state).await;
        Some((Tracked(applied(state, &planned_state)), planned_private_state))
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let Some(instance_id) = prior_state.id.as_deref_option() else {
            missing_identifier(diags);
            return None;
        };
        if !planned_state.remote_changed(&prior_state) {
            let state = prior_state.0.clone().with_local_settings(&planned_state);
            return Some((Tracked(state), planned_private_state));
        }

        let api = self.session.api(diags)?;
        let current = api
            .get_offering_instance(instance_id)
            .await
            .or_report(diags, RESOURCE, "GetOfferingInstance")?;
        let mut instance = planned_state.to_remote();
        instance.id = Some(instance_id.to_owned());
        instance.rev = current.rev;

        let updated = api
            .put_offering_instance(instance_id, &instance)
            .await
            .or_report(diags, RESOURCE, "PutOfferingInstance")?;

        let state = settle(api, diags, updated, &planned_state).await;
        Some((Tracked(applied(state, &planned_state)), planned_private_state))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let Some(instance_id) = prior_state.id.as_deref_option() else {
            missing_identifier(diags);
            return None;
        };
        let api = self.session.api(diags)?;
        deleted(
            api.delete_offering_instance(instance_id).await,
            diags,
            RESOURCE,
            "DeleteOfferingInstance",
        )
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        if id.is_empty() {
            diags.root_error_short("Invalid import identifier: expected `<instance_id>`");
            return None;
        }
        let state = OfferingInstanceState {
            id: Value::from(id),
            ..Default::default()
        };
        Some((Tracked(state), Default::default()))
    }
}
