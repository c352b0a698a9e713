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

//! `ibm_cm_offering`: offering of a private catalog

use async_trait::async_trait;
use tf_provider::schema::Schema;
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::api::model::Offering;
use crate::api::CatalogManagement;
use crate::attr::WithSchema;
use crate::convert;
use crate::errors::{deleted, lookup, ReportExt};
use crate::patch::PatchBuilder;
use crate::session::Session;
use crate::tracked::Tracked;

mod data_source;
mod kind;
mod state;

pub use data_source::OfferingDataSource;
pub use state::OfferingState;

const RESOURCE: &str = "ibm_cm_offering";

#[derive(Debug, Clone, Default)]
pub struct OfferingResource {
    session: Session,
}

impl OfferingResource {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

/// Catalog and offering identifiers of a state
fn identifiers<'s>(state: &'s OfferingState<'_>) -> Option<(&'s str, &'s str)> {
    match (
        state.catalog_id.as_deref_option(),
        state.offering_id.as_deref_option(),
    ) {
        (Some(catalog_id), Some(offering_id)) => Some((catalog_id, offering_id)),
        _ => state.id.as_deref_option().and_then(convert::split_id),
    }
}

fn missing_identifiers(diags: &mut Diagnostics) {
    diags.root_error(
        "Missing offering identifiers",
        "Both `catalog_id` and `offering_id` must be known",
    );
}

/// Apply the settings that have their own endpoints: sharing, access list and deprecation
///
/// `current` is the offering as the service knows it, `prior` the state before the change.
async fn apply_settings(
    api: &dyn CatalogManagement,
    diags: &mut Diagnostics,
    (catalog_id, offering_id): (&str, &str),
    current: &Offering,
    prior: &OfferingState<'_>,
    planned: &OfferingState<'_>,
) -> Option<()> {
    if planned.share_changed(prior) {
        let share = planned.share_setting(current);
        api.share_offering(catalog_id, offering_id, &share)
            .await
            .or_report(diags, RESOURCE, "ShareOffering")?;
    }

    if !planned.share_with_access_list.is_unknown() {
        let before = convert::opt_string_list(&prior.share_with_access_list).unwrap_or_default();
        let after = convert::opt_string_list(&planned.share_with_access_list).unwrap_or_default();
        let removed = before
            .iter()
            .filter(|access| !after.contains(access))
            .cloned()
            .collect::<Vec<_>>();
        let added = after
            .iter()
            .filter(|access| !before.contains(access))
            .cloned()
            .collect::<Vec<_>>();
        if !removed.is_empty() {
            api.delete_offering_access_list(catalog_id, offering_id, &removed)
                .await
                .or_report(diags, RESOURCE, "DeleteOfferingAccessList")?;
        }
        if !added.is_empty() {
            api.add_offering_access_list(catalog_id, offering_id, &added)
                .await
                .or_report(diags, RESOURCE, "AddOfferingAccessList")?;
        }
    }

    if let Some(deprecate) = convert::opt_bool(&planned.deprecate) {
        if deprecate != convert::opt_bool(&prior.deprecate).unwrap_or(false) {
            api.deprecate_offering(catalog_id, offering_id, deprecate, None)
                .await
                .or_report(diags, RESOURCE, "DeprecateOffering")?;
        }
    }
    Some(())
}

/// Read the offering back once every change has been applied
async fn read_back<'a>(
    api: &dyn CatalogManagement,
    diags: &mut Diagnostics,
    (catalog_id, offering_id): (&str, &str),
    planned: &OfferingState<'a>,
) -> Option<OfferingState<'a>> {
    let offering = api
        .get_offering(catalog_id, offering_id)
        .await
        .or_report(diags, RESOURCE, "GetOffering")?;
    Some(kept_state(offering, catalog_id, planned))
}

/// State mirroring `offering`, with the empty lists of `planned` kept
fn kept_state<'a>(
    offering: Offering,
    catalog_id: &str,
    planned: &OfferingState<'a>,
) -> OfferingState<'a> {
    let mut state = OfferingState::from_remote(offering, catalog_id);
    state.keep_empty_lists(planned);
    state
}

/// Apply the settings of `planned` to `offering`, then read it back
///
/// The offering exists remotely at this point: when a step fails, the error is reported and
/// the offering is still returned as last seen, so that Terraform keeps tracking it.
async fn settle<'a>(
    api: &dyn CatalogManagement,
    diags: &mut Diagnostics,
    ids: (&str, &str),
    offering: Offering,
    prior: &OfferingState<'_>,
    planned: &OfferingState<'a>,
) -> OfferingState<'a> {
    let state = match apply_settings(api, diags, ids, &offering, prior, planned).await {
        Some(()) => read_back(api, diags, ids, planned).await,
        None => None,
    };
    state.unwrap_or_else(|| {
        tracing::warn!(
            resource = RESOURCE,
            catalog_id = ids.0,
            offering_id = ids.1,
            "offering kept as last seen"
        );
        kept_state(offering, ids.0, planned)
    })
}

#[async_trait]
impl Resource for OfferingResource {
    type State<'a> = Tracked<OfferingState<'a>>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(OfferingState::schema())
    }

    async fn validate<'a>(&self, _diags: &mut Diagnostics, _config: Self::State<'a>) -> Option<()> {
        Some(())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let Some((catalog_id, offering_id)) = identifiers(&state) else {
            missing_identifiers(diags);
            return None;
        };
        let api = self.session.api(diags)?;
        let offering = lookup(
            api.get_offering(catalog_id, offering_id).await,
            diags,
            RESOURCE,
            "GetOffering",
        )?;

        let new_state = match offering {
            Some(offering) => {
                let mut new_state = OfferingState::from_remote(offering, catalog_id);
                new_state.keep_empty_lists(&state);
                new_state
            }
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
        let mut replace = Vec::new();
        if state.catalog_id != prior_state.catalog_id {
            replace.push(AttributePath::new("catalog_id"));
        }
        if state != prior_state {
            state.rev = Value::Unknown;
            state.updated = Value::Unknown;
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
        let Some(catalog_id) = planned_state.catalog_id.as_deref_option() else {
            missing_identifiers(diags);
            return None;
        };
        let api = self.session.api(diags)?;
        let created = api
            .create_offering(catalog_id, &planned_state.to_remote())
            .await
            .or_report(diags, RESOURCE, "CreateOffering")?;
        let Some(offering_id) = created.id.as_deref() else {
            diags.root_error(
                "Missing offering identifier",
                "The service did not return the identifier of the created offering",
            );
            return None;
        };
        tracing::info!(resource = RESOURCE, catalog_id, offering_id, "offering created");

        let offering_id = offering_id.to_owned();
        let state = settle(
            api.as_ref(),
            diags,
            (catalog_id, &offering_id),
            created,
            &Default::default(),
            &planned_state,
        )
        .await;
        Some((Tracked(state), planned_private_state))
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
        let Some(ids @ (catalog_id, offering_id)) = identifiers(&prior_state) else {
            missing_identifiers(diags);
            return None;
        };
        let api = self.session.api(diags)?;
        let mut current = api
            .get_offering(catalog_id, offering_id)
            .await
            .or_report(diags, RESOURCE, "GetOffering")?;

        let mut patch = PatchBuilder::new(&current).or_report(diags, RESOURCE, "UpdateOffering")?;
        planned_state
            .patch(&prior_state, &mut patch)
            .or_report(diags, RESOURCE, "UpdateOffering")?;
        if !patch.is_empty() {
            let Some(rev) = current.rev.clone() else {
                diags.root_error(
                    "Missing offering revision",
                    "The service did not return the revision of the offering",
                );
                return None;
            };
            let patch = patch.build();
            tracing::debug!(
                resource = RESOURCE,
                catalog_id,
                offering_id,
                operations = patch.len(),
                "patching offering"
            );
            current = api
                .update_offering(catalog_id, offering_id, &rev, &patch)
                .await
                .or_report(diags, RESOURCE, "UpdateOffering")?;
        }

        let state = settle(
            api.as_ref(),
            diags,
            ids,
            current,
            &prior_state,
            &planned_state,
        )
        .await;
        Some((Tracked(state), planned_private_state))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let Some((catalog_id, offering_id)) = identifiers(&prior_state) else {
            missing_identifiers(diags);
            return None;
        };
        let api = self.session.api(diags)?;
        deleted(
            api.delete_offering(catalog_id, offering_id).await,
            diags,
            RESOURCE,
            "DeleteOffering",
        )
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let Some((catalog_id, offering_id)) = convert::split_id(&id) else {
            diags.root_error(
                "Invalid import identifier",
                format!("expected `<catalog_id>/<offering_id>`, got `{id}`"),
            );
            return None;
        };
        let state = OfferingState {
            catalog_id: Value::from(catalog_id.to_owned()),
            offering_id: Value::from(offering_id.to_owned()),
            id: Value::from(id.clone()),
            ..Default::default()
        };
        Some((Tracked(state), Default::default()))
    }
}
