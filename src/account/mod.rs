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

//! `ibm_cm_account`: catalog settings of the account

use async_trait::async_trait;
use tf_provider::schema::Schema;
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::api::model::Account;
use crate::attr::WithSchema;
use crate::convert;
use crate::errors::{lookup, ReportExt};
use crate::session::Session;
use crate::tracked::Tracked;

mod data_source;
mod state;

pub use data_source::AccountDataSource;
pub use state::AccountState;

const RESOURCE: &str = "ibm_cm_account";

#[derive(Debug, Clone, Default)]
pub struct AccountResource {
    session: Session,
}

impl AccountResource {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Replace the account settings with the planned ones
    ///
    /// Settings not known at plan time are kept as they currently are.
    async fn apply<'a>(
        &self,
        diags: &mut Diagnostics,
        planned: &AccountState<'a>,
    ) -> Option<AccountState<'a>> {
        let api = self.session.api(diags)?;
        let current = api
            .get_catalog_account()
            .await
            .or_report(diags, RESOURCE, "GetCatalogAccount")?;

        let desired = planned.to_remote();
        let account = Account {
            hide_ibm_cloud_catalog: desired
                .hide_ibm_cloud_catalog
                .or(current.hide_ibm_cloud_catalog),
            region_filter: desired.region_filter.or(current.region_filter),
            account_filters: desired.account_filters.or(current.account_filters),
            id: current.id.clone(),
            rev: current.rev,
        };
        let updated = api
            .update_catalog_account(&account)
            .await
            .or_report(diags, RESOURCE, "UpdateCatalogAccount")?;

        let mut state = AccountState::from_remote(updated);
        if state.id.is_null() {
            state.id = convert::string(current.id);
        }
        Some(state)
    }
}

#[async_trait]
impl Resource for AccountResource {
    type State<'a> = Tracked<AccountState<'a>>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(AccountState::schema())
    }

    async fn validate<'a>(&self, _diags: &mut Diagnostics, _config: Self::State<'a>) -> Option<()> {
        Some(())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        _state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let api = self.session.api(diags)?;
        let account = lookup(
            api.get_catalog_account().await,
            diags,
            RESOURCE,
            "GetCatalogAccount",
        )?;
        let state = account.map(AccountState::from_remote).unwrap_or_default();
        Some((Tracked(state), private_state))
    }

    async fn plan_create<'a>(
        &self,
        _diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = proposed_state;
        state.id = Value::Unknown;
        state.rev = Value::Unknown;
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
        if state != prior_state {
            state.rev = Value::Unknown;
        }
        Some((state, prior_private_state, vec![]))
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
        let state = self.apply(diags, &planned_state).await?;
        Some((Tracked(state), planned_private_state))
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = self.apply(diags, &planned_state).await?;
        Some((Tracked(state), planned_private_state))
    }

    async fn destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        // Account settings cannot be deleted, they are only forgotten
        tracing::info!(
            resource = RESOURCE,
            id = prior_state.id.as_deref_option().unwrap_or_default(),
            "account settings removed from state"
        );
        Some(())
    }

    async fn import<'a>(
        &self,
        _diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = AccountState {
            id: Value::from(id),
            ..Default::default()
        };
        Some((Tracked(state), Default::default()))
    }
}
