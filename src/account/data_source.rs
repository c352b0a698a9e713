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
use tf_provider::schema::Schema;
use tf_provider::value::ValueEmpty;
use tf_provider::{DataSource, Diagnostics};

use crate::attr::{self, WithSchema};
use crate::errors::ReportExt;
use crate::session::Session;

use super::state::AccountState;

#[derive(Debug, Clone, Default)]
pub struct AccountDataSource {
    session: Session,
}

impl AccountDataSource {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl DataSource for AccountDataSource {
    type State<'a> = AccountState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(attr::data_source_schema(
            AccountState::schema(),
            "Catalog settings of the account",
            &[],
        ))
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        _config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let api = self.session.api(diags)?;
        let account = api.get_catalog_account().await.or_report(
            diags,
            "data.ibm_cm_account",
            "GetCatalogAccount",
        )?;
        Some(AccountState::from_remote(account))
    }
}

#[cfg(test)]
mod tests {
    use tf_provider::schema::AttributeConstraint;
    use tf_provider::value::Value;

    use super::*;
    use crate::api::mock::MockCatalog;
    use crate::api::model::Account;

    #[tokio::test]
    async fn every_attribute_is_read() {
        let mock = MockCatalog::default();
        mock.state().account = Some(Account {
            id: Some("account-1".to_owned()),
            rev: Some("7".to_owned()),
            hide_ibm_cloud_catalog: Some(true),
            ..Default::default()
        });
        let data_source = AccountDataSource::new(Session::with_api(mock));
        let mut diags = Diagnostics::default();

        let schema = data_source.schema(&mut diags).unwrap();
        assert!(schema
            .block
            .attributes
            .values()
            .all(|attribute| attribute.constraint == AttributeConstraint::Computed));

        let state = data_source
            .read(&mut diags, Default::default(), Default::default())
            .await
            .unwrap();
        assert_eq!(state.rev.as_str(), "7");
        assert_eq!(state.hide_ibm_cloud_catalog, Value::Value(true));
        assert!(state.region_filter.is_null());
    }
}
