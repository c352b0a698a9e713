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
use tf_provider::{AttributePath, DataSource, Diagnostics};

use crate::attr::{self, WithSchema};
use crate::errors::ReportExt;
use crate::session::Session;

use super::state::CatalogObjectState;

#[derive(Debug, Clone, Default)]
pub struct ObjectDataSource {
    session: Session,
}

impl ObjectDataSource {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl DataSource for ObjectDataSource {
    type State<'a> = CatalogObjectState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(attr::data_source_schema(
            CatalogObjectState::schema(),
            "Object stored in a private catalog",
            &["catalog_id", "object_id"],
        ))
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let (Some(catalog_id), Some(object_id)) = (
            config.catalog_id.as_deref_option(),
            config.object_id.as_deref_option(),
        ) else {
            diags.error_short(
                "`catalog_id` and `object_id` must be known",
                AttributePath::new("object_id"),
            );
            return None;
        };

        let api = self.session.api(diags)?;
        let object = api.get_object(catalog_id, object_id).await.or_report(
            diags,
            "data.ibm_cm_object",
            "GetObject",
        )?;
        Some(CatalogObjectState::from_remote(object, catalog_id))
    }
}
