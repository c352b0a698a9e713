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
use crate::paginate::collect_pages;
use crate::session::Session;

use super::state::OfferingState;

const DATA_SOURCE: &str = "data.ibm_cm_offering";

#[derive(Debug, Clone, Default)]
pub struct OfferingDataSource {
    session: Session,
}

impl OfferingDataSource {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl DataSource for OfferingDataSource {
    type State<'a> = OfferingState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(attr::data_source_schema(
            OfferingState::schema(),
            "Offering of a private catalog, with every version of its kinds",
            &["catalog_id", "offering_id"],
        ))
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let (Some(catalog_id), Some(offering_id)) = (
            config.catalog_id.as_deref_option(),
            config.offering_id.as_deref_option(),
        ) else {
            diags.error_short(
                "`catalog_id` and `offering_id` must be known",
                AttributePath::new("offering_id"),
            );
            return None;
        };

        let api = self.session.api(diags)?;
        let mut offering = api
            .get_offering(catalog_id, offering_id)
            .await
            .or_report(diags, DATA_SOURCE, "GetOffering")?;

        // The offering only embeds the latest versions of its kinds
        for kind in offering.kinds.iter_mut().flatten() {
            let Some(kind_id) = kind.id.as_deref() else {
                continue;
            };
            let versions = collect_pages(|start| {
                let api = api.clone();
                async move {
                    api.list_versions(catalog_id, offering_id, kind_id, start.as_deref())
                        .await
                }
            })
            .await
            .or_report(diags, DATA_SOURCE, "ListVersions")?;
            tracing::debug!(
                data_source = DATA_SOURCE,
                kind_id,
                versions = versions.len(),
                "versions listed"
            );
            kind.versions = Some(versions);
        }

        Some(OfferingState::from_remote(offering, catalog_id))
    }
}

#[cfg(test)]
mod tests {
    use tf_provider::value::Value;

    use super::*;
    use crate::api::mock::MockCatalog;
    use crate::api::model::{Kind, Offering, Version};

    fn version(id: &str) -> Version {
        Version {
            id: Some(id.to_owned()),
            version: Some(format!("1.0.{}", id.len())),
            ..Default::default()
        }
    }

    fn config() -> OfferingState<'static> {
        OfferingState {
            catalog_id: Value::from("catalog-1"),
            offering_id: Value::from("offering-7"),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn versions_of_every_page_are_exposed() {
        let mock = MockCatalog::default();
        {
            let mut mock = mock.state();
            mock.offerings.insert(
                ("catalog-1".to_owned(), "offering-7".to_owned()),
                Offering {
                    id: Some("offering-7".to_owned()),
                    label: Some("Seven".to_owned()),
                    kinds: Some(vec![
                        Kind {
                            id: Some("kind-1".to_owned()),
                            format_kind: Some("terraform".to_owned()),
                            versions: Some(vec![version("v3")]),
                            ..Default::default()
                        },
                        Kind::default(),
                    ]),
                    ..Default::default()
                },
            );
            mock.version_pages.insert(
                "kind-1".to_owned(),
                vec![vec![version("v1"), version("v2")], vec![], vec![version("v3")]],
            );
        }
        let data_source = OfferingDataSource::new(Session::with_api(mock.clone()));
        let mut diags = Diagnostics::default();

        let state = data_source
            .read(&mut diags, config(), Default::default())
            .await
            .unwrap();

        assert!(diags.errors.is_empty());
        assert_eq!(state.id.as_str(), "catalog-1/offering-7");
        let kinds = state.kinds.as_ref_option().unwrap();
        assert_eq!(kinds.len(), 2);
        let ids = kinds[0]
            .as_ref_option()
            .and_then(|kind| kind.versions.as_ref_option())
            .unwrap()
            .iter()
            .filter_map(|version| version.as_ref_option())
            .map(|version| version.id.as_str().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["v1", "v2", "v3"]);
        // Kinds without identifier are left as returned
        assert!(kinds[1]
            .as_ref_option()
            .is_some_and(|kind| kind.versions.is_null()));
        assert_eq!(mock.called("list_versions"), 3);
    }

    #[tokio::test]
    async fn listing_failure_is_reported() {
        let mock = MockCatalog::default();
        mock.state().offerings.insert(
            ("catalog-1".to_owned(), "offering-7".to_owned()),
            Offering {
                id: Some("offering-7".to_owned()),
                kinds: Some(vec![Kind {
                    id: Some("unknown-kind".to_owned()),
                    ..Default::default()
                }]),
                ..Default::default()
            },
        );
        let data_source = OfferingDataSource::new(Session::with_api(mock));
        let mut diags = Diagnostics::default();

        assert!(data_source
            .read(&mut diags, config(), Default::default())
            .await
            .is_none());
        assert_eq!(diags.errors[0].summary, "ListVersions failed");
    }
}
