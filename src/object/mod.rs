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

//! `ibm_cm_object`: generic object of a private catalog

use async_trait::async_trait;
use tf_provider::schema::Schema;
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::attr::WithSchema;
use crate::convert;
use crate::errors::{deleted, lookup, ReportExt};
use crate::session::Session;
use crate::tracked::Tracked;

mod data_source;
mod state;

pub use data_source::ObjectDataSource;
pub use state::CatalogObjectState;

const RESOURCE: &str = "ibm_cm_object";

#[derive(Debug, Clone, Default)]
pub struct ObjectResource {
    session: Session,
}

impl ObjectResource {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

/// Catalog and object identifiers of a state
fn identifiers<'s>(state: &'s CatalogObjectState<'_>) -> Option<(&'s str, &'s str)> {
    match (
        state.catalog_id.as_deref_option(),
        state.object_id.as_deref_option(),
    ) {
        (Some(catalog_id), Some(object_id)) => Some((catalog_id, object_id)),
        _ => state.id.as_deref_option().and_then(convert::split_id),
    }
}

fn missing_identifiers(diags: &mut Diagnostics) {
    diags.root_error(
        "Missing object identifiers",
        "Both `catalog_id` and `object_id` must be known",
    );
}

/// Report a `data` attribute that is not a JSON document
fn report_invalid_data(diags: &mut Diagnostics, err: serde_json::Error) {
    diags.error(
        "Invalid JSON document",
        format!("`data` must be a valid JSON document: {err}"),
        AttributePath::new("data"),
    );
}

#[async_trait]
impl Resource for ObjectResource {
    type State<'a> = Tracked<CatalogObjectState<'a>>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(CatalogObjectState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        if let Some(data) = config.data.as_deref_option() {
            if let Err(err) = serde_json::from_str::<serde_json::Value>(data) {
                report_invalid_data(diags, err);
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
        let Some((catalog_id, object_id)) = identifiers(&state) else {
            missing_identifiers(diags);
            return None;
        };
        let api = self.session.api(diags)?;
        let object = lookup(
            api.get_object(catalog_id, object_id).await,
            diags,
            RESOURCE,
            "GetObject",
        )?;

        let new_state = match object {
            Some(object) => {
                let mut new_state = CatalogObjectState::from_remote(object, catalog_id);
                new_state.keep_data_formatting(&state.data);
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
        if state.kind != prior_state.kind {
            replace.push(AttributePath::new("kind"));
        }
        if state != prior_state {
            state.rev = Value::Unknown;
            state.updated = Value::Unknown;
            state.state = Value::Unknown;
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
        let object = match planned_state.to_remote() {
            Ok(object) => object,
            Err(err) => {
                report_invalid_data(diags, err);
                return None;
            }
        };

        let api = self.session.api(diags)?;
        let created = api
            .create_object(catalog_id, &object)
            .await
            .or_report(diags, RESOURCE, "CreateObject")?;
        tracing::info!(
            resource = RESOURCE,
            catalog_id,
            object_id = created.id.as_deref().unwrap_or_default(),
            "object created"
        );

        let mut state = CatalogObjectState::from_remote(created, catalog_id);
        state.keep_data_formatting(&planned_state.data);
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
        let Some((catalog_id, object_id)) = identifiers(&prior_state) else {
            missing_identifiers(diags);
            return None;
        };
        let mut object = match planned_state.to_remote() {
            Ok(object) => object,
            Err(err) => {
                report_invalid_data(diags, err);
                return None;
            }
        };

        let api = self.session.api(diags)?;
        // The object is replaced at its current revision
        let current = api
            .get_object(catalog_id, object_id)
            .await
            .or_report(diags, RESOURCE, "GetObject")?;
        object.id = Some(object_id.to_owned());
        object.rev = current.rev;
        object.catalog_id = Some(catalog_id.to_owned());

        let replaced = api
            .replace_object(catalog_id, object_id, &object)
            .await
            .or_report(diags, RESOURCE, "ReplaceObject")?;

        let mut state = CatalogObjectState::from_remote(replaced, catalog_id);
        state.keep_data_formatting(&planned_state.data);
        Some((Tracked(state), planned_private_state))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let Some((catalog_id, object_id)) = identifiers(&prior_state) else {
            missing_identifiers(diags);
            return None;
        };
        let api = self.session.api(diags)?;
        deleted(
            api.delete_object(catalog_id, object_id).await,
            diags,
            RESOURCE,
            "DeleteObject",
        )
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let Some((catalog_id, object_id)) = convert::split_id(&id) else {
            diags.root_error(
                "Invalid import identifier",
                format!("expected `<catalog_id>/<object_id>`, got `{id}`"),
            );
            return None;
        };
        let state = CatalogObjectState {
            catalog_id: Value::from(catalog_id.to_owned()),
            object_id: Value::from(object_id.to_owned()),
            id: Value::from(id.clone()),
            ..Default::default()
        };
        Some((Tracked(state), Default::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockCatalog;

    fn resource() -> (ObjectResource, MockCatalog) {
        let mock = MockCatalog::default();
        (ObjectResource::new(Session::with_api(mock.clone())), mock)
    }

    fn planned() -> Tracked<CatalogObjectState<'static>> {
        let mut state = CatalogObjectState {
            catalog_id: Value::from("catalog-1"),
            name: Value::from("my-object"),
            kind: Value::from("vpe"),
            label: Value::from("My object"),
            data: Value::from(r#"{ "port": 443 }"#),
            ..Default::default()
        };
        state.plan_computed();
        Tracked(state)
    }

    async fn create(resource: &ObjectResource) -> Tracked<CatalogObjectState<'static>> {
        let mut diags = Diagnostics::default();
        let (state, _) = resource
            .create(
                &mut diags,
                planned(),
                planned(),
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
        state
    }

    #[tokio::test]
    async fn validate_rejects_invalid_data() {
        let (resource, _) = resource();
        let mut diags = Diagnostics::default();
        let config = Tracked(CatalogObjectState {
            data: Value::from("[1, 2"),
            ..Default::default()
        });

        assert!(resource.validate(&mut diags, config).await.is_none());
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(diags.errors[0].attribute, AttributePath::new("data"));
    }

    #[tokio::test]
    async fn create_fills_computed_attributes() {
        let (resource, _) = resource();
        let state = create(&resource).await;

        assert_eq!(state.id.as_str(), "catalog-1/object-1");
        assert_eq!(state.object_id.as_str(), "object-1");
        assert_eq!(state.rev.as_str(), "1");
        assert_eq!(state.catalog_name.as_str(), "Catalog");
        assert_eq!(state.created.as_str(), "2024-05-01T00:00:00Z");
        assert_eq!(
            state.crn.as_str(),
            "crn:v1:catalog:catalog-1:object:object-1"
        );
        // Computed attributes absent from the response are null, never unknown
        assert!(state.updated.is_null());
        assert!(state.publish.is_null());
        assert_eq!(state.data.as_str(), r#"{ "port": 443 }"#);
    }

    #[tokio::test]
    async fn update_replaces_at_current_revision() {
        let (resource, mock) = resource();
        let prior = create(&resource).await;
        let mut planned = prior.clone();
        planned.label = Value::from("Renamed");
        planned.rev = Value::Unknown;
        let mut diags = Diagnostics::default();

        let (state, _) = resource
            .update(
                &mut diags,
                prior,
                planned.clone(),
                planned,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();

        assert!(diags.errors.is_empty());
        assert_eq!(state.label.as_str(), "Renamed");
        assert_eq!(state.rev.as_str(), "2");
        assert_eq!(state.updated.as_str(), "2024-05-02T00:00:00Z");
        let mock = mock.state();
        let stored = &mock.objects[&("catalog-1".to_owned(), "object-1".to_owned())];
        assert_eq!(stored.label.as_deref(), Some("Renamed"));
    }

    #[tokio::test]
    async fn read_of_deleted_object_clears_state() {
        let (resource, mock) = resource();
        let prior = create(&resource).await;
        mock.state().objects.clear();
        let mut diags = Diagnostics::default();

        let (state, _) = resource
            .read(&mut diags, prior, Default::default(), Default::default())
            .await
            .unwrap();

        assert!(diags.errors.is_empty());
        assert!(state.is_removed());
        assert_eq!(serde_json::to_value(&state).unwrap(), serde_json::Value::Null);
    }

    #[tokio::test]
    async fn catalog_and_kind_changes_force_replacement() {
        let (resource, _) = resource();
        let prior = create(&resource).await;
        let mut proposed = prior.clone();
        proposed.kind = Value::from("other");
        let mut diags = Diagnostics::default();

        let (state, _, replace) = resource
            .plan_update(
                &mut diags,
                prior,
                proposed.clone(),
                proposed,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();

        assert_eq!(replace, vec![AttributePath::new("kind")]);
        assert!(state.rev.is_unknown());
    }

    #[tokio::test]
    async fn import_requires_composite_identifier() {
        let (resource, _) = resource();
        let mut diags = Diagnostics::default();

        let (state, _) = resource
            .import(&mut diags, "catalog-1/object-9".to_owned())
            .await
            .unwrap();
        assert_eq!(state.catalog_id.as_str(), "catalog-1");
        assert_eq!(state.object_id.as_str(), "object-9");

        assert!(resource
            .import(&mut diags, "object-9".to_owned())
            .await
            .is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[tokio::test]
    async fn destroy_tolerates_missing_object() {
        let (resource, mock) = resource();
        let prior = create(&resource).await;
        let mut diags = Diagnostics::default();

        assert!(resource
            .destroy(&mut diags, prior.clone(), Default::default(), Default::default())
            .await
            .is_some());
        assert!(resource
            .destroy(&mut diags, prior, Default::default(), Default::default())
            .await
            .is_some());
        assert!(diags.errors.is_empty());
        assert_eq!(mock.called("delete_object"), 2);
    }
}
