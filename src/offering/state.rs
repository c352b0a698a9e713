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

use serde::{Deserialize, Serialize};
use tf_provider::map;
use tf_provider::schema::{AttributeConstraint, Block, Description, Schema};
use tf_provider::value::{Value, ValueBool, ValueList, ValueString};

use crate::api::model::{Feature, Offering, ProviderInfo, ShareSetting};
use crate::attr::{self, WithSchema};
use crate::convert;
use crate::patch::PatchBuilder;
use crate::tracked::Identified;

use super::kind::{BadgeState, KindState, SupportState};

use AttributeConstraint::{Computed, Optional, OptionalComputed, Required};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OfferingState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub catalog_id: ValueString<'a>,
    pub offering_id: ValueString<'a>,
    pub label: ValueString<'a>,
    pub name: ValueString<'a>,
    pub offering_icon_url: ValueString<'a>,
    pub offering_docs_url: ValueString<'a>,
    pub offering_support_url: ValueString<'a>,
    pub tags: ValueList<ValueString<'a>>,
    pub keywords: ValueList<ValueString<'a>>,
    pub short_description: ValueString<'a>,
    pub long_description: ValueString<'a>,
    pub features: ValueList<Value<FeatureState<'a>>>,
    pub disclaimer: ValueString<'a>,
    pub hidden: ValueBool,
    pub provider_info: Value<ProviderInfoState<'a>>,
    pub share_with_all: ValueBool,
    pub share_with_ibm: ValueBool,
    pub share_enabled: ValueBool,
    pub share_with_access_list: ValueList<ValueString<'a>>,
    pub deprecate: ValueBool,
    pub rev: ValueString<'a>,
    pub url: ValueString<'a>,
    pub crn: ValueString<'a>,
    pub created: ValueString<'a>,
    pub updated: ValueString<'a>,
    pub catalog_name: ValueString<'a>,
    pub permit_request_ibm_public_publish: ValueBool,
    pub ibm_publish_approved: ValueBool,
    pub public_publish_approved: ValueBool,
    pub support: Value<SupportState<'a>>,
    pub badges: ValueList<Value<BadgeState<'a>>>,
    pub kinds: ValueList<Value<KindState<'a>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FeatureState<'a> {
    #[serde(borrow = "'a")]
    pub title: ValueString<'a>,
    pub description: ValueString<'a>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProviderInfoState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
}

impl FeatureState<'_> {
    fn to_remote(&self) -> Feature {
        Feature {
            title: convert::opt_string(&self.title),
            description: convert::opt_string(&self.description),
        }
    }
}

impl ProviderInfoState<'_> {
    fn to_remote(&self) -> ProviderInfo {
        ProviderInfo {
            id: convert::opt_string(&self.id),
            name: convert::opt_string(&self.name),
        }
    }
}

/// Record the change of a field into `patch`
///
/// Unknown planned values are left to the service.
fn patch_field<'v, V, T: Serialize + PartialEq>(
    patch: &mut PatchBuilder,
    path: &str,
    prior: &'v Value<V>,
    planned: &'v Value<V>,
    to_remote: impl Fn(&'v Value<V>) -> Option<T>,
) -> serde_json::Result<()> {
    if planned.is_unknown() {
        return Ok(());
    }
    patch.set(path, to_remote(prior), to_remote(planned))
}

/// Keep an empty list written by the practitioner when the service omits it
fn keep_empty<T: Clone>(current: &mut ValueList<T>, planned: &ValueList<T>) {
    if current.is_null() && planned.as_ref_option().is_some_and(Vec::is_empty) {
        *current = planned.clone();
    }
}

impl Identified for OfferingState<'_> {
    fn is_removed(&self) -> bool {
        self.id.is_null()
    }
}

impl WithSchema for OfferingState<'_> {
    fn schema() -> Schema {
        let feature = map! {
            "title" => attr::string(Optional, "Heading of the feature"),
            "description" => attr::string(Optional, "Description of the feature"),
        };
        let provider_info = map! {
            "id" => attr::string(Optional, "Identifier of the provider"),
            "name" => attr::string(Optional, "Name of the provider"),
        };

        Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::plain("Offering of a private catalog"),
                attributes: map! {
                    "id" => attr::string(Computed, "Identifier, as `<catalog_id>/<offering_id>`"),
                    "catalog_id" => attr::string(Required, "Catalog holding the offering"),
                    "offering_id" => attr::string(Computed, "Identifier of the offering in its catalog"),
                    "label" => attr::string(Required, "Display name of the offering"),
                    "name" => attr::string(OptionalComputed, "Programmatic name of the offering"),
                    "offering_icon_url" => attr::string(Optional, "URL of the icon"),
                    "offering_docs_url" => attr::string(Optional, "URL of the documentation"),
                    "offering_support_url" => attr::string(Optional, "URL of the support site"),
                    "tags" => attr::string_list(Optional, "Tags of the offering"),
                    "keywords" => attr::string_list(Optional, "Search keywords"),
                    "short_description" => attr::string(Optional, "Short description of the offering"),
                    "long_description" => attr::string(Optional, "Long description of the offering"),
                    "features" => attr::list(feature, Optional, "Highlighted features"),
                    "disclaimer" => attr::string(Optional, "Disclaimer of the offering"),
                    "hidden" => attr::boolean(OptionalComputed, "Offering is hidden from the catalog"),
                    "provider_info" => attr::single(provider_info, Optional, "Provider of the offering"),
                    "share_with_all" => attr::boolean(OptionalComputed, "Offering is shared with every account"),
                    "share_with_ibm" => attr::boolean(OptionalComputed, "Offering is shared with IBM"),
                    "share_enabled" => attr::boolean(OptionalComputed, "Offering is shared with the access list"),
                    "share_with_access_list" => attr::string_list(Optional, "Accounts, enterprises and account groups the offering is shared with"),
                    "deprecate" => attr::boolean(OptionalComputed, "Offering is deprecated"),
                    "rev" => attr::string(Computed, "Cloudant revision of the offering"),
                    "url" => attr::string(Computed, "URL of the offering"),
                    "crn" => attr::string(Computed, "CRN of the offering"),
                    "created" => attr::string(Computed, "Creation date"),
                    "updated" => attr::string(Computed, "Last update date"),
                    "catalog_name" => attr::string(Computed, "Name of the catalog"),
                    "permit_request_ibm_public_publish" => attr::boolean(Computed, "Publication to the IBM catalog can be requested"),
                    "ibm_publish_approved" => attr::boolean(Computed, "Offering is approved for the IBM catalog"),
                    "public_publish_approved" => attr::boolean(Computed, "Offering is approved for the public catalog"),
                    "support" => attr::single(SupportState::schema(), Computed, "Support of the offering"),
                    "badges" => attr::list(BadgeState::schema(), Computed, "Badges of the offering"),
                    "kinds" => attr::list(KindState::schema(), Computed, "Packaging kinds of the offering"),
                },
                ..Default::default()
            },
        }
    }
}

impl<'a> OfferingState<'a> {
    /// Offering sent on creation
    ///
    /// Sharing and deprecation have their own endpoints and are left out.
    pub fn to_remote(&self) -> Offering {
        Offering {
            label: convert::opt_string(&self.label),
            name: convert::opt_string(&self.name),
            offering_icon_url: convert::opt_string(&self.offering_icon_url),
            offering_docs_url: convert::opt_string(&self.offering_docs_url),
            offering_support_url: convert::opt_string(&self.offering_support_url),
            tags: convert::opt_string_list(&self.tags),
            keywords: convert::opt_string_list(&self.keywords),
            short_description: convert::opt_string(&self.short_description),
            long_description: convert::opt_string(&self.long_description),
            features: convert::opt_nested_list(&self.features, FeatureState::to_remote),
            disclaimer: convert::opt_string(&self.disclaimer),
            hidden: convert::opt_bool(&self.hidden),
            provider_info: convert::opt_nested(&self.provider_info, ProviderInfoState::to_remote),
            catalog_id: convert::opt_string(&self.catalog_id),
            ..Default::default()
        }
    }

    /// State mirroring the remote offering
    pub fn from_remote(offering: Offering, catalog_id: &str) -> Self {
        let catalog_id = offering.catalog_id.unwrap_or_else(|| catalog_id.to_owned());
        Self {
            id: convert::string(
                offering
                    .id
                    .as_deref()
                    .map(|offering_id| format!("{catalog_id}/{offering_id}")),
            ),
            catalog_id: Value::from(catalog_id),
            offering_id: convert::string(offering.id),
            label: convert::string(offering.label),
            name: convert::string(offering.name),
            offering_icon_url: convert::string(offering.offering_icon_url),
            offering_docs_url: convert::string(offering.offering_docs_url),
            offering_support_url: convert::string(offering.offering_support_url),
            tags: convert::string_list(offering.tags),
            keywords: convert::string_list(offering.keywords),
            short_description: convert::string(offering.short_description),
            long_description: convert::string(offering.long_description),
            features: convert::nested_list(offering.features, |feature: Feature| FeatureState {
                title: convert::string(feature.title),
                description: convert::string(feature.description),
            }),
            disclaimer: convert::string(offering.disclaimer),
            hidden: convert::boolean(offering.hidden),
            provider_info: convert::nested(offering.provider_info, |info: ProviderInfo| {
                ProviderInfoState {
                    id: convert::string(info.id),
                    name: convert::string(info.name),
                }
            }),
            share_with_all: convert::boolean(offering.share_with_all),
            share_with_ibm: convert::boolean(offering.share_with_ibm),
            share_enabled: convert::boolean(offering.share_enabled),
            share_with_access_list: convert::string_list(offering.share_with_access_list),
            deprecate: convert::boolean(offering.deprecate),
            rev: convert::string(offering.rev),
            url: convert::string(offering.url),
            crn: convert::string(offering.crn),
            created: convert::string(offering.created),
            updated: convert::string(offering.updated),
            catalog_name: convert::string(offering.catalog_name),
            permit_request_ibm_public_publish: convert::boolean(
                offering.permit_request_ibm_public_publish,
            ),
            ibm_publish_approved: convert::boolean(offering.ibm_publish_approved),
            public_publish_approved: convert::boolean(offering.public_publish_approved),
            support: convert::nested(offering.support, SupportState::from_remote),
            badges: convert::nested_list(offering.badges, BadgeState::from_remote),
            kinds: convert::nested_list(offering.kinds, KindState::from_remote),
        }
    }

    /// Keep the empty lists of `planned` that the service did not echo
    pub fn keep_empty_lists(&mut self, planned: &Self) {
        keep_empty(&mut self.tags, &planned.tags);
        keep_empty(&mut self.keywords, &planned.keywords);
        keep_empty(&mut self.features, &planned.features);
        keep_empty(&mut self.share_with_access_list, &planned.share_with_access_list);
    }

    /// Sharing settings to apply
    ///
    /// Settings left to the service keep their `current` value.
    pub fn share_setting(&self, current: &Offering) -> ShareSetting {
        ShareSetting {
            ibm: convert::opt_bool(&self.share_with_ibm).or(current.share_with_ibm),
            public: convert::opt_bool(&self.share_with_all).or(current.share_with_all),
            enabled: convert::opt_bool(&self.share_enabled).or(current.share_enabled),
        }
    }

    /// Sharing settings differ from `prior`
    pub fn share_changed(&self, prior: &Self) -> bool {
        [
            (&self.share_with_all, &prior.share_with_all),
            (&self.share_with_ibm, &prior.share_with_ibm),
            (&self.share_enabled, &prior.share_enabled),
        ]
        .into_iter()
        .any(|(planned, prior)| planned.is_value() && planned != prior)
    }

    /// Record the fields changed since `prior` into `patch`
    pub fn patch(&self, prior: &Self, patch: &mut PatchBuilder) -> serde_json::Result<()> {
        patch_field(patch, "/label", &prior.label, &self.label, convert::opt_string)?;
        patch_field(patch, "/name", &prior.name, &self.name, convert::opt_string)?;
        patch_field(
            patch,
            "/offering_icon_url",
            &prior.offering_icon_url,
            &self.offering_icon_url,
            convert::opt_string,
        )?;
        patch_field(
            patch,
            "/offering_docs_url",
            &prior.offering_docs_url,
            &self.offering_docs_url,
            convert::opt_string,
        )?;
        patch_field(
            patch,
            "/offering_support_url",
            &prior.offering_support_url,
            &self.offering_support_url,
            convert::opt_string,
        )?;
        patch_field(patch, "/tags", &prior.tags, &self.tags, convert::opt_string_list)?;
        patch_field(
            patch,
            "/keywords",
            &prior.keywords,
            &self.keywords,
            convert::opt_string_list,
        )?;
        patch_field(
            patch,
            "/short_description",
            &prior.short_description,
            &self.short_description,
            convert::opt_string,
        )?;
        patch_field(
            patch,
            "/long_description",
            &prior.long_description,
            &self.long_description,
            convert::opt_string,
        )?;
        patch_field(patch, "/features", &prior.features, &self.features, |features| {
            convert::opt_nested_list(features, FeatureState::to_remote)
        })?;
        patch_field(
            patch,
            "/disclaimer",
            &prior.disclaimer,
            &self.disclaimer,
            convert::opt_string,
        )?;
        patch_field(patch, "/hidden", &prior.hidden, &self.hidden, convert::opt_bool)?;
        patch_field(
            patch,
            "/provider_info",
            &prior.provider_info,
            &self.provider_info,
            |info| convert::opt_nested(info, ProviderInfoState::to_remote),
        )?;
        Ok(())
    }

    /// Optional attributes left to the service, and attributes computed by it
    pub fn plan_computed(&mut self) {
        convert::computed_if_null(&mut self.name);
        convert::computed_if_null(&mut self.hidden);
        convert::computed_if_null(&mut self.share_with_all);
        convert::computed_if_null(&mut self.share_with_ibm);
        convert::computed_if_null(&mut self.share_enabled);
        convert::computed_if_null(&mut self.deprecate);
        self.id = Value::Unknown;
        self.offering_id = Value::Unknown;
        self.rev = Value::Unknown;
        self.url = Value::Unknown;
        self.crn = Value::Unknown;
        self.created = Value::Unknown;
        self.updated = Value::Unknown;
        self.catalog_name = Value::Unknown;
        self.permit_request_ibm_public_publish = Value::Unknown;
        self.ibm_publish_approved = Value::Unknown;
        self.public_publish_approved = Value::Unknown;
        self.support = Value::Unknown;
        self.badges = Value::Unknown;
        self.kinds = Value::Unknown;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::model::PatchOp;

    fn prior() -> OfferingState<'static> {
        OfferingState::from_remote(
            Offering {
                id: Some("offering-1".to_owned()),
                label: Some("Label".to_owned()),
                tags: Some(vec!["a".to_owned()]),
                hidden: Some(false),
                ..Default::default()
            },
            "catalog-1",
        )
    }

    #[test]
    fn identifier_is_composite() {
        let state = prior();
        assert_eq!(state.id.as_str(), "catalog-1/offering-1");
        assert_eq!(state.offering_id.as_str(), "offering-1");
        assert!(state.kinds.is_null());
    }

    #[test]
    fn patch_covers_changed_fields_only() {
        let prior = prior();
        let mut planned = prior.clone();
        planned.label = Value::from("New label");
        planned.tags = Value::Null;
        planned.features = Value::Value(vec![Value::Value(FeatureState {
            title: Value::from("Fast"),
            description: Value::Null,
        })]);
        planned.name = Value::Unknown;

        let remote = json!({"label": "Label", "tags": ["a"], "hidden": false});
        let mut patch = PatchBuilder::new(&remote).unwrap();
        planned.patch(&prior, &mut patch).unwrap();
        let operations = patch.build();

        let ops = operations
            .iter()
            .map(|operation| (operation.op, operation.path.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            ops,
            vec![
                (PatchOp::Replace, "/label"),
                (PatchOp::Remove, "/tags"),
                (PatchOp::Add, "/features"),
            ]
        );
        assert_eq!(operations[2].value, Some(json!([{"title": "Fast"}])));
    }

    #[test]
    fn share_changes_ignore_unknown_settings() {
        let prior = prior();
        let mut planned = prior.clone();
        planned.share_with_all = Value::Unknown;
        assert!(!planned.share_changed(&prior));

        planned.share_with_ibm = Value::Value(true);
        assert!(planned.share_changed(&prior));

        let current = Offering {
            share_enabled: Some(true),
            ..Default::default()
        };
        assert_eq!(
            planned.share_setting(&current),
            ShareSetting {
                ibm: Some(true),
                public: None,
                enabled: Some(true),
            }
        );
    }

    #[test]
    fn empty_lists_are_kept() {
        let mut planned = prior();
        planned.keywords = Value::Value(Vec::new());
        let mut state = prior();
        state.keep_empty_lists(&planned);
        assert_eq!(state.keywords, Value::Value(Vec::new()));
        assert_eq!(state.tags, prior().tags);
    }
}
