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

//! Computed sub-structures of an offering: kinds, versions, support and badges

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tf_provider::map;
use tf_provider::schema::{Attribute, AttributeConstraint};
use tf_provider::value::{Value, ValueBool, ValueList, ValueNumber, ValueString};

use crate::api::model::{Badge, Configuration, Flavor, Kind, Support, Version};
use crate::attr;
use crate::convert;

use AttributeConstraint::Computed;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct KindState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub format_kind: ValueString<'a>,
    pub install_kind: ValueString<'a>,
    pub target_kind: ValueString<'a>,
    pub created: ValueString<'a>,
    pub updated: ValueString<'a>,
    pub versions: ValueList<Value<VersionState<'a>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VersionState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub crn: ValueString<'a>,
    pub version: ValueString<'a>,
    pub version_locator: ValueString<'a>,
    pub catalog_id: ValueString<'a>,
    pub offering_id: ValueString<'a>,
    pub kind_id: ValueString<'a>,
    pub tgz_url: ValueString<'a>,
    pub long_description: ValueString<'a>,
    pub created: ValueString<'a>,
    pub updated: ValueString<'a>,
    pub flavor: Value<FlavorState<'a>>,
    pub configuration: ValueList<Value<ConfigurationState<'a>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FlavorState<'a> {
    #[serde(borrow = "'a")]
    pub name: ValueString<'a>,
    pub label: ValueString<'a>,
    pub index: ValueNumber,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigurationState<'a> {
    #[serde(borrow = "'a")]
    pub key: ValueString<'a>,
    #[serde(rename = "type")]
    pub config_type: ValueString<'a>,
    pub default_value: ValueString<'a>,
    pub display_name: ValueString<'a>,
    pub description: ValueString<'a>,
    pub required: ValueBool,
    pub hidden: ValueBool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SupportState<'a> {
    #[serde(borrow = "'a")]
    pub url: ValueString<'a>,
    pub process: ValueString<'a>,
    pub locations: ValueList<ValueString<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BadgeState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub label: ValueString<'a>,
    pub description: ValueString<'a>,
    pub icon: ValueString<'a>,
    pub authority: ValueString<'a>,
}

impl<'a> KindState<'a> {
    pub fn schema() -> HashMap<String, Attribute> {
        map! {
            "id" => attr::string(Computed, "Identifier of the kind"),
            "format_kind" => attr::string(Computed, "Content format (helm, terraform, operator...)"),
            "install_kind" => attr::string(Computed, "Installation mechanism"),
            "target_kind" => attr::string(Computed, "Deployment target (iks, roks, terraform...)"),
            "created" => attr::string(Computed, "Creation date"),
            "updated" => attr::string(Computed, "Last update date"),
            "versions" => attr::list(VersionState::schema(), Computed, "Versions of the kind"),
        }
    }

    pub fn from_remote(kind: Kind) -> Self {
        Self {
            id: convert::string(kind.id),
            format_kind: convert::string(kind.format_kind),
            install_kind: convert::string(kind.install_kind),
            target_kind: convert::string(kind.target_kind),
            created: convert::string(kind.created),
            updated: convert::string(kind.updated),
            versions: convert::nested_list(kind.versions, VersionState::from_remote),
        }
    }
}

impl<'a> VersionState<'a> {
    fn schema() -> HashMap<String, Attribute> {
        let flavor = map! {
            "name" => attr::string(Computed, "Programmatic name of the flavor"),
            "label" => attr::string(Computed, "Display name of the flavor"),
            "index" => attr::number(Computed, "Order of the flavor"),
        };
        let configuration = map! {
            "key" => attr::string(Computed, "Name of the parameter"),
            "type" => attr::string(Computed, "Type of the parameter"),
            "default_value" => attr::string(Computed, "Default value, as a JSON document"),
            "display_name" => attr::string(Computed, "Display name of the parameter"),
            "description" => attr::string(Computed, "Description of the parameter"),
            "required" => attr::boolean(Computed, "The parameter is required"),
            "hidden" => attr::boolean(Computed, "The parameter is hidden"),
        };
        map! {
            "id" => attr::string(Computed, "Identifier of the version"),
            "crn" => attr::string(Computed, "CRN of the version"),
            "version" => attr::string(Computed, "Semantic version"),
            "version_locator" => attr::string(Computed, "Locator of the version, `<catalog_id>.<version_id>`"),
            "catalog_id" => attr::string(Computed, "Catalog of the version"),
            "offering_id" => attr::string(Computed, "Offering of the version"),
            "kind_id" => attr::string(Computed, "Kind of the version"),
            "tgz_url" => attr::string(Computed, "URL of the content archive"),
            "long_description" => attr::string(Computed, "Long description of the version"),
            "created" => attr::string(Computed, "Creation date"),
            "updated" => attr::string(Computed, "Last update date"),
            "flavor" => attr::single(flavor, Computed, "Flavor of the version"),
            "configuration" => attr::list(configuration, Computed, "Deployment parameters"),
        }
    }

    pub fn from_remote(version: Version) -> Self {
        Self {
            id: convert::string(version.id),
            crn: convert::string(version.crn),
            version: convert::string(version.version),
            version_locator: convert::string(version.version_locator),
            catalog_id: convert::string(version.catalog_id),
            offering_id: convert::string(version.offering_id),
            kind_id: convert::string(version.kind_id),
            tgz_url: convert::string(version.tgz_url),
            long_description: convert::string(version.long_description),
            created: convert::string(version.created),
            updated: convert::string(version.updated),
            flavor: convert::nested(version.flavor, |flavor: Flavor| FlavorState {
                name: convert::string(flavor.name),
                label: convert::string(flavor.label),
                index: convert::number(flavor.index),
            }),
            configuration: convert::nested_list(version.configuration, |config: Configuration| {
                ConfigurationState {
                    key: convert::string(config.key),
                    config_type: convert::string(config.config_type),
                    default_value: convert::json_string(config.default_value.as_ref()),
                    display_name: convert::string(config.display_name),
                    description: convert::string(config.description),
                    required: convert::boolean(config.required),
                    hidden: convert::boolean(config.hidden),
                }
            }),
        }
    }
}

impl<'a> SupportState<'a> {
    pub fn schema() -> HashMap<String, Attribute> {
        map! {
            "url" => attr::string(Computed, "URL of the support site"),
            "process" => attr::string(Computed, "Support process"),
            "locations" => attr::string_list(Computed, "Countries where support is available"),
        }
    }

    pub fn from_remote(support: Support) -> Self {
        Self {
            url: convert::string(support.url),
            process: convert::string(support.process),
            locations: convert::string_list(support.locations),
        }
    }
}

impl<'a> BadgeState<'a> {
    pub fn schema() -> HashMap<String, Attribute> {
        map! {
            "id" => attr::string(Computed, "Identifier of the badge"),
            "label" => attr::string(Computed, "Display name of the badge"),
            "description" => attr::string(Computed, "Description of the badge"),
            "icon" => attr::string(Computed, "Icon of the badge"),
            "authority" => attr::string(Computed, "Authority granting the badge"),
        }
    }

    pub fn from_remote(badge: Badge) -> Self {
        Self {
            id: convert::string(badge.id),
            label: convert::string(badge.label),
            description: convert::string(badge.description),
            icon: convert::string(badge.icon),
            authority: convert::string(badge.authority),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_keep_every_nested_field() {
        let kind = Kind {
            id: Some("kind-1".to_owned()),
            format_kind: Some("terraform".to_owned()),
            versions: Some(vec![Version {
                id: Some("version-1".to_owned()),
                version: Some("1.2.0".to_owned()),
                flavor: Some(Flavor {
                    name: Some("standard".to_owned()),
                    label: None,
                    index: Some(2),
                }),
                configuration: Some(vec![Configuration {
                    key: Some("region".to_owned()),
                    config_type: Some("string".to_owned()),
                    default_value: Some(serde_json::json!("eu-de")),
                    required: Some(true),
                    ..Default::default()
                }]),
                ..Default::default()
            }]),
            ..Default::default()
        };

        let state = KindState::from_remote(kind);
        assert_eq!(state.format_kind.as_str(), "terraform");
        assert!(state.install_kind.is_null());

        let versions = state.versions.as_ref_option().unwrap();
        let version = versions[0].as_ref_option().unwrap();
        assert_eq!(version.version.as_str(), "1.2.0");

        let flavor = version.flavor.as_ref_option().unwrap();
        assert_eq!(flavor.index, Value::Value(2));
        assert!(flavor.label.is_null());

        let configuration = version.configuration.as_ref_option().unwrap();
        let region = configuration[0].as_ref_option().unwrap();
        assert_eq!(region.config_type.as_str(), "string");
        assert_eq!(region.default_value.as_str(), r#""eu-de""#);
        assert_eq!(region.required, Value::Value(true));
    }
}
