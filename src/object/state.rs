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

use crate::api::model::{CatalogObject, ObjectState};
use crate::attr::{self, WithSchema};
use crate::convert;
use crate::tracked::Identified;

use AttributeConstraint::{Computed, Optional, Required};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CatalogObjectState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub catalog_id: ValueString<'a>,
    pub object_id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub kind: ValueString<'a>,
    pub parent_id: ValueString<'a>,
    pub label: ValueString<'a>,
    pub short_description: ValueString<'a>,
    pub tags: ValueList<ValueString<'a>>,
    pub data: ValueString<'a>,
    pub rev: ValueString<'a>,
    pub url: ValueString<'a>,
    pub crn: ValueString<'a>,
    pub created: ValueString<'a>,
    pub updated: ValueString<'a>,
    pub catalog_name: ValueString<'a>,
    pub publish: Value<PublishState>,
    pub state: Value<LifecycleState<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PublishState {
    pub permit_ibm_public_publish: ValueBool,
    pub ibm_approved: ValueBool,
    pub public_approved: ValueBool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LifecycleState<'a> {
    #[serde(borrow = "'a")]
    pub current: ValueString<'a>,
    pub current_entered: ValueString<'a>,
    pub pending: ValueString<'a>,
    pub pending_requested: ValueString<'a>,
    pub previous: ValueString<'a>,
}

impl Identified for CatalogObjectState<'_> {
    fn is_removed(&self) -> bool {
        self.id.is_null()
    }
}

impl WithSchema for CatalogObjectState<'_> {
    fn schema() -> Schema {
        let publish = map! {
            "permit_ibm_public_publish" => attr::boolean(Computed, "Object can be published to the IBM catalog"),
            "ibm_approved" => attr::boolean(Computed, "Object is approved for the IBM catalog"),
            "public_approved" => attr::boolean(Computed, "Object is approved for the public catalog"),
        };
        let state = map! {
            "current" => attr::string(Computed, "Current state"),
            "current_entered" => attr::string(Computed, "Date the current state was entered"),
            "pending" => attr::string(Computed, "Pending state"),
            "pending_requested" => attr::string(Computed, "Date the pending state was requested"),
            "previous" => attr::string(Computed, "Previous state"),
        };

        Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::plain("Object stored in a private catalog"),
                attributes: map! {
                    "id" => attr::string(Computed, "Identifier, as `<catalog_id>/<object_id>`"),
                    "catalog_id" => attr::string(Required, "Catalog holding the object"),
                    "object_id" => attr::string(Computed, "Identifier of the object in its catalog"),
                    "name" => attr::string(Required, "Programmatic name of the object"),
                    "kind" => attr::string(Required, "Kind of the object"),
                    "parent_id" => attr::string(Optional, "Parent of the object"),
                    "label" => attr::string(Optional, "Display name of the object"),
                    "short_description" => attr::string(Optional, "Short description of the object"),
                    "tags" => attr::string_list(Optional, "Tags of the object"),
                    "data" => attr::string(Optional, "Data of the object, as a JSON document"),
                    "rev" => attr::string(Computed, "Cloudant revision of the object"),
                    "url" => attr::string(Computed, "URL of the object"),
                    "crn" => attr::string(Computed, "CRN of the object"),
                    "created" => attr::string(Computed, "Creation date"),
                    "updated" => attr::string(Computed, "Last update date"),
                    "catalog_name" => attr::string(Computed, "Name of the catalog"),
                    "publish" => attr::single(publish, Computed, "Publication status"),
                    "state" => attr::single(state, Computed, "Lifecycle of the object"),
                },
                ..Default::default()
            },
        }
    }
}

impl<'a> CatalogObjectState<'a> {
    /// Object sent to the service
    ///
    /// Fails if `data` is not a valid JSON document.
    pub fn to_remote(&self) -> serde_json::Result<CatalogObject> {
        let data = self
            .data
            .as_deref_option()
            .map(serde_json::from_str)
            .transpose()?;
        Ok(CatalogObject {
            id: convert::opt_string(&self.object_id),
            rev: convert::opt_string(&self.rev),
            name: convert::opt_string(&self.name),
            parent_id: convert::opt_string(&self.parent_id),
            label: convert::opt_string(&self.label),
            tags: convert::opt_string_list(&self.tags),
            short_description: convert::opt_string(&self.short_description),
            kind: convert::opt_string(&self.kind),
            catalog_id: convert::opt_string(&self.catalog_id),
            data,
            ..Default::default()
        })
    }

    /// State mirroring the remote object
    ///
    /// `catalog_id` is used when the service does not echo the catalog of the object.
    pub fn from_remote(object: CatalogObject, catalog_id: &str) -> Self {
        let catalog_id = object.catalog_id.unwrap_or_else(|| catalog_id.to_owned());
        Self {
            id: convert::string(
                object
                    .id
                    .as_deref()
                    .map(|object_id| format!("{catalog_id}/{object_id}")),
            ),
            catalog_id: Value::from(catalog_id),
            object_id: convert::string(object.id),
            name: convert::string(object.name),
            kind: convert::string(object.kind),
            parent_id: convert::string(object.parent_id),
            label: convert::string(object.label),
            short_description: convert::string(object.short_description),
            tags: convert::string_list(object.tags),
            data: convert::json_string(object.data.as_ref()),
            rev: convert::string(object.rev),
            url: convert::string(object.url),
            crn: convert::string(object.crn),
            created: convert::string(object.created),
            updated: convert::string(object.updated),
            catalog_name: convert::string(object.catalog_name),
            publish: convert::nested(object.publish, |publish| PublishState {
                permit_ibm_public_publish: convert::boolean(publish.permit_ibm_public_publish),
                ibm_approved: convert::boolean(publish.ibm_approved),
                public_approved: convert::boolean(publish.public_approved),
            }),
            state: convert::nested(object.state, |state: ObjectState| LifecycleState {
                current: convert::string(state.current),
                current_entered: convert::string(state.current_entered),
                pending: convert::string(state.pending),
                pending_requested: convert::string(state.pending_requested),
                previous: convert::string(state.previous),
            }),
        }
    }

    /// Keep the practitioner's formatting of `data` when it denotes the same document
    pub fn keep_data_formatting(&mut self, previous: &ValueString<'a>) {
        let (Some(current), Some(text)) = (self.data.as_deref_option(), previous.as_deref_option())
        else {
            return;
        };
        let same = match (
            serde_json::from_str::<serde_json::Value>(current),
            serde_json::from_str::<serde_json::Value>(text),
        ) {
            (Ok(current), Ok(previous)) => current == previous,
            _ => false,
        };
        if same {
            self.data = previous.clone();
        }
    }

    /// Attributes computed by the service
    pub fn plan_computed(&mut self) {
        self.id = Value::Unknown;
        self.object_id = Value::Unknown;
        self.rev = Value::Unknown;
        self.url = Value::Unknown;
        self.crn = Value::Unknown;
        self.created = Value::Unknown;
        self.updated = Value::Unknown;
        self.catalog_name = Value::Unknown;
        self.publish = Value::Unknown;
        self.state = Value::Unknown;
    }
}
