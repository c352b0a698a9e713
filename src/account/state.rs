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

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tf_provider::map;
use tf_provider::schema::{AttributeConstraint, Block, Description, Schema};
use tf_provider::value::{Value, ValueBool, ValueList, ValueMap, ValueString};

use crate::api::model::{Account, CategoryFilter, FilterTerms, Filters, IdFilter};
use crate::attr::{self, WithSchema};
use crate::convert;
use crate::tracked::Identified;

use AttributeConstraint::{Computed, OptionalComputed};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AccountState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub rev: ValueString<'a>,
    pub hide_ibm_cloud_catalog: ValueBool,
    pub region_filter: ValueString<'a>,
    pub account_filters: Value<FiltersState<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FiltersState<'a> {
    pub include_all: ValueBool,
    #[serde(borrow = "'a")]
    pub category_filters: ValueMap<'a, Value<CategoryFilterState<'a>>>,
    pub id_filters: Value<IdFilterState<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CategoryFilterState<'a> {
    pub include: ValueBool,
    #[serde(borrow = "'a")]
    pub filter_terms: ValueList<ValueString<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IdFilterState<'a> {
    #[serde(borrow = "'a")]
    pub include: ValueList<ValueString<'a>>,
    pub exclude: ValueList<ValueString<'a>>,
}

impl Identified for AccountState<'_> {
    fn is_removed(&self) -> bool {
        self.id.is_null()
    }
}

impl WithSchema for AccountState<'_> {
    fn schema() -> Schema {
        let category_filter = map! {
            "include" => attr::boolean(OptionalComputed, "Whether to include the category in the catalog"),
            "filter_terms" => attr::string_list(OptionalComputed, "Filter terms of the category"),
        };
        let id_filter = map! {
            "include" => attr::string_list(OptionalComputed, "Offering ids to include"),
            "exclude" => attr::string_list(OptionalComputed, "Offering ids to exclude"),
        };
        let filters = map! {
            "include_all" => attr::boolean(
                OptionalComputed,
                "Whether all offerings are included by default",
            ),
            "category_filters" => attr::attribute(
                tf_provider::schema::AttributeType::AttributeMap(category_filter),
                OptionalComputed,
                "Filters per category",
            ),
            "id_filters" => attr::single(id_filter, OptionalComputed, "Filters on offering ids"),
        };

        Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::plain("Catalog settings of the account"),
                attributes: map! {
                    "id" => attr::string(Computed, "Identifier of the account"),
                    "rev" => attr::string(Computed, "Cloudant revision of the account settings"),
                    "hide_ibm_cloud_catalog" => attr::boolean(
                        OptionalComputed,
                        "Hide the public catalog in this account",
                    ),
                    "region_filter" => attr::string(OptionalComputed, "Region filter of the account"),
                    "account_filters" => attr::single(
                        filters,
                        OptionalComputed,
                        "Filters applied to the public catalog",
                    ),
                },
                ..Default::default()
            },
        }
    }
}

impl<'a> AccountState<'a> {
    /// Account settings sent to the service
    pub fn to_remote(&self) -> Account {
        Account {
            id: convert::opt_string(&self.id),
            rev: convert::opt_string(&self.rev),
            hide_ibm_cloud_catalog: convert::opt_bool(&self.hide_ibm_cloud_catalog),
            region_filter: convert::opt_string(&self.region_filter),
            account_filters: convert::opt_nested(&self.account_filters, FiltersState::to_remote),
        }
    }

    pub fn from_remote(account: Account) -> Self {
        Self {
            id: convert::string(account.id),
            rev: convert::string(account.rev),
            hide_ibm_cloud_catalog: convert::boolean(account.hide_ibm_cloud_catalog),
            region_filter: convert::string(account.region_filter),
            account_filters: convert::nested(account.account_filters, FiltersState::from_remote),
        }
    }

    /// Optional attributes not set in the configuration are filled by the service
    pub fn plan_computed(&mut self) {
        convert::computed_if_null(&mut self.hide_ibm_cloud_catalog);
        convert::computed_if_null(&mut self.region_filter);
        if let Value::Value(filters) = &mut self.account_filters {
            filters.plan_computed();
        }
        convert::computed_if_null(&mut self.account_filters);
    }
}

impl<'a> FiltersState<'a> {
    fn plan_computed(&mut self) {
        convert::computed_if_null(&mut self.include_all);
        if let Value::Value(filters) = &mut self.category_filters {
            for filter in filters.values_mut() {
                if let Value::Value(filter) = filter {
                    convert::computed_if_null(&mut filter.include);
                    convert::computed_if_null(&mut filter.filter_terms);
                }
            }
        }
        convert::computed_if_null(&mut self.category_filters);
        if let Value::Value(id_filters) = &mut self.id_filters {
            convert::computed_if_null(&mut id_filters.include);
            convert::computed_if_null(&mut id_filters.exclude);
        }
        convert::computed_if_null(&mut self.id_filters);
    }

    fn to_remote(&self) -> Filters {
        Filters {
            include_all: convert::opt_bool(&self.include_all),
            category_filters: self.category_filters.as_ref_option().map(|filters| {
                filters
                    .iter()
                    .filter_map(|(name, filter)| {
                        let filter = filter.as_ref_option()?;
                        Some((name.to_string(), filter.to_remote()))
                    })
                    .collect()
            }),
            id_filters: convert::opt_nested(&self.id_filters, IdFilterState::to_remote),
        }
    }

    fn from_remote(filters: Filters) -> Self {
        Self {
            include_all: convert::boolean(filters.include_all),
            category_filters: Value::from(filters.category_filters.map(|filters| {
                filters
                    .into_iter()
                    .map(|(name, filter)| {
                        (
                            Cow::Owned(name),
                            Value::Value(CategoryFilterState::from_remote(filter)),
                        )
                    })
                    .collect::<BTreeMap<_, _>>()
            })),
            id_filters: convert::nested(filters.id_filters, IdFilterState::from_remote),
        }
    }
}

impl<'a> CategoryFilterState<'a> {
    fn to_remote(&self) -> CategoryFilter {
        CategoryFilter {
            include: convert::opt_bool(&self.include),
            filter: convert::opt_string_list(&self.filter_terms).map(|terms| FilterTerms {
                filter_terms: Some(terms),
            }),
        }
    }

    fn from_remote(filter: CategoryFilter) -> Self {
        Self {
            include: convert::boolean(filter.include),
            filter_terms: convert::string_list(filter.filter.and_then(|filter| filter.filter_terms)),
        }
    }
}

impl<'a> IdFilterState<'a> {
    fn to_remote(&self) -> IdFilter {
        let terms = |list: &ValueList<ValueString<'a>>| {
            convert::opt_string_list(list).map(|terms| FilterTerms {
                filter_terms: Some(terms),
            })
        };
        IdFilter {
            include: terms(&self.include),
            exclude: terms(&self.exclude),
        }
    }

    fn from_remote(filter: IdFilter) -> Self {
        Self {
            include: convert::string_list(filter.include.and_then(|terms| terms.filter_terms)),
            exclude: convert::string_list(filter.exclude.and_then(|terms| terms.filter_terms)),
        }
    }
}
