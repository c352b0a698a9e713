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

//! Catalog management API as consumed by the provider

use async_trait::async_trait;

mod error;
mod http;
pub mod model;

#[cfg(test)]
pub(crate) mod mock;

pub use error::{ApiError, Result};
pub use http::HttpCatalogClient;

use model::{
    Account, CatalogObject, JsonPatchOperation, Offering, OfferingInstance, Page, ShareSetting,
    Version,
};

/// Operations of the catalog management service used by the resources
#[async_trait]
pub trait CatalogManagement: Send + Sync {
    /// Get the catalog settings of the account
    async fn get_catalog_account(&self) -> Result<Account>;
    /// Replace the catalog settings of the account
    async fn update_catalog_account(&self, account: &Account) -> Result<Account>;

    async fn create_object(&self, catalog_id: &str, object: &CatalogObject)
        -> Result<CatalogObject>;
    async fn get_object(&self, catalog_id: &str, object_id: &str) -> Result<CatalogObject>;
    async fn replace_object(
        &self,
        catalog_id: &str,
        object_id: &str,
        object: &CatalogObject,
    ) -> Result<CatalogObject>;
    async fn delete_object(&self, catalog_id: &str, object_id: &str) -> Result<()>;

    async fn create_offering(&self, catalog_id: &str, offering: &Offering) -> Result<Offering>;
    async fn get_offering(&self, catalog_id: &str, offering_id: &str) -> Result<Offering>;
    /// Apply a JSON patch to an offering, guarded by its revision
    async fn update_offering(
        &self,
        catalog_id: &str,
        offering_id: &str,
        if_match: &str,
        patch: &[JsonPatchOperation],
    ) -> Result<Offering>;
    async fn delete_offering(&self, catalog_id: &str, offering_id: &str) -> Result<()>;
    async fn share_offering(
        &self,
        catalog_id: &str,
        offering_id: &str,
        share: &ShareSetting,
    ) -> Result<ShareSetting>;
    /// Grant access to the offering to accounts, enterprises or account groups
    async fn add_offering_access_list(
        &self,
        catalog_id: &str,
        offering_id: &str,
        accesses: &[String],
    ) -> Result<()>;
    async fn delete_offering_access_list(
        &self,
        catalog_id: &str,
        offering_id: &str,
        accesses: &[String],
    ) -> Result<()>;
    async fn deprecate_offering(
        &self,
        catalog_id: &str,
        offering_id: &str,
        deprecate: bool,
        description: Option<&str>,
    ) -> Result<()>;
    /// Get one page of the versions of an offering kind
    async fn list_versions(
        &self,
        catalog_id: &str,
        offering_id: &str,
        kind_id: &str,
        start: Option<&str>,
    ) -> Result<Page<Version>>;

    async fn create_offering_instance(
        &self,
        instance: &OfferingInstance,
    ) -> Result<OfferingInstance>;
    async fn get_offering_instance(&self, instance_id: &str) -> Result<OfferingInstance>;
    async fn put_offering_instance(
        &self,
        instance_id: &str,
        instance: &OfferingInstance,
    ) -> Result<OfferingInstance>;
    async fn delete_offering_instance(&self, instance_id: &str) -> Result<()>;
}
