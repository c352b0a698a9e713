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

//! In-memory catalog used by the resource tests

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::model::{
    Account, CatalogObject, JsonPatchOperation, LastOperation, Offering, OfferingInstance, Page,
    PatchOp, ShareSetting, Version,
};
use super::{ApiError, CatalogManagement, Result};

#[derive(Debug, Default)]
pub(crate) struct MockState {
    pub account: Option<Account>,
    pub objects: HashMap<(String, String), CatalogObject>,
    pub offerings: HashMap<(String, String), Offering>,
    pub instances: HashMap<String, OfferingInstance>,
    /// Pages of versions per kind id
    pub version_pages: HashMap<String, Vec<Vec<Version>>>,
    /// States reported by successive reads of an instance, the last one sticks
    pub instance_states: VecDeque<&'static str>,
    /// HTTP status to fail an operation with
    pub failures: HashMap<&'static str, u16>,
    /// Every operation called, in order
    pub calls: Vec<String>,
    pub patches: Vec<Vec<JsonPatchOperation>>,
    pub shares: Vec<ShareSetting>,
    pub access_added: Vec<String>,
    pub access_removed: Vec<String>,
    pub deprecations: Vec<bool>,
    next_id: u64,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct MockCatalog {
    state: Arc<Mutex<MockState>>,
}

fn not_found(what: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        message: format!("{what} not found"),
        trace: None,
    }
}

fn bump(rev: &Option<String>) -> Option<String> {
    let current = rev
        .as_deref()
        .and_then(|rev| rev.parse::<u64>().ok())
        .unwrap_or(0);
    Some((current + 1).to_string())
}

fn apply_patch(offering: &Offering, patch: &[JsonPatchOperation]) -> Result<Offering> {
    let mut json = serde_json::to_value(offering)?;
    for operation in patch {
        let key = operation.path.trim_start_matches('/').to_owned();
        if let Some(object) = json.as_object_mut() {
            match operation.op {
                PatchOp::Add | PatchOp::Replace => {
                    object.insert(key, operation.value.clone().unwrap_or_default());
                }
                PatchOp::Remove => {
                    object.remove(&key);
                }
            }
        }
    }
    Ok(serde_json::from_value(json)?)
}

impl MockCatalog {
    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn enter(&self, operation: &'static str) -> Result<MutexGuard<'_, MockState>> {
        let mut state = self.state();
        state.calls.push(operation.to_owned());
        if let Some(&status) = state.failures.get(operation) {
            return Err(ApiError::Status {
                status,
                message: format!("{operation} failed"),
                trace: None,
            });
        }
        Ok(state)
    }

    pub fn called(&self, operation: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| call.as_str() == operation)
            .count()
    }
}

impl MockState {
    fn new_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

#[async_trait]
impl CatalogManagement for MockCatalog {
    async fn get_catalog_account(&self) -> Result<Account> {
        let state = self.enter("get_catalog_account")?;
        state.account.clone().ok_or_else(|| not_found("account"))
    }

    async fn update_catalog_account(&self, account: &Account) -> Result<Account> {
        let mut state = self.enter("update_catalog_account")?;
        let mut account = account.clone();
        account.rev = bump(&account.rev);
        state.account = Some(account.clone());
        Ok(account)
    }

    async fn create_object(
        &self,
        catalog_id: &str,
        object: &CatalogObject,
    ) -> Result<CatalogObject> {
        let mut state = self.enter("create_object")?;
        let id = state.new_id("object");
        let mut object = object.clone();
        object.id = Some(id.clone());
        object.rev = Some("1".to_owned());
        object.catalog_id = Some(catalog_id.to_owned());
        object.catalog_name = Some("Catalog".to_owned());
        object.crn = Some(format!("crn:v1:catalog:{catalog_id}:object:{id}"));
        object.url = Some(format!("https://cm/catalogs/{catalog_id}/objects/{id}"));
        object.created = Some("2024-05-01T00:00:00Z".to_owned());
        state
            .objects
            .insert((catalog_id.to_owned(), id), object.clone());
        Ok(object)
    }

    async fn get_object(&self, catalog_id: &str, object_id: &str) -> Result<CatalogObject> {
        let state = self.enter("get_object")?;
        state
            .objects
            .get(&(catalog_id.to_owned(), object_id.to_owned()))
            .cloned()
            .ok_or_else(|| not_found("object"))
    }

    async fn replace_object(
        &self,
        catalog_id: &str,
        object_id: &str,
        object: &CatalogObject,
    ) -> Result<CatalogObject> {
        let mut state = self.enter("replace_object")?;
        let key = (catalog_id.to_owned(), object_id.to_owned());
        if !state.objects.contains_key(&key) {
            return Err(not_found("object"));
        }
        let mut object = object.clone();
        object.rev = bump(&object.rev);
        object.updated = Some("2024-05-02T00:00:00Z".to_owned());
        state.objects.insert(key, object.clone());
        Ok(object)
    }

    async fn delete_object(&self, catalog_id: &str, object_id: &str) -> Result<()> {
        let mut state = self.enter("delete_object")?;
        state
            .objects
            .remove(&(catalog_id.to_owned(), object_id.to_owned()))
            .map(drop)
            .ok_or_else(|| not_found("object"))
    }

    async fn create_offering(&self, catalog_id: &str, offering: &Offering) -> Result<Offering> {
        let mut state = self.enter("create_offering")?;
        let id = state.new_id("offering");
        let mut offering = offering.clone();
        offering.id = Some(id.clone());
        offering.rev = Some("1".to_owned());
        offering.catalog_id = Some(catalog_id.to_owned());
        offering.catalog_name = Some("Catalog".to_owned());
        offering.crn = Some(format!("crn:v1:catalog:{catalog_id}:offering:{id}"));
        offering.url = Some(format!("https://cm/catalogs/{catalog_id}/offerings/{id}"));
        state
            .offerings
            .insert((catalog_id.to_owned(), id), offering.clone());
        Ok(offering)
    }

    async fn get_offering(&self, catalog_id: &str, offering_id: &str) -> Result<Offering> {
        let state = self.enter("get_offering")?;
        state
            .offerings
            .get(&(catalog_id.to_owned(), offering_id.to_owned()))
            .cloned()
            .ok_or_else(|| not_found("offering"))
    }

    async fn update_offering(
        &self,
        catalog_id: &str,
        offering_id: &str,
        if_match: &str,
        patch: &[JsonPatchOperation],
    ) -> Result<Offering> {
        let mut state = self.enter("update_offering")?;
        let key = (catalog_id.to_owned(), offering_id.to_owned());
        let current = state
            .offerings
            .get(&key)
            .cloned()
            .ok_or_else(|| not_found("offering"))?;
        if current.rev.as_deref() != Some(if_match) {
            return Err(ApiError::Status {
                status: 409,
                message: "revision mismatch".to_owned(),
                trace: None,
            });
        }
        let mut updated = apply_patch(&current, patch)?;
        updated.rev = bump(&current.rev);
        state.patches.push(patch.to_vec());
        state.offerings.insert(key, updated.clone());
        Ok(updated)
    }

    async fn delete_offering(&self, catalog_id: &str, offering_id: &str) -> Result<()> {
        let mut state = self.enter("delete_offering")?;
        state
            .offerings
            .remove(&(catalog_id.to_owned(), offering_id.to_owned()))
            .map(drop)
            .ok_or_else(|| not_found("offering"))
    }

    async fn share_offering(
        &self,
        catalog_id: &str,
        offering_id: &str,
        share: &ShareSetting,
    ) -> Result<ShareSetting> {
        let mut state = self.enter("share_offering")?;
        state.shares.push(share.clone());
        if let Some(offering) = state
            .offerings
            .get_mut(&(catalog_id.to_owned(), offering_id.to_owned()))
        {
            offering.share_with_all = share.public;
            offering.share_with_ibm = share.ibm;
            offering.share_enabled = share.enabled;
        }
        Ok(share.clone())
    }

    async fn add_offering_access_list(
        &self,
        catalog_id: &str,
        offering_id: &str,
        accesses: &[String],
    ) -> Result<()> {
        let mut state = self.enter("add_offering_access_list")?;
        state.access_added.extend(accesses.iter().cloned());
        if let Some(offering) = state
            .offerings
            .get_mut(&(catalog_id.to_owned(), offering_id.to_owned()))
        {
            offering
                .share_with_access_list
                .get_or_insert_with(Vec::new)
                .extend(accesses.iter().cloned());
        }
        Ok(())
    }

    async fn delete_offering_access_list(
        &self,
        catalog_id: &str,
        offering_id: &str,
        accesses: &[String],
    ) -> Result<()> {
        let mut state = self.enter("delete_offering_access_list")?;
        state.access_removed.extend(accesses.iter().cloned());
        if let Some(list) = state
            .offerings
            .get_mut(&(catalog_id.to_owned(), offering_id.to_owned()))
            .and_then(|offering| offering.share_with_access_list.as_mut())
        {
            list.retain(|access| !accesses.contains(access));
        }
        Ok(())
    }

    async fn deprecate_offering(
        &self,
        catalog_id: &str,
        offering_id: &str,
        deprecate: bool,
        _description: Option<&str>,
    ) -> Result<()> {
        let mut state = self.enter("deprecate_offering")?;
        state.deprecations.push(deprecate);
        if let Some(offering) = state
            .offerings
            .get_mut(&(catalog_id.to_owned(), offering_id.to_owned()))
        {
            offering.deprecate = Some(deprecate);
        }
        Ok(())
    }

    async fn list_versions(
        &self,
        _catalog_id: &str,
        _offering_id: &str,
        kind_id: &str,
        start: Option<&str>,
    ) -> Result<Page<Version>> {
        let state = self.enter("list_versions")?;
        let pages = state
            .version_pages
            .get(kind_id)
            .ok_or_else(|| not_found("kind"))?;
        let index = match start {
            Some(start) => start.parse::<usize>().map_err(|_| ApiError::Status {
                status: 400,
                message: format!("invalid start `{start}`"),
                trace: None,
            })?,
            None => 0,
        };
        let resources = pages.get(index).cloned().unwrap_or_default();
        let next = (index + 1 < pages.len())
            .then(|| format!("/versions?limit=1&start={}", index + 1));
        Ok(Page {
            total_count: Some(pages.iter().map(Vec::len).sum::<usize>() as i64),
            next,
            resources,
        })
    }

    async fn create_offering_instance(
        &self,
        instance: &OfferingInstance,
    ) -> Result<OfferingInstance> {
        let mut state = self.enter("create_offering_instance")?;
        let id = state.new_id("instance");
        let mut instance = instance.clone();
        instance.id = Some(id.clone());
        instance.rev = Some("1".to_owned());
        instance.crn = Some(format!("crn:v1:instance:{id}"));
        instance.url = Some(format!("https://cm/instances/offerings/{id}"));
        instance.last_operation = Some(LastOperation {
            operation: Some("install".to_owned()),
            state: Some("in progress".to_owned()),
            ..Default::default()
        });
        state.instances.insert(id, instance.clone());
        Ok(instance)
    }

    async fn get_offering_instance(&self, instance_id: &str) -> Result<OfferingInstance> {
        let mut state = self.enter("get_offering_instance")?;
        let next_state = if state.instance_states.len() > 1 {
            state.instance_states.pop_front()
        } else {
            state.instance_states.front().copied()
        };
        let instance = state
            .instances
            .get_mut(instance_id)
            .ok_or_else(|| not_found("instance"))?;
        if let Some(next_state) = next_state {
            let operation = instance.last_operation.get_or_insert_with(Default::default);
            operation.state = Some(next_state.to_owned());
            if next_state == "failed" {
                operation.message = Some("install failed".to_owned());
            }
        }
        Ok(instance.clone())
    }

    async fn put_offering_instance(
        &self,
        instance_id: &str,
        instance: &OfferingInstance,
    ) -> Result<OfferingInstance> {
        let mut state = self.enter("put_offering_instance")?;
        if !state.instances.contains_key(instance_id) {
            return Err(not_found("instance"));
        }
        let mut instance = instance.clone();
        instance.id = Some(instance_id.to_owned());
        instance.rev = bump(&instance.rev);
        instance.last_operation = Some(LastOperation {
            operation: Some("update".to_owned()),
            state: Some("in progress".to_owned()),
            ..Default::default()
        });
        state
            .instances
            .insert(instance_id.to_owned(), instance.clone());
        Ok(instance)
    }

    async fn delete_offering_instance(&self, instance_id: &str) -> Result<()> {
        let mut state = self.enter("delete_offering_instance")?;
        state
            .instances
            .remove(instance_id)
            .map(drop)
            .ok_or_else(|| not_found("instance"))
    }
}
