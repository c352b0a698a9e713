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

//! JSON patch construction for partial updates

use serde::Serialize;

use crate::api::model::{JsonPatchOperation, PatchOp};

/// Build a JSON patch against the current remote entity
///
/// For every field whose local value changed:
/// - `add` when the remote entity does not have the field,
/// - `replace` when it does,
/// - `remove` when the field has been cleared locally and the remote entity still has it.
#[derive(Debug, Clone)]
pub struct PatchBuilder {
    remote: serde_json::Value,
    operations: Vec<JsonPatchOperation>,
}

impl PatchBuilder {
    pub fn new<T: Serialize>(remote: &T) -> serde_json::Result<Self> {
        Ok(Self {
            remote: serde_json::to_value(remote)?,
            operations: Vec::new(),
        })
    }

    fn remote_has(&self, path: &str) -> bool {
        self.remote
            .pointer(path)
            .is_some_and(|value| !value.is_null())
    }

    /// Record the change of the field at `path` (JSON pointer)
    pub fn field(&mut self, path: &str, changed: bool, desired: Option<serde_json::Value>) {
        if !changed {
            return;
        }
        let present = self.remote_has(path);
        let operation = match desired {
            Some(value) => JsonPatchOperation {
                op: if present {
                    PatchOp::Replace
                } else {
                    PatchOp::Add
                },
                path: path.to_owned(),
                value: Some(value),
            },
            None if present => JsonPatchOperation {
                op: PatchOp::Remove,
                path: path.to_owned(),
                value: None,
            },
            None => return,
        };
        self.operations.push(operation);
    }

    /// Compare the prior and planned values of a field, and record the change if any
    pub fn set<T: Serialize + PartialEq>(
        &mut self,
        path: &str,
        prior: Option<T>,
        planned: Option<T>,
    ) -> serde_json::Result<()> {
        let changed = prior != planned;
        let desired = planned.map(|value| serde_json::to_value(value)).transpose()?;
        self.field(path, changed, desired);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn build(self) -> Vec<JsonPatchOperation> {
        self.operations
    }
}
