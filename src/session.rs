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

use std::fmt::Debug;
use std::sync::{Arc, PoisonError, RwLock};

use tf_provider::Diagnostics;

use crate::api::CatalogManagement;

/// Client shared between the provider and its resources
///
/// Resources are instantiated before the provider is configured,
/// so they keep a handle on the session and fetch the client on every call.
#[derive(Clone, Default)]
pub struct Session {
    api: Arc<RwLock<Option<Arc<dyn CatalogManagement>>>>,
}

impl Session {
    /// Session already holding a client
    pub fn with_api<T: CatalogManagement + 'static>(api: T) -> Self {
        let session = Self::default();
        session.configure(Arc::new(api));
        session
    }

    /// Install the client used by every resource
    pub fn configure(&self, api: Arc<dyn CatalogManagement>) {
        *self.api.write().unwrap_or_else(PoisonError::into_inner) = Some(api);
    }

    /// Get the client, reports an error if the provider has not been configured yet
    pub fn api(&self, diags: &mut Diagnostics) -> Option<Arc<dyn CatalogManagement>> {
        let api = self
            .api
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if api.is_none() {
            diags.root_error(
                "Provider is not configured",
                "The catalog management client is only available once the provider has been configured",
            );
        }
        api
    }
}

impl Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let configured = self
            .api
            .read()
            .map(|api| api.is_some())
            .unwrap_or_default();
        f.debug_struct("Session")
            .field("configured", &configured)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockCatalog;

    #[test]
    fn unconfigured_session_reports_error() {
        let mut diags = Diagnostics::default();
        assert!(Session::default().api(&mut diags).is_none());
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(diags.errors[0].summary, "Provider is not configured");
    }

    #[test]
    fn clones_share_the_client() {
        let session = Session::default();
        let resource_handle = session.clone();
        session.configure(Arc::new(MockCatalog::default()));

        let mut diags = Diagnostics::default();
        assert!(resource_handle.api(&mut diags).is_some());
        assert!(diags.errors.is_empty());
    }
}
