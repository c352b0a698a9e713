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

use std::fmt::Display;

use tf_provider::Diagnostics;

use crate::api::ApiError;

/// Report a failed API call as an error diagnostic
///
/// # Arguments
///
/// * `diags` - diagnostics receiving the error
/// * `resource` - full name of the resource or data source (eg: `ibm_cm_offering`)
/// * `operation` - name of the API operation that failed (eg: `GetOffering`)
/// * `err` - the API error
pub(crate) fn report_api_error(
    diags: &mut Diagnostics,
    resource: &'static str,
    operation: &'static str,
    err: impl Display,
) {
    tracing::error!(resource, operation, "{err}");
    diags.root_error(format!("{operation} failed"), format!("{resource}: {err}"));
}

/// Convert an API result into an [`Option`], reporting the error into diagnostics
pub(crate) trait ReportExt<T> {
    fn or_report(
        self,
        diags: &mut Diagnostics,
        resource: &'static str,
        operation: &'static str,
    ) -> Option<T>;
}

impl<T, E: Display> ReportExt<T> for Result<T, E> {
    fn or_report(
        self,
        diags: &mut Diagnostics,
        resource: &'static str,
        operation: &'static str,
    ) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                report_api_error(diags, resource, operation, err);
                None
            }
        }
    }
}

/// Result of a read that tolerates a missing entity
///
/// Returns `Some(None)` when the entity no longer exists, and `None` after reporting any other error.
pub(crate) fn lookup<T>(
    result: Result<T, ApiError>,
    diags: &mut Diagnostics,
    resource: &'static str,
    operation: &'static str,
) -> Option<Option<T>> {
    match result {
        Ok(value) => Some(Some(value)),
        Err(err) if err.is_not_found() => {
            tracing::info!(resource, operation, "remote entity not found, removing it from state");
            Some(None)
        }
        Err(err) => {
            report_api_error(diags, resource, operation, err);
            None
        }
    }
}

/// Result of a deletion, an entity already gone counts as deleted
pub(crate) fn deleted(
    result: Result<(), ApiError>,
    diags: &mut Diagnostics,
    resource: &'static str,
    operation: &'static str,
) -> Option<()> {
    match result {
        Err(err) if err.is_not_found() => {
            tracing::info!(resource, operation, "remote entity already deleted");
            Some(())
        }
        result => result.or_report(diags, resource, operation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found() -> ApiError {
        ApiError::Status {
            status: 404,
            message: "not found".to_owned(),
            trace: None,
        }
    }

    #[test]
    fn missing_entity_is_not_an_error() {
        let mut diags = Diagnostics::default();
        let found = lookup::<()>(Err(not_found()), &mut diags, "ibm_cm_object", "GetObject");
        assert_eq!(found, Some(None));
        assert!(diags.errors.is_empty());

        assert_eq!(
            deleted(Err(not_found()), &mut diags, "ibm_cm_object", "DeleteObject"),
            Some(())
        );
        assert!(diags.errors.is_empty());
    }

    #[test]
    fn error_carries_operation_and_resource() {
        let mut diags = Diagnostics::default();
        let result: Result<(), _> = Err(ApiError::Status {
            status: 500,
            message: "boom".to_owned(),
            trace: None,
        });
        assert!(result
            .or_report(&mut diags, "ibm_cm_offering", "GetOffering")
            .is_none());
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(diags.errors[0].summary, "GetOffering failed");
        assert!(diags.errors[0].detail.starts_with("ibm_cm_offering: 500: boom"));
    }
}
