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

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tf_provider::schema::{AttributeConstraint, Block, Description, Schema};
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{map, AttributePath, Diagnostics, DynamicDataSource, DynamicResource, Provider};

use crate::account::{AccountDataSource, AccountResource};
use crate::api::HttpCatalogClient;
use crate::attr;
use crate::config::{ClientConfig, ConfigError, ProviderConfig};
use crate::object::{ObjectDataSource, ObjectResource};
use crate::offering::{OfferingDataSource, OfferingResource};
use crate::offering_instance::{OfferingInstanceDataSource, OfferingInstanceResource};
use crate::session::Session;

use AttributeConstraint::Optional;

/// Catalog management provider
///
/// Resources and data sources share the session, which holds the client once configured.
#[derive(Debug, Default, Clone)]
pub struct CatalogProvider {
    session: Session,
}

impl CatalogProvider {
    pub fn session(&self) -> &Session {
        &self.session
    }
}

fn report_config_error(diags: &mut Diagnostics, err: ConfigError) {
    let attribute = match err {
        ConfigError::MissingToken => "iam_token",
        ConfigError::InvalidTimeout(_) => "request_timeout",
    };
    diags.error(
        "Invalid provider configuration",
        err.to_string(),
        AttributePath::new(attribute),
    );
}

#[async_trait]
impl Provider for CatalogProvider {
    type Config<'a> = ProviderConfig<'a>;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::plain("IBM Cloud catalog management"),
                attributes: map! {
                    "endpoint" => attr::string(Optional, "URL of the catalog management API (env: IBMCLOUD_CATALOG_MANAGEMENT_API_ENDPOINT)"),
                    "iam_token" => attr::sensitive(attr::string(Optional, "IAM access token (env: IC_IAM_TOKEN)")),
                    "iam_refresh_token" => attr::sensitive(attr::string(Optional, "IAM refresh token, used by instance operations (env: IC_IAM_REFRESH_TOKEN)")),
                    "request_timeout" => attr::number(Optional, "Timeout of a single API request, in seconds (default: 60)"),
                },
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::Config<'a>) -> Option<()> {
        if let Value::Value(seconds) = config.request_timeout {
            if seconds <= 0 {
                report_config_error(diags, ConfigError::InvalidTimeout(seconds));
                return None;
            }
        }
        Some(())
    }

    async fn configure<'a>(
        &self,
        diags: &mut Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        let client = match ClientConfig::resolve(&config, |var| std::env::var(var).ok()) {
            Ok(client) => client,
            Err(err) => {
                report_config_error(diags, err);
                return None;
            }
        };
        let api = match HttpCatalogClient::new(
            &client.endpoint,
            client.iam_token,
            client.iam_refresh_token,
            client.request_timeout,
        ) {
            Ok(api) => api,
            Err(err) => {
                diags.error(
                    "Invalid provider configuration",
                    err.to_string(),
                    AttributePath::new("endpoint"),
                );
                return None;
            }
        };
        tracing::info!(
            terraform_version = terraform_version.as_str(),
            endpoint = client.endpoint.as_str(),
            "catalog management provider configured"
        );
        self.session.configure(Arc::new(api));
        Some(())
    }

    fn get_resources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicResource>>> {
        let session = &self.session;
        Some(map! {
            "cm_account" => AccountResource::new(session.clone()),
            "cm_object" => ObjectResource::new(session.clone()),
            "cm_offering" => OfferingResource::new(session.clone()),
            "cm_offering_instance" => OfferingInstanceResource::new(session.clone()),
        })
    }

    fn get_data_sources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicDataSource>>> {
        let session = &self.session;
        Some(map! {
            "cm_account" => AccountDataSource::new(session.clone()),
            "cm_object" => ObjectDataSource::new(session.clone()),
            "cm_offering" => OfferingDataSource::new(session.clone()),
            "cm_offering_instance" => OfferingInstanceDataSource::new(session.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_resource_has_a_data_source() {
        let provider = CatalogProvider::default();
        let mut diags = Diagnostics::default();

        let mut resources = provider
            .get_resources(&mut diags)
            .unwrap()
            .into_keys()
            .collect::<Vec<_>>();
        let mut data_sources = provider
            .get_data_sources(&mut diags)
            .unwrap()
            .into_keys()
            .collect::<Vec<_>>();
        resources.sort();
        data_sources.sort();

        assert_eq!(
            resources,
            ["cm_account", "cm_object", "cm_offering", "cm_offering_instance"]
        );
        assert_eq!(resources, data_sources);
    }

    #[test]
    fn tokens_are_sensitive() {
        let schema = CatalogProvider::default()
            .schema(&mut Diagnostics::default())
            .unwrap();
        let attributes = &schema.block.attributes;
        assert!(attributes["iam_token"].sensitive);
        assert!(attributes["iam_refresh_token"].sensitive);
        assert!(!attributes["endpoint"].sensitive);
    }

    #[tokio::test]
    async fn validate_rejects_non_positive_timeout() {
        let provider = CatalogProvider::default();
        let mut diags = Diagnostics::default();
        let config = ProviderConfig {
            request_timeout: Value::Value(-1),
            ..Default::default()
        };

        assert!(provider.validate(&mut diags, config).await.is_none());
        assert_eq!(
            diags.errors[0].attribute,
            AttributePath::new("request_timeout")
        );
    }

    #[tokio::test]
    async fn configure_installs_the_client() {
        let provider = CatalogProvider::default();
        let mut diags = Diagnostics::default();
        let config = ProviderConfig {
            endpoint: Value::from("https://cm.example.com/api/v1-beta"),
            iam_token: Value::from("Bearer token"),
            ..Default::default()
        };

        assert!(provider
            .configure(&mut diags, "1.6.0".to_owned(), config)
            .await
            .is_some());
        assert!(diags.errors.is_empty());
        assert!(provider.session().api(&mut diags).is_some());
    }

    #[tokio::test]
    async fn invalid_endpoint_is_reported() {
        let provider = CatalogProvider::default();
        let mut diags = Diagnostics::default();
        let config = ProviderConfig {
            endpoint: Value::from("not a url"),
            iam_token: Value::from("token"),
            ..Default::default()
        };

        assert!(provider
            .configure(&mut diags, "1.6.0".to_owned(), config)
            .await
            .is_none());
        assert_eq!(diags.errors[0].attribute, AttributePath::new("endpoint"));
    }
}
