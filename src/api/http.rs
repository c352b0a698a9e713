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

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, IF_MATCH};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::model::{
    Account, CatalogObject, JsonPatchOperation, Offering, OfferingInstance, Page, ShareSetting,
    Version,
};
use super::{ApiError, CatalogManagement, Result};

const REFRESH_TOKEN_HEADER: &str = "X-Auth-Refresh-Token";
const JSON_PATCH: &str = "application/json-patch+json";

/// [`CatalogManagement`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    client: Client,
    endpoint: Url,
    iam_token: String,
    iam_refresh_token: Option<String>,
}

impl HttpCatalogClient {
    /// Create a client for the service at `endpoint`
    ///
    /// # Arguments
    ///
    /// * `endpoint` - base URL of the service, including the API version path
    /// * `iam_token` - bearer token used for every request
    /// * `iam_refresh_token` - refresh token forwarded on instance operations
    /// * `timeout` - timeout of a single request
    pub fn new(
        endpoint: &str,
        iam_token: String,
        iam_refresh_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let endpoint =
            Url::parse(endpoint).map_err(|_| ApiError::InvalidEndpoint(endpoint.to_owned()))?;
        if endpoint.cannot_be_a_base() {
            return Err(ApiError::InvalidEndpoint(endpoint.to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            iam_token,
            iam_refresh_token,
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidEndpoint(self.endpoint.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.url(segments)?;
        tracing::debug!(%method, %url, "catalog management request");
        Ok(self
            .client
            .request(method, url)
            .bearer_auth(&self.iam_token))
    }

    fn with_refresh_token(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.iam_refresh_token {
            Some(token) => request.header(REFRESH_TOKEN_HEADER, token),
            None => request,
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Vec<u8>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if status.is_success() {
            Ok(body.to_vec())
        } else {
            let err = ApiError::from_response(status.as_u16(), &String::from_utf8_lossy(&body));
            tracing::warn!(status = status.as_u16(), "catalog management request failed: {err}");
            Err(err)
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body = self.execute(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn send_json<B, T>(&self, request: RequestBuilder, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(request.json(body)).await
    }
}

#[async_trait]
impl CatalogManagement for HttpCatalogClient {
    async fn get_catalog_account(&self) -> Result<Account> {
        self.send(self.request(Method::GET, &["catalogaccount"])?)
            .await
    }

    async fn update_catalog_account(&self, account: &Account) -> Result<Account> {
        self.send_json(self.request(Method::PUT, &["catalogaccount"])?, account)
            .await
    }

    async fn create_object(
        &self,
        catalog_id: &str,
        object: &CatalogObject,
    ) -> Result<CatalogObject> {
        let request = self.request(Method::POST, &["catalogs", catalog_id, "objects"])?;
        self.send_json(request, object).await
    }

    async fn get_object(&self, catalog_id: &str, object_id: &str) -> Result<CatalogObject> {
        let request = self.request(
            Method::GET,
            &["catalogs", catalog_id, "objects", object_id],
        )?;
        self.send(request).await
    }

    async fn replace_object(
        &self,
        catalog_id: &str,
        object_id: &str,
        object: &CatalogObject,
    ) -> Result<CatalogObject> {
        let request = self.request(
            Method::PUT,
            &["catalogs", catalog_id, "objects", object_id],
        )?;
        self.send_json(request, object).await
    }

    async fn delete_object(&self, catalog_id: &str, object_id: &str) -> Result<()> {
        let request = self.request(
            Method::DELETE,
            &["catalogs", catalog_id, "objects", object_id],
        )?;
        self.execute(request).await.map(drop)
    }

    async fn create_offering(&self, catalog_id: &str, offering: &Offering) -> Result<Offering> {
        let request = self.request(Method::POST, &["catalogs", catalog_id, "offerings"])?;
        self.send_json(request, offering).await
    }

    async fn get_offering(&self, catalog_id: &str, offering_id: &str) -> Result<Offering> {
        let request = self.request(
            Method::GET,
            &["catalogs", catalog_id, "offerings", offering_id],
        )?;
        self.send(request).await
    }

    async fn update_offering(
        &self,
        catalog_id: &str,
        offering_id: &str,
        if_match: &str,
        patch: &[JsonPatchOperation],
    ) -> Result<Offering> {
        let request = self
            .request(
                Method::PATCH,
                &["catalogs", catalog_id, "offerings", offering_id],
            )?
            .header(IF_MATCH, if_match)
            .header(CONTENT_TYPE, JSON_PATCH)
            .body(serde_json::to_vec(patch)?);
        self.send(request).await
    }

    async fn delete_offering(&self, catalog_id: &str, offering_id: &str) -> Result<()> {
        let request = self.request(
            Method::DELETE,
            &["catalogs", catalog_id, "offerings", offering_id],
        )?;
        self.execute(request).await.map(drop)
    }

    async fn share_offering(
        &self,
        catalog_id: &str,
        offering_id: &str,
        share: &ShareSetting,
    ) -> Result<ShareSetting> {
        let request = self.request(
            Method::POST,
            &["catalogs", catalog_id, "offerings", offering_id, "share"],
        )?;
        self.send_json(request, share).await
    }

    async fn add_offering_access_list(
        &self,
        catalog_id: &str,
        offering_id: &str,
        accesses: &[String],
    ) -> Result<()> {
        let request = self
            .request(
                Method::POST,
                &["catalogs", catalog_id, "offerings", offering_id, "accessList"],
            )?
            .json(accesses);
        self.execute(request).await.map(drop)
    }

    async fn delete_offering_access_list(
        &self,
        catalog_id: &str,
        offering_id: &str,
        accesses: &[String],
    ) -> Result<()> {
        let request = self
            .request(
                Method::DELETE,
                &["catalogs", catalog_id, "offerings", offering_id, "accessList"],
            )?
            .json(accesses);
        self.execute(request).await.map(drop)
    }

    async fn deprecate_offering(
        &self,
        catalog_id: &str,
        offering_id: &str,
        deprecate: bool,
        description: Option<&str>,
    ) -> Result<()> {
        let setting = if deprecate { "true" } else { "false" };
        let request = self
            .request(
                Method::POST,
                &[
                    "catalogs",
                    catalog_id,
                    "offerings",
                    offering_id,
                    "deprecate",
                    setting,
                ],
            )?
            .json(&serde_json::json!({ "description": description }));
        self.execute(request).await.map(drop)
    }

    async fn list_versions(
        &self,
        catalog_id: &str,
        offering_id: &str,
        kind_id: &str,
        start: Option<&str>,
    ) -> Result<Page<Version>> {
        let mut request = self.request(
            Method::GET,
            &[
                "catalogs",
                catalog_id,
                "offerings",
                offering_id,
                "kinds",
                kind_id,
                "versions",
            ],
        )?;
        if let Some(start) = start {
            request = request.query(&[("start", start)]);
        }
        self.send(request).await
    }

    async fn create_offering_instance(
        &self,
        instance: &OfferingInstance,
    ) -> Result<OfferingInstance> {
        let request = self.request(Method::POST, &["instances", "offerings"])?;
        self.send_json(self.with_refresh_token(request), instance)
            .await
    }

    async fn get_offering_instance(&self, instance_id: &str) -> Result<OfferingInstance> {
        let request = self.request(Method::GET, &["instances", "offerings", instance_id])?;
        self.send(request).await
    }

    async fn put_offering_instance(
        &self,
        instance_id: &str,
        instance: &OfferingInstance,
    ) -> Result<OfferingInstance> {
        let request = self.request(Method::PUT, &["instances", "offerings", instance_id])?;
        self.send_json(self.with_refresh_token(request), instance)
            .await
    }

    async fn delete_offering_instance(&self, instance_id: &str) -> Result<()> {
        let request = self.request(Method::DELETE, &["instances", "offerings", instance_id])?;
        self.execute(self.with_refresh_token(request))
            .await
            .map(drop)
    }
}
