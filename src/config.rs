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

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tf_provider::value::{ValueNumber, ValueString};

pub const DEFAULT_ENDPOINT: &str = "https://cm.globalcatalog.cloud.ibm.com/api/v1-beta";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub const ENV_ENDPOINT: &str = "IBMCLOUD_CATALOG_MANAGEMENT_API_ENDPOINT";
pub const ENV_IAM_TOKEN: &str = "IC_IAM_TOKEN";
pub const ENV_IAM_REFRESH_TOKEN: &str = "IC_IAM_REFRESH_TOKEN";

/// Provider block
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig<'a> {
    #[serde(borrow = "'a")]
    pub endpoint: ValueString<'a>,
    pub iam_token: ValueString<'a>,
    pub iam_refresh_token: ValueString<'a>,
    pub request_timeout: ValueNumber,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("no IAM token: set `iam_token` or the IC_IAM_TOKEN environment variable")]
    MissingToken,
    #[error("request timeout must be a positive number of seconds, got {0}")]
    InvalidTimeout(i64),
}

/// Settings of the HTTP client, once the provider block and the environment are merged
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub iam_token: String,
    pub iam_refresh_token: Option<String>,
    pub request_timeout: Duration,
}

fn strip_bearer(token: &str) -> &str {
    token.strip_prefix("Bearer ").unwrap_or(token).trim()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

impl ClientConfig {
    /// Merge the provider block with the environment
    ///
    /// Attributes set in the provider block take precedence over environment variables.
    /// `env` looks up an environment variable.
    pub fn resolve(
        config: &ProviderConfig<'_>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let from = |value: &ValueString<'_>, var: &str| {
            non_empty(value.as_deref_option().map(str::to_owned)).or_else(|| non_empty(env(var)))
        };

        let endpoint = from(&config.endpoint, ENV_ENDPOINT)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned());
        let iam_token = from(&config.iam_token, ENV_IAM_TOKEN)
            .map(|token| strip_bearer(&token).to_owned())
            .ok_or(ConfigError::MissingToken)?;
        let iam_refresh_token = from(&config.iam_refresh_token, ENV_IAM_REFRESH_TOKEN);
        let request_timeout = match config.request_timeout.as_ref_option() {
            Some(&seconds) if seconds > 0 => Duration::from_secs(seconds as u64),
            Some(&seconds) => return Err(ConfigError::InvalidTimeout(seconds)),
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            endpoint,
            iam_token,
            iam_refresh_token,
            request_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tf_provider::value::Value;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_with_token_from_env() {
        let config =
            ClientConfig::resolve(&ProviderConfig::default(), env(&[(ENV_IAM_TOKEN, "tok")]))
                .unwrap();
        assert_eq!(
            config,
            ClientConfig {
                endpoint: DEFAULT_ENDPOINT.to_owned(),
                iam_token: "tok".to_owned(),
                iam_refresh_token: None,
                request_timeout: DEFAULT_REQUEST_TIMEOUT,
            }
        );
    }

    #[test]
    fn block_takes_precedence_over_env() {
        let block = ProviderConfig {
            endpoint: Value::from("https://cm.test/api"),
            iam_token: Value::from("Bearer block-token"),
            request_timeout: Value::Value(5),
            ..Default::default()
        };
        let config = ClientConfig::resolve(
            &block,
            env(&[
                (ENV_ENDPOINT, "https://env.test"),
                (ENV_IAM_TOKEN, "env-token"),
                (ENV_IAM_REFRESH_TOKEN, "refresh"),
            ]),
        )
        .unwrap();

        assert_eq!(config.endpoint, "https://cm.test/api");
        assert_eq!(config.iam_token, "block-token");
        assert_eq!(config.iam_refresh_token.as_deref(), Some("refresh"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_token() {
        let err = ClientConfig::resolve(&ProviderConfig::default(), env(&[(ENV_IAM_TOKEN, " ")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingToken);
    }

    #[test]
    fn non_positive_timeout() {
        let block = ProviderConfig {
            iam_token: Value::from("tok"),
            request_timeout: Value::Value(0),
            ..Default::default()
        };
        let err = ClientConfig::resolve(&block, env(&[])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidTimeout(0));
    }
}
