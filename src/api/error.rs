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

use serde::Deserialize;
use thiserror::Error;

/// Error returned by the catalog management API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{status}: {message}")]
    Status {
        status: u16,
        message: String,
        trace: Option<String>,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid endpoint `{0}`")]
    InvalidEndpoint(String),

    #[error("pagination does not advance: start token `{0}` was already listed")]
    RepeatedPage(String),
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

impl ApiError {
    /// Build an error from a failed response body
    pub fn from_response(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct ErrorItem {
            message: Option<String>,
        }
        #[derive(Deserialize)]
        struct ErrorBody {
            message: Option<String>,
            trace: Option<String>,
            #[serde(default)]
            errors: Vec<ErrorItem>,
        }

        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => {
                let message = parsed
                    .message
                    .or_else(|| parsed.errors.into_iter().find_map(|item| item.message))
                    .unwrap_or_else(|| body.to_owned());
                ApiError::Status {
                    status,
                    message,
                    trace: parsed.trace,
                }
            }
            Err(_) => ApiError::Status {
                status,
                message: body.to_owned(),
                trace: None,
            },
        }
    }

    /// HTTP status of the failure, if the service answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_from_top_level_field() {
        let err = ApiError::from_response(
            404,
            r#"{"message": "offering not found", "status_code": 404, "trace": "t-1"}"#,
        );
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "404: offering not found");
        match err {
            ApiError::Status { trace, .. } => assert_eq!(trace.as_deref(), Some("t-1")),
            _ => panic!("unexpected error variant"),
        }
    }

    #[test]
    fn message_from_error_list() {
        let err = ApiError::from_response(409, r#"{"errors": [{"code": "conflict", "message": "revision mismatch"}]}"#);
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.to_string(), "409: revision mismatch");
    }

    #[test]
    fn raw_body_when_not_json() {
        let err = ApiError::from_response(502, "bad gateway");
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "502: bad gateway");
    }
}
