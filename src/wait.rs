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

//! Polling of long running instance operations

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::api::{model::OfferingInstance, ApiError};

pub const STATE_SUCCEEDED: &str = "succeeded";
pub const STATE_IN_PROGRESS: &str = "in progress";
pub const STATE_FAILED: &str = "failed";

#[derive(Debug, Error)]
pub enum WaitError {
    #[error("operation failed: {0}")]
    Failed(String),

    #[error("unexpected operation state `{0}`")]
    Unexpected(String),

    #[error("operation did not complete within {}s", .0.as_secs())]
    Timeout(Duration),

    #[error(transparent)]
    Api(#[from] ApiError),
}

async fn poll_until_done<F, Fut>(
    poll: &mut F,
    interval: Duration,
) -> Result<OfferingInstance, WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<OfferingInstance, ApiError>>,
{
    loop {
        let instance = poll().await?;
        let operation = instance.last_operation.as_ref();
        let state = operation.and_then(|operation| operation.state.as_deref());
        match state {
            Some(STATE_SUCCEEDED) => return Ok(instance),
            None | Some(STATE_IN_PROGRESS) => {
                tracing::info!(
                    instance = instance.id.as_deref().unwrap_or_default(),
                    "operation in progress, checking again in {}s",
                    interval.as_secs()
                );
                tokio::time::sleep(interval).await;
            }
            Some(STATE_FAILED) => {
                let message = operation
                    .and_then(|operation| operation.message.clone())
                    .unwrap_or_default();
                return Err(WaitError::Failed(message));
            }
            Some(state) => return Err(WaitError::Unexpected(state.to_owned())),
        }
    }
}

/// Poll an instance until its last operation succeeds
///
/// The instance is polled every `interval` (no backoff).
/// An instance without last operation yet is considered in progress.
/// Poll errors are returned immediately.
pub async fn wait_until_successful<F, Fut>(
    mut poll: F,
    interval: Duration,
    timeout: Duration,
) -> Result<OfferingInstance, WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<OfferingInstance, ApiError>>,
{
    match tokio::time::timeout(timeout, poll_until_done(&mut poll, interval)).await {
        Ok(result) => result,
        Err(_) => Err(WaitError::Timeout(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use tokio::time::Instant;

    use super::*;
    use crate::api::model::LastOperation;

    fn instance(state: Option<&str>) -> OfferingInstance {
        OfferingInstance {
            id: Some("instance-1".to_owned()),
            last_operation: state.map(|state| LastOperation {
                state: Some(state.to_owned()),
                message: Some(format!("{state} message")),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn script(states: &[Option<&str>]) -> impl FnMut() -> std::future::Ready<Result<OfferingInstance, ApiError>> {
        let mut states: VecDeque<_> = states.iter().map(|state| instance(*state)).collect();
        move || {
            let next = if states.len() > 1 {
                states.pop_front()
            } else {
                states.front().cloned()
            };
            std::future::ready(Ok(next.unwrap_or_default()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_polling_at_fixed_interval() {
        let start = Instant::now();
        let instance = wait_until_successful(
            script(&[None, Some(STATE_IN_PROGRESS), Some(STATE_SUCCEEDED)]),
            Duration::from_secs(10),
            Duration::from_secs(600),
        )
        .await
        .unwrap();

        assert_eq!(instance.id.as_deref(), Some("instance-1"));
        assert_eq!(start.elapsed(), Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_carries_remote_message() {
        let err = wait_until_successful(
            script(&[Some(STATE_IN_PROGRESS), Some(STATE_FAILED)]),
            Duration::from_secs(10),
            Duration::from_secs(600),
        )
        .await
        .unwrap_err();

        match err {
            WaitError::Failed(message) => assert_eq!(message, "failed message"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_state_is_unexpected() {
        let err = wait_until_successful(
            script(&[Some("paused")]),
            Duration::from_secs(10),
            Duration::from_secs(600),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, WaitError::Unexpected(state) if state == "paused"));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_while_in_progress() {
        let start = Instant::now();
        let err = wait_until_successful(
            script(&[Some(STATE_IN_PROGRESS)]),
            Duration::from_secs(10),
            Duration::from_secs(35),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, WaitError::Timeout(_)));
        assert_eq!(start.elapsed(), Duration::from_secs(35));
    }

    #[tokio::test(start_paused = true)]
    async fn poll_error_is_returned_immediately() {
        let err = wait_until_successful(
            || async {
                Err(ApiError::Status {
                    status: 503,
                    message: "unavailable".to_owned(),
                    trace: None,
                })
            },
            Duration::from_secs(10),
            Duration::from_secs(600),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, WaitError::Api(err) if err.status() == Some(503)));
    }
}
