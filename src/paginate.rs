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

use std::collections::HashSet;
use std::future::Future;

use crate::api::{model::Page, ApiError, Result};

/// Fetch every page of a cursor-paginated listing
///
/// `fetch` is first called without a start token, then with the start token of the previous
/// page's `next` link, until a page has no next link.
/// Resources are accumulated in the order they are received.
/// The first error aborts the iteration.
/// A start token that was already listed is an error, as the listing would never end.
pub async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut resources = Vec::new();
    let mut listed = HashSet::new();
    let mut start = None;
    loop {
        let page = fetch(start.take()).await?;
        let next = page.next_start();
        resources.extend(page.resources);
        match next {
            Some(next) if !listed.insert(next.clone()) => {
                return Err(ApiError::RepeatedPage(next));
            }
            Some(next) => start = Some(next),
            None => return Ok(resources),
        }
    }
}
