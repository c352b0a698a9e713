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

//! [`Tracked`] resource state

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

/// State that knows whether the remote entity still exists
pub trait Identified {
    /// The identifier has been cleared: the entity is gone
    fn is_removed(&self) -> bool;
}

/// Resource state that serializes to null once its identifier has been cleared
///
/// Terraform interprets a null state returned by a read as "the resource no longer exists",
/// and removes it from the state file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tracked<T>(pub T);

impl<T> Tracked<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Identified> Tracked<T> {
    pub fn is_removed(&self) -> bool {
        self.0.is_removed()
    }
}

impl<T> Deref for Tracked<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Tracked<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> From<T> for Tracked<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T: Serialize + Identified> Serialize for Tracked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if self.0.is_removed() {
            serializer.serialize_none()
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de, T: Deserialize<'de> + Default> Deserialize<'de> for Tracked<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|state| Self(state.unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Dummy {
        id: Option<String>,
    }

    impl Identified for Dummy {
        fn is_removed(&self) -> bool {
            self.id.is_none()
        }
    }

    #[test]
    fn removed_state_is_null() {
        let state = Tracked(Dummy { id: None });
        assert_eq!(serde_json::to_string(&state).unwrap(), "null");
    }

    #[test]
    fn live_state_is_transparent() {
        let state = Tracked(Dummy {
            id: Some("abc".to_owned()),
        });
        assert_eq!(serde_json::to_string(&state).unwrap(), r#"{"id":"abc"}"#);

        let state: Tracked<Dummy> = serde_json::from_str(r#"{"id":"abc"}"#).unwrap();
        assert_eq!(state.id.as_deref(), Some("abc"));
        let state: Tracked<Dummy> = serde_json::from_str("null").unwrap();
        assert!(state.is_removed());
    }
}
