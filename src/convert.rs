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

//! Conversions between Terraform values and API fields
//!
//! Remote `None` becomes [`Value::Null`]; unknown and null local values both become `None`.

use std::borrow::Cow;
use std::collections::BTreeMap;

use tf_provider::value::{Value, ValueBool, ValueList, ValueMap, ValueNumber, ValueString};

pub(crate) fn string<'a>(value: Option<String>) -> ValueString<'a> {
    Value::from(value.map(Cow::Owned))
}

pub(crate) fn opt_string(value: &ValueString<'_>) -> Option<String> {
    value.as_deref_option().map(str::to_owned)
}

pub(crate) fn string_list<'a>(value: Option<Vec<String>>) -> ValueList<ValueString<'a>> {
    Value::from(value.map(|list| {
        list.into_iter()
            .map(|item| Value::Value(Cow::Owned(item)))
            .collect::<Vec<_>>()
    }))
}

pub(crate) fn opt_string_list(value: &ValueList<ValueString<'_>>) -> Option<Vec<String>> {
    value
        .as_ref_option()
        .map(|list| list.iter().filter_map(opt_string).collect())
}

pub(crate) fn string_map<'a>(value: Option<BTreeMap<String, String>>) -> ValueMap<'a, ValueString<'a>> {
    Value::from(value.map(|map| {
        map.into_iter()
            .map(|(key, item)| (Cow::Owned(key), Value::Value(Cow::Owned(item))))
            .collect::<BTreeMap<_, _>>()
    }))
}

pub(crate) fn opt_string_map(value: &ValueMap<'_, ValueString<'_>>) -> Option<BTreeMap<String, String>> {
    value.as_ref_option().map(|map| {
        map.iter()
            .filter_map(|(key, item)| Some((key.to_string(), opt_string(item)?)))
            .collect()
    })
}

pub(crate) fn boolean(value: Option<bool>) -> ValueBool {
    Value::from(value)
}

pub(crate) fn opt_bool(value: &ValueBool) -> Option<bool> {
    value.as_ref_option().copied()
}

pub(crate) fn number(value: Option<i64>) -> ValueNumber {
    Value::from(value)
}

/// Nested object: `None` becomes null, otherwise `f` maps the remote object
pub(crate) fn nested<T, U>(value: Option<T>, f: impl FnOnce(T) -> U) -> Value<U> {
    Value::from(value.map(f))
}

/// List of nested objects
pub(crate) fn nested_list<T, U>(value: Option<Vec<T>>, f: impl FnMut(T) -> U) -> ValueList<Value<U>> {
    Value::from(value.map(|list| list.into_iter().map(f).map(Value::Value).collect::<Vec<_>>()))
}

/// Local nested object, `None` when null or unknown
pub(crate) fn opt_nested<T, U>(value: &Value<T>, f: impl FnOnce(&T) -> U) -> Option<U> {
    value.as_ref_option().map(f)
}

/// Local list of nested objects, null and unknown items are skipped
pub(crate) fn opt_nested_list<T, U>(
    value: &ValueList<Value<T>>,
    mut f: impl FnMut(&T) -> U,
) -> Option<Vec<U>> {
    value
        .as_ref_option()
        .map(|list| list.iter().filter_map(|item| item.as_ref_option().map(&mut f)).collect())
}

/// Arbitrary JSON rendered as a string attribute
pub(crate) fn json_string<'a>(value: Option<&serde_json::Value>) -> ValueString<'a> {
    string(value.map(serde_json::Value::to_string))
}

/// Split a composite `<parent>/<child>` identifier
pub(crate) fn split_id(id: &str) -> Option<(&str, &str)> {
    match id.split_once('/') {
        Some((parent, child)) if !parent.is_empty() && !child.is_empty() && !child.contains('/') => {
            Some((parent, child))
        }
        _ => None,
    }
}

/// Optional attribute left to the service: unknown until applied
pub(crate) fn computed_if_null<T>(value: &mut Value<T>) {
    if value.is_null() {
        *value = Value::Unknown;
    }
}
