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

//! Shorthands to declare schema attributes

use std::collections::HashMap;

use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Description, Schema};

/// State whose schema is known statically
pub(crate) trait WithSchema {
    fn schema() -> Schema;
}

pub(crate) fn attribute(
    attr_type: AttributeType,
    constraint: AttributeConstraint,
    description: &str,
) -> Attribute {
    Attribute {
        attr_type,
        description: Description::plain(description),
        constraint,
        ..Default::default()
    }
}

pub(crate) fn string(constraint: AttributeConstraint, description: &str) -> Attribute {
    attribute(AttributeType::String, constraint, description)
}

pub(crate) fn boolean(constraint: AttributeConstraint, description: &str) -> Attribute {
    attribute(AttributeType::Bool, constraint, description)
}

pub(crate) fn number(constraint: AttributeConstraint, description: &str) -> Attribute {
    attribute(AttributeType::Number, constraint, description)
}

pub(crate) fn string_list(constraint: AttributeConstraint, description: &str) -> Attribute {
    attribute(
        AttributeType::List(AttributeType::String.into()),
        constraint,
        description,
    )
}

pub(crate) fn string_map(constraint: AttributeConstraint, description: &str) -> Attribute {
    attribute(
        AttributeType::Map(AttributeType::String.into()),
        constraint,
        description,
    )
}

pub(crate) fn single(
    attributes: HashMap<String, Attribute>,
    constraint: AttributeConstraint,
    description: &str,
) -> Attribute {
    attribute(AttributeType::AttributeSingle(attributes), constraint, description)
}

pub(crate) fn list(
    attributes: HashMap<String, Attribute>,
    constraint: AttributeConstraint,
    description: &str,
) -> Attribute {
    attribute(AttributeType::AttributeList(attributes), constraint, description)
}

pub(crate) fn sensitive(mut attribute: Attribute) -> Attribute {
    attribute.sensitive = true;
    attribute
}

fn set_computed(attribute: &mut Attribute) {
    attribute.constraint = AttributeConstraint::Computed;
    match &mut attribute.attr_type {
        AttributeType::AttributeSingle(nested)
        | AttributeType::AttributeList(nested)
        | AttributeType::AttributeSet(nested)
        | AttributeType::AttributeMap(nested) => nested.values_mut().for_each(set_computed),
        _ => (),
    }
}

/// Derive the schema of a data source from the schema of the matching resource
///
/// Every attribute becomes computed, except `inputs` that become required.
/// Inputs that do not exist in the resource are added as required strings.
pub(crate) fn data_source_schema(mut schema: Schema, description: &str, inputs: &[&str]) -> Schema {
    schema.block.attributes.values_mut().for_each(set_computed);
    for &input in inputs {
        schema
            .block
            .attributes
            .entry(input.to_owned())
            .or_insert_with(|| string(AttributeConstraint::Required, input))
            .constraint = AttributeConstraint::Required;
    }
    schema.block.description = Description::plain(description);
    schema
}

#[cfg(test)]
mod tests {
    use tf_provider::map;
    use tf_provider::schema::Block;

    use super::*;

    #[test]
    fn data_source_schema_marks_inputs_required() {
        let schema = Schema {
            version: 1,
            block: Block {
                attributes: map! {
                    "id" => string(AttributeConstraint::Computed, "id"),
                    "name" => string(AttributeConstraint::Required, "name"),
                    "nested" => single(
                        map! { "flag" => boolean(AttributeConstraint::Optional, "flag") },
                        AttributeConstraint::Optional,
                        "nested",
                    ),
                },
                ..Default::default()
            },
        };

        let schema = data_source_schema(schema, "data", &["id", "lookup"]);
        let attributes = &schema.block.attributes;
        assert_eq!(attributes["id"].constraint, AttributeConstraint::Required);
        assert_eq!(attributes["lookup"].constraint, AttributeConstraint::Required);
        assert_eq!(attributes["name"].constraint, AttributeConstraint::Computed);
        match &attributes["nested"].attr_type {
            AttributeType::AttributeSingle(nested) => {
                assert_eq!(nested["flag"].constraint, AttributeConstraint::Computed)
            }
            other => panic!("unexpected type {other}"),
        }
    }
}
