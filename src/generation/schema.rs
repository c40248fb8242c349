//! Structural schema inference from example JSON values
//!
//! Nested objects and array items are registered in a [`SchemaRegistry`] under
//! names derived from their property path (`<prefix><Key>` and
//! `<prefix><Key>Item`) and referenced with `$ref` from their parent.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use tracing::debug;

use super::types::{ScalarType, Schema, SchemaRegistry};
use super::utils::schema_name_segment;

/// Nesting depth past which inference stops descending
pub const MAX_DEPTH: usize = 10;

/// Infer a schema for `value`, registering nested schemas in `registry`
pub fn infer_schema(value: &JsonValue, prefix: &str, registry: &mut SchemaRegistry) -> Schema {
    infer_at_depth(value, prefix, registry, 0)
}

fn infer_at_depth(
    value: &JsonValue,
    prefix: &str,
    registry: &mut SchemaRegistry,
    depth: usize,
) -> Schema {
    if depth > MAX_DEPTH {
        debug!(prefix = %prefix, depth, "Schema depth cap reached");
        return Schema::empty_object();
    }

    match value {
        JsonValue::Null => Schema::nullable_string(),
        JsonValue::Array(items) => match items.first() {
            None => Schema::Array {
                items: Box::new(Schema::empty_object()),
            },
            Some(first) => {
                let item_name = format!("{prefix}Item");
                let item = infer_at_depth(first, &item_name, registry, depth + 1);
                let registered = registry.register(item_name, item);
                Schema::Array {
                    items: Box::new(Schema::Ref(registered)),
                }
            }
        },
        JsonValue::Object(map) => {
            let mut properties = IndexMap::with_capacity(map.len());
            for (key, child) in map {
                let child_prefix = format!("{prefix}{}", schema_name_segment(key));
                let schema = match child {
                    JsonValue::Object(_) => {
                        let nested = infer_at_depth(child, &child_prefix, registry, depth + 1);
                        Schema::Ref(registry.register(child_prefix, nested))
                    }
                    // Arrays register their own item schema under `<child_prefix>Item`
                    _ => infer_at_depth(child, &child_prefix, registry, depth + 1),
                };
                properties.insert(key.clone(), schema);
            }
            Schema::Object { properties }
        }
        scalar => Schema::Scalar {
            kind: ScalarType::of(scalar),
            example: Some(scalar.clone()),
            nullable: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_scalars_carry_examples() {
        let mut registry = SchemaRegistry::new();
        let schema = infer_schema(&json!(3.25), "X", &mut registry);
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({ "type": "number", "example": 3.25 })
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_null_is_nullable_string() {
        let mut registry = SchemaRegistry::new();
        let schema = infer_schema(&json!({ "deleted_at": null }), "User", &mut registry);
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({
                "type": "object",
                "properties": { "deleted_at": { "type": "string", "nullable": true } }
            })
        );
    }

    #[test]
    fn test_nested_objects_and_arrays_are_registered() {
        let mut registry = SchemaRegistry::new();
        let value = json!({
            "id": 1,
            "profile": { "city": "Oslo", "geo": { "lat": 59.9 } },
            "roles": [{ "name": "admin" }],
            "aliases": [],
            "tags": ["a", "b"]
        });
        let schema = infer_schema(&value, "GetUserResponse", &mut registry);

        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "example": 1 },
                    "profile": { "$ref": "#/components/schemas/GetUserResponseProfile" },
                    "roles": {
                        "type": "array",
                        "items": { "$ref": "#/components/schemas/GetUserResponseRolesItem" }
                    },
                    "aliases": { "type": "array", "items": { "type": "object" } },
                    "tags": {
                        "type": "array",
                        "items": { "$ref": "#/components/schemas/GetUserResponseTagsItem" }
                    }
                }
            })
        );

        let names: Vec<_> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                "GetUserResponseProfileGeo",
                "GetUserResponseProfile",
                "GetUserResponseRolesItem",
                "GetUserResponseTagsItem",
            ]
        );
        assert_eq!(
            serde_json::to_value(registry.get("GetUserResponseProfileGeo").unwrap()).unwrap(),
            json!({ "type": "object", "properties": { "lat": { "type": "number", "example": 59.9 } } })
        );
    }

    #[test]
    fn test_top_level_array_uses_first_element() {
        let mut registry = SchemaRegistry::new();
        let schema = infer_schema(&json!([{ "a": 1 }, { "b": "x" }]), "List", &mut registry);
        assert_eq!(schema, Schema::Array { items: Box::new(Schema::Ref("ListItem".into())) });
        assert_eq!(registry.len(), 1);
        let item = serde_json::to_value(registry.get("ListItem").unwrap()).unwrap();
        assert!(item["properties"].get("b").is_none());
    }

    #[test]
    fn test_depth_cap_stops_descent() {
        let mut value = json!("leaf");
        for _ in 0..50 {
            value = json!({ "n": value });
        }
        let mut registry = SchemaRegistry::new();
        infer_schema(&value, "Deep", &mut registry);

        // Only levels up to the cap produce named schemas
        assert_eq!(registry.len(), MAX_DEPTH + 1);
        let deepest = format!("Deep{}", "N".repeat(MAX_DEPTH + 1));
        assert_eq!(registry.get(&deepest), Some(&Schema::empty_object()));
    }

    #[test]
    fn test_colliding_keys_get_distinct_names() {
        let mut registry = SchemaRegistry::new();
        let value = json!({
            "a b": { "x": 1 },
            "ab": { "y": "2" }
        });
        let schema = infer_schema(&value, "R", &mut registry);
        let Schema::Object { properties } = schema else {
            panic!("expected object");
        };
        assert_eq!(properties["a b"], Schema::Ref("RAb".into()));
        assert_eq!(properties["ab"], Schema::Ref("RAb2".into()));
        assert_eq!(registry.len(), 2);
    }
}
