//! Node Normalizer
//!
//! Completes a raw, possibly partial attribute bag into a schema-conformant
//! one: every attribute declared by the registry is present afterwards, with
//! absent values filled from their defaults and present values coerced to
//! their declared kind where safe.
//!
//! The policy is lenient by default: a value that cannot be coerced falls
//! back to the attribute's default instead of failing the operation, because
//! persisted documents may predate the current schema and a malformed bag
//! must never break the editor. (`SchemaViolation` is reserved for a future
//! strict mode.)
//!
//! Legacy-shape handling:
//!
//! - Custom component bags run through
//!   [`crate::models::migrate_component_bag`] before schema lookup, so the
//!   `customRelatedPost` rename and the flat button/banner shapes are
//!   migrated on load.
//! - "Bare" images (a `src` with no `width`/`align`) receive the full image
//!   default bundle through ordinary default-filling; the defaults ARE the
//!   bundle, which also makes the migration idempotent.
//!
//! All of this is pure bag-in, bag-out; mutation of live nodes goes through
//! the session layer.

use serde_json::{Map, Number, Value};
use tracing::warn;

use crate::models::{migrate_component_bag, CustomComponentType};
use crate::schema::registry::{schema_for, AttributeSpec, ValueKind};

/// Normalize a raw attribute bag for the given node type.
///
/// For `customComponent` nodes the bag's `type` attribute selects the
/// per-flavor schema. Types with no registered schema pass through
/// unchanged.
///
/// Guarantees, for types with a schema:
///
/// - every declared attribute is present in the result (no holes)
/// - declared values conform to their [`ValueKind`]
/// - `normalize(t, normalize(t, a)) == normalize(t, a)` (idempotence)
pub fn normalize(node_type: &str, raw: &Map<String, Value>) -> Map<String, Value> {
    if node_type == "customComponent" {
        return normalize_component(raw);
    }

    match schema_for(node_type) {
        Some(schema) => apply_schema(node_type, raw.clone(), &schema.attributes),
        None => raw.clone(),
    }
}

/// Shallow-merge a partial attribute bag onto the current one, then
/// re-normalize. This is the single mutation contract for attribute
/// updates: invariants hold again immediately after every patch.
pub fn patch(
    node_type: &str,
    current: &Map<String, Value>,
    partial: &Map<String, Value>,
) -> Map<String, Value> {
    let mut merged = current.clone();
    for (key, value) in partial {
        merged.insert(key.clone(), value.clone());
    }
    normalize(node_type, &merged)
}

fn normalize_component(raw: &Map<String, Value>) -> Map<String, Value> {
    let bag = migrate_component_bag(raw.clone());

    let type_name = bag
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("customButton")
        .to_string();

    let Some(component_type) = CustomComponentType::parse(&type_name) else {
        warn!(
            component_type = %type_name,
            "unknown custom component type, passing attributes through"
        );
        let mut bag = bag;
        bag.entry("type".to_string())
            .or_insert_with(|| Value::String(type_name.clone()));
        return bag;
    };

    let schema = match schema_for(component_type.name()) {
        Some(schema) => schema,
        // Every flavor in the closed set registers a schema
        None => return bag,
    };

    let mut normalized = apply_schema(component_type.name(), bag, &schema.attributes);
    normalized.insert(
        "type".to_string(),
        Value::String(component_type.name().to_string()),
    );
    normalized
}

fn apply_schema(
    node_type: &str,
    mut bag: Map<String, Value>,
    specs: &[AttributeSpec],
) -> Map<String, Value> {
    let mut out = Map::new();

    for spec in specs {
        let value = match bag.remove(spec.name) {
            None => spec.default.clone(),
            Some(Value::Null) if spec.nullable => Value::Null,
            Some(Value::Null) => spec.default.clone(),
            Some(value) => coerce(node_type, spec, value),
        };
        out.insert(spec.name.to_string(), value);
    }

    // Unknown attributes pass through transparently for forward
    // compatibility; warn so schema drift is visible in logs.
    for (key, value) in bag {
        if key != "type" {
            warn!(node_type, attribute = %key, "unknown attribute passed through");
        }
        out.insert(key, value);
    }

    out
}

fn coerce(node_type: &str, spec: &AttributeSpec, value: Value) -> Value {
    match &spec.kind {
        ValueKind::Str => match value {
            Value::String(s) => Value::String(s),
            Value::Number(n) => Value::String(n.to_string()),
            other => fallback(node_type, spec, &other),
        },
        ValueKind::Int { min, max } => match as_i64(&value) {
            Some(n) => Value::Number(Number::from(n.clamp(*min, *max))),
            None => fallback(node_type, spec, &value),
        },
        ValueKind::Float => match &value {
            Value::Number(_) => value,
            Value::String(s) => match s.trim().parse::<f64>().ok().and_then(Number::from_f64) {
                Some(n) => Value::Number(n),
                None => fallback(node_type, spec, &value),
            },
            other => fallback(node_type, spec, other),
        },
        ValueKind::Bool => match &value {
            Value::Bool(_) => value,
            Value::String(s) if s == "true" => Value::Bool(true),
            Value::String(s) if s == "false" => Value::Bool(false),
            other => fallback(node_type, spec, other),
        },
        ValueKind::Enum(allowed) => match value.as_str() {
            Some(s) => {
                let lowered = s.to_ascii_lowercase();
                if allowed.contains(&lowered.as_str()) {
                    Value::String(lowered)
                } else {
                    fallback(node_type, spec, &value)
                }
            }
            None => fallback(node_type, spec, &value),
        },
        ValueKind::Array => match value {
            Value::Array(_) => value,
            other => fallback(node_type, spec, &other),
        },
        ValueKind::Object => match value {
            Value::Object(_) => value,
            other => fallback(node_type, spec, &other),
        },
        ValueKind::Any => value,
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

fn fallback(node_type: &str, spec: &AttributeSpec, rejected: &Value) -> Value {
    warn!(
        node_type,
        attribute = spec.name,
        %rejected,
        "attribute value failed coercion, using default"
    );
    spec.default.clone()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod normalize_test;
