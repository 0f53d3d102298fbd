//! String parameter coercion.
//!
//! Query-string, path and header values arrive as strings. Before validation
//! each value is converted to the type its property schema declares, so
//! `limit=5` validates as an integer while `limit=abc` stays a string and
//! fails on `/limit`.

use serde_json::{Map, Number, Value};

/// Build the object instance validated for one parameter group.
///
/// Keys that repeat become arrays. With `apply_defaults`, absent properties
/// that declare a `default` are filled in.
pub fn coerce_params(schema: Option<&Value>, pairs: &[(String, String)], apply_defaults: bool) -> Value {
    let properties = schema
        .and_then(|s| s.get("properties"))
        .and_then(Value::as_object);

    let mut grouped: Map<String, Value> = Map::new();
    for (name, raw) in pairs {
        let property = properties.and_then(|p| p.get(name));
        let value = match declared_type(property) {
            Some("array") => {
                let item_schema = property.and_then(|p| p.get("items"));
                match grouped.remove(name) {
                    Some(Value::Array(mut items)) => {
                        items.push(coerce_scalar(raw, declared_type(item_schema)));
                        Value::Array(items)
                    }
                    _ => Value::Array(vec![coerce_scalar(raw, declared_type(item_schema))]),
                }
            }
            ty => {
                let value = coerce_scalar(raw, ty);
                match grouped.remove(name) {
                    None => value,
                    Some(Value::Array(mut items)) => {
                        items.push(value);
                        Value::Array(items)
                    }
                    Some(previous) => Value::Array(vec![previous, value]),
                }
            }
        };
        grouped.insert(name.clone(), value);
    }

    if apply_defaults {
        if let Some(properties) = properties {
            for (name, property) in properties {
                if let Some(default) = property.get("default") {
                    grouped
                        .entry(name.clone())
                        .or_insert_with(|| default.clone());
                }
            }
        }
    }

    Value::Object(grouped)
}

fn declared_type(schema: Option<&Value>) -> Option<&str> {
    match schema?.get("type")? {
        Value::String(ty) => Some(ty.as_str()),
        // nullable types are ["x", "null"]
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|ty| *ty != "null"),
        _ => None,
    }
}

fn coerce_scalar(raw: &str, ty: Option<&str>) -> Value {
    let coerced = match ty {
        Some("integer") => raw.parse::<i64>().ok().map(Value::from),
        Some("number") => raw
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        Some("boolean") => match raw {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    };
    coerced.unwrap_or_else(|| Value::String(raw.to_string()))
}
