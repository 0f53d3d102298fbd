//! Contract document loader.

use axum::http::Method;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::path::Path;

use super::error::ContractError;

/// Maximum `$ref` hops along one path before the reference is treated as cyclic.
const MAX_REF_DEPTH: usize = 32;

const METHODS: [&str; 7] = ["get", "put", "post", "delete", "patch", "head", "options"];

/// One contract operation, flattened for schema compilation.
#[derive(Debug, Clone)]
pub struct OpenApiOperationDescriptor {
    pub method: Method,
    /// URL template as written in the contract, e.g. `/accounts/{accountId}`
    pub path_template: String,
    pub operation_id: Option<String>,
    pub tags: Vec<String>,
    /// Header parameters, names lower-cased
    pub headers: Option<Value>,
    pub path: Option<Value>,
    pub querystring: Option<Value>,
    pub body: Option<Value>,
    pub body_required: bool,
    /// Status code -> JSON schema (None when the status declares no JSON body)
    pub responses: BTreeMap<u16, Option<Value>>,
}

impl OpenApiOperationDescriptor {
    /// Query property names declared by this operation.
    pub fn query_properties(&self) -> impl Iterator<Item = &str> {
        self.querystring
            .as_ref()
            .and_then(|s| s.get("properties"))
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|props| props.keys().map(String::as_str))
    }
}

/// Parsed contract: all operations with `$ref`s inlined.
#[derive(Debug, Clone, Default)]
pub struct ContractDocument {
    pub title: String,
    pub version: String,
    operations: Vec<OpenApiOperationDescriptor>,
}

impl ContractDocument {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ContractError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ContractError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse YAML or JSON text.
    pub fn parse(content: &str) -> Result<Self, ContractError> {
        // YAML is a superset of JSON
        let root: Value =
            serde_yaml::from_str(content).map_err(|e| ContractError::Parse(e.to_string()))?;
        Self::from_value(&root)
    }

    pub fn from_value(root: &Value) -> Result<Self, ContractError> {
        let paths = root
            .get("paths")
            .and_then(Value::as_object)
            .ok_or_else(|| ContractError::Parse("document has no 'paths' object".into()))?;

        let mut operations = Vec::new();
        for (template, item) in paths {
            let item = inline_refs(item, root, 0)?;
            let shared = parameter_list(&item);
            for method in METHODS {
                let Some(op) = item.get(method) else {
                    continue;
                };
                operations.push(build_operation(method, template, op, &shared)?);
            }
        }

        Ok(Self {
            title: text_at(root, "/info/title"),
            version: text_at(root, "/info/version"),
            operations,
        })
    }

    pub fn operations(&self) -> &[OpenApiOperationDescriptor] {
        &self.operations
    }

    pub fn operation(&self, method: &Method, template: &str) -> Option<&OpenApiOperationDescriptor> {
        self.operations
            .iter()
            .find(|op| op.method == *method && op.path_template == template)
    }
}

fn text_at(root: &Value, pointer: &str) -> String {
    root.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn parameter_list(node: &Value) -> Vec<Value> {
    node.get("parameters")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn build_operation(
    method: &str,
    template: &str,
    op: &Value,
    shared: &[Value],
) -> Result<OpenApiOperationDescriptor, ContractError> {
    let invalid = |reason: String| ContractError::InvalidOperation {
        method: method.to_ascii_uppercase(),
        path: template.to_string(),
        reason,
    };
    let method_value = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|e| invalid(e.to_string()))?;

    // Operation-level parameters override path-level ones with the same (name, in)
    let mut params: Vec<Value> = shared.to_vec();
    for param in parameter_list(op) {
        let key = (param.get("name").cloned(), param.get("in").cloned());
        params.retain(|p| (p.get("name").cloned(), p.get("in").cloned()) != key);
        params.push(param);
    }

    let mut headers = ParamGroup::default();
    let mut path = ParamGroup::default();
    let mut query = ParamGroup::default();
    for param in &params {
        let name = param
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("parameter without a name".into()))?;
        let required = param.get("required").and_then(Value::as_bool).unwrap_or(false);
        let schema = param.get("schema").cloned().unwrap_or_else(|| json!({}));
        match param.get("in").and_then(Value::as_str) {
            Some("header") => headers.add(&name.to_ascii_lowercase(), schema, required),
            Some("path") => path.add(name, schema, true),
            Some("query") => query.add(name, schema, required),
            // cookie parameters are not validated
            _ => {}
        }
    }

    let body_node = op.get("requestBody");
    let body = body_node
        .and_then(|b| b.pointer("/content/application~1json/schema"))
        .cloned();
    let body_required = body_node
        .and_then(|b| b.get("required"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut responses = BTreeMap::new();
    if let Some(declared) = op.get("responses").and_then(Value::as_object) {
        for (status, response) in declared {
            // `default` and range keys (`4XX`) carry no concrete status
            let Ok(code) = status.parse::<u16>() else {
                continue;
            };
            let schema = response
                .pointer("/content/application~1json/schema")
                .cloned();
            responses.insert(code, schema);
        }
    }

    Ok(OpenApiOperationDescriptor {
        method: method_value,
        path_template: template.to_string(),
        operation_id: op
            .get("operationId")
            .and_then(Value::as_str)
            .map(str::to_string),
        tags: op
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        headers: headers.into_schema(),
        path: path.into_schema(),
        querystring: query.into_schema(),
        body,
        body_required,
        responses,
    })
}

#[derive(Default)]
struct ParamGroup {
    properties: Map<String, Value>,
    required: Vec<Value>,
}

impl ParamGroup {
    fn add(&mut self, name: &str, schema: Value, required: bool) {
        self.properties.insert(name.to_string(), schema);
        if required {
            self.required.push(Value::String(name.to_string()));
        }
    }

    fn into_schema(self) -> Option<Value> {
        if self.properties.is_empty() {
            return None;
        }
        let mut schema = Map::new();
        schema.insert("type".into(), json!("object"));
        schema.insert("properties".into(), Value::Object(self.properties));
        if !self.required.is_empty() {
            schema.insert("required".into(), Value::Array(self.required));
        }
        Some(Value::Object(schema))
    }
}

/// Replace every `{"$ref": "#/..."}` with the referenced node and translate
/// OpenAPI `nullable` into a JSON Schema type union.
fn inline_refs(value: &Value, root: &Value, depth: usize) -> Result<Value, ContractError> {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(reference)) = map.get("$ref") {
                if depth >= MAX_REF_DEPTH {
                    return Err(ContractError::RefDepth(reference.clone()));
                }
                let target = reference
                    .strip_prefix('#')
                    .and_then(|pointer| root.pointer(pointer))
                    .ok_or_else(|| ContractError::UnresolvedRef(reference.clone()))?;
                return inline_refs(target, root, depth + 1);
            }

            let mut out = Map::with_capacity(map.len());
            for (key, child) in map {
                if key == "nullable" {
                    continue;
                }
                out.insert(key.clone(), inline_refs(child, root, depth)?);
            }
            if map.get("nullable").and_then(Value::as_bool) == Some(true) {
                if let Some(Value::String(ty)) = out.get("type").cloned() {
                    out.insert("type".into(), json!([ty, "null"]));
                }
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => items
            .iter()
            .map(|item| inline_refs(item, root, depth))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Ok(other.clone()),
    }
}
