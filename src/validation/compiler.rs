//! Schema compilation and first-failure reporting.
//!
//! `oneOf`/`anyOf` failures carry no detail about which branch property is
//! missing, so every union's branches are compiled alongside the main
//! validator. When a union fails, its branches are re-run in declaration
//! order and the first failing branch's first failure is reported instead.

use jsonschema::Validator;
use jsonschema::error::ValidationErrorKind;
use serde_json::Value;
use std::collections::HashMap;

/// First failing keyword found in an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaFailure {
    /// JSON pointer of the failing instance node, `""` for the root
    pub instance_path: String,
    pub keyword: String,
    /// Missing property name, for `required`
    pub missing: Option<String>,
    pub message: String,
}

impl SchemaFailure {
    /// Property the failure is attributed to, if any.
    pub fn property_path(&self) -> Option<String> {
        match &self.missing {
            Some(missing) => Some(format!("{}/{}", self.instance_path, missing)),
            None if !self.instance_path.is_empty() => Some(self.instance_path.clone()),
            None => None,
        }
    }
}

/// A compiled schema together with its compiled union branches.
pub struct CompiledSchema {
    validator: Validator,
    /// Schema pointer of each `oneOf`/`anyOf` keyword -> its branches, in order
    unions: HashMap<String, Vec<CompiledSchema>>,
}

impl std::fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("unions", &self.unions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CompiledSchema {
    pub fn compile(schema: &Value) -> Result<Self, String> {
        let validator = jsonschema::draft7::new(schema).map_err(|e| e.to_string())?;
        let mut unions = HashMap::new();
        collect_unions(schema, "", &mut unions)?;
        Ok(Self { validator, unions })
    }

    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }

    /// Report the first failure only; `None` when the instance is valid.
    pub fn first_failure(&self, instance: &Value) -> Option<SchemaFailure> {
        let error = self.validator.iter_errors(instance).next()?;
        let instance_path = error.instance_path.to_string();
        let schema_path = error.schema_path.to_string();
        let keyword = schema_path
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();

        if let Some(branches) = self.unions.get(&schema_path) {
            if let Some(node) = instance.pointer(&instance_path) {
                // a oneOf with several matching branches has no failing branch;
                // that case falls through to the union error itself
                if let Some(mut failure) = branches.iter().find_map(|b| b.first_failure(node)) {
                    failure.instance_path = format!("{}{}", instance_path, failure.instance_path);
                    return Some(failure);
                }
            }
        }

        let missing = match &error.kind {
            ValidationErrorKind::Required { property } => {
                property.as_str().map(str::to_string)
            }
            _ => None,
        };

        Some(SchemaFailure {
            instance_path,
            keyword,
            missing,
            message: error.to_string(),
        })
    }
}

fn collect_unions(
    node: &Value,
    pointer: &str,
    out: &mut HashMap<String, Vec<CompiledSchema>>,
) -> Result<(), String> {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                let child_pointer = format!("{}/{}", pointer, escape(key));
                match (key.as_str(), child) {
                    ("oneOf" | "anyOf", Value::Array(branches)) => {
                        // unions nested in a branch are owned by that branch
                        let compiled = branches
                            .iter()
                            .map(CompiledSchema::compile)
                            .collect::<Result<Vec<_>, _>>()?;
                        out.insert(child_pointer, compiled);
                    }
                    // literal data, never a schema
                    ("enum" | "const" | "default" | "example" | "examples", _) => {}
                    _ => collect_unions(child, &child_pointer, out)?,
                }
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                collect_unions(item, &format!("{}/{}", pointer, i), out)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
