//! Per-operation compiled schemas.
//!
//! Built once at startup from the contract document and shared read-only
//! across requests.

use axum::http::{HeaderMap, Method, header};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use super::coerce::coerce_params;
use super::compiler::{CompiledSchema, SchemaFailure};
use super::equivalence::EquivalenceTable;
use super::violation::{
    RequestPart, ResponseSchemaViolation, SchemaCompilationError, ValidationViolation,
};
use crate::contract::{ContractDocument, OpenApiOperationDescriptor};

/// Query parameters that make an operation paginated.
pub const PAGINATION_PARAMS: [&str; 3] = ["limit", "startingAfter", "endingBefore"];

/// Request parts after successful validation, with query defaults applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedRequest {
    pub path: Value,
    pub query: Value,
    pub body: Option<Value>,
}

/// Compiled schemas of one operation.
#[derive(Debug)]
pub struct CompiledOperation {
    descriptor: OpenApiOperationDescriptor,
    headers: Option<CompiledSchema>,
    path: Option<CompiledSchema>,
    query: Option<CompiledSchema>,
    body: Option<CompiledSchema>,
    responses: HashMap<u16, CompiledSchema>,
    equivalence: EquivalenceTable,
}

impl CompiledOperation {
    pub fn compile(descriptor: OpenApiOperationDescriptor) -> Result<Self, SchemaCompilationError> {
        let compile = |schema: Option<&Value>, part: &str| compile_part(&descriptor, schema, part);

        let headers = compile(descriptor.headers.as_ref(), "headers")?;
        let path = compile(descriptor.path.as_ref(), "path")?;
        let query = compile(descriptor.querystring.as_ref(), "querystring")?;
        let body = compile(descriptor.body.as_ref(), "body")?;

        let mut responses = HashMap::new();
        for (status, schema) in &descriptor.responses {
            if let Some(compiled) = compile(schema.as_ref(), &format!("response {}", status))? {
                responses.insert(*status, compiled);
            }
        }

        let equivalence = descriptor
            .body
            .as_ref()
            .map(EquivalenceTable::from_schema)
            .unwrap_or_default();

        Ok(Self {
            descriptor,
            headers,
            path,
            query,
            body,
            responses,
            equivalence,
        })
    }

    pub fn descriptor(&self) -> &OpenApiOperationDescriptor {
        &self.descriptor
    }

    pub fn method(&self) -> &Method {
        &self.descriptor.method
    }

    pub fn path_template(&self) -> &str {
        &self.descriptor.path_template
    }

    /// Whether the query schema declares any cursor-pagination parameter.
    pub fn is_paginated(&self) -> bool {
        self.descriptor
            .query_properties()
            .any(|name| PAGINATION_PARAMS.contains(&name))
    }

    pub fn equivalence(&self) -> &EquivalenceTable {
        &self.equivalence
    }

    /// Coerce raw query pairs against the query schema, applying defaults.
    pub fn coerce_query(&self, pairs: &[(String, String)]) -> Value {
        coerce_params(self.descriptor.querystring.as_ref(), pairs, true)
    }

    /// Validate headers, path, query string and body, in that order.
    ///
    /// `query` is the already coerced query object.
    pub fn validate_request(
        &self,
        headers: &HeaderMap,
        path_params: &[(String, String)],
        query: Value,
        body: &[u8],
    ) -> Result<ValidatedRequest, ValidationViolation> {
        let header_pairs: Vec<(String, String)> = headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let header_values = coerce_params(self.descriptor.headers.as_ref(), &header_pairs, false);
        check(self.headers.as_ref(), RequestPart::Headers, &header_values)?;

        let path = coerce_params(self.descriptor.path.as_ref(), path_params, false);
        check(self.path.as_ref(), RequestPart::Path, &path)?;

        check(self.query.as_ref(), RequestPart::Querystring, &query)?;

        let body = match &self.body {
            None => None,
            Some(schema) => {
                let value = self.parse_body(headers, body)?;
                match value {
                    Some(value) => {
                        check(Some(schema), RequestPart::Body, &value)?;
                        Some(value)
                    }
                    None => None,
                }
            }
        };

        Ok(ValidatedRequest { path, query, body })
    }

    fn parse_body(&self, headers: &HeaderMap, body: &[u8]) -> Result<Option<Value>, ValidationViolation> {
        if body.iter().all(u8::is_ascii_whitespace) {
            // a missing required body is validated as null
            return Ok(self.descriptor.body_required.then_some(Value::Null));
        }

        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !is_json(content_type) {
            return Err(ValidationViolation::content_type(content_type));
        }

        serde_json::from_slice(body)
            .map(Some)
            .map_err(ValidationViolation::malformed_body)
    }

    /// Check a handler's payload against the schema declared for `status`.
    ///
    /// Statuses without a declared JSON schema pass.
    pub fn validate_response(
        &self,
        status: u16,
        payload: &Value,
    ) -> Result<(), ResponseSchemaViolation> {
        let Some(schema) = self.responses.get(&status) else {
            return Ok(());
        };
        match schema.first_failure(payload) {
            None => Ok(()),
            Some(failure) => Err(ResponseSchemaViolation {
                method: self.descriptor.method.to_string(),
                url: self.descriptor.path_template.clone(),
                status,
                property_path: failure.property_path(),
                message: failure.message,
                payload: payload.clone(),
            }),
        }
    }

    pub fn declares_response_schema(&self, status: u16) -> bool {
        self.responses.contains_key(&status)
    }
}

fn compile_part(
    descriptor: &OpenApiOperationDescriptor,
    schema: Option<&Value>,
    part: &str,
) -> Result<Option<CompiledSchema>, SchemaCompilationError> {
    schema
        .map(|s| {
            CompiledSchema::compile(s).map_err(|message| SchemaCompilationError {
                method: descriptor.method.to_string(),
                url: descriptor.path_template.clone(),
                part: part.to_string(),
                message,
            })
        })
        .transpose()
}

fn is_json(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

fn check(
    schema: Option<&CompiledSchema>,
    part: RequestPart,
    instance: &Value,
) -> Result<(), ValidationViolation> {
    match schema.and_then(|s| s.first_failure(instance)) {
        None => Ok(()),
        Some(failure) => Err(violation(part, failure)),
    }
}

fn violation(part: RequestPart, failure: SchemaFailure) -> ValidationViolation {
    ValidationViolation::new(
        part,
        failure.property_path(),
        failure.keyword,
        format!("Request schema validation error: {}", failure.message),
    )
}

/// All compiled operations, keyed by (method, URL template).
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    operations: HashMap<(Method, String), CompiledOperation>,
}

impl SchemaRegistry {
    pub fn compile(document: &ContractDocument) -> Result<Self, SchemaCompilationError> {
        let mut operations = HashMap::new();
        for descriptor in document.operations() {
            let key = (descriptor.method.clone(), descriptor.path_template.clone());
            operations.insert(key, CompiledOperation::compile(descriptor.clone())?);
        }
        tracing::info!(operations = operations.len(), "Contract schemas compiled");
        Ok(Self { operations })
    }

    /// Merge configured equivalence sets (URL template -> sets) into the derived ones.
    pub fn with_equivalences(mut self, extra: &BTreeMap<String, Vec<Vec<String>>>) -> Self {
        for ((_, template), operation) in self.operations.iter_mut() {
            if let Some(sets) = extra.get(template) {
                operation.equivalence.extend(sets.iter().cloned());
            }
        }
        self
    }

    pub fn operation(&self, method: &Method, template: &str) -> Option<&CompiledOperation> {
        self.operations.get(&(method.clone(), template.to_string()))
    }

    pub fn operations(&self) -> impl Iterator<Item = &CompiledOperation> {
        self.operations.values()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
