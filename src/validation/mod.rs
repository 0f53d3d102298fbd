//! Schema validation engine.
//!
//! Compiles the contract's per-operation schemas once and validates requests
//! (headers, path, query string, body, in that order) and responses against
//! them. Only the first violation is ever reported.

pub mod coerce;
pub mod compiler;
pub mod equivalence;
pub mod registry;
pub mod violation;

pub use compiler::{CompiledSchema, SchemaFailure};
pub use equivalence::EquivalenceTable;
pub use registry::{CompiledOperation, PAGINATION_PARAMS, SchemaRegistry, ValidatedRequest};
pub use violation::{
    RequestPart, ResponseSchemaViolation, SchemaCompilationError, ValidationViolation,
};
