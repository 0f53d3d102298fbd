//! OpenAPI contract loading.
//!
//! Reads the contract document (YAML or JSON), inlines `$ref`s and flattens
//! every operation into an [`OpenApiOperationDescriptor`]: one object schema
//! per request part plus one schema per declared response status.

pub mod error;
pub mod loader;

pub use error::ContractError;
pub use loader::{ContractDocument, OpenApiOperationDescriptor};
