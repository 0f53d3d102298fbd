use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("Failed to read contract {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse contract: {0}")]
    Parse(String),

    #[error("Unresolvable $ref '{0}'")]
    UnresolvedRef(String),

    #[error("$ref nesting too deep at '{0}' (cyclic reference?)")]
    RefDepth(String),

    #[error("Invalid operation {method} {path}: {reason}")]
    InvalidOperation {
        method: String,
        path: String,
        reason: String,
    },
}
