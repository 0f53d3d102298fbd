//! In-memory credential repository.
//!
//! Built once from configuration; read-only afterwards.

use std::collections::HashMap;

use super::models::ApiCredential;
use crate::config::AuthConfig;

/// Looks up verification material by api-key.
#[derive(Debug, Clone, Default)]
pub struct CredentialRepository {
    by_key: HashMap<String, ApiCredential>,
    fallback: Option<ApiCredential>,
}

impl CredentialRepository {
    pub fn new(
        credentials: impl IntoIterator<Item = (String, ApiCredential)>,
        fallback: Option<ApiCredential>,
    ) -> Self {
        Self {
            by_key: credentials.into_iter().collect(),
            fallback,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config
                .credentials
                .iter()
                .map(|c| (c.api_key.clone(), c.credential.clone())),
            config.default_credential.clone(),
        )
    }

    /// Resolve the credential for `api_key`, falling back to the default one.
    pub fn resolve(&self, api_key: &str) -> Option<&ApiCredential> {
        self.by_key.get(api_key).or(self.fallback.as_ref())
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
