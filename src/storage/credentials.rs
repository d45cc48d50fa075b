//! Credential providers for the object storage client.
//!
//! Request signing is out of scope; providers hand back a session token that
//! the client attaches to every request.

use async_trait::async_trait;
use std::env;
use std::fmt;
use std::path::Path;

use super::StorageError;

const RPST_VAR: &str = "OCI_RESOURCE_PRINCIPAL_RPST";

#[derive(Clone)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn credentials(&self) -> Result<Credentials, StorageError>;
}

/// Resource principal credentials supplied by the function runtime.
///
/// `OCI_RESOURCE_PRINCIPAL_RPST` holds either the session token or a path to
/// a file containing it.
#[derive(Debug, Default, Clone)]
pub struct ResourcePrincipalProvider;

impl ResourcePrincipalProvider {
    pub fn new() -> Self {
        Self
    }

    async fn read_token(raw: &str) -> Result<String, StorageError> {
        if Path::new(raw).is_file() {
            let token = tokio::fs::read_to_string(raw).await.map_err(|e| {
                StorageError::Auth(format!("failed to read session token file {raw}: {e}"))
            })?;
            return Ok(token.trim().to_string());
        }
        Ok(raw.trim().to_string())
    }
}

#[async_trait]
impl CredentialProvider for ResourcePrincipalProvider {
    async fn credentials(&self) -> Result<Credentials, StorageError> {
        let raw = env::var(RPST_VAR)
            .map_err(|_| StorageError::Auth(format!("{RPST_VAR} is not set")))?;
        let token = Self::read_token(&raw).await?;
        if token.is_empty() {
            return Err(StorageError::Auth(format!("{RPST_VAR} is empty")));
        }
        Ok(Credentials::new(token))
    }
}

/// Fixed token, for local development and tests.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credentials: Credentials,
}

impl StaticCredentialProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(token),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn credentials(&self) -> Result<Credentials, StorageError> {
        Ok(self.credentials.clone())
    }
}
