//! Object storage boundary.
//!
//! - `credentials` - injected credential providers
//! - `oci` - REST client for OCI Object Storage
//!
//! Storage failures are returned as `StorageError`, never folded into content.

pub mod credentials;
pub mod oci;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;

pub use credentials::{CredentialProvider, Credentials, ResourcePrincipalProvider, StaticCredentialProvider};
pub use oci::{OciConnector, OciObjectStorage};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("object storage request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("object storage returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("object '{object_name}' not found in bucket '{bucket_name}'")]
    NotFound {
        bucket_name: String,
        object_name: String,
    },
    #[error("invalid object storage address: {0}")]
    InvalidAddress(String),
}

/// Location of a blob in the object store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlobReference {
    #[serde(default)]
    pub bucket_name: String,
    #[serde(default)]
    pub object_name: String,
}

impl BlobReference {
    pub fn new(bucket_name: impl Into<String>, object_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            object_name: object_name.into(),
        }
    }
}

/// Destination blob plus the content type to write it with.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutputBlob {
    #[serde(default)]
    pub bucket_name: String,
    #[serde(default)]
    pub object_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl OutputBlob {
    pub fn blob(&self) -> BlobReference {
        BlobReference::new(&self.bucket_name, &self.object_name)
    }
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Resolve the tenancy namespace that scopes bucket addresses.
    async fn get_namespace(&self) -> Result<String, StorageError>;

    async fn get_object(&self, namespace: &str, blob: &BlobReference) -> Result<Vec<u8>, StorageError>;

    async fn put_object(
        &self,
        namespace: &str,
        blob: &BlobReference,
        content: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), StorageError>;
}

/// Opens an authenticated storage client for a single invocation.
#[async_trait]
pub trait StorageConnector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn ObjectStorage>, StorageError>;
}

/// Resolve the namespace, then download the blob.
pub async fn fetch_blob(
    storage: &dyn ObjectStorage,
    blob: &BlobReference,
) -> Result<Vec<u8>, StorageError> {
    let namespace = storage.get_namespace().await?;
    log::debug!(
        "Fetching {}/{} in namespace {}",
        blob.bucket_name,
        blob.object_name,
        namespace
    );
    storage.get_object(&namespace, blob).await
}

/// Resolve the namespace, then upload the blob.
pub async fn store_blob(
    storage: &dyn ObjectStorage,
    blob: &BlobReference,
    content: Vec<u8>,
    content_type: Option<&str>,
) -> Result<(), StorageError> {
    let namespace = storage.get_namespace().await?;
    log::debug!(
        "Storing {} bytes to {}/{} in namespace {}",
        content.len(),
        blob.bucket_name,
        blob.object_name,
        namespace
    );
    storage.put_object(&namespace, blob, content, content_type).await
}
