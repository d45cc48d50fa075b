//! OCI Object Storage REST client.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode, Url};
use std::sync::Arc;

use super::{BlobReference, CredentialProvider, Credentials, ObjectStorage, StorageConnector, StorageError};

/// Client bound to one set of credentials. Built per invocation by `OciConnector`.
pub struct OciObjectStorage {
    endpoint: String,
    http_client: reqwest::Client,
    credentials: Credentials,
}

impl OciObjectStorage {
    pub fn new(endpoint: impl Into<String>, http_client: reqwest::Client, credentials: Credentials) -> Self {
        Self {
            endpoint: endpoint.into(),
            http_client,
            credentials,
        }
    }

    fn url(&self, segments: &[&str]) -> Result<Url, StorageError> {
        let mut url =
            Url::parse(&self.endpoint).map_err(|e| StorageError::InvalidAddress(e.to_string()))?;
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                StorageError::InvalidAddress(format!("{} cannot be used as a base URL", self.endpoint))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    pub fn namespace_url(&self) -> Result<Url, StorageError> {
        self.url(&["n", ""])
    }

    pub fn object_url(&self, namespace: &str, blob: &BlobReference) -> Result<Url, StorageError> {
        if namespace.is_empty() || blob.bucket_name.is_empty() || blob.object_name.is_empty() {
            return Err(StorageError::InvalidAddress(format!(
                "namespace, bucket and object name are required (got '{}', '{}', '{}')",
                namespace, blob.bucket_name, blob.object_name
            )));
        }
        self.url(&["n", namespace, "b", &blob.bucket_name, "o", &blob.object_name])
    }

    async fn check(response: Response, blob: Option<&BlobReference>) -> Result<Response, StorageError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            if let Some(blob) = blob {
                return Err(StorageError::NotFound {
                    bucket_name: blob.bucket_name.clone(),
                    object_name: blob.object_name.clone(),
                });
            }
        }
        let message = response.text().await.unwrap_or_default();
        Err(StorageError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ObjectStorage for OciObjectStorage {
    async fn get_namespace(&self) -> Result<String, StorageError> {
        let response = self
            .http_client
            .get(self.namespace_url()?)
            .bearer_auth(self.credentials.token())
            .send()
            .await?;
        let namespace: String = Self::check(response, None).await?.json().await?;
        Ok(namespace)
    }

    async fn get_object(&self, namespace: &str, blob: &BlobReference) -> Result<Vec<u8>, StorageError> {
        let response = self
            .http_client
            .get(self.object_url(namespace, blob)?)
            .bearer_auth(self.credentials.token())
            .send()
            .await?;
        let bytes = Self::check(response, Some(blob)).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn put_object(
        &self,
        namespace: &str,
        blob: &BlobReference,
        content: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        let mut request = self
            .http_client
            .put(self.object_url(namespace, blob)?)
            .bearer_auth(self.credentials.token());
        if let Some(content_type) = content_type {
            request = request.header(CONTENT_TYPE, content_type);
        }
        let response = request.body(content).send().await?;
        Self::check(response, None).await?;
        Ok(())
    }
}

/// Authenticates through the injected provider and opens a fresh client.
#[derive(Clone)]
pub struct OciConnector {
    endpoint: String,
    http_client: reqwest::Client,
    provider: Arc<dyn CredentialProvider>,
}

impl OciConnector {
    pub fn new(
        endpoint: impl Into<String>,
        http_client: reqwest::Client,
        provider: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            http_client,
            provider,
        }
    }
}

#[async_trait]
impl StorageConnector for OciConnector {
    async fn connect(&self) -> Result<Arc<dyn ObjectStorage>, StorageError> {
        let credentials = self.provider.credentials().await?;
        Ok(Arc::new(OciObjectStorage::new(
            self.endpoint.clone(),
            self.http_client.clone(),
            credentials,
        )))
    }
}
