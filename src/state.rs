use std::sync::Arc;

use crate::config::StorageConfig;
use crate::documents::DocumentPipeline;
use crate::generators::{DocxEngine, PlaceholderEngine};
use crate::storage::{OciConnector, ResourcePrincipalProvider, StorageConnector};

#[derive(Clone)]
pub struct AppState {
    pub connector: Arc<dyn StorageConnector>,
    pub text_pipeline: Arc<DocumentPipeline<PlaceholderEngine>>,
    pub docx_pipeline: Arc<DocumentPipeline<DocxEngine>>,
}

impl AppState {
    pub fn new(connector: Arc<dyn StorageConnector>) -> Self {
        Self {
            connector,
            text_pipeline: Arc::new(DocumentPipeline::new(PlaceholderEngine::new())),
            docx_pipeline: Arc::new(DocumentPipeline::new(DocxEngine::new())),
        }
    }

    /// Production wiring: OCI Object Storage with resource principal credentials.
    pub fn from_config(config: &StorageConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .pool_idle_timeout(std::time::Duration::from_secs(900))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let connector = OciConnector::new(
            config.endpoint.clone(),
            http_client,
            Arc::new(ResourcePrincipalProvider::new()),
        );
        Ok(Self::new(Arc::new(connector)))
    }
}
