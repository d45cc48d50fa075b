use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod codec;
pub mod config;
pub mod documents;
pub mod error;
pub mod generators;
pub mod state;
pub mod storage;

pub use crate::error::DocumentError;
pub use crate::state::AppState;

/// Structured error body returned by every failing invocation.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// HTTP status code, repeated in the body.
    pub status: u16,
    /// One of `ValidationError`, `StorageError`, `GenerationError`, `ParseError`.
    pub kind: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(kind: &str, message: &str, status: u16) -> Self {
        Self {
            error: message.to_string(),
            status,
            kind: kind.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

pub async fn run() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::documents::handlers::merge_document,
            crate::documents::handlers::render_document
        ),
        components(
            schemas(
                documents::models::StorageMergeRequest,
                documents::models::MergeEnvelope,
                documents::models::MergeBody,
                documents::models::InlineRenderRequest,
                documents::models::InlineRenderResponse,
                storage::BlobReference,
                storage::OutputBlob,
                ErrorResponse,
            )
        ),
        tags(
            (name = "Documents", description = "Template merge endpoints.")
        )
    )]
    struct ApiDoc;

    let config = match config::AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = match AppState::from_config(&config.storage) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!("Failed to build object storage client: {}", e);
            std::process::exit(1);
        }
    };

    let prometheus = PrometheusMetricsBuilder::new("document_merge_functions")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    log::info!(
        "Starting server at http://{}:{} (object storage: {})",
        config.host,
        config.port,
        config.storage.endpoint
    );

    let allowed_origins = config.allowed_origins.clone();
    let max_payload_bytes = config.max_payload_bytes;

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["POST", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .max_age(3600);
        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(cors)
            .app_data(app_state.clone())
            .app_data(documents::json_config(max_payload_bytes))
            .configure(documents::config)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
