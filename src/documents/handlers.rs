use actix_web::{web, HttpRequest, HttpResponse};
use log::{debug, error, info};
use uuid::Uuid;

use super::models::{InlineRenderRequest, InlineRenderResponse, MergeEnvelope, StorageMergeRequest};
use crate::error::DocumentError;
use crate::state::AppState;
use crate::ErrorResponse;

/// Default request body limit; base64 Word templates easily exceed actix's 32 KiB default.
pub const DEFAULT_PAYLOAD_LIMIT: usize = 10 * 1024 * 1024;

/// JSON extractor config that reports malformed bodies as `ParseError`.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, req: &HttpRequest| {
            error!("Rejected request body for {}: {}", req.path(), err);
            DocumentError::parse("Invalid request body", err).into()
        })
}

#[utoipa::path(
    post,
    path = "/api/documents/merge",
    tag = "Documents",
    request_body = StorageMergeRequest,
    responses(
        (status = 200, description = "Document generated and stored", body = MergeEnvelope),
        (status = 400, description = "Invalid request, source data or template", body = ErrorResponse),
        (status = 502, description = "Object storage failure", body = ErrorResponse)
    )
)]
pub async fn merge_document(
    state: web::Data<AppState>,
    body: web::Json<StorageMergeRequest>,
) -> Result<HttpResponse, DocumentError> {
    let invocation = Uuid::new_v4();
    info!("[{}] Executing merge_document handler", invocation);
    debug!(
        "[{}] template={}/{} data={}/{} output={}/{}",
        invocation,
        body.template.bucket_name,
        body.template.object_name,
        body.data.bucket_name,
        body.data.object_name,
        body.output.bucket_name,
        body.output.object_name
    );

    match state
        .text_pipeline
        .merge_from_storage(state.connector.as_ref(), &body)
        .await
    {
        Ok(outcome) => {
            info!(
                "[{}] Stored {} bytes ({}) to {}/{}",
                invocation,
                outcome.bytes_written,
                outcome.content_type,
                outcome.output.bucket_name,
                outcome.output.object_name
            );
            Ok(HttpResponse::Ok().json(MergeEnvelope::from(outcome)))
        }
        Err(e) => {
            error!("[{}] Failed with {}: {}", invocation, e.kind(), e);
            Err(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/documents/render",
    tag = "Documents",
    request_body = InlineRenderRequest,
    responses(
        (status = 200, description = "Rendered Word document as base64", body = InlineRenderResponse),
        (status = 400, description = "Missing parameters or generation failure", body = ErrorResponse)
    )
)]
pub async fn render_document(
    state: web::Data<AppState>,
    body: web::Json<InlineRenderRequest>,
) -> Result<HttpResponse, DocumentError> {
    let invocation = Uuid::new_v4();
    info!("[{}] Executing render_document handler", invocation);

    let result = state.docx_pipeline.render_inline(body.into_inner());

    match result {
        Ok(response) => {
            info!(
                "[{}] Rendered document ({} base64 chars)",
                invocation,
                response.template_result.len()
            );
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            error!("[{}] Failed with {}: {}", invocation, e.kind(), e);
            Err(e)
        }
    }
}

/// Register document routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/documents/merge").route(web::post().to(merge_document)))
        .service(web::resource("/api/documents/render").route(web::post().to(render_document)));
}
