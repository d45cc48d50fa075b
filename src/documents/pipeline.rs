//! Document pipeline, parameterized over the template engine.
//!
//! The same pipeline drives both flows:
//! - `merge_from_storage` - fetch template and data blobs, render, store the result
//! - `render_inline` - decode a base64 template, render, return base64

use serde_json::Value;

use super::models::{InlineRenderRequest, InlineRenderResponse, MergeOutcome, StorageMergeRequest};
use super::validation::Validator;
use crate::codec;
use crate::error::DocumentError;
use crate::generators::TemplateEngine;
use crate::storage::{fetch_blob, store_blob, OutputBlob, StorageConnector};

pub struct DocumentPipeline<E> {
    engine: E,
}

impl<E: TemplateEngine> DocumentPipeline<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn render(&self, template: &[u8], data: &Value) -> Result<Vec<u8>, DocumentError> {
        Ok(self.engine.generate(template, data)?)
    }

    /// Content type for the stored document: explicit, then by extension, then the engine's.
    pub fn output_content_type(&self, output: &OutputBlob) -> String {
        output
            .content_type
            .as_deref()
            .filter(|ct| !ct.trim().is_empty())
            .or_else(|| codec::detect_mime_type(&output.object_name))
            .unwrap_or_else(|| self.engine.content_type())
            .to_string()
    }

    /// Pipeline A. Authenticates once, then every storage call resolves the namespace itself.
    pub async fn merge_from_storage(
        &self,
        connector: &dyn StorageConnector,
        request: &StorageMergeRequest,
    ) -> Result<MergeOutcome, DocumentError> {
        request.validate().map_err(DocumentError::Validation)?;

        let storage = connector.connect().await?;

        let template = fetch_blob(storage.as_ref(), &request.template).await?;
        let json = fetch_blob(storage.as_ref(), &request.data).await?;

        let json = String::from_utf8(json)
            .map_err(|e| DocumentError::parse("Source data is not valid UTF-8", e))?;
        let data: Value = serde_json::from_str(&json)
            .map_err(|e| DocumentError::parse("Source data is not valid JSON", e))?;

        let document = self.render(&template, &data)?;
        let bytes_written = document.len();
        let content_type = self.output_content_type(&request.output);

        store_blob(
            storage.as_ref(),
            &request.output.blob(),
            document,
            Some(&content_type),
        )
        .await?;

        Ok(MergeOutcome {
            template: String::from_utf8_lossy(&template).into_owned(),
            json,
            output: request.output.clone(),
            content_type,
            bytes_written,
        })
    }

    /// Pipeline B.
    pub fn render_inline(
        &self,
        request: InlineRenderRequest,
    ) -> Result<InlineRenderResponse, DocumentError> {
        request.validate().map_err(DocumentError::Validation)?;
        let (template, data) = request.into_parts()?;
        let document = self.render(&template, &data)?;
        Ok(InlineRenderResponse {
            template_result: codec::encode(&document),
            content_type: self.engine.content_type().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::WORD_DOCUMENT_MIME;
    use crate::generators::{DocxEngine, PlaceholderEngine};
    use serde_json::json;

    #[test]
    fn test_output_content_type_fallbacks() {
        let pipeline = DocumentPipeline::new(PlaceholderEngine);

        let explicit = OutputBlob {
            bucket_name: "out".into(),
            object_name: "letter.html".into(),
            content_type: Some("text/x-custom".into()),
        };
        assert_eq!(pipeline.output_content_type(&explicit), "text/x-custom");

        let by_extension = OutputBlob {
            content_type: None,
            ..explicit.clone()
        };
        assert_eq!(pipeline.output_content_type(&by_extension), "text/html");

        let unknown = OutputBlob {
            object_name: "letter".into(),
            content_type: Some("  ".into()),
            ..explicit
        };
        assert_eq!(pipeline.output_content_type(&unknown), "text/plain");
    }

    #[test]
    fn test_render_inline_with_text_engine() {
        let pipeline = DocumentPipeline::new(PlaceholderEngine);
        let response = pipeline
            .render_inline(InlineRenderRequest {
                template: Some(codec::encode(b"Hi {name}")),
                data: Some(json!({"name": "Ada"})),
            })
            .unwrap();
        assert_eq!(codec::decode(&response.template_result).unwrap(), b"Hi Ada");
        assert_eq!(response.content_type, "text/plain");
    }

    #[test]
    fn test_render_inline_missing_data() {
        let pipeline = DocumentPipeline::new(DocxEngine::new());
        let err = pipeline
            .render_inline(InlineRenderRequest {
                template: Some("UEsDBA==".into()),
                data: None,
            })
            .unwrap_err();
        assert!(matches!(err, DocumentError::Validation(_)));
        assert_eq!(pipeline.engine().content_type(), WORD_DOCUMENT_MIME);
    }

    #[test]
    fn test_render_inline_bad_template_is_generation_error() {
        let pipeline = DocumentPipeline::new(DocxEngine::new());
        let err = pipeline
            .render_inline(InlineRenderRequest {
                template: Some(codec::encode(b"not a package")),
                data: Some(json!({"name": "Ada"})),
            })
            .unwrap_err();
        assert!(matches!(err, DocumentError::Generation(_)));
    }
}
