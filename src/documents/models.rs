use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use super::validation::{validate_blob, ValidationErrors, Validator};
use crate::codec;
use crate::error::DocumentError;
use crate::generators::common::is_truthy;
use crate::storage::{BlobReference, OutputBlob};

pub const MISSING_INLINE_PARAMETERS: &str = "Missing required parameters: template and data";

/// Pipeline A request: where to read the template and data, and where to write the result.
#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct StorageMergeRequest {
    #[serde(default)]
    pub data: BlobReference,
    #[serde(default)]
    pub template: BlobReference,
    #[serde(default)]
    pub output: OutputBlob,
}

impl Validator for StorageMergeRequest {
    fn validate(&self) -> Result<(), String> {
        let mut errors = ValidationErrors::new();
        validate_blob(&self.data, "data", &mut errors);
        validate_blob(&self.template, "template", &mut errors);
        validate_blob(&self.output.blob(), "output", &mut errors);
        errors.into_result()
    }
}

/// Result of a Pipeline A run, before it is wrapped into the response envelope.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub template: String,
    pub json: String,
    pub output: OutputBlob,
    pub content_type: String,
    pub bytes_written: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct MergeBody {
    /// Raw template text as fetched.
    pub template: String,
    /// Raw source JSON text as fetched.
    pub json: String,
}

/// Pipeline A response envelope.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MergeEnvelope {
    pub status_code: u16,
    pub body: MergeBody,
    pub headers: BTreeMap<String, String>,
}

impl From<MergeOutcome> for MergeEnvelope {
    fn from(outcome: MergeOutcome) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            status_code: 200,
            body: MergeBody {
                template: outcome.template,
                json: outcome.json,
            },
            headers,
        }
    }
}

/// Pipeline B request: base64 template plus data given as an object or a JSON string.
#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct InlineRenderRequest {
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub data: Option<Value>,
}

impl Validator for InlineRenderRequest {
    fn validate(&self) -> Result<(), String> {
        let has_template = self
            .template
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());
        let has_data = self.data.as_ref().is_some_and(is_truthy);
        if has_template && has_data {
            Ok(())
        } else {
            Err(MISSING_INLINE_PARAMETERS.to_string())
        }
    }
}

impl InlineRenderRequest {
    /// Decode the template and parse `data` when it arrives as a string.
    pub fn into_parts(self) -> Result<(Vec<u8>, Value), DocumentError> {
        let (Some(template), Some(data)) = (self.template, self.data) else {
            return Err(DocumentError::Validation(MISSING_INLINE_PARAMETERS.to_string()));
        };
        let template = codec::decode(&template)
            .map_err(|e| DocumentError::parse("Template is not valid base64", e))?;
        let data = match data {
            Value::String(text) => serde_json::from_str(&text)
                .map_err(|e| DocumentError::parse("Data is not valid JSON", e))?,
            other => other,
        };
        Ok((template, data))
    }
}

/// Pipeline B success body.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct InlineRenderResponse {
    pub template_result: String,
    pub content_type: String,
}
