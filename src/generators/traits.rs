//! Strategy trait shared by the template engines.

use serde_json::Value;

use super::GeneratorError;

/// A template engine turns template bytes plus a data record into a document.
pub trait TemplateEngine: Send + Sync {
    /// Merge `data` into `template`.
    fn generate(&self, template: &[u8], data: &Value) -> Result<Vec<u8>, GeneratorError>;

    /// MIME type of the documents this engine produces.
    fn content_type(&self) -> &'static str;
}
