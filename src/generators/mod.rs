//! Generators module - template engines that merge a data record into a template.
//!
//! - `PlaceholderEngine` - plain-text `{key}` and `{prefix[a.b]}` substitution
//! - `DocxEngine` - the same placeholders inside a Word `.docx` package

pub mod common;
pub mod docx;
pub mod placeholder;
pub mod traits;

pub use docx::{Delimiters, DocxEngine};
pub use placeholder::{generate_document, substitute_nested_paths, substitute_scalars, PlaceholderEngine};
pub use traits::TemplateEngine;

use thiserror::Error;

/// Errors that can occur during document generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("template is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("template is not a ZIP document package")]
    NotAPackage,
    #[error("template is not a valid document package: {0}")]
    InvalidArchive(#[from] zip::result::ZipError),
    #[error("template package has no '{0}' part")]
    MissingPart(String),
    #[error("failed to rewrite template package: {0}")]
    Io(#[from] std::io::Error),
    #[error("unresolved reference '{0}' in template")]
    UnresolvedReference(String),
    #[error("unterminated command starting at '{0}'")]
    UnterminatedCommand(String),
    #[error("empty command in template")]
    EmptyCommand,
}
