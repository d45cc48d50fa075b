//! Request validation for both pipelines.
//!
//! Errors are collected per field so a caller sees every problem at once.

use std::fmt;

use crate::storage::BlobReference;

/// Trait for validating request objects.
pub trait Validator {
    fn validate(&self) -> Result<(), String>;
}

/// A single field that failed validation.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} must not be empty", label))
            .with_suggestion(format!("Provide {} in the request body", field))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn to_message(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let noun = if self.errors.len() == 1 { "error" } else { "errors" };
        let mut parts = vec![format!(
            "Validation failed: {} {} found",
            self.errors.len(),
            noun
        )];
        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }
        parts.join("\n")
    }

    pub fn into_result(self) -> Result<(), String> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.to_message())
        }
    }
}

pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, label));
    }
}

/// Both halves of a blob address are required.
pub fn validate_blob(blob: &BlobReference, field: &str, errors: &mut ValidationErrors) {
    validate_required(
        &blob.bucket_name,
        &format!("{field}.bucketName"),
        &format!("{field} bucket name"),
        errors,
    );
    validate_required(
        &blob.object_name,
        &format!("{field}.objectName"),
        &format!("{field} object name"),
        errors,
    );
}
