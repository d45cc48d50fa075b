#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use document_merge_functions::storage::{
    BlobReference, ObjectStorage, StorageConnector, StorageError,
};

pub const NAMESPACE: &str = "test-namespace";

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub content: Vec<u8>,
    pub content_type: Option<String>,
}

/// In-memory object store that records how often the namespace is resolved.
#[derive(Default)]
pub struct MockObjectStorage {
    files: Mutex<HashMap<(String, String), StoredObject>>,
    namespace_lookups: AtomicUsize,
    fail_puts: bool,
}

impl MockObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_puts() -> Self {
        Self {
            fail_puts: true,
            ..Self::default()
        }
    }

    pub async fn insert(&self, bucket: &str, name: &str, content: impl Into<Vec<u8>>) {
        let mut files = self.files.lock().await;
        files.insert(
            (bucket.to_string(), name.to_string()),
            StoredObject {
                content: content.into(),
                content_type: None,
            },
        );
    }

    pub async fn get(&self, bucket: &str, name: &str) -> Option<StoredObject> {
        let files = self.files.lock().await;
        files.get(&(bucket.to_string(), name.to_string())).cloned()
    }

    pub fn namespace_lookups(&self) -> usize {
        self.namespace_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStorage for MockObjectStorage {
    async fn get_namespace(&self) -> Result<String, StorageError> {
        self.namespace_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(NAMESPACE.to_string())
    }

    async fn get_object(&self, namespace: &str, blob: &BlobReference) -> Result<Vec<u8>, StorageError> {
        assert_eq!(namespace, NAMESPACE);
        self.get(&blob.bucket_name, &blob.object_name)
            .await
            .map(|object| object.content)
            .ok_or_else(|| StorageError::NotFound {
                bucket_name: blob.bucket_name.clone(),
                object_name: blob.object_name.clone(),
            })
    }

    async fn put_object(
        &self,
        namespace: &str,
        blob: &BlobReference,
        content: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        assert_eq!(namespace, NAMESPACE);
        if self.fail_puts {
            return Err(StorageError::Status {
                status: 403,
                message: "bucket is read-only".to_string(),
            });
        }
        let mut files = self.files.lock().await;
        files.insert(
            (blob.bucket_name.clone(), blob.object_name.clone()),
            StoredObject {
                content,
                content_type: content_type.map(str::to_string),
            },
        );
        Ok(())
    }
}

/// Connector that hands out the same mock store and counts authentications.
pub struct MockConnector {
    pub storage: Arc<MockObjectStorage>,
    connects: AtomicUsize,
    deny: bool,
}

impl MockConnector {
    pub fn new(storage: Arc<MockObjectStorage>) -> Self {
        Self {
            storage,
            connects: AtomicUsize::new(0),
            deny: false,
        }
    }

    pub fn denying() -> Self {
        Self {
            storage: Arc::new(MockObjectStorage::new()),
            connects: AtomicUsize::new(0),
            deny: true,
        }
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageConnector for MockConnector {
    async fn connect(&self) -> Result<Arc<dyn ObjectStorage>, StorageError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.deny {
            return Err(StorageError::Auth("resource principal token expired".to_string()));
        }
        let storage: Arc<dyn ObjectStorage> = self.storage.clone();
        Ok(storage)
    }
}

/// Build a minimal `.docx` package around the given `word/document.xml` body paragraphs.
pub fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer.start_file("[Content_Types].xml", options).unwrap();
    writer
        .write_all(br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
        .unwrap();
    writer.start_file("word/document.xml", options).unwrap();
    writer.write_all(document.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

/// Read `word/document.xml` back out of a generated package.
pub fn document_xml(package: &[u8]) -> String {
    let mut archive = ZipArchive::new(Cursor::new(package)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml
}
