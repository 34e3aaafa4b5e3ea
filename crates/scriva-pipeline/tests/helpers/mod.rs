//! Shared test fixtures: an in-memory document store and pipeline builders.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use scriva_core::{AnnotationUpdate, Document, DocumentStore, Error, Result};
use scriva_inference::{
    FallbackAnalyzers, MockGenerationBackend, RemoteAnalyzer, ResponseCache,
};
use scriva_pipeline::{AnalysisRouter, EnrichmentConfig, EnrichmentPipeline};

/// In-memory document store with call counters and failure injection.
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<Uuid, Document>>,
    find_calls: AtomicUsize,
    update_calls: AtomicUsize,
    fail_updates: AtomicBool,
    fail_update_ids: Mutex<HashSet<Uuid>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert(&self, document: Document) {
        self.documents
            .lock()
            .unwrap()
            .insert(document.id, document);
    }

    pub fn document(&self, document_id: Uuid) -> Option<Document> {
        self.documents.lock().unwrap().get(&document_id).cloned()
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    pub fn fail_update_for(&self, document_id: Uuid) {
        self.fail_update_ids.lock().unwrap().insert(document_id);
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_document(
        &self,
        tenant_id: Uuid,
        document_id: Uuid,
    ) -> Result<Option<Document>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .documents
            .lock()
            .unwrap()
            .get(&document_id)
            .filter(|doc| doc.tenant_id == tenant_id)
            .cloned())
    }

    async fn update_annotation(&self, document_id: Uuid, update: AnnotationUpdate) -> Result<()> {
        if self.fail_updates.load(Ordering::SeqCst)
            || self.fail_update_ids.lock().unwrap().contains(&document_id)
        {
            return Err(Error::Storage("injected update failure".to_string()));
        }
        self.update_calls.fetch_add(1, Ordering::SeqCst);

        let mut documents = self.documents.lock().unwrap();
        let document = documents
            .get_mut(&document_id)
            .ok_or(Error::NotFound(document_id))?;
        update.apply_to(&mut document.annotation);
        Ok(())
    }
}

pub fn document(tenant_id: Uuid, content: &str) -> Document {
    Document {
        id: Uuid::new_v4(),
        tenant_id,
        title: Some("test document".to_string()),
        content: content.to_string(),
        annotation: Default::default(),
    }
}

/// Pipeline over the given store and mock backend, default config.
pub fn pipeline_with(store: Arc<MemoryStore>, backend: MockGenerationBackend) -> EnrichmentPipeline {
    let router = AnalysisRouter::with_remote(RemoteAnalyzer::new(Box::new(backend)));
    EnrichmentPipeline::new(store, router, EnrichmentConfig::default())
}

/// Pipeline with no provider configured.
pub fn pipeline_without_provider(store: Arc<MemoryStore>) -> EnrichmentPipeline {
    let router = AnalysisRouter::new(
        None,
        FallbackAnalyzers::new(),
        Arc::new(ResponseCache::new()),
    );
    EnrichmentPipeline::new(store, router, EnrichmentConfig::default())
}
