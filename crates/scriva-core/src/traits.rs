//! Core traits for the enrichment pipeline's seams.
//!
//! These are the boundaries to the external collaborators: the persistence
//! layer that owns documents, and the generative provider that produces
//! raw text completions.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{AnnotationUpdate, Document};

// =============================================================================
// DOCUMENT STORE
// =============================================================================

/// Tenant-scoped access to the document persistence layer.
///
/// Callers are responsible for tenant scoping; the pipeline threads the
/// tenant id through but never re-validates ownership.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document within a tenant. `Ok(None)` when absent.
    async fn find_document(&self, tenant_id: Uuid, document_id: Uuid)
        -> Result<Option<Document>>;

    /// Write an annotation update back onto a document.
    ///
    /// Errors here indicate a genuine persistence problem and propagate to
    /// the caller, unlike analyzer failures.
    async fn update_annotation(&self, document_id: Uuid, update: AnnotationUpdate) -> Result<()>;
}

// =============================================================================
// GENERATION BACKEND
// =============================================================================

/// Backend for raw text generation against an external provider.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}
