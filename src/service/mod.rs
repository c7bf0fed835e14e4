//! Document service boundary.
//!
//! The paging engine only needs the handful of calls below; everything else
//! about the backend is out of scope. `HttpDocumentService` talks to the real
//! REST API, tests use an in-memory fake.

mod http;

#[cfg(test)]
pub(crate) mod fake;

use crate::error::ServiceError;
use crate::model::{AnnotationKey, Narrator, PageContent, PageNumber, Variation, WordId};
use async_trait::async_trait;

pub use http::{Endpoints, HttpDocumentService};

#[async_trait]
pub trait DocumentService: Send + Sync {
    /// `GET /pages/{n}`.
    async fn fetch_page(&self, page: PageNumber) -> Result<PageContent, ServiceError>;

    /// `GET /variations?word_ids=..`. Callers never pass an empty list.
    async fn fetch_variations(&self, word_ids: &[WordId]) -> Result<Vec<Variation>, ServiceError>;

    async fn fetch_narrators(&self) -> Result<Vec<Narrator>, ServiceError>;

    async fn create_variation(&self, variation: &Variation) -> Result<(), ServiceError>;

    async fn delete_variation(&self, key: AnnotationKey) -> Result<(), ServiceError>;
}
