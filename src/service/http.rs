use super::DocumentService;
use crate::config::AppConfig;
use crate::error::ServiceError;
use crate::model::{AnnotationKey, Narrator, PageContent, PageNumber, Variation, WordId};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// URL layout of the REST API.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: String,
    document_id: u32,
}

impl Endpoints {
    pub fn new(base: &str, document_id: u32) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            document_id,
        }
    }

    pub fn page(&self, page: PageNumber) -> String {
        format!("{}/mushafs/{}/pages/{}", self.base, self.document_id, page)
    }

    pub fn variations(&self) -> String {
        format!("{}/variations", self.base)
    }

    pub fn variation_by_keys(&self) -> String {
        format!("{}/variations/by_keys", self.base)
    }

    pub fn narrators(&self) -> String {
        format!("{}/narrators", self.base)
    }
}

pub struct HttpDocumentService {
    client: reqwest::Client,
    endpoints: Endpoints,
}

#[derive(Serialize)]
struct CreateVariation<'a> {
    variation: &'a Variation,
}

impl HttpDocumentService {
    pub fn new(endpoints: Endpoints, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoints })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        Self::new(
            Endpoints::new(&config.api_base_url, config.document_id),
            config.request_timeout(),
        )
    }
}

#[async_trait]
impl DocumentService for HttpDocumentService {
    async fn fetch_page(&self, page: PageNumber) -> Result<PageContent, ServiceError> {
        let url = self.endpoints.page(page);
        debug!(%url, "GET page");
        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.json::<PageContent>().await?)
    }

    async fn fetch_variations(&self, word_ids: &[WordId]) -> Result<Vec<Variation>, ServiceError> {
        let joined = word_ids
            .iter()
            .map(WordId::to_string)
            .collect::<Vec<_>>()
            .join(",");
        debug!(words = word_ids.len(), "GET variations");
        let response = self
            .client
            .get(self.endpoints.variations())
            .query(&[("word_ids", joined)])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<Vec<Variation>>().await?)
    }

    async fn fetch_narrators(&self) -> Result<Vec<Narrator>, ServiceError> {
        let response = self
            .client
            .get(self.endpoints.narrators())
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<Vec<Narrator>>().await?)
    }

    async fn create_variation(&self, variation: &Variation) -> Result<(), ServiceError> {
        self.client
            .post(self.endpoints.variations())
            .json(&CreateVariation { variation })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete_variation(&self, key: AnnotationKey) -> Result<(), ServiceError> {
        self.client
            .delete(self.endpoints.variation_by_keys())
            .query(&[("word_id", key.word_id.0), ("narrator_id", key.narrator_id.0)])
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_urls_without_double_slashes() {
        let endpoints = Endpoints::new("https://example.test/api/", 1);
        let page = PageNumber::new(19).expect("page");
        assert_eq!(
            endpoints.page(page),
            "https://example.test/api/mushafs/1/pages/19"
        );
        assert_eq!(endpoints.variations(), "https://example.test/api/variations");
        assert_eq!(
            endpoints.variation_by_keys(),
            "https://example.test/api/variations/by_keys"
        );
        assert_eq!(endpoints.narrators(), "https://example.test/api/narrators");
    }

    #[test]
    fn create_body_wraps_variation() {
        let variation = Variation {
            word_id: WordId(4),
            narrator_id: crate::model::NarratorId(2),
            content: "x".into(),
        };
        let body = serde_json::to_value(CreateVariation {
            variation: &variation,
        })
        .expect("serialize");
        assert_eq!(
            body,
            serde_json::json!({"variation": {"word_id": 4, "narrator_id": 2, "content": "x"}})
        );
    }
}
