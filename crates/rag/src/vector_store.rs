//! Vector store client
//!
//! JSON client for the records-search API: `POST
//! {endpoint}/records/namespaces/{namespace}/search` with the query
//! text and `top_k`, hits under `result.hits[].fields.text`. The
//! backend owns embedding and ranking; chunks come back in its
//! relevance order.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::RagError;

/// Vector store configuration
#[derive(Debug, Clone)]
pub struct VectorStoreConfig {
    /// Backend base URL
    pub endpoint: String,
    /// API credential sent as the `Api-Key` header
    pub api_key: String,
    /// Knowledge namespace to search
    pub namespace: String,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum retry attempts for transient failures
    pub max_retries: u32,
    /// Initial backoff duration (doubles each retry)
    pub initial_backoff: Duration,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://demo.svc.pinecone.io".to_string(),
            api_key: String::new(),
            namespace: "solar-knowledge".to_string(),
            timeout: Duration::from_secs(10),
            max_retries: 2,
            initial_backoff: Duration::from_millis(200),
        }
    }
}

/// Vector store client
#[derive(Clone)]
pub struct VectorStore {
    client: Client,
    config: VectorStoreConfig,
}

impl VectorStore {
    /// Create a new vector store client
    pub fn new(config: VectorStoreConfig) -> Result<Self, RagError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RagError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Namespace this store searches
    pub fn namespace(&self) -> &str {
        &self.config.namespace
    }

    /// Build the search URL
    fn search_url(&self) -> String {
        format!(
            "{}/records/namespaces/{}/search",
            self.config.endpoint.trim_end_matches('/'),
            self.config.namespace
        )
    }

    /// Search the namespace for chunks relevant to `query`
    ///
    /// Returns at most `top_k` chunk texts in backend relevance order.
    /// Transient failures (network, timeout, 5xx, 429) are retried
    /// with exponential backoff up to `max_retries`.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<String>, RagError> {
        let request = SearchRequest {
            query: SearchQuery {
                inputs: SearchInputs {
                    text: query.to_string(),
                },
                top_k,
            },
        };

        let mut last_error = None;
        let mut backoff = self.config.initial_backoff;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tracing::warn!(
                    "Retrieval request failed, retrying in {:?} (attempt {}/{})",
                    backoff,
                    attempt,
                    self.config.max_retries
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }

            match self.execute_search(&request).await {
                Ok(chunks) => {
                    tracing::debug!(
                        namespace = %self.config.namespace,
                        hits = chunks.len(),
                        "Retrieval complete"
                    );
                    return Ok(chunks);
                }
                Err(e) if Self::is_retryable(&e) => {
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| RagError::Network("Max retries exceeded".to_string())))
    }

    /// Execute a single search request
    async fn execute_search(&self, request: &SearchRequest) -> Result<Vec<String>, RagError> {
        let response = self
            .client
            .post(self.search_url())
            .header("Api-Key", &self.config.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            // 5xx and 429 are retryable, other 4xx are not
            if status.is_server_error() || status.as_u16() == 429 {
                return Err(RagError::Network(format!("Server error {}: {}", status, error)));
            }
            return Err(RagError::Api(format!("{}: {}", status, error)));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| RagError::InvalidResponse(e.to_string()))?;

        Ok(body
            .result
            .hits
            .into_iter()
            .map(|hit| hit.fields.text)
            .collect())
    }

    /// Check if an error is retryable
    fn is_retryable(error: &RagError) -> bool {
        matches!(error, RagError::Network(_) | RagError::Timeout)
    }
}

// Records-search API types

#[derive(Debug, Serialize)]
struct SearchRequest {
    query: SearchQuery,
}

#[derive(Debug, Serialize)]
struct SearchQuery {
    inputs: SearchInputs,
    top_k: usize,
}

#[derive(Debug, Serialize)]
struct SearchInputs {
    text: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: SearchResult,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResult {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    fields: HitFields,
}

#[derive(Debug, Deserialize)]
struct HitFields {
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = VectorStoreConfig::default();
        assert_eq!(config.namespace, "solar-knowledge");
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn test_search_url() {
        let store = VectorStore::new(VectorStoreConfig {
            endpoint: "https://index.example.io/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            store.search_url(),
            "https://index.example.io/records/namespaces/solar-knowledge/search"
        );
    }

    #[test]
    fn test_request_wire_shape() {
        let request = SearchRequest {
            query: SearchQuery {
                inputs: SearchInputs {
                    text: "panel efficiency".to_string(),
                },
                top_k: 3,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["query"]["inputs"]["text"], "panel efficiency");
        assert_eq!(json["query"]["top_k"], 3);
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "result": {
                "hits": [
                    {"_id": "a", "_score": 0.91, "fields": {"text": "Panels convert sunlight."}},
                    {"_id": "b", "_score": 0.85, "fields": {"text": "Inverters convert DC to AC."}}
                ]
            }
        }"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        let texts: Vec<String> = parsed.result.hits.into_iter().map(|h| h.fields.text).collect();
        assert_eq!(
            texts,
            vec!["Panels convert sunlight.", "Inverters convert DC to AC."]
        );
    }

    #[test]
    fn test_response_parsing_no_hits() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.result.hits.is_empty());
    }

    #[test]
    fn test_retryable_errors() {
        assert!(VectorStore::is_retryable(&RagError::Timeout));
        assert!(VectorStore::is_retryable(&RagError::Network("x".into())));
        assert!(!VectorStore::is_retryable(&RagError::Api("403".into())));
    }
}
