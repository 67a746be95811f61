use crate::core::extractor::ResponseExtractor;
use crate::core::query_builder::QueryBuilder;
use crate::domain::catalogue;
use crate::domain::model::{SearchCriteria, SearchResult};
use crate::domain::ports::CompletionProvider;
use crate::utils::error::{Result, SearchError};

/// 組合 prompt、呼叫上游、解析回應
pub struct SearchService<P: CompletionProvider> {
    provider: P,
    query_builder: QueryBuilder,
    extractor: ResponseExtractor,
}

impl<P: CompletionProvider> SearchService<P> {
    pub fn new(provider: P) -> Self {
        Self::with_components(provider, QueryBuilder::default(), ResponseExtractor::default())
    }

    pub fn with_components(
        provider: P,
        query_builder: QueryBuilder,
        extractor: ResponseExtractor,
    ) -> Self {
        Self {
            provider,
            query_builder,
            extractor,
        }
    }

    pub fn query_builder(&self) -> &QueryBuilder {
        &self.query_builder
    }

    pub async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<SearchResult>> {
        if criteria.industry.trim().is_empty() {
            return Err(SearchError::MissingCriteria {
                field: "industry".to_string(),
            });
        }
        if criteria.state.trim().is_empty() {
            return Err(SearchError::MissingCriteria {
                field: "state".to_string(),
            });
        }

        if !catalogue::is_known_industry(&criteria.industry) {
            tracing::warn!("Industry '{}' is not in the catalogue, using default prompt", criteria.industry);
        }
        if !catalogue::is_known_state(&criteria.state) {
            tracing::warn!("State '{}' is not in the catalogue", criteria.state);
        }

        tracing::info!("🔍 Searching {} entities in {}", criteria.industry, criteria.state);

        let prompt = self.query_builder.build(criteria);
        tracing::debug!("Prompt: {}", prompt);

        let text = self.provider.complete(&prompt).await?;

        let results = self.extractor.extract(&text).inspect_err(|e| {
            tracing::warn!("Failed to extract results: {}", e);
        })?;

        tracing::info!("✅ Extracted {} results", results.len());
        Ok(results)
    }
}
